use crate::handlers::auth::TokenError;
use crate::handlers::error::AppError;
use crate::state::AppState;
use actix_web::{
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderValue, AUTHORIZATION},
    web, Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use futures_util::future::{ok, ready, Ready};
use log::{error, warn};
use std::{
    future::Future,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll},
};
use thiserror::Error;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity attached to the request once the bearer token has been validated.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub username: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or_else(|| AppError::unauthorized("Authentication required")),
        )
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,
    #[error("Malformed Authorization header")]
    MalformedHeader,
    #[error("{0}")]
    Token(#[from] TokenError),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Unauthorized(e.to_string())
    }
}

/// Extracts the token from a `Bearer <token>` header value.
pub fn parse_bearer(value: Option<&HeaderValue>) -> Result<&str, AuthError> {
    let value = value.ok_or(AuthError::MissingHeader)?;
    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}

fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        error!("AppState is not registered; protected routes cannot validate tokens");
        AppError::upstream("Internal server error")
    })?;

    let token = parse_bearer(req.headers().get(AUTHORIZATION))?;
    let username = state.tokens.validate(token).map_err(AuthError::from)?;

    Ok(AuthenticatedUser { username })
}

/// Middleware for bearer token authentication
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareMiddleware {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareMiddleware<S> {
    pub service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            match authenticate(&req) {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(e) => {
                    warn!(
                        "[SAVEBITE-AUTH] {} {} rejected: {}",
                        req.method(),
                        req.path(),
                        e
                    );
                    let response = e.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}
