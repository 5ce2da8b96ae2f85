use crate::middleware::auth_middleware::AuthenticatedUser;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header::USER_AGENT, StatusCode},
    Error, HttpMessage,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use log::{error, info, warn, Level};
use std::{rc::Rc, time::Instant};

/// Access log for the API: one line per request, tagged with the user the
/// auth gate resolved (or `-` for public routes and rejected requests).
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestLoggerMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequestLoggerMiddleware {
            service: Rc::new(service),
        })
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: Rc<S>,
}

/// Level for a finished request. Auth rejections and upstream failures are the
/// two outcomes an operator of this service watches for.
fn level_for(status: StatusCode) -> Level {
    if status.is_server_error() || status == StatusCode::UNAUTHORIZED {
        Level::Warn
    } else {
        Level::Info
    }
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let route = format!("{} {}", req.method(), req.path());
        let client_ip = req
            .connection_info()
            .peer_addr()
            .unwrap_or("unknown")
            .to_owned();
        let user_agent = req
            .headers()
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-")
            .to_owned();

        let service = self.service.clone();
        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start_time.elapsed();

            match &res {
                Ok(response) => {
                    let status = response.status();
                    let user = response
                        .request()
                        .extensions()
                        .get::<AuthenticatedUser>()
                        .map(|user| user.username.clone())
                        .unwrap_or_else(|| "-".to_string());

                    let line = format!(
                        "[SAVEBITE] {} {} user={} status={} time={:.2?} ua={:?}",
                        client_ip,
                        route,
                        user,
                        status.as_u16(),
                        elapsed,
                        user_agent
                    );
                    match level_for(status) {
                        Level::Warn => warn!("{}", line),
                        _ => info!("{}", line),
                    }
                }
                Err(err) => {
                    error!(
                        "[SAVEBITE] {} {} failed after {:.2?}: {}",
                        client_ip, route, elapsed, err
                    );
                }
            }

            res
        })
    }
}
