use crate::handlers::error::AppError;
use crate::models::all_models::{LoginRequest, LoginResponse};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use log::{error, info, warn};

//Login
//Login Input: LoginRequest
//Login Output: LoginResponse
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let verified = state
        .credentials
        .verify(&payload.username, &payload.password)
        .map_err(|e| {
            error!("Error verifying password: {}", e);
            AppError::upstream("Error verifying credentials")
        })?;

    if !verified {
        warn!("Rejected login for {:?}", payload.username);
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let token = state.tokens.issue(&payload.username).map_err(|e| {
        error!("Failed to generate token: {}", e);
        AppError::upstream("Failed to generate token")
    })?;

    info!("Issued token for {}", payload.username);
    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}

//Config User Auth Routes
// POST /login
pub fn config_user_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login));
}
