pub mod foods;
pub mod recipes;
pub mod user_auth;

use crate::handlers::error::AppError;
use actix_web::{web, HttpResponse};
use foods::config_food_routes;
use recipes::config_recipe_routes;
use user_auth::config_user_auth_routes;

/// Registers every route. Expects `web::Data<AppState>` to be provided by the
/// caller. Protected resources wrap `AuthMiddleware` individually so unknown
/// paths still fall through to 404.
pub fn config_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::bad_request(format!("Invalid request body: {}", err)).into()
    }))
    .route(
        "/",
        web::get().to(|| async { HttpResponse::Ok().body("Welcome to the SaveBite API") }),
    )
    .configure(config_user_auth_routes)
    .configure(config_food_routes)
    .configure(config_recipe_routes);
}
