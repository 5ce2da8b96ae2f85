use crate::handlers::error::AppError;
use crate::middleware::auth_middleware::{AuthMiddleware, AuthenticatedUser};
use crate::models::all_models::{CreateFoodRequest, MessageResponse};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use log::{error, info};

//Create Food
//Create Food Input: Bearer token, CreateFoodRequest
//Create Food Output: MessageResponse
pub async fn create_food(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: web::Json<CreateFoodRequest>,
) -> Result<HttpResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("Food name cannot be empty"));
    }

    let food = state
        .store
        .add_food(&payload.name, &payload.expiry_date)
        .await
        .map_err(|e| {
            error!("Error saving food {:?}: {:?}", payload.name, e);
            AppError::upstream("Failed to save food")
        })?;

    info!("{} added food #{} ({})", user.username, food.id, food.name);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Food saved successfully")))
}

//List Foods
//List Foods Output: Vec<Food>
pub async fn list_foods(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let foods = state.store.list_foods().await.map_err(|e| {
        error!("Error fetching foods: {:?}", e);
        AppError::upstream("Failed to fetch foods")
    })?;

    Ok(HttpResponse::Ok().json(foods))
}

/// Parses a food id from the path. Integers outside the id column's range
/// cannot name a stored row and come back as `None`.
fn parse_food_id(raw: &str) -> Result<Option<i32>, AppError> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::bad_request(format!("Invalid food id: {:?}", raw)));
    }
    Ok(raw.parse::<i32>().ok())
}

//Delete Food
//Delete Food Input: Path (/foods/{id})
//Delete Food Output: MessageResponse
pub async fn delete_food(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let raw_id = path.into_inner();
    let Some(id) = parse_food_id(&raw_id)? else {
        info!(
            "{} deleted out-of-range food id {}; nothing to remove",
            user.username, raw_id
        );
        return Ok(HttpResponse::Ok().json(MessageResponse::new("Food deleted successfully")));
    };

    let removed = state.store.delete_food(id).await.map_err(|e| {
        error!("Error deleting food #{}: {:?}", id, e);
        AppError::upstream("Failed to delete food")
    })?;

    info!("{} deleted food #{} ({} row(s))", user.username, id, removed);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Food deleted successfully")))
}

//Config Food Routes
// POST /foods
// GET /foods
// DELETE /foods/{id}
pub fn config_food_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/foods")
            .wrap(AuthMiddleware)
            .route(web::post().to(create_food))
            .route(web::get().to(list_foods)),
    )
    .service(
        web::resource("/foods/{id}")
            .wrap(AuthMiddleware)
            .route(web::delete().to(delete_food)),
    );
}
