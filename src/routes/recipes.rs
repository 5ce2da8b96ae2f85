use crate::handlers::error::AppError;
use crate::handlers::gemini::ProviderError;
use crate::middleware::auth_middleware::{AuthMiddleware, AuthenticatedUser};
use crate::models::all_models::{RecipeRequest, RecipeResponse};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use log::{error, info};

pub const RECIPE_SIGNATURE: &str = "by Chef SaveBite";

pub fn recipe_prompt(food_name: &str) -> String {
    format!(
        "Act as a chef. Give an easy recipe with exact measurements that still tastes great for: {}. \
         At the very end, write \"{}\".",
        food_name.trim(),
        RECIPE_SIGNATURE
    )
}

//Generate Recipe
//Generate Recipe Input: Bearer token, RecipeRequest
//Generate Recipe Output: RecipeResponse
pub async fn generate_recipe(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: web::Json<RecipeRequest>,
) -> Result<HttpResponse, AppError> {
    if payload.food_name.trim().is_empty() {
        return Err(AppError::bad_request("Food name cannot be empty"));
    }

    let prompt = recipe_prompt(&payload.food_name);

    // Dropping this future on client disconnect also drops the provider call.
    let generated =
        match tokio::time::timeout(state.recipe_timeout, state.recipes.generate(&prompt)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(state.recipe_timeout)),
        };

    let recipe = generated.map_err(|e| {
        error!("Recipe generation for {:?} failed: {}", payload.food_name, e);
        match e {
            ProviderError::MissingApiKey => AppError::upstream("Recipe service is not configured"),
            ProviderError::EmptyResponse => {
                AppError::upstream("AI did not return a valid recipe")
            }
            _ => AppError::upstream("Failed to get a recipe from the AI"),
        }
    })?;

    let record = state
        .store
        .add_recipe(payload.food_id, &recipe)
        .await
        .map_err(|e| {
            error!("Error saving recipe for {:?}: {:?}", payload.food_name, e);
            AppError::upstream("Failed to save recipe")
        })?;

    info!(
        "{} generated recipe #{} for {:?}",
        user.username, record.id, payload.food_name
    );
    Ok(HttpResponse::Ok().json(RecipeResponse { recipe }))
}

//Config Recipe Routes
// POST /recipe
pub fn config_recipe_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/recipe")
            .wrap(AuthMiddleware)
            .route(web::post().to(generate_recipe)),
    );
}
