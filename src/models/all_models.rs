use serde::{Deserialize, Serialize};
use sqlx::FromRow;

//  FOOD INVENTORY

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Food {
    pub id: i32,
    pub name: String,
    pub expiry_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FoodRecipe {
    pub id: i32,
    pub food_id: Option<i32>,
    pub recipe: String,
}

//  REQUESTS & RESPONSES

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateFoodRequest {
    pub name: String,
    pub expiry_date: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RecipeRequest {
    pub food_name: String,
    /// Food item the recipe belongs to. Stored unlinked when omitted.
    #[serde(default)]
    pub food_id: Option<i32>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RecipeResponse {
    pub recipe: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}
