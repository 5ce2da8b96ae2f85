#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use async_trait::async_trait;
use savebite_server::handlers::auth::TokenService;
use savebite_server::handlers::db::FoodStore;
use savebite_server::handlers::gemini::{ProviderError, RecipeProvider};
use savebite_server::handlers::password::{hash_password, Credentials};
use savebite_server::models::all_models::{Food, FoodRecipe};
use savebite_server::routes::config_app;
use savebite_server::state::AppState;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const TEST_ISSUER: &str = "savebite";
pub const TEST_USERNAME: &str = "user";
pub const TEST_PASSWORD: &str = "userpass";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// In-memory stand-in for the Postgres store.
#[derive(Default)]
pub struct MemoryStore {
    foods: Mutex<Vec<Food>>,
    recipes: Mutex<Vec<FoodRecipe>>,
    next_food_id: Mutex<i32>,
    failing: bool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(MemoryStore::default())
    }

    /// Every operation fails as if the database were unreachable.
    pub fn failing() -> Arc<Self> {
        Arc::new(MemoryStore {
            failing: true,
            ..MemoryStore::default()
        })
    }

    pub fn foods(&self) -> Vec<Food> {
        self.foods.lock().unwrap().clone()
    }

    pub fn recipes(&self) -> Vec<FoodRecipe> {
        self.recipes.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.failing {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}

#[async_trait]
impl FoodStore for MemoryStore {
    async fn add_food(&self, name: &str, expiry_date: &str) -> Result<Food, sqlx::Error> {
        self.check()?;
        let mut next_id = self.next_food_id.lock().unwrap();
        *next_id += 1;
        let food = Food {
            id: *next_id,
            name: name.to_string(),
            expiry_date: expiry_date.to_string(),
        };
        self.foods.lock().unwrap().push(food.clone());
        Ok(food)
    }

    async fn list_foods(&self) -> Result<Vec<Food>, sqlx::Error> {
        self.check()?;
        let mut foods = self.foods();
        foods.sort_by_key(|food| food.id);
        Ok(foods)
    }

    async fn delete_food(&self, id: i32) -> Result<u64, sqlx::Error> {
        self.check()?;
        let mut foods = self.foods.lock().unwrap();
        let before = foods.len();
        foods.retain(|food| food.id != id);
        Ok((before - foods.len()) as u64)
    }

    async fn add_recipe(
        &self,
        food_id: Option<i32>,
        recipe: &str,
    ) -> Result<FoodRecipe, sqlx::Error> {
        self.check()?;
        let mut recipes = self.recipes.lock().unwrap();
        let record = FoodRecipe {
            id: recipes.len() as i32 + 1,
            food_id,
            recipe: recipe.to_string(),
        };
        recipes.push(record.clone());
        Ok(record)
    }
}

pub enum StubReply {
    Recipe(&'static str),
    Empty,
    Slow(Duration),
}

/// Recipe provider that answers from a fixed script and records prompts.
pub struct StubProvider {
    reply: StubReply,
    prompts: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn new(reply: StubReply) -> Arc<Self> {
        Arc::new(StubProvider {
            reply,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecipeProvider for StubProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            StubReply::Recipe(text) => Ok(text.to_string()),
            StubReply::Empty => Err(ProviderError::EmptyResponse),
            StubReply::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("too late".to_string())
            }
        }
    }
}

pub fn test_tokens() -> TokenService {
    TokenService::new(
        TEST_SECRET.as_bytes(),
        TEST_ISSUER,
        chrono::Duration::hours(24),
    )
}

pub fn test_state(store: Arc<dyn FoodStore>, recipes: Arc<dyn RecipeProvider>) -> AppState {
    init_logging();
    AppState {
        store,
        recipes,
        tokens: test_tokens(),
        credentials: Credentials::new(
            TEST_USERNAME,
            hash_password(TEST_PASSWORD).expect("hash test password"),
        ),
        recipe_timeout: Duration::from_millis(200),
    }
}

pub fn default_state(store: Arc<MemoryStore>) -> AppState {
    test_state(store, StubProvider::new(StubReply::Recipe("Boil it.")))
}

pub async fn init_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(config_app),
    )
    .await
}

pub fn bearer(username: &str) -> String {
    format!(
        "Bearer {}",
        test_tokens().issue(username).expect("issue test token")
    )
}
