use crate::config::AppConfig;
use crate::handlers::auth::TokenService;
use crate::handlers::db::FoodStore;
use crate::handlers::gemini::RecipeProvider;
use crate::handlers::password::Credentials;
use std::sync::Arc;
use std::time::Duration;

/// Everything a handler needs, built once at startup and shared read-only.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FoodStore>,
    pub recipes: Arc<dyn RecipeProvider>,
    pub tokens: TokenService,
    pub credentials: Credentials,
    /// Upper bound on a single recipe generation, client disconnects aside.
    pub recipe_timeout: Duration,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn FoodStore>,
        recipes: Arc<dyn RecipeProvider>,
    ) -> Self {
        AppState {
            store,
            recipes,
            tokens: TokenService::new(
                config.jwt_secret.as_bytes(),
                config.jwt_issuer.clone(),
                config.token_ttl,
            ),
            credentials: Credentials::new(
                config.auth_username.clone(),
                config.auth_password_hash.clone(),
            ),
            recipe_timeout: config.gemini.timeout,
        }
    }
}
