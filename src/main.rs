use actix_cors::Cors;
use actix_web::web;
use log::{error, info, warn};
use savebite_server::{
    config::AppConfig,
    handlers::{
        db::{check_db_connection, PgFoodStore},
        gemini::GeminiClient,
    },
    middleware::request_logger::RequestLogger,
    routes::config_app,
    state::AppState,
};
use shuttle_actix_web::ShuttleActixWeb;
use shuttle_runtime::SecretStore;
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};

fn startup_error(message: &str, e: impl std::fmt::Display) -> shuttle_runtime::Error {
    error!("{}: {}", message, e);
    shuttle_runtime::Error::Custom(anyhow::anyhow!("{}: {}", message, e))
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_runtime::Secrets] secrets: SecretStore,
) -> ShuttleActixWeb<impl FnOnce(&mut web::ServiceConfig) + Send + Clone + 'static> {
    info!("=== SaveBite API Server Starting ===");

    // Shuttle secrets win; a local .env or the process environment fills the gaps.
    dotenvy::dotenv().ok();
    let config =
        AppConfig::from_lookup(|key| secrets.get(key).or_else(|| std::env::var(key).ok()))
            .map_err(|e| startup_error("Invalid configuration", e))?;

    if config.gemini.api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; POST /recipe will answer 500 until it is");
    }

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.database_url)
        .await
        .map_err(|e| startup_error("Failed to connect to Postgres", e))?;

    if check_db_connection(&pool).await {
        info!("Database connection established and verified");
    } else {
        warn!("Database connection established but verification failed");
    }

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| startup_error("Failed to run migrations", e))?;

    let gemini = GeminiClient::new(&config.gemini)
        .map_err(|e| startup_error("Failed to build Gemini client", e))?;

    let state = AppState::new(&config, Arc::new(PgFoodStore::new(pool)), Arc::new(gemini));
    info!(
        "Issuing tokens as {:?} for user {:?}",
        state.tokens.issuer(),
        state.credentials.username()
    );
    let state = web::Data::new(state);

    let config = move |cfg: &mut web::ServiceConfig| {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        cfg.app_data(state);
        cfg.service(
            web::scope("")
                .wrap(RequestLogger)
                .wrap(cors)
                .configure(config_app),
        );
    };

    Ok(config.into())
}
