use crate::handlers::gemini::{GeminiConfig, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use argon2::password_hash::PasswordHash;
use std::time::Duration;
use thiserror::Error;

const MIN_JWT_SECRET_LEN: usize = 32;
const MAX_TOKEN_TTL_HOURS: u64 = 24 * 366;
const MAX_RECIPE_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Runtime configuration. Secrets never have defaults.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub token_ttl: chrono::Duration,
    pub auth_username: String,
    pub auth_password_hash: String,
    pub gemini: GeminiConfig,
}

impl AppConfig {
    /// Builds the configuration from any key/value source. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET",
                reason: format!("must be at least {} bytes", MIN_JWT_SECRET_LEN),
            });
        }

        let auth_password_hash = required("AUTH_PASSWORD_HASH")?;
        if let Err(e) = PasswordHash::new(&auth_password_hash) {
            return Err(ConfigError::Invalid {
                key: "AUTH_PASSWORD_HASH",
                reason: format!("not an argon2 PHC string ({})", e),
            });
        }

        let token_ttl_hours = parse_bounded(
            get("TOKEN_TTL_HOURS"),
            "TOKEN_TTL_HOURS",
            24,
            MAX_TOKEN_TTL_HOURS,
        )?;
        let recipe_timeout_secs = parse_bounded(
            get("RECIPE_TIMEOUT_SECS"),
            "RECIPE_TIMEOUT_SECS",
            30,
            MAX_RECIPE_TIMEOUT_SECS,
        )?;

        Ok(AppConfig {
            database_url: required("DATABASE_URL")?,
            jwt_secret,
            jwt_issuer: get("JWT_ISSUER").unwrap_or_else(|| "savebite".to_string()),
            token_ttl: chrono::Duration::hours(token_ttl_hours as i64),
            auth_username: required("AUTH_USERNAME")?,
            auth_password_hash,
            gemini: GeminiConfig {
                api_key: get("GEMINI_API_KEY"),
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: get("GEMINI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
                timeout: Duration::from_secs(recipe_timeout_secs),
            },
        })
    }
}

/// Parses an integer in `1..=max`, falling back to `default` when unset.
fn parse_bounded(
    value: Option<String>,
    key: &'static str,
    default: u64,
    max: u64,
) -> Result<u64, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().parse::<u64>() {
        Ok(parsed) if (1..=max).contains(&parsed) => Ok(parsed),
        _ => Err(ConfigError::Invalid {
            key,
            reason: format!("expected an integer between 1 and {}, got {:?}", max, value),
        }),
    }
}
