use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structure representing JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub username: String,
    pub exp: usize, // Expiration timestamp
    pub iat: usize,
    pub iss: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid token signature")]
    InvalidSignature,
    #[error("Token has expired")]
    Expired,
    #[error("Malformed token")]
    Malformed,
    #[error("Token lifetime is out of range")]
    LifetimeOutOfRange,
    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            _ => TokenError::Malformed,
        }
    }
}

/// Issues and validates HS256 bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl: Duration) -> Self {
        TokenService {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            ttl,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Generates a token for `username` that expires after the configured TTL.
    pub fn issue(&self, username: &str) -> Result<String, TokenError> {
        self.issue_at(username, Utc::now())
    }

    fn issue_at(&self, username: &str, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let expiration = issued_at
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::LifetimeOutOfRange)?;
        let claims = Claims {
            username: username.to_string(),
            exp: expiration.timestamp().max(0) as usize,
            iat: issued_at.timestamp().max(0) as usize,
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Validates a token and returns the username it was issued for.
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        // No grace period past `exp`.
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(token_data.claims.username)
    }
}
