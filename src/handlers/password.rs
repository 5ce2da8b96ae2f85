use argon2::{
    password_hash::{
        rand_core::OsRng, Error as PasswordHashError, PasswordHash, PasswordHasher,
        PasswordVerifier, SaltString,
    },
    Argon2,
};

/// Hashes a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Checks a password against a PHC string. A wrong password is `Ok(false)`.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PasswordHashError> {
    let parsed = PasswordHash::new(password_hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// The single account allowed to log in.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password_hash: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn verify(&self, username: &str, password: &str) -> Result<bool, PasswordHashError> {
        if username != self.username {
            return Ok(false);
        }
        verify_password(password, &self.password_hash)
    }
}
