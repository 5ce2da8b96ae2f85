pub mod auth;
pub mod db;
pub mod error;
pub mod gemini;
pub mod password;
