//! Gated operations exposed to presentation layers.

pub mod auth_handler;
pub mod letter_handler;
pub mod user_handler;

pub use auth_handler::LoginRequest;
