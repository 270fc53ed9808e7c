//! Service layer for authentication use cases.

mod auth_service;

pub use auth_service::{AuthService, Authenticator};
