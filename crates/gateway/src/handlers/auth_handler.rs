//! Authentication handlers.

use serde::Deserialize;

use common::{AppError, AppResult};
use domain::UserProfile;

use crate::middleware::Operation;
use crate::state::AppState;

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Check credentials and open the session.
///
/// Fails with `InvalidCredentials` on a wrong pair and `LoginSuperseded`
/// when a newer attempt or a logout overtook this one.
pub async fn login(state: &AppState, payload: LoginRequest) -> AppResult<UserProfile> {
    state.auth.login(&payload.username, &payload.password).await
}

/// Close the session.
pub fn logout(state: &AppState) -> AppResult<()> {
    state.auth.logout()
}

/// Get current authenticated user
pub fn current_user(state: &AppState) -> AppResult<UserProfile> {
    state.auth.current_user().ok_or(AppError::Unauthorized)
}

/// Operations the current session may perform
pub fn capabilities(state: &AppState) -> Vec<Operation> {
    state.gate.capabilities()
}
