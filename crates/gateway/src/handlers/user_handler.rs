//! User directory handlers (admin only).

use common::AppResult;
use domain::{NewUser, UserProfile};

use crate::middleware::Operation;
use crate::state::AppState;

/// List all users
pub fn list_users(state: &AppState) -> AppResult<Vec<UserProfile>> {
    state.gate.authorize(Operation::ManageUsers)?;
    let users = state.users.list_users()?;
    Ok(users.into_iter().map(UserProfile::from).collect())
}

/// Create a user; duplicate usernames are rejected
pub fn create_user(state: &AppState, payload: NewUser) -> AppResult<UserProfile> {
    state.gate.authorize(Operation::ManageUsers)?;
    let user = state.users.create_user(payload)?;
    Ok(UserProfile::from(user))
}

/// Delete a user; the protected admin account is always refused
pub fn delete_user(state: &AppState, id: &str) -> AppResult<bool> {
    state.gate.authorize(Operation::ManageUsers)?;
    state.users.delete_user(id)
}
