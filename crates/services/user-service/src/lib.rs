//! User Service Library
//!
//! This crate provides the identity store: the authoritative collection of
//! user accounts, persisted under `app_users`.

pub mod repository;
pub mod service;

use std::sync::Arc;

use common::{AppResult, JsonStore};

use crate::repository::UserStore;
use crate::service::UserManager;

pub use crate::repository::UserRepository;
pub use crate::service::UserService;

/// Restore the identity store from storage and wrap it in the service.
pub fn bootstrap(storage: JsonStore) -> AppResult<Arc<UserManager>> {
    let user_repo = Arc::new(UserStore::load(storage)?);
    Ok(Arc::new(UserManager::new(user_repo)))
}
