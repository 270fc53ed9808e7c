//! User service - Handles account business rules.
//!
//! Uniqueness of usernames and protection of the distinguished admin account
//! are enforced here, on top of the permissive repository.

use std::sync::Arc;

use tracing::{info, warn};

use common::{AppError, AppResult, OptionExt};
use domain::{DomainError, NewUser, User};

use crate::repository::UserRepository;

/// User service trait for dependency injection.
pub trait UserService: Send + Sync {
    /// Look up an account by exact credentials
    fn authenticate(&self, username: &str, password: &str) -> AppResult<User>;

    /// Get user by ID
    fn get_user(&self, id: &str) -> AppResult<User>;

    /// List all users in directory order
    fn list_users(&self) -> AppResult<Vec<User>>;

    /// Create a new account (rejects duplicate usernames)
    fn create_user(&self, new_user: NewUser) -> AppResult<User>;

    /// Delete an account; returns `false` when the ID is unknown
    fn delete_user(&self, id: &str) -> AppResult<bool>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

impl UserService for UserManager {
    fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        self.repo
            .find_by_credentials(username, password)?
            .ok_or(AppError::InvalidCredentials)
    }

    fn get_user(&self, id: &str) -> AppResult<User> {
        self.repo.find_by_id(id)?.ok_or_not_found()
    }

    fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.list()
    }

    fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        let user = new_user.into_user()?;

        if self.repo.find_by_username(&user.username)?.is_some() {
            return Err(AppError::conflict("Username"));
        }

        self.repo.add(user.clone())?;
        info!(user_id = %user.id, username = %user.username, role = %user.role, "User created");
        Ok(user)
    }

    fn delete_user(&self, id: &str) -> AppResult<bool> {
        let Some(user) = self.repo.find_by_id(id)? else {
            return Ok(false);
        };

        if user.is_protected() {
            warn!(user_id = %id, "Refused to delete protected account");
            return Err(DomainError::ProtectedAccount(user.username).into());
        }

        let removed = self.repo.remove(id)?;
        info!(user_id = %id, "User deleted");
        Ok(removed)
    }
}
