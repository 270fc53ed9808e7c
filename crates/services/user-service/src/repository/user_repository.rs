//! Identity store backed by durable key/value storage.

use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use tracing::{debug, error, info};

use common::{AppResult, JsonStore};
use domain::{User, STORAGE_KEY_USERS};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// The repository is deliberately permissive: it neither rejects duplicate
/// usernames nor protects any account. Those rules live in the service.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait UserRepository: Send + Sync {
    /// Exact-match lookup; the first match wins
    fn find_by_credentials(&self, username: &str, password: &str) -> AppResult<Option<User>>;

    /// Find user by ID
    fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;

    /// Find user by username (case-sensitive)
    fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Append a user to the end of the collection
    fn add(&self, user: User) -> AppResult<()>;

    /// Remove by ID; returns whether a record was removed
    fn remove(&self, id: &str) -> AppResult<bool>;

    /// List all users in insertion order
    fn list(&self) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserRepository persisted under `app_users`.
pub struct UserStore {
    users: RwLock<Vec<User>>,
    storage: JsonStore,
}

impl UserStore {
    /// Restore the collection from storage, seeding it when absent.
    pub fn load(storage: JsonStore) -> AppResult<Self> {
        let users = match storage.load::<Vec<User>>(STORAGE_KEY_USERS)? {
            Some(users) => {
                debug!(count = users.len(), "Identity store restored");
                users
            }
            None => {
                let seed = User::seed();
                storage.save(STORAGE_KEY_USERS, &seed)?;
                info!("Identity store seeded with default accounts");
                seed
            }
        };

        Ok(Self {
            users: RwLock::new(users),
            storage,
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<User>> {
        self.users.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write the full collection. The in-memory change is kept on failure.
    fn persist(&self, users: &[User]) -> AppResult<()> {
        self.storage.save(STORAGE_KEY_USERS, users).inspect_err(|e| {
            error!("Failed to persist identity store: {}", e);
        })
    }
}

impl UserRepository for UserStore {
    fn find_by_credentials(&self, username: &str, password: &str) -> AppResult<Option<User>> {
        Ok(self
            .read()
            .iter()
            .find(|u| u.matches_credentials(username, password))
            .cloned())
    }

    fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.read().iter().find(|u| u.id == id).cloned())
    }

    fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.read().iter().find(|u| u.username == username).cloned())
    }

    fn add(&self, user: User) -> AppResult<()> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        users.push(user);
        self.persist(&users)
    }

    fn remove(&self, id: &str) -> AppResult<bool> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Ok(false);
        }
        self.persist(&users)?;
        Ok(true)
    }

    fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.read().clone())
    }
}
