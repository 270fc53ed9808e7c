//! Session manager - Holds the single authenticated identity of the process.
//!
//! The session is mirrored to durable storage under `auth_user`: written on
//! every transition into `Authenticated`, removed on every transition to
//! `Anonymous`. Restoring trusts whatever was persisted.
//!
//! Logins are asynchronous, so every attempt takes a monotonic ticket. Only
//! the most recently issued ticket may change the session; logging out or
//! cancelling invalidates every ticket issued before it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use tracing::{debug, error, info, warn};

use common::{AppError, AppResult, JsonStore};
use domain::{UserProfile, STORAGE_KEY_SESSION};

/// Current session state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(UserProfile),
}

impl SessionState {
    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated(user) => Some(user),
        }
    }
}

/// Token identifying one login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoginTicket(u64);

impl LoginTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Owner of the process-wide session.
#[derive(Debug)]
pub struct SessionManager {
    state: RwLock<SessionState>,
    latest_ticket: AtomicU64,
    storage: JsonStore,
}

impl SessionManager {
    /// Start anonymous without looking at storage.
    pub fn anonymous(storage: JsonStore) -> Self {
        Self {
            state: RwLock::new(SessionState::Anonymous),
            latest_ticket: AtomicU64::new(0),
            storage,
        }
    }

    /// Rebuild the session from the last persisted identity.
    ///
    /// A missing record starts `Anonymous`. An unreadable record is logged,
    /// cleared, and also starts `Anonymous`.
    pub fn restore(storage: JsonStore) -> Self {
        let state = match storage.load::<UserProfile>(STORAGE_KEY_SESSION) {
            Ok(Some(user)) => {
                info!(user_id = %user.id, role = %user.role, "Session restored");
                SessionState::Authenticated(user)
            }
            Ok(None) => {
                debug!("No persisted session");
                SessionState::Anonymous
            }
            Err(e) => {
                warn!("Discarding unreadable session record: {}", e);
                if let Err(e) = storage.clear(STORAGE_KEY_SESSION) {
                    error!("Failed to clear session record: {}", e);
                }
                SessionState::Anonymous
            }
        };

        Self {
            state: RwLock::new(state),
            latest_ticket: AtomicU64::new(0),
            storage,
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The authenticated identity, if any
    pub fn current(&self) -> Option<UserProfile> {
        self.state().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// Issue a ticket for a new login attempt, superseding older ones.
    pub fn begin_login(&self) -> LoginTicket {
        LoginTicket(self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the most recent attempt
    pub fn is_current(&self, ticket: LoginTicket) -> bool {
        self.latest_ticket.load(Ordering::SeqCst) == ticket.0
    }

    /// Invalidate every in-flight login attempt.
    pub fn cancel_pending(&self) {
        self.latest_ticket.fetch_add(1, Ordering::SeqCst);
    }

    /// Apply a successful credential check made under `ticket`.
    ///
    /// A stale ticket leaves the session untouched and yields
    /// `LoginSuperseded`. A failed durable write is reported as
    /// `Persistence` while the session stays authenticated.
    pub fn complete_login(&self, ticket: LoginTicket, user: UserProfile) -> AppResult<UserProfile> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, "Discarding stale login resolution");
            return Err(AppError::LoginSuperseded);
        }

        *state = SessionState::Authenticated(user.clone());
        info!(user_id = %user.id, role = %user.role, "Session authenticated");

        self.storage
            .save(STORAGE_KEY_SESSION, &user)
            .inspect_err(|e| error!("Failed to persist session: {}", e))?;
        Ok(user)
    }

    /// Unconditionally return to `Anonymous`.
    pub fn logout(&self) -> AppResult<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        self.cancel_pending();

        if let SessionState::Authenticated(user) = &*state {
            info!(user_id = %user.id, "Session closed");
        }
        *state = SessionState::Anonymous;

        self.storage
            .clear(STORAGE_KEY_SESSION)
            .inspect_err(|e| error!("Failed to clear persisted session: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use common::{MemoryStorage, MockStorage, Storage};
    use domain::{User, UserRole};

    use super::*;

    fn admin() -> UserProfile {
        UserProfile::from(&User::seed()[0])
    }

    fn memory() -> (Arc<MemoryStorage>, JsonStore) {
        let backend = Arc::new(MemoryStorage::new());
        (backend.clone(), JsonStore::new(backend))
    }

    #[test]
    fn restore_without_record_is_anonymous() {
        let (_, storage) = memory();
        let session = SessionManager::restore(storage);
        assert_eq!(session.state(), SessionState::Anonymous);
    }

    #[test]
    fn login_survives_restart_until_logout() {
        let (backend, storage) = memory();
        let session = SessionManager::restore(storage);
        let ticket = session.begin_login();
        session.complete_login(ticket, admin()).unwrap();

        let restarted = SessionManager::restore(JsonStore::new(backend.clone()));
        assert_eq!(restarted.current(), Some(admin()));
        assert_eq!(restarted.current().unwrap().role, UserRole::Admin);

        restarted.logout().unwrap();
        assert!(backend.read(STORAGE_KEY_SESSION).unwrap().is_none());
        let restarted = SessionManager::restore(JsonStore::new(backend));
        assert!(!restarted.is_authenticated());
    }

    #[test]
    fn persisted_session_never_contains_password() {
        let (backend, storage) = memory();
        let session = SessionManager::anonymous(storage);
        session.complete_login(session.begin_login(), admin()).unwrap();

        let raw = backend.read(STORAGE_KEY_SESSION).unwrap().unwrap();
        assert!(!raw.contains("admin123"));
    }

    #[test]
    fn stale_ticket_cannot_override_newer_login() {
        let (_, storage) = memory();
        let session = SessionManager::anonymous(storage);
        let first = session.begin_login();
        let second = session.begin_login();

        let user = UserProfile::from(&User::seed()[1]);
        session.complete_login(second, user.clone()).unwrap();
        let stale = session.complete_login(first, admin());

        assert_eq!(stale.unwrap_err(), AppError::LoginSuperseded);
        assert_eq!(session.current(), Some(user));
    }

    #[test]
    fn logout_invalidates_pending_tickets() {
        let (_, storage) = memory();
        let session = SessionManager::anonymous(storage);
        let ticket = session.begin_login();
        session.logout().unwrap();

        assert!(!session.is_current(ticket));
        assert_eq!(
            session.complete_login(ticket, admin()).unwrap_err(),
            AppError::LoginSuperseded
        );
        assert!(!session.is_authenticated());
    }

    #[test]
    fn unreadable_record_is_cleared() {
        let (backend, storage) = memory();
        backend.write(STORAGE_KEY_SESSION, "{broken").unwrap();

        let session = SessionManager::restore(storage);

        assert!(!session.is_authenticated());
        assert!(backend.read(STORAGE_KEY_SESSION).unwrap().is_none());
    }

    #[test]
    fn failed_session_write_is_reported_but_session_stays() {
        let mut backend = MockStorage::new();
        backend
            .expect_write()
            .returning(|_, _| Err(AppError::persistence("read-only device")));
        let session = SessionManager::anonymous(JsonStore::new(Arc::new(backend)));

        let result = session.complete_login(session.begin_login(), admin());

        assert!(matches!(result.unwrap_err(), AppError::Persistence(_)));
        assert_eq!(session.current(), Some(admin()));
    }
}
