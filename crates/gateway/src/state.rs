//! Application state for dependency injection.
//!
//! All stores are constructed here, once, and handed to handlers by `Arc`.
//! Nothing in the archive lives in a global.

use std::sync::Arc;

use tracing::info;

use auth_service_lib::{AuthService, Authenticator, SessionManager, SessionState};
use common::{storage, AppResult, ArsipConfig, JsonStore, Storage};
use letter_service_lib::LetterService;
use user_service_lib::UserService;

use crate::middleware::AccessGate;

/// Application state shared across handlers.
///
/// The services are reachable only through the gated handlers:
///
/// ```compile_fail
/// fn bypass(state: &gateway_lib::AppState) {
///     let _letters = &state.letters;
/// }
/// ```
#[derive(Clone)]
pub struct AppState {
    pub(crate) auth: Arc<dyn AuthService>,
    pub(crate) users: Arc<dyn UserService>,
    pub(crate) letters: Arc<dyn LetterService>,
    pub(crate) session: Arc<SessionManager>,
    pub(crate) gate: AccessGate,
    pub(crate) config: ArsipConfig,
}

impl AppState {
    /// Open the configured storage backend and restore every store from it.
    pub fn bootstrap(config: ArsipConfig) -> AppResult<Self> {
        let backend = storage::open(&config)?;
        Self::with_storage(config, backend)
    }

    /// Restore every store from an already opened backend.
    ///
    /// The identity store and the letters are restored (or seeded), then the
    /// session is rebuilt from its persisted record without re-checking
    /// credentials.
    pub fn with_storage(config: ArsipConfig, backend: Arc<dyn Storage>) -> AppResult<Self> {
        let storage = JsonStore::new(backend);

        let users = user_service_lib::bootstrap(storage.clone())?;
        let letters = letter_service_lib::bootstrap(storage.clone(), config.persist_letters)?;
        let session = Arc::new(SessionManager::restore(storage));
        let auth = Arc::new(Authenticator::new(
            users.clone(),
            session.clone(),
            config.login_delay(),
        ));

        info!(
            backend = ?config.storage_backend,
            persist_letters = config.persist_letters,
            authenticated = session.is_authenticated(),
            "Archive state ready"
        );

        Ok(Self {
            auth,
            users,
            letters,
            gate: AccessGate::new(session.clone()),
            session,
            config,
        })
    }

    /// Snapshot of the session state.
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn config(&self) -> &ArsipConfig {
        &self.config
    }
}
