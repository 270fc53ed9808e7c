//! Authentication service - Resolves logins against the identity store.
//!
//! A login waits for the configured delay before checking credentials. Each
//! attempt holds a ticket from the session manager, so a slow attempt that
//! resolves after a newer one (or after a logout) is discarded.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use common::{AppError, AppResult};
use domain::UserProfile;
use user_service_lib::UserService;

use crate::session::SessionManager;

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and open a session
    async fn login(&self, username: &str, password: &str) -> AppResult<UserProfile>;

    /// Close the session and discard pending logins
    fn logout(&self) -> AppResult<()>;

    /// Discard pending logins without touching the session
    fn cancel_pending(&self);

    /// The authenticated identity, if any
    fn current_user(&self) -> Option<UserProfile>;
}

/// Concrete implementation of AuthService using the user service.
pub struct Authenticator {
    users: Arc<dyn UserService>,
    session: Arc<SessionManager>,
    login_delay: Duration,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(
        users: Arc<dyn UserService>,
        session: Arc<SessionManager>,
        login_delay: Duration,
    ) -> Self {
        Self {
            users,
            session,
            login_delay,
        }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn login(&self, username: &str, password: &str) -> AppResult<UserProfile> {
        let ticket = self.session.begin_login();
        debug!(ticket = ticket.value(), username, "Login attempt started");

        if !self.login_delay.is_zero() {
            tokio::time::sleep(self.login_delay).await;
        }

        if !self.session.is_current(ticket) {
            debug!(ticket = ticket.value(), "Login attempt superseded");
            return Err(AppError::LoginSuperseded);
        }

        let user = self.users.authenticate(username, password).inspect_err(|e| {
            if matches!(e, AppError::InvalidCredentials) {
                warn!(username, "Login failed: invalid credentials");
            }
        })?;

        self.session.complete_login(ticket, UserProfile::from(user))
    }

    fn logout(&self) -> AppResult<()> {
        self.session.logout()
    }

    fn cancel_pending(&self) {
        self.session.cancel_pending();
    }

    fn current_user(&self) -> Option<UserProfile> {
        self.session.current()
    }
}
