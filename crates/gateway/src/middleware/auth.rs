//! Access control gate.
//!
//! Every handler asks the gate before it touches a store. The decision comes
//! from the current session's role, never from what a caller chose to show.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use auth_service_lib::SessionManager;
use common::{AppError, AppResult};
use domain::{UserProfile, UserRole};

/// Operations subject to a role check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    ListLetters,
    ViewLetter,
    CreateLetter,
    UpdateLetter,
    DeleteLetter,
    ManageUsers,
}

impl Operation {
    /// Every gated operation
    pub const ALL: [Operation; 6] = [
        Operation::ListLetters,
        Operation::ViewLetter,
        Operation::CreateLetter,
        Operation::UpdateLetter,
        Operation::DeleteLetter,
        Operation::ManageUsers,
    ];

    /// Rule table: admins may do everything, users may read and edit.
    pub fn is_allowed_for(self, role: UserRole) -> bool {
        role.is_admin()
            || matches!(
                self,
                Operation::ListLetters | Operation::ViewLetter | Operation::UpdateLetter
            )
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::ListLetters => "list letters",
            Operation::ViewLetter => "view letter",
            Operation::CreateLetter => "create letter",
            Operation::UpdateLetter => "update letter",
            Operation::DeleteLetter => "delete letter",
            Operation::ManageUsers => "manage users",
        };
        f.write_str(name)
    }
}

/// Check if an authenticated user may perform `operation`.
pub fn require_permission(user: &UserProfile, operation: Operation) -> AppResult<()> {
    if operation.is_allowed_for(user.role) {
        Ok(())
    } else {
        warn!(user_id = %user.id, role = %user.role, %operation, "Operation denied");
        Err(AppError::Forbidden)
    }
}

/// Role check bound to the process session.
#[derive(Debug, Clone)]
pub struct AccessGate {
    session: Arc<SessionManager>,
}

impl AccessGate {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    /// Return the acting user if the session may perform `operation`.
    ///
    /// No session yields `Unauthorized`; a role without the permission
    /// yields `Forbidden`.
    pub fn authorize(&self, operation: Operation) -> AppResult<UserProfile> {
        let user = self.session.current().ok_or_else(|| {
            warn!(%operation, "Operation attempted without a session");
            AppError::Unauthorized
        })?;
        require_permission(&user, operation)?;
        Ok(user)
    }

    /// Operations the current session may perform (empty when anonymous).
    ///
    /// Presentation may use this to hide affordances; enforcement still
    /// happens in `authorize`.
    pub fn capabilities(&self) -> Vec<Operation> {
        match self.session.current() {
            Some(user) => Operation::ALL
                .into_iter()
                .filter(|op| op.is_allowed_for(user.role))
                .collect(),
            None => Vec::new(),
        }
    }
}
