//! User domain entity and related types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::{PROTECTED_USERNAME, ROLE_ADMIN, ROLE_USER};
use crate::error::DomainResult;

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

impl From<String> for UserRole {
    fn from(s: String) -> Self {
        UserRole::from(s.as_str())
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", ROLE_ADMIN),
            UserRole::User => write!(f, "{}", ROLE_USER),
        }
    }
}

/// User account as held by the identity store.
///
/// The password is kept and compared in plain text, matching the persisted
/// `app_users` layout. This is a demo posture, not a security contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
    pub role: UserRole,
    pub full_name: String,
}

impl User {
    /// Create a new user account
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        role: UserRole,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            password: password.into(),
            role,
            full_name: full_name.into(),
        }
    }

    /// Check if this is the distinguished account that may never be deleted
    pub fn is_protected(&self) -> bool {
        self.username == PROTECTED_USERNAME
    }

    /// Exact-match credential check (case-sensitive, no trimming)
    pub fn matches_credentials(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }

    /// The two accounts every fresh identity store starts with
    pub fn seed() -> Vec<User> {
        vec![
            User::new("1", "admin", "admin123", UserRole::Admin, "Administrator Utama"),
            User::new("2", "user", "user123", UserRole::User, "Staff Kearsipan"),
        ]
    }
}

/// Public identity of a user (safe to hold in a session or show to a client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub role: UserRole,
    pub full_name: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            full_name: user.full_name,
        }
    }
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            full_name: user.full_name.clone(),
        }
    }
}

/// User creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Login name (unique, case-sensitive)
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    pub username: String,
    /// Plain text password
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
    /// Display name
    #[validate(length(min = 1, message = "Full name cannot be empty"))]
    pub full_name: String,
    /// Role, defaults to USER
    #[serde(default)]
    pub role: UserRole,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        full_name: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            full_name: full_name.into(),
            role,
        }
    }

    /// Validate the input and turn it into an account with a fresh id
    pub fn into_user(self) -> DomainResult<User> {
        self.validate()?;
        Ok(User {
            id: Uuid::new_v4().simple().to_string(),
            username: self.username,
            password: self.password,
            role: self.role,
            full_name: self.full_name,
        })
    }
}
