//! Unified error handling.
//!
//! Provides a single error type for every archive operation. Authentication
//! and authorization failures are kept apart from persistence failures, since
//! the latter are raised after the in-memory mutation already happened.

use domain::DomainError;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Login attempt superseded")]
    LoginSuperseded,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    // Durable storage
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::LoginSuperseded => "LOGIN_SUPERSEDED",
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }

    /// Check if the error comes from an authentication or role check
    pub fn is_access_error(&self) -> bool {
        matches!(
            self,
            AppError::Unauthorized | AppError::Forbidden | AppError::InvalidCredentials
        )
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidCredentials => "Username atau password salah.".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Conflict(msg) => {
                if msg.ends_with("already exists") {
                    msg.clone()
                } else {
                    format!("{} already exists", msg)
                }
            }
            AppError::Persistence(_) => "Changes could not be saved to local storage".to_string(),
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::ProtectedAccount(_) => AppError::Forbidden,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Persistence(format!("serialization failed: {}", err))
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        AppError::Persistence(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_account_maps_to_forbidden() {
        let err: AppError = DomainError::ProtectedAccount("admin".into()).into();
        assert_eq!(err, AppError::Forbidden);
        assert!(err.is_access_error());
    }

    #[test]
    fn persistence_is_not_an_access_error() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert_eq!(err.code(), "PERSISTENCE_ERROR");
        assert!(!err.is_access_error());
        assert_eq!(err.user_message(), "Changes could not be saved to local storage");
    }

    #[test]
    fn conflict_message_is_not_duplicated() {
        assert_eq!(AppError::conflict("Username").user_message(), "Username already exists");
        assert_eq!(
            AppError::conflict("Username already exists").user_message(),
            "Username already exists"
        );
    }

    #[test]
    fn missing_option_becomes_not_found() {
        let value: Option<u8> = None;
        assert_eq!(value.ok_or_not_found(), Err(AppError::NotFound));
    }

    #[test]
    fn user_message_emits_no_events() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        use tracing_subscriber::layer::{Context, SubscriberExt};
        use tracing_subscriber::Layer;

        struct CountEvents(Arc<AtomicUsize>);

        impl<S: tracing::Subscriber> Layer<S> for CountEvents {
            fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let events = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(CountEvents(events.clone()));

        tracing::subscriber::with_default(subscriber, || {
            let message = AppError::persistence("disk full").user_message();
            assert_eq!(message, "Changes could not be saved to local storage");
            assert_eq!(events.load(Ordering::SeqCst), 0);

            tracing::error!("counted");
        });

        assert_eq!(events.load(Ordering::SeqCst), 1);
    }
}
