//! Domain layer - Core archive entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! All types here are shared by the identity, session and letter services.

pub mod constants;
pub mod error;
pub mod letter;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use letter::{Letter, LetterDraft, LetterKind, LetterStatus};
pub use user::{NewUser, User, UserProfile, UserRole};
