//! Repository layer for letter data access.

mod letter_repository;

pub use letter_repository::{LetterRepository, LetterStore};

#[cfg(any(test, feature = "test-utils"))]
pub use letter_repository::MockLetterRepository;
