//! Service layer for letter use cases.

mod letter_service;

pub use letter_service::{LetterManager, LetterService};
