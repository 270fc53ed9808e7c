//! Letter Service Library
//!
//! This crate provides the record store for archived letters and the
//! query/filter engine that derives listings and dashboard views from it.

pub mod query;
pub mod repository;
pub mod service;

use std::sync::Arc;

use common::{AppResult, JsonStore};

use crate::repository::LetterStore;
use crate::service::LetterManager;

pub use crate::query::{DashboardSummary, LetterQuery, SearchField};
pub use crate::repository::LetterRepository;
pub use crate::service::LetterService;

/// Open the record store and wrap it in the service.
pub fn bootstrap(storage: JsonStore, persist: bool) -> AppResult<Arc<LetterManager>> {
    let letter_repo = Arc::new(LetterStore::load(storage, persist)?);
    Ok(Arc::new(LetterManager::new(letter_repo)))
}
