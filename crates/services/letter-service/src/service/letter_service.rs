//! Letter service - Handles record business rules and views.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use common::{AppError, AppResult, OptionExt};
use domain::{Letter, LetterDraft};

use crate::query::{DashboardSummary, LetterQuery};
use crate::repository::LetterRepository;

/// Letter service trait for dependency injection.
pub trait LetterService: Send + Sync {
    /// All letters, newest first
    fn list_letters(&self) -> AppResult<Vec<Letter>>;

    /// Get letter by ID
    fn get_letter(&self, id: &str) -> AppResult<Letter>;

    /// Create a letter from a draft (fresh ID and timestamp)
    fn create_letter(&self, draft: LetterDraft) -> AppResult<Letter>;

    /// Insert a complete letter (rejects an ID already in the store)
    fn add_letter(&self, letter: Letter) -> AppResult<Letter>;

    /// Full replace by ID; returns `false` when nothing matched
    fn update_letter(&self, letter: Letter) -> AppResult<bool>;

    /// Delete by ID; returns `false` when nothing matched
    fn delete_letter(&self, id: &str) -> AppResult<bool>;

    /// Filtered listing
    fn query(&self, query: &LetterQuery) -> AppResult<Vec<Letter>>;

    /// Dashboard numbers as of `today`
    fn summary(&self, today: NaiveDate, window_days: i64) -> AppResult<DashboardSummary>;
}

/// Concrete implementation of LetterService using repository.
pub struct LetterManager {
    repo: Arc<dyn LetterRepository>,
}

impl LetterManager {
    /// Create new letter service instance with repository
    pub fn new(repo: Arc<dyn LetterRepository>) -> Self {
        Self { repo }
    }
}

impl LetterService for LetterManager {
    fn list_letters(&self) -> AppResult<Vec<Letter>> {
        self.repo.list()
    }

    fn get_letter(&self, id: &str) -> AppResult<Letter> {
        self.repo.find_by_id(id)?.ok_or_not_found()
    }

    fn create_letter(&self, draft: LetterDraft) -> AppResult<Letter> {
        let letter = draft.into_letter(Utc::now())?;
        self.add_letter(letter)
    }

    fn add_letter(&self, letter: Letter) -> AppResult<Letter> {
        if letter.id.is_empty() {
            return Err(AppError::validation("Letter id cannot be empty"));
        }
        if self.repo.find_by_id(&letter.id)?.is_some() {
            return Err(AppError::conflict(format!("Letter {}", letter.id)));
        }

        self.repo.insert(letter.clone())?;
        info!(letter_id = %letter.id, category = %letter.category, "Letter added");
        Ok(letter)
    }

    fn update_letter(&self, letter: Letter) -> AppResult<bool> {
        let id = letter.id.clone();
        let replaced = self.repo.replace(letter)?;
        if replaced {
            info!(letter_id = %id, "Letter updated");
        }
        Ok(replaced)
    }

    fn delete_letter(&self, id: &str) -> AppResult<bool> {
        let removed = self.repo.remove(id)?;
        if removed {
            info!(letter_id = %id, "Letter deleted");
        }
        Ok(removed)
    }

    fn query(&self, query: &LetterQuery) -> AppResult<Vec<Letter>> {
        Ok(query.apply(&self.repo.list()?))
    }

    fn summary(&self, today: NaiveDate, window_days: i64) -> AppResult<DashboardSummary> {
        Ok(DashboardSummary::compute(&self.repo.list()?, today, window_days))
    }
}
