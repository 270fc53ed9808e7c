//! Letter handlers.
//!
//! Each handler authorizes against the session before reaching the store,
//! so a denied call leaves the archive untouched.

use chrono::{NaiveDate, Utc};

use common::AppResult;
use domain::{Letter, LetterDraft};
use letter_service_lib::{DashboardSummary, LetterQuery};

use crate::middleware::Operation;
use crate::state::AppState;

/// List letters matching `query` (empty query lists everything)
pub fn list_letters(state: &AppState, query: &LetterQuery) -> AppResult<Vec<Letter>> {
    state.gate.authorize(Operation::ListLetters)?;
    state.letters.query(query)
}

/// Get a single letter for the detail view
pub fn get_letter(state: &AppState, id: &str) -> AppResult<Letter> {
    state.gate.authorize(Operation::ViewLetter)?;
    state.letters.get_letter(id)
}

/// Create a letter from a draft (admin only)
pub fn create_letter(state: &AppState, draft: LetterDraft) -> AppResult<Letter> {
    state.gate.authorize(Operation::CreateLetter)?;
    state.letters.create_letter(draft)
}

/// Insert a complete letter with a caller-chosen ID (admin only)
pub fn add_letter(state: &AppState, letter: Letter) -> AppResult<Letter> {
    state.gate.authorize(Operation::CreateLetter)?;
    state.letters.add_letter(letter)
}

/// Replace a letter by ID; `false` when no letter matched
pub fn update_letter(state: &AppState, letter: Letter) -> AppResult<bool> {
    state.gate.authorize(Operation::UpdateLetter)?;
    state.letters.update_letter(letter)
}

/// Delete a letter by ID (admin only); `false` when no letter matched
pub fn delete_letter(state: &AppState, id: &str) -> AppResult<bool> {
    state.gate.authorize(Operation::DeleteLetter)?;
    state.letters.delete_letter(id)
}

/// Dashboard numbers as of today, over the configured window
pub fn dashboard(state: &AppState) -> AppResult<DashboardSummary> {
    dashboard_at(state, Utc::now().date_naive())
}

/// Dashboard numbers as of `today`
pub fn dashboard_at(state: &AppState, today: NaiveDate) -> AppResult<DashboardSummary> {
    state.gate.authorize(Operation::ListLetters)?;
    state.letters.summary(today, state.config.recent_window_days)
}
