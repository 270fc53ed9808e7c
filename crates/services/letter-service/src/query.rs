//! Query and filter engine.
//!
//! Pure, read-only projections over a snapshot of the record store. Nothing
//! here is cached; every view is recomputed from the slice it is given.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use domain::{Letter, LetterKind, CATEGORIES, DASHBOARD_RECENT_LIMIT};

/// Descriptive fields the free-text filter can look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Subject,
    Correspondent,
    ReferenceNumber,
    Content,
    Category,
}

impl SearchField {
    fn value<'a>(&self, letter: &'a Letter) -> &'a str {
        match self {
            SearchField::Subject => &letter.subject,
            SearchField::Correspondent => &letter.correspondent,
            SearchField::ReferenceNumber => &letter.reference_number,
            SearchField::Content => &letter.content,
            SearchField::Category => &letter.category,
        }
    }
}

/// Fields searched when none are configured
pub const DEFAULT_SEARCH_FIELDS: &[SearchField] = &[
    SearchField::Subject,
    SearchField::Correspondent,
    SearchField::ReferenceNumber,
];

/// Letters whose category equals `category`, relative order kept.
pub fn filter_by_category(letters: &[Letter], category: &str) -> Vec<Letter> {
    letters
        .iter()
        .filter(|l| l.is_category(category))
        .cloned()
        .collect()
}

/// Letters where any of `fields` contains `text`, ignoring case.
pub fn search(letters: &[Letter], text: &str, fields: &[SearchField]) -> Vec<Letter> {
    let needle = text.to_lowercase();
    letters
        .iter()
        .filter(|l| text_matches(l, &needle, fields))
        .cloned()
        .collect()
}

fn text_matches(letter: &Letter, needle: &str, fields: &[SearchField]) -> bool {
    let fields = if fields.is_empty() {
        DEFAULT_SEARCH_FIELDS
    } else {
        fields
    };
    fields
        .iter()
        .any(|f| f.value(letter).to_lowercase().contains(needle))
}

/// Combined listing filter. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterQuery {
    pub category: Option<String>,
    pub text: Option<String>,
    pub kind: Option<LetterKind>,
    pub fields: Vec<SearchField>,
}

impl LetterQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn kind(mut self, kind: LetterKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = SearchField>) -> Self {
        self.fields = fields.into_iter().collect();
        self
    }

    /// Whether a single letter passes every set criterion
    pub fn matches(&self, letter: &Letter) -> bool {
        if let Some(category) = &self.category {
            if !letter.is_category(category) {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if letter.kind != kind {
                return false;
            }
        }
        match &self.text {
            Some(text) => text_matches(letter, &text.to_lowercase(), &self.fields),
            None => true,
        }
    }

    /// Apply the query to a snapshot, keeping its order
    pub fn apply(&self, letters: &[Letter]) -> Vec<Letter> {
        letters.iter().filter(|l| self.matches(l)).cloned().collect()
    }
}

/// Number of letters in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Dashboard numbers, always derived from the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total: usize,
    /// Every configured category (zero when empty), then unknown ones in
    /// first-seen order
    pub by_category: Vec<CategoryCount>,
    pub incoming: usize,
    pub outgoing: usize,
    pub window_days: i64,
    /// Letters dated within `window_days` up to and including `today`
    pub recent_count: usize,
    /// Head of the store, newest first
    pub recent: Vec<Letter>,
}

impl DashboardSummary {
    pub fn compute(letters: &[Letter], today: NaiveDate, window_days: i64) -> Self {
        let mut by_category: Vec<CategoryCount> = CATEGORIES
            .iter()
            .map(|c| CategoryCount {
                category: c.to_string(),
                count: 0,
            })
            .collect();

        for letter in letters {
            match by_category.iter_mut().find(|c| c.category == letter.category) {
                Some(entry) => entry.count += 1,
                None => by_category.push(CategoryCount {
                    category: letter.category.clone(),
                    count: 1,
                }),
            }
        }

        // A window reaching past the calendar covers the whole history
        let window_start = Duration::try_days(window_days.max(0))
            .and_then(|span| today.checked_sub_signed(span))
            .unwrap_or(NaiveDate::MIN);
        let recent_count = letters
            .iter()
            .filter(|l| l.date >= window_start && l.date <= today)
            .count();

        Self {
            total: letters.len(),
            by_category,
            incoming: letters.iter().filter(|l| l.kind == LetterKind::Incoming).count(),
            outgoing: letters.iter().filter(|l| l.kind == LetterKind::Outgoing).count(),
            window_days,
            recent_count,
            recent: letters.iter().take(DASHBOARD_RECENT_LIMIT).cloned().collect(),
        }
    }

    /// Count for one category (zero when absent)
    pub fn count_for(&self, category: &str) -> usize {
        self.by_category
            .iter()
            .find(|c| c.category == category)
            .map_or(0, |c| c.count)
    }
}
