//! Domain-level constants.
//!
//! These constants define business rules, storage keys and seed data.

// =============================================================================
// User Roles
// =============================================================================

/// Read-only role assigned to new users by default
pub const ROLE_USER: &str = "USER";

/// Administrator role with full access
pub const ROLE_ADMIN: &str = "ADMIN";

/// Username of the distinguished account that can never be deleted
pub const PROTECTED_USERNAME: &str = "admin";

// =============================================================================
// Letter Categories
// =============================================================================

pub const CATEGORY_INCOMING: &str = "Surat Masuk";
pub const CATEGORY_OUTGOING: &str = "Surat Keluar";
pub const CATEGORY_INVITATION: &str = "Undangan";
pub const CATEGORY_DECREE: &str = "Surat Keputusan";
pub const CATEGORY_MEMO: &str = "Nota Dinas";
pub const CATEGORY_REPORT: &str = "Laporan";

/// Known letter categories, in display order
pub const CATEGORIES: &[&str] = &[
    CATEGORY_INCOMING,
    CATEGORY_OUTGOING,
    CATEGORY_INVITATION,
    CATEGORY_DECREE,
    CATEGORY_MEMO,
    CATEGORY_REPORT,
];

/// Check if a category is one of the configured categories
pub fn is_known_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}

// =============================================================================
// Durable Storage Keys
// =============================================================================

/// Key holding the persisted session identity
pub const STORAGE_KEY_SESSION: &str = "auth_user";

/// Key holding the persisted identity store
pub const STORAGE_KEY_USERS: &str = "app_users";

/// Key holding the persisted letter collection
pub const STORAGE_KEY_LETTERS: &str = "app_letters";

// =============================================================================
// Defaults
// =============================================================================

/// Default simulated login delay in milliseconds
pub const DEFAULT_LOGIN_DELAY_MS: u64 = 1000;

/// Default dashboard recency window in days
pub const DEFAULT_RECENT_WINDOW_DAYS: i64 = 30;

/// Number of letters shown in the dashboard "recent" list
pub const DASHBOARD_RECENT_LIMIT: usize = 5;
