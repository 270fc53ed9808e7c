//! Role matrix tests for the access control gate.
//!
//! Every gated operation is invoked through its handler as each role, and
//! denied calls must leave the persisted stores exactly as they were.

use std::sync::Arc;

use chrono::NaiveDate;

use common::{AppError, AppResult, ArsipConfig, JsonStore, MemoryStorage};
use domain::{
    Letter, LetterDraft, LetterKind, LetterStatus, User, UserRole, STORAGE_KEY_LETTERS,
    STORAGE_KEY_USERS,
};
use gateway_lib::handlers::{auth_handler, letter_handler, user_handler, LoginRequest};
use gateway_lib::{AppState, Operation};
use letter_service_lib::LetterQuery;

// =============================================================================
// Helpers
// =============================================================================

fn fresh_state() -> (AppState, Arc<MemoryStorage>) {
    let backend = Arc::new(MemoryStorage::new());
    let state = AppState::with_storage(ArsipConfig::ephemeral(), backend.clone()).unwrap();
    (state, backend)
}

async fn state_as(role: UserRole) -> (AppState, Arc<MemoryStorage>) {
    let (state, backend) = fresh_state();
    let (username, password) = match role {
        UserRole::Admin => ("admin", "admin123"),
        UserRole::User => ("user", "user123"),
    };
    auth_handler::login(&state, LoginRequest::new(username, password))
        .await
        .unwrap();
    (state, backend)
}

fn draft() -> LetterDraft {
    LetterDraft {
        reference_number: "015/UND/2024".to_string(),
        subject: "Undangan Workshop".to_string(),
        correspondent: "Balai Besar".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        category: "Undangan".to_string(),
        kind: LetterKind::Incoming,
        status: LetterStatus::Pending,
        content: String::new(),
    }
}

fn invoke(state: &AppState, operation: Operation) -> AppResult<()> {
    match operation {
        Operation::ListLetters => {
            letter_handler::list_letters(state, &LetterQuery::new()).map(|_| ())
        }
        Operation::ViewLetter => letter_handler::get_letter(state, "seed-1").map(|_| ()),
        Operation::CreateLetter => letter_handler::create_letter(state, draft()).map(|_| ()),
        Operation::UpdateLetter => {
            let mut letter = Letter::seed().remove(0);
            letter.status = LetterStatus::Archived;
            letter_handler::update_letter(state, letter).map(|_| ())
        }
        Operation::DeleteLetter => letter_handler::delete_letter(state, "seed-2").map(|_| ()),
        Operation::ManageUsers => user_handler::list_users(state).map(|_| ()),
    }
}

/// Persisted store contents, read straight from the backend
fn snapshot(backend: &Arc<MemoryStorage>) -> (Vec<Letter>, Vec<User>) {
    let store = JsonStore::new(backend.clone());
    (
        store.load(STORAGE_KEY_LETTERS).unwrap().unwrap(),
        store.load(STORAGE_KEY_USERS).unwrap().unwrap(),
    )
}

// =============================================================================
// Role Matrix
// =============================================================================

#[tokio::test]
async fn test_admin_is_allowed_everything() {
    for operation in Operation::ALL {
        let (state, _) = state_as(UserRole::Admin).await;
        assert!(
            invoke(&state, operation).is_ok(),
            "admin should be allowed to {}",
            operation
        );
    }
}

#[tokio::test]
async fn test_user_role_matrix() {
    let expected = [
        (Operation::ListLetters, true),
        (Operation::ViewLetter, true),
        (Operation::CreateLetter, false),
        (Operation::UpdateLetter, true),
        (Operation::DeleteLetter, false),
        (Operation::ManageUsers, false),
    ];

    for (operation, allowed) in expected {
        let (state, backend) = state_as(UserRole::User).await;
        let before = snapshot(&backend);

        let result = invoke(&state, operation);

        if allowed {
            assert!(result.is_ok(), "user should be allowed to {}", operation);
        } else {
            assert_eq!(result.unwrap_err(), AppError::Forbidden, "user and {}", operation);
            assert_eq!(snapshot(&backend), before, "denied {} changed state", operation);
        }
    }
}

#[test]
fn test_anonymous_is_rejected_everywhere() {
    for operation in Operation::ALL {
        let (state, backend) = fresh_state();
        let before = snapshot(&backend);

        assert_eq!(invoke(&state, operation).unwrap_err(), AppError::Unauthorized);
        assert_eq!(snapshot(&backend), before);
    }
}

#[tokio::test]
async fn test_user_cannot_manage_users() {
    let (state, backend) = state_as(UserRole::User).await;
    let before = snapshot(&backend);

    let create = user_handler::create_user(
        &state,
        domain::NewUser::new("intruder", "pw", "Intruder", UserRole::Admin),
    );
    let delete = user_handler::delete_user(&state, "1");

    assert_eq!(create.unwrap_err(), AppError::Forbidden);
    assert_eq!(delete.unwrap_err(), AppError::Forbidden);
    assert_eq!(snapshot(&backend), before);
}

// =============================================================================
// Protected Admin Account
// =============================================================================

#[tokio::test]
async fn test_protected_admin_cannot_be_removed_by_any_role() {
    for role in [UserRole::Admin, UserRole::User] {
        let (state, backend) = state_as(role).await;

        let result = user_handler::delete_user(&state, "1");

        assert_eq!(result.unwrap_err(), AppError::Forbidden);
        let (_, users) = snapshot(&backend);
        assert!(users.iter().any(|u| u.username == "admin"));
    }
}

#[tokio::test]
async fn test_capabilities_follow_session() {
    let (state, _) = state_as(UserRole::User).await;
    assert!(!auth_handler::capabilities(&state).contains(&Operation::DeleteLetter));

    auth_handler::logout(&state).unwrap();
    assert!(auth_handler::capabilities(&state).is_empty());

    auth_handler::login(&state, LoginRequest::new("admin", "admin123"))
        .await
        .unwrap();
    assert_eq!(auth_handler::capabilities(&state), Operation::ALL.to_vec());
}
