//! Record store holding the ordered letter collection.
//!
//! The newest insertion is always at the head. Every mutation writes the
//! whole collection under `app_letters` before returning, unless the store
//! was opened without persistence (then it starts from the seed set on every
//! run and never writes).

use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use tracing::{debug, error, info};

use common::{AppResult, JsonStore};
use domain::{Letter, STORAGE_KEY_LETTERS};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Letter repository trait for dependency injection.
///
/// Identifier uniqueness is not checked here; callers generate ids.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait LetterRepository: Send + Sync {
    /// All letters, most recently inserted first
    fn list(&self) -> AppResult<Vec<Letter>>;

    /// Find letter by ID
    fn find_by_id(&self, id: &str) -> AppResult<Option<Letter>>;

    /// Prepend a letter
    fn insert(&self, letter: Letter) -> AppResult<()>;

    /// Remove the first letter with this ID; returns whether one was removed
    fn remove(&self, id: &str) -> AppResult<bool>;

    /// Replace the whole letter with the matching ID; returns whether one matched
    fn replace(&self, updated: Letter) -> AppResult<bool>;
}

/// Concrete implementation of LetterRepository.
pub struct LetterStore {
    letters: RwLock<Vec<Letter>>,
    storage: Option<JsonStore>,
}

impl LetterStore {
    /// Open the store.
    ///
    /// With `persist` set, the collection is restored from `app_letters`
    /// (seed set when absent). Without it, the store always starts from the
    /// seed set and keeps everything in memory.
    pub fn load(storage: JsonStore, persist: bool) -> AppResult<Self> {
        if !persist {
            debug!("Letter persistence disabled, starting from seed set");
            return Ok(Self::in_memory(Letter::seed()));
        }

        let letters = match storage.load::<Vec<Letter>>(STORAGE_KEY_LETTERS)? {
            Some(letters) => {
                debug!(count = letters.len(), "Letter store restored");
                letters
            }
            None => {
                let seed = Letter::seed();
                storage.save(STORAGE_KEY_LETTERS, &seed)?;
                info!(count = seed.len(), "Letter store seeded");
                seed
            }
        };

        Ok(Self {
            letters: RwLock::new(letters),
            storage: Some(storage),
        })
    }

    /// Memory-only store with the given contents (head first).
    pub fn in_memory(letters: Vec<Letter>) -> Self {
        Self {
            letters: RwLock::new(letters),
            storage: None,
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Letter>> {
        self.letters.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write the full collection. The in-memory change is kept on failure.
    fn persist(&self, letters: &[Letter]) -> AppResult<()> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };
        storage
            .save(STORAGE_KEY_LETTERS, letters)
            .inspect_err(|e| error!("Failed to persist letters: {}", e))
    }
}

impl LetterRepository for LetterStore {
    fn list(&self) -> AppResult<Vec<Letter>> {
        Ok(self.read().clone())
    }

    fn find_by_id(&self, id: &str) -> AppResult<Option<Letter>> {
        Ok(self.read().iter().find(|l| l.id == id).cloned())
    }

    fn insert(&self, letter: Letter) -> AppResult<()> {
        let mut letters = self.letters.write().unwrap_or_else(PoisonError::into_inner);
        letters.insert(0, letter);
        self.persist(&letters)
    }

    fn remove(&self, id: &str) -> AppResult<bool> {
        let mut letters = self.letters.write().unwrap_or_else(PoisonError::into_inner);
        let Some(index) = letters.iter().position(|l| l.id == id) else {
            return Ok(false);
        };
        letters.remove(index);
        self.persist(&letters)?;
        Ok(true)
    }

    fn replace(&self, updated: Letter) -> AppResult<bool> {
        let mut letters = self.letters.write().unwrap_or_else(PoisonError::into_inner);
        let Some(slot) = letters.iter_mut().find(|l| l.id == updated.id) else {
            return Ok(false);
        };
        *slot = updated;
        self.persist(&letters)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, TimeZone, Utc};
    use common::{AppError, MemoryStorage, MockStorage, Storage};
    use domain::{LetterKind, LetterStatus};

    use super::*;

    fn letter(id: &str, category: &str) -> Letter {
        Letter {
            id: id.to_string(),
            reference_number: format!("{}/REF", id),
            subject: format!("Perihal {}", id),
            correspondent: "Dinas Pendidikan".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            category: category.to_string(),
            kind: LetterKind::Incoming,
            status: LetterStatus::Pending,
            content: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
        }
    }

    fn ids(store: &LetterStore) -> Vec<String> {
        store.list().unwrap().into_iter().map(|l| l.id).collect()
    }

    #[test]
    fn inserts_come_back_in_reverse_order() {
        let store = LetterStore::in_memory(Vec::new());
        for id in ["a", "b", "c", "d"] {
            store.insert(letter(id, "Undangan")).unwrap();
        }
        assert_eq!(ids(&store), vec!["d", "c", "b", "a"]);
    }

    #[test]
    fn insert_goes_ahead_of_seed_set() {
        let store = LetterStore::in_memory(Letter::seed());
        let seeded = Letter::seed().len();
        store.insert(letter("L1", "Undangan")).unwrap();
        store.insert(letter("L2", "Undangan")).unwrap();

        let ids = ids(&store);
        assert_eq!(&ids[..2], &["L2", "L1"]);
        assert_eq!(ids.len(), seeded + 2);
    }

    #[test]
    fn remove_deletes_record_and_ignores_absent_ids() {
        let store = LetterStore::in_memory(vec![letter("a", "x"), letter("b", "x")]);

        assert!(store.remove("a").unwrap());
        assert_eq!(ids(&store), vec!["b"]);

        assert!(!store.remove("zzz").unwrap());
        assert_eq!(ids(&store), vec!["b"]);
    }

    #[test]
    fn replace_changes_exactly_one_record() {
        let store =
            LetterStore::in_memory(vec![letter("a", "x"), letter("b", "x"), letter("c", "x")]);
        let before = store.list().unwrap();

        let mut updated = letter("b", "Laporan");
        updated.status = LetterStatus::Archived;
        assert!(store.replace(updated.clone()).unwrap());

        let after = store.list().unwrap();
        assert_eq!(after[0], before[0]);
        assert_eq!(after[1], updated);
        assert_eq!(after[2], before[2]);
    }

    #[test]
    fn replace_with_unknown_id_is_a_no_op() {
        let store = LetterStore::in_memory(vec![letter("a", "x")]);
        let before = store.list().unwrap();

        assert!(!store.replace(letter("missing", "x")).unwrap());
        assert_eq!(store.list().unwrap(), before);
    }

    #[test]
    fn persistent_store_survives_restart() {
        let backend = Arc::new(MemoryStorage::new());
        let store = LetterStore::load(JsonStore::new(backend.clone()), true).unwrap();
        store.insert(letter("L1", "Undangan")).unwrap();
        store.remove("seed-2").unwrap();
        let before = store.list().unwrap();

        let restarted = LetterStore::load(JsonStore::new(backend), true).unwrap();
        assert_eq!(restarted.list().unwrap(), before);
    }

    #[test]
    fn non_persistent_store_resets_to_seed() {
        let backend = Arc::new(MemoryStorage::new());
        let store = LetterStore::load(JsonStore::new(backend.clone()), false).unwrap();
        store.insert(letter("L1", "Undangan")).unwrap();

        assert!(!store.is_persistent());
        assert!(backend.read(STORAGE_KEY_LETTERS).unwrap().is_none());
        let restarted = LetterStore::load(JsonStore::new(backend), false).unwrap();
        assert_eq!(restarted.list().unwrap(), Letter::seed());
    }

    #[test]
    fn failed_write_is_reported_after_mutation() {
        let mut backend = MockStorage::new();
        backend
            .expect_read()
            .returning(|_| Ok(Some("[]".to_string())));
        backend
            .expect_write()
            .returning(|_, _| Err(AppError::persistence("disk full")));
        let store = LetterStore::load(JsonStore::new(Arc::new(backend)), true).unwrap();

        let err = store.insert(letter("L1", "Undangan")).unwrap_err();

        assert!(matches!(err, AppError::Persistence(_)));
        assert_eq!(ids(&store), vec!["L1"]);
    }
}
