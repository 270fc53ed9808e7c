//! Letter domain entity and related types.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::{
    CATEGORY_DECREE, CATEGORY_INCOMING, CATEGORY_INVITATION, CATEGORY_MEMO, CATEGORY_OUTGOING,
    CATEGORY_REPORT,
};
use crate::error::DomainResult;

/// Direction of a piece of correspondence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LetterKind {
    Incoming,
    Outgoing,
}

/// Processing status of a letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LetterStatus {
    #[default]
    Pending,
    Processed,
    Archived,
}

/// Archived correspondence record.
///
/// Only `id` and `category` carry meaning for the store; the rest is
/// descriptive and owned by whoever renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Letter {
    pub id: String,
    pub reference_number: String,
    pub subject: String,
    /// Sender for incoming letters, recipient for outgoing ones
    pub correspondent: String,
    pub date: NaiveDate,
    pub category: String,
    pub kind: LetterKind,
    #[serde(default)]
    pub status: LetterStatus,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Letter {
    /// Check whether the letter belongs to the given category
    pub fn is_category(&self, category: &str) -> bool {
        self.category == category
    }

    /// The fixed set a fresh archive starts with, newest first
    pub fn seed() -> Vec<Letter> {
        vec![
            seed_letter(
                "seed-1",
                "005/UND/BP-PAUD/2024",
                "Undangan Rapat Koordinasi Program PAUD",
                "Dinas Pendidikan Provinsi",
                (2024, 5, 20),
                CATEGORY_INVITATION,
                LetterKind::Incoming,
                LetterStatus::Pending,
            ),
            seed_letter(
                "seed-2",
                "112/SK/BP-PAUD/2024",
                "Penetapan Tim Pengembang Kurikulum",
                "Internal BP PAUD & PNF",
                (2024, 5, 14),
                CATEGORY_DECREE,
                LetterKind::Outgoing,
                LetterStatus::Processed,
            ),
            seed_letter(
                "seed-3",
                "087/KEL/BP-PAUD/2024",
                "Permohonan Data Lembaga PNF",
                "Kementerian Pendidikan",
                (2024, 5, 8),
                CATEGORY_OUTGOING,
                LetterKind::Outgoing,
                LetterStatus::Processed,
            ),
            seed_letter(
                "seed-4",
                "421/MSK/2024",
                "Laporan Monitoring Satuan PAUD Triwulan I",
                "Pokja Bunda PAUD",
                (2024, 4, 30),
                CATEGORY_INCOMING,
                LetterKind::Incoming,
                LetterStatus::Archived,
            ),
        ]
    }
}

#[allow(clippy::too_many_arguments)]
fn seed_letter(
    id: &str,
    reference_number: &str,
    subject: &str,
    correspondent: &str,
    (year, month, day): (i32, u32, u32),
    category: &str,
    kind: LetterKind,
    status: LetterStatus,
) -> Letter {
    let date = NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();
    let created_at = Utc.from_utc_datetime(&date.and_hms_opt(8, 0, 0).unwrap_or_default());
    Letter {
        id: id.to_string(),
        reference_number: reference_number.to_string(),
        subject: subject.to_string(),
        correspondent: correspondent.to_string(),
        date,
        category: category.to_string(),
        kind,
        status,
        content: String::new(),
        created_at,
    }
}

/// Letter creation data transfer object (id and timestamp are assigned)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LetterDraft {
    #[serde(default)]
    pub reference_number: String,
    #[validate(length(min = 1, message = "Subject cannot be empty"))]
    pub subject: String,
    #[serde(default)]
    pub correspondent: String,
    pub date: NaiveDate,
    #[validate(length(min = 1, message = "Category cannot be empty"))]
    pub category: String,
    pub kind: LetterKind,
    #[serde(default)]
    pub status: LetterStatus,
    #[serde(default)]
    pub content: String,
}

impl LetterDraft {
    /// Validate the draft and stamp it with a fresh id and creation time
    pub fn into_letter(self, created_at: DateTime<Utc>) -> DomainResult<Letter> {
        self.validate()?;
        Ok(Letter {
            id: Uuid::new_v4().to_string(),
            reference_number: self.reference_number,
            subject: self.subject,
            correspondent: self.correspondent,
            date: self.date,
            category: self.category,
            kind: self.kind,
            status: self.status,
            content: self.content,
            created_at,
        })
    }
}
