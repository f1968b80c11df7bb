//! Storage trait and error types

use crate::model::{PageOutcome, Song};
use crate::storage::FailedPage;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The dedup gate is protocol-level: `song_exists` must run before every
/// `insert_song` attempt. The minimal schema carries no unique constraint on
/// the catalog number.
pub trait Storage {
    // ===== Songs =====

    /// Checks whether a song with this catalog number is already persisted
    fn song_exists(&self, number: &str) -> StorageResult<bool>;

    /// Inserts a song, returning its row id
    ///
    /// Callers do not retry failed inserts; recovery happens structurally
    /// via quarantine and a later sweep.
    fn insert_song(&mut self, song: &Song) -> StorageResult<i64>;

    /// Total number of persisted songs
    fn count_songs(&self) -> StorageResult<u64>;

    // ===== Audit log =====

    /// Appends one audit entry for a page visit
    ///
    /// Append-only; callers treat failure as fatal because the resume
    /// cursor is derived from this log.
    fn append_log(&mut self, page_number: u32, outcome: PageOutcome) -> StorageResult<()>;

    /// Page number of the newest audit entry, if any
    fn last_logged_page(&self) -> StorageResult<Option<u32>>;

    /// Total number of audit entries
    fn count_log_entries(&self) -> StorageResult<u64>;

    /// Count of audit entries per outcome code
    fn outcome_breakdown(&self) -> StorageResult<HashMap<PageOutcome, u64>>;

    // ===== Failed pages =====

    /// Quarantines a page, returning the new row id
    ///
    /// One row per occurrence; repeated failures of the same page number
    /// produce duplicate rows.
    fn quarantine(&mut self, page_number: u32, reason: PageOutcome) -> StorageResult<i64>;

    /// Deletes a quarantine row after a successful re-visit
    fn retire_failed_page(&mut self, failed_page_id: i64) -> StorageResult<()>;

    /// Quarantine rows with internal id in `[start_id, end_id)`, ascending
    fn failed_pages_in_range(&self, start_id: i64, end_id: i64) -> StorageResult<Vec<FailedPage>>;

    /// Total number of quarantined pages
    fn count_failed_pages(&self) -> StorageResult<u64>;
}
