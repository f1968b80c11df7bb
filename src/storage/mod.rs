//! Storage module for harvested catalog data
//!
//! Three independent row sets back the engine:
//! - `songs`: harvested records, deduplicated by catalog number
//! - `crawl_log`: append-only audit log, one entry per page visit
//! - `failed_pages`: quarantine set consumed by the reconciliation sweep
//!
//! No foreign keys are enforced between them; each row set is keyed for
//! lookup, not referential integrity.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::model::PageOutcome;

/// Quarantine row for a page whose visit failed
///
/// The internal `id` is monotonic, so insertion order equals discovery
/// order; the sweeper walks it in ascending windows.
#[derive(Debug, Clone)]
pub struct FailedPage {
    pub id: i64,
    pub page_number: u32,
    pub reason: PageOutcome,
    pub recorded_at: String,
}
