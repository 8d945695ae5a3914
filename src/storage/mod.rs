//! Storage module for the press-release store
//!
//! This module handles all database operations for the harvester, including:
//! - SQLite database initialization and idempotent schema creation
//! - Insert-if-absent persistence of discovered releases
//! - Missing-content selection for the backfill phase
//! - Read-only projections for export and maintenance

mod schema;
mod sqlite;
mod traits;

pub use schema::initialize_schema;
pub use sqlite::SqliteStore;
pub use traits::{StorageError, StorageResult, Store};

use std::path::Path;

/// Initializes or opens a storage database
pub fn open_store(path: &Path) -> Result<SqliteStore, crate::HarvestError> {
    SqliteStore::new(path)
}

/// A release stub discovered on a listing page, not yet persisted
///
/// `id` is the external identifier extracted from the release's canonical
/// URL. `date` is `YYYY-MM-DD` when the upstream timestamp parsed, the raw
/// timestamp string when it did not, and None when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredRelease {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub date: Option<String>,
}

/// A fully materialized press-release row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PressRelease {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub date: Option<String>,
    pub content: Option<String>,
}

/// The minimal projection the backfill phase needs per row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseStub {
    pub id: i64,
    pub url: String,
}

/// Id plus non-NULL content, for the audit and migration collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRow {
    pub id: i64,
    pub content: String,
}
