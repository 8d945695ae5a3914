//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{ContentRow, DiscoveredRelease, PressRelease, ReleaseStub};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Release not found: {0}")]
    ReleaseNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for press-release storage backends
///
/// All operations are idempotent single-row statements that commit
/// immediately, so an interrupted run never loses committed rows and
/// re-running any phase is safe.
pub trait Store {
    // ===== List phase =====

    /// Inserts a discovered release keyed by its external id
    ///
    /// A no-op when a row with that id already exists: the stored url,
    /// title, date, and content are left untouched.
    ///
    /// # Returns
    ///
    /// Whether a new row was inserted
    fn insert_discovered(&mut self, release: &DiscoveredRelease) -> StorageResult<bool>;

    // ===== Backfill phase =====

    /// Returns up to `limit` rows with NULL content and id greater than
    /// `after_id`, in ascending id order
    ///
    /// Selection is always by the missing-content predicate plus a keyset
    /// cursor, never by offset: completing a row must not shift what the
    /// next pull returns, and a row that failed this run is skipped until
    /// the next invocation.
    fn list_missing_content(&self, limit: u32, after_id: i64) -> StorageResult<Vec<ReleaseStub>>;

    /// Sets the content for exactly one row
    ///
    /// Guarded by `content IS NULL`: content only ever transitions from
    /// NULL to non-NULL and is never overwritten. No-op for absent rows.
    ///
    /// # Returns
    ///
    /// Whether a row was updated
    fn set_content(&mut self, id: i64, content: &str) -> StorageResult<bool>;

    // ===== Queries =====

    /// Gets a single release by id
    fn get_release(&self, id: i64) -> StorageResult<Option<PressRelease>>;

    /// Returns all releases in ascending id order (CSV export projection)
    fn list_all(&self) -> StorageResult<Vec<PressRelease>>;

    /// Counts all stored releases
    fn count_total(&self) -> StorageResult<u64>;

    /// Counts releases whose content is still NULL
    fn count_missing_content(&self) -> StorageResult<u64>;

    // ===== Maintenance collaborators =====

    /// Returns id and content for every row with non-NULL content,
    /// in ascending id order
    fn list_with_content(&self) -> StorageResult<Vec<ContentRow>>;

    /// Adds the `issuer` column if it does not exist yet
    fn add_issuer_column(&mut self) -> StorageResult<()>;

    /// Stores the extracted issuer and the stripped content for one row
    fn set_issuer_and_content(
        &mut self,
        id: i64,
        issuer: &str,
        content: &str,
    ) -> StorageResult<()>;
}
