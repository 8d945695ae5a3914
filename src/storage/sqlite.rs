//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Store trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{StorageResult, Store};
use crate::storage::{ContentRow, DiscoveredRelease, PressRelease, ReleaseStub};
use crate::HarvestError;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
///
/// Runs in autocommit mode: every mutation is a single-row statement that
/// commits before the call returns, so interruption between calls never
/// loses committed rows.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Creates a new SqliteStore instance
    ///
    /// Opens (or creates) the database file and ensures the schema exists.
    pub fn new(path: &Path) -> Result<Self, HarvestError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self, HarvestError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn row_to_release(row: &rusqlite::Row<'_>) -> rusqlite::Result<PressRelease> {
        Ok(PressRelease {
            id: row.get(0)?,
            url: row.get(1)?,
            title: row.get(2)?,
            date: row.get(3)?,
            content: row.get(4)?,
        })
    }
}

impl Store for SqliteStore {
    fn insert_discovered(&mut self, release: &DiscoveredRelease) -> StorageResult<bool> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO press_releases (id, url, title, date, content)
             VALUES (?1, ?2, ?3, ?4, NULL)",
            params![release.id, release.url, release.title, release.date],
        )?;
        Ok(changed > 0)
    }

    fn list_missing_content(&self, limit: u32, after_id: i64) -> StorageResult<Vec<ReleaseStub>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, url FROM press_releases
             WHERE content IS NULL AND id > ?1
             ORDER BY id ASC LIMIT ?2",
        )?;

        let stubs = stmt
            .query_map(params![after_id, limit], |row| {
                Ok(ReleaseStub {
                    id: row.get(0)?,
                    url: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(stubs)
    }

    fn set_content(&mut self, id: i64, content: &str) -> StorageResult<bool> {
        // The IS NULL guard keeps content monotonic: once set it can never
        // be overwritten by a later call.
        let changed = self.conn.execute(
            "UPDATE press_releases SET content = ?1 WHERE id = ?2 AND content IS NULL",
            params![content, id],
        )?;
        Ok(changed > 0)
    }

    fn get_release(&self, id: i64) -> StorageResult<Option<PressRelease>> {
        let release = self
            .conn
            .query_row(
                "SELECT id, url, title, date, content FROM press_releases WHERE id = ?1",
                params![id],
                Self::row_to_release,
            )
            .optional()?;

        Ok(release)
    }

    fn list_all(&self) -> StorageResult<Vec<PressRelease>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, url, title, date, content FROM press_releases ORDER BY id ASC",
        )?;

        let releases = stmt
            .query_map([], Self::row_to_release)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(releases)
    }

    fn count_total(&self) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM press_releases", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_missing_content(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM press_releases WHERE content IS NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn list_with_content(&self) -> StorageResult<Vec<ContentRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, content FROM press_releases WHERE content IS NOT NULL ORDER BY id ASC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ContentRow {
                    id: row.get(0)?,
                    content: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn add_issuer_column(&mut self) -> StorageResult<()> {
        let exists: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pragma_table_info('press_releases') WHERE name = 'issuer'",
            [],
            |row| row.get(0),
        )?;

        if exists == 0 {
            self.conn
                .execute("ALTER TABLE press_releases ADD COLUMN issuer TEXT", [])?;
        }

        Ok(())
    }

    fn set_issuer_and_content(
        &mut self,
        id: i64,
        issuer: &str,
        content: &str,
    ) -> StorageResult<()> {
        self.conn.execute(
            "UPDATE press_releases SET issuer = ?1, content = ?2 WHERE id = ?3",
            params![issuer, content, id],
        )?;
        Ok(())
    }
}
