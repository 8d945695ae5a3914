//! Database schema definitions
//!
//! This module contains the SQL schema for the press-release store.

/// SQL schema for the database
///
/// The `id` column is the externally assigned release identifier taken from
/// the `/comunicato/<digits>` URL segment, not an autoincrement rowid. The
/// `issuer` column is added later by the issuer migration, never here.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS press_releases (
    id INTEGER PRIMARY KEY,
    url TEXT NOT NULL,
    title TEXT NOT NULL,
    date TEXT,
    content TEXT
);

CREATE INDEX IF NOT EXISTS idx_press_releases_missing_content
    ON press_releases(id) WHERE content IS NULL;
"#;

/// Initializes the database schema
///
/// Safe to call on every startup; all statements are `IF NOT EXISTS`.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_initializes() {
        let conn = Connection::open_in_memory().unwrap();
        let result = initialize_schema(&conn);
        assert!(result.is_ok());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        // Initialize twice
        initialize_schema(&conn).unwrap();
        let result = initialize_schema(&conn);

        // Should succeed the second time too
        assert!(result.is_ok());
    }

    #[test]
    fn test_table_exists_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='press_releases'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
