//! CSV export
//!
//! A read-only projection of the store, not authoritative storage: one
//! `url,title,date` row per discovered release, id-ascending.

use crate::storage::Store;
use crate::Result;
use std::io::Write;
use std::path::Path;

/// Writes all releases to a CSV file at `path`
///
/// # Returns
///
/// The number of data rows written (excluding the header)
pub fn export_csv<S: Store>(store: &S, path: &Path) -> Result<u64> {
    let releases = store.list_all()?;

    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);

    writeln!(writer, "url,title,date")?;
    for release in &releases {
        writeln!(
            writer,
            "{},{},{}",
            csv_field(&release.url),
            csv_field(&release.title),
            csv_field(release.date.as_deref().unwrap_or(""))
        )?;
    }
    writer.flush()?;

    tracing::info!("Exported {} releases to {}", releases.len(), path.display());
    Ok(releases.len() as u64)
}

/// Quotes a field per RFC 4180 when it needs quoting
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DiscoveredRelease, SqliteStore, Store};
    use tempfile::tempdir;

    #[test]
    fn test_csv_field_plain() {
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn test_csv_field_quoted() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        store
            .insert_discovered(&DiscoveredRelease {
                id: 100,
                url: "https://press.example.it/comunicato/100".to_string(),
                title: "Council, budget approved".to_string(),
                date: Some("2024-01-01".to_string()),
            })
            .unwrap();
        store
            .insert_discovered(&DiscoveredRelease {
                id: 101,
                url: "https://press.example.it/comunicato/101".to_string(),
                title: "B".to_string(),
                date: None,
            })
            .unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("releases.csv");
        let written = export_csv(&store, &path).unwrap();
        assert_eq!(written, 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "url,title,date");
        assert_eq!(
            lines[1],
            "https://press.example.it/comunicato/100,\"Council, budget approved\",2024-01-01"
        );
        assert_eq!(lines[2], "https://press.example.it/comunicato/101,B,");
    }
}
