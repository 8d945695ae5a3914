//! Issuer-prefix migration
//!
//! One-time schema migration that derives the issuing body from each
//! row's content prefix, stores it in a new `issuer` column, and strips
//! the redundant `<issuer> <DD/MM/YYYY> ` prefix from the content.
//!
//! The prefix coupling to upstream formatting is brittle, so matching is
//! defensive: a row whose content does not carry a recognized issuer
//! followed by a well-formed date is reported and left untouched, never
//! mis-sliced.

use crate::storage::Store;
use crate::Result;
use regex::Regex;
use std::sync::OnceLock;

/// The closed set of issuer labels the upstream site uses
///
/// Ordered longest-first so a multi-word label can never lose to a
/// shorter prefix of itself.
const KNOWN_ISSUERS: &[&str] = &[
    "Notizie di servizio",
    "Consiglio",
    "Quartieri",
    "Sindaco",
    "Giunta",
    "Altro",
];

fn date_after_issuer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{2}/\d{2}/\d{4} ").expect("valid date prefix pattern"))
}

/// Outcome of matching a row's content against the known issuer prefixes
///
/// A tagged result rather than an error: "no recognized issuer" is an
/// expected per-row outcome the caller handles explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuerMatch {
    /// A recognized issuer and well-formed date prefix was found
    Found {
        /// The issuer label
        issuer: String,
        /// Content with the `<issuer> <DD/MM/YYYY> ` prefix stripped
        remainder: String,
    },
    /// No recognized issuer/date prefix; the row must be left intact
    NotFound,
}

/// Matches content against `<issuer> <DD/MM/YYYY> <body>`
pub fn match_issuer(content: &str) -> IssuerMatch {
    for issuer in KNOWN_ISSUERS {
        if let Some(rest) = content.strip_prefix(issuer) {
            let Some(rest) = rest.strip_prefix(' ') else {
                continue;
            };
            if date_after_issuer_re().is_match(rest) {
                // "DD/MM/YYYY " is 11 bytes
                return IssuerMatch::Found {
                    issuer: issuer.to_string(),
                    remainder: rest[11..].to_string(),
                };
            }
        }
    }
    IssuerMatch::NotFound
}

/// Totals reported after a migration pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationSummary {
    /// Rows whose issuer was extracted and content stripped
    pub rows_migrated: u64,
    /// Ids left intact because no issuer prefix matched
    pub skipped_ids: Vec<i64>,
}

/// Runs the issuer migration over every row with content
///
/// Adds the `issuer` column if absent, then processes each row once.
/// Already-migrated rows no longer carry the prefix, so a re-run reports
/// them as skipped and changes nothing.
pub fn run_issuer_migration<S: Store>(store: &mut S) -> Result<MigrationSummary> {
    store.add_issuer_column()?;

    let mut summary = MigrationSummary::default();

    for row in store.list_with_content()? {
        match match_issuer(&row.content) {
            IssuerMatch::Found { issuer, remainder } => {
                store.set_issuer_and_content(row.id, &issuer, &remainder)?;
                summary.rows_migrated += 1;
            }
            IssuerMatch::NotFound => {
                tracing::warn!("No recognized issuer prefix for id {}, leaving row intact", row.id);
                summary.skipped_ids.push(row.id);
            }
        }
    }

    tracing::info!(
        "Issuer migration: {} rows migrated, {} skipped",
        summary.rows_migrated,
        summary.skipped_ids.len()
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DiscoveredRelease, SqliteStore, Store};

    #[test]
    fn test_match_known_issuer() {
        let result = match_issuer("Giunta 01/02/2024 Budget approved today");
        assert_eq!(
            result,
            IssuerMatch::Found {
                issuer: "Giunta".to_string(),
                remainder: "Budget approved today".to_string(),
            }
        );
    }

    #[test]
    fn test_match_multiword_issuer() {
        let result = match_issuer("Notizie di servizio 15/06/2023 Road closures");
        assert_eq!(
            result,
            IssuerMatch::Found {
                issuer: "Notizie di servizio".to_string(),
                remainder: "Road closures".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_issuer_not_found() {
        assert_eq!(
            match_issuer("Prefettura 01/02/2024 Not one of ours"),
            IssuerMatch::NotFound
        );
    }

    #[test]
    fn test_malformed_date_not_found() {
        // A recognized issuer without a well-formed date must not be sliced
        assert_eq!(
            match_issuer("Giunta 1/2/2024 short date"),
            IssuerMatch::NotFound
        );
        assert_eq!(match_issuer("Giunta no date at all"), IssuerMatch::NotFound);
    }

    #[test]
    fn test_migration_strips_prefix_and_skips_unrecognized() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        for (id, content) in [
            (100, "Giunta 01/02/2024 Budget approved"),
            (101, "Mystery prefix 01/02/2024 untouched"),
        ] {
            store
                .insert_discovered(&DiscoveredRelease {
                    id,
                    url: format!("https://press.example.it/comunicato/{}", id),
                    title: "t".to_string(),
                    date: None,
                })
                .unwrap();
            store.set_content(id, content).unwrap();
        }

        let summary = run_issuer_migration(&mut store).unwrap();
        assert_eq!(summary.rows_migrated, 1);
        assert_eq!(summary.skipped_ids, vec![101]);

        let rows = store.list_with_content().unwrap();
        assert_eq!(rows[0].content, "Budget approved");
        assert_eq!(rows[1].content, "Mystery prefix 01/02/2024 untouched");
    }

    #[test]
    fn test_migration_rerun_is_non_destructive() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        store
            .insert_discovered(&DiscoveredRelease {
                id: 100,
                url: "https://press.example.it/comunicato/100".to_string(),
                title: "t".to_string(),
                date: None,
            })
            .unwrap();
        store.set_content(100, "Sindaco 02/03/2024 Opening remarks").unwrap();

        run_issuer_migration(&mut store).unwrap();
        let second = run_issuer_migration(&mut store).unwrap();

        // Prefix already stripped, so the re-run only reports it
        assert_eq!(second.rows_migrated, 0);
        assert_eq!(second.skipped_ids, vec![100]);
        assert_eq!(
            store.list_with_content().unwrap()[0].content,
            "Opening remarks"
        );
    }
}
