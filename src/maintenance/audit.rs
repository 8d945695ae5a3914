//! Content property audit
//!
//! Checks every backfilled row against the expected shape of upstream
//! content: a leading word (the issuing body), a space, then a
//! `DD/MM/YYYY` date. Rows that violate the property are reported, never
//! modified.

use crate::storage::Store;
use crate::Result;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

fn prefix_property_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\S+\s+\d{2}/\d{2}/\d{4}(\s|$)").expect("valid audit pattern"))
}

/// Result of an audit pass over all rows with content
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuditReport {
    /// Rows with non-NULL content that were checked
    pub rows_checked: u64,
    /// Ids whose content does not start with `<word> <DD/MM/YYYY>`
    pub violating_ids: Vec<i64>,
    /// Distinct first words seen across all checked rows
    pub starting_words: BTreeSet<String>,
}

/// Audits every row with content against the word-then-date prefix property
pub fn run_audit<S: Store>(store: &S) -> Result<AuditReport> {
    let mut report = AuditReport::default();

    for row in store.list_with_content()? {
        report.rows_checked += 1;

        if let Some(first_word) = row.content.split_whitespace().next() {
            report.starting_words.insert(first_word.to_string());
        }

        if !prefix_property_re().is_match(&row.content) {
            report.violating_ids.push(row.id);
        }
    }

    tracing::info!(
        "Audit: {} rows checked, {} violations, {} unique starting words",
        report.rows_checked,
        report.violating_ids.len(),
        report.starting_words.len()
    );

    Ok(report)
}
