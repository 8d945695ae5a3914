//! Maintenance collaborators over the persisted store
//!
//! Thin consumers of the core's store: a data-quality audit of stored
//! content and the one-time issuer-prefix migration. Neither fetches
//! anything from the network.

mod audit;
mod issuer;

pub use audit::{run_audit, AuditReport};
pub use issuer::{match_issuer, run_issuer_migration, IssuerMatch, MigrationSummary};
