//! Configuration module for the harvester
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every setting has a default, so the config file is optional.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BackfillConfig, Config, CrawlConfig, FetchConfig, OutputConfig, SiteConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default};
