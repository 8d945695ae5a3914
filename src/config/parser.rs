use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Loads a configuration from an optional path, falling back to defaults
///
/// Every setting has a sensible default for the upstream press office site,
/// so running without a config file is the common case.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(p) => load_config(p),
        None => {
            let config = Config::default();
            validate(&config)?;
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[site]
base-url = "https://press.example.it"

[fetch]
max-attempts = 5
retry-delay-ms = 100
timeout-secs = 20

[crawl]
page-delay-ms = 500

[backfill]
batch-size = 10
row-delay-ms = 250

[output]
database-path = "./test.db"
csv-path = "./test.csv"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.site.base_url, "https://press.example.it");
        assert_eq!(config.fetch.max_attempts, 5);
        assert_eq!(config.backfill.batch_size, 10);
        assert_eq!(config.output.database_path, "./test.db");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config_content = r#"
[output]
database-path = "./elsewhere.db"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.output.database_path, "./elsewhere.db");
        assert_eq!(config.fetch.max_attempts, 3);
        assert_eq!(config.site.base_url, "https://press.comune.fi.it");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[fetch]
max-attempts = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_default_config() {
        let config = load_config_or_default(None).unwrap();
        assert_eq!(config.backfill.batch_size, 5);
    }
}
