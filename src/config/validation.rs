use crate::config::types::Config;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site(config)?;
    validate_fetch(config)?;
    validate_backfill(config)?;
    validate_output(config)?;
    Ok(())
}

/// Validates the upstream site configuration
fn validate_site(config: &Config) -> Result<(), ConfigError> {
    if config.site.base_url.is_empty() {
        return Err(ConfigError::Validation(
            "site.base-url cannot be empty".to_string(),
        ));
    }

    let parsed = Url::parse(&config.site.base_url)
        .map_err(|e| ConfigError::Validation(format!("Invalid site.base-url: {}", e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "site.base-url must be http(s), got '{}'",
            parsed.scheme()
        )));
    }

    Ok(())
}

/// Validates fetch behavior configuration
fn validate_fetch(config: &Config) -> Result<(), ConfigError> {
    if config.fetch.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "fetch.max-attempts must be >= 1, got {}",
            config.fetch.max_attempts
        )));
    }

    if config.fetch.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "fetch.timeout-secs must be >= 1, got {}",
            config.fetch.timeout_secs
        )));
    }

    Ok(())
}

/// Validates backfill configuration
fn validate_backfill(config: &Config) -> Result<(), ConfigError> {
    if config.backfill.batch_size < 1 {
        return Err(ConfigError::Validation(format!(
            "backfill.batch-size must be >= 1, got {}",
            config.backfill.batch_size
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output(config: &Config) -> Result<(), ConfigError> {
    if config.output.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "output.database-path cannot be empty".to_string(),
        ));
    }

    if config.output.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "output.csv-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let mut config = Config::default();
        config.site.base_url = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_non_http_base_url_rejected() {
        let mut config = Config::default();
        config.site.base_url = "ftp://press.example.it".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = Config::default();
        config.fetch.max_attempts = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut config = Config::default();
        config.backfill.batch_size = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_database_path_rejected() {
        let mut config = Config::default();
        config.output.database_path = String::new();
        assert!(validate(&config).is_err());
    }
}
