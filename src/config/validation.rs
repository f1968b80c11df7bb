use crate::config::types::{Config, CrawlerConfig, EndpointsConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_endpoints_config(&config.endpoints)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.upper_bound_page < 1 {
        return Err(ConfigError::Validation(
            "upper_bound_page must be >= 1".to_string(),
        ));
    }

    // Pacing is a fixed non-adaptive delay; anything above 10s is almost
    // certainly a units mistake in the config file.
    if config.request_delay_ms > 10_000 {
        return Err(ConfigError::Validation(format!(
            "request_delay_ms must be <= 10000ms, got {}ms",
            config.request_delay_ms
        )));
    }

    if config.sweep_window < 1 {
        return Err(ConfigError::Validation(
            "sweep_window must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates external endpoint URLs
fn validate_endpoints_config(config: &EndpointsConfig) -> Result<(), ConfigError> {
    validate_http_url("render-base-url", &config.render_base_url)?;
    validate_http_url("catalog-base-url", &config.catalog_base_url)?;
    validate_http_url("analyzer-base-url", &config.analyzer_base_url)?;
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that a string is a well-formed http(s) URL
fn validate_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", key, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https scheme, got '{}'",
            key,
            url.scheme()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            crawler: CrawlerConfig::default(),
            endpoints: EndpointsConfig {
                render_base_url: "http://render:8050/render.html".to_string(),
                catalog_base_url: "https://catalog.example/web/search/song/".to_string(),
                analyzer_base_url: "http://analyzer:9200".to_string(),
            },
            output: OutputConfig {
                database_path: "./songweir.db".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_zero_upper_bound_rejected() {
        let mut config = valid_config();
        config.crawler.upper_bound_page = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_oversized_delay_rejected() {
        let mut config = valid_config();
        config.crawler.request_delay_ms = 60_000;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_sweep_window_rejected() {
        let mut config = valid_config();
        config.crawler.sweep_window = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_malformed_endpoint_rejected() {
        let mut config = valid_config();
        config.endpoints.render_base_url = "not a url".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidUrl(_)
        ));
    }

    #[test]
    fn test_non_http_endpoint_rejected() {
        let mut config = valid_config();
        config.endpoints.analyzer_base_url = "ftp://analyzer:9200".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_database_path_rejected() {
        let mut config = valid_config();
        config.output.database_path = String::new();
        assert!(validate(&config).is_err());
    }
}
