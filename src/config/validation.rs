use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, SummarizerConfig, UserAgentConfig,
};
use crate::ConfigError;

/// Longest fixed post-navigation wait we accept (milliseconds)
const MAX_LOADING_WAIT_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_summarizer_config(&config.summarizer)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.retry_attempts < 1 || config.retry_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "retry-attempts must be between 1 and 10, got {}",
            config.retry_attempts
        )));
    }

    if config.retry_delay_min > config.retry_delay_max {
        return Err(ConfigError::Validation(format!(
            "retry-delay-min ({}ms) must not exceed retry-delay-max ({}ms)",
            config.retry_delay_min, config.retry_delay_max
        )));
    }

    for (name, value) in [
        ("request-timeout", config.request_timeout),
        ("connect-timeout", config.connect_timeout),
        ("navigation-timeout", config.navigation_timeout),
    ] {
        if value < 1 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1s, got {}s",
                name, value
            )));
        }
    }

    if let Some(wait) = config.loading_wait_time {
        if wait > MAX_LOADING_WAIT_MS {
            return Err(ConfigError::Validation(format!(
                "loading-wait-time must be <= {}ms, got {}ms",
                MAX_LOADING_WAIT_MS, wait
            )));
        }
    }

    Ok(())
}

/// Validates the user agent pool
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.pool.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent pool cannot be empty".to_string(),
        ));
    }

    if config.pool.iter().any(|ua| ua.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "user-agent pool cannot contain blank entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary-path cannot be empty".to_string(),
        ));
    }

    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "csv-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the summarizer endpoint
fn validate_summarizer_config(config: &SummarizerConfig) -> Result<(), ConfigError> {
    if let Some(endpoint) = &config.endpoint {
        let scheme = ::url::Url::parse(endpoint)
            .map(|url| url.scheme().to_string())
            .map_err(|e| {
                ConfigError::Validation(format!("invalid summarizer endpoint {}: {}", endpoint, e))
            })?;
        if scheme != "http" && scheme != "https" {
            return Err(ConfigError::Validation(format!(
                "summarizer endpoint must be http or https, got {}",
                endpoint
            )));
        }
    }

    if config.timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "summarizer timeout must be >= 1s, got {}s",
            config.timeout
        )));
    }

    Ok(())
}
