use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};
use crate::refine::SimplifyRules;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_site_config(&config.site)?;
    validate_output_config(&config.output)?;
    validate_simplify_rules(&config.simplified)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let start = Url::parse(&config.start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", config.start_url, e))
    })?;

    if start.scheme() != "http" && start.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Start URL '{}' must use http or https",
            config.start_url
        )));
    }

    if start.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' has no host",
            config.start_url
        )));
    }

    if config.workers < 1 || config.workers > 64 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 64, got {}",
            config.workers
        )));
    }

    if config.request_delay > 60_000 {
        return Err(ConfigError::Validation(format!(
            "request_delay must be <= 60000ms, got {}ms",
            config.request_delay
        )));
    }

    if config.request_timeout < 1 || config.request_timeout > 300 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be between 1 and 300 seconds, got {}",
            config.request_timeout
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates the eligibility tables
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    if let Some(ext) = config.skip_extensions.iter().find(|e| !e.starts_with('.')) {
        return Err(ConfigError::Validation(format!(
            "skip_extensions entries must start with '.', got '{}'",
            ext
        )));
    }

    if config.home_label.trim().is_empty() {
        return Err(ConfigError::Validation(
            "home_label cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("database_path", &config.database_path),
        ("module_path", &config.module_path),
        ("summary_path", &config.summary_path),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

fn validate_simplify_rules(rules: &SimplifyRules) -> Result<(), ConfigError> {
    if rules.min_cluster_size < 1 {
        return Err(ConfigError::Validation(
            "min_cluster_size must be >= 1".to_string(),
        ));
    }
    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlMode;

    fn crawler(start_url: &str) -> CrawlerConfig {
        CrawlerConfig {
            start_url: start_url.to_string(),
            max_depth: 6,
            request_delay: 500,
            workers: 4,
            mode: CrawlMode::Concurrent,
            request_timeout: 10,
        }
    }

    #[test]
    fn test_validate_start_url() {
        assert!(validate_crawler_config(&crawler("https://www.example.edu")).is_ok());
        assert!(validate_crawler_config(&crawler("http://127.0.0.1:8080/")).is_ok());

        assert!(validate_crawler_config(&crawler("ftp://example.edu")).is_err());
        assert!(validate_crawler_config(&crawler("not a url")).is_err());
    }

    #[test]
    fn test_validate_worker_bounds() {
        let mut config = crawler("https://www.example.edu");
        config.workers = 0;
        assert!(validate_crawler_config(&config).is_err());

        config.workers = 65;
        assert!(validate_crawler_config(&config).is_err());

        config.workers = 64;
        assert!(validate_crawler_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_delay_allowed() {
        let mut config = crawler("https://www.example.edu");
        config.request_delay = 0;
        assert!(validate_crawler_config(&config).is_ok());
    }

    #[test]
    fn test_validate_skip_extensions() {
        let mut site = SiteConfig::default();
        assert!(validate_site_config(&site).is_ok());

        site.skip_extensions.push("pdf".to_string());
        assert!(validate_site_config(&site).is_err());
    }

    #[test]
    fn test_validate_min_cluster_size() {
        let mut rules = SimplifyRules::default();
        assert!(validate_simplify_rules(&rules).is_ok());

        rules.min_cluster_size = 0;
        assert!(validate_simplify_rules(&rules).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("admin@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
        assert!(validate_email("a@b@c.com").is_err());
    }
}
