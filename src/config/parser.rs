//! TOML loading for the crawler configuration
//!
//! A config file is read once. The same bytes are parsed and hashed, so the
//! hash stored with a run always matches the settings that run used.

use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Parses and validates configuration text
///
/// Sections left out of the text fall back to their defaults: the site
/// filters and the three view rule tables.
///
/// # Arguments
///
/// * `content` - TOML source
///
/// # Returns
///
/// * `Ok(Config)` - A configuration that passed validation
/// * `Err(ConfigError)` - The text is not valid TOML or fails validation
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads the crawler configuration from a TOML file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use campus_mapper::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Seed: {} (depth {})", config.crawler.start_url, config.crawler.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    parse_config(&std::fs::read_to_string(path)?)
}

/// Hex SHA-256 of a config file, stored on each run row
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    Ok(content_hash(&std::fs::read_to_string(path)?))
}

/// Loads a configuration together with the hash of the exact text parsed
///
/// # Returns
///
/// * `Ok((Config, String))` - The validated configuration and its hex hash
/// * `Err(ConfigError)` - The file could not be read, parsed or validated
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    tracing::debug!("Loaded configuration from {}", path.display());
    Ok((config, content_hash(&content)))
}

fn content_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
