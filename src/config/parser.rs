use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads, parses and validates the crawler configuration at `path`
///
/// # Returns
///
/// * `Ok(Config)` - Every key present was well-formed; absent keys take defaults
/// * `Err(ConfigError)` - The file is unreadable, not TOML, or fails validation
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    parse_config(&raw)
}

/// Parses and validates configuration text
pub fn parse_config(raw: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(raw)?;
    validate(&config)?;
    Ok(config)
}

/// SHA-256 of the configuration file, hex encoded
///
/// Stored with every run so results can be traced back to the settings that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(hash_content(&raw))
}

/// Loads the configuration together with the hash of the exact text that was parsed
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    let config = parse_config(&raw)?;
    Ok((config, hash_content(&raw)))
}

fn hash_content(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
