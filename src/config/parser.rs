use crate::config::types::PartialScrapeConfig;
use crate::config::validation::validate;
use crate::config::ScrapeConfig;
use crate::ConfigError;
use std::path::Path;

/// Loads configuration overrides from a TOML file, merges them over the
/// defaults, and validates the result.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use treescrape::config::load_config;
///
/// let config = load_config(Path::new("scrape.toml")).unwrap();
/// println!("Max depth: {}", config.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<ScrapeConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses TOML configuration content into a resolved, validated config.
pub fn parse_config(content: &str) -> Result<ScrapeConfig, ConfigError> {
    let partial: PartialScrapeConfig = toml::from_str(content)?;
    let config = ScrapeConfig::resolve(partial);
    validate(&config)?;
    Ok(config)
}
