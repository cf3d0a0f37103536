//! Scraper configuration
//!
//! This module handles the defaulted configuration struct, the merge of
//! caller overrides over the defaults, TOML loading for the CLI, and
//! validation (including the absolute depth ceiling).
//!
//! # Example
//!
//! ```
//! use treescrape::config::{PartialScrapeConfig, ScrapeConfig};
//!
//! let config = ScrapeConfig::resolve(PartialScrapeConfig {
//!     max_depth: Some(2),
//!     ..Default::default()
//! });
//! assert_eq!(config.max_depth, 2);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    FieldSpec, PartialScrapeConfig, ScrapeConfig, SelectorSpec, MAX_DEPTH_CEILING,
};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
