//! Treescrape: a recursive structured web scraper
//!
//! Given a seed URL, this crate renders each page through a browser-engine
//! capability, extracts structured text according to a set of CSS selectors,
//! follows same-domain hyperlinks up to a bounded depth, and assembles the
//! results into a tree mirroring the crawl.

pub mod config;
pub mod crawl;
pub mod engine;
pub mod extract;
pub mod output;
pub mod retry;
pub mod state;

use thiserror::Error;

/// Main error type for treescrape operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Extraction failed for field '{field}' (selectors: {selectors:?}): {source}")]
    Extraction {
        field: String,
        selectors: Vec<String>,
        source: EngineError,
    },

    #[error("Child page {url} failed: {source}")]
    ChildPage {
        url: String,
        source: Box<ScrapeError>,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("max_depth {requested} exceeds the ceiling of {ceiling}")]
    DepthLimit { requested: u32, ceiling: u32 },
}

/// Errors surfaced by the browser-engine capability
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Navigation to {url} timed out")]
    NavigationTimeout { url: String },

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Expected HTML for {url}, got {content_type}")]
    ContentType { url: String, content_type: String },

    #[error("Timed out waiting for selector '{selector}'")]
    SelectorTimeout { selector: String },

    #[error("Invalid selector '{selector}'")]
    SelectorParse { selector: String },

    #[error("Page handle is closed")]
    Closed,
}

/// Result type alias for treescrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for engine operations
pub type EngineResult<T> = std::result::Result<T, EngineError>;

// Re-export commonly used types
pub use config::{FieldSpec, PartialScrapeConfig, ScrapeConfig, SelectorSpec};
pub use crawl::{scrape, LinkFilter, Scraper};
pub use engine::{BrowserEngine, HttpEngine, MatchedElement, PageHandle};
pub use output::{ExtractedValue, PageResult};
