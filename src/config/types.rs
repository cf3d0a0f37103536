use serde::Deserialize;
use std::time::Duration;

/// Hard ceiling on `max_depth`; exceeding it is a configuration error.
pub const MAX_DEPTH_CEILING: u32 = 10;

/// Resolved scraper configuration.
///
/// Built by merging a [`PartialScrapeConfig`] over the defaults
/// field-by-field; caller values win per-field, never whole-object.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// How many link levels to follow below the seed page (0 = seed only)
    pub max_depth: u32,

    /// Output fields to extract, in the order they should appear in results
    pub fields: Vec<FieldSpec>,

    /// Whether the CLI should install a console logging subscriber
    pub with_console: bool,

    /// When true, the first failed field or child page aborts the whole crawl
    pub break_when_failed: bool,

    /// Attempts per field extraction (including the first)
    pub retry_count: u32,

    /// How long to wait for a selector to match on a page
    pub selector_timeout: Duration,

    /// How long to wait for page navigation to settle
    pub page_load_timeout: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_depth: 0,
            fields: Vec::new(),
            with_console: false,
            break_when_failed: false,
            retry_count: 3,
            selector_timeout: Duration::from_secs(5),
            page_load_timeout: Duration::from_secs(30),
        }
    }
}

impl ScrapeConfig {
    /// Merges caller-supplied overrides over the defaults, field-by-field.
    pub fn resolve(partial: PartialScrapeConfig) -> Self {
        let defaults = Self::default();
        Self {
            max_depth: partial.max_depth.unwrap_or(defaults.max_depth),
            fields: partial.fields.unwrap_or(defaults.fields),
            with_console: partial.with_console.unwrap_or(defaults.with_console),
            break_when_failed: partial
                .break_when_failed
                .unwrap_or(defaults.break_when_failed),
            retry_count: partial.retry_count.unwrap_or(defaults.retry_count),
            selector_timeout: partial
                .selector_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.selector_timeout),
            page_load_timeout: partial
                .page_load_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.page_load_timeout),
        }
    }
}

/// Caller-supplied configuration overrides.
///
/// Every field is optional; unset fields fall back to the defaults
/// in [`ScrapeConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialScrapeConfig {
    #[serde(rename = "max-depth")]
    pub max_depth: Option<u32>,

    /// `[[fields]]` array-of-tables; order is preserved in the output
    pub fields: Option<Vec<FieldSpec>>,

    #[serde(rename = "with-console")]
    pub with_console: Option<bool>,

    #[serde(rename = "break-when-failed")]
    pub break_when_failed: Option<bool>,

    #[serde(rename = "retry-count")]
    pub retry_count: Option<u32>,

    #[serde(rename = "selector-timeout-ms")]
    pub selector_timeout_ms: Option<u64>,

    #[serde(rename = "page-load-timeout-ms")]
    pub page_load_timeout_ms: Option<u64>,
}

/// One logical output field mapped to one or more CSS selectors.
///
/// The selectors for one field are evaluated as a union, with
/// cross-selector deduplication of the extracted values.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
    /// Output key for this field
    pub name: String,

    /// One selector or a list of selectors
    pub selectors: SelectorSpec,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, selectors: SelectorSpec) -> Self {
        Self {
            name: name.into(),
            selectors,
        }
    }
}

/// A single selector or a list of selectors for one field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SelectorSpec {
    One(String),
    Many(Vec<String>),
}

impl SelectorSpec {
    /// Normalizes into a slice of selector strings.
    pub fn as_slice(&self) -> &[String] {
        match self {
            SelectorSpec::One(s) => std::slice::from_ref(s),
            SelectorSpec::Many(v) => v.as_slice(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SelectorSpec::One(s) => s.is_empty(),
            SelectorSpec::Many(v) => v.is_empty(),
        }
    }
}

impl From<&str> for SelectorSpec {
    fn from(s: &str) -> Self {
        SelectorSpec::One(s.to_string())
    }
}

impl From<Vec<&str>> for SelectorSpec {
    fn from(v: Vec<&str>) -> Self {
        SelectorSpec::Many(v.into_iter().map(String::from).collect())
    }
}
