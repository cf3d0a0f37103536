//! Result tree and its JSON shape
//!
//! One [`PageResult`] per scraped page; children mirror the crawl tree.
//! Serialization rules observable at the output boundary:
//! - keys are camelCase
//! - the `childPages` key is omitted entirely when a page has no
//!   successful children (never an empty array)
//! - a field with exactly one distinct extracted value serializes as a
//!   bare string, anything else as an array

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Title used for the degenerate result returned when a URL was
/// already visited earlier in the same crawl.
pub const ALREADY_VISITED_TITLE: &str = "Already visited";

/// The extracted value of one field after deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractedValue {
    /// Exactly one distinct value survived
    Single(String),
    /// Zero or two-plus distinct values
    Many(Vec<String>),
}

impl ExtractedValue {
    /// Collapses a deduplicated value list: one value becomes a scalar,
    /// anything else stays a sequence.
    pub fn from_values(mut values: Vec<String>) -> Self {
        if values.len() == 1 {
            ExtractedValue::Single(values.remove(0))
        } else {
            ExtractedValue::Many(values)
        }
    }

    /// Placeholder recorded for a field that failed after retries.
    pub fn empty() -> Self {
        ExtractedValue::Single(String::new())
    }
}

/// The scrape result for one page.
///
/// Owned by the traversal step that produced it; immutable once
/// returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub url: String,

    pub title: String,

    /// field name -> extracted value, in configured field order
    pub data: IndexMap<String, ExtractedValue>,

    pub timestamp: DateTime<Utc>,

    /// Ordered results of successfully scraped child pages; `None`
    /// both when depth-bounded and when no child succeeded
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub child_pages: Option<Vec<PageResult>>,
}

impl PageResult {
    /// Builds the degenerate result for a URL seen earlier in this crawl.
    pub fn already_visited(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: ALREADY_VISITED_TITLE.to_string(),
            data: IndexMap::new(),
            timestamp: Utc::now(),
            child_pages: None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
