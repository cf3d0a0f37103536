//! Extraction layer
//!
//! [`field`] pulls one field's deduplicated, hierarchy-filtered text
//! out of a loaded page through the retry executor; [`page`] fans that
//! out concurrently across all configured fields for a single page and
//! collects outgoing links.

pub mod field;
pub mod page;

pub use field::extract_field;
pub use page::{scrape_page, PageOutcome};

/// Trims and collapses runs of whitespace into single spaces.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
