//! Browser-engine capability
//!
//! The scraping core does not fetch or render pages itself; it calls
//! into an engine through the [`BrowserEngine`] and [`PageHandle`]
//! traits. The default [`HttpEngine`] answers queries against a static
//! HTML snapshot fetched over HTTP; a real rendering backend can
//! implement the same traits.

mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::{HttpEngine, HttpPage};

use crate::EngineResult;
use async_trait::async_trait;
use std::time::Duration;

/// One element matched by a selector query.
///
/// Ancestry is carried as per-snapshot node ids rather than DOM
/// handles, so the extractor can do hierarchy-aware deduplication
/// without holding engine state across awaits. Ids are only meaningful
/// within the result set of a single [`PageHandle::query_all`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedElement {
    /// Snapshot-local node id of this element
    pub id: u64,

    /// Node ids of every ancestor of this element, nearest first
    pub ancestor_ids: Vec<u64>,

    /// Raw text content; the extractor trims and collapses whitespace
    pub text: String,
}

/// A source of page handles.
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    type Page: PageHandle;

    /// Opens a fresh page handle.
    async fn new_page(&self) -> EngineResult<Self::Page>;
}

/// One in-flight page: exclusive to a single page scrape and released
/// before the next page begins.
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Navigates to `url`, waiting for the load to settle (network-idle
    /// where the backend supports it) within `timeout`.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> EngineResult<()>;

    /// The loaded page's title.
    async fn title(&self) -> EngineResult<String>;

    /// Waits up to `timeout` for at least one element matching
    /// `selector`; fails with `SelectorTimeout` otherwise.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> EngineResult<()>;

    /// All elements currently matching `selector`.
    async fn query_all(&self, selector: &str) -> EngineResult<Vec<MatchedElement>>;

    /// Absolute http(s) hrefs of every `<a>` element on the page,
    /// deduplicated by exact string equality.
    async fn link_hrefs(&self) -> EngineResult<Vec<String>>;

    /// Releases the page's resources.
    async fn close(self) -> EngineResult<()>;
}
