//! Scrape session entry point
//!
//! A [`Scraper`] owns the engine and the resolved configuration for
//! one or more crawls. Configuration is validated at construction,
//! before any navigation; each `scrape` call gets a fresh visited-set.

use crate::config::{validate, PartialScrapeConfig, ScrapeConfig};
use crate::crawl::traverser::{CrawlTraverser, LinkFilter};
use crate::engine::{BrowserEngine, HttpEngine};
use crate::output::PageResult;
use crate::state::VisitedSet;
use crate::Result;

/// Scrape session over a browser engine.
pub struct Scraper<E: BrowserEngine> {
    engine: E,
    config: ScrapeConfig,
    link_filter: Option<Box<dyn LinkFilter>>,
}

impl<E: BrowserEngine> Scraper<E> {
    /// Creates a session with the default configuration.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            config: ScrapeConfig::default(),
            link_filter: None,
        }
    }

    /// Creates a session with caller overrides merged over the
    /// defaults field-by-field. Fails fast on invalid configuration,
    /// including a `max_depth` above the ceiling.
    pub fn with_config(engine: E, partial: PartialScrapeConfig) -> Result<Self> {
        let config = ScrapeConfig::resolve(partial);
        validate(&config)?;
        Ok(Self {
            engine,
            config,
            link_filter: None,
        })
    }

    /// Creates a session from an already-resolved configuration.
    pub fn from_config(engine: E, config: ScrapeConfig) -> Result<Self> {
        validate(&config)?;
        Ok(Self {
            engine,
            config,
            link_filter: None,
        })
    }

    /// Installs a per-crawl child-link filter, replacing the default
    /// same-host policy.
    pub fn link_filter(mut self, filter: impl LinkFilter + 'static) -> Self {
        self.link_filter = Some(Box::new(filter));
        self
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Crawls from the seed URL and returns the assembled result tree.
    ///
    /// Unrecovered errors propagate to the caller unchanged.
    pub async fn scrape(&self, url: &str) -> Result<PageResult> {
        let mut visited = VisitedSet::new();
        let traverser = CrawlTraverser::new(
            &self.engine,
            &self.config,
            self.link_filter.as_deref(),
        );
        let result = traverser.traverse(url.to_string(), 0, &mut visited).await?;
        tracing::info!("crawl of {} finished, {} URLs visited", url, visited.len());
        Ok(result)
    }
}

/// Scrapes `url` with the default HTTP engine.
///
/// # Example
///
/// ```no_run
/// use treescrape::config::{FieldSpec, PartialScrapeConfig};
///
/// # async fn example() -> treescrape::Result<()> {
/// let config = PartialScrapeConfig {
///     max_depth: Some(1),
///     fields: Some(vec![FieldSpec::new("title", "h1".into())]),
///     ..Default::default()
/// };
/// let result = treescrape::scrape("https://example.com/", config).await?;
/// println!("{}", result.to_json_pretty().unwrap());
/// # Ok(())
/// # }
/// ```
pub async fn scrape(url: &str, config: PartialScrapeConfig) -> Result<PageResult> {
    let engine = HttpEngine::new()?;
    Scraper::with_config(engine, config)?.scrape(url).await
}
