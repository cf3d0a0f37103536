//! Single-page scraping
//!
//! Orchestrates field extraction across all configured fields
//! concurrently for one page: N fields (and their selectors) are all
//! scraped from the same loaded page without re-navigation. Child
//! traversal stays sequential one level up; this fan-out is the
//! system's primary parallelism.

use crate::config::ScrapeConfig;
use crate::engine::{BrowserEngine, PageHandle};
use crate::output::{ExtractedValue, PageResult};
use crate::state::VisitedSet;
use crate::Result;
use chrono::Utc;
use futures::future::join_all;
use indexmap::IndexMap;
use std::collections::HashSet;

/// One page's result plus the outgoing links discovered on it.
#[derive(Debug)]
pub struct PageOutcome {
    pub result: PageResult,
    pub links: Vec<String>,
}

/// Scrapes a single page.
///
/// Returns the degenerate "Already visited" result when `url` was seen
/// earlier in this session, so cyclic links resolve instead of
/// erroring. Otherwise marks the URL visited before navigating, runs
/// every configured field concurrently, and collects outgoing links.
/// The page handle is released on every exit path.
pub async fn scrape_page<E: BrowserEngine>(
    engine: &E,
    url: &str,
    config: &ScrapeConfig,
    visited: &mut VisitedSet,
) -> Result<PageOutcome> {
    if !visited.insert(url) {
        tracing::debug!("skipping already visited URL: {}", url);
        return Ok(PageOutcome {
            result: PageResult::already_visited(url),
            links: Vec::new(),
        });
    }

    let mut page = engine.new_page().await?;
    let outcome = scrape_on_page(&mut page, url, config).await;

    if let Err(e) = page.close().await {
        tracing::warn!("failed to close page for {}: {}", url, e);
    }

    outcome
}

async fn scrape_on_page<P: PageHandle>(
    page: &mut P,
    url: &str,
    config: &ScrapeConfig,
) -> Result<PageOutcome> {
    tracing::info!("scraping {}", url);
    page.navigate(url, config.page_load_timeout).await?;
    let title = page.title().await?;

    // Fan-out: one task per field, all against the loaded page.
    // join_all returns results in input order, so the output map keeps
    // the configured field order regardless of completion order.
    let field_results = join_all(config.fields.iter().map(|field| {
        crate::extract::extract_field(&*page, field, config.selector_timeout, config.retry_count)
    }))
    .await;

    let mut data = IndexMap::new();
    for (field, result) in config.fields.iter().zip(field_results) {
        match result {
            Ok(value) => {
                data.insert(field.name.clone(), value);
            }
            Err(e) => {
                if config.break_when_failed {
                    return Err(e);
                }
                tracing::warn!("field '{}' failed after retries: {}", field.name, e);
                data.insert(field.name.clone(), ExtractedValue::empty());
            }
        }
    }

    let mut seen = HashSet::new();
    let mut links = page.link_hrefs().await?;
    links.retain(|link| link.starts_with("http") && seen.insert(link.clone()));

    Ok(PageOutcome {
        result: PageResult {
            url: url.to_string(),
            title,
            data,
            timestamp: Utc::now(),
            child_pages: None,
        },
        links,
    })
}
