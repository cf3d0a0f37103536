//! Crawl traversal and session entry point
//!
//! [`traverser`] drives the page scraper recursively across discovered
//! links; [`session`] merges caller configuration over the defaults,
//! validates it, and kicks off the traversal for the seed URL.

mod session;
mod traverser;

pub use session::{scrape, Scraper};
pub use traverser::{CrawlTraverser, LinkFilter};
