//! Session-scoped crawl state
//!
//! The only state shared across the recursive traversal is the
//! visited-set: one per scrape session, created at session start and
//! discarded at session end.

mod visited;

pub use visited::VisitedSet;
