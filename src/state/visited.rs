use std::collections::HashSet;

/// URLs already fetched during one crawl session.
///
/// Shared by reference across the whole recursion (never copied) so
/// siblings and deeper descendants never revisit a URL seen anywhere
/// in the tree. Mutated only by the traversal layer, and a URL is
/// marked before navigation so a cyclic link can never race its own
/// fetch. Never reused across sessions.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` visited; returns `true` if it was not seen before.
    pub fn insert(&mut self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
