//! Static-HTML engine over reqwest + scraper
//!
//! Fetches a page once and answers selector queries against the parsed
//! snapshot. There is no script execution; a selector that is absent
//! from the snapshot will never appear, so `wait_for_selector` reports
//! a timeout immediately instead of polling.

use crate::engine::{BrowserEngine, MatchedElement, PageHandle};
use crate::{EngineError, EngineResult};
use async_trait::async_trait;
use ego_tree::NodeId;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Browser engine backed by plain HTTP fetches of static HTML.
#[derive(Debug, Clone)]
pub struct HttpEngine {
    client: Client,
}

impl HttpEngine {
    /// Creates an engine with a default HTTP client.
    pub fn new() -> EngineResult<Self> {
        Ok(Self {
            client: build_client()?,
        })
    }

    /// Creates an engine around an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn build_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("treescrape/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

#[async_trait]
impl BrowserEngine for HttpEngine {
    type Page = HttpPage;

    async fn new_page(&self) -> EngineResult<HttpPage> {
        Ok(HttpPage {
            client: self.client.clone(),
            doc: None,
        })
    }
}

/// Fetched page snapshot.
#[derive(Debug)]
struct Document {
    final_url: Url,
    title: String,
    body: String,
}

/// Page handle over a single fetched HTML document.
#[derive(Debug)]
pub struct HttpPage {
    client: Client,
    doc: Option<Document>,
}

impl HttpPage {
    fn doc(&self) -> EngineResult<&Document> {
        self.doc.as_ref().ok_or(EngineError::Closed)
    }
}

#[async_trait]
impl PageHandle for HttpPage {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> EngineResult<()> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_send_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Navigation {
                url: url.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        // Servers that omit the header get the benefit of the doubt
        if !content_type.is_empty() && !content_type.contains("text/html") {
            return Err(EngineError::ContentType {
                url: url.to_string(),
                content_type,
            });
        }

        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| classify_send_error(url, e))?;

        let title = extract_title(&body);

        self.doc = Some(Document {
            final_url,
            title,
            body,
        });
        Ok(())
    }

    async fn title(&self) -> EngineResult<String> {
        Ok(self.doc()?.title.clone())
    }

    async fn wait_for_selector(&self, selector: &str, _timeout: Duration) -> EngineResult<()> {
        // The snapshot never changes, so absent means timed out.
        if self.query_all(selector).await?.is_empty() {
            return Err(EngineError::SelectorTimeout {
                selector: selector.to_string(),
            });
        }
        Ok(())
    }

    async fn query_all(&self, selector: &str) -> EngineResult<Vec<MatchedElement>> {
        let doc = self.doc()?;
        let parsed = Selector::parse(selector).map_err(|_| EngineError::SelectorParse {
            selector: selector.to_string(),
        })?;

        let html = Html::parse_document(&doc.body);
        let mut ids = SnapshotIds::default();
        let mut matches = Vec::new();

        for element in html.select(&parsed) {
            let id = ids.assign(element.id());
            let ancestor_ids = element.ancestors().map(|node| ids.assign(node.id())).collect();
            matches.push(MatchedElement {
                id,
                ancestor_ids,
                text: element.text().collect(),
            });
        }

        Ok(matches)
    }

    async fn link_hrefs(&self) -> EngineResult<Vec<String>> {
        let doc = self.doc()?;
        let anchor = Selector::parse("a[href]").map_err(|_| EngineError::SelectorParse {
            selector: "a[href]".to_string(),
        })?;

        let html = Html::parse_document(&doc.body);
        let mut seen = std::collections::HashSet::new();
        let mut links = Vec::new();

        for element in html.select(&anchor) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute) = resolve_link(href, &doc.final_url) {
                    if seen.insert(absolute.clone()) {
                        links.push(absolute);
                    }
                }
            }
        }

        Ok(links)
    }

    async fn close(self) -> EngineResult<()> {
        Ok(())
    }
}

/// Assigns dense snapshot-local ids to ego-tree node ids.
#[derive(Default)]
struct SnapshotIds {
    ids: HashMap<NodeId, u64>,
    next: u64,
}

impl SnapshotIds {
    fn assign(&mut self, node: NodeId) -> u64 {
        *self.ids.entry(node).or_insert_with(|| {
            let id = self.next;
            self.next += 1;
            id
        })
    }
}

fn classify_send_error(url: &str, e: reqwest::Error) -> EngineError {
    if e.is_timeout() {
        EngineError::NavigationTimeout {
            url: url.to_string(),
        }
    } else if e.is_connect() {
        EngineError::Navigation {
            url: url.to_string(),
            message: "connection failed".to_string(),
        }
    } else {
        EngineError::Http(e)
    }
}

fn extract_title(body: &str) -> String {
    let html = Html::parse_document(body);
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };
    html.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Resolves a link href against the page URL and validates it.
///
/// Returns None for hrefs that should never be followed: javascript:,
/// mailto:, tel:, data: schemes, fragment-only anchors, and anything
/// that does not resolve to http(s).
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute.to_string())
        }
        _ => None,
    }
}
