//! In-memory engine for unit tests.

use crate::engine::{BrowserEngine, MatchedElement, PageHandle};
use crate::{EngineError, EngineResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted page content keyed by URL.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockPageSpec {
    pub title: String,
    /// selector -> matched elements
    pub matches: HashMap<String, Vec<MatchedElement>>,
    pub links: Vec<String>,
    /// selector -> number of wait calls that fail before one succeeds
    pub flaky_selectors: HashMap<String, u32>,
}

impl MockPageSpec {
    pub fn with_title(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn texts(mut self, selector: &str, texts: &[&str]) -> Self {
        let elements = texts
            .iter()
            .enumerate()
            .map(|(i, t)| MatchedElement {
                id: i as u64,
                ancestor_ids: Vec::new(),
                text: (*t).to_string(),
            })
            .collect();
        self.matches.insert(selector.to_string(), elements);
        self
    }

    pub fn elements(mut self, selector: &str, elements: Vec<MatchedElement>) -> Self {
        self.matches.insert(selector.to_string(), elements);
        self
    }

    pub fn links(mut self, links: &[&str]) -> Self {
        self.links = links.iter().map(|l| (*l).to_string()).collect();
        self
    }

    pub fn flaky(mut self, selector: &str, failures: u32) -> Self {
        self.flaky_selectors.insert(selector.to_string(), failures);
        self
    }
}

#[derive(Debug, Default)]
struct MockState {
    /// remaining wait failures per (url, selector)
    flaky_remaining: HashMap<(String, String), u32>,
    navigations: Vec<String>,
}

/// Engine serving scripted pages; records every navigation.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockEngine {
    pages: Arc<HashMap<String, MockPageSpec>>,
    state: Arc<Mutex<MockState>>,
}

impl MockEngine {
    pub fn new(pages: HashMap<String, MockPageSpec>) -> Self {
        let mut flaky_remaining = HashMap::new();
        for (url, spec) in &pages {
            for (selector, failures) in &spec.flaky_selectors {
                flaky_remaining.insert((url.clone(), selector.clone()), *failures);
            }
        }
        Self {
            pages: Arc::new(pages),
            state: Arc::new(Mutex::new(MockState {
                flaky_remaining,
                navigations: Vec::new(),
            })),
        }
    }

    pub fn single(url: &str, spec: MockPageSpec) -> Self {
        let mut pages = HashMap::new();
        pages.insert(url.to_string(), spec);
        Self::new(pages)
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }
}

#[async_trait]
impl BrowserEngine for MockEngine {
    type Page = MockPage;

    async fn new_page(&self) -> EngineResult<MockPage> {
        Ok(MockPage {
            engine: self.clone(),
            current: None,
        })
    }
}

#[derive(Debug)]
pub(crate) struct MockPage {
    engine: MockEngine,
    current: Option<String>,
}

impl MockPage {
    fn spec(&self) -> EngineResult<&MockPageSpec> {
        let url = self.current.as_ref().ok_or(EngineError::Closed)?;
        self.engine.pages.get(url).ok_or(EngineError::Closed)
    }
}

#[async_trait]
impl PageHandle for MockPage {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> EngineResult<()> {
        self.engine
            .state
            .lock()
            .unwrap()
            .navigations
            .push(url.to_string());

        if !self.engine.pages.contains_key(url) {
            return Err(EngineError::Navigation {
                url: url.to_string(),
                message: "no scripted page".to_string(),
            });
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn title(&self) -> EngineResult<String> {
        Ok(self.spec()?.title.clone())
    }

    async fn wait_for_selector(&self, selector: &str, _timeout: Duration) -> EngineResult<()> {
        let url = self.current.clone().ok_or(EngineError::Closed)?;

        {
            let mut state = self.engine.state.lock().unwrap();
            if let Some(remaining) = state
                .flaky_remaining
                .get_mut(&(url.clone(), selector.to_string()))
            {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(EngineError::SelectorTimeout {
                        selector: selector.to_string(),
                    });
                }
            }
        }

        let has_match = self
            .spec()?
            .matches
            .get(selector)
            .map(|els| !els.is_empty())
            .unwrap_or(false);

        if has_match {
            Ok(())
        } else {
            Err(EngineError::SelectorTimeout {
                selector: selector.to_string(),
            })
        }
    }

    async fn query_all(&self, selector: &str) -> EngineResult<Vec<MatchedElement>> {
        Ok(self.spec()?.matches.get(selector).cloned().unwrap_or_default())
    }

    async fn link_hrefs(&self) -> EngineResult<Vec<String>> {
        Ok(self.spec()?.links.clone())
    }

    async fn close(self) -> EngineResult<()> {
        Ok(())
    }
}
