//! Field-level selector extraction
//!
//! One field maps to one or more selectors evaluated as a union. Each
//! retry attempt runs every selector concurrently with isolated
//! failures: a selector that times out contributes nothing while its
//! siblings still count. The attempt as a whole fails, and backoff
//! kicks in, only when every selector of the field failed.

use crate::config::FieldSpec;
use crate::engine::PageHandle;
use crate::extract::collapse_whitespace;
use crate::output::ExtractedValue;
use crate::retry::retry;
use crate::{EngineResult, Result, ScrapeError};
use futures::future::join_all;
use std::collections::HashSet;
use std::time::Duration;

/// Base delay for the retry backoff between field attempts.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Extracts one field's value from the current page.
///
/// On exhaustion of all retries the field fails with
/// [`ScrapeError::Extraction`]; the page scraper decides whether that
/// is fatal.
pub async fn extract_field<P: PageHandle>(
    page: &P,
    field: &FieldSpec,
    selector_timeout: Duration,
    retry_count: u32,
) -> Result<ExtractedValue> {
    let selectors = field.selectors.as_slice();

    let values = retry(retry_count, RETRY_BASE_DELAY, || {
        field_attempt(page, selectors, selector_timeout)
    })
    .await
    .map_err(|source| ScrapeError::Extraction {
        field: field.name.clone(),
        selectors: selectors.to_vec(),
        source,
    })?;

    Ok(ExtractedValue::from_values(values))
}

/// One attempt: all selectors in parallel, merged in selector order,
/// deduplicated by string value keeping first occurrence.
async fn field_attempt<P: PageHandle>(
    page: &P,
    selectors: &[String],
    selector_timeout: Duration,
) -> EngineResult<Vec<String>> {
    let results = join_all(
        selectors
            .iter()
            .map(|selector| selector_texts(page, selector, selector_timeout)),
    )
    .await;

    let all_failed = !results.is_empty() && results.iter().all(|r| r.is_err());

    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    let mut first_error = None;

    for (selector, result) in selectors.iter().zip(results) {
        match result {
            Ok(texts) => {
                for text in texts {
                    if seen.insert(text.clone()) {
                        merged.push(text);
                    }
                }
            }
            Err(e) => {
                tracing::debug!("selector '{}' failed: {}", selector, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if all_failed {
        if let Some(e) = first_error {
            return Err(e);
        }
    }

    Ok(merged)
}

/// Waits for and queries one selector, filters out elements whose
/// ancestor is also in the match set, and returns cleaned text.
///
/// If both a container and its contained child match, only the
/// outermost survives; the child's text is already inside the
/// parent's.
async fn selector_texts<P: PageHandle>(
    page: &P,
    selector: &str,
    selector_timeout: Duration,
) -> EngineResult<Vec<String>> {
    page.wait_for_selector(selector, selector_timeout).await?;
    let elements = page.query_all(selector).await?;

    let matched_ids: HashSet<u64> = elements.iter().map(|el| el.id).collect();

    let mut texts = Vec::new();
    for element in &elements {
        if element
            .ancestor_ids
            .iter()
            .any(|ancestor| matched_ids.contains(ancestor))
        {
            continue;
        }

        let text = collapse_whitespace(&element.text);
        if !text.is_empty() {
            texts.push(text);
        }
    }

    Ok(texts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectorSpec;
    use crate::engine::mock::{MockEngine, MockPageSpec};
    use crate::engine::{BrowserEngine, MatchedElement};

    const URL: &str = "https://example.com/";

    async fn page_for(spec: MockPageSpec) -> crate::engine::mock::MockPage {
        let engine = MockEngine::single(URL, spec);
        let mut page = engine.new_page().await.unwrap();
        page.navigate(URL, Duration::from_secs(1)).await.unwrap();
        page
    }

    fn field(name: &str, selectors: SelectorSpec) -> FieldSpec {
        FieldSpec::new(name, selectors)
    }

    #[tokio::test]
    async fn test_single_match_collapses_to_scalar() {
        let page = page_for(MockPageSpec::default().texts("h1", &["Heading"])).await;
        let value = extract_field(&page, &field("title", "h1".into()), Duration::from_secs(1), 1)
            .await
            .unwrap();
        assert_eq!(value, ExtractedValue::Single("Heading".to_string()));
    }

    #[tokio::test]
    async fn test_multiple_matches_stay_a_sequence() {
        let page = page_for(MockPageSpec::default().texts("h2", &["One", "Two", "Three"])).await;
        let value = extract_field(&page, &field("headings", "h2".into()), Duration::from_secs(1), 1)
            .await
            .unwrap();
        assert_eq!(
            value,
            ExtractedValue::Many(vec![
                "One".to_string(),
                "Two".to_string(),
                "Three".to_string()
            ])
        );
    }

    #[tokio::test]
    async fn test_hierarchy_dedup_keeps_outermost() {
        // Container (id 0) and its child (id 1) both match; only the
        // container's full text survives.
        let elements = vec![
            MatchedElement {
                id: 0,
                ancestor_ids: vec![100, 101],
                text: "outer inner".to_string(),
            },
            MatchedElement {
                id: 1,
                ancestor_ids: vec![0, 100, 101],
                text: "inner".to_string(),
            },
        ];
        let page = page_for(MockPageSpec::default().elements(".x", elements)).await;
        let value = extract_field(&page, &field("block", ".x".into()), Duration::from_secs(1), 1)
            .await
            .unwrap();
        assert_eq!(value, ExtractedValue::Single("outer inner".to_string()));
    }

    #[tokio::test]
    async fn test_cross_selector_value_dedup_preserves_order() {
        let spec = MockPageSpec::default()
            .texts("h1", &["Shared", "First-only"])
            .texts("h2", &["Shared", "Second-only"]);
        let page = page_for(spec).await;
        let value = extract_field(
            &page,
            &field("mixed", vec!["h1", "h2"].into()),
            Duration::from_secs(1),
            1,
        )
        .await
        .unwrap();
        assert_eq!(
            value,
            ExtractedValue::Many(vec![
                "Shared".to_string(),
                "First-only".to_string(),
                "Second-only".to_string()
            ])
        );
    }

    #[tokio::test]
    async fn test_failed_selector_contributes_empty_result() {
        // ".missing" never matches but "h1" does, so the field succeeds
        // without retrying.
        let spec = MockPageSpec::default().texts("h1", &["Heading"]);
        let page = page_for(spec).await;
        let value = extract_field(
            &page,
            &field("title", vec![".missing", "h1"].into()),
            Duration::from_secs(1),
            1,
        )
        .await
        .unwrap();
        assert_eq!(value, ExtractedValue::Single("Heading".to_string()));
    }

    #[tokio::test]
    async fn test_all_selectors_failing_exhausts_retries() {
        let page = page_for(MockPageSpec::default()).await;
        let err = extract_field(
            &page,
            &field("ghost", ".missing".into()),
            Duration::from_millis(10),
            1,
        )
        .await
        .unwrap_err();

        match err {
            ScrapeError::Extraction { field, selectors, .. } => {
                assert_eq!(field, "ghost");
                assert_eq!(selectors, vec![".missing".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_flaky_selector_recovers_through_retry() {
        // Wait fails twice, then the selector resolves.
        let spec = MockPageSpec::default()
            .texts("h1", &["Eventually"])
            .flaky("h1", 2);
        let page = page_for(spec).await;
        let value = extract_field(&page, &field("title", "h1".into()), Duration::from_secs(1), 3)
            .await
            .unwrap();
        assert_eq!(value, ExtractedValue::Single("Eventually".to_string()));
    }

    #[tokio::test]
    async fn test_whitespace_collapsed_and_empties_dropped() {
        let spec = MockPageSpec::default().texts("p", &["  spaced \n out  ", " \t "]);
        let page = page_for(spec).await;
        let value = extract_field(&page, &field("body", "p".into()), Duration::from_secs(1), 1)
            .await
            .unwrap();
        assert_eq!(value, ExtractedValue::Single("spaced out".to_string()));
    }
}
