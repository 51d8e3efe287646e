//! In-memory paginated provider.

use super::{PageProvider, PaginatedResponse, ProviderError};
use crate::item::Item;
use async_trait::async_trait;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A [`PageProvider`] serving pages out of a fixed vector.
///
/// Searching uses fuzzy matching over the configured fields (every string
/// field when none are configured) and keeps the original item order, so
/// pages stay stable while the search term is unchanged.
///
/// A few knobs make it useful for exercising loader edge cases:
/// - [`with_visible_limit`](Self::with_visible_limit) stops reporting
///   `has_more` before `total_count` is reached.
/// - [`with_overlap`](Self::with_overlap) repeats the tail of the previous
///   page at the start of each page.
/// - [`fail_page`](Self::fail_page) makes a page fail until cleared.
///
/// # Examples
///
/// ```rust
/// use bubbletea_lazylist::item::Item;
/// use bubbletea_lazylist::source::{MemoryProvider, PageProvider};
/// use serde_json::json;
///
/// # let rt = tokio::runtime::Runtime::new().unwrap();
/// # rt.block_on(async {
/// let items: Vec<Item> = (1..=42).map(|n| json!({ "id": n }).into()).collect();
/// let provider = MemoryProvider::new(items);
///
/// let page = provider.load(3, 15, "").await.unwrap();
/// assert_eq!(page.data.len(), 12);
/// assert_eq!(page.total_count, 42);
/// assert!(!page.has_more);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemoryProvider {
    items: Vec<Item>,
    search_fields: Vec<String>,
    visible_limit: Option<usize>,
    overlap: usize,
    failures: Mutex<HashMap<usize, ProviderError>>,
    requests: AtomicUsize,
}

impl MemoryProvider {
    /// Creates a provider over `items`.
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    /// Restricts searching to the given fields.
    pub fn with_search_fields(mut self, fields: &[&str]) -> Self {
        self.search_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Reports `has_more = false` once `limit` items have been served.
    pub fn with_visible_limit(mut self, limit: usize) -> Self {
        self.visible_limit = Some(limit);
        self
    }

    /// Repeats the last `rows` items of the previous page on every later page.
    pub fn with_overlap(mut self, rows: usize) -> Self {
        self.overlap = rows;
        self
    }

    /// Makes every request for `page` fail with `error`.
    pub fn fail_page(&self, page: usize, error: ProviderError) {
        self.failures_mut().insert(page, error);
    }

    /// Removes all configured failures.
    pub fn clear_failures(&self) {
        self.failures_mut().clear();
    }

    /// Number of `load` calls received so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn failures_mut(&self) -> std::sync::MutexGuard<'_, HashMap<usize, ProviderError>> {
        // A poisoned map is still a valid map.
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn matches(&self, matcher: &SkimMatcherV2, item: &Item, search: &str) -> bool {
        let fuzzy = |value: &Value| {
            value
                .as_str()
                .is_some_and(|text| matcher.fuzzy_match(text, search).is_some())
        };
        if self.search_fields.is_empty() {
            item.record().values().any(fuzzy)
        } else {
            self.search_fields
                .iter()
                .filter_map(|field| item.get(field))
                .any(fuzzy)
        }
    }
}

#[async_trait]
impl PageProvider for MemoryProvider {
    async fn load(
        &self,
        page: usize,
        page_size: usize,
        search: &str,
    ) -> Result<PaginatedResponse, ProviderError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.failures_mut().get(&page).cloned() {
            return Err(error);
        }

        let search = search.trim();
        let matcher = SkimMatcherV2::default();
        let matching: Vec<&Item> = if search.is_empty() {
            self.items.iter().collect()
        } else {
            self.items
                .iter()
                .filter(|item| self.matches(&matcher, item, search))
                .collect()
        };

        let page = page.max(1);
        let page_size = page_size.max(1);
        let total_count = matching.len();
        let start = ((page - 1) * page_size).min(total_count);
        let end = (start + page_size).min(total_count);
        let from = if page > 1 {
            start.saturating_sub(self.overlap)
        } else {
            start
        };

        let data = matching[from..end].iter().map(|item| (*item).clone()).collect();
        let available = self.visible_limit.unwrap_or(total_count).min(total_count);

        Ok(PaginatedResponse {
            data,
            total_count,
            has_more: end < available,
            page,
            page_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn people() -> Vec<Item> {
        ["Ada Lovelace", "Alan Turing", "Grace Hopper", "Edsger Dijkstra"]
            .iter()
            .enumerate()
            .map(|(i, name)| json!({ "id": i + 1, "name": name, "team": "core" }).into())
            .collect()
    }

    #[tokio::test]
    async fn test_pages_and_has_more() {
        let items: Vec<Item> = (1..=42).map(|n| json!({ "id": n }).into()).collect();
        let provider = MemoryProvider::new(items);

        let first = provider.load(1, 15, "").await.unwrap();
        assert_eq!(first.data.len(), 15);
        assert!(first.has_more);

        let third = provider.load(3, 15, "").await.unwrap();
        assert_eq!(third.data.len(), 12);
        assert!(!third.has_more);
        assert_eq!(provider.requests(), 2);
    }

    #[tokio::test]
    async fn test_fuzzy_search_keeps_order() {
        let provider = MemoryProvider::new(people()).with_search_fields(&["name"]);
        let page = provider.load(1, 10, "a").await.unwrap();
        let names: Vec<_> = page.data.iter().filter_map(|i| i.get_str("name")).collect();
        assert_eq!(names, ["Ada Lovelace", "Alan Turing", "Grace Hopper", "Edsger Dijkstra"]);

        let page = provider.load(1, 10, "turing").await.unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.data[0].get_str("name"), Some("Alan Turing"));

        // "core" lives in a field that is not searched.
        let page = provider.load(1, 10, "core").await.unwrap();
        assert_eq!(page.total_count, 0);
    }

    #[tokio::test]
    async fn test_search_all_string_fields_by_default() {
        let provider = MemoryProvider::new(people());
        let page = provider.load(1, 10, "core").await.unwrap();
        assert_eq!(page.total_count, 4);
    }

    #[tokio::test]
    async fn test_visible_limit_ends_paging_early() {
        let items: Vec<Item> = (1..=30).map(|n| json!({ "id": n }).into()).collect();
        let provider = MemoryProvider::new(items).with_visible_limit(10);
        let page = provider.load(1, 10, "").await.unwrap();
        assert_eq!(page.total_count, 30);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_overlap_repeats_boundary_rows() {
        let items: Vec<Item> = (1..=6).map(|n| json!({ "id": n }).into()).collect();
        let provider = MemoryProvider::new(items).with_overlap(1);
        let second = provider.load(2, 3, "").await.unwrap();
        let ids: Vec<_> = second.data.iter().map(|i| i.get("id").cloned()).collect();
        assert_eq!(ids, vec![Some(json!(3)), Some(json!(4)), Some(json!(5)), Some(json!(6))]);
    }

    #[tokio::test]
    async fn test_configured_failures() {
        let provider = MemoryProvider::new(people());
        provider.fail_page(2, ProviderError::Network("timeout".into()));

        assert!(provider.load(1, 2, "").await.is_ok());
        assert_eq!(
            provider.load(2, 2, "").await,
            Err(ProviderError::Network("timeout".into()))
        );

        provider.clear_failures();
        assert!(provider.load(2, 2, "").await.is_ok());
    }
}
