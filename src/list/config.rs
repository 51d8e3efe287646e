//! Configuration for the list controller.
//!
//! [`ListConfig`] follows the builder style used elsewhere in the crate:
//! start from `ListConfig::default()` and chain `with_*` calls. Values that
//! would make the list misbehave are clamped when the list is built instead
//! of being rejected.

use crate::debounce::{DEFAULT_SEARCH_TIMEOUT, SCROLL_THROTTLE};
use crate::item::{Item, KeyExpr};
use crate::loader::DEFAULT_PAGE_SIZE;
use crate::preload::DEFAULT_PRELOAD_THRESHOLD;
use crate::selection::SelectionMode;
use log::warn;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Delay before re-checking the preload condition after a reload.
pub const PRELOAD_CHECK_DELAY: Duration = Duration::from_millis(100);

/// How further pages are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageLoadMode {
    /// Scrolling near the bottom fetches the next page.
    #[default]
    ScrollBottom,
    /// The host shows a "load more" control wired to `load_more`.
    NextButton,
    /// Only `load_more` fetches further pages.
    None,
}

/// Projection from an item to the text shown for it.
pub type DisplayFn = Arc<dyn Fn(&Item) -> String + Send + Sync>;

/// Settings for a [`Model`](super::Model).
///
/// Hosts are expected to set the display projection with
/// [`with_display`](Self::with_display) or
/// [`with_display_field`](Self::with_display_field). Without one, rows show
/// the item's key, which is rarely what a user should see.
#[derive(Clone)]
pub struct ListConfig {
    /// Items requested per page.
    pub page_size: usize,
    /// Percentage of content viewed before the next page is preloaded.
    pub preload_threshold: f64,
    /// Quiet period after typing before a search reloads the list.
    pub search_timeout: Duration,
    /// Minimum spacing between evaluated scroll events.
    pub scroll_throttle: Duration,
    /// How clicks select items.
    pub selection_mode: SelectionMode,
    /// Identity of an item.
    pub key_expr: KeyExpr,
    /// Whether items are partitioned into groups.
    pub grouped: bool,
    /// Field whose value names an item's group.
    pub group_by: String,
    /// How further pages are requested.
    pub page_load_mode: PageLoadMode,
    /// A disabled list ignores clicks.
    pub disabled: bool,
    /// Text shown when there are no items.
    pub no_data_text: String,
    /// Text shown while a full reload is in flight.
    pub loading_text: String,
    /// Text shown while a page load is in flight.
    pub page_loading_text: String,
    /// Placeholder shown on an empty search line.
    pub search_placeholder: String,
    /// View width in cells; longer rows are cut off.
    pub width: usize,
    display: Option<DisplayFn>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            preload_threshold: DEFAULT_PRELOAD_THRESHOLD,
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
            scroll_throttle: SCROLL_THROTTLE,
            selection_mode: SelectionMode::None,
            key_expr: KeyExpr::default(),
            grouped: true,
            group_by: "group".to_string(),
            page_load_mode: PageLoadMode::ScrollBottom,
            disabled: false,
            no_data_text: "No data".to_string(),
            loading_text: "Loading...".to_string(),
            page_loading_text: "Loading more...".to_string(),
            search_placeholder: "Search".to_string(),
            width: 80,
            display: None,
        }
    }
}

impl ListConfig {
    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the preload threshold percentage.
    pub fn with_preload_threshold(mut self, threshold: f64) -> Self {
        self.preload_threshold = threshold;
        self
    }

    /// Sets the search debounce period.
    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }

    /// Sets the scroll throttle interval.
    pub fn with_scroll_throttle(mut self, interval: Duration) -> Self {
        self.scroll_throttle = interval;
        self
    }

    /// Sets the selection mode.
    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    /// Sets the key extractor.
    pub fn with_key_expr(mut self, key_expr: impl Into<KeyExpr>) -> Self {
        self.key_expr = key_expr.into();
        self
    }

    /// Groups items by `field`.
    pub fn with_group_by(mut self, field: impl Into<String>) -> Self {
        self.grouped = true;
        self.group_by = field.into();
        self
    }

    /// Shows a flat list.
    pub fn ungrouped(mut self) -> Self {
        self.grouped = false;
        self
    }

    /// Sets how further pages are requested.
    pub fn with_page_load_mode(mut self, mode: PageLoadMode) -> Self {
        self.page_load_mode = mode;
        self
    }

    /// Disables or enables clicks.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Sets the text shown for each item.
    pub fn with_display<F>(mut self, display: F) -> Self
    where
        F: Fn(&Item) -> String + Send + Sync + 'static,
    {
        self.display = Some(Arc::new(display));
        self
    }

    /// Shows the string value of `field` for each item.
    pub fn with_display_field(self, field: impl Into<String>) -> Self {
        let field = field.into();
        self.with_display(move |item| match item.get(&field) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(value) => value.to_string(),
            None => String::new(),
        })
    }

    /// Sets the empty-list text.
    pub fn with_no_data_text(mut self, text: impl Into<String>) -> Self {
        self.no_data_text = text.into();
        self
    }

    /// Sets the page loading text.
    pub fn with_page_loading_text(mut self, text: impl Into<String>) -> Self {
        self.page_loading_text = text.into();
        self
    }

    /// Sets the view width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Text shown for `item`.
    ///
    /// Without a display projection this is the item's key.
    pub fn display(&self, item: &Item) -> String {
        match &self.display {
            Some(display) => display(item),
            None => self.key_expr.key_of(item).to_string(),
        }
    }

    /// Returns a copy with out-of-range values replaced by usable ones.
    pub(crate) fn normalized(mut self) -> Self {
        if self.page_size == 0 {
            warn!("page size 0 is invalid, using 1");
            self.page_size = 1;
        }
        if !(0.0..=100.0).contains(&self.preload_threshold) {
            let clamped = if self.preload_threshold.is_nan() {
                DEFAULT_PRELOAD_THRESHOLD
            } else {
                self.preload_threshold.clamp(0.0, 100.0)
            };
            warn!(
                "preload threshold {} is outside 0..=100, using {}",
                self.preload_threshold, clamped
            );
            self.preload_threshold = clamped;
        }
        if self.group_by.is_empty() && self.grouped {
            warn!("grouping enabled without a field, every item is ungrouped");
        }
        self
    }
}

impl fmt::Debug for ListConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListConfig")
            .field("page_size", &self.page_size)
            .field("preload_threshold", &self.preload_threshold)
            .field("search_timeout", &self.search_timeout)
            .field("scroll_throttle", &self.scroll_throttle)
            .field("selection_mode", &self.selection_mode)
            .field("key_expr", &self.key_expr)
            .field("grouped", &self.grouped)
            .field("group_by", &self.group_by)
            .field("page_load_mode", &self.page_load_mode)
            .field("disabled", &self.disabled)
            .field("display", &self.display.as_ref().map(|_| "<fn>"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = ListConfig::default();
        assert_eq!(config.page_size, 15);
        assert_eq!(config.preload_threshold, 80.0);
        assert_eq!(config.search_timeout, Duration::from_millis(500));
        assert_eq!(config.scroll_throttle, Duration::from_millis(50));
        assert_eq!(config.selection_mode, SelectionMode::None);
        assert!(config.grouped);
        assert_eq!(config.group_by, "group");
        assert_eq!(config.page_load_mode, PageLoadMode::ScrollBottom);
        assert!(!config.disabled);
    }

    #[test]
    fn test_normalized_clamps() {
        let config = ListConfig::default()
            .with_page_size(0)
            .with_preload_threshold(140.0)
            .normalized();
        assert_eq!(config.page_size, 1);
        assert_eq!(config.preload_threshold, 100.0);

        let config = ListConfig::default().with_preload_threshold(f64::NAN).normalized();
        assert_eq!(config.preload_threshold, DEFAULT_PRELOAD_THRESHOLD);
    }

    #[test]
    fn test_display_projection() {
        let item = Item::from(json!({ "id": 7, "title": "Seven", "size": 3 }));
        assert_eq!(ListConfig::default().display(&item), "7");
        assert_eq!(ListConfig::default().with_display_field("title").display(&item), "Seven");
        assert_eq!(ListConfig::default().with_display_field("size").display(&item), "3");
        assert_eq!(ListConfig::default().with_display_field("nope").display(&item), "");

        let shout = ListConfig::default()
            .with_display(|item| item.get_str("title").unwrap_or_default().to_uppercase());
        assert_eq!(shout.display(&item), "SEVEN");
    }
}
