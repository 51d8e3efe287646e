//! The list model: owned state, construction and read accessors.

use super::config::ListConfig;
use super::events::ListEvent;
use super::style::ListStyles;
use crate::debounce::{Debouncer, Throttle};
use crate::error::Error;
use crate::grouping::Group;
use crate::item::{Item, ItemKey};
use crate::loader::{LoadCoordinator, LoadOptions, LoadProgress, PageState};
use crate::preload::ScrollTracker;
use crate::selection::Selection;
use crate::source::DataSource;
use std::sync::atomic::{AtomicI64, Ordering};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// What the list is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListState {
    /// No load in flight.
    #[default]
    Idle,
    /// A full reload is in flight.
    Loading,
    /// A page load is in flight.
    LoadingPage,
}

/// A point-in-time copy of everything the view shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot {
    /// Materialized items.
    pub items: Vec<Item>,
    /// Groups over `items`, empty when grouping is off.
    pub groups: Vec<Group>,
    /// Selected items in selection order.
    pub selection: Vec<Item>,
    /// Keys of the selected items.
    pub selected_keys: Vec<ItemKey>,
    /// Load progress.
    pub progress: LoadProgress,
    /// Whether another page is available.
    pub has_more: bool,
    /// Load state.
    pub state: ListState,
    /// The live search text.
    pub search: String,
}

/// An incrementally loaded, searchable, groupable list.
///
/// The model owns the materialized items (through its [`LoadCoordinator`]),
/// the groups, the selection and the search text. Host input goes through the
/// `on_*` methods; anything asynchronous comes back as a command whose message
/// must be passed to `update`. Events are queued and collected with
/// [`take_events`](Self::take_events).
///
/// # Examples
///
/// ```rust
/// use bubbletea_lazylist::item::Item;
/// use bubbletea_lazylist::list::{ListConfig, ListEvent, Model};
/// use bubbletea_lazylist::selection::SelectionMode;
/// use serde_json::json;
///
/// let mut list = Model::new(
///     ListConfig::default()
///         .with_selection_mode(SelectionMode::Single)
///         .with_display_field("name"),
/// );
/// list.set_items(vec![
///     json!({ "id": 1, "name": "Ada", "group": "math" }).into(),
///     json!({ "id": 2, "name": "Alan", "group": "cs" }).into(),
/// ]);
///
/// let ada: Item = list.items()[0].clone();
/// list.on_item_click(&ada, 0, Some("math"));
/// assert_eq!(list.selected_items(), &[ada]);
/// assert!(list
///     .take_events()
///     .iter()
///     .any(|e| matches!(e, ListEvent::SelectionChanged { .. })));
/// ```
pub struct Model {
    pub(super) id: i64,
    pub(super) config: ListConfig,
    pub(super) styles: ListStyles,
    pub(super) source: Option<DataSource>,
    pub(super) loader: LoadCoordinator,
    pub(super) groups: Vec<Group>,
    pub(super) collapsed: Vec<String>,
    pub(super) selection: Selection,
    pub(super) search: String,
    pub(super) search_debounce: Debouncer,
    pub(super) scroll_throttle: Throttle,
    pub(super) scroll: ScrollTracker,
    pub(super) events: Vec<ListEvent>,
    pub(super) last_error: Option<Error>,
}

impl Model {
    /// Creates an empty, idle list.
    pub fn new(config: ListConfig) -> Self {
        let config = config.normalized();
        Self {
            id: next_id(),
            search_debounce: Debouncer::new(config.search_timeout),
            scroll_throttle: Throttle::new(config.scroll_throttle),
            config,
            styles: ListStyles::default(),
            source: None,
            loader: LoadCoordinator::new(),
            groups: Vec::new(),
            collapsed: Vec::new(),
            selection: Selection::new(),
            search: String::new(),
            scroll: ScrollTracker::new(),
            events: Vec::new(),
            last_error: None,
        }
    }

    /// Replaces the styles.
    pub fn with_styles(mut self, styles: ListStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Unique id of this list, carried by its messages.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The configuration in effect.
    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    /// The styles in effect.
    pub fn styles(&self) -> &ListStyles {
        &self.styles
    }

    /// Materialized items in load order.
    pub fn items(&self) -> &[Item] {
        self.loader.items()
    }

    /// Groups over the items; empty when grouping is off.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Names of the collapsed groups.
    pub fn collapsed_groups(&self) -> &[String] {
        &self.collapsed
    }

    /// The current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected items in selection order.
    pub fn selected_items(&self) -> &[Item] {
        self.selection.items()
    }

    /// Returns `true` if `item` is selected.
    pub fn is_selected(&self, item: &Item) -> bool {
        self.selection.is_selected(item, &self.config.key_expr)
    }

    /// Load progress.
    pub fn progress(&self) -> LoadProgress {
        self.loader.progress()
    }

    /// Pagination state.
    pub fn page_state(&self) -> &PageState {
        self.loader.page_state()
    }

    /// Whether another page is available.
    pub fn has_more(&self) -> bool {
        self.loader.has_more()
    }

    /// What the list is doing.
    pub fn state(&self) -> ListState {
        if self.loader.is_loading() {
            ListState::Loading
        } else if self.loader.is_page_loading() {
            ListState::LoadingPage
        } else {
            ListState::Idle
        }
    }

    /// Whether the page load in flight was triggered by scrolling.
    pub fn is_preloading(&self) -> bool {
        self.loader.is_preloading()
    }

    /// The live search text, which may not have been applied yet.
    pub fn search_value(&self) -> &str {
        &self.search
    }

    /// The most recent load failure, cleared when the next load starts.
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// Returns `true` if a data source or items have been set.
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Copies the state the view is built from.
    pub fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            items: self.items().to_vec(),
            groups: self.groups.clone(),
            selection: self.selection.items().to_vec(),
            selected_keys: self.selection.keys().to_vec(),
            progress: self.progress(),
            has_more: self.has_more(),
            state: self.state(),
            search: self.search.clone(),
        }
    }

    /// Queued events, oldest first. The queue is left empty.
    pub fn take_events(&mut self) -> Vec<ListEvent> {
        std::mem::take(&mut self.events)
    }

    pub(super) fn emit(&mut self, event: ListEvent) {
        self.events.push(event);
    }

    pub(super) fn load_options(&self) -> LoadOptions {
        LoadOptions {
            search: self.search.clone(),
            page_size: self.config.page_size,
            grouped: self.config.grouped,
            group_by: self.config.group_by.clone(),
            collapsed: self.collapsed.clone(),
            key_expr: self.config.key_expr.clone(),
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(ListConfig::default())
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("items", &self.items().len())
            .field("groups", &self.groups.len())
            .field("selected", &self.selection.len())
            .field("state", &self.state())
            .field("search", &self.search)
            .finish_non_exhaustive()
    }
}
