//! Host-facing operations.

use super::config::{ListConfig, PageLoadMode};
use super::events::ListEvent;
use super::Model;
use crate::debounce::Throttle;
use crate::grouping::group_items;
use crate::item::{Item, ItemKey};
use crate::selection::{toggle, Selection, SelectionMode};
use crate::source::{DataSource, PageProvider};
use bubbletea_rs::Cmd;
use log::debug;
use std::sync::Arc;
use std::time::Instant;

impl Model {
    /// Shows a fixed, fully loaded collection.
    ///
    /// The items are adopted synchronously; no command is needed.
    pub fn set_items(&mut self, items: Vec<Item>) {
        // Static sources never produce a command.
        let _ = self.set_data_source(DataSource::Static(items));
    }

    /// Loads from `source`, discarding everything loaded so far.
    pub fn set_data_source(&mut self, source: DataSource) -> Option<Cmd> {
        self.source = Some(source);
        self.reload()
    }

    /// Loads from a paginated provider.
    pub fn set_provider<P: PageProvider + 'static>(&mut self, provider: P) -> Option<Cmd> {
        self.set_data_source(DataSource::Remote(Arc::new(provider)))
    }

    /// Reloads page 1 with the current search text.
    ///
    /// Any load in flight is superseded; its response will be ignored.
    pub fn reload(&mut self) -> Option<Cmd> {
        self.search_debounce.cancel();
        self.scroll.forget_geometry();
        let opts = self.load_options();
        let start = self.loader.begin_reload(self.source.as_ref(), &opts);
        self.start_load(start)
    }

    /// Records a keystroke in the search box.
    ///
    /// The returned command settles after the search timeout; only the last
    /// keystroke of a burst leads to a reload.
    pub fn on_search_input(&mut self, text: impl Into<String>) -> Cmd {
        self.search = text.into();
        self.emit(ListEvent::SearchValueChanged(self.search.clone()));
        self.search_debounce.trigger()
    }

    /// Reports the scroll container's geometry.
    pub fn on_scroll(&mut self, scroll_top: f64, scroll_height: f64, client_height: f64) -> Option<Cmd> {
        self.on_scroll_at(scroll_top, scroll_height, client_height, Instant::now())
    }

    /// Like [`on_scroll`](Self::on_scroll) with an explicit timestamp.
    ///
    /// Observations closer than the scroll throttle interval to the last
    /// accepted one are dropped.
    pub fn on_scroll_at(
        &mut self,
        scroll_top: f64,
        scroll_height: f64,
        client_height: f64,
        now: Instant,
    ) -> Option<Cmd> {
        if !self.scroll_throttle.allow(now) {
            debug!("list {}: scroll at {} throttled", self.id, scroll_top);
            return None;
        }
        let metrics = self.scroll.observe(scroll_top, scroll_height, client_height);
        self.emit(ListEvent::Scrolled((&metrics).into()));
        self.maybe_preload(&metrics)
    }

    /// Handles a click on `item`, shown at row `index` in `group`.
    ///
    /// Ignored when the list or the item is disabled. Otherwise an
    /// [`ItemClicked`](ListEvent::ItemClicked) event is queued and, unless the
    /// selection mode is `None`, the selection is toggled.
    pub fn on_item_click(&mut self, item: &Item, index: usize, group: Option<&str>) {
        if self.config.disabled || item.is_disabled() {
            return;
        }
        self.emit(ListEvent::ItemClicked {
            item: item.clone(),
            index,
            group: group.map(str::to_string),
        });
        if self.config.selection_mode == SelectionMode::None {
            return;
        }

        let change = toggle(
            item,
            self.config.selection_mode,
            &self.selection,
            &self.config.key_expr,
        );
        self.selection = change.selection;
        self.emit(ListEvent::SelectionChanged {
            selection: self.selection.items().to_vec(),
            added: change.added,
            removed: change.removed,
        });
    }

    /// Expands a collapsed group or collapses an expanded one.
    pub fn on_toggle_group(&mut self, name: &str) {
        let expanded = match self.collapsed.iter().position(|g| g == name) {
            Some(index) => {
                self.collapsed.remove(index);
                true
            }
            None => {
                self.collapsed.push(name.to_string());
                false
            }
        };
        self.regroup();
        self.emit(ListEvent::GroupToggled {
            group: name.to_string(),
            expanded,
        });
    }

    /// Requests the next page, whatever the page load mode.
    ///
    /// A no-op when there is no more data or a load is in flight.
    pub fn load_more(&mut self) -> Option<Cmd> {
        let start = self.loader.begin_next_page(self.source.as_ref());
        self.start_load(start)
    }

    /// Replaces the set of collapsed groups.
    pub fn set_collapsed_groups(&mut self, names: Vec<String>) {
        self.collapsed = names;
        self.regroup();
    }

    /// Deselects everything.
    pub fn clear_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let removed = self.selection.items().to_vec();
        self.selection = Selection::new();
        self.emit(ListEvent::SelectionChanged {
            selection: Vec::new(),
            added: Vec::new(),
            removed,
        });
    }

    /// Changes the selection mode.
    ///
    /// Switching to `Single` keeps only the most recently selected item.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.config.selection_mode = mode;
        if mode != SelectionMode::Single || self.selection.len() <= 1 {
            return;
        }
        let mut items = self.selection.items().to_vec();
        let latest = items.split_off(items.len() - 1);
        self.selection = Selection::from_items(latest, &self.config.key_expr);
        self.emit(ListEvent::SelectionChanged {
            selection: self.selection.items().to_vec(),
            added: Vec::new(),
            removed: items,
        });
    }

    /// Restores a selection, for example one saved before a restart.
    ///
    /// No event is queued. In `Single` mode only the first item is kept.
    pub fn select_items(&mut self, items: Vec<Item>) {
        let limit = match self.config.selection_mode {
            SelectionMode::Single => 1,
            _ => usize::MAX,
        };
        self.selection = Selection::from_items(items.into_iter().take(limit), &self.config.key_expr);
    }

    /// Enables or disables clicks.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.config.disabled = disabled;
    }

    /// Changes how further pages are requested.
    pub fn set_page_load_mode(&mut self, mode: PageLoadMode) {
        self.config.page_load_mode = mode;
    }

    /// Changes the view width.
    pub fn set_width(&mut self, width: usize) {
        self.config.width = width;
    }

    /// Replaces the configuration and reloads.
    pub fn set_config(&mut self, config: ListConfig) -> Option<Cmd> {
        self.config = config.normalized();
        self.search_debounce.set_delay(self.config.search_timeout);
        self.scroll_throttle = Throttle::new(self.config.scroll_throttle);
        self.reload()
    }

    /// Stable identity for the row showing `item` at `index`.
    ///
    /// The item's key, or the index when the item has no key.
    pub fn track_key(&self, item: &Item, index: usize) -> String {
        match self.config.key_expr.key_of(item) {
            ItemKey::Identity(_) => index.to_string(),
            key => key.to_string(),
        }
    }

    pub(super) fn regroup(&mut self) {
        self.groups = if self.config.grouped {
            group_items(self.loader.items(), &self.config.group_by, &self.collapsed)
        } else {
            Vec::new()
        };
    }
}
