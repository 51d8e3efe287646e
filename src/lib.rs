#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/bubbletea-lazylist/")]

//! # bubbletea-lazylist
//!
//! An incrementally loaded list component for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! programs: pages are fetched from a data provider as the user scrolls,
//! searches are debounced, items are grouped into collapsible sections and
//! clicks maintain a single or multiple selection.
//!
//! ## Overview
//!
//! The crate is built from small pieces, leaves first:
//!
//! | Module | Role |
//! |--------|------|
//! | [`item`] | Records, keys and key extractors |
//! | [`grouping`] | Partitioning items into sorted, collapsible groups |
//! | [`selection`] | Single/multiple selection transitions |
//! | [`preload`] | Scroll geometry and the "fetch the next page now?" decision |
//! | [`debounce`] | Search debouncing and scroll throttling |
//! | [`source`] | The paginated provider contract and an in-memory provider |
//! | [`loader`] | Page loading, merging and "latest request wins" |
//! | [`list`] | The component that ties everything together |
//!
//! Everything except [`loader`] and [`list`] is a pure function of its input.
//!
//! ## Integration with bubbletea-rs
//!
//! [`list::Model`] follows the Elm architecture. Operations that start
//! asynchronous work return a `Cmd`; the message it resolves to goes back
//! through `update`:
//!
//! ```rust
//! use bubbletea_lazylist::prelude::*;
//! use bubbletea_rs::{Cmd, Model, Msg};
//! use serde_json::json;
//!
//! struct App {
//!     list: List,
//!     last_clicked: Option<usize>,
//! }
//!
//! impl Model for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let items: Vec<Item> = (1..=100)
//!             .map(|n| json!({ "id": n, "name": format!("Row {n}") }).into())
//!             .collect();
//!         let mut list = List::new(ListConfig::default().ungrouped().with_display_field("name"));
//!         let cmd = list.set_provider(MemoryProvider::new(items));
//!         (Self { list, last_clicked: None }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         let cmd = self.list.update(msg);
//!         for event in self.list.take_events() {
//!             if let ListEvent::ItemClicked { index, .. } = event {
//!                 self.last_clicked = Some(index);
//!             }
//!         }
//!         cmd
//!     }
//!
//!     fn view(&self) -> String {
//!         self.list.view()
//!     }
//! }
//! ```
//!
//! ## Without a message loop
//!
//! [`loader::LoadCoordinator`] can be driven directly with `async` calls:
//!
//! ```rust
//! use bubbletea_lazylist::loader::{LoadCoordinator, LoadOptions};
//! use bubbletea_lazylist::source::{DataSource, MemoryProvider};
//! use bubbletea_lazylist::item::Item;
//! use serde_json::json;
//!
//! # let rt = tokio::runtime::Runtime::new().unwrap();
//! # rt.block_on(async {
//! let items: Vec<Item> = (1..=42).map(|n| json!({ "id": n }).into()).collect();
//! let source = DataSource::remote(MemoryProvider::new(items));
//! let opts = LoadOptions::default();
//! let mut loader = LoadCoordinator::new();
//!
//! let first = loader.reload(Some(&source), &opts).await.unwrap();
//! assert_eq!(first.progress.loaded, 15);
//! let second = loader.load_next_page(Some(&source), &opts).await.unwrap().unwrap();
//! assert_eq!(second.progress.loaded, 30);
//! # });
//! ```
//!
//! ## Logging
//!
//! The crate logs through the `log` facade: `debug` for requests, stale
//! responses and throttled scrolls, `warn` for clamped configuration and
//! `error` for provider failures. Install any logger to see them.

pub mod debounce;
pub mod error;
pub mod grouping;
pub mod item;
pub mod list;
pub mod loader;
pub mod preload;
pub mod selection;
pub mod source;

pub use error::{Error, Result};
pub use grouping::{group_items, Group, UNGROUPED};
pub use item::{Item, ItemKey, KeyExpr};
pub use list::Model as List;
pub use list::{ListConfig, ListEvent, ListSnapshot, ListState, ListStyles, PageLoadMode};
pub use loader::{LoadCoordinator, LoadOptions, LoadOutcome, LoadProgress, LoadResult, PageState};
pub use preload::{should_preload, ScrollDirection, ScrollEvent, ScrollMetrics};
pub use selection::{toggle, Selection, SelectionChange, SelectionMode};
pub use source::{DataSource, MemoryProvider, PageProvider, PaginatedResponse, ProviderError};

/// The types most programs need, in one import.
///
/// ```rust
/// use bubbletea_lazylist::prelude::*;
///
/// let list = List::new(ListConfig::default().with_selection_mode(SelectionMode::Multiple));
/// assert_eq!(list.state(), ListState::Idle);
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::item::{Item, ItemKey, KeyExpr};
    pub use crate::list::Model as List;
    pub use crate::list::{
        ListConfig, ListEvent, ListSnapshot, ListState, ListStyles, LoadedMsg, PageLoadMode,
        PreloadCheckMsg, SearchSettledMsg,
    };
    pub use crate::loader::LoadProgress;
    pub use crate::selection::SelectionMode;
    pub use crate::source::{DataSource, MemoryProvider, PageProvider, PaginatedResponse, ProviderError};
}
