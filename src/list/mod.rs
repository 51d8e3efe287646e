//! Incrementally loaded list with search, grouping and selection.
//!
//! [`Model`] composes the crate's building blocks into one component:
//!
//! - a [`LoadCoordinator`](crate::loader::LoadCoordinator) that owns the
//!   materialized items and talks to the data source,
//! - [`group_items`](crate::grouping::group_items) for collapsible groups,
//! - [`toggle`](crate::selection::toggle) for selection transitions,
//! - [`should_preload`](crate::preload::should_preload) fed by throttled scroll
//!   observations,
//! - a [`Debouncer`](crate::debounce::Debouncer) between keystrokes and
//!   searches.
//!
//! ## Driving the list
//!
//! Host input goes through `on_search_input`, `on_scroll`, `on_item_click`,
//! `on_toggle_group` and `load_more`. Calls that start asynchronous work
//! return a [`Cmd`]; run it in the bubbletea program (or await it) and hand
//! the resulting message to [`Model::update`]. What happened is reported as
//! [`ListEvent`]s, collected with [`Model::take_events`].
//!
//! ## Load states
//!
//! The list is `Idle`, `Loading` (full reload) or `LoadingPage`. A reload
//! always wins: starting one discards the items and makes any in-flight
//! response stale. Page loads never overlap.

pub mod config;
pub mod events;
pub mod style;

mod api;
mod model;
mod rendering;
mod update;


pub use config::{DisplayFn, ListConfig, PageLoadMode, PRELOAD_CHECK_DELAY};
pub use events::{ListEvent, LoadedMsg, PreloadCheckMsg, SearchSettledMsg};
pub use model::{ListSnapshot, ListState, Model};
pub use style::ListStyles;

use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};

impl BubbleTeaModel for Model {
    /// Creates an empty list with the default configuration.
    ///
    /// Call `set_items` or `set_data_source` to give it something to show.
    fn init() -> (Self, Option<Cmd>) {
        (Self::default(), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        Model::update(self, msg)
    }

    fn view(&self) -> String {
        Model::view(self)
    }
}
