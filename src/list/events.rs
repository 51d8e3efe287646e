//! Events emitted by the list and messages it schedules for itself.
//!
//! Events are queued on the model and collected by the host with
//! [`Model::take_events`](super::Model::take_events) after each call or
//! update. Messages are what the list's commands resolve to; the host passes
//! them back through `update`.

use crate::error::Error;
use crate::item::Item;
use crate::loader::{LoadProgress, LoadTicket};
use crate::preload::ScrollEvent;
use crate::source::{PaginatedResponse, ProviderError};

pub use crate::debounce::SettledMsg as SearchSettledMsg;

/// Something the host may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    /// An enabled item was clicked.
    ItemClicked {
        /// The clicked item.
        item: Item,
        /// Row index reported by the host.
        index: usize,
        /// Group the row belongs to, when grouped.
        group: Option<String>,
    },
    /// The selection changed.
    SelectionChanged {
        /// The full selection afterwards.
        selection: Vec<Item>,
        /// Newly selected items.
        added: Vec<Item>,
        /// Items no longer selected.
        removed: Vec<Item>,
    },
    /// A group was expanded or collapsed.
    GroupToggled {
        /// Group name.
        group: String,
        /// New state.
        expanded: bool,
    },
    /// Load progress after a page was applied.
    Progress(LoadProgress),
    /// A reload finished and its items are ready to be shown. Page loads
    /// only report [`Progress`](Self::Progress).
    ContentReady,
    /// A page load started.
    PageLoadingStarted,
    /// A scroll observation passed the throttle.
    Scrolled(ScrollEvent),
    /// The live search text changed.
    SearchValueChanged(String),
    /// A load failed; the list is idle again and the load can be retried.
    LoadFailed {
        /// The page that failed.
        page: usize,
        /// What went wrong.
        error: Error,
    },
}

/// A provider fetch finished.
#[derive(Debug)]
pub struct LoadedMsg {
    /// The list that issued the fetch.
    pub list_id: i64,
    /// The request the response belongs to.
    pub ticket: LoadTicket,
    /// The provider's answer.
    pub result: Result<PaginatedResponse, ProviderError>,
}

/// Time to re-check whether the next page should be preloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreloadCheckMsg {
    /// The list that scheduled the check.
    pub id: i64,
    /// Generation of the reload that scheduled it.
    pub generation: u64,
}
