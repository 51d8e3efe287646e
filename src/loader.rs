//! Page loading and the materialized item list.
//!
//! [`LoadCoordinator`] is the single owner of the fetched items and of the
//! pagination state. Everything else reads snapshots of it.
//!
//! A load happens in two halves so it can run inside a bubbletea program:
//!
//! 1. `begin_reload` / `begin_next_page` update the flags and return a
//!    [`LoadStart`]. Static collections complete immediately. Remote sources
//!    yield a [`LoadRequest`] whose future performs the fetch.
//! 2. `complete` applies the fetched page. Each request carries a
//!    [`LoadTicket`] stamped with the generation it was issued in. Starting a
//!    reload bumps the generation, so a response from an older request is
//!    ignored even if it arrives last.
//!
//! Hosts without a message loop can use [`LoadCoordinator::reload`] and
//! [`LoadCoordinator::load_next_page`], which run both halves in one await.

use crate::error::{Error, Result};
use crate::grouping::{group_items, Group};
use crate::item::{Item, ItemKey, KeyExpr};
use crate::preload::LoadFlags;
use crate::source::{DataSource, PageProvider, PaginatedResponse, ProviderError};
use log::{debug, error, warn};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

/// Number of items requested per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// Pagination bookkeeping for the current search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    /// Last page successfully loaded, starting at 1.
    pub current_page: usize,
    /// Items requested per page.
    pub page_size: usize,
    /// Total matching items reported by the provider.
    pub total_count: usize,
    /// Items materialized so far.
    pub loaded_count: usize,
    /// Provider-reported availability of another page.
    pub has_more: bool,
    /// The search term the pages belong to.
    pub search_term: String,
}

impl PageState {
    fn new(page_size: usize, search_term: String) -> Self {
        Self {
            current_page: 1,
            page_size,
            total_count: 0,
            loaded_count: 0,
            has_more: false,
            search_term,
        }
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, String::new())
    }
}

/// How far loading has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadProgress {
    /// Items loaded.
    pub loaded: usize,
    /// Items available in total.
    pub total: usize,
    /// `loaded / total` as a rounded percentage, 0 when `total` is 0.
    pub percent: u32,
    /// Whether every item has been loaded.
    pub is_complete: bool,
}

impl LoadProgress {
    /// Computes progress for `loaded` out of `total` items.
    pub fn new(loaded: usize, total: usize) -> Self {
        let percent = if total > 0 {
            (loaded as f64 / total as f64 * 100.0).round() as u32
        } else {
            0
        };
        Self {
            loaded,
            total,
            percent,
            is_complete: loaded >= total,
        }
    }
}

/// Parameters shared by reloads and page loads.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Search term passed to the provider.
    pub search: String,
    /// Items per page. Zero is treated as one.
    pub page_size: usize,
    /// Whether to compute groups.
    pub grouped: bool,
    /// Field to group by.
    pub group_by: String,
    /// Names of collapsed groups.
    pub collapsed: Vec<String>,
    /// Identity used to drop duplicate rows.
    pub key_expr: KeyExpr,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            search: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            grouped: false,
            group_by: "group".to_string(),
            collapsed: Vec::new(),
            key_expr: KeyExpr::default(),
        }
    }
}

impl LoadOptions {
    /// Sets the search term.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Enables grouping by `group_by`.
    pub fn with_grouping(mut self, group_by: impl Into<String>, collapsed: Vec<String>) -> Self {
        self.grouped = true;
        self.group_by = group_by.into();
        self.collapsed = collapsed;
        self
    }

    /// Sets the key extractor.
    pub fn with_key_expr(mut self, key_expr: KeyExpr) -> Self {
        self.key_expr = key_expr;
        self
    }

    fn effective_page_size(&self) -> usize {
        if self.page_size == 0 {
            warn!("page size 0 is invalid, using 1");
            1
        } else {
            self.page_size
        }
    }
}

/// Snapshot handed back after a load is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadResult {
    /// All materialized items.
    pub items: Vec<Item>,
    /// Groups over `items`, empty when grouping is off.
    pub groups: Vec<Group>,
    /// Whether another page can be requested.
    pub has_more: bool,
    /// Progress after the load.
    pub progress: LoadProgress,
}

/// Which kind of load a ticket belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// Non-incremental load of page 1.
    Reload,
    /// Incremental load of the following page.
    NextPage,
}

/// Identifies an in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    /// Generation the request was issued in.
    pub generation: u64,
    /// Reload or page load.
    pub kind: LoadKind,
    /// Requested page.
    pub page: usize,
    /// Requested page size.
    pub page_size: usize,
    /// Search term sent to the provider.
    pub search: String,
}

/// A fetch waiting to be executed.
pub struct LoadRequest {
    ticket: LoadTicket,
    provider: Arc<dyn PageProvider>,
}

impl LoadRequest {
    /// The ticket to pass back to [`LoadCoordinator::complete`].
    pub fn ticket(&self) -> &LoadTicket {
        &self.ticket
    }

    /// Performs the fetch.
    pub fn fetch(
        self,
    ) -> impl Future<Output = (LoadTicket, std::result::Result<PaginatedResponse, ProviderError>)>
           + Send
           + 'static {
        let LoadRequest { ticket, provider } = self;
        async move {
            let result = provider
                .load(ticket.page, ticket.page_size, &ticket.search)
                .await;
            (ticket, result)
        }
    }
}

impl std::fmt::Debug for LoadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadRequest")
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

/// What starting a load produced.
#[derive(Debug)]
pub enum LoadStart {
    /// The load finished synchronously (static source or no source).
    Immediate(LoadResult),
    /// A fetch must be run and its outcome passed to `complete`.
    Pending(LoadRequest),
    /// Nothing to do: no more data, or a load is already in flight.
    Skipped,
}

/// What completing a load produced.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The page was merged.
    Applied(LoadResult),
    /// The response belonged to a superseded request and was dropped.
    Ignored,
}

/// Owns the materialized items and drives the provider.
#[derive(Debug, Clone, Default)]
pub struct LoadCoordinator {
    items: Vec<Item>,
    page: PageState,
    generation: u64,
    loading: bool,
    page_loading: bool,
    preloading: bool,
}

impl LoadCoordinator {
    /// An idle coordinator with no items.
    pub fn new() -> Self {
        Self::default()
    }

    /// The materialized items.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Pagination state.
    pub fn page_state(&self) -> &PageState {
        &self.page
    }

    /// Current load progress.
    pub fn progress(&self) -> LoadProgress {
        LoadProgress::new(self.page.loaded_count, self.page.total_count)
    }

    /// Whether the provider reported another page.
    pub fn has_more(&self) -> bool {
        self.page.has_more
    }

    /// A full reload is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// A page load is in flight.
    pub fn is_page_loading(&self) -> bool {
        self.page_loading
    }

    /// A scroll-triggered preload is pending.
    pub fn is_preloading(&self) -> bool {
        self.preloading
    }

    /// Generation of the latest reload.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Flags in the shape the preload decision expects.
    pub fn flags(&self) -> LoadFlags {
        LoadFlags {
            is_loading: self.loading,
            is_page_loading: self.page_loading,
            is_preloading: self.preloading,
            has_more: self.page.has_more,
        }
    }

    /// Starts a scroll-triggered page load.
    ///
    /// Same as [`begin_next_page`](Self::begin_next_page), but also raises the
    /// preloading flag until the load settles, successfully or not.
    pub fn begin_preload(&mut self, source: Option<&DataSource>) -> LoadStart {
        let start = self.begin_next_page(source);
        if matches!(start, LoadStart::Pending(_)) {
            self.preloading = true;
        }
        start
    }

    /// Builds a result from the current state.
    pub fn result(&self, opts: &LoadOptions) -> LoadResult {
        LoadResult {
            items: self.items.clone(),
            groups: self.groups(opts),
            has_more: self.page.has_more,
            progress: self.progress(),
        }
    }

    /// Groups over the current items, or nothing when grouping is off.
    pub fn groups(&self, opts: &LoadOptions) -> Vec<Group> {
        if opts.grouped {
            group_items(&self.items, &opts.group_by, &opts.collapsed)
        } else {
            Vec::new()
        }
    }

    /// Replaces the items with a fully loaded collection.
    ///
    /// Any in-flight request is superseded.
    pub fn adopt(&mut self, items: Vec<Item>, opts: &LoadOptions) -> LoadResult {
        self.supersede(opts);
        let items = dedup(items, &opts.key_expr, &HashSet::new());
        self.page.total_count = items.len();
        self.page.loaded_count = items.len();
        self.page.has_more = false;
        self.items = items;
        self.result(opts)
    }

    /// Starts loading page 1, discarding everything loaded so far.
    ///
    /// Supersedes any in-flight reload or page load.
    pub fn begin_reload(&mut self, source: Option<&DataSource>, opts: &LoadOptions) -> LoadStart {
        match source {
            None => {
                self.supersede(opts);
                LoadStart::Immediate(self.result(opts))
            }
            Some(DataSource::Static(items)) => LoadStart::Immediate(self.adopt(items.clone(), opts)),
            Some(DataSource::Remote(provider)) => {
                self.supersede(opts);
                self.loading = true;
                let ticket = LoadTicket {
                    generation: self.generation,
                    kind: LoadKind::Reload,
                    page: 1,
                    page_size: self.page.page_size,
                    search: self.page.search_term.clone(),
                };
                debug!("reload #{} issued (search {:?})", ticket.generation, ticket.search);
                LoadStart::Pending(LoadRequest {
                    ticket,
                    provider: Arc::clone(provider),
                })
            }
        }
    }

    /// Starts loading the page after the last one loaded.
    ///
    /// Skipped when the provider reported no more data, when any load is in
    /// flight, or when the source is not remote.
    pub fn begin_next_page(&mut self, source: Option<&DataSource>) -> LoadStart {
        let Some(DataSource::Remote(provider)) = source else {
            return LoadStart::Skipped;
        };
        if !self.page.has_more || self.loading || self.page_loading {
            return LoadStart::Skipped;
        }

        self.page_loading = true;
        let ticket = LoadTicket {
            generation: self.generation,
            kind: LoadKind::NextPage,
            page: self.page.current_page + 1,
            page_size: self.page.page_size,
            search: self.page.search_term.clone(),
        };
        debug!("page {} requested (generation {})", ticket.page, ticket.generation);
        LoadStart::Pending(LoadRequest {
            ticket,
            provider: Arc::clone(provider),
        })
    }

    /// Applies the outcome of a fetch started by this coordinator.
    ///
    /// Responses from superseded requests are ignored without touching any
    /// state. A failure clears the loading flags and leaves items and
    /// pagination as they were, so the same page can be requested again.
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        response: std::result::Result<PaginatedResponse, ProviderError>,
        opts: &LoadOptions,
    ) -> Result<LoadOutcome> {
        if ticket.generation != self.generation {
            debug!(
                "ignoring {:?} response for page {} from generation {} (current {})",
                ticket.kind, ticket.page, ticket.generation, self.generation
            );
            return Ok(LoadOutcome::Ignored);
        }

        self.loading = false;
        self.page_loading = false;
        self.preloading = false;

        let response = match response {
            Ok(response) => response,
            Err(source) => {
                error!("loading page {} failed: {}", ticket.page, source);
                return Err(Error::Provider {
                    page: ticket.page,
                    source,
                });
            }
        };

        match ticket.kind {
            LoadKind::Reload => {
                let items = dedup(response.data, &opts.key_expr, &HashSet::new());
                self.page.current_page = 1;
                self.page.loaded_count = items.len();
                self.items = items;
            }
            LoadKind::NextPage => {
                let seen: HashSet<ItemKey> =
                    self.items.iter().map(|i| opts.key_expr.key_of(i)).collect();
                let fresh = dedup(response.data, &opts.key_expr, &seen);
                self.page.current_page = ticket.page;
                self.page.loaded_count += fresh.len();
                self.items.extend(fresh);
            }
        }
        self.page.total_count = response.total_count;
        self.page.has_more = response.has_more;

        debug!(
            "page {} applied: {}/{} loaded, has_more={}",
            ticket.page, self.page.loaded_count, self.page.total_count, self.page.has_more
        );
        Ok(LoadOutcome::Applied(self.result(opts)))
    }

    /// Reloads from page 1 and waits for the result.
    pub async fn reload(
        &mut self,
        source: Option<&DataSource>,
        opts: &LoadOptions,
    ) -> Result<LoadResult> {
        match self.begin_reload(source, opts) {
            LoadStart::Immediate(result) => Ok(result),
            LoadStart::Pending(request) => {
                let (ticket, response) = request.fetch().await;
                self.finish(ticket, response, opts)
            }
            LoadStart::Skipped => Ok(self.result(opts)),
        }
    }

    /// Loads the next page and waits for the result.
    ///
    /// Returns `Ok(None)` when there was nothing to load, and
    /// [`Error::NoDataSource`] when there is no source to load from.
    pub async fn load_next_page(
        &mut self,
        source: Option<&DataSource>,
        opts: &LoadOptions,
    ) -> Result<Option<LoadResult>> {
        if source.is_none() {
            return Err(Error::NoDataSource);
        }
        match self.begin_next_page(source) {
            LoadStart::Pending(request) => {
                let (ticket, response) = request.fetch().await;
                self.finish(ticket, response, opts).map(Some)
            }
            LoadStart::Immediate(result) => Ok(Some(result)),
            LoadStart::Skipped => Ok(None),
        }
    }

    fn finish(
        &mut self,
        ticket: LoadTicket,
        response: std::result::Result<PaginatedResponse, ProviderError>,
        opts: &LoadOptions,
    ) -> Result<LoadResult> {
        match self.complete(ticket, response, opts)? {
            LoadOutcome::Applied(result) => Ok(result),
            LoadOutcome::Ignored => Ok(self.result(opts)),
        }
    }

    /// Starts a new generation with empty items and pagination.
    fn supersede(&mut self, opts: &LoadOptions) {
        self.generation += 1;
        self.items.clear();
        self.page = PageState::new(opts.effective_page_size(), opts.search.clone());
        self.loading = false;
        self.page_loading = false;
        self.preloading = false;
    }
}

/// Keeps the first occurrence of each key not already in `seen`.
fn dedup(items: Vec<Item>, key_expr: &KeyExpr, seen: &HashSet<ItemKey>) -> Vec<Item> {
    let mut fresh_keys = HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            let key = key_expr.key_of(item);
            !seen.contains(&key) && fresh_keys.insert(key)
        })
        .collect()
}
