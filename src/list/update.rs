//! Message handling and the commands the list issues.

use super::config::{PageLoadMode, PRELOAD_CHECK_DELAY};
use super::events::{ListEvent, LoadedMsg, PreloadCheckMsg, SearchSettledMsg};
use super::Model;
use crate::loader::{LoadKind, LoadOutcome, LoadRequest, LoadResult, LoadStart};
use crate::preload::{should_preload, ScrollMetrics};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use log::debug;

impl Model {
    /// Processes a message produced by one of this list's commands.
    ///
    /// Messages addressed to other lists, stale search ticks and responses to
    /// superseded requests are ignored.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let msg = match msg.downcast::<LoadedMsg>() {
            Ok(loaded) => return self.handle_loaded(*loaded),
            Err(other) => other,
        };

        if let Some(settled) = msg.downcast_ref::<SearchSettledMsg>() {
            if settled.id != self.search_debounce.id() {
                return None;
            }
            if !self.search_debounce.settle(settled) {
                debug!("list {}: superseded search tick dropped", self.id);
                return None;
            }
            debug!("list {}: search settled on {:?}", self.id, self.search);
            return self.reload();
        }

        if let Some(check) = msg.downcast_ref::<PreloadCheckMsg>() {
            if check.id != self.id || check.generation != self.loader.generation() {
                return None;
            }
            // Only geometry reported since the reload started counts.
            let metrics = self.scroll.last()?;
            return self.maybe_preload(&metrics);
        }

        None
    }

    pub(super) fn start_load(&mut self, start: LoadStart) -> Option<Cmd> {
        match start {
            LoadStart::Immediate(result) => {
                self.last_error = None;
                self.apply_result(result, LoadKind::Reload);
                None
            }
            LoadStart::Pending(request) => {
                self.last_error = None;
                match request.ticket().kind {
                    // The loader dropped its items; show that instead of the
                    // previous groups.
                    LoadKind::Reload => self.regroup(),
                    LoadKind::NextPage => self.emit(ListEvent::PageLoadingStarted),
                }
                Some(self.fetch(request))
            }
            LoadStart::Skipped => None,
        }
    }

    pub(super) fn maybe_preload(&mut self, metrics: &ScrollMetrics) -> Option<Cmd> {
        if self.config.page_load_mode != PageLoadMode::ScrollBottom {
            return None;
        }
        if !should_preload(metrics, self.config.preload_threshold, self.loader.flags()) {
            return None;
        }
        debug!(
            "list {}: preloading page {}",
            self.id,
            self.loader.page_state().current_page + 1
        );
        let start = self.loader.begin_preload(self.source.as_ref());
        self.start_load(start)
    }

    fn fetch(&self, request: LoadRequest) -> Cmd {
        let list_id = self.id;
        Box::pin(async move {
            let (ticket, result) = request.fetch().await;
            Some(Box::new(LoadedMsg {
                list_id,
                ticket,
                result,
            }) as Msg)
        })
    }

    fn handle_loaded(&mut self, msg: LoadedMsg) -> Option<Cmd> {
        if msg.list_id != self.id {
            return None;
        }
        let kind = msg.ticket.kind;
        let opts = self.load_options();
        match self.loader.complete(msg.ticket, msg.result, &opts) {
            Ok(LoadOutcome::Applied(result)) => {
                let recheck = kind == LoadKind::Reload && result.has_more;
                self.apply_result(result, kind);
                recheck.then(|| self.schedule_preload_check())
            }
            Ok(LoadOutcome::Ignored) => None,
            Err(error) => {
                if kind == LoadKind::Reload {
                    self.regroup();
                }
                self.emit(ListEvent::LoadFailed {
                    page: error.page().unwrap_or_default(),
                    error: error.clone(),
                });
                self.last_error = Some(error);
                None
            }
        }
    }

    fn apply_result(&mut self, result: LoadResult, kind: LoadKind) {
        self.groups = result.groups;
        self.emit(ListEvent::Progress(result.progress));
        if kind == LoadKind::Reload {
            self.emit(ListEvent::ContentReady);
        }
    }

    fn schedule_preload_check(&self) -> Cmd {
        let id = self.id;
        let generation = self.loader.generation();
        bubbletea_tick(PRELOAD_CHECK_DELAY, move |_| {
            Box::new(PreloadCheckMsg { id, generation }) as Msg
        })
    }
}
