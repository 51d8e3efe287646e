//! Debounce and throttle primitives for the single-threaded event loop.
//!
//! [`Debouncer`] follows the same id/tag scheme as bubbletea tick-driven
//! components: every trigger bumps a tag and schedules a tick carrying that
//! tag. When the tick comes back, it only counts if its tag is still the
//! latest one. Superseded ticks are ignored, which cancels them without
//! needing a handle to the pending future.
//!
//! [`Throttle`] is a leading-edge rate limiter. The first event passes, and
//! further events are dropped until the interval has elapsed. Time is passed
//! in explicitly so the behavior is testable without sleeping.

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

/// Quiet period after the last keystroke before a search is issued.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_millis(500);

/// Minimum spacing between evaluated scroll events.
pub const SCROLL_THROTTLE: Duration = Duration::from_millis(50);

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Sent when a debounce period has elapsed.
///
/// Hand it back to [`Debouncer::settle`]; only the tick from the most recent
/// trigger is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettledMsg {
    /// The debouncer that scheduled this tick.
    pub id: i64,
    /// The trigger generation this tick belongs to.
    pub tag: u64,
}

/// Coalesces bursts of triggers into a single settled notification.
#[derive(Debug, Clone)]
pub struct Debouncer {
    id: i64,
    tag: u64,
    delay: Duration,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            id: next_id(),
            tag: 0,
            delay,
        }
    }

    /// Unique id of this debouncer.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Changes the quiet period for subsequent triggers.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Restarts the quiet period, superseding any pending tick.
    pub fn trigger(&mut self) -> Cmd {
        self.tag = self.tag.wrapping_add(1);
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.delay, move |_| Box::new(SettledMsg { id, tag }) as Msg)
    }

    /// Invalidates any pending tick without scheduling a new one.
    pub fn cancel(&mut self) {
        self.tag = self.tag.wrapping_add(1);
    }

    /// Returns `true` if `msg` is the tick of the latest trigger.
    ///
    /// Accepting a tick consumes it: a duplicate delivery is rejected.
    pub fn settle(&mut self, msg: &SettledMsg) -> bool {
        if msg.id != self.id || msg.tag != self.tag {
            return false;
        }
        self.tag = self.tag.wrapping_add(1);
        true
    }

    #[cfg(test)]
    pub(crate) fn pending_msg(&self) -> SettledMsg {
        SettledMsg {
            id: self.id,
            tag: self.tag,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_TIMEOUT)
    }
}

/// Leading-edge throttle.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    /// Creates a throttle that lets one event through per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns `true` if an event at `now` should be processed.
    pub fn allow(&mut self, now: Instant) -> bool {
        match self.last {
            Some(prev) if now.saturating_duration_since(prev) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Forgets the last accepted event.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(SCROLL_THROTTLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_ids() {
        assert_ne!(Debouncer::default().id(), Debouncer::default().id());
    }

    #[test]
    fn test_only_latest_trigger_settles() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));

        let _ = debouncer.trigger();
        let stale = debouncer.pending_msg();
        let _ = debouncer.trigger();
        let latest = debouncer.pending_msg();

        assert!(!debouncer.settle(&stale));
        assert!(debouncer.settle(&latest));
        // Redelivery of the same tick is rejected.
        assert!(!debouncer.settle(&latest));
    }

    #[test]
    fn test_cancel_drops_pending_tick() {
        let mut debouncer = Debouncer::default();
        let _ = debouncer.trigger();
        let pending = debouncer.pending_msg();
        debouncer.cancel();
        assert!(!debouncer.settle(&pending));
    }

    #[test]
    fn test_foreign_ticks_rejected() {
        let mut a = Debouncer::default();
        let mut b = Debouncer::default();
        let _ = a.trigger();
        let _ = b.trigger();
        let from_b = b.pending_msg();
        assert!(!a.settle(&SettledMsg { id: from_b.id, tag: from_b.tag }));
    }

    #[tokio::test]
    async fn test_trigger_delivers_settled_msg() {
        let mut debouncer = Debouncer::new(Duration::from_millis(1));
        let msg = debouncer.trigger().await.expect("tick produces a message");
        let settled = msg.downcast_ref::<SettledMsg>().copied().expect("settled msg");
        assert!(debouncer.settle(&settled));
    }

    #[test]
    fn test_throttle_leading_edge() {
        let mut throttle = Throttle::new(Duration::from_millis(50));
        let start = Instant::now();

        assert!(throttle.allow(start));
        assert!(!throttle.allow(start + Duration::from_millis(10)));
        assert!(!throttle.allow(start + Duration::from_millis(49)));
        assert!(throttle.allow(start + Duration::from_millis(50)));
        assert!(!throttle.allow(start + Duration::from_millis(60)));

        throttle.reset();
        assert!(throttle.allow(start + Duration::from_millis(61)));
    }
}
