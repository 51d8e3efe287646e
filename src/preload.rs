//! Scroll geometry and the preload decision.
//!
//! The host reports raw scroll geometry. [`ScrollTracker`] turns successive
//! observations into [`ScrollMetrics`] with a direction, plus a
//! [`ScrollEvent`] for the host. [`should_preload`] decides from the metrics
//! and the loader's flags whether the next page should be requested before
//! the user reaches the physical end of the list.

/// Percentage of content that must be in view before a preload fires.
pub const DEFAULT_PRELOAD_THRESHOLD: f64 = 80.0;

/// Distance in pixels from the bottom that counts as "reached the end".
pub const SCROLL_END_THRESHOLD: f64 = 20.0;

/// Vertical scroll direction relative to the previous observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    /// Content moved towards the top.
    Up,
    /// Content moved towards the bottom.
    #[default]
    Down,
}

/// One observation of the scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Offset of the viewport from the top of the content.
    pub scroll_top: f64,
    /// Total height of the content.
    pub scroll_height: f64,
    /// Height of the viewport.
    pub client_height: f64,
    /// Direction relative to the previous observation.
    pub direction: ScrollDirection,
}

impl ScrollMetrics {
    /// Builds metrics scrolling down. Negative inputs are clamped to zero.
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top: scroll_top.max(0.0),
            scroll_height: scroll_height.max(0.0),
            client_height: client_height.max(0.0),
            direction: ScrollDirection::Down,
        }
    }

    /// Returns a copy with `direction` replaced.
    pub fn with_direction(mut self, direction: ScrollDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Returns `true` when the content is taller than the viewport.
    pub fn has_overflow(&self) -> bool {
        self.scroll_height.is_finite() && self.scroll_height > self.client_height
    }

    /// Percentage of the content that has been brought into view.
    ///
    /// `None` when there is nothing to scroll, which keeps a zero or
    /// degenerate height from producing a bogus 100%.
    pub fn viewed_percent(&self) -> Option<f64> {
        if !self.has_overflow() || self.scroll_height <= 0.0 {
            return None;
        }
        Some((self.scroll_top + self.client_height) / self.scroll_height * 100.0)
    }

    /// Scroll position as a percentage of the scrollable range, 0 without overflow.
    pub fn scrolled_percent(&self) -> f64 {
        let range = self.scroll_height - self.client_height;
        if range > 0.0 {
            self.scroll_top / range * 100.0
        } else {
            0.0
        }
    }

    /// Returns `true` when the viewport is within [`SCROLL_END_THRESHOLD`] of the bottom.
    pub fn reached_end(&self) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - SCROLL_END_THRESHOLD
    }
}

/// Scroll notification delivered to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    /// Offset of the viewport from the top of the content.
    pub scroll_top: f64,
    /// Total height of the content.
    pub scroll_height: f64,
    /// Height of the viewport.
    pub client_height: f64,
    /// Whether the bottom of the content is (nearly) in view.
    pub reach_end: bool,
    /// Position within the scrollable range, 0 to 100.
    pub percent: f64,
}

impl From<&ScrollMetrics> for ScrollEvent {
    fn from(m: &ScrollMetrics) -> Self {
        Self {
            scroll_top: m.scroll_top,
            scroll_height: m.scroll_height,
            client_height: m.client_height,
            reach_end: m.reached_end(),
            percent: m.scrolled_percent(),
        }
    }
}

/// Derives scroll direction from consecutive observations.
#[derive(Debug, Clone, Default)]
pub struct ScrollTracker {
    last_scroll_top: f64,
    last: Option<ScrollMetrics>,
}

impl ScrollTracker {
    /// A tracker with no prior observation, facing down.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an observation and returns it with its direction filled in.
    ///
    /// Moving further from the top is [`ScrollDirection::Down`]; anything
    /// else, including no movement, is [`ScrollDirection::Up`].
    pub fn observe(&mut self, scroll_top: f64, scroll_height: f64, client_height: f64) -> ScrollMetrics {
        let metrics = ScrollMetrics::new(scroll_top, scroll_height, client_height);
        let direction = if metrics.scroll_top > self.last_scroll_top {
            ScrollDirection::Down
        } else {
            ScrollDirection::Up
        };
        self.last_scroll_top = metrics.scroll_top;
        let metrics = metrics.with_direction(direction);
        self.last = Some(metrics);
        metrics
    }

    /// The most recent observation, if any.
    pub fn last(&self) -> Option<ScrollMetrics> {
        self.last
    }

    /// Forgets all observations, as after the content is replaced.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Drops the last observed geometry but keeps the scroll position, so
    /// the next observation still gets a direction relative to it.
    pub fn forget_geometry(&mut self) {
        self.last = None;
    }
}

/// Loader state consulted by [`should_preload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadFlags {
    /// A full reload is in flight.
    pub is_loading: bool,
    /// A page load is in flight.
    pub is_page_loading: bool,
    /// A scroll-triggered preload has been started and not settled.
    pub is_preloading: bool,
    /// The provider reported more data.
    pub has_more: bool,
}

impl LoadFlags {
    /// Returns `true` when a fetch could be started right now.
    pub fn can_fetch(&self) -> bool {
        !self.is_loading && !self.is_page_loading && !self.is_preloading && self.has_more
    }
}

/// Decides whether the next page should be requested.
///
/// Nothing fires while a load is in flight, while a preload is pending, when
/// the provider has no more data, or when the content does not overflow the
/// viewport. Otherwise the next page is requested once `threshold` percent of
/// the content has been viewed while scrolling down; scrolling up past the
/// threshold never triggers a fetch.
///
/// # Examples
///
/// ```rust
/// use bubbletea_lazylist::preload::{should_preload, LoadFlags, ScrollMetrics};
///
/// let flags = LoadFlags { has_more: true, ..Default::default() };
/// let near_bottom = ScrollMetrics::new(700.0, 1000.0, 200.0);
/// assert!(should_preload(&near_bottom, 80.0, flags));
///
/// let no_overflow = ScrollMetrics::new(0.0, 200.0, 200.0);
/// assert!(!should_preload(&no_overflow, 80.0, flags));
/// ```
pub fn should_preload(metrics: &ScrollMetrics, threshold: f64, flags: LoadFlags) -> bool {
    if !flags.can_fetch() {
        return false;
    }
    match metrics.viewed_percent() {
        Some(viewed) => viewed >= threshold && metrics.direction == ScrollDirection::Down,
        None => false,
    }
}
