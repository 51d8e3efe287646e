//! Styling for the list view.
//!
//! All default styles use `AdaptiveColor`, so they read well on light and
//! dark terminals alike.
//!
//! ```rust
//! use bubbletea_lazylist::list::style::ListStyles;
//! use lipgloss_extras::prelude::*;
//!
//! let mut styles = ListStyles::default();
//! styles.group_header = Style::new()
//!     .foreground(AdaptiveColor { Light: "#1a1a1a", Dark: "#ffffff" })
//!     .bold(true);
//! ```

use lipgloss_extras::prelude::*;

/// Marker drawn in front of selected rows.
pub const BULLET: &str = "•";

/// Appended to text cut off at the view width.
pub const ELLIPSIS: &str = "…";

/// Group header glyph for an expanded group.
pub const EXPANDED_GLYPH: &str = "▾";

/// Group header glyph for a collapsed group.
pub const COLLAPSED_GLYPH: &str = "▸";

/// Styles for every part of the list view.
#[derive(Debug, Clone)]
pub struct ListStyles {
    /// The search prompt.
    pub search_prompt: Style,
    /// The typed search text.
    pub search_text: Style,
    /// Placeholder shown when nothing is typed.
    pub search_placeholder: Style,
    /// Group header line.
    pub group_header: Style,
    /// Item count after a group name.
    pub group_count: Style,
    /// An unselected row.
    pub item: Style,
    /// A selected row.
    pub selected_item: Style,
    /// A row that cannot be clicked.
    pub disabled_item: Style,
    /// The selection marker.
    pub selected_marker: Style,
    /// The empty-list text.
    pub no_items: Style,
    /// The full reload indicator.
    pub loading: Style,
    /// The page load indicator.
    pub page_loading: Style,
    /// The progress line under the rows.
    pub status_bar: Style,
}

impl Default for ListStyles {
    fn default() -> Self {
        let subdued_color = AdaptiveColor {
            Light: "#9B9B9B",
            Dark: "#5C5C5C",
        };
        let very_subdued_color = AdaptiveColor {
            Light: "#DDDADA",
            Dark: "#3C3C3C",
        };
        let accent = AdaptiveColor {
            Light: "#EE6FF8",
            Dark: "#EE6FF8",
        };

        Self {
            search_prompt: Style::new().foreground(AdaptiveColor {
                Light: "#04B575",
                Dark: "#ECFD65",
            }),
            search_text: Style::new().foreground(AdaptiveColor {
                Light: "#1a1a1a",
                Dark: "#dddddd",
            }),
            search_placeholder: Style::new().foreground(subdued_color.clone()),
            group_header: Style::new()
                .foreground(AdaptiveColor {
                    Light: "#1a1a1a",
                    Dark: "#dddddd",
                })
                .bold(true),
            group_count: Style::new().foreground(subdued_color.clone()),
            item: Style::new().foreground(AdaptiveColor {
                Light: "#1a1a1a",
                Dark: "#dddddd",
            }),
            selected_item: Style::new().foreground(accent.clone()).bold(true),
            disabled_item: Style::new().foreground(very_subdued_color.clone()),
            selected_marker: Style::new().foreground(accent),
            no_items: Style::new().foreground(AdaptiveColor {
                Light: "#909090",
                Dark: "#626262",
            }),
            loading: Style::new().foreground(AdaptiveColor {
                Light: "#8E8E8E",
                Dark: "#747373",
            }),
            page_loading: Style::new().foreground(subdued_color).italic(true),
            status_bar: Style::new().foreground(AdaptiveColor {
                Light: "#A49FA5",
                Dark: "#777777",
            }),
        }
    }
}
