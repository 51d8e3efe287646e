//! View rendering.
//!
//! The view is a plain string: a search line, then either the grouped or the
//! flat rows, then the loading and progress lines. Rows are cut to the
//! configured width.

use super::config::PageLoadMode;
use super::model::ListState;
use super::style::{BULLET, COLLAPSED_GLYPH, ELLIPSIS, EXPANDED_GLYPH};
use super::Model;
use crate::item::Item;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ROW_INDENT: usize = 2;

impl Model {
    /// Renders the list.
    pub fn view(&self) -> String {
        let mut sections = vec![self.view_search()];

        let body = self.view_body();
        if !body.is_empty() {
            sections.push(body);
        }

        let footer = self.view_footer();
        if !footer.is_empty() {
            sections.push(footer);
        }

        sections.join("\n")
    }

    fn view_search(&self) -> String {
        let prompt = self.styles.search_prompt.clone().render("> ");
        let text = if self.search.is_empty() {
            self.styles
                .search_placeholder
                .clone()
                .render(&self.config.search_placeholder)
        } else {
            let width = self.config.width.saturating_sub(2);
            self.styles.search_text.clone().render(&truncate(&self.search, width))
        };
        format!("{prompt}{text}")
    }

    fn view_body(&self) -> String {
        if self.items().is_empty() {
            return match self.state() {
                ListState::Loading => self.styles.loading.clone().render(&self.config.loading_text),
                _ => self.styles.no_items.clone().render(&self.config.no_data_text),
            };
        }

        let mut lines = Vec::new();
        if self.config.grouped {
            for group in &self.groups {
                let glyph = if group.expanded {
                    EXPANDED_GLYPH
                } else {
                    COLLAPSED_GLYPH
                };
                let title = truncate(
                    &format!("{glyph} {}", group.name),
                    self.config.width.saturating_sub(group.len().to_string().len() + 3),
                );
                lines.push(format!(
                    "{} {}",
                    self.styles.group_header.clone().render(&title),
                    self.styles
                        .group_count
                        .clone()
                        .render(&format!("({})", group.len()))
                ));
                for item in group.visible_items() {
                    lines.push(self.view_row(item, ROW_INDENT));
                }
            }
        } else {
            for item in self.items() {
                lines.push(self.view_row(item, 0));
            }
        }
        lines.join("\n")
    }

    fn view_row(&self, item: &Item, indent: usize) -> String {
        let selected = self.is_selected(item);
        let marker = if selected {
            self.styles.selected_marker.clone().render(BULLET)
        } else {
            " ".to_string()
        };
        let width = self.config.width.saturating_sub(indent + 2);
        let text = truncate(&self.config.display(item), width);
        let style = if item.is_disabled() || self.config.disabled {
            &self.styles.disabled_item
        } else if selected {
            &self.styles.selected_item
        } else {
            &self.styles.item
        };
        format!("{}{} {}", " ".repeat(indent), marker, style.clone().render(&text))
    }

    fn view_footer(&self) -> String {
        let mut lines = Vec::new();
        if self.state() == ListState::LoadingPage {
            lines.push(
                self.styles
                    .page_loading
                    .clone()
                    .render(&self.config.page_loading_text),
            );
        }

        let progress = self.progress();
        if progress.total > 0 {
            let mut status = format!("{}/{} loaded", progress.loaded, progress.total);
            if self.has_more() && self.config.page_load_mode == PageLoadMode::NextButton {
                status.push_str(&format!(" {BULLET} load more"));
            }
            lines.push(self.styles.status_bar.clone().render(&status));
        }
        lines.join("\n")
    }
}

/// Cuts `text` to at most `width` columns, marking the cut with an ellipsis.
pub(super) fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - ELLIPSIS.width();
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str(ELLIPSIS);
    out
}
