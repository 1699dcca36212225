//! View rendering for the cached table.
//!
//! The view is composed of a header (title, plus the keyword while search
//! results are shown), the rows of the current page, the pagination control
//! and a footer with the row count, the latest notice and the help line.

use super::model::Model;
use super::style::CURSOR_MARKER;
use super::types::{Item, Mode, Row, Status};
use crate::key;
use unicode_width::UnicodeWidthStr;

/// Width of the widest status label, used to align the row text.
const STATUS_COLUMN: usize = 14;

/// Shown after a row whose action is in flight.
const BUSY_MARKER: &str = "…";

impl<I: Item> Model<I> {
    /// Renders the whole component.
    pub fn view(&self) -> String {
        let mut sections = vec![self.view_header(), self.view_rows()];
        let pagination = self.styles.pagination.render(&self.paginator.view());
        sections.push(pagination);
        sections.push(self.view_footer());
        sections.retain(|s| !s.is_empty());
        sections.join("\n")
    }

    pub(super) fn view_header(&self) -> String {
        let title = self.styles.title.render(&self.config.title);
        match self.mode {
            Mode::Searching => format!(
                "{} {}",
                title,
                self.styles
                    .search_keyword
                    .render(&format!("search: {}", self.keyword))
            ),
            Mode::Paged => title,
        }
    }

    pub(super) fn view_rows(&self) -> String {
        let rows = self.visible_rows();
        if rows.is_empty() {
            if self.loading {
                return self.styles.loading.render("Loading…");
            }
            return self
                .styles
                .no_items
                .render(&format!("No {}.", self.config.item_name_plural));
        }

        rows.iter()
            .enumerate()
            .map(|(i, row)| self.view_row(row, i == self.cursor))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn view_row(&self, row: &Row<'_, I>, selected: bool) -> String {
        let item = row.item;
        let status = item.status();
        let mut line = String::new();
        line.push_str(if selected { CURSOR_MARKER } else { "  " });
        line.push_str(&self.styles.status_badge(status));
        line.push_str(&" ".repeat(status_padding(status)));

        let text = item.to_string();
        let text = if selected {
            self.styles.selected_row.render(&text)
        } else {
            self.styles.row.render(&text)
        };
        line.push_str(&text);

        if let Some(ms) = item.response_time_ms() {
            line.push_str("  ");
            line.push_str(&self.styles.latency_badge(ms));
        }
        if self.busy.contains(&item.id()) {
            line.push(' ');
            line.push_str(&self.styles.busy.render(BUSY_MARKER));
        }
        line
    }

    pub(super) fn view_footer(&self) -> String {
        let live = self.buffer.items().iter().filter(|i| !i.is_deleted()).count();
        let noun = if live == 1 {
            &self.config.item_name_singular
        } else {
            &self.config.item_name_plural
        };
        let suffix = match self.mode {
            Mode::Paged => "loaded",
            Mode::Searching => "found",
        };
        let mut footer = self
            .styles
            .status_bar
            .render(&format!("{} {} {}", live, noun, suffix));

        if let Some(notice) = &self.notice {
            footer.push_str("  ");
            footer.push_str(&self.styles.render_notice(notice));
        }

        let help = key::short_help_line(&self.keymap);
        if !help.is_empty() {
            footer.push('\n');
            footer.push_str(&self.styles.help.render(&help));
        }
        footer
    }
}

fn status_padding(status: Status) -> usize {
    STATUS_COLUMN.saturating_sub(status.label().width()) + 1
}
