//! Styles for the cached table.
//!
//! Status badges follow the dashboard's colour coding: green for enabled,
//! red for disabled, yellow for expired and grey for exhausted rows.
//!
//! ```rust
//! use bubbletea_pagecache::pagecache::style::CacheStyles;
//! use lipgloss_extras::prelude::*;
//!
//! let mut styles = CacheStyles::default();
//! styles.title = Style::new().foreground(Color::from("205")).bold(true);
//! ```

use super::types::{Notice, Status};
use lipgloss_extras::prelude::*;

/// Marker drawn in front of the selected row.
pub const CURSOR_MARKER: &str = "> ";

/// Latency as shown in the table: `"not tested"` for 0, else seconds with
/// two decimals.
pub fn latency_label(response_time_ms: i64) -> String {
    if response_time_ms == 0 {
        "not tested".to_string()
    } else {
        format!("{:.2}s", response_time_ms as f64 / 1000.0)
    }
}

/// Styling for every element of the cached table.
#[derive(Debug, Clone)]
pub struct CacheStyles {
    /// Title bar text.
    pub title: Style,
    /// Keyword shown next to the title while searching.
    pub search_keyword: Style,
    /// Regular row text.
    pub row: Style,
    /// The selected row.
    pub selected_row: Style,
    /// Badge for enabled rows.
    pub status_enabled: Style,
    /// Badge for disabled rows.
    pub status_disabled: Style,
    /// Badge for expired rows.
    pub status_expired: Style,
    /// Badge for exhausted rows.
    pub status_exhausted: Style,
    /// Badge for unknown status codes.
    pub status_unknown: Style,
    /// Latency up to one second.
    pub latency_fast: Style,
    /// Latency up to three seconds.
    pub latency_ok: Style,
    /// Latency up to five seconds.
    pub latency_slow: Style,
    /// Latency above five seconds.
    pub latency_bad: Style,
    /// Marker for rows with an action in flight.
    pub busy: Style,
    /// Pagination area.
    pub pagination: Style,
    /// Row count in the status line.
    pub status_bar: Style,
    /// Success and info notices.
    pub notice: Style,
    /// Error notices.
    pub notice_error: Style,
    /// The empty-list message.
    pub no_items: Style,
    /// The loading message.
    pub loading: Style,
    /// Help line.
    pub help: Style,
}

impl Default for CacheStyles {
    fn default() -> Self {
        let subdued_color = AdaptiveColor {
            Light: "#9B9B9B",
            Dark: "#5C5C5C",
        };

        Self {
            title: Style::new()
                .background(Color::from("62"))
                .foreground(Color::from("230"))
                .padding(0, 1, 0, 1),
            search_keyword: Style::new().foreground(AdaptiveColor {
                Light: "#04B575",
                Dark: "#ECFD65",
            }),
            row: Style::new().foreground(AdaptiveColor {
                Light: "#1a1a1a",
                Dark: "#dddddd",
            }),
            selected_row: Style::new()
                .foreground(AdaptiveColor {
                    Light: "#EE6FF8",
                    Dark: "#EE6FF8",
                })
                .bold(true),
            status_enabled: Style::new().foreground(Color::from("#04B575")),
            status_disabled: Style::new().foreground(Color::from("#FF5F87")),
            status_expired: Style::new().foreground(Color::from("#FFD75F")),
            status_exhausted: Style::new().foreground(subdued_color.clone()),
            status_unknown: Style::new().foreground(subdued_color.clone()),
            latency_fast: Style::new().foreground(Color::from("#04B575")),
            latency_ok: Style::new().foreground(Color::from("#87AF00")),
            latency_slow: Style::new().foreground(Color::from("#FFD75F")),
            latency_bad: Style::new().foreground(Color::from("#FF5F87")),
            busy: Style::new().foreground(AdaptiveColor {
                Light: "#8E8E8E",
                Dark: "#747373",
            }),
            pagination: Style::new().padding_left(2),
            status_bar: Style::new().foreground(AdaptiveColor {
                Light: "#A49FA5",
                Dark: "#777777",
            }),
            notice: Style::new().foreground(AdaptiveColor {
                Light: "#04B575",
                Dark: "#04B575",
            }),
            notice_error: Style::new().foreground(Color::from("#FF5F87")).bold(true),
            no_items: Style::new().foreground(subdued_color.clone()),
            loading: Style::new().foreground(subdued_color),
            help: Style::new().padding_left(2).foreground(AdaptiveColor {
                Light: "#B2B2B2",
                Dark: "#4A4A4A",
            }),
        }
    }
}

impl CacheStyles {
    /// The coloured label for `status`.
    pub fn status_badge(&self, status: Status) -> String {
        let style = match status {
            Status::Enabled => &self.status_enabled,
            Status::Disabled => &self.status_disabled,
            Status::Expired => &self.status_expired,
            Status::Exhausted => &self.status_exhausted,
            Status::Unknown(_) => &self.status_unknown,
        };
        style.render(status.label())
    }

    /// The coloured latency label; untested rows are left unstyled.
    pub fn latency_badge(&self, response_time_ms: i64) -> String {
        let label = latency_label(response_time_ms);
        let style = match response_time_ms {
            0 => return label,
            ms if ms <= 1000 => &self.latency_fast,
            ms if ms <= 3000 => &self.latency_ok,
            ms if ms <= 5000 => &self.latency_slow,
            _ => &self.latency_bad,
        };
        style.render(&label)
    }

    /// The styled text of `notice`.
    pub fn render_notice(&self, notice: &Notice) -> String {
        if notice.is_error() {
            self.notice_error.render(notice.message())
        } else {
            self.notice.render(notice.message())
        }
    }
}
