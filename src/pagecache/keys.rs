//! Key bindings for the cached table.
//!
//! - **Pages**: `←/h/pgup` previous, `→/l/pgdn` next
//! - **Rows**: `↑/k`, `↓/j`
//! - **Row actions**: `e` enable, `d` disable, `x` delete, `t` test, `b` balance
//! - **List**: `r` refresh
//!
//! Item types without latency or balance fields should disable `test` and
//! `refresh_balance` so they drop out of the help line.

use crate::key::{self, KeyMap};
use crossterm::event::KeyCode;

/// Key bindings for navigation and row actions.
#[derive(Debug, Clone)]
pub struct CacheKeyMap {
    /// Previous page.
    pub prev_page: key::Binding,
    /// Next page; stepping past the loaded frontier fetches more rows.
    pub next_page: key::Binding,
    /// Move the row cursor up.
    pub cursor_up: key::Binding,
    /// Move the row cursor down.
    pub cursor_down: key::Binding,
    /// Reload from the first server page.
    pub refresh: key::Binding,
    /// Enable the selected row.
    pub enable: key::Binding,
    /// Disable the selected row.
    pub disable: key::Binding,
    /// Delete the selected row.
    pub delete: key::Binding,
    /// Test the selected row's latency.
    pub test: key::Binding,
    /// Refresh the selected row's balance.
    pub refresh_balance: key::Binding,
}

impl Default for CacheKeyMap {
    fn default() -> Self {
        Self {
            prev_page: key::Binding::new(vec![KeyCode::Left, KeyCode::Char('h'), KeyCode::PageUp])
                .with_help("←/h", "prev page"),
            next_page: key::Binding::new(vec![
                KeyCode::Right,
                KeyCode::Char('l'),
                KeyCode::PageDown,
            ])
            .with_help("→/l", "next page"),
            cursor_up: key::Binding::new(vec![KeyCode::Up, KeyCode::Char('k')])
                .with_help("↑/k", "up"),
            cursor_down: key::Binding::new(vec![KeyCode::Down, KeyCode::Char('j')])
                .with_help("↓/j", "down"),
            refresh: key::Binding::new(vec![KeyCode::Char('r')]).with_help("r", "refresh"),
            enable: key::Binding::new(vec![KeyCode::Char('e')]).with_help("e", "enable"),
            disable: key::Binding::new(vec![KeyCode::Char('d')]).with_help("d", "disable"),
            delete: key::Binding::new(vec![KeyCode::Char('x')]).with_help("x", "delete"),
            test: key::Binding::new(vec![KeyCode::Char('t')]).with_help("t", "test"),
            refresh_balance: key::Binding::new(vec![KeyCode::Char('b')])
                .with_help("b", "balance"),
        }
    }
}

impl KeyMap for CacheKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![
            &self.prev_page,
            &self.next_page,
            &self.refresh,
            &self.enable,
            &self.disable,
            &self.delete,
        ]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![
            vec![
                &self.cursor_up,
                &self.cursor_down,
                &self.prev_page,
                &self.next_page,
            ],
            vec![
                &self.enable,
                &self.disable,
                &self.delete,
                &self.test,
                &self.refresh_balance,
            ],
            vec![&self.refresh],
        ]
    }
}
