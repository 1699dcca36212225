//! Incrementally loaded, paginated cache for the dashboard's resource tables.
//!
//! The server hands out fixed-size pages on demand; the UI paginates on its
//! own and only asks for a new server page when the user steps past
//! everything fetched so far. Single-row actions (enable, disable, delete,
//! test, balance refresh) patch the loaded rows in place instead of reloading
//! the table.
//!
//! ## Pieces
//!
//! - [`GrowthBuffer`]: every fetched row in server order, published
//!   copy-on-write. Deleting a row only sets its tombstone so that
//!   `(page - 1) * per_page + offset` keeps addressing the same slot.
//! - [`Model`]: the component. It owns the buffer and the page cursor,
//!   decides when a fetch is needed, switches between [`Mode::Paged`] and
//!   [`Mode::Searching`], applies row actions and sorts.
//! - [`ListSource`]: the remote side, implemented by the host application.
//!
//! ## Message flow
//!
//! Remote work is returned as a `Cmd`. When it completes, the resulting
//! message must be passed to [`Model::update`]. Messages carry the id of the
//! model that issued them, so several tables can share one program; list
//! loads also carry a generation so answers that were overtaken by a refresh
//! or a search are dropped.
//!
//! ```no_run
//! # use bubbletea_pagecache::channel::Channel;
//! # use bubbletea_pagecache::pagecache::Model;
//! # use bubbletea_rs::{Cmd, Msg};
//! fn route(channels: &mut Model<Channel>, msg: Msg) -> Option<Cmd> {
//!     channels.update(msg)
//! }
//! ```

mod buffer;
mod commands;
mod keys;
mod model;
mod rendering;
mod source;
pub mod style;
mod types;

#[cfg(test)]
mod tests;

pub use buffer::GrowthBuffer;
pub use commands::{ActionDoneMsg, BulkDoneMsg, PageLoadedMsg, SearchLoadedMsg};
pub use keys::CacheKeyMap;
pub use model::Model;
pub use source::{BalanceReply, Envelope, ListSource, TestReply};
pub use style::CacheStyles;
pub use types::{
    Action, BulkAction, Item, Mode, Notice, Patch, Row, SortDirection, SortState, Status,
};

use bubbletea_rs::{Cmd, KeyMsg, Msg};

impl<I: Item> Model<I> {
    /// Handles result messages of this model's commands and key presses.
    ///
    /// Messages issued by other instances are ignored.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let msg = match msg.downcast::<PageLoadedMsg<I>>() {
            Ok(loaded) => {
                if loaded.id == self.id {
                    self.on_page_loaded(*loaded);
                }
                return None;
            }
            Err(msg) => msg,
        };
        let msg = match msg.downcast::<SearchLoadedMsg<I>>() {
            Ok(loaded) => {
                if loaded.id == self.id {
                    self.on_search_loaded(*loaded);
                }
                return None;
            }
            Err(msg) => msg,
        };
        let msg = match msg.downcast::<ActionDoneMsg<I>>() {
            Ok(done) => {
                if done.id == self.id {
                    self.on_action_done(*done);
                }
                return None;
            }
            Err(msg) => msg,
        };
        let msg = match msg.downcast::<BulkDoneMsg>() {
            Ok(done) => {
                if done.id == self.id {
                    self.on_bulk_done(*done);
                }
                return None;
            }
            Err(msg) => msg,
        };

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            return self.handle_key(key_msg);
        }
        None
    }

    fn handle_key(&mut self, key_msg: &KeyMsg) -> Option<Cmd> {
        if self.keymap.next_page.matches(key_msg) {
            return self.goto_page(self.page() + 1);
        }
        if self.keymap.prev_page.matches(key_msg) {
            return self.goto_page(self.page().saturating_sub(1));
        }
        if self.keymap.cursor_up.matches(key_msg) {
            self.cursor = self.cursor.saturating_sub(1);
            return None;
        }
        if self.keymap.cursor_down.matches(key_msg) {
            if self.cursor + 1 < self.visible_rows().len() {
                self.cursor += 1;
            }
            return None;
        }
        if self.keymap.refresh.matches(key_msg) {
            return Some(self.refresh());
        }

        let action = if self.keymap.enable.matches(key_msg) {
            Action::Enable
        } else if self.keymap.disable.matches(key_msg) {
            Action::Disable
        } else if self.keymap.delete.matches(key_msg) {
            Action::Delete
        } else if self.keymap.test.matches(key_msg) {
            Action::Test
        } else if self.keymap.refresh_balance.matches(key_msg) {
            Action::RefreshBalance
        } else {
            return None;
        };
        let offset = self.selected_row()?.offset;
        // invariant failures are already logged by act_on_row
        self.act_on_row(offset, action).ok().flatten()
    }
}
