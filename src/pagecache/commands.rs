//! Remote operations and the messages they resolve to.
//!
//! Every entry point that needs the server returns a [`Cmd`]. The future
//! calls the [`ListSource`](super::ListSource) and yields one of the `*Msg`
//! types below, tagged with the model's id (and, for list loads, the
//! generation it was issued under). [`Model::update`] routes the message back
//! to the matching `on_*` handler, which is the only place the buffer changes
//! as a result of a remote call.

use super::buffer::GrowthBuffer;
use super::model::Model;
use super::types::{Action, BulkAction, Item, Mode, Notice, Patch, SortDirection, SortState};
use crate::error::{Error, Result};
use bubbletea_rs::{Cmd, Msg};
use log::{debug, error, info, warn};
use std::sync::Arc;

/// A server page, or a refresh of page 0, has been answered.
pub struct PageLoadedMsg<I: Item> {
    /// Id of the issuing model.
    pub id: i64,
    /// Generation the request was issued under.
    pub generation: u64,
    /// Zero-based server page.
    pub server_page: usize,
    /// Whether the rows replace the buffer instead of extending it.
    pub replace: bool,
    /// The rows, or why there are none.
    pub result: Result<Vec<I>>,
}

/// A keyword search has been answered.
pub struct SearchLoadedMsg<I: Item> {
    /// Id of the issuing model.
    pub id: i64,
    /// Generation the request was issued under.
    pub generation: u64,
    /// The trimmed keyword.
    pub keyword: String,
    /// Every matching row.
    pub result: Result<Vec<I>>,
}

/// A row action has been answered.
pub struct ActionDoneMsg<I: Item> {
    /// Id of the issuing model.
    pub id: i64,
    /// The row the action was issued for.
    pub item_id: I::Id,
    /// Absolute buffer index the row had when the action was issued.
    pub index: usize,
    /// The action.
    pub action: Action,
    /// The write-back, or why there is none.
    pub result: Result<Patch>,
}

/// A bulk action has been answered.
#[derive(Debug)]
pub struct BulkDoneMsg {
    /// Id of the issuing model.
    pub id: i64,
    /// The action.
    pub action: BulkAction,
    /// The server's message.
    pub result: Result<String>,
}

const OPERATION_OK: &str = "Operation completed successfully";

impl<I: Item> Model<I> {
    /// Loads the first server page.
    pub fn init(&mut self) -> Option<Cmd> {
        self.ensure_loaded(1)
    }

    /// Fetches one more server page if `target_page` lies past the pages
    /// fetched so far.
    ///
    /// Returns `None` when nothing needs fetching: the page is already
    /// loaded, a fetch is in flight, the server has no more rows or the
    /// model shows search results.
    pub fn ensure_loaded(&mut self, target_page: usize) -> Option<Cmd> {
        if self.mode == Mode::Searching || self.searching {
            return None;
        }
        if target_page <= self.fetched_pages
            || self.frontier_exhausted
            || self.page_in_flight.is_some()
        {
            return None;
        }
        let server_page = self.fetched_pages;
        debug!(
            "cache {}: fetching server page {} for ui page {}",
            self.id, server_page, target_page
        );
        Some(self.fetch_page_cmd(server_page, false))
    }

    /// Moves the UI to 1-based `page`.
    ///
    /// Pages that are already loaded are shown at once. Stepping onto the
    /// trailing page past the frontier fetches the next server page; the
    /// cursor moves once it arrives and stays put if the fetch fails.
    pub fn goto_page(&mut self, page: usize) -> Option<Cmd> {
        if page == 0 || page > self.total_pages() || page == self.page() {
            return None;
        }
        if self.mode == Mode::Paged && page > self.fetched_pages {
            if let Some(cmd) = self.ensure_loaded(page) {
                self.pending_page = Some(page);
                return Some(cmd);
            }
            if self.page_in_flight.is_some() {
                return None;
            }
        }
        if self.paginator.go_to(page) {
            self.cursor = 0;
        }
        None
    }

    /// Reloads from server page 0. On success the buffer is replaced, the UI
    /// returns to page 1 in paged mode and any sort is forgotten; on failure
    /// everything stays as it was.
    pub fn refresh(&mut self) -> Cmd {
        self.generation += 1;
        self.pending_page = None;
        self.searching = false;
        info!("cache {}: refreshing from the first page", self.id);
        self.fetch_page_cmd(0, true)
    }

    /// Switches between paged and search mode.
    ///
    /// A non-empty keyword (after trimming) replaces the buffer with the full
    /// search result once it arrives. An empty keyword drops the buffer at
    /// once and reloads server page 0 in paged mode.
    pub fn submit_search(&mut self, keyword: &str) -> Cmd {
        let keyword = keyword.trim().to_string();
        self.generation += 1;
        self.pending_page = None;
        self.page_in_flight = None;

        if keyword.is_empty() {
            info!("cache {}: leaving search, reloading pages", self.id);
            self.searching = false;
            self.mode = Mode::Paged;
            self.keyword.clear();
            self.sort = None;
            self.buffer.clear();
            self.fetched_pages = 0;
            self.frontier_exhausted = false;
            self.paginator.page = 1;
            self.cursor = 0;
            self.sync_pagination();
            return self.fetch_page_cmd(0, false);
        }

        info!("cache {}: searching for {:?}", self.id, keyword);
        self.searching = true;
        self.loading = true;
        let source = Arc::clone(&self.source);
        let id = self.id;
        let generation = self.generation;
        Box::pin(async move {
            let result = source.search(&keyword).await;
            Some(Box::new(SearchLoadedMsg {
                id,
                generation,
                keyword,
                result,
            }) as Msg)
        })
    }

    /// Runs `action` on the row `item_id`, shown at `row_offset` of the
    /// unfiltered slice of `ui_page`.
    ///
    /// Returns `Ok(None)` when the row already has an action in flight.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] or [`Error::IdentityMismatch`] when the
    /// position does not hold `item_id`; no remote call is made.
    pub fn apply_action(
        &mut self,
        item_id: &I::Id,
        action: Action,
        ui_page: usize,
        row_offset: usize,
    ) -> Result<Option<Cmd>> {
        let (index, found) = self.id_at(ui_page, row_offset)?;
        if found != *item_id {
            return Err(self.violation(Error::IdentityMismatch {
                index,
                expected: item_id.to_string(),
            }));
        }
        if self.busy.contains(item_id) {
            debug!("cache {}: {} is busy, ignoring {:?}", self.id, item_id, action);
            return Ok(None);
        }

        debug!(
            "cache {}: {:?} on {} at index {}",
            self.id, action, item_id, index
        );
        self.busy.insert(item_id.clone());
        let source = Arc::clone(&self.source);
        let id = self.id;
        let item_id = item_id.clone();
        Ok(Some(Box::pin(async move {
            let result = source.mutate(&item_id, action).await;
            Some(Box::new(ActionDoneMsg::<I> {
                id,
                item_id,
                index,
                action,
                result,
            }) as Msg)
        })))
    }

    /// Runs `action` on the row at `row_offset` of the current page.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] when the offset is past the buffer.
    pub fn act_on_row(&mut self, row_offset: usize, action: Action) -> Result<Option<Cmd>> {
        let page = self.page();
        let (_, item_id) = self.id_at(page, row_offset)?;
        self.apply_action(&item_id, action, page, row_offset)
    }

    /// Runs a collection-wide action. Returns `None` while another bulk
    /// action is running.
    pub fn run_bulk(&mut self, action: BulkAction) -> Option<Cmd> {
        if self.bulk_running {
            return None;
        }
        debug!("cache {}: bulk {:?}", self.id, action);
        self.bulk_running = true;
        let source = Arc::clone(&self.source);
        let id = self.id;
        Some(Box::pin(async move {
            let result = source.bulk(action).await;
            Some(Box::new(BulkDoneMsg { id, action, result }) as Msg)
        }))
    }

    /// Sorts the whole buffer by `field`. The first sort on a field is
    /// ascending; repeating it flips the direction.
    pub fn sort_by(&mut self, field: I::Field) {
        if self.buffer.is_empty() {
            return;
        }
        let direction = match self.sort {
            Some(state) if state.field == field => state.direction.toggled(),
            _ => SortDirection::Ascending,
        };
        debug!("cache {}: sorting by {:?} {:?}", self.id, field, direction);
        self.buffer.sort(field, direction);
        self.sort = Some(SortState { field, direction });
        self.clamp_cursor();
    }

    fn fetch_page_cmd(&mut self, server_page: usize, replace: bool) -> Cmd {
        self.page_in_flight = Some(server_page);
        self.loading = true;
        let source = Arc::clone(&self.source);
        let id = self.id;
        let generation = self.generation;
        Box::pin(async move {
            let result = source.fetch_page(server_page).await;
            Some(Box::new(PageLoadedMsg {
                id,
                generation,
                server_page,
                replace,
                result,
            }) as Msg)
        })
    }

    pub(super) fn on_page_loaded(&mut self, msg: PageLoadedMsg<I>) {
        if msg.generation != self.generation {
            debug!(
                "cache {}: dropping stale page {} (generation {})",
                self.id, msg.server_page, msg.generation
            );
            return;
        }
        self.page_in_flight = None;
        self.loading = false;
        let target = self.pending_page.take();

        let items = match msg.result {
            Ok(items) => items,
            Err(err) => {
                self.report(err);
                return;
            }
        };
        let count = items.len();
        if msg.replace {
            self.buffer.replace(items);
            self.fetched_pages = 1;
            self.mode = Mode::Paged;
            self.keyword.clear();
            self.sort = None;
            self.paginator.page = 1;
            self.cursor = 0;
        } else {
            self.buffer.append(items);
            self.fetched_pages += 1;
        }
        self.frontier_exhausted = count < self.config.per_page;
        debug!(
            "cache {}: server page {} brought {} rows, {} loaded",
            self.id,
            msg.server_page,
            count,
            self.buffer.len()
        );
        self.sync_pagination();

        if let Some(page) = target {
            if self.paginator.go_to(page) {
                self.cursor = 0;
            }
        }
    }

    pub(super) fn on_search_loaded(&mut self, msg: SearchLoadedMsg<I>) {
        if msg.generation != self.generation {
            debug!("cache {}: dropping stale search {:?}", self.id, msg.keyword);
            return;
        }
        self.searching = false;
        self.loading = false;
        match msg.result {
            Ok(items) => {
                info!(
                    "cache {}: search {:?} returned {} rows",
                    self.id,
                    msg.keyword,
                    items.len()
                );
                self.buffer.replace(items);
                self.mode = Mode::Searching;
                self.keyword = msg.keyword;
                self.sort = None;
                self.paginator.page = 1;
                self.cursor = 0;
                self.sync_pagination();
            }
            Err(err) => self.report(err),
        }
    }

    pub(super) fn on_action_done(&mut self, msg: ActionDoneMsg<I>) {
        self.busy.remove(&msg.item_id);
        let patch = match msg.result {
            Ok(patch) => patch,
            Err(err) => {
                self.report(err);
                return;
            }
        };

        let index = match self.buffer.get(msg.index) {
            Some(item) if item.id() == msg.item_id => Some(msg.index),
            _ => self.buffer.position_of(&msg.item_id),
        };
        match index {
            Some(index) => {
                if index != msg.index {
                    debug!(
                        "cache {}: {} moved from {} to {}",
                        self.id, msg.item_id, msg.index, index
                    );
                }
                if let Err(err) = self.buffer.patch(index, |item| patch.apply_to(item)) {
                    error!("cache {}: {}", self.id, err);
                    return;
                }
                self.clamp_cursor();
            }
            None => warn!(
                "cache {}: {} is no longer loaded, dropping {:?}",
                self.id, msg.item_id, patch
            ),
        }
        self.notice = Some(self.success_notice(&msg.item_id, msg.action, &patch));
    }

    pub(super) fn on_bulk_done(&mut self, msg: BulkDoneMsg) {
        self.bulk_running = false;
        match msg.result {
            Ok(message) if message.is_empty() => {
                self.notice = Some(Notice::Info(msg.action.default_notice().to_string()));
            }
            Ok(message) => self.notice = Some(Notice::Info(message)),
            Err(err) => self.report(err),
        }
    }

    fn success_notice(&self, item_id: &I::Id, action: Action, patch: &Patch) -> Notice {
        let noun = &self.config.item_name_singular;
        match (action, patch) {
            (
                Action::Test,
                Patch::Tested {
                    response_time_ms, ..
                },
            ) => Notice::Info(format!(
                "Test of {} {} succeeded in {:.2} s",
                noun,
                item_id,
                *response_time_ms as f64 / 1000.0
            )),
            (Action::RefreshBalance, Patch::Balance { balance, .. }) => Notice::Success(format!(
                "Balance of {} {} updated: ${:.2}",
                noun, item_id, balance
            )),
            _ => Notice::Success(OPERATION_OK.to_string()),
        }
    }

    /// Turns a remote failure into a notice; invariant violations are only
    /// logged.
    fn report(&mut self, err: Error) {
        if err.is_invariant_violation() {
            error!("cache {}: {}", self.id, err);
            return;
        }
        warn!("cache {}: {}", self.id, err);
        if let Some(message) = err.user_message() {
            self.notice = Some(Notice::Error(message));
        }
    }

    /// Absolute index and id of the row at `row_offset` of `page`.
    fn id_at(&self, page: usize, row_offset: usize) -> Result<(usize, I::Id)> {
        let len = self.buffer.len();
        let index = match GrowthBuffer::<I>::absolute_index(page, self.config.per_page, row_offset)
        {
            Some(index) => index,
            None => {
                return Err(self.violation(Error::IndexOutOfBounds {
                    index: usize::MAX,
                    len,
                }))
            }
        };
        match self.buffer.get(index) {
            Some(item) => Ok((index, item.id())),
            None => Err(self.violation(Error::IndexOutOfBounds { index, len })),
        }
    }

    fn violation(&self, err: Error) -> Error {
        error!("cache {}: {}", self.id, err);
        err
    }
}
