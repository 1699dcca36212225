//! The cache model: state, construction and read accessors.
//!
//! Remote work lives in `commands.rs`, key handling in `mod.rs` and drawing in
//! `rendering.rs`; they all operate on the [`Model`] defined here.

use super::buffer::GrowthBuffer;
use super::keys::CacheKeyMap;
use super::source::ListSource;
use super::style::CacheStyles;
use super::types::{Item, Mode, Notice, Row, SortState};
use crate::config::Config;
use crate::error::Result;
use crate::paginator;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// An incrementally loaded, paginated view over one remote list.
///
/// The model owns the growth buffer, the page cursor and the bookkeeping of
/// in-flight requests. All remote work is returned as [`bubbletea_rs::Cmd`]s;
/// their result messages must be routed back through [`Model::update`].
///
/// # Examples
///
/// ```no_run
/// use async_trait::async_trait;
/// use bubbletea_pagecache::channel::Channel;
/// use bubbletea_pagecache::config::Config;
/// use bubbletea_pagecache::pagecache::{Action, ListSource, Model, Patch};
/// use bubbletea_pagecache::Result;
/// use std::sync::Arc;
///
/// struct Api;
///
/// #[async_trait]
/// impl ListSource<Channel> for Api {
///     async fn fetch_page(&self, _page: usize) -> Result<Vec<Channel>> { Ok(vec![]) }
///     async fn search(&self, _keyword: &str) -> Result<Vec<Channel>> { Ok(vec![]) }
///     async fn mutate(&self, _id: &i64, _action: Action) -> Result<Patch> {
///         Ok(Patch::Deleted)
///     }
/// }
///
/// let config = Config::new().with_title("Channels").with_item_names("channel", "channels");
/// let mut channels = Model::<Channel>::new(Arc::new(Api), config).unwrap();
/// let first_page = channels.init();
/// assert!(first_page.is_some());
/// assert!(channels.is_loading());
/// ```
pub struct Model<I: Item> {
    pub(super) id: i64,
    pub(super) config: Config,
    pub(super) source: Arc<dyn ListSource<I>>,
    pub(super) buffer: GrowthBuffer<I>,
    pub(super) paginator: paginator::Model,
    pub(super) mode: Mode,
    pub(super) keyword: String,

    /// Server pages appended since the last wholesale replacement.
    pub(super) fetched_pages: usize,
    /// Set once a server page came back short.
    pub(super) frontier_exhausted: bool,
    /// Zero-based server page of the list fetch in flight.
    pub(super) page_in_flight: Option<usize>,
    /// UI page to move to once the fetch in flight lands.
    pub(super) pending_page: Option<usize>,
    /// Bumped on every wholesale replacement; list loads tagged with an
    /// older value are ignored.
    pub(super) generation: u64,

    pub(super) loading: bool,
    pub(super) searching: bool,
    pub(super) bulk_running: bool,
    pub(super) busy: HashSet<I::Id>,
    pub(super) sort: Option<SortState<I::Field>>,
    pub(super) notice: Option<Notice>,
    /// Index into the visible rows of the current page.
    pub(super) cursor: usize,

    /// Key bindings.
    pub keymap: CacheKeyMap,
    /// Styles.
    pub styles: CacheStyles,
}

impl<I: Item> Model<I> {
    /// Creates an empty cache over `source`. Nothing is fetched until
    /// [`Model::init`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] when `config` is invalid.
    pub fn new(source: Arc<dyn ListSource<I>>, config: Config) -> Result<Self> {
        config.validate()?;
        let mut paginator = paginator::Model::new()
            .with_per_page(config.per_page)
            .with_type(config.paginator_type);
        paginator.set_open_ended_items(0);

        Ok(Self {
            id: next_id(),
            config,
            source,
            buffer: GrowthBuffer::new(),
            paginator,
            mode: Mode::Paged,
            keyword: String::new(),
            fetched_pages: 0,
            frontier_exhausted: false,
            page_in_flight: None,
            pending_page: None,
            generation: 0,
            loading: false,
            searching: false,
            bulk_running: false,
            busy: HashSet::new(),
            sort: None,
            notice: None,
            cursor: 0,
            keymap: CacheKeyMap::default(),
            styles: CacheStyles::default(),
        })
    }

    /// Unique id of this instance; every message it issues carries it.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current 1-based UI page.
    pub fn page(&self) -> usize {
        self.paginator.page
    }

    /// Rows per page.
    pub fn per_page(&self) -> usize {
        self.config.per_page
    }

    /// Number of pages the pagination control offers. In paged mode this
    /// includes the synthetic trailing page that triggers the next fetch.
    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages
    }

    /// Paged or searching.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The keyword of the search currently shown; empty in paged mode.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Whether a list fetch (page, refresh or search) is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a keyword search is in flight.
    pub fn is_searching(&self) -> bool {
        self.searching
    }

    /// Whether a bulk action is in flight.
    pub fn is_bulk_running(&self) -> bool {
        self.bulk_running
    }

    /// Whether a row action on `id` is in flight.
    pub fn is_busy(&self, id: &I::Id) -> bool {
        self.busy.contains(id)
    }

    /// Server pages fetched since the last replacement.
    pub fn fetched_pages(&self) -> usize {
        self.fetched_pages
    }

    /// Every loaded row, tombstones included.
    pub fn items(&self) -> &[I] {
        self.buffer.items()
    }

    /// A copy-on-write snapshot of the loaded rows.
    pub fn snapshot(&self) -> Arc<Vec<I>> {
        self.buffer.snapshot()
    }

    /// Number of loaded rows, tombstones included.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether no rows are loaded.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Rows of the current page, tombstones filtered out.
    pub fn visible_items(&self) -> Vec<&I> {
        self.visible_rows().into_iter().map(|row| row.item).collect()
    }

    /// Rows of `page`, tombstones filtered out.
    pub fn visible_items_on(&self, page: usize) -> Vec<&I> {
        self.buffer
            .visible_rows(page, self.config.per_page)
            .into_iter()
            .map(|row| row.item)
            .collect()
    }

    /// Rows of the current page with their offsets in the unfiltered slice.
    pub fn visible_rows(&self) -> Vec<Row<'_, I>> {
        self.buffer.visible_rows(self.page(), self.config.per_page)
    }

    /// The field and direction of the last sort, if the buffer has been
    /// sorted since it was last replaced.
    pub fn sort_state(&self) -> Option<SortState<I::Field>> {
        self.sort
    }

    /// The latest notice.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Takes the latest notice, e.g. to hand it to a toast widget.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Index of the selected row among the visible rows.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The selected row, if the current page shows any.
    pub fn selected_row(&self) -> Option<Row<'_, I>> {
        self.visible_rows().get(self.cursor).copied()
    }

    /// Resizes the pagination control after the buffer changed and keeps the
    /// cursor on a visible row.
    pub(super) fn sync_pagination(&mut self) {
        match self.mode {
            Mode::Paged => self.paginator.set_open_ended_items(self.buffer.len()),
            Mode::Searching => self.paginator.set_total_items(self.buffer.len()),
        }
        self.clamp_cursor();
    }

    pub(super) fn clamp_cursor(&mut self) {
        let rows = self.visible_rows().len();
        if self.cursor >= rows {
            self.cursor = rows.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use crate::pagecache::tests::FakeSource;

    #[test]
    fn test_new_model_is_empty_on_page_one() {
        let model = Model::<Channel>::new(Arc::new(FakeSource::default()), Config::new()).unwrap();
        assert_eq!(model.page(), 1);
        assert_eq!(model.total_pages(), 1);
        assert_eq!(model.mode(), Mode::Paged);
        assert!(model.visible_items().is_empty());
        assert!(model.selected_row().is_none());
        assert!(!model.is_loading());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Model::<Channel>::new(Arc::new(FakeSource::default()), Config::new()).unwrap();
        let b = Model::<Channel>::new(Arc::new(FakeSource::default()), Config::new()).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Model::<Channel>::new(
            Arc::new(FakeSource::default()),
            Config::new().with_per_page(0),
        );
        assert!(result.is_err());
    }
}
