use super::*;
use crate::channel::{Channel, ChannelField};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::token::Token;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// In-memory list service that records what was asked of it.
#[derive(Default)]
pub(crate) struct FakeSource {
    pub pages: Vec<Vec<Channel>>,
    pub results: HashMap<String, Vec<Channel>>,
    pub failing_pages: Mutex<HashSet<usize>>,
    pub fail_mutations: bool,
    pub requested: Mutex<Vec<usize>>,
    pub searches: Mutex<Vec<String>>,
    pub mutations: Mutex<Vec<(i64, Action)>>,
}

impl FakeSource {
    fn with_pages(pages: Vec<Vec<i64>>) -> Self {
        Self {
            pages: pages.into_iter().map(|ids| channels(&ids)).collect(),
            ..Self::default()
        }
    }

    fn requested(&self) -> Vec<usize> {
        self.requested.lock().unwrap().clone()
    }

    fn mutation_count(&self) -> usize {
        self.mutations.lock().unwrap().len()
    }
}

#[async_trait]
impl ListSource<Channel> for FakeSource {
    async fn fetch_page(&self, page: usize) -> Result<Vec<Channel>> {
        self.requested.lock().unwrap().push(page);
        if self.failing_pages.lock().unwrap().contains(&page) {
            return Err(Error::Remote("page unavailable".to_string()));
        }
        Ok(self.pages.get(page).cloned().unwrap_or_default())
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Channel>> {
        self.searches.lock().unwrap().push(keyword.to_string());
        Ok(self.results.get(keyword).cloned().unwrap_or_default())
    }

    async fn mutate(&self, id: &i64, action: Action) -> Result<Patch> {
        self.mutations.lock().unwrap().push((*id, action));
        if self.fail_mutations {
            return Err(Error::Remote("channel is locked".to_string()));
        }
        Ok(match action {
            Action::Enable => Patch::Status(Status::Enabled),
            Action::Disable => Patch::Status(Status::Disabled),
            Action::Delete => Patch::Deleted,
            Action::Test => Patch::Tested {
                response_time_ms: 420,
                tested_at: 1_700_000_000,
            },
            Action::RefreshBalance => Patch::Balance {
                balance: 7.5,
                updated_at: 1_700_000_000,
            },
        })
    }

    async fn bulk(&self, action: BulkAction) -> Result<String> {
        match action {
            BulkAction::TestAll => Ok(String::new()),
            BulkAction::RefreshAllBalances => Ok("12 balances updated".to_string()),
        }
    }
}

/// Token service without bulk support.
struct TokenSource;

#[async_trait]
impl ListSource<Token> for TokenSource {
    async fn fetch_page(&self, _page: usize) -> Result<Vec<Token>> {
        Ok(vec![Token::new(1, "default")])
    }

    async fn search(&self, _keyword: &str) -> Result<Vec<Token>> {
        Ok(Vec::new())
    }

    async fn mutate(&self, _id: &i64, _action: Action) -> Result<Patch> {
        Ok(Patch::Deleted)
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn channels(ids: &[i64]) -> Vec<Channel> {
    ids.iter()
        .map(|&id| Channel::new(id, format!("ch-{}", id)))
        .collect()
}

fn ids(items: &[&Channel]) -> Vec<i64> {
    items.iter().map(|c| c.id).collect()
}

fn buffer_ids(model: &Model<Channel>) -> Vec<i64> {
    model.items().iter().map(|c| c.id).collect()
}

fn model(source: &Arc<FakeSource>, per_page: usize) -> Model<Channel> {
    let config = Config::new()
        .with_per_page(per_page)
        .with_title("Channels")
        .with_item_names("channel", "channels");
    Model::new(Arc::clone(source) as Arc<dyn ListSource<Channel>>, config).unwrap()
}

fn key(code: KeyCode) -> Msg {
    Box::new(KeyMsg {
        key: code,
        modifiers: KeyModifiers::NONE,
    }) as Msg
}

/// Runs `cmd` and every command its message produces.
async fn drive<I: Item>(model: &mut Model<I>, cmd: Option<Cmd>) {
    let mut next = cmd;
    while let Some(cmd) = next.take() {
        next = match cmd.await {
            Some(msg) => model.update(msg),
            None => None,
        };
    }
}

fn plain(s: &str) -> String {
    String::from_utf8(strip_ansi_escapes::strip(s)).unwrap()
}

#[tokio::test]
async fn test_init_loads_first_server_page() {
    init_logger();
    let source = Arc::new(FakeSource::with_pages(vec![vec![5, 3]]));
    let mut m = model(&source, 2);

    let cmd = m.init();
    assert!(m.is_loading());
    drive(&mut m, cmd).await;

    assert!(!m.is_loading());
    assert_eq!(source.requested(), vec![0]);
    assert_eq!(ids(&m.visible_items()), vec![5, 3]);
    assert_eq!(m.fetched_pages(), 1);
    // exact multiple: a trailing page is offered
    assert_eq!(m.total_pages(), 2);
}

#[tokio::test]
async fn test_each_server_page_requested_once_in_order() {
    init_logger();
    let source = Arc::new(FakeSource::with_pages(vec![
        vec![10, 9],
        vec![8, 7],
        vec![6, 5],
        vec![4],
    ]));
    let mut m = model(&source, 2);
    let cmd = m.init();
    drive(&mut m, cmd).await;

    for target in 2..=5 {
        let cmd = m.ensure_loaded(target);
        drive(&mut m, cmd).await;
        // asking again for a loaded page is a no-op
        assert!(m.ensure_loaded(target).is_none());
    }

    assert_eq!(source.requested(), vec![0, 1, 2, 3]);
    assert_eq!(m.len(), 7);
    assert_eq!(buffer_ids(&m), vec![10, 9, 8, 7, 6, 5, 4]);
}

#[tokio::test]
async fn test_page_in_flight_is_not_requested_twice() {
    let source = Arc::new(FakeSource::with_pages(vec![vec![2, 1]]));
    let mut m = model(&source, 2);
    let first = m.init();
    assert!(first.is_some());
    assert!(m.init().is_none());
    assert!(m.ensure_loaded(3).is_none());
    drive(&mut m, first).await;
    assert_eq!(source.requested(), vec![0]);
}

#[tokio::test]
async fn test_next_page_past_frontier_fetches_then_moves() {
    init_logger();
    let source = Arc::new(FakeSource::with_pages(vec![vec![5, 3], vec![1]]));
    let mut m = model(&source, 2);
    let cmd = m.init();
    drive(&mut m, cmd).await;

    let cmd = m.goto_page(2);
    assert!(cmd.is_some());
    assert_eq!(m.page(), 1);
    drive(&mut m, cmd).await;

    assert_eq!(m.page(), 2);
    assert_eq!(ids(&m.visible_items()), vec![1]);
    assert_eq!(m.total_pages(), 2);
    // the short page ended the list
    assert!(m.ensure_loaded(3).is_none());
    assert_eq!(source.requested(), vec![0, 1]);

    // going back never refetches
    assert!(m.goto_page(1).is_none());
    assert_eq!(ids(&m.visible_items()), vec![5, 3]);
    assert_eq!(source.requested(), vec![0, 1]);
}

#[tokio::test]
async fn test_failed_page_leaves_buffer_and_page_alone() {
    init_logger();
    let source = Arc::new(FakeSource::with_pages(vec![vec![5, 3], vec![1]]));
    source.failing_pages.lock().unwrap().insert(1);
    let mut m = model(&source, 2);
    let cmd = m.init();
    drive(&mut m, cmd).await;

    let cmd = m.goto_page(2);
    drive(&mut m, cmd).await;

    assert_eq!(m.page(), 1);
    assert_eq!(m.len(), 2);
    assert_eq!(m.fetched_pages(), 1);
    assert_eq!(
        m.notice(),
        Some(&Notice::Error("page unavailable".to_string()))
    );

    // the same server page can be retried
    source.failing_pages.lock().unwrap().clear();
    let cmd = m.goto_page(2);
    drive(&mut m, cmd).await;
    assert_eq!(m.page(), 2);
    assert_eq!(source.requested(), vec![0, 1, 1]);
}

#[tokio::test]
async fn test_scenario_three_rows_two_per_page() {
    init_logger();
    let source = Arc::new(FakeSource::with_pages(vec![vec![5, 3], vec![1]]));
    let mut m = model(&source, 2);
    let cmd = m.init();
    drive(&mut m, cmd).await;
    let cmd = m.ensure_loaded(2);
    drive(&mut m, cmd).await;

    assert_eq!(ids(&m.visible_items_on(1)), vec![5, 3]);
    assert_eq!(ids(&m.visible_items_on(2)), vec![1]);
    assert_eq!(m.total_pages(), 2);

    let cmd = m.apply_action(&3, Action::Delete, 1, 1).unwrap();
    drive(&mut m, cmd).await;

    assert_eq!(ids(&m.visible_items_on(1)), vec![5]);
    assert_eq!(m.len(), 3);
    assert!(m.items()[1].deleted);
}

#[tokio::test]
async fn test_delete_touches_only_its_index() {
    let source = Arc::new(FakeSource::with_pages(vec![vec![4, 3, 2]]));
    let mut m = model(&source, 3);
    let cmd = m.init();
    drive(&mut m, cmd).await;
    let before = m.snapshot();

    let cmd = m.apply_action(&3, Action::Delete, 1, 1).unwrap();
    drive(&mut m, cmd).await;

    let after = m.items();
    assert_eq!(after.len(), before.len());
    for (i, (old, new)) in before.iter().zip(after).enumerate() {
        if i == 1 {
            assert!(new.deleted);
        } else {
            assert_eq!(old, new);
        }
    }
    // the snapshot taken earlier is unaffected
    assert!(!before[1].deleted);
    assert_eq!(
        m.notice(),
        Some(&Notice::Success("Operation completed successfully".to_string()))
    );
}

#[tokio::test]
async fn test_enable_then_disable_matches_single_disable() {
    let source = Arc::new(FakeSource::with_pages(vec![vec![1, 2]]));
    let mut m = model(&source, 2);
    let cmd = m.init();
    drive(&mut m, cmd).await;

    let cmd = m.apply_action(&1, Action::Enable, 1, 0).unwrap();
    drive(&mut m, cmd).await;
    let cmd = m.apply_action(&1, Action::Disable, 1, 0).unwrap();
    drive(&mut m, cmd).await;
    let cmd = m.apply_action(&2, Action::Disable, 1, 1).unwrap();
    drive(&mut m, cmd).await;

    assert_eq!(m.items()[0].status, Status::Disabled);
    assert_eq!(m.items()[0].status, m.items()[1].status);
    assert_eq!(source.requested(), vec![0]);
}

#[tokio::test]
async fn test_action_offsets_count_tombstones() {
    let source = Arc::new(FakeSource::with_pages(vec![vec![4, 3, 2, 1]]));
    let mut m = model(&source, 4);
    let cmd = m.init();
    drive(&mut m, cmd).await;

    let cmd = m.apply_action(&3, Action::Delete, 1, 1).unwrap();
    drive(&mut m, cmd).await;

    let rows = m.visible_rows();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].item.id, 2);
    assert_eq!(rows[1].offset, 2);
    let offset = rows[1].offset;

    let cmd = m.apply_action(&2, Action::Disable, 1, offset).unwrap();
    drive(&mut m, cmd).await;
    assert_eq!(m.items()[2].status, Status::Disabled);
}

#[tokio::test]
async fn test_test_and_balance_write_back() {
    let source = Arc::new(FakeSource::with_pages(vec![vec![1]]));
    let mut m = model(&source, 2);
    let cmd = m.init();
    drive(&mut m, cmd).await;

    let cmd = m.apply_action(&1, Action::Test, 1, 0).unwrap();
    drive(&mut m, cmd).await;
    assert_eq!(m.items()[0].response_time, 420);
    assert_eq!(m.items()[0].test_time, 1_700_000_000);
    assert_eq!(
        m.notice(),
        Some(&Notice::Info(
            "Test of channel 1 succeeded in 0.42 s".to_string()
        ))
    );

    let cmd = m.apply_action(&1, Action::RefreshBalance, 1, 0).unwrap();
    drive(&mut m, cmd).await;
    assert_eq!(m.items()[0].balance, 7.5);
    assert!(matches!(m.take_notice(), Some(Notice::Success(_))));
    assert!(m.notice().is_none());
}

#[tokio::test]
async fn test_invariant_violations_skip_the_remote_call() {
    init_logger();
    let source = Arc::new(FakeSource::with_pages(vec![vec![5, 3], vec![1]]));
    let mut m = model(&source, 2);
    let cmd = m.init();
    drive(&mut m, cmd).await;

    let err = m.apply_action(&5, Action::Delete, 3, 0).err().unwrap();
    assert_eq!(err, Error::IndexOutOfBounds { index: 4, len: 2 });

    let err = m.apply_action(&5, Action::Delete, 1, 1).err().unwrap();
    assert_eq!(
        err,
        Error::IdentityMismatch {
            index: 1,
            expected: "5".to_string()
        }
    );

    assert_eq!(source.mutation_count(), 0);
    assert!(m.notice().is_none());
    assert!(m.items().iter().all(|c| !c.deleted));
}

#[tokio::test]
async fn test_overflowing_position_is_out_of_bounds() {
    init_logger();
    let source = Arc::new(FakeSource::with_pages(vec![vec![5, 3], vec![1]]));
    let mut m = model(&source, 2);
    let cmd = m.init();
    drive(&mut m, cmd).await;

    let err = m
        .apply_action(&5, Action::Delete, usize::MAX, 0)
        .err()
        .unwrap();
    assert_eq!(
        err,
        Error::IndexOutOfBounds {
            index: usize::MAX,
            len: 2
        }
    );
    let err = m
        .apply_action(&5, Action::Delete, 2, usize::MAX)
        .err()
        .unwrap();
    assert!(err.is_invariant_violation());

    assert_eq!(source.mutation_count(), 0);
    assert!(m.notice().is_none());
    assert!(m.items().iter().all(|c| !c.deleted));
}

#[tokio::test]
async fn test_failed_action_leaves_buffer_untouched() {
    let source = Arc::new(FakeSource {
        fail_mutations: true,
        ..FakeSource::with_pages(vec![vec![1, 2]])
    });
    let mut m = model(&source, 2);
    let cmd = m.init();
    drive(&mut m, cmd).await;
    let before = m.snapshot();

    let cmd = m.apply_action(&2, Action::Delete, 1, 1).unwrap();
    drive(&mut m, cmd).await;

    assert_eq!(m.items(), before.as_slice());
    assert_eq!(
        m.notice(),
        Some(&Notice::Error("channel is locked".to_string()))
    );
    assert!(!m.is_busy(&2));
}

#[tokio::test]
async fn test_busy_row_ignores_second_action() {
    let source = Arc::new(FakeSource::with_pages(vec![vec![1, 2]]));
    let mut m = model(&source, 2);
    let cmd = m.init();
    drive(&mut m, cmd).await;

    let first = m.apply_action(&1, Action::Disable, 1, 0).unwrap();
    assert!(m.is_busy(&1));
    assert!(!m.is_busy(&2));
    assert!(m.apply_action(&1, Action::Delete, 1, 0).unwrap().is_none());

    // other rows stay interactive
    let other = m.apply_action(&2, Action::Disable, 1, 1).unwrap();
    assert!(other.is_some());

    drive(&mut m, first).await;
    drive(&mut m, other).await;
    assert!(!m.is_busy(&1));
    assert_eq!(source.mutation_count(), 2);
    assert!(!m.items()[0].deleted);
}

#[tokio::test]
async fn test_write_back_follows_row_after_sort() {
    let source = Arc::new(FakeSource::with_pages(vec![vec![1, 2, 3]]));
    let mut m = model(&source, 3);
    let cmd = m.init();
    drive(&mut m, cmd).await;

    let cmd = m.apply_action(&1, Action::Disable, 1, 0).unwrap();
    m.sort_by(ChannelField::Id);
    m.sort_by(ChannelField::Id);
    assert_eq!(buffer_ids(&m), vec![3, 2, 1]);
    drive(&mut m, cmd).await;

    assert_eq!(m.items()[2].status, Status::Disabled);
    assert_eq!(m.items()[0].status, Status::Enabled);
}

#[tokio::test]
async fn test_write_back_dropped_when_row_is_gone() {
    init_logger();
    let mut source = FakeSource::with_pages(vec![vec![1, 2]]);
    source.results.insert("x".to_string(), channels(&[9]));
    let source = Arc::new(source);
    let mut m = model(&source, 2);
    let cmd = m.init();
    drive(&mut m, cmd).await;

    let action = m.apply_action(&1, Action::Delete, 1, 0).unwrap();
    let search = m.submit_search("x");
    drive(&mut m, Some(search)).await;
    drive(&mut m, action).await;

    assert_eq!(buffer_ids(&m), vec![9]);
    assert!(!m.items()[0].deleted);
}

#[tokio::test]
async fn test_sort_twice_gives_exact_reverse() {
    let source = Arc::new(FakeSource::with_pages(vec![vec![9, 10, 2, 33]]));
    let mut m = model(&source, 4);
    let cmd = m.init();
    drive(&mut m, cmd).await;

    m.sort_by(ChannelField::Id);
    let ascending = buffer_ids(&m);
    assert_eq!(ascending, vec![10, 2, 33, 9]);
    assert_eq!(
        m.sort_state(),
        Some(SortState {
            field: ChannelField::Id,
            direction: SortDirection::Ascending
        })
    );

    m.sort_by(ChannelField::Id);
    let mut reversed = ascending.clone();
    reversed.reverse();
    assert_eq!(buffer_ids(&m), reversed);

    // switching field starts ascending again
    m.sort_by(ChannelField::Name);
    assert_eq!(
        m.sort_state().map(|s| s.direction),
        Some(SortDirection::Ascending)
    );
}

#[tokio::test]
async fn test_sort_on_empty_buffer_is_noop() {
    let source = Arc::new(FakeSource::default());
    let mut m = model(&source, 2);
    m.sort_by(ChannelField::Name);
    assert!(m.sort_state().is_none());
}

#[tokio::test]
async fn test_search_replaces_buffer_and_stops_paging() {
    init_logger();
    let mut source = FakeSource::with_pages(vec![vec![1, 2], vec![3, 4]]);
    source.results.insert("abc".to_string(), channels(&[7, 8, 9]));
    let source = Arc::new(source);
    let mut m = model(&source, 2);
    let cmd = m.init();
    drive(&mut m, cmd).await;
    let cmd = m.goto_page(2);
    drive(&mut m, cmd).await;
    m.sort_by(ChannelField::Name);

    let cmd = m.submit_search("  abc ");
    assert!(m.is_searching());
    assert!(m.is_loading());
    drive(&mut m, Some(cmd)).await;

    assert!(!m.is_searching());
    assert_eq!(m.mode(), Mode::Searching);
    assert_eq!(m.keyword(), "abc");
    assert_eq!(buffer_ids(&m), vec![7, 8, 9]);
    assert_eq!(m.page(), 1);
    assert!(m.sort_state().is_none());
    assert_eq!(source.searches.lock().unwrap().clone(), vec!["abc"]);

    // search results are complete: no synthetic page, no fetches
    assert_eq!(m.total_pages(), 2);
    assert!(m.goto_page(2).is_none());
    assert_eq!(m.page(), 2);
    assert!(m.goto_page(3).is_none());
    assert!(m.ensure_loaded(5).is_none());
    assert_eq!(source.requested(), vec![0, 1]);
}

#[tokio::test]
async fn test_empty_keyword_restores_paged_mode() {
    init_logger();
    let mut source = FakeSource::with_pages(vec![vec![1, 2], vec![3]]);
    source.results.insert("abc".to_string(), channels(&[7]));
    let source = Arc::new(source);
    let mut m = model(&source, 2);
    let cmd = m.init();
    drive(&mut m, cmd).await;
    let cmd = m.submit_search("abc");
    drive(&mut m, Some(cmd)).await;

    let cmd = m.submit_search("   ");
    // emptied at once, refilled when page 0 arrives
    assert!(m.is_empty());
    assert_eq!(m.mode(), Mode::Paged);
    assert!(m.is_loading());
    drive(&mut m, Some(cmd)).await;

    assert_eq!(buffer_ids(&m), vec![1, 2]);
    assert_eq!(m.page(), 1);
    assert_eq!(m.keyword(), "");
    assert_eq!(source.requested(), vec![0, 0]);

    // paging resumes from server page 1
    let cmd = m.goto_page(2);
    drive(&mut m, cmd).await;
    assert_eq!(buffer_ids(&m), vec![1, 2, 3]);
    assert_eq!(source.requested(), vec![0, 0, 1]);
}

#[tokio::test]
async fn test_stale_page_after_search_is_ignored() {
    let mut source = FakeSource::with_pages(vec![vec![1, 2], vec![3, 4]]);
    source.results.insert("abc".to_string(), channels(&[7]));
    let source = Arc::new(source);
    let mut m = model(&source, 2);
    let cmd = m.init();
    drive(&mut m, cmd).await;

    let page = m.goto_page(2);
    let search = m.submit_search("abc");
    drive(&mut m, Some(search)).await;
    drive(&mut m, page).await;

    assert_eq!(buffer_ids(&m), vec![7]);
    assert_eq!(m.mode(), Mode::Searching);
    assert_eq!(m.page(), 1);
}

#[tokio::test]
async fn test_refresh_returns_to_first_page() {
    let source = Arc::new(FakeSource::with_pages(vec![vec![1, 2], vec![3, 4]]));
    let mut m = model(&source, 2);
    let cmd = m.init();
    drive(&mut m, cmd).await;
    let cmd = m.goto_page(2);
    drive(&mut m, cmd).await;
    m.sort_by(ChannelField::Id);
    assert_eq!(m.page(), 2);

    let cmd = m.refresh();
    assert!(m.is_loading());
    drive(&mut m, Some(cmd)).await;

    assert_eq!(m.page(), 1);
    assert_eq!(buffer_ids(&m), vec![1, 2]);
    assert_eq!(m.fetched_pages(), 1);
    assert!(m.sort_state().is_none());
    assert_eq!(source.requested(), vec![0, 1, 0]);
}

#[tokio::test]
async fn test_failed_refresh_keeps_buffer() {
    let source = Arc::new(FakeSource::with_pages(vec![vec![1, 2]]));
    let mut m = model(&source, 2);
    let cmd = m.init();
    drive(&mut m, cmd).await;

    source.failing_pages.lock().unwrap().insert(0);
    let cmd = m.refresh();
    drive(&mut m, Some(cmd)).await;

    assert_eq!(buffer_ids(&m), vec![1, 2]);
    assert!(!m.is_loading());
    assert!(m.notice().map(Notice::is_error).unwrap_or(false));
}

#[tokio::test]
async fn test_messages_for_other_instances_are_ignored() {
    let source = Arc::new(FakeSource::with_pages(vec![vec![1, 2]]));
    let mut a = model(&source, 2);
    let mut b = model(&source, 2);

    let cmd = a.init();
    let msg = cmd.unwrap().await.unwrap();
    assert!(b.update(msg).is_none());
    assert!(b.is_empty());
    assert!(a.is_loading());
}

#[tokio::test]
async fn test_bulk_actions_report_without_touching_buffer() {
    let source = Arc::new(FakeSource::with_pages(vec![vec![1, 2]]));
    let mut m = model(&source, 2);
    let cmd = m.init();
    drive(&mut m, cmd).await;
    let before = m.snapshot();

    let cmd = m.run_bulk(BulkAction::TestAll);
    assert!(m.is_bulk_running());
    assert!(m.run_bulk(BulkAction::TestAll).is_none());
    drive(&mut m, cmd).await;
    assert!(!m.is_bulk_running());
    assert_eq!(
        m.notice(),
        Some(&Notice::Info(
            BulkAction::TestAll.default_notice().to_string()
        ))
    );

    let cmd = m.run_bulk(BulkAction::RefreshAllBalances);
    drive(&mut m, cmd).await;
    assert_eq!(
        m.notice(),
        Some(&Notice::Info("12 balances updated".to_string()))
    );
    assert_eq!(m.items(), before.as_slice());
}

#[tokio::test]
async fn test_bulk_unsupported_by_default() {
    let mut m = Model::<Token>::new(Arc::new(TokenSource), Config::new()).unwrap();
    let cmd = m.init();
    drive(&mut m, cmd).await;
    assert_eq!(m.len(), 1);

    let cmd = m.run_bulk(BulkAction::TestAll);
    drive(&mut m, cmd).await;
    assert!(matches!(m.notice(), Some(Notice::Error(msg)) if msg.contains("unsupported")));
}

#[tokio::test]
async fn test_keys_drive_paging_and_row_actions() {
    init_logger();
    let source = Arc::new(FakeSource::with_pages(vec![vec![5, 3], vec![1]]));
    let mut m = model(&source, 2);
    let cmd = m.init();
    drive(&mut m, cmd).await;

    let cmd = m.update(key(KeyCode::Down));
    assert!(cmd.is_none());
    assert_eq!(m.selected_row().map(|r| r.item.id), Some(3));
    let cmd = m.update(key(KeyCode::Down));
    assert!(cmd.is_none());
    assert_eq!(m.cursor(), 1);

    let cmd = m.update(key(KeyCode::Char('x')));
    drive(&mut m, cmd).await;
    assert!(m.items()[1].deleted);
    assert_eq!(m.cursor(), 0);

    let cmd = m.update(key(KeyCode::Char('l')));
    drive(&mut m, cmd).await;
    assert_eq!(m.page(), 2);
    assert_eq!(ids(&m.visible_items()), vec![1]);

    let cmd = m.update(key(KeyCode::Char('d')));
    drive(&mut m, cmd).await;
    assert_eq!(m.items()[2].status, Status::Disabled);

    let cmd = m.update(key(KeyCode::Left));
    drive(&mut m, cmd).await;
    assert_eq!(m.page(), 1);

    let cmd = m.update(key(KeyCode::Char('r')));
    assert!(cmd.is_some());
    drive(&mut m, cmd).await;
    assert_eq!(source.requested(), vec![0, 1, 0]);
}

#[tokio::test]
async fn test_view_shows_rows_and_status() {
    let source = Arc::new(FakeSource::with_pages(vec![vec![5, 3], vec![1]]));
    let mut m = model(&source, 2);
    assert!(plain(&m.view()).contains("No channels."));

    let cmd = m.init();
    assert!(plain(&m.view()).contains("Loading…"));
    drive(&mut m, cmd).await;

    let cmd = m.apply_action(&3, Action::Disable, 1, 1).unwrap();
    let view = plain(&m.view());
    assert!(view.contains("Channels"));
    assert!(view.contains("> activated"));
    assert!(view.contains("#5 ch-5"));
    assert!(view.contains("not tested"));
    assert!(view.contains("…"));
    assert!(view.contains("1/2"));
    assert!(view.contains("2 channels loaded"));
    drive(&mut m, cmd).await;

    let view = plain(&m.view());
    assert!(view.contains("disabled"));
    assert!(view.contains("Operation completed successfully"));
    assert!(view.contains("x delete"));
}

#[tokio::test]
async fn test_view_shows_search_keyword() {
    let mut source = FakeSource::default();
    source.results.insert("gpt".to_string(), channels(&[4]));
    let source = Arc::new(source);
    let mut m = model(&source, 2);
    let cmd = m.submit_search("gpt");
    drive(&mut m, Some(cmd)).await;

    let view = plain(&m.view());
    assert!(view.contains("search: gpt"));
    assert!(view.contains("1 channel found"));
    assert!(view.contains("1/1"));
}
