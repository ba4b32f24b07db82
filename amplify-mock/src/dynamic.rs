use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use amplify_core::{AccountEntry, AmplifyError, Cursor, FollowerPage, FollowerSource};

/// Instruction for how a page request should behave.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(AmplifyError),
    /// Hang indefinitely (simulate a stalled connection).
    Hang,
}

/// One recorded `follower_page` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Account handle requested.
    pub account: String,
    /// Cursor requested.
    pub cursor: Cursor,
    /// Page size requested.
    pub page_size: u32,
}

#[derive(Default)]
struct InternalState {
    // Queue per (account, cursor); the last queued behavior repeats.
    page_rules: HashMap<(String, Cursor), VecDeque<MockBehavior<FollowerPage>>>,
    requests: Vec<PageRequest>,
}

impl InternalState {
    fn next_behavior(&mut self, account: &str, cursor: Cursor) -> Option<MockBehavior<FollowerPage>> {
        let queue = self.page_rules.get_mut(&(account.to_string(), cursor))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Replace every behavior for `account` at `cursor` with `behavior`.
    pub async fn set_page_behavior(
        &self,
        account: &str,
        cursor: Cursor,
        behavior: MockBehavior<FollowerPage>,
    ) {
        let mut guard = self.state.lock().await;
        guard
            .page_rules
            .insert((account.to_string(), cursor), VecDeque::from([behavior]));
    }

    /// Queue `behavior` after those already set for `account` at `cursor`.
    ///
    /// Each call consumes one queued behavior; the last one keeps answering.
    pub async fn push_page_behavior(
        &self,
        account: &str,
        cursor: Cursor,
        behavior: MockBehavior<FollowerPage>,
    ) {
        let mut guard = self.state.lock().await;
        guard
            .page_rules
            .entry((account.to_string(), cursor))
            .or_default()
            .push_back(behavior);
    }

    /// Script a chain of pages for `account`, each linked to the next by its cursor.
    ///
    /// `chunks` lists `(cursor, entries)` newest first; the last page has no
    /// next cursor.
    pub async fn script_listing<I>(&self, account: &str, chunks: I)
    where
        I: IntoIterator<Item = (Cursor, Vec<AccountEntry>)>,
    {
        let chunks: Vec<_> = chunks.into_iter().collect();
        let mut guard = self.state.lock().await;
        for (i, (cursor, entries)) in chunks.iter().enumerate() {
            let page = FollowerPage {
                entries: entries.clone(),
                next_cursor: chunks.get(i + 1).map(|(next, _)| *next),
            };
            guard.page_rules.insert(
                (account.to_string(), *cursor),
                VecDeque::from([MockBehavior::Return(page)]),
            );
        }
    }

    /// Return a copy of the request log.
    pub async fn requests(&self) -> Vec<PageRequest> {
        self.state.lock().await.requests.clone()
    }

    /// Clear all configured behaviors and request logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.page_rules.clear();
        guard.requests.clear();
    }
}

/// A follower source that defers all behavior to an external controller.
///
/// Requests with no configured behavior fail with `NotFound`.
pub struct DynamicMockSource {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockSource {
    /// Create a new dynamic mock source and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn FollowerSource>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn FollowerSource>, controller)
    }
}

#[async_trait]
impl FollowerSource for DynamicMockSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn follower_page(
        &self,
        account: &str,
        cursor: Cursor,
        page_size: u32,
    ) -> Result<FollowerPage, AmplifyError> {
        // Take the behavior snapshot without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.requests.push(PageRequest {
                account: account.to_string(),
                cursor,
                page_size,
            });
            guard.next_behavior(account, cursor)
        };
        match behavior {
            Some(MockBehavior::Return(page)) => Ok(page),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => std::future::pending().await,
            None => Err(AmplifyError::not_found(format!(
                "page of {account} at cursor {cursor}"
            ))),
        }
    }
}
