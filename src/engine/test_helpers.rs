//! Shared test fixtures: a scriptable in-memory provider and engine builders.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::Config;
use crate::error::ProviderError;
use crate::provider::{InstallInfo, Notification, QueryHandle, WorkshopProvider};
use crate::types::{ItemId, ItemSnapshot, ItemState, ItemStatus, RemoteDetails, TransferProgress};

use super::SyncEngine;

#[derive(Default)]
struct MockState {
    subscribed: Vec<ItemId>,
    install: HashMap<ItemId, u64>,
    states: HashMap<ItemId, ItemState>,
    progress: HashMap<ItemId, TransferProgress>,
    rejected: Vec<ItemId>,
    fail_next_query: bool,
    notifications: VecDeque<Notification>,
    next_handle: u64,
    issued_queries: Vec<(QueryHandle, Vec<ItemId>)>,
    released_queries: Vec<QueryHandle>,
    download_requests: Vec<(ItemId, bool)>,
}

/// Scriptable in-memory [`WorkshopProvider`].
///
/// Tests seed subscriptions/state up front, push notifications to be drained
/// by the pump, and inspect the calls the engine made.
#[derive(Default)]
pub(crate) struct MockProvider {
    state: Mutex<MockState>,
}

impl MockProvider {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a subscribed item. `local_updated = None` means not installed.
    pub(crate) fn add_item(&self, id: ItemId, local_updated: Option<u64>, state: ItemState) {
        let mut s = self.state.lock().unwrap();
        s.subscribed.push(id);
        if let Some(ts) = local_updated {
            s.install.insert(id, ts);
        }
        s.states.insert(id, state);
    }

    pub(crate) fn set_state(&self, id: ItemId, state: ItemState) {
        self.state.lock().unwrap().states.insert(id, state);
    }

    pub(crate) fn set_progress(&self, id: ItemId, progress: TransferProgress) {
        self.state.lock().unwrap().progress.insert(id, progress);
    }

    /// Make `request_download` reject this item.
    pub(crate) fn reject_download(&self, id: ItemId) {
        self.state.lock().unwrap().rejected.push(id);
    }

    /// Make the next `query_details` call fail synchronously.
    pub(crate) fn fail_next_query(&self) {
        self.state.lock().unwrap().fail_next_query = true;
    }

    /// Enqueue a notification for the next `poll_notifications` call.
    pub(crate) fn push_notification(&self, notification: Notification) {
        self.state
            .lock()
            .unwrap()
            .notifications
            .push_back(notification);
    }

    /// Handle and covered ids of the most recently issued query.
    pub(crate) fn last_query(&self) -> Option<(QueryHandle, Vec<ItemId>)> {
        self.state.lock().unwrap().issued_queries.last().cloned()
    }

    pub(crate) fn query_count(&self) -> usize {
        self.state.lock().unwrap().issued_queries.len()
    }

    pub(crate) fn released_queries(&self) -> Vec<QueryHandle> {
        self.state.lock().unwrap().released_queries.clone()
    }

    pub(crate) fn download_requests(&self) -> Vec<(ItemId, bool)> {
        self.state.lock().unwrap().download_requests.clone()
    }
}

#[async_trait]
impl WorkshopProvider for MockProvider {
    async fn subscribed_items(&self) -> Vec<ItemId> {
        self.state.lock().unwrap().subscribed.clone()
    }

    async fn install_info(&self, id: ItemId) -> Option<InstallInfo> {
        self.state
            .lock()
            .unwrap()
            .install
            .get(&id)
            .map(|&local_updated| InstallInfo { local_updated })
    }

    async fn item_state(&self, id: ItemId) -> ItemState {
        self.state
            .lock()
            .unwrap()
            .states
            .get(&id)
            .copied()
            .unwrap_or_default()
    }

    async fn query_details(&self, ids: &[ItemId]) -> Result<QueryHandle, ProviderError> {
        let mut s = self.state.lock().unwrap();
        if std::mem::take(&mut s.fail_next_query) {
            return Err(ProviderError::QueryFailed("scripted failure".to_string()));
        }
        s.next_handle += 1;
        let handle = QueryHandle(s.next_handle);
        s.issued_queries.push((handle, ids.to_vec()));
        Ok(handle)
    }

    async fn release_query(&self, handle: QueryHandle) {
        self.state.lock().unwrap().released_queries.push(handle);
    }

    async fn request_download(&self, id: ItemId, high_priority: bool) -> bool {
        let mut s = self.state.lock().unwrap();
        s.download_requests.push((id, high_priority));
        !s.rejected.contains(&id)
    }

    async fn download_progress(&self, id: ItemId) -> Option<TransferProgress> {
        self.state.lock().unwrap().progress.get(&id).copied()
    }

    async fn poll_notifications(&self) -> Vec<Notification> {
        self.state.lock().unwrap().notifications.drain(..).collect()
    }
}

/// Engine over a mock provider with a test-friendly config (no settle delay).
pub(crate) fn create_test_engine(provider: Arc<MockProvider>) -> SyncEngine {
    let config = Config {
        dispatch_delay_ms: 0,
        ..Default::default()
    };
    SyncEngine::new(provider, config)
}

/// Shorthand snapshot constructor for queue/dispatch tests.
pub(crate) fn snapshot(
    id: u64,
    name: &str,
    local_updated: u64,
    remote_updated: u64,
    status: ItemStatus,
) -> ItemSnapshot {
    ItemSnapshot {
        id: ItemId(id),
        name: name.to_string(),
        local_updated,
        remote_updated,
        status,
    }
}

/// Build the scripted `RemoteDetails` record for an item.
pub(crate) fn details(id: u64, title: &str, remote_updated: u64) -> RemoteDetails {
    RemoteDetails {
        id: ItemId(id),
        title: title.to_string(),
        remote_updated,
    }
}

/// Collect every event currently buffered on a subscription.
pub(crate) fn drain_events(
    rx: &mut tokio::sync::broadcast::Receiver<crate::types::Event>,
) -> Vec<crate::types::Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
