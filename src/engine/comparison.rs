//! Local/remote reconciliation: comparison requests and snapshot merging.

use crate::error::ProviderError;
use crate::provider::QueryHandle;
use crate::types::{Event, ItemSnapshot, ItemStatus, PLACEHOLDER_NAME, RemoteDetails};

use super::{ActiveQuery, PendingAction, SyncEngine};

impl SyncEngine {
    /// Rebuild the snapshot collection from local state and issue one
    /// batched remote metadata query.
    ///
    /// Local fields (install time, derived status) are populated
    /// synchronously before this returns; names and remote timestamps arrive
    /// atomically when the query completes. Safe to call while a previous
    /// query is outstanding: the collection is cleared and rebuilt, and only
    /// the newest query's completion is applied (last-completed-wins).
    ///
    /// A `follow_up` action, if given, is attached to the issued query and
    /// consumed exactly once in the completion handler. With zero
    /// subscriptions or a failed query issue, the follow-up is dropped.
    pub async fn request_comparison(&mut self, follow_up: Option<PendingAction>) {
        let ids = self.provider.subscribed_items().await;
        if ids.is_empty() {
            tracing::info!("no subscribed items, skipping comparison");
            return;
        }

        self.snapshots.clear();
        for &id in &ids {
            let state = self.provider.item_state(id).await;
            let local_updated = self
                .provider
                .install_info(id)
                .await
                .map(|info| info.local_updated)
                .unwrap_or(0);

            self.snapshots.push(ItemSnapshot {
                id,
                name: PLACEHOLDER_NAME.to_string(),
                local_updated,
                remote_updated: 0,
                status: ItemStatus::from_state(state),
            });
        }

        match self.provider.query_details(&ids).await {
            Ok(handle) => {
                tracing::debug!(%handle, count = ids.len(), "issued remote metadata query");
                self.active_query = Some(ActiveQuery { handle, follow_up });
                self.emit(Event::Fetching { count: ids.len() });
            }
            Err(e) => {
                // Collection keeps its local-only data; nothing to merge later
                tracing::warn!(error = %e, "remote metadata query could not be issued");
                self.active_query = None;
            }
        }
    }

    /// Merge a completed metadata query into the snapshot collection.
    ///
    /// Completions for any query other than the most recently issued one are
    /// stale generations and are released without touching the collection.
    /// A failed result leaves the local-only snapshots in place.
    pub async fn handle_query_completed(
        &mut self,
        handle: QueryHandle,
        outcome: Result<Vec<RemoteDetails>, ProviderError>,
    ) {
        let Some(active) = self.active_query.take() else {
            tracing::debug!(%handle, "query completion with no comparison outstanding, ignoring");
            self.provider.release_query(handle).await;
            return;
        };
        if active.handle != handle {
            tracing::debug!(
                stale = %handle,
                current = %active.handle,
                "query completion for a superseded comparison, ignoring"
            );
            self.active_query = Some(active);
            self.provider.release_query(handle).await;
            return;
        }

        let details = match outcome {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(error = %e, "remote metadata query failed");
                self.provider.release_query(handle).await;
                return;
            }
        };

        for detail in details {
            // Bounded by the subscription count, linear scan is fine
            if let Some(snapshot) = self.snapshots.iter_mut().find(|s| s.id == detail.id) {
                snapshot.remote_updated = detail.remote_updated;
                snapshot.name = detail.title;
            }
        }

        self.snapshots
            .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        self.emit(Event::Table {
            snapshots: self.snapshots.clone(),
        });

        match active.follow_up {
            Some(PendingAction::QueuePending) => self.build_queue(false),
            Some(PendingAction::QueueAll) => self.build_queue(true),
            None => {}
        }

        self.provider.release_query(handle).await;
    }
}
