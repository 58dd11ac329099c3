//! Core reconciliation and download-orchestration engine.
//!
//! The [`SyncEngine`] struct and its methods are organized by domain:
//! - [`comparison`] - Local/remote reconciliation and snapshot merging
//! - [`queue`] - Update-batch selection
//! - [`dispatch`] - Single-in-flight dispatch, progress, and completion
//! - [`runner`] - The cooperative control loop
//!
//! All engine state is owned by one instance and mutated through `&mut self`
//! on a single task: provider notifications are polled and handled inside the
//! same loop iteration that advances the orchestrator, so no locking is
//! needed anywhere in the core. Steady-state failures (empty enumeration,
//! failed query, rejected dispatch, stale or spurious notifications) degrade
//! to logged no-ops; nothing here panics or breaks the loop.

mod comparison;
mod dispatch;
mod queue;
mod runner;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::provider::{Notification, QueryHandle, WorkshopProvider};
use crate::types::{Command, Event, ItemId, ItemSnapshot};

/// Follow-up action attached to an outstanding comparison request.
///
/// Recorded when a queue command arrives before any listing has happened;
/// consumed exactly once when that comparison's results are merged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingAction {
    /// Build the queue from items with pending updates
    QueuePending,
    /// Build the queue from every subscribed item
    QueueAll,
}

/// The outstanding batched metadata query, if any, with its continuation
#[derive(Debug)]
pub(crate) struct ActiveQuery {
    pub(crate) handle: QueryHandle,
    pub(crate) follow_up: Option<PendingAction>,
}

/// Reconciliation and download-orchestration engine.
///
/// Owns the snapshot collection, the FIFO download queue, and the
/// at-most-one in-flight marker. Intended to be owned by its control loop
/// ([`SyncEngine::run`]); all methods take `&mut self` and are safe to call
/// in any order.
pub struct SyncEngine {
    /// Remote content service binding
    pub(crate) provider: Arc<dyn WorkshopProvider>,
    /// Engine configuration
    pub(crate) config: Config,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    /// Snapshot collection, rebuilt by each comparison
    pub(crate) snapshots: Vec<ItemSnapshot>,
    /// FIFO download queue, rebuilt by each batch selection
    pub(crate) queue: VecDeque<ItemId>,
    /// The single item currently downloading, if any
    pub(crate) in_flight: Option<ItemId>,
    /// Outstanding metadata query and its one-shot continuation
    pub(crate) active_query: Option<ActiveQuery>,
    /// Earliest instant the next dispatch may happen (settle delay)
    pub(crate) settle_until: Option<Instant>,
}

impl SyncEngine {
    /// Create a new engine over the given provider binding.
    ///
    /// A zero `event_channel_capacity` (rejected by [`Config::validate`],
    /// but constructible by hand) is clamped to 1 rather than panicking.
    pub fn new(provider: Arc<dyn WorkshopProvider>, config: Config) -> Self {
        let (event_tx, _) = tokio::sync::broadcast::channel(config.event_channel_capacity.max(1));
        Self {
            provider,
            config,
            event_tx,
            snapshots: Vec::new(),
            queue: VecDeque::new(),
            in_flight: None,
            active_query: None,
            settle_until: None,
        }
    }

    /// Subscribe to engine events (table renders, progress lines, batch lifecycle).
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Current snapshot collection, in render order.
    pub fn snapshots(&self) -> &[ItemSnapshot] {
        &self.snapshots
    }

    /// Identifiers still awaiting dispatch in the current batch.
    pub fn queued(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.queue.iter().copied()
    }

    /// Number of items still awaiting dispatch.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// The item currently downloading, if any.
    pub fn in_flight(&self) -> Option<ItemId> {
        self.in_flight
    }

    /// Dispatch one provider notification to its handler.
    pub async fn handle_notification(&mut self, notification: Notification) {
        match notification {
            Notification::QueryCompleted { handle, outcome } => {
                self.handle_query_completed(handle, outcome).await;
            }
            Notification::DownloadFinished { id } => {
                self.handle_download_finished(id).await;
            }
        }
    }

    /// Dispatch one user command.
    ///
    /// `Quit` is a loop concern and is ignored here; [`SyncEngine::run`]
    /// exits before this method sees it.
    pub async fn handle_command(&mut self, command: Command) {
        match command {
            Command::List => self.request_comparison(None).await,
            Command::QueuePendingUpdates => {
                if self.snapshots.is_empty() {
                    self.request_comparison(Some(PendingAction::QueuePending))
                        .await;
                } else {
                    self.build_queue(false);
                }
            }
            Command::QueueAll => {
                if self.snapshots.is_empty() {
                    self.request_comparison(Some(PendingAction::QueueAll)).await;
                } else {
                    self.build_queue(true);
                }
            }
            Command::Quit => {}
        }
    }

    /// Broadcast an event, ignoring the no-subscribers case.
    pub(crate) fn emit(&self, event: Event) {
        let _ = self.event_tx.send(event);
    }
}
