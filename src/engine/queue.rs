//! Update-batch selection.

use crate::types::Event;

use super::SyncEngine;

impl SyncEngine {
    /// Rebuild the download queue from the current snapshot collection.
    ///
    /// With `force_all` every snapshot is included; otherwise an item is
    /// included iff its remote revision is newer than the local install or
    /// the provider already flagged it as needing an update. Inclusion order
    /// follows the collection's current (alphabetical) order.
    ///
    /// The queue is never rebuilt mid-drain: while a download is in flight
    /// this is a no-op.
    pub fn build_queue(&mut self, force_all: bool) {
        if self.in_flight.is_some() {
            tracing::debug!("download in flight, not rebuilding queue");
            return;
        }

        self.queue.clear();
        for snapshot in &self.snapshots {
            if force_all || snapshot.is_stale() {
                self.queue.push_back(snapshot.id);
            }
        }

        if self.queue.is_empty() {
            tracing::info!("all items up to date");
            self.emit(Event::AllUpToDate);
        } else {
            tracing::info!(count = self.queue.len(), force_all, "update batch queued");
            self.emit(Event::QueueBuilt {
                count: self.queue.len(),
            });
        }
    }
}
