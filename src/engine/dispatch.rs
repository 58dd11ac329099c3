//! Single-in-flight dispatch, progress reporting, and completion handling.

use std::time::Instant;

use crate::format;
use crate::types::{Event, ItemId};

use super::SyncEngine;

impl SyncEngine {
    /// Advance the orchestrator by one step.
    ///
    /// Called once per control-loop iteration. With nothing in flight and a
    /// non-empty queue, dispatches the head item once the settle delay has
    /// elapsed: a synchronous accept sets the in-flight marker, a reject
    /// drops the item from this batch with no requeue. With a download in
    /// flight, emits one progress line — fractional progress when the total
    /// is known, a verifying indicator otherwise (the window between
    /// transfer end and install finalization).
    pub async fn tick(&mut self) {
        if self.in_flight.is_none()
            && !self.queue.is_empty()
            && self.settle_elapsed()
            && let Some(id) = self.queue.pop_front()
        {
            if self
                .provider
                .request_download(id, self.config.high_priority_downloads)
                .await
            {
                tracing::info!(item_id = %id, remaining = self.queue.len(), "download dispatched");
                self.in_flight = Some(id);
            } else {
                tracing::warn!(item_id = %id, "provider rejected download, dropped from batch");
            }
        }

        if let Some(id) = self.in_flight {
            let line = match self.provider.download_progress(id).await {
                Some(progress) if progress.total > 0 => format::progress_line(progress),
                _ => format::verifying_line(id),
            };
            self.emit(Event::Progress { line });
        }
    }

    /// Retire the in-flight item on a completion notification.
    ///
    /// Two classes of bogus notification are filtered here: completions for
    /// an item other than the current in-flight one (stale, the item is no
    /// longer tracked), and completions that arrive while the provider's
    /// downloading flag is still set (the provider can emit the event before
    /// the transfer state clears; the real completion follows later).
    pub async fn handle_download_finished(&mut self, id: ItemId) {
        if self.in_flight != Some(id) {
            tracing::debug!(item_id = %id, "completion for item not in flight, ignoring");
            return;
        }

        let state = self.provider.item_state(id).await;
        if state.downloading {
            tracing::debug!(item_id = %id, "premature completion, transfer still active");
            return;
        }

        self.in_flight = None;
        self.settle_until = None;
        tracing::info!(item_id = %id, remaining = self.queue.len(), "download retired");

        if self.queue.is_empty() {
            self.emit(Event::BatchComplete);
        }
    }

    /// Non-blocking settle gate before each dispatch.
    ///
    /// Arms a deadline the first time a dispatch is considered and holds the
    /// dispatch until it passes, so a freshly-retired item gets
    /// `dispatch_delay` of quiet before the next transfer starts without
    /// ever blocking the loop. A zero delay dispatches immediately.
    fn settle_elapsed(&mut self) -> bool {
        if self.config.dispatch_delay_ms == 0 {
            return true;
        }
        match self.settle_until {
            None => {
                self.settle_until = Some(Instant::now() + self.config.dispatch_delay());
                false
            }
            Some(deadline) => {
                if Instant::now() >= deadline {
                    self.settle_until = None;
                    true
                } else {
                    false
                }
            }
        }
    }
}
