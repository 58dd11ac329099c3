//! Remote provider trait — the seam between the engine and the content service
//!
//! The engine never talks to a network or a vendor SDK directly; everything it
//! needs from the content-distribution service goes through
//! [`WorkshopProvider`]. Implementations typically wrap a platform SDK whose
//! callbacks are pumped on the provider's side and surfaced here as
//! [`Notification`] values returned from [`WorkshopProvider::poll_notifications`],
//! which keeps all engine state mutation on the control-loop task.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::types::{ItemId, ItemState, RemoteDetails, TransferProgress};

/// Correlation handle for an outstanding batched metadata query.
///
/// The engine only applies a completion whose handle matches the most
/// recently issued query, so results can never merge into a collection built
/// by a later comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryHandle(pub u64);

impl std::fmt::Display for QueryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Local install metadata for one item
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InstallInfo {
    /// Install time, epoch seconds UTC
    pub local_updated: u64,
}

/// Asynchronous notifications delivered by the provider's callback pump
#[derive(Debug)]
pub enum Notification {
    /// A batched metadata query finished (successfully or not)
    QueryCompleted {
        /// Handle returned by the originating [`WorkshopProvider::query_details`] call
        handle: QueryHandle,
        /// Detail records on success, the provider's failure code otherwise
        outcome: Result<Vec<RemoteDetails>, ProviderError>,
    },
    /// A download attempt finished.
    ///
    /// May arrive before the provider's downloading flag has cleared, and may
    /// arrive for items the engine is no longer tracking; the engine filters
    /// both cases.
    DownloadFinished {
        /// The item the notification refers to
        id: ItemId,
    },
}

/// Interface to the remote content-distribution service.
///
/// State queries (`subscribed_items`, `install_info`, `item_state`,
/// `download_progress`) are cheap reads of the provider's local cache and
/// cannot fail; absence is expressed with empty/`None` returns. Only
/// [`query_details`](Self::query_details) reaches out to the remote service
/// and can error.
#[async_trait]
pub trait WorkshopProvider: Send + Sync {
    /// All currently-subscribed item identifiers. Empty when there is
    /// nothing subscribed (or the provider cannot tell).
    async fn subscribed_items(&self) -> Vec<ItemId>;

    /// Local install metadata for one item; `None` when not installed.
    async fn install_info(&self, id: ItemId) -> Option<InstallInfo>;

    /// Raw state flags for one item.
    async fn item_state(&self, id: ItemId) -> ItemState;

    /// Issue one batched remote metadata query covering `ids`.
    ///
    /// Completion arrives later as [`Notification::QueryCompleted`] carrying
    /// the returned handle.
    async fn query_details(&self, ids: &[ItemId]) -> Result<QueryHandle, ProviderError>;

    /// Release a provider-side query handle once its results are consumed.
    async fn release_query(&self, handle: QueryHandle);

    /// Ask the provider to begin (or resume) downloading an item.
    ///
    /// Returns the provider's synchronous accept/reject decision; acceptance
    /// means a [`Notification::DownloadFinished`] will eventually follow.
    async fn request_download(&self, id: ItemId, high_priority: bool) -> bool;

    /// Transfer byte counts for an item, `None` when the provider has no
    /// progress to report. A known-zero `total` means the transfer is in its
    /// pre-size or verification phase.
    async fn download_progress(&self, id: ItemId) -> Option<TransferProgress>;

    /// Drain pending asynchronous notifications.
    ///
    /// The control loop calls this once per iteration and processes every
    /// returned notification before advancing, so delivery order is
    /// preserved and handlers run on the loop's task.
    async fn poll_notifications(&self) -> Vec<Notification>;
}
