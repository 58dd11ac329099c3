//! Core types for workshop-sync

use serde::{Deserialize, Serialize};

/// Placeholder title shown until remote metadata for an item has arrived
pub const PLACEHOLDER_NAME: &str = "...";

/// Unique identifier for a subscribed workshop item
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Create a new ItemId
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner u64 value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ItemId> for u64 {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Raw per-item state flags as reported by the remote provider.
///
/// The provider exposes these as a bitset; they are carried here as plain
/// booleans and collapsed into an [`ItemStatus`] for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemState {
    /// A newer revision exists remotely
    pub needs_update: bool,
    /// A transfer for this item is currently active
    pub downloading: bool,
    /// The item is installed locally
    pub installed: bool,
}

/// Derived status of a subscribed item at snapshot time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// A newer remote revision is available
    UpdateRequired,
    /// Currently being downloaded
    Downloading,
    /// Installed and not flagged for update
    Installed,
    /// Subscribed but not installed
    SubscribedOnly,
}

impl ItemStatus {
    /// Derive the display status from raw provider flags.
    ///
    /// Priority: needs-update > downloading > installed > subscribed-only.
    pub fn from_state(state: ItemState) -> Self {
        if state.needs_update {
            ItemStatus::UpdateRequired
        } else if state.downloading {
            ItemStatus::Downloading
        } else if state.installed {
            ItemStatus::Installed
        } else {
            ItemStatus::SubscribedOnly
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ItemStatus::UpdateRequired => "UpdateReq",
            ItemStatus::Downloading => "Downloading",
            ItemStatus::Installed => "Installed",
            ItemStatus::SubscribedOnly => "Subscribed",
        };
        f.write_str(s)
    }
}

/// Point-in-time record of one subscribed item's local and remote state.
///
/// Local fields are populated synchronously when a comparison starts;
/// `name` and `remote_updated` are filled in atomically when the batched
/// metadata query completes. `remote_updated` is never inferred.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    /// Item identifier
    pub id: ItemId,
    /// Human-readable title; [`PLACEHOLDER_NAME`] until metadata arrives
    pub name: String,
    /// Local install time, epoch seconds UTC; 0 = not installed / unknown
    pub local_updated: u64,
    /// Latest remote revision time, epoch seconds UTC; 0 = not yet received
    pub remote_updated: u64,
    /// Derived status at snapshot time
    pub status: ItemStatus,
}

impl ItemSnapshot {
    /// True when this row should be visually flagged: a remote revision is
    /// newer than a real local install.
    pub fn needs_attention(&self) -> bool {
        self.remote_updated > self.local_updated && self.local_updated != 0
    }

    /// True when this item belongs in a non-forced update batch.
    pub fn is_stale(&self) -> bool {
        self.remote_updated > self.local_updated || self.status == ItemStatus::UpdateRequired
    }
}

/// One remote metadata record returned by a batched detail query
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDetails {
    /// Item identifier
    pub id: ItemId,
    /// Remote title
    pub title: String,
    /// Latest remote revision time, epoch seconds UTC
    pub remote_updated: u64,
}

/// Byte counts for an active transfer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferProgress {
    /// Bytes downloaded so far
    pub downloaded: u64,
    /// Total bytes expected; 0 = not yet known (or verifying)
    pub total: u64,
}

/// Events broadcast by the engine for the presentation layer to render
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A comparison request has been issued to the remote provider
    Fetching {
        /// Number of subscribed items covered by the query
        count: usize,
    },

    /// Remote metadata has been merged; the full snapshot table is ready
    Table {
        /// Snapshots sorted by name, case-insensitive ascending
        snapshots: Vec<ItemSnapshot>,
    },

    /// An update batch has been queued
    QueueBuilt {
        /// Number of items in the batch
        count: usize,
    },

    /// An update selection found nothing to do
    AllUpToDate,

    /// Progress text for the current in-flight download (single overwritable line)
    Progress {
        /// Preformatted progress line
        line: String,
    },

    /// The last item of the current batch has been retired
    BatchComplete,
}

/// Commands fed into the control loop by the presentation layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Refresh the local/remote comparison and render the table
    List,
    /// Queue items with pending updates (runs a comparison first if needed)
    QueuePendingUpdates,
    /// Queue every subscribed item (runs a comparison first if needed)
    QueueAll,
    /// Stop the control loop
    Quit,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn status_derivation_priority_order() {
        let all = ItemState {
            needs_update: true,
            downloading: true,
            installed: true,
        };
        assert_eq!(ItemStatus::from_state(all), ItemStatus::UpdateRequired);

        let downloading = ItemState {
            needs_update: false,
            downloading: true,
            installed: true,
        };
        assert_eq!(ItemStatus::from_state(downloading), ItemStatus::Downloading);

        let installed = ItemState {
            installed: true,
            ..Default::default()
        };
        assert_eq!(ItemStatus::from_state(installed), ItemStatus::Installed);

        assert_eq!(
            ItemStatus::from_state(ItemState::default()),
            ItemStatus::SubscribedOnly
        );
    }

    #[test]
    fn status_display_matches_table_column_values() {
        assert_eq!(ItemStatus::UpdateRequired.to_string(), "UpdateReq");
        assert_eq!(ItemStatus::Downloading.to_string(), "Downloading");
        assert_eq!(ItemStatus::Installed.to_string(), "Installed");
        assert_eq!(ItemStatus::SubscribedOnly.to_string(), "Subscribed");
    }

    #[test]
    fn needs_attention_requires_real_local_install() {
        let mut snap = ItemSnapshot {
            id: ItemId(1),
            name: "a".to_string(),
            local_updated: 100,
            remote_updated: 200,
            status: ItemStatus::Installed,
        };
        assert!(snap.needs_attention());

        // Never flag an item that was never installed locally
        snap.local_updated = 0;
        assert!(!snap.needs_attention());

        snap.local_updated = 200;
        snap.remote_updated = 200;
        assert!(!snap.needs_attention());
    }

    #[test]
    fn item_id_display_and_parse_round_trip() {
        let id = ItemId(2_905_964_218);
        let parsed: ItemId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
