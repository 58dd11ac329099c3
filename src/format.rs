//! Display formatting helpers for timestamps and progress lines

use chrono::{Local, NaiveDateTime, TimeZone, Utc};

use crate::types::{ItemId, TransferProgress};

/// Display format for install/revision timestamps
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format a UTC epoch-seconds timestamp as local time, minute precision.
///
/// `0` (not installed / not yet received) renders as `"N/A"`, as does any
/// value chrono cannot represent.
pub fn local_timestamp(epoch: u64) -> String {
    if epoch == 0 {
        return "N/A".to_string();
    }
    match Utc.timestamp_opt(epoch as i64, 0).single() {
        Some(utc) => utc
            .with_timezone(&Local)
            .format(TIMESTAMP_FORMAT)
            .to_string(),
        None => "N/A".to_string(),
    }
}

/// Parse a string produced by [`local_timestamp`] back to UTC epoch seconds.
///
/// The display is minute precision, so the result is truncated to the start
/// of that minute. Returns `None` for `"N/A"`, malformed input, or a local
/// time that does not exist in the current timezone (DST gap). The result is
/// timezone-dependent by construction: it inverts the local-time rendering
/// on the machine that produced it.
pub fn parse_timestamp(display: &str) -> Option<u64> {
    let naive = NaiveDateTime::parse_from_str(display, TIMESTAMP_FORMAT).ok()?;
    let local = Local.from_local_datetime(&naive).earliest()?;
    u64::try_from(local.with_timezone(&Utc).timestamp()).ok()
}

/// Format the progress line for an active transfer with a known total.
///
/// Percent with one decimal place, byte counts truncated to whole megabytes.
pub fn progress_line(progress: TransferProgress) -> String {
    let percent = progress.downloaded as f64 / progress.total as f64 * 100.0;
    format!(
        "Progress: {:.1}% ({}MB/{}MB)",
        percent,
        progress.downloaded / 1024 / 1024,
        progress.total / 1024 / 1024
    )
}

/// Format the progress line shown while the total is unknown.
///
/// Covers the window after the transfer finishes but before the provider has
/// finalized the local install.
pub fn verifying_line(id: ItemId) -> String {
    format!("Verifying {}...", id)
}
