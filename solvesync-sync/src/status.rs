//! Read-only view of the ledger for `solvesync status`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use solvesync_core::{StoreClient, SyncState};

use crate::error::SyncError;
use crate::state_store::StateStore;

/// What the ledger currently records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSummary {
    pub path: String,
    pub synced: usize,
    pub last_sync_utc: Option<DateTime<Utc>>,
    /// `"3h"`, `"2d"`, or `"never"`.
    pub last_sync_age: String,
}

impl StateSummary {
    pub fn from_state(path: &str, state: &SyncState) -> Self {
        Self {
            path: path.to_string(),
            synced: state.len(),
            last_sync_utc: state.last_sync_utc,
            last_sync_age: state
                .last_sync_utc
                .map(format_datetime_age)
                .unwrap_or_else(|| "never".to_string()),
        }
    }
}

/// Load the ledger through `client` without modifying anything.
pub fn summarize<S: StoreClient>(client: S, path: &str) -> Result<StateSummary, SyncError> {
    let state = StateStore::new(client, path).load()?;
    Ok(StateSummary::from_state(path, &state))
}

/// Format age from a chrono timestamp (ledger `last_sync_utc`).
pub fn format_datetime_age(timestamp: DateTime<Utc>) -> String {
    let now = Utc::now();
    let age = now.signed_duration_since(timestamp).num_seconds().max(0) as u64;
    format_seconds(age)
}

fn format_seconds(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    if seconds < 60 * 60 {
        return format!("{}m", seconds / 60);
    }
    if seconds < 60 * 60 * 24 {
        return format!("{}h", seconds / (60 * 60));
    }
    format!("{}d", seconds / (60 * 60 * 24))
}
