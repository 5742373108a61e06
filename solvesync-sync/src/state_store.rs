//! Sync state store: the idempotency ledger kept inside the destination repo.
//!
//! The ledger is one JSON document at a configured repository-relative path
//! (default `.solvesync/sync-state.json`). It is read through the
//! [`StoreClient`] at the start of a run and written back only as one entry
//! of the run's atomic commit, never on its own.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use solvesync_core::{StoreClient, StoreError, SubmissionId, SyncState};

use crate::error::SyncError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SyncStateCompat {
    Structured(SyncState),
    Legacy(BTreeSet<SubmissionId>),
}

/// Reads the ledger for one destination repository.
pub struct StateStore<S> {
    client: S,
    path: String,
}

impl<S: StoreClient> StateStore<S> {
    pub fn new(client: S, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }

    /// Repository-relative path of the ledger file.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Load the ledger.
    ///
    /// A missing file is a first run and yields an empty state. Every other
    /// failure, including unparseable content, is an error: treating it as
    /// empty would resync everything.
    pub fn load(&self) -> Result<SyncState, SyncError> {
        let content = match self.client.read_file(&self.path) {
            Ok(content) => content,
            Err(StoreError::NotFound(_)) => {
                tracing::info!(path = %self.path, "no sync state found; starting fresh");
                return Ok(SyncState::default());
            }
            Err(source) => {
                return Err(SyncError::StateRead {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let state = parse_state(&self.path, &content)?;
        tracing::info!(
            path = %self.path,
            synced = state.len(),
            "loaded sync state"
        );
        Ok(state)
    }
}

/// Decode ledger text. Accepts the structured document and a bare id list.
pub fn parse_state(path: &str, content: &str) -> Result<SyncState, SyncError> {
    let parsed = serde_json::from_str::<SyncStateCompat>(content).map_err(|source| {
        SyncError::StateParse {
            path: path.to_string(),
            source,
        }
    })?;
    Ok(match parsed {
        SyncStateCompat::Structured(state) => state,
        SyncStateCompat::Legacy(ids) => SyncState {
            synced_submission_ids: ids,
            last_sync_utc: None,
        },
    })
}

/// Stamp `now` as the last sync time and encode the ledger.
///
/// Output is pretty-printed JSON with ids in sorted order and a trailing
/// newline, so successive revisions diff cleanly.
pub fn serialize_state(state: &mut SyncState, now: DateTime<Utc>) -> Result<String, SyncError> {
    state.last_sync_utc = Some(now);
    let mut json = serde_json::to_string_pretty(state)?;
    json.push('\n');
    Ok(json)
}
