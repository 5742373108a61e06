//! Error types for solvesync-sync.

use thiserror::Error;

use solvesync_core::{SourceError, StoreError, SubmissionId};
use solvesync_renderer::RenderError;

/// Run-level failures. Per-item failures never surface here; they are
/// recorded in the run's report instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The state file exists but could not be read (anything but not-found).
    #[error("failed to read sync state at {path}: {source}")]
    StateRead {
        path: String,
        #[source]
        source: StoreError,
    },

    /// The state file was read but its content is not a valid ledger.
    #[error("sync state at {path} is malformed: {source}")]
    StateParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing the updated ledger failed.
    #[error("sync state JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The recent-submission list could not be fetched.
    #[error("failed to list recent submissions: {0}")]
    List(#[source] SourceError),

    /// Judge credentials were rejected; nothing can proceed until refreshed.
    #[error("judge session expired; refresh the session cookie and CSRF token")]
    AuthExpired,

    /// The atomic commit failed. `pending` were prepared but not secured.
    #[error(
        "commit failed; {} submission(s) not secured [{}]: {source}",
        .pending.len(),
        join_ids(.pending)
    )]
    Commit {
        pending: Vec<SubmissionId>,
        #[source]
        source: StoreError,
    },

    /// Templates could not be loaded.
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

impl SyncError {
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, SyncError::AuthExpired)
    }
}

fn join_ids(ids: &[SubmissionId]) -> String {
    ids.iter()
        .map(|id| id.0.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_error_lists_pending_ids() {
        let err = SyncError::Commit {
            pending: vec![SubmissionId::from("11"), SubmissionId::from("12")],
            source: StoreError::Transport("502 Bad Gateway".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("2 submission(s)"), "got: {msg}");
        assert!(msg.contains("[11, 12]"), "got: {msg}");
        assert!(msg.contains("502 Bad Gateway"), "got: {msg}");
    }

    #[test]
    fn auth_expired_is_distinguishable() {
        assert!(SyncError::AuthExpired.is_auth_expired());
        assert!(!SyncError::List(SourceError::Transport("x".into())).is_auth_expired());
    }
}
