//! Domain types shared by the sync pipeline and its adapters.
//!
//! Wire formats belong to `solvesync-remote`; everything here is the
//! adapter-neutral shape the orchestrator works with.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Status label the judge attaches to a submission that passed every test.
pub const ACCEPTED_STATUS: &str = "Accepted";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Stable, platform-assigned identifier of one submission.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub String);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for SubmissionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SubmissionId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Identifier of a commit created in the destination repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(pub String);

impl CommitId {
    /// First seven characters, the way git abbreviates a SHA.
    pub fn short(&self) -> &str {
        self.0.get(..7).unwrap_or(&self.0)
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for CommitId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Remote records
// ---------------------------------------------------------------------------

/// One entry of the judge's recent-submission list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub id: SubmissionId,
    pub title: String,
    pub title_slug: String,
    pub status_display: String,
    pub lang: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default)]
    pub memory: Option<String>,
}

impl SubmissionSummary {
    pub fn is_accepted(&self) -> bool {
        self.status_display == ACCEPTED_STATUS
    }
}

/// A topic tag attached to a problem or submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicTag {
    pub name: String,
    pub slug: String,
}

/// Language a submission was written in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionLang {
    /// Machine name, e.g. `python3`.
    pub name: String,
    /// Display name, e.g. `Python3`.
    pub verbose_name: String,
}

/// Reference from a submission back to its problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRef {
    pub question_id: String,
    pub title_slug: String,
}

/// Full record of one submission, including its source code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDetail {
    pub id: SubmissionId,
    pub code: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    pub lang: SubmissionLang,
    #[serde(default)]
    pub runtime_display: Option<String>,
    #[serde(default)]
    pub runtime_percentile: Option<f64>,
    #[serde(default)]
    pub memory_display: Option<String>,
    #[serde(default)]
    pub memory_percentile: Option<f64>,
    pub question: QuestionRef,
    #[serde(default)]
    pub topic_tags: Option<Vec<TopicTag>>,
}

impl SubmissionDetail {
    /// Submission time as a UTC timestamp, if the epoch value is representable.
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.timestamp, 0)
    }
}

/// Descriptive data about the problem a submission solves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemMetadata {
    pub question_id: String,
    /// Human-facing sequence number shown on the problem list.
    pub frontend_id: String,
    pub title: String,
    pub title_slug: String,
    #[serde(default)]
    pub content: Option<String>,
    pub difficulty: String,
    #[serde(default)]
    pub topic_tags: Vec<TopicTag>,
}

// ---------------------------------------------------------------------------
// Sync ledger
// ---------------------------------------------------------------------------

/// Durable record of which submissions have already been synced.
///
/// The id set only ever grows: nothing in the pipeline removes an entry.
/// Decoding is strict: the id list is required and unknown keys are rejected,
/// so a foreign or damaged document never reads as an empty ledger.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncState {
    pub synced_submission_ids: BTreeSet<SubmissionId>,
    #[serde(default)]
    pub last_sync_utc: Option<DateTime<Utc>>,
}

impl SyncState {
    pub fn contains(&self, id: &SubmissionId) -> bool {
        self.synced_submission_ids.contains(id)
    }

    /// Record `id` as synced. Returns `false` if it was already present.
    pub fn mark_synced(&mut self, id: SubmissionId) -> bool {
        self.synced_submission_ids.insert(id)
    }

    pub fn len(&self) -> usize {
        self.synced_submission_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synced_submission_ids.is_empty()
    }
}

/// Repository-relative path → full file content for one commit.
///
/// A `BTreeMap` so the payload iterates in a stable order.
pub type FileSet = BTreeMap<String, String>;

/// Who the generated documents are attributed to, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub synced_on: NaiveDate,
}

impl Identity {
    pub fn new(username: impl Into<String>, synced_on: NaiveDate) -> Self {
        Self {
            username: username.into(),
            synced_on,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
