//! solvesync core library: domain types, capability traits, configuration.
//!
//! - [`types`]: submissions, problems, the sync ledger, `FileSet`
//! - [`remote`]: `SourceReader` / `StoreClient` / `ItemTransform` traits
//! - [`config`]: YAML + environment configuration
//! - [`error`]: error enums shared across crates

pub mod config;
pub mod error;
pub mod remote;
pub mod types;

pub use config::{Config, GitHubConfig, LeetCodeConfig, SyncSettings};
pub use error::{ConfigError, SourceError, StoreError, TransformError};
pub use remote::{ItemTransform, SourceReader, StoreClient};
pub use types::{
    CommitId, FileSet, Identity, ProblemMetadata, QuestionRef, SubmissionDetail, SubmissionId,
    SubmissionLang, SubmissionSummary, SyncState, TopicTag, ACCEPTED_STATUS,
};
