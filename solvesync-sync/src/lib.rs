//! # solvesync-sync
//!
//! Incremental, idempotent sync of accepted judge submissions into a
//! repository.
//!
//! Build an [`Orchestrator`] over any [`solvesync_core::SourceReader`],
//! [`solvesync_core::StoreClient`], and [`solvesync_core::ItemTransform`], or
//! call [`pipeline::run`] to use the HTTP adapters from a loaded config.

pub mod error;
pub mod orchestrator;
pub mod pipeline;
pub mod state_store;
pub mod status;

pub use error::SyncError;
pub use orchestrator::{
    commit_message, FailedItem, FailureStage, FixedDelay, Orchestrator, SyncOptions, SyncOutcome,
    SyncReport, SyncedItem, Throttle,
};
pub use state_store::StateStore;
pub use status::StateSummary;
