//! Sync orchestrator: one end-to-end pass from judge to repository.
//!
//! ## `Orchestrator::run` protocol
//!
//! 1. Load the ledger (missing file → empty ledger).
//! 2. List one page of recent submissions (`offset = 0`, `limit = fetch_limit`).
//! 3. Keep accepted submissions whose id is not yet in the ledger.
//! 4. Per candidate, in list order: pause → fetch detail → pause → fetch
//!    problem → transform → merge files. A failing item is recorded and
//!    skipped; an expired session aborts the run.
//! 5. Nothing prepared → return without committing.
//! 6. Add prepared ids to the ledger, serialize it into the file set, and
//!    commit everything at once.

use std::time::Duration;

use chrono::Utc;

use solvesync_core::{
    CommitId, Config, FileSet, Identity, ItemTransform, SourceError, SourceReader, StoreClient,
    SubmissionId, SubmissionSummary, SyncState,
};

use crate::error::SyncError;
use crate::state_store::{self, StateStore};

// ---------------------------------------------------------------------------
// Throttle
// ---------------------------------------------------------------------------

/// Cooperative pause before each per-item upstream call.
pub trait Throttle {
    fn pause(&self);
}

/// Sleep for a fixed delay.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl Throttle for FixedDelay {
    fn pause(&self) {
        std::thread::sleep(self.0);
    }
}

// ---------------------------------------------------------------------------
// Options + report
// ---------------------------------------------------------------------------

/// Run parameters, derived once from [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    pub fetch_limit: u32,
    pub state_path: String,
    pub username: String,
    pub commit_prefix: String,
    /// Prepare the commit but do not send it.
    pub dry_run: bool,
}

impl SyncOptions {
    pub fn from_config(config: &Config, dry_run: bool) -> Self {
        Self {
            fetch_limit: config.sync.fetch_limit,
            state_path: config.sync.state_path.clone(),
            username: config.leetcode.username.clone(),
            commit_prefix: config.sync.commit_prefix.clone(),
            dry_run,
        }
    }
}

/// A submission whose files made it into the run's commit payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncedItem {
    pub id: SubmissionId,
    pub frontend_id: String,
    pub title: String,
    pub difficulty: String,
}

/// Which step of per-item processing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Detail,
    Problem,
    Transform,
}

/// A candidate that was skipped this run and will be retried next run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub id: SubmissionId,
    pub title: String,
    pub stage: FailureStage,
    pub reason: String,
}

/// How a pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No accepted submission outside the ledger.
    NothingPending,
    /// Every candidate failed; nothing was committed.
    AllFailed,
    /// Dry run: the commit was prepared but not sent.
    DryRun,
    Committed(CommitId),
}

/// Summary of one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Summaries returned by the list call.
    pub listed: usize,
    /// Of those, how many were accepted.
    pub accepted: usize,
    /// Accepted and not yet in the ledger.
    pub candidates: usize,
    pub synced: Vec<SyncedItem>,
    pub failed: Vec<FailedItem>,
    /// Paths in the commit payload, state file included.
    pub paths: Vec<String>,
    pub message: Option<String>,
    pub outcome: SyncOutcome,
}

impl SyncReport {
    fn empty(listed: usize, accepted: usize, candidates: usize, outcome: SyncOutcome) -> Self {
        Self {
            listed,
            accepted,
            candidates,
            synced: Vec::new(),
            failed: Vec::new(),
            paths: Vec::new(),
            message: None,
            outcome,
        }
    }

    /// Newly synced submissions (zero for dry runs and no-op runs).
    pub fn synced_count(&self) -> usize {
        match self.outcome {
            SyncOutcome::Committed(_) => self.synced.len(),
            _ => 0,
        }
    }
}

enum ItemFailure {
    AuthExpired,
    Skipped(FailedItem),
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Drives a sync pass over injected collaborators.
pub struct Orchestrator<R, S, T, P> {
    source: R,
    store: S,
    transform: T,
    throttle: P,
    options: SyncOptions,
}

impl<R, S, T, P> Orchestrator<R, S, T, P>
where
    R: SourceReader,
    S: StoreClient,
    T: ItemTransform,
    P: Throttle,
{
    pub fn new(source: R, store: S, transform: T, throttle: P, options: SyncOptions) -> Self {
        Self {
            source,
            store,
            transform,
            throttle,
            options,
        }
    }

    /// Perform one full pass.
    pub fn run(&self) -> Result<SyncReport, SyncError> {
        tracing::info!(
            limit = self.options.fetch_limit,
            dry_run = self.options.dry_run,
            "starting sync pass"
        );

        let state_store = StateStore::new(&self.store, self.options.state_path.as_str());
        let mut state = state_store.load()?;

        let summaries = self
            .source
            .list_recent(0, self.options.fetch_limit)
            .map_err(|e| match e {
                SourceError::AuthExpired => SyncError::AuthExpired,
                other => SyncError::List(other),
            })?;
        let listed = summaries.len();
        let accepted = summaries.iter().filter(|s| s.is_accepted()).count();
        let candidates = select_candidates(&summaries, &state);
        tracing::info!(listed, accepted, candidates = candidates.len(), "filtered submissions");

        if candidates.is_empty() {
            tracing::info!("no new submissions to sync; everything is up to date");
            return Ok(SyncReport::empty(
                listed,
                accepted,
                0,
                SyncOutcome::NothingPending,
            ));
        }

        let identity = Identity::new(self.options.username.as_str(), Utc::now().date_naive());
        let mut files = FileSet::new();
        let mut synced = Vec::new();
        let mut failed = Vec::new();

        for summary in &candidates {
            match self.process(summary, &identity) {
                Ok((item, contribution)) => {
                    tracing::info!(
                        submission_id = %item.id,
                        title = %item.title,
                        difficulty = %item.difficulty,
                        "prepared submission"
                    );
                    files.extend(contribution);
                    synced.push(item);
                }
                Err(ItemFailure::Skipped(failure)) => {
                    tracing::error!(
                        submission_id = %failure.id,
                        title = %failure.title,
                        stage = ?failure.stage,
                        error = %failure.reason,
                        "failed to process submission; skipping"
                    );
                    failed.push(failure);
                }
                Err(ItemFailure::AuthExpired) => {
                    tracing::error!(
                        submission_id = %summary.id,
                        prepared = synced.len(),
                        "judge session expired mid-run; nothing from this run was committed"
                    );
                    return Err(SyncError::AuthExpired);
                }
            }
        }

        if synced.is_empty() {
            tracing::warn!(
                failed = failed.len(),
                "no files to commit; every candidate failed"
            );
            let mut report =
                SyncReport::empty(listed, accepted, candidates.len(), SyncOutcome::AllFailed);
            report.failed = failed;
            return Ok(report);
        }

        for item in &synced {
            state.mark_synced(item.id.clone());
        }
        let state_text = state_store::serialize_state(&mut state, Utc::now())?;
        files.insert(self.options.state_path.clone(), state_text);

        let message = commit_message(&self.options.commit_prefix, &synced);
        let paths: Vec<String> = files.keys().cloned().collect();

        let outcome = if self.options.dry_run {
            tracing::info!(files = files.len(), "[dry-run] would commit");
            SyncOutcome::DryRun
        } else {
            let commit = self.store.commit_files(&files, &message).map_err(|source| {
                SyncError::Commit {
                    pending: synced.iter().map(|item| item.id.clone()).collect(),
                    source,
                }
            })?;
            tracing::info!(
                commit = commit.short(),
                synced = synced.len(),
                failed = failed.len(),
                "committed submissions"
            );
            SyncOutcome::Committed(commit)
        };

        Ok(SyncReport {
            listed,
            accepted,
            candidates: candidates.len(),
            synced,
            failed,
            paths,
            message: Some(message),
            outcome,
        })
    }

    fn process(
        &self,
        summary: &SubmissionSummary,
        identity: &Identity,
    ) -> Result<(SyncedItem, FileSet), ItemFailure> {
        tracing::info!(
            submission_id = %summary.id,
            title = %summary.title,
            lang = %summary.lang,
            "processing submission"
        );

        self.throttle.pause();
        let detail = self
            .source
            .submission_detail(&summary.id)
            .map_err(|e| source_failure(summary, FailureStage::Detail, e))?;

        self.throttle.pause();
        let problem = self
            .source
            .problem(&summary.title_slug)
            .map_err(|e| source_failure(summary, FailureStage::Problem, e))?;

        let contribution = self
            .transform
            .build_files(&detail, &problem, identity)
            .map_err(|e| skipped(summary, FailureStage::Transform, e.to_string()))?;
        if contribution.is_empty() {
            return Err(skipped(
                summary,
                FailureStage::Transform,
                "transform produced no files".to_string(),
            ));
        }

        let item = SyncedItem {
            id: summary.id.clone(),
            frontend_id: problem.frontend_id,
            title: problem.title,
            difficulty: problem.difficulty,
        };
        Ok((item, contribution))
    }
}

/// Accepted summaries not yet in the ledger, in list order.
pub fn select_candidates<'a>(
    summaries: &'a [SubmissionSummary],
    state: &SyncState,
) -> Vec<&'a SubmissionSummary> {
    summaries
        .iter()
        .filter(|s| s.is_accepted())
        .filter(|s| !state.contains(&s.id))
        .collect()
}

/// Commit message for the prepared items.
///
/// One item: a single line. Several: a count header, a blank line, then one
/// bullet per item in processing order.
pub fn commit_message(prefix: &str, items: &[SyncedItem]) -> String {
    match items {
        [only] => format!(
            "{prefix}: Add {}. {} ({})",
            only.frontend_id, only.title, only.difficulty
        ),
        _ => {
            let mut message = format!("{prefix}: Add {} solutions\n", items.len());
            for item in items {
                message.push_str(&format!(
                    "\n- {}. {} ({})",
                    item.frontend_id, item.title, item.difficulty
                ));
            }
            message
        }
    }
}

fn source_failure(summary: &SubmissionSummary, stage: FailureStage, err: SourceError) -> ItemFailure {
    match err {
        SourceError::AuthExpired => ItemFailure::AuthExpired,
        other => skipped(summary, stage, other.to_string()),
    }
}

fn skipped(summary: &SubmissionSummary, stage: FailureStage, reason: String) -> ItemFailure {
    ItemFailure::Skipped(FailedItem {
        id: summary.id.clone(),
        title: summary.title.clone(),
        stage,
        reason,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
