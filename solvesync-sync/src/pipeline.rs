//! Shared entrypoints used by the CLI: wire the HTTP adapters and the
//! renderer into an [`Orchestrator`] built from one [`Config`].

use solvesync_core::Config;
use solvesync_remote::{GitHubClient, LeetCodeClient};
use solvesync_renderer::SolutionRenderer;

use crate::orchestrator::{FixedDelay, Orchestrator, SyncOptions, SyncReport};
use crate::status::{self, StateSummary};
use crate::SyncError;

/// Run one sync pass against the live judge and repository.
pub fn run(config: &Config, dry_run: bool) -> Result<SyncReport, SyncError> {
    let source = LeetCodeClient::new(&config.leetcode, config.sync.timeout);
    let store = GitHubClient::new(&config.github, config.sync.timeout);
    let renderer = SolutionRenderer::new(
        &config.leetcode.base_url,
        config.sync.template_dir.as_deref(),
    )?;

    tracing::debug!(
        owner = %config.github.owner,
        repo = %config.github.repo,
        branch = %config.github.branch,
        "destination repository"
    );

    Orchestrator::new(
        source,
        store,
        renderer,
        FixedDelay(config.sync.throttle),
        SyncOptions::from_config(config, dry_run),
    )
    .run()
}

/// Read the ledger from the destination repository.
pub fn status(config: &Config) -> Result<StateSummary, SyncError> {
    let store = GitHubClient::new(&config.github, config.sync.timeout);
    status::summarize(store, &config.sync.state_path)
}
