//! `solvesync sync`: one pass from the judge to the repository.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use solvesync_core::config;
use solvesync_sync::{pipeline, FailedItem, SyncOutcome, SyncReport};

/// Arguments for `solvesync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Fetch and render everything but do not commit.
    #[arg(long)]
    pub dry_run: bool,

    /// Config file to use instead of ~/.solvesync/config.yaml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let config =
            config::load(self.config.as_deref()).context("failed to load configuration")?;

        match pipeline::run(&config, self.dry_run) {
            Ok(report) => {
                print_report(&report);
                Ok(())
            }
            Err(err) if err.is_auth_expired() => {
                print_auth_guidance();
                Err(err).context("sync aborted")
            }
            Err(err) => Err(err).context("sync failed"),
        }
    }
}

fn print_report(report: &SyncReport) {
    match &report.outcome {
        SyncOutcome::NothingPending => {
            println!(
                "✓ Nothing to sync ({} listed, {} accepted, all already in the repository)",
                report.listed, report.accepted
            );
        }
        SyncOutcome::AllFailed => {
            println!(
                "{} All {} candidate(s) failed; nothing was committed",
                "✗".red(),
                report.candidates
            );
        }
        SyncOutcome::DryRun => {
            println!(
                "[dry-run] Would commit {} file(s) for {} submission(s)",
                report.paths.len(),
                report.synced.len()
            );
            for path in &report.paths {
                println!("  ~  {path}");
            }
            if let Some(message) = &report.message {
                println!("[dry-run] Commit message:");
                for line in message.lines() {
                    println!("    {line}");
                }
            }
        }
        SyncOutcome::Committed(commit) => {
            println!(
                "✓ Synced {} submission(s) in commit {}",
                report.synced_count(),
                commit.short().bold()
            );
            for path in &report.paths {
                println!("  ✎  {path}");
            }
        }
    }

    print_failures(&report.failed);
}

fn print_failures(failed: &[FailedItem]) {
    if failed.is_empty() {
        return;
    }
    println!(
        "{} {} submission(s) skipped; they will be retried next run:",
        "!".yellow().bold(),
        failed.len()
    );
    for item in failed {
        println!(
            "  ✗  {} {} ({:?}): {}",
            item.id, item.title, item.stage, item.reason
        );
    }
}

fn print_auth_guidance() {
    eprintln!();
    eprintln!("{}", "LeetCode rejected the session cookies.".red().bold());
    eprintln!("The session usually lasts a few weeks. To refresh it:");
    eprintln!("  1. Sign in to leetcode.com in a browser.");
    eprintln!("  2. Open the developer tools and copy the LEETCODE_SESSION and csrftoken cookies.");
    eprintln!("  3. Update SOLVESYNC_LEETCODE_SESSION and SOLVESYNC_LEETCODE_CSRF_TOKEN");
    eprintln!("     (or the CI secrets that provide them) and run sync again.");
    eprintln!();
}
