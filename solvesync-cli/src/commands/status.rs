//! `solvesync status`: read the sync state file without changing anything.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use solvesync_core::config;
use solvesync_sync::{pipeline, StateSummary};

/// Arguments for `solvesync status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,

    /// Config file to use instead of ~/.solvesync/config.yaml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "state file")]
    path: String,
    #[tabled(rename = "synced")]
    synced: usize,
    #[tabled(rename = "last sync (UTC)")]
    last_sync: String,
    #[tabled(rename = "age")]
    age: String,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let config =
            config::load(self.config.as_deref()).context("failed to load configuration")?;
        let summary = pipeline::status(&config).context("failed to read sync state")?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary)
                    .context("failed to serialize status JSON")?
            );
            return Ok(());
        }

        println!(
            "solvesync v{} | {}/{}@{}",
            env!("CARGO_PKG_VERSION"),
            config.github.owner,
            config.github.repo,
            config.github.branch,
        );
        let mut table = Table::new([table_row(summary)]);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}

fn table_row(summary: StateSummary) -> StatusTableRow {
    let age = match summary.last_sync_utc {
        Some(_) => format!("{} ago", summary.last_sync_age),
        None => summary.last_sync_age,
    };
    StatusTableRow {
        path: summary.path,
        synced: summary.synced,
        last_sync: summary
            .last_sync_utc
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string()),
        age,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn never_synced_row() {
        let row = table_row(StateSummary {
            path: ".solvesync/sync-state.json".to_string(),
            synced: 0,
            last_sync_utc: None,
            last_sync_age: "never".to_string(),
        });
        assert_eq!(row.last_sync, "-");
        assert_eq!(row.age, "never");
    }

    #[test]
    fn synced_row_shows_timestamp_and_age() {
        let row = table_row(StateSummary {
            path: "s.json".to_string(),
            synced: 12,
            last_sync_utc: Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).single(),
            last_sync_age: "3h".to_string(),
        });
        assert_eq!(row.synced, 12);
        assert_eq!(row.last_sync, "2024-03-05 12:00:00");
        assert_eq!(row.age, "3h ago");
    }
}
