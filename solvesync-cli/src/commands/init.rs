//! `solvesync init [--force]`

use anyhow::{Context, Result};
use clap::Args;

use solvesync_core::config;

/// Write a starter config file.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let path = config::init(self.force).context("failed to write config")?;

        println!("✓ Wrote {}", path.display());
        println!("  Fill in leetcode.username and github.owner, then export:");
        println!("    SOLVESYNC_LEETCODE_SESSION   (LEETCODE_SESSION cookie)");
        println!("    SOLVESYNC_LEETCODE_CSRF_TOKEN (csrftoken cookie)");
        println!("    SOLVESYNC_GITHUB_TOKEN       (token with contents:write)");
        Ok(())
    }
}
