//! `tafsync prepare`: reconcile the working copy without syncing.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use tafsync_sync::WorkingCopyState;

use super::RepoArgs;

/// Arguments for `tafsync prepare`.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub repo: RepoArgs,
}

impl PrepareArgs {
    pub fn run(self) -> Result<()> {
        let sync = self.repo.synchronizer();
        match sync.prepare() {
            WorkingCopyState::Tracking { branch } => println!(
                "{} {} tracks origin/{branch}",
                "✓".green(),
                sync.workdir().display()
            ),
            WorkingCopyState::Fresh { branch } => println!(
                "{} {} on new branch {branch} (from master)",
                "✓".green(),
                sync.workdir().display()
            ),
            WorkingCopyState::Failed { reason } => {
                bail!("failed to prepare {}: {reason}", sync.workdir().display())
            }
        }
        Ok(())
    }
}
