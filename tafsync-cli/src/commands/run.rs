//! `tafsync run`: one full sync pass.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use tafsync_core::PatchOutcome;
use tafsync_sync::{
    CommitOutcome, FileOutcome, FileReport, Pipeline, PublishReport, PushOutcome, RunReport,
    WorkingCopyState,
};

use super::{ApiArgs, RepoArgs};

/// Arguments for `tafsync run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    #[command(flatten)]
    pub repo: RepoArgs,

    /// Report what would change without touching the working copy or the remote.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the run report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let pipeline = Pipeline::new(
            self.api.client(),
            self.repo.working_copy.store(),
            self.repo.synchronizer(),
        );

        // A failed fetch ends the pass but is not a process failure.
        let report = match pipeline.run(self.dry_run) {
            Ok(report) => report,
            Err(err) => {
                tracing::error!(error = %err, "sync aborted");
                return Ok(());
            }
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize run report")?
            );
            return Ok(());
        }
        print_report(&report);
        Ok(())
    }
}

#[derive(Tabled)]
struct FileRow {
    #[tabled(rename = "file")]
    file: String,
    #[tabled(rename = "model")]
    model: String,
    #[tabled(rename = "result")]
    result: &'static str,
    #[tabled(rename = "detail")]
    detail: String,
}

impl From<&FileReport> for FileRow {
    fn from(report: &FileReport) -> Self {
        Self {
            file: report.file.clone(),
            model: report.model.clone().unwrap_or_else(|| "-".into()),
            result: outcome_label(&report.outcome),
            detail: outcome_detail(&report.outcome),
        }
    }
}

fn print_report(report: &RunReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };

    if let Some(state) = &report.working_copy {
        println!("{prefix}{}", working_copy_line(state));
    }

    println!(
        "{prefix}{} library files | {} matched | {} descriptors {}",
        report.library_files,
        report.files.len(),
        report.changed(),
        if report.dry_run { "would change" } else { "changed" },
    );

    if !report.files.is_empty() {
        let rows: Vec<FileRow> = report.files.iter().map(FileRow::from).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    if let Some(publish) = &report.publish {
        print_publish(publish);
    }
}

fn print_publish(publish: &PublishReport) {
    match &publish.commit {
        CommitOutcome::Clean => println!("{} commit: nothing to commit", "·".bright_black()),
        CommitOutcome::MissingIdentity => println!(
            "{} commit: skipped, GIT_USER_NAME / GIT_USER_EMAIL not set",
            "!".yellow().bold()
        ),
        CommitOutcome::Committed { files } => {
            println!("{} commit: {} descriptor(s)", "✓".green(), files.len());
            for file in files {
                println!("  ✎  {file}");
            }
        }
        CommitOutcome::Failed { reason } => {
            println!("{} commit: {reason}", "✗".red().bold())
        }
    }

    match &publish.push {
        PushOutcome::Pushed => println!("{} push: done", "✓".green()),
        PushOutcome::UpToDate => println!("{} push: remote up to date", "·".bright_black()),
        PushOutcome::MissingCredentials => println!(
            "{} push: skipped, GIT_USER_NAME / GIT_TOKEN not set",
            "!".yellow().bold()
        ),
        PushOutcome::Failed { reason } => println!("{} push: {reason}", "✗".red().bold()),
    }
}

fn working_copy_line(state: &WorkingCopyState) -> String {
    match state {
        WorkingCopyState::Tracking { branch } => {
            format!("{} working copy on {branch}, tracking origin", "✓".green())
        }
        WorkingCopyState::Fresh { branch } => {
            format!("{} working copy on new branch {branch}", "✓".green())
        }
        WorkingCopyState::Failed { reason } => {
            format!("{} working copy: {reason}", "✗".red().bold())
        }
    }
}

fn outcome_label(outcome: &FileOutcome) -> &'static str {
    match outcome {
        FileOutcome::Patch(PatchOutcome::Patched { .. }) => "PATCHED",
        FileOutcome::Patch(PatchOutcome::WouldPatch { .. }) => "WOULD PATCH",
        FileOutcome::Patch(PatchOutcome::AlreadyPresent { .. }) => "PRESENT",
        FileOutcome::Patch(PatchOutcome::NoEligibleEntry { .. }) => "NO IDS LIST",
        FileOutcome::Patch(PatchOutcome::InvalidHeader { .. }) => "INVALID HEADER",
        FileOutcome::NoDescriptor => "NO DESCRIPTOR",
        FileOutcome::Failed { .. } => "FAILED",
    }
}

fn outcome_detail(outcome: &FileOutcome) -> String {
    match outcome {
        FileOutcome::Patch(patch) => patch.path().display().to_string(),
        FileOutcome::NoDescriptor => "-".to_string(),
        FileOutcome::Failed { reason } => reason.clone(),
    }
}
