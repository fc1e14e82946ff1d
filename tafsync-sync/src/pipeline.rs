//! Sync pipeline entrypoint used by the CLI.
//!
//! One [`Pipeline::run`] is one pass: reconcile the working copy, fetch both
//! listings, attach tag metadata to unidentified files, patch their
//! descriptors, then commit and push.

use serde::Serialize;

use tafsync_client::MediaSource;
use tafsync_core::{descriptor, DescriptorStore, FileRecord, PatchOutcome};

use crate::correlate::attach_tag_info;
use crate::error::SyncError;
use crate::repo::{PublishReport, RepoSynchronizer, WorkingCopyState};

/// What happened to one matched file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// The descriptor was found and the patcher ran.
    Patch(PatchOutcome),
    /// No `<model>.yaml` exists in the working copy.
    NoDescriptor,
    /// The descriptor could not be read or written.
    Failed { reason: String },
}

/// Per-file line of a [`RunReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub file: String,
    pub model: Option<String>,
    pub outcome: FileOutcome,
}

/// Outcome of one pipeline pass.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    /// `None` in dry-run mode, where the working copy is left as is.
    pub working_copy: Option<WorkingCopyState>,
    /// Number of files in the library listing.
    pub library_files: usize,
    pub files: Vec<FileReport>,
    /// `None` in dry-run mode.
    pub publish: Option<PublishReport>,
}

impl RunReport {
    /// Number of descriptors that changed (or would change).
    pub fn changed(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(&f.outcome, FileOutcome::Patch(p) if p.is_change()))
            .count()
    }
}

/// The collaborators of a sync run, built once at startup.
pub struct Pipeline<S> {
    source: S,
    store: DescriptorStore,
    repo: RepoSynchronizer,
}

impl<S: MediaSource> Pipeline<S> {
    pub fn new(source: S, store: DescriptorStore, repo: RepoSynchronizer) -> Self {
        Self {
            source,
            store,
            repo,
        }
    }

    /// Run one pass.
    ///
    /// Returns an error only when a listing cannot be fetched; nothing is
    /// patched, committed, or pushed in that case. In `dry_run` mode the
    /// working copy is neither reconciled nor written, and nothing is
    /// committed or pushed.
    pub fn run(&self, dry_run: bool) -> Result<RunReport, SyncError> {
        let working_copy = if dry_run {
            None
        } else {
            Some(self.repo.prepare())
        };

        let files = self.source.library_files().map_err(SyncError::Library)?;
        let tags = self.source.tag_index().map_err(SyncError::Tags)?;
        let library_files = files.len();

        let matched = attach_tag_info(files, &tags);
        tracing::info!(
            library_files,
            tags = tags.len(),
            matched = matched.len(),
            "correlated library with tag index"
        );

        let files = matched
            .iter()
            .map(|file| FileReport {
                file: file.name.clone(),
                model: file.model().map(str::to_owned),
                outcome: self.patch_file(file, dry_run),
            })
            .collect();

        let publish = if dry_run {
            None
        } else {
            Some(self.repo.publish())
        };

        Ok(RunReport {
            dry_run,
            working_copy,
            library_files,
            files,
            publish,
        })
    }

    fn patch_file(&self, file: &FileRecord, dry_run: bool) -> FileOutcome {
        let Some(path) = self.store.find_by_model(file.model()) else {
            tracing::warn!(file = %file.name, model = ?file.model(), "no descriptor for model");
            return FileOutcome::NoDescriptor;
        };
        match descriptor::patch(&path, file.taf_header.as_ref(), dry_run) {
            Ok(outcome) => FileOutcome::Patch(outcome),
            Err(err) => {
                tracing::error!(file = %file.name, error = %err, "failed to patch descriptor");
                FileOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}
