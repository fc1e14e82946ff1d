//! # tafsync-sync
//!
//! Descriptor repository synchronization and the sync pipeline.
//!
//! Build a [`Pipeline`] from a [`MediaSource`](tafsync_client::MediaSource),
//! a [`DescriptorStore`](tafsync_core::DescriptorStore) and a
//! [`RepoSynchronizer`], then call [`Pipeline::run`].

pub mod correlate;
pub mod error;
pub mod git;
pub mod pipeline;
pub mod repo;

pub use error::{GitError, SyncError};
pub use pipeline::{FileOutcome, FileReport, Pipeline, RunReport};
pub use repo::{
    CommitOutcome, PublishReport, PushOutcome, RepoConfig, RepoSynchronizer, WorkingCopyState,
};
