//! Error types for tafsync-sync.

use thiserror::Error;

use tafsync_client::ClientError;

/// A failed `git` invocation.
#[derive(Debug, Error)]
pub enum GitError {
    /// The `git` binary could not be started.
    #[error("failed to spawn git {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// `git` ran and exited unsuccessfully. `stderr` has credentials redacted.
    #[error("git {command} failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Errors that abort a pipeline run before any descriptor is touched.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The library file listing could not be fetched.
    #[error("failed to get library: {0}")]
    Library(#[source] ClientError),

    /// The tag index could not be fetched.
    #[error("failed to get tags: {0}")]
    Tags(#[source] ClientError),
}
