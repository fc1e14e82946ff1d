//! Error types for tafsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while reading or writing descriptor documents.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// Underlying I/O failure, with the path that was being accessed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (write path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load, with the file path and serde_yaml's line context.
    #[error("failed to parse descriptor at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document parsed, but its top level is not a mapping.
    #[error("descriptor at {path} is not a mapping")]
    NotAMapping { path: PathBuf },
}

/// Convenience constructor for [`DescriptorError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DescriptorError {
    DescriptorError::Io {
        path: path.into(),
        source,
    }
}
