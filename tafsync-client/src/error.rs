//! Error types for tafsync-client.

use thiserror::Error;

/// Why a listing request failed. Every variant carries a human-readable reason.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, DNS, TLS or timeout failure before a status line arrived.
    #[error("external request failed: {0}")]
    Transport(String),

    /// The server answered with a status other than 200 or 206.
    #[error("unexpected response code: {0}")]
    Status(u16),

    /// The body could not be read or is not the expected JSON shape.
    #[error("failed to parse JSON: {0}")]
    Parse(String),
}

/// Coarse classification of a [`ClientError`], for logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Protocol,
    Parse,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::Status(_) => ErrorKind::Protocol,
            ClientError::Parse(_) => ErrorKind::Parse,
        }
    }
}
