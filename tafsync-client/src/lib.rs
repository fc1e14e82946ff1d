//! # tafsync-client
//!
//! Read-only access to the TeddyCloud HTTP API.
//!
//! Two listings are exposed through [`MediaSource`]: the library file index
//! and the tag index. [`TeddyCloudClient`] implements it over blocking HTTP
//! with one bounded-timeout request per call; failures come back as
//! [`ClientError`] values and never panic.

pub mod error;

use std::io::Read;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use tafsync_core::{FileRecord, TagRecord};

pub use error::{ClientError, ErrorKind};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const LIBRARY_PATH: &str = "/api/fileIndexV2?path=/by/audioID&special=library";
const TAG_INDEX_PATH: &str = "/api/getTagIndex";

/// A source of library files and tags.
pub trait MediaSource {
    /// Files in the server's audio library.
    fn library_files(&self) -> Result<Vec<FileRecord>, ClientError>;

    /// Every known tag, with its source path and model metadata.
    fn tag_index(&self) -> Result<Vec<TagRecord>, ClientError>;
}

#[derive(Debug, Deserialize)]
struct LibraryBody {
    #[serde(default)]
    files: Vec<FileRecord>,
}

#[derive(Debug, Deserialize)]
struct TagIndexBody {
    #[serde(default)]
    tags: Vec<TagRecord>,
}

/// Blocking TeddyCloud API client.
#[derive(Debug, Clone)]
pub struct TeddyCloudClient {
    base_url: String,
    agent: ureq::Agent,
}

impl TeddyCloudClient {
    /// `base_url` is the server root, e.g. `http://teddycloud.local`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { base_url, agent }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let started = Instant::now();
        tracing::debug!(%url, "fetching");

        let response = match self.agent.get(&url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                tracing::error!(%url, status = code, "unexpected response code");
                return Err(ClientError::Status(code));
            }
            Err(err) => {
                let elapsed = started.elapsed().as_secs_f64();
                tracing::error!(%url, "request failed after {elapsed:.2} seconds: {err}");
                return Err(ClientError::Transport(err.to_string()));
            }
        };
        tracing::info!(
            %url,
            "request completed in {:.2} seconds",
            started.elapsed().as_secs_f64()
        );

        let status = response.status();
        if status != 200 && status != 206 {
            tracing::error!(%url, status, "unexpected response code");
            return Err(ClientError::Status(status));
        }

        decode_body(response.into_reader()).map_err(|err| {
            tracing::error!(%url, error = %err, "could not decode response body");
            err
        })
    }
}

impl MediaSource for TeddyCloudClient {
    fn library_files(&self) -> Result<Vec<FileRecord>, ClientError> {
        let body: LibraryBody = self.get_json(LIBRARY_PATH)?;
        tracing::debug!(count = body.files.len(), "library files received");
        Ok(body.files)
    }

    fn tag_index(&self) -> Result<Vec<TagRecord>, ClientError> {
        let body: TagIndexBody = self.get_json(TAG_INDEX_PATH)?;
        tracing::debug!(count = body.tags.len(), "tags received");
        Ok(body.tags)
    }
}

/// Decode a JSON body, separating read failures from malformed content.
fn decode_body<T: DeserializeOwned>(reader: impl Read) -> Result<T, ClientError> {
    serde_json::from_reader(reader).map_err(|err| {
        if err.is_io() {
            ClientError::Transport(format!("failed to read response: {err}"))
        } else {
            ClientError::Parse(err.to_string())
        }
    })
}
