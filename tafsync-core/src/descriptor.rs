//! Descriptor documents and the identifier-record patcher.
//!
//! A descriptor is a YAML mapping with a `data` list. Each entry of `data`
//! may carry an `ids` list of identifier records:
//!
//! ```yaml
//! article: tt-42
//! data:
//!   - series: Example
//!     ids:
//!       - audio-id: 1700000000
//!         hash: 3f2a…
//!         size: 12345
//!         tracks: 4
//!         confidence: 1
//! ```
//!
//! Everything outside `data[].ids` is opaque: it is loaded into an ordered
//! [`serde_yaml::Mapping`] and written back untouched, in the same key order.
//!
//! # Write flow
//!
//! Serialize → `<name>.yaml.tmp` sibling → `rename`. The temp file lives in the
//! same directory as the target, so the rename never crosses filesystems.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::{io_err, DescriptorError};
use crate::types::{IdRecord, TafHeader};

/// File extension of descriptor documents, without the leading dot.
pub const DESCRIPTOR_EXTENSION: &str = "yaml";

const DATA_KEY: &str = "data";
const IDS_KEY: &str = "ids";
const AUDIO_ID_KEY: &str = "audio-id";
const HASH_KEY: &str = "hash";

// ---------------------------------------------------------------------------
// Patch outcome
// ---------------------------------------------------------------------------

/// Outcome of applying one TAF header to one descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PatchOutcome {
    /// A new identifier record was inserted and the file rewritten.
    Patched { path: PathBuf },
    /// Dry-run mode: the record *would* have been inserted.
    WouldPatch { path: PathBuf },
    /// An identical (audio-id, hash) record exists already; nothing written.
    AlreadyPresent { path: PathBuf },
    /// No entry of the document carries an `ids` list; nothing written.
    NoEligibleEntry { path: PathBuf },
    /// Header absent, marked invalid, or missing audio id / hash; file not read.
    InvalidHeader { path: PathBuf },
}

impl PatchOutcome {
    pub fn path(&self) -> &Path {
        match self {
            PatchOutcome::Patched { path }
            | PatchOutcome::WouldPatch { path }
            | PatchOutcome::AlreadyPresent { path }
            | PatchOutcome::NoEligibleEntry { path }
            | PatchOutcome::InvalidHeader { path } => path,
        }
    }

    /// `true` when the descriptor changed (or would change in dry-run mode).
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            PatchOutcome::Patched { .. } | PatchOutcome::WouldPatch { .. }
        )
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// An in-memory descriptor document bound to its file path.
#[derive(Debug, Clone)]
pub struct Descriptor {
    path: PathBuf,
    root: Mapping,
}

impl Descriptor {
    /// Load and parse the descriptor at `path`.
    ///
    /// Returns [`DescriptorError::Parse`] (with path and line context) for
    /// malformed YAML and [`DescriptorError::NotAMapping`] when the top level
    /// is a list or scalar.
    pub fn load(path: &Path) -> Result<Self, DescriptorError> {
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let value: Value = serde_yaml::from_str(&contents).map_err(|e| DescriptorError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        match value {
            Value::Mapping(root) => Ok(Self {
                path: path.to_path_buf(),
                root,
            }),
            _ => Err(DescriptorError::NotAMapping {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `true` when any entry already lists a record with the same audio id and hash.
    pub fn contains(&self, record: &IdRecord) -> Result<bool, DescriptorError> {
        let audio_id = serde_yaml::to_value(&record.audio_id)?;
        let hash = Value::String(record.hash.clone());
        Ok(self.entries().any(|entry| {
            entry
                .get(IDS_KEY)
                .and_then(Value::as_sequence)
                .is_some_and(|ids| {
                    ids.iter().any(|id| {
                        id.get(AUDIO_ID_KEY) == Some(&audio_id) && id.get(HASH_KEY) == Some(&hash)
                    })
                })
        }))
    }

    /// Insert `record` at the head of the first entry that has an `ids` key.
    ///
    /// An `ids` key with a null value counts as an empty list. Returns `false`
    /// when no entry is eligible. Does not check for duplicates; see
    /// [`Descriptor::contains`].
    pub fn insert(&mut self, record: &IdRecord) -> Result<bool, DescriptorError> {
        let value = serde_yaml::to_value(record)?;
        let Some(Value::Sequence(entries)) = self.root.get_mut(DATA_KEY) else {
            return Ok(false);
        };
        for entry in entries.iter_mut() {
            let Some(ids) = entry.get_mut(IDS_KEY) else {
                continue;
            };
            if ids.is_null() {
                *ids = Value::Sequence(vec![value]);
                return Ok(true);
            }
            if let Some(list) = ids.as_sequence_mut() {
                list.insert(0, value);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Atomically write the document back to its path.
    pub fn save(&self) -> Result<(), DescriptorError> {
        let yaml = serde_yaml::to_string(&self.root)?;
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp_path = self.path.with_file_name(format!("{file_name}.tmp"));

        std::fs::write(&tmp_path, yaml).map_err(|e| io_err(&tmp_path, e))?;
        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(io_err(&self.path, e));
        }
        Ok(())
    }

    fn entries(&self) -> impl Iterator<Item = &Value> {
        self.root
            .get(DATA_KEY)
            .and_then(Value::as_sequence)
            .into_iter()
            .flatten()
    }
}

// ---------------------------------------------------------------------------
// patch
// ---------------------------------------------------------------------------

/// Merge the identifier record described by `header` into the descriptor at
/// `path`.
///
/// The file is neither read nor written unless the header is present, valid,
/// and carries both an audio id and a hash. The document is rewritten only
/// when a record is actually inserted, and at most one entry is patched.
pub fn patch(
    path: &Path,
    header: Option<&TafHeader>,
    dry_run: bool,
) -> Result<PatchOutcome, DescriptorError> {
    let Some(record) = header.and_then(IdRecord::from_header) else {
        tracing::debug!(path = %path.display(), "no usable TAF header; skipping");
        return Ok(PatchOutcome::InvalidHeader {
            path: path.to_path_buf(),
        });
    };

    let mut descriptor = Descriptor::load(path)?;

    if descriptor.contains(&record)? {
        tracing::warn!(
            path = %path.display(),
            audio_id = %record.audio_id,
            "id already present, skipping write"
        );
        return Ok(PatchOutcome::AlreadyPresent {
            path: path.to_path_buf(),
        });
    }

    if !descriptor.insert(&record)? {
        tracing::warn!(path = %path.display(), "no entry with an ids list; skipping write");
        return Ok(PatchOutcome::NoEligibleEntry {
            path: path.to_path_buf(),
        });
    }

    if dry_run {
        tracing::info!("[dry-run] would update: {}", path.display());
        return Ok(PatchOutcome::WouldPatch {
            path: path.to_path_buf(),
        });
    }

    descriptor.save()?;
    tracing::info!(audio_id = %record.audio_id, "updated: {}", path.display());
    Ok(PatchOutcome::Patched {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
