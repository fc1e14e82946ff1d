//! Domain types shared by the media client, the descriptor patcher and the
//! sync pipeline.
//!
//! Remote records mirror the TeddyCloud JSON payloads (camelCase keys);
//! [`IdRecord`] mirrors one entry of a descriptor document's `ids` list
//! (kebab-case keys, serialized in declaration order).

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Audio id as reported by a TAF header.
///
/// TeddyCloud reports numbers, older descriptors sometimes carry strings.
/// The shape is preserved so comparisons against existing descriptor entries
/// are exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AudioId {
    Number(u64),
    Text(String),
}

impl fmt::Display for AudioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioId::Number(n) => n.fmt(f),
            AudioId::Text(s) => s.fmt(f),
        }
    }
}

impl From<u64> for AudioId {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for AudioId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Remote records
// ---------------------------------------------------------------------------

/// Identifying metadata for a figurine model.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TonieInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<String>,
}

/// Header metadata parsed by the server from a TAF file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TafHeader {
    #[serde(default)]
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_id: Option<AudioId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default)]
    pub track_seconds: Vec<f64>,
}

/// One entry of the library file listing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tonie_info: Option<TonieInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taf_header: Option<TafHeader>,
}

impl FileRecord {
    /// Model of the attached identifying metadata, if any.
    pub fn model(&self) -> Option<&str> {
        self.tonie_info.as_ref()?.model.as_deref()
    }
}

/// One entry of the tag index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRecord {
    /// Path of the audio file the tag points at, e.g. `lib://by/audioID/…/alpha.taf`.
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tonie_info: Option<TonieInfo>,
}

// ---------------------------------------------------------------------------
// Descriptor records
// ---------------------------------------------------------------------------

/// Confidence assigned to a freshly inserted identifier record.
pub const INITIAL_CONFIDENCE: u32 = 0;

/// A single fingerprint recorded against a descriptor entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRecord {
    #[serde(rename = "audio-id")]
    pub audio_id: AudioId,
    pub hash: String,
    #[serde(default)]
    pub size: Option<u64>,
    pub tracks: usize,
    pub confidence: u32,
}

impl IdRecord {
    /// Build a record from a TAF header.
    ///
    /// Returns `None` unless the header is valid and carries both an audio id
    /// and a hash.
    pub fn from_header(header: &TafHeader) -> Option<Self> {
        if !header.valid {
            return None;
        }
        Some(Self {
            audio_id: header.audio_id.clone()?,
            hash: header.sha1_hash.clone()?,
            size: header.size,
            tracks: header.track_seconds.len(),
            confidence: INITIAL_CONFIDENCE,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
