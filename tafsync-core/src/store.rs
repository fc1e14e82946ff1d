//! Descriptor lookup by model identifier.
//!
//! Descriptors are named `<model>.yaml` and may live at any depth below the
//! descriptor root. The walk is sorted by file name at every directory level
//! and skips hidden directories (`.git` in particular), so when the same file
//! name exists in two subdirectories the lexicographically-first depth-first
//! match wins on every platform.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::descriptor::DESCRIPTOR_EXTENSION;

/// Locates descriptor documents inside a working copy.
#[derive(Debug, Clone)]
pub struct DescriptorStore {
    root: PathBuf,
}

impl DescriptorStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `<model>.yaml` below the root, or `None` when `model` is empty
    /// or absent, or no such file exists.
    pub fn find_by_model(&self, model: Option<&str>) -> Option<PathBuf> {
        let model = model.map(str::trim).filter(|m| !m.is_empty())?;
        let wanted = format!("{model}.{DESCRIPTOR_EXTENSION}");

        let found = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
            .filter_map(Result::ok)
            .find(|e| e.file_type().is_file() && e.file_name().to_str() == Some(wanted.as_str()))
            .map(DirEntry::into_path);

        match &found {
            Some(path) => tracing::debug!(model, path = %path.display(), "found descriptor"),
            None => tracing::debug!(model, "no descriptor found"),
        }
        found
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
