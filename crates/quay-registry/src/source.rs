//! Content sources for bulk registry population.
//!
//! A source enumerates the identifiers of every entry in a category and
//! loads a value from an identifier. Sources are only consulted at startup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use quay_types::error::{QuayError, Result};
use quay_types::status::ResultStatus;

/// Enumerable content keyed by category.
pub trait ContentSource<V> {
    /// Identifiers of all entries in `category`, in a stable order.
    fn find(&self, category: &str) -> Result<Vec<String>>;

    /// Load the value behind an identifier returned by [`find`](Self::find).
    fn load(&self, id: &str) -> Result<V>;
}

/// Files under `root/<category>/` with a `.toml` or `.json` extension.
///
/// Identifiers are paths relative to `root` using `/` separators, e.g.
/// `items/sword.toml`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn supported_extension(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("toml") | Some("json")
    )
}

impl<V: DeserializeOwned> ContentSource<V> for DirectorySource {
    fn find(&self, category: &str) -> Result<Vec<String>> {
        let dir = self.root.join(category);
        if !dir.is_dir() {
            log::warn!("Content category '{category}' not found at {}", dir.display());
            return Err(ResultStatus::PathDoesNotExist.into());
        }
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if !path.is_file() || !supported_extension(&path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                ids.push(format!("{category}/{name}"));
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn load(&self, id: &str) -> Result<V> {
        let path = self.root.join(id);
        if !path.is_file() {
            return Err(ResultStatus::PathDoesNotExist.into());
        }
        let text = std::fs::read_to_string(&path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => {
                toml::from_str(&text).map_err(|e| QuayError::Content(format!("{id}: {e}")))
            },
            Some("json") => {
                serde_json::from_str(&text).map_err(|e| QuayError::Content(format!("{id}: {e}")))
            },
            _ => Err(QuayError::Content(format!("{id}: unsupported file type"))),
        }
    }
}

/// In-memory content, for embedded defaults and tests.
#[derive(Debug, Clone)]
pub struct MemorySource<V> {
    categories: HashMap<String, Vec<String>>,
    values: HashMap<String, V>,
}

impl<V> MemorySource<V> {
    pub fn new() -> Self {
        Self {
            categories: HashMap::new(),
            values: HashMap::new(),
        }
    }

    /// Add an entry. Re-inserting an identifier replaces its value.
    pub fn insert(&mut self, category: &str, id: &str, value: V) {
        let ids = self.categories.entry(category.to_string()).or_default();
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
        self.values.insert(id.to_string(), value);
    }
}

impl<V> Default for MemorySource<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> ContentSource<V> for MemorySource<V> {
    fn find(&self, category: &str) -> Result<Vec<String>> {
        Ok(self.categories.get(category).cloned().unwrap_or_default())
    }

    fn load(&self, id: &str) -> Result<V> {
        self.values
            .get(id)
            .cloned()
            .ok_or_else(|| ResultStatus::PathDoesNotExist.into())
    }
}
