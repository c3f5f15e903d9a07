// src/media/index.rs
// Small JSON-backed key/value caches for media, kept across runs.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::MediaError;

/// A picture already on disk for an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaEntry {
    pub path: PathBuf,
    pub license: String,
    pub credit: String,
}

/// Item id -> cached value. Loaded once when created and written back to disk
/// on every insert.
#[derive(Debug)]
pub struct MediaIndex<V = MediaEntry> {
    path: PathBuf,
    entries: BTreeMap<String, V>,
    /// False when the file exists but could not be read; it is then never
    /// overwritten.
    writable: bool,
}

impl<V: Serialize + DeserializeOwned> MediaIndex<V> {
    /// Loads the index at `path`. A missing file starts empty; an unreadable
    /// one starts empty and is left untouched on disk.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (entries, writable) = match fs::read_to_string(&path) {
            Ok(content) => {
                let entries = serde_json::from_str(&content).unwrap_or_else(|e| {
                    log::warn!("Ignoring corrupt media index {:?}: {}", path, e);
                    BTreeMap::new()
                });
                (entries, true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => (BTreeMap::new(), true),
            Err(e) => {
                log::warn!("Cannot read media index {:?}, keeping it in memory only: {}", path, e);
                (BTreeMap::new(), false)
            }
        };
        log::debug!("Media index {:?} holds {} entries", path, entries.len());
        MediaIndex { path, entries, writable }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, key: &str, value: V) -> Result<(), MediaError> {
        self.entries.insert(key.to_string(), value);
        if self.writable {
            self.flush()
        } else {
            Ok(())
        }
    }

    /// Replaces the file atomically so a crash never leaves half an index.
    fn flush(&self) -> Result<(), MediaError> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => Path::new(".").to_path_buf(),
        };
        fs::create_dir_all(&dir)?;

        let mut temp = tempfile::NamedTempFile::new_in(&dir)?;
        temp.write_all(serde_json::to_string_pretty(&self.entries)?.as_bytes())?;
        temp.persist(&self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> MediaEntry {
        MediaEntry { path: PathBuf::from(name), license: "CC-BY".into(), credit: "Jane".into() }
    }

    #[test]
    fn test_insert_is_flushed_and_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache").join("media_index.json");

        let mut index: MediaIndex = MediaIndex::load(&path);
        assert!(index.is_empty());
        index.insert("amerob", entry("a.jpg")).unwrap();
        index.insert("blujay", entry("b.jpg")).unwrap();

        let reloaded: MediaIndex = MediaIndex::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("amerob"), Some(&entry("a.jpg")));
    }

    #[test]
    fn test_corrupt_index_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("media_index.json");
        fs::write(&path, "{not json").unwrap();
        assert!(MediaIndex::<MediaEntry>::load(&path).is_empty());
    }

    #[test]
    fn test_unreadable_index_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be: reading fails with something
        // other than NotFound.
        let path = dir.path().join("media_index.json");
        fs::create_dir(&path).unwrap();

        let mut index: MediaIndex = MediaIndex::load(&path);
        assert!(index.is_empty());
        index.insert("amerob", entry("a.jpg")).unwrap();
        assert_eq!(index.get("amerob"), Some(&entry("a.jpg")));
        assert!(path.is_dir());
    }
}
