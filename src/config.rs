// src/config.rs
// Where the trainer keeps its files and how many answers it offers.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::options::DEFAULT_OPTION_COUNT;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub items_csv: PathBuf,
    pub reviews_csv: PathBuf,
    pub db_path: PathBuf,
    pub cache_dir: PathBuf,
    pub media_index: PathBuf,
    /// Species code -> Macaulay Library photo, for catalogs without image URLs.
    pub lookup_index: PathBuf,
    pub option_count: usize,
}

impl Config {
    pub fn new() -> Self {
        Self {
            items_csv: PathBuf::from("data/items.csv"),
            reviews_csv: PathBuf::from("data/reviews.csv"),
            db_path: PathBuf::from("data/sr_state.sqlite"),
            cache_dir: PathBuf::from("cache"),
            media_index: PathBuf::from("cache/media_index.json"),
            lookup_index: PathBuf::from("cache/media_lookup.json"),
            option_count: DEFAULT_OPTION_COUNT,
        }
    }

    /// Reads a JSON config file; fields it leaves out keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        log::debug!("Loaded config from {:?}: {:?}", path, config);
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("birdquiz.json");
        fs::write(&path, r#"{"option_count": 5, "cache_dir": "/tmp/birds"}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.option_count, 5);
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/birds"));
        assert_eq!(config.db_path, Config::new().db_path);
        assert_eq!(config.lookup_index, PathBuf::from("cache/media_lookup.json"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Config::load(Path::new("/definitely/not/here.json")).is_err());
    }
}
