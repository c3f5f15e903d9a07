// src/media/cache.rs
// On-disk cache of item pictures, keyed by the hash of their source URL.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use sha2::{Digest, Sha256};

use super::{ImageFetcher, MediaEntry, MediaIndex, MediaRef, MediaResolver};
use crate::catalog::Item;
use crate::error::MediaError;

/// Where `url` is cached inside `dir`.
pub fn url_to_path(url: &str, dir: &Path) -> PathBuf {
    let digest = Sha256::digest(url.as_bytes());
    dir.join(format!("{}.jpg", hex::encode(digest)))
}

pub struct ImageCache<F: ImageFetcher> {
    dir: PathBuf,
    fetcher: F,
    index: MediaIndex,
}

impl<F: ImageFetcher> ImageCache<F> {
    pub fn new(dir: impl Into<PathBuf>, index: MediaIndex, fetcher: F) -> Result<Self, MediaError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(ImageCache { dir, fetcher, index })
    }

    pub fn index(&self) -> &MediaIndex {
        &self.index
    }

    /// Makes sure `url` is on disk. Returns the cached path and whether a
    /// download was needed.
    pub fn fetch_url(&self, url: &str) -> Result<(PathBuf, bool), MediaError> {
        let path = url_to_path(url, &self.dir);
        if path.exists() {
            return Ok((path, false));
        }

        let bytes = self.fetcher.fetch(url)?;
        let image = image::load_from_memory(&bytes)?;

        // Normalise everything to RGB JPEG; encode in memory so a failed
        // encode never leaves a truncated file behind.
        let mut encoded = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image.to_rgb8()).write_to(&mut encoded, ImageFormat::Jpeg)?;

        let mut temp = tempfile::NamedTempFile::new_in(&self.dir)?;
        std::io::Write::write_all(&mut temp, encoded.get_ref())?;
        temp.persist(&path)?;
        log::info!("Cached {} -> {:?}", url, path);
        Ok((path, true))
    }

    /// Caches an item's picture and records it, with its attribution, in the
    /// media index.
    pub fn cache_item(&mut self, item: &Item) -> Result<(PathBuf, bool), MediaError> {
        let (path, downloaded) = self.fetch_url(&item.image_url)?;
        let entry = MediaEntry { path: path.clone(), license: item.license.clone(), credit: item.credit.clone() };
        self.index.insert(&item.id, entry)?;
        Ok((path, downloaded))
    }
}

impl<F: ImageFetcher> MediaResolver for ImageCache<F> {
    fn resolve(&mut self, item: &Item) -> MediaRef {
        if let Some(entry) = self.index.get(&item.id) {
            if entry.path.exists() {
                return MediaRef::Available {
                    path: entry.path.clone(),
                    license: entry.license.clone(),
                    credit: entry.credit.clone(),
                };
            }
        }

        if item.image_url.is_empty() {
            return MediaRef::Unavailable;
        }

        match self.cache_item(item) {
            Ok((path, _)) => {
                MediaRef::Available { path, license: item.license.clone(), credit: item.credit.clone() }
            }
            Err(e) => {
                log::warn!("Image for {} unavailable: {}", item.id, e);
                MediaRef::Unavailable
            }
        }
    }
}
