// src/media/mod.rs
// Resolves the picture shown for an item. Nothing in the quiz engine depends
// on this succeeding; a failed lookup just means "Image unavailable".

pub mod cache;
pub mod index;
pub mod lookup;

use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::Item;
use crate::error::MediaError;

pub use self::cache::ImageCache;
pub use self::index::{MediaEntry, MediaIndex};
pub use self::lookup::{LookupResolver, MediaInfo, MediaLookup};

/// What the UI can show for an item.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaRef {
    Available { path: PathBuf, license: String, credit: String },
    Unavailable,
}

pub trait MediaResolver {
    fn resolve(&mut self, item: &Item) -> MediaRef;
}

/// Downloads raw image bytes.
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, MediaError>;
}

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, MediaError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(HttpFetcher { client })
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, MediaError> {
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}
