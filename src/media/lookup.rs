// src/media/lookup.rs
// Finds a Macaulay Library photo and its attribution for a species code.

use serde::{Deserialize, Serialize};

use super::{ImageFetcher, MediaIndex, MediaRef, MediaResolver};
use crate::catalog::Item;
use crate::error::MediaError;

pub const MACAULAY_SEARCH_URL: &str = "https://search.macaulaylibrary.org/api/v1/search";
pub const MACAULAY_ASSET_URL: &str = "https://cdn.download.ams.birds.cornell.edu/api/v1/asset";

/// The first photo the library returns for a species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub asset_id: u64,
    pub license: String,
    pub credit: String,
}

impl MediaInfo {
    /// 320px rendition of the asset.
    pub fn image_url(&self) -> String {
        format!("{}/{}/320", MACAULAY_ASSET_URL, self.asset_id)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResult {
    asset_id: u64,
    #[serde(default)]
    license_code: Option<String>,
    #[serde(default)]
    user_display_name: Option<String>,
}

pub fn search_url(species_code: &str) -> String {
    format!("{}?taxonCode={}&mediaType=photo&count=1", MACAULAY_SEARCH_URL, species_code)
}

/// Species code -> photo lookups, cached in a `MediaIndex` so each code is
/// searched at most once across runs.
pub struct MediaLookup<F: ImageFetcher> {
    fetcher: F,
    index: MediaIndex<MediaInfo>,
}

impl<F: ImageFetcher> MediaLookup<F> {
    pub fn new(index: MediaIndex<MediaInfo>, fetcher: F) -> Self {
        MediaLookup { fetcher, index }
    }

    pub fn index(&self) -> &MediaIndex<MediaInfo> {
        &self.index
    }

    /// `Ok(None)` when the library has no photo for the code. Misses are not
    /// cached.
    pub fn lookup(&mut self, species_code: &str) -> Result<Option<MediaInfo>, MediaError> {
        if let Some(info) = self.index.get(species_code) {
            return Ok(Some(info.clone()));
        }

        let body = self.fetcher.fetch(&search_url(species_code))?;
        let response: SearchResponse = serde_json::from_slice(&body)?;
        let Some(first) = response.results.into_iter().next() else {
            log::info!("No Macaulay Library photo for {}", species_code);
            return Ok(None);
        };

        let info = MediaInfo {
            asset_id: first.asset_id,
            license: first.license_code.unwrap_or_else(|| "Unknown".to_string()),
            credit: first.user_display_name.unwrap_or_else(|| "Unknown".to_string()),
        };
        self.index.insert(species_code, info.clone())?;
        Ok(Some(info))
    }

    /// Fills in the picture and attribution of an item that has no image URL.
    /// Items that already have one, and failed lookups, come back unchanged.
    pub fn enrich(&mut self, item: &Item) -> Item {
        if !item.image_url.is_empty() {
            return item.clone();
        }
        match self.lookup(&item.id) {
            Ok(Some(info)) => Item {
                image_url: info.image_url(),
                license: info.license,
                credit: info.credit,
                ..item.clone()
            },
            Ok(None) => item.clone(),
            Err(e) => {
                log::warn!("Media lookup for {} failed: {}", item.id, e);
                item.clone()
            }
        }
    }
}

/// Looks up missing pictures before handing the item to another resolver.
pub struct LookupResolver<F: ImageFetcher, R: MediaResolver> {
    lookup: MediaLookup<F>,
    inner: R,
}

impl<F: ImageFetcher, R: MediaResolver> LookupResolver<F, R> {
    pub fn new(lookup: MediaLookup<F>, inner: R) -> Self {
        LookupResolver { lookup, inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<F: ImageFetcher, R: MediaResolver> MediaResolver for LookupResolver<F, R> {
    fn resolve(&mut self, item: &Item) -> MediaRef {
        let item = self.lookup.enrich(item);
        self.inner.resolve(&item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const SEARCH_BODY: &str = r#"{"results":[{"assetId":123,"licenseCode":"CC","userDisplayName":"Jane"}]}"#;

    struct FakeFetcher {
        body: Option<&'static str>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        fn serving(body: Option<&'static str>) -> Self {
            FakeFetcher { body, calls: RefCell::new(Vec::new()) }
        }
    }

    impl ImageFetcher for FakeFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, MediaError> {
            self.calls.borrow_mut().push(url.to_string());
            self.body
                .map(|b| b.as_bytes().to_vec())
                .ok_or_else(|| MediaError::Io(std::io::Error::new(std::io::ErrorKind::Other, "offline")))
        }
    }

    /// Remembers the items it was asked about.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<Item>,
    }

    impl MediaResolver for Recorder {
        fn resolve(&mut self, item: &Item) -> MediaRef {
            self.seen.push(item.clone());
            MediaRef::Unavailable
        }
    }

    fn index_path(dir: &tempfile::TempDir) -> std::path::PathBuf {
        dir.path().join("media_lookup.json")
    }

    fn jane() -> MediaInfo {
        MediaInfo { asset_id: 123, license: "CC".into(), credit: "Jane".into() }
    }

    #[test]
    fn test_lookup_fetches_then_uses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = index_path(&dir);
        let mut lookup = MediaLookup::new(MediaIndex::load(&path), FakeFetcher::serving(Some(SEARCH_BODY)));

        assert_eq!(lookup.lookup("norcar").unwrap(), Some(jane()));
        {
            let calls = lookup.fetcher.calls.borrow();
            assert_eq!(calls.len(), 1);
            assert!(calls[0].starts_with("https://search.macaulaylibrary.org/"));
            assert!(calls[0].contains("taxonCode=norcar"));
        }

        lookup.fetcher.calls.borrow_mut().clear();
        assert_eq!(lookup.lookup("norcar").unwrap(), Some(jane()));
        assert!(lookup.fetcher.calls.borrow().is_empty());

        // A fresh lookup over the same file starts warm.
        let mut reloaded = MediaLookup::new(MediaIndex::load(&path), FakeFetcher::serving(None));
        assert_eq!(reloaded.lookup("norcar").unwrap(), Some(jane()));
        assert!(reloaded.fetcher.calls.borrow().is_empty());
    }

    #[test]
    fn test_lookup_without_results_is_none_and_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let index = MediaIndex::load(index_path(&dir));
        let mut lookup = MediaLookup::new(index, FakeFetcher::serving(Some(r#"{"results":[]}"#)));
        assert_eq!(lookup.lookup("xxxxxx").unwrap(), None);
        assert!(lookup.index().is_empty());
    }

    #[test]
    fn test_malformed_response_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let index = MediaIndex::load(index_path(&dir));
        let mut lookup = MediaLookup::new(index, FakeFetcher::serving(Some("<html>")));
        assert!(matches!(lookup.lookup("norcar"), Err(MediaError::Json(_))));
    }

    #[test]
    fn test_enrich_fills_url_and_attribution() {
        let dir = tempfile::tempdir().unwrap();
        let index = MediaIndex::load(index_path(&dir));
        let mut lookup = MediaLookup::new(index, FakeFetcher::serving(Some(SEARCH_BODY)));

        let bare = Item::new("norcar", "Northern Cardinal", "birds");
        let enriched = lookup.enrich(&bare);
        assert_eq!(enriched.image_url, format!("{}/123/320", MACAULAY_ASSET_URL));
        assert_eq!(enriched.license, "CC");
        assert_eq!(enriched.credit, "Jane");
        assert_eq!(enriched.id, "norcar");

        let with_url = Item { image_url: "http://x/1.jpg".into(), ..bare };
        assert_eq!(lookup.enrich(&with_url), with_url);
        assert_eq!(lookup.fetcher.calls.borrow().len(), 1);
    }

    #[test]
    fn test_enrich_keeps_item_when_offline() {
        let dir = tempfile::tempdir().unwrap();
        let index = MediaIndex::load(index_path(&dir));
        let mut lookup = MediaLookup::new(index, FakeFetcher::serving(None));
        let bare = Item::new("norcar", "Northern Cardinal", "birds");
        assert_eq!(lookup.enrich(&bare), bare);
    }

    #[test]
    fn test_resolver_passes_enriched_item_on() {
        let dir = tempfile::tempdir().unwrap();
        let index = MediaIndex::load(index_path(&dir));
        let lookup = MediaLookup::new(index, FakeFetcher::serving(Some(SEARCH_BODY)));
        let mut resolver = LookupResolver::new(lookup, Recorder::default());

        let bare = Item::new("norcar", "Northern Cardinal", "birds");
        assert_eq!(resolver.resolve(&bare), MediaRef::Unavailable);
        assert_eq!(resolver.resolve(&bare), MediaRef::Unavailable);

        assert_eq!(resolver.lookup.fetcher.calls.borrow().len(), 1);
        let seen = resolver.into_inner().seen;
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|item| item.credit == "Jane" && item.image_url.ends_with("/123/320")));
    }
}
