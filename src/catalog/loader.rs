// src/catalog/loader.rs
// Reads the item catalog from disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::{Catalog, Item};
use crate::error::CatalogError;

/// Group assigned to every species loaded from a bare code-to-name mapping,
/// which carries no family information.
pub const MAPPING_GROUP: &str = "birds";

/// Loads items from a CSV with the columns
/// `image_url, species_code, common_name, group_id, license, credit`.
pub fn load_items_csv(path: &Path) -> Result<Catalog, CatalogError> {
    log::info!("Loading catalog from {:?}", path);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut items = Vec::new();
    for result in reader.deserialize::<Item>() {
        items.push(result?);
    }

    let catalog = Catalog::from_items(items);
    log::info!("Loaded {} items.", catalog.len());
    Ok(catalog)
}

/// Loads items from a JSON object mapping species codes to common names.
pub fn load_mapping_json(path: &Path) -> Result<Catalog, CatalogError> {
    log::info!("Loading species mapping from {:?}", path);
    let content = fs::read_to_string(path)?;
    let catalog = catalog_from_mapping(serde_json::from_str(&content)?);
    log::info!("Loaded {} species.", catalog.len());
    Ok(catalog)
}

/// Every mapped species lands in one group. The mapping has no pictures, so
/// `image_url` stays empty until `media::MediaLookup` fills it in.
pub fn catalog_from_mapping(mapping: BTreeMap<String, String>) -> Catalog {
    Catalog::from_items(mapping.into_iter().map(|(code, name)| Item {
        license: "Unknown".to_string(),
        credit: "Unknown".to_string(),
        ..Item::new(code, name, MAPPING_GROUP)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_items_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "image_url,species_code,common_name,group_id,license,credit\n\
             http://x/1.jpg,amerob,American Robin,thrushes,CC-BY,Jane\n\
             http://x/2.jpg,blujay,Blue Jay,corvids,CC0,Sam\n"
        )
        .unwrap();

        let catalog = load_items_csv(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        let robin = catalog.get("amerob").unwrap();
        assert_eq!(robin.display_name, "American Robin");
        assert_eq!(robin.group_id, "thrushes");
        assert_eq!(robin.credit, "Jane");
    }

    #[test]
    fn test_load_items_csv_missing_column_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "image_url,common_name\nhttp://x,Robin\n").unwrap();
        assert!(load_items_csv(file.path()).is_err());
    }

    #[test]
    fn test_load_mapping_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"norcar": "Northern Cardinal", "amerob": "American Robin"}}"#).unwrap();

        let catalog = load_mapping_json(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        let cardinal = catalog.get("norcar").unwrap();
        assert_eq!(cardinal.group_id, MAPPING_GROUP);
        assert_eq!(cardinal.license, "Unknown");
        assert!(cardinal.image_url.is_empty());
    }
}
