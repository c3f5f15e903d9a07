// src/catalog/mod.rs
// This module holds the item catalog the quiz draws questions from.

pub mod loader;
pub mod validate;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Represents a single quiz item (one bird species).
/// The presentation fields are carried through untouched for the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "species_code")]
    pub id: String,
    #[serde(rename = "common_name")]
    pub display_name: String,
    pub group_id: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub credit: String,
}

impl Item {
    /// Builds an item with empty media metadata.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            group_id: group_id.into(),
            image_url: String::new(),
            license: String::new(),
            credit: String::new(),
        }
    }
}

/// The full set of items available to a quiz, unique by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    /// Creates a catalog, keeping the first occurrence of any repeated id.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for item in items {
            if seen.insert(item.id.clone()) {
                unique.push(item);
            } else {
                log::debug!("Dropping duplicate catalog entry {}", item.id);
            }
        }
        Catalog { items: unique }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
