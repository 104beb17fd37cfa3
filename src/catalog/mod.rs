use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod loader;
pub mod recency;

/// One selectable ingredient. The key is the canonical name, stable across
/// display languages; `names` maps locale codes to localized display names.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IngredientRecord {
    pub key: String,
    #[serde(default)]
    pub names: HashMap<String, String>,
}

impl IngredientRecord {
    pub fn with_key(key: impl Into<String>) -> Self {
        IngredientRecord {
            key: key.into(),
            names: HashMap::new(),
        }
    }

    /// Localized display name, falling back to the canonical key when the
    /// locale has no translation.
    pub fn display_name(&self, locale: &str) -> &str {
        self.names
            .get(locale)
            .map(String::as_str)
            .unwrap_or(&self.key)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CatalogCategory {
    pub category: String,
    pub ingredients: Vec<IngredientRecord>,
}

/// The external category-grouped ingredient catalog, in display order.
pub type Catalog = Vec<CatalogCategory>;

/// Case-insensitive substring filter over display names, mirroring the
/// dashboard search box. Categories left empty by the filter are dropped;
/// an empty query returns the catalog as-is.
pub fn filter_catalog(catalog: &Catalog, query: &str, locale: &str) -> Catalog {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return catalog.clone();
    }
    catalog
        .iter()
        .filter_map(|group| {
            let matching: Vec<IngredientRecord> = group
                .ingredients
                .iter()
                .filter(|rec| rec.display_name(locale).to_lowercase().contains(&needle))
                .cloned()
                .collect();
            if matching.is_empty() {
                None
            } else {
                Some(CatalogCategory {
                    category: group.category.clone(),
                    ingredients: matching,
                })
            }
        })
        .collect()
}
