use std::collections::{HashMap, HashSet};

use crate::catalog::{Catalog, CatalogCategory, IngredientRecord};

/// Synthesized category ranking ingredients by historical usage.
pub const RECENTS_CATEGORY: &str = "Recents";

/// Minimum usage count for an ingredient to qualify as recently used.
pub const RECENTS_THRESHOLD: u32 = 2;

/// Per-ingredient usage counts, owned by the backing account. An absent key
/// means a count of zero.
pub type UsageCounters = HashMap<String, u32>;

/// Derives a display catalog with a synthetic `Recents` category prepended.
///
/// Every key in `counts` with a count of at least [`RECENTS_THRESHOLD`] is
/// resolved to its first catalog occurrence (by key, ignoring category) and
/// the resolved records are sorted by count descending; ties keep catalog
/// order. When nothing qualifies the catalog is returned unchanged.
///
/// Pure and idempotent: the source catalog is never mutated, and a `Recents`
/// category already present in the input is ignored and rebuilt, so repeated
/// application with the same counts is stable. Keys in `counts` with no
/// catalog record are silently skipped.
pub fn rank_with_recents(catalog: &Catalog, counts: &UsageCounters) -> Catalog {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut resolved: Vec<(u32, IngredientRecord)> = Vec::new();

    for group in catalog.iter().filter(|g| g.category != RECENTS_CATEGORY) {
        for record in &group.ingredients {
            if seen.contains(record.key.as_str()) {
                continue;
            }
            if let Some(&count) = counts.get(&record.key) {
                if count >= RECENTS_THRESHOLD {
                    seen.insert(record.key.as_str());
                    resolved.push((count, record.clone()));
                }
            }
        }
    }

    if resolved.is_empty() {
        return catalog.clone();
    }

    // Vec::sort_by is stable, so equal counts keep their catalog order.
    resolved.sort_by(|a, b| b.0.cmp(&a.0));

    let mut ranked = Vec::with_capacity(catalog.len() + 1);
    ranked.push(CatalogCategory {
        category: RECENTS_CATEGORY.to_string(),
        ingredients: resolved.into_iter().map(|(_, rec)| rec).collect(),
    });
    ranked.extend(
        catalog
            .iter()
            .filter(|g| g.category != RECENTS_CATEGORY)
            .cloned(),
    );
    ranked
}
