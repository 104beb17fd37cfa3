use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;

use crate::catalog::{Catalog, CatalogCategory, IngredientRecord};

// Expected column headers. Any further column named `name_<locale>` is read
// as a localized display name for that locale.
const CATEGORY_COL: &str = "category";
const KEY_COL: &str = "key";
const NAME_COL_PREFIX: &str = "name_";

/// Loads the category-grouped ingredient catalog from a CSV file.
///
/// Category order is first appearance in the file; ingredient order within a
/// category is file order. Rows with an empty key are skipped.
pub fn load_catalog(csv_path: &Path) -> Result<Catalog> {
    if !csv_path.exists() {
        return Err(anyhow::anyhow!("Catalog CSV file not found at: {:?}", csv_path));
    }

    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open catalog CSV file at {:?}", csv_path))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = rdr.headers()?.clone();

    let category_idx = headers
        .iter()
        .position(|h| h == CATEGORY_COL)
        .ok_or_else(|| anyhow::anyhow!("Column '{}' not found", CATEGORY_COL))?;
    let key_idx = headers
        .iter()
        .position(|h| h == KEY_COL)
        .ok_or_else(|| anyhow::anyhow!("Column '{}' not found", KEY_COL))?;
    let locale_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| {
            h.strip_prefix(NAME_COL_PREFIX)
                .filter(|locale| !locale.is_empty())
                .map(|locale| (idx, locale.to_string()))
        })
        .collect();

    let mut catalog: Catalog = Vec::new();
    let mut category_index: HashMap<String, usize> = HashMap::new();

    for (row_index, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("Failed to read record at row index {}", row_index))?;

        let key = record
            .get(key_idx)
            .ok_or_else(|| anyhow::anyhow!("Missing key at row {}", row_index))?
            .trim()
            .to_string();
        if key.is_empty() {
            continue;
        }
        let category = record
            .get(category_idx)
            .unwrap_or("")
            .trim()
            .to_string();
        if category.is_empty() {
            return Err(anyhow::anyhow!(
                "Missing category for ingredient '{}' at row {}",
                key,
                row_index
            ));
        }

        let mut names = HashMap::new();
        for (idx, locale) in &locale_cols {
            if let Some(name) = record.get(*idx) {
                let name = name.trim();
                if !name.is_empty() {
                    names.insert(locale.clone(), name.to_string());
                }
            }
        }

        let group_idx = match category_index.get(&category) {
            Some(&idx) => idx,
            None => {
                catalog.push(CatalogCategory {
                    category: category.clone(),
                    ingredients: Vec::new(),
                });
                category_index.insert(category, catalog.len() - 1);
                catalog.len() - 1
            }
        };
        catalog[group_idx].ingredients.push(IngredientRecord { key, names });
    }

    if catalog.is_empty() {
        return Err(anyhow::anyhow!("No catalog entries loaded from {:?}", csv_path));
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv_file() -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "category,key,name_en,name_hi")?;
        writeln!(file, "Vegetables,Onion,Onion,Pyaaz")?;
        writeln!(file, "Spices,Cumin Seeds,Cumin Seeds,Jeera")?;
        writeln!(file, "Vegetables,Tomato,Tomato,")?; // no hindi name
        writeln!(file, "Vegetables,,skipped,skipped")?; // empty key
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_load_catalog_groups_by_first_appearance() -> Result<()> {
        let file = create_test_csv_file()?;
        let catalog = load_catalog(file.path())?;

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].category, "Vegetables");
        assert_eq!(catalog[1].category, "Spices");

        // Tomato joins Vegetables even though Spices appeared in between.
        let veg_keys: Vec<&str> = catalog[0]
            .ingredients
            .iter()
            .map(|r| r.key.as_str())
            .collect();
        assert_eq!(veg_keys, vec!["Onion", "Tomato"]);
        Ok(())
    }

    #[test]
    fn test_load_catalog_reads_locale_columns() -> Result<()> {
        let file = create_test_csv_file()?;
        let catalog = load_catalog(file.path())?;

        let onion = &catalog[0].ingredients[0];
        assert_eq!(onion.display_name("hi"), "Pyaaz");
        let tomato = &catalog[0].ingredients[1];
        assert_eq!(tomato.display_name("hi"), "Tomato"); // falls back to key
        Ok(())
    }

    #[test]
    fn test_load_catalog_missing_column() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "key,name_en")?;
        writeln!(file, "Onion,Onion")?;
        file.flush()?;

        let result = load_catalog(file.path());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Column 'category' not found"));
        Ok(())
    }

    #[test]
    fn test_load_catalog_empty_file_with_headers() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "category,key,name_en")?;
        file.flush()?;

        let result = load_catalog(file.path());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("No catalog entries loaded"));
        Ok(())
    }

    #[test]
    fn test_load_catalog_file_not_found() {
        let path = Path::new("this_file_does_not_exist.csv");
        let result = load_catalog(path);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Catalog CSV file not found"));
    }
}
