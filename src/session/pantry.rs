use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::session::store::SessionStore;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl Default for MealType {
    fn default() -> Self {
        MealType::Dinner
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => Err(format!("Unknown meal type: '{}'", other)),
        }
    }
}

/// The user's current ingredient selection plus chosen meal type.
///
/// Ingredients are a true set keyed by canonical name; the ordered wire form
/// is derived from it, so a key can never be counted twice.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PantrySelection {
    pub ingredients: BTreeSet<String>,
    #[serde(rename = "mealType")]
    pub meal_type: MealType,
}

impl Default for PantrySelection {
    fn default() -> Self {
        PantrySelection {
            ingredients: BTreeSet::new(),
            meal_type: MealType::default(),
        }
    }
}

impl PantrySelection {
    /// Selected ingredient keys in a stable order, for request payloads.
    pub fn ingredient_list(&self) -> Vec<String> {
        self.ingredients.iter().cloned().collect()
    }
}

/// Mutable view over the session's pantry selection.
///
/// Every mutation re-persists the whole selection through the session store
/// before returning, so the next read in the same control flow (or after a
/// mid-session reload) observes the latest toggle.
pub struct PantrySelectionSet<'a> {
    store: &'a mut dyn SessionStore,
}

impl<'a> PantrySelectionSet<'a> {
    pub fn new(store: &'a mut dyn SessionStore) -> Self {
        PantrySelectionSet { store }
    }

    /// Flips membership of `key` and returns the new membership state:
    /// `true` when the toggle selected the ingredient, `false` when it
    /// deselected it. Toggling twice restores the original selection.
    pub fn toggle(&mut self, key: &str) -> bool {
        let mut pantry = self.store.pantry();
        let now_selected = if pantry.ingredients.remove(key) {
            false
        } else {
            pantry.ingredients.insert(key.to_string());
            true
        };
        self.store.set_pantry(pantry);
        now_selected
    }

    pub fn contains(&self, key: &str) -> bool {
        self.store.pantry().ingredients.contains(key)
    }

    pub fn selected(&self) -> Vec<String> {
        self.store.pantry().ingredient_list()
    }

    pub fn meal_type(&self) -> MealType {
        self.store.pantry().meal_type
    }

    pub fn set_meal_type(&mut self, meal_type: MealType) {
        let mut pantry = self.store.pantry();
        pantry.meal_type = meal_type;
        self.store.set_pantry(pantry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::MemorySessionStore;

    #[test]
    fn test_toggle_reports_new_membership() {
        let mut store = MemorySessionStore::new();
        let mut pantry = PantrySelectionSet::new(&mut store);
        assert!(pantry.toggle("Onion"));
        assert!(pantry.contains("Onion"));
        assert!(!pantry.toggle("Onion"));
        assert!(!pantry.contains("Onion"));
    }

    #[test]
    fn test_double_toggle_restores_selection() {
        let mut store = MemorySessionStore::new();
        let mut pantry = PantrySelectionSet::new(&mut store);
        pantry.toggle("Onion");
        pantry.toggle("Tomato");
        let before = store.pantry();
        {
            let mut pantry = PantrySelectionSet::new(&mut store);
            pantry.toggle("Paneer");
            pantry.toggle("Paneer");
        }
        assert_eq!(store.pantry(), before);
    }

    #[test]
    fn test_toggle_persists_through_store_immediately() {
        let mut store = MemorySessionStore::new();
        let mut pantry = PantrySelectionSet::new(&mut store);
        pantry.toggle("Spinach");
        pantry.set_meal_type(MealType::Lunch);
        // A reload mid-session re-reads the store; the selection must be there.
        let persisted = store.pantry();
        assert!(persisted.ingredients.contains("Spinach"));
        assert_eq!(persisted.meal_type, MealType::Lunch);
    }

    #[test]
    fn test_selection_is_a_true_set() {
        let mut store = MemorySessionStore::new();
        let mut pantry = PantrySelectionSet::new(&mut store);
        pantry.toggle("Ghee");
        pantry.toggle("Ghee");
        pantry.toggle("Ghee");
        assert_eq!(pantry.selected(), vec!["Ghee".to_string()]);
    }

    #[test]
    fn test_meal_type_parsing() {
        assert_eq!("dinner".parse::<MealType>(), Ok(MealType::Dinner));
        assert_eq!("Breakfast".parse::<MealType>(), Ok(MealType::Breakfast));
        assert!("brunch".parse::<MealType>().is_err());
    }
}
