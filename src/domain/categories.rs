//! Waste category table.
//!
//! Categories are defined once at process start and immutable thereafter.
//! The registry validates the invariants the rest of the pipeline relies on:
//! ids dense in `0..K`, names unique, confidence boosts in `(0, 1]`.

use crate::core::errors::{ClassifyError, ClassifyResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single waste material category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Dense id in `[0, K)`; doubles as the backend's class index.
    pub id: usize,
    /// Unique human-readable name, e.g. "Metal".
    pub name: String,
    /// Static per-class multiplier applied to raw model confidence.
    pub confidence_boost: f32,
}

impl Category {
    /// Creates a new category.
    pub fn new(id: usize, name: impl Into<String>, confidence_boost: f32) -> Self {
        Self {
            id,
            name: name.into(),
            confidence_boost,
        }
    }
}

/// Immutable table of all K categories, validated at construction.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    /// Builds a registry from a category table.
    ///
    /// The table may arrive in any order; it is sorted by id. Validation
    /// enforces dense ids `0..K`, unique names, and boosts in `(0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the table is empty or any invariant is
    /// violated.
    pub fn new(mut categories: Vec<Category>) -> ClassifyResult<Self> {
        if categories.is_empty() {
            return Err(ClassifyError::config_error(
                "category table must contain at least one category",
            ));
        }

        categories.sort_by_key(|c| c.id);

        let mut names = HashSet::new();
        for (expected_id, category) in categories.iter().enumerate() {
            if category.id != expected_id {
                return Err(ClassifyError::config_error(format!(
                    "category ids must be dense 0..{}: expected id {expected_id}, got {}",
                    categories.len(),
                    category.id
                )));
            }

            if !names.insert(category.name.as_str()) {
                return Err(ClassifyError::config_error(format!(
                    "duplicate category name '{}'",
                    category.name
                )));
            }

            if !(category.confidence_boost > 0.0 && category.confidence_boost <= 1.0) {
                return Err(ClassifyError::config_error_with_context(
                    "confidence_boost",
                    &category.confidence_boost.to_string(),
                    &format!("must be in (0, 1] for category '{}'", category.name),
                ));
            }
        }

        Ok(Self { categories })
    }

    /// Number of registered categories (K).
    pub fn num_classes(&self) -> usize {
        self.categories.len()
    }

    /// Looks up a category by id.
    pub fn get(&self, id: usize) -> Option<&Category> {
        self.categories.get(id)
    }

    /// Looks up a category name by id.
    pub fn name(&self, id: usize) -> Option<&str> {
        self.categories.get(id).map(|c| c.name.as_str())
    }

    /// The designated fallback used when an unknown category id surfaces.
    pub fn default_category(&self) -> &Category {
        &self.categories[0]
    }

    /// Category names ordered by id, for top-k labeling.
    pub fn names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    /// Confidence boosts ordered by id, for the calibrator.
    pub fn boosts(&self) -> Vec<f32> {
        self.categories.iter().map(|c| c.confidence_boost).collect()
    }

    /// Iterates over the categories in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::new(default_waste_categories()).expect("built-in category table is valid")
    }
}

/// The reference deployment's seven-category table.
pub fn default_waste_categories() -> Vec<Category> {
    vec![
        Category::new(0, "Organic", 1.0),
        Category::new(1, "Plastic", 0.95),
        Category::new(2, "Metal", 0.98),
        Category::new(3, "Glass", 0.92),
        Category::new(4, "Paper", 0.90),
        Category::new(5, "Electronics", 0.88),
        Category::new(6, "Hazardous", 0.85),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_seven_dense_categories() {
        let registry = CategoryRegistry::default();
        assert_eq!(registry.num_classes(), 7);
        for (i, category) in registry.iter().enumerate() {
            assert_eq!(category.id, i);
        }
        assert_eq!(registry.name(2), Some("Metal"));
        assert_eq!(registry.default_category().name, "Organic");
    }

    #[test]
    fn rejects_empty_table() {
        assert!(CategoryRegistry::new(Vec::new()).is_err());
    }

    #[test]
    fn rejects_sparse_ids() {
        let table = vec![Category::new(0, "Organic", 1.0), Category::new(2, "Metal", 0.98)];
        let err = CategoryRegistry::new(table).unwrap_err();
        assert!(err.to_string().contains("dense"));
    }

    #[test]
    fn rejects_duplicate_names() {
        let table = vec![Category::new(0, "Metal", 1.0), Category::new(1, "Metal", 0.9)];
        let err = CategoryRegistry::new(table).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn rejects_out_of_range_boost() {
        let table = vec![Category::new(0, "Organic", 0.0)];
        assert!(CategoryRegistry::new(table).is_err());

        let table = vec![Category::new(0, "Organic", 1.5)];
        assert!(CategoryRegistry::new(table).is_err());
    }

    #[test]
    fn accepts_unordered_input() {
        let table = vec![
            Category::new(1, "Plastic", 0.95),
            Category::new(0, "Organic", 1.0),
        ];
        let registry = CategoryRegistry::new(table).unwrap();
        assert_eq!(registry.name(0), Some("Organic"));
        assert_eq!(registry.name(1), Some("Plastic"));
    }
}
