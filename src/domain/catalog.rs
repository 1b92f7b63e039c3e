//! Handling recommendation catalog.
//!
//! A static category-name to instruction-list table consumed read-only by the
//! classification service. Lookup is total: unregistered names resolve to a
//! documented, non-empty fallback instead of failing, since the catalog is
//! not guaranteed to know about every category the backend can produce.

use crate::core::errors::{ClassifyError, ClassifyResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category-name to ordered handling instructions lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationCatalog {
    entries: HashMap<String, Vec<String>>,
    fallback: Vec<String>,
}

impl RecommendationCatalog {
    /// Builds a catalog from explicit entries and a fallback list.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the fallback is empty; lookup must never
    /// return an empty instruction list.
    pub fn new(
        entries: HashMap<String, Vec<String>>,
        fallback: Vec<String>,
    ) -> ClassifyResult<Self> {
        if fallback.is_empty() {
            return Err(ClassifyError::config_error(
                "recommendation fallback must contain at least one instruction",
            ));
        }
        Ok(Self { entries, fallback })
    }

    /// Returns the instructions for a category name, or the fallback for
    /// names the catalog does not know.
    pub fn lookup(&self, category_name: &str) -> &[String] {
        self.entries
            .get(category_name)
            .map(Vec::as_slice)
            .unwrap_or(&self.fallback)
    }

    /// Number of explicitly registered categories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no explicit entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RecommendationCatalog {
    /// The reference deployment's catalog.
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();

        let mut entries = HashMap::new();
        entries.insert(
            "Organic".to_string(),
            owned(&[
                "Segregate from other waste",
                "Can be composted",
                "Use for biogas production",
                "Proper storage to avoid decomposition",
            ]),
        );
        entries.insert(
            "Plastic".to_string(),
            owned(&[
                "Separate from wet waste",
                "Check for recyclability code",
                "Clean before disposal",
                "Can be repurposed or recycled",
            ]),
        );
        entries.insert(
            "Metal".to_string(),
            owned(&[
                "Remove any plastic/paper attached",
                "Check for sharp edges",
                "High recycling value",
                "Separate ferrous and non-ferrous",
            ]),
        );
        entries.insert(
            "Glass".to_string(),
            owned(&[
                "Handle carefully to avoid breakage",
                "Separate clear and colored glass",
                "Use gloves when handling",
                "High recyclability potential",
            ]),
        );
        entries.insert(
            "Paper".to_string(),
            owned(&[
                "Keep dry to maintain recyclability",
                "Remove plastic/plastic coating",
                "Can be composted if not treated",
                "Remove wet portions",
            ]),
        );
        entries.insert(
            "Electronics".to_string(),
            owned(&[
                "Handle as hazardous waste",
                "Do not throw in regular bins",
                "Contains valuable metals",
                "Requires specialized recycling",
            ]),
        );
        entries.insert(
            "Hazardous".to_string(),
            owned(&[
                "Use proper containment",
                "Wear protective equipment",
                "Contact local authorities",
                "Never mix with regular waste",
            ]),
        );

        Self {
            entries,
            fallback: owned(&["Consult local waste management guidelines"]),
        }
    }
}
