// 🏷️ Category Registry - the one authoritative list of allowed dish categories
//
// Labels are ordered: the order is the order the UI and the summary show them.
// The registry is built once at startup and shared read-only afterwards.

use crate::error::{StoreError, StoreResult};
use serde::Serialize;

/// Categories used when no override is configured
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Starters",
    "Veg curry",
    "Non-veg Curry",
    "Chapatis/Naan/Roti (Breads)",
    "Rice Items",
    "Sweets",
];

// ============================================================================
// CATEGORY REGISTRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryRegistry {
    labels: Vec<String>,
}

impl CategoryRegistry {
    /// Build a registry from configured labels.
    ///
    /// Labels are trimmed; blank labels and repeats are dropped, keeping the
    /// first occurrence so the configured order is preserved.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = CategoryRegistry { labels: Vec::new() };
        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() || registry.validate(label) {
                continue;
            }
            registry.labels.push(label.to_string());
        }
        registry
    }

    /// Registry with the standard potluck categories
    pub fn with_defaults() -> Self {
        CategoryRegistry::new(DEFAULT_CATEGORIES)
    }

    /// True iff `category` is one of the configured labels (exact match)
    pub fn validate(&self, category: &str) -> bool {
        self.labels.iter().any(|label| label == category)
    }

    pub fn require(&self, category: &str) -> StoreResult<()> {
        if self.validate(category) {
            Ok(())
        } else {
            Err(StoreError::InvalidCategory {
                category: category.to_string(),
            })
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_registered_in_order() {
        let registry = CategoryRegistry::with_defaults();

        assert_eq!(registry.len(), 6);
        assert_eq!(registry.labels()[0], "Starters");
        assert_eq!(registry.labels()[5], "Sweets");
    }

    #[test]
    fn test_validate_is_exact_match() {
        let registry = CategoryRegistry::with_defaults();

        assert!(registry.validate("Veg curry"));
        assert!(registry.validate("Chapatis/Naan/Roti (Breads)"));
        assert!(!registry.validate("veg curry"));
        assert!(!registry.validate("Veg curry "));
        assert!(!registry.validate("Desserts"));
        assert!(!registry.validate(""));
    }

    #[test]
    fn test_require_reports_the_rejected_label() {
        let registry = CategoryRegistry::with_defaults();

        assert!(registry.require("Sweets").is_ok());
        match registry.require("Soup") {
            Err(StoreError::InvalidCategory { category }) => assert_eq!(category, "Soup"),
            other => panic!("expected InvalidCategory, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_labels_are_trimmed_and_deduplicated() {
        let registry = CategoryRegistry::new([" Soup ", "Salad", "", "Soup", "  "]);

        assert_eq!(registry.labels(), &["Soup".to_string(), "Salad".to_string()]);
        assert!(registry.validate("Soup"));
        assert!(!registry.validate("Starters"));
    }

    #[test]
    fn test_serializes_as_plain_label_list() {
        let registry = CategoryRegistry::new(["A", "B"]);
        let json = serde_json::to_string(&registry).unwrap();
        assert_eq!(json, r#"["A","B"]"#);
    }
}
