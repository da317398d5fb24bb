// Category summary - contributions grouped by category, in registry order

use crate::entities::{CategoryRegistry, Entry};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    /// Sum of quantities in this category
    pub total: u64,
    pub items: Vec<Entry>,
}

/// One summary per configured category (empty ones included), followed by one
/// per retired category still present in `entries`.
pub fn summarize(registry: &CategoryRegistry, entries: &[Entry]) -> Vec<CategorySummary> {
    let mut summaries: Vec<CategorySummary> = registry
        .labels()
        .iter()
        .map(|label| CategorySummary {
            category: label.clone(),
            total: 0,
            items: Vec::new(),
        })
        .collect();

    for entry in entries {
        let slot = match summaries.iter().position(|s| s.category == entry.category) {
            Some(slot) => slot,
            None => {
                summaries.push(CategorySummary {
                    category: entry.category.clone(),
                    total: 0,
                    items: Vec::new(),
                });
                summaries.len() - 1
            }
        };
        summaries[slot].total += u64::from(entry.quantity);
        summaries[slot].items.push(entry.clone());
    }

    summaries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_follows_registry_order() {
        let registry = CategoryRegistry::with_defaults();
        let entries = vec![
            Entry::new("Bala", "Sweets", "Gulab Jamun", 1),
            Entry::new("Asha", "Starters", "Pakora", 2),
            Entry::new("Chitra", "Starters", "Samosa", 3),
        ];

        let summary = summarize(&registry, &entries);

        assert_eq!(summary.len(), 6);
        assert_eq!(summary[0].category, "Starters");
        assert_eq!(summary[0].total, 5);
        assert_eq!(summary[0].items.len(), 2);
        assert_eq!(summary[0].items[0].name, "Asha");
        assert_eq!(summary[1].total, 0);
        assert!(summary[1].items.is_empty());
        assert_eq!(summary[5].category, "Sweets");
        assert_eq!(summary[5].total, 1);
    }

    #[test]
    fn test_retired_categories_are_listed_last() {
        let registry = CategoryRegistry::new(["Starters"]);
        let entries = vec![
            Entry::new("Old", "Desserts", "Halwa", 2),
            Entry::new("Asha", "Starters", "Pakora", 2),
        ];

        let summary = summarize(&registry, &entries);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].category, "Starters");
        assert_eq!(summary[1].category, "Desserts");
        assert_eq!(summary[1].total, 2);
    }

    #[test]
    fn test_total_does_not_overflow_u32() {
        let registry = CategoryRegistry::new(["Sweets"]);
        let entries = vec![
            Entry::new("A", "Sweets", "x", u32::MAX),
            Entry::new("B", "Sweets", "y", u32::MAX),
        ];

        let summary = summarize(&registry, &entries);
        assert_eq!(summary[0].total, 2 * u64::from(u32::MAX));
    }
}
