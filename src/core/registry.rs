//! Lookup of the free-text company dimensions (categories and cost centers).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{common::normalize_label, CompanyEntry};

/// Names created on first use. The aggregation engine only ever sees
/// resolved names and never writes here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DimensionRegistry {
    #[serde(default)]
    categories: BTreeSet<String>,
    #[serde(default)]
    cost_centers: BTreeSet<String>,
}

impl DimensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trims a name; blank names resolve to nothing.
    pub fn resolve(name: Option<&str>) -> Option<String> {
        normalize_label(name)
    }

    /// Records the dimensions an entry uses. Returns how many names were new.
    pub fn register_entry(&mut self, entry: &CompanyEntry) -> usize {
        let mut created = 0;
        if let Some(category) = Self::resolve(entry.category.as_deref()) {
            if self.categories.insert(category) {
                created += 1;
            }
        }
        if let Some(cost_center) = Self::resolve(entry.cost_center.as_deref()) {
            if self.cost_centers.insert(cost_center) {
                created += 1;
            }
        }
        created
    }

    pub fn register_all<'a>(&mut self, entries: impl IntoIterator<Item = &'a CompanyEntry>) -> usize {
        entries
            .into_iter()
            .map(|entry| self.register_entry(entry))
            .sum()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    pub fn cost_centers(&self) -> impl Iterator<Item = &str> {
        self.cost_centers.iter().map(String::as_str)
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.categories.contains(name.trim())
    }

    pub fn has_cost_center(&self, name: &str) -> bool {
        self.cost_centers.contains(name.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntryDate, EntryKind, MonthKey};

    fn entry(category: Option<&str>, cost_center: Option<&str>) -> CompanyEntry {
        let month: MonthKey = "2024-01".parse().unwrap();
        CompanyEntry::new(month, EntryKind::Expense, "x", EntryDate::unset(), 1.0)
            .with_category(category)
            .with_cost_center(cost_center)
    }

    #[test]
    fn names_are_created_once() {
        let mut registry = DimensionRegistry::new();
        let entries = vec![
            entry(Some("Rent"), Some("HQ")),
            entry(Some("Rent"), None),
            entry(Some(" Travel "), Some("")),
        ];
        assert_eq!(registry.register_all(&entries), 3);
        assert_eq!(registry.categories().collect::<Vec<_>>(), vec!["Rent", "Travel"]);
        assert!(registry.has_cost_center("HQ"));
        assert_eq!(registry.register_all(&entries), 0);
    }
}
