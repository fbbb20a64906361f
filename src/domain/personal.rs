//! Personal expense records split between the two household parties.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::common::{lenient_amount, lenient_flag, lenient_or_default, lenient_text, EntryDate};

/// Category labels that historically marked card-paid fixed costs before
/// records carried an explicit tag.
pub const LEGACY_CARD_LINKED_LABELS: [&str; 5] = [
    "Combustível",
    "Psicóloga",
    "Futebol",
    "Cinema",
    "Revisão do Carro",
];

/// Category label historically treated as the separate insurance line.
pub const LEGACY_INSURANCE_LABEL: &str = "Seguro";

/// Default fixed-cost categories seeded into every new month.
pub const DEFAULT_FIXED_EXPENSES: [(&str, f64); 14] = [
    ("Empregada", 1700.0),
    ("Carro", 1030.0),
    ("Combustível", 500.0),
    ("Alimentação Miguel", 400.0),
    ("Segurança", 300.0),
    ("Colégio", 800.0),
    ("Psicóloga", 600.0),
    ("Psicóloga (adicional)", 200.0),
    ("Futebol", 150.0),
    ("Cinema", 100.0),
    ("Seguro", 200.0),
    ("Água", 150.0),
    ("Luz", 200.0),
    ("Revisão do Carro", 300.0),
];

/// Marks which separately tracked subtotal a fixed expense feeds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SubtotalTag {
    #[default]
    Untagged,
    CardLinked,
    Insurance,
}

impl SubtotalTag {
    /// Tag implied by a legacy category label.
    pub fn infer_from_label(category: &str) -> Self {
        if LEGACY_CARD_LINKED_LABELS.contains(&category) {
            SubtotalTag::CardLinked
        } else if category == LEGACY_INSURANCE_LABEL {
            SubtotalTag::Insurance
        } else {
            SubtotalTag::Untagged
        }
    }
}

impl fmt::Display for SubtotalTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubtotalTag::Untagged => "-",
            SubtotalTag::CardLinked => "card",
            SubtotalTag::Insurance => "insurance",
        };
        f.write_str(label)
    }
}

/// A recurring monthly cost shared 50/50 by both parties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "StoredFixedExpense")]
pub struct FixedExpense {
    pub category: String,
    pub amount: f64,
    pub paid: bool,
    pub tag: SubtotalTag,
}

impl FixedExpense {
    /// Creates an unpaid expense, tagging it from its label.
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        let category = category.into();
        let tag = SubtotalTag::infer_from_label(&category);
        Self {
            category,
            amount,
            paid: false,
            tag,
        }
    }

    pub fn with_tag(mut self, tag: SubtotalTag) -> Self {
        self.tag = tag;
        self
    }

    pub fn paid(mut self, paid: bool) -> Self {
        self.paid = paid;
        self
    }

    /// Fresh copy of the default category list.
    pub fn defaults() -> Vec<FixedExpense> {
        DEFAULT_FIXED_EXPENSES
            .iter()
            .map(|(category, amount)| FixedExpense::new(*category, *amount))
            .collect()
    }
}

#[derive(Deserialize)]
struct StoredFixedExpense {
    #[serde(default, deserialize_with = "lenient_text")]
    category: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    amount: f64,
    #[serde(default, deserialize_with = "lenient_flag")]
    paid: bool,
    #[serde(default, deserialize_with = "lenient_or_default")]
    tag: Option<SubtotalTag>,
}

impl From<StoredFixedExpense> for FixedExpense {
    fn from(stored: StoredFixedExpense) -> Self {
        let tag = stored
            .tag
            .unwrap_or_else(|| SubtotalTag::infer_from_label(&stored.category));
        Self {
            category: stored.category,
            amount: stored.amount,
            paid: stored.paid,
            tag,
        }
    }
}

/// An ad-hoc expense with an explicit share per party.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VariableExpenseEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default)]
    pub date: EntryDate,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub share_a: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub share_b: f64,
}

impl VariableExpenseEntry {
    pub fn new(description: impl Into<String>, date: EntryDate, share_a: f64, share_b: f64) -> Self {
        Self {
            description: description.into(),
            date,
            share_a,
            share_b,
        }
    }
}

/// Credit card totals owed by each party for the month.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CardBalance {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub owner_a: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub owner_b: f64,
}

impl CardBalance {
    pub fn new(owner_a: f64, owner_b: f64) -> Self {
        Self { owner_a, owner_b }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_labels_infer_tags_when_missing() {
        let parsed: Vec<FixedExpense> = serde_json::from_str(
            r#"[
                {"category": "Cinema", "amount": 100, "paid": false},
                {"category": "Seguro", "amount": "200", "paid": 1},
                {"category": "Cinema e pipoca", "amount": null}
            ]"#,
        )
        .expect("decode fixed expenses");
        assert_eq!(parsed[0].tag, SubtotalTag::CardLinked);
        assert_eq!(parsed[1].tag, SubtotalTag::Insurance);
        assert_eq!(parsed[1].amount, 200.0);
        assert!(parsed[1].paid);
        assert_eq!(parsed[2].tag, SubtotalTag::Untagged);
        assert_eq!(parsed[2].amount, 0.0);
    }

    #[test]
    fn explicit_tag_survives_renames() {
        let parsed: FixedExpense = serde_json::from_str(
            r#"{"category": "Gasolina", "amount": 480, "paid": true, "tag": "card_linked"}"#,
        )
        .expect("decode tagged expense");
        assert_eq!(parsed.tag, SubtotalTag::CardLinked);
    }

    #[test]
    fn defaults_cover_every_seed_category() {
        let defaults = FixedExpense::defaults();
        assert_eq!(defaults.len(), DEFAULT_FIXED_EXPENSES.len());
        let card_linked = defaults
            .iter()
            .filter(|expense| expense.tag == SubtotalTag::CardLinked)
            .count();
        assert_eq!(card_linked, LEGACY_CARD_LINKED_LABELS.len());
    }
}
