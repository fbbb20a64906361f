//! Company cash-flow entries.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::common::{
    amount_or_zero, lenient_amount, lenient_flag, lenient_label, lenient_text, normalize_label,
    EntryDate, Identifiable, MonthKey,
};
use crate::errors::LedgerError;

/// Direction of a company entry. The stored amount never carries a sign.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Revenue,
    #[default]
    Expense,
}

impl EntryKind {
    /// Signed contribution of `amount` to the cash balance.
    pub fn signed(&self, amount: f64) -> f64 {
        match self {
            EntryKind::Revenue => amount,
            EntryKind::Expense => -amount,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Revenue => "revenue",
            EntryKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

impl FromStr for EntryKind {
    type Err = LedgerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "revenue" | "receita" | "in" => Ok(EntryKind::Revenue),
            "expense" | "despesa" | "out" => Ok(EntryKind::Expense),
            other => Err(LedgerError::Invalid(format!(
                "unknown entry kind `{other}`, expected revenue or expense"
            ))),
        }
    }
}

/// A single revenue or expense line in the company ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "StoredCompanyEntry")]
pub struct CompanyEntry {
    pub id: Uuid,
    pub month: MonthKey,
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_center: Option<String>,
    pub description: String,
    pub date: EntryDate,
    amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    pub paid: bool,
}

impl CompanyEntry {
    pub fn new(
        month: MonthKey,
        kind: EntryKind,
        description: impl Into<String>,
        date: EntryDate,
        amount: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            month,
            kind,
            category: None,
            cost_center: None,
            description: description.into(),
            date,
            amount: amount_or_zero(amount).abs(),
            payment_method: None,
            paid: false,
        }
    }

    pub fn with_category(mut self, category: Option<&str>) -> Self {
        self.category = normalize_label(category);
        self
    }

    pub fn with_cost_center(mut self, cost_center: Option<&str>) -> Self {
        self.cost_center = normalize_label(cost_center);
        self
    }

    pub fn with_payment_method(mut self, method: Option<&str>) -> Self {
        self.payment_method = normalize_label(method);
        self
    }

    pub fn with_paid(mut self, paid: bool) -> Self {
        self.paid = paid;
        self
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn set_amount(&mut self, amount: f64) {
        self.amount = amount_or_zero(amount).abs();
    }

    pub fn is_revenue(&self) -> bool {
        self.kind == EntryKind::Revenue
    }

    pub fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }
}

impl Identifiable for CompanyEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Deserialize)]
struct StoredCompanyEntry {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    month: MonthKey,
    #[serde(default, deserialize_with = "lenient_kind")]
    kind: EntryKind,
    #[serde(default, deserialize_with = "lenient_label")]
    category: Option<String>,
    #[serde(default, deserialize_with = "lenient_label")]
    cost_center: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    description: String,
    #[serde(default)]
    date: EntryDate,
    #[serde(default, deserialize_with = "lenient_amount")]
    amount: f64,
    #[serde(default, deserialize_with = "lenient_label")]
    payment_method: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    paid: bool,
}

/// Unknown or missing kinds read as the default kind.
fn lenient_kind<'de, D>(deserializer: D) -> Result<EntryKind, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => text.parse().unwrap_or_default(),
        _ => EntryKind::default(),
    })
}

impl From<StoredCompanyEntry> for CompanyEntry {
    fn from(stored: StoredCompanyEntry) -> Self {
        Self {
            id: stored.id,
            month: stored.month,
            kind: stored.kind,
            category: stored.category,
            cost_center: stored.cost_center,
            description: stored.description,
            date: stored.date,
            amount: amount_or_zero(stored.amount).abs(),
            payment_method: stored.payment_method,
            paid: stored.paid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn march() -> MonthKey {
        "2024-03".parse().unwrap()
    }

    #[test]
    fn amounts_are_stored_without_sign() {
        let mut entry = CompanyEntry::new(
            march(),
            EntryKind::Expense,
            "Rent",
            EntryDate::from_ymd(2024, 3, 5),
            -1200.0,
        );
        assert_eq!(entry.amount(), 1200.0);
        entry.set_amount(f64::NAN);
        assert_eq!(entry.amount(), 0.0);
    }

    #[test]
    fn stored_blank_dimensions_become_none() {
        let entry: CompanyEntry = serde_json::from_str(
            r#"{"month": "2024-03", "kind": "revenue", "category": "  ",
                "cost_center": "", "description": "Invoice", "date": "2024-03-02",
                "amount": "-50", "payment_method": null, "paid": true}"#,
        )
        .expect("decode entry");
        assert!(entry.category.is_none());
        assert!(entry.cost_center.is_none());
        assert_eq!(entry.amount(), 50.0);
        assert!(entry.is_revenue());
    }

    #[test]
    fn misshapen_stored_fields_fall_back() {
        let entry: CompanyEntry = serde_json::from_str(
            r#"{"month": "2024-03", "kind": "transfer", "category": 42,
                "cost_center": null, "description": "Invoice", "amount": 10}"#,
        )
        .expect("decode entry");
        assert_eq!(entry.kind, EntryKind::Expense);
        assert_eq!(entry.category.as_deref(), Some("42"));
        assert!(entry.cost_center.is_none());
        assert!(!entry.date.is_set());
    }

    #[test]
    fn kind_parses_common_labels() {
        assert_eq!("Receita".parse::<EntryKind>().unwrap(), EntryKind::Revenue);
        assert_eq!("expense".parse::<EntryKind>().unwrap(), EntryKind::Expense);
        assert!("transfer".parse::<EntryKind>().is_err());
    }
}
