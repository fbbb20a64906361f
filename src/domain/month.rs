//! The full record set for one accounting month.

use serde::{Deserialize, Serialize};

use super::{
    common::{lenient_list, lenient_or_default, MonthKey},
    company::CompanyEntry,
    payroll::{CompanyReceivable, CompanyTax, Salary},
    personal::{CardBalance, FixedExpense, VariableExpenseEntry},
};

/// Every record scoped to a single month. Stores persist and return this as
/// one unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthRecords {
    pub month: MonthKey,
    #[serde(default, deserialize_with = "lenient_list")]
    pub fixed_expenses: Vec<FixedExpense>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub variable_expenses: Vec<VariableExpenseEntry>,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub cards: CardBalance,
    #[serde(default, deserialize_with = "lenient_list")]
    pub company_entries: Vec<CompanyEntry>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub salaries: Vec<Salary>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub receivables: Vec<CompanyReceivable>,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub company_tax: CompanyTax,
}

impl MonthRecords {
    /// An empty month with no records at all.
    pub fn empty(month: MonthKey) -> Self {
        Self {
            month,
            fixed_expenses: Vec::new(),
            variable_expenses: Vec::new(),
            cards: CardBalance::default(),
            company_entries: Vec::new(),
            salaries: Vec::new(),
            receivables: Vec::new(),
            company_tax: CompanyTax::default(),
        }
    }

    /// A month seeded with the default fixed-cost categories, employees and
    /// receivable lines. Seeded payroll rows start at zero.
    pub fn with_defaults(month: MonthKey) -> Self {
        Self {
            fixed_expenses: FixedExpense::defaults(),
            salaries: Salary::defaults(),
            receivables: CompanyReceivable::defaults(),
            ..Self::empty(month)
        }
    }

    /// Applies a month loaded from a store on top of the in-memory state.
    ///
    /// A loaded fixed-expense list only replaces the current one when it is
    /// non-empty, so an empty stored list never wipes the seeded defaults.
    /// Every other section is replaced as loaded.
    pub fn apply_loaded(&mut self, loaded: MonthRecords) {
        let MonthRecords {
            month,
            fixed_expenses,
            variable_expenses,
            cards,
            company_entries,
            salaries,
            receivables,
            company_tax,
        } = loaded;
        self.month = month;
        if !fixed_expenses.is_empty() {
            self.fixed_expenses = fixed_expenses;
        }
        self.variable_expenses = variable_expenses;
        self.cards = cards;
        self.company_entries = company_entries;
        self.salaries = salaries;
        self.receivables = receivables;
        self.company_tax = company_tax;
    }

    pub fn fixed_expense(&self, category: &str) -> Option<&FixedExpense> {
        self.fixed_expenses
            .iter()
            .find(|expense| expense.category == category)
    }

    pub fn fixed_expense_mut(&mut self, category: &str) -> Option<&mut FixedExpense> {
        self.fixed_expenses
            .iter_mut()
            .find(|expense| expense.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> MonthKey {
        "2024-06".parse().unwrap()
    }

    #[test]
    fn empty_loaded_fixed_list_keeps_defaults() {
        let mut current = MonthRecords::with_defaults(key());
        let mut loaded = MonthRecords::empty(key());
        loaded.cards = CardBalance::new(10.0, 20.0);
        current.apply_loaded(loaded);
        assert_eq!(current.fixed_expenses, FixedExpense::defaults());
        assert_eq!(current.cards, CardBalance::new(10.0, 20.0));
    }

    #[test]
    fn non_empty_loaded_fixed_list_replaces_defaults() {
        let mut current = MonthRecords::with_defaults(key());
        let mut loaded = MonthRecords::empty(key());
        loaded.fixed_expenses = vec![FixedExpense::new("Rent", 1200.0).paid(true)];
        current.apply_loaded(loaded);
        assert_eq!(current.fixed_expenses.len(), 1);
        assert_eq!(current.fixed_expenses[0].category, "Rent");
        assert!(current.fixed_expenses[0].paid);
    }

    #[test]
    fn null_sections_decode_as_empty() {
        let records: MonthRecords = serde_json::from_str(
            r#"{"month": "2024-06", "fixed_expenses": null, "cards": null,
                "company_tax": null, "salaries": [{"employee_name": "Ana",
                "gross_salary": 900, "deductions": null}]}"#,
        )
        .expect("decode month");
        assert!(records.fixed_expenses.is_empty());
        assert_eq!(records.cards, CardBalance::default());
        assert_eq!(records.company_tax, CompanyTax::default());
        assert_eq!(records.salaries[0].net_salary(), 900.0);
    }

    #[test]
    fn missing_sections_decode_as_empty() {
        let records: MonthRecords =
            serde_json::from_str(r#"{"month": "2024-06"}"#).expect("decode month");
        assert!(records.fixed_expenses.is_empty());
        assert_eq!(records.cards, CardBalance::default());
    }
}
