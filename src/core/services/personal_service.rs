use serde::Serialize;

use crate::domain::{amount_or_zero, CardBalance, FixedExpense, SubtotalTag, VariableExpenseEntry};

/// Number of categories returned by [`PersonalService::top_fixed`] by default.
pub const DEFAULT_TOP_FIXED: usize = 6;

/// Derived personal-expense figures for one month. Values are unrounded
/// except the two percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PersonalTotals {
    pub total_fixed: f64,
    pub total_fixed_share_a: f64,
    pub total_fixed_share_b: f64,
    pub card_linked_fixed_total: f64,
    pub insurance_amount: f64,
    pub variable_share_a: f64,
    pub variable_share_b: f64,
    pub total_variable: f64,
    pub grand_total: f64,
    pub total_cards: f64,
    pub total_party_a: f64,
    pub total_party_b: f64,
    pub combined_total: f64,
    pub difference: f64,
    pub percent_a: f64,
    pub percent_b: f64,
}

/// Label/amount pair for chart projections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledAmount {
    pub name: String,
    pub amount: f64,
}

impl LabeledAmount {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

pub struct PersonalService;

impl PersonalService {
    pub fn totals(
        fixed: &[FixedExpense],
        variable: &[VariableExpenseEntry],
        cards: &CardBalance,
    ) -> PersonalTotals {
        let mut totals = PersonalTotals::default();

        for expense in fixed {
            let amount = amount_or_zero(expense.amount);
            totals.total_fixed += amount;
            match expense.tag {
                SubtotalTag::CardLinked => totals.card_linked_fixed_total += amount,
                SubtotalTag::Insurance => totals.insurance_amount += amount,
                SubtotalTag::Untagged => {}
            }
        }
        totals.total_fixed_share_a = totals.total_fixed / 2.0;
        totals.total_fixed_share_b = totals.total_fixed / 2.0;

        for entry in variable {
            totals.variable_share_a += amount_or_zero(entry.share_a);
            totals.variable_share_b += amount_or_zero(entry.share_b);
        }
        totals.total_variable = totals.variable_share_a + totals.variable_share_b;

        totals.grand_total =
            totals.card_linked_fixed_total + totals.insurance_amount + totals.total_variable;

        let card_a = amount_or_zero(cards.owner_a);
        let card_b = amount_or_zero(cards.owner_b);
        totals.total_cards = card_a + card_b;

        totals.total_party_a = totals.total_fixed_share_a + card_a + totals.variable_share_a;
        totals.total_party_b = totals.total_fixed_share_b + card_b + totals.variable_share_b;
        totals.combined_total = totals.total_party_a + totals.total_party_b;
        totals.difference = (totals.total_party_a - totals.total_party_b).abs();

        let (percent_a, percent_b) =
            split_percentages(totals.total_party_a, totals.total_party_b, totals.combined_total);
        totals.percent_a = percent_a;
        totals.percent_b = percent_b;

        totals
    }

    /// Largest fixed categories by amount, descending.
    pub fn top_fixed(fixed: &[FixedExpense], limit: usize) -> Vec<LabeledAmount> {
        let mut rows: Vec<LabeledAmount> = fixed
            .iter()
            .map(|expense| LabeledAmount::new(&expense.category, amount_or_zero(expense.amount)))
            .collect();
        rows.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        rows.truncate(limit);
        rows
    }
}

/// Rounds to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Each party's share of `combined` in percent; 50/50 when nothing was spent.
fn split_percentages(party_a: f64, party_b: f64, combined: f64) -> (f64, f64) {
    if combined > 0.0 {
        (
            round_one_decimal(party_a / combined * 100.0),
            round_one_decimal(party_b / combined * 100.0),
        )
    } else {
        (50.0, 50.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryDate;

    #[test]
    fn rent_only_month_splits_evenly() {
        let fixed = vec![FixedExpense::new("Rent", 1000.0)];
        let totals = PersonalService::totals(&fixed, &[], &CardBalance::default());
        assert_eq!(totals.total_fixed, 1000.0);
        assert_eq!(totals.total_fixed_share_a, 500.0);
        assert_eq!(totals.total_fixed_share_b, 500.0);
        assert_eq!(totals.total_party_a, 500.0);
        assert_eq!(totals.total_party_b, 500.0);
        assert_eq!(totals.difference, 0.0);
        assert_eq!(totals.percent_a, 50.0);
        assert_eq!(totals.percent_b, 50.0);
    }

    #[test]
    fn card_linked_and_insurance_are_tracked_separately() {
        let fixed = vec![
            FixedExpense::new("Combustível", 500.0),
            FixedExpense::new("Cinema", 100.0),
            FixedExpense::new("Seguro", 200.0),
            FixedExpense::new("Luz", 150.0),
        ];
        let variable = vec![VariableExpenseEntry::new(
            "Farmácia",
            EntryDate::from_ymd(2024, 6, 3),
            30.0,
            20.0,
        )];
        let totals = PersonalService::totals(&fixed, &variable, &CardBalance::default());
        assert_eq!(totals.card_linked_fixed_total, 600.0);
        assert_eq!(totals.insurance_amount, 200.0);
        assert_eq!(totals.total_variable, 50.0);
        assert_eq!(totals.grand_total, 850.0);
    }

    #[test]
    fn renamed_category_keeps_its_tag() {
        let fixed = vec![FixedExpense::new("Gasolina", 300.0).with_tag(SubtotalTag::CardLinked)];
        let totals = PersonalService::totals(&fixed, &[], &CardBalance::default());
        assert_eq!(totals.card_linked_fixed_total, 300.0);
    }

    #[test]
    fn uneven_month_reports_difference_and_percentages() {
        let fixed = vec![FixedExpense::new("Rent", 1000.0)];
        let cards = CardBalance::new(300.0, 100.0);
        let variable = vec![VariableExpenseEntry::new("Gift", EntryDate::unset(), 0.0, 50.0)];
        let totals = PersonalService::totals(&fixed, &variable, &cards);
        assert_eq!(totals.total_party_a, 800.0);
        assert_eq!(totals.total_party_b, 650.0);
        assert_eq!(totals.combined_total, 1450.0);
        assert_eq!(totals.difference, 150.0);
        assert_eq!(totals.percent_a, 55.2);
        assert_eq!(totals.percent_b, 44.8);
        assert_eq!(totals.total_cards, 400.0);
    }

    #[test]
    fn non_finite_amounts_count_as_zero() {
        let fixed = vec![FixedExpense::new("Rent", f64::NAN)];
        let cards = CardBalance::new(f64::INFINITY, 0.0);
        let totals = PersonalService::totals(&fixed, &[], &cards);
        assert_eq!(totals.combined_total, 0.0);
        assert_eq!(totals.percent_a, 50.0);
    }

    #[test]
    fn top_fixed_orders_descending() {
        let fixed = FixedExpense::defaults();
        let top = PersonalService::top_fixed(&fixed, DEFAULT_TOP_FIXED);
        assert_eq!(top.len(), DEFAULT_TOP_FIXED);
        assert_eq!(top[0].name, "Empregada");
        assert!(top.windows(2).all(|pair| pair[0].amount >= pair[1].amount));
    }
}
