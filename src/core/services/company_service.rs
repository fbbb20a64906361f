use serde::Serialize;

use crate::domain::{amount_or_zero, CompanyEntry, EntryDate, EntryKind};

use super::personal_service::{round_one_decimal, LabeledAmount};

/// Bucket label for entries without a category.
pub const UNSPECIFIED_BUCKET: &str = "—";
pub const TOP_EXPENSE_CATEGORIES: usize = 5;
pub const LARGEST_EXPENSE_MONTHS: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CompanyTotals {
    pub total_revenue: f64,
    pub total_expense: f64,
    pub balance: f64,
}

/// Running balance at the end of a date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalancePoint {
    pub date: EntryDate,
    pub balance: f64,
}

/// Share of revenue kept as balance, for the investment goal gauge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InvestmentGoal {
    pub ratio: f64,
    pub achieved_percent: f64,
    pub remaining_percent: f64,
}

pub struct CompanyService;

impl CompanyService {
    pub fn totals(entries: &[CompanyEntry]) -> CompanyTotals {
        let total_revenue = sum_kind(entries, EntryKind::Revenue);
        let total_expense = sum_kind(entries, EntryKind::Expense);
        CompanyTotals {
            total_revenue,
            total_expense,
            balance: total_revenue - total_expense,
        }
    }

    /// Expense amount per category in first-appearance order. Revenue entries
    /// still open their category bucket but add nothing to it.
    pub fn expenses_by_category(entries: &[CompanyEntry]) -> Vec<LabeledAmount> {
        let mut buckets = Vec::new();
        for entry in entries {
            let contribution = if entry.is_expense() {
                amount_or_zero(entry.amount())
            } else {
                0.0
            };
            accumulate(&mut buckets, category_bucket(entry), contribution);
        }
        buckets
    }

    pub fn totals_by_kind(entries: &[CompanyEntry]) -> Vec<LabeledAmount> {
        vec![
            LabeledAmount::new(EntryKind::Revenue.to_string(), sum_kind(entries, EntryKind::Revenue)),
            LabeledAmount::new(EntryKind::Expense.to_string(), sum_kind(entries, EntryKind::Expense)),
        ]
    }

    /// Cumulative balance per entry date, oldest first. Undated entries form
    /// the first point.
    pub fn balance_series(entries: &[CompanyEntry]) -> Vec<BalancePoint> {
        let mut per_date: Vec<(EntryDate, f64)> = Vec::new();
        for entry in entries {
            let signed = entry.kind.signed(amount_or_zero(entry.amount()));
            match per_date.iter_mut().find(|(date, _)| *date == entry.date) {
                Some((_, total)) => *total += signed,
                None => per_date.push((entry.date, signed)),
            }
        }
        per_date.sort_by(|a, b| a.0.cmp(&b.0));

        let mut running = 0.0;
        per_date
            .into_iter()
            .map(|(date, delta)| {
                running += delta;
                BalancePoint {
                    date,
                    balance: running,
                }
            })
            .collect()
    }

    /// Months with the highest expense totals, largest first.
    pub fn months_largest_expenses(entries: &[CompanyEntry]) -> Vec<LabeledAmount> {
        let mut buckets = Vec::new();
        for entry in entries.iter().filter(|entry| entry.is_expense()) {
            accumulate(&mut buckets, entry.date.month_label(), amount_or_zero(entry.amount()));
        }
        sort_descending(&mut buckets);
        buckets.truncate(LARGEST_EXPENSE_MONTHS);
        buckets
    }

    /// Amount per month of the supplied entries, oldest month first.
    pub fn evolution_by_month(entries: &[CompanyEntry]) -> Vec<LabeledAmount> {
        let mut buckets = Vec::new();
        for entry in entries {
            accumulate(&mut buckets, entry.date.month_label(), amount_or_zero(entry.amount()));
        }
        buckets.sort_by(|a, b| a.name.cmp(&b.name));
        buckets
    }

    pub fn top_expense_categories(entries: &[CompanyEntry]) -> Vec<LabeledAmount> {
        let mut buckets = Vec::new();
        for entry in entries.iter().filter(|entry| entry.is_expense()) {
            accumulate(&mut buckets, category_bucket(entry), amount_or_zero(entry.amount()));
        }
        sort_descending(&mut buckets);
        buckets.truncate(TOP_EXPENSE_CATEGORIES);
        buckets
    }

    /// Revenue minus expense per month, oldest month first.
    pub fn profit_by_month(entries: &[CompanyEntry]) -> Vec<LabeledAmount> {
        let mut buckets = Vec::new();
        for entry in entries {
            let signed = entry.kind.signed(amount_or_zero(entry.amount()));
            accumulate(&mut buckets, entry.date.month_label(), signed);
        }
        buckets.sort_by(|a, b| a.name.cmp(&b.name));
        buckets
    }

    pub fn investment_goal(totals: &CompanyTotals) -> InvestmentGoal {
        let ratio = if totals.total_revenue != 0.0 {
            (totals.balance / totals.total_revenue).clamp(0.0, 1.0)
        } else {
            0.0
        };
        InvestmentGoal {
            ratio,
            achieved_percent: round_one_decimal(ratio * 100.0),
            remaining_percent: round_one_decimal((1.0 - ratio) * 100.0),
        }
    }

    pub fn expense_ratio_percent(totals: &CompanyTotals) -> f64 {
        if totals.total_revenue != 0.0 {
            totals.total_expense / totals.total_revenue * 100.0
        } else {
            0.0
        }
    }

    /// Mean expense ticket; zero unless the month has both revenue and expense.
    pub fn average_expense(entries: &[CompanyEntry], totals: &CompanyTotals) -> f64 {
        if totals.total_revenue == 0.0 || totals.total_expense == 0.0 {
            return 0.0;
        }
        let count = entries.iter().filter(|entry| entry.is_expense()).count().max(1);
        totals.total_expense / count as f64
    }
}

fn sum_kind(entries: &[CompanyEntry], kind: EntryKind) -> f64 {
    entries
        .iter()
        .filter(|entry| entry.kind == kind)
        .map(|entry| amount_or_zero(entry.amount()))
        .sum()
}

fn category_bucket(entry: &CompanyEntry) -> String {
    entry
        .category
        .clone()
        .unwrap_or_else(|| UNSPECIFIED_BUCKET.to_string())
}

fn accumulate(buckets: &mut Vec<LabeledAmount>, name: String, amount: f64) {
    match buckets.iter_mut().find(|bucket| bucket.name == name) {
        Some(bucket) => bucket.amount += amount,
        None => buckets.push(LabeledAmount::new(name, amount)),
    }
}

fn sort_descending(buckets: &mut [LabeledAmount]) {
    buckets.sort_by(|a, b| b.amount.total_cmp(&a.amount));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MonthKey;

    fn month() -> MonthKey {
        "2024-05".parse().unwrap()
    }

    fn entry(kind: EntryKind, category: Option<&str>, day: u32, amount: f64) -> CompanyEntry {
        CompanyEntry::new(month(), kind, "line", EntryDate::from_ymd(2024, 5, day), amount)
            .with_category(category)
    }

    fn sample() -> Vec<CompanyEntry> {
        vec![
            entry(EntryKind::Revenue, Some("Sales"), 2, 5000.0),
            entry(EntryKind::Expense, Some("Rent"), 5, 2000.0),
            entry(EntryKind::Expense, None, 5, 700.0),
            entry(EntryKind::Expense, Some(""), 20, 500.0),
        ]
    }

    #[test]
    fn balance_and_goal_follow_totals() {
        let totals = CompanyService::totals(&sample());
        assert_eq!(totals.total_revenue, 5000.0);
        assert_eq!(totals.total_expense, 3200.0);
        assert_eq!(totals.balance, 1800.0);
        let goal = CompanyService::investment_goal(&totals);
        assert!((goal.ratio - 0.36).abs() < 1e-12);
        assert_eq!(goal.achieved_percent, 36.0);
        assert_eq!(goal.remaining_percent, 64.0);
    }

    #[test]
    fn goal_is_zero_without_revenue_and_clamped_on_loss() {
        let none = CompanyService::investment_goal(&CompanyTotals::default());
        assert_eq!(none.ratio, 0.0);
        let loss = CompanyService::investment_goal(&CompanyTotals {
            total_revenue: 100.0,
            total_expense: 300.0,
            balance: -200.0,
        });
        assert_eq!(loss.ratio, 0.0);
        assert_eq!(loss.remaining_percent, 100.0);
    }

    #[test]
    fn blank_categories_share_one_bucket() {
        let buckets = CompanyService::expenses_by_category(&sample());
        let names: Vec<&str> = buckets.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Sales", "Rent", UNSPECIFIED_BUCKET]);
        assert_eq!(buckets[0].amount, 0.0);
        assert_eq!(buckets[2].amount, 1200.0);
    }

    #[test]
    fn balance_series_runs_in_date_order() {
        let mut entries = sample();
        entries.reverse();
        let series = CompanyService::balance_series(&entries);
        let balances: Vec<f64> = series.iter().map(|point| point.balance).collect();
        assert_eq!(balances, vec![5000.0, 2300.0, 1800.0]);
        assert_eq!(series[0].date.to_string(), "2024-05-02");
    }

    #[test]
    fn top_categories_are_descending() {
        let top = CompanyService::top_expense_categories(&sample());
        assert_eq!(top[0].name, "Rent");
        assert_eq!(top[1].name, UNSPECIFIED_BUCKET);
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn monthly_projections_group_by_entry_month() {
        let mut entries = sample();
        entries.push(
            CompanyEntry::new(
                month(),
                EntryKind::Expense,
                "late invoice",
                EntryDate::from_ymd(2024, 4, 28),
                100.0,
            )
            .with_category(Some("Rent")),
        );
        let largest = CompanyService::months_largest_expenses(&entries);
        assert_eq!(largest[0], LabeledAmount::new("2024-05", 3200.0));
        assert_eq!(largest[1], LabeledAmount::new("2024-04", 100.0));

        let profit = CompanyService::profit_by_month(&entries);
        assert_eq!(profit[0], LabeledAmount::new("2024-04", -100.0));
        assert_eq!(profit[1], LabeledAmount::new("2024-05", 1800.0));
    }

    #[test]
    fn ratios_guard_against_zero_revenue() {
        let expenses = vec![entry(EntryKind::Expense, Some("Rent"), 1, 100.0)];
        let totals = CompanyService::totals(&expenses);
        assert_eq!(CompanyService::expense_ratio_percent(&totals), 0.0);
        assert_eq!(CompanyService::average_expense(&expenses, &totals), 0.0);

        let totals = CompanyService::totals(&sample());
        assert_eq!(CompanyService::average_expense(&sample(), &totals), 3200.0 / 3.0);
        assert!((CompanyService::expense_ratio_percent(&totals) - 64.0).abs() < 1e-9);
    }
}
