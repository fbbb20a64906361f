use serde::Serialize;

use crate::domain::{CompanyEntry, MonthKey, MonthRecords};

use super::{
    company_service::{BalancePoint, CompanyService, CompanyTotals, InvestmentGoal},
    payroll_service::{PayrollService, PayrollTotals},
    personal_service::{LabeledAmount, PersonalService, PersonalTotals},
};

/// Every derived figure for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: MonthKey,
    pub personal: PersonalTotals,
    pub company: CompanyTotals,
    pub investment_goal: InvestmentGoal,
    pub payroll: PayrollTotals,
}

/// Chart-ready company aggregates. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyProjections {
    pub expenses_by_category: Vec<LabeledAmount>,
    pub totals_by_kind: Vec<LabeledAmount>,
    pub balance_series: Vec<BalancePoint>,
    pub months_largest_expenses: Vec<LabeledAmount>,
    pub expense_evolution: Vec<LabeledAmount>,
    pub top_expense_categories: Vec<LabeledAmount>,
    pub profit_by_month: Vec<LabeledAmount>,
    pub expense_ratio_percent: f64,
    pub average_expense: f64,
    pub entry_count: usize,
}

pub struct SummaryService;

impl SummaryService {
    /// Recomputes every total from scratch. Call after each mutation.
    pub fn derive(records: &MonthRecords) -> MonthSummary {
        let personal = PersonalService::totals(
            &records.fixed_expenses,
            &records.variable_expenses,
            &records.cards,
        );
        let company = CompanyService::totals(&records.company_entries);
        let payroll = PayrollService::totals(
            &records.salaries,
            &records.receivables,
            &records.company_tax,
            &personal,
        );
        MonthSummary {
            month: records.month,
            personal,
            company,
            investment_goal: CompanyService::investment_goal(&company),
            payroll,
        }
    }

    pub fn company_projections(entries: &[CompanyEntry]) -> CompanyProjections {
        let totals = CompanyService::totals(entries);
        let expenses: Vec<CompanyEntry> = entries
            .iter()
            .filter(|entry| entry.is_expense())
            .cloned()
            .collect();
        CompanyProjections {
            expenses_by_category: CompanyService::expenses_by_category(entries),
            totals_by_kind: CompanyService::totals_by_kind(entries),
            balance_series: CompanyService::balance_series(entries),
            months_largest_expenses: CompanyService::months_largest_expenses(entries),
            expense_evolution: CompanyService::evolution_by_month(&expenses),
            top_expense_categories: CompanyService::top_expense_categories(entries),
            profit_by_month: CompanyService::profit_by_month(entries),
            expense_ratio_percent: CompanyService::expense_ratio_percent(&totals),
            average_expense: CompanyService::average_expense(entries, &totals),
            entry_count: entries.len(),
        }
    }
}
