use std::fmt;

use serde::Serialize;

use crate::domain::{amount_or_zero, CompanyReceivable, CompanyTax, Deductions, Salary};

use super::personal_service::PersonalTotals;

/// Sign of the family-wide net balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    Surplus,
    Deficit,
    Balanced,
}

impl BalanceStatus {
    pub fn from_balance(balance: f64) -> Self {
        if balance > 0.0 {
            BalanceStatus::Surplus
        } else if balance < 0.0 {
            BalanceStatus::Deficit
        } else {
            BalanceStatus::Balanced
        }
    }
}

impl fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BalanceStatus::Surplus => "surplus",
            BalanceStatus::Deficit => "deficit",
            BalanceStatus::Balanced => "balanced",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayrollTotals {
    pub total_gross: f64,
    pub total_inss: f64,
    pub total_irrf: f64,
    pub total_other_deductions: f64,
    pub total_net_salaries: f64,
    pub total_receivables: f64,
    pub total_tax: f64,
    pub total_revenue: f64,
    pub total_fixed_expenses: f64,
    pub total_variable_expenses: f64,
    pub total_expense: f64,
    pub net_balance: f64,
    pub status: BalanceStatus,
}

pub struct PayrollService;

impl PayrollService {
    /// Family-wide balance: net salaries plus receivables minus company tax,
    /// against the month's personal fixed and variable expenses.
    pub fn totals(
        salaries: &[Salary],
        receivables: &[CompanyReceivable],
        tax: &CompanyTax,
        personal: &PersonalTotals,
    ) -> PayrollTotals {
        let total_gross: f64 = salaries.iter().map(Salary::gross_salary).sum();
        let total_inss: f64 = sum_deduction(salaries, |deductions| deductions.inss);
        let total_irrf: f64 = sum_deduction(salaries, |deductions| deductions.irrf);
        let total_other_deductions: f64 = sum_deduction(salaries, |deductions| deductions.other);
        let total_net_salaries: f64 = salaries.iter().map(Salary::net_salary).sum();
        let total_receivables: f64 = receivables
            .iter()
            .map(|receivable| amount_or_zero(receivable.amount))
            .sum();
        let total_tax = amount_or_zero(tax.amount);
        let total_revenue = total_net_salaries + total_receivables - total_tax;
        let total_expense = personal.total_fixed + personal.total_variable;
        let net_balance = total_revenue - total_expense;

        PayrollTotals {
            total_gross,
            total_inss,
            total_irrf,
            total_other_deductions,
            total_net_salaries,
            total_receivables,
            total_tax,
            total_revenue,
            total_fixed_expenses: personal.total_fixed,
            total_variable_expenses: personal.total_variable,
            total_expense,
            net_balance,
            status: BalanceStatus::from_balance(net_balance),
        }
    }
}

fn sum_deduction(salaries: &[Salary], pick: impl Fn(&Deductions) -> f64) -> f64 {
    salaries
        .iter()
        .map(|salary| amount_or_zero(pick(salary.deductions())))
        .sum()
}
