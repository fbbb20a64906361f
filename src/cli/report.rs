//! Plain-text renderings of derived figures and record lists. Nothing here
//! computes totals; it only lays out what the services produced.

use std::fmt::{Display, Write};

use crate::core::services::{
    CompanyProjections, CompanyTotals, InvestmentGoal, PayrollTotals, PersonalTotals,
};
use crate::currency::CurrencyFormat;
use crate::domain::{
    CompanyEntry, CompanyReceivable, CompanyTax, FixedExpense, Salary, SubtotalTag,
    VariableExpenseEntry,
};

const LABEL_WIDTH: usize = 24;

fn row(out: &mut String, label: &str, value: impl Display) {
    let _ = writeln!(out, "{:<width$}{}", label, value, width = LABEL_WIDTH);
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "-".repeat(title.chars().count()));
}

fn flag(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub fn personal_report(
    totals: &PersonalTotals,
    format: &CurrencyFormat,
    party_a: &str,
    party_b: &str,
) -> String {
    let mut out = String::new();
    heading(&mut out, "Personal expenses");
    row(&mut out, "Fixed total", format.format(totals.total_fixed));
    row(&mut out, &format!("Fixed share {party_a}"), format.format(totals.total_fixed_share_a));
    row(&mut out, &format!("Fixed share {party_b}"), format.format(totals.total_fixed_share_b));
    row(&mut out, "Card-linked fixed", format.format(totals.card_linked_fixed_total));
    row(&mut out, "Insurance", format.format(totals.insurance_amount));
    row(&mut out, &format!("Variable {party_a}"), format.format(totals.variable_share_a));
    row(&mut out, &format!("Variable {party_b}"), format.format(totals.variable_share_b));
    row(&mut out, "Variable total", format.format(totals.total_variable));
    row(&mut out, "Grand total", format.format(totals.grand_total));
    row(&mut out, "Cards total", format.format(totals.total_cards));
    row(&mut out, &format!("Total {party_a}"), format.format(totals.total_party_a));
    row(&mut out, &format!("Total {party_b}"), format.format(totals.total_party_b));
    row(&mut out, "Combined", format.format(totals.combined_total));
    row(&mut out, "Difference", format.format(totals.difference));
    row(
        &mut out,
        "Split",
        format!("{} / {}", format.percent(totals.percent_a), format.percent(totals.percent_b)),
    );
    out
}

pub fn company_report(
    totals: &CompanyTotals,
    goal: &InvestmentGoal,
    projections: &CompanyProjections,
    format: &CurrencyFormat,
) -> String {
    let mut out = String::new();
    heading(&mut out, "Company cash flow");
    row(&mut out, "Revenue", format.format(totals.total_revenue));
    row(&mut out, "Expense", format.format(totals.total_expense));
    row(&mut out, "Balance", format.format(totals.balance));
    row(
        &mut out,
        "Investment goal",
        format!(
            "{} achieved, {} remaining",
            format.percent(goal.achieved_percent),
            format.percent(goal.remaining_percent)
        ),
    );
    row(&mut out, "Expense ratio", format.percent(projections.expense_ratio_percent));
    row(&mut out, "Average expense", format.format(projections.average_expense));
    row(&mut out, "Entries", projections.entry_count);
    if !projections.expenses_by_category.is_empty() {
        let _ = writeln!(out, "By category");
        for bucket in &projections.expenses_by_category {
            row(&mut out, &format!("  {}", bucket.name), format.format(bucket.amount));
        }
    }
    out
}

pub fn payroll_report(totals: &PayrollTotals, format: &CurrencyFormat) -> String {
    let mut out = String::new();
    heading(&mut out, "Payroll balance");
    row(&mut out, "Net salaries", format.format(totals.total_net_salaries));
    row(&mut out, "Receivables", format.format(totals.total_receivables));
    row(&mut out, "Company tax", format.format(totals.total_tax));
    row(&mut out, "Revenue", format.format(totals.total_revenue));
    row(&mut out, "Fixed expenses", format.format(totals.total_fixed_expenses));
    row(&mut out, "Variable expenses", format.format(totals.total_variable_expenses));
    row(&mut out, "Expense", format.format(totals.total_expense));
    row(&mut out, "Net balance", format.format(totals.net_balance));
    row(&mut out, "Status", totals.status);
    out
}

pub fn fixed_table(expenses: &[FixedExpense], format: &CurrencyFormat) -> String {
    let mut out = String::new();
    for expense in expenses {
        let tag = match expense.tag {
            SubtotalTag::Untagged => String::new(),
            other => format!(" [{other}]"),
        };
        let _ = writeln!(
            out,
            "{:<width$}{}  paid: {}{}",
            expense.category,
            format.format(expense.amount),
            flag(expense.paid),
            tag,
            width = LABEL_WIDTH
        );
    }
    out
}

pub fn variable_table(entries: &[VariableExpenseEntry], format: &CurrencyFormat) -> String {
    let mut out = String::new();
    for (idx, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {} {}  {} / {}",
            idx + 1,
            display_date(&entry.date.to_string()),
            entry.description,
            format.format(entry.share_a),
            format.format(entry.share_b)
        );
    }
    out
}

pub fn company_table(entries: &[CompanyEntry], format: &CurrencyFormat) -> String {
    let mut out = String::new();
    for (idx, entry) in entries.iter().enumerate() {
        let mut dimensions = Vec::new();
        if let Some(category) = &entry.category {
            dimensions.push(category.as_str());
        }
        if let Some(cost_center) = &entry.cost_center {
            dimensions.push(cost_center.as_str());
        }
        let dimensions = if dimensions.is_empty() {
            String::new()
        } else {
            format!(" ({})", dimensions.join(", "))
        };
        let _ = writeln!(
            out,
            "{:>3}. {} {:<7} {}{}  {}",
            idx + 1,
            display_date(&entry.date.to_string()),
            entry.kind,
            entry.description,
            dimensions,
            format.format(entry.amount())
        );
    }
    out
}

/// One line per salary followed by the column totals.
pub fn salary_table(salaries: &[Salary], totals: &PayrollTotals, format: &CurrencyFormat) -> String {
    let mut out = String::new();
    for (idx, salary) in salaries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {}  gross {}  deductions {}  net {}  paid: {}",
            idx + 1,
            salary.employee_name,
            format.format(salary.gross_salary()),
            format.format(salary.deductions().total()),
            format.format(salary.net_salary()),
            flag(salary.paid)
        );
    }
    let _ = writeln!(
        out,
        "Total  gross {}  inss {}  irrf {}  other {}  net {}",
        format.format(totals.total_gross),
        format.format(totals.total_inss),
        format.format(totals.total_irrf),
        format.format(totals.total_other_deductions),
        format.format(totals.total_net_salaries)
    );
    out
}

pub fn receivable_table(receivables: &[CompanyReceivable], format: &CurrencyFormat) -> String {
    let mut out = String::new();
    for (idx, receivable) in receivables.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {} {}  {}  received: {}",
            idx + 1,
            display_date(&receivable.due_date.to_string()),
            receivable.description,
            format.format(receivable.amount),
            flag(receivable.received)
        );
    }
    out
}

pub fn tax_line(tax: &CompanyTax, format: &CurrencyFormat) -> String {
    format!(
        "INSS {} due {} paid: {}",
        format.format(tax.amount),
        display_date(&tax.due_date.to_string()),
        flag(tax.paid)
    )
}

fn display_date(iso: &str) -> &str {
    if iso.is_empty() {
        "----------"
    } else {
        iso
    }
}
