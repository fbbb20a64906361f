//! Payroll ("holerite") records: salaries, receivables and company tax.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{
    amount_or_zero, lenient_amount, lenient_flag, lenient_or_default, lenient_text, EntryDate,
    Identifiable,
};

/// Employees listed on every new month, all starting at zero.
pub const DEFAULT_EMPLOYEES: [&str; 3] = ["Adjalma", "Eliete", "Eliete (INSS)"];

/// Receivable lines listed on every new month, all starting at zero.
pub const DEFAULT_RECEIVABLES: [&str; 3] =
    ["Faturamento Principal", "Serviços Adicionais", "Consultoria"];

/// Statutory and other deductions applied to a gross salary.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Deductions {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub inss: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub irrf: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub other: f64,
}

impl Deductions {
    pub fn new(inss: f64, irrf: f64, other: f64) -> Self {
        Self { inss, irrf, other }
    }

    pub fn total(&self) -> f64 {
        amount_or_zero(self.inss) + amount_or_zero(self.irrf) + amount_or_zero(self.other)
    }
}

/// Net pay floored at zero.
pub fn net_salary(gross: f64, deductions: &Deductions) -> f64 {
    (amount_or_zero(gross) - deductions.total()).max(0.0)
}

/// One employee's salary for the month. The net amount is derived and can
/// only change through the gross/deduction setters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "StoredSalary")]
pub struct Salary {
    pub id: Uuid,
    pub employee_name: String,
    gross_salary: f64,
    deductions: Deductions,
    net_salary: f64,
    pub paid: bool,
}

impl Salary {
    pub fn new(employee_name: impl Into<String>, gross_salary: f64, deductions: Deductions) -> Self {
        let mut salary = Self {
            id: Uuid::new_v4(),
            employee_name: employee_name.into(),
            gross_salary,
            deductions,
            net_salary: 0.0,
            paid: false,
        };
        salary.recompute();
        salary
    }

    pub fn gross_salary(&self) -> f64 {
        self.gross_salary
    }

    pub fn deductions(&self) -> &Deductions {
        &self.deductions
    }

    pub fn net_salary(&self) -> f64 {
        self.net_salary
    }

    pub fn set_gross_salary(&mut self, gross: f64) {
        self.gross_salary = gross;
        self.recompute();
    }

    pub fn set_deductions(&mut self, deductions: Deductions) {
        self.deductions = deductions;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.gross_salary = amount_or_zero(self.gross_salary);
        self.net_salary = net_salary(self.gross_salary, &self.deductions);
    }
}

impl Salary {
    /// Fresh zeroed rows for the default employees.
    pub fn defaults() -> Vec<Salary> {
        DEFAULT_EMPLOYEES
            .iter()
            .map(|name| Salary::new(*name, 0.0, Deductions::default()))
            .collect()
    }
}

impl Identifiable for Salary {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Deserialize)]
struct StoredSalary {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    #[serde(default, deserialize_with = "lenient_text")]
    employee_name: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    gross_salary: f64,
    #[serde(default, deserialize_with = "lenient_or_default")]
    deductions: Deductions,
    #[serde(default, deserialize_with = "lenient_flag")]
    paid: bool,
}

impl From<StoredSalary> for Salary {
    fn from(stored: StoredSalary) -> Self {
        let mut salary = Salary::new(stored.employee_name, stored.gross_salary, stored.deductions);
        salary.id = stored.id;
        salary.paid = stored.paid;
        salary
    }
}

/// Money the company expects to receive this month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyReceivable {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default)]
    pub due_date: EntryDate,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub received: bool,
}

impl CompanyReceivable {
    pub fn new(description: impl Into<String>, amount: f64, due_date: EntryDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
            due_date,
            received: false,
        }
    }
}

impl CompanyReceivable {
    /// Fresh zeroed rows for the default receivable lines.
    pub fn defaults() -> Vec<CompanyReceivable> {
        DEFAULT_RECEIVABLES
            .iter()
            .map(|description| CompanyReceivable::new(*description, 0.0, EntryDate::unset()))
            .collect()
    }
}

impl Identifiable for CompanyReceivable {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Company INSS contribution, one per month.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CompanyTax {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default)]
    pub due_date: EntryDate,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub paid: bool,
}
