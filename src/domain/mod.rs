pub mod common;
pub mod company;
pub mod month;
pub mod payroll;
pub mod personal;

pub use common::{amount_or_zero, is_truthy_word, parse_amount, EntryDate, Identifiable, MonthKey};
pub use company::{CompanyEntry, EntryKind};
pub use month::MonthRecords;
pub use payroll::{
    net_salary, CompanyReceivable, CompanyTax, Deductions, Salary, DEFAULT_EMPLOYEES,
    DEFAULT_RECEIVABLES,
};
pub use personal::{CardBalance, FixedExpense, SubtotalTag, VariableExpenseEntry};

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use uuid;
