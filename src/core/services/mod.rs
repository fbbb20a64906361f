//! The aggregation engine: pure functions from a month's records to the
//! figures shown on screen. Nothing here fails or mutates its input.

pub mod company_service;
pub mod payroll_service;
pub mod personal_service;
pub mod summary_service;

pub use company_service::{
    BalancePoint, CompanyService, CompanyTotals, InvestmentGoal, UNSPECIFIED_BUCKET,
};
pub use payroll_service::{BalanceStatus, PayrollService, PayrollTotals};
pub use personal_service::{LabeledAmount, PersonalService, PersonalTotals, DEFAULT_TOP_FIXED};
pub use summary_service::{CompanyProjections, MonthSummary, SummaryService};
