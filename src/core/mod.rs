pub mod month_manager;
pub mod registry;
pub mod services;
pub mod utils;

pub use month_manager::{MonthManager, OpenReport};
pub use registry::DimensionRegistry;
