pub mod json_backend;
pub mod memory;
pub mod remote;

use std::sync::Arc;

use tracing::info;

use crate::{
    config::Config,
    core::registry::DimensionRegistry,
    domain::{MonthKey, MonthRecords},
    errors::StoreError,
};

pub type Result<T> = std::result::Result<T, StoreError>;

/// Abstraction over the places a month can be persisted. Callers never learn
/// which backend is active.
pub trait MonthStore: Send + Sync {
    /// Short label for logs and the CLI status line.
    fn backend_name(&self) -> &'static str;

    /// Returns `Ok(None)` when nothing was ever saved for `month`.
    fn load_month(&self, month: &MonthKey) -> Result<Option<MonthRecords>>;

    /// Replaces the stored month as a whole. Saving the same records twice
    /// leaves the same stored state.
    fn save_month(&self, month: &MonthKey, records: &MonthRecords) -> Result<()>;

    fn list_months(&self) -> Result<Vec<MonthKey>>;

    fn load_dimensions(&self) -> Result<DimensionRegistry>;

    fn save_dimensions(&self, registry: &DimensionRegistry) -> Result<()>;

    /// Snapshot names for a month, newest first. Backends without snapshots
    /// report none.
    fn list_backups(&self, _month: &MonthKey) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

impl<S: MonthStore + ?Sized> MonthStore for Arc<S> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn load_month(&self, month: &MonthKey) -> Result<Option<MonthRecords>> {
        (**self).load_month(month)
    }

    fn save_month(&self, month: &MonthKey, records: &MonthRecords) -> Result<()> {
        (**self).save_month(month, records)
    }

    fn list_months(&self) -> Result<Vec<MonthKey>> {
        (**self).list_months()
    }

    fn load_dimensions(&self) -> Result<DimensionRegistry> {
        (**self).load_dimensions()
    }

    fn save_dimensions(&self, registry: &DimensionRegistry) -> Result<()> {
        (**self).save_dimensions(registry)
    }

    fn list_backups(&self, month: &MonthKey) -> Result<Vec<String>> {
        (**self).list_backups(month)
    }
}

/// Rejects records filed under a different month than the key they are saved to.
pub(crate) fn ensure_same_month(month: &MonthKey, records: &MonthRecords) -> Result<()> {
    if records.month != *month {
        return Err(StoreError::Rejected(format!(
            "records for {} cannot be saved under {}",
            records.month, month
        )));
    }
    Ok(())
}

/// Picks the remote store when one is configured and the local JSON store
/// otherwise.
pub fn open_store(config: &Config) -> Result<Box<dyn MonthStore>> {
    if let Some(settings) = config.remote_settings() {
        info!(url = %settings.url, "using remote month store");
        return Ok(Box::new(RemoteMonthStore::new(&settings)?));
    }
    let store = JsonMonthStore::new(config.data_dir.clone(), Some(config.backup_retention))?;
    info!(root = %store.base_dir().display(), "using local month store");
    Ok(Box::new(store))
}

pub use json_backend::JsonMonthStore;
pub use memory::MemoryMonthStore;
pub use remote::RemoteMonthStore;
