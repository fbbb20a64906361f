use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard,
    },
};

use crate::{
    core::registry::DimensionRegistry,
    domain::{MonthKey, MonthRecords},
    errors::StoreError,
};

use super::{ensure_same_month, MonthStore, Result};

/// In-process store. Months are kept serialized so loads go through the
/// same decoding path as the persistent backends.
#[derive(Debug, Default)]
pub struct MemoryMonthStore {
    months: Mutex<BTreeMap<MonthKey, String>>,
    dimensions: Mutex<DimensionRegistry>,
    offline: AtomicBool,
}

impl MemoryMonthStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates an unreachable backend: every call fails while offline.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Stores raw JSON for a month, bypassing serialization. Useful for
    /// exercising lenient decoding of hand-edited data.
    pub fn insert_raw(&self, month: MonthKey, json: impl Into<String>) -> Result<()> {
        self.months()?.insert(month, json.into());
        Ok(())
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }

    fn months(&self) -> Result<MutexGuard<'_, BTreeMap<MonthKey, String>>> {
        self.months
            .lock()
            .map_err(|_| StoreError::Unavailable("month map lock poisoned".into()))
    }

    fn dimensions(&self) -> Result<MutexGuard<'_, DimensionRegistry>> {
        self.dimensions
            .lock()
            .map_err(|_| StoreError::Unavailable("dimension lock poisoned".into()))
    }
}

impl MonthStore for MemoryMonthStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn load_month(&self, month: &MonthKey) -> Result<Option<MonthRecords>> {
        self.check_online()?;
        match self.months()?.get(month) {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save_month(&self, month: &MonthKey, records: &MonthRecords) -> Result<()> {
        self.check_online()?;
        ensure_same_month(month, records)?;
        let json = serde_json::to_string(records)?;
        self.months()?.insert(*month, json);
        Ok(())
    }

    fn list_months(&self) -> Result<Vec<MonthKey>> {
        self.check_online()?;
        Ok(self.months()?.keys().copied().collect())
    }

    fn load_dimensions(&self) -> Result<DimensionRegistry> {
        self.check_online()?;
        Ok(self.dimensions()?.clone())
    }

    fn save_dimensions(&self, registry: &DimensionRegistry) -> Result<()> {
        self.check_online()?;
        *self.dimensions()? = registry.clone();
        Ok(())
    }
}
