use chrono::Utc;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::{
    core::{
        registry::DimensionRegistry,
        utils::{ensure_dir, write_atomic, PathResolver},
    },
    domain::{MonthKey, MonthRecords},
    errors::StoreError,
};

use super::{ensure_same_month, MonthStore, Result};

const FILE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.3f";
const DEFAULT_RETENTION: usize = 5;

/// Local on-device store: one JSON document per month plus rolling backups
/// of the previous version.
#[derive(Debug, Clone)]
pub struct JsonMonthStore {
    root: PathBuf,
    months_dir: PathBuf,
    backups_dir: PathBuf,
    dimensions_file: PathBuf,
    retention: usize,
}

impl JsonMonthStore {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let root = PathResolver::resolve_base(root);
        ensure_dir(&root)?;
        let months_dir = PathResolver::months_dir_in(&root);
        let backups_dir = PathResolver::backup_dir_in(&root);
        ensure_dir(&months_dir)?;
        ensure_dir(&backups_dir)?;
        let dimensions_file = PathResolver::dimensions_file_in(&root);
        Ok(Self {
            root,
            months_dir,
            backups_dir,
            dimensions_file,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn month_path(&self, month: &MonthKey) -> PathBuf {
        self.months_dir.join(format!("{month}.{FILE_EXTENSION}"))
    }

    fn backup_dir(&self, month: &MonthKey) -> PathBuf {
        self.backups_dir.join(month.to_string())
    }

    pub fn backup_path(&self, month: &MonthKey, backup_name: &str) -> PathBuf {
        self.backup_dir(month).join(backup_name)
    }

    /// Copies a snapshot back over the live month and returns it.
    pub fn restore_backup(&self, month: &MonthKey, backup_name: &str) -> Result<MonthRecords> {
        let backup_path = self.backup_path(month, backup_name);
        if !backup_path.exists() {
            return Err(StoreError::NotFound(format!("backup `{backup_name}`")));
        }
        let records = read_month(&backup_path)?;
        ensure_same_month(month, &records)?;
        self.save_month(month, &records)?;
        Ok(records)
    }

    fn backup_existing_file(&self, month: &MonthKey, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(month);
        ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT);
        let backup_path = dir.join(format!("{month}_{timestamp}.{FILE_EXTENSION}"));
        fs::copy(path, &backup_path)?;
        self.prune_backups(month)
    }

    fn prune_backups(&self, month: &MonthKey) -> Result<()> {
        let backups = self.list_backups(month)?;
        for stale in backups.iter().skip(self.retention) {
            debug!(%month, backup = %stale, "pruning month backup");
            if let Err(err) = fs::remove_file(self.backup_path(month, stale)) {
                warn!(%month, backup = %stale, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl MonthStore for JsonMonthStore {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    fn load_month(&self, month: &MonthKey) -> Result<Option<MonthRecords>> {
        let path = self.month_path(month);
        if !path.exists() {
            return Ok(None);
        }
        read_month(&path).map(Some)
    }

    fn save_month(&self, month: &MonthKey, records: &MonthRecords) -> Result<()> {
        ensure_same_month(month, records)?;
        let path = self.month_path(month);
        let json = serde_json::to_string_pretty(records)?;
        self.backup_existing_file(month, &path)?;
        Ok(write_atomic(&path, &json)?)
    }

    fn list_months(&self) -> Result<Vec<MonthKey>> {
        if !self.months_dir.exists() {
            return Ok(Vec::new());
        }
        let mut months = Vec::new();
        for entry in fs::read_dir(&self.months_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if let Ok(month) = stem.parse::<MonthKey>() {
                months.push(month);
            }
        }
        months.sort();
        Ok(months)
    }

    fn load_dimensions(&self) -> Result<DimensionRegistry> {
        if !self.dimensions_file.exists() {
            return Ok(DimensionRegistry::default());
        }
        let data = fs::read_to_string(&self.dimensions_file)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn save_dimensions(&self, registry: &DimensionRegistry) -> Result<()> {
        let json = serde_json::to_string_pretty(registry)?;
        Ok(write_atomic(&self.dimensions_file, &json)?)
    }

    fn list_backups(&self, month: &MonthKey) -> Result<Vec<String>> {
        let dir = self.backup_dir(month);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        // Timestamps are fixed width, so name order is chronological.
        entries.sort_by(|a, b| b.cmp(a));
        Ok(entries)
    }
}

fn read_month(path: &Path) -> Result<MonthRecords> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CardBalance, FixedExpense};
    use tempfile::TempDir;

    fn storage_with_temp_dir(retention: usize) -> (JsonMonthStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonMonthStore::new(Some(temp.path().to_path_buf()), Some(retention))
            .expect("json storage");
        (storage, temp)
    }

    fn june() -> MonthKey {
        "2024-06".parse().unwrap()
    }

    #[test]
    fn missing_month_loads_as_none() {
        let (storage, _guard) = storage_with_temp_dir(3);
        assert!(storage.load_month(&june()).expect("load").is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir(3);
        let mut records = MonthRecords::with_defaults(june());
        records.cards = CardBalance::new(120.5, 80.0);
        storage.save_month(&june(), &records).expect("save month");
        let loaded = storage.load_month(&june()).expect("load").expect("present");
        assert_eq!(loaded, records);
        assert_eq!(storage.list_months().expect("list"), vec![june()]);
    }

    #[test]
    fn overwrites_keep_a_bounded_number_of_backups() {
        let (storage, _guard) = storage_with_temp_dir(2);
        let mut records = MonthRecords::empty(june());
        for amount in [100.0, 200.0, 300.0, 400.0] {
            records.fixed_expenses = vec![FixedExpense::new("Rent", amount)];
            storage.save_month(&june(), &records).expect("save");
        }
        let backups = storage.list_backups(&june()).expect("list backups");
        assert!(!backups.is_empty());
        assert!(backups.len() <= 2);
    }

    #[test]
    fn mismatched_month_is_rejected() {
        let (storage, _guard) = storage_with_temp_dir(3);
        let records = MonthRecords::empty("2024-07".parse().unwrap());
        let err = storage.save_month(&june(), &records).expect_err("mismatch");
        assert!(matches!(err, StoreError::Rejected(_)));
    }
}
