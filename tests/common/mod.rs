#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use household_ledger::{
    config::ConfigManager, core::MonthManager, domain::MonthKey, storage::JsonMonthStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates an isolated manager backed by a local JSON store keeping three backups.
pub fn setup_test_env() -> (MonthManager, ConfigManager, PathBuf) {
    let base = temp_base();
    let storage = JsonMonthStore::new(Some(base.clone()), Some(3)).expect("create json store");
    let manager = MonthManager::new(Box::new(storage));
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (manager, config_manager, base)
}

pub fn month(raw: &str) -> MonthKey {
    raw.parse().expect("valid month key")
}
