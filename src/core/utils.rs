use dirs::home_dir;
use std::{
    env,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".household_ledger";
const MONTHS_DIR: &str = "months";
const BACKUP_DIR: &str = "backups";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const DIMENSIONS_FILE: &str = "dimensions.json";
const TMP_SUFFIX: &str = "tmp";

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "HOUSEHOLD_LEDGER_HOME";

/// Creates `path` and its parents when missing.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Stages `data` next to `path` and renames it into place, so readers see
/// either the old document or the new one.
pub(crate) fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    fs::rename(&tmp, path)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Resolves the directories used by the local store and configuration.
pub struct PathResolver;

impl PathResolver {
    /// Application data directory, defaulting to `~/.household_ledger`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
        root.unwrap_or_else(Self::base_dir)
    }

    pub fn months_dir_in(base: &Path) -> PathBuf {
        base.join(MONTHS_DIR)
    }

    pub fn backup_dir_in(base: &Path) -> PathBuf {
        base.join(BACKUP_DIR)
    }

    pub fn config_dir_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_FILE)
    }

    pub fn dimensions_file_in(base: &Path) -> PathBuf {
        base.join(DIMENSIONS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn atomic_write_replaces_contents_without_leftovers() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("doc.json");
        write_atomic(&path, "{\"v\": 1}").expect("first write");
        write_atomic(&path, "{\"v\": 2}").expect("second write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "{\"v\": 2}");
        assert!(!tmp_path(&path).exists());
        assert_eq!(
            tmp_path(&path).file_name().and_then(|name| name.to_str()),
            Some("doc.json.tmp")
        );
    }
}
