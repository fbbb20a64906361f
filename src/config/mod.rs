use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    errors::LedgerError,
};

pub const REMOTE_URL_ENV: &str = "HOUSEHOLD_LEDGER_REMOTE_URL";
pub const REMOTE_KEY_ENV: &str = "HOUSEHOLD_LEDGER_REMOTE_KEY";

/// User preferences persisted as `config/config.json` under the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_decimal_separator")]
    pub decimal_separator: char,
    #[serde(default = "Config::default_grouping_separator")]
    pub grouping_separator: char,
    #[serde(default = "Config::default_party_a")]
    pub party_a: String,
    #[serde(default = "Config::default_party_b")]
    pub party_b: String,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Custom root for the local store. Defaults to the application data directory.
    pub data_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened_month: Option<String>,
}

/// Connection settings for the managed backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteSettings {
    pub url: String,
    pub api_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "pt-BR".into(),
            currency_symbol: Self::default_currency_symbol(),
            decimal_separator: Self::default_decimal_separator(),
            grouping_separator: Self::default_grouping_separator(),
            party_a: Self::default_party_a(),
            party_b: Self::default_party_b(),
            backup_retention: Self::default_backup_retention(),
            data_dir: None,
            remote: None,
            last_opened_month: None,
        }
    }
}

impl Config {
    pub fn default_currency_symbol() -> String {
        "R$".into()
    }

    pub fn default_decimal_separator() -> char {
        ','
    }

    pub fn default_grouping_separator() -> char {
        '.'
    }

    pub fn default_party_a() -> String {
        "Party A".into()
    }

    pub fn default_party_b() -> String {
        "Party B".into()
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    /// Remote settings from the environment, falling back to the file. Blank
    /// values count as not configured.
    pub fn remote_settings(&self) -> Option<RemoteSettings> {
        let from_env = match (env::var(REMOTE_URL_ENV), env::var(REMOTE_KEY_ENV)) {
            (Ok(url), Ok(api_key)) => Some(RemoteSettings { url, api_key }),
            _ => None,
        };
        from_env
            .or_else(|| self.remote.clone())
            .filter(|settings| !settings.url.trim().is_empty() && !settings.api_key.trim().is_empty())
    }
}

/// Loads and saves [`Config`] atomically.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns defaults when no file exists yet.
    pub fn load(&self) -> Result<Config, LedgerError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            LedgerError::Config(format!("{} is not valid: {err}", self.path.display()))
        })
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| LedgerError::Config(err.to_string()))?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }
}
