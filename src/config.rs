//! Runtime configuration, resolved once at startup from the environment
//! (after `.env` has been loaded by `main`).

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Name shown in the data listing when `CLINIC_NAME` is not set.
pub const DEFAULT_CLINIC_NAME: &str = "Rumah Sakit Mini";
/// Overrides the clinic name.
pub const CLINIC_NAME_VAR: &str = "CLINIC_NAME";
/// Overrides the SQLite file location.
pub const DB_PATH_VAR: &str = "CLINIC_DB_PATH";

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".clinic-roster";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "clinic.sqlite";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub clinic_name: String,
    pub db_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let clinic_name = value(CLINIC_NAME_VAR).unwrap_or_else(|| DEFAULT_CLINIC_NAME.to_string());
        let db_path = match value(DB_PATH_VAR) {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        Ok(Self {
            clinic_name,
            db_path,
        })
    }
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn default_db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_defaults() {
        let config = Config::from_lookup(|key| match key {
            CLINIC_NAME_VAR => Some("Klinik Sehat".to_string()),
            DB_PATH_VAR => Some("/tmp/klinik.sqlite".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.clinic_name, "Klinik Sehat");
        assert_eq!(config.db_path, PathBuf::from("/tmp/klinik.sqlite"));
    }

    #[test]
    fn blank_name_falls_back_to_default() {
        let config = Config::from_lookup(|key| match key {
            CLINIC_NAME_VAR => Some("   ".to_string()),
            DB_PATH_VAR => Some("clinic.sqlite".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.clinic_name, DEFAULT_CLINIC_NAME);
    }

    #[test]
    fn default_path_lives_under_the_data_dir() {
        let Some(base_dirs) = BaseDirs::new() else {
            return;
        };

        let config = Config::from_lookup(|_| None).unwrap();

        assert_eq!(
            config.db_path,
            base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME)
        );
    }
}
