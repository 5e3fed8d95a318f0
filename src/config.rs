use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const DATA_DIR_ENV: &str = "CASHBOOK_DATA_DIR";
const REPORTS_DIR_ENV: &str = "CASHBOOK_REPORTS_DIR";

/// Where the ledger, its reports and the log file live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) data_dir: PathBuf,
    pub(crate) db_path: PathBuf,
    pub(crate) reports_dir: PathBuf,
    pub(crate) log_path: PathBuf,
}

impl Config {
    /// Resolve paths from the environment, falling back to the platform
    /// data directory, and make sure the directories exist.
    pub(crate) fn resolve() -> Result<Self> {
        let data_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => directories::ProjectDirs::from("com", "cashbook", "Cashbook")
                .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
                .data_dir()
                .to_path_buf(),
        };
        let reports_dir = std::env::var_os(REPORTS_DIR_ENV).map(PathBuf::from);
        let config = Self::with_dirs(&data_dir, reports_dir);
        config.create_dirs()?;
        Ok(config)
    }

    pub(crate) fn with_dirs(data_dir: &Path, reports_dir: Option<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            db_path: data_dir.join("cashbook.db"),
            reports_dir: reports_dir.unwrap_or_else(|| data_dir.join("reports")),
            log_path: data_dir.join("cashbook.log"),
        }
    }

    pub(crate) fn create_dirs(&self) -> Result<()> {
        for dir in [&self.data_dir, &self.reports_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }
}
