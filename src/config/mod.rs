#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_distinct_paths, validate_path, validate_positive_number, Validate,
};
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

pub const DEFAULT_CSV_PATH: &str = "/tmp/users.csv";
pub const DEFAULT_DB_PATH: &str = "/tmp/users.db";
pub const DEFAULT_NUM_RECORDS: usize = 20;

/// Resolved settings for one pipeline run.
///
/// Built once at the entry point and handed by reference to every stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtlConfig {
    pub csv_path: PathBuf,
    pub db_path: PathBuf,
    pub num_records: usize,
    /// `false` when the run reuses an existing CSV file.
    pub generate: bool,
    pub monitor: bool,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            num_records: DEFAULT_NUM_RECORDS,
            generate: true,
            monitor: false,
        }
    }
}

impl EtlConfig {
    pub fn new(
        csv_path: impl Into<PathBuf>,
        db_path: impl Into<PathBuf>,
        num_records: usize,
    ) -> Self {
        Self {
            csv_path: csv_path.into(),
            db_path: db_path.into(),
            num_records,
            generate: true,
            monitor: false,
        }
    }

    pub fn from_provider<C: ConfigProvider>(provider: &C) -> Self {
        Self {
            csv_path: provider.csv_path().to_path_buf(),
            db_path: provider.db_path().to_path_buf(),
            num_records: provider.num_records(),
            generate: true,
            monitor: provider.monitoring_enabled(),
        }
    }
}

impl ConfigProvider for EtlConfig {
    fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn num_records(&self) -> usize {
        self.num_records
    }

    fn monitoring_enabled(&self) -> bool {
        self.monitor
    }
}

impl Validate for EtlConfig {
    fn validate(&self) -> Result<()> {
        validate_path("csv_path", &self.csv_path)?;
        validate_path("db_path", &self.db_path)?;
        if self.generate {
            validate_positive_number("num_records", self.num_records, 1)?;
        }
        validate_distinct_paths(&self.csv_path, &self.db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_run() {
        let config = EtlConfig::default();
        assert_eq!(config.csv_path, PathBuf::from("/tmp/users.csv"));
        assert_eq!(config.db_path, PathBuf::from("/tmp/users.db"));
        assert_eq!(config.num_records, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let same = EtlConfig::new("/tmp/x", "/tmp/x", 5);
        assert!(same.validate().is_err());

        let empty = EtlConfig::new("/tmp/a.csv", "/tmp/a.db", 0);
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_record_count_ignored_when_not_generating() {
        let mut config = EtlConfig::new("/tmp/a.csv", "/tmp/a.db", 0);
        config.generate = false;
        assert!(config.validate().is_ok());
    }
}
