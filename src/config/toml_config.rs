use crate::config::{DEFAULT_CSV_PATH, DEFAULT_DB_PATH, DEFAULT_NUM_RECORDS};
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_distinct_paths, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub destination: DestinationConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_num_records")]
    pub num_records: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_records: DEFAULT_NUM_RECORDS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn default_csv_path() -> PathBuf {
    PathBuf::from(DEFAULT_CSV_PATH)
}

fn default_db_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_PATH)
}

fn default_num_records() -> usize {
    DEFAULT_NUM_RECORDS
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| EtlError::FileAccessError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of the environment variable; unknown
    /// variables are left untouched.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }
}

impl ConfigProvider for TomlConfig {
    fn csv_path(&self) -> &Path {
        &self.source.csv_path
    }

    fn db_path(&self) -> &Path {
        &self.destination.db_path
    }

    fn num_records(&self) -> usize {
        self.generator.num_records
    }

    fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

// A `${VAR}` left after substitution means the variable was not set.
fn check_resolved(field_name: &str, path: &Path) -> Result<()> {
    if path.to_string_lossy().contains("${") {
        return Err(EtlError::MissingConfigError {
            field: format!(
                "{} (unset environment variable in {})",
                field_name,
                path.display()
            ),
        });
    }
    validate_path(field_name, path)
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        check_resolved("source.csv_path", &self.source.csv_path)?;
        check_resolved("destination.db_path", &self.destination.db_path)?;
        validate_distinct_paths(&self.source.csv_path, &self.destination.db_path)
    }
}
