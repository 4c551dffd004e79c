use crate::config::{EtlConfig, TomlConfig};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "user-etl")]
#[command(about = "Generate fake users, then stream them from CSV into SQLite")]
pub struct CliConfig {
    /// Intermediate CSV file written by the generator and read by extract
    #[arg(long)]
    pub csv_path: Option<PathBuf>,

    /// SQLite database recreated on every run
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Number of records to generate
    #[arg(long)]
    pub num_records: Option<usize>,

    /// TOML configuration file providing base values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Read an existing CSV file instead of generating a new one
    #[arg(long)]
    pub skip_generate: bool,

    /// Exit with a non-zero status when the load is abandoned
    #[arg(long)]
    pub strict: bool,

    #[arg(long, help = "Log process CPU and memory after each phase")]
    pub monitor: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Merge the optional TOML file with explicit flags; flags win.
    pub fn resolve(&self) -> Result<EtlConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file_config = TomlConfig::from_file(path)?;
                file_config.validate()?;
                EtlConfig::from_provider(&file_config)
            }
            None => EtlConfig::default(),
        };

        if let Some(csv_path) = &self.csv_path {
            config.csv_path = csv_path.clone();
        }
        if let Some(db_path) = &self.db_path {
            config.db_path = db_path.clone();
        }
        if let Some(num_records) = self.num_records {
            config.num_records = num_records;
        }
        if self.monitor {
            config.monitor = true;
        }
        config.generate = !self.skip_generate;

        Ok(config)
    }
}
