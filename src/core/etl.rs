use crate::adapters::{RecordGenerator, StoreInitializer};
use crate::config::EtlConfig;
use crate::core::extract::Extractor;
use crate::core::load::{LoadOutcome, Loader};
use crate::core::transform::TransformExt;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use chrono::{DateTime, Utc};

#[derive(Debug)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    /// `None` when the run reused an existing CSV file.
    pub records_generated: Option<usize>,
    pub outcome: LoadOutcome,
}

/// Drives generate → init → extract → transform → load.
pub struct EtlEngine<'a> {
    config: &'a EtlConfig,
    monitor: SystemMonitor,
}

impl<'a> EtlEngine<'a> {
    pub fn new(config: &'a EtlConfig) -> Self {
        Self::new_with_monitoring(config, config.monitor)
    }

    pub fn new_with_monitoring(config: &'a EtlConfig, monitor_enabled: bool) -> Self {
        Self {
            config,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Full run with freshly generated data.
    pub fn run(&mut self) -> Result<RunReport> {
        self.run_with_generator(RecordGenerator::new())
    }

    pub fn run_with_generator(&mut self, generator: RecordGenerator) -> Result<RunReport> {
        let started_at = Utc::now();
        tracing::info!("Starting ETL run");

        let generated = generator.write_csv(&self.config.csv_path, self.config.num_records)?;
        self.monitor.log_stats("generate");

        self.execute(started_at, Some(generated))
    }

    /// Runs init → extract → transform → load against the CSV file already on disk.
    pub fn run_pipeline(&mut self) -> Result<RunReport> {
        let started_at = Utc::now();
        tracing::info!("Starting ETL run on existing {}", self.config.csv_path.display());
        self.execute(started_at, None)
    }

    fn execute(
        &mut self,
        started_at: DateTime<Utc>,
        records_generated: Option<usize>,
    ) -> Result<RunReport> {
        StoreInitializer::reset(&self.config.db_path)?;
        self.monitor.log_stats("init");

        let rows = Extractor::new(self.config).extract()?.transform_users();
        let outcome = Loader::new(self.config).load(rows)?;
        self.monitor.log_stats("load");
        self.monitor.log_final_stats();

        Ok(RunReport {
            started_at,
            records_generated,
            outcome,
        })
    }
}
