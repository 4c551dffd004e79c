use clap::Parser;
use user_etl::utils::error::{EtlError, ErrorSeverity};
use user_etl::utils::{logger, validation::Validate};
use user_etl::{CliConfig, EtlEngine, LoadOutcome};

const EXIT_LOAD_ABANDONED: i32 = 4;

fn exit_code(e: &EtlError) -> i32 {
    match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: &EtlError) -> ! {
    tracing::error!(
        "ETL run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e));
}

fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose, cli.json_logs);
    tracing::info!("Starting user-etl");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        fail(&e);
    }

    if config.monitor {
        tracing::info!("System monitoring enabled");
    }

    let mut engine = EtlEngine::new(&config);
    let result = if config.generate {
        engine.run()
    } else {
        engine.run_pipeline()
    };

    let report = match result {
        Ok(report) => report,
        Err(e) => fail(&e),
    };

    match report.outcome {
        LoadOutcome::Committed { rows } => {
            tracing::info!(
                "ETL run completed: {} rows loaded into {} (started {})",
                rows,
                config.db_path.display(),
                report.started_at
            );
            println!("✅ {} rows loaded into {}", rows, config.db_path.display());
        }
        LoadOutcome::Abandoned { attempted, error } => {
            tracing::warn!(
                "ETL run degraded: load abandoned after {} rows, nothing committed",
                attempted
            );
            eprintln!("⚠️ Load abandoned: {}", error.user_friendly_message());
            if cli.strict {
                std::process::exit(EXIT_LOAD_ABANDONED);
            }
        }
    }
}
