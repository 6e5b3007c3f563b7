//! Patch Dataset - inspect directories of pre-extracted slide patches.
//!
//! This binary wraps the library's scan and check reports.

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use patch_dataset::{
    config::{CheckConfig, Cli, Command, OutputFormat, ScanConfig},
    patch::PatchDataset,
    report::{check_dataset, scan_dataset, to_json},
    transform::{TileTensor, ToTensor, TransformRegistry},
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Scan(config) => run_scan(config),
        Command::Check(config) => run_check(config),
    }
}

// =============================================================================
// Scan Command
// =============================================================================

fn run_scan(config: ScanConfig) -> ExitCode {
    let dataset = match PatchDataset::<TileTensor>::without_transforms(&config.dir) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let report = scan_dataset(&dataset);
    if !emit(&report, config.format) {
        return ExitCode::FAILURE;
    }

    if report.malformed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

// =============================================================================
// Check Command
// =============================================================================

fn run_check(config: CheckConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let transforms = TransformRegistry::new().with("tensor", ToTensor);
    let dataset: PatchDataset<TileTensor> = match PatchDataset::new(&config.dir, transforms) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to start worker pool: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        dir = %config.dir.display(),
        patches = dataset.len(),
        jobs = config.jobs,
        "Checking patches"
    );

    let report = pool.install(|| check_dataset(&dataset));
    debug!(ok = report.ok, failed = report.failures.len(), "Check finished");

    if !emit(&report, config.format) {
        return ExitCode::FAILURE;
    }

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Print a report to stdout in the requested format.
fn emit<R>(report: &R, format: OutputFormat) -> bool
where
    R: serde::Serialize + std::fmt::Display,
{
    match format {
        OutputFormat::Text => {
            print!("{}", report);
            true
        }
        OutputFormat::Json => match to_json(report) {
            Ok(json) => {
                println!("{}", json);
                true
            }
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                false
            }
        },
    }
}

/// Initialize the tracing/logging subsystem.
///
/// Logs go to stderr so reports on stdout stay machine-readable.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "patch_dataset=debug"
    } else {
        "patch_dataset=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
