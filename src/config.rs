//! Command-line configuration for the `patch-dataset` binary.
//!
//! # Commands
//!
//! - `scan <DIR>` - list the patches of a directory and parse their names
//! - `check <DIR>` - fully retrieve every patch and report failures
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use patch_dataset::config::{Cli, Command};
//!
//! let cli = Cli::parse();
//! match cli.command {
//!     Command::Scan(config) => println!("scanning {}", config.dir.display()),
//!     Command::Check(config) => println!("checking with {} jobs", config.jobs),
//! }
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// =============================================================================
// Default Values
// =============================================================================

/// Default number of worker threads for `check`.
pub const DEFAULT_JOBS: usize = 4;

/// Upper bound on worker threads for `check`.
pub const MAX_JOBS: usize = 256;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Patch Dataset - inspect directories of pre-extracted slide patches.
///
/// Patches are expected to be named `<x>_<y>.jpg`, where `(x, y)` is the
/// pixel origin of the patch on the slide.
#[derive(Parser, Debug, Clone)]
#[command(name = "patch-dataset")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List patches and parse their coordinates without decoding.
    Scan(ScanConfig),

    /// Decode every patch and report those that fail.
    Check(CheckConfig),
}

/// Output format for reports.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,

    /// Pretty-printed JSON
    Json,
}

/// Arguments for `scan`.
#[derive(Args, Debug, Clone)]
pub struct ScanConfig {
    /// Directory holding `<x>_<y>.jpg` patches.
    pub dir: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for `check`.
#[derive(Args, Debug, Clone)]
pub struct CheckConfig {
    /// Directory holding `<x>_<y>.jpg` patches.
    pub dir: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Number of worker threads decoding patches.
    #[arg(short, long, default_value_t = DEFAULT_JOBS)]
    pub jobs: usize,
}

impl CheckConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.jobs == 0 {
            return Err("jobs must be greater than 0".to_string());
        }
        if self.jobs > MAX_JOBS {
            return Err(format!("jobs must be at most {}", MAX_JOBS));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
