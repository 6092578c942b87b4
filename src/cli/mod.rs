//! Command-line interface for plotmark
//!
//! Every subcommand works on one graph block, read from a file or from stdin
//! when the path is `-`.
//!
//! # Available Commands
//!
//! - `check` - Validate a graph block and report its equations and fingerprint
//! - `fingerprint` - Print only the fingerprint
//! - `commands` - Print the request the renderer would receive, as JSON
//! - `cache` - Show where a graph is cached and whether the entry exists
//! - `config` - Create or show the user configuration
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - Debug logging
//! - `--quiet` / `-q` - No logging
//! - `--config` / `-c` - Use an alternate config file
//!
//! `RUST_LOG` takes precedence over both logging flags.
//!
//! # Examples
//!
//! ```bash
//! plotmark check graph.txt
//! echo 'y=x|red' | plotmark fingerprint -
//! plotmark cache path graph.txt --root ~/notes
//! plotmark --config ./plotmark.toml config show
//! ```

mod cache;
pub mod common;
mod config;
mod inspect;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runtime configuration derived from global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive; `None` disables logging unless `RUST_LOG` is set
    pub log_level: Option<String>,

    /// Config file given with `--config`
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber. Later calls are no-ops.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if let Some(level) = &self.log_level {
            EnvFilter::new(level)
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

#[derive(Parser)]
#[command(
    name = "plotmark",
    about = "Compile graph blocks, fingerprint them and locate their cached renders",
    version,
    author,
    long_about = "Plotmark compiles a small plotting DSL into a canonical graph specification. \
                  Specifications are fingerprinted and rendered images are cached by fingerprint."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all logging
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to an alternate config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a graph block
    Check(inspect::CheckCommand),

    /// Print the fingerprint of a graph block
    Fingerprint(inspect::FingerprintCommand),

    /// Print the renderer request for a graph block as JSON
    #[command(name = "commands")]
    Request(inspect::RequestCommand),

    /// Inspect cache locations
    Cache(cache::CacheCommand),

    /// Manage the user configuration
    Config(config::ConfigCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Run the command without touching the global subscriber.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Check(cmd) => cmd.execute().await,
            Commands::Fingerprint(cmd) => cmd.execute().await,
            Commands::Request(cmd) => cmd.execute().await,
            Commands::Cache(cmd) => cmd.execute(config.config_path).await,
            Commands::Config(cmd) => cmd.execute(config.config_path).await,
        }
    }
}
