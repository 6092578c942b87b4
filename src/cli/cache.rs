//! Cache inspection commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use super::common::load_spec;
use crate::cache::{CacheBackend, CacheService, CacheTarget};
use crate::config::Settings;

#[derive(Args)]
pub struct CacheCommand {
    #[command(subcommand)]
    command: CacheSubcommands,
}

#[derive(Subcommand)]
enum CacheSubcommands {
    /// Show where a graph's render is cached and whether it exists
    Path {
        /// Graph file, or `-` for stdin
        input: PathBuf,

        /// Directory that a relative cache directory is resolved against
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

impl CacheCommand {
    pub async fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        match self.command {
            CacheSubcommands::Path {
                input,
                root,
            } => {
                let settings = Settings::load_with_optional(config_path).await?;
                let root = match root {
                    Some(root) => root,
                    None => std::env::current_dir().context("Failed to get current directory")?,
                };
                Self::show_path(&settings, &input, &root).await
            }
        }
    }

    async fn show_path(settings: &Settings, input: &Path, root: &Path) -> Result<()> {
        let spec = load_spec(input).await?;
        let cache = CacheService::new(settings.cache.clone(), &settings.file_prefix);

        if !cache.is_enabled() {
            println!("{}", "Caching is disabled in the configuration".yellow());
        }

        match cache.store_for(root).target(spec.fingerprint()) {
            CacheTarget::Memory(key) => {
                println!("memory:{key}");
                println!("{}", "In-memory entries last for a single session only".dimmed());
            }
            CacheTarget::File(path) => {
                let present = tokio::fs::try_exists(&path).await.unwrap_or(false);
                println!("{}", path.display());
                if present {
                    println!("{}", "cached".green());
                } else {
                    println!("{}", "not cached".yellow());
                }
            }
        }
        Ok(())
    }
}
