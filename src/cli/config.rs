//! User configuration commands.
//!
//! ```bash
//! plotmark config init          # write defaults to ~/.plotmark/config.toml
//! plotmark config init --force  # overwrite an existing file
//! plotmark config show          # print the effective configuration
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::config::Settings;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

impl ConfigCommand {
    pub async fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        let config_path = match config_path {
            Some(path) => path,
            None => Settings::resolve_path()?,
        };

        match self.command {
            Some(ConfigSubcommands::Init {
                force,
            }) => Self::init(force, config_path).await,
            Some(ConfigSubcommands::Show) | None => Self::show(config_path).await,
        }
    }

    async fn init(force: bool, config_path: PathBuf) -> Result<()> {
        if tokio::fs::try_exists(&config_path).await.unwrap_or(false) && !force {
            println!("❌ Config already exists at: {}", config_path.display());
            println!("   Use --force to overwrite");
            return Ok(());
        }

        let settings = Settings::default();
        settings.save_to(&config_path).await?;
        tracing::info!("Wrote default configuration to {}", config_path.display());

        println!("✅ Created config at: {}", config_path.display());
        println!("\n{}", "Configuration:".bold());
        println!("{}", toml::to_string_pretty(&settings).context("Failed to serialize config")?);
        Ok(())
    }

    async fn show(config_path: PathBuf) -> Result<()> {
        let exists = tokio::fs::try_exists(&config_path).await.unwrap_or(false);
        let settings = Settings::load_with_optional(Some(config_path.clone())).await?;

        if exists {
            println!("{} {}", "Config file:".bold(), config_path.display());
        } else {
            println!(
                "{} {} {}",
                "Config file:".bold(),
                config_path.display(),
                "(not found, using defaults)".dimmed()
            );
        }
        println!();
        println!("{}", toml::to_string_pretty(&settings).context("Failed to serialize config")?);
        Ok(())
    }
}
