//! Plotmark CLI entry point
//!
//! Parses arguments, runs the selected command and prints failures with
//! suggestions. Commands:
//! - `check` - Validate a graph block
//! - `fingerprint` - Print the fingerprint of a graph block
//! - `commands` - Print the renderer request for a graph block as JSON
//! - `cache` - Inspect cache locations
//! - `config` - Manage the user configuration

use anyhow::Result;
use clap::Parser;
use plotmark::cli;
use plotmark::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
