//! Commands that compile a graph block and report on it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use super::common::load_spec;
use crate::dsl::Spec;
use crate::render::PlotRequest;

/// Validate a graph block.
#[derive(Args)]
pub struct CheckCommand {
    /// Graph file, or `-` for stdin
    input: PathBuf,

    /// Print the compiled specification as JSON
    #[arg(long)]
    json: bool,
}

impl CheckCommand {
    pub async fn execute(self) -> Result<()> {
        let spec = load_spec(&self.input).await?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&spec).context("Failed to serialize specification")?
            );
            return Ok(());
        }

        print!("{}", describe(&spec));
        Ok(())
    }
}

fn describe(spec: &Spec) -> String {
    let fields = spec.fields();
    let mut out = format!(
        "{} {} equation(s), {}x{} over x∈[{}, {}] y∈[{}, {}]\n",
        "✓".green(),
        spec.equations().len(),
        fields.width(),
        fields.height(),
        fields.left(),
        fields.right(),
        fields.bottom(),
        fields.top(),
    );
    for equation in spec.equations() {
        out.push_str(&format!("  {equation}\n"));
    }
    out.push_str(&format!("{} {}\n", "fingerprint:".bold(), spec.fingerprint()));
    out
}

/// Print the fingerprint of a graph block.
#[derive(Args)]
pub struct FingerprintCommand {
    /// Graph file, or `-` for stdin
    input: PathBuf,
}

impl FingerprintCommand {
    pub async fn execute(self) -> Result<()> {
        let spec = load_spec(&self.input).await?;
        println!("{}", spec.fingerprint());
        Ok(())
    }
}

/// Print the renderer request for a graph block.
#[derive(Args)]
pub struct RequestCommand {
    /// Graph file, or `-` for stdin
    input: PathBuf,
}

impl RequestCommand {
    pub async fn execute(self) -> Result<()> {
        let spec = load_spec(&self.input).await?;
        let request = PlotRequest::from(&spec);
        println!(
            "{}",
            serde_json::to_string_pretty(&request).context("Failed to serialize plot request")?
        );
        Ok(())
    }
}
