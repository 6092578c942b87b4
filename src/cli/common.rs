//! Helpers shared by CLI commands.

use std::path::Path;

use anyhow::Result;
use tokio::io::AsyncReadExt;

use crate::core::PlotmarkError;
use crate::dsl::{Spec, parse};

/// Path value meaning "read from stdin".
pub const STDIN_PATH: &str = "-";

/// Read graph source from `input`, or from stdin when it is `-`.
pub async fn read_source(input: &Path) -> Result<String> {
    if input == Path::new(STDIN_PATH) {
        let mut source = String::new();
        tokio::io::stdin().read_to_string(&mut source).await.map_err(|e| {
            PlotmarkError::InputUnreadable {
                path: "<stdin>".to_string(),
                reason: e.to_string(),
            }
        })?;
        return Ok(source);
    }

    tokio::fs::read_to_string(input).await.map_err(|e| {
        PlotmarkError::InputUnreadable {
            path: input.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Read and compile a graph block.
pub async fn load_spec(input: &Path) -> Result<Spec> {
    let source = read_source(input).await?;
    let spec = parse(&source)?;
    tracing::debug!(
        fingerprint = spec.fingerprint(),
        equations = spec.equations().len(),
        "compiled {}",
        input.display()
    );
    Ok(spec)
}
