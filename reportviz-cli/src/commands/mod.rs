//! Command implementations for the reportviz CLI

pub mod compile;
pub mod nodes;
pub mod table;

use anyhow::{Context, Result};
use reportviz_core::{LoadError, ReportData};
use std::path::Path;

use crate::error::{CliError, CliResult};

/// Read and parse a report data file
pub fn load_report(path: &Path) -> CliResult<ReportData> {
    if !path.exists() {
        return Err(CliError::file_not_found(path.to_path_buf()));
    }
    ReportData::load(path).map_err(|e| match e {
        LoadError::Io { source, .. } => CliError::from(source),
        LoadError::Parse(e) => CliError::invalid_report(path.display().to_string(), e.to_string()),
    })
}

/// Write `content` to `out`, or to stdout when no file is given
pub fn write_output(out: Option<&Path>, content: &str) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            log::info!("Output written to: {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
