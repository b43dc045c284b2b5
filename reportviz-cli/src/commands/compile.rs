//! Compile command implementation - write one Vega-Lite file per chart descriptor

use anyhow::{Context, Result};
use reportviz_core::{compile, ScaleMode};
use std::path::PathBuf;

use super::load_report;
use crate::config::Config;

/// Returns the number of specification files written
pub fn execute(config: &Config, input: PathBuf, out_dir: PathBuf, log_scale: bool) -> Result<usize> {
    log::info!("Compiling report: {}", input.display());
    let data = load_report(&input)?;

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let mode = if log_scale { ScaleMode::Log } else { ScaleMode::Linear };
    let mut written = 0;
    let mut skipped = 0;

    for (name, parsed) in data.descriptors() {
        let descriptor = match parsed {
            Ok(descriptor) => descriptor,
            Err(e) => {
                log::warn!("Skipping dataset '{}': {}", name, e);
                skipped += 1;
                continue;
            }
        };
        if !descriptor.kind().is_chart() {
            log::debug!("Dataset '{}' is a {}, nothing to compile", name, descriptor.kind());
            continue;
        }

        let doc = match compile(&descriptor, mode, &config.compile) {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("Skipping dataset '{}': {}", name, e);
                skipped += 1;
                continue;
            }
        };

        let path = out_dir.join(format!("{}.vl.json", descriptor.id()));
        let text = doc
            .to_pretty_string()
            .context("Failed to serialize specification")?;
        std::fs::write(&path, text)
            .with_context(|| format!("Failed to write specification: {}", path.display()))?;
        log::debug!("Wrote {}", path.display());
        written += 1;
    }

    log::info!(
        "Wrote {} specifications ({} mode) to {}, skipped {}",
        written,
        mode,
        out_dir.display(),
        skipped
    );
    Ok(written)
}
