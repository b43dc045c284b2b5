//! Nodes command implementation - export the data points behind hexbin bins

use anyhow::Result;
use reportviz_render::SelectionQuery;
use std::path::PathBuf;

use super::{load_report, write_output};
use crate::config::Config;
use crate::error::CliError;

pub fn execute(
    config: &Config,
    input: PathBuf,
    plot: String,
    bins: Vec<u32>,
    out: Option<PathBuf>,
) -> Result<()> {
    if bins.iter().any(|&bin| bin == 0) {
        return Err(CliError::invalid_argument("bin ids are 1-based").into());
    }

    let data = load_report(&input)?;
    let hexbin = data
        .find_hexbin(&plot)
        .ok_or_else(|| CliError::not_in_report("plot", plot.as_str()))?;

    let mut selected: Vec<u32> = Vec::with_capacity(bins.len());
    for bin in bins {
        if !selected.contains(&bin) {
            selected.push(bin);
        }
    }

    let rows = SelectionQuery::new(config.bins.overflow_cap).resolve_bins(&hexbin, &selected);
    log::info!("Selected {} bins of '{}': {} rows", selected.len(), plot, rows.len());
    write_output(out.as_deref(), &SelectionQuery::to_tsv(&rows))
}
