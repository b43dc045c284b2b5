//! Table command implementation - export a named report table as TSV

use anyhow::Result;
use std::path::PathBuf;

use super::{load_report, write_output};
use crate::error::CliError;

pub fn execute(input: PathBuf, name: String, out: Option<PathBuf>) -> Result<()> {
    let data = load_report(&input)?;
    let table = data
        .table(&name)
        .ok_or_else(|| CliError::not_in_report("table", name.as_str()))?;

    log::info!("Exporting table '{}' ({} rows)", name, table.rows.len());
    write_output(out.as_deref(), &table.to_tsv())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_export() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("report.json");
        std::fs::write(
            &input,
            r#"{"tables": {"paths": {"header": ["path", "length"], "rows": [["p1", 120], ["p2", 7.5]]}}}"#,
        )?;
        let out = dir.path().join("paths.tsv");

        execute(input, "paths".into(), Some(out.clone()))?;
        assert_eq!(std::fs::read_to_string(&out)?, "path\tlength\np1\t120\np2\t7.5\n");
        Ok(())
    }
}
