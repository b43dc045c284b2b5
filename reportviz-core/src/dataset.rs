//! Report data loading
//!
//! A report file holds every descriptor under `datasets`, keyed by a name that
//! fixes rendering order, plus any downloadable tables under `tables`. Entries are
//! kept as raw JSON until [`ReportData::descriptors`] parses them one by one, so a
//! single malformed entry never hides the others.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::descriptor::{HexbinPlot, PlotDescriptor};
use crate::error::{DescriptorError, LoadError};
use crate::table::Table;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    #[serde(default)]
    pub datasets: BTreeMap<String, Value>,
    #[serde(default)]
    pub tables: BTreeMap<String, Table>,
}

impl ReportData {
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let data = Self::from_json_str(&text)?;
        log::info!(
            "Loaded {} datasets and {} tables from {}",
            data.datasets.len(),
            data.tables.len(),
            path.display()
        );
        Ok(data)
    }

    /// Parse every dataset entry in name order
    pub fn descriptors(
        &self,
    ) -> impl Iterator<Item = (&str, Result<PlotDescriptor, DescriptorError>)> + '_ {
        self.datasets
            .iter()
            .map(|(name, raw)| (name.as_str(), PlotDescriptor::from_value(raw.clone())))
    }

    /// First successfully parsed descriptor with the given id
    pub fn find(&self, id: &str) -> Option<PlotDescriptor> {
        self.descriptors()
            .filter_map(|(_, parsed)| parsed.ok())
            .find(|desc| desc.id() == id)
    }

    pub fn find_hexbin(&self, id: &str) -> Option<HexbinPlot> {
        match self.find(id)? {
            PlotDescriptor::Hexbin(plot) => Some(plot),
            _ => None,
        }
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PlotKind;
    use std::io::Write;

    const REPORT: &str = r#"{
        "datasets": {
            "b_hexbin": {"type": "Hexbin", "id": "hx", "bins": [], "bin_index": {"3": [10]}},
            "a_bar": {"type": "Bar", "id": 1, "data": []},
            "c_broken": {"type": "Line", "id": "l"},
            "d_unknown": {"type": "Sankey", "id": "s"}
        },
        "tables": {
            "stats": {"header": ["k", "v"], "rows": [["nodes", 12]]}
        }
    }"#;

    #[test]
    fn test_descriptors_isolate_failures() {
        let data = ReportData::from_json_str(REPORT).unwrap();
        let parsed: Vec<_> = data.descriptors().collect();
        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed[0].0, "a_bar");
        assert_eq!(parsed[0].1.as_ref().map(|d| d.kind()).ok(), Some(PlotKind::Bar));
        assert!(parsed[2].1.is_err());
        assert!(parsed[3].1.as_ref().err().map(|e| e.is_unsupported()).unwrap_or(false));
    }

    #[test]
    fn test_lookup_helpers() {
        let data = ReportData::from_json_str(REPORT).unwrap();
        assert_eq!(data.find("1").map(|d| d.kind()), Some(PlotKind::Bar));
        assert!(data.find_hexbin("hx").is_some());
        assert!(data.find_hexbin("1").is_none());
        assert_eq!(data.table("stats").map(|t| t.rows.len()), Some(1));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(REPORT.as_bytes()).unwrap();
        let data = ReportData::load(file.path()).unwrap();
        assert_eq!(data.datasets.len(), 4);

        let err = ReportData::load("/nonexistent/report.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
