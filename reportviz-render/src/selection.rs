//! Hexbin selection queries
//!
//! Turns the engine's point-selection store back into the data points behind the
//! selected hexagons.

use reportviz_core::bins::{overflow_label, BinContents};
use reportviz_core::descriptor::HexbinPlot;
use reportviz_core::DEFAULT_OVERFLOW_CAP;
use serde_json::Value;
use std::fmt;

/// File name of the node-list export
pub const NODE_LIST_FILE: &str = "hexbin_nodes_table.tsv";

/// Key of the engine-assigned mark id in selection tuples
const MARK_ID_FIELD: &str = "_vgsid_";

/// One data point of the selection, or the placeholder of an overflowed bin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeItem {
    Id(i64),
    Overflowed { cap: usize },
}

impl fmt::Display for NodeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeItem::Id(id) => write!(f, "{}", id),
            NodeItem::Overflowed { cap } => f.write_str(&overflow_label(*cap)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRow {
    pub item: NodeItem,
    pub bin: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionQuery {
    overflow_cap: usize,
}

impl Default for SelectionQuery {
    fn default() -> Self {
        Self::new(DEFAULT_OVERFLOW_CAP)
    }
}

impl SelectionQuery {
    /// `overflow_cap` is the cap the bin index was built with
    pub fn new(overflow_cap: usize) -> Self {
        Self { overflow_cap }
    }

    /// True iff the selection signal holds at least one mark
    pub fn has_selection(signal: Option<&Value>) -> bool {
        signal.map(|s| !Self::selected_marks(s).is_empty()).unwrap_or(false)
    }

    /// Mark ids held by a point-selection store, in selection order
    pub fn selected_marks(signal: &Value) -> Vec<u64> {
        let mut marks = Vec::new();
        collect_marks(signal, &mut marks);
        marks
    }

    /// Rows for every data point behind the selected marks
    pub fn resolve(&self, plot: &HexbinPlot, marks: &[u64]) -> Vec<NodeRow> {
        let mut bins: Vec<u32> = Vec::new();
        for &mark in marks {
            match plot.bin_for_mark(mark) {
                Some(bin) if !bins.contains(&bin) => bins.push(bin),
                Some(_) => {}
                None => log::debug!("mark {} is not drawn by hexbin '{}'", mark, plot.id),
            }
        }
        self.resolve_bins(plot, &bins)
    }

    /// Rows for every data point in `bins`, in the given bin order
    pub fn resolve_bins(&self, plot: &HexbinPlot, bins: &[u32]) -> Vec<NodeRow> {
        let mut rows = Vec::new();
        for &bin in bins {
            match plot.bin_index.get(bin) {
                Some(BinContents::Items(ids)) => {
                    rows.extend(ids.iter().map(|&id| NodeRow { item: NodeItem::Id(id), bin }))
                }
                Some(BinContents::Overflowed) => rows.push(NodeRow {
                    item: NodeItem::Overflowed { cap: self.overflow_cap },
                    bin,
                }),
                None => log::debug!("bin {} missing from the index of '{}'", bin, plot.id),
            }
        }
        rows
    }

    /// Tab-separated `item\tbin` lines without a header
    pub fn to_tsv(rows: &[NodeRow]) -> String {
        rows.iter()
            .map(|row| format!("{}\t{}\n", row.item, row.bin))
            .collect()
    }
}

fn collect_marks(value: &Value, marks: &mut Vec<u64>) {
    match value {
        Value::Number(n) => {
            if let Some(mark) = n.as_u64() {
                marks.push(mark);
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_marks(item, marks)),
        Value::Object(map) => {
            if let Some(ids) = map.get(MARK_ID_FIELD) {
                collect_marks(ids, marks);
            } else if let Some(point) = map.get("vlPoint") {
                collect_marks(point, marks);
            } else if let Some(tuples) = map.get("or") {
                collect_marks(tuples, marks);
            }
        }
        _ => {}
    }
}
