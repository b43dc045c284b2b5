//! Labeled tables and their delimited-text serialization

use serde::{Deserialize, Serialize};
use std::fmt::Write as FmtWrite;

use crate::descriptor::Label;

/// Table cells share the label representation of descriptor rows
pub type Cell = Label;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub header: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Serialize header and rows in declared column order, one line per row
    pub fn to_delimited(&self, separator: char) -> String {
        let mut out = String::new();
        if !self.header.is_empty() {
            write_line(&mut out, self.header.iter().map(String::as_str), separator);
        }
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            write_line(&mut out, cells.iter().map(String::as_str), separator);
        }
        out
    }

    pub fn to_tsv(&self) -> String {
        self.to_delimited('\t')
    }
}

fn write_line<'a, I>(out: &mut String, fields: I, separator: char)
where
    I: Iterator<Item = &'a str>,
{
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(separator);
        }
        out.push_str(field);
    }
    // writing to a String cannot fail
    let _ = writeln!(out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tsv_preserves_column_order() {
        let mut table = Table::new(vec!["feature".into(), "count".into(), "ratio".into()]);
        table.push_row(vec![Cell::from("node"), Cell::Int(12), Cell::Float(0.5)]);
        table.push_row(vec![Cell::from("edge"), Cell::Int(3), Cell::Float(2.0)]);

        assert_eq!(
            table.to_tsv(),
            "feature\tcount\tratio\nnode\t12\t0.5\nedge\t3\t2\n"
        );
    }

    #[test]
    fn test_custom_separator_and_empty_table() {
        let table = Table::new(vec!["a".into(), "b".into()]);
        assert_eq!(table.to_delimited(','), "a,b\n");
        assert_eq!(Table::default().to_tsv(), "");
    }
}
