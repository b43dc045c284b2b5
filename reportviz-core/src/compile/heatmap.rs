//! Categorical heatmaps

use serde_json::{json, Value};

use super::{base_document, Built, CompileOptions};
use crate::descriptor::HeatmapPlot;

pub(crate) fn build(plot: &HeatmapPlot, options: &CompileOptions) -> Built {
    let values: Vec<Value> = plot
        .data
        .iter()
        .map(|cell| json!({ "x": cell.x, "y": cell.y, "value": cell.value }))
        .collect();

    let mut doc = base_document(&plot.name, options);
    doc.insert("data".to_string(), json!({ "values": values }));
    doc.insert("mark".to_string(), json!({ "type": "rect", "tooltip": true }));
    doc.insert(
        "encoding".to_string(),
        json!({
            "x": { "field": "x", "type": "nominal", "sort": null, "title": plot.x_label },
            "y": { "field": "y", "type": "nominal", "sort": null, "title": plot.y_label },
            "color": { "field": "value", "type": "quantitative", "title": null }
        }),
    );
    doc.insert("config".to_string(), json!({ "axis": { "grid": false } }));

    Built::fixed(doc)
}
