//! Line plots over two numeric axes

use serde_json::{json, Value};

use super::{base_document, Built, CompileOptions};
use crate::descriptor::LinePlot;
use crate::scale::ScaleTarget;

pub(crate) fn build(plot: &LinePlot, options: &CompileOptions) -> Built {
    let values: Vec<Value> = plot
        .data
        .iter()
        .map(|row| json!({ "x": row.x, "y": row.y }))
        .collect();

    let mut doc = base_document(&plot.name, options);
    doc.insert("data".to_string(), json!({ "values": values }));
    doc.insert("mark".to_string(), json!({ "type": "line", "point": true, "tooltip": true }));
    doc.insert(
        "encoding".to_string(),
        json!({
            "x": { "field": "x", "type": "quantitative", "title": plot.x_label },
            "y": { "field": "y", "type": "quantitative", "title": plot.y_label }
        }),
    );

    let mut targets = Vec::new();
    if plot.log_x {
        targets.push(ScaleTarget::position_axis("", "x", "x"));
    }
    if plot.log_y {
        targets.push(ScaleTarget::position_axis("", "y", "y"));
    }

    Built {
        doc: Value::Object(doc),
        targets,
    }
}
