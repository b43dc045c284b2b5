//! Single-series bar histograms

use serde_json::{json, Value};

use super::{base_document, Built, CompileOptions};
use crate::descriptor::BarPlot;
use crate::scale::ScaleTarget;

pub(crate) fn build(plot: &BarPlot, options: &CompileOptions) -> Built {
    let as_area = plot.ordinal && plot.data.len() >= options.bar_area_threshold;

    let values: Vec<Value> = plot
        .data
        .iter()
        .map(|row| json!({ "label": row.label, "value": row.value }))
        .collect();

    let x = if as_area {
        json!({ "field": "label", "type": "quantitative", "title": plot.x_label })
    } else {
        let x_type = if plot.ordinal { "ordinal" } else { "nominal" };
        json!({
            "field": "label",
            "type": x_type,
            "sort": null,
            "title": plot.x_label
        })
    };

    let mut doc = base_document(&plot.name, options);
    doc.insert("data".to_string(), json!({ "values": values }));
    doc.insert(
        "mark".to_string(),
        if as_area {
            json!({ "type": "area", "interpolate": "step-after", "tooltip": true })
        } else {
            json!({ "type": "bar", "tooltip": true })
        },
    );
    doc.insert(
        "encoding".to_string(),
        json!({
            "x": x,
            "y": { "field": "value", "type": "quantitative", "title": plot.y_label }
        }),
    );

    let targets = if plot.log_toggle {
        vec![ScaleTarget::value_axis("", "y", "value").anchored()]
    } else {
        Vec::new()
    };

    Built {
        doc: Value::Object(doc),
        targets,
    }
}
