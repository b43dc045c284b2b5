//! Chromosomal heat strips with a selectable metric

use serde_json::{json, Map, Value};

use super::{base_document, expr_string, Built, CompileOptions};
use crate::descriptor::ChromosomalPlot;

const METRIC_PARAM: &str = "metric_select";

/// Record column of the `index`-th metric, disjoint from the interval and fold fields
fn metric_column(index: usize) -> String {
    format!("m{}", index)
}

pub(crate) fn build(plot: &ChromosomalPlot, options: &CompileOptions) -> Built {
    let metrics = plot.metrics();
    let columns: Vec<String> = (0..metrics.len()).map(metric_column).collect();

    let values: Vec<Value> = plot
        .data
        .iter()
        .map(|row| {
            let mut record = Map::new();
            record.insert("x".to_string(), json!(row.start));
            record.insert("x2".to_string(), json!(row.end));
            record.insert(metric_column(0), json!(row.value));
            if metrics.len() > 1 {
                record.insert(metric_column(1), json!(row.second_value));
            }
            Value::Object(record)
        })
        .collect();

    let primary_scheme = if plot.is_diverging { "blueorange" } else { "viridis" };
    let scheme_expr = format!(
        "{} == {} ? '{}' : 'viridis'",
        METRIC_PARAM,
        expr_string(&metric_column(0)),
        primary_scheme
    );

    let title = if plot.name.is_empty() {
        plot.sequence.clone()
    } else {
        format!("{} ({})", plot.name, plot.sequence)
    };

    let mut doc = base_document(&title, options);
    doc.insert("data".to_string(), json!({ "values": values }));
    doc.insert(
        "params".to_string(),
        json!([{
            "name": METRIC_PARAM,
            "value": metric_column(0),
            "bind": { "input": "select", "options": columns, "labels": metrics, "name": "Metric " }
        }]),
    );
    doc.insert(
        "transform".to_string(),
        json!([
            { "fold": columns, "as": ["metric", "metric_value"] },
            { "filter": format!("datum.metric == {}", METRIC_PARAM) }
        ]),
    );
    doc.insert("mark".to_string(), json!({ "type": "rect", "tooltip": true }));
    doc.insert(
        "encoding".to_string(),
        json!({
            "x": { "field": "x", "type": "quantitative", "title": plot.sequence },
            "x2": { "field": "x2" },
            "color": {
                "field": "metric_value",
                "type": "quantitative",
                "title": null,
                "scale": { "scheme": { "expr": scheme_expr } }
            }
        }),
    );

    Built::fixed(doc)
}
