//! Multi-series growth charts with an optional fitted reference curve

use serde_json::{json, Map, Value};

use super::{base_document, Built, CompileOptions};
use crate::descriptor::MultiBarPlot;
use crate::scale::ScaleTarget;

const LEGEND_PARAM: &str = "series_select";

pub(crate) fn build(plot: &MultiBarPlot, options: &CompileOptions) -> Built {
    let as_area = plot.data.len() >= options.multibar_area_threshold;
    let x_type = if plot.ordinal { "ordinal" } else { "nominal" };

    let title = match plot.fit_parameter {
        Some(fit) => format!("{} (α = {:.4})", plot.name, fit),
        None => plot.name.clone(),
    };

    let values: Vec<Value> = plot
        .data
        .iter()
        .map(|row| json!({ "label": row.label, "series": row.series, "value": row.value }))
        .collect();

    let mark = if as_area {
        json!({ "type": "area", "interpolate": "step-after", "tooltip": true })
    } else {
        json!({ "type": "bar", "tooltip": true })
    };

    let mut encoding = json!({
        "x": { "field": "label", "type": x_type, "sort": null, "title": plot.x_label },
        "y": {
            "field": "value",
            "type": "quantitative",
            "stack": null,
            "title": plot.y_label
        },
        "color": {
            "field": "series",
            "type": "nominal",
            "sort": plot.series_order(),
            "legend": { "title": null }
        },
        "opacity": {
            "condition": { "param": LEGEND_PARAM, "value": 1 },
            "value": 0.2
        }
    });
    if !as_area {
        encoding["xOffset"] = json!({ "field": "series", "sort": plot.series_order() });
    }

    let mut series = Map::new();
    series.insert("data".to_string(), json!({ "values": values }));
    series.insert(
        "params".to_string(),
        json!([{
            "name": LEGEND_PARAM,
            "select": { "type": "point", "fields": ["series"] },
            "bind": "legend"
        }]),
    );
    series.insert("mark".to_string(), mark);
    series.insert("encoding".to_string(), encoding);

    let mut doc = base_document(&title, options);
    let mut targets = Vec::new();

    match plot.reference_curve.as_ref().filter(|curve| !curve.is_empty()) {
        Some(curve) => {
            let points: Vec<Value> = curve
                .iter()
                .map(|p| json!({ "label": p.label, "value": p.value }))
                .collect();
            let overlay = json!({
                "data": { "values": points },
                "mark": { "type": "line", "color": "black", "strokeDash": [4, 2] },
                "encoding": {
                    "x": { "field": "label", "type": x_type, "sort": null },
                    "y": { "field": "value", "type": "quantitative" }
                }
            });
            doc.insert(
                "layer".to_string(),
                Value::Array(vec![Value::Object(series), overlay]),
            );
            if plot.log_toggle {
                targets.push(ScaleTarget::value_axis("/layer/0", "y", "value").anchored());
                targets.push(ScaleTarget::value_axis("/layer/1", "y", "value"));
            }
        }
        None => {
            doc.extend(series);
            if plot.log_toggle {
                targets.push(ScaleTarget::value_axis("", "y", "value").anchored());
            }
        }
    }

    Built {
        doc: Value::Object(doc),
        targets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::CompiledPlot;
    use crate::descriptor::{CurvePoint, Label, PlotDescriptor, SeriesRow};
    use crate::scale::ScaleMode;

    fn growth(rows: usize, curve: bool) -> MultiBarPlot {
        MultiBarPlot {
            id: "growth".into(),
            name: "Pangenome growth".into(),
            x_label: "genomes".into(),
            y_label: "nodes".into(),
            ordinal: false,
            log_toggle: true,
            data: (0..rows)
                .map(|i| SeriesRow {
                    label: Label::Int((i / 2) as i64),
                    series: if i % 2 == 0 { "core".into() } else { "shell".into() },
                    value: i as f64,
                })
                .collect(),
            reference_curve: curve.then(|| {
                vec![
                    CurvePoint { label: Label::Int(1), value: 1.0 },
                    CurvePoint { label: Label::Int(2), value: 3.0 },
                ]
            }),
            fit_parameter: curve.then_some(0.123456),
        }
    }

    #[test]
    fn test_legend_selection_drives_opacity() {
        let desc = PlotDescriptor::MultiBar(growth(4, false));
        let plot = CompiledPlot::new(&desc, &CompileOptions::default()).unwrap();
        let doc = plot.base();
        assert_eq!(doc["params"][0]["bind"], "legend");
        assert_eq!(doc["encoding"]["opacity"]["condition"]["param"], LEGEND_PARAM);
        assert_eq!(doc["encoding"]["color"]["sort"], json!(["core", "shell"]));
        assert_eq!(doc["encoding"]["xOffset"]["field"], "series");
    }

    #[test]
    fn test_reference_curve_layers_and_title() {
        let desc = PlotDescriptor::MultiBar(growth(4, true));
        let plot = CompiledPlot::new(&desc, &CompileOptions::default()).unwrap();
        assert_eq!(plot.base()["title"], "Pangenome growth (α = 0.1235)");
        assert_eq!(plot.base()["layer"][1]["mark"]["type"], "line");

        let log = plot.at(ScaleMode::Log).into_value();
        assert_eq!(log["layer"][0]["encoding"]["y2"]["datum"], 1.0);
        assert_eq!(log["layer"][1]["encoding"]["y"]["scale"]["type"], "log");
        assert!(log["layer"][1]["encoding"].get("y2").is_none());
    }
}
