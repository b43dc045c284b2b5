//! Hexbin density maps
//!
//! Each pre-binned row is drawn as one hexagonal point mark. The selection
//! parameter carries no `fields`, so the engine identifies selected marks by
//! their 1-based row number (`_vgsid_`), which is what
//! [`HexbinPlot::bin_for_mark`](crate::descriptor::HexbinPlot::bin_for_mark) expects.

use serde_json::{json, Value};

use super::{base_document, Built, CompileOptions};
use crate::descriptor::HexbinPlot;

/// Name of the point-selection parameter holding the selected marks
pub const SELECTION_PARAM: &str = "selected_bins";

/// Unit hexagon with pointy top, scaled by the mark size
const HEXAGON_PATH: &str = "M0,-1L0.866,-0.5L0.866,0.5L0,1L-0.866,0.5L-0.866,-0.5Z";

/// Symbol size drawing the unit hexagon with circumradius `radius` pixels.
/// Custom symbol paths are scaled by `sqrt(size) / 2`.
fn hexagon_size(radius: f64) -> f64 {
    4.0 * radius * radius
}

pub(crate) fn build(plot: &HexbinPlot, options: &CompileOptions) -> Built {
    let radius = plot.radius.unwrap_or(options.hexbin_radius);

    let values: Vec<Value> = plot
        .bins
        .iter()
        .map(|b| json!({ "bin": b.bin, "x": b.x, "y": b.y, "count": b.count }))
        .collect();

    let mut doc = base_document(&plot.name, options);
    doc.insert("data".to_string(), json!({ "values": values }));
    doc.insert(
        "params".to_string(),
        json!([{
            "name": SELECTION_PARAM,
            "select": { "type": "point", "toggle": "true", "clear": "dblclick" }
        }]),
    );
    doc.insert(
        "mark".to_string(),
        json!({
            "type": "point",
            "shape": HEXAGON_PATH,
            "size": hexagon_size(radius),
            "filled": true,
            "tooltip": true
        }),
    );
    doc.insert(
        "encoding".to_string(),
        json!({
            "x": { "field": "x", "type": "quantitative", "title": plot.x_label },
            "y": { "field": "y", "type": "quantitative", "title": plot.y_label },
            "color": {
                "field": "count",
                "type": "quantitative",
                "scale": { "type": "log", "scheme": "viridis" }
            },
            "stroke": {
                "condition": { "param": SELECTION_PARAM, "empty": false, "value": "black" },
                "value": null
            },
            "strokeWidth": {
                "condition": { "param": SELECTION_PARAM, "empty": false, "value": 2 },
                "value": 0
            }
        }),
    );

    Built::fixed(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bins::BinIndex;
    use crate::compile::CompiledPlot;
    use crate::descriptor::{HexBin, PlotDescriptor};

    fn hexbin(radius: Option<f64>) -> PlotDescriptor {
        PlotDescriptor::Hexbin(HexbinPlot {
            id: "hx".into(),
            name: "Length vs coverage".into(),
            x_label: "length".into(),
            y_label: "coverage".into(),
            radius,
            bins: vec![HexBin { bin: 3, x: 1.0, y: 2.0, count: 12 }],
            bin_index: BinIndex::default(),
        })
    }

    #[test]
    fn test_selection_param_and_shape() {
        let plot = CompiledPlot::new(&hexbin(None), &CompileOptions::default()).unwrap();
        let doc = plot.base();
        assert_eq!(doc["params"][0]["name"], SELECTION_PARAM);
        assert!(doc["params"][0]["select"].get("fields").is_none());
        assert_eq!(doc["mark"]["shape"], HEXAGON_PATH);
        assert_eq!(doc["encoding"]["color"]["scale"]["type"], "log");
        assert!(!plot.supports_log());
    }

    #[test]
    fn test_radius_sets_mark_size() {
        let plot = CompiledPlot::new(&hexbin(Some(4.0)), &CompileOptions::default()).unwrap();
        let size = plot.base()["mark"]["size"].as_f64().unwrap();
        assert_eq!(size, 64.0);
        assert_eq!(size.sqrt() / 2.0, 4.0);
    }
}
