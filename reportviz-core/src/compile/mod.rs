//! Vega-Lite specification compiler
//!
//! [`CompiledPlot::new`] is the single dispatch point over [`PlotDescriptor`]. It
//! builds a base document once, always in linear mode, and records the channels a
//! scale toggle is allowed to touch. [`CompiledPlot::at`] deep-clones the base and
//! patches the clone, so the base never changes after construction.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::descriptor::{PlotDescriptor, PlotKind};
use crate::error::{CompileError, CompileResult};
use crate::scale::{self, ScaleMode, ScaleTarget};

mod bar;
mod chromosomal;
mod heatmap;
pub mod hexbin;
mod line;
mod multibar;

pub use hexbin::SELECTION_PARAM;

/// Vega-Lite schema every generated document declares
pub const SCHEMA_URL: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Compiler settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Ordinal bar charts with at least this many rows render as an area
    #[serde(default = "default_bar_area_threshold")]
    pub bar_area_threshold: usize,

    /// Multi-series charts with at least this many rows render as an area
    #[serde(default = "default_multibar_area_threshold")]
    pub multibar_area_threshold: usize,

    /// Lower bound of log-scaled value axes and baseline of log bars
    #[serde(default = "default_log_domain_min")]
    pub log_domain_min: f64,

    /// Chart height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Hexagon radius used when a hexbin descriptor has none
    #[serde(default = "default_hexbin_radius")]
    pub hexbin_radius: f64,
}

fn default_bar_area_threshold() -> usize { 200 }
fn default_multibar_area_threshold() -> usize { 300 }
fn default_log_domain_min() -> f64 { 1.0 }
fn default_height() -> u32 { 400 }
fn default_hexbin_radius() -> f64 { 10.0 }

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            bar_area_threshold: default_bar_area_threshold(),
            multibar_area_threshold: default_multibar_area_threshold(),
            log_domain_min: default_log_domain_min(),
            height: default_height(),
            hexbin_radius: default_hexbin_radius(),
        }
    }
}

/// A specification document ready for the rendering engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecDocument(Value);

impl SpecDocument {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Compact JSON text, as posted to the editor
    pub fn to_json_string(&self) -> String {
        self.0.to_string()
    }

    pub fn to_pretty_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.0)
    }
}

/// Output of a per-variant builder
pub(crate) struct Built {
    pub doc: Value,
    pub targets: Vec<ScaleTarget>,
}

impl Built {
    pub fn fixed(doc: Map<String, Value>) -> Self {
        Self {
            doc: Value::Object(doc),
            targets: Vec::new(),
        }
    }
}

/// Base document of one descriptor plus the channels a scale toggle patches
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPlot {
    id: String,
    kind: PlotKind,
    base: Value,
    targets: Vec<ScaleTarget>,
    log_domain_min: f64,
}

impl CompiledPlot {
    pub fn new(descriptor: &PlotDescriptor, options: &CompileOptions) -> CompileResult<Self> {
        let built = match descriptor {
            PlotDescriptor::Bar(plot) => bar::build(plot, options),
            PlotDescriptor::MultiBar(plot) => multibar::build(plot, options),
            PlotDescriptor::Line(plot) => line::build(plot, options),
            PlotDescriptor::Chromosomal(plot) => chromosomal::build(plot, options),
            PlotDescriptor::Hexbin(plot) => hexbin::build(plot, options),
            PlotDescriptor::Heatmap(plot) => heatmap::build(plot, options),
            PlotDescriptor::VegaPlot(plot) => {
                if !plot.spec.is_object() {
                    return Err(CompileError::InvalidSpec { id: plot.id.clone() });
                }
                Built {
                    doc: plot.spec.clone(),
                    targets: Vec::new(),
                }
            }
            PlotDescriptor::DownloadHelper(helper) => {
                return Err(CompileError::unsupported(
                    helper.id.as_str(),
                    PlotKind::DownloadHelper.tag(),
                ));
            }
        };

        let Built { mut doc, targets } = built;
        scale::apply(&mut doc, &targets, ScaleMode::Linear, options.log_domain_min);

        log::debug!(
            "compiled {} '{}' ({} scale targets)",
            descriptor.kind(),
            descriptor.id(),
            targets.len()
        );

        Ok(Self {
            id: descriptor.id().to_string(),
            kind: descriptor.kind(),
            base: doc,
            targets,
            log_domain_min: options.log_domain_min,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> PlotKind {
        self.kind
    }

    /// Whether switching scale mode changes the document at all
    pub fn supports_log(&self) -> bool {
        !self.targets.is_empty()
    }

    pub fn base(&self) -> &Value {
        &self.base
    }

    /// Document for `mode`, derived from a fresh copy of the base
    pub fn at(&self, mode: ScaleMode) -> SpecDocument {
        let mut doc = self.base.clone();
        scale::apply(&mut doc, &self.targets, mode, self.log_domain_min);
        SpecDocument(doc)
    }
}

/// Compile `descriptor` for `mode` in one step
pub fn compile(
    descriptor: &PlotDescriptor,
    mode: ScaleMode,
    options: &CompileOptions,
) -> CompileResult<SpecDocument> {
    Ok(CompiledPlot::new(descriptor, options)?.at(mode))
}

/// Skeleton shared by every generated document
pub(crate) fn base_document(title: &str, options: &CompileOptions) -> Map<String, Value> {
    let mut doc = Map::new();
    doc.insert("$schema".to_string(), json!(SCHEMA_URL));
    doc.insert("title".to_string(), json!(title));
    doc.insert("width".to_string(), json!("container"));
    doc.insert("height".to_string(), json!(options.height));
    doc
}

/// Quote a string as a Vega expression literal
pub(crate) fn expr_string(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DownloadHelper, VegaPlot};
    use crate::ImageFormat;

    #[test]
    fn test_options_defaults_from_empty_toml_table() {
        let options: CompileOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, CompileOptions::default());
        assert_eq!(options.bar_area_threshold, 200);
        assert_eq!(options.multibar_area_threshold, 300);
    }

    #[test]
    fn test_download_helper_is_not_compilable() {
        let desc = PlotDescriptor::DownloadHelper(DownloadHelper {
            id: "img".into(),
            format: ImageFormat::Png,
        });
        let err = compile(&desc, ScaleMode::Linear, &CompileOptions::default()).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedDescriptor { .. }));
    }

    #[test]
    fn test_vega_passthrough() {
        let spec = json!({"mark": "point", "data": {"values": [{"a": 1}]}});
        let desc = PlotDescriptor::VegaPlot(VegaPlot { id: "v".into(), spec: spec.clone() });
        let doc = compile(&desc, ScaleMode::Log, &CompileOptions::default()).unwrap();
        assert_eq!(doc.as_value(), &spec);

        let desc = PlotDescriptor::VegaPlot(VegaPlot { id: "v".into(), spec: json!([1, 2]) });
        let err = compile(&desc, ScaleMode::Linear, &CompileOptions::default()).unwrap_err();
        assert!(matches!(err, CompileError::InvalidSpec { ref id } if id == "v"));
    }

    #[test]
    fn test_expr_string_quoting() {
        assert_eq!(expr_string("it's"), "'it\\'s'");
        assert_eq!(expr_string("a\\b"), "'a\\\\b'");
    }
}
