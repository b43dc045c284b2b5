//! Plot descriptors
//!
//! A descriptor is an immutable, typed description of one report element. The
//! variants form a single tagged union; the JSON tag field is `type`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::bins::BinIndex;
use crate::error::DescriptorError;

/// Category or position value as found in descriptor rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(v) => write!(f, "{}", v),
            Label::Float(v) => write!(f, "{}", v),
            Label::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for Label {
    fn from(v: i64) -> Self {
        Label::Int(v)
    }
}

impl From<f64> for Label {
    fn from(v: f64) -> Self {
        Label::Float(v)
    }
}

impl From<&str> for Label {
    fn from(v: &str) -> Self {
        Label::Text(v.to_string())
    }
}

/// Image encodings supported by exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Svg => "image/svg+xml",
        }
    }
}

/// Variant identity of a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotKind {
    Bar,
    MultiBar,
    Line,
    Chromosomal,
    Hexbin,
    Heatmap,
    VegaPlot,
    DownloadHelper,
}

impl PlotKind {
    pub const ALL: [PlotKind; 8] = [
        PlotKind::Bar,
        PlotKind::MultiBar,
        PlotKind::Line,
        PlotKind::Chromosomal,
        PlotKind::Hexbin,
        PlotKind::Heatmap,
        PlotKind::VegaPlot,
        PlotKind::DownloadHelper,
    ];

    /// Tag used in the `type` field of serialized descriptors
    pub fn tag(&self) -> &'static str {
        match self {
            PlotKind::Bar => "Bar",
            PlotKind::MultiBar => "MultiBar",
            PlotKind::Line => "Line",
            PlotKind::Chromosomal => "Chromosomal",
            PlotKind::Hexbin => "Hexbin",
            PlotKind::Heatmap => "Heatmap",
            PlotKind::VegaPlot => "VegaPlot",
            PlotKind::DownloadHelper => "DownloadHelper",
        }
    }

    /// Kind segment used in DOM element ids (`chart-<kind>-<id>`)
    pub fn dom_name(&self) -> &'static str {
        match self {
            PlotKind::Bar => "bar",
            PlotKind::MultiBar => "multibar",
            PlotKind::Line => "line",
            PlotKind::Chromosomal => "chromosomal",
            PlotKind::Hexbin => "hexbin",
            PlotKind::Heatmap => "heatmap",
            PlotKind::VegaPlot => "vega",
            PlotKind::DownloadHelper => "download",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.tag() == tag)
    }

    pub fn is_chart(&self) -> bool {
        !matches!(self, PlotKind::DownloadHelper)
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarRow {
    pub label: Label,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarPlot {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x_label: String,
    #[serde(default)]
    pub y_label: String,
    #[serde(default)]
    pub ordinal: bool,
    #[serde(default)]
    pub log_toggle: bool,
    pub data: Vec<BarRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub label: Label,
    pub series: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub label: Label,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiBarPlot {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x_label: String,
    #[serde(default)]
    pub y_label: String,
    #[serde(default)]
    pub ordinal: bool,
    #[serde(default)]
    pub log_toggle: bool,
    pub data: Vec<SeriesRow>,
    /// Fitted growth curve drawn over the bars
    #[serde(default)]
    pub reference_curve: Option<Vec<CurvePoint>>,
    /// Fit parameter shown in the title
    #[serde(default)]
    pub fit_parameter: Option<f64>,
}

impl MultiBarPlot {
    /// Series names in order of first appearance
    pub fn series_order(&self) -> Vec<&str> {
        let mut order: Vec<&str> = Vec::new();
        for row in &self.data {
            if !order.contains(&row.series.as_str()) {
                order.push(&row.series);
            }
        }
        order
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRow {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePlot {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x_label: String,
    #[serde(default)]
    pub y_label: String,
    #[serde(default)]
    pub log_x: bool,
    #[serde(default)]
    pub log_y: bool,
    pub data: Vec<PointRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRow {
    pub start: u64,
    pub end: u64,
    pub value: f64,
    #[serde(default)]
    pub second_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromosomalPlot {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub sequence: String,
    pub label: String,
    #[serde(default)]
    pub second_label: Option<String>,
    #[serde(default)]
    pub is_diverging: bool,
    pub data: Vec<WindowRow>,
}

impl ChromosomalPlot {
    /// Metric names offered by the metric selector, primary first
    pub fn metrics(&self) -> Vec<&str> {
        let mut metrics = vec![self.label.as_str()];
        if let Some(second) = self.second_label.as_deref() {
            if !second.is_empty() && second != self.label {
                metrics.push(second);
            }
        }
        metrics
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexBin {
    /// 1-based bin id
    pub bin: u32,
    pub x: f64,
    pub y: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexbinPlot {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x_label: String,
    #[serde(default)]
    pub y_label: String,
    /// Hexagon radius in pixels
    #[serde(default)]
    pub radius: Option<f64>,
    pub bins: Vec<HexBin>,
    #[serde(default)]
    pub bin_index: BinIndex,
}

impl HexbinPlot {
    /// Bin drawn by the mark with the given selection id (1-based row order)
    pub fn bin_for_mark(&self, mark: u64) -> Option<u32> {
        let idx = usize::try_from(mark.checked_sub(1)?).ok()?;
        self.bins.get(idx).map(|b| b.bin)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub x: Label,
    pub y: Label,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPlot {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x_label: String,
    #[serde(default)]
    pub y_label: String,
    pub data: Vec<HeatmapCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegaPlot {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub spec: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadHelper {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub format: ImageFormat,
}

/// Typed plot descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlotDescriptor {
    Bar(BarPlot),
    MultiBar(MultiBarPlot),
    Line(LinePlot),
    Chromosomal(ChromosomalPlot),
    Hexbin(HexbinPlot),
    Heatmap(HeatmapPlot),
    VegaPlot(VegaPlot),
    DownloadHelper(DownloadHelper),
}

impl PlotDescriptor {
    /// Parse a raw dataset entry, distinguishing unknown variants from malformed ones
    pub fn from_value(value: Value) -> Result<Self, DescriptorError> {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(DescriptorError::MissingTag)?
            .to_string();

        if PlotKind::from_tag(&tag).is_none() {
            return Err(DescriptorError::unsupported(tag));
        }

        serde_json::from_value(value).map_err(|e| DescriptorError::malformed(tag, e))
    }

    pub fn id(&self) -> &str {
        match self {
            PlotDescriptor::Bar(p) => &p.id,
            PlotDescriptor::MultiBar(p) => &p.id,
            PlotDescriptor::Line(p) => &p.id,
            PlotDescriptor::Chromosomal(p) => &p.id,
            PlotDescriptor::Hexbin(p) => &p.id,
            PlotDescriptor::Heatmap(p) => &p.id,
            PlotDescriptor::VegaPlot(p) => &p.id,
            PlotDescriptor::DownloadHelper(p) => &p.id,
        }
    }

    pub fn kind(&self) -> PlotKind {
        match self {
            PlotDescriptor::Bar(_) => PlotKind::Bar,
            PlotDescriptor::MultiBar(_) => PlotKind::MultiBar,
            PlotDescriptor::Line(_) => PlotKind::Line,
            PlotDescriptor::Chromosomal(_) => PlotKind::Chromosomal,
            PlotDescriptor::Hexbin(_) => PlotKind::Hexbin,
            PlotDescriptor::Heatmap(_) => PlotKind::Heatmap,
            PlotDescriptor::VegaPlot(_) => PlotKind::VegaPlot,
            PlotDescriptor::DownloadHelper(_) => PlotKind::DownloadHelper,
        }
    }

    /// Whether a scale toggle has any effect on this descriptor
    pub fn supports_log_toggle(&self) -> bool {
        match self {
            PlotDescriptor::Bar(p) => p.log_toggle,
            PlotDescriptor::MultiBar(p) => p.log_toggle,
            PlotDescriptor::Line(p) => p.log_x || p.log_y,
            _ => false,
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}
