//! Scale modes and the patches that switch a compiled unit between them
//!
//! A patch touches exactly one channel of one unit (the top-level document or a
//! single layer). Log mode rewrites the channel scale, filters non-positive values
//! out of the unit and, for bar and area marks, anchors the baseline at the log
//! domain minimum. Linear mode undoes all three.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Linear or logarithmic value-axis configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    #[default]
    Linear,
    Log,
}

impl ScaleMode {
    pub fn toggled(self) -> Self {
        match self {
            ScaleMode::Linear => ScaleMode::Log,
            ScaleMode::Log => ScaleMode::Linear,
        }
    }

    pub fn from_checked(checked: bool) -> Self {
        if checked {
            ScaleMode::Log
        } else {
            ScaleMode::Linear
        }
    }
}

impl fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleMode::Linear => f.write_str("linear"),
            ScaleMode::Log => f.write_str("log"),
        }
    }
}

/// One log-capable channel inside a compiled document
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleTarget {
    /// JSON pointer to the unit holding the channel ("" for the document root)
    pub unit: String,
    /// Encoding channel, `x` or `y`
    pub channel: &'static str,
    /// Data field plotted on the channel
    pub field: String,
    /// Value axes carry `domainMin` in log mode
    pub value_axis: bool,
    /// Bar and area marks need a secondary baseline in log mode
    pub anchor: bool,
}

impl ScaleTarget {
    pub fn value_axis(unit: impl Into<String>, channel: &'static str, field: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            channel,
            field: field.into(),
            value_axis: true,
            anchor: false,
        }
    }

    pub fn position_axis(unit: impl Into<String>, channel: &'static str, field: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            channel,
            field: field.into(),
            value_axis: false,
            anchor: false,
        }
    }

    pub fn anchored(mut self) -> Self {
        self.anchor = true;
        self
    }

    fn anchor_channel(&self) -> String {
        format!("{}2", self.channel)
    }

    fn filter(&self) -> Value {
        json!({ "filter": positive_filter(&self.field) })
    }
}

/// Vega expression keeping rows whose `field` is strictly positive
pub fn positive_filter(field: &str) -> String {
    let escaped = field.replace('\\', "\\\\").replace('\'', "\\'");
    format!("datum['{}'] > 0", escaped)
}

/// Apply `mode` to every target of `doc`
pub fn apply(doc: &mut Value, targets: &[ScaleTarget], mode: ScaleMode, log_domain_min: f64) {
    for target in targets {
        let Some(unit) = doc.pointer_mut(&target.unit).and_then(Value::as_object_mut) else {
            log::debug!("scale target unit '{}' not found", target.unit);
            continue;
        };
        match mode {
            ScaleMode::Log => apply_log(unit, target, log_domain_min),
            ScaleMode::Linear => apply_linear(unit, target),
        }
    }
}

fn apply_log(unit: &mut Map<String, Value>, target: &ScaleTarget, log_domain_min: f64) {
    if let Some(encoding) = unit.get_mut("encoding").and_then(Value::as_object_mut) {
        if let Some(channel) = encoding.get_mut(target.channel).and_then(Value::as_object_mut) {
            let scale = if target.value_axis {
                json!({ "type": "log", "domainMin": log_domain_min })
            } else {
                json!({ "type": "log" })
            };
            channel.insert("scale".to_string(), scale);
        }
        if target.anchor {
            encoding.insert(target.anchor_channel(), json!({ "datum": log_domain_min }));
        }
    }

    let filter = target.filter();
    let transform = unit
        .entry("transform")
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Some(steps) = transform.as_array_mut() {
        if !steps.contains(&filter) {
            steps.push(filter);
        }
    }
}

fn apply_linear(unit: &mut Map<String, Value>, target: &ScaleTarget) {
    if let Some(encoding) = unit.get_mut("encoding").and_then(Value::as_object_mut) {
        if let Some(channel) = encoding.get_mut(target.channel).and_then(Value::as_object_mut) {
            channel.insert("scale".to_string(), json!({ "type": "linear" }));
        }
        if target.anchor {
            encoding.remove(&target.anchor_channel());
        }
    }

    let filter = target.filter();
    let now_empty = match unit.get_mut("transform").and_then(Value::as_array_mut) {
        Some(steps) => {
            steps.retain(|step| step != &filter);
            steps.is_empty()
        }
        None => false,
    };
    if now_empty {
        unit.remove("transform");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_unit() -> Value {
        json!({
            "mark": "bar",
            "encoding": {
                "x": {"field": "label", "type": "nominal"},
                "y": {"field": "value", "type": "quantitative", "scale": {"type": "linear"}}
            }
        })
    }

    #[test]
    fn test_log_patch_sets_scale_filter_and_anchor() {
        let mut doc = bar_unit();
        let targets = vec![ScaleTarget::value_axis("", "y", "value").anchored()];
        apply(&mut doc, &targets, ScaleMode::Log, 1.0);

        assert_eq!(doc["encoding"]["y"]["scale"], json!({"type": "log", "domainMin": 1.0}));
        assert_eq!(doc["encoding"]["y2"], json!({"datum": 1.0}));
        assert_eq!(doc["transform"], json!([{"filter": "datum['value'] > 0"}]));
    }

    #[test]
    fn test_linear_patch_undoes_log_patch() {
        let original = bar_unit();
        let targets = vec![ScaleTarget::value_axis("", "y", "value").anchored()];
        let mut doc = original.clone();
        apply(&mut doc, &targets, ScaleMode::Log, 1.0);
        apply(&mut doc, &targets, ScaleMode::Linear, 1.0);
        assert_eq!(doc, original);
    }

    #[test]
    fn test_linear_patch_keeps_unrelated_transforms() {
        let mut doc = bar_unit();
        doc["transform"] = json!([{"filter": "datum.value != null"}]);
        let targets = vec![ScaleTarget::value_axis("", "y", "value")];
        apply(&mut doc, &targets, ScaleMode::Log, 1.0);
        assert_eq!(doc["transform"].as_array().map(Vec::len), Some(2));
        apply(&mut doc, &targets, ScaleMode::Linear, 1.0);
        assert_eq!(doc["transform"], json!([{"filter": "datum.value != null"}]));
    }

    #[test]
    fn test_position_axis_has_no_domain_min() {
        let mut doc = json!({"layer": [{"mark": "line", "encoding": {"x": {"field": "x"}}}]});
        let targets = vec![ScaleTarget::position_axis("/layer/0", "x", "x")];
        apply(&mut doc, &targets, ScaleMode::Log, 1.0);
        assert_eq!(doc["layer"][0]["encoding"]["x"]["scale"], json!({"type": "log"}));
        assert!(doc["layer"][0]["encoding"].get("x2").is_none());
    }

    #[test]
    fn test_filter_escapes_quotes() {
        assert_eq!(positive_filter("it's"), "datum['it\\'s'] > 0");
        assert_eq!(ScaleMode::Linear.toggled(), ScaleMode::Log);
        assert_eq!(ScaleMode::from_checked(false), ScaleMode::Linear);
    }
}
