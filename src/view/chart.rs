//! Chart specifications
//!
//! One logical [`ChartSpec`] is derived from the parameters per cycle and
//! rendered for two targets: a static-image style chart and an interactive
//! widget style chart. Both targets are produced from the same spec, so
//! their axis fields, hue and bin count stay in lockstep by construction.
//!
//! Rendering emits Vega-Lite v5 JSON with inline data; the hosting layer is
//! responsible for turning that into pixels or DOM.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::dataset::{CategoryField, NumericField, Record};
use crate::filter::FilteredDataset;
use crate::params::{Parameters, PlotType};

/// Vega-Lite schema URL emitted on every chart.
const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Which rendering consumes the spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartTarget {
    /// Static-image style rendering (no title banner).
    Image,
    /// Interactive widget rendering (titled).
    Widget,
}

/// Logical chart specification shared by both renderings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Scatter {
        x: NumericField,
        y: NumericField,
        /// Hue grouping; only applied while filtering is enabled.
        hue: Option<CategoryField>,
    },
    Histogram {
        x: NumericField,
        bins: u32,
        hue: Option<CategoryField>,
        /// Stack hue groups within a bin. Set whenever a hue is present.
        stacked: bool,
    },
}

impl ChartSpec {
    /// Derive the cycle's chart spec from the current parameters.
    ///
    /// Mirrors the original dashboard: the hue channel is attached only when
    /// filtering is enabled, and histogram bars stack by hue.
    pub fn from_params(params: &Parameters) -> Self {
        let hue = params.filter_enabled.then_some(params.hue_field);
        match params.plot_type {
            PlotType::Scatterplot => ChartSpec::Scatter {
                x: params.x_field,
                y: params.y_field,
                hue,
            },
            PlotType::Histogram => ChartSpec::Histogram {
                x: params.x_field,
                bins: params.bin_count,
                stacked: hue.is_some(),
                hue,
            },
        }
    }

    /// Render the spec as Vega-Lite JSON for one target.
    pub fn to_vegalite(&self, target: ChartTarget, filtered: &FilteredDataset) -> Value {
        let mut spec = Map::new();
        spec.insert("$schema".to_string(), json!(VEGA_LITE_SCHEMA));
        if target == ChartTarget::Widget {
            spec.insert("title".to_string(), json!(self.title()));
        }
        spec.insert(
            "data".to_string(),
            json!({ "values": data_values(filtered.records()) }),
        );

        match self {
            ChartSpec::Scatter { x, y, hue } => {
                spec.insert("mark".to_string(), json!({ "type": "point", "filled": true }));
                let mut encoding = Map::new();
                encoding.insert("x".to_string(), quantitative_channel(*x));
                encoding.insert("y".to_string(), quantitative_channel(*y));
                if let Some(hue) = hue {
                    encoding.insert("color".to_string(), nominal_channel(*hue));
                }
                spec.insert("encoding".to_string(), Value::Object(encoding));
            }
            ChartSpec::Histogram {
                x,
                bins,
                hue,
                stacked,
            } => {
                spec.insert("mark".to_string(), json!({ "type": "bar" }));
                let mut encoding = Map::new();
                encoding.insert(
                    "x".to_string(),
                    json!({
                        "field": x.column_name(),
                        "type": "quantitative",
                        "bin": { "maxbins": bins },
                    }),
                );
                let mut y = Map::new();
                y.insert("aggregate".to_string(), json!("count"));
                y.insert("type".to_string(), json!("quantitative"));
                if *stacked {
                    y.insert("stack".to_string(), json!(true));
                }
                encoding.insert("y".to_string(), Value::Object(y));
                if let Some(hue) = hue {
                    encoding.insert("color".to_string(), nominal_channel(*hue));
                }
                spec.insert("encoding".to_string(), Value::Object(encoding));
            }
        }

        Value::Object(spec)
    }

    fn title(&self) -> &'static str {
        match self {
            ChartSpec::Scatter { .. } => "Scatterplot of Penguin Data",
            ChartSpec::Histogram { .. } => "Histogram of Penguin Data",
        }
    }
}

fn quantitative_channel(field: NumericField) -> Value {
    json!({
        "field": field.column_name(),
        "type": "quantitative",
        "scale": { "zero": false },
    })
}

fn nominal_channel(field: CategoryField) -> Value {
    json!({
        "field": field.column_name(),
        "type": "nominal",
    })
}

/// Inline data rows for the chart. Unrecorded sex becomes JSON null.
fn data_values(records: &[Record]) -> Vec<Value> {
    records
        .iter()
        .map(|r| {
            json!({
                "species": r.species.to_string(),
                "island": r.island.to_string(),
                "sex": r.sex.map(|s| s.to_string()),
                "bill_length_mm": r.bill_length_mm,
                "bill_depth_mm": r.bill_depth_mm,
                "body_mass_g": r.body_mass_g,
            })
        })
        .collect()
}
