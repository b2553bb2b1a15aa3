//! Correlation heatmap
//!
//! Pairwise Pearson correlations over the three numeric measurement fields,
//! restricted to the filtered rows. Fewer than two rows or a zero-variance
//! column yield NaN entries, which render as blank annotated cells rather
//! than failing the cycle.

use serde_json::{json, Value};

use crate::dataset::NumericField;
use crate::filter::FilteredDataset;

/// Fields included in the correlation matrix, in axis order.
pub const HEATMAP_FIELDS: [NumericField; 3] = NumericField::ALL;

/// Symmetric 3x3 Pearson correlation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    values: [[f64; 3]; 3],
}

impl CorrelationMatrix {
    /// Compute the matrix over the filtered rows.
    pub fn compute(filtered: &FilteredDataset) -> Self {
        let columns: Vec<Vec<f64>> = HEATMAP_FIELDS
            .iter()
            .map(|f| filtered.column(*f))
            .collect();

        let mut values = [[f64::NAN; 3]; 3];
        for (i, xs) in columns.iter().enumerate() {
            for (j, ys) in columns.iter().enumerate() {
                values[i][j] = pearson(xs, ys);
            }
        }
        Self { values }
    }

    /// Correlation between two fields; NaN when degenerate.
    pub fn get(&self, a: NumericField, b: NumericField) -> f64 {
        self.values[field_index(a)][field_index(b)]
    }

    pub fn values(&self) -> &[[f64; 3]; 3] {
        &self.values
    }

    /// Annotated Vega-Lite heatmap: colored cells on a diverging scale fixed
    /// to [-1, 1], cell values as text. NaN entries become JSON nulls.
    pub fn to_vegalite(&self) -> Value {
        let mut cells = Vec::with_capacity(9);
        for (i, row) in self.values.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                let corr = if value.is_nan() {
                    Value::Null
                } else {
                    json!(value)
                };
                cells.push(json!({
                    "x": HEATMAP_FIELDS[j].column_name(),
                    "y": HEATMAP_FIELDS[i].column_name(),
                    "correlation": corr,
                    "label": if value.is_nan() {
                        Value::Null
                    } else {
                        json!(format!("{:.2}", value))
                    },
                }));
            }
        }

        json!({
            "$schema": "https://vega.github.io/schema/vega-lite/v5.json",
            "data": { "values": cells },
            "layer": [
                {
                    "mark": "rect",
                    "encoding": {
                        "x": { "field": "x", "type": "nominal", "sort": null },
                        "y": { "field": "y", "type": "nominal", "sort": null },
                        "color": {
                            "field": "correlation",
                            "type": "quantitative",
                            "scale": { "domain": [-1, 1], "scheme": "redblue" },
                        },
                    },
                },
                {
                    "mark": { "type": "text" },
                    "encoding": {
                        "x": { "field": "x", "type": "nominal", "sort": null },
                        "y": { "field": "y", "type": "nominal", "sort": null },
                        "text": { "field": "label", "type": "nominal" },
                    },
                },
            ],
        })
    }
}

fn field_index(field: NumericField) -> usize {
    HEATMAP_FIELDS
        .iter()
        .position(|f| *f == field)
        .unwrap_or(0)
}

/// Pearson correlation coefficient. NaN for fewer than two observations or
/// zero variance in either input.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return f64::NAN;
    }
    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs[..n].iter().zip(&ys[..n]) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::loader::sample_dataset;
    use crate::dataset::Dataset;
    use crate::filter::compute_filtered;
    use crate::params::ParamSchema;

    #[test]
    fn test_pearson_perfect_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        assert!((pearson(&xs, &ys) - 1.0).abs() < 1e-12);
        let neg: Vec<f64> = ys.iter().map(|y| -y).collect();
        assert!((pearson(&xs, &neg) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_degenerate_inputs() {
        assert!(pearson(&[], &[]).is_nan());
        assert!(pearson(&[1.0], &[2.0]).is_nan());
        // Zero variance.
        assert!(pearson(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]).is_nan());
    }

    #[test]
    fn test_matrix_diagonal_and_symmetry() {
        let params = ParamSchema::with_bill_filters().defaults();
        let filtered = compute_filtered(&sample_dataset(), &params);
        let matrix = CorrelationMatrix::compute(&filtered);

        for f in HEATMAP_FIELDS {
            assert!((matrix.get(f, f) - 1.0).abs() < 1e-12);
        }
        let ab = matrix.get(NumericField::BillLengthMm, NumericField::BodyMassG);
        let ba = matrix.get(NumericField::BodyMassG, NumericField::BillLengthMm);
        assert!((ab - ba).abs() < 1e-12);
        assert!((-1.0..=1.0).contains(&ab));
    }

    #[test]
    fn test_empty_result_yields_nan_matrix() {
        // Scenario D: zero rows produce NaN sentinels, not a crash.
        let params = ParamSchema::with_bill_filters().defaults();
        let filtered = compute_filtered(&Dataset::default(), &params);
        let matrix = CorrelationMatrix::compute(&filtered);
        for row in matrix.values() {
            for v in row {
                assert!(v.is_nan());
            }
        }
    }

    #[test]
    fn test_vegalite_spec_shape() {
        let params = ParamSchema::with_bill_filters().defaults();
        let filtered = compute_filtered(&sample_dataset(), &params);
        let vl = CorrelationMatrix::compute(&filtered).to_vegalite();

        let cells = vl["data"]["values"].as_array().unwrap();
        assert_eq!(cells.len(), 9);
        let color = &vl["layer"][0]["encoding"]["color"];
        assert_eq!(color["scale"]["domain"][0], -1);
        assert_eq!(color["scale"]["domain"][1], 1);
        // Diagonal cell is annotated "1.00".
        assert!(cells
            .iter()
            .any(|c| c["x"] == c["y"] && c["label"] == "1.00"));
    }

    #[test]
    fn test_vegalite_nan_cells_are_null() {
        let params = ParamSchema::with_bill_filters().defaults();
        let filtered = compute_filtered(&Dataset::default(), &params);
        let vl = CorrelationMatrix::compute(&filtered).to_vegalite();
        for cell in vl["data"]["values"].as_array().unwrap() {
            assert!(cell["correlation"].is_null());
            assert!(cell["label"].is_null());
        }
    }
}
