//! Data table projection
//!
//! Projects the filtered dataset onto the fixed six-column subset and wraps
//! it for the hosting layer's table widget. `show_table` toggles between an
//! editable grid and a read-only table; both modes serve the same projected
//! rows with per-column filtering enabled.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::filter::FilteredDataset;
use crate::params::Parameters;
use crate::Result;

/// The fixed column subset, in display order.
pub const TABLE_COLUMNS: [&str; 6] = [
    "species",
    "island",
    "bill_length_mm",
    "bill_depth_mm",
    "body_mass_g",
    "sex",
];

/// How the hosting layer renders the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableMode {
    /// Editable grid widget.
    Grid,
    /// Read-only table widget.
    Table,
}

/// The table view for one cycle.
#[derive(Debug, Clone)]
pub struct TableView {
    mode: TableMode,
    /// Per-column filter widgets enabled in both modes.
    filters: bool,
    frame: DataFrame,
}

impl TableView {
    /// Project the filtered dataset for the current parameters.
    pub fn project(filtered: &FilteredDataset, params: &Parameters) -> Result<Self> {
        let records = filtered.records();
        let species: Vec<String> = records.iter().map(|r| r.species.to_string()).collect();
        let island: Vec<String> = records.iter().map(|r| r.island.to_string()).collect();
        let sex: Vec<Option<String>> = records
            .iter()
            .map(|r| r.sex.map(|s| s.to_string()))
            .collect();
        let bill_length: Vec<f64> = records.iter().map(|r| r.bill_length_mm).collect();
        let bill_depth: Vec<f64> = records.iter().map(|r| r.bill_depth_mm).collect();
        let body_mass: Vec<f64> = records.iter().map(|r| r.body_mass_g).collect();

        let frame = df!(
            "species" => species,
            "island" => island,
            "bill_length_mm" => bill_length,
            "bill_depth_mm" => bill_depth,
            "body_mass_g" => body_mass,
            "sex" => sex,
        )?;

        let mode = if params.show_table {
            TableMode::Table
        } else {
            TableMode::Grid
        };

        Ok(Self {
            mode,
            filters: true,
            frame,
        })
    }

    pub fn mode(&self) -> TableMode {
        self.mode
    }

    pub fn filters_enabled(&self) -> bool {
        self.filters
    }

    /// The projected frame (all six columns, filtered rows, original order).
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn row_count(&self) -> usize {
        self.frame.height()
    }

    /// JSON payload for the hosting layer: mode, filter capability, columns
    /// and row objects.
    pub fn to_json(&self) -> Value {
        let rows: Vec<Value> = (0..self.frame.height())
            .map(|i| {
                let mut row = serde_json::Map::new();
                for col in TABLE_COLUMNS {
                    row.insert(col.to_string(), cell_value(&self.frame, col, i));
                }
                Value::Object(row)
            })
            .collect();

        json!({
            "mode": self.mode,
            "filters": self.filters,
            "columns": TABLE_COLUMNS,
            "rows": rows,
        })
    }
}

fn cell_value(frame: &DataFrame, column: &str, row: usize) -> Value {
    let series = match frame.column(column) {
        Ok(s) => s,
        Err(_) => return Value::Null,
    };
    if let Ok(ca) = series.str() {
        return ca.get(row).map_or(Value::Null, |v| json!(v));
    }
    if let Ok(ca) = series.f64() {
        return ca.get(row).map_or(Value::Null, |v| json!(v));
    }
    Value::Null
}
