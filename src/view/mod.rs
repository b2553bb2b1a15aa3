//! Derived views
//!
//! Each view is a pure projection of the shared filtered dataset (plus the
//! parameters it declares) into one renderable value. Views hold no state
//! across cycles and never mutate their inputs; degenerate inputs (zero
//! rows, no variance) produce degenerate-but-valid outputs rather than
//! errors.
//!
//! - [`count_text`] - the "<n> penguins" value box
//! - [`stats`] - the three statistic value boxes
//! - [`chart`] - scatter/histogram specifications for both chart renderings
//! - [`table`] - the fixed-column data table projection
//! - [`heatmap`] - the pairwise correlation heatmap

pub mod chart;
pub mod heatmap;
pub mod stats;
pub mod table;

use serde::{Deserialize, Serialize};

use crate::filter::FilteredDataset;

/// Identifier for one derived view, used by the dependency graph and the
/// hosting layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewId {
    Count,
    StatFirst,
    StatSecond,
    StatThird,
    ImageChart,
    WidgetChart,
    Table,
    Heatmap,
}

/// Row count of the filtered dataset.
pub fn count(filtered: &FilteredDataset) -> usize {
    filtered.len()
}

/// The count value box text.
pub fn count_text(filtered: &FilteredDataset) -> String {
    format!("{} penguins", filtered.len())
}
