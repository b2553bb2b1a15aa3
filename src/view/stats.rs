//! Statistic value boxes
//!
//! Three text slots whose statistic and field depend on the current plot
//! type and x-axis. In scatter mode each slot reports the average of a
//! fixed field; in histogram mode the slots report mean, median and range
//! of the selected x field. An unrecognized combination falls back to a
//! fixed message instead of failing.

use crate::dataset::NumericField;
use crate::filter::FilteredDataset;
use crate::params::{Parameters, PlotType};

/// Fallback text when the plot type / x-axis combination is unrecognized.
pub const INVALID_COMBINATION: &str = "Select a valid plot type and x-axis";

/// The three value-box positions, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatSlot {
    First,
    Second,
    Third,
}

/// Text for one statistic value box.
///
/// Values are rounded to one decimal place. With zero rows the statistics
/// are undefined and render as NaN, which is still a well-formed string.
pub fn stat_text(slot: StatSlot, filtered: &FilteredDataset, params: &Parameters) -> String {
    match (slot, params.plot_type) {
        (StatSlot::First, PlotType::Scatterplot) => {
            average_line(filtered, NumericField::BillLengthMm)
        }
        (StatSlot::Second, PlotType::Scatterplot) => {
            average_line(filtered, NumericField::BillDepthMm)
        }
        (StatSlot::Third, PlotType::Scatterplot) => average_line(filtered, NumericField::BodyMassG),
        (StatSlot::First, PlotType::Histogram) => average_line(filtered, params.x_field),
        (StatSlot::Second, PlotType::Histogram) => median_line(filtered, params.x_field),
        (StatSlot::Third, PlotType::Histogram) => range_line(filtered, params.x_field),
    }
}

fn average_line(filtered: &FilteredDataset, field: NumericField) -> String {
    format!(
        "Average {}: {:.1} {}",
        field.label(),
        mean(&filtered.column(field)),
        field.unit()
    )
}

fn median_line(filtered: &FilteredDataset, field: NumericField) -> String {
    format!(
        "Median {}: {:.1} {}",
        field.label(),
        median(&filtered.column(field)),
        field.unit()
    )
}

fn range_line(filtered: &FilteredDataset, field: NumericField) -> String {
    let values = filtered.column(field);
    format!(
        "Range of {}: {:.1} {} - {:.1} {}",
        field.label(),
        min(&values),
        field.unit(),
        max(&values),
        field.unit()
    )
}

// =============================================================================
// Statistics
// =============================================================================

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median with even-length averaging; NaN for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Minimum; NaN for an empty slice.
pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NAN, f64::min)
}

/// Maximum; NaN for an empty slice.
pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NAN, f64::max)
}
