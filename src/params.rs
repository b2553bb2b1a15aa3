//! User-controlled parameters and their declared schema
//!
//! [`Parameters`] is the parameter store: the current value of every control
//! the hosting UI exposes. It is written only by external collaborators (UI,
//! REST, CLI) and read by the filter engine and the derived views.
//!
//! The historical dashboard shipped in two near-identical variants: one with
//! bill-depth/bill-length range sliders and a shared bin count, one without
//! those sliders. [`ParamSchema`] unifies the pair as a configuration
//! surface: it declares which parameters exist, their defaults and their
//! bounds, and the filter engine simply skips predicates whose parameter is
//! absent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::dataset::{CategoryField, Island, NumericField, Sex, Species};
use crate::{PengvizError, Result};

// =============================================================================
// Parameter Values
// =============================================================================

/// Which visualization the charts render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlotType {
    Scatterplot,
    Histogram,
}

impl fmt::Display for PlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlotType::Scatterplot => "Scatterplot",
            PlotType::Histogram => "Histogram",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for PlotType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Scatterplot" | "scatterplot" | "scatter" => Ok(PlotType::Scatterplot),
            "Histogram" | "histogram" => Ok(PlotType::Histogram),
            other => Err(format!("Unknown plot type: '{}'", other)),
        }
    }
}

/// Current value of every user-controlled input.
///
/// The two optional bill ranges are `None` when the active schema does not
/// declare those sliders; the corresponding filter predicates are skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub plot_type: PlotType,
    pub x_field: NumericField,
    pub y_field: NumericField,
    pub hue_field: CategoryField,
    pub bin_count: u32,
    pub filter_enabled: bool,
    pub mass_range: (f64, f64),
    pub bill_depth_range: Option<(f64, f64)>,
    pub bill_length_range: Option<(f64, f64)>,
    pub sex_set: BTreeSet<Sex>,
    pub species_set: BTreeSet<Species>,
    pub island_set: BTreeSet<Island>,
    pub show_table: bool,
}

impl Parameters {
    /// Validate against the schema: range pairs ordered, bin count in bounds.
    ///
    /// UI widgets guarantee these by construction; non-UI writers (REST, CLI)
    /// go through this before a cycle runs.
    pub fn validate(&self, schema: &ParamSchema) -> Result<()> {
        let (lo, hi) = schema.bin_bounds;
        if self.bin_count < lo || self.bin_count > hi {
            return Err(PengvizError::ParamError(format!(
                "bin_count {} outside [{}, {}]",
                self.bin_count, lo, hi
            )));
        }
        check_range("mass_range", self.mass_range)?;
        if let Some(r) = self.bill_depth_range {
            check_range("bill_depth_range", r)?;
        }
        if let Some(r) = self.bill_length_range {
            check_range("bill_length_range", r)?;
        }
        if schema.bill_depth_bounds.is_none() && self.bill_depth_range.is_some() {
            return Err(PengvizError::ParamError(
                "bill_depth_range is not declared by this schema".to_string(),
            ));
        }
        if schema.bill_length_bounds.is_none() && self.bill_length_range.is_some() {
            return Err(PengvizError::ParamError(
                "bill_length_range is not declared by this schema".to_string(),
            ));
        }
        Ok(())
    }

    /// Fields of `self` that differ from `other`, in declaration order.
    ///
    /// Drives the dependency graph: a cycle recomputes only the dependents
    /// of the returned fields.
    pub fn diff(&self, other: &Parameters) -> Vec<Param> {
        let mut changed = Vec::new();
        if self.plot_type != other.plot_type {
            changed.push(Param::PlotType);
        }
        if self.x_field != other.x_field {
            changed.push(Param::XField);
        }
        if self.y_field != other.y_field {
            changed.push(Param::YField);
        }
        if self.hue_field != other.hue_field {
            changed.push(Param::HueField);
        }
        if self.bin_count != other.bin_count {
            changed.push(Param::BinCount);
        }
        if self.filter_enabled != other.filter_enabled {
            changed.push(Param::FilterEnabled);
        }
        if self.mass_range != other.mass_range {
            changed.push(Param::MassRange);
        }
        if self.bill_depth_range != other.bill_depth_range {
            changed.push(Param::BillDepthRange);
        }
        if self.bill_length_range != other.bill_length_range {
            changed.push(Param::BillLengthRange);
        }
        if self.sex_set != other.sex_set {
            changed.push(Param::SexSet);
        }
        if self.species_set != other.species_set {
            changed.push(Param::SpeciesSet);
        }
        if self.island_set != other.island_set {
            changed.push(Param::IslandSet);
        }
        if self.show_table != other.show_table {
            changed.push(Param::ShowTable);
        }
        changed
    }
}

fn check_range(name: &str, (min, max): (f64, f64)) -> Result<()> {
    if min <= max {
        Ok(())
    } else {
        Err(PengvizError::ParamError(format!(
            "{}: min {} exceeds max {}",
            name, min, max
        )))
    }
}

// =============================================================================
// Parameter Identifiers
// =============================================================================

/// Identifier for one parameter store field, used by the dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Param {
    PlotType,
    XField,
    YField,
    HueField,
    BinCount,
    FilterEnabled,
    MassRange,
    BillDepthRange,
    BillLengthRange,
    SexSet,
    SpeciesSet,
    IslandSet,
    ShowTable,
}

// =============================================================================
// Schema
// =============================================================================

/// Kind of control a parameter is bound to, for hosting-layer introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Choice,
    Toggle,
    Count,
    Range,
    CategorySet,
}

/// One declared parameter: identifier, control kind, and numeric bounds
/// where applicable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamDef {
    pub param: Param,
    pub kind: ParamKind,
    pub label: &'static str,
    /// Slider bounds for ranges/counts, `None` for everything else.
    pub bounds: Option<(f64, f64)>,
}

/// Declared parameter surface of one dashboard configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSchema {
    /// Inclusive bounds for `bin_count`.
    pub bin_bounds: (u32, u32),
    pub default_bins: u32,
    /// Slider bounds (and defaults) for the body-mass range.
    pub mass_bounds: (f64, f64),
    /// `Some` when the configuration carries a bill-depth range slider.
    pub bill_depth_bounds: Option<(f64, f64)>,
    /// `Some` when the configuration carries a bill-length range slider.
    pub bill_length_bounds: Option<(f64, f64)>,
}

impl ParamSchema {
    /// Configuration with the full filter surface: mass, bill depth and
    /// bill length sliders, one shared bin count.
    pub fn with_bill_filters() -> Self {
        Self {
            bin_bounds: (5, 50),
            default_bins: 20,
            mass_bounds: (2000.0, 6000.0),
            bill_depth_bounds: Some((10.0, 25.0)),
            bill_length_bounds: Some((30.0, 60.0)),
        }
    }

    /// Configuration without the bill sliders; only the mass range and the
    /// category sets filter.
    pub fn mass_only() -> Self {
        Self {
            bill_depth_bounds: None,
            bill_length_bounds: None,
            ..Self::with_bill_filters()
        }
    }

    /// Default parameter values for this configuration: filtering on, every
    /// category selected, every declared range wide open.
    pub fn defaults(&self) -> Parameters {
        Parameters {
            plot_type: PlotType::Scatterplot,
            x_field: NumericField::BillLengthMm,
            y_field: NumericField::BillDepthMm,
            hue_field: CategoryField::Species,
            bin_count: self.default_bins,
            filter_enabled: true,
            mass_range: self.mass_bounds,
            bill_depth_range: self.bill_depth_bounds,
            bill_length_range: self.bill_length_bounds,
            sex_set: Sex::ALL.into_iter().collect(),
            species_set: Species::ALL.into_iter().collect(),
            island_set: Island::ALL.into_iter().collect(),
            show_table: false,
        }
    }

    /// Declared parameter definitions, for hosting layers that build their
    /// controls from the schema.
    pub fn defs(&self) -> Vec<ParamDef> {
        let mut defs = vec![
            ParamDef {
                param: Param::PlotType,
                kind: ParamKind::Choice,
                label: "Plot Type",
                bounds: None,
            },
            ParamDef {
                param: Param::XField,
                kind: ParamKind::Choice,
                label: "X-axis (all plots)",
                bounds: None,
            },
            ParamDef {
                param: Param::YField,
                kind: ParamKind::Choice,
                label: "Scatterplot Y-axis",
                bounds: None,
            },
            ParamDef {
                param: Param::HueField,
                kind: ParamKind::Choice,
                label: "Hue Control",
                bounds: None,
            },
            ParamDef {
                param: Param::BinCount,
                kind: ParamKind::Count,
                label: "Number of bins (histogram)",
                bounds: Some((self.bin_bounds.0 as f64, self.bin_bounds.1 as f64)),
            },
            ParamDef {
                param: Param::FilterEnabled,
                kind: ParamKind::Toggle,
                label: "Filter Data",
                bounds: None,
            },
            ParamDef {
                param: Param::MassRange,
                kind: ParamKind::Range,
                label: "Body Mass (g)",
                bounds: Some(self.mass_bounds),
            },
        ];
        if let Some(bounds) = self.bill_depth_bounds {
            defs.push(ParamDef {
                param: Param::BillDepthRange,
                kind: ParamKind::Range,
                label: "Bill Depth (mm)",
                bounds: Some(bounds),
            });
        }
        if let Some(bounds) = self.bill_length_bounds {
            defs.push(ParamDef {
                param: Param::BillLengthRange,
                kind: ParamKind::Range,
                label: "Bill Length (mm)",
                bounds: Some(bounds),
            });
        }
        defs.extend([
            ParamDef {
                param: Param::SexSet,
                kind: ParamKind::CategorySet,
                label: "Sex",
                bounds: None,
            },
            ParamDef {
                param: Param::SpeciesSet,
                kind: ParamKind::CategorySet,
                label: "Species",
                bounds: None,
            },
            ParamDef {
                param: Param::IslandSet,
                kind: ParamKind::CategorySet,
                label: "Island",
                bounds: None,
            },
            ParamDef {
                param: Param::ShowTable,
                kind: ParamKind::Toggle,
                label: "Switch on to show a data table",
                bounds: None,
            },
        ]);
        defs
    }
}

impl Default for ParamSchema {
    fn default() -> Self {
        Self::with_bill_filters()
    }
}
