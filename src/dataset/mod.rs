//! Dataset types for the penguin dashboard
//!
//! This module defines the typed row model the reactive core operates on:
//! the categorical enums, the numeric measurement fields, a [`Record`] per
//! observation, and the immutable [`Dataset`] loaded once at startup.
//!
//! The dataset is constructed explicitly (from CSV via [`loader`], or from
//! records directly) and injected into consumers; there is no module-level
//! shared state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod loader;

pub use loader::{load_csv, sample_dataset};

// =============================================================================
// Categorical Values
// =============================================================================

/// Penguin species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    Adelie,
    Gentoo,
    Chinstrap,
}

impl Species {
    /// All known species, in display order.
    pub const ALL: [Species; 3] = [Species::Adelie, Species::Gentoo, Species::Chinstrap];
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Species::Adelie => "Adelie",
            Species::Gentoo => "Gentoo",
            Species::Chinstrap => "Chinstrap",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Species {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Adelie" => Ok(Species::Adelie),
            "Gentoo" => Ok(Species::Gentoo),
            "Chinstrap" => Ok(Species::Chinstrap),
            other => Err(format!("Unknown species: '{}'", other)),
        }
    }
}

/// Island where the observation was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Island {
    Biscoe,
    Dream,
    Torgersen,
}

impl Island {
    /// All known islands, in display order.
    pub const ALL: [Island; 3] = [Island::Biscoe, Island::Dream, Island::Torgersen];
}

impl fmt::Display for Island {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Island::Biscoe => "Biscoe",
            Island::Dream => "Dream",
            Island::Torgersen => "Torgersen",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Island {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Biscoe" => Ok(Island::Biscoe),
            "Dream" => Ok(Island::Dream),
            "Torgersen" => Ok(Island::Torgersen),
            other => Err(format!("Unknown island: '{}'", other)),
        }
    }
}

/// Recorded sex of the penguin. May be absent in the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Both sexes, in display order.
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" | "male" | "MALE" => Ok(Sex::Male),
            "Female" | "female" | "FEMALE" => Ok(Sex::Female),
            other => Err(format!("Unknown sex: '{}'", other)),
        }
    }
}

// =============================================================================
// Field Identifiers
// =============================================================================

/// The three numeric measurement columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericField {
    #[serde(rename = "bill_length_mm")]
    BillLengthMm,
    #[serde(rename = "bill_depth_mm")]
    BillDepthMm,
    #[serde(rename = "body_mass_g")]
    BodyMassG,
}

impl NumericField {
    /// All numeric fields, in the order they appear in the table and heatmap.
    pub const ALL: [NumericField; 3] = [
        NumericField::BillLengthMm,
        NumericField::BillDepthMm,
        NumericField::BodyMassG,
    ];

    /// Column name as it appears in the source data.
    pub fn column_name(&self) -> &'static str {
        match self {
            NumericField::BillLengthMm => "bill_length_mm",
            NumericField::BillDepthMm => "bill_depth_mm",
            NumericField::BodyMassG => "body_mass_g",
        }
    }

    /// Human-readable label ("bill length", "body mass", ...).
    pub fn label(&self) -> &'static str {
        match self {
            NumericField::BillLengthMm => "bill length",
            NumericField::BillDepthMm => "bill depth",
            NumericField::BodyMassG => "body mass",
        }
    }

    /// Measurement unit suffix.
    pub fn unit(&self) -> &'static str {
        match self {
            NumericField::BillLengthMm | NumericField::BillDepthMm => "mm",
            NumericField::BodyMassG => "g",
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

impl FromStr for NumericField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bill_length_mm" => Ok(NumericField::BillLengthMm),
            "bill_depth_mm" => Ok(NumericField::BillDepthMm),
            "body_mass_g" => Ok(NumericField::BodyMassG),
            other => Err(format!("Unknown numeric field: '{}'", other)),
        }
    }
}

/// The categorical columns usable as a hue/grouping control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryField {
    Sex,
    Species,
    Island,
}

impl CategoryField {
    /// Column name as it appears in the source data.
    pub fn column_name(&self) -> &'static str {
        match self {
            CategoryField::Sex => "sex",
            CategoryField::Species => "species",
            CategoryField::Island => "island",
        }
    }
}

impl fmt::Display for CategoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

impl FromStr for CategoryField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sex" => Ok(CategoryField::Sex),
            "species" => Ok(CategoryField::Species),
            "island" => Ok(CategoryField::Island),
            other => Err(format!("Unknown category field: '{}'", other)),
        }
    }
}

// =============================================================================
// Records
// =============================================================================

/// One observation row. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub species: Species,
    pub island: Island,
    /// Absent in some source rows; such rows never match a sex filter.
    pub sex: Option<Sex>,
    pub bill_length_mm: f64,
    pub bill_depth_mm: f64,
    pub body_mass_g: f64,
}

impl Record {
    /// Value of a numeric measurement field.
    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::BillLengthMm => self.bill_length_mm,
            NumericField::BillDepthMm => self.bill_depth_mm,
            NumericField::BodyMassG => self.body_mass_g,
        }
    }

    /// Display value of a categorical field. `None` when sex is unrecorded.
    pub fn category(&self, field: CategoryField) -> Option<String> {
        match field {
            CategoryField::Sex => self.sex.map(|s| s.to_string()),
            CategoryField::Species => Some(self.species.to_string()),
            CategoryField::Island => Some(self.island.to_string()),
        }
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// Ordered, immutable sequence of records, loaded once at process start.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset from records, preserving their order.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
