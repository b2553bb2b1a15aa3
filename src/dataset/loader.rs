//! Dataset loading
//!
//! Reads the penguin measurements from CSV into a typed [`Dataset`] using
//! Polars. Rows with a missing species, island, or numeric measurement are
//! dropped at load time; a missing or unparseable sex is kept as `None` so
//! the filter can treat it as "never matches".

use polars::prelude::*;
use std::path::Path;

use super::{Dataset, Island, Record, Sex, Species};
use crate::{PengvizError, Result};

/// Load a dataset from a CSV file with the six expected columns.
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(200))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| PengvizError::DatasetError(format!("Failed to open {}: {}", path.display(), e)))?
        .finish()
        .map_err(|e| PengvizError::DatasetError(format!("Failed to read {}: {}", path.display(), e)))?;

    dataset_from_dataframe(&df)
}

/// Convert a DataFrame with the expected columns into a typed dataset.
///
/// Numeric columns are cast non-strictly to Float64, so literal "NA" entries
/// (which force string inference) become nulls and the row is dropped.
pub fn dataset_from_dataframe(df: &DataFrame) -> Result<Dataset> {
    let species = string_column(df, "species")?;
    let island = string_column(df, "island")?;
    let sex = string_column(df, "sex")?;
    let bill_length = float_column(df, "bill_length_mm")?;
    let bill_depth = float_column(df, "bill_depth_mm")?;
    let body_mass = float_column(df, "body_mass_g")?;
    let (bill_length, bill_depth, body_mass) =
        (bill_length.f64()?, bill_depth.f64()?, body_mass.f64()?);

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let sp = species.get(i).and_then(|s| s.parse::<Species>().ok());
        let is = island.get(i).and_then(|s| s.parse::<Island>().ok());
        let (bl, bd, bm) = (bill_length.get(i), bill_depth.get(i), body_mass.get(i));
        let (sp, is) = match (sp, is) {
            (Some(sp), Some(is)) => (sp, is),
            _ => continue,
        };
        let (bl, bd, bm) = match (bl, bd, bm) {
            (Some(bl), Some(bd), Some(bm)) => (bl, bd, bm),
            _ => continue,
        };
        records.push(Record {
            species: sp,
            island: is,
            sex: sex.get(i).and_then(|s| s.parse::<Sex>().ok()),
            bill_length_mm: bl,
            bill_depth_mm: bd,
            body_mass_g: bm,
        });
    }

    Ok(Dataset::from_records(records))
}

fn string_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    df.column(name)
        .map_err(|e| PengvizError::DatasetError(format!("Missing column '{}': {}", name, e)))?
        .str()
        .map_err(|e| PengvizError::DatasetError(format!("Column '{}' is not a string column: {}", name, e)))
}

fn float_column(df: &DataFrame, name: &str) -> Result<Series> {
    df.column(name)
        .map_err(|e| PengvizError::DatasetError(format!("Missing column '{}': {}", name, e)))?
        .cast(&DataType::Float64)
        .map_err(|e| PengvizError::DatasetError(format!("Column '{}' is not numeric: {}", name, e)))
}

impl std::convert::From<PolarsError> for PengvizError {
    fn from(e: PolarsError) -> Self {
        PengvizError::DatasetError(e.to_string())
    }
}

/// Small built-in dataset for demos and tests, one row per
/// species/island/sex combination observed in the source data.
pub fn sample_dataset() -> Dataset {
    let rows: [(Species, Island, Option<Sex>, f64, f64, f64); 12] = [
        (Species::Adelie, Island::Torgersen, Some(Sex::Male), 39.1, 18.7, 3750.0),
        (Species::Adelie, Island::Torgersen, Some(Sex::Female), 39.5, 17.4, 3800.0),
        (Species::Adelie, Island::Biscoe, Some(Sex::Female), 37.8, 18.3, 3400.0),
        (Species::Adelie, Island::Biscoe, Some(Sex::Male), 37.7, 18.7, 3600.0),
        (Species::Adelie, Island::Dream, Some(Sex::Male), 39.2, 21.1, 4150.0),
        (Species::Adelie, Island::Dream, None, 37.5, 18.9, 4475.0),
        (Species::Gentoo, Island::Biscoe, Some(Sex::Female), 46.1, 13.2, 4500.0),
        (Species::Gentoo, Island::Biscoe, Some(Sex::Male), 50.0, 16.3, 5700.0),
        (Species::Gentoo, Island::Biscoe, Some(Sex::Female), 48.7, 14.1, 4450.0),
        (Species::Chinstrap, Island::Dream, Some(Sex::Male), 49.0, 19.5, 3800.0),
        (Species::Chinstrap, Island::Dream, Some(Sex::Female), 46.5, 17.9, 3500.0),
        (Species::Chinstrap, Island::Dream, Some(Sex::Male), 52.0, 20.7, 4000.0),
    ];

    Dataset::from_records(
        rows.into_iter()
            .map(|(species, island, sex, bl, bd, bm)| Record {
                species,
                island,
                sex,
                bill_length_mm: bl,
                bill_depth_mm: bd,
                body_mass_g: bm,
            })
            .collect(),
    )
}
