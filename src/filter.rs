//! The filter engine
//!
//! `compute_filtered` is the single filtering function every derived view
//! consumes. It is pure: (dataset, parameters) in, filtered rows out. The
//! dashboard memoizes its result for the duration of one reactive cycle so
//! the views share one computation.

use crate::dataset::{Dataset, Record};
use crate::params::Parameters;

/// Sub-sequence of the dataset satisfying all active predicates.
///
/// Rows keep their original relative order (stable filter). Recomputed per
/// cycle, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredDataset {
    records: Vec<Record>,
}

impl FilteredDataset {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values of one numeric field across the filtered rows.
    pub fn column(&self, field: crate::dataset::NumericField) -> Vec<f64> {
        self.records.iter().map(|r| r.numeric(field)).collect()
    }
}

/// Apply the active filter predicates to the dataset.
///
/// With `filter_enabled` off this is the identity. Otherwise predicates are
/// conjunctive, applied in a fixed order for reproducibility: species, sex,
/// island, body mass, then the optional bill-depth and bill-length ranges
/// (skipped when the schema does not declare them). An empty category set
/// legitimately yields zero rows; a record with no recorded sex never
/// matches the sex predicate.
pub fn compute_filtered(dataset: &Dataset, params: &Parameters) -> FilteredDataset {
    if !params.filter_enabled {
        return FilteredDataset {
            records: dataset.records().to_vec(),
        };
    }

    let records = dataset
        .records()
        .iter()
        .filter(|r| matches(r, params))
        .cloned()
        .collect();

    FilteredDataset { records }
}

fn matches(record: &Record, params: &Parameters) -> bool {
    if !params.species_set.contains(&record.species) {
        return false;
    }
    match record.sex {
        Some(sex) if params.sex_set.contains(&sex) => {}
        _ => return false,
    }
    if !params.island_set.contains(&record.island) {
        return false;
    }
    if !in_range(record.body_mass_g, params.mass_range) {
        return false;
    }
    if let Some(range) = params.bill_depth_range {
        if !in_range(record.bill_depth_mm, range) {
            return false;
        }
    }
    if let Some(range) = params.bill_length_range {
        if !in_range(record.bill_length_mm, range) {
            return false;
        }
    }
    true
}

fn in_range(value: f64, (min, max): (f64, f64)) -> bool {
    value >= min && value <= max
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Island, Sex, Species};
    use crate::params::ParamSchema;

    fn three_records() -> Dataset {
        Dataset::from_records(vec![
            Record {
                species: Species::Adelie,
                island: Island::Biscoe,
                sex: Some(Sex::Male),
                bill_length_mm: 39.1,
                bill_depth_mm: 18.7,
                body_mass_g: 3750.0,
            },
            Record {
                species: Species::Gentoo,
                island: Island::Biscoe,
                sex: Some(Sex::Female),
                bill_length_mm: 46.1,
                bill_depth_mm: 13.2,
                body_mass_g: 4500.0,
            },
            Record {
                species: Species::Chinstrap,
                island: Island::Dream,
                sex: Some(Sex::Male),
                bill_length_mm: 49.0,
                bill_depth_mm: 19.5,
                body_mass_g: 3800.0,
            },
        ])
    }

    #[test]
    fn test_defaults_pass_everything() {
        // Scenario A: default parameters keep all three records.
        let ds = three_records();
        let params = ParamSchema::with_bill_filters().defaults();
        let filtered = compute_filtered(&ds, &params);
        assert_eq!(filtered.len(), 3);
        assert_eq!(filtered.records(), ds.records());
    }

    #[test]
    fn test_disabled_filter_is_identity() {
        let ds = three_records();
        let mut params = ParamSchema::with_bill_filters().defaults();
        params.filter_enabled = false;
        // Hostile range/set values must be ignored entirely.
        params.mass_range = (0.0, 1.0);
        params.species_set.clear();
        let filtered = compute_filtered(&ds, &params);
        assert_eq!(filtered.records(), ds.records());
    }

    #[test]
    fn test_species_subset() {
        // Scenario B: only Gentoo survives.
        let ds = three_records();
        let mut params = ParamSchema::with_bill_filters().defaults();
        params.species_set = [Species::Gentoo].into_iter().collect();
        let filtered = compute_filtered(&ds, &params);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.records()[0].species, Species::Gentoo);
    }

    #[test]
    fn test_mass_range_narrowing() {
        // Scenario C: [4000, 6000] excludes the Adelie and Chinstrap rows.
        let ds = three_records();
        let mut params = ParamSchema::with_bill_filters().defaults();
        params.mass_range = (4000.0, 6000.0);
        let filtered = compute_filtered(&ds, &params);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.records()[0].body_mass_g, 4500.0);
    }

    #[test]
    fn test_empty_set_yields_empty_result() {
        // Scenario D: an empty species set is zero rows, not an error.
        let ds = three_records();
        let mut params = ParamSchema::with_bill_filters().defaults();
        params.species_set.clear();
        let filtered = compute_filtered(&ds, &params);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_unrecorded_sex_never_matches() {
        let mut records = three_records().records().to_vec();
        records[0].sex = None;
        let ds = Dataset::from_records(records);
        let params = ParamSchema::with_bill_filters().defaults();
        let filtered = compute_filtered(&ds, &params);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_range_boundaries_inclusive() {
        let ds = three_records();
        let mut params = ParamSchema::with_bill_filters().defaults();
        params.mass_range = (3750.0, 4500.0);
        let filtered = compute_filtered(&ds, &params);
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn test_absent_bill_predicates_are_skipped() {
        let ds = three_records();
        let mut params = ParamSchema::mass_only().defaults();
        assert_eq!(params.bill_depth_range, None);
        // Would exclude every record if the predicate were active.
        params.mass_range = (2000.0, 6000.0);
        let filtered = compute_filtered(&ds, &params);
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn test_idempotent_and_stable_order() {
        let ds = three_records();
        let mut params = ParamSchema::with_bill_filters().defaults();
        params.mass_range = (3700.0, 4600.0);
        let a = compute_filtered(&ds, &params);
        let b = compute_filtered(&ds, &params);
        assert_eq!(a, b);
        let masses: Vec<f64> = a.records().iter().map(|r| r.body_mass_g).collect();
        assert_eq!(masses, vec![3750.0, 4500.0, 3800.0]);
    }

    #[test]
    fn test_narrowing_is_monotone() {
        let ds = three_records();
        let schema = ParamSchema::with_bill_filters();
        let mut params = schema.defaults();
        let mut last = compute_filtered(&ds, &params).len();
        for (lo, hi) in [(3000.0, 5000.0), (3700.0, 4600.0), (3760.0, 4490.0)] {
            params.mass_range = (lo, hi);
            let n = compute_filtered(&ds, &params).len();
            assert!(n <= last, "narrowing grew the result: {} -> {}", last, n);
            last = n;
        }
    }
}
