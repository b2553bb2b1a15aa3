/*!
# pengviz - Reactive Penguin Dashboard Core

A reactive data-exploration core for a small tabular dataset of penguin
morphological measurements. User-controlled parameters feed one shared
filtering pass whose result fans out to independent derived views: a row
count, three statistic texts, two chart renderings, a data table and a
correlation heatmap. Every view stays consistent with the current parameter
state, and a cycle recomputes only what actually changed.

## Architecture

- [`dataset`] - typed records and the immutable, injected dataset
- [`params`] - the parameter store and the declared parameter schema
- [`filter`] - the pure filter engine, memoized per reactive cycle
- [`reactive`] - explicit dependency graph and per-cycle evaluation plan
- [`view`] - the derived view set (stats, charts, table, heatmap)
- [`dashboard`] - orchestration: one update, one cycle, cached outputs

Rendering, widget toolkits and the browser transport are external
collaborators: the views emit well-formed values and Vega-Lite JSON specs,
nothing more.

## Example

```rust,ignore
use pengviz::{Dashboard, ParamSchema, sample_dataset};

let mut dash = Dashboard::new(sample_dataset(), ParamSchema::with_bill_filters())?;
dash.update_with(|p| p.mass_range = (4000.0, 6000.0))?;
println!("{}", dash.outputs().count_text);
```
*/

pub mod dashboard;
pub mod dataset;
pub mod filter;
pub mod params;
pub mod reactive;
pub mod view;

// Re-export key types for convenience
pub use dashboard::{Dashboard, Outputs};
pub use dataset::{sample_dataset, CategoryField, Dataset, NumericField, Record};
pub use filter::{compute_filtered, FilteredDataset};
pub use params::{Param, ParamSchema, Parameters, PlotType};
pub use reactive::{DependencyGraph, EvalPlan};
pub use view::ViewId;

/// Main library error type
#[derive(thiserror::Error, Debug)]
pub enum PengvizError {
    #[error("Dataset error: {0}")]
    DatasetError(String),

    #[error("Parameter error: {0}")]
    ParamError(String),

    #[error("View error: {0}")]
    ViewError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type Result<T> = std::result::Result<T, PengvizError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::dataset::{Island, Sex, Species};
    use crate::view::stats::{stat_text, StatSlot};
    use crate::view::{count, count_text};

    /// The three-record dataset the acceptance scenarios are written
    /// against: one Adelie, one Gentoo, one Chinstrap.
    fn scenario_dataset() -> Dataset {
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
    fn test_scenario_a_defaults_keep_everything() {
        let dash = Dashboard::new(scenario_dataset(), ParamSchema::with_bill_filters()).unwrap();
        assert!(dash.params().filter_enabled);
        assert_eq!(dash.params().mass_range, (2000.0, 6000.0));
        assert_eq!(dash.filtered().len(), 3);
        assert_eq!(dash.outputs().count, 3);
        assert_eq!(dash.outputs().count_text, "3 penguins");
    }

    #[test]
    fn test_scenario_b_gentoo_only() {
        let mut dash =
            Dashboard::new(scenario_dataset(), ParamSchema::with_bill_filters()).unwrap();
        dash.update_with(|p| p.species_set = [Species::Gentoo].into_iter().collect())
            .unwrap();

        assert_eq!(dash.filtered().len(), 1);
        assert_eq!(dash.filtered().records()[0].species, Species::Gentoo);
        assert_eq!(
            dash.outputs().stat_first,
            "Average bill length: 46.1 mm"
        );
    }

    #[test]
    fn test_scenario_c_mass_range_excludes_light_birds() {
        let mut dash =
            Dashboard::new(scenario_dataset(), ParamSchema::with_bill_filters()).unwrap();
        dash.update_with(|p| p.mass_range = (4000.0, 6000.0)).unwrap();

        let records = dash.filtered().records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body_mass_g, 4500.0);
    }

    #[test]
    fn test_scenario_d_empty_species_set() {
        let mut dash =
            Dashboard::new(scenario_dataset(), ParamSchema::with_bill_filters()).unwrap();
        dash.update_with(|p| p.species_set.clear()).unwrap();

        assert_eq!(dash.outputs().count, 0);
        assert_eq!(dash.outputs().count_text, "0 penguins");
        // Heatmap entries are the NaN sentinel: JSON null cells, no failure.
        for cell in dash.outputs().heatmap["data"]["values"].as_array().unwrap() {
            assert!(cell["correlation"].is_null());
        }
    }

    #[test]
    fn test_scenario_e_histogram_mass_range_text() {
        let mut dash =
            Dashboard::new(scenario_dataset(), ParamSchema::with_bill_filters()).unwrap();
        dash.update_with(|p| {
            p.plot_type = PlotType::Histogram;
            p.x_field = NumericField::BodyMassG;
        })
        .unwrap();

        assert_eq!(
            dash.outputs().stat_third,
            "Range of body mass: 3750.0 g - 4500.0 g"
        );
    }

    #[test]
    fn test_filter_disabled_is_identity_for_any_parameters() {
        let ds = scenario_dataset();
        let schema = ParamSchema::with_bill_filters();
        let mut params = schema.defaults();
        params.filter_enabled = false;
        params.species_set.clear();
        params.sex_set.clear();
        params.mass_range = (0.0, 0.0);
        params.bill_depth_range = Some((0.0, 0.0));

        let filtered = compute_filtered(&ds, &params);
        assert_eq!(filtered.records(), ds.records());
    }

    #[test]
    fn test_every_surviving_record_satisfies_all_predicates() {
        let ds = scenario_dataset();
        let schema = ParamSchema::with_bill_filters();
        let mut params = schema.defaults();
        params.mass_range = (3700.0, 4400.0);
        params.island_set = [Island::Biscoe].into_iter().collect();

        let filtered = compute_filtered(&ds, &params);
        for r in filtered.records() {
            assert!(params.species_set.contains(&r.species));
            assert!(r.sex.map(|s| params.sex_set.contains(&s)).unwrap_or(false));
            assert!(params.island_set.contains(&r.island));
            assert!(r.body_mass_g >= 3700.0 && r.body_mass_g <= 4400.0);
        }
        // Everything excluded violates at least one predicate.
        for r in ds.records() {
            if filtered.records().contains(r) {
                continue;
            }
            let in_island = params.island_set.contains(&r.island);
            let in_mass = r.body_mass_g >= 3700.0 && r.body_mass_g <= 4400.0;
            assert!(!in_island || !in_mass);
        }
    }

    #[test]
    fn test_views_share_one_filter_result() {
        let mut dash =
            Dashboard::new(scenario_dataset(), ParamSchema::with_bill_filters()).unwrap();
        dash.update_with(|p| p.species_set = [Species::Gentoo].into_iter().collect())
            .unwrap();

        let filtered = dash.filtered();
        assert_eq!(count(filtered), 1);
        assert_eq!(count_text(filtered), "1 penguins");
        assert_eq!(
            stat_text(StatSlot::First, filtered, dash.params()),
            "Average bill length: 46.1 mm"
        );
        // Chart data is drawn from the same single row.
        let values = dash.outputs().widget_chart["data"]["values"]
            .as_array()
            .unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0]["species"], "Gentoo");
    }
}
