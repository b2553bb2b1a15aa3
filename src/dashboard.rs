//! Dashboard orchestration
//!
//! [`Dashboard`] owns the immutable dataset, the parameter store, the
//! dependency graph, the per-cycle memoized filter result and the cached
//! view outputs. A parameter update runs exactly one reactive cycle:
//! validate, diff, plan, recompute the filter at most once, re-evaluate
//! only the views whose inputs changed, and keep every other cached output
//! as-is. Cycles are synchronous and run to completion; a caller that
//! coalesces rapid updates simply submits the latest parameter state.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::dataset::Dataset;
use crate::filter::{compute_filtered, FilteredDataset};
use crate::params::{ParamSchema, Parameters};
use crate::reactive::{DependencyGraph, EvalPlan};
use crate::view::chart::{ChartSpec, ChartTarget};
use crate::view::heatmap::CorrelationMatrix;
use crate::view::stats::{stat_text, StatSlot};
use crate::view::table::TableView;
use crate::view::{count, count_text, ViewId};
use crate::Result;

/// Cached outputs of every derived view.
#[derive(Debug, Clone, Serialize)]
pub struct Outputs {
    pub count: usize,
    pub count_text: String,
    pub stat_first: String,
    pub stat_second: String,
    pub stat_third: String,
    pub image_chart: Value,
    pub widget_chart: Value,
    pub table: Value,
    pub heatmap: Value,
}

/// The reactive dashboard core.
pub struct Dashboard {
    dataset: Dataset,
    schema: ParamSchema,
    params: Parameters,
    graph: DependencyGraph,
    filtered: FilteredDataset,
    outputs: Outputs,
}

impl Dashboard {
    /// Build a dashboard over an injected dataset with the schema's default
    /// parameters, running the initial evaluation cycle.
    pub fn new(dataset: Dataset, schema: ParamSchema) -> Result<Self> {
        let params = schema.defaults();
        let graph = DependencyGraph::standard();
        let filtered = compute_filtered(&dataset, &params);

        let mut dashboard = Self {
            outputs: Outputs {
                count: 0,
                count_text: String::new(),
                stat_first: String::new(),
                stat_second: String::new(),
                stat_third: String::new(),
                image_chart: Value::Null,
                widget_chart: Value::Null,
                table: Value::Null,
                heatmap: Value::Null,
            },
            dataset,
            schema,
            params,
            graph: graph.clone(),
            filtered,
        };
        let plan = graph.plan_all();
        dashboard.evaluate(&plan)?;
        Ok(dashboard)
    }

    /// Apply a full parameter state and run one reactive cycle.
    ///
    /// Returns the evaluation plan that ran, which callers can inspect to
    /// see what was recomputed.
    pub fn update(&mut self, next: Parameters) -> Result<EvalPlan> {
        next.validate(&self.schema)?;
        let changed = next.diff(&self.params);
        let plan = self.graph.plan(&changed);
        debug!(changed = changed.len(), views = plan.views.len(), "reactive cycle");
        self.params = next;
        if plan.recompute_filter {
            self.filtered = compute_filtered(&self.dataset, &self.params);
        }
        self.evaluate(&plan)?;
        Ok(plan)
    }

    /// Convenience wrapper: mutate a copy of the current parameters and
    /// apply it as one cycle.
    pub fn update_with(&mut self, f: impl FnOnce(&mut Parameters)) -> Result<EvalPlan> {
        let mut next = self.params.clone();
        f(&mut next);
        self.update(next)
    }

    fn evaluate(&mut self, plan: &EvalPlan) -> Result<()> {
        for view in &plan.views {
            match view {
                ViewId::Count => {
                    self.outputs.count = count(&self.filtered);
                    self.outputs.count_text = count_text(&self.filtered);
                }
                ViewId::StatFirst => {
                    self.outputs.stat_first =
                        stat_text(StatSlot::First, &self.filtered, &self.params);
                }
                ViewId::StatSecond => {
                    self.outputs.stat_second =
                        stat_text(StatSlot::Second, &self.filtered, &self.params);
                }
                ViewId::StatThird => {
                    self.outputs.stat_third =
                        stat_text(StatSlot::Third, &self.filtered, &self.params);
                }
                ViewId::ImageChart => {
                    self.outputs.image_chart = ChartSpec::from_params(&self.params)
                        .to_vegalite(ChartTarget::Image, &self.filtered);
                }
                ViewId::WidgetChart => {
                    self.outputs.widget_chart = ChartSpec::from_params(&self.params)
                        .to_vegalite(ChartTarget::Widget, &self.filtered);
                }
                ViewId::Table => {
                    self.outputs.table =
                        TableView::project(&self.filtered, &self.params)?.to_json();
                }
                ViewId::Heatmap => {
                    self.outputs.heatmap = CorrelationMatrix::compute(&self.filtered).to_vegalite();
                }
            }
        }
        Ok(())
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn schema(&self) -> &ParamSchema {
        &self.schema
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// The memoized filter result of the most recent cycle.
    pub fn filtered(&self) -> &FilteredDataset {
        &self.filtered
    }

    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::loader::sample_dataset;
    use crate::dataset::Species;
    use crate::params::{Param, PlotType};

    #[test]
    fn test_initial_cycle_populates_all_outputs() {
        let dash = Dashboard::new(sample_dataset(), ParamSchema::with_bill_filters()).unwrap();
        let out = dash.outputs();
        // Default sex filter drops the one unrecorded-sex row.
        assert_eq!(out.count, 11);
        assert_eq!(out.count_text, "11 penguins");
        assert!(out.stat_first.starts_with("Average bill length:"));
        assert!(out.image_chart.is_object());
        assert!(out.widget_chart.is_object());
        assert!(out.table.is_object());
        assert!(out.heatmap.is_object());
    }

    #[test]
    fn test_species_update_recomputes_dependents() {
        let mut dash = Dashboard::new(sample_dataset(), ParamSchema::with_bill_filters()).unwrap();
        let plan = dash
            .update_with(|p| p.species_set = [Species::Gentoo].into_iter().collect())
            .unwrap();
        assert!(plan.recompute_filter);
        assert_eq!(dash.outputs().count, 3);
        assert_eq!(dash.filtered().len(), 3);
    }

    #[test]
    fn test_show_table_does_not_rerun_filter() {
        let mut dash = Dashboard::new(sample_dataset(), ParamSchema::with_bill_filters()).unwrap();
        let chart_before = dash.outputs().image_chart.clone();
        let plan = dash.update_with(|p| p.show_table = true).unwrap();

        assert!(!plan.recompute_filter);
        assert_eq!(plan.views, vec![ViewId::Table]);
        // Untouched cached outputs survive the cycle unchanged.
        assert_eq!(dash.outputs().image_chart, chart_before);
        assert_eq!(dash.outputs().table["mode"], "table");
    }

    #[test]
    fn test_noop_update_runs_nothing() {
        let mut dash = Dashboard::new(sample_dataset(), ParamSchema::with_bill_filters()).unwrap();
        let params = dash.params().clone();
        let plan = dash.update(params).unwrap();
        assert!(plan.is_noop());
    }

    #[test]
    fn test_invalid_update_rejected_without_side_effects() {
        let mut dash = Dashboard::new(sample_dataset(), ParamSchema::with_bill_filters()).unwrap();
        let count_before = dash.outputs().count;
        let result = dash.update_with(|p| p.mass_range = (5000.0, 2000.0));
        assert!(result.is_err());
        assert_eq!(dash.outputs().count, count_before);
        assert_eq!(dash.params().mass_range, (2000.0, 6000.0));
    }

    #[test]
    fn test_plot_type_switch_updates_stats_and_charts() {
        let mut dash = Dashboard::new(sample_dataset(), ParamSchema::with_bill_filters()).unwrap();
        dash.update_with(|p| p.plot_type = PlotType::Histogram)
            .unwrap();
        assert!(dash.outputs().stat_second.starts_with("Median"));
        assert_eq!(dash.outputs().widget_chart["title"], "Histogram of Penguin Data");
    }

    #[test]
    fn test_coalesced_update_observes_latest_state_only() {
        let mut dash = Dashboard::new(sample_dataset(), ParamSchema::with_bill_filters()).unwrap();
        // One submitted state carrying several changes runs one cycle.
        let plan = dash
            .update_with(|p| {
                p.plot_type = PlotType::Histogram;
                p.bin_count = 30;
                p.show_table = true;
            })
            .unwrap();
        assert_eq!(
            plan.views
                .iter()
                .filter(|v| matches!(v, ViewId::ImageChart))
                .count(),
            1
        );
        assert_eq!(dash.params().bin_count, 30);
    }

    #[test]
    fn test_update_diffs_against_current_state() {
        let mut dash = Dashboard::new(sample_dataset(), ParamSchema::with_bill_filters()).unwrap();
        dash.update_with(|p| p.show_table = true).unwrap();
        // Re-submitting the same value is a no-op the second time.
        let plan = dash.update_with(|p| p.show_table = true).unwrap();
        assert!(plan.is_noop());
        let mut next = dash.params().clone();
        next.show_table = false;
        let plan = dash.update(next).unwrap();
        assert_eq!(plan.views, vec![ViewId::Table]);
        let changed = dash.params().diff(&ParamSchema::with_bill_filters().defaults());
        assert_eq!(changed, vec![] as Vec<Param>);
    }
}
