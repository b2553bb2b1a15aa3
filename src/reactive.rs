//! Reactive dependency graph
//!
//! Replaces implicit re-invocation callbacks with an explicit graph: the
//! filter node declares which parameters it reads, and every derived view
//! declares which parameters it reads plus whether it consumes the filtered
//! dataset. Given the set of parameters that changed in a cycle, the graph
//! produces an [`EvalPlan`]: whether the filter must be recomputed (at most
//! once) and which views must be re-evaluated, in a fixed topological order
//! (filter first, then views in declaration order).

use crate::params::Param;
use crate::view::ViewId;

/// Parameters the filter engine reads.
pub const FILTER_PARAMS: &[Param] = &[
    Param::FilterEnabled,
    Param::MassRange,
    Param::BillDepthRange,
    Param::BillLengthRange,
    Param::SexSet,
    Param::SpeciesSet,
    Param::IslandSet,
];

/// Declared inputs of one derived view.
#[derive(Debug, Clone)]
struct ViewNode {
    id: ViewId,
    params: &'static [Param],
    needs_filtered: bool,
}

/// Static dependency declarations for the whole view set.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: Vec<ViewNode>,
}

/// What one reactive cycle has to recompute.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalPlan {
    /// The filter engine must run (its inputs changed).
    pub recompute_filter: bool,
    /// Views to re-evaluate, in evaluation order.
    pub views: Vec<ViewId>,
}

impl EvalPlan {
    pub fn is_noop(&self) -> bool {
        !self.recompute_filter && self.views.is_empty()
    }
}

impl DependencyGraph {
    /// Graph for the standard view set: count, the three stat texts, the two
    /// chart renderings, the table and the heatmap.
    pub fn standard() -> Self {
        const CHART_PARAMS: &[Param] = &[
            Param::PlotType,
            Param::XField,
            Param::YField,
            Param::HueField,
            Param::BinCount,
            Param::FilterEnabled,
        ];
        const STAT_PARAMS: &[Param] = &[Param::PlotType, Param::XField];

        Self {
            nodes: vec![
                ViewNode {
                    id: ViewId::Count,
                    params: &[],
                    needs_filtered: true,
                },
                ViewNode {
                    id: ViewId::StatFirst,
                    params: STAT_PARAMS,
                    needs_filtered: true,
                },
                ViewNode {
                    id: ViewId::StatSecond,
                    params: STAT_PARAMS,
                    needs_filtered: true,
                },
                ViewNode {
                    id: ViewId::StatThird,
                    params: STAT_PARAMS,
                    needs_filtered: true,
                },
                ViewNode {
                    id: ViewId::ImageChart,
                    params: CHART_PARAMS,
                    needs_filtered: true,
                },
                ViewNode {
                    id: ViewId::WidgetChart,
                    params: CHART_PARAMS,
                    needs_filtered: true,
                },
                ViewNode {
                    id: ViewId::Table,
                    params: &[Param::ShowTable],
                    needs_filtered: true,
                },
                ViewNode {
                    id: ViewId::Heatmap,
                    params: &[],
                    needs_filtered: true,
                },
            ],
        }
    }

    /// Build the evaluation plan for one set of changed parameters.
    ///
    /// A view is scheduled when it reads a changed parameter directly, or
    /// when it consumes the filtered dataset and a filter input changed.
    pub fn plan(&self, changed: &[Param]) -> EvalPlan {
        let filter_dirty = changed.iter().any(|p| FILTER_PARAMS.contains(p));
        let views = self
            .nodes
            .iter()
            .filter(|node| {
                (node.needs_filtered && filter_dirty)
                    || node.params.iter().any(|p| changed.contains(p))
            })
            .map(|node| node.id)
            .collect();

        EvalPlan {
            recompute_filter: filter_dirty,
            views,
        }
    }

    /// Plan for the initial cycle: everything is computed once.
    pub fn plan_all(&self) -> EvalPlan {
        EvalPlan {
            recompute_filter: true,
            views: self.nodes.iter().map(|n| n.id).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_input_invalidates_all_consumers() {
        let graph = DependencyGraph::standard();
        let plan = graph.plan(&[Param::SpeciesSet]);
        assert!(plan.recompute_filter);
        // Every view consumes the filtered dataset.
        assert_eq!(plan.views.len(), 8);
    }

    #[test]
    fn test_show_table_only_touches_table() {
        let graph = DependencyGraph::standard();
        let plan = graph.plan(&[Param::ShowTable]);
        assert!(!plan.recompute_filter);
        assert_eq!(plan.views, vec![ViewId::Table]);
    }

    #[test]
    fn test_bin_count_only_touches_charts() {
        let graph = DependencyGraph::standard();
        let plan = graph.plan(&[Param::BinCount]);
        assert!(!plan.recompute_filter);
        assert_eq!(plan.views, vec![ViewId::ImageChart, ViewId::WidgetChart]);
    }

    #[test]
    fn test_plot_type_touches_stats_and_charts() {
        let graph = DependencyGraph::standard();
        let plan = graph.plan(&[Param::PlotType]);
        assert!(!plan.recompute_filter);
        assert_eq!(
            plan.views,
            vec![
                ViewId::StatFirst,
                ViewId::StatSecond,
                ViewId::StatThird,
                ViewId::ImageChart,
                ViewId::WidgetChart,
            ]
        );
    }

    #[test]
    fn test_no_change_is_noop() {
        let graph = DependencyGraph::standard();
        assert!(graph.plan(&[]).is_noop());
    }

    #[test]
    fn test_filter_runs_at_most_once_per_plan() {
        let graph = DependencyGraph::standard();
        // Several filter inputs changing still schedule one filter pass.
        let plan = graph.plan(&[Param::SpeciesSet, Param::MassRange, Param::SexSet]);
        assert!(plan.recompute_filter);
        assert_eq!(plan.views.len(), 8);
    }
}
