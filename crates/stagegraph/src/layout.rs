//! The layered layout pipeline.
//!
//! [`Engine::calculate`] runs the phases in a fixed order over a validated
//! [`StageGraph`]:
//!
//! 1. Layering: cycle breaking and longest-path layers, per component.
//! 2. Ordering: barycenter crossing reduction inside each layer.
//! 3. Coordinates: centred layers, stacked components, padding.
//! 4. Classification: edge kinds and attachment sides.
//!
//! Every phase is a pure function of its inputs, so the same graph and
//! configuration always give an identical [`LayoutResult`].

pub(crate) mod coordinates;
pub(crate) mod layering;
pub(crate) mod ordering;

use log::{debug, info};

use crate::{
    classify::EdgeClassifier,
    config::AppConfig,
    result::{LayoutResult, LayoutStats, PositionedStage},
    structure::StageGraph,
};

use layering::Layering;
use ordering::Ordering;

/// Runs the layout phases with one configuration.
#[derive(Debug, Clone)]
pub(crate) struct Engine<'a> {
    config: &'a AppConfig,
}

impl<'a> Engine<'a> {
    pub(crate) fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }

    pub(crate) fn calculate(&self, graph: &StageGraph) -> LayoutResult {
        let layout = self.config.layout();
        if graph.is_empty() {
            debug!("Empty graph, nothing to place");
            return LayoutResult::empty(layout.direction());
        }

        let layering = Layering::assign(graph);
        let ordering = Ordering::reduce(graph, &layering, layout.ordering_passes());
        let placement = coordinates::place(graph, &ordering, layout);

        let classifier =
            EdgeClassifier::new(graph, placement.positions(), layout, self.config.edges());
        let edges = classifier.classify_all(&layering);

        let size = layout.node_size();
        let nodes = graph
            .stages()
            .map(|(idx, stage)| {
                PositionedStage::new(
                    stage.id().clone(),
                    stage.label().to_owned(),
                    stage.description().map(str::to_owned),
                    stage.task_count(),
                    stage.is_initial(),
                    layering.component_of(idx),
                    layering.layer(idx),
                    ordering.order_in_layer(idx),
                    placement.positions()[idx.index()],
                    size,
                )
            })
            .collect();

        let component_count = layering.components().len();
        let layer_count = (0..component_count)
            .map(|component| layering.layer_count(component))
            .max()
            .unwrap_or(0);
        let stats = LayoutStats::new(
            layer_count,
            component_count,
            layering.feedback_count(),
            ordering.crossings(),
        );
        info!(
            layers = stats.layer_count(),
            components = stats.component_count(),
            crossings = stats.crossings();
            "Layout calculated"
        );

        LayoutResult::new(
            layout.direction(),
            nodes,
            edges,
            placement.bounding_box(),
            stats,
        )
    }
}
