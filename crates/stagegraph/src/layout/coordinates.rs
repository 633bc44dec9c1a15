//! Coordinate assignment.
//!
//! Layer `l` sits at `l * (primary extent + layer spacing)` along the primary
//! axis. For `left` and `up` the steps are counted back from the deepest layer
//! of the drawing instead, so layer 0 of every component lands on the far
//! edge and coordinates stay non-negative. Within a component every layer is
//! centred on the component's midline along the cross axis, and components
//! are stacked along the cross axis with a fixed gap, so they never overlap.
//! The padding offsets the whole drawing.

use log::debug;

use stagegraph_core::geometry::{Bounds, Point};

use crate::{
    config::LayoutConfig,
    layout::ordering::Ordering,
    structure::StageGraph,
};

/// Top-left position of every stage and the box around the drawing.
#[derive(Debug, Clone)]
pub(crate) struct Placement {
    positions: Vec<Point>,
    bounding_box: Bounds,
}

impl Placement {
    /// Positions indexed by stage arena index.
    pub(crate) fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub(crate) fn bounding_box(&self) -> Bounds {
        self.bounding_box
    }
}

/// Places every stage of `ordering`.
pub(crate) fn place(graph: &StageGraph, ordering: &Ordering, config: &LayoutConfig) -> Placement {
    let size = config.node_size();
    let direction = config.direction();
    let (primary_extent, cross_extent) = if direction.is_horizontal() {
        (size.width(), size.height())
    } else {
        (size.height(), size.width())
    };
    let primary_step = primary_extent + config.layer_spacing();
    let cross_step = cross_extent + config.node_spacing();

    let padding = config.padding();
    let origin = Point::new(padding.left(), padding.top());

    let mut positions = vec![Point::default(); graph.len()];
    let mut bounds: Option<Bounds> = None;
    let mut cross_offset = 0.0f32;
    let deepest = ordering.components().iter().map(Vec::len).max().unwrap_or(0);

    for layers in ordering.components() {
        let widest = layers.iter().map(Vec::len).max().unwrap_or(0);

        for (layer_idx, layer) in layers.iter().enumerate() {
            let steps = if direction.is_reversed() {
                deepest - 1 - layer_idx
            } else {
                layer_idx
            };
            let primary = steps as f32 * primary_step;
            let shift = (widest - layer.len()) as f32 / 2.0;

            for (order, &node) in layer.iter().enumerate() {
                let cross = cross_offset + (shift + order as f32) * cross_step;
                let local = if direction.is_horizontal() {
                    Point::new(primary, cross)
                } else {
                    Point::new(cross, primary)
                };
                let position = origin.add_point(local);
                positions[node.index()] = position;

                let node_bounds = Bounds::new_from_top_left(position, size);
                bounds = Some(bounds.map_or(node_bounds, |b| b.merge(&node_bounds)));
            }
        }

        let span = widest as f32 * cross_step - config.node_spacing();
        cross_offset += span + config.component_spacing();
    }

    let bounding_box = bounds
        .map(|b| b.add_padding(padding))
        .unwrap_or_default();
    debug!(
        width = bounding_box.width(),
        height = bounding_box.height();
        "Coordinates assigned"
    );

    Placement {
        positions,
        bounding_box,
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use stagegraph_core::description::{StageData, StageDescription, TransitionDescription};

    use super::*;
    use crate::{config::Direction, layout::layering::Layering};

    fn graph(stages: &[&str], transitions: &[(&str, &str)]) -> StageGraph {
        let nodes: Vec<_> = stages
            .iter()
            .map(|&id| StageDescription::new(id, StageData::default()))
            .collect();
        let edges: Vec<_> = transitions
            .iter()
            .map(|&(source, target)| {
                TransitionDescription::new(format!("{source}->{target}"), source, target)
            })
            .collect();
        StageGraph::build(&nodes, &edges).unwrap()
    }

    fn placed(graph: &StageGraph, config: &LayoutConfig) -> Placement {
        let layering = Layering::assign(graph);
        let ordering = Ordering::reduce(graph, &layering, config.ordering_passes());
        place(graph, &ordering, config)
    }

    fn position(graph: &StageGraph, placement: &Placement, id: &str) -> Point {
        placement.positions()[graph.index_of(id).unwrap().index()]
    }

    fn small_config() -> LayoutConfig {
        LayoutConfig::default()
            .with_node_size(100.0, 50.0)
            .with_spacing(20.0, 10.0)
            .with_component_spacing(30.0)
            .with_padding(5.0)
    }

    #[test]
    fn test_chain_advances_along_x() {
        let graph = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let placement = placed(&graph, &small_config());

        for (id, x) in [("a", 5.0), ("b", 125.0), ("c", 245.0)] {
            let p = position(&graph, &placement, id);
            assert_approx_eq!(f32, p.x(), x);
            assert_approx_eq!(f32, p.y(), 5.0);
        }

        let bounds = placement.bounding_box();
        assert_approx_eq!(f32, bounds.min_x(), 0.0);
        assert_approx_eq!(f32, bounds.min_y(), 0.0);
        assert_approx_eq!(f32, bounds.max_x(), 350.0);
        assert_approx_eq!(f32, bounds.max_y(), 60.0);
    }

    #[test]
    fn test_layers_are_centered() {
        // a fans out to b and c; a sits halfway between them.
        let graph = graph(&["a", "b", "c"], &[("a", "b"), ("a", "c")]);
        let placement = placed(&graph, &small_config());

        assert_approx_eq!(f32, position(&graph, &placement, "b").y(), 5.0);
        assert_approx_eq!(f32, position(&graph, &placement, "c").y(), 65.0);
        assert_approx_eq!(f32, position(&graph, &placement, "a").y(), 35.0);
    }

    #[test]
    fn test_down_direction_swaps_axes() {
        let graph = graph(&["a", "b"], &[("a", "b")]);
        let config = small_config().with_direction(Direction::Down);
        let placement = placed(&graph, &config);

        let a = position(&graph, &placement, "a");
        let b = position(&graph, &placement, "b");
        assert_approx_eq!(f32, a.x(), b.x());
        assert_approx_eq!(f32, a.y(), 5.0);
        assert_approx_eq!(f32, b.y(), 75.0);
    }

    #[test]
    fn test_left_direction_runs_right_to_left() {
        let graph = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let placement = placed(&graph, &small_config().with_direction(Direction::Left));

        for (id, x) in [("a", 245.0), ("b", 125.0), ("c", 5.0)] {
            let p = position(&graph, &placement, id);
            assert_approx_eq!(f32, p.x(), x);
            assert_approx_eq!(f32, p.y(), 5.0);
        }
        assert_approx_eq!(f32, placement.bounding_box().max_x(), 350.0);
    }

    #[test]
    fn test_up_direction_aligns_components_on_the_bottom() {
        // The deeper component sets the bottom edge; x starts there too.
        let graph = graph(&["a", "b", "c", "x", "y"], &[("a", "b"), ("b", "c"), ("x", "y")]);
        let placement = placed(&graph, &small_config().with_direction(Direction::Up));

        assert_approx_eq!(f32, position(&graph, &placement, "a").y(), 5.0 + 2.0 * 70.0);
        assert_approx_eq!(f32, position(&graph, &placement, "c").y(), 5.0);
        assert_approx_eq!(f32, position(&graph, &placement, "x").y(), 5.0 + 2.0 * 70.0);
        assert_approx_eq!(f32, position(&graph, &placement, "y").y(), 5.0 + 70.0);
        assert!(position(&graph, &placement, "x").x() > position(&graph, &placement, "a").x());
    }

    #[test]
    fn test_components_are_stacked() {
        let graph = graph(&["a", "b", "x"], &[("a", "b")]);
        let placement = placed(&graph, &small_config());

        let a = position(&graph, &placement, "a");
        let x = position(&graph, &placement, "x");
        assert_approx_eq!(f32, a.y(), 5.0);
        assert_approx_eq!(f32, x.x(), 5.0);
        assert_approx_eq!(f32, x.y(), 5.0 + 50.0 + 30.0);

        let size = small_config().node_size();
        let a_bounds = Bounds::new_from_top_left(a, size);
        let x_bounds = Bounds::new_from_top_left(x, size);
        assert!(!a_bounds.intersects(&x_bounds));
    }

    #[test]
    fn test_empty_graph_has_zero_box() {
        let graph = graph(&[], &[]);
        let placement = placed(&graph, &small_config());

        assert!(placement.positions().is_empty());
        assert_eq!(placement.bounding_box(), Bounds::default());
    }
}
