//! Edge classification.
//!
//! Runs after coordinates are known. Each transition gets exactly one
//! [`EdgeKind`], checked in priority order:
//!
//! 1. `Bidirectional` when the reverse transition exists.
//! 2. `Skip` when the target lies further along the primary axis, both ends
//!    share a row, and some other stage in that row sits strictly between them.
//!    The in-between stage must pass the same row test as the target, so a
//!    stage of a neighbouring row never turns an unobstructed edge into a skip.
//! 3. `Backward` when the target lies before the source on the primary axis.
//! 4. `Forward` otherwise.
//!
//! The attachment sides follow from the kind and the layout direction so that
//! skip and backward arcs route around the row instead of through it.

use std::collections::HashSet;

use log::debug;

use stagegraph_core::geometry::Point;

use crate::{
    config::{Direction, EdgeConfig, LayoutConfig},
    layout::layering::Layering,
    result::{EdgeKind, RoutedTransition, Side},
    structure::{NodeIndex, StageGraph},
};

/// Splits positions into (primary, cross) coordinates for one direction.
///
/// The primary coordinate grows in the direction layers advance, so it is
/// negated for `left` and `up`.
#[derive(Debug, Clone, Copy)]
struct Axes(Direction);

impl Axes {
    fn primary(self, point: Point) -> f32 {
        match self.0 {
            Direction::Right => point.x(),
            Direction::Left => -point.x(),
            Direction::Down => point.y(),
            Direction::Up => -point.y(),
        }
    }

    fn cross(self, point: Point) -> f32 {
        if self.0.is_horizontal() {
            point.y()
        } else {
            point.x()
        }
    }

    fn sides(self, kind: EdgeKind) -> (Side, Side) {
        match (kind, self.0.is_horizontal()) {
            (EdgeKind::Skip, true) => (Side::Top, Side::Top),
            (EdgeKind::Skip, false) => (Side::Left, Side::Left),
            (EdgeKind::Backward, true) => (Side::Bottom, Side::Bottom),
            (EdgeKind::Backward, false) => (Side::Right, Side::Right),
            (EdgeKind::Forward | EdgeKind::Bidirectional, _) => match self.0 {
                Direction::Right => (Side::Right, Side::Left),
                Direction::Left => (Side::Left, Side::Right),
                Direction::Down => (Side::Bottom, Side::Top),
                Direction::Up => (Side::Top, Side::Bottom),
            },
        }
    }
}

/// Classifies transitions against a finished placement.
pub(crate) struct EdgeClassifier<'a> {
    graph: &'a StageGraph,
    positions: &'a [Point],
    axes: Axes,
    row_tolerance: f32,
    row_band: f32,
    pairs: HashSet<(NodeIndex, NodeIndex)>,
}

impl<'a> EdgeClassifier<'a> {
    pub(crate) fn new(
        graph: &'a StageGraph,
        positions: &'a [Point],
        layout: &LayoutConfig,
        edges: &EdgeConfig,
    ) -> Self {
        let size = layout.node_size();
        let axes = Axes(layout.direction());
        let cross_extent = if layout.direction().is_horizontal() {
            size.height()
        } else {
            size.width()
        };
        let row_tolerance = edges.same_row_tolerance() * cross_extent;
        let pairs = graph
            .transitions()
            .map(|(_, transition)| (transition.source(), transition.target()))
            .collect();

        Self {
            graph,
            positions,
            axes,
            row_tolerance,
            row_band: (edges.row_band() * cross_extent).min(row_tolerance),
            pairs,
        }
    }

    /// Classifies every transition, in input order.
    pub(crate) fn classify_all(&self, layering: &Layering) -> Vec<RoutedTransition> {
        let routed: Vec<RoutedTransition> = self
            .graph
            .transitions()
            .map(|(edge, transition)| {
                let kind = self.classify(transition.source(), transition.target());
                RoutedTransition::new(
                    transition.id().clone(),
                    self.graph.stage(transition.source()).id().clone(),
                    self.graph.stage(transition.target()).id().clone(),
                    kind,
                    self.axes.sides(kind),
                    layering.is_feedback(edge),
                )
            })
            .collect();

        debug!(
            transitions = routed.len(),
            skip = routed.iter().filter(|e| e.kind() == EdgeKind::Skip).count(),
            backward = routed.iter().filter(|e| e.kind() == EdgeKind::Backward).count();
            "Transitions classified"
        );
        routed
    }

    pub(crate) fn classify(&self, source: NodeIndex, target: NodeIndex) -> EdgeKind {
        if self.pairs.contains(&(target, source)) {
            return EdgeKind::Bidirectional;
        }

        let from = self.positions[source.index()];
        let to = self.positions[target.index()];
        let (from_primary, to_primary) = (self.axes.primary(from), self.axes.primary(to));

        if to_primary > from_primary && self.is_same_row_jump(source, target) {
            EdgeKind::Skip
        } else if to_primary < from_primary {
            EdgeKind::Backward
        } else {
            EdgeKind::Forward
        }
    }

    /// Both endpoints share a row and another stage of that row lies between.
    ///
    /// `row_band` never exceeds `row_tolerance`, so every stage counted here
    /// would also share a row with the source under the endpoint test.
    fn is_same_row_jump(&self, source: NodeIndex, target: NodeIndex) -> bool {
        let from = self.positions[source.index()];
        let to = self.positions[target.index()];
        let row = self.axes.cross(from);

        if (self.axes.cross(to) - row).abs() >= self.row_tolerance {
            return false;
        }

        let low = self.axes.primary(from).min(self.axes.primary(to));
        let high = self.axes.primary(from).max(self.axes.primary(to));

        self.graph
            .node_indices()
            .filter(|&node| node != source && node != target)
            .map(|node| self.positions[node.index()])
            .any(|point| {
                let primary = self.axes.primary(point);
                primary > low && primary < high && (self.axes.cross(point) - row).abs() < self.row_band
            })
    }
}

#[cfg(test)]
mod tests {
    use stagegraph_core::description::{StageData, StageDescription, TransitionDescription};

    use super::*;

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

    fn node(graph: &StageGraph, id: &str) -> NodeIndex {
        graph.index_of(id).unwrap()
    }

    fn row(xs: &[f32]) -> Vec<Point> {
        xs.iter().map(|&x| Point::new(x, 0.0)).collect()
    }

    #[test]
    fn test_forward_and_backward() {
        let graph = graph(&["a", "b", "c"], &[("a", "b"), ("c", "a")]);
        let positions = row(&[0.0, 340.0, 680.0]);
        let layout = LayoutConfig::default();
        let classifier = EdgeClassifier::new(&graph, &positions, &layout, &EdgeConfig::default());

        let a = node(&graph, "a");
        assert_eq!(classifier.classify(a, node(&graph, "b")), EdgeKind::Forward);
        // Jumping back over b stays a backward edge.
        assert_eq!(classifier.classify(node(&graph, "c"), a), EdgeKind::Backward);
    }

    #[test]
    fn test_reverse_pair_is_bidirectional() {
        let graph = graph(&["a", "b"], &[("a", "b"), ("b", "a")]);
        let positions = row(&[0.0, 340.0]);
        let layout = LayoutConfig::default();
        let classifier = EdgeClassifier::new(&graph, &positions, &layout, &EdgeConfig::default());

        let a = node(&graph, "a");
        let b = node(&graph, "b");
        assert_eq!(classifier.classify(a, b), EdgeKind::Bidirectional);
        assert_eq!(classifier.classify(b, a), EdgeKind::Bidirectional);
    }

    #[test]
    fn test_skip_needs_stage_in_between() {
        let graph = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("a", "c")]);
        let positions = row(&[0.0, 340.0, 680.0]);
        let layout = LayoutConfig::default();
        let classifier = EdgeClassifier::new(&graph, &positions, &layout, &EdgeConfig::default());

        let a = node(&graph, "a");
        let b = node(&graph, "b");
        let c = node(&graph, "c");
        assert_eq!(classifier.classify(a, c), EdgeKind::Skip);
        assert_eq!(classifier.classify(a, b), EdgeKind::Forward);
    }

    #[test]
    fn test_no_skip_when_middle_stage_is_off_row() {
        let graph = graph(&["a", "b", "c"], &[("a", "c")]);
        let positions = vec![
            Point::new(0.0, 0.0),
            Point::new(340.0, 150.0),
            Point::new(680.0, 0.0),
        ];
        let layout = LayoutConfig::default();
        let classifier = EdgeClassifier::new(&graph, &positions, &layout, &EdgeConfig::default());

        assert_eq!(
            classifier.classify(node(&graph, "a"), node(&graph, "c")),
            EdgeKind::Forward
        );
    }

    #[test]
    fn test_no_skip_when_target_is_off_row() {
        let graph = graph(&["a", "b", "c"], &[("a", "c")]);
        let positions = vec![
            Point::new(0.0, 0.0),
            Point::new(340.0, 0.0),
            Point::new(680.0, 200.0),
        ];
        let layout = LayoutConfig::default();
        let classifier = EdgeClassifier::new(&graph, &positions, &layout, &EdgeConfig::default());

        assert_eq!(
            classifier.classify(node(&graph, "a"), node(&graph, "c")),
            EdgeKind::Forward
        );
    }

    #[test]
    fn test_sides_follow_direction() {
        let right = Axes(Direction::Right);
        assert_eq!(right.sides(EdgeKind::Forward), (Side::Right, Side::Left));
        assert_eq!(right.sides(EdgeKind::Bidirectional), (Side::Right, Side::Left));
        assert_eq!(right.sides(EdgeKind::Skip), (Side::Top, Side::Top));
        assert_eq!(right.sides(EdgeKind::Backward), (Side::Bottom, Side::Bottom));

        let down = Axes(Direction::Down);
        assert_eq!(down.sides(EdgeKind::Forward), (Side::Bottom, Side::Top));
        assert_eq!(down.sides(EdgeKind::Skip), (Side::Left, Side::Left));
        assert_eq!(down.sides(EdgeKind::Backward), (Side::Right, Side::Right));

        let left = Axes(Direction::Left);
        assert_eq!(left.sides(EdgeKind::Forward), (Side::Left, Side::Right));
        assert_eq!(left.sides(EdgeKind::Skip), (Side::Top, Side::Top));
        assert_eq!(left.sides(EdgeKind::Backward), (Side::Bottom, Side::Bottom));

        let up = Axes(Direction::Up);
        assert_eq!(up.sides(EdgeKind::Bidirectional), (Side::Top, Side::Bottom));
        assert_eq!(up.sides(EdgeKind::Skip), (Side::Left, Side::Left));
        assert_eq!(up.sides(EdgeKind::Backward), (Side::Right, Side::Right));
    }

    #[test]
    fn test_neighbouring_row_does_not_make_skip() {
        // Down layout of s2 -> {s1, s3} -> s0 with s2 -> s0: s1 and s3 are
        // centred half a cross step off the s2/s0 column.
        let graph = graph(
            &["s0", "s1", "s2", "s3"],
            &[("s2", "s1"), ("s2", "s3"), ("s3", "s0"), ("s2", "s0")],
        );
        let positions = vec![
            Point::new(210.0, 490.0),
            Point::new(50.0, 270.0),
            Point::new(210.0, 50.0),
            Point::new(370.0, 270.0),
        ];
        let layout = LayoutConfig::default().with_direction(Direction::Down);
        let classifier = EdgeClassifier::new(&graph, &positions, &layout, &EdgeConfig::default());

        assert_eq!(
            classifier.classify(node(&graph, "s2"), node(&graph, "s0")),
            EdgeKind::Forward
        );
    }

    #[test]
    fn test_row_band_is_capped_by_row_tolerance() {
        // Right layout with 40px node spacing: b is 70px off the row, beyond
        // the 50px endpoint tolerance but inside a 100px band.
        let graph = graph(&["a", "b", "c"], &[("a", "c")]);
        let positions = vec![
            Point::new(0.0, 120.0),
            Point::new(340.0, 50.0),
            Point::new(680.0, 120.0),
        ];
        let layout = LayoutConfig::default().with_spacing(120.0, 40.0);
        let classifier = EdgeClassifier::new(&graph, &positions, &layout, &EdgeConfig::default());

        assert_eq!(
            classifier.classify(node(&graph, "a"), node(&graph, "c")),
            EdgeKind::Forward
        );
    }

    #[test]
    fn test_left_direction_keeps_closing_edge_backward() {
        let graph = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        // Layers advance towards smaller x.
        let positions = row(&[680.0, 340.0, 0.0]);
        let layout = LayoutConfig::default().with_direction(Direction::Left);
        let classifier = EdgeClassifier::new(&graph, &positions, &layout, &EdgeConfig::default());

        let (a, b, c) = (node(&graph, "a"), node(&graph, "b"), node(&graph, "c"));
        assert_eq!(classifier.classify(a, b), EdgeKind::Forward);
        assert_eq!(classifier.classify(b, c), EdgeKind::Forward);
        assert_eq!(classifier.classify(c, a), EdgeKind::Backward);
    }

    #[test]
    fn test_up_direction_skip() {
        let graph = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("a", "c")]);
        // Layers advance towards smaller y.
        let positions = vec![
            Point::new(0.0, 440.0),
            Point::new(0.0, 220.0),
            Point::new(0.0, 0.0),
        ];
        let layout = LayoutConfig::default().with_direction(Direction::Up);
        let classifier = EdgeClassifier::new(&graph, &positions, &layout, &EdgeConfig::default());

        let (a, b, c) = (node(&graph, "a"), node(&graph, "b"), node(&graph, "c"));
        assert_eq!(classifier.classify(a, b), EdgeKind::Forward);
        assert_eq!(classifier.classify(a, c), EdgeKind::Skip);
    }

    #[test]
    fn test_down_direction_uses_y_as_primary() {
        let graph = graph(&["a", "b", "c"], &[("a", "c")]);
        let positions = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 220.0),
            Point::new(0.0, 440.0),
        ];
        let layout = LayoutConfig::default().with_direction(Direction::Down);
        let classifier = EdgeClassifier::new(&graph, &positions, &layout, &EdgeConfig::default());

        assert_eq!(
            classifier.classify(node(&graph, "a"), node(&graph, "c")),
            EdgeKind::Skip
        );
    }
}
