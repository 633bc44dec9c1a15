//! Layout output.
//!
//! [`LayoutResult`] is a self-contained value: it owns copies of every id and
//! label so a renderer can drop the input description once the layout is
//! produced. It serializes to the camelCase JSON shape consumed by the
//! dashboard canvas.

use serde::Serialize;

use stagegraph_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

use crate::config::Direction;

/// How a transition is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Flows along the layout direction.
    Forward,
    /// Flows against the layout direction.
    Backward,
    /// The reverse transition also exists.
    Bidirectional,
    /// Jumps over another stage sitting in the same row.
    Skip,
}

/// Side of a stage box a transition attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// A stage with its final coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedStage {
    id: Id,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    task_count: usize,
    is_initial: bool,
    component: usize,
    layer: usize,
    order_in_layer: usize,
    position: Point,
    size: Size,
}

impl PositionedStage {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: Id,
        label: String,
        description: Option<String>,
        task_count: usize,
        is_initial: bool,
        component: usize,
        layer: usize,
        order_in_layer: usize,
        position: Point,
        size: Size,
    ) -> Self {
        Self {
            id,
            label,
            description,
            task_count,
            is_initial,
            component,
            layer,
            order_in_layer,
            position,
            size,
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn task_count(&self) -> usize {
        self.task_count
    }

    pub fn is_initial(&self) -> bool {
        self.is_initial
    }

    /// Index of the weakly connected component the stage belongs to.
    pub fn component(&self) -> usize {
        self.component
    }

    /// Layer within the stage's component, starting at 0.
    pub fn layer(&self) -> usize {
        self.layer
    }

    pub fn order_in_layer(&self) -> usize {
        self.order_in_layer
    }

    /// Top-left corner of the stage box.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// The box occupied by the stage.
    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(self.position, self.size)
    }
}

/// A transition with its classification and attachment sides.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedTransition {
    id: Id,
    source: Id,
    target: Id,
    kind: EdgeKind,
    source_side: Side,
    target_side: Side,
    feedback: bool,
}

impl RoutedTransition {
    pub(crate) fn new(
        id: Id,
        source: Id,
        target: Id,
        kind: EdgeKind,
        (source_side, target_side): (Side, Side),
        feedback: bool,
    ) -> Self {
        Self {
            id,
            source,
            target,
            kind,
            source_side,
            target_side,
            feedback,
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn source(&self) -> &Id {
        &self.source
    }

    pub fn target(&self) -> &Id {
        &self.target
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn source_side(&self) -> Side {
        self.source_side
    }

    pub fn target_side(&self) -> Side {
        self.target_side
    }

    /// Whether the transition was reversed to make the graph acyclic.
    pub fn is_feedback(&self) -> bool {
        self.feedback
    }
}

/// Summary numbers of a layout run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStats {
    layer_count: usize,
    component_count: usize,
    feedback_edges: usize,
    crossings: usize,
}

impl LayoutStats {
    pub(crate) fn new(
        layer_count: usize,
        component_count: usize,
        feedback_edges: usize,
        crossings: usize,
    ) -> Self {
        Self {
            layer_count,
            component_count,
            feedback_edges,
            crossings,
        }
    }

    /// Layers of the deepest component.
    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    pub fn component_count(&self) -> usize {
        self.component_count
    }

    pub fn feedback_edges(&self) -> usize {
        self.feedback_edges
    }

    /// Adjacent-layer crossings left after ordering.
    pub fn crossings(&self) -> usize {
        self.crossings
    }
}

/// Positioned stages and classified transitions of one graph.
///
/// Stages and transitions keep the order of the input description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    direction: Direction,
    nodes: Vec<PositionedStage>,
    edges: Vec<RoutedTransition>,
    bounding_box: Bounds,
    stats: LayoutStats,
}

impl LayoutResult {
    pub(crate) fn new(
        direction: Direction,
        nodes: Vec<PositionedStage>,
        edges: Vec<RoutedTransition>,
        bounding_box: Bounds,
        stats: LayoutStats,
    ) -> Self {
        Self {
            direction,
            nodes,
            edges,
            bounding_box,
            stats,
        }
    }

    /// The result of laying out a graph without stages.
    pub(crate) fn empty(direction: Direction) -> Self {
        Self::new(
            direction,
            Vec::new(),
            Vec::new(),
            Bounds::default(),
            LayoutStats::default(),
        )
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn nodes(&self) -> &[PositionedStage] {
        &self.nodes
    }

    pub fn edges(&self) -> &[RoutedTransition] {
        &self.edges
    }

    pub fn bounding_box(&self) -> Bounds {
        self.bounding_box
    }

    pub fn stats(&self) -> LayoutStats {
        self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a positioned stage by id.
    pub fn node(&self, id: impl AsRef<str>) -> Option<&PositionedStage> {
        let id = id.as_ref();
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Looks up a routed transition by id.
    pub fn edge(&self, id: impl AsRef<str>) -> Option<&RoutedTransition> {
        let id = id.as_ref();
        self.edges.iter().find(|edge| edge.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result() {
        let result = LayoutResult::empty(Direction::Down);

        assert!(result.is_empty());
        assert!(result.edges().is_empty());
        assert_eq!(result.direction(), Direction::Down);
        assert_eq!(result.bounding_box(), Bounds::default());
        assert_eq!(result.stats(), LayoutStats::default());
    }

    #[test]
    fn test_serializes_camel_case() {
        let node = PositionedStage::new(
            Id::new("a"),
            "Alpha".to_string(),
            None,
            2,
            true,
            0,
            0,
            0,
            Point::new(50.0, 50.0),
            Size::new(220.0, 100.0),
        );
        let edge = RoutedTransition::new(
            Id::new("e"),
            Id::new("a"),
            Id::new("a2"),
            EdgeKind::Skip,
            (Side::Top, Side::Top),
            false,
        );
        let result = LayoutResult::new(
            Direction::Right,
            vec![node],
            vec![edge],
            Bounds::new_from_top_left(Point::default(), Size::new(320.0, 200.0)),
            LayoutStats::new(1, 1, 0, 0),
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["direction"], "right");
        assert_eq!(json["nodes"][0]["taskCount"], 2);
        assert_eq!(json["nodes"][0]["isInitial"], true);
        assert_eq!(json["nodes"][0]["orderInLayer"], 0);
        assert!(json["nodes"][0].get("description").is_none());
        assert_eq!(json["edges"][0]["kind"], "skip");
        assert_eq!(json["edges"][0]["sourceSide"], "top");
        assert_eq!(json["boundingBox"]["maxX"], 320.0);
        assert_eq!(json["stats"]["layerCount"], 1);
    }

    #[test]
    fn test_lookup_by_id() {
        let node = PositionedStage::new(
            Id::new("lookup"),
            "Lookup".to_string(),
            Some("desc".to_string()),
            0,
            false,
            0,
            0,
            0,
            Point::default(),
            Size::new(1.0, 1.0),
        );
        let result = LayoutResult::new(
            Direction::Right,
            vec![node],
            Vec::new(),
            Bounds::default(),
            LayoutStats::default(),
        );

        assert_eq!(result.node("lookup").unwrap().description(), Some("desc"));
        assert!(result.node("missing").is_none());
        assert!(result.edge("lookup").is_none());
    }
}
