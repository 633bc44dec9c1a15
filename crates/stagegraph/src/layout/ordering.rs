//! Crossing reduction by barycenter sweeps.
//!
//! Each pass runs a downward sweep (layer 1 to the last layer) followed by an
//! upward sweep. While sweeping, a stage is keyed by the mean position of its
//! neighbours in the adjacent layer the sweep has just fixed (the one above on
//! the way down, the one below on the way up), and the layer is sorted by that
//! key with insertion order breaking ties. Transitions spanning several layers
//! do not pull the key. Positions are centred per
//! layer, the same way the Coordinator places them, so stages in layers of
//! different widths compare on one scale.
//!
//! The pass count is fixed. The ordering with the fewest adjacent-layer
//! crossings seen after any pass is kept.

use std::cmp::Ordering as CmpOrdering;

use log::{debug, trace};

use crate::{
    layout::layering::Layering,
    structure::{NodeIndex, StageGraph},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sweep {
    Down,
    Up,
}

impl Sweep {
    /// The adjacent layer already ordered while `current` is being sorted.
    ///
    /// Downward sweeps start at layer 1 and upward sweeps at the second to
    /// last layer, so the neighbour always exists.
    fn fixed_layer(self, current: usize) -> usize {
        match self {
            Self::Down => current - 1,
            Self::Up => current + 1,
        }
    }
}

/// Stages of every component, grouped by layer and sorted within each layer.
#[derive(Debug, Clone)]
pub(crate) struct Ordering {
    components: Vec<Vec<Vec<NodeIndex>>>,
    order: Vec<usize>,
    crossings: usize,
}

impl Ordering {
    /// Orders the stages of every component of `layering`.
    pub(crate) fn reduce(graph: &StageGraph, layering: &Layering, passes: usize) -> Self {
        let mut components = Vec::with_capacity(layering.components().len());
        let mut order = vec![0; graph.len()];
        let mut crossings = 0;

        for (component_idx, component) in layering.components().iter().enumerate() {
            let (layers, component_crossings) = order_component(
                graph,
                layering,
                component,
                layering.layer_count(component_idx),
                passes,
            );

            for layer in &layers {
                for (position, &node) in layer.iter().enumerate() {
                    order[node.index()] = position;
                }
            }

            trace!(component = component_idx, crossings = component_crossings; "Component ordered");
            crossings += component_crossings;
            components.push(layers);
        }

        debug!(passes, crossings; "Crossing reduction finished");

        Self {
            components,
            order,
            crossings,
        }
    }

    /// Layers of every component, in component order.
    pub(crate) fn components(&self) -> &[Vec<Vec<NodeIndex>>] {
        &self.components
    }

    pub(crate) fn order_in_layer(&self, node: NodeIndex) -> usize {
        self.order[node.index()]
    }

    /// Adjacent-layer crossings of the kept ordering, over all components.
    pub(crate) fn crossings(&self) -> usize {
        self.crossings
    }
}

fn order_component(
    graph: &StageGraph,
    layering: &Layering,
    component: &[NodeIndex],
    layer_count: usize,
    passes: usize,
) -> (Vec<Vec<NodeIndex>>, usize) {
    let mut layers: Vec<Vec<NodeIndex>> = vec![Vec::new(); layer_count];
    for &node in component {
        layers[layering.layer(node)].push(node);
    }

    let mut centered = vec![0.0f32; graph.len()];
    for layer in &layers {
        assign_centered(layer, &mut centered);
    }

    let mut best_crossings = count_crossings(graph, layering, &layers);
    let mut best = layers.clone();

    for pass in 0..passes {
        if best_crossings == 0 {
            break;
        }

        for index in 1..layer_count {
            sweep_layer(graph, layering, &mut layers[index], index, &mut centered, Sweep::Down);
        }
        for index in (0..layer_count.saturating_sub(1)).rev() {
            sweep_layer(graph, layering, &mut layers[index], index, &mut centered, Sweep::Up);
        }

        let crossings = count_crossings(graph, layering, &layers);
        trace!(pass, crossings; "Barycenter pass");
        if crossings < best_crossings {
            best_crossings = crossings;
            best = layers.clone();
        }
    }

    (best, best_crossings)
}

/// Records `order - (len - 1) / 2` for every stage of the layer.
fn assign_centered(layer: &[NodeIndex], centered: &mut [f32]) {
    let middle = (layer.len() as f32 - 1.0) / 2.0;
    for (position, node) in layer.iter().enumerate() {
        centered[node.index()] = position as f32 - middle;
    }
}

fn sweep_layer(
    graph: &StageGraph,
    layering: &Layering,
    layer: &mut Vec<NodeIndex>,
    index: usize,
    centered: &mut [f32],
    sweep: Sweep,
) {
    let mut keyed: Vec<(f32, NodeIndex)> = layer
        .iter()
        .map(|&node| {
            let key = barycenter(graph, layering, node, index, centered, sweep);
            (key, node)
        })
        .collect();

    keyed.sort_by(|(key_a, node_a), (key_b, node_b)| match key_a.total_cmp(key_b) {
        CmpOrdering::Equal => node_a.cmp(node_b),
        other => other,
    });

    layer.clear();
    layer.extend(keyed.into_iter().map(|(_, node)| node));
    assign_centered(layer, centered);
}

/// Mean centred position of the neighbours in the adjacent fixed layer, or the
/// stage's own current position when it has none.
fn barycenter(
    graph: &StageGraph,
    layering: &Layering,
    node: NodeIndex,
    index: usize,
    centered: &[f32],
    sweep: Sweep,
) -> f32 {
    let fixed = sweep.fixed_layer(index);
    let (sum, count) = graph
        .outgoing(node)
        .iter()
        .chain(graph.incoming(node))
        .map(|&edge| graph.transition(edge).opposite(node))
        .filter(|&neighbor| layering.layer(neighbor) == fixed)
        .fold((0.0f32, 0usize), |(sum, count), neighbor| {
            (sum + centered[neighbor.index()], count + 1)
        });

    if count == 0 {
        centered[node.index()]
    } else {
        sum / count as f32
    }
}

/// Counts pairwise crossings of transitions joining adjacent layers.
///
/// Transitions spanning more than one layer are not counted.
pub(crate) fn count_crossings(
    graph: &StageGraph,
    layering: &Layering,
    layers: &[Vec<NodeIndex>],
) -> usize {
    let mut rank = vec![0usize; graph.len()];
    for layer in layers {
        for (position, node) in layer.iter().enumerate() {
            rank[node.index()] = position;
        }
    }

    let mut total = 0;
    for (index, layer) in layers.iter().enumerate() {
        let mut segments: Vec<(usize, usize)> = Vec::new();
        for &upper in layer {
            for &edge in graph.outgoing(upper).iter().chain(graph.incoming(upper)) {
                let lower = graph.transition(edge).opposite(upper);
                if layering.layer(lower) == index + 1 {
                    segments.push((rank[upper.index()], rank[lower.index()]));
                }
            }
        }

        for (i, &(upper_a, lower_a)) in segments.iter().enumerate() {
            for &(upper_b, lower_b) in &segments[i + 1..] {
                if (upper_a < upper_b && lower_a > lower_b)
                    || (upper_a > upper_b && lower_a < lower_b)
                {
                    total += 1;
                }
            }
        }
    }

    total
}
