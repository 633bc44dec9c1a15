//! Layer assignment with DFS cycle breaking.
//!
//! Every weakly connected component is handled on its own:
//!
//! 1. Pick roots: the initial stage when the component holds it, otherwise
//!    every stage without incoming transitions, otherwise the stage with the
//!    highest out-degree.
//! 2. Walk depth-first from the roots. A transition that reaches a stage still
//!    on the walk stack is a feedback edge. Stages the roots do not reach are
//!    covered by applying the root rule again to the unvisited remainder.
//! 3. With feedback edges ignored the component is acyclic; each stage gets the
//!    length of the longest path leading to it.
//!
//! Feedback edges stay in the graph; they are only flagged here.

use std::collections::VecDeque;

use log::{debug, trace};

use crate::structure::{EdgeIndex, NodeIndex, StageGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Done,
}

/// Layer per stage plus the cycle-breaking set.
#[derive(Debug, Clone)]
pub(crate) struct Layering {
    layers: Vec<usize>,
    feedback: Vec<bool>,
    components: Vec<Vec<NodeIndex>>,
    component_of: Vec<usize>,
}

impl Layering {
    /// Assigns a layer to every stage of `graph`.
    pub(crate) fn assign(graph: &StageGraph) -> Self {
        let components = graph.components();
        let mut component_of = vec![0; graph.len()];
        let mut layers = vec![0; graph.len()];
        let mut feedback = vec![false; graph.transitions_count()];
        let mut visit = vec![Visit::New; graph.len()];

        for (component_idx, component) in components.iter().enumerate() {
            for node in component {
                component_of[node.index()] = component_idx;
            }
            break_cycles(graph, component, &mut visit, &mut feedback);
            longest_path(graph, component, &feedback, &mut layers);
        }

        let layering = Self {
            layers,
            feedback,
            components,
            component_of,
        };
        debug!(
            components = layering.components.len(),
            feedback_edges = layering.feedback_count();
            "Layers assigned"
        );
        layering
    }

    pub(crate) fn layer(&self, node: NodeIndex) -> usize {
        self.layers[node.index()]
    }

    pub(crate) fn is_feedback(&self, edge: EdgeIndex) -> bool {
        self.feedback[edge.index()]
    }

    pub(crate) fn feedback_count(&self) -> usize {
        self.feedback.iter().filter(|&&flag| flag).count()
    }

    /// Weakly connected components, in order of their first stage.
    pub(crate) fn components(&self) -> &[Vec<NodeIndex>] {
        &self.components
    }

    pub(crate) fn component_of(&self, node: NodeIndex) -> usize {
        self.component_of[node.index()]
    }

    /// Number of layers used by a component.
    pub(crate) fn layer_count(&self, component: usize) -> usize {
        self.components[component]
            .iter()
            .map(|&node| self.layer(node) + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Runs the DFS over one component and flags feedback edges.
fn break_cycles(
    graph: &StageGraph,
    component: &[NodeIndex],
    visit: &mut [Visit],
    feedback: &mut [bool],
) {
    let mut roots = match graph.initial() {
        Some(initial) if component.binary_search(&initial).is_ok() => vec![initial],
        _ => select_roots(graph, component, visit),
    };

    loop {
        for &root in &roots {
            if visit[root.index()] == Visit::New {
                trace!(root:% = graph.stage(root).id(); "Walking from root");
                walk(graph, root, visit, feedback);
            }
        }

        let remaining: Vec<NodeIndex> = component
            .iter()
            .copied()
            .filter(|node| visit[node.index()] == Visit::New)
            .collect();
        if remaining.is_empty() {
            break;
        }
        roots = select_roots(graph, &remaining, visit);
    }
}

/// Unvisited stages without unvisited predecessors, or failing that the one
/// with the highest out-degree (earliest wins ties).
fn select_roots(graph: &StageGraph, candidates: &[NodeIndex], visit: &[Visit]) -> Vec<NodeIndex> {
    let sources: Vec<NodeIndex> = candidates
        .iter()
        .copied()
        .filter(|&node| {
            graph
                .predecessors(node)
                .all(|pred| visit[pred.index()] != Visit::New)
        })
        .collect();
    if !sources.is_empty() {
        return sources;
    }

    let synthetic = candidates.iter().copied().reduce(|best, node| {
        if graph.out_degree(node) > graph.out_degree(best) {
            node
        } else {
            best
        }
    });
    if let Some(root) = synthetic {
        debug!(root:% = graph.stage(root).id(); "No source stage left, using synthetic root");
    }
    synthetic.into_iter().collect()
}

/// Iterative depth-first walk visiting successors in transition order.
fn walk(graph: &StageGraph, root: NodeIndex, visit: &mut [Visit], feedback: &mut [bool]) {
    let mut stack: Vec<(NodeIndex, usize)> = vec![(root, 0)];
    visit[root.index()] = Visit::Active;

    while let Some(&(node, cursor)) = stack.last() {
        let Some(&edge) = graph.outgoing(node).get(cursor) else {
            visit[node.index()] = Visit::Done;
            stack.pop();
            continue;
        };

        let top = stack.len() - 1;
        stack[top].1 += 1;

        let target = graph.transition(edge).target();
        match visit[target.index()] {
            Visit::New => {
                visit[target.index()] = Visit::Active;
                stack.push((target, 0));
            }
            Visit::Active => {
                trace!(transition:% = graph.transition(edge).id(); "Feedback edge");
                feedback[edge.index()] = true;
            }
            Visit::Done => {}
        }
    }
}

/// Longest-path layering over the non-feedback transitions of a component.
fn longest_path(
    graph: &StageGraph,
    component: &[NodeIndex],
    feedback: &[bool],
    layers: &mut [usize],
) {
    let mut pending = vec![0usize; graph.len()];
    for &node in component {
        pending[node.index()] = graph
            .incoming(node)
            .iter()
            .filter(|edge| !feedback[edge.index()])
            .count();
    }

    let mut queue: VecDeque<NodeIndex> = component
        .iter()
        .copied()
        .filter(|node| pending[node.index()] == 0)
        .collect();
    let mut processed = 0;

    while let Some(node) = queue.pop_front() {
        processed += 1;
        for &edge in graph.outgoing(node) {
            if feedback[edge.index()] {
                continue;
            }
            let target = graph.transition(edge).target();
            layers[target.index()] = layers[target.index()].max(layers[node.index()] + 1);
            pending[target.index()] -= 1;
            if pending[target.index()] == 0 {
                queue.push_back(target);
            }
        }
    }

    debug_assert_eq!(
        processed,
        component.len(),
        "non-feedback transitions must form a DAG"
    );
}
