//! Arena-backed stage graph with forward and reverse adjacency.
//!
//! # Architecture
//!
//! - [`NodeIndex`] / [`EdgeIndex`]: positions in the stage and transition arenas
//! - [`Stage`] / [`Transition`]: the validated node and edge records
//! - [`StageGraph`]: storage plus adjacency lists
//!
//! Stages live in an [`IndexMap`] keyed by their [`Id`], so the arena
//! position of a stage is its insertion index. Every later tie-break in the
//! pipeline compares these indices, which is what makes layout deterministic
//! for a given input order.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;
use log::{debug, trace};

use stagegraph_core::{
    description::{GraphDescription, StageDescription, TransitionDescription},
    identifier::Id,
};

use crate::ValidationError;

/// Position of a stage in the graph's arena (its insertion index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Position of a transition in the graph's arena (its insertion index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeIndex(usize);

impl EdgeIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A validated stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    id: Id,
    label: String,
    description: Option<String>,
    task_count: usize,
    is_initial: bool,
}

impl Stage {
    fn from_description(id: Id, raw: &StageDescription) -> Self {
        Self {
            id,
            label: raw.label().to_owned(),
            description: raw.description().map(str::to_owned),
            task_count: raw.tasks().len(),
            is_initial: raw.is_initial(),
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
}

/// A validated transition. Both endpoints exist and differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    id: Id,
    source: NodeIndex,
    target: NodeIndex,
}

impl Transition {
    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn source(&self) -> NodeIndex {
        self.source
    }

    pub fn target(&self) -> NodeIndex {
        self.target
    }

    /// Returns the endpoint opposite to `node`.
    ///
    /// `node` is expected to be one of the two endpoints.
    pub fn opposite(&self, node: NodeIndex) -> NodeIndex {
        if self.source == node {
            self.target
        } else {
            self.source
        }
    }
}

/// Directed stage graph, immutable once built.
///
/// Multiple transitions between the same pair of stages are allowed; self
/// loops are not.
#[derive(Debug, Clone, Default)]
pub struct StageGraph {
    stages: IndexMap<Id, Stage>,
    transitions: Vec<Transition>,
    outgoing: Vec<Vec<EdgeIndex>>,
    incoming: Vec<Vec<EdgeIndex>>,
    initial: Option<NodeIndex>,
}

impl StageGraph {
    /// Builds a graph from a raw description.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn from_description(description: &GraphDescription) -> Result<Self, ValidationError> {
        Self::build(description.nodes(), description.edges())
    }

    /// Validates raw stages and transitions and builds adjacency indices.
    ///
    /// Stages are checked first, in order, then transitions.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::EmptyStageId`] for a stage with an empty id
    /// - [`ValidationError::DuplicateStage`] when two stages share an id
    /// - [`ValidationError::MultipleInitialStages`] for a second initial stage
    /// - [`ValidationError::DuplicateTransition`] when two transitions share an id
    /// - [`ValidationError::UnknownStage`] for a dangling transition endpoint
    /// - [`ValidationError::SelfLoop`] for a transition from a stage to itself
    pub fn build(
        nodes: &[StageDescription],
        edges: &[TransitionDescription],
    ) -> Result<Self, ValidationError> {
        debug!(stages = nodes.len(), transitions = edges.len(); "Building stage graph");

        let mut stages: IndexMap<Id, Stage> = IndexMap::with_capacity(nodes.len());
        let mut initial: Option<NodeIndex> = None;

        for (position, raw) in nodes.iter().enumerate() {
            if raw.id().is_empty() {
                return Err(ValidationError::EmptyStageId { position });
            }

            if stages.contains_key(raw.id()) {
                return Err(ValidationError::DuplicateStage {
                    stage: raw.id().to_owned(),
                });
            }

            if raw.is_initial() {
                if let Some(first) = initial {
                    return Err(ValidationError::MultipleInitialStages {
                        first: stages[first.0].id.to_string(),
                        second: raw.id().to_owned(),
                    });
                }
                initial = Some(NodeIndex(stages.len()));
            }

            let id = Id::new(raw.id());
            stages.insert(id.clone(), Stage::from_description(id, raw));
        }

        let mut transitions = Vec::with_capacity(edges.len());
        let mut transition_ids = HashSet::with_capacity(edges.len());
        let mut outgoing = vec![Vec::new(); stages.len()];
        let mut incoming = vec![Vec::new(); stages.len()];

        for raw in edges {
            if !transition_ids.insert(raw.id()) {
                return Err(ValidationError::DuplicateTransition {
                    transition: raw.id().to_owned(),
                });
            }

            let resolve = |stage: &str| {
                stages
                    .get_index_of(stage)
                    .map(NodeIndex)
                    .ok_or_else(|| ValidationError::UnknownStage {
                        transition: raw.id().to_owned(),
                        stage: stage.to_owned(),
                    })
            };
            let source = resolve(raw.source())?;
            let target = resolve(raw.target())?;

            if source == target {
                return Err(ValidationError::SelfLoop {
                    transition: raw.id().to_owned(),
                    stage: raw.source().to_owned(),
                });
            }

            let idx = EdgeIndex(transitions.len());
            transitions.push(Transition {
                id: Id::new(raw.id()),
                source,
                target,
            });
            outgoing[source.0].push(idx);
            incoming[target.0].push(idx);
            trace!(transition = raw.id(), source = raw.source(), target = raw.target(); "Added transition");
        }

        Ok(Self {
            stages,
            transitions,
            outgoing,
            incoming,
            initial,
        })
    }

    /// Returns the number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` when the graph holds no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Returns the number of transitions.
    pub fn transitions_count(&self) -> usize {
        self.transitions.len()
    }

    /// Returns the stage at `idx`.
    ///
    /// # Panics
    /// Panics if the index does not belong to this graph.
    pub fn stage(&self, idx: NodeIndex) -> &Stage {
        &self.stages[idx.0]
    }

    /// Looks up a stage's arena position by id.
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.stages.get_index_of(id).map(NodeIndex)
    }

    /// Iterates over all stage indices in insertion order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + use<> {
        (0..self.stages.len()).map(NodeIndex)
    }

    /// Iterates over all stages in insertion order.
    pub fn stages(&self) -> impl Iterator<Item = (NodeIndex, &Stage)> {
        self.stages
            .values()
            .enumerate()
            .map(|(idx, stage)| (NodeIndex(idx), stage))
    }

    /// Returns the transition at `idx`.
    ///
    /// # Panics
    /// Panics if the index does not belong to this graph.
    pub fn transition(&self, idx: EdgeIndex) -> &Transition {
        &self.transitions[idx.0]
    }

    /// Iterates over all transitions in insertion order.
    pub fn transitions(&self) -> impl Iterator<Item = (EdgeIndex, &Transition)> {
        self.transitions
            .iter()
            .enumerate()
            .map(|(idx, transition)| (EdgeIndex(idx), transition))
    }

    /// Transitions leaving `node`, in insertion order.
    pub fn outgoing(&self, node: NodeIndex) -> &[EdgeIndex] {
        &self.outgoing[node.0]
    }

    /// Transitions entering `node`, in insertion order.
    pub fn incoming(&self, node: NodeIndex) -> &[EdgeIndex] {
        &self.incoming[node.0]
    }

    /// Targets of the transitions leaving `node`, in insertion order.
    pub fn successors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.outgoing(node)
            .iter()
            .map(|&idx| self.transitions[idx.0].target)
    }

    /// Sources of the transitions entering `node`, in insertion order.
    pub fn predecessors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.incoming(node)
            .iter()
            .map(|&idx| self.transitions[idx.0].source)
    }

    pub fn in_degree(&self, node: NodeIndex) -> usize {
        self.incoming[node.0].len()
    }

    pub fn out_degree(&self, node: NodeIndex) -> usize {
        self.outgoing[node.0].len()
    }

    /// Returns the entry stage, if one is marked.
    pub fn initial(&self) -> Option<NodeIndex> {
        self.initial
    }

    /// Splits the graph into weakly connected components.
    ///
    /// Components are ordered by their first stage's insertion index and list
    /// their stages in insertion order.
    pub fn components(&self) -> Vec<Vec<NodeIndex>> {
        let mut assigned = vec![false; self.len()];
        let mut components = Vec::new();

        for start in self.node_indices() {
            if assigned[start.0] {
                continue;
            }

            let mut members = Vec::new();
            let mut queue = VecDeque::from([start]);
            assigned[start.0] = true;

            while let Some(node) = queue.pop_front() {
                members.push(node);
                for neighbor in self.successors(node).chain(self.predecessors(node)) {
                    if !assigned[neighbor.0] {
                        assigned[neighbor.0] = true;
                        queue.push_back(neighbor);
                    }
                }
            }

            members.sort_unstable();
            components.push(members);
        }

        components
    }
}
