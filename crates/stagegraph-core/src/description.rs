//! Raw workflow graph description.
//!
//! These records mirror the JSON the workflow API serves for a workflow's
//! `graph` field. They are deserialized as-is and carry no guarantees beyond
//! their shape: ids may collide and transitions may point at unknown stages.
//! The engine validates them when it builds its internal graph.
//!
//! ```
//! use stagegraph_core::description::GraphDescription;
//!
//! let json = r#"{
//!     "nodes": [
//!         { "id": "browse", "data": { "label": "Browse", "tasks": ["search"], "isInitial": true } },
//!         { "id": "cart" }
//!     ],
//!     "edges": [ { "id": "e1", "source": "browse", "target": "cart" } ]
//! }"#;
//!
//! let description: GraphDescription = serde_json::from_str(json).unwrap();
//! assert_eq!(description.nodes().len(), 2);
//! assert_eq!(description.nodes()[0].label(), "Browse");
//! assert_eq!(description.nodes()[1].label(), "cart");
//! ```

use serde::{Deserialize, Deserializer};

/// A complete graph description: stages and the transitions between them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphDescription {
    #[serde(default)]
    nodes: Vec<StageDescription>,
    #[serde(default)]
    edges: Vec<TransitionDescription>,
}

impl GraphDescription {
    /// Creates a description from stages and transitions, in insertion order.
    pub fn new(nodes: Vec<StageDescription>, edges: Vec<TransitionDescription>) -> Self {
        Self { nodes, edges }
    }

    /// Returns the stages in insertion order.
    pub fn nodes(&self) -> &[StageDescription] {
        &self.nodes
    }

    /// Returns the transitions in insertion order.
    pub fn edges(&self) -> &[TransitionDescription] {
        &self.edges
    }

    /// Returns `true` when the description holds no stages and no transitions.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Full workflow payload as returned by the workflow detail endpoint.
///
/// Only the embedded graph matters for layout; every other field of the
/// payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowPayload {
    #[serde(default)]
    name: Option<String>,
    graph: GraphDescription,
}

impl WorkflowPayload {
    /// Returns the workflow name, when the payload carries one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Consumes the payload and returns its graph description.
    pub fn into_graph(self) -> GraphDescription {
        self.graph
    }
}

/// A single stage node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StageDescription {
    id: String,
    #[serde(default)]
    data: StageData,
}

impl StageDescription {
    /// Creates a stage with the given id and payload.
    pub fn new(id: impl Into<String>, data: StageData) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display label, falling back to the stage id.
    pub fn label(&self) -> &str {
        self.data.label.as_deref().unwrap_or(&self.id)
    }

    pub fn description(&self) -> Option<&str> {
        self.data.description.as_deref()
    }

    pub fn tasks(&self) -> &[String] {
        &self.data.tasks
    }

    pub fn is_initial(&self) -> bool {
        self.data.is_initial
    }
}

/// Display payload attached to a stage.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageData {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    tasks: Vec<String>,
    #[serde(default)]
    is_initial: bool,
}

impl StageData {
    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the free-form description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the names of the tasks the stage holds.
    pub fn with_tasks<I, S>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tasks = tasks.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the stage as the workflow's entry stage.
    pub fn with_initial(mut self, is_initial: bool) -> Self {
        self.is_initial = is_initial;
        self
    }
}

/// Reads `null` the same as a missing list.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A directed transition between two stages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransitionDescription {
    id: String,
    source: String,
    target: String,
}

impl TransitionDescription {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}
