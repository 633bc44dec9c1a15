//! Stagegraph - layered layout and edge classification for workflow stage
//! graphs.
//!
//! A workflow is a directed graph of stages linked by transitions. This crate
//! turns its JSON description into positioned stage boxes and classified
//! transitions a renderer can draw without further geometry work.

pub mod config;

mod classify;
mod error;
mod layout;
mod result;
mod sequence;
mod structure;

pub use stagegraph_core::{description, geometry, identifier};

pub use error::{StageGraphError, ValidationError};
pub use result::{
    EdgeKind, LayoutResult, LayoutStats, PositionedStage, RoutedTransition, Side,
};
pub use sequence::{LayoutSequencer, RequestToken};
pub use structure::{EdgeIndex, NodeIndex, Stage, StageGraph, Transition};

use log::{debug, info, trace};

use config::AppConfig;
use description::{GraphDescription, WorkflowPayload};

/// Builder for parsing and laying out stage graphs.
///
/// # Examples
///
/// ```rust
/// use stagegraph::{LayoutBuilder, config::AppConfig};
///
/// let source = r#"{
///     "nodes": [
///         { "id": "draft", "data": { "label": "Draft", "isInitial": true } },
///         { "id": "review", "data": { "label": "Review" } }
///     ],
///     "edges": [{ "id": "submit", "source": "draft", "target": "review" }]
/// }"#;
///
/// let builder = LayoutBuilder::new(AppConfig::default());
/// let description = builder.parse(source).expect("Failed to parse");
/// let layout = builder.layout(&description).expect("Failed to lay out");
///
/// assert_eq!(layout.nodes().len(), 2);
///
/// // Or use default config
/// let builder = LayoutBuilder::default();
/// ```
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    config: AppConfig,
}

impl LayoutBuilder {
    /// Create a new layout builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration with layout and edge settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration used by this builder.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON graph description.
    ///
    /// Accepts either a bare `{ "nodes": [...], "edges": [...] }` object or a
    /// workflow payload that wraps it as `{ "name": ..., "graph": { ... } }`.
    ///
    /// # Errors
    ///
    /// Returns [`StageGraphError::Parse`] with the source attached when the
    /// text is not a valid description.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stagegraph::LayoutBuilder;
    ///
    /// let builder = LayoutBuilder::default();
    /// let description = builder
    ///     .parse(r#"{ "name": "Onboarding", "graph": { "nodes": [], "edges": [] } }"#)
    ///     .expect("Failed to parse");
    /// assert!(description.is_empty());
    /// ```
    pub fn parse(&self, source: &str) -> Result<GraphDescription, StageGraphError> {
        info!("Parsing graph description");

        let value: serde_json::Value = serde_json::from_str(source)
            .map_err(|err| StageGraphError::new_parse_error(err, source))?;

        let description = if value.get("graph").is_some() {
            let payload: WorkflowPayload = serde_json::from_str(source)
                .map_err(|err| StageGraphError::new_parse_error(err, source))?;
            debug!(name:? = payload.name(); "Unwrapping workflow payload");
            payload.into_graph()
        } else {
            serde_json::from_str(source)
                .map_err(|err| StageGraphError::new_parse_error(err, source))?
        };

        debug!(
            nodes = description.nodes().len(),
            edges = description.edges().len();
            "Graph description parsed"
        );
        trace!(description:?; "Parsed description");

        Ok(description)
    }

    /// Lay out a graph description.
    ///
    /// # Errors
    ///
    /// Returns [`StageGraphError::Config`] when the configuration is invalid and
    /// [`StageGraphError::Validation`] when the description is rejected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stagegraph::{EdgeKind, LayoutBuilder};
    /// use stagegraph::description::{
    ///     GraphDescription, StageData, StageDescription, TransitionDescription,
    /// };
    ///
    /// let description = GraphDescription::new(
    ///     vec![
    ///         StageDescription::new("a", StageData::default()),
    ///         StageDescription::new("b", StageData::default()),
    ///     ],
    ///     vec![TransitionDescription::new("e1", "a", "b")],
    /// );
    ///
    /// let layout = LayoutBuilder::default()
    ///     .layout(&description)
    ///     .expect("Failed to lay out");
    /// assert_eq!(layout.edge("e1").unwrap().kind(), EdgeKind::Forward);
    /// ```
    pub fn layout(&self, description: &GraphDescription) -> Result<LayoutResult, StageGraphError> {
        self.config.validate()?;

        info!(
            nodes = description.nodes().len(),
            edges = description.edges().len();
            "Laying out graph description"
        );
        let graph = StageGraph::from_description(description)?;
        debug!("Stage graph validated");

        let result = layout::Engine::new(&self.config).calculate(&graph);
        info!(
            direction:% = result.direction(),
            width = result.bounding_box().width(),
            height = result.bounding_box().height();
            "Layout ready"
        );

        Ok(result)
    }
}
