//! Configuration types for stage graph layout.
//!
//! All types implement [`serde::Deserialize`] with defaults on every field, so
//! a partial configuration file only overrides what it names.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and edge settings.
//! - [`LayoutConfig`] - Direction, node size and spacing used by the Coordinator.
//! - [`EdgeConfig`] - Row thresholds used by the EdgeClassifier.
//!
//! # Example
//!
//! ```
//! # use stagegraph::config::{AppConfig, Direction};
//! let config = AppConfig::default();
//! assert_eq!(config.layout().direction(), Direction::Right);
//! assert!(config.validate().is_ok());
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use stagegraph_core::geometry::{Insets, Size};

use crate::StageGraphError;

/// Axis and sense along which layers advance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Layers grow towards +x; rows share a y coordinate.
    #[default]
    Right,
    /// Layers grow towards -x; rows share a y coordinate.
    Left,
    /// Layers grow towards +y; rows share an x coordinate.
    Down,
    /// Layers grow towards -y; rows share an x coordinate.
    Up,
}

impl Direction {
    /// Whether layers advance along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Right | Self::Left)
    }

    /// Whether layers advance towards smaller coordinates.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::Left | Self::Up)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Right => f.write_str("right"),
            Self::Left => f.write_str("left"),
            Self::Down => f.write_str("down"),
            Self::Up => f.write_str("up"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "right" => Ok(Self::Right),
            "left" => Ok(Self::Left),
            "down" => Ok(Self::Down),
            "up" => Ok(Self::Up),
            other => Err(format!(
                "unknown direction `{other}`, expected `right`, `left`, `down` or `up`"
            )),
        }
    }
}

/// Top-level configuration combining layout and edge settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Edge classification section.
    #[serde(default)]
    edges: EdgeConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified sections.
    pub fn new(layout: LayoutConfig, edges: EdgeConfig) -> Self {
        Self { layout, edges }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the edge classification configuration.
    pub fn edges(&self) -> &EdgeConfig {
        &self.edges
    }

    /// Returns a copy with the layout direction replaced.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.layout = self.layout.with_direction(direction);
        self
    }

    /// Checks that sizes are positive and spacings and thresholds non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`StageGraphError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<(), StageGraphError> {
        let layout = &self.layout;
        let positive = [
            ("layout.node_width", layout.node_width),
            ("layout.node_height", layout.node_height),
        ];
        let non_negative = [
            ("layout.layer_spacing", layout.layer_spacing),
            ("layout.node_spacing", layout.node_spacing),
            ("layout.component_spacing", layout.component_spacing),
            ("layout.padding", layout.padding),
            ("edges.same_row_tolerance", self.edges.same_row_tolerance),
            ("edges.row_band", self.edges.row_band),
        ];

        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(StageGraphError::Config(format!(
                    "`{name}` must be a positive number, got {value}"
                )));
            }
        }
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(StageGraphError::Config(format!(
                    "`{name}` must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Node geometry, spacing and direction for the Coordinator, plus the sweep
/// count of the CrossingReducer.
///
/// Defaults match the dashboard canvas: 220×100 nodes, 120 between layers,
/// 100 between nodes of a layer, 50 padding.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    direction: Direction,
    node_width: f32,
    node_height: f32,
    layer_spacing: f32,
    node_spacing: f32,
    component_spacing: f32,
    padding: f32,
    ordering_passes: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Right,
            node_width: 220.0,
            node_height: 100.0,
            layer_spacing: 120.0,
            node_spacing: 100.0,
            component_spacing: 100.0,
            padding: 50.0,
            ordering_passes: 4,
        }
    }
}

impl LayoutConfig {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the size every stage node is drawn with.
    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }

    /// Gap between consecutive layers along the primary axis.
    pub fn layer_spacing(&self) -> f32 {
        self.layer_spacing
    }

    /// Gap between neighbouring nodes of one layer along the cross axis.
    pub fn node_spacing(&self) -> f32 {
        self.node_spacing
    }

    /// Gap between stacked disconnected components.
    pub fn component_spacing(&self) -> f32 {
        self.component_spacing
    }

    pub fn padding(&self) -> Insets {
        Insets::uniform(self.padding)
    }

    /// Number of down+up barycenter sweeps.
    pub fn ordering_passes(&self) -> usize {
        self.ordering_passes
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_node_size(mut self, width: f32, height: f32) -> Self {
        self.node_width = width;
        self.node_height = height;
        self
    }

    pub fn with_spacing(mut self, layer_spacing: f32, node_spacing: f32) -> Self {
        self.layer_spacing = layer_spacing;
        self.node_spacing = node_spacing;
        self
    }

    pub fn with_component_spacing(mut self, spacing: f32) -> Self {
        self.component_spacing = spacing;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_ordering_passes(mut self, passes: usize) -> Self {
        self.ordering_passes = passes;
        self
    }
}

/// Thresholds of the same-row test, as fractions of the node's cross-axis
/// extent (its height when layers grow horizontally).
///
/// A stage only counts as sitting between the ends of a skip when it is
/// within both thresholds of the source's row, so `row_band` can narrow the
/// row but never widen it past the endpoint test.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Endpoints whose cross coordinates differ by less than this share a row.
    same_row_tolerance: f32,
    /// Upper bound on how far a third node may sit from the source's row.
    row_band: f32,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            same_row_tolerance: 0.5,
            row_band: 1.0,
        }
    }
}

impl EdgeConfig {
    pub fn new(same_row_tolerance: f32, row_band: f32) -> Self {
        Self {
            same_row_tolerance,
            row_band,
        }
    }

    pub fn same_row_tolerance(&self) -> f32 {
        self.same_row_tolerance
    }

    pub fn row_band(&self) -> f32 {
        self.row_band
    }
}
