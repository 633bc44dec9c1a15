//! CLI logic for the stagegraph layout tool.
//!
//! This module reads a JSON graph description, lays it out, and writes the
//! resulting layout as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use stagegraph::{LayoutBuilder, StageGraphError};

/// Run the stagegraph CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `StageGraphError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - JSON parsing errors
/// - Graph validation errors
pub fn run(args: &Args) -> Result<(), StageGraphError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing graph description"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(direction) = args.direction {
        info!(direction:%; "Overriding layout direction");
        app_config = app_config.with_direction(direction);
    }

    let source = fs::read_to_string(&args.input)?;

    let builder = LayoutBuilder::new(app_config);
    let description = builder.parse(&source)?;
    let layout = builder.layout(&description)?;

    let json = if args.compact {
        serde_json::to_string(&layout)
    } else {
        serde_json::to_string_pretty(&layout)
    }
    .map_err(|err| StageGraphError::Io(err.into()))?;

    fs::write(&args.output, json)?;

    info!(
        output_file = args.output,
        nodes = layout.nodes().len(),
        edges = layout.edges().len();
        "Layout exported successfully"
    );

    Ok(())
}
