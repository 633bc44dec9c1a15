//! Command-line argument definitions for the stagegraph CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, layout overrides, and logging verbosity.

use clap::Parser;

use stagegraph::config::Direction;

/// Command-line arguments for the stagegraph layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input graph description (JSON)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output layout file (JSON)
    #[arg(short, long, default_value = "layout.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Layout direction (right, left, down, up); overrides the configuration file
    #[arg(short, long)]
    pub direction: Option<Direction>,

    /// Write the layout as a single line instead of pretty-printed JSON
    #[arg(long)]
    pub compact: bool,
}
