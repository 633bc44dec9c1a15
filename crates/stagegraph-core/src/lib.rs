//! Stagegraph Core Types
//!
//! This crate provides the foundational types shared by the stagegraph layout
//! engine and its command-line front end:
//!
//! - **Identifiers**: Shared, per-graph stage and transition ids ([`identifier::Id`])
//! - **Geometry**: Points, sizes, bounds and insets ([`geometry`] module)
//! - **Description**: The raw workflow graph description as served by the
//!   workflow API ([`description`] module)

pub mod description;
pub mod geometry;
pub mod identifier;
