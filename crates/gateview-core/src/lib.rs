//! Gateview Core Types and Definitions
//!
//! This crate provides the foundational types used by the gateview netlist
//! visualizer:
//!
//! - **Identifiers**: interned signal names ([`identifier::Id`])
//! - **Netlist**: the immutable circuit graph model ([`netlist::Graph`])
//! - **Geometry**: layout-space points and bounds ([`geometry`] module)
//! - **Colors**: CSS color handling ([`color::Color`])
//! - **Draw**: stroke definitions for renderers ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod identifier;
pub mod netlist;
