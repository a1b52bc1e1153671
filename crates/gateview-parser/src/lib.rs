//! # Gateview Parser
//!
//! Readers for the two text inputs of the visualizer:
//!
//! - [`parse_netlist`]: `.bench` netlist declarations into a
//!   [`Graph`](gateview_core::netlist::Graph)
//! - [`parse_report`]: critical-path blocks of a timing report into
//!   [`CriticalPath`]s
//!
//! Both parsers are tolerant. They skip what they cannot use and describe it
//! with [`error::Diagnostic`]s instead of failing.
//!
//! ```
//! let netlist = gateview_parser::parse_netlist("INPUT(a)\nOUTPUT(y)\ny = NOT(a)\n");
//! let report = gateview_parser::parse_report("# Path 0 (delay: 2.0)\n#--\na\ny\n#--\n");
//!
//! assert_eq!(netlist.graph().edge_count(), 1);
//! assert_eq!(report.paths()[0].nodes().len(), 2);
//! ```

pub mod error;
mod netlist;
mod report;
mod span;

pub use netlist::{ParsedNetlist, parse_netlist};
pub use report::{CriticalPath, ParsedReport, parse_report};
pub use span::Span;
