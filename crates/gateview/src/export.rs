//! Export of diagrams to output formats.
//!
//! ```text
//! Netlist + reports
//!     ↓ parse
//! Graph, HighlightSet
//!     ↓ depth, layout, routing
//! Diagram
//!     ↓ export (this module)
//! Output file
//! ```
//!
//! [`Error`] converts into [`GateviewError::Export`] at the crate boundary.
//!
//! [`GateviewError::Export`]: crate::GateviewError::Export

/// SVG export backend.
pub mod svg;

use std::{error, fmt, io};

use crate::diagram::Diagram;

/// Abstraction for diagram export backends.
pub trait Exporter {
    /// Writes `diagram` in the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the diagram cannot be converted, or
    /// [`Error::Io`] if writing the output fails.
    fn export_diagram(&self, diagram: &Diagram) -> Result<(), Error>;
}

/// Errors that can occur during diagram export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
