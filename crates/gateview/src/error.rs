//! Error types for gateview operations.
//!
//! Parsing never fails (see [`gateview_parser`]), so [`GateviewError`] only
//! covers I/O on explicitly requested inputs, unknown targets and export.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for gateview operations.
#[derive(Debug, Error)]
pub enum GateviewError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A requested timing report does not exist.
    #[error("critical path report `{}` not found", path.display())]
    MissingReport { path: PathBuf },

    /// `--path` named a signal that is not a primary output.
    #[error("`{0}` is not an output")]
    UnknownOutput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for GateviewError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}
