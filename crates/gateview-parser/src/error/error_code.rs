//! Diagnostic codes.
//!
//! Codes are grouped by input kind:
//! - `W0xx` - netlist warnings
//! - `W01x` - timing report warnings

use std::fmt;

/// Stable code attached to a [`Diagnostic`](super::Diagnostic) so it can be
/// searched for and filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Netlist (W00x)
    // =========================================================================
    /// Malformed netlist line.
    ///
    /// The line is neither blank, a `#` comment, nor one of `INPUT(x)`,
    /// `OUTPUT(x)`, `y = DFF(x)` or `y = TYPE(a, b, ...)`. It is skipped.
    W001,

    // =========================================================================
    // Timing report (W01x)
    // =========================================================================
    /// Report without critical paths.
    ///
    /// No `# Path <n> (delay: <d>)` block with at least one node was found.
    /// The run continues without highlighting.
    W010,
}

impl ErrorCode {
    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::W001 => "malformed netlist line",
            ErrorCode::W010 => "no critical paths in report",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ErrorCode::W001 => "W001",
            ErrorCode::W010 => "W010",
        };
        f.write_str(code)
    }
}
