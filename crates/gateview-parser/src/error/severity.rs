//! Severity levels for diagnostics.

use std::fmt;

/// How serious a diagnostic is.
///
/// Parsing always completes, so even an [`Severity::Error`] only describes
/// input that was dropped; the caller decides whether that aborts a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Input that was probably meant to be meaningful but could not be used.
    Warning,
    /// Input that makes the result unusable for the requested purpose.
    Error,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning.is_warning());
        assert_eq!(Severity::Error.to_string(), "error");
    }
}
