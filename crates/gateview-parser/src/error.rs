//! Diagnostics produced while reading netlists and timing reports.
//!
//! Neither parser ever fails: malformed input is skipped and described by a
//! [`Diagnostic`] so the caller decides how loudly to report it.
//!
//! # Example
//!
//! ```
//! # use gateview_parser::error::{Diagnostic, ErrorCode};
//! # use gateview_parser::Span;
//!
//! let diag = Diagnostic::warning("skipped malformed netlist line")
//!     .with_code(ErrorCode::W001)
//!     .with_label(Span::new(12..30), "not a declaration")
//!     .with_help("expected `INPUT(x)`, `OUTPUT(x)` or `y = TYPE(a, b)`");
//!
//! assert!(diag.severity().is_warning());
//! ```

mod diagnostic;
mod error_code;
mod label;
mod severity;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use severity::Severity;
