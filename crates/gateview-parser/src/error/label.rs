//! Source spans annotated with a short message.

use crate::span::Span;

/// A message pinned to a byte range of the parsed text, typically the whole
/// line a diagnostic refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    span: Span,
    message: String,
}

impl Label {
    /// Creates a label.
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }

    /// Returns the labelled range.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the label text.
    pub fn message(&self) -> &str {
        &self.message
    }
}
