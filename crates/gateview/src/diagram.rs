//! Laid-out and routed diagrams, ready for export.

use crate::{highlight::HighlightSet, layout::Layout, routing::RoutedEdge};

/// Positions, wires and highlight state of one diagram.
///
/// Produced by [`Visualizer`](crate::Visualizer) and consumed by the
/// [`export`](crate::export) backends.
#[derive(Debug, Clone)]
pub struct Diagram {
    title: String,
    layout: Layout,
    routes: Vec<RoutedEdge>,
    highlights: HighlightSet,
}

impl Diagram {
    pub fn new(
        title: impl Into<String>,
        layout: Layout,
        routes: Vec<RoutedEdge>,
        highlights: HighlightSet,
    ) -> Self {
        Self {
            title: title.into(),
            layout,
            routes,
            highlights,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Returns the routed wires in routing order.
    pub fn routes(&self) -> &[RoutedEdge] {
        &self.routes
    }

    pub fn highlights(&self) -> &HighlightSet {
        &self.highlights
    }

    /// Returns `true` if the diagram has no nodes.
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }
}
