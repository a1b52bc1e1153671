//! Highlight sets built from critical paths.

use std::collections::HashSet;

use gateview_core::{identifier::Id, netlist::Edge};
use gateview_parser::CriticalPath;

/// Nodes and consecutive-pair edges of one or more critical paths.
///
/// Both collections are sets, so the result does not depend on the order in
/// which paths are added. Pairs are only taken within a path, never across
/// two paths.
///
/// ```
/// # use gateview::highlight::HighlightSet;
/// # use gateview_core::identifier::Id;
/// let a = [Id::new("a"), Id::new("b")];
/// let c = [Id::new("c")];
/// let highlights = HighlightSet::from_sequences([&a[..], &c[..]]);
///
/// assert_eq!(highlights.node_count(), 3);
/// assert!(highlights.contains_edge(Id::new("a"), Id::new("b")));
/// assert!(!highlights.contains_edge(Id::new("b"), Id::new("c")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightSet {
    nodes: HashSet<Id>,
    edges: HashSet<(Id, Id)>,
}

impl HighlightSet {
    /// Builds the set from node sequences. Empty sequences are skipped.
    pub fn from_sequences<I, S>(sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[Id]>,
    {
        let mut set = Self::default();
        for sequence in sequences {
            set.add_sequence(sequence.as_ref());
        }
        set
    }

    /// Builds the set from parsed critical paths.
    pub fn from_paths<'a>(paths: impl IntoIterator<Item = &'a CriticalPath>) -> Self {
        Self::from_sequences(paths.into_iter().map(CriticalPath::nodes))
    }

    fn add_sequence(&mut self, sequence: &[Id]) {
        self.nodes.extend(sequence.iter().copied());
        self.edges
            .extend(sequence.windows(2).map(|pair| (pair[0], pair[1])));
    }

    /// Returns the highlighted nodes, in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = Id> + '_ {
        self.nodes.iter().copied()
    }

    /// Returns the highlighted `(source, target)` pairs, in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = (Id, Id)> + '_ {
        self.edges.iter().copied()
    }

    pub fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains(&id)
    }

    pub fn contains_edge(&self, source: Id, target: Id) -> bool {
        self.edges.contains(&(source, target))
    }

    /// Returns `true` if the graph edge is highlighted.
    pub fn highlights(&self, edge: Edge) -> bool {
        self.contains_edge(edge.source(), edge.target())
    }

    /// Returns `true` when at least one node is highlighted, meaning every
    /// other node and edge should be drawn faded.
    pub fn is_active(&self) -> bool {
        !self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
