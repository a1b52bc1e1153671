//! Sub-graph views over a [`Graph`].
//!
//! A [`Subgraph`] selects some nodes and edges of a graph and implements
//! [`Topology`], so depth analysis, layout and routing run on it unchanged.
//! Node kinds are always taken from the full graph.

use std::{
    borrow::Cow,
    collections::{HashSet, VecDeque},
};

use indexmap::{IndexMap, IndexSet};
use log::debug;

use gateview_core::{
    identifier::Id,
    netlist::{Edge, Graph, NodeKind, Topology},
};

use crate::{error::GateviewError, highlight::HighlightSet};

/// A selection of nodes and edges of a [`Graph`].
#[derive(Debug, Clone)]
pub struct Subgraph<'g> {
    graph: &'g Graph,
    nodes: IndexSet<Id>,
    edges: IndexSet<Edge>,
    predecessors: IndexMap<Id, Vec<Id>>,
}

impl<'g> Subgraph<'g> {
    fn new(graph: &'g Graph, nodes: IndexSet<Id>, edges: IndexSet<Edge>) -> Self {
        let mut predecessors: IndexMap<Id, Vec<Id>> = IndexMap::new();
        for edge in &edges {
            predecessors
                .entry(edge.target())
                .or_default()
                .push(edge.source());
        }
        Self {
            graph,
            nodes,
            edges,
            predecessors,
        }
    }

    /// Builds the view of the highlighted part of `graph`.
    ///
    /// Highlighted nodes missing from the graph are dropped, as are
    /// highlighted pairs with a missing endpoint. Nodes and edges are ordered
    /// by name so the view does not depend on report order.
    pub fn extracted(graph: &'g Graph, highlights: &HighlightSet) -> Self {
        let mut nodes: Vec<Id> = highlights.nodes().filter(|&id| graph.contains(id)).collect();
        nodes.sort_by(Id::cmp_by_name);

        let mut edges: Vec<Edge> = highlights
            .edges()
            .filter(|&(source, target)| graph.contains(source) && graph.contains(target))
            .map(|(source, target)| Edge::new(source, target))
            .collect();
        edges.sort_by(|a, b| {
            a.source()
                .cmp_by_name(&b.source())
                .then_with(|| a.target().cmp_by_name(&b.target()))
        });

        let view = Self::new(graph, nodes.into_iter().collect(), edges.into_iter().collect());
        debug!(
            nodes = view.node_count(),
            edges = view.edge_count(),
            dropped = highlights.node_count() - view.node_count();
            "Extracted highlighted view"
        );
        view
    }

    /// Builds the fan-in cone of a primary output.
    ///
    /// Walks predecessors breadth-first from `target`. A node is part of the
    /// view when it is reached within `max_depth` hops (the target itself
    /// is at hop 0); each signal is only enqueued the first time it is seen.
    /// An edge is kept when both of its endpoints are part of the view.
    ///
    /// # Errors
    ///
    /// Returns [`GateviewError::UnknownOutput`] if `target` is not a declared
    /// primary output of `graph`.
    pub fn path_to_output(
        graph: &'g Graph,
        target: Id,
        max_depth: usize,
    ) -> Result<Self, GateviewError> {
        if !graph.is_output(target) {
            return Err(GateviewError::UnknownOutput(target.to_string()));
        }

        let mut seen = HashSet::from([target]);
        let mut queue = VecDeque::from([(target, 0usize)]);
        let mut nodes = IndexSet::new();
        let mut candidates = Vec::new();

        while let Some((node, hops)) = queue.pop_front() {
            if hops >= max_depth {
                continue;
            }
            nodes.insert(node);

            for &input in graph.predecessors(node) {
                if seen.insert(input) && hops + 1 < max_depth {
                    queue.push_back((input, hops + 1));
                }
                candidates.push(Edge::new(input, node));
            }
        }

        let edges: IndexSet<Edge> = candidates
            .into_iter()
            .filter(|edge| nodes.contains(&edge.source()) && nodes.contains(&edge.target()))
            .collect();

        let view = Self::new(graph, nodes, edges);
        debug!(
            output = target.to_string(),
            max_depth = max_depth,
            nodes = view.node_count(),
            edges = view.edge_count();
            "Collected fan-in cone"
        );
        Ok(view)
    }

    /// Returns the graph this view selects from.
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Topology for Subgraph<'_> {
    fn nodes(&self) -> impl Iterator<Item = Id> + '_ {
        self.nodes.iter().copied()
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn contains(&self, id: Id) -> bool {
        self.nodes.contains(&id)
    }

    fn classify(&self, id: Id) -> NodeKind {
        self.graph.classify(id)
    }

    fn predecessors(&self, id: Id) -> Cow<'_, [Id]> {
        self.predecessors
            .get(&id)
            .map_or(Cow::Borrowed(&[]), |inputs| Cow::Borrowed(inputs.as_slice()))
    }

    fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use gateview_core::netlist::Declaration;

    use super::*;

    fn names(view: &Subgraph<'_>) -> Vec<String> {
        Topology::nodes(view).map(|id| id.to_string()).collect()
    }

    fn gate(output: &str, gate_type: &str, inputs: &[&str]) -> Declaration {
        Declaration::Gate {
            output: Id::new(output),
            gate_type: Id::new(gate_type),
            inputs: inputs.iter().map(|name| Id::new(name)).collect(),
        }
    }

    /// `i0 -> a -> b -> c -> out`, with `i1` feeding `a` and a flip-flop `q`
    /// feeding `b`.
    fn chain() -> Graph {
        Graph::from_declarations([
            Declaration::Input(Id::new("i0")),
            Declaration::Input(Id::new("i1")),
            Declaration::Output(Id::new("out")),
            Declaration::FlipFlop {
                output: Id::new("q"),
                data: Id::new("c"),
            },
            gate("a", "NAND", &["i0", "i1"]),
            gate("b", "AND", &["a", "q"]),
            gate("c", "NOT", &["b"]),
            gate("out", "BUF", &["c"]),
        ])
    }

    #[test]
    fn test_extracted_drops_unknown_nodes() {
        let graph = chain();
        let path = ["i0", "a", "ghost", "b"].map(Id::new);
        let highlights = HighlightSet::from_sequences([&path[..]]);
        let view = Subgraph::extracted(&graph, &highlights);

        assert_eq!(names(&view), vec!["a", "b", "i0"]);
        let edges: Vec<Edge> = Topology::edges(&view).collect();
        assert_eq!(edges, vec![Edge::new(Id::new("i0"), Id::new("a"))]);
        assert_eq!(view.predecessors(Id::new("a")).as_ref(), &[Id::new("i0")]);
        assert!(view.predecessors(Id::new("b")).is_empty());
    }

    #[test]
    fn test_extracted_keeps_full_graph_kinds() {
        let graph = chain();
        let path = ["q", "b"].map(Id::new);
        let view = Subgraph::extracted(&graph, &HighlightSet::from_sequences([&path[..]]));

        assert_eq!(view.classify(Id::new("q")), NodeKind::FlipFlop);
        assert_eq!(view.classify(Id::new("b")), NodeKind::Gate(Id::new("AND")));
    }

    #[test]
    fn test_extracted_from_empty_highlights_is_empty() {
        let graph = chain();
        let view = Subgraph::extracted(&graph, &HighlightSet::default());

        assert!(view.is_empty());
        assert_eq!(view.edge_count(), 0);
    }

    #[test]
    fn test_path_to_output_full_cone() {
        let graph = chain();
        let view = Subgraph::path_to_output(&graph, Id::new("out"), 10).unwrap();

        assert_eq!(names(&view), vec!["out", "c", "b", "a", "q", "i0", "i1"]);
        // The loop edge c -> q is inside the cone too.
        assert!(Topology::edges(&view).any(|edge| edge == Edge::new(Id::new("c"), Id::new("q"))));
        assert_eq!(view.edge_count(), 7);
    }

    #[test]
    fn test_path_to_output_respects_depth_bound() {
        let graph = chain();
        let view = Subgraph::path_to_output(&graph, Id::new("out"), 2).unwrap();

        assert_eq!(names(&view), vec!["out", "c"]);
        assert_eq!(view.edge_count(), 1);

        let none = Subgraph::path_to_output(&graph, Id::new("out"), 0).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_path_to_output_rejects_non_outputs() {
        let graph = chain();

        for name in ["c", "missing"] {
            let error = Subgraph::path_to_output(&graph, Id::new(name), 10).unwrap_err();
            assert!(matches!(error, GateviewError::UnknownOutput(ref target) if target == name));
        }
    }
}
