//! Circuit statistics.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use log::debug;
use petgraph::{
    algo::tarjan_scc,
    graph::{DiGraph, NodeIndex},
};

use gateview_core::{identifier::Id, netlist::Graph};

/// Summary counts of a [`Graph`].
///
/// The [`Display`](fmt::Display) output is the report printed by the CLI:
///
/// ```text
/// === Circuit Statistics ===
/// Inputs: 4
/// Outputs: 1
/// DFFs: 3
/// Total gates: 10
///
/// Gate types:
///   AND: 1
///   NOT: 2
///
/// Total nodes: 17
/// Total edges: 21
/// Feedback loops: 1
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    inputs: usize,
    outputs: usize,
    flip_flops: usize,
    gates: usize,
    gate_types: BTreeMap<String, usize>,
    nodes: usize,
    edges: usize,
    feedback_loops: usize,
}

impl Statistics {
    /// Collects the statistics of `graph`.
    pub fn collect(graph: &Graph) -> Self {
        let mut gate_types = BTreeMap::new();
        let mut gates = 0;
        for (_, gate_type, _) in graph.gates() {
            gates += 1;
            *gate_types.entry(gate_type.to_string()).or_insert(0) += 1;
        }

        let stats = Self {
            inputs: graph.inputs().count(),
            outputs: graph.outputs().count(),
            flip_flops: graph.flip_flops().count(),
            gates,
            gate_types,
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            feedback_loops: count_feedback_loops(graph),
        };
        debug!(
            nodes = stats.nodes,
            edges = stats.edges,
            feedback_loops = stats.feedback_loops;
            "Statistics collected"
        );
        stats
    }

    pub fn inputs(&self) -> usize {
        self.inputs
    }

    pub fn outputs(&self) -> usize {
        self.outputs
    }

    pub fn flip_flops(&self) -> usize {
        self.flip_flops
    }

    /// Returns the number of combinational gates, flip-flops excluded.
    pub fn gates(&self) -> usize {
        self.gates
    }

    /// Returns the gate count per subtype, ordered by subtype.
    pub fn gate_types(&self) -> &BTreeMap<String, usize> {
        &self.gate_types
    }

    pub fn nodes(&self) -> usize {
        self.nodes
    }

    pub fn edges(&self) -> usize {
        self.edges
    }

    /// Returns the number of strongly connected components that contain a cycle.
    pub fn feedback_loops(&self) -> usize {
        self.feedback_loops
    }
}

/// Counts components with more than one node, plus single nodes driving themselves.
fn count_feedback_loops(graph: &Graph) -> usize {
    let mut digraph: DiGraph<Id, ()> = DiGraph::with_capacity(graph.node_count(), graph.edge_count());
    let mut indices: HashMap<Id, NodeIndex> = HashMap::with_capacity(graph.node_count());
    for id in graph.nodes() {
        indices.insert(id, digraph.add_node(id));
    }
    for edge in graph.edges() {
        if let (Some(&source), Some(&target)) =
            (indices.get(&edge.source()), indices.get(&edge.target()))
        {
            digraph.add_edge(source, target, ());
        }
    }

    tarjan_scc(&digraph)
        .into_iter()
        .filter(|component| match component.as_slice() {
            [single] => digraph.contains_edge(*single, *single),
            _ => true,
        })
        .count()
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Circuit Statistics ===")?;
        writeln!(f, "Inputs: {}", self.inputs)?;
        writeln!(f, "Outputs: {}", self.outputs)?;
        writeln!(f, "DFFs: {}", self.flip_flops)?;
        writeln!(f, "Total gates: {}", self.gates)?;
        writeln!(f)?;
        writeln!(f, "Gate types:")?;
        for (gate_type, count) in &self.gate_types {
            writeln!(f, "  {gate_type}: {count}")?;
        }
        writeln!(f)?;
        writeln!(f, "Total nodes: {}", self.nodes)?;
        writeln!(f, "Total edges: {}", self.edges)?;
        write!(f, "Feedback loops: {}", self.feedback_loops)
    }
}
