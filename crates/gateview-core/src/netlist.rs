//! Circuit graph model.
//!
//! A [`Graph`] is built once from a list of [`Declaration`]s and is immutable
//! afterwards. Every signal mentioned anywhere in the declarations becomes
//! exactly one node; edges run from a driving signal to the gate or
//! flip-flop consuming it.
//!
//! Layout and routing code does not depend on [`Graph`] directly but on the
//! [`Topology`] trait, so the same algorithms run on sub-graph views such as
//! an extracted critical path.

use std::{borrow::Cow, fmt};

use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::identifier::Id;

/// Classification of a node.
///
/// When a signal is declared in several roles, [`Graph::classify`] resolves
/// the kind with the priority `Input > Output > FlipFlop > Gate > Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Primary input.
    Input,
    /// Primary output. Wraps an existing signal, it does not replace its driver.
    Output,
    /// D flip-flop with a single data input.
    FlipFlop,
    /// Combinational gate with an open-ended subtype (`AND`, `NOR`, ...).
    Gate(Id),
    /// Signal that is only referenced, never declared.
    Unknown,
}

impl NodeKind {
    /// Returns `true` for flip-flop nodes.
    pub fn is_flip_flop(&self) -> bool {
        matches!(self, Self::FlipFlop)
    }

    /// Returns `true` for primary outputs.
    pub fn is_output(&self) -> bool {
        matches!(self, Self::Output)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "INPUT"),
            Self::Output => write!(f, "OUTPUT"),
            Self::FlipFlop => write!(f, "DFF"),
            Self::Gate(gate_type) => write!(f, "{gate_type}"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// One statement of a netlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// `INPUT(name)`
    Input(Id),
    /// `OUTPUT(name)`
    Output(Id),
    /// `output = DFF(data)`
    FlipFlop { output: Id, data: Id },
    /// `output = TYPE(in1, in2, ...)`
    Gate {
        output: Id,
        gate_type: Id,
        inputs: Vec<Id>,
    },
}

/// Directed connection from a driving signal to a consuming node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    source: Id,
    target: Id,
}

impl Edge {
    /// Creates an edge from `source` to `target`.
    pub fn new(source: Id, target: Id) -> Self {
        Self { source, target }
    }

    /// Returns the driving signal.
    pub fn source(&self) -> Id {
        self.source
    }

    /// Returns the consuming node.
    pub fn target(&self) -> Id {
        self.target
    }
}

/// Read-only view of a circuit graph used by analysis, layout and routing.
pub trait Topology {
    /// Returns every node in a stable order.
    fn nodes(&self) -> impl Iterator<Item = Id> + '_;

    /// Returns the number of nodes.
    fn node_count(&self) -> usize;

    /// Returns `true` if the node is part of this view.
    fn contains(&self, id: Id) -> bool;

    /// Returns the node's classification.
    fn classify(&self, id: Id) -> NodeKind;

    /// Returns the ordered list of signals feeding the node.
    fn predecessors(&self, id: Id) -> Cow<'_, [Id]>;

    /// Returns every edge in a stable order.
    fn edges(&self) -> impl Iterator<Item = Edge> + '_;
}

#[derive(Debug, Clone)]
enum Driver {
    FlipFlop([Id; 1]),
    Gate { gate_type: Id, inputs: Vec<Id> },
}

impl Driver {
    fn inputs(&self) -> &[Id] {
        match self {
            Self::FlipFlop(data) => data.as_slice(),
            Self::Gate { inputs, .. } => inputs.as_slice(),
        }
    }
}

/// Immutable circuit graph.
///
/// Nodes and edges are kept in first-mention order, so iteration is
/// deterministic for a given netlist. Edges form a set: a gate reading the
/// same signal twice contributes a single edge, while
/// [`predecessors`](Graph::predecessors) keeps the full input list.
///
/// # Examples
///
/// ```
/// use gateview_core::{identifier::Id, netlist::{Declaration, Graph, NodeKind}};
///
/// let graph = Graph::from_declarations([
///     Declaration::Input(Id::new("a")),
///     Declaration::Output(Id::new("b")),
///     Declaration::Gate {
///         output: Id::new("b"),
///         gate_type: Id::new("AND"),
///         inputs: vec![Id::new("a"), Id::new("a")],
///     },
/// ]);
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// assert_eq!(graph.classify(Id::new("b")), NodeKind::Output);
/// assert_eq!(graph.predecessors(Id::new("b")).len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: IndexSet<Id>,
    inputs: IndexSet<Id>,
    outputs: IndexSet<Id>,
    drivers: IndexMap<Id, Driver>,
    edges: IndexSet<Edge>,
}

impl Graph {
    /// Builds a graph from declarations.
    ///
    /// A later declaration driving an already driven signal replaces the
    /// earlier driver.
    pub fn from_declarations(declarations: impl IntoIterator<Item = Declaration>) -> Self {
        let mut graph = Self::default();

        for declaration in declarations {
            match declaration {
                Declaration::Input(id) => {
                    graph.nodes.insert(id);
                    graph.inputs.insert(id);
                }
                Declaration::Output(id) => {
                    graph.nodes.insert(id);
                    graph.outputs.insert(id);
                }
                Declaration::FlipFlop { output, data } => {
                    graph.nodes.insert(output);
                    graph.nodes.insert(data);
                    graph.set_driver(output, Driver::FlipFlop([data]));
                }
                Declaration::Gate {
                    output,
                    gate_type,
                    inputs,
                } => {
                    graph.nodes.insert(output);
                    graph.nodes.extend(inputs.iter().copied());
                    graph.set_driver(output, Driver::Gate { gate_type, inputs });
                }
            }
        }

        graph.edges = graph
            .drivers
            .iter()
            .flat_map(|(&target, driver)| {
                driver
                    .inputs()
                    .iter()
                    .map(move |&source| Edge::new(source, target))
            })
            .collect();

        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len();
            "Graph constructed"
        );

        graph
    }

    fn set_driver(&mut self, output: Id, driver: Driver) {
        if self.drivers.insert(output, driver).is_some() {
            debug!(signal = output.to_string(); "Signal redeclared, replacing previous driver");
        }
    }

    /// Returns the node's kind with priority `Input > Output > FlipFlop > Gate > Unknown`.
    pub fn classify(&self, id: Id) -> NodeKind {
        if self.inputs.contains(&id) {
            return NodeKind::Input;
        }
        if self.outputs.contains(&id) {
            return NodeKind::Output;
        }
        match self.drivers.get(&id) {
            Some(Driver::FlipFlop(_)) => NodeKind::FlipFlop,
            Some(Driver::Gate { gate_type, .. }) => NodeKind::Gate(*gate_type),
            None => NodeKind::Unknown,
        }
    }

    /// Returns the signals feeding the node: the flip-flop's data input, the
    /// gate's input list, or an empty slice for undriven signals.
    pub fn predecessors(&self, id: Id) -> &[Id] {
        self.drivers
            .get(&id)
            .map(Driver::inputs)
            .unwrap_or_default()
    }

    /// Returns every node in first-mention order.
    pub fn nodes(&self) -> impl Iterator<Item = Id> + '_ {
        self.nodes.iter().copied()
    }

    /// Returns every edge, grouped by consuming node in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }

    /// Returns `true` if the signal is a node of this graph.
    pub fn contains(&self, id: Id) -> bool {
        self.nodes.contains(&id)
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the declared primary inputs.
    pub fn inputs(&self) -> impl Iterator<Item = Id> + '_ {
        self.inputs.iter().copied()
    }

    /// Returns the declared primary outputs.
    pub fn outputs(&self) -> impl Iterator<Item = Id> + '_ {
        self.outputs.iter().copied()
    }

    /// Returns `true` if the signal is declared as a primary output.
    pub fn is_output(&self, id: Id) -> bool {
        self.outputs.contains(&id)
    }

    /// Returns `(output, data input)` for every flip-flop.
    pub fn flip_flops(&self) -> impl Iterator<Item = (Id, Id)> + '_ {
        self.drivers.iter().filter_map(|(&output, driver)| match driver {
            Driver::FlipFlop([data]) => Some((output, *data)),
            Driver::Gate { .. } => None,
        })
    }

    /// Returns `(output, subtype, inputs)` for every gate.
    pub fn gates(&self) -> impl Iterator<Item = (Id, Id, &[Id])> + '_ {
        self.drivers.iter().filter_map(|(&output, driver)| match driver {
            Driver::Gate { gate_type, inputs } => Some((output, *gate_type, inputs.as_slice())),
            Driver::FlipFlop(_) => None,
        })
    }
}

impl FromIterator<Declaration> for Graph {
    fn from_iter<T: IntoIterator<Item = Declaration>>(iter: T) -> Self {
        Self::from_declarations(iter)
    }
}

impl Topology for Graph {
    fn nodes(&self) -> impl Iterator<Item = Id> + '_ {
        Graph::nodes(self)
    }

    fn node_count(&self) -> usize {
        Graph::node_count(self)
    }

    fn contains(&self, id: Id) -> bool {
        Graph::contains(self, id)
    }

    fn classify(&self, id: Id) -> NodeKind {
        Graph::classify(self, id)
    }

    fn predecessors(&self, id: Id) -> Cow<'_, [Id]> {
        Cow::Borrowed(Graph::predecessors(self, id))
    }

    fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        Graph::edges(self)
    }
}
