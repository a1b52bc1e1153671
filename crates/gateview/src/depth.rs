//! Depth analysis: distance of every node from the primary inputs.
//!
//! `depth(n) = 0` when `n` has no predecessors, otherwise
//! `1 + max(depth(p))` over its predecessors.
//!
//! # Feedback
//!
//! Netlists with flip-flops contain cycles, where the definition above has no
//! fixed point. The traversal keeps a set of nodes currently on the stack; a
//! predecessor found in that set counts as depth 0 and the walk continues.
//! This always terminates, but depths of nodes on a cycle depend on where the
//! cycle was entered and are not true longest-path depths.

use std::{borrow::Cow, collections::HashSet};

use indexmap::IndexMap;
use log::debug;

use gateview_core::{identifier::Id, netlist::Topology};

/// Depth of every node of a [`Topology`].
#[derive(Debug, Clone, Default)]
pub struct Depths {
    depths: IndexMap<Id, usize>,
}

/// One pending node of the explicit traversal stack.
struct Frame<'t> {
    node: Id,
    predecessors: Cow<'t, [Id]>,
    next: usize,
    depth: usize,
}

impl<'t> Frame<'t> {
    fn new(node: Id, topology: &'t impl Topology) -> Self {
        Self {
            node,
            predecessors: topology.predecessors(node),
            next: 0,
            depth: 0,
        }
    }
}

impl Depths {
    /// Computes the depth of every node, visiting roots in node order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gateview::depth::Depths;
    /// # use gateview_core::identifier::Id;
    /// let graph = gateview_parser::parse_netlist("INPUT(a)\nb = NOT(a)\nc = AND(a, b)\n")
    ///     .into_parts()
    ///     .0;
    /// let depths = Depths::compute(&graph);
    ///
    /// assert_eq!(depths.depth(Id::new("a")), 0);
    /// assert_eq!(depths.depth(Id::new("c")), 2);
    /// ```
    pub fn compute(topology: &impl Topology) -> Self {
        let mut depths = IndexMap::with_capacity(topology.node_count());
        let mut visiting = HashSet::new();

        for root in topology.nodes() {
            if depths.contains_key(&root) {
                continue;
            }

            visiting.insert(root);
            let mut stack = vec![Frame::new(root, topology)];

            while let Some(frame) = stack.last_mut() {
                if let Some(&predecessor) = frame.predecessors.get(frame.next) {
                    frame.next += 1;
                    if let Some(&resolved) = depths.get(&predecessor) {
                        frame.depth = frame.depth.max(resolved + 1);
                    } else if visiting.contains(&predecessor) {
                        // Re-entered through a cycle: counts as depth 0.
                        frame.depth = frame.depth.max(1);
                    } else {
                        visiting.insert(predecessor);
                        stack.push(Frame::new(predecessor, topology));
                    }
                    continue;
                }

                let Some(done) = stack.pop() else { break };
                visiting.remove(&done.node);
                depths.insert(done.node, done.depth);
                if let Some(parent) = stack.last_mut() {
                    parent.depth = parent.depth.max(done.depth + 1);
                }
            }
        }

        let result = Self { depths };
        debug!(
            nodes = result.len(),
            max_depth = result.max_depth().unwrap_or(0);
            "Depths computed"
        );
        result
    }

    /// Returns the depth of a node, or 0 for nodes that were not analyzed.
    pub fn depth(&self, id: Id) -> usize {
        self.get(id).unwrap_or(0)
    }

    /// Returns the depth of a node if it was analyzed.
    pub fn get(&self, id: Id) -> Option<usize> {
        self.depths.get(&id).copied()
    }

    /// Returns the largest depth, or `None` when empty.
    pub fn max_depth(&self) -> Option<usize> {
        self.depths.values().copied().max()
    }

    /// Returns `(node, depth)` pairs in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = (Id, usize)> + '_ {
        self.depths.iter().map(|(&id, &depth)| (id, depth))
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}
