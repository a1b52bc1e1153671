//! Layered placement of netlist nodes.
//!
//! Combinational nodes are placed in columns by depth, with primary outputs
//! pulled into one extra column on the right. Flip-flops are taken out of the
//! columns and stacked in a band below everything else, one row each, so
//! feedback wires never cross the combinational rows.
//!
//! ```text
//!   layer 0     layer 1     layer 2     outputs
//!
//!    in0 ─────── g1 ──────── g3 ──────── out0
//!    in1 ─────── g2 ─────────────────┘
//!
//!   ────────────────────────────────────────── y_bottom
//!          dff0
//!                     dff1
//! ```
//!
//! Every node also gets a small deterministic jitter so that parallel wires
//! drawn between aligned nodes do not merge visually.

use indexmap::IndexMap;
use log::{debug, trace};

use gateview_core::{
    geometry::{Bounds, Point},
    identifier::Id,
    netlist::{NodeKind, Topology},
};

use crate::{config::LayoutConfig, depth::Depths};

/// A node with its final position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedNode {
    id: Id,
    kind: NodeKind,
    layer: usize,
    position: Point,
}

impl PlacedNode {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the column the node was assigned to, after the output override.
    pub fn layer(&self) -> usize {
        self.layer
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

/// Positions of every node of a topology.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    nodes: IndexMap<Id, PlacedNode>,
    output_layer: Option<usize>,
}

impl Layout {
    /// Returns the placed node, or `None` if the node is not part of the layout.
    pub fn node(&self, id: Id) -> Option<&PlacedNode> {
        self.nodes.get(&id)
    }

    pub fn position(&self, id: Id) -> Option<Point> {
        self.node(id).map(PlacedNode::position)
    }

    /// Returns every placed node in placement order.
    pub fn nodes(&self) -> impl Iterator<Item = &PlacedNode> {
        self.nodes.values()
    }

    /// Returns the column of the primary outputs, if there are any.
    pub fn output_layer(&self) -> Option<usize> {
        self.output_layer
    }

    /// Returns the largest layer index.
    pub fn max_layer(&self) -> usize {
        self.nodes.values().map(PlacedNode::layer).max().unwrap_or(0)
    }

    /// Returns the bounds of all node centers.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.nodes.values().map(PlacedNode::position))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn place(&mut self, id: Id, kind: NodeKind, layer: usize, position: Point) {
        trace!(node = id.to_string(), layer = layer, x = position.x(), y = position.y(); "Placed node");
        self.nodes.insert(
            id,
            PlacedNode {
                id,
                kind,
                layer,
                position,
            },
        );
    }
}

/// Sequence number handed out once per placed node.
///
/// Drives the jitter pattern; passed explicitly so every layout run starts
/// from zero.
#[derive(Debug, Default)]
struct PlacementCounter(usize);

impl PlacementCounter {
    fn next(&mut self) -> usize {
        let current = self.0;
        self.0 += 1;
        current
    }
}

/// Deterministic depth-layered layout engine.
#[derive(Debug, Clone, Default)]
pub struct LayeredEngine {
    config: LayoutConfig,
}

impl LayeredEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Places every node of `topology`.
    ///
    /// - Non-output nodes go to column `depth`, outputs to one column past the
    ///   deepest non-output node.
    /// - Within a column, non-flip-flop nodes are sorted by name and centered
    ///   around `y = 0`, then jittered by `(n mod 5 - 2) * x_jitter` and
    ///   `(n mod 3 - 1) * y_jitter`, where `n` counts placed nodes. Outputs
    ///   only get the y jitter so the output column stays aligned.
    /// - Flip-flops, sorted by `(depth, name)`, each get their own row below
    ///   the tallest column.
    /// - Nodes missing from `depths` are stacked at `x = 0` below the origin.
    ///
    /// The result has exactly one entry per node of `topology`.
    pub fn calculate(&self, topology: &impl Topology, depths: &Depths) -> Layout {
        let x_unit = self.config.x_unit();
        let y_unit = self.config.y_unit();

        let mut columns: Vec<Vec<(Id, NodeKind)>> = Vec::new();
        let mut flip_flops: Vec<(usize, Id)> = Vec::new();
        let mut outputs: Vec<Id> = Vec::new();
        let mut unplaced: Vec<Id> = Vec::new();

        for id in topology.nodes() {
            let kind = topology.classify(id);
            let Some(depth) = depths.get(id) else {
                unplaced.push(id);
                continue;
            };
            match kind {
                NodeKind::Output => outputs.push(id),
                NodeKind::FlipFlop => flip_flops.push((depth, id)),
                _ => {
                    if columns.len() <= depth {
                        columns.resize_with(depth + 1, Vec::new);
                    }
                    columns[depth].push((id, kind));
                }
            }
        }

        let deepest_non_output = columns
            .len()
            .checked_sub(1)
            .into_iter()
            .chain(flip_flops.iter().map(|&(depth, _)| depth))
            .max();
        let output_layer = deepest_non_output.map_or(0, |depth| depth + 1);

        if !outputs.is_empty() {
            if columns.len() <= output_layer {
                columns.resize_with(output_layer + 1, Vec::new);
            }
            columns[output_layer].extend(outputs.iter().map(|&id| (id, NodeKind::Output)));
        }

        let mut layout = Layout {
            nodes: IndexMap::with_capacity(topology.node_count()),
            output_layer: (!outputs.is_empty()).then_some(output_layer),
        };
        let mut counter = PlacementCounter::default();

        for (layer, column) in columns.iter_mut().enumerate() {
            column.sort_by(|(a, _), (b, _)| a.cmp_by_name(b));
            let center = (column.len() as f32 - 1.0) / 2.0;

            for (row, &(id, kind)) in column.iter().enumerate() {
                let jitter = self.jitter(counter.next(), kind);
                let base = Point::new(layer as f32 * x_unit, -(row as f32 - center) * y_unit);
                layout.place(id, kind, layer, base.add_point(jitter));
            }
        }

        let tallest = columns
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0);
        let y_bottom = -(tallest as f32 * y_unit / 2.0) - 3.0 * y_unit;

        flip_flops.sort_by(|(da, a), (db, b)| da.cmp(db).then_with(|| a.cmp_by_name(b)));
        for (index, &(depth, id)) in flip_flops.iter().enumerate() {
            counter.next();
            let x_jitter = ((index % 7) as f32 - 3.0) * self.config.flip_flop_x_jitter();
            let position = Point::new(
                depth as f32 * x_unit + x_jitter,
                y_bottom - index as f32 * 2.0 * y_unit,
            );
            layout.place(id, NodeKind::FlipFlop, depth, position);
        }

        unplaced.sort_by(Id::cmp_by_name);
        for (index, &id) in unplaced.iter().enumerate() {
            layout.place(
                id,
                topology.classify(id),
                0,
                Point::new(0.0, -(index as f32) * y_unit),
            );
        }

        debug!(
            nodes = layout.len(),
            layers = columns.len(),
            flip_flops = flip_flops.len(),
            fallback = unplaced.len();
            "Layout calculated"
        );

        layout
    }

    fn jitter(&self, sequence: usize, kind: NodeKind) -> Point {
        let x = if kind.is_output() {
            0.0
        } else {
            ((sequence % 5) as f32 - 2.0) * self.config.x_jitter()
        };
        let y = ((sequence % 3) as f32 - 1.0) * self.config.y_jitter();
        Point::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::{approx_eq, assert_approx_eq};
    use gateview_core::netlist::{Declaration, Graph};
    use proptest::prelude::*;

    use super::*;

    fn gate(output: &str, gate_type: &str, inputs: &[&str]) -> Declaration {
        Declaration::Gate {
            output: Id::new(output),
            gate_type: Id::new(gate_type),
            inputs: inputs.iter().map(|name| Id::new(name)).collect(),
        }
    }

    fn flip_flop(output: &str, data: &str) -> Declaration {
        Declaration::FlipFlop {
            output: Id::new(output),
            data: Id::new(data),
        }
    }

    fn layout_of(graph: &Graph, config: LayoutConfig) -> Layout {
        LayeredEngine::new(config).calculate(graph, &Depths::compute(graph))
    }

    fn no_jitter() -> LayoutConfig {
        LayoutConfig::default().with_jitter(0.0, 0.0, 0.0)
    }

    #[test]
    fn test_empty_graph() {
        let layout = layout_of(&Graph::default(), LayoutConfig::default());

        assert!(layout.is_empty());
        assert_eq!(layout.output_layer(), None);
        assert!(layout.bounds().is_none());
    }

    #[test]
    fn test_single_and_gate() {
        let graph = Graph::from_declarations([
            Declaration::Input(Id::new("a")),
            Declaration::Output(Id::new("b")),
            gate("b", "AND", &["a", "a"]),
        ]);
        let layout = layout_of(&graph, LayoutConfig::default());

        let a = layout.node(Id::new("a")).unwrap();
        let b = layout.node(Id::new("b")).unwrap();
        assert_eq!(a.layer(), 0);
        assert_eq!(b.layer(), 1);
        assert_eq!(layout.output_layer(), Some(1));
        assert_approx_eq!(f32, b.position().x(), 5.0);
    }

    #[test]
    fn test_column_rows_are_centered_and_sorted() {
        let graph = Graph::from_declarations([
            Declaration::Input(Id::new("c")),
            Declaration::Input(Id::new("a")),
            Declaration::Input(Id::new("b")),
        ]);
        let layout = layout_of(&graph, no_jitter());

        assert_approx_eq!(f32, layout.position(Id::new("a")).unwrap().y(), 3.0);
        assert_approx_eq!(f32, layout.position(Id::new("b")).unwrap().y(), 0.0);
        assert_approx_eq!(f32, layout.position(Id::new("c")).unwrap().y(), -3.0);
    }

    #[test]
    fn test_jitter_pattern() {
        let graph = Graph::from_declarations([
            Declaration::Input(Id::new("i0")),
            Declaration::Input(Id::new("i1")),
        ]);
        let layout = layout_of(&graph, LayoutConfig::default());

        // Counter 0: x -= 0.8, y -= 0.3. Counter 1: x -= 0.4, y += 0.
        let i0 = layout.position(Id::new("i0")).unwrap();
        let i1 = layout.position(Id::new("i1")).unwrap();
        assert_approx_eq!(f32, i0.x(), -0.8);
        assert_approx_eq!(f32, i0.y(), 1.5 - 0.3);
        assert_approx_eq!(f32, i1.x(), -0.4);
        assert_approx_eq!(f32, i1.y(), -1.5);
    }

    #[test]
    fn test_flip_flops_below_everything() {
        let graph = Graph::from_declarations([
            Declaration::Input(Id::new("i")),
            flip_flop("q0", "i"),
            flip_flop("q1", "i"),
            flip_flop("q2", "g"),
            gate("g", "NOR", &["q0", "q1"]),
        ]);
        let layout = layout_of(&graph, no_jitter());

        let highest_flip_flop = ["q0", "q1", "q2"]
            .iter()
            .map(|name| layout.position(Id::new(name)).unwrap().y())
            .fold(f32::MIN, f32::max);
        let lowest_other = ["i", "g"]
            .iter()
            .map(|name| layout.position(Id::new(name)).unwrap().y())
            .fold(f32::MAX, f32::min);
        assert!(highest_flip_flop < lowest_other);

        // Tallest column has one node: y_bottom = -1.5 - 9.0.
        assert_approx_eq!(f32, layout.position(Id::new("q0")).unwrap().y(), -10.5);
        assert_approx_eq!(f32, layout.position(Id::new("q1")).unwrap().y(), -16.5);
        // q2 is deepest, so it comes last.
        assert_approx_eq!(f32, layout.position(Id::new("q2")).unwrap().y(), -22.5);
    }

    #[test]
    fn test_outputs_form_rightmost_column() {
        let graph = Graph::from_declarations([
            Declaration::Input(Id::new("a")),
            Declaration::Output(Id::new("early")),
            Declaration::Output(Id::new("late")),
            gate("early", "NOT", &["a"]),
            gate("m", "NOT", &["a"]),
            gate("n", "NOT", &["m"]),
            gate("late", "AND", &["n", "a"]),
        ]);
        let layout = layout_of(&graph, LayoutConfig::default());

        // `late` has depth 3 on its own, `n` is the deepest non-output at 2.
        assert_eq!(layout.output_layer(), Some(3));
        for name in ["early", "late"] {
            let node = layout.node(Id::new(name)).unwrap();
            assert_eq!(node.layer(), 3);
            assert_approx_eq!(f32, node.position().x(), 15.0);
        }
    }

    #[test]
    fn test_fallback_for_nodes_without_depth() {
        let graph = Graph::from_declarations([Declaration::Input(Id::new("z"))]);
        let layout = LayeredEngine::default().calculate(&graph, &Depths::default());

        assert_eq!(layout.len(), 1);
        assert_eq!(layout.position(Id::new("z")), Some(Point::new(0.0, 0.0)));
    }

    fn sequential_graph() -> impl Strategy<Value = Graph> {
        let declaration = prop_oneof![
            (0..16usize).prop_map(|n| Declaration::Input(Id::new(&format!("s{n}")))),
            (0..16usize).prop_map(|n| Declaration::Output(Id::new(&format!("s{n}")))),
            (0..16usize, 0..16usize).prop_map(|(q, d)| Declaration::FlipFlop {
                output: Id::new(&format!("s{q}")),
                data: Id::new(&format!("s{d}")),
            }),
            (0..16usize, prop::collection::vec(0..16usize, 1..4)).prop_map(|(out, ins)| {
                Declaration::Gate {
                    output: Id::new(&format!("s{out}")),
                    gate_type: Id::new("XOR"),
                    inputs: ins.iter().map(|n| Id::new(&format!("s{n}"))).collect(),
                }
            }),
        ];
        prop::collection::vec(declaration, 0..24).prop_map(Graph::from_declarations)
    }

    proptest! {
        #[test]
        fn prop_layout_is_total(graph in sequential_graph()) {
            let layout = layout_of(&graph, LayoutConfig::default());

            prop_assert_eq!(layout.len(), graph.node_count());
            for node in graph.nodes() {
                prop_assert!(layout.position(node).is_some());
            }
        }

        #[test]
        fn prop_flip_flop_rows_are_unique(graph in sequential_graph()) {
            let layout = layout_of(&graph, LayoutConfig::default());
            let rows: Vec<f32> = layout
                .nodes()
                .filter(|node| node.kind().is_flip_flop())
                .map(|node| node.position().y())
                .collect();

            for (i, a) in rows.iter().enumerate() {
                for b in &rows[i + 1..] {
                    prop_assert!(!approx_eq!(f32, *a, *b));
                }
            }
        }

        #[test]
        fn prop_outputs_are_rightmost(graph in sequential_graph()) {
            let layout = layout_of(&graph, LayoutConfig::default());
            let Some(output_layer) = layout.output_layer() else {
                return Ok(());
            };
            let output_x = output_layer as f32 * 5.0;

            for node in layout.nodes() {
                if node.kind().is_output() {
                    prop_assert!(approx_eq!(f32, node.position().x(), output_x));
                } else {
                    prop_assert!(node.position().x() < output_x);
                }
            }
        }
    }
}
