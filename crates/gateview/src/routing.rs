//! Wire routing between placed nodes.
//!
//! Neighbouring nodes on the same row are joined by a straight wire. Every
//! other wire takes five segments:
//!
//! ```text
//!   source ╲                                   ╱ target
//!           div ─┐                       ┌─ conv
//!                │                       │
//!                └────── channel ────────┘
//! ```
//!
//! The horizontal channel is placed outside the band of nodes lying strictly
//! between the two endpoints. Each wire owns a lane: its vertical segments
//! are shifted by an amount derived from its enumeration index, and a cycling
//! offset separates wires sharing a channel. Node jitter can still bring two
//! lanes onto the same x, so every vertical x is claimed once and a taken x
//! is moved further out by one lane step.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use log::{debug, trace};

use gateview_core::{
    geometry::Point,
    identifier::Id,
    netlist::{Edge, Topology},
};

use crate::{
    config::{LayoutConfig, RoutingConfig},
    highlight::HighlightSet,
    layout::{Layout, PlacedNode},
};

/// Scale applied to fan-out offsets at the divergence and convergence points.
const FAN_OFFSET_FACTOR: f32 = 0.3;

/// Minimum distance between two vertical segments.
const MIN_LANE_GAP: f32 = 0.1;

/// How a wire should be drawn relative to the active highlight set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// No highlight set is active.
    Normal,
    /// The wire belongs to a highlighted path.
    Highlighted,
    /// A highlight set is active and this wire is not part of it.
    Faded,
}

/// Drawable geometry of one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEdge {
    edge: Edge,
    points: Vec<Point>,
    flip_flop_input: bool,
    emphasis: Emphasis,
}

impl RoutedEdge {
    pub fn edge(&self) -> Edge {
        self.edge
    }

    /// Returns the polyline from the source center to the target center.
    /// The arrowhead belongs at the last point.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns `true` for a single straight segment.
    pub fn is_direct(&self) -> bool {
        self.points.len() == 2
    }

    /// Returns the interior vertices, empty for direct wires.
    pub fn corners(&self) -> &[Point] {
        match self.points.len() {
            0..=2 => &[],
            len => &self.points[1..len - 1],
        }
    }

    /// Returns `true` if the wire feeds a flip-flop's data input.
    pub fn flip_flop_input(&self) -> bool {
        self.flip_flop_input
    }

    pub fn emphasis(&self) -> Emphasis {
        self.emphasis
    }
}

/// Per-edge y offsets spreading wires that leave or enter the same node.
#[derive(Debug, Default)]
struct FanOffsets {
    source: HashMap<Edge, f32>,
    target: HashMap<Edge, f32>,
}

impl FanOffsets {
    fn compute(wires: &[Wire<'_>], spacing: f32) -> Self {
        let mut by_source: IndexMap<Id, Vec<(Edge, f32)>> = IndexMap::new();
        let mut by_target: IndexMap<Id, Vec<(Edge, f32)>> = IndexMap::new();
        for wire in wires {
            by_source
                .entry(wire.edge.source())
                .or_default()
                .push((wire.edge, wire.target.position().y()));
            by_target
                .entry(wire.edge.target())
                .or_default()
                .push((wire.edge, wire.source.position().y()));
        }

        Self {
            source: Self::spread(by_source, spacing),
            target: Self::spread(by_target, spacing),
        }
    }

    /// Orders each group by the far end's y and centers the offsets on zero.
    fn spread(groups: IndexMap<Id, Vec<(Edge, f32)>>, spacing: f32) -> HashMap<Edge, f32> {
        let mut offsets = HashMap::new();
        for (_, mut group) in groups {
            group.sort_by(|(_, a), (_, b)| a.total_cmp(b));
            let center = (group.len() as f32 - 1.0) / 2.0;
            for (index, (edge, _)) in group.into_iter().enumerate() {
                offsets.insert(edge, (index as f32 - center) * spacing);
            }
        }
        offsets
    }

    fn source(&self, edge: Edge) -> f32 {
        self.source.get(&edge).copied().unwrap_or_default()
    }

    fn target(&self, edge: Edge) -> f32 {
        self.target.get(&edge).copied().unwrap_or_default()
    }
}

/// Vertical segment x positions already in use.
///
/// Positions are bucketed on a `MIN_LANE_GAP` grid; a claim succeeds only if
/// the bucket and both neighbours are free, so claimed positions are at least
/// `MIN_LANE_GAP` apart.
#[derive(Debug, Default)]
struct Lanes {
    taken: HashSet<i64>,
}

impl Lanes {
    /// Claims `x`, or the first free position reached by repeatedly adding `step`.
    fn claim(&mut self, mut x: f32, step: f32) -> f32 {
        let step = if step.is_sign_negative() {
            step.min(-MIN_LANE_GAP)
        } else {
            step.max(MIN_LANE_GAP)
        };
        loop {
            let bucket = (x / MIN_LANE_GAP).round() as i64;
            if !(bucket - 1..=bucket + 1).any(|b| self.taken.contains(&b)) {
                self.taken.insert(bucket);
                return x;
            }
            x += step;
        }
    }
}

/// An edge whose endpoints are both placed.
struct Wire<'a> {
    edge: Edge,
    source: &'a PlacedNode,
    target: &'a PlacedNode,
}

/// Computes routed polylines for every drawable edge.
#[derive(Debug, Clone, Default)]
pub struct EdgeRouter {
    layout: LayoutConfig,
    routing: RoutingConfig,
}

impl EdgeRouter {
    pub fn new(layout: LayoutConfig, routing: RoutingConfig) -> Self {
        Self { layout, routing }
    }

    /// Routes every edge of `topology` whose endpoints are both in `layout`.
    ///
    /// Edges are enumerated in topology order; the enumeration index selects
    /// the wire's lane and channel offset. Edges with an unplaced endpoint
    /// are skipped.
    pub fn route(
        &self,
        topology: &impl Topology,
        layout: &Layout,
        highlights: &HighlightSet,
    ) -> Vec<RoutedEdge> {
        let mut skipped = 0usize;
        let wires: Vec<Wire<'_>> = topology
            .edges()
            .filter_map(|edge| {
                match (layout.node(edge.source()), layout.node(edge.target())) {
                    (Some(source), Some(target)) => Some(Wire {
                        edge,
                        source,
                        target,
                    }),
                    _ => {
                        skipped += 1;
                        None
                    }
                }
            })
            .collect();

        let fan = FanOffsets::compute(&wires, self.routing.wire_spacing());
        let mut lanes = Lanes::default();
        let routed: Vec<RoutedEdge> = wires
            .iter()
            .enumerate()
            .map(|(index, wire)| {
                self.route_wire(index, wire, layout, &fan, &mut lanes, highlights)
            })
            .collect();

        debug!(
            edges = routed.len(),
            direct = routed.iter().filter(|edge| edge.is_direct()).count(),
            skipped = skipped;
            "Edges routed"
        );

        routed
    }

    fn route_wire(
        &self,
        index: usize,
        wire: &Wire<'_>,
        layout: &Layout,
        fan: &FanOffsets,
        lanes: &mut Lanes,
        highlights: &HighlightSet,
    ) -> RoutedEdge {
        let start = wire.source.position();
        let end = wire.target.position();

        let emphasis = if highlights.highlights(wire.edge) {
            Emphasis::Highlighted
        } else if highlights.is_active() {
            Emphasis::Faded
        } else {
            Emphasis::Normal
        };

        let same_row = (start.y() - end.y()).abs() < self.routing.same_row_tolerance();
        let neighbours = wire.source.layer().abs_diff(wire.target.layer()) <= 1;

        let points = if same_row && neighbours {
            vec![start, end]
        } else {
            let global = self.global_offset(index);
            let lane = index as f32 * self.routing.lane_spacing() + global;
            let stub = self.layout.x_unit() * self.routing.divergence_fraction();
            let horizontal_y = self.channel_y(wire, layout, global) + global * 0.5;

            let step = self.routing.lane_spacing();
            let divergence = Point::new(
                lanes.claim(start.x() + stub + lane, step),
                start.y() + fan.source(wire.edge) * FAN_OFFSET_FACTOR,
            );
            let convergence = Point::new(
                lanes.claim(end.x() - stub - lane, -step),
                end.y() + fan.target(wire.edge) * FAN_OFFSET_FACTOR,
            );

            vec![
                start,
                divergence,
                divergence.with_y(horizontal_y),
                convergence.with_y(horizontal_y),
                convergence,
                end,
            ]
        };

        trace!(
            from = wire.edge.source().to_string(),
            to = wire.edge.target().to_string(),
            lane = index,
            segments = points.len() - 1;
            "Routed edge"
        );

        RoutedEdge {
            edge: wire.edge,
            points,
            flip_flop_input: wire.target.kind().is_flip_flop(),
            emphasis,
        }
    }

    /// Cycling offset `(index mod cycle - cycle / 2) * step`.
    fn global_offset(&self, index: usize) -> f32 {
        let cycle = self.routing.global_offset_cycle();
        ((index % cycle) as f32 - (cycle / 2) as f32) * self.routing.global_offset_step()
    }

    /// Picks the channel y clear of every node strictly between the endpoints' x.
    fn channel_y(&self, wire: &Wire<'_>, layout: &Layout, global: f32) -> f32 {
        let start = wire.source.position();
        let end = wire.target.position();
        let (left, right) = (start.x().min(end.x()), start.x().max(end.x()));

        let mut intervening = layout
            .nodes()
            .filter(|node| node.id() != wire.edge.source() && node.id() != wire.edge.target())
            .map(PlacedNode::position)
            .filter(|position| left < position.x() && position.x() < right)
            .map(Point::y)
            .peekable();
        let has_intervening = intervening.peek().is_some();

        let margin = self.layout.y_unit() * self.routing.channel_margin() + global.abs();
        if end.y() > start.y() {
            let top = if has_intervening {
                intervening.fold(f32::MIN, f32::max)
            } else {
                start.y().max(end.y())
            };
            top + margin
        } else {
            let bottom = if has_intervening {
                intervening.fold(f32::MAX, f32::min)
            } else {
                start.y().min(end.y())
            };
            bottom - margin
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use gateview_core::netlist::{Declaration, Graph};
    use proptest::prelude::*;

    use super::*;
    use crate::{depth::Depths, layout::LayeredEngine};

    fn gate(output: &str, gate_type: &str, inputs: &[&str]) -> Declaration {
        Declaration::Gate {
            output: Id::new(output),
            gate_type: Id::new(gate_type),
            inputs: inputs.iter().map(|name| Id::new(name)).collect(),
        }
    }

    fn route(graph: &Graph, layout_config: LayoutConfig, highlights: &HighlightSet) -> Vec<RoutedEdge> {
        let layout = LayeredEngine::new(layout_config).calculate(graph, &Depths::compute(graph));
        EdgeRouter::new(layout_config, RoutingConfig::default()).route(graph, &layout, highlights)
    }

    fn no_jitter() -> LayoutConfig {
        LayoutConfig::default().with_jitter(0.0, 0.0, 0.0)
    }

    fn find(routes: &[RoutedEdge], source: &str, target: &str) -> RoutedEdge {
        routes
            .iter()
            .find(|route| route.edge() == Edge::new(Id::new(source), Id::new(target)))
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_empty_graph_routes_nothing() {
        assert!(route(&Graph::default(), no_jitter(), &HighlightSet::default()).is_empty());
    }

    #[test]
    fn test_aligned_neighbours_get_a_straight_wire() {
        let graph = Graph::from_declarations([
            Declaration::Input(Id::new("a")),
            gate("b", "NOT", &["a"]),
        ]);
        let routes = route(&graph, no_jitter(), &HighlightSet::default());

        assert_eq!(routes.len(), 1);
        assert!(routes[0].is_direct());
        assert!(routes[0].corners().is_empty());
        assert_eq!(routes[0].points(), &[Point::new(0.0, 0.0), Point::new(5.0, 0.0)]);
        assert_eq!(routes[0].emphasis(), Emphasis::Normal);
    }

    #[test]
    fn test_five_segment_shape() {
        let graph = Graph::from_declarations([
            Declaration::Input(Id::new("i")),
            gate("v1", "NOT", &["i"]),
            gate("v2", "BUF", &["i"]),
        ]);
        let routes = route(&graph, no_jitter(), &HighlightSet::default());

        for route in &routes {
            let points = route.points();
            assert_eq!(points.len(), 6);
            assert_eq!(route.corners().len(), 4);
            assert_eq!(points[1].x(), points[2].x());
            assert_eq!(points[2].y(), points[3].y());
            assert_eq!(points[3].x(), points[4].x());
            assert_eq!(points[0], Point::new(0.0, 0.0));
        }
    }

    #[test]
    fn test_same_source_wires_use_distinct_lanes() {
        let graph = Graph::from_declarations([
            Declaration::Input(Id::new("i")),
            gate("v1", "NOT", &["i"]),
            gate("v2", "BUF", &["i"]),
        ]);
        let routes = route(&graph, no_jitter(), &HighlightSet::default());
        let to_v1 = find(&routes, "i", "v1");
        let to_v2 = find(&routes, "i", "v2");

        // Lane of index 0: -0.75, index 1: 0.25 - 0.6.
        assert_approx_eq!(f32, to_v1.points()[1].x(), 0.4 - 0.75);
        assert_approx_eq!(f32, to_v2.points()[1].x(), 0.4 - 0.35);

        // v2 sits lower, so its wire leaves below the wire to v1.
        assert!(to_v2.points()[1].y() < to_v1.points()[1].y());
    }

    #[test]
    fn test_jittered_sources_do_not_share_a_lane() {
        // With default jitter, `a` sits 0.4 right of `b`, which cancels the
        // difference between the first two lanes.
        let graph = Graph::from_declarations([
            Declaration::Input(Id::new("a")),
            Declaration::Input(Id::new("b")),
            gate("g1", "NOT", &["b"]),
            gate("g2", "NOT", &["a"]),
        ]);
        let routes = route(&graph, LayoutConfig::default(), &HighlightSet::default());
        let to_g1 = find(&routes, "b", "g1");
        let to_g2 = find(&routes, "a", "g2");

        assert!(!to_g1.is_direct());
        assert!(!to_g2.is_direct());
        assert!((to_g1.points()[1].x() - to_g2.points()[1].x()).abs() > MIN_LANE_GAP / 2.0);
        assert!((to_g1.points()[4].x() - to_g2.points()[4].x()).abs() > MIN_LANE_GAP / 2.0);
    }

    #[test]
    fn test_taken_lane_moves_outward() {
        let mut lanes = Lanes::default();

        assert_approx_eq!(f32, lanes.claim(1.0, 0.25), 1.0);
        assert_approx_eq!(f32, lanes.claim(1.05, 0.25), 1.3);
        assert_approx_eq!(f32, lanes.claim(1.0, -0.25), 0.75);
        assert_approx_eq!(f32, lanes.claim(3.0, 0.25), 3.0);
    }

    #[test]
    fn test_channel_clears_intervening_nodes() {
        // `far` spans two layers while `mid` sits in between at a lower row.
        let graph = Graph::from_declarations([
            Declaration::Input(Id::new("a")),
            Declaration::Input(Id::new("b")),
            gate("mid", "NOT", &["b"]),
            gate("far", "AND", &["a", "mid"]),
        ]);
        let layout_config = no_jitter();
        let layout = LayeredEngine::new(layout_config).calculate(&graph, &Depths::compute(&graph));
        let routes = EdgeRouter::new(layout_config, RoutingConfig::default()).route(
            &graph,
            &layout,
            &HighlightSet::default(),
        );

        let wire = find(&routes, "a", "far");
        let mid_y = layout.position(Id::new("mid")).unwrap().y();
        let start_y = layout.position(Id::new("a")).unwrap().y();
        let end_y = layout.position(Id::new("far")).unwrap().y();
        let channel = wire.points()[2].y();

        if end_y > start_y {
            assert!(channel > mid_y + 1.2);
        } else {
            assert!(channel < mid_y - 1.2);
        }
    }

    #[test]
    fn test_flip_flop_inputs_are_flagged() {
        let graph = Graph::from_declarations([
            Declaration::Input(Id::new("d")),
            Declaration::FlipFlop {
                output: Id::new("q"),
                data: Id::new("d"),
            },
            gate("y", "NOT", &["q"]),
        ]);
        let routes = route(&graph, LayoutConfig::default(), &HighlightSet::default());

        assert!(find(&routes, "d", "q").flip_flop_input());
        assert!(!find(&routes, "q", "y").flip_flop_input());
    }

    #[test]
    fn test_emphasis_follows_highlights() {
        let graph = Graph::from_declarations([
            Declaration::Input(Id::new("a")),
            gate("b", "NOT", &["a"]),
            gate("c", "NOT", &["b"]),
        ]);
        let path = [Id::new("a"), Id::new("b"), Id::new("ghost")];
        let highlights = HighlightSet::from_sequences([&path[..]]);
        let routes = route(&graph, LayoutConfig::default(), &highlights);

        assert_eq!(routes.len(), 2);
        assert_eq!(find(&routes, "a", "b").emphasis(), Emphasis::Highlighted);
        assert_eq!(find(&routes, "b", "c").emphasis(), Emphasis::Faded);
    }

    #[test]
    fn test_edges_with_unplaced_endpoints_are_skipped() {
        let placed = Graph::from_declarations([Declaration::Input(Id::new("a"))]);
        let layout = LayeredEngine::default().calculate(&placed, &Depths::compute(&placed));
        let wider = Graph::from_declarations([gate("b", "NOT", &["a"])]);

        let routes = EdgeRouter::default().route(&wider, &layout, &HighlightSet::default());
        assert!(routes.is_empty());
    }

    fn layered_graph() -> impl Strategy<Value = Graph> {
        prop::collection::vec((1..12usize, prop::collection::vec(0..12usize, 1..4)), 1..16)
            .prop_map(|gates| {
                Graph::from_declarations(gates.into_iter().map(|(output, inputs)| {
                    Declaration::Gate {
                        output: Id::new(&format!("w{output}")),
                        gate_type: Id::new("AND"),
                        inputs: inputs
                            .into_iter()
                            .map(|input| Id::new(&format!("w{input}")))
                            .collect(),
                    }
                }))
            })
    }

    proptest! {
        #[test]
        fn prop_routes_connect_node_centers(graph in layered_graph()) {
            let layout = LayeredEngine::default().calculate(&graph, &Depths::compute(&graph));
            let routes = EdgeRouter::default().route(&graph, &layout, &HighlightSet::default());

            prop_assert_eq!(routes.len(), graph.edge_count());
            for route in &routes {
                let points = route.points();
                prop_assert!(points.len() == 2 || points.len() == 6);
                prop_assert_eq!(Some(points[0]), layout.position(route.edge().source()));
                prop_assert_eq!(points.last().copied(), layout.position(route.edge().target()));
            }
        }

        #[test]
        fn prop_no_shared_vertical_segment(graph in layered_graph()) {
            let layout = LayeredEngine::default().calculate(&graph, &Depths::compute(&graph));
            let routes = EdgeRouter::default().route(&graph, &layout, &HighlightSet::default());

            // (edge index, x, lower y, upper y) of every vertical segment.
            let verticals: Vec<(usize, f32, f32, f32)> = routes
                .iter()
                .enumerate()
                .filter(|(_, route)| !route.is_direct())
                .flat_map(|(index, route)| {
                    let points = route.points();
                    [(points[1], points[2]), (points[3], points[4])]
                        .map(|(a, b)| (index, a.x(), a.y().min(b.y()), a.y().max(b.y())))
                })
                .collect();

            for (i, a) in verticals.iter().enumerate() {
                for b in &verticals[i + 1..] {
                    if a.0 == b.0 {
                        continue;
                    }
                    let overlapping = a.2 <= b.3 && b.2 <= a.3;
                    prop_assert!(
                        (a.1 - b.1).abs() > 0.05 || !overlapping,
                        "edges {} and {} share a vertical segment at x={}",
                        a.0,
                        b.0,
                        a.1
                    );
                }
            }
        }
    }
}
