use svg::node::{Text as SvgText, element as svg_element};

use gateview_core::{draw::StrokeDefinition, identifier::Id, netlist::NodeKind};

use super::{Frame, Palette};
use crate::{highlight::HighlightSet, layout::PlacedNode};

const HIGHLIGHT_FILL: &str = "#ffe0e0";
const FADED_FILL: &str = "#e0e0e0";
const FADED_OPACITY: f32 = 0.4;
const OUTPUT_RADIUS_FACTOR: f32 = 1.2;
const LABEL_FONT_SIZE: f32 = 11.0;

/// Fill color of a node kind. Unlisted gate types are white.
pub fn fill_color(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Input => "lightblue",
        NodeKind::Output => "lightgreen",
        NodeKind::FlipFlop => "lightyellow",
        NodeKind::Gate(gate_type) => gate_fill_color(&gate_type.to_string()),
        NodeKind::Unknown => "white",
    }
}

fn gate_fill_color(gate_type: &str) -> &'static str {
    match gate_type {
        "AND" => "lightcoral",
        "OR" => "lightcyan",
        "NOT" | "INV" => "lightgray",
        "NAND" => "lightpink",
        "NOR" => "lightsalmon",
        _ => "white",
    }
}

/// `name` for inputs, outputs and undeclared signals, `name (TYPE)` otherwise.
pub fn label(id: Id, kind: NodeKind) -> String {
    match kind {
        NodeKind::Input | NodeKind::Output | NodeKind::Unknown => id.to_string(),
        NodeKind::FlipFlop | NodeKind::Gate(_) => format!("{id} ({kind})"),
    }
}

/// Draws a node circle with its label above it.
pub(super) fn render_node(
    node: &PlacedNode,
    highlights: &HighlightSet,
    frame: Frame,
    palette: &Palette,
) -> svg_element::Group {
    let center = frame.to_pixels(node.position());
    let mut radius = palette.node_radius * palette.scale;
    if node.kind().is_output() {
        radius *= OUTPUT_RADIUS_FACTOR;
    }

    let highlighted = highlights.contains_node(node.id());
    let faded = highlights.is_active() && !highlighted;

    let (fill, stroke) = if highlighted {
        (HIGHLIGHT_FILL, StrokeDefinition::solid(palette.highlight, 2.0))
    } else if faded {
        (FADED_FILL, StrokeDefinition::solid(palette.faded, 1.0))
    } else {
        (fill_color(node.kind()), StrokeDefinition::solid(palette.wire, 1.0))
    };

    let circle = svg_element::Circle::new()
        .set("cx", center.x())
        .set("cy", center.y())
        .set("r", radius)
        .set("fill", fill);
    let circle = gateview_core::apply_stroke!(circle, &stroke);

    let text = svg_element::Text::new("")
        .set("x", center.x())
        .set("y", center.y() - radius - 4.0)
        .set("text-anchor", "middle")
        .set("font-family", "Arial")
        .set("font-size", LABEL_FONT_SIZE)
        .set("fill", if faded { "#888888" } else { "black" })
        .add(SvgText::new(label(node.id(), node.kind())));

    let mut group = svg_element::Group::new()
        .set("class", "node")
        .set("data-node", node.id().to_string());
    if faded {
        group = group.set("opacity", FADED_OPACITY);
    }

    group.add(circle).add(text)
}
