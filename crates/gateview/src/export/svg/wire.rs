use svg::node::element as svg_element;

use gateview_core::{draw::StrokeDefinition, geometry::Point};

use super::{Frame, Palette, arrows};
use crate::routing::{Emphasis, RoutedEdge};

const NORMAL_OPACITY: f32 = 0.7;
const FADED_OPACITY: f32 = 0.3;
const CORNER_RADIUS: f32 = 1.6;

/// Picks the stroke of a wire from its emphasis.
///
/// Flip-flop data inputs are dashed, but only when no highlight set is active.
pub(super) fn stroke_for(route: &RoutedEdge, palette: &Palette) -> StrokeDefinition {
    match route.emphasis() {
        Emphasis::Highlighted => StrokeDefinition::solid(palette.highlight, 2.0),
        Emphasis::Faded => StrokeDefinition::solid(palette.faded.with_alpha(FADED_OPACITY), 0.5),
        Emphasis::Normal if route.flip_flop_input() => {
            StrokeDefinition::dashed(palette.flip_flop_edge.with_alpha(NORMAL_OPACITY), 1.0)
        }
        Emphasis::Normal => StrokeDefinition::solid(palette.wire.with_alpha(NORMAL_OPACITY), 1.0),
    }
}

fn path_data(points: impl IntoIterator<Item = Point>) -> String {
    points
        .into_iter()
        .enumerate()
        .map(|(index, point)| {
            let command = if index == 0 { 'M' } else { 'L' };
            format!("{command} {} {}", point.x(), point.y())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Draws a wire as one polyline ending in an arrowhead, with a dot on every corner.
pub(super) fn render_route(
    route: &RoutedEdge,
    stroke: &StrokeDefinition,
    frame: Frame,
    palette: &Palette,
) -> svg_element::Group {
    let path = svg_element::Path::new()
        .set("d", path_data(route.points().iter().map(|&p| frame.to_pixels(p))))
        .set("fill", "none")
        .set("marker-end", arrows::marker_end(stroke.color()));
    let path = gateview_core::apply_stroke!(path, stroke);

    let mut group = svg_element::Group::new()
        .set("class", "wire")
        .set("data-source", route.edge().source().to_string())
        .set("data-target", route.edge().target().to_string())
        .add(path);

    let dot_color = match route.emphasis() {
        Emphasis::Highlighted => stroke.color(),
        _ => palette.wire.with_alpha(stroke.color().alpha()),
    };
    for &corner in route.corners() {
        let center = frame.to_pixels(corner);
        group = group.add(
            svg_element::Circle::new()
                .set("cx", center.x())
                .set("cy", center.y())
                .set("r", CORNER_RADIUS)
                .set("fill", dot_color.to_string())
                .set("fill-opacity", dot_color.alpha()),
        );
    }

    group
}
