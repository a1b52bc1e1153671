use svg::node::element::{Definitions, Marker, Path};

use gateview_core::color::Color;

/// Returns the marker id of an arrowhead drawn in `color`.
pub fn marker_id(color: Color) -> String {
    format!("arrow-right-{}", color.to_id_safe_string())
}

/// Returns the `marker-end` reference for `color`.
pub fn marker_end(color: Color) -> String {
    format!("url(#{})", marker_id(color))
}

/// Creates one arrowhead marker per wire color in use.
pub fn marker_definitions<'a>(colors: impl Iterator<Item = &'a Color>) -> Definitions {
    colors.fold(Definitions::new(), |defs, &color| {
        defs.add(
            Marker::new()
                .set("id", marker_id(color))
                .set("viewBox", "0 0 10 10")
                .set("refX", 9)
                .set("refY", 5)
                .set("markerWidth", 6)
                .set("markerHeight", 6)
                .set("orient", "auto")
                .add(
                    Path::new()
                        .set("d", "M 0 0 L 10 5 L 0 10 z")
                        .set("fill", color.to_string())
                        .set("fill-opacity", color.alpha()),
                ),
        )
    })
}
