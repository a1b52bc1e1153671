//! SVG rendering of netlist diagrams.
//!
//! Layout coordinates are in abstract units with y pointing up. The renderer
//! scales them by [`StyleConfig::scale`] pixels per unit and flips the y
//! axis, so the first input column ends up on the left and higher rows on
//! top, as in the layout.

mod arrows;
mod node;
mod wire;

use std::{fs, path::PathBuf};

use indexmap::IndexSet;
use log::{debug, error, info};
use svg::{
    Document,
    node::{Text as SvgText, element as svg_element},
};

use gateview_core::{
    color::Color,
    geometry::{Bounds, Point},
};

use crate::{
    config::StyleConfig,
    diagram::Diagram,
    export::{self, Exporter},
};

/// Space around the outermost node centers, in layout units.
const MARGIN: f32 = 2.0;
/// Height of the title band above the drawing, in layout units.
const TITLE_BAND: f32 = 1.5;

/// Resolved colors and sizes used by the renderer.
#[derive(Debug, Clone)]
struct Palette {
    scale: f32,
    node_radius: f32,
    background: Option<Color>,
    highlight: Color,
    flip_flop_edge: Color,
    wire: Color,
    faded: Color,
}

impl Palette {
    fn from_style(style: &StyleConfig) -> Result<Self, export::Error> {
        Ok(Self {
            scale: style.scale(),
            node_radius: style.node_radius(),
            background: style.background_color().map_err(export::Error::Render)?,
            highlight: style.highlight_color().map_err(export::Error::Render)?,
            flip_flop_edge: style.flip_flop_edge_color().map_err(export::Error::Render)?,
            wire: Color::default(),
            faded: Color::new("#cccccc").map_err(export::Error::Render)?,
        })
    }
}

/// Maps layout coordinates to SVG pixels.
#[derive(Debug, Clone, Copy)]
struct Frame {
    bounds: Bounds,
    scale: f32,
}

impl Frame {
    fn new(diagram: &Diagram, scale: f32) -> Self {
        let layout = diagram.layout();
        let points = layout
            .nodes()
            .map(|node| node.position())
            .chain(diagram.routes().iter().flat_map(|route| route.points().iter().copied()));
        let bounds = Bounds::from_points(points)
            .unwrap_or_else(|| Bounds::from_point(Point::default()))
            .expand(MARGIN);

        Self { bounds, scale }
    }

    fn to_pixels(self, point: Point) -> Point {
        Point::new(
            (point.x() - self.bounds.min_x()) * self.scale,
            (self.bounds.max_y() - point.y() + TITLE_BAND) * self.scale,
        )
    }

    fn width(self) -> f32 {
        self.bounds.width() * self.scale
    }

    fn height(self) -> f32 {
        (self.bounds.height() + TITLE_BAND) * self.scale
    }
}

/// Builder for the [`Svg`] exporter.
#[derive(Debug, Default)]
pub struct SvgBuilder {
    file_name: Option<PathBuf>,
    style: StyleConfig,
}

impl SvgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the file written by [`Exporter::export_diagram`].
    pub fn with_file_name(mut self, file_name: impl Into<PathBuf>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_style(mut self, style: &StyleConfig) -> Self {
        self.style = style.clone();
        self
    }

    /// Resolves the configured colors.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] if a configured color cannot be parsed.
    pub fn build(self) -> Result<Svg, export::Error> {
        Ok(Svg {
            file_name: self.file_name,
            palette: Palette::from_style(&self.style)?,
        })
    }
}

/// SVG exporter.
#[derive(Debug)]
pub struct Svg {
    file_name: Option<PathBuf>,
    palette: Palette,
}

impl Svg {
    /// Renders a diagram to an SVG document.
    ///
    /// Wires are drawn below nodes so every arrowhead ends at a node outline
    /// drawn on top of it.
    pub fn render_diagram(&self, diagram: &Diagram) -> Document {
        let frame = Frame::new(diagram, self.palette.scale);
        let (width, height) = (frame.width(), frame.height());

        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height);

        if let Some(background) = self.palette.background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("width", "100%")
                    .set("height", "100%")
                    .set("fill", background.to_string())
                    .set("fill-opacity", background.alpha()),
            );
        }

        doc = doc.add(
            svg_element::Text::new("")
                .set("x", width / 2.0)
                .set("y", TITLE_BAND * self.palette.scale / 2.0)
                .set("text-anchor", "middle")
                .set("dominant-baseline", "central")
                .set("font-family", "Arial")
                .set("font-size", 16)
                .add(SvgText::new(diagram.title())),
        );

        let mut colors = IndexSet::new();
        let mut wires = svg_element::Group::new().set("class", "wires");
        for route in diagram.routes() {
            let stroke = wire::stroke_for(route, &self.palette);
            colors.insert(stroke.color());
            wires = wires.add(wire::render_route(route, &stroke, frame, &self.palette));
        }

        let mut nodes = svg_element::Group::new().set("class", "nodes");
        for placed in diagram.layout().nodes() {
            nodes = nodes.add(node::render_node(
                placed,
                diagram.highlights(),
                frame,
                &self.palette,
            ));
        }

        debug!(
            width = width,
            height = height,
            wires = diagram.routes().len(),
            markers = colors.len();
            "SVG document rendered"
        );

        doc.add(arrows::marker_definitions(colors.iter()))
            .add(wires)
            .add(nodes)
    }

    fn write_document(&self, doc: &Document) -> Result<(), export::Error> {
        let Some(file_name) = &self.file_name else {
            return Err(export::Error::Render("no output file configured".to_string()));
        };
        info!(file_name = file_name.display().to_string(); "Creating SVG file");

        if let Err(err) = fs::write(file_name, doc.to_string()) {
            error!(file_name = file_name.display().to_string(), err:err; "Failed to write SVG file");
            return Err(export::Error::Io(err));
        }

        Ok(())
    }
}

impl Exporter for Svg {
    fn export_diagram(&self, diagram: &Diagram) -> Result<(), export::Error> {
        let doc = self.render_diagram(diagram);
        self.write_document(&doc)
    }
}

#[cfg(test)]
mod tests {
    use gateview_core::{
        identifier::Id,
        netlist::{Declaration, Graph},
    };

    use super::*;
    use crate::{
        depth::Depths, highlight::HighlightSet, layout::LayeredEngine, routing::EdgeRouter,
    };

    fn diagram(graph: &Graph, highlights: HighlightSet) -> Diagram {
        let layout = LayeredEngine::default().calculate(graph, &Depths::compute(graph));
        let routes = EdgeRouter::default().route(graph, &layout, &highlights);
        Diagram::new("Test", layout, routes, highlights)
    }

    fn small_graph() -> Graph {
        Graph::from_declarations([
            Declaration::Input(Id::new("a")),
            Declaration::Input(Id::new("b")),
            Declaration::Output(Id::new("y")),
            Declaration::FlipFlop {
                output: Id::new("q"),
                data: Id::new("y"),
            },
            Declaration::Gate {
                output: Id::new("y"),
                gate_type: Id::new("NAND"),
                inputs: vec![Id::new("a"), Id::new("b"), Id::new("q")],
            },
        ])
    }

    #[test]
    fn test_empty_diagram_has_title_only() {
        let svg = SvgBuilder::new().build().unwrap();
        let rendered = svg
            .render_diagram(&diagram(&Graph::default(), HighlightSet::default()))
            .to_string();

        assert!(rendered.contains("\nTest\n"));
        assert!(!rendered.contains("<circle"));
    }

    #[test]
    fn test_renders_every_node_and_wire() {
        let svg = SvgBuilder::new().build().unwrap();
        let rendered = svg
            .render_diagram(&diagram(&small_graph(), HighlightSet::default()))
            .to_string();

        assert_eq!(rendered.matches("class=\"node\"").count(), 4);
        assert_eq!(rendered.matches("marker-end=").count(), 4);
        assert!(rendered.contains("\ny\n"));
        assert!(rendered.contains("\nq (DFF)\n"));
        assert!(rendered.contains("stroke-dasharray"));
    }

    #[test]
    fn test_highlighting_fades_the_rest() {
        let path = [Id::new("a"), Id::new("y")];
        let svg = SvgBuilder::new().build().unwrap();
        let rendered = svg
            .render_diagram(&diagram(
                &small_graph(),
                HighlightSet::from_sequences([&path[..]]),
            ))
            .to_string();

        assert!(rendered.contains("#ffe0e0"));
        assert!(rendered.contains("opacity=\"0.4\""));
        assert!(!rendered.contains("stroke-dasharray"));
    }

    #[test]
    fn test_invalid_style_color_is_rejected() {
        let style = StyleConfig::default().with_highlight_color("not-a-color");
        let result = SvgBuilder::new().with_style(&style).build();

        assert!(matches!(result, Err(export::Error::Render(_))));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");
        let svg = SvgBuilder::new().with_file_name(&path).build().unwrap();

        svg.export_diagram(&diagram(&small_graph(), HighlightSet::default()))
            .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("<svg"));
    }

    #[test]
    fn test_export_without_file_name_fails() {
        let svg = SvgBuilder::new().build().unwrap();
        let result = svg.export_diagram(&diagram(&Graph::default(), HighlightSet::default()));

        assert!(matches!(result, Err(export::Error::Render(_))));
    }
}
