//! Layered diagrams of gate-level netlists.
//!
//! The pipeline runs in fixed stages, each consuming the complete output of
//! the previous one:
//!
//! 1. [`gateview_parser`] turns a `.bench` netlist into a
//!    [`Graph`](netlist::Graph) and timing reports into critical paths.
//! 2. [`depth::Depths`] assigns every node its distance from the inputs.
//! 3. [`layout::LayeredEngine`] places nodes in depth columns, outputs on the
//!    right and flip-flops in a band below.
//! 4. [`routing::EdgeRouter`] turns every edge into a polyline.
//! 5. The SVG exporter draws the resulting [`diagram::Diagram`].
//!
//! [`Visualizer`] wires the stages together.
//!
//! ```rust,no_run
//! use gateview::{Visualizer, config::AppConfig, highlight::HighlightSet};
//!
//! let netlist = gateview::load_netlist("s27.bench").expect("netlist");
//! let visualizer = Visualizer::new(AppConfig::default());
//!
//! let diagram = visualizer.overview(netlist.graph(), &HighlightSet::default());
//! visualizer.export_svg(&diagram, "s27.svg").expect("export");
//! ```

pub mod config;
pub mod depth;
pub mod diagram;
pub mod highlight;
pub mod layout;
pub mod routing;
pub mod stats;
pub mod view;

mod error;
mod export;

pub use gateview_core::{color, draw, geometry, identifier, netlist};

pub use error::GateviewError;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info};

use gateview_core::{
    identifier::Id,
    netlist::{Graph, Topology},
};
use gateview_parser::{ParsedNetlist, ParsedReport};

use config::AppConfig;
use depth::Depths;
use diagram::Diagram;
use export::Exporter;
use highlight::HighlightSet;
use layout::LayeredEngine;
use routing::EdgeRouter;
use stats::Statistics;
use view::Subgraph;

/// Reads and parses a netlist file.
///
/// Malformed lines are skipped and reported through
/// [`ParsedNetlist::diagnostics`].
///
/// # Errors
///
/// Returns [`GateviewError::Io`] if the file cannot be read.
pub fn load_netlist(path: impl AsRef<Path>) -> Result<ParsedNetlist, GateviewError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    let netlist = gateview_parser::parse_netlist(&source);
    info!(
        file = path.display().to_string(),
        nodes = netlist.graph().node_count(),
        skipped = netlist.diagnostics().len();
        "Netlist loaded"
    );
    Ok(netlist)
}

/// Reads and parses a critical-path report.
///
/// A report without any usable path is not an error; it carries a warning in
/// [`ParsedReport::diagnostics`] instead.
///
/// # Errors
///
/// Returns [`GateviewError::MissingReport`] if the file does not exist and
/// [`GateviewError::Io`] if it cannot be read.
pub fn load_report(path: impl AsRef<Path>) -> Result<ParsedReport, GateviewError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => GateviewError::MissingReport {
            path: PathBuf::from(path),
        },
        _ => GateviewError::Io(err),
    })?;
    let report = gateview_parser::parse_report(&source);
    info!(
        file = path.display().to_string(),
        paths = report.paths().len();
        "Report loaded"
    );
    Ok(report)
}

/// Builds diagrams from a netlist graph and exports them.
#[derive(Debug, Default)]
pub struct Visualizer {
    config: AppConfig,
}

impl Visualizer {
    /// Creates a visualizer with the given layout, routing and style settings.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Collects node, edge and gate-type counts.
    pub fn statistics(&self, graph: &Graph) -> Statistics {
        Statistics::collect(graph)
    }

    /// Lays out the whole graph. Nodes and edges outside a non-empty
    /// `highlights` set are drawn faded.
    pub fn overview(&self, graph: &Graph, highlights: &HighlightSet) -> Diagram {
        info!(
            nodes = graph.node_count(),
            highlighted = highlights.node_count();
            "Building overview"
        );
        self.build("Circuit Overview", graph, highlights.clone())
    }

    /// Lays out only the highlighted part of the graph.
    ///
    /// Returns `None` when no highlighted node exists in the graph.
    pub fn extracted(&self, graph: &Graph, highlights: &HighlightSet) -> Option<Diagram> {
        let view = Subgraph::extracted(graph, highlights);
        if view.is_empty() {
            info!("No critical paths to extract");
            return None;
        }
        info!(nodes = view.node_count(); "Building extracted view");
        Some(self.build("Critical Paths", &view, highlights.clone()))
    }

    /// Lays out the fan-in cone of the output named `target`, up to
    /// `max_depth` hops back.
    ///
    /// # Errors
    ///
    /// Returns [`GateviewError::UnknownOutput`] if `target` is not a primary
    /// output of `graph`.
    pub fn path_to_output(
        &self,
        graph: &Graph,
        target: &str,
        max_depth: usize,
    ) -> Result<Diagram, GateviewError> {
        let view = Subgraph::path_to_output(graph, Id::new(target), max_depth)?;
        info!(output = target, nodes = view.node_count(); "Building path to output");
        Ok(self.build(
            format!("Path to {target}"),
            &view,
            HighlightSet::default(),
        ))
    }

    fn build(
        &self,
        title: impl Into<String>,
        topology: &impl Topology,
        highlights: HighlightSet,
    ) -> Diagram {
        let depths = Depths::compute(topology);
        let layout = LayeredEngine::new(*self.config.layout()).calculate(topology, &depths);
        let routes = EdgeRouter::new(*self.config.layout(), *self.config.routing()).route(
            topology,
            &layout,
            &highlights,
        );
        debug!(nodes = layout.len(), wires = routes.len(); "Diagram built");
        Diagram::new(title, layout, routes, highlights)
    }

    /// Renders a diagram to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`GateviewError::Export`] if a configured color is invalid.
    pub fn render_svg(&self, diagram: &Diagram) -> Result<String, GateviewError> {
        let svg = export::svg::SvgBuilder::new()
            .with_style(self.config.style())
            .build()?;
        Ok(svg.render_diagram(diagram).to_string())
    }

    /// Writes a diagram to an SVG file.
    ///
    /// # Errors
    ///
    /// Returns [`GateviewError::Export`] if a configured color is invalid or
    /// the file cannot be written.
    pub fn export_svg(&self, diagram: &Diagram, path: impl AsRef<Path>) -> Result<(), GateviewError> {
        let svg = export::svg::SvgBuilder::new()
            .with_file_name(path.as_ref())
            .with_style(self.config.style())
            .build()?;
        svg.export_diagram(diagram)?;
        info!(file = path.as_ref().display().to_string(); "Diagram exported");
        Ok(())
    }
}
