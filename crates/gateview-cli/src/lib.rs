//! gateview CLI library
//!
//! This module contains the core CLI logic: it reads a netlist, prints its
//! statistics and writes one SVG per requested view.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{debug, error, info, warn};

use gateview::{
    GateviewError, Visualizer, diagram::Diagram, highlight::HighlightSet, netlist::Graph,
};
use gateview_parser::ParsedReport;

use error_adapter::{DiagnosticAdapter, ErrorAdapter};

/// Run the gateview CLI application
///
/// Artifacts are produced in a fixed order:
///
/// 1. `<output_name>_extract.svg` for `--extract-path`
/// 2. `<output_name>.svg` with highlights for `--highlight-path`
/// 3. `<output_name>_path.svg` for `--path`
/// 4. a plain `<output_name>.svg` when none of the above was drawn
///
/// # Errors
///
/// Returns [`GateviewError`] for:
/// - Unreadable netlist or configuration files
/// - A report file that does not exist
/// - Export errors
///
/// A `--path` naming something other than a primary output is reported and
/// skipped without failing the run.
pub fn run(args: &Args) -> Result<(), GateviewError> {
    info!(
        netlist = args.netlist,
        output_name = args.output_name;
        "Processing netlist"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.netlist)?;
    let netlist = gateview_parser::parse_netlist(&source);
    for diag in netlist.diagnostics() {
        debug!(
            "Skipped netlist line\n{}",
            error_adapter::render(&DiagnosticAdapter::new(diag).with_source(&source))
        );
    }
    let graph = netlist.graph();

    let visualizer = Visualizer::new(app_config);
    println!("{}", visualizer.statistics(graph));

    let highlight_report = load_report(args.highlight_path.as_deref())?;
    let extract_report = load_report(args.extract_path.as_deref())?;

    let mut rendered = false;

    if let Some(report) = &extract_report {
        let highlights = HighlightSet::from_paths(report.paths());
        match visualizer.extracted(graph, &highlights) {
            Some(diagram) => {
                export(&visualizer, &diagram, &args.output_name, "_extract")?;
                rendered = true;
            }
            None => warn!("No critical paths found to extract"),
        }
    }

    if let Some(report) = &highlight_report {
        if report.has_paths() {
            let highlights = HighlightSet::from_paths(report.paths());
            let diagram = visualizer.overview(graph, &highlights);
            export(&visualizer, &diagram, &args.output_name, "")?;
            rendered = true;
        } else {
            warn!("No critical paths found to highlight");
        }
    }

    if let Some(target) = &args.path {
        render_path(&visualizer, graph, target, args)?;
        rendered = true;
    }

    if !rendered {
        let diagram = visualizer.overview(graph, &HighlightSet::default());
        export(&visualizer, &diagram, &args.output_name, "")?;
        println!(
            "Tip: use --highlight-path, --extract-path or --path OUTPUT to focus the diagram"
        );
    }

    Ok(())
}

/// Loads a report if one was requested, warning about reports without paths.
fn load_report(path: Option<&str>) -> Result<Option<ParsedReport>, GateviewError> {
    let Some(path) = path else {
        return Ok(None);
    };

    let report = gateview::load_report(path)?;
    for diag in report.diagnostics() {
        warn!("{}", error_adapter::render(&DiagnosticAdapter::new(diag)));
    }
    Ok(Some(report))
}

fn render_path(
    visualizer: &Visualizer,
    graph: &Graph,
    target: &str,
    args: &Args,
) -> Result<(), GateviewError> {
    match visualizer.path_to_output(graph, target, args.max_depth) {
        Ok(diagram) => export(visualizer, &diagram, &args.output_name, "_path"),
        Err(err @ GateviewError::UnknownOutput(_)) => {
            error!("Skipping path view\n{}", error_adapter::render(&ErrorAdapter(&err)));
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn export(
    visualizer: &Visualizer,
    diagram: &Diagram,
    output_name: &str,
    suffix: &str,
) -> Result<(), GateviewError> {
    let file_name = format!("{output_name}{suffix}.svg");
    visualizer.export_svg(diagram, &file_name)?;
    println!("Generated: {file_name}");
    Ok(())
}
