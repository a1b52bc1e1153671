//! Command-line argument definitions for the gateview CLI.

use clap::Parser;

/// Command-line arguments for the gateview netlist visualizer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the `.bench` netlist
    #[arg(help = "Path to the netlist file")]
    pub netlist: String,

    /// Base name of the generated SVG files
    #[arg(default_value = "circuit")]
    pub output_name: String,

    /// Draw the fan-in cone of this primary output
    #[arg(long = "path", value_name = "OUTPUT")]
    pub path: Option<String>,

    /// Timing report whose critical paths are highlighted on the full diagram
    #[arg(long, value_name = "FILE")]
    pub highlight_path: Option<String>,

    /// Timing report whose critical paths are drawn on their own
    #[arg(long, value_name = "FILE")]
    pub extract_path: Option<String>,

    /// Hops followed back from the `--path` output
    #[arg(long, default_value_t = 10)]
    pub max_depth: usize,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
