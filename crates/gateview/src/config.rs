//! Configuration types for netlist layout, routing and rendering.
//!
//! All types implement [`serde::Deserialize`] and default every missing
//! field, so a configuration file only needs the values it changes:
//!
//! ```toml
//! [layout]
//! y_unit = 4.0
//!
//! [style]
//! highlight_color = "crimson"
//! ```
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Layer spacing and placement jitter.
//! - [`RoutingConfig`] - Wire routing offsets and margins.
//! - [`StyleConfig`] - SVG scale and colors.
//!
//! # Example
//!
//! ```
//! # use gateview::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().x_unit(), 5.0);
//! assert!(config.style().background_color().is_ok());
//! ```

use serde::Deserialize;

use gateview_core::color::Color;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Routing configuration section.
    #[serde(default)]
    routing: RoutingConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, routing: RoutingConfig, style: StyleConfig) -> Self {
        Self {
            layout,
            routing,
            style,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the routing configuration.
    pub fn routing(&self) -> &RoutingConfig {
        &self.routing
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Placement parameters of the layered layout, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal distance between depth layers.
    x_unit: f32,
    /// Vertical distance between rows of a layer.
    y_unit: f32,
    /// Per-node x jitter step, cycled over five values.
    x_jitter: f32,
    /// Per-node y jitter step, cycled over three values.
    y_jitter: f32,
    /// Flip-flop x jitter step, cycled over seven values.
    flip_flop_x_jitter: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            x_unit: 5.0,
            y_unit: 3.0,
            x_jitter: 0.4,
            y_jitter: 0.3,
            flip_flop_x_jitter: 1.5,
        }
    }
}

impl LayoutConfig {
    /// Returns a copy with the given jitter steps. Zero disables jitter.
    pub fn with_jitter(mut self, x_jitter: f32, y_jitter: f32, flip_flop_x_jitter: f32) -> Self {
        self.x_jitter = x_jitter;
        self.y_jitter = y_jitter;
        self.flip_flop_x_jitter = flip_flop_x_jitter;
        self
    }

    pub fn x_unit(&self) -> f32 {
        self.x_unit
    }

    pub fn y_unit(&self) -> f32 {
        self.y_unit
    }

    pub fn x_jitter(&self) -> f32 {
        self.x_jitter
    }

    pub fn y_jitter(&self) -> f32 {
        self.y_jitter
    }

    pub fn flip_flop_x_jitter(&self) -> f32 {
        self.flip_flop_x_jitter
    }
}

/// Wire routing parameters.
///
/// Distances are in layout units unless noted otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Maximum y difference for a straight wire between neighbouring layers.
    same_row_tolerance: f32,
    /// Clearance between a routing channel and the nodes it avoids, as a
    /// fraction of the layout `y_unit`.
    channel_margin: f32,
    /// Length of the divergence and convergence stubs, as a fraction of the
    /// layout `x_unit`.
    divergence_fraction: f32,
    /// Per-edge spacing of vertical segments.
    lane_spacing: f32,
    /// Step of the cycling per-edge offset.
    global_offset_step: f32,
    /// Period of the cycling per-edge offset.
    global_offset_cycle: usize,
    /// Spacing of wires fanning out of or into the same node.
    wire_spacing: f32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            same_row_tolerance: 0.1,
            channel_margin: 0.4,
            divergence_fraction: 0.08,
            lane_spacing: 0.25,
            global_offset_step: 0.15,
            global_offset_cycle: 10,
            wire_spacing: 0.25,
        }
    }
}

impl RoutingConfig {
    pub fn same_row_tolerance(&self) -> f32 {
        self.same_row_tolerance
    }

    pub fn channel_margin(&self) -> f32 {
        self.channel_margin
    }

    pub fn divergence_fraction(&self) -> f32 {
        self.divergence_fraction
    }

    pub fn lane_spacing(&self) -> f32 {
        self.lane_spacing
    }

    pub fn global_offset_step(&self) -> f32 {
        self.global_offset_step
    }

    /// Returns the offset period, never less than one.
    pub fn global_offset_cycle(&self) -> usize {
        self.global_offset_cycle.max(1)
    }

    pub fn wire_spacing(&self) -> f32 {
        self.wire_spacing
    }
}

/// Visual styling of rendered diagrams.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Pixels per layout unit.
    scale: f32,
    /// Node radius in layout units.
    node_radius: f32,
    /// Background [`Color`], as a color string. Transparent when unset.
    background_color: Option<String>,
    /// Stroke color of highlighted wires and node outlines.
    highlight_color: String,
    /// Stroke color of flip-flop data-input wires.
    flip_flop_edge_color: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            scale: 40.0,
            node_radius: 0.45,
            background_color: None,
            highlight_color: "red".to_string(),
            flip_flop_edge_color: "#0066cc".to_string(),
        }
    }
}

impl StyleConfig {
    /// Returns a copy using `color` for highlighted wires and outlines.
    pub fn with_highlight_color(mut self, color: impl Into<String>) -> Self {
        self.highlight_color = color.into();
        self
    }

    /// Returns the scale, never below one pixel per unit.
    pub fn scale(&self) -> f32 {
        self.scale.max(1.0)
    }

    pub fn node_radius(&self) -> f32 {
        self.node_radius
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the parsed highlight [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn highlight_color(&self) -> Result<Color, String> {
        Color::new(&self.highlight_color)
            .map_err(|err| format!("Invalid highlight color in config: {err}"))
    }

    /// Returns the parsed flip-flop input wire [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn flip_flop_edge_color(&self) -> Result<Color, String> {
        Color::new(&self.flip_flop_edge_color)
            .map_err(|err| format!("Invalid flip-flop edge color in config: {err}"))
    }
}
