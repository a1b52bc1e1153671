//! Line strokes for wires and node outlines.
//!
//! | Property | SVG attribute |
//! |----------|---------------|
//! | `color` | `stroke`, `stroke-opacity` |
//! | `width` | `stroke-width` |
//! | `style` | `stroke-dasharray` |

use crate::color::Color;

/// Line pattern of a stroke.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeStyle {
    #[default]
    Solid,
    /// Used for flip-flop data inputs.
    Dashed,
}

impl StrokeStyle {
    /// Returns the SVG dasharray value, or `None` for solid lines.
    pub fn dasharray(self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("6,4"),
        }
    }
}

/// Color, width and pattern of a line.
///
/// ```
/// use gateview_core::draw::{StrokeDefinition, StrokeStyle};
/// use gateview_core::color::Color;
///
/// let stroke = StrokeDefinition::dashed(Color::new("#0066cc").unwrap(), 1.0);
///
/// assert_eq!(stroke.style(), StrokeStyle::Dashed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    pub fn dashed(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Dashed,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }
}

/// Sets the stroke attributes of an SVG element.
///
/// ```
/// use gateview_core::draw::StrokeDefinition;
/// use gateview_core::color::Color;
/// use svg::node::element as svg_element;
///
/// let stroke = StrokeDefinition::solid(Color::new("black").unwrap(), 2.0);
/// let line = svg_element::Line::new().set("x1", 0).set("x2", 10);
///
/// let line = gateview_core::apply_stroke!(line, &stroke);
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width());

        if let Some(dasharray) = $stroke.style().dasharray() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}
