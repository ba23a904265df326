//! Marker styling and diagram options.
//!
//! Styles are addressed by role (reference vs. n-th sample) and validated
//! against the sample count when the diagram model is built; there is no
//! silent cycling or truncation of short style lists.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerShape {
    TriangleUp,
    Circle,
    Square,
    TriangleDown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointStyle {
    pub marker: MarkerShape,
    /// CSS color (hex or named).
    pub color: String,
}

impl PointStyle {
    pub fn new(marker: MarkerShape, color: impl Into<String>) -> Self {
        Self {
            marker,
            color: color.into(),
        }
    }
}

/// Matplotlib "tab:" palette entries used by the default style set.
pub const TAB_BLUE: &str = "#1f77b4";
pub const TAB_RED: &str = "#d62728";
pub const TAB_GREEN: &str = "#2ca02c";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    pub reference: PointStyle,
    pub samples: Vec<PointStyle>,
    /// Extra SVG presentation attributes applied uniformly to every marker,
    /// e.g. `("stroke-width", "2")`.
    #[serde(default)]
    pub extra: Vec<(String, String)>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        // Triangle-up/blue reference, then circle/square/triangle-down in a
        // red group and a green group: six sample slots out of the box.
        let group = [
            MarkerShape::Circle,
            MarkerShape::Square,
            MarkerShape::TriangleDown,
        ];
        let mut samples = Vec::with_capacity(6);
        for color in [TAB_RED, TAB_GREEN] {
            for marker in group {
                samples.push(PointStyle::new(marker, color));
            }
        }
        Self {
            reference: PointStyle::new(MarkerShape::TriangleUp, TAB_BLUE),
            samples,
            extra: Vec::new(),
        }
    }
}

impl StyleConfig {
    /// Style for the n-th sample (0-based). Valid for any index the model
    /// accepted at construction.
    pub fn sample(&self, index: usize) -> &PointStyle {
        &self.samples[index]
    }
}

/// Knobs shared by every rendering of a diagram. Deserializable so the CLI
/// can take them from a JSON config file; every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramOptions {
    /// Radial axis extent as a multiple of the largest standard deviation.
    pub scale: f64,
    /// Marker size in SVG user units (diameter-ish, matplotlib `ms`).
    pub marker_size: f64,
    /// Stroke opacity of every plotted marker.
    pub marker_alpha: f64,
    /// Number of RMS iso-contour levels.
    pub contour_levels: usize,
    /// Resolution of the (theta, radius) sampling grid per axis.
    pub contour_grid: usize,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            scale: 1.2,
            marker_size: 10.0,
            marker_alpha: 0.5,
            contour_levels: 4,
            contour_grid: 100,
        }
    }
}

impl DiagramOptions {
    /// Checks every knob a JSON config can set. `TaylorDiagram::new` calls
    /// this, so a degenerate config fails construction instead of producing
    /// a layout with non-finite coordinates.
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(crate::error::Error::InvalidOptions {
                reason: "scale must be finite and positive",
            });
        }
        if !(self.marker_size.is_finite() && self.marker_size > 0.0) {
            return Err(crate::error::Error::InvalidOptions {
                reason: "marker_size must be finite and positive",
            });
        }
        if !(self.marker_alpha.is_finite() && (0.0..=1.0).contains(&self.marker_alpha)) {
            return Err(crate::error::Error::InvalidOptions {
                reason: "marker_alpha must be in [0, 1]",
            });
        }
        if self.contour_grid < 2 {
            return Err(crate::error::Error::InvalidOptions {
                reason: "contour_grid must be at least 2",
            });
        }
        Ok(())
    }
}
