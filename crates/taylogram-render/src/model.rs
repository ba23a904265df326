//! Pure layout structs: everything the SVG writer needs, in screen
//! coordinates, with no drawing-surface state attached.

use serde::Serialize;
use taylogram_core::PointStyle;

pub type Point = taylogram_core::geom::Point;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// A correlation tick on the outer arc: dashed radial grid line from the
/// origin plus a label just outside the arc.
#[derive(Debug, Clone, Serialize)]
pub struct CorrTickLayout {
    /// Correlation value the tick stands for (label text comes from it).
    pub correlation: f64,
    pub label: String,
    pub theta: f64,
    /// Grid line endpoint on the arc.
    pub grid_x: f64,
    pub grid_y: f64,
    pub label_x: f64,
    pub label_y: f64,
    /// Degrees to rotate the label so it reads along the arc.
    pub label_rotation: f64,
}

/// A standard-deviation tick on the horizontal (theta = 0) edge.
#[derive(Debug, Clone, Serialize)]
pub struct StdTickLayout {
    pub value: f64,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub tick_y2: f64,
    pub label_y: f64,
}

/// One RMS iso-level: possibly several disjoint polylines plus one inline
/// label position.
#[derive(Debug, Clone, Serialize)]
pub struct ContourLineLayout {
    pub level: f64,
    pub label: String,
    pub paths: Vec<Vec<Point>>,
    pub label_x: f64,
    pub label_y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkerLayout {
    pub label: String,
    #[serde(skip)]
    pub style: PointStyle,
    pub theta: f64,
    /// Radial position in data units (standard deviation).
    pub radius: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegendItemLayout {
    pub label: String,
    #[serde(skip)]
    pub style: PointStyle,
    /// Swatch center.
    pub x: f64,
    pub y: f64,
    pub label_x: f64,
}

/// The complete diagram layout. Built once by
/// [`crate::layout::layout_taylor_diagram`]; the optional legend row is
/// added afterwards by [`TaylorDiagramLayout::build_legend`], so a legend
/// can never exist before the points it lists.
#[derive(Debug, Clone, Serialize)]
pub struct TaylorDiagramLayout {
    pub bounds: Bounds,
    pub svg_width: f64,
    pub svg_height: f64,
    /// Wedge origin (lower-left of the quarter circle), screen coords.
    pub origin_x: f64,
    pub origin_y: f64,
    /// Pixels per data unit along the radial axis.
    pub unit: f64,
    /// Radial axis extent in data units (`scale * max std`).
    pub extent: f64,
    /// Display-only clip radius in data units; the data layer is clipped to
    /// this wedge, the frame keeps the full extent.
    pub view_radius: f64,
    /// Reference standard deviation (radius of the dashed arc).
    pub refstd: f64,
    pub marker_size: f64,
    pub marker_alpha: f64,
    /// Uniform extra SVG attributes for every marker.
    pub marker_extra: Vec<(String, String)>,
    pub corr_ticks: Vec<CorrTickLayout>,
    pub std_ticks: Vec<StdTickLayout>,
    /// Dashed arc at r = refstd, sampled as a polyline.
    pub reference_arc: Vec<Point>,
    pub contours: Vec<ContourLineLayout>,
    /// Reference first, then samples in input order.
    pub markers: Vec<MarkerLayout>,
    /// Empty until [`Self::build_legend`] runs.
    pub legend_items: Vec<LegendItemLayout>,
    /// Angular axis title position (along the outer arc at 45 degrees).
    pub corr_title: TitleLayout,
    /// Radial axis titles: horizontal (theta = 0) edge and vertical edge.
    pub std_title_bottom: TitleLayout,
    pub std_title_left: TitleLayout,
}

#[derive(Debug, Clone, Serialize)]
pub struct TitleLayout {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

impl TaylorDiagramLayout {
    /// Screen position of a data-space (theta, radius) pair.
    pub fn project(&self, theta: f64, radius: f64) -> Point {
        taylogram_core::geom::point(
            self.origin_x + radius * self.unit * theta.cos(),
            self.origin_y - radius * self.unit * theta.sin(),
        )
    }

    /// The layout as a JSON value, for debug dumps and tooling.
    pub fn to_json(&self) -> crate::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
