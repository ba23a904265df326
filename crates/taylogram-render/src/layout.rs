//! Grid/axis builder and marker placement.
//!
//! Everything here is pure: a validated [`TaylorDiagram`] plus a
//! [`ChartGeometry`] go in, a [`TaylorDiagramLayout`] comes out. The legend
//! row is a separate, later step on the built layout.

use crate::contour::{self, ScalarGrid};
use crate::model::{
    Bounds, ContourLineLayout, CorrTickLayout, LegendItemLayout, MarkerLayout, Point, StdTickLayout,
    TaylorDiagramLayout, TitleLayout,
};
use crate::{Error, Result};
use std::f64::consts::FRAC_PI_2;
use taylogram_core::TaylorDiagram;
use taylogram_core::stats::rms_difference;

/// Correlation values marked on the angular axis.
pub const CORRELATION_TICKS: [f64; 10] = [0.0, 0.2, 0.4, 0.6, 0.7, 0.8, 0.9, 0.95, 0.99, 1.0];

const ARC_SAMPLES: usize = 64;
const TICK_LABEL_PAD: f64 = 14.0;
const AXIS_TITLE_PAD: f64 = 42.0;
const LEGEND_FONT_SIZE: f64 = 12.0;
const LEGEND_SWATCH: f64 = 12.0;
const LEGEND_GAP: f64 = 24.0;

/// Size of the drawing region: `width x height` is the wedge's plot area,
/// margins hold tick labels, axis titles and the legend row.
#[derive(Debug, Clone)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
}

impl Default for ChartGeometry {
    fn default() -> Self {
        Self {
            width: 520.0,
            height: 520.0,
            margin_left: 70.0,
            margin_right: 60.0,
            margin_top: 60.0,
            margin_bottom: 96.0,
        }
    }
}

impl ChartGeometry {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

/// Decimal places needed so `step`-spaced values stay distinct, e.g.
/// 0.25 -> 2, 0.0005 -> 4, 5.0 -> 0.
fn tick_decimals(step: f64) -> usize {
    if !(step > 0.0) {
        return 0;
    }
    let mut decimals = 0;
    let mut s = step;
    while decimals < 9 && (s - s.round()).abs() > s.abs().max(1.0) * 1e-6 {
        s *= 10.0;
        decimals += 1;
    }
    decimals
}

fn fmt_tick(v: f64, decimals: usize) -> String {
    // Shortest decimal form: "0", "0.2", "0.95".
    let mut s = format!("{v:.decimals$}");
    while s.contains('.') && (s.ends_with('0') || s.ends_with('.')) {
        s.pop();
    }
    s
}

/// Builds the complete layout: curved grid, RMS contour background,
/// reference arc and one marker per point (reference first). Runs once per
/// diagram.
pub fn layout_taylor_diagram(
    diagram: &TaylorDiagram,
    geometry: &ChartGeometry,
) -> Result<TaylorDiagramLayout> {
    let radius_px = geometry.width.min(geometry.height);
    if !(radius_px > 0.0) {
        return Err(Error::RegionTooSmall {
            width: geometry.width,
            height: geometry.height,
        });
    }

    let svg_width = geometry.width + geometry.margin_left + geometry.margin_right;
    let svg_height = geometry.height + geometry.margin_top + geometry.margin_bottom;
    let origin_x = geometry.margin_left;
    let origin_y = geometry.margin_top + geometry.height;

    let extent = diagram.radial_extent();
    let unit = radius_px / extent;
    let refstd = diagram.refstd();
    let options = diagram.options();

    let mut layout = TaylorDiagramLayout {
        bounds: Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: svg_width,
            max_y: svg_height,
        },
        svg_width,
        svg_height,
        origin_x,
        origin_y,
        unit,
        extent,
        view_radius: diagram.view_radius(),
        refstd,
        marker_size: options.marker_size,
        marker_alpha: options.marker_alpha,
        marker_extra: diagram.styles().extra.clone(),
        corr_ticks: Vec::new(),
        std_ticks: Vec::new(),
        reference_arc: Vec::new(),
        contours: Vec::new(),
        markers: Vec::new(),
        legend_items: Vec::new(),
        corr_title: TitleLayout {
            text: "Correlation".to_string(),
            x: 0.0,
            y: 0.0,
            rotation: 45.0,
        },
        std_title_bottom: TitleLayout {
            text: "Standard deviation".to_string(),
            x: origin_x + radius_px / 2.0,
            y: origin_y + AXIS_TITLE_PAD,
            rotation: 0.0,
        },
        std_title_left: TitleLayout {
            text: "Standard deviation".to_string(),
            x: origin_x - AXIS_TITLE_PAD,
            y: origin_y - radius_px / 2.0,
            rotation: -90.0,
        },
    };

    // Angular axis: ticks at fixed correlations, labeled with the
    // correlation value, reading along the outer arc.
    for c in CORRELATION_TICKS {
        let theta = c.acos();
        let grid_end = layout.project(theta, extent);
        let dir_x = theta.cos();
        let dir_y = -theta.sin();
        layout.corr_ticks.push(CorrTickLayout {
            correlation: c,
            label: fmt_tick(c, 2),
            theta,
            grid_x: grid_end.x,
            grid_y: grid_end.y,
            label_x: grid_end.x + dir_x * TICK_LABEL_PAD,
            label_y: grid_end.y + dir_y * TICK_LABEL_PAD,
            label_rotation: 90.0 - theta.to_degrees(),
        });
    }
    let title_pos = layout.project(std::f64::consts::FRAC_PI_4, extent);
    layout.corr_title.x = title_pos.x + std::f64::consts::FRAC_PI_4.cos() * AXIS_TITLE_PAD;
    layout.corr_title.y = title_pos.y - std::f64::consts::FRAC_PI_4.sin() * AXIS_TITLE_PAD;

    // Radial axis ticks on the horizontal (theta = 0) edge. Label precision
    // follows the tick step so small-magnitude data keeps distinct labels.
    let std_ticks = contour::nice_ticks(0.0, extent, 5);
    let std_step = match std_ticks.as_slice() {
        [a, b, ..] => b - a,
        _ => extent,
    };
    let std_decimals = tick_decimals(std_step);
    for value in std_ticks {
        let x = origin_x + value * unit;
        layout.std_ticks.push(StdTickLayout {
            value,
            label: fmt_tick(value, std_decimals),
            x,
            y: origin_y,
            tick_y2: origin_y + 6.0,
            label_y: origin_y + 6.0 + TICK_LABEL_PAD,
        });
    }

    // Dashed arc at r = refstd, the perfect-std-match locus.
    layout.reference_arc = sample_arc(&layout, refstd);

    // RMS background: sample the law-of-cosines field over the full
    // (theta, radius) wedge and trace four nice levels.
    let grid = ScalarGrid::sample(0.0, FRAC_PI_2, 0.0, extent, options.contour_grid, |t, r| {
        rms_difference(refstd, r, t)
    });
    let (field_min, field_max) = grid.min_max();
    let levels = contour::nice_levels(field_min, field_max, options.contour_levels);
    let level_decimals = match levels.as_slice() {
        [a, b, ..] => tick_decimals(b - a),
        [a] => tick_decimals(a.abs()),
        [] => 0,
    };
    for level in levels {
        let paths: Vec<Vec<Point>> = contour::extract_iso_lines(&grid, level)
            .into_iter()
            .map(|line| {
                line.into_iter()
                    .map(|p| layout.project(p.x, p.y))
                    .collect::<Vec<Point>>()
            })
            .filter(|line: &Vec<Point>| line.len() >= 2)
            .collect();
        if paths.is_empty() {
            continue;
        }
        // Inline label at the midpoint of the longest polyline.
        let longest = paths
            .iter()
            .max_by_key(|p| p.len())
            .map(|p| p[p.len() / 2])
            .unwrap_or_else(|| layout.project(0.0, 0.0));
        layout.contours.push(ContourLineLayout {
            level,
            label: fmt_tick(level, level_decimals),
            paths,
            label_x: longest.x,
            label_y: longest.y,
        });
    }

    // Reference point first, then samples in input order.
    let ref_pos = layout.project(0.0, refstd);
    layout.markers.push(MarkerLayout {
        label: diagram.reference().name().to_string(),
        style: diagram.styles().reference.clone(),
        theta: 0.0,
        radius: refstd,
        x: ref_pos.x,
        y: ref_pos.y,
    });
    for (i, point) in diagram.samples().iter().enumerate() {
        let pos = layout.project(point.theta, point.radius);
        layout.markers.push(MarkerLayout {
            label: point.name.clone(),
            style: diagram.styles().sample(i).clone(),
            theta: point.theta,
            radius: point.radius,
            x: pos.x,
            y: pos.y,
        });
    }

    Ok(layout)
}

fn sample_arc(layout: &TaylorDiagramLayout, radius: f64) -> Vec<Point> {
    (0..=ARC_SAMPLES)
        .map(|i| {
            let theta = FRAC_PI_2 * i as f64 / ARC_SAMPLES as f64;
            layout.project(theta, radius)
        })
        .collect()
}

impl TaylorDiagramLayout {
    /// Fills the legend row: one swatch + label per plotted point, reference
    /// first, in a single horizontal line centered beneath the wedge.
    ///
    /// Separate from layout construction on purpose: the row depends on the
    /// final point count, and taking `&mut self` on a built layout makes a
    /// legend-before-points call unrepresentable.
    pub fn build_legend(&mut self) {
        let widths: Vec<f64> = self
            .markers
            .iter()
            .map(|m| LEGEND_SWATCH + 6.0 + m.label.chars().count() as f64 * LEGEND_FONT_SIZE * 0.6)
            .collect();
        let total: f64 = widths.iter().sum::<f64>() + LEGEND_GAP * (widths.len() - 1) as f64;
        let mut x = (self.svg_width - total) / 2.0;
        let y = self.origin_y + AXIS_TITLE_PAD + 28.0;

        self.legend_items.clear();
        for (marker, width) in self.markers.iter().zip(&widths) {
            self.legend_items.push(LegendItemLayout {
                label: marker.label.clone(),
                style: marker.style.clone(),
                x: x + LEGEND_SWATCH / 2.0,
                y,
                label_x: x + LEGEND_SWATCH + 6.0,
            });
            x += width + LEGEND_GAP;
        }
    }
}
