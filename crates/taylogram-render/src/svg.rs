//! SVG writer for a built [`TaylorDiagramLayout`].
//!
//! String-building with CSS classes; no DOM library. The quarter-polar
//! frame is two radial edges plus the outer arc; the bottom of the
//! enclosing rectangle is never drawn. The data layer (contours, reference
//! arc, markers) is clipped to the display wedge at `view_radius`.

use crate::model::{MarkerLayout, Point, TaylorDiagramLayout};
use std::fmt::Write as _;
use taylogram_core::MarkerShape;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Root `<svg id="...">`; also prefixes internal clip-path ids so
    /// multiple diagrams can be inlined in one document.
    pub diagram_id: Option<String>,
    /// Root background color.
    pub background: String,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            background: "white".to_string(),
        }
    }
}

pub(crate) fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut r = (v * 1000.0).round() / 1000.0;
    if r.abs() < 0.0005 {
        r = 0.0;
    }
    let mut s = format!("{r:.3}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLE_BLOCK: &str = r#"<style>
.taylorFrame { fill: none; stroke: #333333; stroke-width: 1; }
.taylorGrid { stroke: gray; stroke-width: 1; stroke-dasharray: 4 3; opacity: 0.6; }
.taylorTick { stroke: #333333; stroke-width: 1; }
.taylorTickLabel { fill: #333333; font-family: ui-sans-serif, system-ui, sans-serif; font-size: 11px; text-anchor: middle; dominant-baseline: middle; }
.taylorAxisTitle { fill: #111111; font-family: ui-sans-serif, system-ui, sans-serif; font-size: 13px; text-anchor: middle; dominant-baseline: middle; }
.taylorRefArc { fill: none; stroke: black; stroke-width: 1; stroke-dasharray: 6 4; }
.taylorContour { fill: none; stroke: gray; stroke-width: 1; stroke-dasharray: 4 3; opacity: 0.5; }
.taylorContourLabel { fill: gray; font-family: ui-sans-serif, system-ui, sans-serif; font-size: 10px; text-anchor: middle; dominant-baseline: middle; }
.taylorMarker { fill: none; stroke-width: 1.5; }
.taylorLegendText { fill: #111111; font-family: ui-sans-serif, system-ui, sans-serif; font-size: 12px; dominant-baseline: middle; }
</style>"#;

fn polyline_path(points: &[Point]) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(&mut d, "{}{},{}", cmd, fmt(p.x), fmt(p.y));
    }
    d
}

/// Wedge outline from the origin: horizontal edge, outer arc, back along
/// the vertical edge.
fn wedge_path(layout: &TaylorDiagramLayout, radius: f64) -> String {
    let r = radius * layout.unit;
    format!(
        "M{ox},{oy} L{hx},{oy} A{r},{r} 0 0 0 {ox},{vy} Z",
        ox = fmt(layout.origin_x),
        oy = fmt(layout.origin_y),
        hx = fmt(layout.origin_x + r),
        vy = fmt(layout.origin_y - r),
        r = fmt(r),
    )
}

fn write_marker(
    out: &mut String,
    m: &MarkerLayout,
    size: f64,
    alpha: f64,
    extra: &[(String, String)],
) {
    let half = size / 2.0;
    let color = escape_xml(&m.style.color);
    let mut common = format!(
        r#"class="taylorMarker" stroke="{color}" stroke-opacity="{alpha}""#,
        alpha = fmt(alpha)
    );
    for (key, value) in extra {
        let _ = write!(
            &mut common,
            r#" {key}="{value}""#,
            key = escape_xml(key),
            value = escape_xml(value),
        );
    }
    match m.style.marker {
        MarkerShape::Circle => {
            let _ = write!(
                out,
                r#"<circle cx="{x}" cy="{y}" r="{r}" {common}/>"#,
                x = fmt(m.x),
                y = fmt(m.y),
                r = fmt(half),
            );
        }
        MarkerShape::Square => {
            let _ = write!(
                out,
                r#"<rect x="{x}" y="{y}" width="{s}" height="{s}" {common}/>"#,
                x = fmt(m.x - half),
                y = fmt(m.y - half),
                s = fmt(size),
            );
        }
        MarkerShape::TriangleUp => {
            let _ = write!(
                out,
                r#"<path d="M{x},{top} L{right},{bottom} L{left},{bottom} Z" {common}/>"#,
                x = fmt(m.x),
                top = fmt(m.y - half),
                right = fmt(m.x + half),
                bottom = fmt(m.y + half),
                left = fmt(m.x - half),
            );
        }
        MarkerShape::TriangleDown => {
            let _ = write!(
                out,
                r#"<path d="M{x},{bottom} L{right},{top} L{left},{top} Z" {common}/>"#,
                x = fmt(m.x),
                bottom = fmt(m.y + half),
                right = fmt(m.x + half),
                top = fmt(m.y - half),
                left = fmt(m.x - half),
            );
        }
    }
}

/// Renders the layout as a standalone SVG document.
pub fn render_taylor_diagram_svg(layout: &TaylorDiagramLayout, options: &SvgRenderOptions) -> String {
    let diagram_id = options.diagram_id.as_deref().unwrap_or("taylor");
    let diagram_id_esc = escape_xml(diagram_id);
    let mut out = String::new();

    let _ = write!(
        &mut out,
        r#"<svg id="{id}" width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" role="graphics-document document" aria-roledescription="taylor" style="background-color: {bg};">"#,
        id = diagram_id_esc,
        w = fmt(layout.svg_width),
        h = fmt(layout.svg_height),
        bg = escape_xml(&options.background),
    );
    out.push_str(STYLE_BLOCK);

    // Display-only clip: the data layer is truncated to the view wedge, the
    // frame keeps the full extent.
    let _ = write!(
        &mut out,
        r#"<defs><clipPath id="{id}-view"><path d="{d}"/></clipPath></defs>"#,
        id = diagram_id_esc,
        d = wedge_path(layout, layout.view_radius),
    );

    // Dashed radial grid at each correlation tick.
    out.push_str(r#"<g class="taylorGrid">"#);
    for t in &layout.corr_ticks {
        let _ = write!(
            &mut out,
            r#"<line x1="{ox}" y1="{oy}" x2="{x2}" y2="{y2}"/>"#,
            ox = fmt(layout.origin_x),
            oy = fmt(layout.origin_y),
            x2 = fmt(t.grid_x),
            y2 = fmt(t.grid_y),
        );
    }
    out.push_str("</g>");

    // Quarter frame: two radial edges plus the outer arc, no bottom box
    // edge.
    let _ = write!(
        &mut out,
        r#"<path class="taylorFrame" d="{d}"/>"#,
        d = wedge_path(layout, layout.extent),
    );

    // Angular tick labels, reading along the arc.
    out.push_str(r#"<g class="taylorCorrTicks">"#);
    for t in &layout.corr_ticks {
        let _ = write!(
            &mut out,
            r#"<text class="taylorTickLabel" x="{x}" y="{y}" transform="rotate({rot} {x} {y})">{label}</text>"#,
            x = fmt(t.label_x),
            y = fmt(t.label_y),
            rot = fmt(t.label_rotation),
            label = escape_xml(&t.label),
        );
    }
    out.push_str("</g>");

    // Radial ticks on the horizontal edge.
    out.push_str(r#"<g class="taylorStdTicks">"#);
    for t in &layout.std_ticks {
        let _ = write!(
            &mut out,
            r#"<line class="taylorTick" x1="{x}" y1="{y1}" x2="{x}" y2="{y2}"/>"#,
            x = fmt(t.x),
            y1 = fmt(t.y),
            y2 = fmt(t.tick_y2),
        );
        let _ = write!(
            &mut out,
            r#"<text class="taylorTickLabel" x="{x}" y="{y}">{label}</text>"#,
            x = fmt(t.x),
            y = fmt(t.label_y),
            label = escape_xml(&t.label),
        );
    }
    out.push_str("</g>");

    for title in [
        &layout.corr_title,
        &layout.std_title_bottom,
        &layout.std_title_left,
    ] {
        let _ = write!(
            &mut out,
            r#"<text class="taylorAxisTitle" x="{x}" y="{y}" transform="rotate({rot} {x} {y})">{text}</text>"#,
            x = fmt(title.x),
            y = fmt(title.y),
            rot = fmt(title.rotation),
            text = escape_xml(&title.text),
        );
    }

    // Data layer, clipped to the view wedge.
    let _ = write!(
        &mut out,
        r#"<g clip-path="url(#{id}-view)">"#,
        id = diagram_id_esc
    );

    out.push_str(r#"<g class="taylorContours">"#);
    for contour in &layout.contours {
        for path in &contour.paths {
            let _ = write!(
                &mut out,
                r#"<path class="taylorContour" d="{d}"/>"#,
                d = polyline_path(path),
            );
        }
        let _ = write!(
            &mut out,
            r#"<text class="taylorContourLabel" x="{x}" y="{y}">{label}</text>"#,
            x = fmt(contour.label_x),
            y = fmt(contour.label_y),
            label = escape_xml(&contour.label),
        );
    }
    out.push_str("</g>");

    let _ = write!(
        &mut out,
        r#"<path class="taylorRefArc" d="{d}"/>"#,
        d = polyline_path(&layout.reference_arc),
    );

    out.push_str(r#"<g class="taylorMarkers">"#);
    for m in &layout.markers {
        write_marker(
            &mut out,
            m,
            layout.marker_size,
            layout.marker_alpha,
            &layout.marker_extra,
        );
    }
    out.push_str("</g>");

    out.push_str("</g>");

    if !layout.legend_items.is_empty() {
        out.push_str(r#"<g class="taylorLegend">"#);
        for item in &layout.legend_items {
            let swatch = MarkerLayout {
                label: item.label.clone(),
                style: item.style.clone(),
                theta: 0.0,
                radius: 0.0,
                x: item.x,
                y: item.y,
            };
            write_marker(&mut out, &swatch, 10.0, 1.0, &layout.marker_extra);
            let _ = write!(
                &mut out,
                r#"<text class="taylorLegendText" x="{x}" y="{y}">{text}</text>"#,
                x = fmt(item.label_x),
                y = fmt(item.y),
                text = escape_xml(&item.label),
            );
        }
        out.push_str("</g>");
    }

    out.push_str("</svg>");
    out
}
