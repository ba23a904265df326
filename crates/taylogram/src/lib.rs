#![forbid(unsafe_code)]

//! `taylogram` renders Taylor diagrams headlessly.
//!
//! A Taylor diagram summarizes how well candidate series match a reference
//! series: Pearson correlation maps to angular position, standard deviation
//! to radial position, with RMS-difference iso-contours in the background.
//!
//! # Features
//!
//! - `render`: enable layout + SVG rendering (`taylogram::render`)
//! - `raster`: enable PNG/JPG/PDF output via pure-Rust SVG rasterization

pub use taylogram_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use taylogram_render::model::TaylorDiagramLayout;
    pub use taylogram_render::svg::SvgRenderOptions;
    pub use taylogram_render::{
        CORRELATION_TICKS, ChartGeometry, layout_taylor_diagram, render_taylor_diagram_svg,
    };

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Model(#[from] taylogram_core::Error),
        #[error(transparent)]
        Render(#[from] taylogram_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Converts an arbitrary string into a conservative SVG `id` token.
    ///
    /// The root `<svg id="...">` value prefixes internal ids such as the
    /// view clip-path. When several diagrams are inlined in one document
    /// (one per subplot cell), reusing an id makes those internals collide;
    /// run each cell's name through this first.
    pub fn sanitize_svg_id(raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return "t-untitled".to_string();
        }

        let mut out = String::with_capacity(raw.len() + 4);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == ':' || ch == '.';
            out.push(if ok { ch } else { '-' });
        }

        let starts_ok = out.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
        if !starts_ok {
            out.insert_str(0, "t-");
        }

        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let out = out.trim_matches('-');
        if out.is_empty() || out == "t" {
            return "t-untitled".to_string();
        }
        out.to_string()
    }

    /// Builds the layout for a validated diagram.
    pub fn layout_diagram(
        diagram: &taylogram_core::TaylorDiagram,
        geometry: &ChartGeometry,
    ) -> Result<TaylorDiagramLayout> {
        Ok(layout_taylor_diagram(diagram, geometry)?)
    }

    /// Model -> layout -> SVG in one call. `legend` adds the horizontal
    /// legend row beneath the wedge.
    pub fn render_svg(
        diagram: &taylogram_core::TaylorDiagram,
        geometry: &ChartGeometry,
        svg_options: &SvgRenderOptions,
        legend: bool,
    ) -> Result<String> {
        let mut layout = layout_diagram(diagram, geometry)?;
        if legend {
            layout.build_legend();
        }
        Ok(render_taylor_diagram_svg(&layout, svg_options))
    }

    /// Convenience bundle for callers rendering many diagrams with shared
    /// options. All work is CPU-bound; no I/O, no ambient figure state.
    #[derive(Debug, Clone)]
    pub struct HeadlessRenderer {
        pub geometry: ChartGeometry,
        pub svg: SvgRenderOptions,
        pub legend: bool,
    }

    impl Default for HeadlessRenderer {
        fn default() -> Self {
            Self {
                geometry: ChartGeometry::default(),
                svg: SvgRenderOptions::default(),
                legend: false,
            }
        }
    }

    impl HeadlessRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_legend(mut self, legend: bool) -> Self {
            self.legend = legend;
            self
        }

        pub fn layout(
            &self,
            diagram: &taylogram_core::TaylorDiagram,
        ) -> Result<TaylorDiagramLayout> {
            layout_diagram(diagram, &self.geometry)
        }

        pub fn render_svg(&self, diagram: &taylogram_core::TaylorDiagram) -> Result<String> {
            render_svg(diagram, &self.geometry, &self.svg, self.legend)
        }

        pub fn render_svg_with_diagram_id(
            &self,
            diagram: &taylogram_core::TaylorDiagram,
            diagram_id: &str,
        ) -> Result<String> {
            let mut svg = self.svg.clone();
            svg.diagram_id = Some(sanitize_svg_id(diagram_id));
            render_svg(diagram, &self.geometry, &svg, self.legend)
        }

        #[cfg(feature = "raster")]
        pub fn render_png(
            &self,
            diagram: &taylogram_core::TaylorDiagram,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            let svg = self.render_svg(diagram)?;
            raster::svg_to_png(&svg, raster)
        }

        #[cfg(feature = "raster")]
        pub fn render_jpeg(
            &self,
            diagram: &taylogram_core::TaylorDiagram,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            let svg = self.render_svg(diagram)?;
            raster::svg_to_jpeg(&svg, raster)
        }

        #[cfg(feature = "raster")]
        pub fn render_pdf(&self, diagram: &taylogram_core::TaylorDiagram) -> raster::Result<Vec<u8>> {
            let svg = self.render_svg(diagram)?;
            raster::svg_to_pdf(&svg)
        }
    }

}
