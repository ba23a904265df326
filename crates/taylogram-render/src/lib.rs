#![forbid(unsafe_code)]

//! Headless layout + SVG rendering for Taylor diagrams.
//!
//! The pipeline is `taylogram_core::TaylorDiagram` (validated model)
//! -> [`layout::layout_taylor_diagram`] (pure geometry)
//! -> [`svg::render_taylor_diagram_svg`] (string emission).

pub mod contour;
pub mod layout;
pub mod model;
pub mod svg;

pub use layout::{CORRELATION_TICKS, ChartGeometry, layout_taylor_diagram};
pub use model::TaylorDiagramLayout;
pub use svg::{SvgRenderOptions, render_taylor_diagram_svg};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("drawing region too small: {width}x{height}")]
    RegionTooSmall { width: f64, height: f64 },
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
