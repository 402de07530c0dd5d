//! Line Chart Rendering
//!
//! Draws one or more numeric series as a line chart with axes and
//! gridlines, and writes it out as SVG.
//!
//! ## Architecture
//!
//! - **Series**: input data, colors and the built-in sample series
//! - **Scale**: linear scales and 1-2-5 tick generation
//! - **Layout**: drawable area, `y_max` and the two scales for one render
//! - **Curve**: linear or B-spline interpolation between points
//! - **Scene**: backend-neutral list of paths, markers, axes and gridlines
//! - **SVG**: plotters backend that turns a scene into an SVG document
//!
//! ```text
//! ChartOptions → ChartLayout → Scene → SVG
//! ```
//!
//! Every render is a single pass over its inputs; nothing is cached between
//! calls.

mod curve;
mod layout;
mod scale;
mod scene;
mod series;
mod svg;

use std::path::Path;

use thiserror::Error;

pub use curve::{interpolate, Curve};
pub use layout::{ChartLayout, ChartOptions, Insets};
pub use scale::{format_tick, ticks, LinearScale};
pub use scene::{build_scene, Anchor, LineRole, Point, Primitive, Scene};
pub use series::{sample_series, series_from_json, Rgb, Series};
pub use svg::render_svg;

/// Errors raised while laying out or drawing a chart
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("No series to draw")]
    NoSeries,

    #[error("Series '{0}' has no points")]
    EmptySeries(String),

    /// All series must share the x domain of the first one
    #[error("Series '{name}' has {found} points, expected {expected}")]
    MismatchedSeries {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Canvas {width}x{height} leaves no room inside the margins")]
    CanvasTooSmall { width: u32, height: u32 },

    #[error("Marker series {0} does not exist")]
    InvalidMarkerSeries(usize),

    #[error("At least one series color is required")]
    NoColors,

    #[error("Invalid container id: {0:?}")]
    InvalidContainerId(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Draw error: {0}")]
    Draw(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lay out and render a chart as an SVG document
pub fn render_chart_svg(opts: &ChartOptions) -> Result<String, ChartError> {
    let scene = build_scene(opts)?;
    render_svg(&scene)
}

/// Render a chart and write the SVG to `path`
pub fn write_chart_svg(opts: &ChartOptions, path: impl AsRef<Path>) -> Result<(), ChartError> {
    let path = path.as_ref();
    let svg = render_chart_svg(opts)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, svg)?;
    tracing::info!(path = %path.display(), "Wrote chart");
    Ok(())
}
