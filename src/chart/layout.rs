//! Chart options and the scale layout derived from them.

use super::curve::Curve;
use super::scale::LinearScale;
use super::series::{sample_series, Rgb, Series};
use super::ChartError;

/// Screen margins, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    /// Total horizontal inset (left + right).
    pub const fn hsum(&self) -> u32 { self.left + self.right }
    /// Total vertical inset (top + bottom).
    pub const fn vsum(&self) -> u32 { self.top + self.bottom }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(35, 20, 20, 20)
    }
}

/// Everything the renderer needs; the defaults reproduce the demo chart
#[derive(Clone, Debug)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub insets: Insets,
    /// Series colors by position; reused cyclically when there are more series
    pub colors: Vec<Rgb>,
    pub series: Vec<Series>,
    pub stroke_width: f64,
    pub marker_radius: f64,
    /// Series that gets point markers
    pub marker_series: Option<usize>,
    pub curve: Curve,
    pub axis_color: Rgb,
    pub grid_color: Rgb,
    pub background: Option<Rgb>,
    pub gridlines: bool,
    /// `id` attribute of the SVG root
    pub container_id: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 700,
            height: 400,
            insets: Insets::default(),
            colors: vec![Rgb::BLUE, Rgb::RED],
            series: sample_series(),
            stroke_width: 2.0,
            marker_radius: 5.0,
            marker_series: Some(1),
            curve: Curve::Linear,
            axis_color: Rgb::BLACK,
            grid_color: Rgb(221, 221, 221),
            background: None,
            gridlines: true,
            container_id: "container".to_string(),
        }
    }
}

impl ChartOptions {
    /// Builder method: replace the series
    pub fn with_series(mut self, series: Vec<Series>) -> Self {
        self.series = series;
        self
    }

    /// Color of the series at `index`
    pub fn color_for(&self, index: usize) -> Rgb {
        if self.colors.is_empty() {
            return Rgb::BLACK;
        }
        self.colors[index % self.colors.len()]
    }

    fn validate(&self) -> Result<(), ChartError> {
        if self.colors.is_empty() {
            return Err(ChartError::NoColors);
        }
        let id_ok = !self.container_id.is_empty()
            && self
                .container_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !id_ok {
            return Err(ChartError::InvalidContainerId(self.container_id.clone()));
        }
        if let Some(idx) = self.marker_series {
            if idx >= self.series.len() {
                return Err(ChartError::InvalidMarkerSeries(idx));
            }
        }
        Ok(())
    }
}

/// Drawable area and scales for one render
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartLayout {
    /// Top-left corner of the drawable area on the canvas
    pub origin: (f64, f64),
    pub plot_width: f64,
    pub plot_height: f64,
    /// Largest value over all series
    pub y_max: f64,
    /// Index -> horizontal offset inside the drawable area
    pub x_scale: LinearScale,
    /// Value -> vertical offset inside the drawable area
    pub y_scale: LinearScale,
    /// Tick count hint for the vertical gridlines, at most one per pixel
    pub x_tick_count: usize,
    /// Tick count hint for the horizontal gridlines, at most one per pixel
    pub y_tick_count: usize,
}

impl ChartLayout {
    /// Compute the drawable area, `y_max` and both scales.
    ///
    /// A collapsed domain (one point per series, or all-zero values) is
    /// widened to unit span so the chart keeps a visible extent.
    pub fn compute(opts: &ChartOptions) -> Result<Self, ChartError> {
        let first = opts.series.first().ok_or(ChartError::NoSeries)?;
        if first.is_empty() {
            return Err(ChartError::EmptySeries(first.name.clone()));
        }
        for s in &opts.series {
            if s.len() != first.len() {
                return Err(ChartError::MismatchedSeries {
                    name: s.name.clone(),
                    expected: first.len(),
                    found: s.len(),
                });
            }
        }

        if opts.insets.hsum() >= opts.width || opts.insets.vsum() >= opts.height {
            return Err(ChartError::CanvasTooSmall {
                width: opts.width,
                height: opts.height,
            });
        }
        opts.validate()?;

        let plot_width = (opts.width - opts.insets.hsum()) as f64;
        let plot_height = (opts.height - opts.insets.vsum()) as f64;

        let y_max = opts
            .series
            .iter()
            .filter_map(Series::max_value)
            .fold(f64::NEG_INFINITY, f64::max);
        let y_max = if y_max.is_finite() { y_max } else { 0.0 };

        let x_hi = (first.len() - 1) as f64;
        let x_domain = (0.0, if x_hi > 0.0 { x_hi } else { 1.0 });
        let y_domain = (0.0, if y_max > 0.0 { y_max } else { 1.0 });

        Ok(Self {
            origin: (opts.insets.left as f64, opts.insets.top as f64),
            plot_width,
            plot_height,
            y_max,
            x_scale: LinearScale::new(x_domain, (0.0, plot_width)),
            y_scale: LinearScale::new(y_domain, (plot_height, 0.0)),
            x_tick_count: first.len().min(plot_width as usize).max(1),
            y_tick_count: (y_max.ceil().min(plot_height) as usize).max(1),
        })
    }

    /// Canvas x for a domain index
    pub fn canvas_x(&self, x: f64) -> f64 {
        self.origin.0 + self.x_scale.scale(x)
    }

    /// Canvas y for a value
    pub fn canvas_y(&self, y: f64) -> f64 {
        self.origin.1 + self.y_scale.scale(y)
    }

    /// Canvas y of the drawable area's bottom edge
    pub fn bottom(&self) -> f64 {
        self.origin.1 + self.plot_height
    }

    /// Canvas x of the drawable area's right edge
    pub fn right(&self) -> f64 {
        self.origin.0 + self.plot_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_options() -> ChartOptions {
        ChartOptions::default().with_series(vec![
            Series::from_values("a", &[3.0, 1.0, 3.0]),
            Series::from_values("b", &[4.0, 3.0, 8.0]),
        ])
    }

    #[test]
    fn test_small_scenario_layout() {
        let layout = ChartLayout::compute(&small_options()).unwrap();

        assert_eq!(layout.y_max, 8.0);
        assert_eq!(layout.plot_width, 645.0);
        assert_eq!(layout.plot_height, 360.0);
        assert_eq!(layout.x_scale.domain(), (0.0, 2.0));
        assert_eq!(layout.x_scale.range(), (0.0, 645.0));
        assert_eq!(layout.y_scale.domain(), (0.0, 8.0));
        assert_eq!(layout.y_scale.range(), (360.0, 0.0));
        assert_eq!(layout.x_tick_count, 3);
        assert_eq!(layout.y_tick_count, 8);
    }

    #[test]
    fn test_default_layout() {
        let layout = ChartLayout::compute(&ChartOptions::default()).unwrap();
        assert_eq!(layout.y_max, 11.0);
        assert_eq!(layout.x_scale.domain(), (0.0, 12.0));
        assert_eq!(layout.canvas_x(0.0), 35.0);
        assert_eq!(layout.canvas_x(12.0), 680.0);
        assert_eq!(layout.canvas_y(0.0), 380.0);
        assert_eq!(layout.canvas_y(11.0), 20.0);
    }

    #[test]
    fn test_all_zero_values_widen_domain() {
        let opts = ChartOptions::default().with_series(vec![
            Series::from_values("a", &[0.0, 0.0]),
            Series::from_values("b", &[0.0, 0.0]),
        ]);
        let layout = ChartLayout::compute(&opts).unwrap();

        assert_eq!(layout.y_max, 0.0);
        assert_eq!(layout.y_scale.domain(), (0.0, 1.0));
        assert_eq!(layout.canvas_y(0.0), layout.bottom());
        assert_eq!(layout.y_tick_count, 1);
    }

    #[test]
    fn test_large_totals_cap_gridline_hint() {
        let opts = ChartOptions::default().with_series(vec![
            Series::from_values("a", &[0.0, 250_000.0]),
            Series::from_values("b", &[1.0, 2.0]),
        ]);
        let layout = ChartLayout::compute(&opts).unwrap();

        assert_eq!(layout.y_max, 250_000.0);
        assert_eq!(layout.y_tick_count, 360);
        assert_eq!(layout.x_tick_count, 2);
    }

    #[test]
    fn test_extreme_value_keeps_hint_finite() {
        let opts = ChartOptions::default().with_series(vec![
            Series::from_values("a", &[0.0, 1e300]),
            Series::from_values("b", &[1.0, 2.0]),
        ]);
        let layout = ChartLayout::compute(&opts).unwrap();
        assert_eq!(layout.y_tick_count, 360);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mismatched = ChartOptions::default().with_series(vec![
            Series::from_values("a", &[1.0, 2.0]),
            Series::from_values("b", &[1.0]),
        ]);
        assert!(matches!(
            ChartLayout::compute(&mismatched),
            Err(ChartError::MismatchedSeries { expected: 2, found: 1, .. })
        ));

        let none = ChartOptions::default().with_series(vec![]);
        assert!(matches!(ChartLayout::compute(&none), Err(ChartError::NoSeries)));

        let mut tiny = ChartOptions::default();
        tiny.width = 50;
        assert!(matches!(ChartLayout::compute(&tiny), Err(ChartError::CanvasTooSmall { .. })));

        let mut one_series = small_options();
        one_series.series.truncate(1);
        assert!(matches!(
            ChartLayout::compute(&one_series),
            Err(ChartError::InvalidMarkerSeries(1))
        ));

        let mut bad_id = ChartOptions::default();
        bad_id.container_id = "x\" onload=\"".to_string();
        assert!(matches!(
            ChartLayout::compute(&bad_id),
            Err(ChartError::InvalidContainerId(_))
        ));
    }

    #[test]
    fn test_color_cycles() {
        let opts = ChartOptions::default();
        assert_eq!(opts.color_for(0), Rgb::BLUE);
        assert_eq!(opts.color_for(1), Rgb::RED);
        assert_eq!(opts.color_for(2), Rgb::BLUE);
    }
}
