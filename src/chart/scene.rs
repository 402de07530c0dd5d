//! Display list for one chart render.
//!
//! [`build_scene`] turns options into canvas-space primitives: series
//! paths, point markers, both axes and the gridlines. Drawing backends only
//! walk the list.

use super::curve::interpolate;
use super::layout::{ChartLayout, ChartOptions};
use super::scale::format_tick;
use super::series::Rgb;
use super::ChartError;

/// Outer tick length of an axis, in pixels
const TICK_SIZE: f64 = 6.0;
/// Gap between a tick's end and its label
const TICK_PADDING: f64 = 3.0;
/// Tick count hint for labelled axes
const AXIS_TICKS: usize = 10;
const LABEL_SIZE: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineRole {
    /// Axis domain line
    Axis,
    /// Tick mark on an axis
    Tick,
    /// Unlabeled reference line across the drawable area
    Gridline,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// Centered horizontally, hanging below the point
    TopCenter,
    /// Right-aligned, vertically centered on the point
    MiddleRight,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// Unfilled polyline for one series
    Path {
        series: usize,
        points: Vec<Point>,
        stroke: Rgb,
        stroke_width: f64,
    },
    /// Filled circle at a data point
    Marker {
        series: usize,
        center: Point,
        radius: f64,
        fill: Rgb,
        stroke: Rgb,
    },
    Line {
        role: LineRole,
        from: Point,
        to: Point,
        stroke: Rgb,
    },
    Label {
        text: String,
        at: Point,
        anchor: Anchor,
        size: f64,
        color: Rgb,
    },
}

/// Primitives plus the canvas they belong to
#[derive(Clone, Debug)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub container_id: String,
    pub background: Option<Rgb>,
    pub layout: ChartLayout,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn paths(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Path { .. }))
    }

    pub fn markers(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Marker { .. }))
    }

    pub fn lines(&self, role: LineRole) -> impl Iterator<Item = &Primitive> + '_ {
        self.primitives
            .iter()
            .filter(move |p| matches!(p, Primitive::Line { role: r, .. } if *r == role))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Label { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Lay out the chart and emit its primitives in drawing order:
/// paths, markers, bottom axis, left axis, vertical then horizontal
/// gridlines.
pub fn build_scene(opts: &ChartOptions) -> Result<Scene, ChartError> {
    let layout = ChartLayout::compute(opts)?;
    let mut primitives = Vec::new();

    for (idx, series) in opts.series.iter().enumerate() {
        let scaled: Vec<Point> = series
            .points
            .iter()
            .map(|&(x, y)| Point::new(layout.canvas_x(x), layout.canvas_y(y)))
            .collect();
        primitives.push(Primitive::Path {
            series: idx,
            points: interpolate(&scaled, opts.curve),
            stroke: opts.color_for(idx),
            stroke_width: opts.stroke_width,
        });
    }

    if let Some(idx) = opts.marker_series {
        let color = opts.color_for(idx);
        for &(x, y) in &opts.series[idx].points {
            primitives.push(Primitive::Marker {
                series: idx,
                center: Point::new(layout.canvas_x(x), layout.canvas_y(y)),
                radius: opts.marker_radius,
                fill: color,
                stroke: color,
            });
        }
    }

    bottom_axis(&layout, opts.axis_color, &mut primitives);
    left_axis(&layout, opts.axis_color, &mut primitives);

    if opts.gridlines {
        gridlines(&layout, opts.grid_color, &mut primitives);
    }

    tracing::debug!(
        primitives = primitives.len(),
        y_max = layout.y_max,
        "Built chart scene"
    );

    Ok(Scene {
        width: opts.width,
        height: opts.height,
        container_id: opts.container_id.clone(),
        background: opts.background,
        layout,
        primitives,
    })
}

fn line(role: LineRole, from: Point, to: Point, stroke: Rgb) -> Primitive {
    Primitive::Line { role, from, to, stroke }
}

fn bottom_axis(layout: &ChartLayout, color: Rgb, out: &mut Vec<Primitive>) {
    let y = layout.bottom();
    let (x0, x1) = (layout.origin.0, layout.right());

    out.push(line(LineRole::Axis, Point::new(x0, y + TICK_SIZE), Point::new(x0, y), color));
    out.push(line(LineRole::Axis, Point::new(x0, y), Point::new(x1, y), color));
    out.push(line(LineRole::Axis, Point::new(x1, y), Point::new(x1, y + TICK_SIZE), color));

    let step = layout.x_scale.tick_step(AXIS_TICKS);
    for v in layout.x_scale.ticks(AXIS_TICKS) {
        let x = layout.canvas_x(v);
        out.push(line(LineRole::Tick, Point::new(x, y), Point::new(x, y + TICK_SIZE), color));
        out.push(Primitive::Label {
            text: format_tick(v, step),
            at: Point::new(x, y + TICK_SIZE + TICK_PADDING),
            anchor: Anchor::TopCenter,
            size: LABEL_SIZE,
            color,
        });
    }
}

fn left_axis(layout: &ChartLayout, color: Rgb, out: &mut Vec<Primitive>) {
    let x = layout.origin.0;
    let (y0, y1) = (layout.bottom(), layout.origin.1);

    out.push(line(LineRole::Axis, Point::new(x - TICK_SIZE, y0), Point::new(x, y0), color));
    out.push(line(LineRole::Axis, Point::new(x, y0), Point::new(x, y1), color));
    out.push(line(LineRole::Axis, Point::new(x, y1), Point::new(x - TICK_SIZE, y1), color));

    let step = layout.y_scale.tick_step(AXIS_TICKS);
    for v in layout.y_scale.ticks(AXIS_TICKS) {
        let y = layout.canvas_y(v);
        out.push(line(LineRole::Tick, Point::new(x - TICK_SIZE, y), Point::new(x, y), color));
        out.push(Primitive::Label {
            text: format_tick(v, step),
            at: Point::new(x - TICK_SIZE - TICK_PADDING, y),
            anchor: Anchor::MiddleRight,
            size: LABEL_SIZE,
            color,
        });
    }
}

fn gridlines(layout: &ChartLayout, color: Rgb, out: &mut Vec<Primitive>) {
    let (top, bottom) = (layout.origin.1, layout.bottom());
    let (left, right) = (layout.origin.0, layout.right());

    for v in layout.x_scale.ticks(layout.x_tick_count) {
        let x = layout.canvas_x(v);
        out.push(line(LineRole::Gridline, Point::new(x, top), Point::new(x, bottom), color));
    }
    for v in layout.y_scale.ticks(layout.y_tick_count) {
        let y = layout.canvas_y(v);
        out.push(line(LineRole::Gridline, Point::new(left, y), Point::new(right, y), color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::curve::Curve;
    use crate::chart::series::Series;

    fn small_options() -> ChartOptions {
        ChartOptions::default().with_series(vec![
            Series::from_values("a", &[3.0, 1.0, 3.0]),
            Series::from_values("b", &[4.0, 3.0, 8.0]),
        ])
    }

    #[test]
    fn test_markers_for_second_series_only() {
        let scene = build_scene(&small_options()).unwrap();

        let markers: Vec<_> = scene.markers().collect();
        assert_eq!(markers.len(), 3);
        for m in markers {
            match m {
                Primitive::Marker { series, fill, stroke, radius, .. } => {
                    assert_eq!(*series, 1);
                    assert_eq!(*fill, Rgb::RED);
                    assert_eq!(*stroke, Rgb::RED);
                    assert_eq!(*radius, 5.0);
                }
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn test_paths_follow_scaled_points() {
        let scene = build_scene(&small_options()).unwrap();
        let paths: Vec<_> = scene.paths().collect();
        assert_eq!(paths.len(), 2);

        match paths[1] {
            Primitive::Path { points, stroke, stroke_width, .. } => {
                assert_eq!(*stroke, Rgb::RED);
                assert_eq!(*stroke_width, 2.0);
                // (2, 8) is the top right corner of the drawable area
                assert_eq!(points[2], Point::new(680.0, 20.0));
                // (0, 4) sits half way down at the left edge
                assert_eq!(points[0], Point::new(35.0, 200.0));
            }
            _ => unreachable!(),
        }
        match paths[0] {
            Primitive::Path { stroke, .. } => assert_eq!(*stroke, Rgb::BLUE),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_gridlines_span_drawable_area() {
        let scene = build_scene(&small_options()).unwrap();
        let grid: Vec<_> = scene.lines(LineRole::Gridline).collect();

        // x: ticks(0..2, 3) -> 0, 0.5, 1, 1.5, 2; y: ticks(0..8, 8) -> 0..=8
        assert_eq!(grid.len(), 5 + 9);

        for g in &grid {
            if let Primitive::Line { from, to, .. } = g {
                let vertical = from.x == to.x;
                if vertical {
                    assert_eq!((from.y, to.y), (20.0, 380.0));
                } else {
                    assert_eq!((from.x, to.x), (35.0, 680.0));
                }
            }
        }
    }

    #[test]
    fn test_default_chart_counts() {
        let scene = build_scene(&ChartOptions::default()).unwrap();

        assert_eq!(scene.markers().count(), 13);
        // 13 vertical gridlines, 12 horizontal (0..=11)
        assert_eq!(scene.lines(LineRole::Gridline).count(), 13 + 12);
        assert_eq!(scene.lines(LineRole::Axis).count(), 6);
        assert!(scene.labels().any(|l| l == "12"));
        assert!(scene.labels().any(|l| l == "10"));
    }

    #[test]
    fn test_axis_labels_follow_step() {
        let scene = build_scene(&small_options()).unwrap();
        let labels: Vec<&str> = scene.labels().collect();
        // bottom axis: ticks(0..2, 10) step 0.2
        assert!(labels.contains(&"0.2"));
        assert!(labels.contains(&"2.0"));
        // left axis: ticks(0..8, 10) step 1
        assert!(labels.contains(&"8"));
    }

    #[test]
    fn test_no_markers_and_no_grid() {
        let mut opts = small_options();
        opts.marker_series = None;
        opts.gridlines = false;
        let scene = build_scene(&opts).unwrap();

        assert_eq!(scene.markers().count(), 0);
        assert_eq!(scene.lines(LineRole::Gridline).count(), 0);
    }

    #[test]
    fn test_basis_curve_keeps_endpoints() {
        let mut opts = small_options();
        opts.curve = Curve::Basis;
        let scene = build_scene(&opts).unwrap();

        match scene.paths().next().unwrap() {
            Primitive::Path { points, .. } => {
                assert!(points.len() > 3);
                assert!((points[0].x - 35.0).abs() < 1e-9);
                assert!((points.last().unwrap().x - 680.0).abs() < 1e-9);
            }
            _ => unreachable!(),
        };
    }

    #[test]
    fn test_all_zero_values_still_render() {
        let opts = ChartOptions::default().with_series(vec![
            Series::from_values("a", &[0.0, 0.0, 0.0]),
            Series::from_values("b", &[0.0, 0.0, 0.0]),
        ]);
        let scene = build_scene(&opts).unwrap();

        // baseline and top line
        let horizontal = scene
            .lines(LineRole::Gridline)
            .filter(|p| matches!(p, Primitive::Line { from, to, .. } if from.y == to.y))
            .count();
        assert_eq!(horizontal, 2);
        assert_eq!(scene.markers().count(), 3);
    }

    #[test]
    fn test_large_totals_keep_gridlines_bounded() {
        let opts = ChartOptions::default().with_series(vec![
            Series::from_values("a", &[0.0, 250_000.0]),
            Series::from_values("b", &[1.0, 2.0]),
        ]);
        let scene = build_scene(&opts).unwrap();

        // ticks(0..250000, 360) steps by 500
        let horizontal = scene
            .lines(LineRole::Gridline)
            .filter(|p| matches!(p, Primitive::Line { from, to, .. } if from.y == to.y))
            .count();
        assert_eq!(horizontal, 501);
        assert!(scene.primitives.len() < 1_000);
    }

    #[test]
    fn test_extreme_values_build_without_panic() {
        let opts = ChartOptions::default().with_series(vec![
            Series::from_values("a", &[0.0, 1e300]),
            Series::from_values("b", &[1.0, 2.0]),
        ]);
        let scene = build_scene(&opts).unwrap();

        assert!(scene.lines(LineRole::Gridline).count() <= 2 + 2 * 360);
        assert_eq!(scene.markers().count(), 2);
    }
}
