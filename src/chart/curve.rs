//! Curve interpolation through scaled points.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::scene::Point;

/// Samples per B-spline segment when flattening a `Basis` curve
const BASIS_SAMPLES: usize = 8;

/// How consecutive points are joined
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Curve {
    /// Straight segments through every point
    #[default]
    Linear,
    /// Uniform cubic B-spline, clamped to the first and last points
    Basis,
}

impl FromStr for Curve {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Curve::Linear),
            "basis" => Ok(Curve::Basis),
            other => Err(format!("unknown curve '{}' (expected linear or basis)", other)),
        }
    }
}

/// Polyline approximating the curve through `points`, in order
pub fn interpolate(points: &[Point], curve: Curve) -> Vec<Point> {
    match curve {
        Curve::Linear => points.to_vec(),
        Curve::Basis => basis(points, BASIS_SAMPLES),
    }
}

fn basis(points: &[Point], samples: usize) -> Vec<Point> {
    let (first, last) = match (points.first(), points.last()) {
        (Some(f), Some(l)) => (*f, *l),
        _ => return Vec::new(),
    };
    if points.len() == 1 {
        return vec![first];
    }

    // Tripled end points clamp the spline to the data's first and last point.
    let mut control = Vec::with_capacity(points.len() + 4);
    control.extend([first, first]);
    control.extend_from_slice(points);
    control.extend([last, last]);

    let windows = control.len() - 3;
    let mut out = Vec::with_capacity(windows * samples + 1);
    for (w, win) in control.windows(4).enumerate() {
        let steps = if w + 1 == windows { samples + 1 } else { samples };
        for s in 0..steps {
            let t = s as f64 / samples as f64;
            out.push(bspline(win[0], win[1], win[2], win[3], t));
        }
    }
    out
}

fn bspline(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let t2 = t * t;
    let t3 = t2 * t;
    let b0 = (1.0 - t).powi(3) / 6.0;
    let b1 = (3.0 * t3 - 6.0 * t2 + 4.0) / 6.0;
    let b2 = (-3.0 * t3 + 3.0 * t2 + 3.0 * t + 1.0) / 6.0;
    let b3 = t3 / 6.0;
    Point::new(
        b0 * p0.x + b1 * p1.x + b2 * p2.x + b3 * p3.x,
        b0 * p0.y + b1 * p1.y + b2 * p2.y + b3 * p3.y,
    )
}
