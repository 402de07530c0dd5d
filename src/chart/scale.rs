//! Linear scales and tick generation.
//!
//! Ticks follow the usual 1-2-5 "nice step" rule: the step is the power of
//! ten nearest to `span / count`, multiplied by 1, 2, 5 or 10.

/// Spans narrower than this are treated as a single point.
const EPSILON: f64 = 1e-12;

/// Largest tick count hint honoured; bigger hints are clamped.
pub const MAX_TICKS: usize = 10_000;

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Linear map from a data domain to a pixel range.
///
/// The range may be inverted (`r0 > r1`), which is how vertical scales put
/// larger values higher on the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// True when the domain has collapsed to a point
    pub fn is_degenerate(&self) -> bool {
        (self.domain.1 - self.domain.0).abs() < EPSILON
    }

    /// Map a domain value to the range. A collapsed domain maps everything
    /// to the middle of the range.
    #[inline]
    pub fn scale(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if self.is_degenerate() {
            return (r0 + r1) * 0.5;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Map a range value back to the domain
    #[inline]
    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (r1 - r0).abs() < EPSILON {
            return (d0 + d1) * 0.5;
        }
        d0 + (px - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Roughly `count` nicely rounded values inside the domain
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }

    /// Distance between consecutive ticks for `count`
    pub fn tick_step(&self, count: usize) -> f64 {
        let (lo, hi) = ordered(self.domain.0, self.domain.1);
        let inc = tick_increment(lo, hi, count);
        if inc < 0.0 {
            -1.0 / inc
        } else {
            inc
        }
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

/// Signed tick increment: positive values are the step itself, negative
/// values are `-1/step`, which keeps fractional steps exact.
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

/// Nicely rounded values covering `[start, stop]`, in the order given
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    let count = count.min(MAX_TICKS);
    if (stop - start).abs() < EPSILON && count > 0 {
        return vec![start];
    }

    let reverse = stop < start;
    let (lo, hi) = ordered(start, stop);

    let inc = tick_increment(lo, hi, count);
    if inc == 0.0 || !inc.is_finite() {
        return Vec::new();
    }

    let mut out: Vec<f64> = if inc > 0.0 {
        let mut r0 = (lo / inc).round();
        let mut r1 = (hi / inc).round();
        if r0 * inc < lo {
            r0 += 1.0;
        }
        if r1 * inc > hi {
            r1 -= 1.0;
        }
        range_inclusive(r0, r1).map(|i| i * inc).collect()
    } else {
        let inv = -inc;
        let mut r0 = (lo * inv).round();
        let mut r1 = (hi * inv).round();
        if r0 / inv < lo {
            r0 += 1.0;
        }
        if r1 / inv > hi {
            r1 -= 1.0;
        }
        range_inclusive(r0, r1).map(|i| i / inv).collect()
    };

    if reverse {
        out.reverse();
    }
    out
}

fn range_inclusive(r0: f64, r1: f64) -> impl Iterator<Item = f64> {
    let span = r1 - r0;
    let n = if span >= 0.0 && span < (2 * MAX_TICKS) as f64 {
        span as usize + 1
    } else {
        0
    };
    (0..n).map(move |i| r0 + i as f64)
}

/// Format a tick value with as many decimals as the step needs
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step.is_finite() {
        (-step.log10().floor()).max(0.0) as usize
    } else {
        0
    };
    let v = if value.abs() < EPSILON { 0.0 } else { value };
    format!("{:.*}", decimals, v)
}
