//! Keyframe easing curves.
//!
//! - instant: holds the left keyframe (always 0)
//! - linear
//! - quadratic..quintic: repeated linear interpolation through 1-4 control
//!   scalars with endpoints pinned at 0 and 1
//! - bezier: CSS-style cubic-bezier timing (x1, y1, x2, y2)

use serde::{Deserialize, Serialize};

use crate::json::{load_float, load_string};
use crate::math::tween;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveType {
    Instant,
    #[default]
    Linear,
    Quadratic,
    Cubic,
    Quartic,
    Quintic,
    Bezier,
}

impl CurveType {
    /// Parse a `curve_type` name. Unknown names hold like `instant`.
    pub fn parse(name: &str) -> CurveType {
        match name {
            "instant" => CurveType::Instant,
            "linear" => CurveType::Linear,
            "quadratic" => CurveType::Quadratic,
            "cubic" => CurveType::Cubic,
            "quartic" => CurveType::Quartic,
            "quintic" => CurveType::Quintic,
            "bezier" => CurveType::Bezier,
            other => {
                log::warn!("unknown curve_type '{other}', holding keyframe values");
                CurveType::Instant
            }
        }
    }
}

/// Easing curve attached to a keyframe; shapes the progress towards the
/// next keyframe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub kind: CurveType,
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub c4: f64,
}

impl Curve {
    pub fn load(json: &serde_json::Value) -> Curve {
        Curve {
            kind: CurveType::parse(&load_string(json, "curve_type", "linear")),
            c1: load_float(json, "c1", 0.0),
            c2: load_float(json, "c2", 0.0),
            c3: load_float(json, "c3", 0.0),
            c4: load_float(json, "c4", 0.0),
        }
    }

    /// Map normalized progress `t` in [0,1] to eased progress.
    pub fn evaluate(&self, t: f64) -> f64 {
        match self.kind {
            CurveType::Instant => 0.0,
            CurveType::Linear => t,
            CurveType::Quadratic => quadratic(0.0, self.c1, 1.0, t),
            CurveType::Cubic => cubic(0.0, self.c1, self.c2, 1.0, t),
            CurveType::Quartic => quartic(0.0, self.c1, self.c2, self.c3, 1.0, t),
            CurveType::Quintic => quintic(0.0, self.c1, self.c2, self.c3, self.c4, 1.0, t),
            CurveType::Bezier => bezier(self.c1, self.c2, self.c3, self.c4, t),
        }
    }
}

#[inline]
fn quadratic(a: f64, b: f64, c: f64, t: f64) -> f64 {
    tween(tween(a, b, t), tween(b, c, t), t)
}

#[inline]
fn cubic(a: f64, b: f64, c: f64, d: f64, t: f64) -> f64 {
    tween(quadratic(a, b, c, t), quadratic(b, c, d, t), t)
}

#[inline]
fn quartic(a: f64, b: f64, c: f64, d: f64, e: f64, t: f64) -> f64 {
    tween(cubic(a, b, c, d, t), cubic(b, c, d, e, t), t)
}

#[inline]
fn quintic(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64, t: f64) -> f64 {
    tween(quartic(a, b, c, d, e, t), quartic(b, c, d, e, f, t), t)
}

/// Polynomial coefficients of one bezier axis with endpoints 0 and 1.
#[derive(Clone, Copy)]
struct Axis {
    a: f64,
    b: f64,
    c: f64,
}

impl Axis {
    fn new(p1: f64, p2: f64) -> Self {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        Self { a, b, c }
    }

    #[inline]
    fn sample(&self, t: f64) -> f64 {
        ((self.a * t + self.b) * t + self.c) * t
    }

    #[inline]
    fn derivative(&self, t: f64) -> f64 {
        (3.0 * self.a * t + 2.0 * self.b) * t + self.c
    }

    /// Curve parameter whose sample equals `x`.
    fn solve(&self, x: f64, epsilon: f64) -> f64 {
        // Newton's method first, normally converges in a few steps
        let mut t2 = x;
        for _ in 0..8 {
            let x2 = self.sample(t2) - x;
            if x2.abs() < epsilon {
                return t2;
            }
            let d2 = self.derivative(t2);
            if d2.abs() < epsilon {
                break;
            }
            t2 -= x2 / d2;
        }

        // Bisection fallback
        let mut t0 = 0.0;
        let mut t1 = 1.0;
        t2 = x;
        if t2 < t0 {
            return t0;
        }
        if t2 > t1 {
            return t1;
        }
        while t0 < t1 {
            let x2 = self.sample(t2);
            if (x2 - x).abs() < epsilon {
                return t2;
            }
            if x > x2 {
                t0 = t2;
            } else {
                t1 = t2;
            }
            let next = (t1 - t0) * 0.5 + t0;
            if next == t2 {
                break;
            }
            t2 = next;
        }
        t2
    }
}

/// Solve precision for a unit-duration curve.
const BEZIER_EPSILON: f64 = 1.0 / 200.0;

fn bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    let x_axis = Axis::new(x1, x2);
    let y_axis = Axis::new(y1, y2);
    y_axis.sample(x_axis.solve(t, BEZIER_EPSILON))
}
