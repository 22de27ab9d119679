use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Wrap an angle in radians into [-π, π].
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    if angle <= 0.0 {
        ((angle - PI) % (2.0 * PI)) + PI
    } else {
        ((angle + PI) % (2.0 * PI)) - PI
    }
}

/// Spin-aware angle interpolation.
///
/// `spin == 0` holds `a`. A positive spin forces the angle to increase
/// from `a` to `b`, a negative one forces it to decrease; the sweep is
/// always less than one full turn.
pub fn tween_angle(a: f64, b: f64, t: f64, spin: i32) -> f64 {
    let delta = match spin.signum() {
        0 => return a,
        1 => (b - a).rem_euclid(2.0 * PI),
        _ => -(a - b).rem_euclid(2.0 * PI),
    };
    wrap_angle(a + delta * t)
}

/// Angle stored in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Angle {
    pub rad: f64,
}

impl Angle {
    #[inline]
    pub fn new(rad: f64) -> Self {
        Self { rad }
    }

    #[inline]
    pub fn from_deg(deg: f64) -> Self {
        Self {
            rad: deg.to_radians(),
        }
    }

    #[inline]
    pub fn deg(&self) -> f64 {
        self.rad.to_degrees()
    }

    #[inline]
    pub fn set_deg(&mut self, deg: f64) {
        self.rad = deg.to_radians();
    }

    #[inline]
    pub fn cos(&self) -> f64 {
        self.rad.cos()
    }

    #[inline]
    pub fn sin(&self) -> f64 {
        self.rad.sin()
    }

    /// Sum of two angles, wrapped.
    #[inline]
    pub fn add(self, other: Angle) -> Angle {
        Angle::new(wrap_angle(self.rad + other.rad))
    }

    #[inline]
    pub fn tween(self, other: Angle, pct: f64, spin: i32) -> Angle {
        Angle::new(tween_angle(self.rad, other.rad, pct, spin))
    }
}
