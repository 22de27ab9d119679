//! 2D math primitives: scalar helpers, wrap-aware angles, vectors and
//! affine spaces.

mod angle;
mod space;

pub use angle::{tween_angle, wrap_angle, Angle};
pub use space::{Space, Vector};

/// Linear interpolation of scalars.
#[inline]
pub fn tween(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Wrap `num` into `[min, max)`.
///
/// Values below `min` wrap down from `max`. A degenerate range collapses
/// to `min`, an inverted one leaves `num` untouched.
pub fn wrap(num: f64, min: f64, max: f64) -> f64 {
    if min < max {
        if num < min {
            let under = (min - num) % (max - min);
            if under == 0.0 {
                min
            } else {
                max - under
            }
        } else {
            min + ((num - min) % (max - min))
        }
    } else if min == max {
        min
    } else {
        num
    }
}
