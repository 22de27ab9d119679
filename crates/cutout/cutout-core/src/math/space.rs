use serde::{Deserialize, Serialize};

use super::angle::{tween_angle, wrap_angle, Angle};
use super::tween;

/// 2D vector used for positions, scales and pivots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise compare within `epsilon`.
    pub fn equal(a: &Vector, b: &Vector, epsilon: f64) -> bool {
        (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon
    }

    #[inline]
    pub fn add(self, other: Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y)
    }

    #[inline]
    pub fn tween(self, other: Vector, pct: f64) -> Vector {
        Vector::new(tween(self.x, other.x, pct), tween(self.y, other.y, pct))
    }
}

#[inline]
fn rotate(x: f64, y: f64, rad: f64) -> (f64, f64) {
    let (s, c) = rad.sin_cos();
    (c * x - s * y, s * x + c * y)
}

/// Affine 2D transform: position, rotation and non-uniform scale.
///
/// Composition order is scale, then rotate, then translate. A space whose
/// scale has a negative determinant is mirrored, which flips the sense in
/// which child rotations accumulate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub position: Vector,
    pub rotation: Angle,
    pub scale: Vector,
}

impl Default for Space {
    fn default() -> Self {
        Self::identity()
    }
}

impl Space {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            position: Vector::new(0.0, 0.0),
            rotation: Angle { rad: 0.0 },
            scale: Vector::new(1.0, 1.0),
        }
    }

    #[inline]
    fn is_mirrored(&self) -> bool {
        self.scale.x * self.scale.y < 0.0
    }

    /// Field-wise compare within `epsilon`.
    pub fn equal(a: &Space, b: &Space, epsilon: f64) -> bool {
        Vector::equal(&a.position, &b.position, epsilon)
            && (a.rotation.rad - b.rotation.rad).abs() <= epsilon
            && Vector::equal(&a.scale, &b.scale, epsilon)
    }

    /// Move by `(x, y)` expressed in this space's own axes.
    pub fn translate(&mut self, x: f64, y: f64) -> &mut Self {
        let (tx, ty) = rotate(x * self.scale.x, y * self.scale.y, self.rotation.rad);
        self.position.x += tx;
        self.position.y += ty;
        self
    }

    pub fn rotate(&mut self, rad: f64) -> &mut Self {
        self.rotation.rad = wrap_angle(self.rotation.rad + rad);
        self
    }

    pub fn scale_by(&mut self, x: f64, y: f64) -> &mut Self {
        self.scale.x *= x;
        self.scale.y *= y;
        self
    }

    /// Inverse transform, so that transforming by `space` then by the
    /// result maps a point back onto itself (for unmirrored spaces).
    pub fn invert(space: &Space) -> Space {
        let inv_scale = Vector::new(1.0 / space.scale.x, 1.0 / space.scale.y);
        let inv_rotation = -space.rotation.rad;
        let (tx, ty) = rotate(-space.position.x, -space.position.y, inv_rotation);
        Space {
            position: Vector::new(tx * inv_scale.x, ty * inv_scale.y),
            rotation: Angle::new(inv_rotation),
            scale: inv_scale,
        }
    }

    /// World space of `local` attached under `parent`.
    pub fn combine(parent: &Space, local: &Space) -> Space {
        let (tx, ty) = rotate(
            local.position.x * parent.scale.x,
            local.position.y * parent.scale.y,
            parent.rotation.rad,
        );
        let rad = if parent.is_mirrored() {
            wrap_angle(parent.rotation.rad - local.rotation.rad)
        } else {
            wrap_angle(local.rotation.rad + parent.rotation.rad)
        };
        Space {
            position: Vector::new(tx + parent.position.x, ty + parent.position.y),
            rotation: Angle::new(rad),
            scale: Vector::new(
                local.scale.x * parent.scale.x,
                local.scale.y * parent.scale.y,
            ),
        }
    }

    /// Inverse of [`Space::combine`]: recover the local space of `world`
    /// relative to `parent`.
    pub fn extract(world: &Space, parent: &Space) -> Space {
        let rad = if parent.is_mirrored() {
            wrap_angle(parent.rotation.rad - world.rotation.rad)
        } else {
            wrap_angle(world.rotation.rad - parent.rotation.rad)
        };
        let (tx, ty) = rotate(
            world.position.x - parent.position.x,
            world.position.y - parent.position.y,
            -parent.rotation.rad,
        );
        Space {
            position: Vector::new(tx / parent.scale.x, ty / parent.scale.y),
            rotation: Angle::new(rad),
            scale: Vector::new(
                world.scale.x / parent.scale.x,
                world.scale.y / parent.scale.y,
            ),
        }
    }

    /// Map a point from this space into its parent.
    pub fn transform(space: &Space, v: &Vector) -> Vector {
        let (tx, ty) = rotate(v.x * space.scale.x, v.y * space.scale.y, space.rotation.rad);
        Vector::new(tx + space.position.x, ty + space.position.y)
    }

    /// Map a parent-space point into this space.
    pub fn untransform(space: &Space, v: &Vector) -> Vector {
        let (tx, ty) = rotate(
            v.x - space.position.x,
            v.y - space.position.y,
            -space.rotation.rad,
        );
        Vector::new(tx / space.scale.x, ty / space.scale.y)
    }

    /// Component-wise tween; rotation follows `spin`.
    pub fn tween(a: &Space, b: &Space, pct: f64, spin: i32) -> Space {
        Space {
            position: a.position.tween(b.position, pct),
            rotation: Angle::new(tween_angle(a.rotation.rad, b.rotation.rad, pct, spin)),
            scale: a.scale.tween(b.scale, pct),
        }
    }
}
