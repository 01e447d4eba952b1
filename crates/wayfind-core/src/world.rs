//! World-space bounds on the X/Z ground plane.
//!
//! World coordinates are floating point; the vertical axis is Y and is
//! carried through untouched. A grid cell `(x, y)` lies at world `(X, Z)`.

use glam::{Vec2, Vec3};

/// Round to the nearest integer, ties to even.
///
/// Every float-to-index conversion in the workspace goes through this
/// function so that grid sizing and coordinate mapping agree at cell
/// boundaries.
#[inline]
pub fn round_to_int(v: f32) -> i32 {
    v.round_ties_even() as i32
}

/// A rectangle on the ground plane, centred on `origin`.
///
/// `size.x` spans world X and `size.y` spans world Z.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldBounds {
    pub origin: Vec3,
    pub size: Vec2,
}

impl WorldBounds {
    #[inline]
    pub const fn new(origin: Vec3, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// The world-space corner with the smallest X and Z.
    #[inline]
    pub fn bottom_left(&self) -> Vec3 {
        self.origin - Vec3::new(self.size.x / 2.0, 0.0, self.size.y / 2.0)
    }

    /// Position of `p` relative to the bounds, as a fraction of the size on
    /// each axis. Points outside the bounds clamp to `[0, 1]`.
    #[inline]
    pub fn normalize(&self, p: Vec3) -> Vec2 {
        let rel = p - self.origin;
        let fx = (rel.x + self.size.x / 2.0) / self.size.x;
        let fz = (rel.z + self.size.y / 2.0) / self.size.y;
        Vec2::new(fx.clamp(0.0, 1.0), fz.clamp(0.0, 1.0))
    }

    /// Whether `p` projects inside the bounds (edges inclusive).
    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        let bl = self.bottom_left();
        p.x >= bl.x && p.x <= bl.x + self.size.x && p.z >= bl.z && p.z <= bl.z + self.size.y
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            size: Vec2::new(10.0, 10.0),
        }
    }
}
