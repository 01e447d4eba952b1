//! Shapes on the ground plane.
//!
//! Coordinates are world X and Z packed into a [`Vec2`].

use glam::{Vec2, Vec3};

/// A closed region of the ground plane.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    Rect { min: Vec2, max: Vec2 },
}

impl Shape {
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Self::Circle {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Axis-aligned rectangle spanning two opposite corners.
    pub fn rect(a: Vec2, b: Vec2) -> Self {
        Self::Rect {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Whether `p` lies inside or on the boundary.
    pub fn contains(&self, p: Vec2) -> bool {
        self.distance(p) <= 0.0
    }

    /// Distance from `p` to the shape, zero inside.
    pub fn distance(&self, p: Vec2) -> f32 {
        match *self {
            Self::Circle { center, radius } => (p.distance(center) - radius).max(0.0),
            Self::Rect { min, max } => {
                let d = (min - p).max(p - max).max(Vec2::ZERO);
                d.length()
            }
        }
    }

    /// Whether the shape and the open disc around `center` share area.
    /// Touching at the rim does not count, so the discs of neighbouring
    /// cells never reach into each other's obstacles.
    pub fn overlaps_disc(&self, center: Vec2, radius: f32) -> bool {
        self.contains(center) || self.distance(center) < radius
    }
}

/// Project a world position onto the ground plane.
#[inline]
pub fn ground(p: Vec3) -> Vec2 {
    Vec2::new(p.x, p.z)
}
