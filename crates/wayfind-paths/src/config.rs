//! Grid build parameters.

use std::fmt;

use glam::{Vec2, Vec3};
use wayfind_core::{Point, WorldBounds, round_to_int};

/// Largest cell count a config may describe.
pub const MAX_CELLS: usize = 1 << 24;

/// Parameters for [`Grid::from_config`](crate::Grid::from_config).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// World-space centre of the grid.
    pub origin: Vec3,
    /// Extent on the ground plane: `x` spans world X, `y` spans world Z.
    pub world_size: Vec2,
    /// Half the side length of one cell.
    pub node_radius: f32,
    /// Box-blur radius applied to movement penalties after sampling.
    /// Zero leaves penalties as sampled.
    pub blur_radius: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            world_size: Vec2::new(10.0, 10.0),
            node_radius: 0.5,
            blur_radius: 0,
        }
    }
}

impl GridConfig {
    #[inline]
    pub fn node_diameter(&self) -> f32 {
        self.node_radius * 2.0
    }

    /// Number of cells on each axis: world size over node diameter,
    /// rounded to nearest.
    pub fn grid_size(&self) -> Point {
        let d = self.node_diameter();
        Point::new(
            round_to_int(self.world_size.x / d),
            round_to_int(self.world_size.y / d),
        )
    }

    #[inline]
    pub fn bounds(&self) -> WorldBounds {
        WorldBounds::new(self.origin, self.world_size)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.node_radius.is_finite() && self.node_radius > 0.0) {
            return Err(ConfigError::InvalidNodeRadius(self.node_radius));
        }
        if !(self.world_size.is_finite() && self.world_size.x > 0.0 && self.world_size.y > 0.0) {
            return Err(ConfigError::InvalidWorldSize(self.world_size));
        }
        if !self.origin.is_finite() {
            return Err(ConfigError::InvalidOrigin(self.origin));
        }
        let size = self.grid_size();
        if size.x < 1 || size.y < 1 {
            return Err(ConfigError::EmptyGrid { size });
        }
        if size.x as u64 * size.y as u64 > MAX_CELLS as u64 {
            return Err(ConfigError::TooManyCells { size });
        }
        Ok(())
    }
}

/// Reasons a [`GridConfig`] cannot produce a grid.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidNodeRadius(f32),
    InvalidWorldSize(Vec2),
    InvalidOrigin(Vec3),
    /// The world is smaller than one cell on some axis.
    EmptyGrid { size: Point },
    /// The world holds more than [`MAX_CELLS`] cells.
    TooManyCells { size: Point },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNodeRadius(r) => {
                write!(f, "grid config: node radius must be positive and finite, got {r}")
            }
            Self::InvalidWorldSize(s) => {
                write!(f, "grid config: world size must be positive and finite, got {s}")
            }
            Self::InvalidOrigin(o) => write!(f, "grid config: origin must be finite, got {o}"),
            Self::EmptyGrid { size } => {
                write!(f, "grid config: world rounds to an empty {}x{} grid", size.x, size.y)
            }
            Self::TooManyCells { size } => write!(
                f,
                "grid config: {}x{} grid exceeds the {MAX_CELLS} cell limit",
                size.x, size.y
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
