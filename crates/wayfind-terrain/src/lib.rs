//! Terrain oracles for wayfind grids.
//!
//! - [`TerrainMap`] reads walkability and region penalties from an ASCII
//!   [`TerrainLayout`] through a [`Legend`].
//! - [`ObstacleField`] tests sample discs against world [`Shape`]s and
//!   assigns penalties from [`PenaltyZone`]s.
//!
//! Both implement [`wayfind_paths::TerrainOracle`] and record a penalty on
//! blocked samples, so a blurred grid grows more expensive near obstacles.

pub mod layout;
pub mod map;
pub mod obstacles;
pub mod shape;

pub use layout::{LayoutError, TerrainLayout};
pub use map::{Legend, TerrainMap};
pub use obstacles::{ObstacleField, PenaltyZone};
pub use shape::Shape;
