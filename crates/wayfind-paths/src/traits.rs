use glam::Vec3;

/// Largest movement penalty a grid stores. Oracle penalties are clamped
/// to `0..=MAX_PENALTY` when the grid is built.
pub const MAX_PENALTY: i32 = 1_000_000;

/// What a terrain oracle reports for one cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainSample {
    pub walkable: bool,
    /// Additive cost of entering the cell. Grids clamp it to
    /// `0..=`[`MAX_PENALTY`].
    pub penalty: i32,
}

impl TerrainSample {
    /// Walkable terrain with the given movement penalty.
    #[inline]
    pub const fn open(penalty: i32) -> Self {
        Self {
            walkable: true,
            penalty,
        }
    }

    /// Unwalkable terrain. The penalty still feeds penalty smoothing.
    #[inline]
    pub const fn blocked(penalty: i32) -> Self {
        Self {
            walkable: false,
            penalty,
        }
    }
}

/// Judges the traversability of a world-space disc.
///
/// [`Grid`](crate::Grid) queries the oracle once per cell during a build,
/// with the cell centre and the node radius.
pub trait TerrainOracle {
    fn sample(&self, world_point: Vec3, radius: f32) -> TerrainSample;
}

impl<F> TerrainOracle for F
where
    F: Fn(Vec3, f32) -> TerrainSample,
{
    #[inline]
    fn sample(&self, world_point: Vec3, radius: f32) -> TerrainSample {
        self(world_point, radius)
    }
}
