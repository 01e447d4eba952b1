//! Layout-driven terrain.

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};
use wayfind_core::{Point, WorldBounds};
use wayfind_paths::{GridConfig, TerrainOracle, TerrainSample};

use crate::layout::{LayoutError, TerrainLayout};
use crate::shape::{Shape, ground};

/// How layout characters translate into terrain.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Legend {
    /// Characters that block movement.
    pub blocked: String,
    /// Walkable characters and their movement penalty.
    pub regions: BTreeMap<char, i32>,
    /// Penalty recorded on blocked cells. Smoothing spreads it to the
    /// walkable cells around them.
    pub obstacle_penalty: i32,
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            blocked: "#".into(),
            regions: BTreeMap::from([('.', 0), (':', 5), ('~', 20)]),
            obstacle_penalty: 10,
        }
    }
}

impl Legend {
    #[inline]
    pub fn is_blocked(&self, ch: char) -> bool {
        self.blocked.contains(ch)
    }

    /// Every character the legend knows about.
    pub fn runes(&self) -> String {
        self.blocked.chars().chain(self.regions.keys().copied()).collect()
    }

    fn sample(&self, ch: char) -> TerrainSample {
        if self.is_blocked(ch) {
            TerrainSample::blocked(self.obstacle_penalty)
        } else {
            TerrainSample::open(self.regions.get(&ch).copied().unwrap_or(0))
        }
    }
}

/// A [`TerrainOracle`] backed by a [`TerrainLayout`].
///
/// The layout is laid on the ground plane centred on `origin`, one layout
/// character per `cell_size` square. A sample is blocked when its disc
/// overlaps any blocked square; otherwise it takes the region penalty of
/// the square under its centre. Samples past the layout edge read the
/// nearest edge square.
#[derive(Clone, Debug)]
pub struct TerrainMap {
    layout: TerrainLayout,
    legend: Legend,
    bounds: WorldBounds,
    cell_size: f32,
}

impl TerrainMap {
    /// Place `layout` in the world. Fails if the layout uses a character
    /// the legend does not define.
    pub fn new(
        layout: TerrainLayout,
        legend: Legend,
        origin: Vec3,
        cell_size: f32,
    ) -> Result<Self, LayoutError> {
        let runes = legend.runes();
        let size = layout.size();
        if let Some((p, ch)) = layout.cells().find(|&(_, ch)| !runes.contains(ch)) {
            return Err(LayoutError::InvalidRune {
                ch,
                line: (size.y - 1 - p.y) as usize,
                column: p.x as usize,
            });
        }
        let world_size = Vec2::new(size.x as f32, size.y as f32) * cell_size;
        log::debug!(
            "placed {}x{} layout at {origin} with {cell_size} squares, blocked {:?}, {} regions",
            size.x,
            size.y,
            legend.blocked,
            legend.regions.len()
        );
        Ok(Self {
            layout,
            legend,
            bounds: WorldBounds::new(origin, world_size),
            cell_size,
        })
    }

    /// Parse `text` with `legend` and centre it on the world origin with
    /// unit squares.
    pub fn from_text(text: &str, legend: Legend) -> Result<Self, LayoutError> {
        let layout = TerrainLayout::parse_with_runes(text, &legend.runes())?;
        Self::new(layout, legend, Vec3::ZERO, 1.0)
    }

    #[inline]
    pub fn layout(&self) -> &TerrainLayout {
        &self.layout
    }

    #[inline]
    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    #[inline]
    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    /// A grid config with one grid cell per layout square.
    pub fn grid_config(&self, blur_radius: usize) -> GridConfig {
        GridConfig {
            origin: self.bounds.origin,
            world_size: self.bounds.size,
            node_radius: self.cell_size / 2.0,
            blur_radius,
        }
    }

    /// World-space centre of layout square `p`.
    pub fn square_center(&self, p: Point) -> Vec3 {
        self.bounds.bottom_left()
            + Vec3::new(
                (p.x as f32 + 0.5) * self.cell_size,
                0.0,
                (p.y as f32 + 0.5) * self.cell_size,
            )
    }

    fn square_shape(&self, p: Point) -> Shape {
        let bl = ground(self.bounds.bottom_left());
        let min = bl + Vec2::new(p.x as f32, p.y as f32) * self.cell_size;
        Shape::rect(min, min + Vec2::splat(self.cell_size))
    }

    /// Layout square under a ground-plane position, unclamped.
    fn square_at(&self, g: Vec2) -> Point {
        let local = (g - ground(self.bounds.bottom_left())) / self.cell_size;
        Point::new(local.x.floor() as i32, local.y.floor() as i32)
    }
}

impl TerrainOracle for TerrainMap {
    fn sample(&self, world_point: Vec3, radius: f32) -> TerrainSample {
        let range = self.layout.range();
        let center = ground(world_point);

        let lo = range.clamp(self.square_at(center - Vec2::splat(radius)));
        let hi = range.clamp(self.square_at(center + Vec2::splat(radius)));
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                let p = Point::new(x, y);
                let blocked = self.layout.get(p).is_some_and(|ch| self.legend.is_blocked(ch));
                if blocked && self.square_shape(p).overlaps_disc(center, radius) {
                    return TerrainSample::blocked(self.legend.obstacle_penalty);
                }
            }
        }

        let under = range.clamp(self.square_at(center));
        match self.layout.get(under) {
            Some(ch) => self.legend.sample(ch),
            None => TerrainSample::open(0),
        }
    }
}
