//! The traversability grid.
//!
//! A [`Grid`] discretizes a rectangle of the ground plane into square cells,
//! asks a [`TerrainOracle`] about each one, and then smooths the resulting
//! movement penalties. It is built once and read-only afterwards; searches
//! keep their own state in a [`Pathfinder`](crate::Pathfinder).

use std::ops::Index;

use glam::{Vec2, Vec3};
use wayfind_core::{Point, Range, WorldBounds, round_to_int};

use crate::config::{ConfigError, GridConfig};
use crate::node::Node;
use crate::smooth::PenaltyRange;
use crate::traits::{MAX_PENALTY, TerrainOracle};

/// A dense, row-major array of [`Node`]s covering a world rectangle.
#[derive(Clone, Debug)]
pub struct Grid {
    bounds: WorldBounds,
    node_radius: f32,
    range: Range,
    width: usize,
    nodes: Vec<Node>,
    pub(crate) penalty_range: PenaltyRange,
}

impl Grid {
    /// Build a grid centred on `origin` without penalty smoothing.
    pub fn build<O: TerrainOracle + ?Sized>(
        origin: Vec3,
        world_size: Vec2,
        node_radius: f32,
        oracle: &O,
    ) -> Result<Self, ConfigError> {
        Self::build_with_blur(origin, world_size, node_radius, 0, oracle)
    }

    /// Build a grid, then box-blur its penalties with `blur_radius`.
    pub fn build_with_blur<O: TerrainOracle + ?Sized>(
        origin: Vec3,
        world_size: Vec2,
        node_radius: f32,
        blur_radius: usize,
        oracle: &O,
    ) -> Result<Self, ConfigError> {
        let config = GridConfig {
            origin,
            world_size,
            node_radius,
            blur_radius,
        };
        Self::from_config(&config, oracle)
    }

    /// Sample every cell from `oracle` and smooth the penalty field.
    ///
    /// Penalties reported by the oracle are clamped to `0..=`[`MAX_PENALTY`].
    pub fn from_config<O: TerrainOracle + ?Sized>(
        config: &GridConfig,
        oracle: &O,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let size = config.grid_size();
        let range = Range::with_size(size.x, size.y);
        let bounds = config.bounds();
        let radius = config.node_radius;
        let diameter = config.node_diameter();
        let bottom_left = bounds.bottom_left();

        let mut nodes = Vec::with_capacity(range.len());
        for p in range {
            let world_point = bottom_left
                + Vec3::new(
                    p.x as f32 * diameter + radius,
                    0.0,
                    p.y as f32 * diameter + radius,
                );
            let sample = oracle.sample(world_point, radius);
            let penalty = sample.penalty.clamp(0, MAX_PENALTY);
            nodes.push(Node::new(p, world_point, sample.walkable, penalty));
        }

        let mut grid = Self {
            bounds,
            node_radius: radius,
            range,
            width: size.x as usize,
            nodes,
            penalty_range: PenaltyRange::default(),
        };
        let penalties = grid.smooth_penalties(config.blur_radius);

        log::debug!(
            "built {}x{} grid, {} walkable cells, penalties {}..={}",
            size.x,
            size.y,
            grid.walkable_count(),
            penalties.min,
            penalties.max
        );
        Ok(grid)
    }

    // -----------------------------------------------------------------------
    // Dimensions
    // -----------------------------------------------------------------------

    /// Cell counts on each axis.
    #[inline]
    pub fn size(&self) -> Point {
        self.range.size()
    }

    /// The cell range `[0, width) × [0, height)`.
    #[inline]
    pub fn range(&self) -> Range {
        self.range
    }

    /// Total cell count; the worst-case open-set size for one search.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn world_bounds(&self) -> WorldBounds {
        self.bounds
    }

    #[inline]
    pub fn node_radius(&self) -> f32 {
        self.node_radius
    }

    #[inline]
    pub fn node_diameter(&self) -> f32 {
        self.node_radius * 2.0
    }

    // -----------------------------------------------------------------------
    // Cell access
    // -----------------------------------------------------------------------

    /// Flat index of `p`, or `None` outside the grid.
    #[inline]
    pub fn index_of(&self, p: Point) -> Option<usize> {
        if !self.range.contains(p) {
            return None;
        }
        Some(p.y as usize * self.width + p.x as usize)
    }

    /// Cell coordinates of flat index `idx`.
    #[inline]
    pub fn point_of(&self, idx: usize) -> Point {
        Point::new((idx % self.width) as i32, (idx / self.width) as i32)
    }

    #[inline]
    pub fn node(&self, p: Point) -> Option<&Node> {
        self.index_of(p).map(|i| &self.nodes[i])
    }

    /// Every node in row-major order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    /// Whether `p` is inside the grid and walkable.
    #[inline]
    pub fn is_walkable(&self, p: Point) -> bool {
        self.node(p).is_some_and(Node::is_walkable)
    }

    /// Movement penalty at `p`, or `None` outside the grid.
    #[inline]
    pub fn penalty_at(&self, p: Point) -> Option<i32> {
        self.node(p).map(Node::movement_penalty)
    }

    /// Smallest and largest penalty after the last smoothing pass.
    #[inline]
    pub fn penalty_range(&self) -> PenaltyRange {
        self.penalty_range
    }

    pub fn walkable_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_walkable()).count()
    }

    #[inline]
    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    // -----------------------------------------------------------------------
    // Neighbours and world mapping
    // -----------------------------------------------------------------------

    /// The up to eight cells around `p` (3×3 block minus the centre),
    /// clipped to the grid. Order is fixed: column by column from
    /// (-1, -1) to (1, 1).
    pub fn neighbors(&self, p: Point) -> impl Iterator<Item = Point> + '_ {
        p.neighbors_8()
            .into_iter()
            .filter(move |&q| self.range.contains(q))
    }

    /// Map a world position to the cell containing it.
    ///
    /// Positions outside the world bounds snap to the nearest edge cell.
    pub fn cell_at(&self, world_position: Vec3) -> Point {
        let f = self.bounds.normalize(world_position);
        let size = self.size();
        let p = Point::new(
            round_to_int((size.x - 1) as f32 * f.x),
            round_to_int((size.y - 1) as f32 * f.y),
        );
        self.range.clamp(p)
    }

    /// The node containing `world_position`; see [`cell_at`](Self::cell_at).
    #[inline]
    pub fn node_at(&self, world_position: Vec3) -> &Node {
        &self[self.cell_at(world_position)]
    }

    /// World-space centre of cell `p`. Defined for points outside the grid
    /// as well, by extrapolation.
    pub fn cell_center(&self, p: Point) -> Vec3 {
        let d = self.node_diameter();
        self.bounds.bottom_left()
            + Vec3::new(
                p.x as f32 * d + self.node_radius,
                0.0,
                p.y as f32 * d + self.node_radius,
            )
    }
}

impl Index<Point> for Grid {
    type Output = Node;

    #[track_caller]
    fn index(&self, p: Point) -> &Node {
        match self.index_of(p) {
            Some(i) => &self.nodes[i],
            None => panic!("cell {p} is outside grid {}", self.range),
        }
    }
}
