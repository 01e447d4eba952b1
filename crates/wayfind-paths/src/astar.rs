//! A* search over a [`Grid`].

use std::fmt;
use std::time::Instant;

use glam::Vec3;
use wayfind_core::Point;

use crate::distance::octile;
use crate::grid::Grid;
use crate::heap::{HeapError, IndexedHeap};
use crate::node::{SearchNode, UNREACHABLE};
use crate::simplify::simplify_path;

// ---------------------------------------------------------------------------
// Results and errors
// ---------------------------------------------------------------------------

/// A successful search result.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    /// Every cell after the start, ending at the target.
    pub cells: Vec<Point>,
    /// World positions of the cells where the path turns, plus the target.
    pub waypoints: Vec<Vec3>,
    /// Step costs plus movement penalties from start to target.
    pub cost: i32,
}

impl Path {
    /// Whether start and target were the same cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Which end of a request an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Target,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// Why a search produced no path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// The start or target cell cannot be walked on. No search ran.
    UnwalkableEndpoint { endpoint: Endpoint, cell: Point },
    /// The open set ran dry before reaching the target.
    UnreachableTarget,
    /// The open set violated its capacity contract.
    Heap(HeapError),
}

impl PathError {
    /// Whether the error indicates a bug rather than an ordinary failed
    /// request.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Heap(_))
    }
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnwalkableEndpoint { endpoint, cell } => {
                write!(f, "path: {endpoint} cell {cell} is not walkable")
            }
            Self::UnreachableTarget => write!(f, "path: target is unreachable"),
            Self::Heap(e) => write!(f, "path: open set failure: {e}"),
        }
    }
}

impl std::error::Error for PathError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Heap(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HeapError> for PathError {
    fn from(e: HeapError) -> Self {
        Self::Heap(e)
    }
}

// ---------------------------------------------------------------------------
// Pathfinder
// ---------------------------------------------------------------------------

/// Runs A* searches over a [`Grid`].
///
/// A `Pathfinder` owns one [`SearchNode`] per grid cell and an open set
/// sized to the whole grid, and reuses both across searches. Each search
/// bumps a generation counter instead of clearing the arena, so setup is
/// O(1). The grid itself is only read; any number of pathfinders may
/// search the same grid, each from its own thread.
pub struct Pathfinder {
    nodes: Vec<SearchNode>,
    open: IndexedHeap<SearchNode>,
    generation: u32,
    last_path: Vec<Point>,
}

impl Pathfinder {
    /// Create a pathfinder sized for `grid`.
    pub fn new(grid: &Grid) -> Self {
        Self::with_capacity(grid.len())
    }

    /// Create a pathfinder for grids of `len` cells.
    pub fn with_capacity(len: usize) -> Self {
        Self {
            nodes: vec![SearchNode::default(); len],
            open: IndexedHeap::new(len),
            generation: 0,
            last_path: Vec::new(),
        }
    }

    /// Cells of the last successful search, start excluded.
    #[inline]
    pub fn last_path(&self) -> &[Point] {
        &self.last_path
    }

    /// Number of searches started since the arena was last reset.
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Search state of `p` if the most recent search touched it.
    pub fn visited(&self, grid: &Grid, p: Point) -> Option<&SearchNode> {
        let i = grid.index_of(p)?;
        self.nodes
            .get(i)
            .filter(|n| n.generation == self.generation && self.generation != 0)
    }

    /// Find a path between two world positions.
    ///
    /// Both positions snap to their containing cells; positions outside the
    /// grid snap to the nearest edge cell.
    pub fn find_path(&mut self, grid: &Grid, start: Vec3, end: Vec3) -> Result<Path, PathError> {
        let start_cell = grid.cell_at(start);
        let target_cell = grid.cell_at(end);
        self.find_path_between(grid, start_cell, target_cell)
    }

    /// Find a path between two cells.
    pub fn find_path_between(
        &mut self,
        grid: &Grid,
        start: Point,
        target: Point,
    ) -> Result<Path, PathError> {
        let start_idx = Self::walkable_index(grid, start, Endpoint::Start)?;
        let target_idx = Self::walkable_index(grid, target, Endpoint::Target)?;

        let timer = Instant::now();
        let cur_gen = self.begin(grid.len());

        {
            let node = &mut self.nodes[start_idx];
            node.refresh(cur_gen);
            node.g_cost = 0;
            node.h_cost = octile(start, target);
        }
        self.open.push(&mut self.nodes, start_idx)?;

        let mut expanded = 0usize;
        while !self.open.is_empty() {
            let ci = self.open.pop_best(&mut self.nodes)?;
            if ci == target_idx {
                let path = self.retrace(grid, start, start_idx, target_idx);
                log::debug!(
                    "path {start} -> {target}: cost {}, {} cells, {} waypoints, {expanded} expanded in {:?}",
                    path.cost,
                    path.cells.len(),
                    path.waypoints.len(),
                    timer.elapsed()
                );
                self.last_path.clone_from(&path.cells);
                return Ok(path);
            }

            self.nodes[ci].closed = true;
            expanded += 1;
            let current = grid.point_of(ci);
            let current_g = self.nodes[ci].g_cost;

            for np in grid.neighbors(current) {
                let Some(ni) = grid.index_of(np) else {
                    continue;
                };
                let cell = &grid[np];
                if !cell.is_walkable() {
                    continue;
                }
                self.nodes[ni].refresh(cur_gen);
                if self.nodes[ni].closed {
                    continue;
                }

                let step = octile(current, np) + cell.movement_penalty();
                let tentative = current_g.saturating_add(step);
                if tentative == UNREACHABLE {
                    // Costs past i32::MAX are treated as no route.
                    continue;
                }
                let in_open = self.open.contains(&self.nodes, ni);
                if tentative < self.nodes[ni].g_cost || !in_open {
                    let n = &mut self.nodes[ni];
                    n.g_cost = tentative;
                    n.h_cost = octile(np, target);
                    n.parent = Some(ci);
                    if in_open {
                        self.open.on_cost_changed(&mut self.nodes, ni);
                    } else {
                        self.open.push(&mut self.nodes, ni)?;
                    }
                }
            }
        }

        log::debug!(
            "path {start} -> {target}: unreachable after {expanded} expanded in {:?}",
            timer.elapsed()
        );
        Err(PathError::UnreachableTarget)
    }

    fn walkable_index(grid: &Grid, p: Point, endpoint: Endpoint) -> Result<usize, PathError> {
        match grid.index_of(p) {
            Some(i) if grid.is_walkable(p) => Ok(i),
            _ => {
                log::warn!("{endpoint} cell {p} is not walkable, skipping search");
                Err(PathError::UnwalkableEndpoint { endpoint, cell: p })
            }
        }
    }

    /// Start a new search generation over a grid of `len` cells.
    fn begin(&mut self, len: usize) -> u32 {
        if self.nodes.len() != len {
            self.nodes.clear();
            self.nodes.resize(len, SearchNode::default());
            self.open.reserve_to(len);
            self.generation = 0;
        }
        self.open.clear();
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: old stamps could alias the new generation.
            self.nodes.fill(SearchNode::default());
            self.generation = 1;
        }
        self.generation
    }

    /// Walk parents back from the target and simplify.
    fn retrace(&self, grid: &Grid, start: Point, start_idx: usize, target_idx: usize) -> Path {
        let mut cells = Vec::new();
        let mut ci = target_idx;
        while ci != start_idx {
            cells.push(grid.point_of(ci));
            let Some(parent) = self.nodes[ci].parent else {
                debug_assert!(false, "broken parent chain at {}", grid.point_of(ci));
                break;
            };
            ci = parent;
        }
        cells.reverse();

        let waypoints = simplify_path(start, &cells)
            .into_iter()
            .map(|p| grid[p].world_position())
            .collect();

        Path {
            cells,
            waypoints,
            cost: self.nodes[target_idx].g_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::STRAIGHT_COST;
    use crate::traits::{MAX_PENALTY, TerrainSample};
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    /// Build a grid from rows of chars: '#' blocked, digits are penalties
    /// (in tens), anything else is open with zero penalty. Top row is the
    /// highest y.
    fn grid_from(rows: &[&str]) -> Grid {
        let h = rows.len();
        let w = rows[0].len();
        let cells: Vec<Vec<char>> = rows.iter().map(|r| r.chars().collect()).collect();
        let oracle = |p: Vec3, _r: f32| {
            let x = (p.x + w as f32 / 2.0 - 0.5) as usize;
            let y = (p.z + h as f32 / 2.0 - 0.5) as usize;
            match cells[h - 1 - y][x] {
                '#' => TerrainSample::blocked(0),
                c if c.is_ascii_digit() => TerrainSample::open(c as i32 - '0' as i32),
                _ => TerrainSample::open(0),
            }
        };
        Grid::build(Vec3::ZERO, Vec2::new(w as f32, h as f32), 0.5, &oracle).unwrap()
    }

    fn open_grid(w: usize, h: usize) -> Grid {
        let row = ".".repeat(w);
        let rows: Vec<&str> = (0..h).map(|_| row.as_str()).collect();
        grid_from(&rows)
    }

    /// Cost of walking `start` then `cells`, recomputed from scratch.
    fn walk_cost(grid: &Grid, start: Point, cells: &[Point]) -> i32 {
        let mut prev = start;
        let mut cost = 0;
        for &c in cells {
            let (dx, dy) = prev.abs_delta(c);
            assert!(dx <= 1 && dy <= 1 && (dx, dy) != (0, 0), "{prev} -> {c} is not a step");
            assert!(grid.is_walkable(c));
            cost += octile(prev, c) + grid.penalty_at(c).unwrap();
            prev = c;
        }
        cost
    }

    /// Reference Dijkstra with the same edge costs.
    fn dijkstra_cost(grid: &Grid, start: Point, target: Point) -> Option<i32> {
        let mut dist = vec![i32::MAX; grid.len()];
        let mut open = BinaryHeap::new();
        let si = grid.index_of(start)?;
        dist[si] = 0;
        open.push(Reverse((0, si)));
        while let Some(Reverse((d, i))) = open.pop() {
            if d > dist[i] {
                continue;
            }
            let p = grid.point_of(i);
            if p == target {
                return Some(d);
            }
            for q in grid.neighbors(p) {
                if !grid.is_walkable(q) {
                    continue;
                }
                let qi = grid.index_of(q).unwrap();
                let nd = d + octile(p, q) + grid.penalty_at(q).unwrap();
                if nd < dist[qi] {
                    dist[qi] = nd;
                    open.push(Reverse((nd, qi)));
                }
            }
        }
        None
    }

    #[test]
    fn ten_by_ten_diagonal() {
        let grid = open_grid(10, 10);
        let mut pf = Pathfinder::new(&grid);
        let start = grid.cell_center(Point::new(0, 0));
        let end = grid.cell_center(Point::new(9, 9));
        let path = pf.find_path(&grid, start, end).unwrap();
        assert_eq!(path.cost, 126);
        assert_eq!(path.cells.len(), 9);
        assert_eq!(path.waypoints, vec![grid.cell_center(Point::new(9, 9))]);
        assert_eq!(pf.last_path(), path.cells.as_slice());
    }

    #[test]
    fn open_grid_cost_matches_closed_form() {
        let grid = open_grid(12, 9);
        let mut pf = Pathfinder::new(&grid);
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        for _ in 0..40 {
            let a = Point::new(rng.random_range(0..12), rng.random_range(0..9));
            let b = Point::new(rng.random_range(0..12), rng.random_range(0..9));
            let path = pf.find_path_between(&grid, a, b).unwrap();
            assert_eq!(path.cost, octile(a, b), "{a} -> {b}");
            assert_eq!(walk_cost(&grid, a, &path.cells), path.cost);
        }
    }

    #[test]
    fn straight_path_has_one_waypoint() {
        let grid = open_grid(8, 3);
        let mut pf = Pathfinder::new(&grid);
        let path = pf
            .find_path_between(&grid, Point::new(0, 1), Point::new(7, 1))
            .unwrap();
        assert_eq!(path.cost, 70);
        assert_eq!(path.cells.len(), 7);
        assert_eq!(path.waypoints, vec![grid.cell_center(Point::new(7, 1))]);
    }

    #[test]
    fn corridor_turns_become_waypoints() {
        let grid = grid_from(&[
            "#####.",
            "#####.",
            "......",
        ]);
        let mut pf = Pathfinder::new(&grid);
        let path = pf
            .find_path_between(&grid, Point::new(0, 0), Point::new(5, 2))
            .unwrap();
        assert_eq!(path.cost, 4 * 10 + 14 + 10);
        assert_eq!(walk_cost(&grid, Point::new(0, 0), &path.cells), path.cost);
        // straight along the floor, one diagonal into the shaft, then up
        assert_eq!(path.waypoints.len(), 3);
    }

    #[test]
    fn same_cell_is_an_empty_success() {
        let grid = open_grid(4, 4);
        let mut pf = Pathfinder::new(&grid);
        let path = pf
            .find_path_between(&grid, Point::new(2, 2), Point::new(2, 2))
            .unwrap();
        assert!(path.is_empty());
        assert!(path.waypoints.is_empty());
        assert_eq!(path.cost, 0);
    }

    #[test]
    fn detours_around_walls() {
        let grid = grid_from(&[
            ".......",
            "...#...",
            "...#...",
            "...#...",
        ]);
        let mut pf = Pathfinder::new(&grid);
        let (a, b) = (Point::new(0, 0), Point::new(6, 0));
        let path = pf.find_path_between(&grid, a, b).unwrap();
        assert!(path.cost > octile(a, b));
        assert_eq!(Some(path.cost), dijkstra_cost(&grid, a, b));
        assert!(path.cells.iter().all(|&c| grid.is_walkable(c)));
        assert!(path.cells.contains(&Point::new(3, 3)));
    }

    #[test]
    fn diagonal_moves_may_cut_corners() {
        let grid = grid_from(&[
            ".#",
            "#.",
        ]);
        let mut pf = Pathfinder::new(&grid);
        let path = pf
            .find_path_between(&grid, Point::new(0, 1), Point::new(1, 0))
            .unwrap();
        assert_eq!(path.cost, 14);
        assert_eq!(path.cells, vec![Point::new(1, 0)]);
    }

    #[test]
    fn penalties_steer_the_search() {
        let grid = grid_from(&[
            ".....",
            "..9..",
            ".....",
        ]);
        let mut pf = Pathfinder::new(&grid);
        let path = pf
            .find_path_between(&grid, Point::new(0, 1), Point::new(4, 1))
            .unwrap();
        // through the 9 would cost 40 + 9; around it costs 48
        assert_eq!(path.cost, 48);
        assert!(!path.cells.contains(&Point::new(2, 1)));

        let heavy = grid_from(&[
            "#####",
            "..1..",
            "#####",
        ]);
        let path = Pathfinder::new(&heavy)
            .find_path_between(&heavy, Point::new(0, 1), Point::new(4, 1))
            .unwrap();
        assert_eq!(path.cost, 41);
    }

    #[test]
    fn huge_penalty_cell_costs_at_most_max_penalty() {
        let oracle = |p: Vec3, _: f32| {
            if p.x.abs() < 0.1 {
                TerrainSample::open(i32::MAX)
            } else {
                TerrainSample::open(0)
            }
        };
        let grid = Grid::build(Vec3::ZERO, Vec2::new(3.0, 1.0), 0.5, &oracle).unwrap();
        let path = Pathfinder::new(&grid)
            .find_path_between(&grid, Point::new(0, 0), Point::new(2, 0))
            .unwrap();
        assert_eq!(path.cost, 2 * STRAIGHT_COST + MAX_PENALTY);
        assert!(path.cost > 0);
    }

    #[test]
    fn costs_past_i32_max_are_unreachable() {
        // 2199 steps at MAX_PENALTY each overflow i32.
        let oracle = |_: Vec3, _: f32| TerrainSample::open(MAX_PENALTY);
        let grid = Grid::build(Vec3::ZERO, Vec2::new(2200.0, 1.0), 0.5, &oracle).unwrap();
        let mut pf = Pathfinder::new(&grid);
        assert_eq!(
            pf.find_path_between(&grid, Point::new(0, 0), Point::new(2199, 0)),
            Err(PathError::UnreachableTarget)
        );
        let near = pf
            .find_path_between(&grid, Point::new(0, 0), Point::new(2000, 0))
            .unwrap();
        assert_eq!(near.cost, 2000 * (STRAIGHT_COST + MAX_PENALTY));
    }

    #[test]
    fn walled_off_target_is_unreachable() {
        let grid = grid_from(&[
            "...#..",
            "...#..",
            "...#..",
        ]);
        let mut pf = Pathfinder::new(&grid);
        let err = pf
            .find_path_between(&grid, Point::new(0, 0), Point::new(5, 2))
            .unwrap_err();
        assert_eq!(err, PathError::UnreachableTarget);
        assert!(!err.is_fatal());
    }

    #[test]
    fn unwalkable_endpoints_fail_without_searching() {
        let grid = grid_from(&[
            "#...",
            "...#",
        ]);
        let mut pf = Pathfinder::new(&grid);
        let ok = pf
            .find_path_between(&grid, Point::new(0, 0), Point::new(2, 1))
            .unwrap();
        let generation = pf.generation();

        assert_eq!(
            pf.find_path_between(&grid, Point::new(0, 0), Point::new(3, 0)),
            Err(PathError::UnwalkableEndpoint {
                endpoint: Endpoint::Target,
                cell: Point::new(3, 0)
            })
        );
        assert_eq!(
            pf.find_path_between(&grid, Point::new(0, 1), Point::new(1, 1)),
            Err(PathError::UnwalkableEndpoint {
                endpoint: Endpoint::Start,
                cell: Point::new(0, 1)
            })
        );
        // nothing was touched by the failed requests
        assert_eq!(pf.generation(), generation);
        assert_eq!(pf.last_path(), ok.cells.as_slice());

        let again = pf
            .find_path_between(&grid, Point::new(0, 0), Point::new(2, 1))
            .unwrap();
        assert_eq!(again, ok);
    }

    #[test]
    fn outside_cells_are_unwalkable() {
        let grid = open_grid(3, 3);
        let mut pf = Pathfinder::new(&grid);
        assert!(matches!(
            pf.find_path_between(&grid, Point::new(-1, 0), Point::new(1, 1)),
            Err(PathError::UnwalkableEndpoint {
                endpoint: Endpoint::Start,
                ..
            })
        ));
    }

    #[test]
    fn world_points_outside_grid_snap_to_edges() {
        let grid = open_grid(5, 5);
        let mut pf = Pathfinder::new(&grid);
        let path = pf
            .find_path(&grid, Vec3::new(-50.0, 0.0, -50.0), Vec3::new(50.0, 0.0, -50.0))
            .unwrap();
        assert_eq!(path.cells.last(), Some(&Point::new(4, 0)));
        assert_eq!(path.cost, 40);
    }

    #[test]
    fn reuse_across_searches_resets_state() {
        let grid = grid_from(&[
            "......",
            ".####.",
            "......",
        ]);
        let mut pf = Pathfinder::new(&grid);
        let first = pf
            .find_path_between(&grid, Point::new(0, 0), Point::new(5, 2))
            .unwrap();
        // unrelated search in between
        pf.find_path_between(&grid, Point::new(5, 0), Point::new(0, 2))
            .unwrap();
        let second = pf
            .find_path_between(&grid, Point::new(0, 0), Point::new(5, 2))
            .unwrap();
        assert_eq!(first, second);
        assert!(pf.visited(&grid, Point::new(0, 0)).is_some());
        assert_eq!(pf.visited(&grid, Point::new(0, 0)).unwrap().g_cost(), 0);
    }

    #[test]
    fn searches_are_deterministic() {
        let grid = open_grid(9, 9);
        let run = || {
            Pathfinder::new(&grid)
                .find_path_between(&grid, Point::new(0, 4), Point::new(8, 1))
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn pathfinder_adapts_to_rebuilt_grid() {
        let small = open_grid(3, 3);
        let big = open_grid(6, 6);
        let mut pf = Pathfinder::new(&small);
        pf.find_path_between(&small, Point::new(0, 0), Point::new(2, 2))
            .unwrap();
        let path = pf
            .find_path_between(&big, Point::new(0, 0), Point::new(5, 5))
            .unwrap();
        assert_eq!(path.cost, 70);
    }

    #[test]
    fn generation_wrap_clears_stale_stamps() {
        let grid = open_grid(4, 4);
        let mut pf = Pathfinder::new(&grid);
        pf.find_path_between(&grid, Point::new(0, 0), Point::new(3, 3))
            .unwrap();
        pf.generation = u32::MAX;
        let path = pf
            .find_path_between(&grid, Point::new(3, 0), Point::new(0, 3))
            .unwrap();
        assert_eq!(pf.generation(), 1);
        assert_eq!(path.cost, 42);
    }

    #[test]
    fn matches_dijkstra_on_random_terrain() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0xa57a);
        for round in 0..25 {
            let (w, h) = (rng.random_range(2..15), rng.random_range(2..15));
            let rows: Vec<String> = (0..h)
                .map(|_| {
                    (0..w)
                        .map(|_| match rng.random_range(0..10) {
                            0 | 1 => '#',
                            2 => '5',
                            3 => '9',
                            _ => '.',
                        })
                        .collect()
                })
                .collect();
            let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
            let grid = grid_from(&refs);
            let mut pf = Pathfinder::new(&grid);
            for _ in 0..10 {
                let a = Point::new(rng.random_range(0..w), rng.random_range(0..h));
                let b = Point::new(rng.random_range(0..w), rng.random_range(0..h));
                if !grid.is_walkable(a) || !grid.is_walkable(b) {
                    continue;
                }
                let expected = dijkstra_cost(&grid, a, b);
                match pf.find_path_between(&grid, a, b) {
                    Ok(path) => {
                        assert_eq!(Some(path.cost), expected, "round {round}: {a} -> {b}");
                        assert_eq!(walk_cost(&grid, a, &path.cells), path.cost);
                        assert_eq!(path.cells.last().copied().unwrap_or(a), b);
                    }
                    Err(e) => {
                        assert_eq!(e, PathError::UnreachableTarget);
                        assert_eq!(expected, None, "round {round}: {a} -> {b}");
                    }
                }
            }
        }
    }

    #[test]
    fn error_display() {
        let e = PathError::UnwalkableEndpoint {
            endpoint: Endpoint::Target,
            cell: Point::new(3, 4),
        };
        assert_eq!(e.to_string(), "path: target cell (3, 4) is not walkable");
        let fatal = PathError::from(HeapError::Empty);
        assert!(fatal.is_fatal());
        assert!(std::error::Error::source(&fatal).is_some());
    }
}
