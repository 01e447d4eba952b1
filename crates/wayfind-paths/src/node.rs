use std::cmp::Ordering;

use glam::Vec3;
use wayfind_core::Point;

use crate::heap::HeapItem;

/// Sentinel g-cost of a node the current search has not reached.
pub const UNREACHABLE: i32 = i32::MAX;

// ---------------------------------------------------------------------------
// Node: one traversability cell, owned by the Grid
// ---------------------------------------------------------------------------

/// One cell of a [`Grid`](crate::Grid).
///
/// Position and walkability are fixed at construction. The movement
/// penalty is set at construction and rewritten once by penalty smoothing.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pos: Point,
    world_position: Vec3,
    walkable: bool,
    movement_penalty: i32,
}

impl Node {
    pub(crate) fn new(pos: Point, world_position: Vec3, walkable: bool, movement_penalty: i32) -> Self {
        Self {
            pos,
            world_position,
            walkable,
            movement_penalty,
        }
    }

    /// Grid coordinates of the cell.
    #[inline]
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// World-space centre of the cell.
    #[inline]
    pub fn world_position(&self) -> Vec3 {
        self.world_position
    }

    #[inline]
    pub fn is_walkable(&self) -> bool {
        self.walkable
    }

    /// Additive cost of entering this cell.
    #[inline]
    pub fn movement_penalty(&self) -> i32 {
        self.movement_penalty
    }

    #[inline]
    pub(crate) fn set_movement_penalty(&mut self, penalty: i32) {
        self.movement_penalty = penalty;
    }
}

// ---------------------------------------------------------------------------
// SearchNode: per-search state, owned by a Pathfinder
// ---------------------------------------------------------------------------

/// Search-scoped bookkeeping for one cell.
///
/// A [`Pathfinder`](crate::Pathfinder) keeps one `SearchNode` per grid cell
/// and reuses them across searches. Entries stamped with an older
/// generation are stale and read as unvisited.
#[derive(Clone, Debug)]
pub struct SearchNode {
    pub(crate) g_cost: i32,
    pub(crate) h_cost: i32,
    /// Arena index of the cell this one was reached from.
    pub(crate) parent: Option<usize>,
    pub(crate) closed: bool,
    pub(crate) generation: u32,
    heap_slot: usize,
}

impl Default for SearchNode {
    fn default() -> Self {
        Self {
            g_cost: UNREACHABLE,
            h_cost: 0,
            parent: None,
            closed: false,
            generation: 0,
            heap_slot: 0,
        }
    }
}

impl SearchNode {
    /// Known cost from the start.
    #[inline]
    pub fn g_cost(&self) -> i32 {
        self.g_cost
    }

    /// Heuristic estimate to the target.
    #[inline]
    pub fn h_cost(&self) -> i32 {
        self.h_cost
    }

    /// Estimated total cost through this node.
    #[inline]
    pub fn f_cost(&self) -> i32 {
        self.g_cost.saturating_add(self.h_cost)
    }

    #[inline]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Bring a stale entry into generation `generation` as unvisited.
    /// Entries already in that generation are left alone.
    #[inline]
    pub(crate) fn refresh(&mut self, generation: u32) {
        if self.generation != generation {
            self.g_cost = UNREACHABLE;
            self.h_cost = 0;
            self.parent = None;
            self.closed = false;
            self.generation = generation;
        }
    }
}

impl HeapItem for SearchNode {
    #[inline]
    fn heap_slot(&self) -> usize {
        self.heap_slot
    }

    #[inline]
    fn set_heap_slot(&mut self, slot: usize) {
        self.heap_slot = slot;
    }

    /// Lower f-cost wins; on equal f-cost, lower h-cost wins.
    #[inline]
    fn cmp_priority(&self, other: &Self) -> Ordering {
        other
            .f_cost()
            .cmp(&self.f_cost())
            .then_with(|| other.h_cost.cmp(&self.h_cost))
    }
}
