use wayfind_core::Point;

/// Cost of one orthogonal step.
pub const STRAIGHT_COST: i32 = 10;

/// Cost of one diagonal step (≈ √2 · [`STRAIGHT_COST`]).
pub const DIAGONAL_COST: i32 = 14;

/// Weighted grid distance: diagonal moves for the shared part of the
/// deltas, straight moves for the remainder.
///
/// Used both as the step cost between adjacent cells and as the A*
/// heuristic, which keeps the heuristic consistent.
#[inline]
pub fn octile(a: Point, b: Point) -> i32 {
    let (dx, dy) = a.abs_delta(b);
    DIAGONAL_COST * dx.min(dy) + STRAIGHT_COST * (dx - dy).abs()
}
