use wayfind_core::Point;

/// Reduce a cell path to the cells where its direction changes.
///
/// `cells` is the path after `start`, in walking order. A cell is kept when
/// the step leaving it differs from the step entering it; the final cell is
/// always kept. A straight run of any length therefore collapses to its
/// endpoint, and an L-shaped path to its corner and endpoint.
pub fn simplify_path(start: Point, cells: &[Point]) -> Vec<Point> {
    let mut waypoints = Vec::new();
    let mut prev = start;
    for (i, &cell) in cells.iter().enumerate() {
        let entering = cell - prev;
        let keep = match cells.get(i + 1) {
            Some(&next) => next - cell != entering,
            None => true,
        };
        if keep {
            waypoints.push(cell);
        }
        prev = cell;
    }
    waypoints
}
