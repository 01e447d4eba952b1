//! Text rendering of grids and paths.

use std::collections::HashMap;

use wayfind_core::Point;
use wayfind_paths::Grid;

/// Penalty shading, cheapest first.
const RAMP: [char; 6] = ['.', ',', '-', '=', '+', '%'];
const BLOCKED: char = '#';
const PATH: char = 'o';

/// Draw `grid` top row first. Walkable cells are shaded by their position
/// in the grid's penalty range; `path` cells and then `marks` are drawn
/// over the shading.
pub fn render(grid: &Grid, path: &[Point], marks: &[(Point, char)]) -> String {
    let mut overlay: HashMap<Point, char> = path.iter().map(|&p| (p, PATH)).collect();
    overlay.extend(marks.iter().copied());

    let size = grid.size();
    let range = grid.penalty_range();
    let mut out = String::with_capacity(((size.x + 1) * size.y) as usize);
    for y in (0..size.y).rev() {
        for x in 0..size.x {
            let p = Point::new(x, y);
            let ch = match (overlay.get(&p), grid.node(p)) {
                (Some(&c), _) => c,
                (None, Some(n)) if !n.is_walkable() => BLOCKED,
                (None, Some(n)) => shade(range.normalize(n.movement_penalty())),
                (None, None) => ' ',
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

fn shade(t: f32) -> char {
    let i = (t * (RAMP.len() - 1) as f32).round() as usize;
    RAMP[i.min(RAMP.len() - 1)]
}
