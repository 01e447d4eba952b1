//! Terrain described by world shapes instead of a layout.

use glam::Vec3;
use wayfind_paths::{TerrainOracle, TerrainSample};

use crate::shape::{Shape, ground};

/// An area with its own movement penalty.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PenaltyZone {
    pub shape: Shape,
    pub penalty: i32,
}

/// A [`TerrainOracle`] over a set of obstacle shapes and penalty zones.
///
/// A sample is blocked when its disc overlaps any obstacle. Otherwise its
/// penalty is the highest of the zones containing the sample centre, or
/// `base_penalty` outside every zone.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ObstacleField {
    pub obstacles: Vec<Shape>,
    pub zones: Vec<PenaltyZone>,
    pub base_penalty: i32,
    /// Penalty recorded on blocked samples.
    pub obstacle_penalty: i32,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_obstacle(mut self, shape: Shape) -> Self {
        self.obstacles.push(shape);
        self
    }

    pub fn with_zone(mut self, shape: Shape, penalty: i32) -> Self {
        self.zones.push(PenaltyZone { shape, penalty });
        self
    }

    pub fn with_obstacle_penalty(mut self, penalty: i32) -> Self {
        self.obstacle_penalty = penalty;
        self
    }
}

impl TerrainOracle for ObstacleField {
    fn sample(&self, world_point: Vec3, radius: f32) -> TerrainSample {
        let center = ground(world_point);
        if self.obstacles.iter().any(|o| o.overlaps_disc(center, radius)) {
            return TerrainSample::blocked(self.obstacle_penalty);
        }
        let penalty = self
            .zones
            .iter()
            .filter(|z| z.shape.contains(center))
            .map(|z| z.penalty)
            .max()
            .unwrap_or(self.base_penalty);
        TerrainSample::open(penalty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use wayfind_core::Point;
    use wayfind_paths::{Grid, Pathfinder};

    fn field() -> ObstacleField {
        ObstacleField::new()
            .with_obstacle(Shape::rect(Vec2::new(-1.0, -5.0), Vec2::new(1.0, 3.0)))
            .with_obstacle(Shape::circle(Vec2::new(-3.5, 3.5), 0.4))
            .with_zone(Shape::rect(Vec2::new(2.0, -5.0), Vec2::new(5.0, 5.0)), 8)
            .with_zone(Shape::circle(Vec2::new(3.5, 0.0), 1.0), 30)
            .with_obstacle_penalty(50)
    }

    #[test]
    fn obstacles_block_overlapping_discs() {
        let f = field();
        assert!(!f.sample(Vec3::new(0.0, 0.0, 0.0), 0.5).walkable);
        assert!(!f.sample(Vec3::new(1.4, 0.0, 0.0), 0.5).walkable);
        assert!(f.sample(Vec3::new(1.5, 0.0, 0.0), 0.5).walkable);
        assert_eq!(f.sample(Vec3::new(-3.5, 9.0, 3.5), 0.1), TerrainSample::blocked(50));
    }

    #[test]
    fn highest_zone_wins() {
        let f = field();
        assert_eq!(f.sample(Vec3::new(-4.0, 0.0, -4.0), 0.5).penalty, 0);
        assert_eq!(f.sample(Vec3::new(4.5, 0.0, 4.5), 0.5).penalty, 8);
        assert_eq!(f.sample(Vec3::new(3.5, 0.0, 0.5), 0.5).penalty, 30);
    }

    #[test]
    fn obstacle_penalty_spreads_when_blurred() {
        let f = field();
        let grid = Grid::build_with_blur(Vec3::ZERO, Vec2::new(10.0, 10.0), 0.5, 1, &f).unwrap();
        // (3, 0) sits beside the wall, (0, 0) well clear of it
        let near = grid.penalty_at(Point::new(3, 0)).unwrap();
        let far = grid.penalty_at(Point::new(0, 0)).unwrap();
        assert!(near > far, "near {near}, far {far}");
    }

    #[test]
    fn wall_forces_a_detour_over_the_top() {
        let f = field();
        let grid = Grid::build(Vec3::ZERO, Vec2::new(10.0, 10.0), 0.5, &f).unwrap();
        let mut pf = Pathfinder::new(&grid);
        let path = pf
            .find_path(&grid, Vec3::new(-4.5, 0.0, -4.5), Vec3::new(-0.5 + 3.0, 0.0, -4.5))
            .unwrap();
        assert!(path.cells.iter().any(|p| p.y >= 8));
        assert!(path.cells.iter().all(|&p| grid.is_walkable(p)));
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn field_from_json() {
        let f: ObstacleField = serde_json::from_str(
            r#"{
                "obstacles": [{"kind": "rect", "min": [0.0, 0.0], "max": [1.0, 1.0]}],
                "zones": [{"shape": {"kind": "circle", "center": [5.0, 5.0], "radius": 2.0}, "penalty": 7}]
            }"#,
        )
        .unwrap();
        assert_eq!(f.obstacles.len(), 1);
        assert_eq!(f.zones[0].penalty, 7);
        assert_eq!(f.base_penalty, 0);
    }
}
