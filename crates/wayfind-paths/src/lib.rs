//! A* pathfinding over cost-annotated grids.
//!
//! A [`Grid`] covers a rectangle of the ground plane (world X/Z, Y up) with
//! square cells. Each cell is sampled once from a [`TerrainOracle`] for
//! walkability and a movement penalty, and the penalty field is then
//! box-blurred so costs rise gradually near expensive terrain.
//!
//! Searches run through a [`Pathfinder`], which owns all per-search state
//! and reuses it across calls:
//!
//! - **8-connected A\*** with octile step costs plus the destination cell's
//!   penalty ([`Pathfinder::find_path`])
//! - **Path simplification** to the cells where direction changes
//!   ([`simplify_path`])
//! - **Cooperative requests** drained by the caller ([`RequestQueue`])
//! - **Background requests** on a worker thread ([`PathWorker`])
//!
//! # Costs
//!
//! | Move | Cost |
//! |---|---|
//! | orthogonal | [`STRAIGHT_COST`] + penalty of the entered cell |
//! | diagonal | [`DIAGONAL_COST`] + penalty of the entered cell |
//!
//! The heuristic is [`octile`] distance, which never overestimates because
//! penalties are non-negative. Penalties are capped at [`MAX_PENALTY`], and
//! a route whose cost would pass `i32::MAX` counts as unreachable.
//!
//! ```
//! use glam::{Vec2, Vec3};
//! use wayfind_paths::{Grid, Pathfinder, TerrainSample};
//!
//! let open = |_: Vec3, _: f32| TerrainSample::open(0);
//! let grid = Grid::build(Vec3::ZERO, Vec2::new(10.0, 10.0), 0.5, &open).unwrap();
//! let mut pathfinder = Pathfinder::new(&grid);
//! let path = pathfinder
//!     .find_path(&grid, Vec3::new(-4.5, 0.0, -4.5), Vec3::new(4.5, 0.0, 4.5))
//!     .unwrap();
//! assert_eq!(path.cost, 126);
//! assert_eq!(path.waypoints, vec![Vec3::new(4.5, 0.0, 4.5)]);
//! ```

mod astar;
mod config;
mod distance;
mod grid;
mod heap;
mod node;
mod request;
mod simplify;
mod smooth;
mod traits;
mod worker;

pub use astar::{Endpoint, Path, PathError, Pathfinder};
pub use config::{ConfigError, GridConfig, MAX_CELLS};
pub use distance::{DIAGONAL_COST, STRAIGHT_COST, octile};
pub use grid::Grid;
pub use heap::{HeapError, HeapItem, IndexedHeap};
pub use node::{Node, SearchNode, UNREACHABLE};
pub use request::{PathCallback, RequestId, RequestQueue};
pub use simplify::simplify_path;
pub use smooth::PenaltyRange;
pub use traits::{MAX_PENALTY, TerrainOracle, TerrainSample};
pub use worker::{PathReply, PathWorker};
