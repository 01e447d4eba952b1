//! **wayfind-core**: shared types for grid pathfinding.
//!
//! This crate provides the geometry used across the *wayfind* workspace:
//! integer cell coordinates, half-open cell ranges, and world-space bounds
//! on the X/Z ground plane.

pub mod geom;
pub mod world;

pub use geom::{Point, Range};
pub use world::{WorldBounds, round_to_int};

pub use glam::{Vec2, Vec3};
