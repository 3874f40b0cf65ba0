//! Skitter Core - Core types and utilities shared by the Skitter crates
//!
//! This crate provides the foundational types used throughout the game:
//! - Mathematical primitives (re-exported from glam)
//! - Heading/pitch/roll transform with scene-node style operations
//! - Angle helpers and collision layer masks
//! - Frame time bookkeeping

pub mod math;
pub mod time;
pub mod types;

pub use glam::{Quat, UVec2, Vec2, Vec3};
pub use math::{angle_delta, clamp, fit_dest_angle_to_src};
pub use time::{GameTime, TimeConfig};
pub use types::{CollisionMask, EntityId, Transform};
