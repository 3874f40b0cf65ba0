//! Centipede configuration

use serde::{Deserialize, Serialize};

/// Centipede configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CentipedeConfig {
    /// Model loaded for the head, every body segment and the tail
    pub model: String,
    /// Animation looped on every part
    pub animation: String,
    /// Head speed in units per second
    pub forward_speed: f32,
    /// Maximum head turn rate in degrees per second
    pub turn_rate: f32,
    /// How far behind its spawn heading the head starts
    pub spawn_distance: f32,
    /// Segment spacing as a fraction of the head model's width
    pub segment_length_factor: f32,
    /// Gap left between a freshly added segment and the tail
    pub tail_gap: f32,
    /// Radius of each part's collision sphere
    pub collision_radius: f32,
    /// Distance of the idle steering point in front of the head
    pub steer_lookahead: f32,
}

impl Default for CentipedeConfig {
    fn default() -> Self {
        Self {
            model: "models/centipede".into(),
            animation: "Walk".into(),
            forward_speed: 25.0,
            turn_rate: 90.0,
            spawn_distance: 100.0,
            segment_length_factor: 0.5,
            tail_gap: 0.5,
            collision_radius: 0.65,
            steer_lookahead: 1.0,
        }
    }
}
