//! Core types used throughout Skitter

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for nodes placed in a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Position and heading/pitch/roll orientation of a scene node.
///
/// The world is Z-up. A node with zero rotation faces +Y; heading turns about
/// +Z (so a heading of 90 faces -X), pitch about the local +X axis and roll
/// about the local +Y axis. Angles are stored in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Heading, pitch, roll in degrees
    pub hpr: Vec3,
}

impl Transform {
    /// Create a new transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and heading/pitch/roll
    pub fn from_position_hpr(position: Vec3, hpr: Vec3) -> Self {
        Self { position, hpr }
    }

    /// Heading in degrees
    pub fn heading(&self) -> f32 {
        self.hpr.x
    }

    /// Pitch in degrees
    pub fn pitch(&self) -> f32 {
        self.hpr.y
    }

    /// Set the heading, leaving pitch and roll alone
    pub fn set_heading(&mut self, heading: f32) {
        self.hpr.x = heading;
    }

    /// Rotation quaternion for the stored heading/pitch/roll
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::ZXY,
            self.hpr.x.to_radians(),
            self.hpr.y.to_radians(),
            self.hpr.z.to_radians(),
        )
    }

    /// Get the forward direction (positive Y in local space)
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::Y
    }

    /// Map a point from this node's local space into world space
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation() * local
    }

    /// Place this node at `offset` expressed in `reference`'s local frame
    pub fn set_pos_relative(&mut self, reference: &Transform, offset: Vec3) {
        self.position = reference.transform_point(offset);
    }

    /// Move along this node's own axes
    pub fn translate_local(&mut self, offset: Vec3) {
        self.position = self.transform_point(offset);
    }

    /// Distance between the origins of two nodes
    pub fn distance(&self, other: &Transform) -> f32 {
        self.position.distance(other.position)
    }

    /// Turn to face a target point, pitching up or down as needed. Roll is cleared.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = target - self.position;
        if dir.length_squared() <= f32::EPSILON {
            return;
        }
        let flat = dir.truncate().length();
        self.hpr = Vec3::new(
            (-dir.x).atan2(dir.y).to_degrees(),
            dir.z.atan2(flat).to_degrees(),
            0.0,
        );
    }

    /// Turn to face a target point while keeping the node upright.
    ///
    /// Only the heading changes; pitch and roll are cleared so that forward
    /// motion stays parallel to the ground.
    pub fn heads_up(&mut self, target: Vec3) {
        let dir = target - self.position;
        if dir.truncate().length_squared() <= f32::EPSILON {
            return;
        }
        self.hpr = Vec3::new((-dir.x).atan2(dir.y).to_degrees(), 0.0, 0.0);
    }
}

/// 32-bit collision layer mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CollisionMask(pub u32);

impl CollisionMask {
    /// Mask with only bit `index` set (empty if the index is out of range)
    pub fn bit(index: u32) -> Self {
        Self(1u32.checked_shl(index).unwrap_or(0))
    }
}
