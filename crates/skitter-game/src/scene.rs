//! Scene graph collaborators
//!
//! The host engine owns the real scene graph. Game logic only sees nodes
//! through these traits: read a transform, write it back, attach or detach.

use glam::Vec3;
use skitter_core::{CollisionMask, Transform};

use crate::error::GameError;

/// A node in the host's scene graph that game logic can position.
pub trait SceneNode {
    /// Current transform in world space
    fn transform(&self) -> Transform;

    /// Replace the node's world-space transform
    fn set_transform(&mut self, transform: Transform);

    /// Parent the node under the scene root so it is rendered
    fn attach_to_root(&mut self);

    /// Remove the node from the scene graph
    fn detach(&mut self);

    /// Move the node, keeping its orientation
    fn set_position(&mut self, position: Vec3) {
        let mut transform = self.transform();
        transform.position = position;
        self.set_transform(transform);
    }
}

/// An animated model instance.
pub trait ActorNode: SceneNode {
    /// Loop the named animation until told otherwise
    fn loop_animation(&mut self, name: &str);

    /// Tight axis-aligned bounds of the model as `(min, max)`, if it has geometry
    fn tight_bounds(&self) -> Option<(Vec3, Vec3)>;
}

/// Collision sphere handed to the host's collision system.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionSphere {
    /// Name of the collision node
    pub name: String,
    /// Sphere radius in model units
    pub radius: f32,
    /// Layer other colliders test against
    pub into_mask: CollisionMask,
    /// Whether this sphere actively tests against others (and not only receives)
    pub active: bool,
}

/// Creates nodes and registers them with the host's collision system.
pub trait ActorLoader {
    type Actor: ActorNode;
    type Marker: SceneNode;

    /// Load a model as a new, detached actor
    fn load_actor(&mut self, model: &str) -> Result<Self::Actor, GameError>;

    /// Create an empty node attached to the scene root
    fn create_marker(&mut self, name: &str) -> Self::Marker;

    /// Register a collision sphere parented to `actor`
    fn register_collision(&mut self, actor: &Self::Actor, sphere: CollisionSphere);
}
