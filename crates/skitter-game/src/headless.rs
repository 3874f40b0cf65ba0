//! In-memory collaborators
//!
//! Stand-ins for the engine's scene graph, model loader and cursor. Used by
//! the headless session binary and by tests.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::{IVec2, UVec2, Vec2, Vec3};
use skitter_core::{EntityId, Transform};
use tracing::{debug, warn};

use crate::error::GameError;
use crate::input::Cursor;
use crate::scene::{ActorLoader, ActorNode, CollisionSphere, SceneNode};

/// Scene node that only remembers its state
#[derive(Debug, Clone)]
pub struct HeadlessNode {
    id: EntityId,
    name: String,
    transform: Transform,
    attached: Rc<Cell<bool>>,
    animation: Option<String>,
    bounds: Option<(Vec3, Vec3)>,
}

impl HeadlessNode {
    /// Create a detached node without geometry
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            transform: Transform::default(),
            attached: Rc::new(Cell::new(false)),
            animation: None,
            bounds: None,
        }
    }

    /// Give the node model bounds
    pub fn with_bounds(mut self, bounds: Option<(Vec3, Vec3)>) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    /// Animation currently looping, if any
    pub fn animation(&self) -> Option<&str> {
        self.animation.as_deref()
    }
}

impl SceneNode for HeadlessNode {
    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn attach_to_root(&mut self) {
        self.attached.set(true);
    }

    fn detach(&mut self) {
        self.attached.set(false);
    }
}

impl ActorNode for HeadlessNode {
    fn loop_animation(&mut self, name: &str) {
        self.animation = Some(name.to_string());
    }

    fn tight_bounds(&self) -> Option<(Vec3, Vec3)> {
        self.bounds
    }
}

/// Model registry plus bookkeeping of every node and collision sphere handed out
#[derive(Debug)]
pub struct HeadlessScene {
    models: HashMap<String, Option<(Vec3, Vec3)>>,
    nodes: Vec<(EntityId, Rc<Cell<bool>>)>,
    collisions: Vec<(EntityId, CollisionSphere)>,
}

impl Default for HeadlessScene {
    fn default() -> Self {
        let mut scene = Self {
            models: HashMap::new(),
            nodes: Vec::new(),
            collisions: Vec::new(),
        };
        scene.add_model(
            "models/centipede",
            Some((Vec3::new(-1.5, -2.0, 0.0), Vec3::new(1.5, 2.0, 1.0))),
        );
        scene
    }
}

impl HeadlessScene {
    /// Make a model loadable. `None` bounds model an empty asset.
    pub fn add_model(&mut self, name: impl Into<String>, bounds: Option<(Vec3, Vec3)>) {
        self.models.insert(name.into(), bounds);
    }

    /// Number of nodes currently attached to the scene root
    pub fn attached_count(&self) -> usize {
        self.nodes.iter().filter(|(_, attached)| attached.get()).count()
    }

    /// Registered collision spheres in registration order
    pub fn collisions(&self) -> Vec<&CollisionSphere> {
        self.collisions.iter().map(|(_, sphere)| sphere).collect()
    }

    /// Collision spheres registered for one node
    pub fn collisions_of(&self, id: EntityId) -> impl Iterator<Item = &CollisionSphere> {
        self.collisions
            .iter()
            .filter(move |(owner, _)| *owner == id)
            .map(|(_, sphere)| sphere)
    }

    /// Number of nodes the scene still keeps track of
    pub fn tracked_count(&self) -> usize {
        self.nodes.len()
    }

    fn track(&mut self, node: &HeadlessNode) {
        self.prune();
        self.nodes.push((node.id, Rc::clone(&node.attached)));
    }

    /// Forget nodes that were detached and then dropped, with their spheres
    fn prune(&mut self) {
        let mut gone = Vec::new();
        self.nodes.retain(|(id, attached)| {
            let alive = attached.get() || Rc::strong_count(attached) > 1;
            if !alive {
                gone.push(*id);
            }
            alive
        });
        if !gone.is_empty() {
            self.collisions.retain(|(owner, _)| !gone.contains(owner));
            debug!("Dropped {} detached nodes", gone.len());
        }
    }
}

impl ActorLoader for HeadlessScene {
    type Actor = HeadlessNode;
    type Marker = HeadlessNode;

    fn load_actor(&mut self, model: &str) -> Result<HeadlessNode, GameError> {
        let Some(bounds) = self.models.get(model).copied() else {
            warn!("Model '{}' is not registered", model);
            return Err(GameError::AssetLoad {
                model: model.to_string(),
                reason: "no such model".into(),
            });
        };
        let node = HeadlessNode::new(model).with_bounds(bounds);
        self.track(&node);
        Ok(node)
    }

    fn create_marker(&mut self, name: &str) -> HeadlessNode {
        let mut node = HeadlessNode::new(name);
        node.attach_to_root();
        self.track(&node);
        node
    }

    fn register_collision(&mut self, actor: &HeadlessNode, sphere: CollisionSphere) {
        debug!("Collision sphere '{}' on {}", sphere.name, actor.name());
        self.collisions.push((actor.id(), sphere));
    }
}

/// Cursor over a virtual window
#[derive(Debug, Clone)]
pub struct HeadlessCursor {
    position: Option<Vec2>,
    window_size: UVec2,
    hidden: bool,
}

impl HeadlessCursor {
    /// Cursor resting at the centre of a window of the given size
    pub fn new(window_size: UVec2) -> Self {
        Self {
            position: Some(Vec2::ZERO),
            window_size,
            hidden: false,
        }
    }

    /// Move the pointer in normalized coordinates; `None` takes it out of the window
    pub fn set_position(&mut self, position: Option<Vec2>) {
        self.position = position;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

impl Cursor for HeadlessCursor {
    fn position(&self) -> Option<Vec2> {
        self.position
    }

    fn window_size(&self) -> UVec2 {
        self.window_size
    }

    fn hide(&mut self) {
        self.hidden = true;
    }

    fn show(&mut self) {
        self.hidden = false;
    }

    fn warp(&mut self, pixel: IVec2) {
        let size = self.window_size.as_vec2().max(Vec2::ONE);
        let pixel = pixel.as_vec2();
        self.position = Some(Vec2::new(
            pixel.x / size.x * 2.0 - 1.0,
            1.0 - pixel.y / size.y * 2.0,
        ));
    }
}
