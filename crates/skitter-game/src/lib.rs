//! Skitter Game - Game logic and systems
//!
//! Provides the orbiting strategy camera, ground picking, input mapping and
//! the centipede actor chain. Engine services reach this crate only through
//! the collaborator traits in [`scene`] and [`input`].

pub mod camera;
pub mod centipede;
pub mod error;
pub mod headless;
pub mod input;
pub mod scene;

pub use camera::{
    CameraConfig, GroundRaycaster, Lens, LensConfig, OrbitCameraRig, PanLimits, PerspectiveLens,
    Plane, RigPose, NO_GROUND_HIT,
};
pub use centipede::{CentipedeConfig, SegmentChain};
pub use error::GameError;
pub use headless::{HeadlessCursor, HeadlessNode, HeadlessScene};
pub use input::{CameraAction, Cursor, InputBindings, InputEvent, InputHandler, PanKeys};
pub use scene::{ActorLoader, ActorNode, CollisionSphere, SceneNode};
