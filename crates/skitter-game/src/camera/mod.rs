//! Camera system module
//!
//! Provides the orbiting strategy camera and cursor-to-ground picking.

mod config;
mod raycast;
mod rig;

pub use config::{CameraConfig, PanLimits, RigPose};
pub use raycast::{GroundRaycaster, Lens, LensConfig, PerspectiveLens, Plane, NO_GROUND_HIT};
pub use rig::OrbitCameraRig;
