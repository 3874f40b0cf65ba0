//! Cursor-to-ground picking

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use skitter_core::Transform;
use tracing::trace;

/// Returned by [`GroundRaycaster::pick`] when nothing was hit
pub const NO_GROUND_HIT: Vec3 = Vec3::new(-1.0, -1.0, -1.0);

/// Projection used to turn a cursor position into a ray.
pub trait Lens {
    /// Near and far frustum points under a cursor position, in camera space
    /// (+Y forward, +Z up). `None` if the lens cannot extrude that point.
    fn extrude(&self, cursor: Vec2) -> Option<(Vec3, Vec3)>;
}

/// Perspective lens configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    /// Horizontal field of view in degrees
    pub fov_horizontal: f32,
    /// Width over height
    pub aspect_ratio: f32,
    /// Near plane distance
    pub near: f32,
    /// Far plane distance
    pub far: f32,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            fov_horizontal: 40.0,
            aspect_ratio: 4.0 / 3.0,
            near: 1.0,
            far: 100_000.0,
        }
    }
}

/// Symmetric perspective lens
#[derive(Debug, Clone, Default)]
pub struct PerspectiveLens {
    pub config: LensConfig,
}

impl PerspectiveLens {
    pub fn new(config: LensConfig) -> Self {
        Self { config }
    }
}

impl Lens for PerspectiveLens {
    fn extrude(&self, cursor: Vec2) -> Option<(Vec3, Vec3)> {
        let LensConfig {
            fov_horizontal,
            aspect_ratio,
            near,
            far,
        } = self.config;
        if !(near > 0.0 && far > near && aspect_ratio > 0.0) {
            return None;
        }

        let tan_x = (fov_horizontal.to_radians() * 0.5).tan();
        let tan_z = tan_x / aspect_ratio;
        let at = |depth: f32| Vec3::new(cursor.x * tan_x * depth, depth, cursor.y * tan_z * depth);
        Some((at(near), at(far)))
    }
}

/// Infinite plane given by a normal and a point on it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub point: Vec3,
}

impl Plane {
    /// The ground plane z = 0
    pub const GROUND: Plane = Plane {
        normal: Vec3::Z,
        point: Vec3::ZERO,
    };

    /// Where the infinite line through `a` and `b` crosses the plane, if it does
    pub fn intersect_line(&self, a: Vec3, b: Vec3) -> Option<Vec3> {
        let dir = b - a;
        let denom = self.normal.dot(dir);
        if denom.abs() <= 1e-6 {
            return None;
        }
        let t = self.normal.dot(self.point - a) / denom;
        Some(a + dir * t)
    }
}

/// Projects the cursor through a lens onto a world plane
#[derive(Debug, Clone)]
pub struct GroundRaycaster<L> {
    lens: L,
    plane: Plane,
}

impl<L: Lens> GroundRaycaster<L> {
    /// Pick against the z = 0 ground plane
    pub fn new(lens: L) -> Self {
        Self::with_plane(lens, Plane::GROUND)
    }

    pub fn with_plane(lens: L, plane: Plane) -> Self {
        Self { lens, plane }
    }

    pub fn lens(&self) -> &L {
        &self.lens
    }

    /// World point under the cursor for a camera at `camera`, if the ray meets the plane
    pub fn try_pick(&self, cursor: Option<Vec2>, camera: &Transform) -> Option<Vec3> {
        let cursor = cursor?;
        let (near, far) = self.lens.extrude(cursor)?;
        let hit = self
            .plane
            .intersect_line(camera.transform_point(near), camera.transform_point(far));
        if hit.is_none() {
            trace!("Cursor ray at {:?} runs parallel to the ground", cursor);
        }
        hit
    }

    /// Like [`try_pick`](Self::try_pick) but reports a miss as [`NO_GROUND_HIT`]
    pub fn pick(&self, cursor: Option<Vec2>, camera: &Transform) -> Vec3 {
        self.try_pick(cursor, camera).unwrap_or(NO_GROUND_HIT)
    }
}
