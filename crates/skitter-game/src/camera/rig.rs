//! Orbiting strategy camera
//!
//! The camera sits on a sphere around a target point on the ground. Holding
//! the orbit button drags it around the sphere, the wheel changes the radius,
//! and the target pans when the cursor rests in a screen-edge band or a
//! direction key is held.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{IVec2, Vec2, Vec3};
use skitter_core::{clamp, Transform};
use tracing::{debug, info, trace};

use crate::error::GameError;
use crate::input::{CameraAction, Cursor, InputEvent, PanKeys};
use crate::scene::SceneNode;

use super::config::{CameraConfig, PanLimits};
use super::raycast::{GroundRaycaster, Lens};

/// Camera rig driven by discrete input edges and a per-frame `update`.
///
/// The camera node's transform is always a function of target, distance,
/// yaw and pitch; nothing else writes to it.
pub struct OrbitCameraRig<C, K> {
    config: CameraConfig,
    camera: C,
    cursor: K,
    target: Vec3,
    distance: f32,
    yaw: f32,
    pitch: f32,
    pan_limits: PanLimits,
    orbiting: bool,
    /// Cursor sample from the previous frame
    last_cursor: Vec2,
    /// Where the cursor was when the orbit drag began
    orbit_anchor: Vec2,
    keys: PanKeys,
}

impl<C: SceneNode, K: Cursor> OrbitCameraRig<C, K> {
    /// Take control of `camera` and place it at the configured initial pose
    pub fn new(config: CameraConfig, camera: C, cursor: K) -> Result<Self, GameError> {
        config.validate()?;

        let initial = config.initial;
        let mut rig = Self {
            pan_limits: config.pan_limits,
            config,
            camera,
            cursor,
            target: Vec3::ZERO,
            distance: initial.distance,
            yaw: initial.yaw,
            pitch: initial.pitch,
            orbiting: false,
            last_cursor: Vec2::ZERO,
            orbit_anchor: Vec2::ZERO,
            keys: PanKeys::default(),
        };
        rig.set_target(initial.target.x, initial.target.y, initial.target.z);
        rig.orbit_around(0.0, 0.0);

        info!(
            "Camera rig ready: distance {:.1}, yaw {:.1}, pitch {:.1}",
            rig.distance, rig.yaw, rig.pitch
        );
        Ok(rig)
    }

    /// Apply one discrete input edge
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pressed(CameraAction::Orbit) => {
                if !self.orbiting {
                    self.start_orbit();
                }
            }
            InputEvent::Released(CameraAction::Orbit) => {
                if self.orbiting {
                    self.stop_orbit();
                }
            }
            InputEvent::Pressed(CameraAction::ZoomIn) => self.zoom_in(),
            InputEvent::Pressed(CameraAction::ZoomOut) => self.zoom_out(),
            InputEvent::Released(CameraAction::ZoomIn | CameraAction::ZoomOut) => {}
            InputEvent::Pressed(action) => {
                self.keys.set(action, true);
            }
            InputEvent::Released(action) => {
                self.keys.set(action, false);
            }
        }
    }

    /// Enter orbit-drag mode
    pub fn start_orbit(&mut self) {
        self.cursor.hide();
        if let Some(position) = self.cursor.position() {
            self.orbit_anchor = position;
        }

        let size = self.cursor.window_size();
        self.cursor.warp(IVec2::new((size.x / 2) as i32, (size.y / 2) as i32));
        self.last_cursor = Vec2::ZERO;

        self.orbiting = true;
        debug!("Orbit started at {:?}", self.orbit_anchor);
    }

    /// Leave orbit-drag mode and put the cursor back where the drag began
    pub fn stop_orbit(&mut self) {
        self.orbiting = false;

        let size = self.cursor.window_size().as_vec2();
        let pixel = IVec2::new(
            ((self.orbit_anchor.x + 1.0) / 2.0 * size.x) as i32,
            (size.y - (self.orbit_anchor.y + 1.0) / 2.0 * size.y) as i32,
        );
        self.cursor.warp(pixel);
        if let Some(position) = self.cursor.position() {
            self.last_cursor = position;
        }

        self.cursor.show();
        debug!("Orbit stopped, cursor restored to {:?}", pixel);
    }

    /// Move closer by one step. Refused once the distance is already below the limit.
    pub fn zoom_in(&mut self) {
        if self.distance >= self.config.min_zoom {
            self.distance *= self.config.zoom_in_factor;
        } else {
            debug!("Zoom in refused at distance {:.2}", self.distance);
        }
        self.orbit_around(0.0, 0.0);
    }

    /// Move away by one step. Refused once the distance is already above the limit.
    pub fn zoom_out(&mut self) {
        if self.distance <= self.config.max_zoom {
            self.distance *= self.config.zoom_out_factor;
        } else {
            debug!("Zoom out refused at distance {:.2}", self.distance);
        }
        self.orbit_around(0.0, 0.0);
    }

    /// Focus point of the camera
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Set the focus point. X and Y are clamped to the pan limits, Z is kept as given.
    ///
    /// The camera node is not moved until the next orbit, pan or zoom.
    pub fn set_target(&mut self, x: f32, y: f32, z: f32) {
        self.target = Vec3::new(self.pan_limits.clamp_x(x), self.pan_limits.clamp_y(y), z);
    }

    /// Replace the pan rectangle. The current target is not re-clamped.
    pub fn set_pan_limits(&mut self, x_min: f32, x_max: f32, y_min: f32, y_max: f32) {
        self.pan_limits = PanLimits::new(x_min, x_max, y_min, y_max);
    }

    pub fn pan_limits(&self) -> PanLimits {
        self.pan_limits
    }

    /// Rotate about the target by the given degrees and reposition the camera.
    ///
    /// Called with zeros after any pan or zoom to re-derive the camera from state.
    pub fn orbit_around(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = clamp(
            self.pitch - delta_pitch,
            self.config.pitch_min,
            self.config.pitch_max,
        );

        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        let position = Vec3::new(
            self.distance * yaw.sin() * pitch.cos() + self.target.x,
            -self.distance * yaw.cos() * pitch.cos() + self.target.y,
            -self.distance * pitch.sin() + self.target.z,
        );

        let mut transform = Transform::from_position_hpr(position, Vec3::new(self.yaw, self.pitch, 0.0));
        transform.look_at(self.target);
        self.camera.set_transform(transform);
    }

    /// Per-frame driver. Does nothing while the cursor is outside the window.
    pub fn update(&mut self, dt: f32) {
        let Some(cursor) = self.cursor.position() else {
            return;
        };

        if self.orbiting {
            let delta = (self.last_cursor - cursor) * self.config.orbit_rate * dt;
            self.orbit_around(delta.x, delta.y);
        } else {
            self.pan(cursor, dt);
        }

        self.last_cursor = cursor;
    }

    /// Edge-zone and key panning.
    ///
    /// The edge test reads this frame's cursor sample, so panning starts on
    /// the frame the cursor enters the zone.
    fn pan(&mut self, cursor: Vec2, dt: f32) {
        let heading = self.yaw.to_radians();
        let zone = self.config.pan_zone_size;
        let scale = self.distance / self.config.pan_rate_divisor;

        // (direction angle, rate)
        let mut vertical = None;
        let mut horizontal = None;

        if cursor.y > 1.0 - zone {
            vertical = Some((heading, (1.0 - cursor.y - zone) * scale));
        }
        if cursor.y < -1.0 + zone {
            vertical = Some((heading + PI, (1.0 + cursor.y - zone) * scale));
        }
        if cursor.x > 1.0 - zone {
            horizontal = Some((heading + FRAC_PI_2, (1.0 - cursor.x - zone) * scale));
        }
        if cursor.x < -1.0 + zone {
            horizontal = Some((heading - FRAC_PI_2, (1.0 + cursor.x - zone) * scale));
        }

        match self.keys.vertical() {
            1 => vertical = Some((heading + PI, self.config.key_pan_rate)),
            -1 => vertical = Some((heading, self.config.key_pan_rate)),
            _ => {}
        }
        match self.keys.horizontal() {
            -1 => horizontal = Some((heading + FRAC_PI_2, self.config.key_pan_rate)),
            1 => horizontal = Some((heading - FRAC_PI_2, self.config.key_pan_rate)),
            _ => {}
        }

        if let Some((angle, rate)) = vertical {
            let step = rate * dt * self.config.pan_speed_scale;
            self.target.x = self.pan_limits.clamp_x(self.target.x + angle.sin() * step);
            self.target.y = self.pan_limits.clamp_y(self.target.y - angle.cos() * step);
            self.orbit_around(0.0, 0.0);
        }
        if let Some((angle, rate)) = horizontal {
            let step = rate * dt * self.config.pan_speed_scale;
            self.target.x = self.pan_limits.clamp_x(self.target.x - angle.sin() * step);
            self.target.y = self.pan_limits.clamp_y(self.target.y + angle.cos() * step);
            self.orbit_around(0.0, 0.0);
        }

        if vertical.is_some() || horizontal.is_some() {
            trace!("Panned target to {:?}", self.target);
        }
    }

    /// Ground point under the cursor, or the miss sentinel
    pub fn pick_ground_point<L: Lens>(&self, raycaster: &GroundRaycaster<L>) -> Vec3 {
        raycaster.pick(self.cursor.position(), &self.camera.transform())
    }

    /// Ground point under the cursor, if any
    pub fn try_pick_ground_point<L: Lens>(&self, raycaster: &GroundRaycaster<L>) -> Option<Vec3> {
        raycaster.try_pick(self.cursor.position(), &self.camera.transform())
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn is_orbiting(&self) -> bool {
        self.orbiting
    }

    pub fn pan_keys(&self) -> PanKeys {
        self.keys
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn cursor(&self) -> &K {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut K {
        &mut self.cursor
    }

    /// Release the camera and cursor back to the host.
    ///
    /// The rig stops receiving input; a drag in progress gives the cursor back.
    pub fn destroy(mut self) -> (C, K) {
        if self.orbiting {
            self.stop_orbit();
        }
        self.keys.clear();
        info!("Camera rig released");
        (self.camera, self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::config::RigPose;
    use crate::camera::raycast::{PerspectiveLens, NO_GROUND_HIT};
    use crate::headless::{HeadlessCursor, HeadlessNode};
    use glam::UVec2;

    type Rig = OrbitCameraRig<HeadlessNode, HeadlessCursor>;

    fn rig_with(pose: RigPose) -> Rig {
        let config = CameraConfig {
            initial: pose,
            ..Default::default()
        };
        let cursor = HeadlessCursor::new(UVec2::new(800, 600));
        OrbitCameraRig::new(config, HeadlessNode::new("camera"), cursor).unwrap()
    }

    fn default_pose() -> RigPose {
        RigPose {
            target: Vec3::ZERO,
            distance: 150.0,
            yaw: 0.0,
            pitch: -30.0,
        }
    }

    #[test]
    fn test_initial_pose() {
        let rig = rig_with(default_pose());
        let position = rig.camera().transform().position;
        assert!(position.x.abs() < 1e-3);
        assert!((position.y - (-129.904)).abs() < 1e-2);
        assert!((position.z - 75.0).abs() < 1e-2);

        let forward = rig.camera().transform().forward();
        let expected = (rig.target() - position).normalize();
        assert!((forward - expected).length() < 1e-4);
    }

    #[test]
    fn test_orbit_around_zero_is_idempotent() {
        let mut rig = rig_with(RigPose {
            target: Vec3::new(12.0, -40.0, 3.0),
            distance: 87.0,
            yaw: 213.0,
            pitch: -47.0,
        });
        rig.orbit_around(0.0, 0.0);
        let first = rig.camera().transform();
        rig.orbit_around(0.0, 0.0);
        assert_eq!(rig.camera().transform(), first);
    }

    #[test]
    fn test_pitch_always_clamped() {
        let mut rig = rig_with(default_pose());
        rig.orbit_around(0.0, 10_000.0);
        assert_eq!(rig.pitch(), -85.0);
        rig.orbit_around(0.0, -10_000.0);
        assert_eq!(rig.pitch(), -10.0);
        rig.orbit_around(5.0, 3.0);
        assert!((-85.0..=-10.0).contains(&rig.pitch()));
    }

    #[test]
    fn test_zoom_converges_within_one_step() {
        let mut rig = rig_with(default_pose());
        for _ in 0..100 {
            rig.zoom_in();
        }
        assert!(rig.distance() < 25.0);
        assert!(rig.distance() >= 25.0 * 0.9);

        for _ in 0..100 {
            rig.zoom_out();
        }
        assert!(rig.distance() > 500.0);
        assert!(rig.distance() <= 500.0 * 1.1);

        let position = rig.camera().transform().position;
        assert!((position.distance(rig.target()) - rig.distance()).abs() < 1e-2);
    }

    #[test]
    fn test_set_target_clamps_xy_only() {
        let mut rig = rig_with(default_pose());
        rig.set_target(5000.0, -5000.0, 1.0e9);
        assert_eq!(rig.target(), Vec3::new(1000.0, -1000.0, 1.0e9));

        rig.set_pan_limits(-10.0, 10.0, -20.0, 20.0);
        assert_eq!(rig.target().x, 1000.0);
        rig.set_target(15.0, 15.0, -3.0);
        assert_eq!(rig.target(), Vec3::new(10.0, 15.0, -3.0));
    }

    #[test]
    fn test_orbit_drag_changes_yaw() {
        let mut rig = rig_with(default_pose());
        rig.handle_event(InputEvent::Pressed(CameraAction::Orbit));
        assert!(rig.is_orbiting());
        assert!(rig.cursor().is_hidden());
        assert_eq!(rig.cursor().position(), Some(Vec2::ZERO));

        rig.cursor_mut().set_position(Some(Vec2::new(0.1, 0.0)));
        rig.update(0.016);
        assert!((rig.yaw() - (-0.12)).abs() < 1e-5);
        assert_eq!(rig.pitch(), -30.0);
    }

    #[test]
    fn test_stop_orbit_restores_cursor() {
        let mut rig = rig_with(default_pose());
        rig.cursor_mut().set_position(Some(Vec2::new(0.5, 0.5)));
        rig.start_orbit();
        rig.cursor_mut().set_position(Some(Vec2::new(-0.3, 0.2)));
        rig.update(0.016);

        rig.handle_event(InputEvent::Released(CameraAction::Orbit));
        assert!(!rig.is_orbiting());
        assert!(!rig.cursor().is_hidden());
        let restored = rig.cursor().position().unwrap();
        assert!((restored - Vec2::new(0.5, 0.5)).length() < 1e-3);
    }

    #[test]
    fn test_edge_pan_moves_target_forward() {
        let mut rig = rig_with(default_pose());
        rig.cursor_mut().set_position(Some(Vec2::new(0.0, 0.95)));
        rig.update(0.1);
        // (1 - 0.95 - 0.1) * 150 / 10 = -0.75 along heading 0, scaled by 0.1 * 50
        assert!(rig.target().x.abs() < 1e-4);
        assert!((rig.target().y - 3.75).abs() < 1e-3);
    }

    #[test]
    fn test_edge_pan_left() {
        let mut rig = rig_with(default_pose());
        rig.cursor_mut().set_position(Some(Vec2::new(-0.95, 0.0)));
        rig.update(0.1);
        assert!((rig.target().x - (-3.75)).abs() < 1e-3);
        assert!(rig.target().y.abs() < 1e-4);
    }

    #[test]
    fn test_key_pan_right() {
        let mut rig = rig_with(default_pose());
        rig.handle_event(InputEvent::Pressed(CameraAction::PanRight));
        rig.update(0.1);
        assert!((rig.target().x - 7.5).abs() < 1e-3);
        assert!(rig.target().y.abs() < 1e-3);

        rig.handle_event(InputEvent::Released(CameraAction::PanRight));
        rig.update(0.1);
        assert!((rig.target().x - 7.5).abs() < 1e-3);
    }

    #[test]
    fn test_key_pan_follows_yaw() {
        let mut rig = rig_with(RigPose {
            yaw: 90.0,
            ..default_pose()
        });
        rig.handle_event(InputEvent::Pressed(CameraAction::PanUp));
        rig.update(0.1);
        // Heading 90 faces -X
        assert!((rig.target().x - (-7.5)).abs() < 1e-3);
        assert!(rig.target().y.abs() < 1e-3);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut rig = rig_with(default_pose());
        rig.handle_event(InputEvent::Pressed(CameraAction::PanUp));
        rig.handle_event(InputEvent::Pressed(CameraAction::PanDown));
        rig.update(0.1);
        assert_eq!(rig.target(), Vec3::ZERO);
    }

    #[test]
    fn test_key_overrides_edge_pan() {
        let mut rig = rig_with(default_pose());
        rig.cursor_mut().set_position(Some(Vec2::new(0.0, 0.95)));
        rig.handle_event(InputEvent::Pressed(CameraAction::PanDown));
        rig.update(0.1);
        assert!((rig.target().y - (-7.5)).abs() < 1e-3);
    }

    #[test]
    fn test_pan_stays_inside_limits() {
        let mut rig = rig_with(default_pose());
        rig.set_pan_limits(-5.0, 5.0, -5.0, 5.0);
        rig.handle_event(InputEvent::Pressed(CameraAction::PanUp));
        rig.handle_event(InputEvent::Pressed(CameraAction::PanLeft));
        for _ in 0..20 {
            rig.update(0.1);
        }
        assert!(rig.pan_limits().contains(rig.target()));
        assert!((rig.target().y - 5.0).abs() < 1e-4);
        assert!((rig.target().x - (-5.0)).abs() < 1e-4);
    }

    #[test]
    fn test_update_without_cursor_is_noop() {
        let mut rig = rig_with(default_pose());
        rig.handle_event(InputEvent::Pressed(CameraAction::PanUp));
        rig.cursor_mut().set_position(None);
        let before = rig.camera().transform();
        rig.update(0.5);
        assert_eq!(rig.target(), Vec3::ZERO);
        assert_eq!(rig.camera().transform(), before);
    }

    #[test]
    fn test_zoom_events() {
        let mut rig = rig_with(default_pose());
        rig.handle_event(InputEvent::Pressed(CameraAction::ZoomIn));
        assert!((rig.distance() - 135.0).abs() < 1e-3);
        rig.handle_event(InputEvent::Pressed(CameraAction::ZoomOut));
        assert!((rig.distance() - 148.5).abs() < 1e-3);
    }

    #[test]
    fn test_pick_ground_point() {
        let mut rig = rig_with(RigPose {
            target: Vec3::new(10.0, 20.0, 0.0),
            distance: 120.0,
            yaw: 30.0,
            pitch: -40.0,
        });
        let raycaster = GroundRaycaster::new(PerspectiveLens::default());

        let hit = rig.pick_ground_point(&raycaster);
        assert!((hit - Vec3::new(10.0, 20.0, 0.0)).length() < 1e-2);

        rig.cursor_mut().set_position(None);
        assert_eq!(rig.pick_ground_point(&raycaster), NO_GROUND_HIT);
        assert_eq!(rig.try_pick_ground_point(&raycaster), None);
    }

    #[test]
    fn test_destroy_returns_cursor_visible() {
        let mut rig = rig_with(default_pose());
        rig.start_orbit();
        let (_camera, cursor) = rig.destroy();
        assert!(!cursor.is_hidden());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CameraConfig {
            pan_rate_divisor: 0.0,
            ..Default::default()
        };
        let cursor = HeadlessCursor::new(UVec2::new(800, 600));
        assert!(OrbitCameraRig::new(config, HeadlessNode::new("camera"), cursor).is_err());
    }
}
