//! Camera configuration

use glam::Vec3;
use serde::{Deserialize, Serialize};
use skitter_core::{clamp, Transform};

use crate::error::GameError;

/// Rectangle the camera target may pan within
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanLimits {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl PanLimits {
    pub fn new(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn clamp_x(&self, x: f32) -> f32 {
        clamp(x, self.x_min, self.x_max)
    }

    pub fn clamp_y(&self, y: f32) -> f32 {
        clamp(y, self.y_min, self.y_max)
    }

    /// Whether the point's X and Y lie inside the rectangle
    pub fn contains(&self, point: Vec3) -> bool {
        (self.x_min..=self.x_max).contains(&point.x) && (self.y_min..=self.y_max).contains(&point.y)
    }
}

impl Default for PanLimits {
    fn default() -> Self {
        Self::new(-1000.0, 1000.0, -1000.0, 1000.0)
    }
}

/// Spherical camera pose around a target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigPose {
    /// Point the camera looks at
    pub target: Vec3,
    /// Radius of the orbit sphere
    pub distance: f32,
    /// Heading in degrees
    pub yaw: f32,
    /// Pitch in degrees (negative looks down)
    pub pitch: f32,
}

impl RigPose {
    /// Angles of a camera placed at `eye` looking at `target`, at a chosen distance
    pub fn looking_from(eye: Vec3, target: Vec3, distance: f32) -> Self {
        let mut camera = Transform::from_position(eye);
        camera.look_at(target);
        Self {
            target,
            distance,
            yaw: camera.heading(),
            pitch: camera.pitch(),
        }
    }
}

impl Default for RigPose {
    fn default() -> Self {
        Self::looking_from(Vec3::new(0.0, -150.0, 200.0), Vec3::ZERO, 150.0)
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Divisor applied to edge pan speed; higher pans slower. Must not be zero.
    pub pan_rate_divisor: f32,
    /// Width of the screen-edge band (in NDC units) that triggers panning
    pub pan_zone_size: f32,
    /// Closest zoom distance
    pub min_zoom: f32,
    /// Farthest zoom distance
    pub max_zoom: f32,
    /// Degrees of orbit per NDC unit of cursor travel per second
    pub orbit_rate: f32,
    /// Pan rate while a direction key is held
    pub key_pan_rate: f32,
    /// Lowest pitch in degrees (looking steeply down)
    pub pitch_min: f32,
    /// Highest pitch in degrees (shallowest view)
    pub pitch_max: f32,
    /// Distance multiplier for one zoom-in step
    pub zoom_in_factor: f32,
    /// Distance multiplier for one zoom-out step
    pub zoom_out_factor: f32,
    /// World units per unit of pan rate per second
    pub pan_speed_scale: f32,
    /// Limits for the camera target
    pub pan_limits: PanLimits,
    /// Pose at session start
    pub initial: RigPose,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            pan_rate_divisor: 10.0,
            pan_zone_size: 0.1,
            min_zoom: 25.0,
            max_zoom: 500.0,
            orbit_rate: 75.0,
            key_pan_rate: 1.5,
            pitch_min: -85.0,
            pitch_max: -10.0,
            zoom_in_factor: 0.9,
            zoom_out_factor: 1.1,
            pan_speed_scale: 50.0,
            pan_limits: PanLimits::default(),
            initial: RigPose::default(),
        }
    }
}

impl CameraConfig {
    /// Reject settings the rig cannot run with
    pub fn validate(&self) -> Result<(), GameError> {
        if self.pan_rate_divisor == 0.0 || !self.pan_rate_divisor.is_finite() {
            return Err(GameError::InvalidConfig(
                "pan_rate_divisor must be a non-zero finite number".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.pan_zone_size) {
            return Err(GameError::InvalidConfig(format!(
                "pan_zone_size must be in [0, 1), got {}",
                self.pan_zone_size
            )));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(GameError::InvalidConfig(format!(
                "zoom range [{}, {}] is empty or not positive",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.orbit_rate <= 0.0 {
            return Err(GameError::InvalidConfig("orbit_rate must be positive".into()));
        }
        if self.pitch_min > self.pitch_max {
            return Err(GameError::InvalidConfig(format!(
                "pitch range [{}, {}] is inverted",
                self.pitch_min, self.pitch_max
            )));
        }
        if !(0.0 < self.zoom_in_factor && self.zoom_in_factor < 1.0 && self.zoom_out_factor > 1.0) {
            return Err(GameError::InvalidConfig(
                "zoom factors must shrink (in) and grow (out) the distance".into(),
            ));
        }
        let limits = &self.pan_limits;
        if limits.x_min > limits.x_max || limits.y_min > limits.y_max {
            return Err(GameError::InvalidConfig("pan limits are inverted".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CameraConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial.distance, 150.0);
        assert!(config.initial.yaw.abs() < 1e-4);
        assert!((config.initial.pitch - (-53.130_1)).abs() < 1e-3);
    }

    #[test]
    fn test_zero_divisor_rejected() {
        let config = CameraConfig {
            pan_rate_divisor: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_ranges_rejected() {
        let zone = CameraConfig {
            pan_zone_size: 1.0,
            ..Default::default()
        };
        assert!(zone.validate().is_err());

        let zoom = CameraConfig {
            min_zoom: 600.0,
            ..Default::default()
        };
        assert!(zoom.validate().is_err());

        let limits = CameraConfig {
            pan_limits: PanLimits::new(10.0, -10.0, 0.0, 1.0),
            ..Default::default()
        };
        assert!(limits.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: CameraConfig = toml::from_str(
            r#"
            orbit_rate = 50.0

            [pan_limits]
            x_min = -200.0
            x_max = 200.0
            y_min = -100.0
            y_max = 100.0
            "#,
        )
        .unwrap();
        assert_eq!(config.orbit_rate, 50.0);
        assert_eq!(config.pan_limits.clamp_x(500.0), 200.0);
        assert_eq!(config.key_pan_rate, 1.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pan_limits_clamp() {
        let limits = PanLimits::new(-5.0, 5.0, -1.0, 1.0);
        assert_eq!(limits.clamp_x(-10.0), -5.0);
        assert_eq!(limits.clamp_y(0.5), 0.5);
        assert!(limits.contains(Vec3::new(0.0, 0.0, 999.0)));
        assert!(!limits.contains(Vec3::new(6.0, 0.0, 0.0)));
    }
}
