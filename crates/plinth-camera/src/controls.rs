//! Orbit controls
//!
//! Manual rotate/pan/zoom around a target point. The controls own the
//! target; `sync` pushes it into the camera, like a per-frame update.

use crate::camera::Camera;
use plinth_core::Vec3;
use serde::{Deserialize, Serialize};

/// Wheel zoom tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimits {
    /// Distance moved per wheel event
    pub step: f32,
    /// Exclusive lower bound on camera-target distance
    pub min: f32,
    /// Exclusive upper bound on camera-target distance
    pub max: f32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            step: 0.1,
            min: 1.0,
            max: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    /// Master switch. Off while an object is being dragged.
    pub enabled: bool,
    pub enable_rotate: bool,
    pub enable_pan: bool,
    pub pan_speed: f32,
    pub zoom: ZoomLimits,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 2.0, 0.0),
            enabled: true,
            enable_rotate: true,
            enable_pan: true,
            pan_speed: 1.0,
            zoom: ZoomLimits::default(),
        }
    }
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn can_rotate(&self) -> bool {
        self.enabled && self.enable_rotate
    }

    pub fn can_pan(&self) -> bool {
        self.enabled && self.enable_pan
    }

    /// Point the camera at the controls' target
    pub fn sync(&self, camera: &mut Camera) {
        camera.look_at(self.target);
    }

    /// Rotate the camera around the target by azimuth/polar deltas (radians).
    /// Returns false when rotation is locked out.
    pub fn rotate(&self, camera: &mut Camera, azimuth: f32, polar: f32) -> bool {
        if !self.can_rotate() {
            return false;
        }
        let offset = camera.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return false;
        }

        let theta = offset.x.atan2(offset.z) + azimuth;
        let polar_angle = (offset.y / radius).clamp(-1.0, 1.0).acos();
        let phi = (polar_angle + polar).clamp(0.01, std::f32::consts::PI - 0.01);

        camera.position = self.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
        self.sync(camera);
        true
    }

    /// Move camera and target together in the view plane, scaled by `pan_speed`
    pub fn pan(&mut self, camera: &mut Camera, dx: f32, dy: f32) -> bool {
        if !self.can_pan() {
            return false;
        }
        let forward = camera.view_direction();
        let right = forward.cross(camera.up).try_normalize().unwrap_or(Vec3::X);
        let up = right.cross(forward);
        let delta = (right * dx + up * dy) * self.pan_speed;

        self.target += delta;
        camera.position += delta;
        self.sync(camera);
        true
    }

    /// One wheel step along the view axis. Positive `delta_y` (wheel down)
    /// moves away from the target. The step is skipped when it would leave
    /// the allowed distance range.
    pub fn wheel(&self, camera: &mut Camera, delta_y: f32) -> bool {
        if !self.enabled || delta_y == 0.0 {
            return false;
        }
        let step = if delta_y > 0.0 { self.zoom.step } else { -self.zoom.step };
        let offset = camera.position - self.target;
        let distance = offset.length();
        let next = distance + step;
        if next <= self.zoom.min || next >= self.zoom.max {
            return false;
        }
        let Some(direction) = offset.try_normalize() else {
            return false;
        };
        camera.position += direction * step;
        true
    }
}
