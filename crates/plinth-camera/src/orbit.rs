//! Auto-orbit walkthrough
//!
//! While enabled, every tick moves the camera a small step around the
//! scene center on a horizontal circle, then aims camera and controls at
//! the center. The center is supplied fresh on each tick.

use crate::camera::Camera;
use crate::controls::OrbitControls;
use plinth_core::Vec3;
use serde::{Deserialize, Serialize};

/// Center used when the scene has neither a room nor objects
pub const FALLBACK_CENTER: Vec3 = Vec3::new(0.0, 1.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitSettings {
    /// Radians per tick
    pub speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Camera height above the center
    pub height_offset: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            speed: 0.005,
            min_speed: 0.001,
            max_speed: 0.01,
            min_distance: 5.0,
            max_distance: 20.0,
            height_offset: 2.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AutoOrbit {
    settings: OrbitSettings,
    speed: f32,
    /// Set on activation, cleared on disable
    distance: Option<f32>,
    last_center: Option<Vec3>,
}

impl Default for AutoOrbit {
    fn default() -> Self {
        Self::new(OrbitSettings::default())
    }
}

impl AutoOrbit {
    pub fn new(settings: OrbitSettings) -> Self {
        let mut orbit = Self {
            settings,
            speed: settings.speed,
            distance: None,
            last_center: None,
        };
        orbit.set_speed(settings.speed);
        orbit
    }

    pub fn is_enabled(&self) -> bool {
        self.distance.is_some()
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn distance(&self) -> Option<f32> {
        self.distance
    }

    /// Center used by the most recent tick
    pub fn last_center(&self) -> Option<Vec3> {
        self.last_center
    }

    /// Set the per-tick angle, clamped into the configured range
    pub fn set_speed(&mut self, speed: f32) {
        let clamped = speed.clamp(self.settings.min_speed, self.settings.max_speed);
        if clamped != speed {
            log::debug!("Orbit speed {} clamped to {}", speed, clamped);
        }
        self.speed = clamped;
    }

    /// Start orbiting. Distance is measured from the camera's current
    /// position and clamped into the configured range.
    pub fn enable(&mut self, camera: &Camera, center: Vec3) {
        let distance = camera
            .position
            .distance(center)
            .clamp(self.settings.min_distance, self.settings.max_distance);
        self.distance = Some(distance);
        self.last_center = None;
        log::info!("Auto-orbit started around {} at distance {:.2}", center, distance);
    }

    /// Stop orbiting. Nothing carries over to the next `enable`.
    pub fn disable(&mut self) {
        if self.distance.take().is_some() {
            log::info!("Auto-orbit stopped");
        }
        self.last_center = None;
    }

    /// Advance one step. Returns false without touching the camera when
    /// disabled or while the controls are suspended by a drag.
    pub fn tick(&mut self, camera: &mut Camera, controls: &mut OrbitControls, center: Vec3) -> bool {
        let Some(distance) = self.distance else {
            return false;
        };
        if !controls.enabled {
            return false;
        }

        let angle = (camera.position.x - center.x).atan2(camera.position.z - center.z) + self.speed;
        camera.position = Vec3::new(
            center.x + distance * angle.sin(),
            center.y + self.settings.height_offset,
            center.z + distance * angle.cos(),
        );
        camera.look_at(center);
        controls.target = center;
        self.last_center = Some(center);
        true
    }
}
