//! Free 3D / locked top-down view modes

use crate::camera::{Camera, CameraPose};
use crate::controls::OrbitControls;
use plinth_core::{PlinthError, Result, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Free orbit, rotate and pan enabled
    #[default]
    Free3d,
    /// Straight-down view, rotation locked out
    Locked2d,
}

/// Tuning for the top-down view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopDownSettings {
    /// Camera height above the origin
    pub height: f32,
    pub pan_speed: f32,
    /// Pan speed restored when returning to free 3D
    pub free_pan_speed: f32,
    /// Look-at height when there is no room, or the room sits at y = 0
    pub fallback_reference_y: f32,
}

impl Default for TopDownSettings {
    fn default() -> Self {
        Self {
            height: 15.0,
            pan_speed: 0.5,
            free_pan_speed: 1.0,
            fallback_reference_y: 2.0,
        }
    }
}

/// State machine between [`ViewMode::Free3d`] and [`ViewMode::Locked2d`].
///
/// Returning to 3D restores the saved default pose. The pose is only ever
/// captured by an explicit [`ModeController::save_default_pose`].
#[derive(Debug, Clone)]
pub struct ModeController {
    mode: ViewMode,
    default_pose: CameraPose,
    settings: TopDownSettings,
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new(
            CameraPose::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(0.0, 2.0, 0.0)),
            TopDownSettings::default(),
        )
    }
}

impl ModeController {
    pub fn new(default_pose: CameraPose, settings: TopDownSettings) -> Self {
        Self {
            mode: ViewMode::Free3d,
            default_pose,
            settings,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn default_pose(&self) -> &CameraPose {
        &self.default_pose
    }

    /// Remember the current 3D pose for the next return from top-down view
    pub fn save_default_pose(&mut self, camera: &Camera, controls: &OrbitControls) -> Result<()> {
        if self.mode != ViewMode::Free3d {
            return Err(PlinthError::InvalidState(
                "default camera pose can only be saved in 3D mode".to_string(),
            ));
        }
        self.default_pose = CameraPose {
            position: camera.position,
            target: controls.target,
            up: camera.up,
        };
        log::debug!("Saved default camera pose {:?}", self.default_pose);
        Ok(())
    }

    /// Switch view mode. Returns whether anything changed.
    ///
    /// `room_y` is the room's vertical position, if there is a room.
    /// Switching while auto-orbit runs is refused.
    pub fn set_mode(
        &mut self,
        mode: ViewMode,
        camera: &mut Camera,
        controls: &mut OrbitControls,
        room_y: Option<f32>,
        orbit_active: bool,
    ) -> Result<bool> {
        if mode == self.mode {
            return Ok(false);
        }
        if orbit_active {
            return Err(PlinthError::InvalidState(
                "cannot change view mode while auto-orbit is running".to_string(),
            ));
        }

        match mode {
            ViewMode::Locked2d => {
                let reference_y = room_y
                    .filter(|y| *y != 0.0)
                    .unwrap_or(self.settings.fallback_reference_y);
                camera.position = Vec3::new(0.0, self.settings.height, 0.0);
                camera.up = Vec3::NEG_Z;
                controls.target = Vec3::new(0.0, reference_y, 0.0);
                controls.enable_rotate = false;
                controls.enable_pan = true;
                controls.pan_speed = self.settings.pan_speed;
            }
            ViewMode::Free3d => {
                camera.position = self.default_pose.position;
                camera.up = self.default_pose.up;
                controls.target = self.default_pose.target;
                controls.enable_rotate = true;
                controls.enable_pan = true;
                controls.pan_speed = self.settings.free_pan_speed;
            }
        }
        controls.sync(camera);
        self.mode = mode;
        log::info!("View mode changed to {:?}", mode);
        Ok(true)
    }

    pub fn toggle(
        &mut self,
        camera: &mut Camera,
        controls: &mut OrbitControls,
        room_y: Option<f32>,
        orbit_active: bool,
    ) -> Result<ViewMode> {
        let next = match self.mode {
            ViewMode::Free3d => ViewMode::Locked2d,
            ViewMode::Locked2d => ViewMode::Free3d,
        };
        self.set_mode(next, camera, controls, room_y, orbit_active)?;
        Ok(self.mode)
    }
}
