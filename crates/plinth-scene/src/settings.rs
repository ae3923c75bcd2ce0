//! Scene tuning and capability flags

use plinth_camera::{CameraPose, OrbitSettings, TopDownSettings, ZoomLimits};
use plinth_core::Vec3;
use std::time::Duration;

/// Feature switches of one scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenePolicy {
    /// Objects can be dragged along the ground plane
    pub dragging: bool,
    /// The room answers clicks like any other object
    pub room_selectable: bool,
}

impl Default for ScenePolicy {
    fn default() -> Self {
        Self {
            dragging: true,
            room_selectable: true,
        }
    }
}

impl ScenePolicy {
    /// A scene that only shows a room: nothing to drag, room not clickable
    pub fn room_only() -> Self {
        Self {
            dragging: false,
            room_selectable: false,
        }
    }
}

/// Resolved settings consumed by [`crate::SceneContext`]
#[derive(Debug, Clone, PartialEq)]
pub struct PlinthSettings {
    /// Where new objects land
    pub placement_offset: Vec3,
    /// Height of the horizontal drag plane
    pub drag_plane_height: f32,
    pub default_pose: CameraPose,
    pub top_down: TopDownSettings,
    pub orbit: OrbitSettings,
    pub zoom: ZoomLimits,
    pub fetch_timeout: Duration,
}

impl Default for PlinthSettings {
    fn default() -> Self {
        Self {
            placement_offset: Vec3::new(5.0, 0.0, 5.0),
            drag_plane_height: 0.0,
            default_pose: CameraPose::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(0.0, 2.0, 0.0)),
            top_down: TopDownSettings::default(),
            orbit: OrbitSettings::default(),
            zoom: ZoomLimits::default(),
            fetch_timeout: Duration::from_secs(30),
        }
    }
}
