//! Plinth Camera - Viewing state for the scene engine
//!
//! - [`Camera`] - perspective camera and pointer rays
//! - [`OrbitControls`] - manual rotate/pan/wheel zoom around a target
//! - [`ModeController`] - free 3D / locked top-down state machine
//! - [`AutoOrbit`] - per-frame walkthrough around the scene center

mod camera;
mod controls;
mod mode;
mod orbit;

pub use camera::{Camera, CameraPose};
pub use controls::{OrbitControls, ZoomLimits};
pub use mode::{ModeController, TopDownSettings, ViewMode};
pub use orbit::{AutoOrbit, OrbitSettings, FALLBACK_CENTER};
