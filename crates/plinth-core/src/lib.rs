//! Plinth Core - Foundational types for the Plinth scene engine
//!
//! This crate provides the pieces every other Plinth crate builds on:
//! - `ObjectId` - Stable identifiers for placed objects and the room shell
//! - `ContentHash` - SHA-256 based hashing of fetched model bytes
//! - `Transform`, `Color` - Spatial and material types
//! - `Aabb`, `Ray` - Bounding boxes and hit-testing
//! - Error types and Result alias

mod bounds;
mod error;
mod hash;
mod id;
mod ray;
mod types;

pub use bounds::Aabb;
pub use error::{PlinthError, Result};
pub use hash::ContentHash;
pub use id::{ObjectId, ROOM_ID};
pub use ray::Ray;
pub use types::{round_to, transform_direction, transform_point, Color, Transform};

pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
