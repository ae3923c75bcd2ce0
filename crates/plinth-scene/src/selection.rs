//! Selection state

use crate::registry::PlacedObject;
use plinth_core::{round_to, ObjectId, Vec3};
use serde::{Deserialize, Serialize};

/// The selected object as seen at the last refresh.
///
/// Holds only the id of the object; the registry stays the owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub id: ObjectId,
    pub name: String,
    pub is_room: bool,
    pub position: Vec3,
    /// Radians
    pub rotation: Vec3,
    pub scale: Vec3,
    /// World-space bounding size
    pub dimensions: Vec3,
    /// Bounding size with scale divided out
    pub original_dimensions: Vec3,
}

impl Selection {
    pub fn from_object(object: &PlacedObject) -> Self {
        Self {
            id: object.id.clone(),
            name: object.name.clone(),
            is_room: object.id.is_room(),
            position: object.transform.position,
            rotation: object.transform.rotation,
            scale: object.transform.scale,
            dimensions: object.dimensions(),
            original_dimensions: object.original_dimensions(),
        }
    }
}

/// Transform of the selection in display units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectedTransform {
    pub position: Vec3,
    /// Rounded to 2 decimals
    pub scale: Vec3,
    /// Degrees, rounded to 1 decimal
    pub rotation: Vec3,
}

impl SelectedTransform {
    pub fn from_object(object: &PlacedObject) -> Self {
        let s = object.transform.scale;
        let r = object.transform.rotation_degrees();
        Self {
            position: object.transform.position,
            scale: Vec3::new(round_to(s.x, 2), round_to(s.y, 2), round_to(s.z, 2)),
            rotation: Vec3::new(round_to(r.x, 1), round_to(r.y, 1), round_to(r.z, 1)),
        }
    }
}
