//! Model registry: placed objects, the room shell and the ownership tree
//!
//! Hit-testing never walks a scene graph. Every mesh part is addressed by a
//! [`PartKey`] naming the object that owns it, so a hit on any part resolves
//! straight to its top-level object.

use crate::descriptor::ModelDescriptor;
use crate::mesh::{MeshHandle, ResourceTracker};
use crate::room::RoomParams;
use plinth_core::{round_to, Aabb, Mat4, ObjectId, PlinthError, Ray, Result, Transform, Vec3};
use plinth_camera::FALLBACK_CENTER;

/// A placed, renderable object
#[derive(Debug)]
pub struct PlacedObject {
    pub id: ObjectId,
    pub name: String,
    pub transform: Transform,
    pub mesh: MeshHandle,
    /// Descriptor the object was loaded from
    pub descriptor: ModelDescriptor,
    /// True for the tinted cube standing in for a failed load
    pub placeholder: bool,
}

impl PlacedObject {
    pub fn world_matrix(&self) -> Mat4 {
        self.transform.to_matrix()
    }

    /// World matrix of one part: object transform, then the part's own
    pub fn part_matrix(&self, part: usize) -> Option<Mat4> {
        self.mesh
            .parts()
            .get(part)
            .map(|p| self.world_matrix() * p.local)
    }

    pub fn world_bounds(&self) -> Option<Aabb> {
        let world = self.world_matrix();
        self.mesh
            .parts()
            .iter()
            .filter_map(|p| {
                Aabb::from_positions(&p.positions).map(|b| b.transformed(&(world * p.local)))
            })
            .reduce(|a, b| a.union(&b))
    }

    /// World-space size, rounded to 2 decimals
    pub fn dimensions(&self) -> Vec3 {
        let size = self.world_bounds().map(|b| b.size()).unwrap_or(Vec3::ZERO);
        Vec3::new(round_to(size.x, 2), round_to(size.y, 2), round_to(size.z, 2))
    }

    /// World-space size with the object's scale divided out, rounded to 2 decimals
    pub fn original_dimensions(&self) -> Vec3 {
        let size = self.world_bounds().map(|b| b.size()).unwrap_or(Vec3::ZERO);
        let unscaled = size / self.transform.scale;
        Vec3::new(
            round_to(unscaled.x, 2),
            round_to(unscaled.y, 2),
            round_to(unscaled.z, 2),
        )
    }

    /// Nearest ray hit on this object's triangles: (distance, part index)
    pub fn raycast(&self, ray: &Ray) -> Option<(f32, usize)> {
        let world = self.world_matrix();
        let mut best: Option<(f32, usize)> = None;
        for (index, part) in self.mesh.parts().iter().enumerate() {
            let mat = world * part.local;
            let coarse = Aabb::from_positions(&part.positions).map(|b| b.transformed(&mat));
            if coarse.and_then(|b| ray.intersect_aabb(&b)).is_none() {
                continue;
            }
            for [a, b, c] in part.triangles() {
                let hit = ray.intersect_triangle(
                    mat.transform_point3(a),
                    mat.transform_point3(b),
                    mat.transform_point3(c),
                );
                if let Some(t) = hit {
                    if best.map_or(true, |(d, _)| t < d) {
                        best = Some((t, index));
                    }
                }
            }
        }
        best
    }
}

/// How the room shell came to be
#[derive(Debug, Clone, PartialEq)]
pub enum RoomSource {
    Loaded,
    Generated(RoomParams),
}

/// The single room of a scene
#[derive(Debug)]
pub struct RoomShell {
    pub object: PlacedObject,
    pub source: RoomSource,
}

/// Address of one mesh part in the ownership tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartKey {
    pub owner: ObjectId,
    pub part: usize,
}

/// Result of a registry raycast
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub owner: ObjectId,
    pub part: usize,
    pub distance: f32,
    pub point: Vec3,
}

/// Ordered collection of placed objects plus the optional room
#[derive(Debug, Default)]
pub struct ModelRegistry {
    objects: Vec<PlacedObject>,
    room: Option<RoomShell>,
    draggables: Vec<PartKey>,
    tracker: ResourceTracker,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracker(&self) -> &ResourceTracker {
        &self.tracker
    }

    /// Mesh handles currently alive in this scene
    pub fn live_handles(&self) -> usize {
        self.tracker.live()
    }

    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when there are no movable objects; the room does not count
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn room(&self) -> Option<&RoomShell> {
        self.room.as_ref()
    }

    pub fn room_mut(&mut self) -> Option<&mut RoomShell> {
        self.room.as_mut()
    }

    /// Id not yet used by any object, derived from `wanted`
    pub fn unique_id(&self, wanted: &ObjectId) -> ObjectId {
        if !self.contains(wanted) {
            return wanted.clone();
        }
        (2..)
            .map(|n| wanted.with_suffix(n))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(ObjectId::generate)
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Look up an object or the room by id
    pub fn get(&self, id: &ObjectId) -> Option<&PlacedObject> {
        if id.is_room() {
            return self.room.as_ref().map(|r| &r.object);
        }
        self.objects.iter().find(|o| &o.id == id)
    }

    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut PlacedObject> {
        if id.is_room() {
            return self.room.as_mut().map(|r| &mut r.object);
        }
        self.objects.iter_mut().find(|o| &o.id == id)
    }

    /// Append a movable object. Its id is made unique first.
    pub fn insert(&mut self, mut object: PlacedObject) -> ObjectId {
        object.id = self.unique_id(&object.id);
        let id = object.id.clone();
        log::info!(
            "Placed {} ({}) at {}{}",
            id,
            object.name,
            object.transform.position,
            if object.placeholder { " as placeholder" } else { "" }
        );
        self.objects.push(object);
        self.refresh_draggables();
        id
    }

    /// Install a room, disposing the previous one
    pub fn set_room(&mut self, mut room: RoomShell) {
        room.object.id = ObjectId::room();
        self.remove_room();
        log::info!("Room set ({:?})", room.source);
        self.room = Some(room);
    }

    /// Dispose and drop the room. Returns whether there was one.
    pub fn remove_room(&mut self) -> bool {
        match self.room.take() {
            Some(mut old) => {
                old.object.mesh.dispose();
                true
            }
            None => false,
        }
    }

    /// Dispose and remove one object (or the room)
    pub fn remove(&mut self, id: &ObjectId) -> Result<()> {
        if id.is_room() {
            return if self.remove_room() {
                Ok(())
            } else {
                Err(PlinthError::ObjectNotFound(id.to_string()))
            };
        }
        let index = self
            .objects
            .iter()
            .position(|o| &o.id == id)
            .ok_or_else(|| PlinthError::ObjectNotFound(id.to_string()))?;
        let mut object = self.objects.remove(index);
        object.mesh.dispose();
        self.refresh_draggables();
        log::info!("Removed {}", id);
        Ok(())
    }

    /// Dispose everything. Returns the number of handles released.
    pub fn clear(&mut self) -> usize {
        let mut released = 0;
        for mut object in self.objects.drain(..) {
            if object.mesh.dispose() {
                released += 1;
            }
        }
        if self.remove_room() {
            released += 1;
        }
        self.draggables.clear();
        released
    }

    /// Parts the pointer layer may drag: every part of every movable object
    pub fn draggables(&self) -> &[PartKey] {
        &self.draggables
    }

    /// Rebuild the draggable set from the current objects
    pub fn refresh_draggables(&mut self) {
        self.draggables = self
            .objects
            .iter()
            .flat_map(|o| {
                (0..o.mesh.parts().len()).map(move |part| PartKey {
                    owner: o.id.clone(),
                    part,
                })
            })
            .collect();
    }

    /// Nearest hit among movable objects, and the room when `include_room`
    pub fn raycast(&self, ray: &Ray, include_room: bool) -> Option<Hit> {
        let room = self
            .room
            .as_ref()
            .filter(|_| include_room)
            .map(|r| &r.object);
        self.objects
            .iter()
            .chain(room)
            .filter_map(|o| o.raycast(ray).map(|(t, part)| (o, t, part)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(o, distance, part)| Hit {
                owner: o.id.clone(),
                part,
                distance,
                point: ray.at(distance),
            })
    }

    /// Room bounds center, else the union of all object bounds, else a
    /// fixed point above the origin
    pub fn scene_center(&self) -> Vec3 {
        if let Some(room) = &self.room {
            return room
                .object
                .world_bounds()
                .map(|b| b.center())
                .unwrap_or(room.object.transform.position);
        }
        self.objects
            .iter()
            .filter_map(|o| o.world_bounds())
            .reduce(|a, b| a.union(&b))
            .map(|b| b.center())
            .unwrap_or(FALLBACK_CENTER)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use plinth_import::{unit_cube, PartMaterial};

    pub(crate) fn cube_object(registry: &ModelRegistry, id: &str, position: Vec3) -> PlacedObject {
        PlacedObject {
            id: ObjectId::new(id),
            name: id.to_string(),
            transform: Transform::from_position(position),
            mesh: MeshHandle::new(
                vec![unit_cube(id, PartMaterial::default())],
                registry.tracker(),
            ),
            descriptor: ModelDescriptor::default().with_id(id),
            placeholder: false,
        }
    }

    #[test]
    fn test_insert_keeps_ids_unique() {
        let mut registry = ModelRegistry::new();
        let a = registry.insert(cube_object(&registry, "chair", Vec3::ZERO));
        let b = registry.insert(cube_object(&registry, "chair", Vec3::X));
        let c = registry.insert(cube_object(&registry, "chair", Vec3::Y));
        assert_eq!(a.as_str(), "chair");
        assert_eq!(b.as_str(), "chair-2");
        assert_eq!(c.as_str(), "chair-3");
        assert_eq!(registry.draggables().len(), 3);
    }

    #[test]
    fn test_scene_center_fallback_and_single_object() {
        let mut registry = ModelRegistry::new();
        assert_eq!(registry.scene_center(), FALLBACK_CENTER);

        registry.insert(cube_object(&registry, "box", Vec3::new(5.0, 0.0, 5.0)));
        assert_eq!(registry.scene_center(), Vec3::new(5.0, 0.0, 5.0));
    }

    #[test]
    fn test_scene_center_prefers_room() {
        let mut registry = ModelRegistry::new();
        registry.insert(cube_object(&registry, "box", Vec3::new(5.0, 0.0, 5.0)));
        let room = cube_object(&registry, "room", Vec3::new(0.0, 1.0, 0.0));
        registry.set_room(RoomShell {
            object: room,
            source: RoomSource::Loaded,
        });
        assert_eq!(registry.scene_center(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_raycast_nearest_and_room_filter() {
        let mut registry = ModelRegistry::new();
        registry.insert(cube_object(&registry, "far", Vec3::new(0.0, 0.0, -5.0)));
        registry.insert(cube_object(&registry, "near", Vec3::new(0.0, 0.0, -2.0)));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let hit = registry.raycast(&ray, true).unwrap();
        assert_eq!(hit.owner.as_str(), "near");
        assert!((hit.distance - 6.5).abs() < 1e-4);

        let mut registry = ModelRegistry::new();
        let room = cube_object(&registry, "room", Vec3::ZERO);
        registry.set_room(RoomShell {
            object: room,
            source: RoomSource::Loaded,
        });
        assert!(registry.raycast(&ray, false).is_none());
        assert!(registry.raycast(&ray, true).unwrap().owner.is_room());
    }

    #[test]
    fn test_remove_and_clear_release_handles() {
        let mut registry = ModelRegistry::new();
        registry.insert(cube_object(&registry, "a", Vec3::ZERO));
        registry.insert(cube_object(&registry, "b", Vec3::ZERO));
        let room = cube_object(&registry, "room", Vec3::ZERO);
        registry.set_room(RoomShell {
            object: room,
            source: RoomSource::Loaded,
        });
        assert_eq!(registry.live_handles(), 3);

        registry.remove(&ObjectId::new("a")).unwrap();
        assert_eq!(registry.live_handles(), 2);
        assert_eq!(registry.draggables().len(), 1);
        assert!(matches!(
            registry.remove(&ObjectId::new("a")),
            Err(PlinthError::ObjectNotFound(_))
        ));

        assert_eq!(registry.clear(), 2);
        assert_eq!(registry.clear(), 0);
        assert_eq!(registry.live_handles(), 0);
        assert_eq!(registry.tracker().leaked(), 0);
    }

    #[test]
    fn test_replacing_room_disposes_old_one() {
        let mut registry = ModelRegistry::new();
        for _ in 0..2 {
            let room = cube_object(&registry, "room", Vec3::ZERO);
            registry.set_room(RoomShell {
                object: room,
                source: RoomSource::Loaded,
            });
        }
        assert_eq!(registry.live_handles(), 1);
        assert!(registry.room().unwrap().object.id.is_room());
    }

    #[test]
    fn test_dimensions_follow_scale() {
        let registry = ModelRegistry::new();
        let mut object = cube_object(&registry, "box", Vec3::ZERO);
        object.transform.scale = Vec3::new(2.0, 1.0, 0.5);
        assert_eq!(object.dimensions(), Vec3::new(2.0, 1.0, 0.5));
        assert_eq!(object.original_dimensions(), Vec3::ONE);
        object.mesh.dispose();
    }
}
