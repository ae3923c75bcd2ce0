//! Pointer-driven selection and transform control

use crate::descriptor::Scale;
use crate::hooks::SceneHooks;
use crate::registry::ModelRegistry;
use crate::selection::{SelectedTransform, Selection};
use crate::settings::ScenePolicy;
use plinth_camera::OrbitControls;
use plinth_core::{ObjectId, PlinthError, Ray, Result, Vec3};
use serde::{Deserialize, Serialize};

/// How a rotation request combines with the current rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationMode {
    /// Overwrite
    #[default]
    Absolute,
    /// Add to the current angles
    Relative,
}

#[derive(Debug, Clone)]
struct DragGesture {
    id: ObjectId,
    /// Object position minus the grab point on the drag plane
    grab_offset: Vec3,
    moved: bool,
}

#[derive(Debug)]
pub struct TransformController {
    policy: ScenePolicy,
    plane_height: f32,
    selection: Option<Selection>,
    drag: Option<DragGesture>,
    /// Swallow the click that ends a drag which moved something
    suppress_click: bool,
}

impl TransformController {
    pub fn new(policy: ScenePolicy, plane_height: f32) -> Self {
        Self {
            policy,
            plane_height,
            selection: None,
            drag: None,
            suppress_click: false,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Id of the object being dragged
    pub fn dragged(&self) -> Option<&ObjectId> {
        self.drag.as_ref().map(|d| &d.id)
    }

    /// Start a drag if the ray hits a movable object. Suspends the orbit
    /// controls for the duration of the gesture.
    pub fn pointer_down(
        &mut self,
        ray: &Ray,
        registry: &ModelRegistry,
        controls: &mut OrbitControls,
    ) -> Option<ObjectId> {
        if !self.policy.dragging || self.drag.is_some() {
            return None;
        }
        let hit = registry.raycast(ray, false)?;
        let object = registry.get(&hit.owner)?;
        let grab = ray.intersect_plane_y(self.plane_height).unwrap_or(hit.point);

        controls.enabled = false;
        self.drag = Some(DragGesture {
            id: hit.owner.clone(),
            grab_offset: object.transform.position - grab,
            moved: false,
        });
        log::debug!("Drag started on {}", hit.owner);
        Some(hit.owner)
    }

    /// Move the dragged object to follow the ray across the drag plane.
    /// Height is kept. Returns false when nothing moved.
    pub fn pointer_move(
        &mut self,
        ray: &Ray,
        registry: &mut ModelRegistry,
        hooks: &mut SceneHooks,
    ) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        let Some(point) = ray.intersect_plane_y(self.plane_height) else {
            return false;
        };
        let Some(object) = registry.get_mut(&drag.id) else {
            self.drag = None;
            return false;
        };

        let position = &mut object.transform.position;
        position.x = point.x + drag.grab_offset.x;
        position.z = point.z + drag.grab_offset.z;
        drag.moved = true;

        let id = drag.id.clone();
        if self.selection.as_ref().is_some_and(|s| s.id == id) {
            self.refresh_selection(registry);
        }
        hooks.model_dragged(&id);
        true
    }

    /// End the gesture and hand control back to the orbit controls
    pub fn pointer_up(&mut self, controls: &mut OrbitControls) -> Option<ObjectId> {
        let drag = self.drag.take()?;
        controls.enabled = true;
        self.suppress_click = drag.moved;
        log::debug!("Drag ended on {}", drag.id);
        Some(drag.id)
    }

    /// Select whatever the ray hits first, or clear the selection on a miss.
    /// Ignored mid-drag and right after a drag that moved something.
    pub fn click(
        &mut self,
        ray: &Ray,
        registry: &ModelRegistry,
        hooks: &mut SceneHooks,
    ) -> Option<&Selection> {
        if self.drag.is_some() {
            return self.selection.as_ref();
        }
        if std::mem::take(&mut self.suppress_click) {
            return self.selection.as_ref();
        }

        self.selection = registry
            .raycast(ray, self.policy.room_selectable)
            .and_then(|hit| registry.get(&hit.owner))
            .map(Selection::from_object);

        match &self.selection {
            Some(s) => log::debug!("Selected {} ({})", s.id, s.name),
            None => log::debug!("Selection cleared"),
        }
        hooks.selection_changed(self.selection.as_ref());
        self.selection.as_ref()
    }

    /// Select an object by id, bypassing hit-testing
    pub fn select(
        &mut self,
        id: &ObjectId,
        registry: &ModelRegistry,
        hooks: &mut SceneHooks,
    ) -> Result<&Selection> {
        let object = registry
            .get(id)
            .ok_or_else(|| PlinthError::ObjectNotFound(id.to_string()))?;
        let selection: &Selection = self.selection.insert(Selection::from_object(object));
        hooks.selection_changed(Some(selection));
        Ok(selection)
    }

    pub fn clear_selection(&mut self, hooks: &mut SceneHooks) {
        if self.selection.take().is_some() {
            hooks.selection_changed(None);
        }
    }

    /// Scale the selected object. See [`Scale::resolve`] for `force_uniform`.
    /// Nothing changes when the request is rejected.
    pub fn set_scale(
        &mut self,
        registry: &mut ModelRegistry,
        scale: Scale,
        force_uniform: bool,
    ) -> Result<Vec3> {
        let id = self.selected_id("set_scale")?;
        let factors = scale.resolve(force_uniform).inspect_err(|e| {
            log::warn!("set_scale on {} rejected: {}", id, e);
        })?;
        let object = registry
            .get_mut(&id)
            .ok_or_else(|| PlinthError::ObjectNotFound(id.to_string()))?;
        object.transform.scale = factors;
        self.refresh_selection(registry);
        Ok(factors)
    }

    /// Rotate the selected object by angles in degrees
    pub fn set_rotation(
        &mut self,
        registry: &mut ModelRegistry,
        degrees: Vec3,
        mode: RotationMode,
    ) -> Result<Vec3> {
        let id = self.selected_id("set_rotation")?;
        if !degrees.is_finite() {
            log::warn!("set_rotation on {} rejected: non-finite angles {}", id, degrees);
            return Err(PlinthError::InvalidTransform(format!(
                "rotation must be finite, got {}",
                degrees
            )));
        }
        let object = registry
            .get_mut(&id)
            .ok_or_else(|| PlinthError::ObjectNotFound(id.to_string()))?;

        let radians = Vec3::new(
            degrees.x.to_radians(),
            degrees.y.to_radians(),
            degrees.z.to_radians(),
        );
        object.transform.rotation = match mode {
            RotationMode::Absolute => radians,
            RotationMode::Relative => object.transform.rotation + radians,
        };
        let rotation = object.transform.rotation;
        self.refresh_selection(registry);
        Ok(rotation)
    }

    /// Display transform of the selection, `None` without one
    pub fn selected_transform(&self, registry: &ModelRegistry) -> Option<SelectedTransform> {
        let selection = self.selection.as_ref()?;
        registry.get(&selection.id).map(SelectedTransform::from_object)
    }

    /// Re-read cached selection fields from the live object
    pub fn refresh_selection(&mut self, registry: &ModelRegistry) {
        if let Some(selection) = self.selection.as_mut() {
            match registry.get(&selection.id) {
                Some(object) => *selection = Selection::from_object(object),
                None => self.selection = None,
            }
        }
    }

    /// Drop any reference to an object that left the registry
    pub fn forget(&mut self, id: &ObjectId, controls: &mut OrbitControls) {
        if self.selection.as_ref().is_some_and(|s| &s.id == id) {
            self.selection = None;
        }
        if self.drag.as_ref().is_some_and(|d| &d.id == id) {
            self.drag = None;
            controls.enabled = true;
        }
    }

    /// Forget everything, as on teardown
    pub fn reset(&mut self) {
        self.selection = None;
        self.drag = None;
        self.suppress_click = false;
    }

    fn selected_id(&self, operation: &str) -> Result<ObjectId> {
        match &self.selection {
            Some(s) => Ok(s.id.clone()),
            None => {
                log::warn!("{} ignored: no object selected", operation);
                Err(PlinthError::NoSelection(operation.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::cube_object;
    use crate::registry::{RoomShell, RoomSource};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn down_ray(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 10.0, z), Vec3::NEG_Y)
    }

    fn scene() -> (ModelRegistry, TransformController, OrbitControls) {
        let mut registry = ModelRegistry::new();
        registry.insert(cube_object(&registry, "chair", Vec3::new(5.0, 0.5, 5.0)));
        (
            registry,
            TransformController::new(ScenePolicy::default(), 0.0),
            OrbitControls::default(),
        )
    }

    fn select_chair(
        registry: &ModelRegistry,
        controller: &mut TransformController,
    ) -> SceneHooks {
        let mut hooks = SceneHooks::new();
        controller.click(&down_ray(5.0, 5.0), registry, &mut hooks);
        assert!(controller.selection().is_some());
        hooks
    }

    #[test]
    fn test_click_selects_and_miss_clears() {
        let (registry, mut controller, _) = scene();
        let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::default();
        let log = seen.clone();
        let mut hooks = SceneHooks::new().on_selection_changed(move |s| {
            log.borrow_mut().push(s.map(|s| s.id.to_string()));
        });

        let selected = controller.click(&down_ray(5.2, 4.9), &registry, &mut hooks).unwrap();
        assert_eq!(selected.id.as_str(), "chair");
        assert_eq!(selected.dimensions, Vec3::ONE);

        assert!(controller.click(&down_ray(-20.0, 0.0), &registry, &mut hooks).is_none());
        assert_eq!(*seen.borrow(), vec![Some("chair".to_string()), None]);
    }

    #[test]
    fn test_room_clickable_only_when_policy_allows() {
        let (mut registry, mut controller, _) = scene();
        let room = cube_object(&registry, "room", Vec3::ZERO);
        registry.set_room(RoomShell {
            object: room,
            source: RoomSource::Loaded,
        });
        let mut hooks = SceneHooks::new();
        let hit = controller.click(&down_ray(0.0, 0.0), &registry, &mut hooks).unwrap();
        assert!(hit.is_room);

        let mut room_only = TransformController::new(ScenePolicy::room_only(), 0.0);
        assert!(room_only.click(&down_ray(0.0, 0.0), &registry, &mut hooks).is_none());
    }

    #[test]
    fn test_drag_follows_ground_plane() {
        let (mut registry, mut controller, mut controls) = scene();
        let moves = Rc::new(RefCell::new(0));
        let counter = moves.clone();
        let mut hooks = SceneHooks::new().on_model_dragged(move |_| *counter.borrow_mut() += 1);

        // Grab 0.25 off-center, so the object keeps that offset
        let grabbed = controller.pointer_down(&down_ray(5.25, 5.0), &registry, &mut controls);
        assert_eq!(grabbed.unwrap().as_str(), "chair");
        assert!(!controls.enabled);

        assert!(controller.pointer_move(&down_ray(8.25, 2.0), &mut registry, &mut hooks));
        assert!(controller.pointer_move(&down_ray(9.25, 1.0), &mut registry, &mut hooks));
        let position = registry.get(&ObjectId::new("chair")).unwrap().transform.position;
        assert!((position - Vec3::new(9.0, 0.5, 1.0)).length() < 1e-5);
        assert_eq!(*moves.borrow(), 2);

        controller.pointer_up(&mut controls);
        assert!(controls.enabled);

        // The click closing the drag does not change selection
        assert!(controller.click(&down_ray(-20.0, 0.0), &registry, &mut hooks).is_none());
        assert!(controller.selection().is_none());
    }

    #[test]
    fn test_click_ignored_while_dragging() {
        let (registry, mut controller, mut controls) = scene();
        let mut hooks = SceneHooks::new();
        controller.pointer_down(&down_ray(5.0, 5.0), &registry, &mut controls);
        assert!(controller.click(&down_ray(5.0, 5.0), &registry, &mut hooks).is_none());
    }

    #[test]
    fn test_drag_disabled_by_policy() {
        let (registry, _, mut controls) = scene();
        let mut controller = TransformController::new(ScenePolicy::room_only(), 0.0);
        assert!(controller
            .pointer_down(&down_ray(5.0, 5.0), &registry, &mut controls)
            .is_none());
        assert!(controls.enabled);
    }

    #[test]
    fn test_uniform_scale() {
        let (mut registry, mut controller, _) = scene();
        select_chair(&registry, &mut controller);
        for s in [0.5f32, 1.0, 3.25] {
            let applied = controller
                .set_scale(&mut registry, Scale::Uniform(s), true)
                .unwrap();
            assert_eq!(applied, Vec3::splat(s));
        }
        assert_eq!(controller.selection().unwrap().scale, Vec3::splat(3.25));
        assert_eq!(controller.selection().unwrap().dimensions, Vec3::splat(3.25));
    }

    #[test]
    fn test_non_positive_scale_leaves_state() {
        let (mut registry, mut controller, _) = scene();
        select_chair(&registry, &mut controller);
        controller.set_scale(&mut registry, Scale::Uniform(2.0), true).unwrap();
        for s in [0.0f32, -1.0] {
            let err = controller
                .set_scale(&mut registry, Scale::Uniform(s), true)
                .unwrap_err();
            assert!(matches!(err, PlinthError::InvalidTransform(_)));
        }
        let object = registry.get(&ObjectId::new("chair")).unwrap();
        assert_eq!(object.transform.scale, Vec3::splat(2.0));
    }

    #[test]
    fn test_force_uniform_uses_mean() {
        let (mut registry, mut controller, _) = scene();
        select_chair(&registry, &mut controller);
        let applied = controller
            .set_scale(&mut registry, Scale::PerAxis(Vec3::new(1.0, 2.0, 4.5)), true)
            .unwrap();
        assert_eq!(applied, Vec3::splat(2.5));

        let applied = controller
            .set_scale(&mut registry, Scale::PerAxis(Vec3::new(1.0, 2.0, 4.5)), false)
            .unwrap();
        assert_eq!(applied, Vec3::new(1.0, 2.0, 4.5));
    }

    #[test]
    fn test_setters_need_selection() {
        let (mut registry, mut controller, _) = scene();
        assert!(matches!(
            controller.set_scale(&mut registry, Scale::Uniform(2.0), true),
            Err(PlinthError::NoSelection(_))
        ));
        assert!(matches!(
            controller.set_rotation(&mut registry, Vec3::X, RotationMode::Absolute),
            Err(PlinthError::NoSelection(_))
        ));
        assert!(controller.selected_transform(&registry).is_none());
    }

    #[test]
    fn test_absolute_rotation_is_idempotent_relative_accumulates() {
        let (mut registry, mut controller, _) = scene();
        select_chair(&registry, &mut controller);
        let quarter = Vec3::new(90.0, 0.0, 0.0);

        let once = controller
            .set_rotation(&mut registry, quarter, RotationMode::Absolute)
            .unwrap();
        let twice = controller
            .set_rotation(&mut registry, quarter, RotationMode::Absolute)
            .unwrap();
        assert_eq!(once, twice);

        controller
            .set_rotation(&mut registry, Vec3::ZERO, RotationMode::Absolute)
            .unwrap();
        controller
            .set_rotation(&mut registry, quarter, RotationMode::Relative)
            .unwrap();
        let doubled = controller
            .set_rotation(&mut registry, quarter, RotationMode::Relative)
            .unwrap();
        assert!((doubled.x - std::f32::consts::PI).abs() < 1e-6);

        let shown = controller.selected_transform(&registry).unwrap();
        assert_eq!(shown.rotation, Vec3::new(180.0, 0.0, 0.0));
        assert_eq!(controller.selection().unwrap().rotation, doubled);
    }
}
