//! Scene context: the value a host owns for one scene
//!
//! Ties the registry, camera, view modes, auto-orbit, hooks and the load
//! queue together. The host calls [`SceneContext::tick`] once per frame and
//! [`SceneContext::teardown`] when the scene goes away.

use crate::descriptor::{ModelDescriptor, Scale};
use crate::hooks::SceneHooks;
use crate::loading::{CompletedLoad, LoadQueue, LoadTicket};
use crate::mesh::MeshHandle;
use crate::registry::{ModelRegistry, PlacedObject, RoomShell, RoomSource};
use crate::room::RoomParams;
use crate::selection::{SelectedTransform, Selection};
use crate::settings::{PlinthSettings, ScenePolicy};
use crate::transform::{RotationMode, TransformController};
use plinth_camera::{AutoOrbit, Camera, ModeController, OrbitControls, ViewMode};
use plinth_core::{Color, ObjectId, PlinthError, Result, Transform, Vec3};
use plinth_import::{unit_cube, Fetcher, MeshPart, ModelLoader, PartMaterial};
use std::time::Duration;

/// Color of the cube standing in for a model that failed to load
pub const PLACEHOLDER_COLOR: u32 = 0xff4444;
pub const PLACEHOLDER_OPACITY: f32 = 0.8;

pub struct SceneContext {
    policy: ScenePolicy,
    settings: PlinthSettings,
    registry: ModelRegistry,
    camera: Camera,
    controls: OrbitControls,
    modes: ModeController,
    orbit: AutoOrbit,
    hooks: SceneHooks,
    queue: LoadQueue,
    /// The room load still in flight, if any. A newer room cancels it.
    room_load: Option<LoadTicket>,
    transform: TransformController,
}

impl SceneContext {
    pub fn new(policy: ScenePolicy, settings: PlinthSettings) -> Self {
        let pose = settings.default_pose;
        let camera = Camera {
            position: pose.position,
            target: pose.target,
            up: pose.up,
            ..Camera::default()
        };
        let mut controls = OrbitControls::new(pose.target);
        controls.zoom = settings.zoom;
        controls.pan_speed = settings.top_down.free_pan_speed;

        let loader = ModelLoader::new(Fetcher::new(settings.fetch_timeout));
        Self {
            policy,
            registry: ModelRegistry::new(),
            camera,
            controls,
            modes: ModeController::new(pose, settings.top_down),
            orbit: AutoOrbit::new(settings.orbit),
            hooks: SceneHooks::new(),
            queue: LoadQueue::new(loader),
            room_load: None,
            transform: TransformController::new(policy, settings.drag_plane_height),
            settings,
        }
    }

    pub fn with_hooks(mut self, hooks: SceneHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn set_hooks(&mut self, hooks: SceneHooks) {
        self.hooks = hooks;
    }

    pub fn policy(&self) -> ScenePolicy {
        self.policy
    }

    pub fn settings(&self) -> &PlinthSettings {
        &self.settings
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn view_mode(&self) -> ViewMode {
        self.modes.mode()
    }

    pub fn orbit(&self) -> &AutoOrbit {
        &self.orbit
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.transform.selection()
    }

    pub fn is_dragging(&self) -> bool {
        self.transform.is_dragging()
    }

    // --- Loading ---

    /// Queue a model load. The object appears on a later [`Self::tick`].
    pub fn request_load(&mut self, descriptor: ModelDescriptor, scale: Scale) -> LoadTicket {
        let is_room = descriptor.is_room();
        if is_room {
            self.cancel_room_load();
        }
        let ticket = self.queue.submit(descriptor, scale);
        if is_room {
            self.room_load = Some(ticket.clone());
        }
        ticket
    }

    /// Loads queued but not yet applied
    pub fn pending_loads(&self) -> usize {
        self.queue.in_flight()
    }

    /// Load one model and place it before returning. Fails only when the
    /// load does not finish within `timeout`; a broken model still becomes
    /// a placeholder.
    pub fn load_now(
        &mut self,
        mut descriptor: ModelDescriptor,
        scale: Scale,
        timeout: Duration,
    ) -> Result<ObjectId> {
        let wanted = descriptor.id.get_or_insert_with(ObjectId::generate).clone();
        self.request_load(descriptor, scale);
        self.finish_loads(timeout)?
            .into_iter()
            .find(|(requested, _)| requested == &wanted)
            .map(|(_, placed)| placed)
            .ok_or_else(|| PlinthError::ObjectNotFound(wanted.to_string()))
    }

    /// Block until every queued load is placed. Returns (requested id,
    /// placed id) pairs; they differ when the registry renamed a duplicate.
    pub fn finish_loads(&mut self, timeout: Duration) -> Result<Vec<(ObjectId, ObjectId)>> {
        let done = self.queue.wait_all(timeout)?;
        Ok(done
            .into_iter()
            .map(|mut load| {
                // submit fills in every id; only hand-built loads get one here
                let requested = load
                    .descriptor
                    .id
                    .get_or_insert_with(ObjectId::generate)
                    .clone();
                (requested, self.apply_load(load))
            })
            .collect())
    }

    /// Apply whatever loads have finished. Returns the ids placed.
    pub fn poll_loads(&mut self) -> Vec<ObjectId> {
        self.queue
            .poll()
            .into_iter()
            .map(|load| self.apply_load(load))
            .collect()
    }

    /// Place one finished load: the room at the origin, anything else at the
    /// placement offset. A failed load becomes a placeholder cube.
    pub fn apply_load(&mut self, load: CompletedLoad) -> ObjectId {
        let CompletedLoad {
            mut descriptor,
            scale,
            result,
        } = load;
        let requested = descriptor.id.clone().unwrap_or_else(ObjectId::generate);
        let is_room = requested.is_room();
        let id = if is_room {
            requested
        } else {
            self.registry.unique_id(&requested)
        };
        descriptor.id = Some(id.clone());

        let factors = scale.resolve(false).unwrap_or_else(|e| {
            log::warn!("Ignoring scale for {}: {}", id, e);
            Vec3::ONE
        });
        let position = if is_room {
            Vec3::ZERO
        } else {
            self.settings.placement_offset
        };

        let (parts, placeholder) = match result {
            Ok(model) => (model.parts, false),
            Err(e) => {
                log::error!("Failed to load {}: {}", id, e);
                (vec![placeholder_cube()], true)
            }
        };

        let object = PlacedObject {
            id: id.clone(),
            name: descriptor.display_name().to_string(),
            transform: Transform::from_position(position).with_scale(factors),
            mesh: MeshHandle::new(parts, self.registry.tracker()),
            descriptor: descriptor.clone(),
            placeholder,
        };
        if is_room {
            self.transform.forget(&id, &mut self.controls);
            self.registry.set_room(RoomShell {
                object,
                source: RoomSource::Loaded,
            });
        } else {
            self.registry.insert(object);
        }
        self.hooks.model_placed(&descriptor);
        id
    }

    // --- Room ---

    /// Replace the room with a loaded model. The old room is disposed right
    /// away; the new one arrives with the load.
    pub fn load_room(
        &mut self,
        source_url: impl Into<String>,
        material_url: Option<String>,
        scale: Scale,
    ) -> LoadTicket {
        let room_id = ObjectId::room();
        self.transform.forget(&room_id, &mut self.controls);
        self.registry.remove_room();

        let mut descriptor = ModelDescriptor::room(source_url);
        descriptor.material_url = material_url;
        let height = scale.resolve(false).map(|s| s.y).unwrap_or(1.0);
        self.controls.target = Vec3::new(0.0, height / 5.0, 0.0);
        self.controls.sync(&mut self.camera);
        self.request_load(descriptor, scale)
    }

    /// Replace the room with a generated box and frame it
    pub fn generate_room(&mut self, params: RoomParams) -> Result<()> {
        let part = params.build_part()?;
        self.cancel_room_load();
        let room_id = ObjectId::room();
        self.transform.forget(&room_id, &mut self.controls);

        let object = PlacedObject {
            id: room_id.clone(),
            name: "Room".to_string(),
            transform: Transform::IDENTITY,
            mesh: MeshHandle::new(vec![part], self.registry.tracker()),
            descriptor: ModelDescriptor::default().with_id(room_id).with_name("Room"),
            placeholder: false,
        };
        self.registry.set_room(RoomShell {
            object,
            source: RoomSource::Generated(params),
        });

        self.camera.position = params.viewing_position();
        self.controls.target = params.viewing_target();
        self.controls.sync(&mut self.camera);
        log::info!(
            "Generated {} room {}x{}x{}",
            params.style.name(),
            params.length,
            params.width,
            params.height
        );
        Ok(())
    }

    // --- Frame ---

    /// Advance one frame: place finished loads, then step auto-orbit.
    /// Returns the ids placed during this tick.
    pub fn tick(&mut self, _dt: Duration) -> Vec<ObjectId> {
        let placed = self.poll_loads();
        if self.orbit.is_enabled() {
            let center = self.registry.scene_center();
            self.orbit.tick(&mut self.camera, &mut self.controls, center);
        }
        placed
    }

    // --- View ---

    pub fn set_view_mode(&mut self, mode: ViewMode) -> Result<bool> {
        let room_y = self.room_height();
        self.modes.set_mode(
            mode,
            &mut self.camera,
            &mut self.controls,
            room_y,
            self.orbit.is_enabled(),
        )
    }

    pub fn toggle_view_mode(&mut self) -> Result<ViewMode> {
        let room_y = self.room_height();
        self.modes.toggle(
            &mut self.camera,
            &mut self.controls,
            room_y,
            self.orbit.is_enabled(),
        )
    }

    /// Remember the current pose as the one to return to from top-down view
    pub fn save_default_camera_pose(&mut self) -> Result<()> {
        self.modes.save_default_pose(&self.camera, &self.controls)
    }

    /// Start or stop the walkthrough. Starting is refused in top-down view.
    pub fn set_auto_orbit(&mut self, enabled: bool) -> Result<()> {
        if !enabled {
            self.orbit.disable();
            return Ok(());
        }
        if self.modes.mode() == ViewMode::Locked2d {
            log::warn!("Auto-orbit refused in top-down view");
            return Err(PlinthError::InvalidState(
                "auto-orbit is not available in top-down view".to_string(),
            ));
        }
        let center = self.registry.scene_center();
        self.orbit.enable(&self.camera, center);
        Ok(())
    }

    pub fn set_orbit_speed(&mut self, speed: f32) {
        self.orbit.set_speed(speed);
    }

    pub fn scene_center(&self) -> Vec3 {
        self.registry.scene_center()
    }

    pub fn wheel(&mut self, delta_y: f32) -> bool {
        self.controls.wheel(&mut self.camera, delta_y)
    }

    pub fn rotate_view(&mut self, azimuth: f32, polar: f32) -> bool {
        self.controls.rotate(&mut self.camera, azimuth, polar)
    }

    pub fn pan_view(&mut self, dx: f32, dy: f32) -> bool {
        self.controls.pan(&mut self.camera, dx, dy)
    }

    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        self.camera.resize(width, height)
    }

    // --- Pointer ---
    //
    // Coordinates are viewport pixels, origin top-left.

    pub fn pointer_down(&mut self, x: f32, y: f32, width: f32, height: f32) -> Option<ObjectId> {
        let ray = self.camera.pointer_ray(x, y, width, height);
        self.transform
            .pointer_down(&ray, &self.registry, &mut self.controls)
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, width: f32, height: f32) -> bool {
        let ray = self.camera.pointer_ray(x, y, width, height);
        self.transform
            .pointer_move(&ray, &mut self.registry, &mut self.hooks)
    }

    pub fn pointer_up(&mut self) -> Option<ObjectId> {
        self.transform.pointer_up(&mut self.controls)
    }

    pub fn click(&mut self, x: f32, y: f32, width: f32, height: f32) -> Option<&Selection> {
        let ray = self.camera.pointer_ray(x, y, width, height);
        self.transform.click(&ray, &self.registry, &mut self.hooks)
    }

    // --- Objects ---

    pub fn select(&mut self, id: &ObjectId) -> Result<&Selection> {
        self.transform.select(id, &self.registry, &mut self.hooks)
    }

    pub fn clear_selection(&mut self) {
        self.transform.clear_selection(&mut self.hooks);
    }

    pub fn set_scale(&mut self, scale: Scale, force_uniform: bool) -> Result<Vec3> {
        self.transform
            .set_scale(&mut self.registry, scale, force_uniform)
    }

    /// Rotate the selection by angles in degrees
    pub fn set_rotation(&mut self, degrees: Vec3, mode: RotationMode) -> Result<Vec3> {
        self.transform
            .set_rotation(&mut self.registry, degrees, mode)
    }

    pub fn selected_transform(&self) -> Option<SelectedTransform> {
        self.transform.selected_transform(&self.registry)
    }

    /// Move an object directly, bypassing the pointer. Used when replaying
    /// composition files.
    pub fn set_position(&mut self, id: &ObjectId, position: Vec3) -> Result<()> {
        if !position.is_finite() {
            log::warn!("Rejected position {} for {}", position, id);
            return Err(PlinthError::InvalidTransform(format!(
                "position of {} must be finite, got {}",
                id, position
            )));
        }
        let object = self
            .registry
            .get_mut(id)
            .ok_or_else(|| PlinthError::ObjectNotFound(id.to_string()))?;
        object.transform.position = position;
        self.transform.refresh_selection(&self.registry);
        Ok(())
    }

    /// Overwrite an object's rotation, in degrees, without selecting it
    pub fn set_rotation_of(&mut self, id: &ObjectId, degrees: Vec3) -> Result<()> {
        if !degrees.is_finite() {
            return Err(PlinthError::InvalidTransform(format!(
                "rotation of {} must be finite, got {}",
                id, degrees
            )));
        }
        let object = self
            .registry
            .get_mut(id)
            .ok_or_else(|| PlinthError::ObjectNotFound(id.to_string()))?;
        object.transform.rotation = Vec3::new(
            degrees.x.to_radians(),
            degrees.y.to_radians(),
            degrees.z.to_radians(),
        );
        self.transform.refresh_selection(&self.registry);
        Ok(())
    }

    pub fn remove_object(&mut self, id: &ObjectId) -> Result<()> {
        self.registry.remove(id)?;
        self.transform.forget(id, &mut self.controls);
        Ok(())
    }

    /// Release everything the scene holds. Safe to call more than once;
    /// returns the number of mesh handles released.
    pub fn teardown(&mut self) -> usize {
        self.queue.cancel_all();
        self.room_load = None;
        self.orbit.disable();
        self.transform.reset();
        self.controls.enabled = true;
        let released = self.registry.clear();
        self.hooks = SceneHooks::new();
        if released > 0 {
            log::info!("Scene torn down, released {} mesh handles", released);
        }
        released
    }

    fn cancel_room_load(&mut self) {
        if let Some(ticket) = self.room_load.take() {
            ticket.cancel();
            log::debug!("Cancelled superseded room load {}", ticket.id());
        }
    }

    fn room_height(&self) -> Option<f32> {
        self.registry
            .room()
            .map(|r| r.object.transform.position.y)
    }
}

impl Default for SceneContext {
    fn default() -> Self {
        Self::new(ScenePolicy::default(), PlinthSettings::default())
    }
}

impl Drop for SceneContext {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn placeholder_cube() -> MeshPart {
    let color = Color::from_hex(PLACEHOLDER_COLOR).with_alpha(PLACEHOLDER_OPACITY);
    unit_cube("placeholder", PartMaterial::solid(color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::RoomStyle;
    use plinth_camera::CameraPose;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    const WAIT: Duration = Duration::from_secs(10);

    const CUBE_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3
f 1 3 4
";

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("plinth-scene-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_sourceless_load_lands_at_offset() {
        let placed: Rc<RefCell<Vec<ModelDescriptor>>> = Rc::default();
        let log = placed.clone();
        let mut scene = SceneContext::default()
            .with_hooks(SceneHooks::new().on_model_placed(move |d| log.borrow_mut().push(d.clone())));

        scene.request_load(ModelDescriptor::default().with_id("crate"), Scale::Uniform(2.0));
        let ids = scene.tick(Duration::from_millis(16));
        assert_eq!(ids, vec![ObjectId::new("crate")]);

        let object = scene.registry().get(&ids[0]).unwrap();
        assert_eq!(object.transform.position, Vec3::new(5.0, 0.0, 5.0));
        assert_eq!(object.transform.scale, Vec3::splat(2.0));
        assert_eq!(object.name, "Model");
        assert!(!object.placeholder);
        assert_eq!(placed.borrow().len(), 1);
        assert_eq!(placed.borrow()[0].id, Some(ObjectId::new("crate")));
    }

    #[test]
    fn test_failed_load_becomes_placeholder() {
        let placed = Rc::new(RefCell::new(0));
        let counter = placed.clone();
        let mut scene = SceneContext::default()
            .with_hooks(SceneHooks::new().on_model_placed(move |_| *counter.borrow_mut() += 1));

        let id = scene
            .load_now(
                ModelDescriptor::new("/no/such/dir/chair.obj").with_id("chair"),
                Scale::Uniform(1.5),
                WAIT,
            )
            .unwrap();

        let object = scene.registry().get(&id).unwrap();
        assert!(object.placeholder);
        assert_eq!(object.transform.scale, Vec3::splat(1.5));
        let color = object.mesh.parts()[0].material.color;
        assert_eq!(color.to_hex(), PLACEHOLDER_COLOR);
        assert!((color.a - PLACEHOLDER_OPACITY).abs() < 1e-6);
        assert_eq!(scene.registry().draggables().len(), 1);
        assert_eq!(*placed.borrow(), 1);
    }

    #[test]
    fn test_broken_sidecar_keeps_model() {
        let dir = temp_dir();
        let obj = dir.join("panel.obj");
        std::fs::write(&obj, CUBE_OBJ).unwrap();

        let mut scene = SceneContext::default();
        let id = scene
            .load_now(
                ModelDescriptor::new(obj.to_string_lossy())
                    .with_id("panel")
                    .with_material(dir.join("missing.mtl").to_string_lossy()),
                Scale::default(),
                WAIT,
            )
            .unwrap();

        let object = scene.registry().get(&id).unwrap();
        assert!(!object.placeholder);
        assert_eq!(object.mesh.parts()[0].material.color, Color::NEUTRAL);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_duplicate_ids_are_renamed() {
        let mut scene = SceneContext::default();
        let a = scene
            .load_now(ModelDescriptor::default().with_id("box"), Scale::default(), WAIT)
            .unwrap();
        let b = scene
            .load_now(ModelDescriptor::default().with_id("box"), Scale::default(), WAIT)
            .unwrap();
        assert_eq!(a.as_str(), "box");
        assert_eq!(b.as_str(), "box-2");
        assert_eq!(
            scene.registry().get(&b).unwrap().descriptor.id,
            Some(ObjectId::new("box-2"))
        );
    }

    #[test]
    fn test_loaded_room_sits_at_origin_outside_draggables() {
        let dir = temp_dir();
        let obj = dir.join("room.obj");
        std::fs::write(&obj, CUBE_OBJ).unwrap();

        let mut scene = SceneContext::default();
        scene.load_room(obj.to_string_lossy(), None, Scale::Uniform(10.0));
        assert_eq!(scene.controls().target, Vec3::new(0.0, 2.0, 0.0));
        scene.finish_loads(WAIT).unwrap();

        let room = scene.registry().room().unwrap();
        assert_eq!(room.object.transform.position, Vec3::ZERO);
        assert_eq!(room.source, RoomSource::Loaded);
        assert!(scene.registry().draggables().is_empty());
        assert!(scene.registry().is_empty());
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_generate_room_frames_camera() {
        let mut scene = SceneContext::default();
        scene
            .generate_room(RoomParams::new(8.0, 6.0, 3.0, RoomStyle::Industrial))
            .unwrap();
        assert_eq!(scene.camera().position, Vec3::splat(12.0));
        assert_eq!(scene.controls().target, Vec3::new(0.0, 1.5, 0.0));

        let room = scene.registry().room().unwrap();
        assert_eq!(room.object.dimensions(), Vec3::new(8.0, 3.0, 6.0));
        assert_eq!(scene.scene_center(), Vec3::new(0.0, 1.5, 0.0));

        // Regenerating replaces, never stacks
        scene
            .generate_room(RoomParams::new(4.0, 4.0, 2.5, RoomStyle::Modern))
            .unwrap();
        assert_eq!(scene.registry().live_handles(), 1);

        let bad = scene.generate_room(RoomParams::new(0.0, 4.0, 2.5, RoomStyle::Modern));
        assert!(matches!(bad, Err(PlinthError::InvalidTransform(_))));
        assert_eq!(scene.registry().live_handles(), 1);
    }

    #[test]
    fn test_generated_room_survives_older_room_load() {
        let mut scene = SceneContext::default();
        let stale = scene.load_room("/no/such/dir/old_room.obj", None, Scale::default());
        scene
            .generate_room(RoomParams::new(8.0, 6.0, 3.0, RoomStyle::Modern))
            .unwrap();
        assert!(stale.is_cancelled());

        assert!(scene.finish_loads(WAIT).unwrap().is_empty());
        let room = scene.registry().room().unwrap();
        assert!(!room.object.placeholder);
        assert!(matches!(room.source, RoomSource::Generated(_)));
        assert_eq!(scene.registry().live_handles(), 1);
    }

    #[test]
    fn test_newer_room_load_wins() {
        let dir = temp_dir();
        let obj = dir.join("room.obj");
        std::fs::write(&obj, CUBE_OBJ).unwrap();

        let mut scene = SceneContext::default();
        let first = scene.load_room("/no/such/dir/old_room.obj", None, Scale::default());
        scene.load_room(obj.to_string_lossy(), None, Scale::default());
        assert!(first.is_cancelled());

        let placed = scene.finish_loads(WAIT).unwrap();
        assert_eq!(placed.len(), 1);
        let room = scene.registry().room().unwrap();
        assert!(!room.object.placeholder);
        assert_eq!(room.source, RoomSource::Loaded);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_set_position_rejects_non_finite() {
        let mut scene = SceneContext::default();
        let id = scene
            .load_now(ModelDescriptor::default().with_id("crate"), Scale::default(), WAIT)
            .unwrap();

        let bad = scene.set_position(&id, Vec3::new(f32::NAN, 0.0, 0.0));
        assert!(matches!(bad, Err(PlinthError::InvalidTransform(_))));
        let bad = scene.set_position(&id, Vec3::new(0.0, f32::INFINITY, 0.0));
        assert!(matches!(bad, Err(PlinthError::InvalidTransform(_))));
        assert_eq!(
            scene.registry().get(&id).unwrap().transform.position,
            Vec3::new(5.0, 0.0, 5.0)
        );

        scene.set_position(&id, Vec3::new(1.0, 0.0, -2.0)).unwrap();
        assert_eq!(
            scene.registry().get(&id).unwrap().transform.position,
            Vec3::new(1.0, 0.0, -2.0)
        );
    }

    #[test]
    fn test_top_down_round_trip_restores_saved_pose() {
        let mut scene = SceneContext::default();
        scene.rotate_view(0.4, 0.1);
        scene.save_default_camera_pose().unwrap();
        let saved = CameraPose {
            position: scene.camera().position,
            target: scene.controls().target,
            up: scene.camera().up,
        };

        assert_eq!(scene.toggle_view_mode().unwrap(), ViewMode::Locked2d);
        assert!(scene.save_default_camera_pose().is_err());
        assert_eq!(scene.toggle_view_mode().unwrap(), ViewMode::Free3d);
        assert!(scene.camera().pose().approx_eq(&saved, 1e-4));
    }

    #[test]
    fn test_orbit_and_top_down_exclude_each_other() {
        let mut scene = SceneContext::default();
        scene.set_auto_orbit(true).unwrap();
        assert!(matches!(
            scene.toggle_view_mode(),
            Err(PlinthError::InvalidState(_))
        ));

        scene.set_auto_orbit(false).unwrap();
        scene.set_view_mode(ViewMode::Locked2d).unwrap();
        assert!(matches!(
            scene.set_auto_orbit(true),
            Err(PlinthError::InvalidState(_))
        ));
        assert!(!scene.orbit().is_enabled());
    }

    #[test]
    fn test_tick_orbits_scene_center() {
        let mut scene = SceneContext::default();
        scene.set_orbit_speed(1.0);
        assert_eq!(scene.orbit().speed(), 0.01);

        scene.set_auto_orbit(true).unwrap();
        for _ in 0..10 {
            scene.tick(Duration::from_millis(16));
        }
        let center = Vec3::new(0.0, 1.0, 0.0);
        let camera = scene.camera().position;
        let d = scene.orbit().distance().unwrap();
        assert!((5.0..=20.0).contains(&d));
        assert!((camera.y - (center.y + 2.0)).abs() < 1e-5);
        let flat = Vec3::new(camera.x - center.x, 0.0, camera.z - center.z).length();
        assert!((flat - d).abs() < 1e-4);
        assert_eq!(scene.controls().target, center);

        scene.set_auto_orbit(false).unwrap();
        let before = scene.camera().position;
        scene.tick(Duration::from_millis(16));
        assert_eq!(scene.camera().position, before);
    }

    #[test]
    fn test_click_at_viewport_center_selects_object() {
        // Camera looks down -Z; the cube sits slightly off-axis so the
        // center ray crosses the middle of a triangle, not an edge
        let settings = PlinthSettings {
            placement_offset: Vec3::new(0.2, 2.1, 0.0),
            default_pose: CameraPose::new(Vec3::new(0.0, 2.0, 10.0), Vec3::new(0.0, 2.0, 0.0)),
            ..PlinthSettings::default()
        };
        let mut scene = SceneContext::new(ScenePolicy::default(), settings);
        let id = scene
            .load_now(ModelDescriptor::default().with_id("lamp"), Scale::default(), WAIT)
            .unwrap();

        let selected = scene.click(400.0, 300.0, 800.0, 600.0).unwrap();
        assert_eq!(selected.id, id);
        assert!(scene.click(5.0, 5.0, 800.0, 600.0).is_none());

        scene.select(&id).unwrap();
        scene.set_scale(Scale::Uniform(2.0), true).unwrap();
        let shown = scene.selected_transform().unwrap();
        assert_eq!(shown.scale, Vec3::splat(2.0));

        scene.remove_object(&id).unwrap();
        assert!(scene.selection().is_none());
    }

    #[test]
    fn test_teardown_releases_everything_once() {
        let mut scene = SceneContext::default();
        scene
            .load_now(ModelDescriptor::default().with_id("a"), Scale::default(), WAIT)
            .unwrap();
        scene
            .load_now(ModelDescriptor::default().with_id("b"), Scale::default(), WAIT)
            .unwrap();
        scene
            .generate_room(RoomParams::new(4.0, 4.0, 3.0, RoomStyle::Minimalist))
            .unwrap();
        scene.select(&ObjectId::new("a")).unwrap();
        scene.request_load(ModelDescriptor::default().with_id("late"), Scale::default());

        assert_eq!(scene.teardown(), 3);
        assert_eq!(scene.registry().live_handles(), 0);
        assert_eq!(scene.registry().tracker().leaked(), 0);
        assert!(scene.selection().is_none());
        assert!(scene.registry().draggables().is_empty());

        // The load queued before teardown is discarded
        assert!(scene.tick(Duration::from_millis(16)).is_empty());
        assert_eq!(scene.teardown(), 0);
    }
}
