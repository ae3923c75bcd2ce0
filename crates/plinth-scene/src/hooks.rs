//! Host notification callbacks

use crate::descriptor::ModelDescriptor;
use crate::selection::Selection;
use plinth_core::ObjectId;

type PlacedHook = Box<dyn FnMut(&ModelDescriptor)>;
type DraggedHook = Box<dyn FnMut(&ObjectId)>;
type SelectionHook = Box<dyn FnMut(Option<&Selection>)>;

/// Callbacks the host registers to hear about scene changes.
/// Unset hooks are skipped.
#[derive(Default)]
pub struct SceneHooks {
    on_model_placed: Option<PlacedHook>,
    on_model_dragged: Option<DraggedHook>,
    on_selection_changed: Option<SelectionHook>,
}

impl SceneHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_model_placed(mut self, f: impl FnMut(&ModelDescriptor) + 'static) -> Self {
        self.on_model_placed = Some(Box::new(f));
        self
    }

    pub fn on_model_dragged(mut self, f: impl FnMut(&ObjectId) + 'static) -> Self {
        self.on_model_dragged = Some(Box::new(f));
        self
    }

    pub fn on_selection_changed(mut self, f: impl FnMut(Option<&Selection>) + 'static) -> Self {
        self.on_selection_changed = Some(Box::new(f));
        self
    }

    pub(crate) fn model_placed(&mut self, descriptor: &ModelDescriptor) {
        if let Some(hook) = self.on_model_placed.as_mut() {
            hook(descriptor);
        }
    }

    pub(crate) fn model_dragged(&mut self, id: &ObjectId) {
        if let Some(hook) = self.on_model_dragged.as_mut() {
            hook(id);
        }
    }

    pub(crate) fn selection_changed(&mut self, selection: Option<&Selection>) {
        if let Some(hook) = self.on_selection_changed.as_mut() {
            hook(selection);
        }
    }
}

impl std::fmt::Debug for SceneHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneHooks")
            .field("on_model_placed", &self.on_model_placed.is_some())
            .field("on_model_dragged", &self.on_model_dragged.is_some())
            .field("on_selection_changed", &self.on_selection_changed.is_some())
            .finish()
    }
}
