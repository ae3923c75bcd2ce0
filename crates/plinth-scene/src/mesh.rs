//! Owned renderable resources
//!
//! Every placed object owns one [`MeshHandle`]. Handles are counted by a
//! shared [`ResourceTracker`] so teardown can prove nothing is left alive.

use plinth_core::Aabb;
use plinth_import::MeshPart;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts live and leaked mesh handles of one scene
#[derive(Debug, Clone, Default)]
pub struct ResourceTracker {
    live: Arc<AtomicUsize>,
    leaked: Arc<AtomicUsize>,
}

impl ResourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles created and not yet released
    pub fn live(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }

    /// Handles dropped without an explicit dispose
    pub fn leaked(&self) -> usize {
        self.leaked.load(Ordering::Relaxed)
    }

    fn acquire(&self) {
        self.live.fetch_add(1, Ordering::Relaxed);
    }

    fn release(&self) {
        self.live.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Geometry and materials of one placed object
#[derive(Debug)]
pub struct MeshHandle {
    parts: Vec<MeshPart>,
    tracker: ResourceTracker,
    disposed: bool,
}

impl MeshHandle {
    pub fn new(parts: Vec<MeshPart>, tracker: &ResourceTracker) -> Self {
        tracker.acquire();
        Self {
            parts,
            tracker: tracker.clone(),
            disposed: false,
        }
    }

    /// Parts in model space. Empty once disposed.
    pub fn parts(&self) -> &[MeshPart] {
        &self.parts
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Release geometry and materials. Returns false if already released.
    pub fn dispose(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        self.parts = Vec::new();
        self.disposed = true;
        self.tracker.release();
        true
    }

    /// Bounds in model space
    pub fn bounds(&self) -> Option<Aabb> {
        self.parts
            .iter()
            .filter_map(|p| p.bounds())
            .reduce(|a, b| a.union(&b))
    }

    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(|p| p.triangle_count()).sum()
    }
}

impl Drop for MeshHandle {
    fn drop(&mut self) {
        if !self.disposed {
            log::warn!(
                "Mesh handle with {} parts dropped without dispose",
                self.parts.len()
            );
            self.tracker.leaked.fetch_add(1, Ordering::Relaxed);
            self.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plinth_import::{unit_cube, PartMaterial};

    #[test]
    fn test_dispose_once() {
        let tracker = ResourceTracker::new();
        let mut handle = MeshHandle::new(vec![unit_cube("c", PartMaterial::default())], &tracker);
        assert_eq!(tracker.live(), 1);
        assert!(handle.bounds().is_some());

        assert!(handle.dispose());
        assert!(!handle.dispose());
        assert_eq!(tracker.live(), 0);
        assert!(handle.parts().is_empty());
        drop(handle);
        assert_eq!(tracker.leaked(), 0);
    }

    #[test]
    fn test_drop_without_dispose_is_counted_as_leak() {
        let tracker = ResourceTracker::new();
        drop(MeshHandle::new(Vec::new(), &tracker));
        assert_eq!(tracker.live(), 0);
        assert_eq!(tracker.leaked(), 1);
    }
}
