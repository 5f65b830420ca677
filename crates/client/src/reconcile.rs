//! Diffing desired overlays against what is already on the map.

use indexmap::IndexMap;

use crate::overlay::{OverlayItem, OverlayKey, Shape};

/// The mapping SDK, reduced to what overlay management needs.
pub trait MapSurface {
    /// Whatever the SDK returns to identify a drawn shape.
    type Handle;

    fn draw(&mut self, shape: &Shape) -> Self::Handle;
    fn detach(&mut self, handle: Self::Handle);
}

#[derive(Debug)]
struct Drawn<H> {
    shapes: Vec<Shape>,
    handles: Vec<H>,
}

/// Counts from one [`OverlayReconciler::reconcile`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub drawn: usize,
    pub detached: usize,
    pub unchanged: usize,
}

/// Keeps the map in step with the desired overlay set.
///
/// Overlays are keyed by [`OverlayKey`]. Each pass detaches overlays whose
/// entity disappeared or whose shapes changed, then draws the new and
/// changed ones. Unchanged overlays are not touched.
#[derive(Debug)]
pub struct OverlayReconciler<H> {
    drawn: IndexMap<OverlayKey, Drawn<H>>,
}

impl<H> Default for OverlayReconciler<H> {
    fn default() -> Self {
        Self {
            drawn: IndexMap::new(),
        }
    }
}

impl<H> OverlayReconciler<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reconcile<M>(&mut self, surface: &mut M, desired: Vec<OverlayItem>) -> ReconcileStats
    where
        M: MapSurface<Handle = H>,
    {
        let mut stats = ReconcileStats::default();
        let desired: IndexMap<OverlayKey, Vec<Shape>> = desired
            .into_iter()
            .map(|item| (item.key, item.shapes))
            .collect();

        // Detach first so removed and replaced overlays never coexist with
        // their successors.
        let stale: Vec<OverlayKey> = self
            .drawn
            .iter()
            .filter(|(key, drawn)| desired.get(*key) != Some(&drawn.shapes))
            .map(|(key, _)| key.clone())
            .collect();
        for key in stale {
            if let Some(drawn) = self.drawn.shift_remove(&key) {
                stats.detached += drawn.handles.len();
                for handle in drawn.handles {
                    surface.detach(handle);
                }
            }
        }

        for (key, shapes) in desired {
            if self.drawn.contains_key(&key) {
                stats.unchanged += 1;
                continue;
            }
            let handles: Vec<H> = shapes.iter().map(|shape| surface.draw(shape)).collect();
            stats.drawn += handles.len();
            self.drawn.insert(key, Drawn { shapes, handles });
        }

        tracing::debug!(
            drawn = stats.drawn,
            detached = stats.detached,
            unchanged = stats.unchanged,
            "Overlays reconciled"
        );
        stats
    }

    /// Detach every overlay.
    pub fn clear<M>(&mut self, surface: &mut M)
    where
        M: MapSurface<Handle = H>,
    {
        for (_, drawn) in self.drawn.drain(..) {
            for handle in drawn.handles {
                surface.detach(handle);
            }
        }
    }

    pub fn contains(&self, key: &OverlayKey) -> bool {
        self.drawn.contains_key(key)
    }

    /// Number of entities with overlays on the map.
    pub fn len(&self) -> usize {
        self.drawn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawn.is_empty()
    }
}
