//! Recycling pool of free spawn slots
//!
//! Slots not held by an airborne fruit wait here. A fruit leaving the screen
//! hands its slot back and draws a random one (possibly its own) in a single
//! swap, so the pool's size stays constant in steady state.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::spawn::SpawnLayout;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecyclingPool {
    layout: SpawnLayout,
    available: Vec<f32>,
}

impl RecyclingPool {
    pub fn new(layout: SpawnLayout, available: Vec<f32>) -> Self {
        Self { layout, available }
    }

    pub fn layout(&self) -> &SpawnLayout {
        &self.layout
    }

    /// Free slots, in insertion order
    pub fn available(&self) -> &[f32] {
        &self.available
    }

    pub fn len(&self) -> usize {
        self.available.len()
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    /// Return `after_x` to the pool and draw a random free slot.
    ///
    /// A slot that no longer fits the current layout (stale after a resize)
    /// is dropped instead of returned. If that leaves nothing to draw from,
    /// a fresh slot clear of `occupied` (slots other airborne fruit hold) is
    /// dart-thrown from the layout.
    pub fn acquire<R: Rng + ?Sized>(&mut self, rng: &mut R, after_x: f32, occupied: &[f32]) -> f32 {
        if self.layout.contains(after_x) {
            self.available.push(after_x);
        }

        if self.available.is_empty() {
            log::warn!("Recycling pool empty, sampling a fresh slot");
            return match self.layout.sample_clear(rng, occupied) {
                Some(x) => x,
                None if self.layout.has_room() => {
                    log::warn!("No clear slot left, reusing {} clamped to the layout", after_x);
                    after_x.clamp(self.layout.min_x(), self.layout.max_x())
                }
                None => after_x,
            };
        }

        let index = rng.random_range(0..self.available.len());
        self.available.swap_remove(index)
    }

    /// Rebuild for a new layout, skipping slots that would crowd ones still in use
    pub fn rebuild<R: Rng + ?Sized>(&mut self, rng: &mut R, layout: SpawnLayout, occupied: &[f32]) {
        let spacing = layout.spacing();
        self.available = layout
            .generate(rng)
            .into_iter()
            .filter(|x| occupied.iter().all(|o| (o - x).abs() >= spacing))
            .collect();
        self.layout = layout;
        log::info!(
            "Recycling pool rebuilt for width {}: {} free slots",
            layout.viewport_width,
            self.available.len()
        );
    }
}
