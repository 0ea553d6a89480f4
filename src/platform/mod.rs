//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Pointer and touch input (collapsed to one horizontal coordinate)
//! - Canvas drawing and image loading (web only, see `web`)

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::sim::TickInput;

/// Tracks the horizontal pointer position in logical pixels.
///
/// Only x matters. With several touches down, the first one wins.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerTracker {
    x: Option<f32>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mouse/pointer move, in device-independent client coordinates
    pub fn on_pointer(&mut self, client_x: f32, canvas_left: f32) {
        self.set(client_x - canvas_left);
    }

    /// Touch start/move with the client x of every active touch, in order
    pub fn on_touches(&mut self, touches: &[f32], canvas_left: f32) {
        if let Some(first) = touches.first() {
            self.set(first - canvas_left);
        }
    }

    fn set(&mut self, x: f32) {
        if x.is_finite() {
            self.x = Some(x);
        }
    }

    pub fn x(&self) -> Option<f32> {
        self.x
    }

    /// Input for the next tick
    pub fn tick_input(&self) -> TickInput {
        TickInput { pointer_x: self.x }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_touch_wins() {
        let mut pointer = PointerTracker::new();
        assert_eq!(pointer.x(), None);
        pointer.on_touches(&[120.0, 300.0, 40.0], 20.0);
        assert_eq!(pointer.x(), Some(100.0));

        // Lifting every finger keeps the last position
        pointer.on_touches(&[], 20.0);
        assert_eq!(pointer.x(), Some(100.0));
    }

    #[test]
    fn test_pointer_relative_to_canvas() {
        let mut pointer = PointerTracker::new();
        pointer.on_pointer(250.0, 50.0);
        assert_eq!(pointer.tick_input(), TickInput::pointer(200.0));

        pointer.on_pointer(f32::NAN, 0.0);
        assert_eq!(pointer.x(), Some(200.0));
    }
}
