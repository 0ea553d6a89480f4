//! Shape generation for 2D primitives

use glam::Vec2;

use crate::consts::SKEWER_TIP_TAPER;
use crate::sim::Skewer;

/// Colors for game elements (linear RGBA)
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.99, 0.96, 0.92, 1.0];
    pub const SKEWER: [f32; 4] = [0.77, 0.53, 0.24, 1.0];
    pub const SKEWER_HIGHLIGHT: [f32; 4] = [0.83, 0.64, 0.36, 1.0];
    pub const COATING: [f32; 4] = [0.95, 0.62, 0.25, 0.45];
    pub const COATING_EDGE: [f32; 4] = [1.0, 0.85, 0.55, 0.9];
    pub const SPARKLE: [f32; 4] = [1.0, 0.98, 0.85, 1.0];
}

/// Closed outline of the skewer: straight stick with a tapered point
pub fn skewer_outline(skewer: &Skewer) -> [Vec2; 5] {
    let half = skewer.width / 2.0;
    let base = skewer.y;
    let tip = skewer.tip_y();
    [
        Vec2::new(skewer.x - half, base),
        Vec2::new(skewer.x - half, tip + SKEWER_TIP_TAPER),
        Vec2::new(skewer.x, tip),
        Vec2::new(skewer.x + half, tip + SKEWER_TIP_TAPER),
        Vec2::new(skewer.x + half, base),
    ]
}

/// Thin highlight line along the left edge of the stick
pub fn skewer_highlight(skewer: &Skewer) -> [Vec2; 2] {
    let x = skewer.x - skewer.width / 2.0 + 1.0;
    [
        Vec2::new(x, skewer.y),
        Vec2::new(x, skewer.tip_y() + SKEWER_TIP_TAPER),
    ]
}

/// Covered part of the stack: from the coating line down to the stack bottom
pub fn coating_band(line_y: f32, bottom: f32) -> (f32, f32) {
    (line_y.min(bottom), bottom)
}

/// CSS color string for canvas backends
pub fn css_color(color: [f32; 4], alpha: f32) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {:.3})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        (color[3] * alpha).clamp(0.0, 1.0)
    )
}
