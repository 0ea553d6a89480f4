//! Frame description
//!
//! The simulation says where things are; a `RenderSink` decides how to paint
//! them. `build_frame` walks the state in draw order and emits commands in
//! logical pixels.

pub mod shapes;

use glam::Vec2;
use serde::Serialize;

use crate::sim::{Fruit, GamePhase, SimulationState, coating_line_y};

/// One thing to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    /// Fill the whole viewport
    Clear { color: [f32; 4] },
    /// Sprite centered at `center`, rotated by `rotation` radians
    Sprite {
        asset: usize,
        center: Vec2,
        width: f32,
        height: f32,
        rotation: f32,
    },
    /// Filled closed polygon
    Polygon { points: Vec<Vec2>, color: [f32; 4] },
    /// Stroked line
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: [f32; 4],
    },
    /// Coating over the stack between `top` and `bottom`, with its rising edge at `top`
    Coating {
        center_x: f32,
        width: f32,
        top: f32,
        bottom: f32,
        progress: f32,
    },
    /// Soft round particle
    Sparkle { center: Vec2, size: f32, alpha: f32 },
}

/// Everything needed to paint one frame
#[derive(Debug, Clone, Default, Serialize)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
    /// Device pixels per logical pixel
    pub scale: f32,
    pub commands: Vec<DrawCommand>,
}

/// The render collaborator
pub trait RenderSink {
    fn submit(&mut self, frame: &Frame);
}

/// Sink that keeps the last frame, for headless runs and tests
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames_seen: u64,
    pub last: Option<Frame>,
}

impl RenderSink for RecordingSink {
    fn submit(&mut self, frame: &Frame) {
        self.frames_seen += 1;
        self.last = Some(frame.clone());
    }
}

fn sprite(fruit: &Fruit) -> DrawCommand {
    DrawCommand::Sprite {
        asset: fruit.asset,
        center: fruit.pos,
        width: fruit.width,
        height: fruit.height,
        rotation: fruit.draw_angle(),
    }
}

/// Describe the current state: airborne fruit, skewer, stack, coating, sparkles
pub fn build_frame(state: &SimulationState) -> Frame {
    let mut commands = Vec::with_capacity(state.fruits.len() + state.skewer.fruits.len() + 8);
    commands.push(DrawCommand::Clear {
        color: shapes::colors::BACKGROUND,
    });

    commands.extend(state.fruits.iter().map(sprite));

    let skewer = &state.skewer;
    commands.push(DrawCommand::Polygon {
        points: shapes::skewer_outline(skewer).to_vec(),
        color: shapes::colors::SKEWER,
    });
    let [from, to] = shapes::skewer_highlight(skewer);
    commands.push(DrawCommand::Line {
        from,
        to,
        width: 1.0,
        color: shapes::colors::SKEWER_HIGHLIGHT,
    });

    commands.extend(skewer.fruits.iter().map(sprite));

    if state.phase.phase() != GamePhase::Playing {
        if let Some((top, bottom)) = skewer.stack_extent() {
            let progress = state.phase.coating_progress();
            let (top, bottom) = shapes::coating_band(coating_line_y(top, bottom, progress), bottom);
            commands.push(DrawCommand::Coating {
                center_x: skewer.x,
                width: skewer.stack_width(),
                top,
                bottom,
                progress,
            });
        }
    }

    commands.extend(state.sparkles.sparkles.iter().map(|s| DrawCommand::Sparkle {
        center: s.pos,
        size: s.size,
        alpha: s.alpha(),
    }));

    Frame {
        width: state.viewport.width,
        height: state.viewport.height,
        scale: state.viewport.scale,
        commands,
    }
}
