//! The player's skewer and the fruit stacked on it
//!
//! Stack geometry is always derived from the current fruit list, never cached.

use serde::{Deserialize, Serialize};

use super::fruit::{Fruit, FruitMotion};
use crate::approach;
use crate::consts::{
    FULL_TOLERANCE, SKEWER_HEIGHT, SKEWER_WIDTH, STACK_BASE_OFFSET, STACK_COMPACTION,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skewer {
    pub x: f32,
    /// Base (handle end)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Stacked fruit, bottom-most first
    pub fruits: Vec<Fruit>,
}

impl Skewer {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            width: SKEWER_WIDTH,
            height: SKEWER_HEIGHT,
            fruits: Vec::new(),
        }
    }

    /// Pointed end
    #[inline]
    pub fn tip_y(&self) -> f32 {
        self.y - self.height
    }

    /// Where the bottom-most fruit rests
    #[inline]
    pub fn stack_base_y(&self) -> f32 {
        self.y - STACK_BASE_OFFSET
    }

    pub fn stacked_height(&self) -> f32 {
        self.fruits.iter().map(|f| f.height * STACK_COMPACTION).sum()
    }

    pub fn stack_top_y(&self) -> f32 {
        self.stack_base_y() - self.stacked_height()
    }

    pub fn is_full(&self) -> bool {
        self.stack_top_y() <= self.tip_y() + FULL_TOLERANCE
    }

    /// Skewer a fruit on top of the current stack
    pub fn add_fruit(&mut self, mut fruit: Fruit) {
        let target_y = self.stack_base_y() - self.stacked_height() - fruit.height / 2.0;
        fruit.motion = FruitMotion::Skewered { target_y };
        self.fruits.push(fruit);
    }

    /// Re-derive every stacked fruit's x and slot from the skewer's current position
    pub fn update_fruit_positions(&mut self) {
        let base = self.stack_base_y();
        let mut stacked = 0.0;
        for fruit in &mut self.fruits {
            fruit.pos.x = self.x;
            fruit.motion = FruitMotion::Skewered {
                target_y: base - stacked - fruit.height / 2.0,
            };
            stacked += fruit.height * STACK_COMPACTION;
        }
    }

    /// Move stacked fruit toward their slots; `snap` jumps straight there
    pub fn settle_fruits(&mut self, snap: bool) {
        for fruit in &mut self.fruits {
            if snap {
                fruit.snap_to_target();
            } else {
                fruit.update(0.0, 0.0);
            }
        }
    }

    /// Ease toward a pointer x
    pub fn follow(&mut self, target_x: f32, t: f32) {
        self.x = approach(self.x, target_x, t);
    }

    /// Vertical extent (top, bottom) of the fruit currently on the skewer
    pub fn stack_extent(&self) -> Option<(f32, f32)> {
        if self.fruits.is_empty() {
            return None;
        }
        let top = self
            .fruits
            .iter()
            .map(|f| f.pos.y - f.height / 2.0)
            .fold(f32::INFINITY, f32::min);
        let bottom = self
            .fruits
            .iter()
            .map(|f| f.pos.y + f.height / 2.0)
            .fold(f32::NEG_INFINITY, f32::max);
        Some((top, bottom))
    }

    /// Widest stacked fruit
    pub fn stack_width(&self) -> f32 {
        self.fruits.iter().map(|f| f.width).fold(0.0, f32::max)
    }
}
