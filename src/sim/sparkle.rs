//! Coating sparkles (cosmetic particles, no gameplay effect)

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{SPARKLE_MAX_LIFE, SPARKLE_MIN_LIFE, SPARKLES_PER_FRAME};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sparkle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames lived
    pub life: u32,
    pub max_life: u32,
    pub size: f32,
}

impl Sparkle {
    /// Opacity, fading linearly to zero at the end of life
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        (1.0 - self.life as f32 / self.max_life as f32).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self) -> bool {
        self.life >= self.max_life
    }
}

/// All live sparkles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SparkleField {
    pub sparkles: Vec<Sparkle>,
}

impl SparkleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sparkles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sparkles.is_empty()
    }

    pub fn clear(&mut self) {
        self.sparkles.clear();
    }

    /// Emit one frame's worth of sparkles around a coating line at `line_y`,
    /// spread across `half_width` either side of `center_x`. Never grows past `cap`.
    pub fn emit<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        center_x: f32,
        line_y: f32,
        half_width: f32,
        cap: usize,
    ) {
        let spread = half_width.max(1.0);
        for _ in 0..SPARKLES_PER_FRAME {
            if self.sparkles.len() >= cap {
                return;
            }
            self.sparkles.push(Sparkle {
                pos: Vec2::new(
                    center_x + rng.random_range(-spread..=spread),
                    line_y + rng.random_range(-4.0..=4.0),
                ),
                vel: Vec2::new(rng.random_range(-0.5..=0.5), rng.random_range(-1.5..=-0.3)),
                life: 0,
                max_life: rng.random_range(SPARKLE_MIN_LIFE..=SPARKLE_MAX_LIFE),
                size: rng.random_range(1.5..=3.5),
            });
        }
    }

    /// Integrate, age, and drop expired sparkles
    pub fn update(&mut self) {
        for sparkle in &mut self.sparkles {
            sparkle.pos += sparkle.vel;
            sparkle.life += 1;
        }
        self.sparkles.retain(|s| !s.is_expired());
    }
}
