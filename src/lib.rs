//! Fruit Skewer - catch falling fruit on a skewer, coat the stack, send it off
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, kinematics, collisions, game phases)
//! - `renderer`: Frame description handed to whatever paints it
//! - `scheduler`: Explicit frame loop with cooperative cancellation
//! - `platform`: Pointer input collapse and browser glue
//! - `assets`: Sprite sizing at the asset-provider boundary
//! - `settings`: Data-driven game feel

pub mod assets;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::{QualityPreset, Settings};

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Display refresh the simulation is tuned for (one tick per frame)
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// Skewer geometry
    pub const SKEWER_WIDTH: f32 = 6.0;
    pub const SKEWER_HEIGHT: f32 = 300.0;
    /// Distance from viewport bottom to the skewer base (handle end)
    pub const SKEWER_BOTTOM_OFFSET: f32 = 40.0;
    /// Length of the tapered point at the tip
    pub const SKEWER_TIP_TAPER: f32 = 15.0;
    /// Pointer smoothing while playing
    pub const SKEWER_FOLLOW: f32 = 0.12;

    /// Stacking starts this far above the skewer base
    pub const STACK_BASE_OFFSET: f32 = 40.0;
    /// Each stacked fruit contributes this fraction of its height (30% overlap)
    pub const STACK_COMPACTION: f32 = 0.7;
    /// Skewer counts as full once the stack top is within this distance of the tip
    pub const FULL_TOLERANCE: f32 = 20.0;
    /// Skewered fruit easing toward their stack slot
    pub const SKEWERED_EASE: f32 = 0.05;

    /// Catch window
    pub const CATCH_RADIUS_X: f32 = 30.0;
    pub const CATCH_BAND: f32 = 20.0;
    /// Allowed overlap before a falling fruit bounces off the full stack
    pub const STACK_OVERLAP_TOLERANCE: f32 = 10.0;

    /// Bounce model
    pub const BOUNCE_SPEED: f32 = 6.0;
    pub const BOUNCE_GRAVITY: f32 = 0.15;
    pub const BOUNCE_SPIN: f32 = 0.1;
    /// Bouncing fruit may leave the viewport by this much before recycling
    pub const BOUNCE_BOUNDS_MARGIN: f32 = 100.0;

    /// Phase timings (frames)
    pub const COATING_FRAMES: u32 = 60;
    pub const EXIT_FRAMES: u32 = 90;
    /// Extra distance the skewer travels past the top edge while exiting
    pub const EXIT_OVERSHOOT: f32 = 100.0;
    /// Cycle resets once the skewer tip end is above this y
    pub const EXIT_CLEAR_Y: f32 = -50.0;

    /// Sparkles
    pub const SPARKLES_PER_FRAME: usize = 3;
    pub const SPARKLE_MIN_LIFE: u32 = 20;
    pub const SPARKLE_MAX_LIFE: u32 = 40;

    /// Spawn sampling
    pub const SPAWN_REJECTION_LIMIT: u32 = 1000;
    pub const SPAWN_RETRY_LIMIT: u32 = 32;
}

/// Logical viewport geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in logical pixels
    pub width: f32,
    /// Height in logical pixels
    pub height: f32,
    /// Device pixels per logical pixel
    pub scale: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scale: 1.0,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Reject degenerate geometry before it reaches the simulation
    pub fn validate(&self) -> Result<(), SimError> {
        let finite = self.width.is_finite() && self.height.is_finite() && self.scale.is_finite();
        if !finite || self.width <= 0.0 || self.height <= 0.0 || self.scale <= 0.0 {
            return Err(SimError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Horizontal center
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    /// Where a fresh skewer's base sits
    #[inline]
    pub fn skewer_base_y(&self) -> f32 {
        self.height - consts::SKEWER_BOTTOM_OFFSET
    }
}

/// Ease-out used by exponential smoothing: move `t` of the way toward `target`
#[inline]
pub fn approach(current: f32, target: f32, t: f32) -> f32 {
    current + (target - current) * t
}
