//! Game phase state machine
//!
//! `Playing -> Coating -> Exiting -> Playing`, forever. The controller owns
//! the phase, its frame counter and the exit animation's start height; the
//! tick decides when to ask it to move on.

use serde::{Deserialize, Serialize};

use super::skewer::Skewer;
use crate::consts::{COATING_FRAMES, EXIT_CLEAR_Y, EXIT_FRAMES, EXIT_OVERSHOOT};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Skewer follows the pointer and catches fruit
    Playing,
    /// Stack is full; coating rises over it
    Coating,
    /// Coated skewer accelerates off the top of the screen
    Exiting,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Playing => "playing",
            GamePhase::Coating => "coating",
            GamePhase::Exiting => "exiting",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseController {
    phase: GamePhase,
    /// Frames spent in the current timed phase
    frame_counter: u32,
    /// Skewer y when exiting began
    exit_start_y: f32,
}

impl Default for PhaseController {
    fn default() -> Self {
        Self {
            phase: GamePhase::Playing,
            frame_counter: 0,
            exit_start_y: 0.0,
        }
    }
}

impl PhaseController {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn frame_counter(&self) -> u32 {
        self.frame_counter
    }

    #[inline]
    pub fn exit_start_y(&self) -> f32 {
        self.exit_start_y
    }

    /// Normalized progress of the current timed phase (0 while playing)
    pub fn progress(&self) -> f32 {
        let duration = match self.phase {
            GamePhase::Playing => return 0.0,
            GamePhase::Coating => COATING_FRAMES,
            GamePhase::Exiting => EXIT_FRAMES,
        };
        (self.frame_counter as f32 / duration as f32).min(1.0)
    }

    /// Progress the coating overlay is drawn at
    pub fn coating_progress(&self) -> f32 {
        match self.phase {
            GamePhase::Playing => 0.0,
            GamePhase::Coating => self.progress(),
            GamePhase::Exiting => 1.0,
        }
    }

    /// Count one frame of the current timed phase and return its progress
    pub fn advance(&mut self) -> f32 {
        if self.phase != GamePhase::Playing {
            self.frame_counter += 1;
        }
        self.progress()
    }

    /// Stack just filled up
    pub fn begin_coating(&mut self) {
        self.phase = GamePhase::Coating;
        self.frame_counter = 0;
    }

    /// Coating finished; remember where the skewer starts its exit
    pub fn begin_exit(&mut self, skewer_y: f32) {
        self.phase = GamePhase::Exiting;
        self.exit_start_y = skewer_y;
        self.frame_counter = 0;
    }

    /// Start a new cycle
    pub fn begin_playing(&mut self) {
        self.phase = GamePhase::Playing;
        self.frame_counter = 0;
    }

    /// Skewer y for the current exit frame (quadratic ease-in)
    pub fn exit_y(&self, skewer_height: f32) -> f32 {
        let eased = self.progress().powi(2);
        let start = self.exit_start_y;
        start - (start + skewer_height + EXIT_OVERSHOOT) * eased
    }

    /// Whether the skewer has fully cleared the top of the viewport
    pub fn exit_complete(skewer: &Skewer) -> bool {
        skewer.y + skewer.height < EXIT_CLEAR_Y
    }
}
