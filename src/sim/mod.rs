//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per display frame, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (spawn order for airborne fruit, stack order on the skewer)
//! - No rendering or platform dependencies

pub mod collision;
pub mod fruit;
pub mod phase;
pub mod pool;
pub mod skewer;
pub mod sparkle;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{collides, stacked_contact};
pub use fruit::{Fruit, FruitMotion};
pub use phase::{GamePhase, PhaseController};
pub use pool::RecyclingPool;
pub use skewer::Skewer;
pub use sparkle::{Sparkle, SparkleField};
pub use spawn::SpawnLayout;
pub use state::SimulationState;
pub use tick::{GameEvent, TickInput, coating_line_y, tick};
