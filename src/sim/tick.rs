//! Per-frame simulation step
//!
//! Fixed order every frame:
//! 1. skewer kinematics (pointer follow, or the exit curve)
//! 2. airborne fruit: move, catch, bounce off a full stack, recycle
//! 3. stack layout and skewered-fruit settling
//! 4. coating overlay, sparkles and phase transitions

use serde::{Deserialize, Serialize};

use super::collision::{collides, stacked_contact};
use super::phase::{GamePhase, PhaseController};
use super::state::SimulationState;
use crate::consts::{BOUNCE_BOUNDS_MARGIN, SKEWER_FOLLOW};

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Pointer x in logical pixels, if it moved or is still held
    pub pointer_x: Option<f32>,
}

impl TickInput {
    pub fn pointer(x: f32) -> Self {
        Self { pointer_x: Some(x) }
    }
}

/// Things that happened during a tick, for hosts that want sound or stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    FruitCaught { id: u32, stack_size: usize },
    FruitBounced { id: u32 },
    FruitRecycled { id: u32, slot_x: f32 },
    PhaseChanged { from: GamePhase, to: GamePhase },
    CycleCompleted { cycles: u32 },
}

/// Advance the simulation by one frame
pub fn tick(state: &mut SimulationState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    if let Some(x) = input.pointer_x {
        if x.is_finite() {
            state.pointer_x = x.clamp(0.0, state.viewport.width);
        }
    }

    // 1. Skewer kinematics
    match state.phase.phase() {
        GamePhase::Playing => state.skewer.follow(state.pointer_x, SKEWER_FOLLOW),
        GamePhase::Coating => {}
        GamePhase::Exiting => {
            state.phase.advance();
            state.skewer.y = state.phase.exit_y(state.skewer.height);
        }
    }

    // 2. Airborne fruit
    update_fruits(state, &mut events);

    // 3. Stack
    state.skewer.update_fruit_positions();
    state
        .skewer
        .settle_fruits(state.phase.phase() == GamePhase::Exiting);

    // 4. Overlay and transitions
    state.sparkles.update();
    advance_phase(state, &mut events);

    events
}

fn update_fruits(state: &mut SimulationState, events: &mut Vec<GameEvent>) {
    let rotate_speed = state.settings.rotate_speed;
    let fall_speed = state.settings.fall_speed;
    let catching = state.phase.phase() == GamePhase::Playing;
    let (width, height) = (state.viewport.width, state.viewport.height);

    let fruits = std::mem::take(&mut state.fruits);
    // Slots held by airborne fruit, kept current as slots change hands
    let mut occupied: Vec<f32> = fruits.iter().map(|f| f.slot_x).collect();
    let mut airborne = Vec::with_capacity(fruits.len());
    let mut replacements = Vec::new();

    for mut fruit in fruits {
        fruit.update(rotate_speed, fall_speed);

        if catching && collides(&fruit, &state.skewer) {
            let id = fruit.id;
            let slot = state.claim_slot(fruit.slot_x, &mut occupied);
            replacements.push(state.spawn_fruit(slot));

            state.skewer.add_fruit(fruit);
            let stack_size = state.skewer.fruits.len();
            log::debug!("Fruit {} caught ({} on skewer)", id, stack_size);
            events.push(GameEvent::FruitCaught { id, stack_size });
            continue;
        }

        if state.skewer.is_full() {
            if let Some(center) = stacked_contact(&fruit, &state.skewer) {
                fruit.bounce(center);
                log::debug!("Fruit {} bounced off the stack", fruit.id);
                events.push(GameEvent::FruitBounced { id: fruit.id });
            }
        }

        if fruit.is_out_of_bounds(width, height, BOUNCE_BOUNDS_MARGIN) {
            state.recycle_fruit(&mut fruit, &mut occupied);
            events.push(GameEvent::FruitRecycled {
                id: fruit.id,
                slot_x: fruit.slot_x,
            });
        }

        airborne.push(fruit);
    }

    airborne.extend(replacements);
    state.fruits = airborne;
}

fn advance_phase(state: &mut SimulationState, events: &mut Vec<GameEvent>) {
    let from = state.phase.phase();
    match from {
        GamePhase::Playing => {
            if state.skewer.is_full() {
                state.phase.begin_coating();
                state.sparkles.clear();
            }
        }
        GamePhase::Coating => {
            let progress = state.phase.advance();
            emit_coating_sparkles(state, progress);
            if progress >= 1.0 {
                state.phase.begin_exit(state.skewer.y);
            }
        }
        GamePhase::Exiting => {
            emit_coating_sparkles(state, 1.0);
            if PhaseController::exit_complete(&state.skewer) {
                state.reset_skewer();
                state.phase.begin_playing();
                state.sparkles.clear();
                state.cycles_completed += 1;
                log::info!("Cycle {} complete", state.cycles_completed);
                events.push(GameEvent::CycleCompleted {
                    cycles: state.cycles_completed,
                });
            }
        }
    }

    let to = state.phase.phase();
    if to != from {
        log::info!("Phase {} -> {}", from.as_str(), to.as_str());
        events.push(GameEvent::PhaseChanged { from, to });
    }
}

/// Sparkles ride the coating line as it climbs the stack
fn emit_coating_sparkles(state: &mut SimulationState, progress: f32) {
    let cap = state.settings.max_sparkles();
    if cap == 0 {
        return;
    }
    let Some((top, bottom)) = state.skewer.stack_extent() else {
        return;
    };
    let line_y = coating_line_y(top, bottom, progress);
    let half_width = state.skewer.stack_width() / 2.0;
    state
        .sparkles
        .emit(&mut state.rng, state.skewer.x, line_y, half_width, cap);
}

/// Height of the coating line for a stack spanning `top..bottom`
pub fn coating_line_y(top: f32, bottom: f32, progress: f32) -> f32 {
    bottom - (bottom - top) * progress.clamp(0.0, 1.0)
}
