//! Simulation state
//!
//! Everything the frame step mutates lives in one owned struct. Nothing else
//! holds references into it between ticks.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::fruit::Fruit;
use super::phase::{GamePhase, PhaseController};
use super::pool::RecyclingPool;
use super::skewer::Skewer;
use super::sparkle::SparkleField;
use super::spawn::SpawnLayout;
use crate::assets::{FruitAsset, max_fruit_size};
use crate::{Settings, SimError, Viewport};

/// Complete simulation state (deterministic for a given seed and input stream)
#[derive(Debug, Clone, Serialize)]
pub struct SimulationState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip)]
    pub rng: Pcg32,
    pub settings: Settings,
    pub viewport: Viewport,
    pub assets: Vec<FruitAsset>,
    /// Phase machine
    pub phase: PhaseController,
    /// Player skewer and its stack
    pub skewer: Skewer,
    /// Airborne fruit (falling or bouncing), in spawn order
    pub fruits: Vec<Fruit>,
    /// Free spawn slots
    pub pool: RecyclingPool,
    /// Coating particles (not gameplay-affecting)
    #[serde(skip)]
    pub sparkles: SparkleField,
    /// Last known pointer x (logical pixels)
    pub pointer_x: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Completed playing/coating/exiting cycles
    pub cycles_completed: u32,
    /// Next entity ID
    next_id: u32,
}

impl SimulationState {
    /// Set up a session: validate geometry, lay out spawn slots, drop the first fruit.
    ///
    /// About half the generated slots get a fruit right away (at least one);
    /// the rest start in the recycling pool.
    pub fn new(
        viewport: Viewport,
        assets: Vec<FruitAsset>,
        settings: Settings,
        seed: u64,
    ) -> Result<Self, SimError> {
        viewport.validate()?;
        if assets.is_empty() {
            return Err(SimError::NoAssets);
        }

        let settings = settings.validated();
        let mut rng = Pcg32::seed_from_u64(seed);
        let layout = SpawnLayout::new(viewport.width, max_fruit_size(&assets), settings.spawn_margin);
        let mut slots = layout.generate_non_empty(&mut rng)?;

        let airborne = slots.len().div_ceil(2);
        let free = slots.split_off(airborne);

        let mut state = Self {
            seed,
            rng,
            settings,
            viewport,
            assets,
            phase: PhaseController::new(),
            skewer: Skewer::new(viewport.center_x(), viewport.skewer_base_y()),
            fruits: Vec::with_capacity(slots.len()),
            pool: RecyclingPool::new(layout, free),
            sparkles: SparkleField::new(),
            pointer_x: viewport.center_x(),
            time_ticks: 0,
            cycles_completed: 0,
            next_id: 1,
        };

        for slot in slots {
            let fruit = state.spawn_fruit(slot);
            state.fruits.push(fruit);
        }

        log::info!(
            "Session started (seed {}): {}x{}, {} fruit falling, {} free slots",
            seed,
            viewport.width,
            viewport.height,
            state.fruits.len(),
            state.pool.len()
        );

        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// New falling fruit above the viewport at `slot_x`
    pub fn spawn_fruit(&mut self, slot_x: f32) -> Fruit {
        let id = self.next_entity_id();
        Fruit::spawn(&mut self.rng, id, slot_x, &self.assets, self.viewport.height)
    }

    /// Spawn slots currently held by airborne fruit
    pub fn occupied_slots(&self) -> Vec<f32> {
        self.fruits.iter().map(|f| f.slot_x).collect()
    }

    /// Hand `released` back to the pool and take a slot in exchange.
    ///
    /// `occupied` lists slots held by airborne fruit, `released` included; it
    /// is updated to hold the new slot instead.
    pub fn claim_slot(&mut self, released: f32, occupied: &mut Vec<f32>) -> f32 {
        if let Some(i) = occupied.iter().position(|x| *x == released) {
            occupied.swap_remove(i);
        }
        let slot = self.pool.acquire(&mut self.rng, released, occupied);
        occupied.push(slot);
        slot
    }

    /// Send an airborne fruit back to the top at a recycled slot
    pub fn recycle_fruit(&mut self, fruit: &mut Fruit, occupied: &mut Vec<f32>) {
        let slot = self.claim_slot(fruit.slot_x, occupied);
        fruit.respawn(&mut self.rng, slot, &self.assets, self.viewport.height);
    }

    /// Fresh empty skewer at the bottom center
    pub fn reset_skewer(&mut self) {
        self.skewer = Skewer::new(self.viewport.center_x(), self.viewport.skewer_base_y());
    }

    /// Adopt new viewport geometry without touching the game phase.
    ///
    /// The skewer moves to the new bottom edge (unless it is mid-exit, where
    /// the exit curve owns y) and its x is clamped only while playing.
    /// Airborne fruit whose slots no longer fit are reassigned or retired.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), SimError> {
        viewport.validate()?;
        self.viewport = viewport;

        let phase = self.phase.phase();
        if phase != GamePhase::Exiting {
            self.skewer.y = viewport.skewer_base_y();
        }
        if phase == GamePhase::Playing {
            self.skewer.x = self.skewer.x.clamp(0.0, viewport.width);
            self.pointer_x = self.pointer_x.clamp(0.0, viewport.width);
        }

        let layout = SpawnLayout::new(
            viewport.width,
            max_fruit_size(&self.assets),
            self.settings.spawn_margin,
        );
        self.refit_slots(&layout);
        let occupied = self.occupied_slots();
        self.pool.rebuild(&mut self.rng, layout, &occupied);

        log::info!(
            "Viewport resized to {}x{} (scale {}) during {}",
            viewport.width,
            viewport.height,
            viewport.scale,
            phase.as_str()
        );
        Ok(())
    }

    /// Keep airborne slots inside `layout` and well spaced. Fruit that can't
    /// keep their slot get a clear one, or leave play if none is left. At
    /// least one fruit always stays.
    fn refit_slots(&mut self, layout: &SpawnLayout) {
        let spacing = layout.spacing();
        let mut occupied: Vec<f32> = Vec::with_capacity(self.fruits.len());
        let fits: Vec<bool> = self
            .fruits
            .iter()
            .map(|fruit| {
                let x = fruit.slot_x;
                let fits = layout.contains(x) && occupied.iter().all(|o| (o - x).abs() >= spacing);
                if fits {
                    occupied.push(x);
                }
                fits
            })
            .collect();

        let fruits = std::mem::take(&mut self.fruits);
        let mut retired = Vec::new();
        for (mut fruit, fits) in fruits.into_iter().zip(fits) {
            if fits {
                self.fruits.push(fruit);
                continue;
            }
            match layout.sample_clear(&mut self.rng, &occupied) {
                Some(x) => {
                    log::debug!("Fruit {} moved from slot {} to {}", fruit.id, fruit.slot_x, x);
                    fruit.slot_x = x;
                    occupied.push(x);
                    self.fruits.push(fruit);
                }
                None => retired.push(fruit),
            }
        }

        if self.fruits.is_empty() {
            if let Some(mut fruit) = retired.pop() {
                if layout.has_room() {
                    fruit.slot_x = fruit.slot_x.clamp(layout.min_x(), layout.max_x());
                }
                self.fruits.push(fruit);
            }
        }
        if !retired.is_empty() {
            log::info!("{} fruit retired, no room in the new layout", retired.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets() -> Vec<FruitAsset> {
        vec![
            FruitAsset {
                id: "strawberry".into(),
                width: 60.0,
                height: 80.0,
            },
            FruitAsset {
                id: "tangerine".into(),
                width: 70.0,
                height: 70.0,
            },
        ]
    }

    #[test]
    fn test_new_state() {
        let state =
            SimulationState::new(Viewport::new(800.0, 810.0), assets(), Settings::default(), 1)
                .unwrap();
        assert_eq!(state.phase.phase(), GamePhase::Playing);
        assert!(!state.fruits.is_empty());
        assert_eq!(state.skewer.x, 400.0);
        assert_eq!(state.skewer.y, 770.0);
        assert!(state.skewer.fruits.is_empty());
        assert!(state.fruits.iter().all(|f| f.bottom() <= 0.0));

        // Airborne slots and free slots together stay well spaced
        let spacing = state.pool.layout().spacing();
        let mut all: Vec<f32> = state.fruits.iter().map(|f| f.slot_x).collect();
        all.extend_from_slice(state.pool.available());
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert!((a - b).abs() >= spacing);
            }
        }
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(matches!(
            SimulationState::new(Viewport::new(800.0, 600.0), Vec::new(), Settings::default(), 1),
            Err(SimError::NoAssets)
        ));
        assert!(matches!(
            SimulationState::new(Viewport::new(-1.0, 600.0), assets(), Settings::default(), 1),
            Err(SimError::InvalidViewport { .. })
        ));
        assert!(matches!(
            SimulationState::new(Viewport::new(90.0, 600.0), assets(), Settings::default(), 1),
            Err(SimError::NoSpawnPoints { .. })
        ));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = SimulationState::new(Viewport::new(1200.0, 800.0), assets(), Settings::default(), 77)
            .unwrap();
        let b = SimulationState::new(Viewport::new(1200.0, 800.0), assets(), Settings::default(), 77)
            .unwrap();
        let xs = |s: &SimulationState| s.fruits.iter().map(|f| f.pos).collect::<Vec<_>>();
        assert_eq!(xs(&a), xs(&b));
        assert_eq!(a.pool.available(), b.pool.available());
    }

    #[test]
    fn test_recycle_keeps_id() {
        let mut state =
            SimulationState::new(Viewport::new(800.0, 600.0), assets(), Settings::default(), 4)
                .unwrap();
        let mut fruit = state.fruits[0].clone();
        fruit.pos.y = 10_000.0;
        let pool_before = state.pool.len();
        let mut occupied = state.occupied_slots();
        state.recycle_fruit(&mut fruit, &mut occupied);
        assert_eq!(fruit.id, state.fruits[0].id);
        assert!(fruit.is_falling());
        assert!(fruit.bottom() <= 0.0);
        assert_eq!(state.pool.len(), pool_before);
        assert!(occupied.contains(&fruit.slot_x));
        assert_eq!(occupied.len(), state.fruits.len());
    }

    #[test]
    fn test_resize_repositions_skewer() {
        let mut state =
            SimulationState::new(Viewport::new(800.0, 810.0), assets(), Settings::default(), 2)
                .unwrap();
        state.skewer.x = 700.0;
        state
            .resize(Viewport::new(400.0, 600.0).with_scale(2.0))
            .unwrap();
        assert_eq!(state.skewer.y, 560.0);
        assert_eq!(state.skewer.x, 400.0);
        assert_eq!(state.phase.phase(), GamePhase::Playing);
        assert!(state.pool.available().iter().all(|x| *x <= 400.0));

        assert!(state.resize(Viewport::new(0.0, 600.0)).is_err());
    }

    #[test]
    fn test_resize_keeps_frozen_x_while_coating() {
        let mut state =
            SimulationState::new(Viewport::new(800.0, 810.0), assets(), Settings::default(), 2)
                .unwrap();
        state.skewer.x = 700.0;
        state.phase.begin_coating();
        state.resize(Viewport::new(400.0, 600.0)).unwrap();
        assert_eq!(state.skewer.x, 700.0);
        assert_eq!(state.phase.phase(), GamePhase::Coating);
    }

    fn assert_slots_spaced(state: &SimulationState) {
        let layout = state.pool.layout();
        let mut all = state.occupied_slots();
        all.extend_from_slice(state.pool.available());
        for (i, a) in all.iter().enumerate() {
            assert!(layout.contains(*a), "slot {} outside the layout", a);
            for b in &all[i + 1..] {
                assert!((a - b).abs() >= layout.spacing(), "slots {} and {} overlap", a, b);
            }
        }
    }

    #[test]
    fn test_shrink_keeps_slots_apart() {
        for seed in 0..24 {
            let mut state =
                SimulationState::new(Viewport::new(1600.0, 800.0), assets(), Settings::default(), seed)
                    .unwrap();
            state.resize(Viewport::new(400.0, 800.0)).unwrap();
            assert!(!state.fruits.is_empty());
            assert_slots_spaced(&state);

            for i in 0..3_000 {
                let input = crate::sim::TickInput::pointer((i as f32 * 0.03).sin() * 150.0 + 200.0);
                crate::sim::tick(&mut state, &input);
            }
            assert!(!state.fruits.is_empty());
            assert!(state.fruits.len() <= state.pool.layout().max_count());
            assert_slots_spaced(&state);
        }
    }

    #[test]
    fn test_resize_to_no_room_keeps_one_fruit() {
        let mut state =
            SimulationState::new(Viewport::new(1600.0, 800.0), assets(), Settings::default(), 5)
                .unwrap();
        state.resize(Viewport::new(90.0, 800.0)).unwrap();
        assert_eq!(state.fruits.len(), 1);
        assert!(state.pool.is_empty());
    }

    #[test]
    fn test_resize_mid_exit_leaves_y_to_exit_curve() {
        let mut state =
            SimulationState::new(Viewport::new(800.0, 810.0), assets(), Settings::default(), 2)
                .unwrap();
        state.skewer.x = 650.0;
        state.phase.begin_exit(state.skewer.y);
        state.phase.advance();
        state.skewer.y = state.phase.exit_y(state.skewer.height);
        let (x, y) = (state.skewer.x, state.skewer.y);

        state.resize(Viewport::new(400.0, 600.0)).unwrap();
        assert_eq!(state.phase.phase(), GamePhase::Exiting);
        assert_eq!(state.skewer.y, y);
        assert_eq!(state.skewer.x, x);
        assert_eq!(state.phase.frame_counter(), 1);
    }
}
