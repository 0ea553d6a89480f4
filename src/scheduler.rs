//! Frame loop
//!
//! `while running { tick; render; wait for next frame }`, with a single
//! cancellation flag checked once per iteration. Stopping the loop is the only
//! way to cancel anything.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::consts::FRAMES_PER_SECOND;
use crate::renderer::{RenderSink, build_frame};
use crate::sim::{GameEvent, SimulationState, TickInput, tick};

/// Shared stop flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

/// Something that says when the next frame may run
pub trait FrameSignal {
    /// Block until the next frame. `false` means no more frames will come.
    fn wait_next_frame(&mut self) -> bool;
}

/// Sleeps to hold a fixed frame rate
#[derive(Debug)]
pub struct FixedRate {
    period: Duration,
    next: Option<Instant>,
}

impl FixedRate {
    pub fn new(fps: u32) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            next: None,
        }
    }
}

impl Default for FixedRate {
    fn default() -> Self {
        Self::new(FRAMES_PER_SECOND)
    }
}

impl FrameSignal for FixedRate {
    fn wait_next_frame(&mut self) -> bool {
        let now = Instant::now();
        let next = self.next.unwrap_or(now);
        if next > now {
            std::thread::sleep(next - now);
        }
        // Don't try to catch up after a stall
        self.next = Some(next.max(now) + self.period);
        true
    }
}

/// Runs a fixed number of frames as fast as possible
#[derive(Debug, Clone, Copy)]
pub struct FrameBudget(pub u64);

impl FrameSignal for FrameBudget {
    fn wait_next_frame(&mut self) -> bool {
        if self.0 == 0 {
            return false;
        }
        self.0 -= 1;
        true
    }
}

/// Drives a simulation: one tick and one rendered frame per signal
pub struct FrameLoop {
    stop: StopHandle,
    frames: u64,
}

impl FrameLoop {
    pub fn new(stop: StopHandle) -> Self {
        Self { stop, frames: 0 }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Frames run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run until stopped or the signal runs dry. `input` is polled once per
    /// frame; `on_events` sees every tick's events.
    pub fn run<S, K, I, E>(
        &mut self,
        state: &mut SimulationState,
        signal: &mut S,
        sink: &mut K,
        mut input: I,
        mut on_events: E,
    ) where
        S: FrameSignal + ?Sized,
        K: RenderSink + ?Sized,
        I: FnMut(&SimulationState) -> TickInput,
        E: FnMut(&[GameEvent]),
    {
        while !self.stop.is_stopped() {
            if !signal.wait_next_frame() {
                break;
            }
            let tick_input = input(state);
            let events = tick(state, &tick_input);
            if !events.is_empty() {
                on_events(&events);
            }
            sink.submit(&build_frame(state));
            self.frames += 1;
        }
        log::debug!("Frame loop exited after {} frames", self.frames);
    }
}
