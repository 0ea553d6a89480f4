//! Fruit Skewer entry point
//!
//! Browser: loads sprites, wires pointer input and runs the frame loop on
//! `requestAnimationFrame`. Native: runs a headless session and prints a summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, PointerEvent, TouchEvent};

    use fruit_skewer::assets::{AssetRequest, size_assets};
    use fruit_skewer::platform::PointerTracker;
    use fruit_skewer::platform::web::{CanvasSink, load_images};
    use fruit_skewer::renderer::{RenderSink, build_frame};
    use fruit_skewer::scheduler::StopHandle;
    use fruit_skewer::sim::{GameEvent, SimulationState, tick};
    use fruit_skewer::{Settings, Viewport};

    const FRUITS: [&str; 6] = ["strawberry", "grape", "tangerine", "kiwi", "blueberry", "pineapple"];

    /// Game instance holding all state
    struct Game {
        state: SimulationState,
        sink: CanvasSink,
        pointer: PointerTracker,
        canvas: HtmlCanvasElement,
    }

    impl Game {
        fn frame(&mut self) {
            let input = self.pointer.tick_input();
            for event in tick(&mut self.state, &input) {
                if let GameEvent::CycleCompleted { cycles } = event {
                    log::info!("Skewer {} served", cycles);
                }
            }
            self.sink.submit(&build_frame(&self.state));
        }

        fn canvas_left(&self) -> f32 {
            self.canvas.get_bounding_client_rect().left() as f32
        }
    }

    /// Size the canvas backing store to the window and return the logical viewport
    fn fit_canvas(canvas: &HtmlCanvasElement) -> Viewport {
        let window = web_sys::window().expect("no window");
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0);
        let scale = window.device_pixel_ratio();

        canvas.set_width((width * scale) as u32);
        canvas.set_height((height * scale) as u32);
        Viewport::new(width as f32, height as f32).with_scale(scale as f32)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no #canvas element")
            .dyn_into()
            .expect("#canvas is not a canvas");

        let settings = Settings::load();
        let viewport = fit_canvas(&canvas);
        let requests: Vec<AssetRequest> = FRUITS
            .iter()
            .map(|id| AssetRequest::new(*id, settings.fruit_size))
            .collect();

        let (images, loaded) = match load_images(&requests, "assets").await {
            Ok(batch) => batch,
            Err(e) => {
                log::error!("{}", e);
                return;
            }
        };

        let seed = js_sys::Date::now() as u64;
        let state = match size_assets(&requests, &loaded)
            .and_then(|assets| SimulationState::new(viewport, assets, settings, seed))
        {
            Ok(state) => state,
            Err(e) => {
                log::error!("Failed to start: {}", e);
                return;
            }
        };
        let sink = match CanvasSink::new(&canvas, images) {
            Ok(sink) => sink,
            Err(e) => {
                log::error!("Canvas unavailable: {:?}", e);
                return;
            }
        };

        let game = Rc::new(RefCell::new(Game {
            state,
            sink,
            pointer: PointerTracker::new(),
            canvas: canvas.clone(),
        }));

        setup_input(&canvas, game.clone());
        setup_resize(game.clone());

        let stop = StopHandle::new();
        start_frame_loop(game, stop);
    }

    fn setup_input(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                let left = g.canvas_left();
                g.pointer.on_pointer(event.client_x() as f32, left);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for kind in ["touchstart", "touchmove"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let touches = event.touches();
                let xs: Vec<f32> = (0..touches.length())
                    .filter_map(|i| touches.get(i))
                    .map(|t| t.client_x() as f32)
                    .collect();
                let mut g = game.borrow_mut();
                let left = g.canvas_left();
                g.pointer.on_touches(&xs, left);
            });
            let _ = canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            let viewport = fit_canvas(&g.canvas);
            if let Err(e) = g.state.resize(viewport) {
                log::warn!("Ignoring resize: {}", e);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(f: &Closure<dyn FnMut()>) {
        if let Some(window) = web_sys::window() {
            let _ = window.request_animation_frame(f.as_ref().unchecked_ref());
        }
    }

    /// One tick per animation frame until the stop flag is set
    fn start_frame_loop(game: Rc<RefCell<Game>>, stop: StopHandle) {
        let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();

        *g.borrow_mut() = Some(Closure::new(move || {
            if stop.is_stopped() {
                log::info!("Frame loop stopped");
                return;
            }
            game.borrow_mut().frame();
            if let Some(next) = f.borrow().as_ref() {
                request_animation_frame(next);
            }
        }));

        if let Some(first) = g.borrow().as_ref() {
            request_animation_frame(first);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use serde::Serialize;

    use fruit_skewer::assets::{AssetRequest, StaticAssets, resolve_assets};
    use fruit_skewer::renderer::RecordingSink;
    use fruit_skewer::scheduler::{FrameBudget, FrameLoop, StopHandle};
    use fruit_skewer::sim::{GameEvent, SimulationState, TickInput};
    use fruit_skewer::{Settings, SimError, Viewport};

    /// What a headless session did
    #[derive(Debug, Default, Serialize)]
    pub struct SessionSummary {
        pub seed: u64,
        pub frames: u64,
        pub caught: u32,
        pub bounced: u32,
        pub recycled: u32,
        pub cycles: u32,
        pub final_phase: String,
        pub airborne: usize,
        pub free_slots: usize,
    }

    pub fn run(settings: Settings, frames: u64, seed: u64) -> Result<SessionSummary, SimError> {
        let ids = ["strawberry", "grape", "tangerine", "kiwi"];
        let requests: Vec<AssetRequest> = ids
            .iter()
            .map(|id| AssetRequest::new(*id, settings.fruit_size))
            .collect();
        let assets = resolve_assets(&mut StaticAssets::squares(&ids, 256.0), &requests)?;

        let viewport = Viewport::new(390.0, 844.0);
        let mut state = SimulationState::new(viewport, assets, settings, seed)?;
        let mut summary = SessionSummary {
            seed,
            ..Default::default()
        };

        let mut frame_loop = FrameLoop::new(StopHandle::new());
        let mut sink = RecordingSink::default();
        frame_loop.run(
            &mut state,
            &mut FrameBudget(frames),
            &mut sink,
            // Chase the lowest falling fruit, like a player would
            |s| {
                let target = s
                    .fruits
                    .iter()
                    .filter(|f| f.is_falling() && f.pos.y < s.skewer.tip_y())
                    .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                    .map(|f| f.pos.x);
                TickInput { pointer_x: target }
            },
            |events| {
                for event in events {
                    match event {
                        GameEvent::FruitCaught { .. } => summary.caught += 1,
                        GameEvent::FruitBounced { .. } => summary.bounced += 1,
                        GameEvent::FruitRecycled { .. } => summary.recycled += 1,
                        GameEvent::CycleCompleted { cycles } => summary.cycles = *cycles,
                        GameEvent::PhaseChanged { .. } => {}
                    }
                }
            },
        );

        summary.frames = frame_loop.frames();
        summary.final_phase = state.phase.phase().as_str().to_string();
        summary.airborne = state.fruits.len();
        summary.free_slots = state.pool.len();
        Ok(summary)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Fruit Skewer (native, headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) if path != "-" => match fruit_skewer::Settings::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Could not read {}: {} (using defaults)", path, e);
                fruit_skewer::Settings::default()
            }
        },
        _ => fruit_skewer::Settings::load(),
    };
    let frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(3_600);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12_345);

    match headless::run(settings, frames, seed) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Could not encode summary: {}", e),
        },
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}
