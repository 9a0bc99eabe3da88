//! Hell Station entry point
//!
//! Handles platform-specific initialization and runs the game loop. The web
//! build publishes a JSON snapshot every frame for the canvas layer to draw.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use hell_station::Tuning;
    use hell_station::platform::{Clock, KeyboardInput, PerformanceClock};
    use hell_station::sim::{SimEvent, SimRng, World, tick};

    /// Number of art cars roaming the playa
    const CAR_COUNT: usize = 4;

    thread_local! {
        static SNAPSHOT: RefCell<String> = RefCell::new(String::from("{}"));
    }

    /// Latest world snapshot as JSON (read by the renderer each frame)
    #[wasm_bindgen]
    pub fn snapshot_json() -> String {
        SNAPSHOT.with(|s| s.borrow().clone())
    }

    /// Game instance holding all state
    struct Game {
        world: Option<World>,
        rng: SimRng,
        keys: KeyboardInput,
        clock: PerformanceClock,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let mut rng = SimRng::new(seed);
            let world = World::with_seed_layout(&mut rng, CAR_COUNT, Tuning::default());
            Self {
                world: Some(world),
                rng,
                keys: KeyboardInput::new(),
                clock: PerformanceClock::new(),
            }
        }

        /// Run one simulation tick
        fn update(&mut self) {
            let Some(world) = self.world.take() else {
                return;
            };
            let input = self.keys.take_tick_input();
            let now = self.clock.now_ms();
            let out = tick(world, &input, now, &mut self.rng);

            for event in &out.events {
                if let SimEvent::Delivered { car_id, karma, .. } = event {
                    log::info!(
                        "Fueled {} (+{} karma, total {})",
                        car_id,
                        karma,
                        out.world.player.karma
                    );
                }
            }

            match out.world.snapshot_json() {
                Ok(json) => SNAPSHOT.with(|s| *s.borrow_mut() = json),
                Err(e) => log::warn!("Snapshot failed: {}", e),
            }
            self.world = Some(out.world);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Hell Station starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window, cannot start");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&window, game.clone());
        request_animation_frame(game);

        log::info!("Hell Station running!");
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if game.borrow_mut().keys.key_down(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().keys.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur drops held keys so the player does not keep walking
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().keys.clear();
                log::info!("Input released (window blur)");
            });
            let _ = window
                .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().update();
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Hell Station (native) starting...");
    log::info!(
        "Native mode runs a headless autopilot - run with `trunk serve` for the web version"
    );

    // Usage: hell-station [seed] [tuning.json]
    let args: Vec<String> = std::env::args().collect();
    let seed = args
        .get(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(12345);
    let tuning = hell_station::Tuning::load_or_default(args.get(2).map(std::path::Path::new));
    let karma = headless::run(seed, 120.0, tuning);
    println!("Seed {seed}: autopilot earned {karma} karma in 120s");
}

/// Autopilot that plays the game without a display, mainly for smoke-testing balance
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use hell_station::Tuning;
    use hell_station::nearest_by;
    use hell_station::platform::{Clock, ManualClock};
    use hell_station::sim::{SimEvent, SimRng, TickInput, World, tick};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Steer the player: fetch the nearest ground can, then run it to the nearest car
    fn autopilot(world: &World) -> TickInput {
        let player = &world.player;
        if player.held_can().is_none() {
            let target = nearest_by(
                world.cans.iter().enumerate().filter(|(_, c)| !c.active),
                player.pos,
                |c| c.pos,
            )
            .map(|(idx, _)| world.cans[idx].pos)
            .unwrap_or_else(|| world.station.aabb.center());
            return TickInput {
                move_dir: target - player.pos,
                ..Default::default()
            };
        }

        let nearest = nearest_by(world.cars.iter().enumerate(), player.pos, |c| c.pos);
        let Some((idx, dist)) = nearest else {
            return TickInput::default();
        };
        TickInput {
            move_dir: world.cars[idx].pos - player.pos,
            deliver_or_drop: dist <= world.tuning.deliver_range,
            ..Default::default()
        }
    }

    pub fn run(seed: u64, seconds: f64, tuning: Tuning) -> u32 {
        let mut rng = SimRng::new(seed);
        let mut world = World::with_seed_layout(&mut rng, 4, tuning);
        let clock = ManualClock::new(0.0);
        log::info!("Game initialized with seed: {}", rng.seed());

        while clock.now_ms() < seconds * 1000.0 {
            clock.advance(FRAME_MS);
            let input = autopilot(&world);
            let out = tick(world, &input, clock.now_ms(), &mut rng);
            for event in &out.events {
                match event {
                    SimEvent::Delivered { car_id, karma, .. } => {
                        let secs = clock.now_ms() / 1000.0;
                        log::info!("t={:.1}s fueled {} (+{})", secs, car_id, karma)
                    }
                    SimEvent::CanPicked { id } => {
                        if let Some(can) = out.world.can(id) {
                            log::debug!("Picked {} at ({:.1}, {:.1})", id, can.pos.x, can.pos.y);
                        }
                    }
                    other => log::debug!("{:?}", other),
                }
            }
            world = out.world;
        }

        log::info!("{} cans left lying at the station", world.ground_cans_at_station());
        world.player.karma
    }
}
