//! Lane Dodger entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

    use lane_dodger::assets::{AssetError, AssetFanIn, LoadedAssets, SPRITES};
    use lane_dodger::audio::{AudioManager, SoundEffect};
    use lane_dodger::persistence::LocalStorageStore;
    use lane_dodger::platform::input::CONTROLS;
    use lane_dodger::platform::{FrameClock, InputAction, action_for_key};
    use lane_dodger::sim::{Command, EntityKind, FieldLayout, Phase, SimulationCore};
    use lane_dodger::{GameConfig, Settings};

    type Sprites = LoadedAssets<HtmlImageElement>;

    /// Pending sprite loads and what to do once they all report
    struct Loader {
        fan_in: Option<AssetFanIn<HtmlImageElement>>,
        on_ready: Option<Box<dyn FnOnce(Sprites)>>,
    }

    /// Game instance holding all state
    struct Game {
        core: SimulationCore<LocalStorageStore>,
        sprites: Sprites,
        ctx: CanvasRenderingContext2d,
        document: Document,
        clock: FrameClock,
        audio: AudioManager,
        settings: Settings,
        road_offset: f32,
    }

    impl Game {
        /// Apply one input action
        fn dispatch(&mut self, action: InputAction) {
            match action {
                InputAction::Game(command) => {
                    self.audio.resume();
                    let before = self.core.phase();
                    self.core.push_command(command);
                    if before != Phase::Running && self.core.phase() == Phase::Running {
                        self.clock.reset();
                    }
                }
                InputAction::ToggleMute => {
                    let muted = self.settings.toggle_mute();
                    self.audio.set_volume(self.settings.effective_volume());
                    self.settings.save();
                    log::info!("Muted: {}", muted);
                }
            }
        }

        /// Tab shown/hidden
        fn set_hidden(&mut self, hidden: bool) {
            if !self.settings.pause_when_hidden {
                return;
            }
            self.core.set_paused(hidden);
            self.clock.reset();
            if hidden {
                log::info!("Auto-paused (tab hidden)");
            }
        }

        /// One animation frame: simulate, play sounds, draw
        fn frame(&mut self, time: f64) {
            let dt = self.clock.tick(time);
            self.core.tick(dt);

            if self.core.phase() == Phase::Running {
                self.road_offset += self.core.obstacle_speed() * dt / 1000.0;
            }

            for event in self.core.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
            }

            self.render();
            self.update_hud();
        }

        /// Render the current frame
        fn render(&self) {
            let layout = self.core.state().layout;
            let snapshot = self.core.snapshot();

            self.ctx
                .clear_rect(0.0, 0.0, layout.width as f64, layout.height as f64);
            self.draw_road(&layout);

            for entity in snapshot.entities {
                let size = entity.kind.size();
                let origin = layout.sprite_origin(entity.lane, entity.position, size);
                let (sprite, fallback) = match entity.kind {
                    EntityKind::Obstacle => ("enemy", "#d33"),
                    EntityKind::Collectible => ("coin", "#fc3"),
                };
                self.draw_sprite(sprite, origin, size, fallback);
            }

            let size = layout.player_size();
            let origin = layout.sprite_origin(snapshot.player_lane, layout.player_top, size);
            self.draw_sprite("player", origin, size, "#39f");
        }

        /// Draw a sprite, or a coloured box if it failed to load
        fn draw_sprite(&self, name: &str, origin: Vec2, size: Vec2, fallback: &str) {
            match self.sprites.get(name) {
                Some(img) => {
                    let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        img,
                        origin.x as f64,
                        origin.y as f64,
                        size.x as f64,
                        size.y as f64,
                    );
                }
                None => {
                    self.ctx.set_fill_style_str(fallback);
                    self.ctx
                        .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
                }
            }
        }

        /// Tile the road image vertically, scrolled by the distance travelled
        fn draw_road(&self, layout: &FieldLayout) {
            let width = layout.width as f64;
            let height = layout.height as f64;

            let Some(img) = self.sprites.get("road").filter(|img| img.natural_width() > 0) else {
                self.ctx.set_fill_style_str("#444");
                self.ctx.fill_rect(0.0, 0.0, width, height);
                return;
            };

            let iw = img.natural_width() as f64;
            let ih = img.natural_height() as f64;
            let draw_h = ih * (width / iw);
            if draw_h <= 0.0 {
                return;
            }
            let mut y = (self.road_offset as f64 % draw_h) - draw_h;
            while y < height {
                let _ = self
                    .ctx
                    .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                        img, 0.0, 0.0, iw, ih, 0.0, y, width, draw_h,
                    );
                y += draw_h;
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let snapshot = self.core.snapshot();
            let document = &self.document;

            if let Some(el) = document.get_element_by_id("score-val") {
                el.set_text_content(Some(&snapshot.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("high-val") {
                el.set_text_content(Some(&snapshot.high_score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("pause-btn") {
                let label = if snapshot.phase == Phase::Paused { "▶️" } else { "⏸️" };
                el.set_text_content(Some(label));
            }
            if let Some(el) = document.get_element_by_id("mute-btn") {
                let label = if self.settings.muted { "🔇" } else { "🔊" };
                el.set_text_content(Some(label));
            }

            let title = match snapshot.phase {
                Phase::NotStarted => Some("Press any key to start"),
                Phase::Paused => Some("Paused"),
                Phase::Ended => Some("Game Over"),
                Phase::Running => None,
            };
            if let Some(el) = document.get_element_by_id("overlay") {
                let class = if title.is_some() { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
            if let (Some(el), Some(title)) = (document.get_element_by_id("overlay-title"), title) {
                el.set_text_content(Some(title));
            }
            if let Some(el) = document.get_element_by_id("final-score") {
                let text = if snapshot.phase == Phase::Ended {
                    snapshot.score.to_string()
                } else {
                    String::new()
                };
                el.set_text_content(Some(&text));
            }
        }
    }

    fn set_progress(document: &Document, progress: f32) {
        let percent = (progress * 100.0).round();
        if let Some(fill) = document.get_element_by_id("progress-fill") {
            let _ = fill.set_attribute("style", &format!("width: {}%", percent));
        }
        if let Some(text) = document.get_element_by_id("progress-text") {
            text.set_text_content(Some(&format!("{}%", percent)));
        }
    }

    /// Record one sprite outcome; hands the sprite set over on the last one
    fn report_asset(
        loader: &Rc<RefCell<Loader>>,
        document: &Document,
        name: &str,
        outcome: Result<HtmlImageElement, AssetError>,
    ) {
        let mut guard = loader.borrow_mut();
        let Some(fan_in) = guard.fan_in.as_mut() else {
            return;
        };
        match fan_in.report(name, outcome) {
            Ok(complete) => {
                set_progress(document, fan_in.progress());
                if !complete {
                    return;
                }
            }
            Err(e) => {
                log::warn!("{}", e);
                return;
            }
        }

        let (Some(fan_in), Some(on_ready)) = (guard.fan_in.take(), guard.on_ready.take()) else {
            return;
        };
        drop(guard);
        match fan_in.finish() {
            Ok(sprites) => on_ready(sprites),
            Err(e) => log::error!("Asset loading did not finish: {}", e),
        }
    }

    fn load_sprites(loader: Rc<RefCell<Loader>>, document: &Document) -> Result<(), JsValue> {
        for &(name, url) in SPRITES {
            let img = HtmlImageElement::new()?;

            let onload = {
                let loader = loader.clone();
                let document = document.clone();
                let img = img.clone();
                Closure::<dyn FnMut()>::new(move || {
                    report_asset(&loader, &document, name, Ok(img.clone()));
                })
            };
            let onerror = {
                let loader = loader.clone();
                let document = document.clone();
                Closure::<dyn FnMut()>::new(move || {
                    let error = AssetError::Failed {
                        name: name.to_string(),
                        reason: format!("could not load {}", url),
                    };
                    report_asset(&loader, &document, name, Err(error));
                })
            };

            img.set_onload(Some(onload.as_ref().unchecked_ref()));
            img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onload.forget();
            onerror.forget();
            img.set_src(url);
        }
        Ok(())
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Lane Dodger starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let config = GameConfig::default();
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("not a canvas"))?;
        canvas.set_width(config.field_width as u32);
        canvas.set_height(config.field_height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("not a 2d context"))?;

        let on_ready: Box<dyn FnOnce(Sprites)> = {
            let document = document.clone();
            Box::new(move |sprites| {
                if let Err(e) = start_game(config, sprites, ctx, document) {
                    log::error!("Failed to start game: {:?}", e);
                }
            })
        };

        let loader = Rc::new(RefCell::new(Loader {
            fan_in: Some(AssetFanIn::new(SPRITES.iter().map(|(name, _)| *name))),
            on_ready: Some(on_ready),
        }));
        load_sprites(loader, &document)
    }

    /// Build the game once every sprite has reported
    fn start_game(
        config: GameConfig,
        sprites: Sprites,
        ctx: CanvasRenderingContext2d,
        document: Document,
    ) -> Result<(), JsValue> {
        if let Some(preload) = document.get_element_by_id("preload") {
            let _ = preload.set_attribute("class", "hidden");
        }

        let store = LocalStorageStore::new(config.storage_key.clone());
        let max_tick_ms = config.max_tick_ms;
        let seed = js_sys::Date::now() as u64;
        let core = SimulationCore::new(config, store, seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Game initialized with seed: {}", seed);

        let settings = Settings::load();
        let mut audio = AudioManager::new();
        audio.set_volume(settings.effective_volume());

        let game = Rc::new(RefCell::new(Game {
            core,
            sprites,
            ctx,
            document: document.clone(),
            clock: FrameClock::new(max_tick_ms),
            audio,
            settings,
            road_offset: 0.0,
        }));

        setup_keyboard(game.clone())?;
        setup_controls(game.clone(), &document)?;
        setup_auto_pause(game.clone(), &document)?;

        request_animation_frame(game);
        log::info!("Lane Dodger running!");
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut g = game.borrow_mut();
            let key = event.key();
            let action = action_for_key(&key).or_else(|| {
                // Any key starts the first run
                (g.core.phase() == Phase::NotStarted).then_some(InputAction::Game(Command::Restart))
            });
            if let Some(action) = action {
                event.prevent_default();
                g.dispatch(action);
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_controls(game: Rc<RefCell<Game>>, document: &Document) -> Result<(), JsValue> {
        for &(id, action) in CONTROLS {
            let Some(button) = document.get_element_by_id(id) else {
                log::warn!("Missing control #{}", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                game.borrow_mut().dispatch(action);
            });
            button.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            button.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Tapping the field starts (or restarts) a run
        if let Some(canvas) = document.get_element_by_id("game-canvas") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().dispatch(InputAction::Game(Command::Restart));
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>, document: &Document) -> Result<(), JsValue> {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
            game.borrow_mut().set_hidden(hidden);
        });
        document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use lane_dodger::consts::PLAYER_HEIGHT;
    use lane_dodger::persistence::MemoryStore;
    use lane_dodger::sim::{Command, EntityKind, SimulationCore};

    /// Distance above the player an obstacle starts to count as a threat
    const LOOKAHEAD: f32 = 300.0;

    /// Dodge into the nearest clear lane when an obstacle is closing in
    pub fn autopilot(core: &SimulationCore<MemoryStore>) -> Option<Command> {
        let snapshot = core.snapshot();
        let player_top = core.state().layout.player_top;
        let lanes = core.config().lanes;

        let threatened = |lane: usize| {
            snapshot.entities.iter().any(|e| {
                e.kind == EntityKind::Obstacle
                    && e.lane == lane
                    && e.position + e.height() >= player_top - LOOKAHEAD
                    && e.position <= player_top + PLAYER_HEIGHT
            })
        };

        let lane = snapshot.player_lane;
        if !threatened(lane) {
            return None;
        }
        if lane > 0 && !threatened(lane - 1) {
            Some(Command::MoveLeft)
        } else if lane + 1 < lanes && !threatened(lane + 1) {
            Some(Command::MoveRight)
        } else {
            None
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), lane_dodger::ConfigError> {
    use lane_dodger::GameConfig;
    use lane_dodger::persistence::MemoryStore;
    use lane_dodger::sim::{Phase, SimulationCore};

    env_logger::init();
    log::info!("Lane Dodger (native) starting...");
    log::info!("Native mode runs a headless autopilot - use `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    let mut core = SimulationCore::new(GameConfig::default(), MemoryStore::new(), seed)?;
    core.start();

    // Five simulated minutes at 60 fps
    let frame_ms = 1000.0 / 60.0;
    for _ in 0..(5 * 60 * 60) {
        if let Some(command) = headless::autopilot(&core) {
            core.push_command(command);
        }
        core.tick(frame_ms);
        if core.phase() != Phase::Running {
            break;
        }
    }
    core.end();

    match serde_json::to_string_pretty(&core.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
    Ok(())
}
