//! Crosshair Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, MouseEvent};

    use crosshair_rush::audio::{AudioManager, play_events};
    use crosshair_rush::highscores::LocalStorageStore;
    use crosshair_rush::platform::{Element, FrameHandle, FrameLoop, FrameScheduler, Viewport};
    use crosshair_rush::sim::{BoundingBox, GamePhase, Session, TargetState};
    use crosshair_rush::{Settings, Tuning};

    /// `requestAnimationFrame` with a single long-lived callback
    struct RafScheduler {
        callback: Option<js_sys::Function>,
    }

    impl FrameScheduler for RafScheduler {
        fn request(&mut self) -> Option<FrameHandle> {
            let callback = self.callback.as_ref()?;
            web_sys::window()?
                .request_animation_frame(callback)
                .ok()
                .map(FrameHandle)
        }

        fn cancel(&mut self, handle: FrameHandle) {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle.0);
            }
        }
    }

    /// Measures elements with `getBoundingClientRect`
    struct DomViewport {
        document: Document,
    }

    impl Viewport for DomViewport {
        fn bounding_box(&self, element: Element) -> Option<BoundingBox> {
            let id = match element {
                Element::Crosshair => "crosshair",
                Element::Target => "target",
            };
            let rect = self.document.get_element_by_id(id)?.get_bounding_client_rect();
            // Hidden elements report an empty rect
            if rect.width() <= 0.0 {
                return None;
            }
            Some(BoundingBox::new(
                rect.left() as f32,
                rect.top() as f32,
                rect.width() as f32,
                rect.height() as f32,
            ))
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        frames: FrameLoop<RafScheduler>,
        audio: AudioManager,
        viewport: DomViewport,
        last_time: f64,
    }

    impl Game {
        fn new(document: Document, settings: &Settings) -> Self {
            let seed = js_sys::Date::now() as u64;
            let mut session = Session::new(seed, Tuning::default(), Box::new(LocalStorageStore));
            session.set_glitches_enabled(settings.glitches_enabled());

            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_muted(settings.muted);

            Self {
                session,
                frames: FrameLoop::new(RafScheduler { callback: None }),
                audio,
                viewport: DomViewport { document },
                last_time: 0.0,
            }
        }

        fn start(&mut self) {
            self.session.start();
            self.frames.begin();
            self.flush_events();
            self.render(self.last_time);
        }

        fn frame(&mut self, time: f64) {
            self.last_time = time;
            self.frames.on_frame(&mut self.session, time);
            self.render(time);
        }

        /// A click starts the first run, then fires
        fn shoot(&mut self) {
            let was_idle = self.session.phase() == GamePhase::Idle;
            let outcome = self.session.trigger(&self.viewport);
            if was_idle {
                self.frames.begin();
            }
            if was_idle || outcome.is_some() {
                self.flush_events();
                self.render(self.last_time);
            }
        }

        fn stop(&mut self) {
            self.frames.stop();
            log::info!("Frame loop stopped");
        }

        /// Hand events to collaborators once the transition is complete
        fn flush_events(&mut self) {
            let events = self.session.drain_events();
            play_events(&self.audio, &events);
        }

        fn element(&self, id: &str) -> Option<HtmlElement> {
            self.viewport
                .document
                .get_element_by_id(id)?
                .dyn_into::<HtmlElement>()
                .ok()
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.element(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.element(id) {
                let _ = el.class_list().toggle_with_force("hidden", hidden);
            }
        }

        /// Push simulation state into the DOM
        fn render(&self, time: f64) {
            let phase = self.session.phase();

            match self.session.target() {
                Some(target) if phase != GamePhase::Idle => {
                    if let Some(el) = self.element("target") {
                        let style = el.style();
                        let _ = style.set_property("left", &format!("{}%", target.pos.x));
                        let _ = style.set_property("top", &format!("{}%", target.pos.y));
                        let _ = style.set_property(
                            "transform",
                            &format!(
                                "translate(-50%, -50%) rotate({}deg) scale({})",
                                target.rotation,
                                TargetState::visual_scale(time)
                            ),
                        );
                    }
                    self.set_text("speed", &target.speed_readout().to_string());
                    self.set_hidden("target", false);
                }
                _ => self.set_hidden("target", true),
            }

            if let Some(el) = self.element("crosshair") {
                let crosshair = self.session.crosshair();
                let size = format!("{}px", crosshair.radius * 2.0);
                let offset = crosshair.offset();
                let style = el.style();
                let _ = style.set_property("width", &size);
                let _ = style.set_property("height", &size);
                let _ = style.set_property(
                    "transform",
                    &format!("translate(calc(-50% + {}px), calc(-50% + {}px))", offset.x, offset.y),
                );
            }

            self.set_text("score", &self.session.score().to_string());
            self.set_text("high-score", &self.session.high_score().to_string());

            match self.session.summary() {
                Some(summary) => {
                    self.set_text("fail-reason", &summary.miss_reason.as_str().to_uppercase());
                    self.set_text("final-score", &summary.score.to_string());
                    self.set_text("accuracy", &format!("{}%", summary.accuracy_pct));
                    self.set_text(
                        "duration",
                        &format!("{:.1}s", summary.duration_ms / 1000.0),
                    );
                    self.set_hidden("new-record", !summary.new_record);
                    self.set_hidden("fail-screen", false);
                }
                None => self.set_hidden("fail-screen", true),
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Crosshair Rush starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let settings = Settings::load();

        let game = Rc::new(RefCell::new(Game::new(document.clone(), &settings)));

        // One animation-frame callback for the whole session
        {
            let game_ref = game.clone();
            let closure = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
                game_ref.borrow_mut().frame(time);
            });
            let callback: js_sys::Function = closure.into_js_value().unchecked_into();
            game.borrow_mut().frames.scheduler_mut().callback = Some(callback);
        }

        // Fire on any click in the play area
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().shoot();
            });
            let _ = document.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restart button (must not also count as a shot)
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.stop_propagation();
                game.borrow_mut().start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Tear down the loop when the page goes away
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().stop();
            });
            let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if settings.autostart {
            game.borrow_mut().start();
        } else {
            game.borrow().render(0.0);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Crosshair Rush (native) starting...");
    log::info!("Native mode runs a headless demo - serve the wasm build to play");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: a bot watches a virtual screen and fires when the target
/// crosses the crosshair, getting impatient if it waits too long
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use crosshair_rush::audio::{LogCuePlayer, play_events};
    use crosshair_rush::platform::{FrameHandle, FrameLoop, FrameScheduler, VirtualViewport};
    use crosshair_rush::sim::Session;
    use crosshair_rush::{MemoryStore, Settings, Tuning};

    /// Frames at 60 fps
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Bot fires blind after this many frames without a clean shot
    const PATIENCE_FRAMES: u32 = 240;
    const MAX_FRAMES: u32 = 200_000;

    /// Synchronous clock: every request is granted immediately
    #[derive(Default)]
    struct StepClock {
        next: i32,
    }

    impl FrameScheduler for StepClock {
        fn request(&mut self) -> Option<FrameHandle> {
            self.next += 1;
            Some(FrameHandle(self.next))
        }

        fn cancel(&mut self, _handle: FrameHandle) {}
    }

    fn load_tuning() -> Tuning {
        let Ok(path) = std::env::var("CROSSHAIR_TUNING") else {
            return Tuning::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Bad tuning in {}: {}, using defaults", path, e);
                Tuning::default()
            }),
            Err(e) => {
                log::warn!("Cannot read {}: {}, using defaults", path, e);
                Tuning::default()
            }
        }
    }

    pub fn run() {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(42);
        let settings = Settings::load();
        let mut session = Session::new(seed, load_tuning(), Box::new(MemoryStore::new()));
        let overlap = session.tuning().overlap_factor;
        session.set_glitches_enabled(settings.glitches_enabled());
        let mut frames = FrameLoop::new(StepClock::default());
        let mut viewport = VirtualViewport::new(1280.0, 720.0);
        let cues = LogCuePlayer;

        session.start();
        frames.begin();

        let mut now = 0.0;
        let mut waited = 0;
        for _ in 0..MAX_FRAMES {
            now += FRAME_MS;
            if !frames.on_frame(&mut session, now) {
                break;
            }
            viewport.sync(&session, now);

            waited += 1;
            if viewport.target_on_crosshair(overlap) || waited >= PATIENCE_FRAMES {
                session.fire_measured(&viewport);
                waited = 0;
            }
            play_events(&cues, &session.drain_events());
        }
        frames.stop();

        match session.summary() {
            Some(summary) => println!(
                "Run over: {} | score {} | best {} | accuracy {}% | {:.1}s{}",
                summary.miss_reason,
                summary.score,
                summary.high_score,
                summary.accuracy_pct,
                summary.duration_ms / 1000.0,
                if summary.new_record { " | NEW RECORD" } else { "" }
            ),
            None => println!(
                "Demo stopped after {} frames, score {}",
                MAX_FRAMES,
                session.score()
            ),
        }
    }
}
