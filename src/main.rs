//! Neon Striker entry point
//!
//! Handles platform-specific initialization and runs the game loop.
//! - wasm32: mounts on `#canvas`, one tick per animation frame
//! - native: headless run with a scripted pilot, prints a JSON summary

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent,
    };

    use neon_striker::Settings;
    use neon_striker::game::Game;
    use neon_striker::platform::PerformanceClock;
    use neon_striker::sim::{EnemyKind, Frame, GamePhase, Presenter, Viewport};

    type SharedGame = Rc<RefCell<Game<PerformanceClock>>>;

    fn css_color(color: u32) -> String {
        format!("#{:06x}", color & 0x00ff_ffff)
    }

    /// Draws frames onto a 2D canvas
    struct CanvasPresenter {
        ctx: CanvasRenderingContext2d,
        settings: Settings,
        last_time: f64,
        fps: f64,
    }

    impl CanvasPresenter {
        fn background(&self, frame: &Frame<'_>) {
            let (w, h) = (frame.viewport.width as f64, frame.viewport.height as f64);
            self.ctx.set_fill_style_str("#050810");
            self.ctx.fill_rect(0.0, 0.0, w, h);

            self.ctx.set_stroke_style_str("rgba(0,255,255,0.04)");
            self.ctx.set_line_width(1.0);
            let offset = if self.settings.effective_background_scroll() {
                (frame.frame as f64 * 0.3) % 50.0
            } else {
                0.0
            };
            let mut x = 0.0;
            while x < w {
                self.ctx.begin_path();
                self.ctx.move_to(x, 0.0);
                self.ctx.line_to(x, h);
                self.ctx.stroke();
                x += 50.0;
            }
            let mut y = -offset;
            while y < h {
                self.ctx.begin_path();
                self.ctx.move_to(0.0, y);
                self.ctx.line_to(w, y);
                self.ctx.stroke();
                y += 50.0;
            }
        }

        fn banner(&self, frame: &Frame<'_>, title: &str, color: &str, subtitle: Option<String>) {
            let (cx, cy) = (frame.viewport.width as f64 / 2.0, frame.viewport.height as f64 / 2.0);
            self.ctx.set_text_align("center");
            self.ctx.set_font("bold 32px Orbitron, monospace");
            self.ctx.set_fill_style_str(color);
            self.ctx.set_shadow_blur(20.0);
            self.ctx.set_shadow_color(color);
            let _ = self.ctx.fill_text(title, cx, cy - 10.0);
            if let Some(subtitle) = subtitle {
                self.ctx.set_font("16px Orbitron, monospace");
                self.ctx.set_fill_style_str("#00ffff");
                let _ = self.ctx.fill_text(&subtitle, cx, cy + 24.0);
            }
            self.ctx.set_shadow_blur(0.0);
        }

        fn circle(&self, pos: Vec2, radius: f64) {
            self.ctx.begin_path();
            let _ = self.ctx.arc(pos.x as f64, pos.y as f64, radius.max(0.0), 0.0, TAU);
        }

        fn entities(&self, frame: &Frame<'_>) {
            for p in frame.particles {
                let alpha = p.alpha() as f64;
                self.ctx.set_global_alpha(alpha);
                self.ctx.set_fill_style_str(&css_color(p.color));
                self.circle(p.pos, p.size as f64 * alpha);
                self.ctx.fill();
            }
            self.ctx.set_global_alpha(1.0);

            for e in frame.enemies {
                let color = if e.hit { "#ffffff".to_string() } else { css_color(e.color()) };
                self.ctx.set_stroke_style_str(&color);
                self.ctx.set_shadow_color(&color);
                self.ctx.set_shadow_blur(18.0);
                self.ctx.set_line_width(if e.kind == EnemyKind::Tank { 3.0 } else { 2.0 });
                self.circle(e.pos, e.radius as f64);
                self.ctx.stroke();
                self.ctx.set_shadow_blur(0.0);

                if e.hp < e.max_hp {
                    let bw = e.radius as f64 * 2.0;
                    let x = e.pos.x as f64 - bw / 2.0;
                    let y = e.pos.y as f64 - e.radius as f64 - 10.0;
                    self.ctx.set_fill_style_str("#111111");
                    self.ctx.fill_rect(x, y, bw, 3.0);
                    self.ctx.set_fill_style_str(&css_color(e.color()));
                    self.ctx.fill_rect(x, y, bw * e.health_fraction() as f64, 3.0);
                }
            }

            self.ctx.set_fill_style_str("#00ffff");
            for b in frame.bullets {
                self.circle(b.pos, 4.0);
                self.ctx.fill();
            }

            // Ship: a triangle pointing at the crosshair
            let heading = frame.player_heading() as f64;
            let p = frame.player.pos;
            let (px, py) = (p.x as f64, p.y as f64);
            let point = |dist: f64, angle: f64| {
                (px + dist * (heading + angle).cos(), py + dist * (heading + angle).sin())
            };
            let nose = point(22.0, 0.0);
            let left = point(19.8, 2.5);
            let right = point(19.8, -2.5);
            self.ctx.set_stroke_style_str("#00ffff");
            self.ctx.set_line_width(2.0);
            self.ctx.begin_path();
            self.ctx.move_to(nose.0, nose.1);
            self.ctx.line_to(left.0, left.1);
            self.ctx.line_to(px, py);
            self.ctx.line_to(right.0, right.1);
            self.ctx.close_path();
            self.ctx.stroke();

            // Crosshair
            self.ctx.set_stroke_style_str("rgba(0,255,255,0.7)");
            self.ctx.set_line_width(1.0);
            self.circle(frame.pointer, 8.0);
            self.ctx.stroke();
        }

        fn hud(&self, frame: &Frame<'_>) {
            let status = frame.status;
            self.ctx.set_text_align("left");
            self.ctx.set_font("14px Orbitron, monospace");
            self.ctx.set_fill_style_str("#00ffff");
            let text = format!(
                "SCORE {}   WAVE {}   LIVES {}",
                status.score, status.wave, status.lives
            );
            let _ = self.ctx.fill_text(&text, 12.0, 22.0);
            if self.settings.show_fps {
                let _ = self.ctx.fill_text(&format!("FPS {:.0}", self.fps), 12.0, 42.0);
            }
        }
    }

    impl Presenter for CanvasPresenter {
        fn present(&mut self, frame: &Frame<'_>) {
            let now = js_sys::Date::now();
            if self.last_time > 0.0 && now > self.last_time {
                self.fps = self.fps * 0.9 + (1000.0 / (now - self.last_time)) * 0.1;
            }
            self.last_time = now;

            self.background(frame);
            match frame.phase {
                GamePhase::NotStarted => {
                    self.banner(frame, "NEON STRIKER", "#00ffff", Some("CLICK TO START".into()));
                }
                GamePhase::GameOver => {
                    let subtitle = format!("WAVE {}  SCORE {}", frame.status.wave, frame.status.score);
                    self.banner(frame, "GAME OVER", "#ff00aa", Some(subtitle));
                }
                GamePhase::Paused => {
                    self.entities(frame);
                    self.hud(frame);
                    self.banner(frame, "PAUSED", "#00ffff", None);
                }
                GamePhase::Playing => {
                    self.entities(frame);
                    self.hud(frame);
                }
            }
        }
    }

    /// A registered event listener, kept so it can be removed again
    struct Listener {
        target: EventTarget,
        event: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    }

    /// Everything a mounted game owns in the browser
    pub struct Driver {
        game: SharedGame,
        listeners: Vec<Listener>,
        frame_callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
        frame_id: Rc<Cell<Option<i32>>>,
    }

    impl Driver {
        fn listen(
            &mut self,
            target: &EventTarget,
            event: &'static str,
            handler: impl FnMut(Event) + 'static,
        ) -> Result<(), JsValue> {
            let closure = Closure::<dyn FnMut(Event)>::new(handler);
            target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
            self.listeners.push(Listener {
                target: target.clone(),
                event,
                closure,
            });
            Ok(())
        }

        /// Deregister every listener and cancel the pending frame
        pub fn teardown(&mut self) {
            for listener in self.listeners.drain(..) {
                let _ = listener.target.remove_event_listener_with_callback(
                    listener.event,
                    listener.closure.as_ref().unchecked_ref(),
                );
            }
            if let (Some(window), Some(id)) = (web_sys::window(), self.frame_id.take()) {
                let _ = window.cancel_animation_frame(id);
            }
            self.frame_callback.borrow_mut().take();
            self.game.borrow_mut().shutdown();
        }
    }

    fn canvas_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        Vec2::new(
            (event.client_x() as f64 - rect.left()) as f32,
            (event.client_y() as f64 - rect.top()) as f32,
        )
    }

    fn fit_canvas(canvas: &HtmlCanvasElement) -> Viewport {
        let w = canvas.client_width().max(1) as u32;
        let h = canvas.client_height().max(1) as u32;
        canvas.set_width(w);
        canvas.set_height(h);
        Viewport::new(w as f32, h as f32)
    }

    pub fn mount(canvas_id: &str) -> Result<Driver, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let settings = Settings::load();
        let viewport = fit_canvas(&canvas);
        let game: SharedGame = Rc::new(RefCell::new(Game::from_settings(
            &settings,
            viewport,
            PerformanceClock::default(),
        )));

        let mut driver = Driver {
            game: game.clone(),
            listeners: Vec::new(),
            frame_callback: Rc::new(RefCell::new(None)),
            frame_id: Rc::new(Cell::new(None)),
        };

        let canvas_target: &EventTarget = canvas.as_ref();
        let window_target: &EventTarget = window.as_ref();

        {
            let game = game.clone();
            let canvas = canvas.clone();
            driver.listen(canvas_target, "mousemove", move |event: Event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    game.borrow_mut().pointer_moved(canvas_point(&canvas, event));
                }
            })?;
        }

        {
            let game = game.clone();
            let canvas = canvas.clone();
            driver.listen(canvas_target, "click", move |event: Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let pos = canvas_point(&canvas, event);
                let mut g = game.borrow_mut();
                match g.state().phase {
                    GamePhase::NotStarted | GamePhase::GameOver => g.start(),
                    _ => {
                        g.click(pos);
                    }
                }
            })?;
        }

        {
            let game = game.clone();
            driver.listen(window_target, "keydown", move |event: Event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if event.repeat() {
                    return;
                }
                let mut g = game.borrow_mut();
                let key = event.key();
                if key == "Enter" && !g.state().phase.is_simulating() && !g.state().phase.paused() {
                    g.start();
                } else {
                    g.key_down(&key);
                }
            })?;
        }

        {
            let game = game.clone();
            driver.listen(window_target, "keyup", move |event: Event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    game.borrow_mut().key_up(&event.key());
                }
            })?;
        }

        {
            let game = game.clone();
            let canvas = canvas.clone();
            driver.listen(window_target, "resize", move |_event: Event| {
                let viewport = fit_canvas(&canvas);
                game.borrow_mut().resize(viewport.width, viewport.height);
            })?;
        }

        {
            let game = game.clone();
            driver.listen(window_target, "blur", move |_event: Event| {
                game.borrow_mut().focus_lost();
            })?;
        }

        // Animation loop: one tick per frame, re-armed at the end of each call
        let mut presenter = CanvasPresenter {
            ctx,
            settings,
            last_time: 0.0,
            fps: 0.0,
        };
        let callback = driver.frame_callback.clone();
        let frame_id = driver.frame_id.clone();
        {
            let callback_inner = callback.clone();
            let frame_id = frame_id.clone();
            *callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |_time: f64| {
                frame_id.set(None);
                if !game.borrow_mut().advance(&mut presenter) {
                    return;
                }
                if let (Some(window), Some(cb)) = (web_sys::window(), callback_inner.borrow().as_ref()) {
                    if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                        frame_id.set(Some(id));
                    }
                }
            }));
        }
        if let Some(cb) = callback.borrow().as_ref() {
            frame_id.set(Some(window.request_animation_frame(cb.as_ref().unchecked_ref())?));
        }

        log::info!("Neon Striker running!");
        Ok(driver)
    }

    thread_local! {
        static ACTIVE: RefCell<Option<Driver>> = const { RefCell::new(None) };
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialized".into());
        }
        log::info!("Neon Striker starting...");

        match mount("canvas") {
            Ok(driver) => ACTIVE.with(|active| *active.borrow_mut() = Some(driver)),
            Err(e) => log::error!("Failed to mount game: {:?}", e),
        }
    }

    pub fn unmount() {
        ACTIVE.with(|active| {
            if let Some(mut driver) = active.borrow_mut().take() {
                driver.teardown();
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Tear the game down: remove listeners and cancel the pending frame
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn unmount() {
    wasm_game::unmount();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use serde::Serialize;

    use neon_striker::Settings;
    use neon_striker::game::Game;
    use neon_striker::platform::ManualClock;
    use neon_striker::sim::{Frame, NullPresenter, StatusSnapshot, Viewport};

    /// Nominal frame length for the headless clock (60 Hz)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const DEFAULT_TICKS: u64 = 60 * 60;

    #[derive(Debug, Default)]
    struct Args {
        settings: Option<PathBuf>,
        ticks: Option<u64>,
    }

    fn parse_args(args: impl Iterator<Item = String>) -> Args {
        let mut parsed = Args::default();
        let mut args = args.peekable();
        while let Some(arg) = args.next() {
            if arg == "--ticks" {
                match args.next().map(|n| n.parse::<u64>()) {
                    Some(Ok(n)) => parsed.ticks = Some(n),
                    _ => log::warn!("--ticks expects a number; using {}", DEFAULT_TICKS),
                }
            } else {
                parsed.settings = Some(PathBuf::from(arg));
            }
        }
        parsed
    }

    /// Scripted pilot: chase the lowest enemy horizontally and shoot at it
    fn steer(game: &mut Game<ManualClock>) {
        let frame: Frame<'_> = game.frame();
        let player = frame.player.pos;
        let target = frame
            .enemies
            .iter()
            .filter(|e| e.pos.y > 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|e| e.pos);

        let Some(target) = target else {
            game.key_up("a");
            game.key_up("d");
            return;
        };

        let dx = target.x - player.x;
        let (press, release) = if dx < -4.0 {
            ("a", "d")
        } else if dx > 4.0 {
            ("d", "a")
        } else {
            game.key_up("a");
            game.key_up("d");
            game.click(target);
            return;
        };
        game.key_up(release);
        game.key_down(press);
        game.click(target);
    }

    #[derive(Debug, Serialize)]
    struct Summary {
        seed: u64,
        frames: u64,
        ticks: u64,
        status: StatusSnapshot,
        enemies: usize,
        bullets: usize,
        particles: usize,
    }

    pub fn run() {
        let args = parse_args(std::env::args().skip(1));
        let settings = Settings::load_native(args.settings.as_deref());
        let ticks = args.ticks.unwrap_or(DEFAULT_TICKS);

        let mut game = Game::from_settings(&settings, Viewport::default(), ManualClock::new(0.0));
        game.start();

        for _ in 0..ticks {
            steer(&mut game);
            game.advance(&mut NullPresenter);
            game.clock().advance(FRAME_MS);
            if game.state().phase.game_over() {
                break;
            }
        }
        game.shutdown();

        let state = game.state();
        let summary = Summary {
            seed: state.seed,
            frames: game.frames(),
            ticks: state.time_ticks,
            status: state.status(),
            enemies: state.enemies.len(),
            bullets: state.bullets.len(),
            particles: state.particles.len(),
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to encode summary: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Striker (headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
