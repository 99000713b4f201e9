//! Lead Me Home entry point
//!
//! In the browser this runs the game on `#canvas`. Natively it is a headless
//! runner: play one level for a number of frames with a scripted cursor and
//! print the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use lead_me_home::platform::web::{AnimationLoop, CanvasPainter, EventListeners, pointer_listeners};
    use lead_me_home::platform::Cursor;
    use lead_me_home::sim::{LevelResult, LevelSession, tick};
    use lead_me_home::{LevelCatalog, LevelRecords, Tuning};

    /// What the page is showing, with the listeners that belong to it
    enum Screen {
        Playing {
            _pointer: EventListeners,
        },
        Finished {
            result: LevelResult,
            continue_requested: Rc<Cell<bool>>,
            _click: EventListeners,
        },
    }

    struct Game {
        canvas: HtmlCanvasElement,
        painter: CanvasPainter,
        catalog: LevelCatalog,
        tuning: Tuning,
        records: LevelRecords,
        cursor: Rc<RefCell<Cursor>>,
        session: LevelSession,
        screen: Screen,
    }

    impl Game {
        fn new(canvas: HtmlCanvasElement, catalog: LevelCatalog, tuning: Tuning) -> Result<Self, JsValue> {
            let painter = CanvasPainter::new(&canvas, tuning.bounds())?;
            let records = LevelRecords::load();
            let cursor = Rc::new(RefCell::new(Cursor::new(&tuning)));

            let level = records.highest_unlocked(catalog.len() as u32);
            let session = new_session(&catalog, &tuning, level)?;
            let screen = playing_screen(&canvas, &tuning, &cursor)?;

            Ok(Self {
                canvas,
                painter,
                catalog,
                tuning,
                records,
                cursor,
                session,
                screen,
            })
        }

        fn update(&mut self) -> Result<(), JsValue> {
            match &self.screen {
                Screen::Playing { .. } => {
                    let input = self.cursor.borrow().tick_input();
                    if let Some(result) = tick(&mut self.session, &input, &self.tuning) {
                        self.finish(result)?;
                    }
                }
                Screen::Finished {
                    continue_requested, ..
                } => {
                    if continue_requested.get() {
                        self.next_level()?;
                    }
                }
            }
            Ok(())
        }

        fn finish(&mut self, result: LevelResult) -> Result<(), JsValue> {
            self.records.record(&result);
            self.records.save();
            self.cursor.borrow_mut().park();

            let continue_requested = Rc::new(Cell::new(false));
            let mut click = EventListeners::new(self.canvas.clone().into());
            {
                let flag = continue_requested.clone();
                click.add("click", move |_event| flag.set(true))?;
            }
            {
                let flag = continue_requested.clone();
                click.add("touchend", move |_event| flag.set(true))?;
            }

            // Replacing the screen drops the pointer listeners
            self.screen = Screen::Finished {
                result,
                continue_requested,
                _click: click,
            };
            Ok(())
        }

        /// Next level if it is unlocked, otherwise replay this one
        fn next_level(&mut self) -> Result<(), JsValue> {
            let next = self.session.level + 1;
            let level = if next as usize <= self.catalog.len() && self.records.is_unlocked(next) {
                next
            } else {
                self.session.level
            };

            self.session = new_session(&self.catalog, &self.tuning, level)?;
            self.screen = playing_screen(&self.canvas, &self.tuning, &self.cursor)?;
            Ok(())
        }

        fn render(&self) -> Result<(), JsValue> {
            let cursor = self.cursor.borrow().position();
            self.painter.paint(&self.session.scene(cursor))?;
            if let Screen::Finished { result, .. } = &self.screen {
                self.painter.paint_result(result)?;
            }
            Ok(())
        }
    }

    fn new_session(catalog: &LevelCatalog, tuning: &Tuning, level: u32) -> Result<LevelSession, JsValue> {
        let level = catalog
            .get(level)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let seed = js_sys::Date::now() as u64;
        Ok(LevelSession::new(level, seed, tuning))
    }

    fn playing_screen(
        canvas: &HtmlCanvasElement,
        tuning: &Tuning,
        cursor: &Rc<RefCell<Cursor>>,
    ) -> Result<Screen, JsValue> {
        let cursor = cursor.clone();
        let pointer = pointer_listeners(canvas, tuning.bounds(), move |event| {
            cursor.borrow_mut().apply(event);
        })?;
        Ok(Screen::Playing { _pointer: pointer })
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Lead Me Home starting...");

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let catalog = LevelCatalog::builtin().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let tuning = Tuning::default();
        canvas.set_width(tuning.arena_width as u32);
        canvas.set_height(tuning.arena_height as u32);

        let game = Rc::new(RefCell::new(Game::new(canvas, catalog, tuning)?));

        let animation = AnimationLoop::start(move || {
            let mut g = game.borrow_mut();
            let frame = g.update().and_then(|()| g.render());
            if let Err(e) = frame {
                log::error!("Stopping game loop: {:?}", e);
                return false;
            }
            true
        })?;

        // The loop runs for the lifetime of the page
        std::mem::forget(animation);

        log::info!("Lead Me Home running!");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::fs;
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use glam::Vec2;

    use lead_me_home::platform::{FixedFrames, ScriptedCursor, SessionObserver, run_session};
    use lead_me_home::sim::{GameEvent, LevelSession};
    use lead_me_home::{LevelCatalog, LevelRecords, Tuning};

    #[derive(Parser)]
    #[command(name = "lead-me-home")]
    #[command(about = "Play a Lead Me Home level headlessly and report the outcome")]
    pub struct Args {
        /// Level number (1-based)
        #[arg(short, long, default_value_t = 1)]
        level: u32,

        /// Spawn seed
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Frames to simulate before giving up
        #[arg(short, long, default_value_t = 3600)]
        frames: u64,

        /// Level catalog JSON (defaults to the built-in levels)
        #[arg(long)]
        levels: Option<PathBuf>,

        /// Tuning overrides JSON
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Progress file to read and update with the result
        #[arg(long)]
        progress: Option<PathBuf>,

        /// Hold the cursor at this x (requires --cursor-y)
        #[arg(long, requires = "cursor_y")]
        cursor_x: Option<f32>,

        /// Hold the cursor at this y (requires --cursor-x)
        #[arg(long, requires = "cursor_x")]
        cursor_y: Option<f32>,
    }

    /// Counts game events for the final report
    #[derive(Default)]
    struct EventTally {
        captures: u32,
        barrier_hits: u32,
        teleports: u32,
    }

    impl SessionObserver for EventTally {
        fn frame(&mut self, session: &LevelSession) {
            for event in &session.events {
                match event {
                    GameEvent::Captured { .. } => self.captures += 1,
                    GameEvent::BarrierHit { .. } => self.barrier_hits += 1,
                    GameEvent::Teleported { .. } => self.teleports += 1,
                    _ => {}
                }
            }
        }
    }

    pub fn run(args: Args) -> Result<()> {
        let catalog = match &args.levels {
            Some(path) => {
                let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
                LevelCatalog::from_json(&json).with_context(|| format!("loading {}", path.display()))?
            }
            None => LevelCatalog::builtin()?,
        };

        let tuning = match &args.tuning {
            Some(path) => {
                let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
                Tuning::from_json(&json).with_context(|| format!("loading {}", path.display()))?
            }
            None => Tuning::default(),
        };

        let mut records = match &args.progress {
            Some(path) if path.exists() => {
                let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
                LevelRecords::from_json(&json)?
            }
            _ => LevelRecords::new(),
        };

        if !records.is_unlocked(args.level) {
            log::warn!(
                "Level {} is locked ({} stars on level {}), playing anyway",
                args.level,
                records.stars(args.level.saturating_sub(1)),
                args.level.saturating_sub(1)
            );
        }

        let level = catalog.get(args.level)?;
        let mut session = LevelSession::new(level, args.seed, &tuning);

        let cursor = match (args.cursor_x, args.cursor_y) {
            (Some(x), Some(y)) => Vec2::new(x, y),
            _ => tuning.parked_cursor(),
        };

        let mut tally = EventTally::default();
        let result = run_session(
            &mut session,
            &tuning,
            &mut FixedFrames::new(args.frames),
            &mut ScriptedCursor::fixed(cursor),
            &mut tally,
        );

        println!("Level {} (seed {})", session.level, session.seed);
        println!(
            "  Frames:      {}\n  Captures:    {}\n  Bounces:     {}\n  Teleports:   {}",
            session.frame, tally.captures, tally.barrier_hits, tally.teleports
        );

        match result {
            Some(result) => {
                println!("  {}", result.tier.message());
                println!("  {}", result.summary());
                let stored = records.record(&result);
                println!("  Stars:       {} (best {})", result.stars_earned, stored);

                if let Some(path) = &args.progress {
                    fs::write(path, records.to_json()?).with_context(|| format!("writing {}", path.display()))?;
                    log::info!("Progress saved to {}", path.display());
                }
            }
            None => {
                let home = session.surviving().filter(|b| session.home.contains(b)).count();
                println!(
                    "  Not finished: {} home, {} lost, {} still out",
                    home,
                    session.lost_count,
                    session.surviving().count() - home
                );
            }
        }

        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    headless::run(headless::Args::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
