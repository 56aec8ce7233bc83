use std::fs::OpenOptions;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::mpsc::{self, TryRecvError};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::ThreadRng;
use rand::thread_rng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use survivor::assets::{load_assets, Assets};
use survivor::audio::{play_events, AudioCue, AudioSink, Silent, TerminalBell};
use survivor::compute::{new_game, screen_command, screen_for, tick, TickInput};
use survivor::config::GameConfig;
use survivor::display::{self, Canvas};
use survivor::entities::{GameState, GameStatus, Screen, ScreenCommand, ScreenInput};
use survivor::error::GameError;
use survivor::input::InputTracker;
use survivor::map::{load_map, Level};

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    match start() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "survivor_failed");
            eprintln!("survivor: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Everything that can fail is loaded before the terminal enters raw mode.
fn start() -> Result<(), GameError> {
    let config_path = GameConfig::locate();
    let config = GameConfig::load_from(config_path.as_deref())?;
    init_tracing(&config.log_file)?;
    info!("=== Survivor startup ===");
    match &config_path {
        Some(path) => info!(path = %path.display(), "config_loaded"),
        None => info!("config_defaults"),
    }

    let assets = load_assets(&config.asset_dir)?;
    let level = load_map(&config.map_path)?;

    run_terminal(&config, &assets, &level)?;
    info!("=== Survivor shutdown ===");
    Ok(())
}

/// The terminal is the game screen, so logs go to a file.
fn init_tracing(path: &Path) -> Result<(), GameError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| GameError::LogFile {
            path: path.to_path_buf(),
            source,
        })?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .init();
    Ok(())
}

fn run_terminal(config: &GameConfig, assets: &Assets, level: &Level) -> std::io::Result<()> {
    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let (cols, rows) = terminal::size()?;
    let audio: Box<dyn AudioSink> = if config.bell {
        Box::new(TerminalBell::new(stdout()))
    } else {
        Box::new(Silent)
    };
    let clock = Instant::now();
    let mut app = App {
        out: &mut out,
        rx: &rx,
        config,
        assets,
        level,
        canvas: Canvas::new(cols, rows),
        input: InputTracker::new(),
        audio,
        rng: thread_rng(),
        clock,
        frame: 0,
        state: new_game(level, assets, 0, 0, config.spawn_interval_ms),
    };
    let result = app.run();
    drop(app);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

// ── Screen dispatch ───────────────────────────────────────────────────────────

struct App<'a, W: Write> {
    out: &'a mut W,
    rx: &'a mpsc::Receiver<Event>,
    config: &'a GameConfig,
    assets: &'a Assets,
    level: &'a Level,
    canvas: Canvas,
    input: InputTracker,
    audio: Box<dyn AudioSink>,
    rng: ThreadRng,
    clock: Instant,
    frame: u64,
    state: GameState,
}

impl<W: Write> App<'_, W> {
    fn now(&self) -> u64 {
        self.clock.elapsed().as_millis() as u64
    }

    fn run(&mut self) -> std::io::Result<()> {
        let mut screen = Screen::Title;
        loop {
            info!(?screen, "screen");
            screen = match screen {
                Screen::Quit => break,
                Screen::Playing => self.game_loop()?,
                modal => {
                    let command = self.modal_screen(modal)?;
                    self.apply(command)
                }
            };
        }
        Ok(())
    }

    fn apply(&mut self, command: ScreenCommand) -> Screen {
        let killed_count = match command {
            ScreenCommand::Quit => return Screen::Quit,
            ScreenCommand::Stay => return Screen::Playing,
            ScreenCommand::Start => 0,
            ScreenCommand::Restart { keep_kills } => {
                info!(keep_kills, kills = self.state.killed_count, "restart");
                if keep_kills {
                    self.state.killed_count
                } else {
                    0
                }
            }
        };
        let now = self.now();
        self.state = new_game(
            self.level,
            self.assets,
            now,
            killed_count,
            self.config.spawn_interval_ms,
        );
        self.input.release_all();
        self.audio.play(AudioCue::Music);
        Screen::Playing
    }

    /// Blocks the simulation until the screen's input policy picks a command.
    fn modal_screen(&mut self, screen: Screen) -> std::io::Result<ScreenCommand> {
        loop {
            match screen {
                Screen::GameOver => {
                    display::draw_game_over(&mut self.canvas, self.state.killed_count)
                }
                Screen::Finished => {
                    display::draw_finished(&mut self.canvas, self.state.killed_count)
                }
                _ => display::draw_title(&mut self.canvas, self.assets),
            }
            self.canvas.present(&mut *self.out)?;

            let Ok(event) = self.rx.recv() else {
                return Ok(ScreenCommand::Quit);
            };
            if let Event::Resize(cols, rows) = event {
                self.canvas.resize(cols, rows);
                continue;
            }
            if let Some(input) = self.input.handle(&event, self.frame) {
                match screen_command(screen, input) {
                    ScreenCommand::Stay => {}
                    command => return Ok(command),
                }
            }
        }
    }

    /// Runs ticks until the game ends or the player quits.
    fn game_loop(&mut self) -> std::io::Result<Screen> {
        let frame_time = Duration::from_millis(self.config.frame_ms);
        let mut last_tick = Instant::now();

        loop {
            let frame_start = Instant::now();
            self.frame += 1;

            // ── Drain all pending input events (non-blocking) ─────────────────
            loop {
                match self.rx.try_recv() {
                    Ok(Event::Resize(cols, rows)) => self.canvas.resize(cols, rows),
                    Ok(event) => {
                        if self.input.handle(&event, self.frame) == Some(ScreenInput::QuitSignal) {
                            return Ok(Screen::Quit);
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return Ok(Screen::Quit),
                }
            }

            // ── Simulate ──────────────────────────────────────────────────────
            let dt = last_tick.elapsed().as_secs_f32();
            last_tick = Instant::now();
            let input = TickInput {
                now: self.now(),
                dt,
                pointer: self.input.pointer_px(),
                screen_center: display::screen_center(self.canvas.cols(), self.canvas.rows()),
                fire_held: self.input.fire_held(self.frame),
                movement: self.input.movement(self.frame),
            };
            let (next, events) = tick(&self.state, self.level, self.assets, &input, &mut self.rng);
            self.state = next;
            play_events(self.audio.as_mut(), &events);

            // ── Draw ──────────────────────────────────────────────────────────
            display::draw_world(&mut self.canvas, &self.state, self.level, self.assets);
            self.canvas.present(&mut *self.out)?;

            if self.state.status != GameStatus::Playing {
                return Ok(screen_for(self.state.status));
            }

            let elapsed = frame_start.elapsed();
            if elapsed < frame_time {
                thread::sleep(frame_time - elapsed);
            }
        }
    }
}
