mod render;
mod sound;

use std::fs::File;
use std::io::{self, Stdout, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseEventKind,
    },
    execute, terminal,
};
use flappy_term::{FrameInput, GameConfig, GameSession, HighScoreStore, SessionState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use crate::render::{Overlay, Palette, PixelBuf, Scene};
use crate::sound::Sounds;

/// Flappy Bird in the terminal. Space, up, enter or a click to flap; esc or q to quit.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// File holding the best score.
    #[arg(long, default_value = "highscore")]
    highscore_file: PathBuf,

    /// Seed for pipe placement, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// No pipes: just the bird and the ground.
    #[arg(long)]
    practice: bool,

    #[arg(long)]
    mute: bool,

    /// The screen belongs to the game, so diagnostics go here. Filter with RUST_LOG.
    #[arg(long, default_value = "flappy-term.log")]
    log_file: PathBuf,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Terminal ────────────────────────────────────────────────────────────────

/// Raw mode plus alternate screen for as long as it lives.
struct Terminal {
    out: Stdout,
}

impl Terminal {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            EnableMouseCapture,
        )?;
        Ok(Self { out })
    }

    fn pixel_size() -> io::Result<(usize, usize)> {
        let (cols, rows) = terminal::size()?;
        Ok((cols as usize, rows as usize * 2))
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let restored = execute!(
            self.out,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )
        .and_then(|_| terminal::disable_raw_mode());
        if let Err(err) = restored {
            tracing::error!("failed to restore terminal: {err}");
        }
    }
}

// ── Input ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Input {
    jump: bool,
    quit: bool,
}

/// Drains pending terminal events without blocking.
fn poll_input(buf: &mut PixelBuf) -> io::Result<Input> {
    let mut input = Input::default();
    while event::poll(Duration::ZERO)? {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    input.quit = true;
                }
                KeyCode::Char('q') | KeyCode::Esc => input.quit = true,
                KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => input.jump = true,
                _ => {}
            },
            Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
                input.jump = true;
            }
            Event::Resize(c, r) => buf.resize(c as usize, r as usize * 2),
            _ => {}
        }
    }
    Ok(input)
}

/// What the game-over panel makes of one poll: `Some(true)` restarts,
/// `Some(false)` quits. Taps still queued from the fall are `stale` and
/// only a quit among them counts.
fn panel_choice(input: &Input, stale: bool) -> Option<bool> {
    if input.quit {
        Some(false)
    } else if input.jump && !stale {
        Some(true)
    } else {
        None
    }
}

fn pace(frame_start: Instant, frame_dur: Duration) {
    let elapsed = frame_start.elapsed();
    if elapsed < frame_dur {
        std::thread::sleep(frame_dur - elapsed);
    }
}

// ── Game loop ───────────────────────────────────────────────────────────────

struct Frontend {
    term: Terminal,
    buf: PixelBuf,
    sounds: Option<Sounds>,
}

impl Frontend {
    /// Runs one session to the end. `None` means the player quit.
    fn play(
        &mut self,
        session: &mut GameSession,
        scene: &Scene,
        frame_dur: Duration,
    ) -> io::Result<Option<u32>> {
        let mut last = Instant::now();
        loop {
            let frame_start = Instant::now();
            let input = poll_input(&mut self.buf)?;
            if input.quit {
                return Ok(None);
            }

            let report = session.tick(FrameInput {
                jump: input.jump,
                elapsed: frame_start - last,
            });
            last = frame_start;
            if let Some(sounds) = &self.sounds {
                for event in &report.events {
                    sounds.play(*event);
                }
            }

            let overlay = match report.state {
                SessionState::Waiting => Overlay::StartPrompt,
                _ => Overlay::None,
            };
            scene.draw(&mut self.buf, &session.snapshot(), &overlay);
            self.buf.render(&mut self.term.out)?;

            if let Some(score) = session.final_score() {
                return Ok(Some(score));
            }

            // The fall after a crash plays at triple speed.
            let target = match report.state {
                SessionState::Dying => frame_dur / 3,
                _ => frame_dur,
            };
            pace(frame_start, target);
        }
    }

    /// Shows the result until the player restarts (`true`) or quits.
    fn game_over(
        &mut self,
        session: &GameSession,
        scene: &Scene,
        best: u32,
        frame_dur: Duration,
    ) -> io::Result<bool> {
        let overlay = Overlay::GameOver {
            score: session.score(),
            best,
        };
        let mut stale = true;
        loop {
            let frame_start = Instant::now();
            let input = poll_input(&mut self.buf)?;
            if let Some(restart) = panel_choice(&input, stale) {
                return Ok(restart);
            }
            stale = false;
            scene.draw(&mut self.buf, &session.snapshot(), &overlay);
            self.buf.render(&mut self.term.out)?;
            pace(frame_start, frame_dur);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let config = GameConfig {
        fps: args.fps,
        spawn_obstacles: !args.practice,
        ..GameConfig::default()
    };
    config.validate().context("invalid game settings")?;
    tracing::info!(?config, "starting");

    let store = HighScoreStore::new(&args.highscore_file);
    let sounds = if args.mute {
        None
    } else {
        match Sounds::open() {
            Ok(sounds) => Some(sounds),
            Err(err) => {
                tracing::warn!("running without sound: {err:#}");
                None
            }
        }
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (pw, ph) = Terminal::pixel_size().context("querying terminal size")?;
    let mut frontend = Frontend {
        term: Terminal::enter().context("preparing terminal")?,
        buf: PixelBuf::new(pw, ph),
        sounds,
    };
    let frame_dur = config.frame_interval();

    // Each pass is one play-through; restarting builds a fresh session.
    loop {
        let palette = if rng.gen_bool(0.5) {
            Palette::DAY
        } else {
            Palette::NIGHT
        };
        let scene = Scene::new(&config, palette);
        let mut session = GameSession::new(&config, StdRng::seed_from_u64(rng.r#gen()));

        let Some(score) = frontend.play(&mut session, &scene, frame_dur)? else {
            break;
        };
        let best = match store.record(score) {
            Ok(best) => best,
            Err(err) => {
                tracing::error!("could not save high score: {err}");
                store.load().max(score)
            }
        };
        if !frontend.game_over(&session, &scene, best, frame_dur)? {
            break;
        }
    }

    tracing::info!("bye");
    Ok(())
}
