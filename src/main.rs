//! Serpent Sprint entry point
//!
//! Sets up logging, settings and the terminal, then runs the fixed-tick
//! game loop until the player quits.

use std::io::{self, BufWriter, Stdout, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::{cursor, execute, terminal};

use serpent_sprint::audio::{AudioManager, SoundEffect};
use serpent_sprint::platform::{FrameClock, InputAction, KeyTracker, ScreenMap, map_event};
use serpent_sprint::renderer::TerminalRenderer;
use serpent_sprint::settings::DEFAULT_CONFIG_FILE;
use serpent_sprint::sim::{FlowOutcome, Game, PlayerName, TickInput};
use serpent_sprint::{HighScores, ScoreLog, Settings, SpriteCatalog};

#[derive(Parser, Debug)]
#[command(name = "serpent-sprint")]
#[command(about = "Dodge the pythons, survive the pass-bys")]
struct Args {
    /// Pre-fill the player name and skip the introduction
    #[arg(long)]
    name: Option<String>,
    /// CSV score log (defaults to the path in the settings)
    #[arg(long)]
    scores: Option<PathBuf>,
    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Settings file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the leaderboard and exit
    #[arg(long)]
    show_scores: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = args.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let settings = Settings::load(&config);
    let score_log = ScoreLog::new(args.scores.clone().unwrap_or_else(|| settings.score_log.clone()));

    if args.show_scores {
        print_scores(&score_log);
        return;
    }

    let catalog = match SpriteCatalog::builtin() {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("Cannot load sprites: {}", e);
            eprintln!("serpent-sprint: {e}");
            std::process::exit(1);
        }
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Serpent Sprint starting (seed {seed})");

    let mut game = Game::new(catalog, settings.viewport(), seed);
    if let Some(name) = &args.name {
        game = game.with_name(PlayerName::parse(name));
    }

    if let Err(e) = run_terminal(game, &settings, &score_log) {
        log::error!("Terminal error: {}", e);
        eprintln!("serpent-sprint: {e}");
        std::process::exit(1);
    }
}

fn print_scores(score_log: &ScoreLog) {
    let records = match score_log.load() {
        Ok(records) => records,
        Err(e) => {
            eprintln!("serpent-sprint: {e}");
            std::process::exit(1);
        }
    };
    let board = HighScores::from_records(records);
    if board.is_empty() {
        println!("No scores yet in {}", score_log.path().display());
        return;
    }
    println!("{:>4}  {:<8}  {:>6}  Mode", "Rank", "Name", "Score");
    for (i, record) in board.entries.iter().enumerate() {
        println!("{:>4}  {:<8}  {:>6}  {}", i + 1, record.name, record.score, record.mode.as_str());
    }
}

/// Enter the alternate screen, run, and always restore the terminal
fn run_terminal(game: Game, settings: &Settings, score_log: &ScoreLog) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let mut out = BufWriter::new(io::stdout());
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableMouseCapture,
    )?;

    let result = game_loop(&mut out, game, settings, score_log);

    let _ = execute!(
        out,
        DisableMouseCapture,
        terminal::EnableLineWrap,
        cursor::Show,
        terminal::LeaveAlternateScreen,
    );
    let _ = terminal::disable_raw_mode();
    result
}

fn game_loop(
    out: &mut BufWriter<Stdout>,
    mut game: Game,
    settings: &Settings,
    score_log: &ScoreLog,
) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut renderer = TerminalRenderer::new(ScreenMap::new(cols, rows, game.viewport()));
    let mut clock = FrameClock::new(settings.frame_duration());
    let mut keys = KeyTracker::new();
    let mut audio = AudioManager::from_settings(settings);
    let mut best = load_leaderboard(score_log);

    loop {
        clock.begin();
        keys.begin_frame();

        // Drain all pending input (non-blocking)
        let mut pause = false;
        while event::poll(Duration::ZERO)? {
            let ev = event::read()?;
            if let Event::Key(key) = &ev {
                keys.observe(key);
            }
            match map_event(&ev, renderer.screen(), game.phase()) {
                Some(InputAction::Quit) => {
                    log::info!("Quit requested");
                    return Ok(());
                }
                Some(InputAction::TogglePause) => pause = !pause,
                Some(InputAction::Resize(c, r)) => renderer.resize(c, r),
                Some(InputAction::Menu(input)) => match game.handle_input(input) {
                    Ok(FlowOutcome::SessionStarted(_)) => {
                        audio.play(SoundEffect::Select);
                        keys.clear();
                    }
                    Ok(FlowOutcome::SessionFinished(record)) => {
                        if let Err(e) = score_log.append(&record) {
                            log::warn!("Could not record score: {}", e);
                        }
                        best = load_leaderboard(score_log);
                        keys.clear();
                    }
                    Ok(FlowOutcome::Advanced(phase)) => log::debug!("Advanced to {phase:?}"),
                    Ok(FlowOutcome::NameEdited | FlowOutcome::Unchanged) => {}
                    Err(e) => {
                        log::error!("Cannot start session: {}", e);
                        return Err(io::Error::other(e));
                    }
                },
                None => {}
            }
        }

        let report = game.tick(&TickInput {
            held: keys.held_directions(),
            pause,
        });
        audio.play_report(&report);

        let fps = settings.show_fps.then(|| clock.measured_fps());
        renderer.draw(&game, &best, fps);
        renderer.present(out)?;
        audio.flush(out)?;
        out.flush()?;

        clock.finish();
    }
}

fn load_leaderboard(score_log: &ScoreLog) -> HighScores {
    match score_log.load() {
        Ok(records) => HighScores::from_records(records),
        Err(e) => {
            log::warn!("Could not read scores from {}: {}", score_log.path().display(), e);
            HighScores::new()
        }
    }
}
