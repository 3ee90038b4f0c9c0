use std::fs::File;
use std::io::{self, stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, terminal,
};
use log::{info, warn};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use flappy_term::audio::Audio;
use flappy_term::config::{Settings, TICKS_PER_SECOND};
use flappy_term::highscore::HighScoreStore;
use flappy_term::render::{self, PixelBuf};
use flappy_term::sim::{Command, Event, Game, Screen};

fn init_logging(settings: &Settings) -> Result<()> {
    // The terminal belongs to the game, so logs go to a file.
    let file = File::create(&settings.log_file)
        .with_context(|| format!("cannot create log file {}", settings.log_file.display()))?;
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// Up flaps during play and moves the selection in menus. Repeats and
// releases are dropped so a held key flaps once.
fn command_for(key: KeyEvent, screen: Screen) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Char(' ') | KeyCode::Char('w') => Some(Command::Flap),
        KeyCode::Up if screen == Screen::Playing => Some(Command::Flap),
        KeyCode::Up => Some(Command::Up),
        KeyCode::Down => Some(Command::Down),
        KeyCode::Enter => Some(Command::Confirm),
        _ => None,
    }
}

fn run(
    out: &mut io::Stdout,
    game: &mut Game<Pcg32>,
    audio: &Audio,
    store: &HighScoreStore,
) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::new(cols as usize, rows as usize * 2);
    let frame_dur = Duration::from_micros(1_000_000 / TICKS_PER_SECOND as u64);

    while !game.is_finished() {
        let frame_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                TermEvent::Key(key) => {
                    if let Some(cmd) = command_for(key, game.screen) {
                        game.press(cmd);
                    }
                }
                TermEvent::Resize(c, r) => buf.resize(c as usize, r as usize * 2),
                _ => {}
            }
        }

        // Update
        let events = game.tick();
        audio.handle(&events);
        for event in &events {
            if let Event::SessionOver { score, .. } = event {
                if let Err(err) = store.record(*score) {
                    warn!("{err}");
                }
            }
        }

        // Render
        render::draw(game, &mut buf);
        buf.render(out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let settings = Settings::from_env();
    init_logging(&settings)?;
    info!("starting flappy-term: {settings:?}");

    let store = HighScoreStore::new(&settings.high_score_file);
    let high_score = store.load();
    let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
    info!("high score {high_score}, seed {seed}");

    let mut game = Game::new(high_score, Pcg32::seed_from_u64(seed));
    let audio = Audio::open(settings.muted);

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
    )?;
    // Without event types, terminals report auto-repeat as plain presses.
    let key_kinds = terminal::supports_keyboard_enhancement().unwrap_or(false);
    if key_kinds {
        execute!(
            out,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    } else {
        warn!("terminal does not report key repeats; holding a key flaps repeatedly");
    }

    let result = run(&mut out, &mut game, &audio, &store);

    if key_kinds {
        execute!(out, PopKeyboardEnhancementFlags)?;
    }
    execute!(
        out,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )?;
    terminal::disable_raw_mode()?;

    info!("exiting, best score {}", game.high_score);
    result
}
