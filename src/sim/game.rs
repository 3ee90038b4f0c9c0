//! Screen state machine: difficulty menu, welcome, playing, dead.

use rand::Rng;

use super::Event;
use super::session::{self, Session, TickInput};
use crate::config::{DEAD_HOLD_TICKS, Difficulty};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Flap,
    Up,
    Down,
    Confirm,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    DifficultySelect { selected: usize },
    Welcome,
    Playing,
    Dead { ticks: u32 },
    Exit,
}

pub struct Game<R: Rng> {
    pub screen: Screen,
    pub difficulty: Difficulty,
    pub high_score: u32,
    pub session: Option<Session>,
    pub frame: u64,
    // Horizontal offset of ground and hills, for parallax.
    pub scenery_x: f64,
    flap_pending: bool,
    pending: Vec<Event>,
    rng: R,
}

impl<R: Rng> Game<R> {
    pub fn new(high_score: u32, rng: R) -> Self {
        Self {
            screen: Screen::DifficultySelect {
                selected: Difficulty::default().index(),
            },
            difficulty: Difficulty::default(),
            high_score,
            session: None,
            frame: 0,
            scenery_x: 0.0,
            flap_pending: false,
            pending: Vec::new(),
            rng,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.screen == Screen::Exit
    }

    /// Feed one command. Flaps during play are latched until the next tick,
    /// so several presses within a tick count once.
    pub fn press(&mut self, cmd: Command) {
        if cmd == Command::Quit {
            log::info!("quit requested");
            self.screen = Screen::Exit;
            return;
        }

        match self.screen {
            Screen::DifficultySelect { selected } => {
                let n = Difficulty::ALL.len();
                match cmd {
                    Command::Up => {
                        self.screen = Screen::DifficultySelect {
                            selected: (selected + n - 1) % n,
                        };
                        self.pending.push(Event::MenuMoved);
                    }
                    Command::Down => {
                        self.screen = Screen::DifficultySelect {
                            selected: (selected + 1) % n,
                        };
                        self.pending.push(Event::MenuMoved);
                    }
                    Command::Confirm | Command::Flap => {
                        self.difficulty = Difficulty::from_index(selected);
                        log::info!("difficulty set to {}", self.difficulty.name());
                        self.screen = Screen::Welcome;
                        self.pending.push(Event::DifficultyChosen(self.difficulty));
                    }
                    Command::Quit => {}
                }
            }
            Screen::Welcome => match cmd {
                Command::Flap | Command::Confirm => self.start_session(),
                Command::Up | Command::Down => {
                    self.screen = Screen::DifficultySelect {
                        selected: self.difficulty.index(),
                    };
                    self.pending.push(Event::MenuMoved);
                }
                Command::Quit => {}
            },
            Screen::Playing => {
                if cmd == Command::Flap {
                    self.flap_pending = true;
                }
            }
            Screen::Dead { ticks } => {
                if ticks >= DEAD_HOLD_TICKS && matches!(cmd, Command::Flap | Command::Confirm) {
                    self.screen = Screen::Welcome;
                }
            }
            Screen::Exit => {}
        }
    }

    fn start_session(&mut self) {
        log::info!(
            "session started: difficulty={} best={}",
            self.difficulty.name(),
            self.high_score
        );
        self.session = Some(Session::new(self.difficulty, self.high_score, &mut self.rng));
        self.flap_pending = false;
        self.screen = Screen::Playing;
        self.pending.push(Event::SessionStarted);
    }

    pub fn tick(&mut self) -> Vec<Event> {
        self.frame += 1;
        let mut events = std::mem::take(&mut self.pending);

        match self.screen {
            Screen::DifficultySelect { .. } | Screen::Welcome => {
                self.scenery_x += 0.5;
            }
            Screen::Playing => {
                let flap = std::mem::take(&mut self.flap_pending);
                let Some(session) = self.session.as_mut() else {
                    self.screen = Screen::Welcome;
                    return events;
                };
                events.extend(session::tick(session, TickInput { flap }, &mut self.rng));

                if let Some(cause) = session.death {
                    log::info!(
                        "session over: score={} cause={:?} ticks={}",
                        session.score,
                        cause,
                        session.ticks
                    );
                    self.high_score = self.high_score.max(session.score);
                    events.push(Event::SessionOver {
                        score: session.score,
                        cause,
                    });
                    self.screen = Screen::Dead { ticks: 0 };
                } else {
                    self.scenery_x += session.difficulty.speed();
                }
            }
            Screen::Dead { ticks } => {
                // The bird drops to the ground behind the game-over panel.
                if let Some(session) = self.session.as_mut() {
                    if !session.bird.on_ground() {
                        session.bird.flapped = false;
                        session.bird.integrate();
                    }
                }
                self.screen = Screen::Dead {
                    ticks: ticks.saturating_add(1),
                };
            }
            Screen::Exit => {}
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::DeathCause;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn game() -> Game<Pcg32> {
        Game::new(0, Pcg32::seed_from_u64(42))
    }

    fn start(game: &mut Game<Pcg32>, difficulty: Difficulty) {
        game.screen = Screen::DifficultySelect {
            selected: difficulty.index(),
        };
        game.press(Command::Confirm);
        game.press(Command::Flap);
        game.tick();
    }

    #[test]
    fn test_starts_in_menu_on_medium() {
        let game = game();
        assert_eq!(game.screen, Screen::DifficultySelect { selected: 1 });
        assert_eq!(game.difficulty, Difficulty::Medium);
        assert!(game.session.is_none());
    }

    #[test]
    fn test_menu_wraps_both_ways() {
        let mut game = game();
        game.press(Command::Down);
        game.press(Command::Down);
        assert_eq!(game.screen, Screen::DifficultySelect { selected: 0 });
        game.press(Command::Up);
        assert_eq!(game.screen, Screen::DifficultySelect { selected: 2 });
        let events = game.tick();
        assert_eq!(events, vec![Event::MenuMoved; 3]);
    }

    #[test]
    fn test_confirm_sets_difficulty() {
        let mut game = game();
        game.press(Command::Up);
        game.press(Command::Confirm);
        assert_eq!(game.screen, Screen::Welcome);
        assert_eq!(game.difficulty, Difficulty::Easy);
        assert!(game.tick().contains(&Event::DifficultyChosen(Difficulty::Easy)));
    }

    #[test]
    fn test_welcome_back_to_menu_keeps_choice() {
        let mut game = game();
        game.press(Command::Down);
        game.press(Command::Confirm);
        game.press(Command::Down);
        assert_eq!(game.screen, Screen::DifficultySelect { selected: 2 });
    }

    #[test]
    fn test_flap_on_welcome_starts_session() {
        let mut game = game();
        game.press(Command::Confirm);
        game.press(Command::Flap);
        assert_eq!(game.screen, Screen::Playing);
        let session = game.session.as_ref().map(|s| s.difficulty);
        assert_eq!(session, Some(Difficulty::Medium));
        assert!(game.tick().contains(&Event::SessionStarted));
    }

    #[test]
    fn test_multiple_presses_in_one_tick_flap_once() {
        let mut game = game();
        start(&mut game, Difficulty::Easy);
        game.press(Command::Flap);
        game.press(Command::Flap);
        game.press(Command::Flap);
        let events = game.tick();
        assert_eq!(events.iter().filter(|e| **e == Event::Flapped).count(), 1);

        let events = game.tick();
        assert!(!events.contains(&Event::Flapped));
    }

    #[test]
    fn test_menu_keys_ignored_while_playing() {
        let mut game = game();
        start(&mut game, Difficulty::Easy);
        game.press(Command::Up);
        game.press(Command::Confirm);
        assert_eq!(game.screen, Screen::Playing);
    }

    #[test]
    fn test_death_flow_and_hold() {
        let mut game = game();
        start(&mut game, Difficulty::Medium);

        let mut over = None;
        for _ in 0..100 {
            for event in game.tick() {
                if let Event::SessionOver { score, cause } = event {
                    over = Some((score, cause));
                }
            }
            if over.is_some() {
                break;
            }
        }
        assert_eq!(over, Some((0, DeathCause::Ground)));
        assert_eq!(game.screen, Screen::Dead { ticks: 0 });

        game.press(Command::Flap);
        assert!(matches!(game.screen, Screen::Dead { .. }));

        for _ in 0..DEAD_HOLD_TICKS {
            game.tick();
        }
        game.press(Command::Flap);
        assert_eq!(game.screen, Screen::Welcome);
    }

    #[test]
    fn test_high_score_tracks_best_run() {
        let mut game = Game::new(3, Pcg32::seed_from_u64(1));
        start(&mut game, Difficulty::Easy);
        if let Some(session) = game.session.as_mut() {
            session.score = 9;
            session.bird.y = crate::config::GROUND_Y - crate::config::BIRD_HEIGHT;
            session.bird.vy = 5.0;
        }
        game.tick();
        assert_eq!(game.high_score, 9);
    }

    #[test]
    fn test_quit_from_every_screen() {
        let screens = [
            Screen::DifficultySelect { selected: 0 },
            Screen::Welcome,
            Screen::Playing,
            Screen::Dead { ticks: 0 },
        ];
        for screen in screens {
            let mut game = game();
            game.screen = screen;
            game.press(Command::Quit);
            assert!(game.is_finished(), "quit ignored on {screen:?}");
        }
    }
}
