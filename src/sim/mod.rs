//! Deterministic game simulation.
//!
//! - `pipes`: pipe pairs, gap generation and the recycling track
//! - `session`: one round of play and its per-tick update
//! - `game`: the screen state machine driving sessions

pub mod game;
pub mod pipes;
pub mod session;

pub use game::{Command, Game, Screen};
pub use pipes::{PipePair, PipeTrack};
pub use session::{Bird, DeathCause, Session, TickInput};

use crate::config::Difficulty;

/// Something that happened during a tick, for audio and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Flapped,
    Scored,
    NewHighScore,
    HitPipe,
    HitGround,
    MenuMoved,
    DifficultyChosen(Difficulty),
    SessionStarted,
    SessionOver { score: u32, cause: DeathCause },
}
