//! World geometry, physics constants, difficulty presets and runtime settings.

use std::path::PathBuf;

// ── World ───────────────────────────────────────────────────────────────────

pub const SCREEN_WIDTH: f64 = 289.0;
pub const SCREEN_HEIGHT: f64 = 511.0;
// Top of the ground strip.
pub const GROUND_Y: f64 = 408.0;

pub const TICKS_PER_SECOND: u32 = 32;

// ── Bird ────────────────────────────────────────────────────────────────────

pub const BIRD_X: f64 = 57.0;
pub const BIRD_START_Y: f64 = 255.0;
pub const BIRD_WIDTH: f64 = 34.0;
pub const BIRD_HEIGHT: f64 = 24.0;

pub const GRAVITY: f64 = 1.0;
pub const MAX_FALL_SPEED: f64 = 10.0;
pub const FLAP_VELOCITY: f64 = -9.0;
// Bird bottom within this distance of the ground counts as a landing.
pub const GROUND_CONTACT_MARGIN: f64 = 1.0;

// ── Pipes ───────────────────────────────────────────────────────────────────

pub const PIPE_WIDTH: f64 = 52.0;
pub const PIPE_HEIGHT: f64 = 320.0;
// Minimum clearance between a gap edge and the ceiling or the ground.
pub const PIPE_MARGIN: f64 = 40.0;
pub const PIPE_PAIRS: usize = 2;
pub const PIPE_SPACING: f64 = 200.0;
pub const FIRST_PIPE_X: f64 = SCREEN_WIDTH + 200.0;

// ── Timers ──────────────────────────────────────────────────────────────────

// "New best" banner lifetime (two seconds).
pub const BANNER_TICKS: u32 = TICKS_PER_SECOND * 2;
// Ticks the game-over panel ignores input for.
pub const DEAD_HOLD_TICKS: u32 = 16;

// ── Difficulty ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }

    pub fn gap(self) -> f64 {
        match self {
            Difficulty::Easy => 160.0,
            Difficulty::Medium => 140.0,
            Difficulty::Hard => 120.0,
        }
    }

    pub fn speed(self) -> f64 {
        match self {
            Difficulty::Easy => 3.0,
            Difficulty::Medium => 4.0,
            Difficulty::Hard => 5.0,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    /// Out-of-range indices fall back to the default.
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }
}

// ── Runtime settings ────────────────────────────────────────────────────────

pub const ENV_HIGH_SCORE_FILE: &str = "FLAPPY_HIGH_SCORE_FILE";
pub const ENV_SEED: &str = "FLAPPY_SEED";
pub const ENV_MUTE: &str = "FLAPPY_MUTE";
pub const ENV_LOG_FILE: &str = "FLAPPY_LOG_FILE";

const DEFAULT_HIGH_SCORE_FILE: &str = "high_score.txt";
const DEFAULT_LOG_FILE: &str = "flappy-term.log";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub high_score_file: PathBuf,
    pub seed: Option<u64>,
    pub muted: bool,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            high_score_file: PathBuf::from(DEFAULT_HIGH_SCORE_FILE),
            seed: None,
            muted: false,
            log_file: std::env::temp_dir().join(DEFAULT_LOG_FILE),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Unparseable values keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Settings::default();

        if let Some(path) = lookup(ENV_HIGH_SCORE_FILE).filter(|p| !p.trim().is_empty()) {
            settings.high_score_file = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_SEED) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => settings.seed = Some(seed),
                Err(_) => log::warn!("ignoring {ENV_SEED}={raw:?}: not an unsigned integer"),
            }
        }
        if let Some(raw) = lookup(ENV_MUTE) {
            settings.muted = matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        if let Some(path) = lookup(ENV_LOG_FILE).filter(|p| !p.trim().is_empty()) {
            settings.log_file = PathBuf::from(path);
        }

        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_difficulty_table() {
        assert_eq!(Difficulty::Easy.gap(), 160.0);
        assert_eq!(Difficulty::Easy.speed(), 3.0);
        assert_eq!(Difficulty::Medium.gap(), 140.0);
        assert_eq!(Difficulty::Medium.speed(), 4.0);
        assert_eq!(Difficulty::Hard.gap(), 120.0);
        assert_eq!(Difficulty::Hard.speed(), 5.0);
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn test_difficulty_index_round_trip() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_index(d.index()), d);
        }
        assert_eq!(Difficulty::from_index(42), Difficulty::Medium);
    }

    #[test]
    fn test_recycled_pair_spawns_off_screen() {
        // Leading pair leaves at -PIPE_WIDTH; its replacement goes two
        // spacings further right than that.
        let spawn_x = -PIPE_WIDTH + PIPE_SPACING * PIPE_PAIRS as f64;
        assert!(spawn_x > SCREEN_WIDTH);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings.high_score_file, PathBuf::from("high_score.txt"));
        assert_eq!(settings.seed, None);
        assert!(!settings.muted);
        assert!(settings.log_file.ends_with("flappy-term.log"));
    }

    #[test]
    fn test_settings_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            (ENV_HIGH_SCORE_FILE, "/tmp/best.txt"),
            (ENV_SEED, " 1234 "),
            (ENV_MUTE, "TRUE"),
            (ENV_LOG_FILE, "/tmp/flappy.log"),
        ]));
        assert_eq!(settings.high_score_file, PathBuf::from("/tmp/best.txt"));
        assert_eq!(settings.seed, Some(1234));
        assert!(settings.muted);
        assert_eq!(settings.log_file, PathBuf::from("/tmp/flappy.log"));
    }

    #[test]
    fn test_settings_bad_seed_ignored() {
        let settings = Settings::from_lookup(lookup_from(&[(ENV_SEED, "soon"), (ENV_MUTE, "0")]));
        assert_eq!(settings.seed, None);
        assert!(!settings.muted);
    }
}
