//! One round of play: bird physics, collision, scrolling and scoring.

use rand::Rng;

use super::Event;
use super::pipes::{PipePair, PipeTrack};
use crate::config::{
    BANNER_TICKS, BIRD_HEIGHT, BIRD_START_Y, BIRD_WIDTH, BIRD_X, Difficulty, FLAP_VELOCITY, GRAVITY,
    GROUND_CONTACT_MARGIN, GROUND_Y, MAX_FALL_SPEED, PIPE_WIDTH,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub vy: f64,
    pub flapped: bool,
}

impl Default for Bird {
    fn default() -> Self {
        Self {
            x: BIRD_X,
            y: BIRD_START_Y,
            vy: FLAP_VELOCITY,
            flapped: false,
        }
    }
}

impl Bird {
    pub fn bottom(&self) -> f64 {
        self.y + BIRD_HEIGHT
    }

    pub fn right(&self) -> f64 {
        self.x + BIRD_WIDTH
    }

    pub fn mid_x(&self) -> f64 {
        self.x + BIRD_WIDTH / 2.0
    }

    /// Apply an upward impulse. Refused while the bird is at or above the
    /// top of the screen.
    pub fn flap(&mut self) -> bool {
        if self.y <= 0.0 {
            return false;
        }
        self.vy = FLAP_VELOCITY;
        self.flapped = true;
        true
    }

    /// Advance one tick. Gravity is skipped on a flap tick; the descent is
    /// clamped so the bird stops on the ground line.
    pub fn integrate(&mut self) {
        if !self.flapped {
            self.vy = (self.vy + GRAVITY).min(MAX_FALL_SPEED);
        }
        self.y += self.vy.min(GROUND_Y - self.y - BIRD_HEIGHT);
    }

    pub fn on_ground(&self) -> bool {
        self.bottom() >= GROUND_Y - GROUND_CONTACT_MARGIN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Pipe,
    Ground,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub flap: bool,
}

pub fn hits_pair(bird: &Bird, pair: &PipePair, gap: f64) -> bool {
    let overlaps_x = bird.right() > pair.x && bird.x < pair.x + PIPE_WIDTH;
    overlaps_x && (bird.y < pair.upper_bottom(gap) || bird.bottom() > pair.lower_top(gap))
}

// Pipe hits take precedence over ground contact.
pub fn check_collision(bird: &Bird, pipes: &PipeTrack) -> Option<DeathCause> {
    if pipes.iter().any(|pair| hits_pair(bird, pair, pipes.gap())) {
        return Some(DeathCause::Pipe);
    }
    if bird.on_ground() {
        return Some(DeathCause::Ground);
    }
    None
}

#[derive(Debug, Clone)]
pub struct Session {
    pub difficulty: Difficulty,
    pub bird: Bird,
    pub pipes: PipeTrack,
    pub score: u32,
    pub best_at_start: u32,
    pub banner_ticks: u32,
    banner_shown: bool,
    pub death: Option<DeathCause>,
    pub ticks: u64,
}

impl Session {
    pub fn new<R: Rng + ?Sized>(difficulty: Difficulty, best_at_start: u32, rng: &mut R) -> Self {
        Self::with_track(
            difficulty,
            best_at_start,
            PipeTrack::new(difficulty.gap(), rng),
        )
    }

    pub fn with_track(difficulty: Difficulty, best_at_start: u32, pipes: PipeTrack) -> Self {
        Self {
            difficulty,
            bird: Bird::default(),
            pipes,
            score: 0,
            best_at_start,
            banner_ticks: 0,
            banner_shown: false,
            death: None,
            ticks: 0,
        }
    }

    pub fn is_over(&self) -> bool {
        self.death.is_some()
    }

    pub fn banner_visible(&self) -> bool {
        self.banner_ticks > 0
    }
}

/// Advance a live session by one frame.
///
/// Order: flap input, integration, collision, scroll and recycle, scoring.
/// A collision ends the session before anything scrolls or scores. Ended
/// sessions are left untouched.
pub fn tick<R: Rng + ?Sized>(session: &mut Session, input: TickInput, rng: &mut R) -> Vec<Event> {
    let mut events = Vec::new();
    if session.is_over() {
        return events;
    }
    session.ticks += 1;
    session.banner_ticks = session.banner_ticks.saturating_sub(1);

    session.bird.flapped = false;
    if input.flap && session.bird.flap() {
        events.push(Event::Flapped);
    }
    session.bird.integrate();

    if let Some(cause) = check_collision(&session.bird, &session.pipes) {
        session.death = Some(cause);
        events.push(match cause {
            DeathCause::Pipe => Event::HitPipe,
            DeathCause::Ground => Event::HitGround,
        });
        return events;
    }

    let speed = session.difficulty.speed();
    session.pipes.scroll(speed, rng);

    let bird_mid = session.bird.mid_x();
    for pair in session.pipes.iter_mut() {
        let pair_mid = pair.mid_x();
        if !pair.scored && pair_mid <= bird_mid && bird_mid < pair_mid + speed {
            pair.scored = true;
            session.score += 1;
            events.push(Event::Scored);
        }
    }

    if !session.banner_shown && session.score > session.best_at_start {
        session.banner_shown = true;
        session.banner_ticks = BANNER_TICKS;
        events.push(Event::NewHighScore);
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn far_track(gap: f64) -> PipeTrack {
        PipeTrack::from_pairs(
            gap,
            [PipePair::new(2_000.0, 200.0), PipePair::new(2_200.0, 200.0)],
        )
    }

    fn open_session(difficulty: Difficulty) -> Session {
        Session::with_track(difficulty, 0, far_track(difficulty.gap()))
    }

    #[test]
    fn test_new_session_defaults() {
        let mut rng = Pcg32::seed_from_u64(1);
        let session = Session::new(Difficulty::Medium, 7, &mut rng);
        assert_eq!(session.score, 0);
        assert_eq!(session.best_at_start, 7);
        assert_eq!(session.bird.x, BIRD_X);
        assert_eq!(session.bird.y, BIRD_START_Y);
        assert_eq!(session.bird.vy, FLAP_VELOCITY);
        assert!(!session.is_over());
        assert!(!session.banner_visible());
        assert_eq!(session.pipes.iter().count(), crate::config::PIPE_PAIRS);
    }

    #[test]
    fn test_gravity_adds_exactly_until_cap() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut session = open_session(Difficulty::Easy);
        session.bird.y = 0.5;
        session.bird.vy = -5.0;

        let mut prev = session.bird.vy;
        for _ in 0..20 {
            tick(&mut session, TickInput::default(), &mut rng);
            let vy = session.bird.vy;
            if prev < MAX_FALL_SPEED {
                assert_relative_eq!(vy, (prev + GRAVITY).min(MAX_FALL_SPEED));
                assert!(vy > prev);
            } else {
                assert_relative_eq!(vy, MAX_FALL_SPEED);
            }
            prev = vy;
        }
        assert_relative_eq!(session.bird.vy, MAX_FALL_SPEED);
    }

    #[test]
    fn test_flap_suppresses_gravity_for_one_tick() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut session = open_session(Difficulty::Easy);
        session.bird.vy = 6.0;
        let y0 = session.bird.y;

        let events = tick(&mut session, TickInput { flap: true }, &mut rng);
        assert_eq!(events, vec![Event::Flapped]);
        assert_relative_eq!(session.bird.vy, FLAP_VELOCITY);
        assert_relative_eq!(session.bird.y, y0 + FLAP_VELOCITY);
        assert!(session.bird.flapped);

        tick(&mut session, TickInput::default(), &mut rng);
        assert_relative_eq!(session.bird.vy, FLAP_VELOCITY + GRAVITY);
        assert!(!session.bird.flapped);
    }

    #[test]
    fn test_flap_refused_above_screen() {
        let mut bird = Bird {
            y: 0.0,
            vy: 2.0,
            ..Bird::default()
        };
        assert!(!bird.flap());
        assert_eq!(bird.vy, 2.0);

        bird.y = 0.1;
        assert!(bird.flap());
        assert_eq!(bird.vy, FLAP_VELOCITY);
    }

    #[test]
    fn test_descent_clamped_to_ground() {
        let mut bird = Bird {
            y: GROUND_Y - BIRD_HEIGHT - 3.0,
            vy: MAX_FALL_SPEED,
            ..Bird::default()
        };
        bird.integrate();
        assert_relative_eq!(bird.y, GROUND_Y - BIRD_HEIGHT);
        bird.integrate();
        assert!(bird.y <= GROUND_Y - BIRD_HEIGHT);
        assert!(bird.on_ground());
    }

    #[test]
    fn test_hits_pair_boxes() {
        let gap = 140.0;
        let pair = PipePair::new(80.0, 200.0);
        // Gap spans 130..270.
        let inside = Bird {
            y: 150.0,
            ..Bird::default()
        };
        assert!(!hits_pair(&inside, &pair, gap));

        let touching_upper = Bird {
            y: 129.0,
            ..Bird::default()
        };
        assert!(hits_pair(&touching_upper, &pair, gap));

        let touching_lower = Bird {
            y: 270.0 - BIRD_HEIGHT + 1.0,
            ..Bird::default()
        };
        assert!(hits_pair(&touching_lower, &pair, gap));

        let flush_with_edges = Bird {
            y: 130.0,
            ..Bird::default()
        };
        assert!(!hits_pair(&flush_with_edges, &pair, gap));
    }

    #[test]
    fn test_no_hit_without_horizontal_overlap() {
        let gap = 140.0;
        let low_bird = Bird {
            y: 350.0,
            ..Bird::default()
        };
        // Pair starts exactly at the bird's right edge.
        let ahead = PipePair::new(BIRD_X + BIRD_WIDTH, 200.0);
        assert!(!hits_pair(&low_bird, &ahead, gap));
        // Pair ends exactly at the bird's left edge.
        let behind = PipePair::new(BIRD_X - PIPE_WIDTH, 200.0);
        assert!(!hits_pair(&low_bird, &behind, gap));
        let overlapping = PipePair::new(BIRD_X + BIRD_WIDTH - 1.0, 200.0);
        assert!(hits_pair(&low_bird, &overlapping, gap));
    }

    #[test]
    fn test_any_live_pair_can_collide() {
        let gap = 140.0;
        let bird = Bird {
            y: 150.0,
            ..Bird::default()
        };
        let track = PipeTrack::from_pairs(
            gap,
            [PipePair::new(500.0, 200.0), PipePair::new(60.0, 380.0)],
        );
        assert_eq!(check_collision(&bird, &track), Some(DeathCause::Pipe));
    }

    #[test]
    fn test_pipe_collision_ends_session_before_scroll() {
        let mut rng = Pcg32::seed_from_u64(2);
        let gap = Difficulty::Medium.gap();
        let track = PipeTrack::from_pairs(
            gap,
            [PipePair::new(60.0, 100.0), PipePair::new(260.0, 200.0)],
        );
        let mut session = Session::with_track(Difficulty::Medium, 0, track);
        session.bird.y = 250.0;
        session.bird.vy = 0.0;

        let events = tick(&mut session, TickInput::default(), &mut rng);
        assert_eq!(events, vec![Event::HitPipe]);
        assert_eq!(session.death, Some(DeathCause::Pipe));
        assert_eq!(session.pipes.front().map(|p| p.x), Some(60.0));

        let after = tick(&mut session, TickInput { flap: true }, &mut rng);
        assert!(after.is_empty());
        assert_eq!(session.ticks, 1);
    }

    #[test]
    fn test_ground_contact_ends_session() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut session = open_session(Difficulty::Easy);
        session.bird.y = GROUND_Y - BIRD_HEIGHT - 4.0;
        session.bird.vy = 5.0;

        let events = tick(&mut session, TickInput::default(), &mut rng);
        assert_eq!(events, vec![Event::HitGround]);
        assert_eq!(session.death, Some(DeathCause::Ground));
    }

    #[test]
    fn test_score_credited_once_per_pair() {
        let mut rng = Pcg32::seed_from_u64(4);
        let difficulty = Difficulty::Easy;
        let speed = difficulty.speed();
        let gap = difficulty.gap();
        let bird_mid = BIRD_X + BIRD_WIDTH / 2.0;
        // Pair midpoint reaches the bird midpoint after exactly 10 ticks.
        let x = bird_mid + 10.0 * speed - PIPE_WIDTH / 2.0;
        let track = PipeTrack::from_pairs(gap, [PipePair::new(x, 250.0), PipePair::new(x + 200.0, 250.0)]);
        let mut session = Session::with_track(difficulty, 100, track);

        for n in 1..=40 {
            // Hold the bird level in the middle of the gap.
            session.bird.y = 250.0 - BIRD_HEIGHT / 2.0;
            session.bird.vy = -GRAVITY;
            let events = tick(&mut session, TickInput::default(), &mut rng);
            assert!(!session.is_over(), "died on tick {n}");
            let scored = events.iter().filter(|e| **e == Event::Scored).count();
            if n == 10 {
                assert_eq!(scored, 1);
            } else {
                assert_eq!(scored, 0, "unexpected point on tick {n}");
            }
            assert_eq!(session.score, if n >= 10 { 1 } else { 0 });
        }
    }

    #[test]
    fn test_banner_once_when_best_beaten() {
        let mut rng = Pcg32::seed_from_u64(4);
        let difficulty = Difficulty::Easy;
        let bird_mid = BIRD_X + BIRD_WIDTH / 2.0;
        let x = bird_mid + difficulty.speed() - PIPE_WIDTH / 2.0;
        let track = PipeTrack::from_pairs(
            difficulty.gap(),
            [PipePair::new(x, 250.0), PipePair::new(x + 200.0, 250.0)],
        );
        let mut session = Session::with_track(difficulty, 0, track);
        session.bird.y = 250.0 - BIRD_HEIGHT / 2.0;
        session.bird.vy = -GRAVITY;

        let events = tick(&mut session, TickInput::default(), &mut rng);
        assert_eq!(events, vec![Event::Scored, Event::NewHighScore]);
        assert_eq!(session.banner_ticks, BANNER_TICKS);

        for _ in 0..BANNER_TICKS - 1 {
            session.bird.y = 250.0 - BIRD_HEIGHT / 2.0;
            session.bird.vy = -GRAVITY;
            let events = tick(&mut session, TickInput::default(), &mut rng);
            assert!(!events.contains(&Event::NewHighScore));
            assert!(session.banner_visible());
        }
        session.bird.y = 250.0 - BIRD_HEIGHT / 2.0;
        session.bird.vy = -GRAVITY;
        tick(&mut session, TickInput::default(), &mut rng);
        assert!(!session.banner_visible());
    }

    #[test]
    fn test_no_banner_below_best() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut session = open_session(Difficulty::Easy);
        session.best_at_start = 5;
        session.score = 5;
        session.bird.y = 200.0;
        let events = tick(&mut session, TickInput::default(), &mut rng);
        assert!(events.is_empty());
        assert!(!session.banner_visible());
    }
}
