//! Pipe pairs and the scrolling track that recycles them.

use std::collections::VecDeque;

use rand::Rng;

use crate::config::{FIRST_PIPE_X, GROUND_Y, PIPE_HEIGHT, PIPE_MARGIN, PIPE_PAIRS, PIPE_SPACING, PIPE_WIDTH};

#[derive(Debug, Clone, PartialEq)]
pub struct PipePair {
    pub x: f64,
    pub gap_center: f64,
    pub scored: bool,
}

/// Inclusive range of integer gap centers that keeps both gap edges at
/// least `PIPE_MARGIN` away from the ceiling and the ground.
pub fn gap_band(gap: f64) -> (i64, i64) {
    let lo = (PIPE_MARGIN + gap / 2.0).ceil() as i64;
    let hi = (GROUND_Y - PIPE_MARGIN - gap / 2.0).floor() as i64;
    (lo, hi.max(lo))
}

impl PipePair {
    pub fn new(x: f64, gap_center: f64) -> Self {
        Self {
            x,
            gap_center,
            scored: false,
        }
    }

    /// New pair at `x` with a uniformly drawn gap center. Consumes exactly
    /// one draw from `rng`.
    pub fn random<R: Rng + ?Sized>(x: f64, gap: f64, rng: &mut R) -> Self {
        let (lo, hi) = gap_band(gap);
        Self::new(x, rng.random_range(lo..=hi) as f64)
    }

    pub fn right(&self) -> f64 {
        self.x + PIPE_WIDTH
    }

    pub fn mid_x(&self) -> f64 {
        self.x + PIPE_WIDTH / 2.0
    }

    pub fn upper_top(&self, gap: f64) -> f64 {
        self.gap_center - gap / 2.0 - PIPE_HEIGHT
    }

    pub fn upper_bottom(&self, gap: f64) -> f64 {
        self.gap_center - gap / 2.0
    }

    pub fn lower_top(&self, gap: f64) -> f64 {
        self.gap_center + gap / 2.0
    }
}

/// The live pipe pairs, oldest first.
///
/// Holds exactly `PIPE_PAIRS` pairs. When the leading pair has scrolled
/// fully past the left edge it is dropped and a new one is appended
/// `PIPE_SPACING` behind the current last pair.
#[derive(Debug, Clone)]
pub struct PipeTrack {
    pairs: VecDeque<PipePair>,
    gap: f64,
}

impl PipeTrack {
    pub fn new<R: Rng + ?Sized>(gap: f64, rng: &mut R) -> Self {
        let pairs = (0..PIPE_PAIRS)
            .map(|i| PipePair::random(FIRST_PIPE_X + PIPE_SPACING * i as f64, gap, rng))
            .collect();
        Self { pairs, gap }
    }

    pub fn from_pairs(gap: f64, pairs: impl IntoIterator<Item = PipePair>) -> Self {
        Self {
            pairs: pairs.into_iter().collect(),
            gap,
        }
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    pub fn iter(&self) -> impl Iterator<Item = &PipePair> {
        self.pairs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PipePair> {
        self.pairs.iter_mut()
    }

    pub fn front(&self) -> Option<&PipePair> {
        self.pairs.front()
    }

    pub fn back(&self) -> Option<&PipePair> {
        self.pairs.back()
    }

    /// Move every pair left by `speed`, then recycle pairs that are fully
    /// off-screen. Returns how many pairs were recycled.
    pub fn scroll<R: Rng + ?Sized>(&mut self, speed: f64, rng: &mut R) -> usize {
        for pair in &mut self.pairs {
            pair.x -= speed;
        }

        let mut recycled = 0;
        loop {
            match self.pairs.front() {
                Some(front) if front.x < -PIPE_WIDTH => {}
                _ => break,
            }
            let last_x = self.pairs.back().map(|p| p.x).unwrap_or(FIRST_PIPE_X);
            self.pairs.pop_front();
            self.pairs
                .push_back(PipePair::random(last_x + PIPE_SPACING, self.gap, rng));
            recycled += 1;
        }
        recycled
    }
}
