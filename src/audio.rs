//! Synthesized sound cues, played fire-and-forget.

use std::collections::HashMap;
use std::f32::consts::PI;

use fundsp::prelude32::{AudioUnit, lerp, lfo, lowpass_hz, noise, saw, sine, square};
use rodio::{OutputStream, OutputStreamBuilder, Sink, buffer::SamplesBuffer};

use crate::sim::Event;

pub const SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    Wing,
    Hit,
    Die,
    Point,
    Celebration,
    Swoosh,
}

impl Sound {
    pub const ALL: [Sound; 6] = [
        Sound::Wing,
        Sound::Hit,
        Sound::Die,
        Sound::Point,
        Sound::Celebration,
        Sound::Swoosh,
    ];

    pub fn for_event(event: &Event) -> Option<Sound> {
        match event {
            Event::Flapped => Some(Sound::Wing),
            Event::HitPipe => Some(Sound::Hit),
            Event::HitGround => Some(Sound::Die),
            Event::Scored => Some(Sound::Point),
            Event::NewHighScore => Some(Sound::Celebration),
            Event::MenuMoved | Event::DifficultyChosen(_) | Event::SessionStarted => {
                Some(Sound::Swoosh)
            }
            Event::SessionOver { .. } => None,
        }
    }

    /// Length in seconds.
    pub fn duration(self) -> f32 {
        match self {
            Sound::Wing => 0.09,
            Sound::Hit => 0.15,
            Sound::Die => 0.5,
            Sound::Point => 0.2,
            Sound::Celebration => 0.5,
            Sound::Swoosh => 0.15,
        }
    }

    fn unit(self) -> Box<dyn AudioUnit> {
        match self {
            // Quick upward chirp
            Sound::Wing => Box::new(
                (lfo(|t| lerp(300.0, 700.0, (t / 0.08).min(1.0))) >> sine())
                    * lfo(|t| lerp(0.12, 0.0, (t / 0.09).min(1.0))),
            ),
            // Muffled noise burst
            Sound::Hit => Box::new(
                (noise() >> lowpass_hz(1800.0, 1.0)) * lfo(|t| lerp(0.3, 0.0, (t / 0.15).min(1.0))),
            ),
            // 400Hz to 80Hz sawtooth slide
            Sound::Die => Box::new(
                (lfo(|t| lerp(400.0, 80.0, (t / 0.4).min(1.0))) >> saw())
                    * lfo(|t| lerp(0.15, 0.0, (t / 0.5).min(1.0))),
            ),
            // Two-tone blip, B5 then E6
            Sound::Point => Box::new(
                (lfo(|t| if t < 0.07 { 987.77f32 } else { 1318.51 }) >> square())
                    * lfo(|t| lerp(0.08, 0.0, (t / 0.2).min(1.0))),
            ),
            // C major arpeggio
            Sound::Celebration => Box::new(
                (lfo(|t| {
                    const NOTES: [f32; 4] = [523.25, 659.25, 783.99, 1046.5];
                    NOTES[((t / 0.09) as usize).min(NOTES.len() - 1)]
                }) >> square())
                    * lfo(|t| if t < 0.36 { 0.08 } else { lerp(0.08, 0.0, ((t - 0.36) / 0.14).min(1.0)) }),
            ),
            Sound::Swoosh => Box::new(
                (noise() >> lowpass_hz(900.0, 0.7)) * lfo(|t| 0.12 * (t / 0.15 * PI).sin().max(0.0)),
            ),
        }
    }
}

/// Render `sound` to mono samples at `SAMPLE_RATE`.
pub fn synthesize(sound: Sound) -> Vec<f32> {
    let mut unit = sound.unit();
    unit.set_sample_rate(SAMPLE_RATE as f64);
    let n = (sound.duration() * SAMPLE_RATE as f32) as usize;
    (0..n).map(|_| unit.get_mono().clamp(-1.0, 1.0)).collect()
}

/// Audio output. Falls back to silence when muted or when no device is
/// available.
pub struct Audio {
    stream: Option<OutputStream>,
    clips: HashMap<Sound, Vec<f32>>,
}

impl Audio {
    pub fn open(muted: bool) -> Self {
        if muted {
            log::info!("audio muted");
            return Self::silent();
        }
        match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                stream.log_on_drop(false);
                let clips = Sound::ALL.iter().map(|&s| (s, synthesize(s))).collect();
                log::info!("audio output opened");
                Self {
                    stream: Some(stream),
                    clips,
                }
            }
            Err(err) => {
                log::warn!("no audio output, continuing silently: {err}");
                Self::silent()
            }
        }
    }

    pub fn silent() -> Self {
        Self {
            stream: None,
            clips: HashMap::new(),
        }
    }

    pub fn play(&self, sound: Sound) {
        let (Some(stream), Some(samples)) = (&self.stream, self.clips.get(&sound)) else {
            return;
        };
        let sink = Sink::connect_new(stream.mixer());
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.clone()));
        sink.detach(); // Play in background
    }

    pub fn handle(&self, events: &[Event]) {
        for sound in events.iter().filter_map(Sound::for_event) {
            self.play(sound);
        }
    }
}
