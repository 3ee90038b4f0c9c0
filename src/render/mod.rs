//! Scene drawing: maps the fixed world onto the terminal pixel buffer.

pub mod font;
pub mod pixels;

pub use pixels::{PixelBuf, Rgb};

use rand::Rng;

use crate::config::{
    BIRD_HEIGHT, BIRD_START_Y, BIRD_WIDTH, DEAD_HOLD_TICKS, Difficulty, GROUND_Y, PIPE_HEIGHT,
    PIPE_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH,
};
use crate::sim::{Bird, Game, PipePair, Screen, Session};
use font::{draw_number, draw_text};

// ── Colors ──────────────────────────────────────────────────────────────────

const LETTERBOX: Rgb = Rgb(18, 22, 30);
const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const PANEL: Rgb = Rgb(220, 195, 120);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_BODY: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const BIRD_BEAK_HI: Rgb = Rgb(240, 110, 50);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);
const WHITE: Rgb = Rgb(255, 255, 255);
const GREY: Rgb = Rgb(200, 200, 200);
const BANNER: Rgb = Rgb(235, 50, 40);
const SHADOW: Rgb = Rgb(30, 30, 30);

// Pipe cap lip, in world units.
const CAP_H: f64 = 24.0;
const CAP_EXTRA: f64 = 3.0;

// ── Viewport ────────────────────────────────────────────────────────────────

/// Uniform scale from world units to buffer pixels, centred with
/// letterboxing on the long axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub ox: f64,
    pub oy: f64,
}

impl Viewport {
    pub fn fit(pw: usize, ph: usize) -> Self {
        let scale = (pw as f64 / SCREEN_WIDTH).min(ph as f64 / SCREEN_HEIGHT);
        Self {
            scale,
            ox: (pw as f64 - SCREEN_WIDTH * scale) / 2.0,
            oy: (ph as f64 - SCREEN_HEIGHT * scale) / 2.0,
        }
    }

    pub fn x(&self, wx: f64) -> i32 {
        (self.ox + wx * self.scale).floor() as i32
    }

    pub fn y(&self, wy: f64) -> i32 {
        (self.oy + wy * self.scale).floor() as i32
    }

    /// World rectangle to `(x, y, w, h)` pixels, never thinner than one
    /// pixel.
    pub fn rect(&self, x: f64, y: f64, w: f64, h: f64) -> (i32, i32, i32, i32) {
        let x0 = self.x(x);
        let y0 = self.y(y);
        (x0, y0, (self.x(x + w) - x0).max(1), (self.y(y + h) - y0).max(1))
    }

    pub fn text_size(&self, world_h: f64) -> i32 {
        ((world_h * self.scale) / 5.0).floor().max(1.0) as i32
    }

    fn fill(&self, buf: &mut PixelBuf, x: f64, y: f64, w: f64, h: f64, c: Rgb) {
        let (px, py, pw, ph) = self.rect(x, y, w, h);
        buf.fill_rect(px, py, pw, ph, c);
    }
}

// ── Scenes ──────────────────────────────────────────────────────────────────

pub fn draw<R: Rng>(game: &Game<R>, buf: &mut PixelBuf) {
    let vp = Viewport::fit(buf.w, buf.h);
    buf.clear(LETTERBOX);

    match game.screen {
        Screen::DifficultySelect { selected } => {
            draw_backdrop(buf, &vp, game.scenery_x);
            draw_menu(buf, &vp, selected);
        }
        Screen::Welcome => draw_welcome(game, buf, &vp),
        Screen::Playing => {
            if let Some(session) = &game.session {
                draw_session(session, game.frame, game.scenery_x, buf, &vp);
            }
        }
        Screen::Dead { ticks } => {
            if let Some(session) = &game.session {
                draw_session(session, game.frame, game.scenery_x, buf, &vp);
                if ticks >= DEAD_HOLD_TICKS {
                    draw_game_over(buf, &vp, session.score, game.high_score);
                }
            }
        }
        Screen::Exit => {}
    }

    draw_letterbox(buf, &vp);
}

fn draw_session(session: &Session, frame: u64, scenery_x: f64, buf: &mut PixelBuf, vp: &Viewport) {
    draw_sky(buf, vp);
    draw_hills(buf, vp, scenery_x);
    let gap = session.pipes.gap();
    for pair in session.pipes.iter() {
        draw_pipe_pair(buf, vp, pair, gap);
    }
    draw_ground(buf, vp, scenery_x);
    let wing_up = session.is_over() || frame % 8 < 4;
    draw_bird(buf, vp, &session.bird, wing_up);

    let size = vp.text_size(36.0);
    draw_number(
        buf,
        vp.x(SCREEN_WIDTH / 2.0),
        vp.y(SCREEN_HEIGHT * 0.12),
        session.score,
        size,
        WHITE,
        Some(SHADOW),
    );
    if session.banner_visible() {
        draw_text(
            buf,
            vp.x(SCREEN_WIDTH / 2.0),
            vp.y(SCREEN_HEIGHT * 0.2),
            "NEW BEST!",
            vp.text_size(20.0),
            BANNER,
            Some(SHADOW),
        );
    }
}

fn draw_backdrop(buf: &mut PixelBuf, vp: &Viewport, scenery_x: f64) {
    draw_sky(buf, vp);
    draw_hills(buf, vp, scenery_x);
    draw_ground(buf, vp, scenery_x);
}

fn draw_menu(buf: &mut PixelBuf, vp: &Viewport, selected: usize) {
    let cx = vp.x(SCREEN_WIDTH / 2.0);
    let size = vp.text_size(20.0);
    draw_text(buf, cx, vp.y(60.0), "DIFFICULTY", size, WHITE, Some(SHADOW));

    for (i, d) in Difficulty::ALL.iter().enumerate() {
        let y = vp.y(150.0 + i as f64 * 50.0);
        let (label, color) = if i == selected {
            (format!("> {}", d.name()), BIRD_BODY)
        } else {
            (d.name().to_string(), GREY)
        };
        draw_text(buf, cx, y, &label, size, color, Some(SHADOW));
    }
    draw_text(
        buf,
        cx,
        vp.y(GROUND_Y - 40.0),
        "ENTER",
        vp.text_size(14.0),
        WHITE,
        Some(SHADOW),
    );
}

fn draw_welcome<R: Rng>(game: &Game<R>, buf: &mut PixelBuf, vp: &Viewport) {
    draw_backdrop(buf, vp, game.scenery_x);

    let cx = vp.x(SCREEN_WIDTH / 2.0);
    draw_number(
        buf,
        cx,
        vp.y(SCREEN_HEIGHT * 0.03),
        game.high_score,
        vp.text_size(30.0),
        WHITE,
        Some(SHADOW),
    );
    draw_text(
        buf,
        cx,
        vp.y(SCREEN_HEIGHT * 0.13),
        "FLAPPY",
        vp.text_size(40.0),
        BIRD_BODY,
        Some(SHADOW),
    );
    draw_text(
        buf,
        cx,
        vp.y(SCREEN_HEIGHT * 0.13 + 56.0),
        "SPACE TO FLAP",
        vp.text_size(14.0),
        WHITE,
        Some(SHADOW),
    );

    let bob = (game.frame as f64 * 0.25).sin() * 8.0;
    let bird = Bird {
        y: BIRD_START_Y + bob,
        vy: 0.0,
        ..Bird::default()
    };
    draw_bird(buf, vp, &bird, game.frame % 8 < 4);

    draw_text(
        buf,
        cx,
        vp.y(SCREEN_HEIGHT - 30.0),
        game.difficulty.name(),
        vp.text_size(14.0),
        WHITE,
        Some(SHADOW),
    );
}

fn draw_sky(buf: &mut PixelBuf, vp: &Viewport) {
    let top = vp.y(0.0);
    let bottom = vp.y(GROUND_Y);
    let span = (bottom - top).max(1);
    for y in top..bottom {
        let t = ((y - top) * 256 / span) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for x in vp.x(0.0)..vp.x(SCREEN_WIDTH) {
            buf.set(x, y, c);
        }
    }
}

fn draw_hills(buf: &mut PixelBuf, vp: &Viewport, scenery_x: f64) {
    let base = vp.y(GROUND_Y);
    let left = vp.x(0.0);
    let right = vp.x(SCREEN_WIDTH);
    let to_world = 1.0 / vp.scale.max(1e-6);
    // Far hills
    for x in left..right {
        let fx = ((x - left) as f64 * to_world + scenery_x * 0.2) * 0.02;
        let h = (fx.sin() * 12.0 + (fx * 1.7).sin() * 6.0 + 30.0) * vp.scale;
        for y in (base - h as i32)..base {
            buf.set(x, y, HILL_FAR);
        }
    }
    // Near hills
    for x in left..right {
        let fx = ((x - left) as f64 * to_world + scenery_x * 0.4) * 0.03;
        let h = (fx.sin() * 8.0 + (fx * 2.3).sin() * 4.0 + 16.0) * vp.scale;
        for y in (base - h as i32)..base {
            buf.set(x, y, HILL_NEAR);
        }
    }
}

fn draw_ground(buf: &mut PixelBuf, vp: &Viewport, scenery_x: f64) {
    let gy = vp.y(GROUND_Y);
    let shift = (scenery_x * vp.scale) as i32;
    let left = vp.x(0.0);
    // Grass strip
    for x in left..vp.x(SCREEN_WIDTH) {
        let alt = ((x - left + shift) / 3) % 2 == 0;
        buf.set(x, gy, if alt { GRASS } else { GRASS_LIGHT });
        buf.set(x, gy + 1, GRASS);
    }
    // Dirt
    for y in (gy + 2)..vp.y(SCREEN_HEIGHT) {
        for x in left..vp.x(SCREEN_WIDTH) {
            let stripe = (x - left + shift + (y - gy) * 2).rem_euclid(12) < 6;
            buf.set(x, y, if stripe { DIRT } else { DIRT_DARK });
        }
    }
}

fn draw_pipe_pair(buf: &mut PixelBuf, vp: &Viewport, pair: &PipePair, gap: f64) {
    let upper_bottom = pair.upper_bottom(gap);
    let lower_top = pair.lower_top(gap);

    // Upper pipe: body hangs from its sprite top, cap sits on the gap.
    draw_pipe_body(buf, vp, pair.x, pair.upper_top(gap), PIPE_HEIGHT - CAP_H);
    draw_pipe_cap(buf, vp, pair.x, upper_bottom - CAP_H);

    draw_pipe_cap(buf, vp, pair.x, lower_top);
    draw_pipe_body(buf, vp, pair.x, lower_top + CAP_H, PIPE_HEIGHT - CAP_H);
}

fn draw_pipe_body(buf: &mut PixelBuf, vp: &Viewport, x: f64, y: f64, h: f64) {
    let (px, py, pw, ph) = vp.rect(x, y, PIPE_WIDTH, h);
    for dx in 0..pw {
        let c = pipe_shade(dx, pw);
        for dy in 0..ph {
            buf.set(px + dx, py + dy, c);
        }
    }
}

fn draw_pipe_cap(buf: &mut PixelBuf, vp: &Viewport, x: f64, y: f64) {
    let (px, py, pw, ph) = vp.rect(x - CAP_EXTRA, y, PIPE_WIDTH + CAP_EXTRA * 2.0, CAP_H);
    for dx in 0..pw {
        let c = pipe_shade(dx, pw);
        for dy in 0..ph {
            buf.set(px + dx, py + dy, c);
        }
        // Cap edge darkening
        buf.set(px + dx, py, CAP_DARK);
        buf.set(px + dx, py + ph - 1, CAP_DARK);
    }
}

fn draw_bird(buf: &mut PixelBuf, vp: &Viewport, bird: &Bird, wing_up: bool) {
    let (bx, by) = (bird.x, bird.y);
    // Nose up while climbing, down while diving.
    let tilt = (bird.vy / 6.0).clamp(-1.0, 1.0) as i32;

    // Body
    vp.fill(buf, bx + 2.0, by + 2.0, BIRD_WIDTH - 8.0, BIRD_HEIGHT - 4.0, BIRD_BODY);
    vp.fill(buf, bx + 4.0, by + 2.0, BIRD_WIDTH - 14.0, 4.0, BIRD_HI);

    // Wing
    let wing_y = if wing_up { by + 7.0 } else { by + 12.0 };
    let (wx, wy, ww, wh) = vp.rect(bx + 3.0, wing_y, 12.0, 6.0);
    buf.fill_rect(wx, wy + tilt, ww, wh, BIRD_WING);

    // Eye
    vp.fill(buf, bx + 18.0, by + 3.0, 8.0, 8.0, BIRD_EYE);
    vp.fill(buf, bx + 22.0, by + 6.0, 3.0, 3.0, BIRD_PUPIL);

    // Beak
    let (kx, ky, kw, kh) = vp.rect(bx + 24.0, by + 12.0, 10.0, 4.0);
    buf.fill_rect(kx, ky + tilt, kw, kh, BIRD_BEAK_HI);
    let (kx, ky, kw, kh) = vp.rect(bx + 24.0, by + 16.0, 10.0, 4.0);
    buf.fill_rect(kx, ky + tilt, kw, kh, BIRD_BEAK);

    // Tail
    vp.fill(buf, bx, by + 8.0, 3.0, 8.0, BIRD_WING);
}

fn draw_game_over(buf: &mut PixelBuf, vp: &Viewport, score: u32, best: u32) {
    buf.dim();

    let cx = vp.x(SCREEN_WIDTH / 2.0);
    let (px, py, pw, ph) = vp.rect(44.0, 150.0, SCREEN_WIDTH - 88.0, 170.0);
    buf.fill_rect(px - 1, py - 1, pw + 2, ph + 2, SHADOW);
    buf.fill_rect(px, py, pw, ph, DIRT);
    buf.fill_rect(px + 1, py + 1, pw - 2, ph - 2, PANEL);

    let size = vp.text_size(20.0);
    draw_text(buf, cx, vp.y(165.0), "GAME OVER", size, BANNER, Some(SHADOW));
    draw_text(buf, cx, vp.y(205.0), "SCORE", size, WHITE, Some(SHADOW));
    draw_number(buf, cx, vp.y(230.0), score, size, WHITE, Some(SHADOW));
    draw_text(buf, cx, vp.y(262.0), "BEST", size, BIRD_BODY, Some(SHADOW));
    draw_number(buf, cx, vp.y(287.0), best, size, BIRD_BODY, Some(SHADOW));
}

// Repaint everything outside the world rectangle.
fn draw_letterbox(buf: &mut PixelBuf, vp: &Viewport) {
    let (left, top) = (vp.x(0.0), vp.y(0.0));
    let (right, bottom) = (vp.x(SCREEN_WIDTH), vp.y(SCREEN_HEIGHT));
    for y in 0..buf.h as i32 {
        for x in 0..buf.w as i32 {
            if x < left || x >= right || y < top || y >= bottom {
                buf.set(x, y, LETTERBOX);
            }
        }
    }
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}
