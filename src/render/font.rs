//! 3x5 bitmap font: digits and the capitals the menus use.

use super::pixels::{PixelBuf, Rgb};

const GLYPH_W: i32 = 3;
const GLYPH_H: i32 = 5;

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
fn letter(ch: char) -> Option<[u8; 15]> {
    let g = match ch {
        'A' => [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'B' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0],
        'C' => [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1],
        'D' => [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,1,0],
        'E' => [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1],
        'F' => [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,0,0],
        'G' => [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1],
        'H' => [1,0,1, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'I' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1],
        'K' => [1,0,1, 1,0,1, 1,1,0, 1,0,1, 1,0,1],
        'L' => [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1],
        'M' => [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1],
        'N' => [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,0,1],
        'O' => [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        'P' => [1,1,0, 1,0,1, 1,1,0, 1,0,0, 1,0,0],
        'Q' => [0,1,0, 1,0,1, 1,0,1, 1,1,0, 0,1,1],
        'R' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1],
        'S' => [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0],
        'T' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0],
        'U' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1],
        'V' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        'W' => [1,0,1, 1,0,1, 1,1,1, 1,1,1, 1,0,1],
        'Y' => [1,0,1, 1,0,1, 0,1,0, 0,1,0, 0,1,0],
        '!' => [0,1,0, 0,1,0, 0,1,0, 0,0,0, 0,1,0],
        '>' => [1,0,0, 0,1,0, 0,0,1, 0,1,0, 1,0,0],
        ':' => [0,0,0, 0,1,0, 0,0,0, 0,1,0, 0,0,0],
        _ => return None,
    };
    Some(g)
}

pub fn glyph(ch: char) -> Option<[u8; 15]> {
    match ch.to_digit(10) {
        Some(d) => Some(DIGITS[d as usize]),
        None => letter(ch.to_ascii_uppercase()),
    }
}

pub fn text_width(text: &str, size: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 {
        return 0;
    }
    (n * (GLYPH_W + 1) - 1) * size
}

fn draw_glyph(buf: &mut PixelBuf, x: i32, y: i32, g: &[u8; 15], size: i32, fg: Rgb, shadow: Option<Rgb>) {
    for row in 0..GLYPH_H {
        for col in 0..GLYPH_W {
            if g[(row * GLYPH_W + col) as usize] == 1 {
                let px = x + col * size;
                let py = y + row * size;
                if let Some(sh) = shadow {
                    buf.fill_rect(px + 1, py + 1, size, size, sh);
                }
                buf.fill_rect(px, py, size, size, fg);
            }
        }
    }
}

/// Draw `text` horizontally centred on `cx`. Unknown characters render as
/// blanks.
pub fn draw_text(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, size: i32, fg: Rgb, shadow: Option<Rgb>) {
    let size = size.max(1);
    let start_x = cx - text_width(text, size) / 2;
    for (i, ch) in text.chars().enumerate() {
        if let Some(g) = glyph(ch) {
            let x = start_x + i as i32 * (GLYPH_W + 1) * size;
            draw_glyph(buf, x, y, &g, size, fg, shadow);
        }
    }
}

pub fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, size: i32, fg: Rgb, shadow: Option<Rgb>) {
    draw_text(buf, cx, y, &n.to_string(), size, fg, shadow);
}
