// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Watermark text rendering with the built-in 8x8 bitmap font.
//
// Text metrics come from the glyph bitmaps themselves: the bounding box is the
// smallest rectangle enclosing every lit pixel, so narrow glyphs like `I` and
// wide ones like `W` are placed correctly.

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};
use tracing::{debug, warn};

/// Side length of one glyph cell in font pixels.
pub const GLYPH_CELL: u32 = 8;
/// Each font pixel is drawn as a `GLYPH_SCALE` x `GLYPH_SCALE` block.
pub const GLYPH_SCALE: u32 = 2;
/// Gap between the text's bounding box and the image's bottom-right corner.
pub const MARGIN: u32 = 10;
/// Foreground colour of the stamped text.
pub const INK: Rgb<u8> = Rgb([255, 255, 255]);

/// Ink bounding box of rendered text, relative to the text origin.
///
/// `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBounds {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl TextBounds {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Measure the ink bounding box of `text`. Returns `None` when nothing would
/// be drawn (empty or whitespace-only text).
pub fn measure_text(text: &str) -> Option<TextBounds> {
    let mut bounds: Option<TextBounds> = None;
    for (x, y) in lit_cells(text) {
        let (left, top) = (x * GLYPH_SCALE, y * GLYPH_SCALE);
        let (right, bottom) = (left + GLYPH_SCALE, top + GLYPH_SCALE);
        bounds = Some(match bounds {
            None => TextBounds {
                left,
                top,
                right,
                bottom,
            },
            Some(b) => TextBounds {
                left: b.left.min(left),
                top: b.top.min(top),
                right: b.right.max(right),
                bottom: b.bottom.max(bottom),
            },
        });
    }
    bounds
}

/// Draw `text` with its origin at (`origin_x`, `origin_y`). Pixels outside the
/// image are clipped.
pub fn draw_text(image: &mut RgbImage, text: &str, origin_x: i64, origin_y: i64) {
    let (width, height) = (image.width() as i64, image.height() as i64);
    for (cx, cy) in lit_cells(text) {
        for dy in 0..GLYPH_SCALE {
            for dx in 0..GLYPH_SCALE {
                let px = origin_x + (cx * GLYPH_SCALE + dx) as i64;
                let py = origin_y + (cy * GLYPH_SCALE + dy) as i64;
                if (0..width).contains(&px) && (0..height).contains(&py) {
                    image.put_pixel(px as u32, py as u32, INK);
                }
            }
        }
    }
}

/// Stamp `text` so its bounding box ends [`MARGIN`] pixels from the right and
/// bottom edges. Returns the origin used, or `None` if the text has no ink.
pub fn stamp_bottom_right(image: &mut RgbImage, text: &str) -> Option<(i64, i64)> {
    let Some(bounds) = measure_text(text) else {
        debug!("Watermark text has no visible glyphs");
        return None;
    };

    let origin_x = image.width() as i64 - MARGIN as i64 - bounds.right as i64;
    let origin_y = image.height() as i64 - MARGIN as i64 - bounds.bottom as i64;
    debug!(
        text_width = bounds.width(),
        text_height = bounds.height(),
        origin_x,
        origin_y,
        "Placing watermark"
    );

    draw_text(image, text, origin_x, origin_y);
    Some((origin_x, origin_y))
}

/// Font-pixel coordinates of every lit cell in `text`, laid out left to right
/// on a fixed 8-pixel advance.
fn lit_cells(text: &str) -> impl Iterator<Item = (u32, u32)> + '_ {
    text.chars().enumerate().flat_map(|(index, ch)| {
        let bitmap = glyph(ch);
        let base_x = index as u32 * GLYPH_CELL;
        (0..GLYPH_CELL).flat_map(move |row| {
            let bits = bitmap[row as usize];
            (0..GLYPH_CELL)
                .filter(move |col| bits & (1u8 << *col) != 0)
                .map(move |col| (base_x + col, row))
        })
    })
}

/// Bitmap for `ch`; characters the font does not cover render as `?`.
fn glyph(ch: char) -> [u8; 8] {
    if let Some(bitmap) = BASIC_FONTS.get(ch).or_else(|| LATIN_FONTS.get(ch)) {
        return bitmap;
    }
    warn!(character = %ch, "No glyph for character, substituting '?'");
    BASIC_FONTS.get('?').unwrap_or([0; 8])
}
