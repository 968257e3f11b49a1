//! Text mask generation: a brightness raster of the word plus the coarse
//! per-letter bounds the background field is attracted to.

use tracing::{debug, warn};

use crate::error::{IntroError, Result};
use crate::font::{self, GLYPH_COLS, GLYPH_ROWS};
use crate::params::{CANVAS_HEIGHT, CANVAS_WIDTH, LETTER_SPACING, TEXT_SIZE, WORD};

/// Brightness strictly above this counts as text.
pub const INSIDE_THRESHOLD: u8 = 128;

/// What to draw and on how large a raster.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub word: String,
    pub text_size: f64,
    pub letter_spacing: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            word: WORD.to_string(),
            text_size: TEXT_SIZE,
            letter_spacing: LETTER_SPACING,
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        }
    }
}

impl TextLayout {
    pub fn pixel_width(&self) -> usize {
        self.width.max(0.0) as usize
    }

    pub fn pixel_height(&self) -> usize {
        self.height.max(0.0) as usize
    }
}

/// Backend that draws white text on black into a row-major brightness buffer.
///
/// Returning `None` means the backend is unavailable; the mask then answers
/// every query with [`MaskSample::Unavailable`].
pub trait MaskRasterizer {
    fn rasterize(&self, layout: &TextLayout) -> Option<Vec<u8>>;
}

/// Draws the word with the built-in block font, letter height pinned to the
/// text size and the block centered on the canvas.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockFontRasterizer;

impl MaskRasterizer for BlockFontRasterizer {
    fn rasterize(&self, layout: &TextLayout) -> Option<Vec<u8>> {
        let (w, h) = (layout.pixel_width(), layout.pixel_height());
        let mut pixels = vec![0u8; w * h];

        let cell = layout.text_size / GLYPH_ROWS as f64;
        let advance = cell * (GLYPH_COLS + 1) as f64;
        let letters = layout.word.chars().count();
        if letters == 0 {
            return Some(pixels);
        }
        let block_width = advance * letters as f64 - cell;
        let left = layout.width / 2.0 - block_width / 2.0;
        let top = layout.height / 2.0 - layout.text_size / 2.0;

        for (i, c) in layout.word.chars().enumerate() {
            let Some(rows) = font::glyph(c) else {
                continue;
            };
            let origin_x = left + i as f64 * advance;
            for row in 0..GLYPH_ROWS {
                for col in 0..GLYPH_COLS {
                    if !font::is_set(&rows, col, row) {
                        continue;
                    }
                    let x0 = origin_x + col as f64 * cell;
                    let y0 = top + row as f64 * cell;
                    fill_rect(&mut pixels, w, h, x0, y0, cell, cell);
                }
            }
        }
        Some(pixels)
    }
}

/// Always reports the backend as missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRasterizer;

impl MaskRasterizer for NoRasterizer {
    fn rasterize(&self, _layout: &TextLayout) -> Option<Vec<u8>> {
        None
    }
}

fn fill_rect(pixels: &mut [u8], w: usize, h: usize, x: f64, y: f64, rw: f64, rh: f64) {
    let x_start = x.max(0.0).floor() as usize;
    let y_start = y.max(0.0).floor() as usize;
    let x_end = ((x + rw).ceil().max(0.0) as usize).min(w);
    let y_end = ((y + rh).ceil().max(0.0) as usize).min(h);
    for row in y_start..y_end {
        pixels[row * w + x_start.min(x_end)..row * w + x_end].fill(255);
    }
}

/// Result of classifying a canvas point against the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskSample {
    Inside,
    Outside,
    /// No raster backend; consumers treat this as "no magnetic response".
    Unavailable,
}

/// Brightness grid of the rendered word, or the unavailable sentinel.
#[derive(Debug, Clone)]
pub struct TextMask {
    width: usize,
    height: usize,
    pixels: Option<Vec<u8>>,
}

impl TextMask {
    pub fn from_brightness(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(IntroError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels: Some(pixels),
        })
    }

    pub fn unavailable(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.pixels.is_some()
    }

    /// Bounds-checked lookup; coordinates are floored to the pixel grid.
    pub fn sample(&self, x: f64, y: f64) -> MaskSample {
        let Some(pixels) = &self.pixels else {
            return MaskSample::Unavailable;
        };
        if !(x >= 0.0 && y >= 0.0) {
            return MaskSample::Outside;
        }
        let (col, row) = (x.floor() as usize, y.floor() as usize);
        if col >= self.width || row >= self.height {
            return MaskSample::Outside;
        }
        if pixels[row * self.width + col] > INSIDE_THRESHOLD {
            MaskSample::Inside
        } else {
            MaskSample::Outside
        }
    }

    pub fn is_inside(&self, x: f64, y: f64) -> bool {
        self.sample(x, y) == MaskSample::Inside
    }

    /// Number of pixels classified as text.
    pub fn coverage(&self) -> usize {
        self.pixels
            .as_ref()
            .map(|p| p.iter().filter(|b| **b > INSIDE_THRESHOLD).count())
            .unwrap_or(0)
    }
}

/// Approximate per-letter attraction target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterBound {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub letter: char,
}

/// Fixed monospaced layout, not measured from glyph metrics.
pub fn letter_bounds(layout: &TextLayout) -> Vec<LetterBound> {
    let letters: Vec<char> = layout.word.chars().collect();
    let spacing = layout.letter_spacing;
    let start_x = layout.width / 2.0 - (letters.len() as f64 * spacing) / 2.0;
    letters
        .into_iter()
        .enumerate()
        .map(|(i, letter)| LetterBound {
            x: start_x + i as f64 * spacing + spacing / 2.0,
            y: layout.height / 2.0,
            w: spacing * 0.8,
            h: layout.text_size,
            letter,
        })
        .collect()
}

/// Mask and bounds from one generation pass.
#[derive(Debug, Clone)]
pub struct TextData {
    pub mask: TextMask,
    pub bounds: Vec<LetterBound>,
}

impl TextData {
    pub fn generate<R: MaskRasterizer + ?Sized>(rasterizer: &R, layout: &TextLayout) -> Self {
        let (w, h) = (layout.pixel_width(), layout.pixel_height());
        let mask = match rasterizer.rasterize(layout) {
            Some(pixels) => TextMask::from_brightness(w, h, pixels).unwrap_or_else(|err| {
                warn!(%err, "discarding text raster");
                TextMask::unavailable(w, h)
            }),
            None => {
                warn!("text raster backend unavailable, mask queries will not respond");
                TextMask::unavailable(w, h)
            }
        };
        let bounds = letter_bounds(layout);
        debug!(
            word = %layout.word,
            coverage = mask.coverage(),
            letters = bounds.len(),
            "generated text mask"
        );
        Self { mask, bounds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_follow_fixed_spacing() {
        let bounds = letter_bounds(&TextLayout::default());
        let letters: String = bounds.iter().map(|b| b.letter).collect();
        assert_eq!(letters, "ANDREW");
        // 1200/2 - 6*140/2 = 180, first center at 180 + 70.
        assert_eq!(bounds[0].x, 250.0);
        assert_eq!(bounds[5].x, 950.0);
        for b in &bounds {
            assert_eq!(b.y, 337.5);
            assert_eq!(b.w, 112.0);
            assert_eq!(b.h, 180.0);
        }
    }

    #[test]
    fn block_font_draws_centered_word() {
        let layout = TextLayout::default();
        let data = TextData::generate(&BlockFontRasterizer, &layout);
        assert!(data.mask.is_available());
        assert!(data.mask.coverage() > 0);
        // Canvas corners never hold text; the 'A' crossbar crosses y = 337.5.
        assert_eq!(data.mask.sample(5.0, 5.0), MaskSample::Outside);
        assert_eq!(data.mask.sample(1195.0, 670.0), MaskSample::Outside);
        let any_inside = (0..1200).any(|x| data.mask.is_inside(x as f64, 337.5));
        assert!(any_inside);
    }

    #[test]
    fn out_of_range_queries_are_outside() {
        let mask = TextMask::from_brightness(2, 2, vec![255; 4]).unwrap();
        assert_eq!(mask.sample(0.5, 1.9), MaskSample::Inside);
        assert_eq!(mask.sample(-0.1, 0.0), MaskSample::Outside);
        assert_eq!(mask.sample(2.0, 0.0), MaskSample::Outside);
        assert_eq!(mask.sample(0.0, 2.0), MaskSample::Outside);
        assert_eq!(mask.sample(f64::NAN, 0.0), MaskSample::Outside);
    }

    #[test]
    fn threshold_is_strict() {
        let mask = TextMask::from_brightness(2, 1, vec![128, 129]).unwrap();
        assert_eq!(mask.sample(0.0, 0.0), MaskSample::Outside);
        assert_eq!(mask.sample(1.0, 0.0), MaskSample::Inside);
    }

    #[test]
    fn missing_backend_yields_sentinel() {
        let data = TextData::generate(&NoRasterizer, &TextLayout::default());
        assert!(!data.mask.is_available());
        assert_eq!(data.mask.sample(600.0, 337.0), MaskSample::Unavailable);
        assert_eq!(data.bounds.len(), 6);
    }

    #[test]
    fn wrong_sized_buffer_is_rejected() {
        assert!(matches!(
            TextMask::from_brightness(3, 3, vec![0; 8]),
            Err(IntroError::BufferSize { expected: 9, actual: 8 })
        ));
    }
}
