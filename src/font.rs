//! Fonts: measuring and rasterizing single lines of text into a coverage mask.

use crate::error::{Error, Result};
use crate::mask::Mask;
use crate::rect::{Point, Size};
use core::fmt;
use fontdue::{FontSettings, LineMetrics, Metrics};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// A font face that can measure and rasterize text at any pixel size.
pub trait Font: fmt::Debug + Send + Sync {
    /// The size of the box `text` occupies at `size` pixels.
    fn string_size(&self, size: u32, text: &str) -> Size;

    /// Rasterizes `text` into `mask`, with the box's top left corner at `origin`.
    ///
    /// Must not write outside the box reported by [`Font::string_size`].
    fn draw_string(&self, size: u32, text: &str, origin: Point, mask: &mut Mask);
}

/// A rasterized glyph.
#[derive(Debug)]
struct Glyph {
    metrics: Metrics,
    bitmap: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GlyphCacheKey {
    ch: char,
    px: u32,
}

/// A TrueType/OpenType font rasterized with fontdue.
pub struct FontdueFont {
    font: fontdue::Font,
    glyphs: Mutex<HashMap<GlyphCacheKey, Arc<Glyph>>>,
}

impl FontdueFont {
    /// Loads a font from in-memory bytes.
    pub fn from_bytes(data: impl AsRef<[u8]>) -> Result<Self> {
        let font = fontdue::Font::from_bytes(data.as_ref(), FontSettings::default())
            .map_err(Error::FontLoad)?;
        Ok(FontdueFont {
            font,
            glyphs: Mutex::new(HashMap::new()),
        })
    }

    /// Loads a font from a reader.
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Self::from_bytes(buf)
    }

    /// Loads a font file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(std::fs::read(path)?)
    }

    fn line_metrics(&self, px: f32) -> LineMetrics {
        self.font.horizontal_line_metrics(px).unwrap_or(LineMetrics {
            ascent: px,
            descent: 0.,
            line_gap: 0.,
            new_line_size: px,
        })
    }

    fn glyph(&self, ch: char, size: u32) -> Arc<Glyph> {
        let key = GlyphCacheKey { ch, px: size };
        let mut glyphs = self.glyphs.lock();
        if let Some(glyph) = glyphs.get(&key) {
            return Arc::clone(glyph);
        }
        let (metrics, bitmap) = self.font.rasterize(ch, size as f32);
        let glyph = Arc::new(Glyph { metrics, bitmap });
        glyphs.insert(key, Arc::clone(&glyph));
        glyph
    }
}

impl Font for FontdueFont {
    fn string_size(&self, size: u32, text: &str) -> Size {
        let px = size as f32;
        let width: f32 = text
            .chars()
            .map(|ch| self.font.metrics(ch, px).advance_width)
            .sum();
        let line = self.line_metrics(px);
        let height = line.ascent - line.descent;
        Size::new(width.ceil().max(0.) as u32, height.ceil().max(0.) as u32)
    }

    fn draw_string(&self, size: u32, text: &str, origin: Point, mask: &mut Mask) {
        let bounds = self.string_size(size, text);
        let baseline = self.line_metrics(size as f32).ascent;

        let mut pen = 0f32;
        for ch in text.chars() {
            let glyph = self.glyph(ch, size);
            let metrics = &glyph.metrics;
            let left = (pen + metrics.xmin as f32).round() as i64;
            let top = (baseline - metrics.ymin as f32 - metrics.height as f32).round() as i64;

            for (i, coverage) in glyph.bitmap.iter().enumerate() {
                if *coverage == 0 {
                    continue;
                }
                let x = left + (i % metrics.width) as i64;
                let y = top + (i / metrics.width) as i64;
                if x < 0 || y < 0 || x >= bounds.width as i64 || y >= bounds.height as i64 {
                    continue;
                }
                mask.blend(origin.x + x as u32, origin.y + y as u32, *coverage);
            }
            pen += metrics.advance_width;
        }
    }
}

impl fmt::Debug for FontdueFont {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FontdueFont")
            .field("name", &self.font.name())
            .field("cached_glyphs", &self.glyphs.lock().len())
            .finish()
    }
}

/// A monospace font of solid blocks.
///
/// Every character occupies a cell half as wide as the font size and as tall as it; anything but
/// whitespace fills its cell completely. Needs no font file, which makes it handy for headless
/// rendering and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockFont;

impl BlockFont {
    fn cell(size: u32) -> Size {
        Size::new((size / 2).max(1), size)
    }
}

impl Font for BlockFont {
    fn string_size(&self, size: u32, text: &str) -> Size {
        let cell = Self::cell(size);
        let count = text.chars().count() as u32;
        Size::new(cell.width.saturating_mul(count), cell.height)
    }

    fn draw_string(&self, size: u32, text: &str, origin: Point, mask: &mut Mask) {
        let cell = Self::cell(size);
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let left = origin.x + i as u32 * cell.width;
            for y in origin.y..origin.y + cell.height {
                for x in left..left + cell.width {
                    mask.blend(x, y, 255);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_font_measures_cells() {
        assert_eq!(BlockFont.string_size(10, "abc"), Size::new(15, 10));
        assert_eq!(BlockFont.string_size(1, "ab"), Size::new(2, 1));
        assert_eq!(BlockFont.string_size(10, ""), Size::new(0, 10));
    }

    #[test]
    fn block_font_skips_whitespace() {
        let mut mask = Mask::new(16);
        BlockFont.draw_string(4, "a b", Point::new(1, 1), &mut mask);
        assert_eq!(mask.get(1, 1), 255);
        assert_eq!(mask.get(2, 4), 255);
        assert_eq!(mask.get(3, 1), 0);
        assert_eq!(mask.get(5, 1), 255);
        assert_eq!(mask.get(7, 1), 0);
        assert_eq!(mask.get(1, 5), 0);
    }

    fn mono() -> FontdueFont {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/DejaVuSansMono.ttf");
        FontdueFont::from_file(path).unwrap()
    }

    /// Covered pixels, relative to `origin`.
    fn coverage(mask: &Mask, origin: Point) -> Vec<(u32, u32)> {
        let mut covered = Vec::new();
        for y in 0..mask.side() {
            for x in 0..mask.side() {
                if mask.get(x, y) > 0 {
                    assert!(x >= origin.x && y >= origin.y, "ink at {x},{y} left of or above the box");
                    covered.push((x - origin.x, y - origin.y));
                }
            }
        }
        covered
    }

    #[test]
    fn fontdue_measures_monospace_text() {
        let font = mono();
        let one = font.string_size(20, "H");
        assert!(one.width > 0 && one.height >= 20);
        assert_eq!(font.string_size(20, "ab").width, font.string_size(20, "ij").width);
        assert_eq!(font.string_size(20, "ab").height, one.height);
        assert_eq!(font.string_size(20, "").width, 0);
    }

    #[test]
    fn fontdue_draws_inside_the_box_on_a_baseline() {
        let font = mono();
        let origin = Point::new(3, 5);
        let size = font.string_size(20, "H");

        let mut mask = Mask::new(64);
        font.draw_string(20, "H", origin, &mut mask);
        let capital = coverage(&mask, origin);
        assert!(!capital.is_empty());
        assert!(capital.iter().all(|&(x, y)| x < size.width && y < size.height));

        let mut mask = Mask::new(64);
        font.draw_string(20, "g", origin, &mut mask);
        let descender = coverage(&mask, origin);
        assert!(descender.iter().all(|&(x, y)| x < size.width && y < size.height));

        // capitals leave room above for the ascent and end on the baseline, descenders go below it
        let top = |pixels: &[(u32, u32)]| pixels.iter().map(|p| p.1).min().unwrap();
        let bottom = |pixels: &[(u32, u32)]| pixels.iter().map(|p| p.1).max().unwrap();
        assert!(top(&capital) > 0);
        assert!(bottom(&descender) > bottom(&capital));
    }

    #[test]
    fn fontdue_caches_glyphs_per_size() {
        let font = mono();
        let mut mask = Mask::new(64);
        font.draw_string(12, "HHH", Point::zero(), &mut mask);
        assert_eq!(font.glyphs.lock().len(), 1);
        font.draw_string(12, "Hi", Point::zero(), &mut mask);
        assert_eq!(font.glyphs.lock().len(), 2);
        font.draw_string(16, "H", Point::zero(), &mut mask);
        assert_eq!(font.glyphs.lock().len(), 3);
    }

    #[test]
    fn invalid_font_data_is_an_error() {
        let result = FontdueFont::from_bytes([0u8, 1, 2, 3]);
        assert!(matches!(result, Err(Error::FontLoad(_))));
    }

    #[test]
    fn missing_font_file_is_an_error() {
        let result = FontdueFont::from_file("/nonexistent/font.ttf");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
