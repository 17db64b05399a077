//! Drawing contexts: where recordings end up.

use crate::color::Color;
use crate::config::RenderConfig;
use crate::error::Result;
use crate::painter::{Instruction, Recording};
use crate::rect::{Rect, Size};
use image::{Rgba, RgbaImage};

/// A drawing surface.
///
/// A frame is recorded into the [`Recording`] returned by `begin_paint` and handed back to
/// `end_paint`, which presents it.
pub trait DrawingContext {
    /// Starts a new frame for a surface of the given size.
    fn begin_paint(&mut self, size: Size) -> Recording;

    /// Presents a recorded frame.
    ///
    /// Returns whether anything was presented; an empty recording leaves the surface untouched.
    fn end_paint(&mut self, recording: Recording) -> Result<bool>;
}

impl<C: DrawingContext + ?Sized> DrawingContext for Box<C> {
    fn begin_paint(&mut self, size: Size) -> Recording {
        (**self).begin_paint(size)
    }

    fn end_paint(&mut self, recording: Recording) -> Result<bool> {
        (**self).end_paint(recording)
    }
}

/// Rasterizes recordings on the CPU into an RGBA framebuffer.
///
/// Instructions are composited back to front in order of depth; instructions with equal depth keep
/// their recording order.
#[derive(Debug)]
pub struct SoftwareContext {
    config: RenderConfig,
    framebuffer: RgbaImage,
    frames: u64,
}

impl SoftwareContext {
    pub fn new(config: RenderConfig) -> SoftwareContext {
        SoftwareContext {
            config,
            framebuffer: RgbaImage::new(0, 0),
            frames: 0,
        }
    }

    /// The last presented frame.
    pub fn framebuffer(&self) -> &RgbaImage {
        &self.framebuffer
    }

    /// Number of frames presented so far.
    pub fn presented_frames(&self) -> u64 {
        self.frames
    }

    fn clear(&mut self, size: Size) {
        let clear = Rgba(self.config.clear_color.to_array());
        if self.framebuffer.dimensions() != (size.width, size.height) {
            self.framebuffer = RgbaImage::from_pixel(size.width, size.height, clear);
        } else {
            self.framebuffer.pixels_mut().for_each(|pixel| *pixel = clear);
        }
    }

    fn fill(&mut self, rect: Rect, mut coverage: impl FnMut(u32, u32) -> Option<[u8; 4]>) {
        let (width, height) = self.framebuffer.dimensions();
        let end = rect.right_bottom();
        for y in rect.origin.y..end.y.min(height) {
            for x in rect.origin.x..end.x.min(width) {
                if let Some(src) = coverage(x - rect.origin.x, y - rect.origin.y) {
                    let dst = self.framebuffer.get_pixel_mut(x, y);
                    *dst = Rgba(blend(src, dst.0));
                }
            }
        }
    }
}

impl Default for SoftwareContext {
    fn default() -> Self {
        SoftwareContext::new(RenderConfig::default())
    }
}

/// Source-over compositing of straight alpha colors.
fn blend(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    let alpha = u32::from(src[3]);
    let mix = |s: u8, d: u8| ((u32::from(s) * alpha + u32::from(d) * (255 - alpha) + 127) / 255) as u8;
    [
        mix(src[0], dst[0]),
        mix(src[1], dst[1]),
        mix(src[2], dst[2]),
        (alpha + u32::from(dst[3]) * (255 - alpha) / 255) as u8,
    ]
}

fn with_alpha(color: Color, coverage: u8) -> [u8; 4] {
    let [r, g, b, a] = color.to_array();
    [r, g, b, (u32::from(a) * u32::from(coverage) / 255) as u8]
}

impl DrawingContext for SoftwareContext {
    fn begin_paint(&mut self, size: Size) -> Recording {
        Recording::new(size, self.config)
    }

    fn end_paint(&mut self, recording: Recording) -> Result<bool> {
        if recording.is_empty() {
            tracing::trace!("nothing to present");
            return Ok(false);
        }

        self.clear(recording.size());

        let mut order: Vec<&Instruction> = recording.instructions().iter().collect();
        order.sort_by_key(|instruction| instruction.depth());

        for instruction in order {
            match *instruction {
                Instruction::Rect { rect, color, .. } => {
                    let src = color.to_array();
                    self.fill(rect, |_, _| Some(src));
                }
                Instruction::Text {
                    rect, color, mask, ..
                } => {
                    let coverage = recording.mask();
                    self.fill(rect, |x, y| {
                        match coverage.get(mask.origin.x + x, mask.origin.y + y) {
                            0 => None,
                            c => Some(with_alpha(color, c)),
                        }
                    });
                }
                Instruction::Image {
                    rect,
                    layer,
                    source,
                    ..
                } => {
                    let Some(image) = recording.images().get(layer as usize) else {
                        tracing::warn!(layer, "image instruction without image");
                        continue;
                    };
                    self.fill(rect, |x, y| {
                        let sx = source.origin.x + x * source.size.width / rect.size.width;
                        let sy = source.origin.y + y * source.size.height / rect.size.height;
                        if sx < image.width() && sy < image.height() {
                            Some(image.get_pixel(sx, sy).0)
                        } else {
                            None
                        }
                    });
                }
            }
        }

        self.frames += 1;
        tracing::debug!(
            frame = self.frames,
            instructions = recording.instructions().len(),
            "presented"
        );
        Ok(true)
    }
}
