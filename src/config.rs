//! Rendering configuration.

use crate::color::Color;

/// Settings shared by recordings, drawing contexts and the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Color the framebuffer is cleared to before a presented frame.
    pub clear_color: Color,

    /// Depth values are divided by this when emitting vertex z, so nesting deeper than this
    /// many layers no longer separates in depth.
    pub depth_range: u32,

    /// Smallest side of the square coverage mask text is rasterized into.
    ///
    /// The mask grows to the next power of two covering the surface.
    pub min_mask_side: u32,

    /// Largest side of the coverage mask, rounded down to a power of two. Text that does not fit
    /// is dropped.
    pub max_mask_side: u32,

    /// Whether windows record their frames on parallel threads.
    pub parallel_recording: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            clear_color: Color::BLACK,
            depth_range: 256,
            min_mask_side: 64,
            max_mask_side: 4096,
            parallel_recording: true,
        }
    }
}

impl RenderConfig {
    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_depth_range(mut self, range: u32) -> Self {
        self.depth_range = range.max(1);
        self
    }

    pub fn with_min_mask_side(mut self, side: u32) -> Self {
        self.min_mask_side = side;
        self
    }

    pub fn with_max_mask_side(mut self, side: u32) -> Self {
        self.max_mask_side = side;
        self
    }

    pub fn with_parallel_recording(mut self, parallel: bool) -> Self {
        self.parallel_recording = parallel;
        self
    }

    /// Side of the square coverage mask for a surface of the given size.
    pub fn mask_side(&self, width: u32, height: u32) -> u32 {
        let max = self.max_mask_side.max(1);
        let max = 1 << (u32::BITS - 1 - max.leading_zeros());
        width
            .max(height)
            .max(self.min_mask_side)
            .max(1)
            .checked_next_power_of_two()
            .map_or(max, |side| side.min(max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_side_is_power_of_two() {
        let config = RenderConfig::default();
        assert_eq!(config.mask_side(0, 0), 64);
        assert_eq!(config.mask_side(100, 30), 128);
        assert_eq!(config.mask_side(128, 128), 128);
        assert_eq!(config.with_min_mask_side(0).mask_side(3, 1), 4);
    }

    #[test]
    fn mask_side_is_capped() {
        let config = RenderConfig::default();
        assert_eq!(config.mask_side(1920, 1080), 2048);
        assert_eq!(config.mask_side(100_000, 10), 4096);
        assert_eq!(config.mask_side(u32::MAX, u32::MAX), 4096);
        assert_eq!(config.with_max_mask_side(100).mask_side(1000, 10), 64);
        assert_eq!(config.with_max_mask_side(0).mask_side(1000, 10), 1);
    }
}
