//! The drawing protocol between the view tree and drawing contexts.

use crate::color::Color;
use crate::font::Font;
use crate::rect::{Point, Rect, Size};
use image::RgbaImage;
use std::sync::Arc;

/// Anything that can paint itself and its descendants.
pub trait Layer {
    /// Paints only this layer.
    fn draw(&self, painter: &mut dyn Painter);

    /// Paints the layer's descendants, each into its own sub-layer.
    fn propagate_draw(&mut self, painter: &mut dyn Painter);

    /// Whether anything in this layer changed since it was last drawn.
    fn needs_redraw(&self) -> bool;
}

/// A drawing capability bound to a rectangular region of the backing surface.
///
/// All coordinates are relative to the painter's own region. Requests that reach outside the
/// region are truncated to fit; nothing is ever drawn outside of it.
pub trait Painter {
    /// Size of the region this painter draws into.
    fn size(&self) -> Size;

    /// Draws `layer` into a sub-region of this painter.
    ///
    /// The sub-region is clamped to this painter's region. Instructions recorded by a subtree in
    /// which no layer needed redrawing are discarded.
    fn draw_layer(&mut self, rect: Rect, layer: &mut dyn Layer);

    /// Sets the fill color for subsequent rects and text.
    fn set_color(&mut self, color: Color);

    /// Sets the font for subsequent text.
    fn set_font(&mut self, font: Arc<dyn Font>);

    /// Sets the font size, in pixels, for subsequent text.
    fn set_font_size(&mut self, size: u32);

    /// Fills a rectangle with the current color.
    fn draw_rect(&mut self, rect: Rect);

    /// Draws a single line of text with its top left corner at `origin`.
    fn draw_text(&mut self, origin: Point, text: &str);

    /// Draws an image scaled into `rect`.
    ///
    /// The image is copied; the caller may reuse it as soon as this returns.
    fn draw_image(&mut self, rect: Rect, image: &RgbaImage);
}
