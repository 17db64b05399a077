//! Recording painters.
//!
//! A [`Recording`] collects the draw instructions of one frame. Painters are handed out per layer,
//! each scoped to the layer's region in absolute surface coordinates; a layer drawn inside another
//! gets a depth one greater than its parent.

use crate::color::Color;
use crate::config::RenderConfig;
use crate::font::Font;
use crate::layer::{Layer, Painter};
use crate::mask::{Mask, MaskCursor};
use crate::rect::{Point, Rect, Size};
use image::RgbaImage;
use std::sync::Arc;

/// A single recorded draw operation, in absolute surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// A solid rectangle.
    Rect { rect: Rect, depth: u32, color: Color },

    /// Text, tinted with `color` and shaped by the coverage in `mask`'s region of the mask.
    Text {
        rect: Rect,
        depth: u32,
        color: Color,
        mask: Rect,
    },

    /// A region of the recording's image at `layer`, scaled into `rect`.
    Image {
        rect: Rect,
        depth: u32,
        layer: u32,
        source: Rect,
    },
}

impl Instruction {
    pub fn rect(&self) -> Rect {
        match self {
            Instruction::Rect { rect, .. }
            | Instruction::Text { rect, .. }
            | Instruction::Image { rect, .. } => *rect,
        }
    }

    pub fn depth(&self) -> u32 {
        match self {
            Instruction::Rect { depth, .. }
            | Instruction::Text { depth, .. }
            | Instruction::Image { depth, .. } => *depth,
        }
    }
}

/// How far a recording had progressed; used to drop a clean subtree's output.
#[derive(Debug, Clone, Copy)]
struct Mark {
    instructions: usize,
    images: usize,
    mask: MaskCursor,
}

/// Everything recorded for one frame of one surface.
#[derive(Debug)]
pub struct Recording {
    size: Size,
    config: RenderConfig,
    instructions: Vec<Instruction>,
    mask: Mask,
    images: Vec<RgbaImage>,
}

impl Recording {
    pub fn new(size: Size, config: RenderConfig) -> Recording {
        Recording {
            size,
            config,
            instructions: Vec::new(),
            mask: Mask::new(config.mask_side(size.width, size.height)),
            images: Vec::new(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// A painter covering the whole surface.
    pub fn painter(&mut self) -> ScopedPainter<'_> {
        let size = self.size;
        ScopedPainter {
            recording: self,
            origin: Point::zero(),
            size,
            depth: 0,
            color: Color::BLACK,
            font: None,
            font_size: 0,
            dirty: false,
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Returns true if nothing was recorded, i.e. there is nothing to present.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Images referenced by [`Instruction::Image`], indexed by `layer`.
    pub fn images(&self) -> &[RgbaImage] {
        &self.images
    }

    fn mark(&self) -> Mark {
        Mark {
            instructions: self.instructions.len(),
            images: self.images.len(),
            mask: self.mask.cursor(),
        }
    }

    fn rollback(&mut self, mark: Mark) {
        self.instructions.truncate(mark.instructions);
        self.images.truncate(mark.images);
        self.mask.restore(mark.mask);
    }
}

/// Clamps `rect` so that it lies within a region of the given size.
///
/// The origin is clamped first, then the extent is limited to what remains.
pub fn normalize_coords(rect: Rect, bounds: Size) -> Rect {
    let x = rect.origin.x.min(bounds.width);
    let y = rect.origin.y.min(bounds.height);
    Rect::new(
        x,
        y,
        rect.size.width.min(bounds.width - x),
        rect.size.height.min(bounds.height - y),
    )
}

/// A painter bound to one region of a [`Recording`].
///
/// Paint state (color, font, font size) starts out as the parent scope's and is local to the
/// scope afterwards.
pub struct ScopedPainter<'a> {
    recording: &'a mut Recording,
    origin: Point,
    size: Size,
    depth: u32,
    color: Color,
    font: Option<Arc<dyn Font>>,
    font_size: u32,
    dirty: bool,
}

impl<'a> ScopedPainter<'a> {
    /// Absolute position of this painter's region.
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    fn push(&mut self, instruction: Instruction) {
        self.recording.instructions.push(instruction);
    }
}

impl<'a> Painter for ScopedPainter<'a> {
    fn size(&self) -> Size {
        self.size
    }

    fn draw_layer(&mut self, rect: Rect, layer: &mut dyn Layer) {
        let rect = normalize_coords(rect, self.size);
        let mark = self.recording.mark();

        let dirty = {
            let mut scope = ScopedPainter {
                recording: &mut *self.recording,
                origin: self.origin.offset(rect.origin),
                size: rect.size,
                depth: self.depth + 1,
                color: self.color,
                font: self.font.clone(),
                font_size: self.font_size,
                dirty: layer.needs_redraw(),
            };
            layer.draw(&mut scope);
            layer.propagate_draw(&mut scope);
            scope.dirty
        };

        if dirty {
            self.dirty = true;
        } else if self.depth == 0 {
            tracing::trace!(?rect, "discarding clean layer tree");
            self.recording.rollback(mark);
        }
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn set_font(&mut self, font: Arc<dyn Font>) {
        self.font = Some(font);
    }

    fn set_font_size(&mut self, size: u32) {
        self.font_size = size;
    }

    fn draw_rect(&mut self, rect: Rect) {
        let rect = normalize_coords(rect, self.size);
        if rect.size.is_empty() {
            return;
        }
        self.push(Instruction::Rect {
            rect: rect.offset(self.origin),
            depth: self.depth,
            color: self.color,
        });
    }

    fn draw_text(&mut self, origin: Point, text: &str) {
        let Some(font) = self.font.clone() else {
            return;
        };
        if text.is_empty() || self.font_size == 0 {
            return;
        }

        let size = font.string_size(self.font_size, text);
        let rect = normalize_coords(Rect::from_parts(origin, size), self.size);
        if rect.size.is_empty() {
            return;
        }

        let Some(slot) = self.recording.mask.allocate(size) else {
            tracing::warn!(?size, side = self.recording.mask.side(), "text mask is full");
            return;
        };
        font.draw_string(self.font_size, text, slot, &mut self.recording.mask);

        // the clamped rect keeps its origin, so only the extent of the mask region shrinks
        self.push(Instruction::Text {
            rect: rect.offset(self.origin),
            depth: self.depth,
            color: self.color,
            mask: Rect::from_parts(slot, rect.size),
        });
    }

    fn draw_image(&mut self, rect: Rect, image: &RgbaImage) {
        let clamped = normalize_coords(rect, self.size);
        if clamped.size.is_empty() || image.width() == 0 || image.height() == 0 {
            return;
        }

        let scale = |part: u32, whole: u32, pixels: u32| {
            (u64::from(part) * u64::from(pixels) / u64::from(whole)) as u32
        };
        let source = Rect::new(
            0,
            0,
            scale(clamped.size.width, rect.size.width, image.width()),
            scale(clamped.size.height, rect.size.height, image.height()),
        );

        let layer = self.recording.images.len() as u32;
        self.recording.images.push(image.clone());
        self.push(Instruction::Image {
            rect: clamped.offset(self.origin),
            depth: self.depth,
            layer,
            source,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BlockFont;
    use image::Rgba;
    use pretty_assertions::assert_eq;

    /// A layer that runs a closure and optionally has children.
    struct Stub<F: Fn(&mut dyn Painter)> {
        paint: F,
        dirty: bool,
        children: Vec<(Rect, Stub<F>)>,
    }

    impl<F: Fn(&mut dyn Painter)> Layer for Stub<F> {
        fn draw(&self, painter: &mut dyn Painter) {
            (self.paint)(painter);
        }

        fn propagate_draw(&mut self, painter: &mut dyn Painter) {
            for (rect, child) in &mut self.children {
                painter.draw_layer(*rect, child);
            }
        }

        fn needs_redraw(&self) -> bool {
            self.dirty
        }
    }

    fn fill(painter: &mut dyn Painter) {
        painter.draw_rect(Rect::new(0, 0, 1000, 1000));
    }

    fn stub(dirty: bool) -> Stub<fn(&mut dyn Painter)> {
        Stub {
            paint: fill,
            dirty,
            children: Vec::new(),
        }
    }

    #[test]
    fn normalize_clamps_origin_then_extent() {
        let size = Size::new(20, 20);
        assert_eq!(
            normalize_coords(Rect::new(5, 5, 100, 100), size),
            Rect::new(5, 5, 15, 15)
        );
        assert_eq!(
            normalize_coords(Rect::new(30, 2, 5, 5), size),
            Rect::new(20, 2, 0, 5)
        );
    }

    #[test]
    fn layers_are_clamped_and_nested() {
        let mut recording = Recording::new(Size::new(20, 20), RenderConfig::default());
        let mut outer = stub(true);
        outer.children.push((Rect::new(2, 3, 100, 100), stub(false)));

        recording
            .painter()
            .draw_layer(Rect::new(5, 5, 100, 100), &mut outer);

        assert_eq!(
            recording.instructions(),
            &[
                Instruction::Rect {
                    rect: Rect::new(5, 5, 15, 15),
                    depth: 1,
                    color: Color::BLACK,
                },
                Instruction::Rect {
                    rect: Rect::new(7, 8, 13, 12),
                    depth: 2,
                    color: Color::BLACK,
                },
            ]
        );
    }

    #[test]
    fn clean_tree_records_nothing() {
        let mut recording = Recording::new(Size::new(20, 20), RenderConfig::default());
        let mut root = stub(false);
        root.children.push((Rect::new(0, 0, 5, 5), stub(false)));

        recording
            .painter()
            .draw_layer(Rect::new(0, 0, 20, 20), &mut root);
        assert!(recording.is_empty());
    }

    #[test]
    fn dirty_descendant_keeps_whole_tree() {
        let mut recording = Recording::new(Size::new(20, 20), RenderConfig::default());
        let mut middle = stub(false);
        middle.children.push((Rect::new(0, 0, 5, 5), stub(true)));
        let mut root = stub(false);
        root.children.push((Rect::new(0, 0, 10, 10), middle));

        recording
            .painter()
            .draw_layer(Rect::new(0, 0, 20, 20), &mut root);
        let depths: Vec<u32> = recording.instructions().iter().map(|i| i.depth()).collect();
        assert_eq!(depths, vec![1, 2, 3]);
    }

    #[test]
    fn paint_state_is_inherited_but_scoped() {
        fn parent(painter: &mut dyn Painter) {
            painter.set_color(Color::WHITE);
        }
        fn child(painter: &mut dyn Painter) {
            painter.draw_rect(Rect::new(0, 0, 1, 1));
            painter.set_color(Color::rgb(1, 2, 3));
        }
        fn sibling(painter: &mut dyn Painter) {
            painter.draw_rect(Rect::new(0, 0, 1, 1));
        }

        let mut root = Stub {
            paint: parent as fn(&mut dyn Painter),
            dirty: true,
            children: vec![],
        };
        for paint in [child as fn(&mut dyn Painter), sibling] {
            root.children.push((
                Rect::new(0, 0, 4, 4),
                Stub {
                    paint,
                    dirty: true,
                    children: vec![],
                },
            ));
        }

        let mut recording = Recording::new(Size::new(8, 8), RenderConfig::default());
        recording
            .painter()
            .draw_layer(Rect::new(0, 0, 8, 8), &mut root);
        let colors: Vec<Color> = recording
            .instructions()
            .iter()
            .map(|i| match i {
                Instruction::Rect { color, .. } => *color,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(colors, vec![Color::WHITE, Color::WHITE]);
    }

    #[test]
    fn text_is_rasterized_and_clipped() {
        let mut recording = Recording::new(Size::new(32, 32), RenderConfig::default());
        let mut painter = recording.painter();
        painter.set_font(Arc::new(BlockFont));
        painter.set_font_size(10);
        painter.set_color(Color::WHITE);
        painter.draw_text(Point::new(20, 2), "abc");
        drop(painter);

        assert_eq!(
            recording.instructions(),
            &[Instruction::Text {
                rect: Rect::new(20, 2, 12, 10),
                depth: 0,
                color: Color::WHITE,
                mask: Rect::new(0, 0, 12, 10),
            }]
        );
        assert_eq!(recording.mask().get(0, 0), 255);
        assert_eq!(recording.mask().get(14, 9), 255);
    }

    #[test]
    fn text_without_font_is_skipped() {
        let mut recording = Recording::new(Size::new(32, 32), RenderConfig::default());
        let mut painter = recording.painter();
        painter.set_font_size(10);
        painter.draw_text(Point::zero(), "abc");
        drop(painter);
        assert!(recording.is_empty());
    }

    #[test]
    fn full_mask_drops_text() {
        let config = RenderConfig::default().with_min_mask_side(0);
        let mut recording = Recording::new(Size::new(8, 8), config);
        let mut painter = recording.painter();
        painter.set_font(Arc::new(BlockFont));
        painter.set_font_size(8);
        painter.draw_text(Point::zero(), "ab");
        painter.draw_text(Point::zero(), "abc");
        drop(painter);
        assert_eq!(recording.instructions().len(), 1);
    }

    #[test]
    fn images_are_copied_and_clipped() {
        let image = RgbaImage::from_pixel(4, 2, Rgba([1, 2, 3, 4]));
        let mut recording = Recording::new(Size::new(10, 10), RenderConfig::default());
        recording
            .painter()
            .draw_image(Rect::new(6, 0, 8, 4), &image);

        assert_eq!(
            recording.instructions(),
            &[Instruction::Image {
                rect: Rect::new(6, 0, 4, 4),
                depth: 0,
                layer: 0,
                source: Rect::new(0, 0, 2, 2),
            }]
        );
        assert_eq!(recording.images().len(), 1);
        assert_eq!(recording.images()[0].get_pixel(3, 1), &Rgba([1, 2, 3, 4]));
    }
}
