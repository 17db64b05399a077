//! Vertex data for GPU drawing contexts.
//!
//! Every instruction becomes one quad of two triangles. Positions are in surface pixels; z is the
//! instruction depth divided by the configured depth range.

use crate::color::Color;
use crate::painter::{Instruction, Recording};
use crate::rect::Rect;
use cgmath::{Point2, Vector4};

/// Number of vertices emitted per instruction.
pub const VERTICES_PER_QUAD: usize = 6;

/// Layer index of vertices that sample neither the mask nor an image.
pub const NO_LAYER: f32 = -1.;

/// Layer index of vertices that sample the text mask.
pub const MASK_LAYER: f32 = -2.;

#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    /// Normalized texture coordinates into the mask (text) or an image.
    pub uv: [f32; 2],
    /// Image slot, or one of [`NO_LAYER`] and [`MASK_LAYER`].
    pub layer: f32,
}

struct Quad {
    rect: Rect,
    z: f32,
    color: Vector4<f32>,
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    layer: f32,
}

impl Quad {
    /// Emits top left, top right, bottom left, top right, bottom right, bottom left.
    fn emit(&self, out: &mut Vec<Vertex>) {
        let min: Point2<f32> = self.rect.origin.into();
        let max: Point2<f32> = self.rect.right_bottom().into();
        let color: [f32; 4] = self.color.into();
        let corners = [
            (min.x, min.y, self.uv_min[0], self.uv_min[1]),
            (max.x, min.y, self.uv_max[0], self.uv_min[1]),
            (min.x, max.y, self.uv_min[0], self.uv_max[1]),
            (max.x, min.y, self.uv_max[0], self.uv_min[1]),
            (max.x, max.y, self.uv_max[0], self.uv_max[1]),
            (min.x, max.y, self.uv_min[0], self.uv_max[1]),
        ];
        out.extend(corners.iter().map(|&(x, y, u, v)| Vertex {
            position: [x, y, self.z],
            color,
            uv: [u, v],
            layer: self.layer,
        }));
    }
}

fn normalized(rect: Rect, width: u32, height: u32) -> ([f32; 2], [f32; 2]) {
    let (width, height) = (width.max(1) as f32, height.max(1) as f32);
    let max = rect.right_bottom();
    (
        [rect.origin.x as f32 / width, rect.origin.y as f32 / height],
        [max.x as f32 / width, max.y as f32 / height],
    )
}

impl Recording {
    /// Converts all instructions to triangles, in recording order.
    pub fn vertices(&self) -> Vec<Vertex> {
        let range = self.config().depth_range.max(1) as f32;
        let side = self.mask().side();
        let mut out = Vec::with_capacity(self.instructions().len() * VERTICES_PER_QUAD);

        for instruction in self.instructions() {
            let z = instruction.depth() as f32 / range;
            let quad = match *instruction {
                Instruction::Rect { rect, color, .. } => Quad {
                    rect,
                    z,
                    color: color.to_vec4(),
                    uv_min: [0.; 2],
                    uv_max: [0.; 2],
                    layer: NO_LAYER,
                },
                Instruction::Text {
                    rect, color, mask, ..
                } => {
                    let (uv_min, uv_max) = normalized(mask, side, side);
                    Quad {
                        rect,
                        z,
                        color: color.to_vec4(),
                        uv_min,
                        uv_max,
                        layer: MASK_LAYER,
                    }
                }
                Instruction::Image {
                    rect,
                    layer,
                    source,
                    ..
                } => {
                    let (width, height) = self
                        .images()
                        .get(layer as usize)
                        .map_or((1, 1), |image| image.dimensions());
                    let (uv_min, uv_max) = normalized(source, width, height);
                    Quad {
                        rect,
                        z,
                        color: Color::WHITE.to_vec4(),
                        uv_min,
                        uv_max,
                        layer: layer as f32,
                    }
                }
            };
            quad.emit(&mut out);
        }

        out
    }
}

/// Views vertices as raw bytes for upload.
pub fn vertex_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::layer::Painter;
    use crate::rect::{Point, Size};
    use image::RgbaImage;

    #[test]
    fn rect_quad() {
        let mut recording = Recording::new(Size::new(10, 10), RenderConfig::default());
        let mut painter = recording.painter();
        painter.set_color(Color::WHITE);
        painter.draw_rect(Rect::new(1, 2, 3, 4));
        drop(painter);

        let vertices = recording.vertices();
        assert_eq!(vertices.len(), VERTICES_PER_QUAD);
        let positions: Vec<[f32; 3]> = vertices.iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![
                [1., 2., 0.],
                [4., 2., 0.],
                [1., 6., 0.],
                [4., 2., 0.],
                [4., 6., 0.],
                [1., 6., 0.],
            ]
        );
        assert!(vertices.iter().all(|v| v.layer == NO_LAYER));
        assert!(vertices.iter().all(|v| v.color == [1.; 4]));
        assert_eq!(vertex_bytes(&vertices).len(), 6 * std::mem::size_of::<Vertex>());
    }

    #[test]
    fn depth_is_scaled() {
        let config = RenderConfig::default().with_depth_range(4);
        let mut recording = Recording::new(Size::new(10, 10), config);
        let mut painter = recording.painter();
        painter.draw_rect(Rect::new(0, 0, 1, 1));
        drop(painter);
        assert_eq!(recording.vertices()[0].position[2], 0.);

        struct Nested;
        impl crate::layer::Layer for Nested {
            fn draw(&self, painter: &mut dyn Painter) {
                painter.draw_rect(Rect::new(0, 0, 1, 1));
            }
            fn propagate_draw(&mut self, _: &mut dyn Painter) {}
            fn needs_redraw(&self) -> bool {
                true
            }
        }
        let mut recording = Recording::new(Size::new(10, 10), config);
        recording
            .painter()
            .draw_layer(Rect::new(0, 0, 5, 5), &mut Nested);
        assert_eq!(recording.vertices()[0].position[2], 0.25);
    }

    #[test]
    fn text_and_image_uvs() {
        let mut recording = Recording::new(Size::new(64, 64), RenderConfig::default());
        let mut painter = recording.painter();
        painter.set_font(std::sync::Arc::new(crate::font::BlockFont));
        painter.set_font_size(16);
        painter.draw_text(Point::zero(), "ab");
        painter.draw_image(Rect::new(0, 0, 8, 8), &RgbaImage::new(4, 4));
        drop(painter);

        let vertices = recording.vertices();
        assert_eq!(vertices.len(), 2 * VERTICES_PER_QUAD);

        // text: a 16x16 region of the 64x64 mask
        assert_eq!(vertices[4].uv, [0.25, 0.25]);
        assert_eq!(vertices[4].layer, MASK_LAYER);

        // image: the whole image in slot 0
        assert_eq!(vertices[10].uv, [1., 1.]);
        assert_eq!(vertices[10].layer, 0.);
        assert_eq!(vertices[10].color, [1.; 4]);
    }
}
