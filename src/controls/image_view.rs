use crate::layer::Painter;
use crate::rect::Size;
use crate::view::{ViewBase, Widget};
use image::RgbaImage;

/// Shows an image scaled to the view's bounds. Prefers the image's pixel size.
#[derive(Debug, Default)]
pub struct ImageView {
    image: Option<RgbaImage>,
    changed: bool,
}

impl ImageView {
    pub fn new(image: RgbaImage) -> ImageView {
        ImageView {
            image: Some(image),
            changed: true,
        }
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    pub fn set_image(&mut self, image: Option<RgbaImage>) {
        self.image = image;
        self.changed = true;
    }
}

impl Widget for ImageView {
    fn update(&mut self, view: &mut ViewBase) {
        if std::mem::take(&mut self.changed) {
            view.set_needs_redraw();
            self.update_sizes(view);
        }
    }

    fn update_sizes(&mut self, view: &mut ViewBase) {
        let size = self
            .image
            .as_ref()
            .map_or(Size::zero(), |image| Size::new(image.width(), image.height()));
        view.set_pref_size(size);
    }

    fn draw(&self, view: &ViewBase, painter: &mut dyn Painter) {
        if let Some(image) = &self.image {
            painter.draw_image(view.bounds(), image);
        }
    }

    crate::impl_widget_any!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::painter::{Instruction, Recording};
    use crate::rect::Rect;
    use crate::view::View;

    #[test]
    fn prefers_image_size_and_draws_over_bounds() {
        let mut view = View::new(ImageView::new(RgbaImage::new(6, 3)));
        view.propagate_update();
        assert_eq!(view.pref_size(), Size::new(6, 3));

        view.set_frame(Rect::new(0, 0, 12, 6));
        view.propagate_layout();
        let mut recording = Recording::new(Size::new(12, 6), RenderConfig::default());
        recording
            .painter()
            .draw_layer(Rect::new(0, 0, 12, 6), &mut view);
        assert_eq!(
            recording.instructions(),
            &[Instruction::Image {
                rect: Rect::new(0, 0, 12, 6),
                depth: 1,
                layer: 0,
                source: Rect::new(0, 0, 6, 3),
            }]
        );
    }

    #[test]
    fn clearing_the_image_resizes() {
        let mut view = View::new(ImageView::new(RgbaImage::new(6, 3)));
        view.propagate_update();
        view.propagate_layout();

        view.widget_mut::<ImageView>().unwrap().set_image(None);
        view.propagate_update();
        assert_eq!(view.pref_size(), Size::zero());
        assert!(view.pref_size_changed());
    }
}
