use crate::color::Color;
use crate::font::Font;
use crate::layer::Painter;
use crate::rect::Size;
use crate::view::{ViewBase, Widget};
use std::sync::Arc;

/// A single line of text.
///
/// The label's preferred and minimum sizes are the measured size of its text.
#[derive(Debug)]
pub struct Label {
    text: String,
    font: Option<Arc<dyn Font>>,
    font_size: u32,
    color: Color,
    changed: bool,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Label {
        Label {
            text: text.into(),
            font: None,
            font_size: 12,
            color: Color::BLACK,
            changed: true,
        }
    }

    pub fn with_font(mut self, font: Arc<dyn Font>) -> Label {
        self.set_font(font);
        self
    }

    pub fn with_font_size(mut self, size: u32) -> Label {
        self.set_font_size(size);
        self
    }

    pub fn with_color(mut self, color: Color) -> Label {
        self.set_color(color);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.text != text {
            self.text = text;
            self.changed = true;
        }
    }

    pub fn set_font(&mut self, font: Arc<dyn Font>) {
        self.font = Some(font);
        self.changed = true;
    }

    pub fn set_font_size(&mut self, size: u32) {
        if self.font_size != size {
            self.font_size = size;
            self.changed = true;
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        if self.color != color {
            self.color = color;
            self.changed = true;
        }
    }

    fn measure(&self) -> Size {
        match &self.font {
            Some(font) if !self.text.is_empty() => font.string_size(self.font_size, &self.text),
            _ => Size::zero(),
        }
    }
}

impl Widget for Label {
    fn update(&mut self, view: &mut ViewBase) {
        if std::mem::take(&mut self.changed) {
            view.set_needs_redraw();
            self.update_sizes(view);
        }
    }

    fn update_sizes(&mut self, view: &mut ViewBase) {
        let size = self.measure();
        view.set_min_size(size);
        view.set_pref_size(size);
    }

    fn draw(&self, view: &ViewBase, painter: &mut dyn Painter) {
        let Some(font) = &self.font else {
            return;
        };
        painter.set_font(Arc::clone(font));
        painter.set_font_size(self.font_size);
        painter.set_color(self.color);
        painter.draw_text(view.bounds().origin, &self.text);
    }

    crate::impl_widget_any!();
}
