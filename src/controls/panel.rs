use crate::color::Color;
use crate::layer::Painter;
use crate::layout::{with_cached, FlexRow, LayoutStrategy, NoneLayout};
use crate::rect::{Point, Rect};
use crate::view::{ViewBase, Widget};

/// A container that lays out its children with a [`LayoutStrategy`] and optionally fills its
/// background.
#[derive(Debug)]
pub struct Panel {
    background: Option<Color>,
    strategy: Box<dyn LayoutStrategy>,
    changed: bool,
}

impl Panel {
    /// A panel that leaves its children where they are.
    pub fn new() -> Panel {
        Panel::with_strategy(NoneLayout)
    }

    /// A panel that lays its children out in a row.
    pub fn row() -> Panel {
        Panel::with_strategy(FlexRow)
    }

    pub fn with_strategy(strategy: impl LayoutStrategy + 'static) -> Panel {
        Panel {
            background: None,
            strategy: Box::new(strategy),
            changed: false,
        }
    }

    pub fn with_background(mut self, color: Color) -> Panel {
        self.set_background(Some(color));
        self
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn set_background(&mut self, color: Option<Color>) {
        if self.background != color {
            self.background = color;
            self.changed = true;
        }
    }
}

impl Default for Panel {
    fn default() -> Self {
        Panel::new()
    }
}

impl Widget for Panel {
    fn update(&mut self, view: &mut ViewBase) {
        if std::mem::take(&mut self.changed) {
            view.set_needs_redraw();
        }
    }

    fn update_sizes(&mut self, view: &mut ViewBase) {
        let settings = view.layout_settings();
        let strategy = &self.strategy;
        let size = with_cached(view.children_mut(), |children| {
            strategy.preferred_size(&settings, children)
        });
        view.set_pref_size(size);
    }

    fn layout(&mut self, view: &mut ViewBase) {
        let settings = view.layout_settings();
        let bounds = view.bounds();
        let strategy = &self.strategy;
        with_cached(view.children_mut(), |children| {
            strategy.layout(&settings, bounds, children)
        });
    }

    fn height_for_width(&mut self, view: &mut ViewBase, width: u32) -> u32 {
        let settings = view.layout_settings();
        let borders = view.borders();
        let inner = width.saturating_sub(borders.horizontal());
        let strategy = &self.strategy;
        let height = with_cached(view.children_mut(), |children| {
            strategy.height_for_width(&settings, inner, children)
        });
        height.saturating_add(borders.vertical())
    }

    fn draw(&self, view: &ViewBase, painter: &mut dyn Painter) {
        if let Some(color) = self.background {
            painter.set_color(color);
            painter.draw_rect(Rect::from_parts(Point::zero(), view.frame().size));
        }
    }

    crate::impl_widget_any!();
}
