use crate::layer::{Layer, Painter};
use crate::layout::{LayoutSettings, SubLayout};
use crate::rect::{EdgeInsets, Point, Rect, Size};
use core::any::Any;
use core::fmt;
use core::ops::{Deref, DerefMut};
use uuid::Uuid;

/// A unique identifier for a view.
///
/// (this is just a UUID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewId(Uuid);

impl ViewId {
    pub fn new() -> ViewId {
        ViewId(Uuid::new_v4())
    }
}

impl Default for ViewId {
    fn default() -> Self {
        ViewId::new()
    }
}

/// Implements the downcasting methods of [`Widget`].
///
/// Use inside an `impl Widget for T` block.
#[macro_export]
macro_rules! impl_widget_any {
    () => {
        fn as_any(&self) -> &dyn ::core::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
            self
        }
    };
}

/// The behavior of a view: what it draws and how it sizes and lays out its children.
///
/// Every hook receives the view's [`ViewBase`] so it can read and change geometry, flags and
/// children. All hooks have no-op defaults.
pub trait Widget: Any + fmt::Debug + Send {
    /// Called once per frame, before the view's children are updated.
    fn update(&mut self, _view: &mut ViewBase) {}

    /// Recomputes min/pref/max sizes.
    ///
    /// Called after children were updated, if this view needs layout or its own or any child's
    /// preferred size changed.
    fn update_sizes(&mut self, _view: &mut ViewBase) {}

    /// Assigns frames to children.
    fn layout(&mut self, _view: &mut ViewBase) {}

    /// The outer height this view wants at the given outer width.
    fn height_for_width(&mut self, view: &mut ViewBase, _width: u32) -> u32 {
        view.pref_size().height
    }

    /// Paints this view only; children are drawn separately.
    fn draw(&self, _view: &ViewBase, _painter: &mut dyn Painter) {}

    /// For downcasting.
    fn as_any(&self) -> &dyn Any;

    /// For downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A view that does absolutely nothing except hold children.
impl Widget for () {
    impl_widget_any!();
}

/// State shared by all views: identity, geometry, sizing, dirty flags and children.
#[derive(Debug)]
pub struct ViewBase {
    id: ViewId,
    frame: Rect,
    borders: EdgeInsets,
    children: Vec<View>,

    needs_layout: bool,
    needs_redraw: bool,
    pref_size_changed: bool,

    min_size: Size,
    pref_size: Size,
    max_size: Size,

    layout_settings: LayoutSettings,
}

impl ViewBase {
    fn new(id: ViewId) -> ViewBase {
        ViewBase {
            id,
            frame: Rect::zero(),
            borders: EdgeInsets::default(),
            children: Vec::new(),
            needs_layout: true,
            needs_redraw: true,
            pref_size_changed: false,
            min_size: Size::zero(),
            pref_size: Size::zero(),
            max_size: Size::zero(),
            layout_settings: LayoutSettings::default(),
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    /// The frame, in the parent's coordinate space.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn set_frame(&mut self, frame: Rect) {
        self.set_origin(frame.origin);
        self.set_size(frame.size);
    }

    pub fn set_origin(&mut self, origin: Point) {
        if self.frame.origin != origin {
            self.frame.origin = origin;
            self.needs_redraw = true;
        }
    }

    /// Resizes the view. Only an actual change marks the view for layout and redraw.
    pub fn set_size(&mut self, size: Size) {
        if self.frame.size != size {
            self.frame.size = size;
            self.needs_layout = true;
            self.needs_redraw = true;
        }
    }

    /// The content area, in the view's own coordinate space.
    pub fn bounds(&self) -> Rect {
        Rect::from_parts(Point::zero(), self.frame.size).inset(self.borders)
    }

    pub fn borders(&self) -> EdgeInsets {
        self.borders
    }

    pub fn set_borders(&mut self, borders: EdgeInsets) {
        if self.borders != borders {
            self.borders = borders;
            self.needs_layout = true;
            self.needs_redraw = true;
        }
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    pub fn pref_size(&self) -> Size {
        self.pref_size
    }

    pub fn max_size(&self) -> Size {
        self.max_size
    }

    /// Sets the minimum content size; stored grown by the borders.
    pub fn set_min_size(&mut self, size: Size) {
        let size = size.outset(self.borders);
        if self.min_size != size {
            self.min_size = size;
            self.pref_size_changed = true;
        }
    }

    /// Sets the preferred content size; stored grown by the borders.
    pub fn set_pref_size(&mut self, size: Size) {
        let size = size.outset(self.borders);
        if self.pref_size != size {
            self.pref_size = size;
            self.pref_size_changed = true;
        }
    }

    /// Sets the maximum content size; stored grown by the borders.
    pub fn set_max_size(&mut self, size: Size) {
        let size = size.outset(self.borders);
        if self.max_size != size {
            self.max_size = size;
            self.pref_size_changed = true;
        }
    }

    pub fn layout_settings(&self) -> LayoutSettings {
        self.layout_settings
    }

    pub fn set_layout_settings(&mut self, settings: LayoutSettings) {
        if self.layout_settings != settings {
            self.layout_settings = settings;
            self.needs_layout = true;
            self.pref_size_changed = true;
        }
    }

    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    pub fn set_needs_layout(&mut self) {
        self.needs_layout = true;
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn set_needs_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub fn pref_size_changed(&self) -> bool {
        self.pref_size_changed
    }

    pub fn children(&self) -> &[View] {
        &self.children
    }

    /// Mutable access to children. Use [`ViewBase::add_child`] and [`ViewBase::delete_child`] to
    /// change the set of children.
    pub fn children_mut(&mut self) -> &mut [View] {
        &mut self.children
    }

    /// Appends a child.
    ///
    /// Returns false and drops `child` if a child with the same id is already present.
    pub fn add_child(&mut self, child: View) -> bool {
        if self.children.iter().any(|c| c.id() == child.id()) {
            return false;
        }
        self.children.push(child);
        self.needs_layout = true;
        self.pref_size_changed = true;
        self.needs_redraw = true;
        true
    }

    /// Removes the direct child with the given id, if any.
    pub fn delete_child(&mut self, id: ViewId) -> Option<View> {
        let index = self.children.iter().position(|c| c.id() == id)?;
        let child = self.children.remove(index);
        self.needs_layout = true;
        self.pref_size_changed = true;
        self.needs_redraw = true;
        Some(child)
    }

    pub fn child(&self, id: ViewId) -> Option<&View> {
        self.children.iter().find(|c| c.id() == id)
    }

    pub fn child_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.children.iter_mut().find(|c| c.id() == id)
    }
}

/// A node in the view tree.
///
/// A view owns its children. Its shared state is reachable through `Deref` to [`ViewBase`].
#[derive(Debug)]
pub struct View {
    base: ViewBase,
    widget: Box<dyn Widget>,
}

impl View {
    /// Creates a new view with a fresh id.
    pub fn new(widget: impl Widget) -> View {
        View::with_id(ViewId::new(), widget)
    }

    pub fn with_id(id: ViewId, widget: impl Widget) -> View {
        View {
            base: ViewBase::new(id),
            widget: Box::new(widget),
        }
    }

    pub fn widget<W: Widget>(&self) -> Option<&W> {
        self.widget.as_any().downcast_ref()
    }

    pub fn widget_mut<W: Widget>(&mut self) -> Option<&mut W> {
        self.widget.as_any_mut().downcast_mut()
    }

    /// Finds a view anywhere in this subtree, including this view itself.
    pub fn find_mut(&mut self, id: ViewId) -> Option<&mut View> {
        if self.base.id == id {
            return Some(self);
        }
        self.base
            .children
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }

    /// Runs the update pass over this subtree.
    ///
    /// Children are updated before their parent recomputes its sizes, so a container always sees
    /// its children's final preferred sizes.
    pub fn propagate_update(&mut self) {
        self.widget.update(&mut self.base);

        let mut child_changed = false;
        for child in &mut self.base.children {
            child.propagate_update();
            child_changed |= child.base.pref_size_changed;
        }

        if self.base.needs_layout || self.base.pref_size_changed || child_changed {
            self.widget.update_sizes(&mut self.base);
        }
    }

    /// Runs the layout pass over this subtree.
    ///
    /// Clears `needs_layout` and `pref_size_changed` on every laid out view and lifts children's
    /// `needs_redraw` into their parent.
    pub fn propagate_layout(&mut self) {
        let child_changed = self.base.children.iter().any(|c| c.base.pref_size_changed);
        if self.base.needs_layout || self.base.pref_size_changed || child_changed {
            tracing::trace!(id = ?self.base.id, frame = ?self.base.frame, "layout");
            self.widget.layout(&mut self.base);
            self.base.needs_layout = false;
            self.base.pref_size_changed = false;
        }

        for child in &mut self.base.children {
            child.propagate_layout();
            self.base.needs_redraw |= child.base.needs_redraw;
        }
    }
}

impl Deref for View {
    type Target = ViewBase;
    fn deref(&self) -> &ViewBase {
        &self.base
    }
}

impl DerefMut for View {
    fn deref_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }
}

impl Layer for View {
    fn draw(&self, painter: &mut dyn Painter) {
        self.widget.draw(&self.base, painter);
    }

    fn propagate_draw(&mut self, painter: &mut dyn Painter) {
        for child in &mut self.base.children {
            let frame = child.base.frame;
            painter.draw_layer(frame, child);
        }
        self.base.needs_redraw = false;
    }

    fn needs_redraw(&self) -> bool {
        self.base.needs_redraw
    }
}

impl SubLayout for View {
    fn settings(&self) -> LayoutSettings {
        self.base.layout_settings
    }

    fn preferred_size(&mut self) -> Size {
        self.base.pref_size
    }

    fn height_for_width(&mut self, width: u32) -> u32 {
        self.widget.height_for_width(&mut self.base, width)
    }

    fn layout(&mut self, rect: Rect) {
        self.base.set_frame(rect);
    }
}
