//! Layout strategies.
//!
//! A strategy is a family of pure functions over a container's [`LayoutSettings`] and an ordered
//! list of [`SubLayout`] handles, one per child. Strategies never fail: degenerate input (no
//! children, no space) yields a degenerate but valid result.

use crate::rect::{EdgeInsets, Rect, Size};
use core::fmt;
use std::collections::HashMap;

/// Placement of items along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexJustify {
    #[default]
    Start,
    End,
    Center,
    SpaceAround,
    SpaceBetween,
    Stretch,
}

/// Per-view layout parameters.
///
/// A view's settings serve two roles: the container fields (`flex_base`, `flex_gap`,
/// `flex_justify`, `flex_align`, `padding`) apply when the view lays out its own children, and the
/// item fields (`flex_grow`, `flex_shrink`) apply when its parent lays it out.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutSettings {
    /// Main-axis placement of children when nothing grows into the leftover space.
    pub flex_justify: FlexJustify,
    /// Cross-axis placement of children.
    pub flex_align: FlexJustify,

    /// Minimum main-axis size of the container's preferred size.
    pub flex_base: u32,
    /// Share of extra main-axis space this item absorbs.
    pub flex_grow: f32,
    /// Share of missing main-axis space this item gives up.
    pub flex_shrink: f32,

    /// Space between adjacent children.
    pub flex_gap: u32,

    /// Space around all children.
    pub padding: EdgeInsets,
}

impl LayoutSettings {
    pub fn with_grow(mut self, grow: f32) -> Self {
        self.flex_grow = grow;
        self
    }

    pub fn with_shrink(mut self, shrink: f32) -> Self {
        self.flex_shrink = shrink;
        self
    }

    pub fn with_gap(mut self, gap: u32) -> Self {
        self.flex_gap = gap;
        self
    }

    pub fn with_base(mut self, base: u32) -> Self {
        self.flex_base = base;
        self
    }

    pub fn with_padding(mut self, padding: EdgeInsets) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_justify(mut self, justify: FlexJustify) -> Self {
        self.flex_justify = justify;
        self
    }

    pub fn with_align(mut self, align: FlexJustify) -> Self {
        self.flex_align = align;
        self
    }
}

/// A child as seen by a layout strategy.
pub trait SubLayout {
    /// The child's layout settings.
    fn settings(&self) -> LayoutSettings;

    /// The child's preferred outer size.
    fn preferred_size(&mut self) -> Size;

    /// The height the child wants when given exactly `width`.
    fn height_for_width(&mut self, width: u32) -> u32;

    /// Assigns the child its final frame, in the container's coordinate space.
    fn layout(&mut self, rect: Rect);
}

impl<L: SubLayout + ?Sized> SubLayout for &mut L {
    fn settings(&self) -> LayoutSettings {
        (**self).settings()
    }
    fn preferred_size(&mut self) -> Size {
        (**self).preferred_size()
    }
    fn height_for_width(&mut self, width: u32) -> u32 {
        (**self).height_for_width(width)
    }
    fn layout(&mut self, rect: Rect) {
        (**self).layout(rect)
    }
}

/// A layout mode.
pub trait LayoutStrategy: fmt::Debug + Send + Sync {
    /// The container's preferred outer size.
    fn preferred_size(&self, settings: &LayoutSettings, children: &mut [&mut dyn SubLayout])
        -> Size;

    /// The container's height when given exactly `width`.
    fn height_for_width(
        &self,
        settings: &LayoutSettings,
        width: u32,
        children: &mut [&mut dyn SubLayout],
    ) -> u32;

    /// Places all children inside `rect`.
    fn layout(&self, settings: &LayoutSettings, rect: Rect, children: &mut [&mut dyn SubLayout]);
}

/// Memoizes a child's size queries for the duration of one layout pass.
///
/// The preferred size is computed once; heights are cached per distinct width. Drop the wrapper
/// when the tree changes.
#[derive(Debug)]
pub struct CachedLayout<L> {
    inner: L,
    preferred: Option<Size>,
    heights: HashMap<u32, u32>,
}

impl<L: SubLayout> CachedLayout<L> {
    pub fn new(inner: L) -> Self {
        CachedLayout {
            inner,
            preferred: None,
            heights: HashMap::new(),
        }
    }
}

impl<L: SubLayout> SubLayout for CachedLayout<L> {
    fn settings(&self) -> LayoutSettings {
        self.inner.settings()
    }

    fn preferred_size(&mut self) -> Size {
        if let Some(size) = self.preferred {
            return size;
        }
        let size = self.inner.preferred_size();
        self.preferred = Some(size);
        size
    }

    fn height_for_width(&mut self, width: u32) -> u32 {
        if let Some(height) = self.heights.get(&width) {
            return *height;
        }
        let height = self.inner.height_for_width(width);
        self.heights.insert(width, height);
        height
    }

    fn layout(&mut self, rect: Rect) {
        self.inner.layout(rect)
    }
}

/// Wraps every child in a [`CachedLayout`] and hands the strategy-ready handles to `f`.
pub fn with_cached<L, R>(children: &mut [L], f: impl FnOnce(&mut [&mut dyn SubLayout]) -> R) -> R
where
    L: SubLayout,
{
    let mut nodes: Vec<CachedLayout<&mut L>> = children.iter_mut().map(CachedLayout::new).collect();
    let mut handles: Vec<&mut dyn SubLayout> = nodes
        .iter_mut()
        .map(|node| node as &mut dyn SubLayout)
        .collect();
    f(&mut handles)
}

/// Declines layout: no preferred size and no placement.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneLayout;

impl LayoutStrategy for NoneLayout {
    fn preferred_size(&self, _: &LayoutSettings, _: &mut [&mut dyn SubLayout]) -> Size {
        Size::zero()
    }

    fn height_for_width(&self, _: &LayoutSettings, _: u32, _: &mut [&mut dyn SubLayout]) -> u32 {
        0
    }

    fn layout(&self, _: &LayoutSettings, _: Rect, _: &mut [&mut dyn SubLayout]) {}
}

/// Lays children out left to right.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlexRow;

/// What the row needs to know about a child before distributing space.
#[derive(Debug, Clone, Copy)]
struct FlexItem {
    settings: LayoutSettings,
    preferred: Size,
}

fn collect_items(children: &mut [&mut dyn SubLayout]) -> Vec<FlexItem> {
    children
        .iter_mut()
        .map(|child| FlexItem {
            settings: child.settings(),
            preferred: child.preferred_size(),
        })
        .collect()
}

fn total_gap(settings: &LayoutSettings, count: usize) -> u32 {
    let gaps = u32::try_from(count.saturating_sub(1)).unwrap_or(u32::MAX);
    settings.flex_gap.saturating_mul(gaps)
}

fn natural_size(settings: &LayoutSettings, items: &[FlexItem]) -> Size {
    let mut size = Size::zero();
    for item in items {
        size.width = size.width.saturating_add(item.preferred.width);
        size.height = size.height.max(item.preferred.height);
    }
    size.width = size.width.saturating_add(total_gap(settings, items.len()));

    let mut size = size.outset(settings.padding);
    if settings.flex_base > size.width {
        size.width = settings.flex_base;
    }
    size
}

/// Computes each child's main-axis size for a row of outer width `width`.
///
/// The slack (or deficit) is measured against the children's preferred widths after padding and
/// gaps are taken out.
fn distribute(settings: &LayoutSettings, items: &[FlexItem], width: u32) -> Vec<u32> {
    let mut widths: Vec<u32> = items.iter().map(|item| item.preferred.width).collect();
    let content = widths.iter().fold(0u32, |acc, w| acc.saturating_add(*w));
    let available = width
        .saturating_sub(settings.padding.horizontal())
        .saturating_sub(total_gap(settings, items.len()));

    if available > content {
        grow(&mut widths, items, available - content);
    } else if available < content {
        shrink(&mut widths, items, content - available);
    }
    widths
}

fn grow(widths: &mut [u32], items: &[FlexItem], slack: u32) {
    let weight = |item: &FlexItem| f64::from(item.settings.flex_grow.max(0.));
    let sum: f64 = items.iter().map(weight).sum();
    if sum <= 0. {
        return;
    }

    let mut given = 0u32;
    let mut last = None;
    for (i, item) in items.iter().enumerate() {
        let w = weight(item);
        if w <= 0. {
            continue;
        }
        let share = ((f64::from(slack) * w / sum) as u32).min(slack - given);
        widths[i] += share;
        given += share;
        last = Some(i);
    }

    // rounding remainder
    if let Some(last) = last {
        widths[last] += slack - given;
    }
}

fn shrink(widths: &mut [u32], items: &[FlexItem], mut deficit: u32) {
    let weight = |i: usize| f64::from(items[i].settings.flex_shrink.max(0.));
    let mut active: Vec<usize> = (0..items.len())
        .filter(|&i| weight(i) > 0. && widths[i] > 0)
        .collect();

    while deficit > 0 && !active.is_empty() {
        let sum: f64 = active.iter().map(|&i| weight(i)).sum();
        let mut taken = 0u32;
        for &i in &active {
            let share = ((f64::from(deficit) * weight(i) / sum) as u32).min(deficit - taken);
            let take = share.min(widths[i]);
            widths[i] -= take;
            taken += take;
        }
        deficit -= taken;
        active.retain(|&i| widths[i] > 0);

        if taken == 0 {
            // every share floored to zero; take single pixels in order
            for &i in &active {
                if deficit == 0 {
                    break;
                }
                widths[i] -= 1;
                deficit -= 1;
            }
            active.retain(|&i| widths[i] > 0);
        }
    }
}

/// Leading offset and extra per-gap spacing for leftover main-axis space.
fn justify(justify: FlexJustify, leftover: u32, count: usize) -> (u32, u32) {
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    match justify {
        FlexJustify::Start | FlexJustify::Stretch => (0, 0),
        FlexJustify::End => (leftover, 0),
        FlexJustify::Center => (leftover / 2, 0),
        FlexJustify::SpaceBetween if count > 1 => (0, leftover / (count - 1)),
        FlexJustify::SpaceBetween => (0, 0),
        FlexJustify::SpaceAround if count > 0 => {
            let around = leftover / count;
            (around / 2, around)
        }
        FlexJustify::SpaceAround => (0, 0),
    }
}

fn child_height(child: &mut dyn SubLayout, item: &FlexItem, width: u32) -> u32 {
    if width == item.preferred.width {
        item.preferred.height
    } else {
        child.height_for_width(width)
    }
}

impl LayoutStrategy for FlexRow {
    fn preferred_size(&self, settings: &LayoutSettings, children: &mut [&mut dyn SubLayout]) -> Size {
        natural_size(settings, &collect_items(children))
    }

    fn height_for_width(
        &self,
        settings: &LayoutSettings,
        width: u32,
        children: &mut [&mut dyn SubLayout],
    ) -> u32 {
        let items = collect_items(children);
        let natural = natural_size(settings, &items);
        if width == natural.width {
            return natural.height;
        }

        let widths = distribute(settings, &items, width);
        if widths
            .iter()
            .zip(&items)
            .all(|(w, item)| *w == item.preferred.width)
        {
            // nobody absorbs the difference
            return natural.height;
        }

        let mut height = 0;
        for ((child, item), w) in children.iter_mut().zip(&items).zip(&widths) {
            height = height.max(child_height(&mut **child, item, *w));
        }
        height.saturating_add(settings.padding.vertical())
    }

    fn layout(&self, settings: &LayoutSettings, rect: Rect, children: &mut [&mut dyn SubLayout]) {
        let items = collect_items(children);
        let inner = rect.inset(settings.padding);
        let widths = distribute(settings, &items, rect.size.width);

        let used = widths
            .iter()
            .fold(total_gap(settings, items.len()), |acc, w| acc.saturating_add(*w));
        let leftover = inner.size.width.saturating_sub(used);
        let (lead, between) = justify(settings.flex_justify, leftover, items.len());

        let mut x = inner.origin.x.saturating_add(lead);
        for ((child, item), w) in children.iter_mut().zip(&items).zip(&widths) {
            let (y, height) = match settings.flex_align {
                FlexJustify::Stretch => (inner.origin.y, inner.size.height),
                align => {
                    let height = child_height(&mut **child, item, *w).min(inner.size.height);
                    let free = inner.size.height - height;
                    let y = match align {
                        FlexJustify::End => inner.origin.y + free,
                        FlexJustify::Center => inner.origin.y + free / 2,
                        _ => inner.origin.y,
                    };
                    (y, height)
                }
            };

            tracing::trace!(x, y, width = *w, height, "flex row child");
            child.layout(Rect::new(x, y, *w, height));
            x = x
                .saturating_add(*w)
                .saturating_add(settings.flex_gap)
                .saturating_add(between);
        }
    }
}
