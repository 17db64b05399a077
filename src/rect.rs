//! Rectangles, sizes, points and insets.
//!
//! All geometry is in unsigned pixels. The y-axis points down.

use cgmath::Point2;
use std::ops;

/// A point, or an offset from some origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: u32, y: u32) -> Point {
        Point { x, y }
    }

    /// Returns the origin.
    pub const fn zero() -> Point {
        Point { x: 0, y: 0 }
    }

    /// Translates this point by another one.
    pub fn offset(self, by: Point) -> Point {
        Point {
            x: self.x.saturating_add(by.x),
            y: self.y.saturating_add(by.y),
        }
    }
}

impl From<Point> for Point2<f32> {
    fn from(point: Point) -> Point2<f32> {
        Point2::new(point.x as f32, point.y as f32)
    }
}

impl ops::Add for Point {
    type Output = Point;
    fn add(self, point: Point) -> Point {
        self.offset(point)
    }
}

/// A size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Creates a new size.
    pub const fn new(width: u32, height: u32) -> Size {
        Size { width, height }
    }

    /// Returns a zero size.
    pub const fn zero() -> Size {
        Size {
            width: 0,
            height: 0,
        }
    }

    /// Returns true if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Grows the size by the given insets.
    ///
    /// Used to turn a content size into an outer size, e.g. preferred size plus borders.
    pub fn outset(self, insets: EdgeInsets) -> Size {
        Size {
            width: self
                .width
                .saturating_add(insets.left)
                .saturating_add(insets.right),
            height: self
                .height
                .saturating_add(insets.top)
                .saturating_add(insets.bottom),
        }
    }
}

/// Insets for each edge of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EdgeInsets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl EdgeInsets {
    /// Creates new insets.
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> EdgeInsets {
        EdgeInsets {
            left,
            right,
            top,
            bottom,
        }
    }

    /// The same inset on all four edges.
    pub const fn uniform(value: u32) -> EdgeInsets {
        EdgeInsets::new(value, value, value, value)
    }

    /// Sum of the left and right insets.
    pub fn horizontal(&self) -> u32 {
        self.left.saturating_add(self.right)
    }

    /// Sum of the top and bottom insets.
    pub fn vertical(&self) -> u32 {
        self.top.saturating_add(self.bottom)
    }
}

/// A rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Rectangle origin.
    pub origin: Point,

    /// Rectangle size.
    pub size: Size,
}

impl Rect {
    /// Creates a new rectangle.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Rect {
        Rect {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Creates a rectangle from an origin and a size.
    pub const fn from_parts(origin: Point, size: Size) -> Rect {
        Rect { origin, size }
    }

    /// Returns a zero-sized rectangle at the origin.
    pub const fn zero() -> Rect {
        Rect::new(0, 0, 0, 0)
    }

    /// Returns the point one past the bottom right corner.
    pub fn right_bottom(&self) -> Point {
        Point {
            x: self.origin.x.saturating_add(self.size.width),
            y: self.origin.y.saturating_add(self.size.height),
        }
    }

    /// Returns a new rectangle shrunk by the given insets.
    ///
    /// If the insets on an axis add up to more than the available extent, each side of that axis
    /// is inset by half the extent instead, so the result is never negative.
    pub fn inset(self, mut insets: EdgeInsets) -> Rect {
        if insets.horizontal() > self.size.width {
            insets.left = self.size.width / 2;
            insets.right = self.size.width / 2;
        }
        if insets.vertical() > self.size.height {
            insets.top = self.size.height / 2;
            insets.bottom = self.size.height / 2;
        }

        Rect {
            origin: Point {
                x: self.origin.x + insets.left,
                y: self.origin.y + insets.top,
            },
            size: Size {
                width: self.size.width - insets.horizontal(),
                height: self.size.height - insets.vertical(),
            },
        }
    }

    /// Returns a new rectangle translated by the given offset.
    pub fn offset(self, by: Point) -> Rect {
        Rect {
            origin: self.origin.offset(by),
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn inset_clamps_to_half() {
        let rect = Rect::new(0, 0, 10, 10);
        let inset = rect.inset(EdgeInsets::new(8, 8, 0, 0));
        assert_eq!(inset, Rect::new(5, 0, 0, 10));
    }

    #[test]
    fn inset_regular() {
        let rect = Rect::new(2, 3, 20, 10);
        assert_eq!(
            rect.inset(EdgeInsets::new(1, 2, 3, 4)),
            Rect::new(3, 6, 17, 3)
        );
    }

    #[test]
    fn inset_odd_extent_keeps_remainder() {
        let rect = Rect::new(0, 0, 7, 7);
        assert_eq!(rect.inset(EdgeInsets::uniform(4)), Rect::new(3, 3, 1, 1));
    }

    #[test]
    fn outset_adds_insets() {
        assert_eq!(
            Size::new(10, 5).outset(EdgeInsets::new(1, 2, 3, 4)),
            Size::new(13, 12)
        );
    }

    #[test]
    fn right_bottom_and_offset() {
        let rect = Rect::new(1, 2, 3, 4);
        assert_eq!(rect.right_bottom(), Point::new(4, 6));
        assert_eq!(rect.offset(Point::new(10, 10)), Rect::new(11, 12, 3, 4));
        assert_eq!(Point::new(1, 1) + Point::new(2, 3), Point::new(3, 4));
    }

    proptest! {
        #[test]
        fn inset_never_escapes_rect(
            x in 0u32..1000, y in 0u32..1000,
            w in 0u32..1000, h in 0u32..1000,
            l in 0u32..1000, r in 0u32..1000, t in 0u32..1000, b in 0u32..1000,
        ) {
            let rect = Rect::new(x, y, w, h);
            let inset = rect.inset(EdgeInsets::new(l, r, t, b));
            prop_assert!(inset.origin.x >= rect.origin.x);
            prop_assert!(inset.origin.y >= rect.origin.y);
            prop_assert!(inset.right_bottom().x <= rect.right_bottom().x);
            prop_assert!(inset.right_bottom().y <= rect.right_bottom().y);
        }
    }
}
