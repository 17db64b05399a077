//! Coverage masks for text.

use crate::rect::{Point, Size};

/// Packing state of a [`Mask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaskCursor {
    pack_x: u32,
    pack_y: u32,
    row_height: u32,
}

/// A square 8-bit coverage bitmap that text is rasterized into.
///
/// Regions are handed out by a shelf packer: left to right along a row, starting a new row when
/// the current one is full. The bitmap itself is only allocated on first write, so frames without
/// text cost nothing.
#[derive(Clone)]
pub struct Mask {
    side: u32,
    data: Vec<u8>,
    cursor: MaskCursor,
}

impl Mask {
    /// Creates an empty mask. `side` should be a power of two.
    pub fn new(side: u32) -> Mask {
        Mask {
            side,
            data: Vec::new(),
            cursor: MaskCursor::default(),
        }
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    /// Raw coverage, row-major. Empty if nothing was ever written.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Coverage at a pixel; zero outside the mask.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x < self.side && y < self.side && !self.data.is_empty() {
            self.data[self.index(x, y)]
        } else {
            0
        }
    }

    /// Raises coverage at a pixel to at least `value`. Ignored outside the mask.
    pub fn blend(&mut self, x: u32, y: u32, value: u8) {
        if x < self.side && y < self.side {
            let index = self.index(x, y);
            let data = self.bitmap();
            data[index] = data[index].max(value);
        }
    }

    fn bitmap(&mut self) -> &mut [u8] {
        if self.data.is_empty() {
            self.data = vec![0; self.side as usize * self.side as usize];
        }
        &mut self.data
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.side as usize + x as usize
    }

    /// Reserves a cleared region of the given size.
    ///
    /// Returns the region's top left corner, or `None` if the mask is full.
    pub fn allocate(&mut self, size: Size) -> Option<Point> {
        if size.width > self.side || size.height > self.side {
            return None;
        }

        let mut cursor = self.cursor;
        if cursor.pack_x + size.width > self.side {
            cursor.pack_x = 0;
            cursor.pack_y += cursor.row_height;
            cursor.row_height = 0;
        }
        if cursor.pack_y + size.height > self.side {
            return None;
        }

        let origin = Point::new(cursor.pack_x, cursor.pack_y);
        cursor.pack_x += size.width;
        cursor.row_height = cursor.row_height.max(size.height);
        self.cursor = cursor;

        for y in origin.y..origin.y + size.height {
            let start = self.index(origin.x, y);
            self.bitmap()[start..start + size.width as usize].fill(0);
        }

        Some(origin)
    }

    pub fn cursor(&self) -> MaskCursor {
        self.cursor
    }

    /// Returns every region allocated after `cursor` was taken to the packer.
    pub fn restore(&mut self, cursor: MaskCursor) {
        self.cursor = cursor;
    }
}

impl std::fmt::Debug for Mask {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Mask")
            .field("side", &self.side)
            .field("cursor", &self.cursor)
            .finish()
    }
}
