//! Core geometry types: Offset, Size, Region, BoxGeometry.
//!
//! All coordinates are terminal cells. A node's [`BoxGeometry`] is expressed in its
//! parent's coordinate space; [`Region`] is used for absolute rectangles and hit tests.

use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Offset
// ---------------------------------------------------------------------------

/// A 2D position or displacement in terminal cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    /// The origin.
    pub const ZERO: Offset = Offset { x: 0, y: 0 };

    /// Create a new offset.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Offset {
    type Output = Offset;
    #[inline]
    fn add(self, rhs: Offset) -> Offset {
        Offset { x: self.x.saturating_add(rhs.x), y: self.y.saturating_add(rhs.y) }
    }
}

impl Sub for Offset {
    type Output = Offset;
    #[inline]
    fn sub(self, rhs: Offset) -> Offset {
        Offset { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A 2D size in terminal cells (width x height).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// A zero-sized size.
    pub const ZERO: Size = Size { width: 0, height: 0 };

    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Both dimensions clamped to be non-negative.
    #[inline]
    pub const fn clamped(self) -> Size {
        Size {
            width: if self.width > 0 { self.width } else { 0 },
            height: if self.height > 0 { self.height } else { 0 },
        }
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// A rectangular region in terminal cells defined by position and size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    /// An empty region at the origin.
    pub const EMPTY: Region = Region { x: 0, y: 0, width: 0, height: 0 };

    /// Create a new region.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// The right edge (exclusive): `x + width`, saturating.
    #[inline]
    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// The bottom edge (exclusive): `y + height`, saturating.
    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// The top-left corner as an [`Offset`].
    #[inline]
    pub const fn offset(self) -> Offset {
        Offset { x: self.x, y: self.y }
    }

    /// The dimensions as a [`Size`].
    #[inline]
    pub const fn size(self) -> Size {
        Size { width: self.width, height: self.height }
    }

    /// Whether the point (x, y) lies inside this region.
    ///
    /// The right and bottom edges are exclusive, so zero-sized regions contain nothing.
    #[inline]
    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Translate the region by an [`Offset`].
    #[inline]
    pub const fn translate(self, offset: Offset) -> Region {
        Region {
            x: self.x.saturating_add(offset.x),
            y: self.y.saturating_add(offset.y),
            width: self.width,
            height: self.height,
        }
    }
}

// ---------------------------------------------------------------------------
// BoxGeometry
// ---------------------------------------------------------------------------

/// Position and size state of a single node, relative to its parent.
///
/// `content_*` is the extent of the parcel the geometry manager handed to the node
/// (equal to the box size unless the node was expanded without filling). `placed`
/// stays `false` until a geometry manager (or an explicit position at creation)
/// has positioned the node; unplaced boxes never enclose a point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BoxGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub content_width: i32,
    pub content_height: i32,
    pub placed: bool,
}

impl BoxGeometry {
    /// An unplaced box of the given size at the parent origin.
    pub const fn unplaced(size: Size) -> Self {
        Self {
            x: 0,
            y: 0,
            width: size.width,
            height: size.height,
            content_width: size.width,
            content_height: size.height,
            placed: false,
        }
    }

    /// A box positioned at `offset` with the given size.
    pub const fn placed_at(offset: Offset, size: Size) -> Self {
        Self {
            x: offset.x,
            y: offset.y,
            width: size.width,
            height: size.height,
            content_width: size.width,
            content_height: size.height,
            placed: true,
        }
    }

    /// The box as a [`Region`] in parent coordinates.
    #[inline]
    pub const fn region(&self) -> Region {
        Region { x: self.x, y: self.y, width: self.width, height: self.height }
    }

    /// The box size.
    #[inline]
    pub const fn size(&self) -> Size {
        Size { width: self.width, height: self.height }
    }

    /// Apply a geometry manager's result to this box.
    ///
    /// Negative extents are clamped to zero. Returns `true` when anything observable
    /// changed, so callers only push real changes to the backend; calling this twice
    /// with the same arguments changes nothing the second time.
    pub fn update(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        available_width: i32,
        available_height: i32,
    ) -> bool {
        let next = BoxGeometry {
            x,
            y,
            width: width.max(0),
            height: height.max(0),
            content_width: available_width.max(0),
            content_height: available_height.max(0),
            placed: true,
        };
        if *self == next {
            return false;
        }
        *self = next;
        true
    }
}

// ===========================================================================
// Tests
// ===========================================================================
