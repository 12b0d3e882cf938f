//! The backend contract and the two bundled backends.
//!
//! The core never draws. It asks a [`Backend`] to create child regions, keep them
//! positioned, report whether a region contains a point, paint focus feedback and
//! hand over raw input. [`HeadlessBackend`] keeps everything in memory for tests;
//! [`TerminalBackend`] drives a real terminal through crossterm.

pub mod headless;
pub mod terminal;

use std::any::Any;

use slotmap::{new_key_type, SlotMap};

use crate::error::Result;
use crate::event::input::InputEvent;
use crate::geometry::{Offset, Region, Size};

pub use headless::HeadlessBackend;
pub use terminal::{Palette, TerminalBackend};

new_key_type! {
    /// Handle to a backend region.
    pub struct RegionId;
}

/// Backend-defined background style used for focus feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StyleToken {
    #[default]
    Default,
    Focused,
}

/// The backend's root drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub region: RegionId,
    pub size: Size,
}

/// What the core needs from a terminal/rendering collaborator.
///
/// Region positions are relative to the parent region. Every call happens on the
/// event-loop thread.
pub trait Backend {
    /// The root surface. Repeated calls return the same region.
    fn surface(&self) -> Surface;

    /// Create a child region of `parent` at (x, y) with the given size.
    fn create_region(
        &mut self,
        parent: RegionId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<RegionId>;

    /// Whether the region geometrically contains the screen point (x, y).
    fn region_contains(&self, region: RegionId, x: i32, y: i32) -> bool;

    /// Resize a region.
    fn resize_region(&mut self, region: RegionId, width: i32, height: i32) -> Result<()>;

    /// Move a region within its parent.
    fn move_region(&mut self, region: RegionId, x: i32, y: i32) -> Result<()>;

    /// The next raw input event, if one is ready.
    fn poll_input(&mut self) -> Result<Option<InputEvent>>;

    /// Paint a region's background with a style token.
    fn set_background(&mut self, region: RegionId, style: StyleToken) -> Result<()>;

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ---------------------------------------------------------------------------
// RegionTable
// ---------------------------------------------------------------------------

/// One region as tracked by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionEntry {
    pub parent: Option<RegionId>,
    /// Bounds relative to the parent region.
    pub bounds: Region,
    pub style: StyleToken,
}

/// Region bookkeeping shared by the bundled backends: a tree of rectangles with
/// parent-relative bounds.
#[derive(Debug)]
pub struct RegionTable {
    regions: SlotMap<RegionId, RegionEntry>,
    root: RegionId,
}

impl RegionTable {
    /// A table holding only a root region of the given size.
    pub fn new(size: Size) -> Self {
        let mut regions = SlotMap::with_key();
        let root = regions.insert(RegionEntry {
            parent: None,
            bounds: Region::new(0, 0, size.width, size.height),
            style: StyleToken::Default,
        });
        Self { regions, root }
    }

    /// The root region.
    pub fn root(&self) -> RegionId {
        self.root
    }

    /// Create a child region. Returns `None` when `parent` is unknown.
    pub fn create(&mut self, parent: RegionId, bounds: Region) -> Option<RegionId> {
        if !self.regions.contains_key(parent) {
            return None;
        }
        Some(self.regions.insert(RegionEntry {
            parent: Some(parent),
            bounds,
            style: StyleToken::Default,
        }))
    }

    /// Look up a region.
    pub fn get(&self, id: RegionId) -> Option<&RegionEntry> {
        self.regions.get(id)
    }

    /// Mutable lookup.
    pub fn get_mut(&mut self, id: RegionId) -> Option<&mut RegionEntry> {
        self.regions.get_mut(id)
    }

    /// A region's bounds in screen coordinates.
    pub fn absolute(&self, id: RegionId) -> Option<Region> {
        let entry = self.regions.get(id)?;
        let mut origin = entry.bounds.offset();
        let mut parent = entry.parent;
        while let Some(p) = parent {
            let up = self.regions.get(p)?;
            origin = origin + up.bounds.offset();
            parent = up.parent;
        }
        Some(Region::new(origin.x, origin.y, entry.bounds.width, entry.bounds.height))
    }

    /// Whether a region contains the screen point (x, y).
    pub fn contains(&self, id: RegionId, x: i32, y: i32) -> bool {
        self.absolute(id).is_some_and(|r| r.contains(x, y))
    }

    /// Resize a region. Returns `false` when the region is unknown.
    pub fn resize(&mut self, id: RegionId, size: Size) -> bool {
        match self.regions.get_mut(id) {
            Some(entry) => {
                entry.bounds.width = size.width.max(0);
                entry.bounds.height = size.height.max(0);
                true
            }
            None => false,
        }
    }

    /// Move a region within its parent. Returns `false` when the region is unknown.
    pub fn move_to(&mut self, id: RegionId, position: Offset) -> bool {
        match self.regions.get_mut(id) {
            Some(entry) => {
                entry.bounds.x = position.x;
                entry.bounds.y = position.y;
                true
            }
            None => false,
        }
    }

    /// Number of regions, root included.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Always `false`: the root region always exists.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
