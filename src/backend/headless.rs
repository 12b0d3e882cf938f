//! In-memory backend for tests and headless sessions.
//!
//! Regions are plain rectangles, input comes from a scripted queue, and every
//! background change is recorded so tests can assert on focus feedback.

use std::any::Any;
use std::collections::VecDeque;

use super::{Backend, RegionId, RegionTable, StyleToken, Surface};
use crate::error::{Error, Result};
use crate::event::input::InputEvent;
use crate::geometry::{Offset, Region, Size};

/// A backend with no terminal behind it.
#[derive(Debug)]
pub struct HeadlessBackend {
    regions: RegionTable,
    size: Size,
    input: VecDeque<InputEvent>,
    backgrounds: Vec<(RegionId, StyleToken)>,
}

impl HeadlessBackend {
    /// A headless surface of the given size.
    pub fn new(width: u16, height: u16) -> Self {
        let size = Size::new(i32::from(width), i32::from(height));
        Self {
            regions: RegionTable::new(size),
            size,
            input: VecDeque::new(),
            backgrounds: Vec::new(),
        }
    }

    /// Queue an input event for a later `poll_input`.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push_back(event);
    }

    /// Number of queued input events.
    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    /// A region's bounds in screen coordinates.
    pub fn absolute_region(&self, region: RegionId) -> Option<Region> {
        self.regions.absolute(region)
    }

    /// A region's current background style.
    pub fn style_of(&self, region: RegionId) -> Option<StyleToken> {
        self.regions.get(region).map(|entry| entry.style)
    }

    /// Every background change, oldest first.
    pub fn background_log(&self) -> &[(RegionId, StyleToken)] {
        &self.backgrounds
    }

    /// Number of regions, root included.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    fn missing(region: RegionId) -> Error {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("unknown region {region:?}"),
        ))
    }
}

impl Backend for HeadlessBackend {
    fn surface(&self) -> Surface {
        Surface { region: self.regions.root(), size: self.size }
    }

    fn create_region(
        &mut self,
        parent: RegionId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<RegionId> {
        self.regions
            .create(parent, Region::new(x, y, width.max(0), height.max(0)))
            .ok_or_else(|| Self::missing(parent))
    }

    fn region_contains(&self, region: RegionId, x: i32, y: i32) -> bool {
        self.regions.contains(region, x, y)
    }

    fn resize_region(&mut self, region: RegionId, width: i32, height: i32) -> Result<()> {
        if region == self.regions.root() {
            self.size = Size::new(width, height).clamped();
        }
        if self.regions.resize(region, Size::new(width, height)) {
            Ok(())
        } else {
            Err(Self::missing(region))
        }
    }

    fn move_region(&mut self, region: RegionId, x: i32, y: i32) -> Result<()> {
        if self.regions.move_to(region, Offset::new(x, y)) {
            Ok(())
        } else {
            Err(Self::missing(region))
        }
    }

    fn poll_input(&mut self) -> Result<Option<InputEvent>> {
        Ok(self.input.pop_front())
    }

    fn set_background(&mut self, region: RegionId, style: StyleToken) -> Result<()> {
        let entry = self.regions.get_mut(region).ok_or_else(|| Self::missing(region))?;
        entry.style = style;
        self.backgrounds.push((region, style));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
