//! Geometry manager options: side, fill, anchor, sticky and the per-child intents.
//!
//! Every option is a closed enum. String forms (`"left"`, `"both"`, `"nw"`, ...) are
//! accepted through [`FromStr`] and rejected there when unrecognised, so layout code
//! never sees an invalid value.

use std::fmt;
use std::str::FromStr;

use crate::dom::node::NodeId;
use crate::error::Error;

// ---------------------------------------------------------------------------
// GeometryManager
// ---------------------------------------------------------------------------

/// The geometry manager positioning a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryManager {
    Pack,
    Grid,
    Place,
}

impl fmt::Display for GeometryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeometryManager::Pack => "pack",
            GeometryManager::Grid => "grid",
            GeometryManager::Place => "place",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Side / Fill / Anchor / Sticky
// ---------------------------------------------------------------------------

/// The container edge a packed child is placed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    Left,
    Right,
    #[default]
    Top,
    Bottom,
}

impl Side {
    /// Whether the side consumes horizontal space (left/right).
    pub const fn is_lateral(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

/// The axes a packed child stretches into when it expands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Fill {
    #[default]
    None,
    X,
    Y,
    Both,
}

impl Fill {
    /// Whether the horizontal axis is filled.
    pub const fn covers_x(self) -> bool {
        matches!(self, Fill::X | Fill::Both)
    }

    /// Whether the vertical axis is filled.
    pub const fn covers_y(self) -> bool {
        matches!(self, Fill::Y | Fill::Both)
    }
}

/// Alignment of a box along one axis inside a larger parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    End,
}

impl Align {
    /// Offset of an item of length `item` inside a parcel of length `parcel`.
    ///
    /// Never negative: an item larger than its parcel is pinned to the start.
    pub fn offset(self, parcel: i32, item: i32) -> i32 {
        let slack = (parcel - item).max(0);
        match self {
            Align::Start => 0,
            Align::Center => slack / 2,
            Align::End => slack,
        }
    }
}

/// Where a packed child sits within unused parcel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Anchor {
    N,
    S,
    W,
    E,
    #[default]
    NW,
    NE,
    SW,
    SE,
    Center,
}

impl Anchor {
    /// Horizontal alignment implied by the anchor.
    pub const fn horizontal(self) -> Align {
        match self {
            Anchor::W | Anchor::NW | Anchor::SW => Align::Start,
            Anchor::E | Anchor::NE | Anchor::SE => Align::End,
            Anchor::N | Anchor::S | Anchor::Center => Align::Center,
        }
    }

    /// Vertical alignment implied by the anchor.
    pub const fn vertical(self) -> Align {
        match self {
            Anchor::N | Anchor::NW | Anchor::NE => Align::Start,
            Anchor::S | Anchor::SW | Anchor::SE => Align::End,
            Anchor::W | Anchor::E | Anchor::Center => Align::Center,
        }
    }
}

/// Edges a grid child sticks to within its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sticky {
    N,
    S,
    W,
    E,
    #[default]
    NW,
    NE,
    SW,
    SE,
    NS,
    EW,
}

fn invalid(kind: &'static str, value: &str) -> Error {
    Error::InvalidOption { kind, value: value.to_owned() }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            "top" => Ok(Side::Top),
            "bottom" => Ok(Side::Bottom),
            _ => Err(invalid("side", s)),
        }
    }
}

impl FromStr for Fill {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Fill::None),
            "x" => Ok(Fill::X),
            "y" => Ok(Fill::Y),
            "both" => Ok(Fill::Both),
            _ => Err(invalid("fill", s)),
        }
    }
}

impl FromStr for Anchor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" => Ok(Anchor::N),
            "s" => Ok(Anchor::S),
            "w" => Ok(Anchor::W),
            "e" => Ok(Anchor::E),
            "nw" => Ok(Anchor::NW),
            "ne" => Ok(Anchor::NE),
            "sw" => Ok(Anchor::SW),
            "se" => Ok(Anchor::SE),
            "center" => Ok(Anchor::Center),
            _ => Err(invalid("anchor", s)),
        }
    }
}

impl FromStr for Sticky {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" => Ok(Sticky::N),
            "s" => Ok(Sticky::S),
            "w" => Ok(Sticky::W),
            "e" => Ok(Sticky::E),
            "nw" => Ok(Sticky::NW),
            "ne" => Ok(Sticky::NE),
            "sw" => Ok(Sticky::SW),
            "se" => Ok(Sticky::SE),
            "ns" => Ok(Sticky::NS),
            "ew" => Ok(Sticky::EW),
            _ => Err(invalid("sticky", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// PackInfo / PackOptions
// ---------------------------------------------------------------------------

/// Snapshot of a child's pack request, taken when `pack` is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackInfo {
    pub side: Side,
    pub expand: bool,
    pub fill: Fill,
    pub ipadx: u16,
    pub ipady: u16,
    pub padx: u16,
    pub pady: u16,
    pub anchor: Anchor,
}

/// Arguments to `pack`: the [`PackInfo`] plus ordering and container selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackOptions {
    pub info: PackInfo,
    pub after: Option<NodeId>,
    pub before: Option<NodeId>,
    pub in_: Option<NodeId>,
}

impl PackOptions {
    /// Default options: top side, no expand, no fill, no padding, `nw` anchor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the side (builder).
    pub fn side(mut self, side: Side) -> Self {
        self.info.side = side;
        self
    }

    /// Set the expand flag (builder).
    pub fn expand(mut self, expand: bool) -> Self {
        self.info.expand = expand;
        self
    }

    /// Set the fill mode (builder).
    pub fn fill(mut self, fill: Fill) -> Self {
        self.info.fill = fill;
        self
    }

    /// Set the anchor (builder).
    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.info.anchor = anchor;
        self
    }

    /// Set inner padding on both axes (builder).
    pub fn ipad(mut self, ipadx: u16, ipady: u16) -> Self {
        self.info.ipadx = ipadx;
        self.info.ipady = ipady;
        self
    }

    /// Set outer padding on both axes (builder).
    pub fn pad(mut self, padx: u16, pady: u16) -> Self {
        self.info.padx = padx;
        self.info.pady = pady;
        self
    }

    /// Pack immediately after `sibling` in the container's order (builder).
    pub fn after(mut self, sibling: NodeId) -> Self {
        self.after = Some(sibling);
        self
    }

    /// Pack immediately before `sibling` in the container's order (builder).
    pub fn before(mut self, sibling: NodeId) -> Self {
        self.before = Some(sibling);
        self
    }

    /// Name the container explicitly (builder). Must be the node's parent.
    pub fn in_(mut self, container: NodeId) -> Self {
        self.in_ = Some(container);
        self
    }
}

// ---------------------------------------------------------------------------
// PlaceOptions
// ---------------------------------------------------------------------------

/// Absolute and parent-relative placement, resolved against the parent's box.
///
/// Position is `x + relx * parent_width` (likewise for y). Size is `width` when
/// given, else `relwidth * parent_width` when given, else the node's requested size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaceOptions {
    pub x: i32,
    pub y: i32,
    pub relx: f32,
    pub rely: f32,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub relwidth: Option<f32>,
    pub relheight: Option<f32>,
}

impl PlaceOptions {
    /// Place at the parent origin with the requested size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Absolute position (builder).
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Position relative to the parent size, `0.0..=1.0` (builder).
    pub fn rel(mut self, relx: f32, rely: f32) -> Self {
        self.relx = relx;
        self.rely = rely;
        self
    }

    /// Absolute size (builder).
    pub fn size(mut self, width: i32, height: i32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Size relative to the parent size (builder).
    pub fn rel_size(mut self, relwidth: f32, relheight: f32) -> Self {
        self.relwidth = Some(relwidth);
        self.relheight = Some(relheight);
        self
    }
}

// ---------------------------------------------------------------------------
// GridOptions
// ---------------------------------------------------------------------------

/// A child's grid request. Recorded on the node; grid geometry is not computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridOptions {
    pub column: u16,
    pub row: u16,
    pub columnspan: u16,
    pub rowspan: u16,
    pub sticky: Sticky,
    pub ipadx: u16,
    pub ipady: u16,
    pub padx: u16,
    pub pady: u16,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            column: 0,
            row: 0,
            columnspan: 1,
            rowspan: 1,
            sticky: Sticky::default(),
            ipadx: 0,
            ipady: 0,
            padx: 0,
            pady: 0,
        }
    }
}

impl GridOptions {
    /// Cell `(column, row)` with single spans.
    pub fn cell(column: u16, row: u16) -> Self {
        Self { column, row, ..Self::default() }
    }

    /// Set the spans (builder).
    pub fn span(mut self, columnspan: u16, rowspan: u16) -> Self {
        self.columnspan = columnspan;
        self.rowspan = rowspan;
        self
    }

    /// Set the sticky edges (builder).
    pub fn sticky(mut self, sticky: Sticky) -> Self {
        self.sticky = sticky;
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================
