//! Node types: NodeId, NodeKind, NodeData.

use slotmap::new_key_type;

use crate::backend::RegionId;
use crate::geometry::{BoxGeometry, Offset, Size};
use crate::layout::options::{GeometryManager, GridOptions, PackInfo, PlaceOptions};

new_key_type! {
    /// Unique identifier for a node. Copy, lightweight (u64).
    pub struct NodeId;
}

/// What a node is. Both kinds are containers; only widgets accept input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Frame,
    Widget,
}

/// Data associated with a single node.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    /// Optional label, for logs and debugging.
    pub name: Option<String>,
    /// Own size before padding. `None` until inserted, where it defaults to the
    /// parent's size.
    pub requested: Option<Size>,
    /// Explicit position at creation. A node without one stays unplaced until a
    /// geometry manager positions it.
    pub position: Option<Offset>,
    /// Current box, in parent coordinates.
    pub geometry: BoxGeometry,
    /// Backend region mirroring `geometry`. Assigned when the node is created.
    pub region: Option<RegionId>,
    /// Tree depth: root is 0, each child is its parent's depth + 1.
    pub depth: u32,
    /// The manager positioning this node, if any.
    pub manager: Option<GeometryManager>,
    /// The manager this node's children use (pack or grid; place never claims).
    pub children_manager: Option<GeometryManager>,
    pub pack_info: Option<PackInfo>,
    pub place_info: Option<PlaceOptions>,
    pub grid_info: Option<GridOptions>,
    /// Whether this node can take focus from a mouse press.
    pub focusable: bool,
    /// Whether mouse events continue to later nodes after this one handles them.
    pub propagates_mouse_event: bool,
    /// Whether key events continue to later nodes after this one handles them.
    pub propagates_key_event: bool,
    /// Whether this node currently holds focus.
    pub focused: bool,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            requested: None,
            position: None,
            geometry: BoxGeometry::default(),
            region: None,
            depth: 0,
            manager: None,
            children_manager: None,
            pack_info: None,
            place_info: None,
            grid_info: None,
            focusable: kind == NodeKind::Widget,
            propagates_mouse_event: true,
            propagates_key_event: true,
            focused: false,
        }
    }

    /// A frame: a container that does not take input or focus.
    pub fn frame() -> Self {
        Self::new(NodeKind::Frame)
    }

    /// A widget: a container that takes input and, by default, focus.
    pub fn widget() -> Self {
        Self::new(NodeKind::Widget)
    }

    /// Set the debug label (builder).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the requested size (builder).
    pub fn size(mut self, width: i32, height: i32) -> Self {
        self.requested = Some(Size::new(width, height));
        self
    }

    /// Position the node explicitly at creation (builder).
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.position = Some(Offset::new(x, y));
        self
    }

    /// Set whether the node can take focus (builder).
    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    /// Set whether mouse events propagate past this node (builder).
    pub fn propagates_mouse_event(mut self, propagates: bool) -> Self {
        self.propagates_mouse_event = propagates;
        self
    }

    /// Set whether key events propagate past this node (builder).
    pub fn propagates_key_event(mut self, propagates: bool) -> Self {
        self.propagates_key_event = propagates;
        self
    }

    /// Whether this node accepts input subscriptions.
    pub fn accepts_input(&self) -> bool {
        self.kind == NodeKind::Widget
    }

    /// The size geometry managers start from.
    pub fn requested_size(&self) -> Size {
        self.requested.unwrap_or(self.geometry.size())
    }
}
