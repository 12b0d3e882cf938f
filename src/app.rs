//! Session context: configuration, the widget tree, geometry managers and input.
//!
//! [`Ui`] owns the tree, the backend, both subscription registries, focus and the
//! text cursor. It is passed explicitly to callbacks, which may re-pack nodes
//! while an event is being routed. Constructing it over a
//! [`HeadlessBackend`](crate::backend::HeadlessBackend) gives a session without a
//! terminal.

use tracing::debug;

use crate::backend::Backend;
use crate::dom::node::{NodeData, NodeId};
use crate::dom::tree::Dom;
use crate::error::{Error, Result};
use crate::event::input::{InputEvent, Key, KeyEvent, Modifiers, MouseEvent};
use crate::event::router::Routed;
use crate::event::subscription::{Callback, HandlerArgs, Subscriptions};
use crate::focus::FocusManager;
use crate::geometry::{BoxGeometry, Region, Size};
use crate::layout::options::{GeometryManager, GridOptions, PackOptions, PlaceOptions};
use crate::layout::pack::{self, PackChild, Placement};
use crate::layout::place;

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Optional session title.
    pub title: Option<String>,
    /// Key that makes [`Ui::step`] report [`Step::Quit`].
    pub quit_key: char,
    /// Whether mouse reports move the text cursor.
    pub cursor_follows_mouse: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: None,
            quit_key: 'q',
            cursor_follows_mouse: true,
        }
    }
}

impl AppConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title (builder).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the quit key (builder).
    pub fn with_quit_key(mut self, key: char) -> Self {
        self.quit_key = key;
        self
    }

    /// Set whether mouse reports move the text cursor (builder).
    pub fn with_cursor_follows_mouse(mut self, follows: bool) -> Self {
        self.cursor_follows_mouse = follows;
        self
    }
}

/// What one [`Ui::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// No input was ready.
    Idle,
    /// An event was processed.
    Handled,
    /// The quit key was pressed.
    Quit,
}

// ---------------------------------------------------------------------------
// Ui
// ---------------------------------------------------------------------------

/// The session context.
pub struct Ui {
    pub(crate) dom: Dom,
    pub(crate) backend: Box<dyn Backend>,
    pub(crate) mouse_subs: Subscriptions<MouseEvent>,
    pub(crate) key_subs: Subscriptions<KeyEvent>,
    pub(crate) focus: FocusManager,
    pub(crate) cursor: (i32, i32),
    pub(crate) config: AppConfig,
    root: NodeId,
}

impl Ui {
    /// Start a session over `backend`. The root frame covers the backend surface.
    pub fn new(backend: impl Backend + 'static, config: AppConfig) -> Self {
        let surface = backend.surface();
        let mut dom = Dom::new();
        let mut data = NodeData::frame()
            .named("root")
            .size(surface.size.width, surface.size.height);
        data.region = Some(surface.region);
        let root = dom.insert(data);
        debug!(
            title = ?config.title,
            width = surface.size.width,
            height = surface.size.height,
            "session started"
        );
        Self {
            dom,
            backend: Box::new(backend),
            mouse_subs: Subscriptions::new(),
            key_subs: Subscriptions::new(),
            focus: FocusManager::new(),
            cursor: (0, 0),
            config,
            root,
        }
    }

    /// The root frame.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The widget tree.
    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// The session configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The backend.
    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// The backend as its concrete type.
    pub fn backend_as<T: Backend + 'static>(&self) -> Option<&T> {
        self.backend.as_any().downcast_ref::<T>()
    }

    /// Mutable access to the backend as its concrete type.
    pub fn backend_as_mut<T: Backend + 'static>(&mut self) -> Option<&mut T> {
        self.backend.as_any_mut().downcast_mut::<T>()
    }

    /// A node's current box.
    pub fn geometry(&self, node: NodeId) -> Option<BoxGeometry> {
        self.dom.get(node).map(|data| data.geometry)
    }

    /// A node's box in screen coordinates.
    pub fn absolute_region(&self, node: NodeId) -> Option<Region> {
        self.dom.absolute_region(node)
    }

    // -- tree -------------------------------------------------------------

    /// Create a node under `parent` and its backend region.
    pub fn insert(&mut self, parent: NodeId, data: NodeData) -> Result<NodeId> {
        let parent_region = self
            .dom
            .node(parent)?
            .region
            .ok_or(Error::UnknownNode(parent))?;
        let id = self.dom.insert_child(parent, data)?;
        let geometry = self.dom.node(id)?.geometry;
        let region = self.backend.create_region(
            parent_region,
            geometry.x,
            geometry.y,
            geometry.width,
            geometry.height,
        )?;
        let node = self.dom.node_mut(id)?;
        node.region = Some(region);
        debug!(?id, ?parent, name = ?node.name, kind = ?node.kind, depth = node.depth, "node created");
        Ok(id)
    }

    /// Create an unsized frame under `parent`.
    pub fn frame(&mut self, parent: NodeId) -> Result<NodeId> {
        self.insert(parent, NodeData::frame())
    }

    /// Create an unsized widget under `parent`.
    pub fn widget(&mut self, parent: NodeId) -> Result<NodeId> {
        self.insert(parent, NodeData::widget())
    }

    // -- geometry managers ------------------------------------------------

    /// Pack `node` into its parent and re-lay out the parent.
    ///
    /// Every check runs before anything changes, so a failed call leaves the
    /// tree and all sibling boxes as they were. Without `after`/`before` the
    /// node moves to the end of the packing order.
    pub fn pack(&mut self, node: NodeId, options: PackOptions) -> Result<()> {
        let parent = self.managed_parent(node)?;
        if let Some(container) = options.in_ {
            if container != parent {
                return Err(Error::ForeignContainer { node, container });
            }
        }
        self.check_claim(parent, node, GeometryManager::Pack)?;
        let index = self.pack_index(parent, node, options.after, options.before)?;

        self.dom.move_to(node, index)?;
        let data = self.dom.node_mut(node)?;
        data.pack_info = Some(options.info);
        data.place_info = None;
        data.grid_info = None;
        data.manager = Some(GeometryManager::Pack);
        self.refresh_claim(parent)?;
        debug!(?node, ?parent, index, info = ?options.info, "packed");
        self.layout(parent)
    }

    /// Place `node` at an absolute or parent-relative position.
    ///
    /// Placing never claims the parent, so placed nodes sit alongside packed
    /// or gridded siblings.
    pub fn place(&mut self, node: NodeId, options: PlaceOptions) -> Result<()> {
        let parent = self.managed_parent(node)?;
        let data = self.dom.node_mut(node)?;
        data.place_info = Some(options);
        data.pack_info = None;
        data.grid_info = None;
        data.manager = Some(GeometryManager::Place);
        self.refresh_claim(parent)?;
        debug!(?node, ?parent, ?options, "placed");
        self.layout(parent)
    }

    /// Record a grid request for `node`.
    ///
    /// The parent is claimed for grid, but no cell geometry is computed: the node
    /// stays unpositioned and never encloses a point.
    pub fn grid(&mut self, node: NodeId, options: GridOptions) -> Result<()> {
        let parent = self.managed_parent(node)?;
        if options.columnspan == 0 || options.rowspan == 0 {
            return Err(Error::InvalidOption {
                kind: "span",
                value: format!("{}x{}", options.columnspan, options.rowspan),
            });
        }
        self.check_claim(parent, node, GeometryManager::Grid)?;

        let data = self.dom.node_mut(node)?;
        data.grid_info = Some(options);
        data.pack_info = None;
        data.place_info = None;
        data.manager = Some(GeometryManager::Grid);
        data.geometry.placed = false;
        self.refresh_claim(parent)?;
        debug!(?node, ?parent, column = options.column, row = options.row, "gridded");
        self.layout(parent)
    }

    /// Recompute the boxes of `container`'s packed and placed children, then
    /// cascade into every child that has children of its own.
    pub fn layout(&mut self, container: NodeId) -> Result<()> {
        let size = self.dom.node(container)?.geometry.size();
        let children = self.dom.children(container).to_vec();

        let mut packed = Vec::new();
        let mut placed = Vec::new();
        for &child in &children {
            let data = self.dom.node(child)?;
            match data.manager {
                Some(GeometryManager::Pack) => {
                    if let Some(info) = data.pack_info {
                        packed.push(PackChild { id: child, requested: data.requested_size(), info });
                    }
                }
                Some(GeometryManager::Place) => {
                    if let Some(options) = data.place_info {
                        let (position, extent) = place::resolve(&options, size, data.requested_size());
                        placed.push(Placement {
                            id: child,
                            x: position.x,
                            y: position.y,
                            width: extent.width,
                            height: extent.height,
                            available_width: extent.width,
                            available_height: extent.height,
                        });
                    }
                }
                Some(GeometryManager::Grid) | None => {}
            }
        }

        let placements = pack::compute(size, &packed).into_iter().chain(placed);
        for placement in placements {
            self.commit(&placement)?;
        }
        for child in children {
            if !self.dom.children(child).is_empty() {
                self.layout(child)?;
            }
        }
        Ok(())
    }

    /// Apply one placement, pushing it to the backend only when the box changed.
    fn commit(&mut self, placement: &Placement) -> Result<()> {
        let data = self.dom.node_mut(placement.id)?;
        let changed = data.geometry.update(
            placement.x,
            placement.y,
            placement.width,
            placement.height,
            placement.available_width,
            placement.available_height,
        );
        if !changed {
            return Ok(());
        }
        let geometry = data.geometry;
        if let Some(region) = data.region {
            self.backend.move_region(region, geometry.x, geometry.y)?;
            self.backend.resize_region(region, geometry.width, geometry.height)?;
        }
        Ok(())
    }

    fn managed_parent(&self, node: NodeId) -> Result<NodeId> {
        self.dom.node(node)?;
        self.dom.parent(node).ok_or(Error::RootNotManaged)
    }

    /// The manager claiming `container`'s children, ignoring `except`.
    fn claimed_by(&self, container: NodeId, except: Option<NodeId>) -> Option<GeometryManager> {
        self.dom
            .children(container)
            .iter()
            .filter(|&&child| Some(child) != except)
            .filter_map(|&child| self.dom.get(child)?.manager)
            .find(|&manager| manager != GeometryManager::Place)
    }

    fn check_claim(&self, container: NodeId, node: NodeId, requested: GeometryManager) -> Result<()> {
        match self.claimed_by(container, Some(node)) {
            Some(existing) if existing != requested => Err(Error::ManagerConflict {
                container,
                existing,
                requested,
            }),
            _ => Ok(()),
        }
    }

    fn refresh_claim(&mut self, container: NodeId) -> Result<()> {
        let claim = self.claimed_by(container, None);
        self.dom.node_mut(container)?.children_manager = claim;
        Ok(())
    }

    /// Where `node` lands in its parent's child order, counted with `node` removed.
    fn pack_index(
        &self,
        parent: NodeId,
        node: NodeId,
        after: Option<NodeId>,
        before: Option<NodeId>,
    ) -> Result<usize> {
        let siblings: Vec<NodeId> = self
            .dom
            .children(parent)
            .iter()
            .copied()
            .filter(|&child| child != node)
            .collect();
        let position = |sibling: NodeId| {
            siblings
                .iter()
                .position(|&child| child == sibling)
                .ok_or(Error::SiblingNotFound(sibling))
        };
        match (after, before) {
            (None, None) => Ok(siblings.len()),
            (Some(after), None) => Ok(position(after)? + 1),
            (None, Some(before)) => position(before),
            (Some(after), Some(before)) => {
                let (a, b) = (position(after)?, position(before)?);
                if b <= a {
                    return Err(Error::ImpossibleOrder { after, before });
                }
                Ok(a + 1)
            }
        }
    }

    // -- subscriptions ----------------------------------------------------

    /// Subscribe `node` to mouse presses. Replaces an earlier subscription but
    /// keeps its place in the tie-break order.
    pub fn register_for_mouse_event(
        &mut self,
        node: NodeId,
        callback: Option<Callback<MouseEvent>>,
        args: HandlerArgs,
    ) -> Result<()> {
        self.check_interactive(node)?;
        self.mouse_subs.register(node, callback, args);
        debug!(?node, "subscribed to mouse events");
        Ok(())
    }

    /// Subscribe `node` to key presses.
    pub fn register_for_key_event(
        &mut self,
        node: NodeId,
        callback: Option<Callback<KeyEvent>>,
        args: HandlerArgs,
    ) -> Result<()> {
        self.check_interactive(node)?;
        self.key_subs.register(node, callback, args);
        debug!(?node, "subscribed to key events");
        Ok(())
    }

    /// Shorthand for a mouse subscription without arguments.
    pub fn on_mouse<F>(&mut self, node: NodeId, callback: F) -> Result<()>
    where
        F: FnMut(&mut Ui, &mut Routed<MouseEvent>, &HandlerArgs) -> Result<()> + 'static,
    {
        self.register_for_mouse_event(node, Some(Box::new(callback)), HandlerArgs::new())
    }

    /// Shorthand for a key subscription without arguments.
    pub fn on_key<F>(&mut self, node: NodeId, callback: F) -> Result<()>
    where
        F: FnMut(&mut Ui, &mut Routed<KeyEvent>, &HandlerArgs) -> Result<()> + 'static,
    {
        self.register_for_key_event(node, Some(Box::new(callback)), HandlerArgs::new())
    }

    /// Drop `node`'s mouse subscription. Returns whether it had one.
    pub fn unregister_for_mouse_event(&mut self, node: NodeId) -> bool {
        self.mouse_subs.unregister(node)
    }

    /// Drop `node`'s key subscription. Returns whether it had one.
    pub fn unregister_for_key_event(&mut self, node: NodeId) -> bool {
        self.key_subs.unregister(node)
    }

    /// Set whether mouse events continue past `node` once it has handled them.
    pub fn set_propagates_mouse_event(&mut self, node: NodeId, propagates: bool) -> Result<()> {
        self.dom.node_mut(node)?.propagates_mouse_event = propagates;
        Ok(())
    }

    /// Set whether key events continue past `node` once it has handled them.
    pub fn set_propagates_key_event(&mut self, node: NodeId, propagates: bool) -> Result<()> {
        self.dom.node_mut(node)?.propagates_key_event = propagates;
        Ok(())
    }

    /// Mouse subscriptions, in registration order.
    pub fn mouse_subscriptions(&self) -> &Subscriptions<MouseEvent> {
        &self.mouse_subs
    }

    /// Key subscriptions, in registration order.
    pub fn key_subscriptions(&self) -> &Subscriptions<KeyEvent> {
        &self.key_subs
    }

    fn check_interactive(&self, node: NodeId) -> Result<()> {
        if self.dom.node(node)?.accepts_input() {
            Ok(())
        } else {
            Err(Error::NotInteractive(node))
        }
    }

    // -- focus and cursor -------------------------------------------------

    /// Give focus to `node`. Returns `false` when nothing changed.
    pub fn set_focus(&mut self, node: NodeId) -> Result<bool> {
        self.focus.set_focus(&mut self.dom, self.backend.as_mut(), node)
    }

    /// The focused node, if any.
    pub fn focused(&self) -> Option<NodeId> {
        self.focus.focused()
    }

    /// Drop focus. Returns the node that held it.
    pub fn clear_focus(&mut self) -> Result<Option<NodeId>> {
        self.focus.clear(&mut self.dom, self.backend.as_mut())
    }

    /// The text cursor key events are routed at.
    pub fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    /// Move the text cursor.
    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = (x, y);
    }

    // -- input ------------------------------------------------------------

    /// Poll the backend once and process whatever arrived.
    pub fn step(&mut self) -> Result<Step> {
        match self.backend.poll_input()? {
            Some(event) => self.handle_input(event),
            None => Ok(Step::Idle),
        }
    }

    /// Process one input event.
    pub fn handle_input(&mut self, event: InputEvent) -> Result<Step> {
        match event {
            InputEvent::Key(key) => {
                if self.is_quit_key(&key) {
                    debug!("quit key pressed");
                    return Ok(Step::Quit);
                }
                self.route_key(key)?;
            }
            InputEvent::Mouse(mouse) => {
                self.route_mouse(mouse)?;
            }
            InputEvent::Resize { width, height } => self.resize(width, height)?,
        }
        Ok(Step::Handled)
    }

    fn is_quit_key(&self, key: &KeyEvent) -> bool {
        key.code == Key::Char(self.config.quit_key)
            && !key.modifiers.contains(Modifiers::CTRL)
            && !key.modifiers.contains(Modifiers::ALT)
    }

    /// Resize the root to the new surface size and re-lay out the tree.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        let size = Size::new(i32::from(width), i32::from(height));
        let data = self.dom.node_mut(self.root)?;
        data.requested = Some(size);
        data.geometry.update(0, 0, size.width, size.height, size.width, size.height);
        if let Some(region) = data.region {
            self.backend.resize_region(region, size.width, size.height)?;
        }
        debug!(width, height, "surface resized");
        self.layout(self.root)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
