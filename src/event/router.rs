//! Hit-testing, ordering and dispatch of routed input.
//!
//! A route collects the subscribed nodes whose boxes enclose the event point,
//! orders them deepest first (ties keep registration order), hands focus to the
//! first focusable hit for mouse presses, then runs callbacks until one of the
//! hit nodes stops propagation.

use std::cmp::Reverse;

use tracing::{debug, trace};

use super::input::{KeyEvent, MouseEvent};
use super::subscription::Subscriptions;
use crate::app::Ui;
use crate::dom::node::{NodeData, NodeId};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Routed
// ---------------------------------------------------------------------------

/// The event as seen by a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Routed<E> {
    /// Screen position the route hit-tested at.
    pub x: i32,
    pub y: i32,
    pub event: E,
    widget: Option<NodeId>,
    stopped: bool,
}

impl<E> Routed<E> {
    fn new(x: i32, y: i32, event: E) -> Self {
        Self { x, y, event, widget: None, stopped: false }
    }

    /// The node whose callback is running.
    pub fn widget(&self) -> Option<NodeId> {
        self.widget
    }

    /// Stop the event after the current callback returns.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Whether propagation has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

/// Outcome of one route.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dispatch {
    /// Hit nodes in dispatch order.
    pub hits: Vec<NodeId>,
    /// Nodes whose turn came before the event stopped.
    pub visited: Vec<NodeId>,
    /// Node that received focus from this route.
    pub focused: Option<NodeId>,
}

impl Dispatch {
    /// Whether any subscribed node was hit.
    pub fn is_hit(&self) -> bool {
        !self.hits.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

impl Ui {
    /// Route a mouse event.
    ///
    /// Every mouse report moves the text cursor when the config asks for it;
    /// only a primary-button press is dispatched.
    pub fn route_mouse(&mut self, event: MouseEvent) -> Result<Dispatch> {
        if self.config.cursor_follows_mouse {
            self.cursor = (event.x, event.y);
        }
        if !event.is_primary_press() {
            return Ok(Dispatch::default());
        }

        let hits = self.hit_set(&self.mouse_subs, event.x, event.y);
        if hits.is_empty() {
            trace!(x = event.x, y = event.y, "mouse press hit nothing");
            return Ok(Dispatch::default());
        }
        debug!(x = event.x, y = event.y, hits = hits.len(), "routing mouse press");

        let mut focused = None;
        let target = hits
            .iter()
            .copied()
            .find(|&node| self.dom.get(node).is_some_and(|data| data.focusable));
        if let Some(node) = target {
            if self.set_focus(node)? {
                focused = Some(node);
            }
        }

        let routed = Routed::new(event.x, event.y, event);
        let visited = self.dispatch(&hits, routed, mouse_subs, |data| data.propagates_mouse_event)?;
        Ok(Dispatch { hits, visited, focused })
    }

    /// Route a key event to the nodes under the text cursor. Focus is left alone.
    pub fn route_key(&mut self, event: KeyEvent) -> Result<Dispatch> {
        let (x, y) = self.cursor;
        let hits = self.hit_set(&self.key_subs, x, y);
        if hits.is_empty() {
            trace!(x, y, key = ?event.code, "key hit nothing");
            return Ok(Dispatch::default());
        }
        debug!(x, y, key = ?event.code, hits = hits.len(), "routing key");

        let routed = Routed::new(x, y, event);
        let visited = self.dispatch(&hits, routed, key_subs, |data| data.propagates_key_event)?;
        Ok(Dispatch { hits, visited, focused: None })
    }

    /// Whether `node` has been positioned and its region contains (x, y).
    pub fn encloses(&self, node: NodeId, x: i32, y: i32) -> bool {
        let Some(data) = self.dom.get(node) else {
            return false;
        };
        if !data.geometry.placed {
            return false;
        }
        data.region
            .is_some_and(|region| self.backend.region_contains(region, x, y))
    }

    /// Subscribed nodes enclosing (x, y), deepest first.
    fn hit_set<E>(&self, subs: &Subscriptions<E>, x: i32, y: i32) -> Vec<NodeId> {
        let mut hits: Vec<NodeId> = subs
            .nodes()
            .iter()
            .copied()
            .filter(|&node| self.encloses(node, x, y))
            .collect();
        // Stable: equal depths keep registration order.
        hits.sort_by_key(|&node| Reverse(self.dom.depth(node).unwrap_or(0)));
        hits
    }

    fn dispatch<E>(
        &mut self,
        hits: &[NodeId],
        mut routed: Routed<E>,
        subs: fn(&mut Ui) -> &mut Subscriptions<E>,
        propagates: fn(&NodeData) -> bool,
    ) -> Result<Vec<NodeId>> {
        let mut visited = Vec::with_capacity(hits.len());
        for &node in hits {
            // Unregistered by an earlier callback in this route.
            let Some(checkout) = subs(self).checkout(node) else {
                continue;
            };
            visited.push(node);
            routed.widget = Some(node);

            // Without a callback the node neither acts nor stops the event.
            let Some(mut callback) = checkout.callback else {
                continue;
            };
            trace!(?node, "running handler");
            let outcome = callback(self, &mut routed, checkout.args.as_ref());
            subs(self).restore(node, callback, checkout.generation);
            outcome?;

            if self.dom.get(node).is_some_and(|data| !propagates(data)) {
                routed.stop();
            }
            if routed.is_stopped() {
                trace!(?node, "propagation stopped");
                break;
            }
        }
        Ok(visited)
    }
}

fn mouse_subs(ui: &mut Ui) -> &mut Subscriptions<MouseEvent> {
    &mut ui.mouse_subs
}

fn key_subs(ui: &mut Ui) -> &mut Subscriptions<KeyEvent> {
    &mut ui.key_subs
}
