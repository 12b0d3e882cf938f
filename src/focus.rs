//! Exclusive keyboard focus.
//!
//! [`FocusManager`] tracks the single focused node. Switching focus defocuses the
//! previous holder before the new one is styled, so at most one node ever carries
//! the focused background.

use tracing::debug;

use crate::backend::{Backend, StyleToken};
use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::error::Result;

/// Holds at most one focused node.
#[derive(Debug, Default)]
pub struct FocusManager {
    focused: Option<NodeId>,
}

impl FocusManager {
    /// Nothing focused.
    pub fn new() -> Self {
        Self::default()
    }

    /// The focused node, if any.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Give focus to `node`.
    ///
    /// Returns `Ok(false)` without touching anything when the node is not
    /// focusable or already holds focus.
    pub fn set_focus(&mut self, dom: &mut Dom, backend: &mut dyn Backend, node: NodeId) -> Result<bool> {
        let data = dom.node(node)?;
        if !data.focusable || self.focused == Some(node) {
            return Ok(false);
        }

        let previous = self.clear(dom, backend)?;
        let data = dom.node_mut(node)?;
        data.focused = true;
        self.focused = Some(node);
        if let Some(region) = data.region {
            backend.set_background(region, StyleToken::Focused)?;
        }
        debug!(?previous, ?node, "focus changed");
        Ok(true)
    }

    /// Drop focus, restoring the holder's default background. Returns the node
    /// that lost focus.
    pub fn clear(&mut self, dom: &mut Dom, backend: &mut dyn Backend) -> Result<Option<NodeId>> {
        let Some(previous) = self.focused.take() else {
            return Ok(None);
        };
        if let Some(data) = dom.get_mut(previous) {
            data.focused = false;
            if let Some(region) = data.region {
                backend.set_background(region, StyleToken::Default)?;
            }
        }
        Ok(Some(previous))
    }
}
