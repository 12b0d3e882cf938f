//! Layout snapshot helpers.
//!
//! Turn a widget tree into an indented plain-text dump of every box, suitable
//! for snapshot tests and quick assertions.

use std::fmt::Write;

use crate::dom::node::{NodeId, NodeKind};
use crate::dom::tree::Dom;
use crate::layout::options::GeometryManager;

/// Dump the tree under the root, one node per line.
///
/// Each line is indented two spaces per depth level and reads
/// `label x,y widthxheight [manager]`; unplaced nodes show `unplaced` instead of
/// a position and focused nodes end with `*`.
pub fn layout_to_string(dom: &Dom) -> String {
    match dom.root() {
        Some(root) => subtree_to_string(dom, root),
        None => String::new(),
    }
}

/// Dump the subtree rooted at `start`. Indentation is relative to `start`.
pub fn subtree_to_string(dom: &Dom, start: NodeId) -> String {
    let base = dom.depth(start).unwrap_or(0);
    let mut out = String::new();
    for id in dom.walk_depth_first(start) {
        let Some(node) = dom.get(id) else {
            continue;
        };
        let indent = "  ".repeat((node.depth - base) as usize);
        let label = node.name.clone().unwrap_or_else(|| match node.kind {
            NodeKind::Frame => "frame".to_string(),
            NodeKind::Widget => "widget".to_string(),
        });
        let g = node.geometry;
        let _ = write!(out, "{indent}{label} ");
        if g.placed {
            let _ = write!(out, "{},{} ", g.x, g.y);
        } else {
            out.push_str("unplaced ");
        }
        let _ = write!(out, "{}x{}", g.width, g.height);
        if let Some(manager) = node.manager {
            let _ = write!(out, " [{manager}]");
        }
        if node.focused {
            out.push_str(" *");
        }
        out.push('\n');
    }
    out
}
