//! Widget tree: slotmap-backed arena of frames and widgets.

pub mod node;
pub mod tree;

pub use node::{NodeData, NodeId, NodeKind};
pub use tree::Dom;
