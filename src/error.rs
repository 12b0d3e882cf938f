//! Crate error type.
//!
//! Configuration errors are returned from the offending call and never leave a
//! container half laid out. Lookup misses (an event reaching a node without a
//! callback) are not errors at all.

use crate::dom::node::NodeId;
use crate::layout::options::GeometryManager;

/// Errors returned by tree, layout and routing operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),
    #[error("the root node has no parent to be managed by")]
    RootNotManaged,
    #[error("container {container:?} already manages its children with {existing}, cannot use {requested}")]
    ManagerConflict {
        container: NodeId,
        existing: GeometryManager,
        requested: GeometryManager,
    },
    #[error("sibling {0:?} is not in the container's current child order")]
    SiblingNotFound(NodeId),
    #[error("cannot place a node after {after:?} and before {before:?}: {before:?} comes first")]
    ImpossibleOrder { after: NodeId, before: NodeId },
    #[error("{node:?} can only be packed into its parent, not {container:?}")]
    ForeignContainer { node: NodeId, container: NodeId },
    #[error("invalid {kind} {value:?}")]
    InvalidOption { kind: &'static str, value: String },
    #[error("node {0:?} is a frame and does not accept input")]
    NotInteractive(NodeId),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
