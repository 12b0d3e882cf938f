//! Subscription registry: one callback slot per node per event class.
//!
//! Registration order is remembered so the router can break depth ties
//! deterministically. Re-registering a node replaces its entry in place.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use slotmap::SecondaryMap;

use super::router::Routed;
use crate::app::Ui;
use crate::dom::node::NodeId;
use crate::error::Result;

/// A handler invoked with the session, the routed event and the stored args.
pub type Callback<E> = Box<dyn FnMut(&mut Ui, &mut Routed<E>, &HandlerArgs) -> Result<()>>;

// ---------------------------------------------------------------------------
// HandlerArgs
// ---------------------------------------------------------------------------

/// A value stored alongside a subscription and handed back to its callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Bool(bool),
    Int(i64),
    Text(String),
    Node(NodeId),
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        ArgValue::Bool(v)
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        ArgValue::Int(v)
    }
}

impl From<i32> for ArgValue {
    fn from(v: i32) -> Self {
        ArgValue::Int(i64::from(v))
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        ArgValue::Text(v.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        ArgValue::Text(v)
    }
}

impl From<NodeId> for ArgValue {
    fn from(v: NodeId) -> Self {
        ArgValue::Node(v)
    }
}

/// Positional and named arguments captured at registration time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerArgs {
    pub positional: Vec<ArgValue>,
    pub named: BTreeMap<String, ArgValue>,
}

impl HandlerArgs {
    /// No arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument (builder).
    pub fn arg(mut self, value: impl Into<ArgValue>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Add a named argument (builder). A repeated name overwrites.
    pub fn named(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    /// Look up a named argument.
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.named.get(name)
    }
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

struct Subscription<E> {
    /// `None` while the callback is running, or when registered without one.
    callback: Option<Callback<E>>,
    args: Rc<HandlerArgs>,
    generation: u64,
}

/// A callback checked out for a dispatch. Hand it back with
/// [`Subscriptions::restore`].
pub(crate) struct Checkout<E> {
    pub callback: Option<Callback<E>>,
    pub args: Rc<HandlerArgs>,
    pub generation: u64,
}

/// Subscriptions for one event class, in registration order.
pub struct Subscriptions<E> {
    order: Vec<NodeId>,
    entries: SecondaryMap<NodeId, Subscription<E>>,
    next_generation: u64,
}

impl<E> Subscriptions<E> {
    /// An empty registry.
    pub fn new() -> Self {
        Self { order: Vec::new(), entries: SecondaryMap::new(), next_generation: 0 }
    }

    /// Register `node`, replacing any earlier entry but keeping its position.
    pub fn register(&mut self, node: NodeId, callback: Option<Callback<E>>, args: HandlerArgs) {
        let generation = self.next_generation;
        self.next_generation += 1;
        let entry = Subscription { callback, args: Rc::new(args), generation };
        if self.entries.insert(node, entry).is_none() {
            self.order.push(node);
        }
    }

    /// Drop `node`'s entry. Returns whether one existed.
    pub fn unregister(&mut self, node: NodeId) -> bool {
        if self.entries.remove(node).is_none() {
            return false;
        }
        self.order.retain(|&n| n != node);
        true
    }

    /// Whether `node` is registered.
    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.contains_key(node)
    }

    /// Registered nodes, oldest registration first.
    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }

    /// The stored arguments for `node`.
    pub fn args(&self, node: NodeId) -> Option<&HandlerArgs> {
        self.entries.get(node).map(|entry| entry.args.as_ref())
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Take `node`'s callback out for the duration of a call.
    pub(crate) fn checkout(&mut self, node: NodeId) -> Option<Checkout<E>> {
        let entry = self.entries.get_mut(node)?;
        Some(Checkout {
            callback: entry.callback.take(),
            args: Rc::clone(&entry.args),
            generation: entry.generation,
        })
    }

    /// Put a checked-out callback back, unless the entry was replaced or
    /// removed in the meantime.
    pub(crate) fn restore(&mut self, node: NodeId, callback: Callback<E>, generation: u64) {
        if let Some(entry) = self.entries.get_mut(node) {
            if entry.generation == generation {
                entry.callback = Some(callback);
            }
        }
    }
}

impl<E> Default for Subscriptions<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Subscriptions<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriptions").field("order", &self.order).finish_non_exhaustive()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
