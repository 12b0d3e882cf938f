//! Event system: raw input, subscriptions, routing.

pub mod input;
pub mod router;
pub mod subscription;

pub use input::{InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseBtn, MouseEvent};
pub use router::{Dispatch, Routed};
pub use subscription::{ArgValue, Callback, HandlerArgs, Subscriptions};
