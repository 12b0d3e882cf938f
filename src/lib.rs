//! # tktui
//!
//! A Tkinter-style retained widget toolkit for text terminals.
//!
//! tktui keeps a tree of rectangular boxes, lays them out with Tk's pack
//! algorithm (side, expand, fill, anchor, padding), and routes mouse and key
//! input to subscribed widgets deepest-first with exclusive focus tracking.
//! Drawing is left to a [`Backend`](backend::Backend): the bundled crossterm
//! backend paints focus feedback, the headless one records it for tests.
//!
//! ## Core Systems
//!
//! - **[`layout`]**: Pack engine, place resolver, grid intent and option enums
//! - **[`dom`]**: Slotmap-backed node arena with depth and box geometry
//! - **[`event`]**: Input events, subscriptions, hit-testing and dispatch
//! - **[`focus`]**: Single-holder focus with defocus-on-switch
//! - **[`backend`]**: Backend trait, headless and crossterm implementations
//! - **[`app`]**: `Ui` session context and `AppConfig`
//! - **[`testing`]**: `Pilot` and layout snapshot helpers
//! - **[`geometry`]**: Offset, Size, Region, BoxGeometry primitives
//!
//! ```
//! use tktui::prelude::*;
//!
//! let mut ui = Ui::new(HeadlessBackend::new(100, 10), AppConfig::default());
//! let root = ui.root();
//! let left = ui.insert(root, NodeData::widget().size(20, 10)).unwrap();
//! let right = ui.insert(root, NodeData::widget().size(20, 10)).unwrap();
//! let middle = ui.insert(root, NodeData::widget().size(1, 1)).unwrap();
//! ui.pack(left, PackOptions::new().side(Side::Left)).unwrap();
//! ui.pack(right, PackOptions::new().side(Side::Right)).unwrap();
//! ui.pack(middle, PackOptions::new().side(Side::Left).expand(true).fill(Fill::Both)).unwrap();
//! assert_eq!(ui.geometry(middle).unwrap().width, 60);
//! ```

// Foundation
pub mod error;
pub mod geometry;

// Core systems
pub mod dom;
pub mod layout;

// Events and focus
pub mod event;
pub mod focus;

// Backends
pub mod backend;

// Application
pub mod app;

// Testing
pub mod testing;

pub use error::{Error, Result};

/// The types most sessions need.
pub mod prelude {
    pub use crate::app::{AppConfig, Step, Ui};
    pub use crate::backend::{Backend, HeadlessBackend, Palette, StyleToken, TerminalBackend};
    pub use crate::dom::{NodeData, NodeId};
    pub use crate::error::{Error, Result};
    pub use crate::event::{HandlerArgs, Key, KeyEvent, MouseEvent, Routed};
    pub use crate::layout::{Anchor, Fill, GridOptions, PackOptions, PlaceOptions, Side, Sticky};
}
