//! Headless testing framework: Pilot, layout snapshot helpers.
//!
//! Use the [`Pilot`] to drive a [`Ui`](crate::app::Ui) without a real terminal.
//! Use [`layout_to_string`] to capture the tree's boxes as plain text for
//! snapshot-style assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::layout_to_string;
