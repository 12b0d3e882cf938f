//! Geometry managers: pack (computed), place (computed), grid (intent only).

pub mod options;
pub mod pack;
pub mod place;

pub use options::{
    Align, Anchor, Fill, GeometryManager, GridOptions, PackInfo, PackOptions, PlaceOptions, Side,
    Sticky,
};
pub use pack::{PackChild, Placement};
