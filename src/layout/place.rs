//! The place geometry manager: absolute and parent-relative positioning.

use crate::geometry::{Offset, Size};

use super::options::PlaceOptions;

/// Resolve a place request against the parent's size and the node's own size.
///
/// Returns the position (parent coordinates) and the final size. Relative values
/// are truncated toward zero; sizes never go negative.
pub fn resolve(opts: &PlaceOptions, parent: Size, requested: Size) -> (Offset, Size) {
    let scale = |extent: i32, rel: f32| (extent as f32 * rel) as i32;

    let position = Offset::new(
        opts.x.saturating_add(scale(parent.width, opts.relx)),
        opts.y.saturating_add(scale(parent.height, opts.rely)),
    );
    let width = opts
        .width
        .or_else(|| opts.relwidth.map(|rel| scale(parent.width, rel)))
        .unwrap_or(requested.width);
    let height = opts
        .height
        .or_else(|| opts.relheight.map(|rel| scale(parent.height, rel)))
        .unwrap_or(requested.height);

    (position, Size::new(width, height).clamped())
}
