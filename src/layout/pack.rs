//! The pack geometry manager.
//!
//! [`compute`] is a pure function from a container size and its ordered packed
//! children to one [`Placement`] per child. Children are placed against the
//! container edges in order, each one shrinking the remaining cavity:
//!
//! 1. Children are split into the lateral group (`left`/`right`) and the
//!    longitudinal group (`top`/`bottom`). Each group sums the footprint of its
//!    non-expanding members along its primary axis and reserves the largest
//!    footprint the other group has along that same axis.
//! 2. Whatever is left is divided evenly between the group's expanding members.
//! 3. A walk in insertion order hands each child a parcel, sizes it (fill only
//!    applies to expanding children), anchors it inside the parcel and advances
//!    the cursor for its side by the full parcel.

use tracing::trace;

use crate::dom::node::NodeId;
use crate::geometry::Size;

use super::options::{Fill, PackInfo, Side};

/// One packed child as seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackChild {
    pub id: NodeId,
    /// The node's own size before padding.
    pub requested: Size,
    pub info: PackInfo,
}

/// Geometry computed for one child, in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub id: NodeId,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub available_width: i32,
    pub available_height: i32,
}

/// Per-child sizes derived from requested size and padding.
#[derive(Debug, Clone, Copy)]
struct Footprint {
    /// Requested size plus inner padding on both sides.
    content: Size,
    /// Outer padding on each side.
    padx: i32,
    pady: i32,
}

impl Footprint {
    fn of(child: &PackChild) -> Self {
        let info = &child.info;
        let requested = child.requested.clamped();
        Self {
            content: Size::new(
                requested.width.saturating_add(2 * i32::from(info.ipadx)),
                requested.height.saturating_add(2 * i32::from(info.ipady)),
            ),
            padx: i32::from(info.padx),
            pady: i32::from(info.pady),
        }
    }

    /// Outer width: content plus outer padding.
    fn outer_width(&self) -> i32 {
        self.content.width.saturating_add(2 * self.padx)
    }

    /// Outer height: content plus outer padding.
    fn outer_height(&self) -> i32 {
        self.content.height.saturating_add(2 * self.pady)
    }
}

/// Running totals for one side group.
#[derive(Debug, Default, Clone, Copy)]
struct GroupTotals {
    expand_count: i32,
    non_expand_total: i32,
}

/// Expansion sizes for the two groups: `(lateral width, longitudinal height)`.
fn expansion_sizes(container: Size, children: &[PackChild]) -> (i32, i32) {
    let mut lateral = GroupTotals::default();
    let mut longitudinal = GroupTotals::default();
    // Largest footprint each group has along the other group's primary axis.
    let mut lateral_max_height = 0;
    let mut longitudinal_max_width = 0;

    for child in children {
        let fp = Footprint::of(child);
        if child.info.side.is_lateral() {
            if child.info.expand {
                lateral.expand_count += 1;
            } else {
                lateral.non_expand_total =
                    lateral.non_expand_total.saturating_add(fp.outer_width());
            }
            lateral_max_height = lateral_max_height.max(fp.outer_height());
        } else {
            if child.info.expand {
                longitudinal.expand_count += 1;
            } else {
                longitudinal.non_expand_total =
                    longitudinal.non_expand_total.saturating_add(fp.outer_height());
            }
            longitudinal_max_width = longitudinal_max_width.max(fp.outer_width());
        }
    }

    let share = |extent: i32, totals: GroupTotals, reserved: i32| {
        if totals.expand_count == 0 {
            0
        } else {
            let free = extent.saturating_sub(totals.non_expand_total).saturating_sub(reserved);
            (free / totals.expand_count).max(0)
        }
    };

    (
        share(container.width, lateral, longitudinal_max_width),
        share(container.height, longitudinal, lateral_max_height),
    )
}

/// The remaining cavity, as four cursors moving inward from the container edges.
#[derive(Debug, Clone, Copy)]
struct Cavity {
    left: i32,
    right: i32,
    top: i32,
    bottom: i32,
}

impl Cavity {
    fn width(&self) -> i32 {
        self.right.saturating_sub(self.left).max(0)
    }

    fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top).max(0)
    }
}

/// An extent plus outer padding on both sides, saturating at `i32::MAX`.
fn outer(extent: i32, pad: i32) -> i32 {
    extent.saturating_add(2 * pad)
}

/// Compute placements for every child of a container of size `container`.
///
/// `children` must be in packing order. The result has one entry per child, in
/// the same order. Sizes are never negative.
pub fn compute(container: Size, children: &[PackChild]) -> Vec<Placement> {
    let container = container.clamped();
    let (expand_width, expand_height) = expansion_sizes(container, children);
    let mut cavity = Cavity { left: 0, right: container.width, top: 0, bottom: container.height };
    let mut placements = Vec::with_capacity(children.len());

    for child in children {
        let info = &child.info;
        let fp = Footprint::of(child);
        let fill = if info.expand { info.fill } else { Fill::None };

        // Parcel extent per axis, excluding outer padding. The primary axis gets
        // the expansion share, the cross axis gets whatever the cavity has left.
        let (allot_width, allot_height) = if info.side.is_lateral() {
            (
                (expand_width - 2 * fp.padx).max(fp.content.width),
                (cavity.height() - 2 * fp.pady).max(fp.content.height),
            )
        } else {
            (
                (cavity.width() - 2 * fp.padx).max(fp.content.width),
                (expand_height - 2 * fp.pady).max(fp.content.height),
            )
        };

        let width = if fill.covers_x() { allot_width } else { fp.content.width };
        let height = if fill.covers_y() { allot_height } else { fp.content.height };
        let (available_width, available_height) = if info.expand {
            (allot_width, allot_height)
        } else {
            (fp.content.width, fp.content.height)
        };

        let (parcel_x, parcel_y) = match info.side {
            Side::Left => {
                let x = cavity.left.saturating_add(fp.padx);
                cavity.left = cavity.left.saturating_add(outer(available_width, fp.padx));
                (x, cavity.top.saturating_add(fp.pady))
            }
            Side::Right => {
                cavity.right = cavity.right.saturating_sub(outer(available_width, fp.padx));
                (cavity.right.saturating_add(fp.padx), cavity.top.saturating_add(fp.pady))
            }
            Side::Top => {
                let y = cavity.top.saturating_add(fp.pady);
                cavity.top = cavity.top.saturating_add(outer(available_height, fp.pady));
                (cavity.left.saturating_add(fp.padx), y)
            }
            Side::Bottom => {
                cavity.bottom = cavity.bottom.saturating_sub(outer(available_height, fp.pady));
                (cavity.left.saturating_add(fp.padx), cavity.bottom.saturating_add(fp.pady))
            }
        };

        let placement = Placement {
            id: child.id,
            x: parcel_x.saturating_add(info.anchor.horizontal().offset(available_width, width)),
            y: parcel_y.saturating_add(info.anchor.vertical().offset(available_height, height)),
            width: width.max(0),
            height: height.max(0),
            available_width: available_width.max(0),
            available_height: available_height.max(0),
        };
        trace!(?placement, side = ?info.side, "pack placement");
        placements.push(placement);
    }

    placements
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::NodeData;
    use crate::dom::tree::Dom;
    use crate::layout::options::{Anchor, PackOptions};

    /// Helper to mint NodeIds (they come from the DOM arena).
    fn ids(count: usize) -> Vec<NodeId> {
        let mut dom = Dom::new();
        (0..count).map(|_| dom.insert(NodeData::frame())).collect()
    }

    fn child(id: NodeId, width: i32, height: i32, opts: PackOptions) -> PackChild {
        PackChild { id, requested: Size::new(width, height), info: opts.info }
    }

    fn span_x(p: &Placement) -> (i32, i32) {
        (p.x, p.x + p.width)
    }

    #[test]
    fn empty_container_has_no_placements() {
        assert!(compute(Size::new(10, 10), &[]).is_empty());
    }

    #[test]
    fn left_and_right_consume_from_both_edges() {
        let n = ids(2);
        let children = [
            child(n[0], 20, 5, PackOptions::new().side(Side::Left)),
            child(n[1], 20, 5, PackOptions::new().side(Side::Right)),
        ];
        let out = compute(Size::new(100, 10), &children);
        assert_eq!(span_x(&out[0]), (0, 20));
        assert_eq!(span_x(&out[1]), (80, 100));
    }

    #[test]
    fn expanding_fill_child_takes_the_remainder() {
        let n = ids(3);
        let children = [
            child(n[0], 20, 5, PackOptions::new().side(Side::Left)),
            child(n[1], 20, 5, PackOptions::new().side(Side::Right)),
            child(
                n[2],
                1,
                1,
                PackOptions::new().side(Side::Left).expand(true).fill(Fill::Both),
            ),
        ];
        let out = compute(Size::new(100, 10), &children);
        assert_eq!(span_x(&out[2]), (20, 80));
        assert_eq!(out[2].width, 60);
        assert_eq!(out[2].height, 10);
    }

    #[test]
    fn top_children_stack_downward_and_bottom_upward() {
        let n = ids(3);
        let children = [
            child(n[0], 10, 3, PackOptions::new()),
            child(n[1], 10, 4, PackOptions::new()),
            child(n[2], 10, 2, PackOptions::new().side(Side::Bottom)),
        ];
        let out = compute(Size::new(40, 20), &children);
        assert_eq!((out[0].y, out[0].height), (0, 3));
        assert_eq!((out[1].y, out[1].height), (3, 4));
        assert_eq!((out[2].y, out[2].height), (18, 2));
        assert!(out.iter().all(|p| p.x == 0));
    }

    #[test]
    fn non_expanding_children_never_exceed_container() {
        let n = ids(4);
        let children = [
            child(n[0], 10, 1, PackOptions::new().side(Side::Left).pad(2, 0)),
            child(n[1], 15, 1, PackOptions::new().side(Side::Right)),
            child(n[2], 5, 1, PackOptions::new().side(Side::Left).ipad(1, 0)),
            child(n[3], 8, 1, PackOptions::new().side(Side::Right)),
        ];
        // Footprints: 14 + 15 + 7 + 8 = 44 <= 50.
        let out = compute(Size::new(50, 3), &children);
        for p in &out {
            assert!(p.x >= 0, "{p:?}");
            assert!(p.x + p.width <= 50, "{p:?}");
        }
        assert_eq!(out[0].x, 2);
        assert_eq!(out[2].x, 14);
        assert_eq!(out[2].width, 7);
        assert_eq!(out[1].x, 35);
        assert_eq!(out[3].x, 27);
    }

    #[test]
    fn expansion_is_shared_evenly() {
        let n = ids(3);
        let expand = PackOptions::new().side(Side::Left).expand(true);
        let children = [
            child(n[0], 2, 1, expand),
            child(n[1], 2, 1, expand),
            child(n[2], 2, 1, expand),
        ];
        let out = compute(Size::new(31, 1), &children);
        for p in &out {
            assert!((p.available_width - 10).abs() <= 1, "{p:?}");
            // No fill: the box keeps its own width inside the parcel.
            assert_eq!(p.width, 2);
        }
        assert_eq!(out[1].x, 10);
        assert_eq!(out[2].x, 20);
    }

    #[test]
    fn lateral_children_reserve_height_for_longitudinal_expansion() {
        let n = ids(2);
        let children = [
            child(n[0], 5, 4, PackOptions::new().side(Side::Left)),
            child(n[1], 5, 1, PackOptions::new().expand(true).fill(Fill::Y)),
        ];
        let out = compute(Size::new(20, 10), &children);
        // The left child reserves its 4 rows; the top child expands into the other 6.
        assert_eq!(out[1].height, 6);
        assert_eq!(out[1].x, 5);
    }

    #[test]
    fn anchor_positions_expanded_child_without_fill() {
        let n = ids(1);
        let children = [child(
            n[0],
            4,
            2,
            PackOptions::new().expand(true).anchor(Anchor::Center),
        )];
        let out = compute(Size::new(20, 10), &children);
        let p = out[0];
        assert_eq!((p.available_width, p.available_height), (20, 10));
        assert_eq!((p.width, p.height), (4, 2));
        assert_eq!((p.x, p.y), (8, 4));
    }

    #[test]
    fn anchor_governs_the_axis_fill_leaves_free() {
        let n = ids(1);
        let children = [child(
            n[0],
            4,
            2,
            PackOptions::new().expand(true).fill(Fill::X).anchor(Anchor::S),
        )];
        let out = compute(Size::new(20, 10), &children);
        let p = out[0];
        assert_eq!((p.x, p.width), (0, 20));
        assert_eq!((p.y, p.height), (8, 2));
    }

    #[test]
    fn fill_without_expand_is_ignored() {
        let n = ids(1);
        let children = [child(n[0], 4, 2, PackOptions::new().fill(Fill::Both))];
        let out = compute(Size::new(20, 10), &children);
        assert_eq!((out[0].width, out[0].height), (4, 2));
        assert_eq!((out[0].available_width, out[0].available_height), (4, 2));
    }

    #[test]
    fn overfull_container_clamps_expansion_to_zero() {
        let n = ids(2);
        let children = [
            child(n[0], 30, 1, PackOptions::new().side(Side::Left)),
            child(
                n[1],
                0,
                1,
                PackOptions::new().side(Side::Left).expand(true).fill(Fill::X),
            ),
        ];
        let out = compute(Size::new(20, 1), &children);
        assert_eq!(out[1].width, 0);
        assert_eq!(out[1].x, 30);
    }

    #[test]
    fn padding_offsets_the_box() {
        let n = ids(1);
        let children = [child(n[0], 4, 2, PackOptions::new().pad(1, 2).ipad(1, 1))];
        let out = compute(Size::new(20, 10), &children);
        let p = out[0];
        assert_eq!((p.x, p.y), (1, 2));
        assert_eq!((p.width, p.height), (6, 4));
    }

    #[test]
    fn huge_requested_sizes_saturate() {
        let n = ids(3);
        let children = [
            child(n[0], i32::MAX, 1, PackOptions::new().side(Side::Left).pad(2, 0).ipad(3, 0)),
            child(n[1], 1, 1, PackOptions::new().side(Side::Left).expand(true).fill(Fill::Both)),
            child(n[2], 1, i32::MAX, PackOptions::new().side(Side::Bottom)),
        ];
        let out = compute(Size::new(80, 24), &children);
        assert_eq!((out[0].x, out[0].width), (2, i32::MAX));
        // The cavity is exhausted, so the expanding child keeps its content size.
        assert_eq!((out[1].x, out[1].width), (i32::MAX, 1));
        assert_eq!((out[2].width, out[2].height), (1, i32::MAX));
    }
}
