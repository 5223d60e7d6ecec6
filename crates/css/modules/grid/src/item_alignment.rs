//! Item placement inside grid areas: self-alignment, stretch and auto margins.
//!
//! Spec: §11 Alignment and Spacing, CSS Box Alignment §6 Self-Alignment
//! <https://www.w3.org/TR/css-grid-2/#alignment>
//! <https://www.w3.org/TR/css-align-3/#self-alignment>

use crate::alignment::{Direction, ItemPosition, OverflowAlignment, SelfAlignment, WritingMode};
use crate::content_distribution::GridAxisLines;
use crate::line_resolution::GridCoordinate;
use crate::types::{
    GridAxis, GridAxisPair, GridItem, GridItemContent, ItemAxisBox, ItemHandle, ItemSize,
};

/// One layout unit; sizes closer than this to the area breadth do not overflow it.
const LAYOUT_UNIT: f32 = 1.0 / 64.0;

/// Edge of the grid area an item is flushed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAxisPosition {
    Start,
    End,
    Center,
}

/// Container properties that item self-alignment resolves against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemAlignmentContext {
    /// `justify-items`
    pub justify_items: SelfAlignment,
    /// `align-items`
    pub align_items: SelfAlignment,
    /// The container's inline direction
    pub direction: Direction,
    /// The container's writing mode
    pub writing_mode: WritingMode,
}

impl ItemAlignmentContext {
    /// Used self-alignment of `item` along `axis`.
    pub fn resolved_alignment<NodeId>(
        &self,
        item: &GridItem<NodeId>,
        axis: GridAxis,
    ) -> SelfAlignment {
        let container_default = match axis {
            GridAxis::Row => self.align_items,
            GridAxis::Column => self.justify_items,
        };
        item.self_alignment(axis).resolve(container_default)
    }

    /// Check if the item's `self-start` side is the area's start side along `axis`.
    fn self_start_is_start<NodeId>(&self, item: &GridItem<NodeId>, axis: GridAxis) -> bool {
        if item.writing_mode.is_orthogonal_to(self.writing_mode) {
            // The axis runs along the item's other axis.
            return match axis {
                GridAxis::Row => item.direction.is_ltr() != self.writing_mode.is_flipped_blocks(),
                GridAxis::Column => {
                    self.direction.is_ltr() != item.writing_mode.is_flipped_blocks()
                }
            };
        }
        match axis {
            GridAxis::Row => item.writing_mode == self.writing_mode,
            GridAxis::Column => item.direction == self.direction,
        }
    }

    /// Map a used self-alignment keyword to an edge of the grid area.
    pub fn axis_position<NodeId>(
        &self,
        item: &GridItem<NodeId>,
        axis: GridAxis,
        position: ItemPosition,
    ) -> GridAxisPosition {
        let container_ltr = self.direction.is_ltr();
        match position {
            ItemPosition::SelfStart if !self.self_start_is_start(item, axis) => {
                GridAxisPosition::End
            }
            ItemPosition::SelfEnd if self.self_start_is_start(item, axis) => {
                GridAxisPosition::End
            }
            // `left`/`right` only apply along the inline axis; elsewhere they are `start`.
            ItemPosition::Left if axis.is_inline() && !container_ltr => GridAxisPosition::End,
            ItemPosition::Right if axis.is_inline() && container_ltr => GridAxisPosition::End,
            ItemPosition::Center => GridAxisPosition::Center,
            ItemPosition::End | ItemPosition::FlexEnd => GridAxisPosition::End,
            ItemPosition::Auto
            | ItemPosition::Normal
            | ItemPosition::Start
            | ItemPosition::Stretch
            | ItemPosition::SelfStart
            | ItemPosition::SelfEnd
            | ItemPosition::FlexStart
            | ItemPosition::Left
            | ItemPosition::Right
            | ItemPosition::Baseline
            | ItemPosition::LastBaseline => GridAxisPosition::Start,
        }
    }
}

/// Final position of an item along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisPlacement {
    /// Border-box start, relative to the grid's start edge
    pub offset: f32,
    /// Used start margin, auto margins resolved
    pub margin_start: f32,
    /// Used end margin, auto margins resolved
    pub margin_end: f32,
}

/// Spec: CSS Box Alignment §4.4 Overflow Alignment
///
/// Offset of a `child_size` margin box inside `area_size`; `safe` never overflows
/// the start edge.
pub fn overflow_alignment_offset(
    overflow: OverflowAlignment,
    area_size: f32,
    child_size: f32,
) -> f32 {
    let offset = area_size - child_size;
    match overflow {
        OverflowAlignment::Safe => offset.max(0.0),
        OverflowAlignment::Unsafe | OverflowAlignment::Default => offset,
    }
}

/// Position a `border_size` box with `axis_box` margins between `area_start` and
/// `area_end`.
///
/// Auto margins take the free space (never negative) and bypass self-alignment.
pub fn align_in_area(
    axis_box: &ItemAxisBox,
    alignment: SelfAlignment,
    position: GridAxisPosition,
    area_start: f32,
    area_end: f32,
    border_size: f32,
) -> AxisPlacement {
    let area_size = area_end - area_start;
    let margin_box = border_size + axis_box.margin_sum();

    if axis_box.has_auto_margin() {
        let free_space = (area_size - margin_box).max(0.0);
        let (margin_start, margin_end) =
            match (axis_box.margin_start.is_auto(), axis_box.margin_end.is_auto()) {
                (true, true) => (free_space / 2.0, free_space / 2.0),
                (true, false) => (free_space, axis_box.margin_end.resolved()),
                _ => (axis_box.margin_start.resolved(), free_space),
            };
        return AxisPlacement {
            offset: area_start + margin_start,
            margin_start,
            margin_end,
        };
    }

    let margin_start = axis_box.margin_start.resolved();
    let start_position = area_start + margin_start;
    let offset = match position {
        GridAxisPosition::Start => start_position,
        GridAxisPosition::End => {
            start_position + overflow_alignment_offset(alignment.overflow, area_size, margin_box)
        }
        GridAxisPosition::Center => {
            start_position
                + overflow_alignment_offset(alignment.overflow, area_size, margin_box) / 2.0
        }
    };
    AxisPlacement {
        offset,
        margin_start,
        margin_end: axis_box.margin_end.resolved(),
    }
}

/// Content-box size a stretched item must take, or `None` when it does not stretch.
///
/// Only `auto`-sized items without auto margins stretch.
pub fn stretch_override(
    axis_box: &ItemAxisBox,
    alignment: SelfAlignment,
    area_size: f32,
) -> Option<f32> {
    let stretches = alignment.position == ItemPosition::Stretch
        && axis_box.auto_size
        && !axis_box.has_auto_margin();
    stretches.then(|| (area_size - axis_box.margin_sum() - axis_box.border_padding).max(0.0))
}

/// Where an item ended up and how big it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemPlacement {
    /// The item's grid area
    pub coordinate: GridCoordinate,
    /// Placement along the columns (inline axis)
    pub inline: AxisPlacement,
    /// Placement along the rows (block axis)
    pub block: AxisPlacement,
    /// Border-box size reported by the collaborator
    pub size: ItemSize,
    /// Breadth of the grid area in each direction
    pub area: ItemSize,
    /// Content-box sizes forced by `stretch`
    pub overrides: GridAxisPair<Option<f32>>,
}

impl ItemPlacement {
    /// Check if the border box is larger than the grid area in either direction.
    pub fn overflows_area(&self) -> bool {
        self.size.width > self.area.width + LAYOUT_UNIT
            || self.size.height > self.area.height + LAYOUT_UNIT
    }
}

/// Positions items inside their grid areas once both axes have line positions.
#[derive(Debug, Clone, Copy)]
pub struct ItemPlacer<'lines> {
    lines: &'lines GridAxisPair<GridAxisLines>,
    context: ItemAlignmentContext,
}

impl<'lines> ItemPlacer<'lines> {
    pub const fn new(
        lines: &'lines GridAxisPair<GridAxisLines>,
        context: ItemAlignmentContext,
    ) -> Self {
        Self { lines, context }
    }

    /// Stretch, lay out and align one item.
    ///
    /// Stretch overrides are handed to the collaborator (and stale ones cleared)
    /// before the item is laid out, so the size it reports is the final one.
    pub fn place<NodeId, C: GridItemContent + ?Sized>(
        &self,
        handle: ItemHandle,
        item: &GridItem<NodeId>,
        coordinate: GridCoordinate,
        content: &mut C,
    ) -> ItemPlacement {
        let mut overrides = GridAxisPair::<Option<f32>>::default();
        let mut edges = GridAxisPair::<(f32, f32)>::default();
        for axis in GridAxis::SIZING_ORDER {
            let lines = self.lines.get(axis);
            let span = coordinate.span(axis);
            let edge = (lines.area_start(span), lines.area_end(span));
            let alignment = self.context.resolved_alignment(item, axis);
            let size_override =
                stretch_override(item.boxes.get(axis), alignment, edge.1 - edge.0);
            content.set_content_size_override(handle, axis, size_override);
            *overrides.get_mut(axis) = size_override;
            *edges.get_mut(axis) = edge;
        }

        let area = ItemSize {
            width: edges.columns.1 - edges.columns.0,
            height: edges.rows.1 - edges.rows.0,
        };
        let size = content.layout_item(handle, area);

        let align = |axis: GridAxis| {
            let alignment = self.context.resolved_alignment(item, axis);
            let position = self.context.axis_position(item, axis, alignment.position);
            let (area_start, area_end) = *edges.get(axis);
            align_in_area(
                item.boxes.get(axis),
                alignment,
                position,
                area_start,
                area_end,
                size.along(axis),
            )
        };
        let placement = ItemPlacement {
            coordinate,
            inline: align(GridAxis::Column),
            block: align(GridAxis::Row),
            size,
            area,
            overrides,
        };

        if placement.overflows_area() {
            log::debug!(
                target: "css::grid::alignment",
                "{handle:?} overflows its grid area: {size:?} > {area:?}"
            );
        }
        placement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Margin;

    const EPSILON: f32 = 1e-4;

    fn edge_box(margin_start: Margin, margin_end: Margin) -> ItemAxisBox {
        ItemAxisBox {
            margin_start,
            margin_end,
            border_padding: 0.0,
            auto_size: false,
        }
    }

    /// # Panics
    /// Panics if end/center offsets ignore margins or overflow safety.
    #[test]
    fn end_and_center_alignment() {
        let axis_box = edge_box(Margin::Length(5.0), Margin::Length(5.0));
        let alignment = SelfAlignment::new(ItemPosition::End);
        let end = align_in_area(&axis_box, alignment, GridAxisPosition::End, 10.0, 110.0, 40.0);
        // 100px area, 50px margin box: border box starts at 10 + 5 + 50.
        assert!((end.offset - 65.0).abs() < EPSILON);

        let center = align_in_area(
            &axis_box,
            alignment,
            GridAxisPosition::Center,
            10.0,
            110.0,
            40.0,
        );
        assert!((center.offset - 40.0).abs() < EPSILON);

        let unsafe_end =
            align_in_area(&axis_box, alignment, GridAxisPosition::End, 0.0, 20.0, 40.0);
        assert!((unsafe_end.offset + 25.0).abs() < EPSILON);
        let safe = alignment.with_overflow(OverflowAlignment::Safe);
        let safe_end = align_in_area(&axis_box, safe, GridAxisPosition::End, 0.0, 20.0, 40.0);
        assert!((safe_end.offset - 5.0).abs() < EPSILON);
    }

    /// # Panics
    /// Panics if auto margins do not absorb the free space.
    #[test]
    fn auto_margins_take_free_space() {
        let alignment = SelfAlignment::new(ItemPosition::End);
        let both = align_in_area(
            &edge_box(Margin::Auto, Margin::Auto),
            alignment,
            GridAxisPosition::End,
            0.0,
            100.0,
            40.0,
        );
        assert!((both.offset - 30.0).abs() < EPSILON);
        assert!((both.margin_end - 30.0).abs() < EPSILON);

        let start_only = align_in_area(
            &edge_box(Margin::Auto, Margin::Length(10.0)),
            alignment,
            GridAxisPosition::Start,
            0.0,
            100.0,
            40.0,
        );
        assert!((start_only.offset - 50.0).abs() < EPSILON);

        // No free space: auto margins collapse to zero instead of going negative.
        let cramped = align_in_area(
            &edge_box(Margin::Auto, Margin::Auto),
            alignment,
            GridAxisPosition::Start,
            0.0,
            20.0,
            40.0,
        );
        assert!(cramped.offset.abs() < EPSILON);
        assert!(cramped.margin_start.abs() < EPSILON);
    }

    /// # Panics
    /// Panics if stretch applies to sized items or items with auto margins.
    #[test]
    fn stretch_conditions() {
        let stretch = SelfAlignment::new(ItemPosition::Stretch);
        let auto_sized = ItemAxisBox {
            margin_start: Margin::Length(5.0),
            margin_end: Margin::Length(5.0),
            border_padding: 4.0,
            auto_size: true,
        };
        assert_eq!(stretch_override(&auto_sized, stretch, 100.0), Some(86.0));
        assert_eq!(stretch_override(&auto_sized, stretch, 6.0), Some(0.0));
        assert_eq!(
            stretch_override(&auto_sized, SelfAlignment::new(ItemPosition::Start), 100.0),
            None
        );

        let sized = ItemAxisBox {
            auto_size: false,
            ..auto_sized
        };
        assert_eq!(stretch_override(&sized, stretch, 100.0), None);

        let auto_margin = ItemAxisBox {
            margin_start: Margin::Auto,
            ..auto_sized
        };
        assert_eq!(stretch_override(&auto_margin, stretch, 100.0), None);
    }

    /// # Panics
    /// Panics if directional keywords resolve against the wrong axis or direction.
    #[test]
    fn directional_keywords() {
        let rtl = ItemAlignmentContext {
            direction: Direction::Rtl,
            ..ItemAlignmentContext::default()
        };
        let ltr_item = GridItem::new(0);
        assert_eq!(
            rtl.axis_position(&ltr_item, GridAxis::Column, ItemPosition::Left),
            GridAxisPosition::End
        );
        assert_eq!(
            rtl.axis_position(&ltr_item, GridAxis::Row, ItemPosition::Left),
            GridAxisPosition::Start
        );
        // The item's own direction disagrees with the container's.
        assert_eq!(
            rtl.axis_position(&ltr_item, GridAxis::Column, ItemPosition::SelfStart),
            GridAxisPosition::End
        );
        assert_eq!(
            rtl.axis_position(&ltr_item, GridAxis::Row, ItemPosition::SelfStart),
            GridAxisPosition::Start
        );

        let mut vertical_item = GridItem::new(1);
        vertical_item.writing_mode = WritingMode::VerticalRl;
        let ltr = ItemAlignmentContext::default();
        assert_eq!(
            ltr.axis_position(&vertical_item, GridAxis::Column, ItemPosition::SelfStart),
            GridAxisPosition::End
        );
    }
}
