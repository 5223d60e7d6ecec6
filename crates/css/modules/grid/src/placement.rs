//! Grid item placement algorithm.
//!
//! Spec: §8 Placing Grid Items
//! <https://www.w3.org/TR/css-grid-2/#placement>

use std::collections::HashMap;

use crate::line_resolution::{GridCoordinate, GridLineResolver, GridSpan};
use crate::topology::GridTopology;
use crate::track_sizing::GridAxisTracks;
use crate::types::{GridAutoFlow, GridAxis, GridAxisPair, GridItem, ItemHandle};

/// Outcome of placing every item of a container.
#[derive(Debug, Clone, Default)]
pub struct GridPlacement {
    /// Cell occupancy, sized to cover every placed item
    pub topology: GridTopology,
    coordinates: Vec<Option<GridCoordinate>>,
    order: Vec<ItemHandle>,
}

impl GridPlacement {
    /// The grid area of `item`, if it was placed.
    pub fn coordinate(&self, item: ItemHandle) -> Option<GridCoordinate> {
        self.coordinates.get(item.0).copied().flatten()
    }

    /// Placed items in document order with their grid areas.
    pub fn placed_items(&self) -> impl Iterator<Item = (ItemHandle, GridCoordinate)> + '_ {
        self.order
            .iter()
            .filter_map(|item| Some((*item, self.coordinate(*item)?)))
    }

    /// Number of placed items.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn record(&mut self, item: ItemHandle, coordinate: GridCoordinate) {
        if self.coordinates.len() <= item.0 {
            self.coordinates.resize(item.0 + 1, None);
        }
        self.coordinates[item.0] = Some(coordinate);
        self.topology.insert(item, coordinate);
    }
}

/// An item waiting for auto-placement.
struct PendingItem<'items, NodeId> {
    handle: ItemHandle,
    item: &'items GridItem<NodeId>,
    /// Resolved span on the axis that has a definite position, if any
    definite: Option<(GridAxis, GridSpan)>,
}

/// Shared state of one placement pass.
struct AutoPlacementPacker<'tracks> {
    resolvers: GridAxisPair<GridLineResolver<'tracks>>,
    auto_flow: GridAutoFlow,
    placement: GridPlacement,
}

/// Place grid items according to the grid placement algorithm.
///
/// Spec: §8.5 Grid Item Placement Algorithm
/// <https://www.w3.org/TR/css-grid-2/#auto-placement-algo>
///
/// Items are taken in document order. Fully positioned items are placed first, then
/// items locked to a track of the major axis (rows for `row` flow), then the rest
/// with a cursor that never moves backwards in sparse mode and restarts at the
/// origin for each item in dense mode.
pub fn place_grid_items<'items, NodeId: 'items>(
    items: impl IntoIterator<Item = (ItemHandle, &'items GridItem<NodeId>)>,
    rows: &GridAxisTracks,
    columns: &GridAxisTracks,
    auto_flow: GridAutoFlow,
) -> GridPlacement {
    let resolvers = GridAxisPair::new(GridLineResolver::new(rows), GridLineResolver::new(columns));
    let items: Vec<_> = items.into_iter().collect();
    let mut packer = AutoPlacementPacker {
        resolvers,
        auto_flow,
        placement: GridPlacement {
            order: items.iter().map(|(handle, _)| *handle).collect(),
            ..GridPlacement::default()
        },
    };
    packer.populate_explicit_grid(&items, rows.explicit_count(), columns.explicit_count());

    let major_axis = auto_flow.major_axis();
    let mut specified_major = Vec::new();
    let mut auto_major = Vec::new();

    for &(handle, item) in &items {
        let row_span = packer.resolve(item, GridAxis::Row);
        let column_span = packer.resolve(item, GridAxis::Column);
        match (row_span, column_span) {
            (Some(row_span), Some(column_span)) => {
                packer
                    .placement
                    .record(handle, GridCoordinate::new(row_span, column_span));
            }
            (row_span, column_span) => {
                let definite = row_span
                    .map(|span| (GridAxis::Row, span))
                    .or_else(|| column_span.map(|span| (GridAxis::Column, span)));
                let pending = PendingItem {
                    handle,
                    item,
                    definite,
                };
                if definite.is_some_and(|(axis, _)| axis == major_axis) {
                    specified_major.push(pending);
                } else {
                    auto_major.push(pending);
                }
            }
        }
    }

    log::debug!(
        target: "css::grid::placement",
        "placing {} items ({} locked to a {major_axis:?} track, {} auto-placed) on a {}x{} grid",
        items.len(),
        specified_major.len(),
        auto_major.len(),
        packer.placement.topology.row_count(),
        packer.placement.topology.column_count()
    );

    packer.place_specified_major_axis_items(&specified_major);
    packer.place_auto_major_axis_items(&auto_major);
    packer.placement
}

impl AutoPlacementPacker<'_> {
    fn resolve<NodeId>(&self, item: &GridItem<NodeId>, axis: GridAxis) -> Option<GridSpan> {
        let (start, end) = item.positions(axis);
        self.resolvers.get(axis).resolve(start, end)
    }

    fn auto_span<NodeId>(&self, item: &GridItem<NodeId>, axis: GridAxis) -> usize {
        let (start, end) = item.positions(axis);
        self.resolvers.get(axis).auto_placement_span(start, end)
    }

    /// Size the grid so that it covers the explicit grid, every definite position and
    /// every auto-placed span, so auto-placement never has to grow the minor axis.
    fn populate_explicit_grid<NodeId>(
        &mut self,
        items: &[(ItemHandle, &GridItem<NodeId>)],
        explicit_rows: usize,
        explicit_columns: usize,
    ) {
        let mut extent = GridAxisPair::new(explicit_rows.max(1), explicit_columns.max(1));
        for &(_, item) in items {
            for axis in GridAxis::SIZING_ORDER {
                let end_line = self.resolve(item, axis).map_or_else(
                    || self.auto_span(item, axis),
                    GridSpan::end_line,
                );
                let current = extent.get_mut(axis);
                *current = (*current).max(end_line);
            }
        }
        self.placement.topology.ensure_size(extent.rows, extent.columns);
    }

    fn track_count(&self, axis: GridAxis) -> usize {
        self.placement.topology.track_count(axis)
    }

    /// Spec: §8.5 step 2 "Process the items locked to a given row"
    fn place_specified_major_axis_items<NodeId>(&mut self, items: &[PendingItem<'_, NodeId>]) {
        let major_axis = self.auto_flow.major_axis();
        let minor_axis = self.auto_flow.minor_axis();
        let dense = self.auto_flow.is_dense();
        let mut minor_axis_cursors = HashMap::new();

        for pending in items {
            let Some((_, major_span)) = pending.definite else {
                continue;
            };
            let minor_span_size = self.auto_span(pending.item, minor_axis);
            let start = if dense {
                0
            } else {
                minor_axis_cursors
                    .get(&major_span.initial_position)
                    .copied()
                    .unwrap_or(0)
            };

            let area = self
                .placement
                .topology
                .iter_track(major_axis, major_span.initial_position, start)
                .next_empty_grid_area(major_span.span(), minor_span_size)
                .unwrap_or_else(|| {
                    self.area_outside_grid(pending.item, major_axis, major_span)
                });

            self.placement.record(pending.handle, area);
            if !dense {
                minor_axis_cursors.insert(
                    major_span.initial_position,
                    area.span(minor_axis).initial_position,
                );
            }
            log::trace!(
                target: "css::grid::placement",
                "{:?} locked to {major_axis:?} {} placed at {area:?}",
                pending.handle,
                major_span.initial_position
            );
        }
    }

    /// Spec: §8.5 step 4 "Position the remaining grid items"
    fn place_auto_major_axis_items<NodeId>(&mut self, items: &[PendingItem<'_, NodeId>]) {
        let mut cursor = (0, 0);
        for pending in items {
            let area = self.place_auto_major_axis_item(pending, cursor);
            self.placement.record(pending.handle, area);

            cursor = if self.auto_flow.is_dense() {
                (0, 0)
            } else {
                (
                    area.span(self.auto_flow.major_axis()).initial_position,
                    area.span(self.auto_flow.minor_axis()).initial_position,
                )
            };
            log::trace!(
                target: "css::grid::placement",
                "{:?} auto-placed at {area:?}, cursor now {cursor:?}",
                pending.handle
            );
        }
    }

    /// Find an area for one item whose major-axis position is `auto`.
    ///
    /// `cursor` is the (major, minor) auto-placement cursor.
    fn place_auto_major_axis_item<NodeId>(
        &self,
        pending: &PendingItem<'_, NodeId>,
        cursor: (usize, usize),
    ) -> GridCoordinate {
        let major_axis = self.auto_flow.major_axis();
        let minor_axis = self.auto_flow.minor_axis();
        let major_span_size = self.auto_span(pending.item, major_axis);
        let (mut major_cursor, mut minor_cursor) = cursor;
        let end_of_major_axis = self.track_count(major_axis);

        if let Some((_, minor_span)) = pending.definite {
            // The item's minor position is fixed: move to the next major track if the
            // cursor is already past it.
            if minor_span.initial_position < minor_cursor {
                major_cursor += 1;
            }
            let area = if major_cursor < end_of_major_axis {
                self.placement
                    .topology
                    .iter_track(minor_axis, minor_span.initial_position, major_cursor)
                    .next_empty_grid_area(minor_span.span(), major_span_size)
            } else {
                None
            };
            return area
                .unwrap_or_else(|| self.area_outside_grid(pending.item, minor_axis, minor_span));
        }

        let minor_span_size = self.auto_span(pending.item, minor_axis);
        let end_of_minor_axis = self.track_count(minor_axis);
        for major_index in major_cursor..end_of_major_axis {
            let fitting = self
                .placement
                .topology
                .iter_track(major_axis, major_index, minor_cursor)
                .next_empty_grid_area(major_span_size, minor_span_size)
                .filter(|area| area.span(minor_axis).final_position < end_of_minor_axis);
            if let Some(area) = fitting {
                return area;
            }
            // Moving to the next major track restarts the minor scan.
            minor_cursor = 0;
        }

        self.area_outside_grid(
            pending.item,
            minor_axis,
            GridSpan::with_size(0, minor_span_size),
        )
    }

    /// An area past the end of the grid across `specified_axis`, keeping `specified_span`.
    fn area_outside_grid<NodeId>(
        &self,
        item: &GridItem<NodeId>,
        specified_axis: GridAxis,
        specified_span: GridSpan,
    ) -> GridCoordinate {
        let cross_axis = specified_axis.other();
        let (start, end) = item.positions(cross_axis);
        let cross_span =
            self.resolvers
                .get(cross_axis)
                .resolve_at(start, end, self.track_count(cross_axis));
        GridCoordinate::from_axis_spans(specified_axis, specified_span, cross_span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GridPosition, GridTrackSize};

    fn tracks(count: usize) -> GridAxisTracks {
        GridAxisTracks::new(vec![GridTrackSize::auto(); count], 0.0)
    }

    fn place(items: &[GridItem], rows: usize, columns: usize, flow: GridAutoFlow) -> GridPlacement {
        place_grid_items(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| (ItemHandle(index), item)),
            &tracks(rows),
            &tracks(columns),
            flow,
        )
    }

    fn cell(row: usize, column: usize) -> GridCoordinate {
        GridCoordinate::new(GridSpan::new(row, row), GridSpan::new(column, column))
    }

    /// # Panics
    /// Panics if row-flow auto-placement does not fill rows left to right.
    #[test]
    fn auto_placement_row_flow() {
        let items = vec![GridItem::new(0), GridItem::new(1), GridItem::new(2)];
        let placement = place(&items, 0, 2, GridAutoFlow::Row);

        assert_eq!(placement.coordinate(ItemHandle(0)), Some(cell(0, 0)));
        assert_eq!(placement.coordinate(ItemHandle(1)), Some(cell(0, 1)));
        assert_eq!(placement.coordinate(ItemHandle(2)), Some(cell(1, 0)));
        assert_eq!(placement.topology.row_count(), 2);
        assert_eq!(placement.topology.column_count(), 2);
    }

    /// # Panics
    /// Panics if column-flow auto-placement does not fill columns top to bottom.
    #[test]
    fn auto_placement_column_flow() {
        let items = vec![GridItem::new(0), GridItem::new(1), GridItem::new(2)];
        let placement = place(&items, 2, 0, GridAutoFlow::Column);

        assert_eq!(placement.coordinate(ItemHandle(0)), Some(cell(0, 0)));
        assert_eq!(placement.coordinate(ItemHandle(1)), Some(cell(1, 0)));
        assert_eq!(placement.coordinate(ItemHandle(2)), Some(cell(0, 1)));
    }

    /// # Panics
    /// Panics if sparse packing moves the cursor backwards or dense packing leaves holes.
    #[test]
    fn sparse_and_dense_packing() {
        let items = vec![
            GridItem::new(0),
            GridItem::new(1).with_column(GridPosition::Span(2), GridPosition::Auto),
            GridItem::new(2),
        ];

        let sparse = place(&items, 0, 2, GridAutoFlow::Row);
        assert_eq!(sparse.coordinate(ItemHandle(0)), Some(cell(0, 0)));
        assert_eq!(
            sparse.coordinate(ItemHandle(1)),
            Some(GridCoordinate::new(GridSpan::new(1, 1), GridSpan::new(0, 1)))
        );
        // The hole at (0, 1) stays empty.
        assert_eq!(sparse.coordinate(ItemHandle(2)), Some(cell(2, 0)));

        let dense = place(&items, 0, 2, GridAutoFlow::RowDense);
        assert_eq!(dense.coordinate(ItemHandle(2)), Some(cell(0, 1)));
    }

    /// # Panics
    /// Panics if explicitly positioned items do not keep their area.
    #[test]
    fn explicit_items_are_placed_first() {
        let items = vec![
            GridItem::new(0),
            GridItem::new(1).with_row(GridPosition::Line(1), GridPosition::Auto).with_column(
                GridPosition::Line(1),
                GridPosition::Auto,
            ),
        ];
        let placement = place(&items, 0, 2, GridAutoFlow::Row);

        assert_eq!(placement.coordinate(ItemHandle(1)), Some(cell(0, 0)));
        assert_eq!(placement.coordinate(ItemHandle(0)), Some(cell(0, 1)));
    }

    /// # Panics
    /// Panics if items locked to a row do not share that row's cursor.
    #[test]
    fn items_locked_to_a_row() {
        let locked = |node| GridItem::new(node).with_row(GridPosition::Line(2), GridPosition::Auto);
        let items = vec![locked(0), locked(1), locked(2)];
        let placement = place(&items, 0, 2, GridAutoFlow::Row);

        assert_eq!(placement.coordinate(ItemHandle(0)), Some(cell(1, 0)));
        assert_eq!(placement.coordinate(ItemHandle(1)), Some(cell(1, 1)));
        // No room left in the row: the grid grows across it.
        assert_eq!(placement.coordinate(ItemHandle(2)), Some(cell(1, 2)));
        assert_eq!(placement.topology.column_count(), 3);
    }

    /// # Panics
    /// Panics if an item with a fixed column skips ahead of the cursor incorrectly.
    #[test]
    fn fixed_minor_position() {
        let items = vec![
            GridItem::new(0),
            GridItem::new(1),
            GridItem::new(2).with_column(GridPosition::Line(1), GridPosition::Auto),
        ];
        let placement = place(&items, 0, 2, GridAutoFlow::Row);

        // The cursor sits at column 1, so the item moves to the next row.
        assert_eq!(placement.coordinate(ItemHandle(2)), Some(cell(1, 0)));
    }
}
