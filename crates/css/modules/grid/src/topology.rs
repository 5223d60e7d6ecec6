//! The grid's cell occupancy map.
//!
//! Spec: §7.1 The Explicit Grid, §7.5 The Implicit Grid
//! <https://www.w3.org/TR/css-grid-2/#implicit-grids>

use std::collections::HashSet;

use crate::line_resolution::{GRID_MAX_TRACKS, GridCoordinate, GridSpan};
use crate::types::{GridAxis, ItemHandle};

/// Rows x columns of cells, each listing the items that occupy it.
///
/// Always rectangular; grows during placement and never shrinks.
#[derive(Debug, Clone, Default)]
pub struct GridTopology {
    cells: Vec<Vec<Vec<ItemHandle>>>,
    columns: usize,
    placed: HashSet<ItemHandle>,
}

impl GridTopology {
    /// An empty grid of `rows` x `columns` cells.
    pub fn with_size(rows: usize, columns: usize) -> Self {
        let mut topology = Self::default();
        topology.ensure_size(rows, columns);
        topology
    }

    /// Grow to at least `rows` x `columns`, keeping the current occupants.
    pub fn ensure_size(&mut self, rows: usize, columns: usize) {
        let rows = rows.min(GRID_MAX_TRACKS);
        let columns = columns.min(GRID_MAX_TRACKS).max(self.columns);
        if columns > self.columns {
            for row in &mut self.cells {
                row.resize_with(columns, Vec::new);
            }
            self.columns = columns;
        }
        if rows > self.cells.len() {
            self.cells.resize_with(rows, || vec![Vec::new(); columns]);
        }
    }

    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// Number of tracks along `axis`.
    pub fn track_count(&self, axis: GridAxis) -> usize {
        match axis {
            GridAxis::Row => self.row_count(),
            GridAxis::Column => self.column_count(),
        }
    }

    /// Occupants of one cell; empty outside the grid.
    pub fn cell(&self, row: usize, column: usize) -> &[ItemHandle] {
        self.cells
            .get(row)
            .and_then(|cells| cells.get(column))
            .map_or(&[], Vec::as_slice)
    }

    /// Check if `item` has been placed.
    pub fn contains(&self, item: ItemHandle) -> bool {
        self.placed.contains(&item)
    }

    /// Record `item` in every cell of `coordinate`, growing the grid as needed.
    ///
    /// Each item is placed once per layout; a second insert is ignored.
    pub fn insert(&mut self, item: ItemHandle, coordinate: GridCoordinate) {
        let newly_placed = self.placed.insert(item);
        debug_assert!(newly_placed, "{item:?} inserted into the grid twice");
        if !newly_placed {
            log::warn!(
                target: "css::grid::placement",
                "{item:?} already placed, ignoring second insert at {coordinate:?}"
            );
            return;
        }

        self.ensure_size(coordinate.rows.end_line(), coordinate.columns.end_line());
        for row in coordinate.rows.tracks() {
            for column in coordinate.columns.tracks() {
                if let Some(cell) = self.cells.get_mut(row).and_then(|cells| cells.get_mut(column))
                {
                    cell.push(item);
                }
            }
        }
    }

    /// Check if every cell of the rectangle is unoccupied.
    ///
    /// The rectangle is clipped to the grid; cells past the edge count as empty.
    pub fn cells_empty(
        &self,
        row_start: usize,
        column_start: usize,
        row_span: usize,
        column_span: usize,
    ) -> bool {
        let row_end = (row_start + row_span).min(self.row_count());
        let column_end = (column_start + column_span).min(self.column_count());
        (row_start..row_end).all(|row| {
            (column_start..column_end).all(|column| self.cell(row, column).is_empty())
        })
    }

    /// Walk the track `fixed_index` along `direction`, starting at `varying_index`.
    pub fn iter_track(
        &self,
        direction: GridAxis,
        fixed_index: usize,
        varying_index: usize,
    ) -> GridIterator<'_> {
        GridIterator::new(self, direction, fixed_index, varying_index)
    }
}

/// Walks the cells of one track.
///
/// `direction` names the axis of the fixed track: `GridAxis::Row` walks across the
/// columns of row `fixed_index`. Each item is yielded once, however many of the
/// walked cells it covers.
#[derive(Debug)]
pub struct GridIterator<'grid> {
    topology: &'grid GridTopology,
    direction: GridAxis,
    fixed_index: usize,
    varying_index: usize,
    child_index: usize,
    yielded: HashSet<ItemHandle>,
}

impl<'grid> GridIterator<'grid> {
    pub fn new(
        topology: &'grid GridTopology,
        direction: GridAxis,
        fixed_index: usize,
        varying_index: usize,
    ) -> Self {
        Self {
            topology,
            direction,
            fixed_index,
            varying_index,
            child_index: 0,
            yielded: HashSet::new(),
        }
    }

    fn varying_end(&self) -> usize {
        self.topology.track_count(self.direction.other())
    }

    const fn row_and_column(&self) -> (usize, usize) {
        match self.direction {
            GridAxis::Row => (self.fixed_index, self.varying_index),
            GridAxis::Column => (self.varying_index, self.fixed_index),
        }
    }

    /// Find the next rectangle of `fixed_span` x `varying_span` empty cells whose
    /// start lies on this track, at or after the current position.
    ///
    /// The rectangle may run past the edge of the grid. Returns `None` once the start
    /// position leaves the grid.
    pub fn next_empty_grid_area(
        &mut self,
        fixed_span: usize,
        varying_span: usize,
    ) -> Option<GridCoordinate> {
        if self.topology.row_count() == 0 || self.topology.column_count() == 0 {
            return None;
        }
        let (row_span, column_span) = match self.direction {
            GridAxis::Row => (fixed_span, varying_span),
            GridAxis::Column => (varying_span, fixed_span),
        };

        while self.varying_index < self.varying_end() {
            let (row, column) = self.row_and_column();
            let start = self.varying_index;
            self.varying_index += 1;
            if self.topology.cells_empty(row, column, row_span, column_span) {
                return Some(GridCoordinate::from_axis_spans(
                    self.direction,
                    GridSpan::with_size(self.fixed_index, fixed_span),
                    GridSpan::with_size(start, varying_span),
                ));
            }
        }
        None
    }
}

impl Iterator for GridIterator<'_> {
    type Item = ItemHandle;

    fn next(&mut self) -> Option<ItemHandle> {
        while self.varying_index < self.varying_end() {
            let (row, column) = self.row_and_column();
            let cell = self.topology.cell(row, column);
            while let Some(item) = cell.get(self.child_index).copied() {
                self.child_index += 1;
                if self.yielded.insert(item) {
                    return Some(item);
                }
            }
            self.child_index = 0;
            self.varying_index += 1;
        }
        None
    }
}
