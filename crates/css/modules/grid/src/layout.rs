//! Grid layout algorithm.
//!
//! Spec: §12 Grid Sizing
//! <https://www.w3.org/TR/css-grid-2/#layout-algorithm>

use crate::alignment::{ContentAlignment, Direction, SelfAlignment, WritingMode};
use crate::content_distribution::{GridAxisLines, distribute_content, stretch_auto_tracks};
use crate::item_alignment::{ItemAlignmentContext, ItemPlacer};
use crate::line_resolution::GridCoordinate;
use crate::placement::{GridPlacement, place_grid_items};
use crate::track_sizing::{
    GridAxisTracks, ResolvedTrackSizes, TrackSizingParams, resolve_track_sizes,
};
use crate::types::{
    AvailableSpace, GridAutoFlow, GridAxis, GridAxisPair, GridItem, GridItemContent, ItemHandle,
    ItemSize,
};

/// Input parameters for grid layout.
#[derive(Debug, Clone)]
pub struct GridContainerInputs {
    /// Row tracks definition
    pub rows: GridAxisTracks,
    /// Column tracks definition
    pub columns: GridAxisTracks,
    /// Auto-flow direction
    pub auto_flow: GridAutoFlow,
    /// Available width for the grid
    pub available_width: AvailableSpace,
    /// Available height for the grid
    pub available_height: AvailableSpace,
    /// `justify-content`
    pub justify_content: ContentAlignment,
    /// `align-content`
    pub align_content: ContentAlignment,
    /// `justify-items`
    pub justify_items: SelfAlignment,
    /// `align-items`
    pub align_items: SelfAlignment,
    /// Inline direction of the container
    pub direction: Direction,
    /// Writing mode of the container
    pub writing_mode: WritingMode,
}

impl Default for GridContainerInputs {
    fn default() -> Self {
        Self::new(
            GridAxisTracks::default(),
            GridAxisTracks::default(),
            AvailableSpace::Indefinite,
            AvailableSpace::Indefinite,
        )
    }
}

impl GridContainerInputs {
    /// Create a new grid container inputs with default values.
    pub fn new(
        rows: GridAxisTracks,
        columns: GridAxisTracks,
        available_width: AvailableSpace,
        available_height: AvailableSpace,
    ) -> Self {
        Self {
            rows,
            columns,
            auto_flow: GridAutoFlow::default(),
            available_width,
            available_height,
            justify_content: ContentAlignment::default(),
            align_content: ContentAlignment::default(),
            justify_items: SelfAlignment::default(),
            align_items: SelfAlignment::default(),
            direction: Direction::default(),
            writing_mode: WritingMode::default(),
        }
    }

    #[must_use]
    pub fn with_auto_flow(mut self, auto_flow: GridAutoFlow) -> Self {
        self.auto_flow = auto_flow;
        self
    }

    #[must_use]
    pub fn with_justify_content(mut self, alignment: ContentAlignment) -> Self {
        self.justify_content = alignment;
        self
    }

    #[must_use]
    pub fn with_align_content(mut self, alignment: ContentAlignment) -> Self {
        self.align_content = alignment;
        self
    }

    #[must_use]
    pub fn with_justify_items(mut self, alignment: SelfAlignment) -> Self {
        self.justify_items = alignment;
        self
    }

    #[must_use]
    pub fn with_align_items(mut self, alignment: SelfAlignment) -> Self {
        self.align_items = alignment;
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_writing_mode(mut self, writing_mode: WritingMode) -> Self {
        self.writing_mode = writing_mode;
        self
    }

    /// Track definitions of `axis`.
    pub const fn tracks(&self, axis: GridAxis) -> &GridAxisTracks {
        match axis {
            GridAxis::Row => &self.rows,
            GridAxis::Column => &self.columns,
        }
    }

    /// Available space along `axis`.
    pub const fn available_space(&self, axis: GridAxis) -> AvailableSpace {
        match axis {
            GridAxis::Row => self.available_height,
            GridAxis::Column => self.available_width,
        }
    }

    /// `align-content` for rows, `justify-content` for columns.
    pub const fn content_alignment(&self, axis: GridAxis) -> ContentAlignment {
        match axis {
            GridAxis::Row => self.align_content,
            GridAxis::Column => self.justify_content,
        }
    }

    const fn alignment_context(&self) -> ItemAlignmentContext {
        ItemAlignmentContext {
            justify_items: self.justify_items,
            align_items: self.align_items,
            direction: self.direction,
            writing_mode: self.writing_mode,
        }
    }
}

/// A grid item with its final position and size.
#[derive(Debug, Clone)]
pub struct GridPlacedItem<NodeId = usize> {
    /// Node identifier (generic to support different node ID types)
    pub node_id: NodeId,
    /// Handle the item was laid out under
    pub handle: ItemHandle,
    /// Grid area occupied
    pub coordinate: GridCoordinate,
    /// Final x position (border-box, from the inline-start edge)
    pub x: f32,
    /// Final y position (border-box, from the block-start edge)
    pub y: f32,
    /// Final width (border-box)
    pub width: f32,
    /// Final height (border-box)
    pub height: f32,
    /// Content-box sizes applied by `stretch`
    pub overrides: GridAxisPair<Option<f32>>,
}

/// Result of grid layout computation.
#[derive(Debug, Clone)]
pub struct GridLayoutResult<NodeId = usize> {
    /// Placed items with their positions
    pub items: Vec<GridPlacedItem<NodeId>>,
    /// Total width consumed by the grid tracks and gaps
    pub total_width: f32,
    /// Total height consumed by the grid tracks and gaps
    pub total_height: f32,
    /// Used content size of the container: the definite size when given, the
    /// grid's size otherwise
    pub content_size: ItemSize,
    /// Resolved column sizes
    pub col_sizes: ResolvedTrackSizes,
    /// Resolved row sizes
    pub row_sizes: ResolvedTrackSizes,
    /// Column line positions and `justify-content` offsets
    pub column_lines: GridAxisLines,
    /// Row line positions and `align-content` offsets
    pub row_lines: GridAxisLines,
    /// Items whose border box is larger than their grid area
    pub overflowing: Vec<ItemHandle>,
}

/// Run the grid layout algorithm over `items`, addressed by their index.
///
/// Spec: §12 Grid Sizing Algorithm
/// <https://www.w3.org/TR/css-grid-2/#layout-algorithm>
pub fn layout_grid<NodeId: Clone, C: GridItemContent + ?Sized>(
    items: &[GridItem<NodeId>],
    inputs: &GridContainerInputs,
    content: &mut C,
) -> GridLayoutResult<NodeId> {
    let handles: Vec<_> = items
        .iter()
        .enumerate()
        .map(|(index, item)| (ItemHandle(index), item))
        .collect();
    let placement = place_grid_items(
        handles.iter().copied(),
        &inputs.rows,
        &inputs.columns,
        inputs.auto_flow,
    );
    layout_placed_items(&handles, &placement, inputs, content)
}

/// Size the tracks of an already placed grid and position its items.
///
/// 1. Columns are sized and stretched.
/// 2. Rows are sized, measuring items against their column area, and stretched.
/// 3. Content alignment turns track sizes into line positions.
/// 4. Every item is stretched, laid out and aligned in its area.
pub fn layout_placed_items<NodeId: Clone, C: GridItemContent + ?Sized>(
    items: &[(ItemHandle, &GridItem<NodeId>)],
    placement: &GridPlacement,
    inputs: &GridContainerInputs,
    content: &mut C,
) -> GridLayoutResult<NodeId> {
    tracing::debug!(
        "layout_grid: {} items on a {}x{} grid, available {:?} x {:?}",
        items.len(),
        placement.topology.row_count(),
        placement.topology.column_count(),
        inputs.available_width,
        inputs.available_height
    );

    let col_sizes = size_axis(GridAxis::Column, placement, inputs, None, content);
    let row_sizes = size_axis(GridAxis::Row, placement, inputs, Some(&col_sizes), content);

    let lines = GridAxisPair::new(
        distribute_content(
            &row_sizes,
            inputs.align_content,
            inputs.available_height,
            GridAxis::Row,
            inputs.direction,
        ),
        distribute_content(
            &col_sizes,
            inputs.justify_content,
            inputs.available_width,
            GridAxis::Column,
            inputs.direction,
        ),
    );

    let placer = ItemPlacer::new(&lines, inputs.alignment_context());
    let mut placed_items = Vec::with_capacity(items.len());
    let mut overflowing = Vec::new();
    for &(handle, item) in items {
        let Some(coordinate) = placement.coordinate(handle) else {
            continue;
        };
        let placed = placer.place(handle, item, coordinate, content);
        if placed.overflows_area() {
            overflowing.push(handle);
        }
        placed_items.push(GridPlacedItem {
            node_id: item.node_id.clone(),
            handle,
            coordinate,
            x: placed.inline.offset,
            y: placed.block.offset,
            width: placed.size.width,
            height: placed.size.height,
            overrides: placed.overrides,
        });
    }

    let total_width = col_sizes.total_size();
    let total_height = row_sizes.total_size();
    let GridAxisPair {
        rows: row_lines,
        columns: column_lines,
    } = lines;

    GridLayoutResult {
        items: placed_items,
        total_width,
        total_height,
        content_size: ItemSize {
            width: inputs.available_width.definite().unwrap_or(total_width),
            height: inputs.available_height.definite().unwrap_or(total_height),
        },
        col_sizes,
        row_sizes,
        column_lines,
        row_lines,
        overflowing,
    }
}

/// Run the track sizing algorithm on one axis, then stretch its content-sized tracks.
fn size_axis<C: GridItemContent + ?Sized>(
    axis: GridAxis,
    placement: &GridPlacement,
    inputs: &GridContainerInputs,
    cross_sizes: Option<&ResolvedTrackSizes>,
    content: &mut C,
) -> ResolvedTrackSizes {
    let axis_tracks = inputs.tracks(axis);
    let available_space = inputs.available_space(axis);
    let params = TrackSizingParams {
        axis_tracks,
        available_space,
        placement,
        axis,
        cross_sizes,
    };
    let mut sizes = resolve_track_sizes(&params, content);
    let sizing_functions = axis_tracks.sizing_functions(sizes.len(), available_space);
    stretch_auto_tracks(
        &mut sizes,
        &sizing_functions,
        inputs.content_alignment(axis),
        available_space,
    );
    sizes
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::alignment::ItemPosition;
    use crate::types::GridTrackSize;

    const EPSILON: f32 = 0.1;

    /// Items with a fixed natural size that honour stretch overrides.
    struct NaturalContent {
        natural: ItemSize,
        overrides: HashMap<(ItemHandle, GridAxis), f32>,
    }

    impl NaturalContent {
        fn new(width: f32, height: f32) -> Self {
            Self {
                natural: ItemSize { width, height },
                overrides: HashMap::new(),
            }
        }
    }

    impl GridItemContent for NaturalContent {
        fn min_content_contribution(
            &mut self,
            _item: ItemHandle,
            axis: GridAxis,
            _cross_size: Option<f32>,
        ) -> f32 {
            self.natural.along(axis)
        }

        fn max_content_contribution(
            &mut self,
            _item: ItemHandle,
            axis: GridAxis,
            _cross_size: Option<f32>,
        ) -> f32 {
            self.natural.along(axis)
        }

        fn set_content_size_override(
            &mut self,
            item: ItemHandle,
            axis: GridAxis,
            size: Option<f32>,
        ) {
            match size {
                Some(size) => self.overrides.insert((item, axis), size),
                None => self.overrides.remove(&(item, axis)),
            };
        }

        fn layout_item(&mut self, item: ItemHandle, _area: ItemSize) -> ItemSize {
            ItemSize {
                width: self
                    .overrides
                    .get(&(item, GridAxis::Column))
                    .copied()
                    .unwrap_or(self.natural.width),
                height: self
                    .overrides
                    .get(&(item, GridAxis::Row))
                    .copied()
                    .unwrap_or(self.natural.height),
            }
        }
    }

    fn fixed_grid() -> GridContainerInputs {
        let rows = GridAxisTracks::new(vec![GridTrackSize::length(100.0); 2], 10.0);
        let columns = GridAxisTracks::new(vec![GridTrackSize::length(150.0); 2], 10.0);
        GridContainerInputs::new(
            rows,
            columns,
            AvailableSpace::Definite(400.0),
            AvailableSpace::Definite(300.0),
        )
    }

    /// Test basic grid layout.
    ///
    /// # Panics
    /// Panics if layout computation fails or assertions fail.
    #[test]
    fn test_grid_layout_basic() {
        let items = vec![
            GridItem::new(1),
            GridItem::new(2),
            GridItem::new(3),
            GridItem::new(4),
        ];
        let mut content = NaturalContent::new(20.0, 20.0);
        let result = layout_grid(&items, &fixed_grid(), &mut content);

        assert_eq!(result.items.len(), 4);
        assert!((result.total_width - 310.0).abs() < EPSILON); // 150 + 150 + 10 gap
        assert!((result.total_height - 210.0).abs() < EPSILON); // 100 + 100 + 10 gap
        assert!((result.content_size.width - 400.0).abs() < EPSILON);

        // Fourth item: second row, second column, stretched over its area.
        let last = &result.items[3];
        assert_eq!(last.node_id, 4);
        assert!((last.x - 160.0).abs() < EPSILON);
        assert!((last.y - 110.0).abs() < EPSILON);
        assert!((last.width - 150.0).abs() < EPSILON);
        assert!((last.height - 100.0).abs() < EPSILON);
        assert_eq!(last.overrides.columns, Some(150.0));
        assert!(result.overflowing.is_empty());
    }

    /// Non-stretch alignment keeps the natural size and offsets the item.
    ///
    /// # Panics
    /// Panics if centered or end-aligned items are misplaced.
    #[test]
    fn test_item_self_alignment() {
        let inputs = fixed_grid()
            .with_justify_items(SelfAlignment::new(ItemPosition::Center))
            .with_align_items(SelfAlignment::new(ItemPosition::End));
        let items = vec![GridItem::new(0)];
        let mut content = NaturalContent::new(50.0, 40.0);
        let result = layout_grid(&items, &inputs, &mut content);

        let item = &result.items[0];
        assert!((item.x - 50.0).abs() < EPSILON);
        assert!((item.y - 60.0).abs() < EPSILON);
        assert!((item.width - 50.0).abs() < EPSILON);
        assert_eq!(item.overrides, GridAxisPair::default());
    }

    /// Items larger than their area are reported.
    ///
    /// # Panics
    /// Panics if the overflow list misses the oversized item.
    #[test]
    fn test_overflow_bookkeeping() {
        let inputs = fixed_grid().with_justify_items(SelfAlignment::new(ItemPosition::Start));
        let items = vec![GridItem::new(0), GridItem::new(1)];
        let mut content = NaturalContent::new(200.0, 20.0);
        let result = layout_grid(&items, &inputs, &mut content);
        assert_eq!(result.overflowing, vec![ItemHandle(0), ItemHandle(1)]);
    }
}
