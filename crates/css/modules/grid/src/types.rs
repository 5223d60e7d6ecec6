//! Grid container and item type definitions.
//!
//! Spec: CSS Grid Layout Module Level 2
//! <https://www.w3.org/TR/css-grid-2/>

use crate::alignment::{Direction, SelfAlignment, WritingMode};

/// Axis identifier (row tracks or column tracks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridAxis {
    /// Row tracks, stacked along the block axis
    Row,
    /// Column tracks, laid out along the inline axis
    Column,
}

impl GridAxis {
    /// Both axes in sizing order: columns are sized before rows.
    pub const SIZING_ORDER: [Self; 2] = [Self::Column, Self::Row];

    /// The perpendicular axis.
    pub const fn other(self) -> Self {
        match self {
            Self::Row => Self::Column,
            Self::Column => Self::Row,
        }
    }

    /// True for column tracks, whose breadth runs along the inline axis.
    pub const fn is_inline(self) -> bool {
        matches!(self, Self::Column)
    }
}

/// A value stored once per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridAxisPair<T> {
    /// Value for row tracks
    pub rows: T,
    /// Value for column tracks
    pub columns: T,
}

impl<T> GridAxisPair<T> {
    /// Create a pair from its row and column values.
    pub const fn new(rows: T, columns: T) -> Self {
        Self { rows, columns }
    }

    /// Borrow the value for `axis`.
    pub const fn get(&self, axis: GridAxis) -> &T {
        match axis {
            GridAxis::Row => &self.rows,
            GridAxis::Column => &self.columns,
        }
    }

    /// Mutably borrow the value for `axis`.
    pub const fn get_mut(&mut self, axis: GridAxis) -> &mut T {
        match axis {
            GridAxis::Row => &mut self.rows,
            GridAxis::Column => &mut self.columns,
        }
    }
}

/// Available space for one axis of the grid container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AvailableSpace {
    /// The container's content size on this axis is known
    Definite(f32),
    /// The container's size depends on its content (e.g. `height: auto`)
    #[default]
    Indefinite,
}

impl AvailableSpace {
    /// The definite size, if any. Negative sizes are clamped to zero.
    pub fn definite(self) -> Option<f32> {
        match self {
            Self::Definite(size) => Some(size.max(0.0)),
            Self::Indefinite => None,
        }
    }

    /// Check if the size is known.
    pub const fn is_definite(self) -> bool {
        matches!(self, Self::Definite(_))
    }
}

/// Represents a track size in the grid.
///
/// Spec: §7.2.1 Track Sizing Functions
/// <https://www.w3.org/TR/css-grid-2/#track-sizing>
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackBreadth {
    /// Length in pixels
    Length(f32),
    /// Percentage of available space, as a fraction (`0.5` is `50%`)
    Percentage(f32),
    /// Flex factor (fr units)
    Flex(f32),
    /// Minimum content size
    MinContent,
    /// Maximum content size
    MaxContent,
    /// Automatic sizing
    Auto,
}

impl TrackBreadth {
    /// Check if this breadth is intrinsic (depends on content).
    pub const fn is_intrinsic(self) -> bool {
        matches!(self, Self::MinContent | Self::MaxContent | Self::Auto)
    }

    /// Check if this breadth is flexible (uses fr units).
    pub const fn is_flexible(self) -> bool {
        matches!(self, Self::Flex(_))
    }

    /// Get the flex factor, or 0.0 if not flexible.
    pub fn flex_factor(self) -> f32 {
        match self {
            Self::Flex(factor) => factor.max(0.0),
            _ => 0.0,
        }
    }

    /// Resolve a definite breadth (length or percentage) against the available size.
    ///
    /// Returns `None` for intrinsic and flexible breadths, and for percentages
    /// against an indefinite size.
    pub fn definite_size(self, available: AvailableSpace) -> Option<f32> {
        match self {
            Self::Length(len) => Some(len.max(0.0)),
            Self::Percentage(pct) => available.definite().map(|size| (size * pct).max(0.0)),
            Self::Flex(_) | Self::MinContent | Self::MaxContent | Self::Auto => None,
        }
    }

    /// Percentages against an indefinite size behave as `auto`.
    fn with_percentage_resolved(self, available: AvailableSpace) -> Self {
        match self {
            Self::Percentage(_) if !available.is_definite() => Self::Auto,
            other => other,
        }
    }
}

/// Track sizing function.
///
/// Spec: §7.2.1 Track Sizing Functions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridTrackSize {
    /// Single breadth used as both minimum and maximum
    Breadth(TrackBreadth),
    /// minmax(min, max)
    MinMax(TrackBreadth, TrackBreadth),
}

impl Default for GridTrackSize {
    fn default() -> Self {
        Self::Breadth(TrackBreadth::Auto)
    }
}

impl GridTrackSize {
    /// A fixed `px` track.
    pub const fn length(len: f32) -> Self {
        Self::Breadth(TrackBreadth::Length(len))
    }

    /// A flexible `fr` track.
    pub const fn flex(factor: f32) -> Self {
        Self::Breadth(TrackBreadth::Flex(factor))
    }

    /// An `auto` track.
    pub const fn auto() -> Self {
        Self::Breadth(TrackBreadth::Auto)
    }

    /// A `minmax(min, max)` track.
    pub const fn minmax(min: TrackBreadth, max: TrackBreadth) -> Self {
        Self::MinMax(min, max)
    }

    /// Get the minimum breadth for this track size.
    pub fn min_breadth(&self) -> &TrackBreadth {
        match self {
            Self::Breadth(breadth) | Self::MinMax(breadth, _) => breadth,
        }
    }

    /// Get the maximum breadth for this track size.
    pub fn max_breadth(&self) -> &TrackBreadth {
        match self {
            Self::Breadth(breadth) | Self::MinMax(_, breadth) => breadth,
        }
    }

    /// Replace percentage breadths with `auto` when the axis is indefinite.
    #[must_use]
    pub fn resolved_for(self, available: AvailableSpace) -> Self {
        match self {
            Self::Breadth(breadth) => Self::Breadth(breadth.with_percentage_resolved(available)),
            Self::MinMax(min, max) => Self::MinMax(
                min.with_percentage_resolved(available),
                max.with_percentage_resolved(available),
            ),
        }
    }

    /// Check if either sizing function depends on content.
    pub fn is_content_sized(&self) -> bool {
        self.min_breadth().is_intrinsic() || self.max_breadth().is_intrinsic()
    }

    pub fn has_intrinsic_min(&self) -> bool {
        self.min_breadth().is_intrinsic()
    }

    pub fn has_min_content_min(&self) -> bool {
        matches!(self.min_breadth(), TrackBreadth::MinContent)
    }

    pub fn has_max_content_min(&self) -> bool {
        matches!(self.min_breadth(), TrackBreadth::MaxContent)
    }

    pub fn has_auto_min(&self) -> bool {
        matches!(self.min_breadth(), TrackBreadth::Auto)
    }

    pub fn has_min_or_max_content_min(&self) -> bool {
        self.has_min_content_min() || self.has_max_content_min()
    }

    pub fn has_intrinsic_max(&self) -> bool {
        self.max_breadth().is_intrinsic()
    }

    pub fn has_min_content_max(&self) -> bool {
        matches!(self.max_breadth(), TrackBreadth::MinContent)
    }

    pub fn has_max_content_or_auto_max(&self) -> bool {
        matches!(
            self.max_breadth(),
            TrackBreadth::MaxContent | TrackBreadth::Auto
        )
    }

    pub fn has_flex_max(&self) -> bool {
        self.max_breadth().is_flexible()
    }

    /// `auto`/`min-content` minimum together with an intrinsic maximum.
    pub fn has_auto_or_min_content_min_and_intrinsic_max(&self) -> bool {
        (self.has_auto_min() || self.has_min_content_min()) && self.has_intrinsic_max()
    }

    /// `max-content` minimum together with a `max-content` (or `auto`) maximum.
    pub fn has_max_content_min_and_max_content_max(&self) -> bool {
        self.has_max_content_min() && self.has_max_content_or_auto_max()
    }

    /// Flex factor of the maximum sizing function.
    pub fn flex_factor(&self) -> f32 {
        self.max_breadth().flex_factor()
    }
}

/// Auto-placement algorithm direction.
///
/// Spec: §8.5 Grid Item Placement Algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridAutoFlow {
    /// Place items row by row
    #[default]
    Row,
    /// Place items column by column
    Column,
    /// Pack items densely (try to fill holes)
    RowDense,
    /// Pack items densely in columns
    ColumnDense,
}

impl GridAutoFlow {
    /// Check if the dense packing algorithm is requested.
    pub const fn is_dense(self) -> bool {
        matches!(self, Self::RowDense | Self::ColumnDense)
    }

    /// The axis whose tracks are filled one at a time (rows for `row` flow).
    pub const fn major_axis(self) -> GridAxis {
        match self {
            Self::Row | Self::RowDense => GridAxis::Row,
            Self::Column | Self::ColumnDense => GridAxis::Column,
        }
    }

    /// The axis scanned within a major track (columns for `row` flow).
    pub const fn minor_axis(self) -> GridAxis {
        self.major_axis().other()
    }
}

/// One of `grid-row-start`, `grid-row-end`, `grid-column-start`, `grid-column-end`.
///
/// Spec: §8.3 Line-based Placement
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GridPosition {
    /// `auto`
    #[default]
    Auto,
    /// `<integer>`: 1-based line, negative counts from the end of the explicit grid
    Line(i32),
    /// `<integer> <custom-ident>`: the N-th line with that name
    NamedLine {
        /// Line name
        name: String,
        /// Which occurrence, negative counts from the last one
        nth: i32,
    },
    /// `<custom-ident>`: matches `<name>-start`/`<name>-end` first, then `<name>`
    Named(String),
    /// `span <integer>`
    Span(u32),
    /// `span <integer> <custom-ident>`
    NamedSpan {
        /// Line name
        name: String,
        /// Number of matching lines to cross
        count: u32,
    },
}

impl GridPosition {
    /// Check if this is an auto position.
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Check if this is a `span` position, named or not.
    pub const fn is_span(&self) -> bool {
        matches!(self, Self::Span(_) | Self::NamedSpan { .. })
    }

    /// `auto` and `span` need the opposite side resolved first.
    pub const fn should_be_resolved_against_opposite_position(&self) -> bool {
        self.is_auto() || self.is_span()
    }
}

/// Stable identifier of an item owned by a grid container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemHandle(pub usize);

/// A margin on one side of an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Margin {
    /// Resolved length in pixels (may be negative)
    Length(f32),
    /// `auto`
    Auto,
}

impl Default for Margin {
    fn default() -> Self {
        Self::Length(0.0)
    }
}

impl Margin {
    /// Used value before auto-margin resolution (`auto` counts as zero).
    pub const fn resolved(self) -> f32 {
        match self {
            Self::Length(len) => len,
            Self::Auto => 0.0,
        }
    }

    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }
}

/// Box-model inputs of an item along one axis, supplied by the box-model collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemAxisBox {
    /// Margin on the start side
    pub margin_start: Margin,
    /// Margin on the end side
    pub margin_end: Margin,
    /// Sum of border and padding on this axis
    pub border_padding: f32,
    /// True when the item's `width`/`height` on this axis is `auto`
    pub auto_size: bool,
}

impl Default for ItemAxisBox {
    fn default() -> Self {
        Self {
            margin_start: Margin::default(),
            margin_end: Margin::default(),
            border_padding: 0.0,
            auto_size: true,
        }
    }
}

impl ItemAxisBox {
    /// Sum of both margins, `auto` counting as zero.
    pub const fn margin_sum(&self) -> f32 {
        self.margin_start.resolved() + self.margin_end.resolved()
    }

    /// Check if either margin is `auto`.
    pub const fn has_auto_margin(&self) -> bool {
        self.margin_start.is_auto() || self.margin_end.is_auto()
    }
}

/// Represents a grid item with its style information.
#[derive(Debug, Clone)]
pub struct GridItem<NodeId = usize> {
    /// Node identifier (generic to support different node ID types)
    pub node_id: NodeId,
    /// `grid-row-start`
    pub row_start: GridPosition,
    /// `grid-row-end`
    pub row_end: GridPosition,
    /// `grid-column-start`
    pub col_start: GridPosition,
    /// `grid-column-end`
    pub col_end: GridPosition,
    /// `justify-self`
    pub justify_self: SelfAlignment,
    /// `align-self`
    pub align_self: SelfAlignment,
    /// Margins, border and padding per axis
    pub boxes: GridAxisPair<ItemAxisBox>,
    /// The item's own inline direction
    pub direction: Direction,
    /// The item's own writing mode
    pub writing_mode: WritingMode,
}

impl<NodeId> GridItem<NodeId> {
    /// Create a new grid item with the given node ID.
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            row_start: GridPosition::Auto,
            row_end: GridPosition::Auto,
            col_start: GridPosition::Auto,
            col_end: GridPosition::Auto,
            justify_self: SelfAlignment::default(),
            align_self: SelfAlignment::default(),
            boxes: GridAxisPair::default(),
            direction: Direction::default(),
            writing_mode: WritingMode::default(),
        }
    }

    /// Set `grid-row: start / end`.
    #[must_use]
    pub fn with_row(mut self, start: GridPosition, end: GridPosition) -> Self {
        self.row_start = start;
        self.row_end = end;
        self
    }

    /// Set `grid-column: start / end`.
    #[must_use]
    pub fn with_column(mut self, start: GridPosition, end: GridPosition) -> Self {
        self.col_start = start;
        self.col_end = end;
        self
    }

    /// Set `justify-self`.
    #[must_use]
    pub fn with_justify_self(mut self, alignment: SelfAlignment) -> Self {
        self.justify_self = alignment;
        self
    }

    /// Set `align-self`.
    #[must_use]
    pub fn with_align_self(mut self, alignment: SelfAlignment) -> Self {
        self.align_self = alignment;
        self
    }

    /// Set the box-model inputs for one axis.
    #[must_use]
    pub fn with_box(mut self, axis: GridAxis, axis_box: ItemAxisBox) -> Self {
        *self.boxes.get_mut(axis) = axis_box;
        self
    }

    /// The start/end placement properties for `axis`.
    pub const fn positions(&self, axis: GridAxis) -> (&GridPosition, &GridPosition) {
        match axis {
            GridAxis::Row => (&self.row_start, &self.row_end),
            GridAxis::Column => (&self.col_start, &self.col_end),
        }
    }

    /// Self-alignment property acting along `axis` (`justify-self` for columns).
    pub const fn self_alignment(&self, axis: GridAxis) -> SelfAlignment {
        match axis {
            GridAxis::Row => self.align_self,
            GridAxis::Column => self.justify_self,
        }
    }
}

/// Border-box size of an item after layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ItemSize {
    /// Inline size
    pub width: f32,
    /// Block size
    pub height: f32,
}

impl ItemSize {
    /// Size along `axis`.
    pub const fn along(self, axis: GridAxis) -> f32 {
        match axis {
            GridAxis::Row => self.height,
            GridAxis::Column => self.width,
        }
    }
}

/// The box-model collaborator the grid engine measures and lays out items through.
///
/// Contributions are margin-box sizes. `cross_size` is the item's grid-area breadth on
/// the other axis when already known (row sizing passes the resolved column area).
///
/// Implementations must not re-enter layout of the container being sized; a recursive
/// dependency is answered with a best-effort estimate.
pub trait GridItemContent {
    /// Min-content contribution of `item` along `axis`.
    fn min_content_contribution(
        &mut self,
        item: ItemHandle,
        axis: GridAxis,
        cross_size: Option<f32>,
    ) -> f32;

    /// Max-content contribution of `item` along `axis`.
    fn max_content_contribution(
        &mut self,
        item: ItemHandle,
        axis: GridAxis,
        cross_size: Option<f32>,
    ) -> f32;

    /// Minimum contribution, used by `auto` minimums.
    ///
    /// Spec: §6.6 Automatic Minimum Size of Grid Items
    fn minimum_contribution(
        &mut self,
        item: ItemHandle,
        axis: GridAxis,
        cross_size: Option<f32>,
    ) -> f32 {
        self.min_content_contribution(item, axis, cross_size)
    }

    /// Set (or clear, with `None`) the content-box size `item` must use along `axis`.
    fn set_content_size_override(&mut self, item: ItemHandle, axis: GridAxis, size: Option<f32>);

    /// Lay `item` out inside its grid area and report its border-box size.
    fn layout_item(&mut self, item: ItemHandle, area: ItemSize) -> ItemSize;
}
