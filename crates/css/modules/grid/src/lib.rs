//! CSS Grid Layout Module Level 2
//! Spec: <https://www.w3.org/TR/css-grid-2/>
//!
//! This module implements CSS Grid layout, a two-dimensional layout system
//! that lets you lay out content in rows and columns.
//!
//! Item measurement and item layout are delegated to the caller through the
//! [`GridItemContent`] trait; the engine owns line resolution, placement, track
//! sizing and alignment.

// Grid container and item types
mod types;
pub use types::{
    AvailableSpace, GridAutoFlow, GridAxis, GridAxisPair, GridItem, GridItemContent,
    GridPosition, GridTrackSize, ItemAxisBox, ItemHandle, ItemSize, Margin, TrackBreadth,
};

// Box alignment keywords
mod alignment;
pub use alignment::{
    ContentAlignment, ContentDistribution, ContentPosition, Direction, ItemPosition,
    OverflowAlignment, SelfAlignment, WritingMode,
};

// Line-based placement resolution
mod line_resolution;
pub use line_resolution::{GRID_MAX_TRACKS, GridCoordinate, GridLineResolver, GridSpan};

// Cell occupancy
mod topology;
pub use topology::{GridIterator, GridTopology};

// Grid placement algorithm
mod placement;
pub use placement::{GridPlacement, place_grid_items};

// Track sizing algorithm
mod track_sizing;
pub use track_sizing::{
    GridAxisTracks, GridTrack, ResolvedTrackSizes, TrackSizingParams, resolve_track_sizes,
};

// Content distribution
mod content_distribution;
pub use content_distribution::{
    ContentAlignmentData, GridAxisLines, compute_content_alignment, distribute_content,
    stretch_auto_tracks,
};

// Item self-alignment
mod item_alignment;
pub use item_alignment::{
    AxisPlacement, GridAxisPosition, ItemAlignmentContext, ItemPlacement, ItemPlacer,
};

// Grid layout algorithm
mod layout;
pub use layout::{
    GridContainerInputs, GridLayoutResult, GridPlacedItem, layout_grid, layout_placed_items,
};

// Item arena
mod container;
pub use container::GridContainer;
