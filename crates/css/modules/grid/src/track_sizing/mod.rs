//! Grid track sizing algorithm.
//!
//! Spec: §12 Grid Sizing
//! <https://www.w3.org/TR/css-grid-2/#algo-track-sizing>

mod distribution;
mod expansion;
mod helpers;
mod resolution;

use std::collections::HashMap;

use crate::line_resolution::{GRID_MAX_TRACKS, GridCoordinate, GridSpan};
use crate::placement::GridPlacement;
use crate::types::{AvailableSpace, GridAxis, GridItemContent, GridTrackSize, ItemHandle};

use helpers::ItemContributions;

/// Tracks for a specific axis.
#[derive(Debug, Clone, Default)]
pub struct GridAxisTracks {
    /// Explicit track definitions (`grid-template-rows`/`-columns`)
    pub tracks: Vec<GridTrackSize>,
    /// Size of implicit tracks (`grid-auto-rows`/`-columns`)
    pub auto_track: GridTrackSize,
    /// Gap between tracks
    pub gap: f32,
    /// Line names, each mapped to its ascending 0-based line indices
    pub named_lines: HashMap<String, Vec<usize>>,
}

impl GridAxisTracks {
    /// Create a new axis tracks definition.
    pub fn new(tracks: Vec<GridTrackSize>, gap: f32) -> Self {
        Self {
            tracks,
            auto_track: GridTrackSize::auto(),
            gap: gap.max(0.0),
            named_lines: HashMap::new(),
        }
    }

    /// Set the size of implicit tracks.
    #[must_use]
    pub fn with_auto_track(mut self, auto_track: GridTrackSize) -> Self {
        self.auto_track = auto_track;
        self
    }

    /// Give 0-based `line` the name `name`.
    #[must_use]
    pub fn with_named_line(mut self, name: impl Into<String>, line: usize) -> Self {
        let lines = self.named_lines.entry(name.into()).or_default();
        if let Err(position) = lines.binary_search(&line) {
            lines.insert(position, line);
        }
        self
    }

    /// Get the number of explicit tracks.
    pub fn explicit_count(&self) -> usize {
        self.tracks.len().min(GRID_MAX_TRACKS)
    }

    /// Sizing function of track `index`, explicit or implicit.
    pub fn track_size(&self, index: usize) -> GridTrackSize {
        self.tracks.get(index).copied().unwrap_or(self.auto_track)
    }

    /// Sizing functions of the first `track_count` tracks, percentages resolved
    /// against `available`.
    pub fn sizing_functions(
        &self,
        track_count: usize,
        available: AvailableSpace,
    ) -> Vec<GridTrackSize> {
        (0..track_count)
            .map(|index| self.track_size(index).resolved_for(available))
            .collect()
    }

    /// Lines carrying `name`, in ascending order.
    pub fn lines_named(&self, name: &str) -> Option<&[usize]> {
        self.named_lines.get(name).map(Vec::as_slice)
    }

    /// Total gutter size between `track_count` tracks.
    pub fn total_gap(&self, track_count: usize) -> f32 {
        self.gap * track_count.saturating_sub(1) as f32
    }
}

/// Mutable sizing state of one track during a layout pass.
///
/// `growth_limit` is `f32::INFINITY` while unbounded and never below `base_size`
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTrack {
    base_size: f32,
    growth_limit: f32,
    /// Size the track will take at the end of the current distribution step
    pub planned_size: f32,
    /// Working size while space is being handed out
    pub size_during_distribution: f32,
    /// Set when an infinite growth limit was just made finite during the
    /// intrinsic-maximums step
    pub infinitely_growable: bool,
}

impl GridTrack {
    pub fn new(base_size: f32, growth_limit: f32) -> Self {
        let mut track = Self {
            base_size: 0.0,
            growth_limit,
            planned_size: 0.0,
            size_during_distribution: 0.0,
            infinitely_growable: false,
        };
        track.set_base_size(base_size);
        track
    }

    pub const fn base_size(&self) -> f32 {
        self.base_size
    }

    pub const fn growth_limit(&self) -> f32 {
        self.growth_limit
    }

    pub fn set_base_size(&mut self, base_size: f32) {
        self.base_size = base_size.max(0.0);
        self.ensure_growth_limit_is_bigger_than_base_size();
    }

    pub fn set_growth_limit(&mut self, growth_limit: f32) {
        self.growth_limit = growth_limit;
        self.ensure_growth_limit_is_bigger_than_base_size();
    }

    /// Check if the growth limit is unbounded.
    pub fn has_infinite_growth_limit(&self) -> bool {
        self.growth_limit.is_infinite()
    }

    /// Check if the track can absorb any amount of extra space.
    pub fn infinite_growth_potential(&self) -> bool {
        self.has_infinite_growth_limit() || self.infinitely_growable
    }

    /// Growth limit, or the base size while the limit is unbounded.
    pub fn finite_growth_limit(&self) -> f32 {
        if self.has_infinite_growth_limit() {
            self.base_size
        } else {
            self.growth_limit
        }
    }

    fn ensure_growth_limit_is_bigger_than_base_size(&mut self) {
        if !self.has_infinite_growth_limit() && self.growth_limit < self.base_size {
            self.growth_limit = self.base_size;
        }
    }
}

/// Parameters for track sizing.
#[derive(Debug)]
pub struct TrackSizingParams<'params> {
    /// Axis tracks definition
    pub axis_tracks: &'params GridAxisTracks,
    /// Available space for this axis
    pub available_space: AvailableSpace,
    /// Placement results
    pub placement: &'params GridPlacement,
    /// Axis being sized
    pub axis: GridAxis,
    /// Final sizes of the other axis, when it has already been sized
    pub cross_sizes: Option<&'params ResolvedTrackSizes>,
}

/// Resolved track sizes after running the track sizing algorithm.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedTrackSizes {
    /// Base sizes for each track
    pub base_sizes: Vec<f32>,
    /// Growth limits for each track
    pub growth_limits: Vec<f32>,
    /// Gap between tracks
    pub gap: f32,
}

impl ResolvedTrackSizes {
    fn from_tracks(tracks: &[GridTrack], gap: f32) -> Self {
        Self {
            base_sizes: tracks.iter().map(GridTrack::base_size).collect(),
            growth_limits: tracks.iter().map(GridTrack::growth_limit).collect(),
            gap,
        }
    }

    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.base_sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base_sizes.is_empty()
    }

    /// Get the final size for a track (0 past the last track).
    pub fn final_size(&self, index: usize) -> f32 {
        self.base_sizes.get(index).copied().unwrap_or(0.0)
    }

    /// Sum of all base sizes plus the gaps between them.
    pub fn total_size(&self) -> f32 {
        self.gap.mul_add(
            self.len().saturating_sub(1) as f32,
            self.base_sizes.iter().sum::<f32>(),
        )
    }

    /// Breadth of a grid area spanning `span`, including its interior gaps.
    pub fn area_breadth(&self, span: GridSpan) -> f32 {
        let tracks: f32 = span.tracks().map(|index| self.final_size(index)).sum();
        self.gap.mul_add((span.span() - 1) as f32, tracks)
    }
}

/// Context for track sizing operations.
#[derive(Debug)]
pub struct TrackSizingContext<'ctx> {
    /// Axis being sized
    pub axis: GridAxis,
    /// Sizing function of every track, percentages already resolved
    pub sizes: Vec<GridTrackSize>,
    /// Placement results
    pub placement: &'ctx GridPlacement,
    /// Total gutter size of the axis
    pub total_gap: f32,
    /// Gap between adjacent tracks
    pub gap: f32,
    /// Available space for this axis
    pub available_space: AvailableSpace,
}

impl TrackSizingContext<'_> {
    /// The grid area of `item`.
    fn coordinate(&self, item: ItemHandle) -> Option<GridCoordinate> {
        self.placement.coordinate(item)
    }

    /// Interior gaps of a span.
    fn span_gaps(&self, span: GridSpan) -> f32 {
        self.gap * (span.span() - 1) as f32
    }
}

/// Resolve track sizes according to the grid sizing algorithm.
///
/// Spec: §12.3 Track Sizing Algorithm
/// <https://www.w3.org/TR/css-grid-2/#algo-track-sizing>
///
/// Runs, in order: initialization, intrinsic sizing, maximization and `fr` expansion.
/// The stretch step is left to content distribution, which also knows about
/// `justify-content`/`align-content`.
pub fn resolve_track_sizes<C: GridItemContent + ?Sized>(
    params: &TrackSizingParams<'_>,
    content: &mut C,
) -> ResolvedTrackSizes {
    let track_count = params.placement.topology.track_count(params.axis);
    let ctx = TrackSizingContext {
        axis: params.axis,
        sizes: params
            .axis_tracks
            .sizing_functions(track_count, params.available_space),
        placement: params.placement,
        total_gap: params.axis_tracks.total_gap(track_count),
        gap: params.axis_tracks.gap,
        available_space: params.available_space,
    };

    tracing::debug!(
        "resolve_track_sizes: axis={:?}, available_space={:?}, tracks={}, items={}",
        params.axis,
        params.available_space,
        track_count,
        params.placement.len()
    );

    let mut contributions = ItemContributions::new(content, params.axis, params.cross_sizes);

    // Step 1: Initialize track sizes
    let mut tracks = resolution::initialize_track_sizes(&ctx);

    // Step 2: Resolve intrinsic track sizes
    resolution::resolve_intrinsic_track_sizes(&ctx, &mut tracks, &mut contributions);
    debug_assert!(
        tracks.iter().all(|track| !track.infinite_growth_potential()),
        "growth limits must be finite after intrinsic sizing"
    );
    tracing::debug!(
        "After intrinsic sizing: {:?}",
        tracks.iter().map(GridTrack::base_size).collect::<Vec<_>>()
    );

    // Step 3: Maximize tracks
    let free_space = ctx.available_space.definite().map(|available| {
        available - ctx.total_gap - tracks.iter().map(GridTrack::base_size).sum::<f32>()
    });
    match free_space {
        Some(free_space) if free_space <= 0.0 => {
            tracing::debug!("No free space left ({free_space}), skipping maximize and flex");
            return ResolvedTrackSizes::from_tracks(&tracks, ctx.gap);
        }
        Some(free_space) => distribution::maximize_tracks(&mut tracks, free_space),
        None => {
            for track in &mut tracks {
                let growth_limit = track.finite_growth_limit();
                track.set_base_size(growth_limit);
            }
        }
    }

    // Step 4: Expand flexible tracks
    expansion::expand_flexible_tracks(&ctx, &mut tracks, &mut contributions);

    tracing::debug!(
        "resolve_track_sizes: axis={:?} final base sizes {:?}",
        params.axis,
        tracks.iter().map(GridTrack::base_size).collect::<Vec<_>>()
    );

    ResolvedTrackSizes::from_tracks(&tracks, ctx.gap)
}
