//! Content distribution: `justify-content`/`align-content` and grid line positions.
//!
//! Spec: §11.8 Stretch `auto` Tracks and CSS Box Alignment §5.3
//! <https://www.w3.org/TR/css-grid-2/#algo-stretch>
//! <https://www.w3.org/TR/css-align-3/#distribution-values>

use crate::alignment::{
    ContentAlignment, ContentDistribution, ContentPosition, Direction, OverflowAlignment,
};
use crate::line_resolution::GridSpan;
use crate::track_sizing::ResolvedTrackSizes;
use crate::types::{AvailableSpace, GridAxis, GridTrackSize};

/// Offsets applied to the tracks of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentAlignmentData {
    /// Offset of the first grid line
    pub position_offset: f32,
    /// Extra space inserted after every track but the last
    pub distribution_offset: f32,
}

/// Offsets for a `<content-distribution>` value, or `None` when it cannot apply
/// (no free space, or too few tracks) and the fallback position must be used.
pub fn content_distribution_offset(
    free_space: f32,
    distribution: ContentDistribution,
    track_count: usize,
) -> Option<ContentAlignmentData> {
    if free_space <= 0.0 {
        return None;
    }
    let tracks = track_count as f32;
    match distribution {
        ContentDistribution::SpaceBetween if track_count >= 2 => Some(ContentAlignmentData {
            position_offset: 0.0,
            distribution_offset: free_space / (tracks - 1.0),
        }),
        ContentDistribution::SpaceAround if track_count >= 1 => {
            let distribution_offset = free_space / tracks;
            Some(ContentAlignmentData {
                position_offset: distribution_offset / 2.0,
                distribution_offset,
            })
        }
        ContentDistribution::SpaceEvenly => {
            let distribution_offset = free_space / (tracks + 1.0);
            Some(ContentAlignmentData {
                position_offset: distribution_offset,
                distribution_offset,
            })
        }
        // Stretched tracks already absorbed the free space.
        ContentDistribution::Stretch => Some(ContentAlignmentData::default()),
        ContentDistribution::SpaceBetween
        | ContentDistribution::SpaceAround
        | ContentDistribution::Default => None,
    }
}

/// Offsets for `alignment` given the free space left by the tracks.
///
/// Offsets are logical: they run from the axis' start edge. `left`/`right` only mean
/// something on the inline (column) axis and resolve against `direction` there.
/// `safe` overflow only clamps the position offset.
pub fn compute_content_alignment(
    alignment: ContentAlignment,
    axis: GridAxis,
    direction: Direction,
    free_space: f32,
    track_count: usize,
) -> ContentAlignmentData {
    let distribution = alignment.resolved_distribution();
    if distribution != ContentDistribution::Default
        && let Some(data) = content_distribution_offset(free_space, distribution, track_count)
    {
        return data;
    }

    if free_space <= 0.0 && alignment.overflow == OverflowAlignment::Safe {
        return ContentAlignmentData::default();
    }

    let to_start = 0.0;
    let to_end = free_space;
    let position_offset = match alignment.resolved_position() {
        ContentPosition::Left if axis.is_inline() && !direction.is_ltr() => to_end,
        ContentPosition::Right if axis.is_inline() && direction.is_ltr() => to_end,
        ContentPosition::Center => free_space / 2.0,
        ContentPosition::End | ContentPosition::FlexEnd => to_end,
        ContentPosition::Normal
        | ContentPosition::Start
        | ContentPosition::FlexStart
        | ContentPosition::Left
        | ContentPosition::Right
        | ContentPosition::Baseline
        | ContentPosition::LastBaseline => to_start,
    };
    ContentAlignmentData {
        position_offset,
        distribution_offset: 0.0,
    }
}

/// Spec: §11.8 Stretch `auto` Tracks
///
/// With `stretch` (or `normal`) content distribution and positive free space in a
/// definite axis, the free space is shared equally by the tracks with a
/// content-based maximum. Fixed and flexible tracks keep their size.
pub fn stretch_auto_tracks(
    sizes: &mut ResolvedTrackSizes,
    track_sizes: &[GridTrackSize],
    alignment: ContentAlignment,
    available: AvailableSpace,
) {
    if alignment.resolved_distribution() != ContentDistribution::Stretch {
        return;
    }
    let Some(available) = available.definite() else {
        return;
    };
    let free_space = available - sizes.total_size();
    if free_space <= 0.0 {
        return;
    }

    let stretchable: Vec<usize> = track_sizes
        .iter()
        .enumerate()
        .take(sizes.len())
        .filter(|(_, size)| size.has_intrinsic_max())
        .map(|(index, _)| index)
        .collect();
    if stretchable.is_empty() {
        return;
    }

    let increase = free_space / stretchable.len() as f32;
    for index in stretchable {
        sizes.base_sizes[index] += increase;
        sizes.growth_limits[index] = sizes.growth_limits[index].max(sizes.base_sizes[index]);
    }
    log::debug!(
        target: "css::grid::alignment",
        "stretched content-sized tracks by {increase} each"
    );
}

/// Final line positions of one axis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridAxisLines {
    /// Logical position of every grid line, one more than there are tracks
    pub positions: Vec<f32>,
    /// Offsets the positions were built with
    pub alignment: ContentAlignmentData,
    /// Gap between tracks
    pub gap: f32,
}

impl GridAxisLines {
    /// Build line positions from track sizes and content alignment offsets.
    ///
    /// The first line sits at the position offset, each following line after one
    /// track, the gap and the distribution offset; the last line gets neither.
    pub fn new(sizes: &ResolvedTrackSizes, alignment: ContentAlignmentData) -> Self {
        let mut positions = Vec::with_capacity(sizes.len() + 1);
        let mut position = alignment.position_offset;
        positions.push(position);
        for (index, base_size) in sizes.base_sizes.iter().enumerate() {
            position += base_size;
            if index + 1 < sizes.len() {
                position += sizes.gap + alignment.distribution_offset;
            }
            positions.push(position);
        }
        Self {
            positions,
            alignment,
            gap: sizes.gap,
        }
    }

    /// Number of tracks.
    pub fn track_count(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }

    fn line(&self, line: usize) -> f32 {
        self.positions
            .get(line)
            .or_else(|| self.positions.last())
            .copied()
            .unwrap_or(0.0)
    }

    /// Start edge of the area covering `span`.
    pub fn area_start(&self, span: GridSpan) -> f32 {
        self.line(span.start_line())
    }

    /// End edge of the area covering `span`, without the gap and distribution offset
    /// that follow a track which is not the last one.
    pub fn area_end(&self, span: GridSpan) -> f32 {
        let end_line = span.end_line();
        let end = self.line(end_line);
        if end_line < self.track_count() {
            end - self.gap - self.alignment.distribution_offset
        } else {
            end
        }
    }

    /// Distance from the first to the last line.
    pub fn extent(&self) -> f32 {
        match (self.positions.first(), self.positions.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}

/// Align the tracks of one axis inside the container and produce its line positions.
pub fn distribute_content(
    sizes: &ResolvedTrackSizes,
    alignment: ContentAlignment,
    available: AvailableSpace,
    axis: GridAxis,
    direction: Direction,
) -> GridAxisLines {
    let free_space = available
        .definite()
        .map_or(0.0, |available| available - sizes.total_size());
    let data = compute_content_alignment(alignment, axis, direction, free_space, sizes.len());
    log::debug!(
        target: "css::grid::alignment",
        "{axis:?} content alignment {alignment:?}: free={free_space}, offsets={data:?}"
    );
    GridAxisLines::new(sizes, data)
}
