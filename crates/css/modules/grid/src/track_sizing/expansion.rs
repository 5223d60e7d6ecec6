//! Flexible track expansion.
//!
//! Spec: §12.7 Expand Flexible Tracks
//! <https://www.w3.org/TR/css-grid-2/#algo-flex-tracks>

use core::cmp::Ordering;
use core::ops::Range;

use crate::types::{GridItemContent, GridTrackSize};

use super::helpers::{ContributionKind, ItemContributions};
use super::{GridTrack, TrackSizingContext};

/// Snapshot of one flexible track, sorted by its base size per `fr`.
#[derive(Debug, Clone, Copy)]
struct FlexTrackRecord {
    flex_factor: f32,
    base_size: f32,
    normalized_flex_value: f32,
}

fn sort_by_normalized_flex_value(first: &FlexTrackRecord, second: &FlexTrackRecord) -> Ordering {
    first
        .normalized_flex_value
        .total_cmp(&second.normalized_flex_value)
}

/// Spec: §12.7.1 Find the Size of an `fr`
///
/// The largest `fr` size that lets the flexible tracks of `range` fill
/// `space_to_fill`. Flexible tracks whose base size already exceeds their share are
/// treated as inflexible.
pub fn find_flex_factor_unit_size(
    sizes: &[GridTrackSize],
    tracks: &[GridTrack],
    range: Range<usize>,
    space_to_fill: f32,
) -> f32 {
    if space_to_fill <= 0.0 {
        return 0.0;
    }

    let mut allocated_space = 0.0;
    let mut flexible = Vec::new();
    for index in range {
        let (Some(size), Some(track)) = (sizes.get(index), tracks.get(index)) else {
            continue;
        };
        allocated_space += track.base_size();
        let flex_factor = size.flex_factor();
        if size.has_flex_max() && flex_factor > 0.0 {
            flexible.push(FlexTrackRecord {
                flex_factor,
                base_size: track.base_size(),
                normalized_flex_value: track.base_size() / flex_factor,
            });
        }
    }
    if flexible.is_empty() {
        return 0.0;
    }
    flexible.sort_by(sort_by_normalized_flex_value);

    let mut accumulated_fractions = 0.0;
    let mut fraction_value = 0.0;
    let mut leftover_space = space_to_fill - allocated_space;
    for record in &flexible {
        if record.normalized_flex_value > fraction_value {
            // This track's base size is worth more than the fraction that still fits:
            // stop and keep it inflexible.
            if record.normalized_flex_value * accumulated_fractions > leftover_space {
                break;
            }
            fraction_value = record.normalized_flex_value;
        }
        accumulated_fractions += record.flex_factor;
        leftover_space += record.base_size;
    }

    if accumulated_fractions <= 0.0 {
        0.0
    } else {
        (leftover_space / accumulated_fractions).max(0.0)
    }
}

/// Spec: §12.7 Expand Flexible Tracks
///
/// With a definite available size the `fr` size fills the space left by the other
/// tracks. Otherwise it is the largest size any flexible track or any item crossing
/// one needs.
pub fn expand_flexible_tracks<C: GridItemContent + ?Sized>(
    ctx: &TrackSizingContext<'_>,
    tracks: &mut [GridTrack],
    contributions: &mut ItemContributions<'_, C>,
) {
    let flexible: Vec<usize> = ctx
        .sizes
        .iter()
        .enumerate()
        .filter(|(_, size)| size.has_flex_max())
        .map(|(index, _)| index)
        .collect();
    if flexible.is_empty() {
        return;
    }

    let flex_fraction = ctx.available_space.definite().map_or_else(
        || indefinite_flex_fraction(ctx, tracks, &flexible, contributions),
        |available| {
            find_flex_factor_unit_size(
                &ctx.sizes,
                tracks,
                0..tracks.len(),
                available - ctx.total_gap,
            )
        },
    );

    tracing::debug!(
        "expand_flexible_tracks: axis={:?}, flexible={flexible:?}, fr={flex_fraction}",
        ctx.axis
    );

    for &index in &flexible {
        let flex_factor = ctx.sizes[index].flex_factor();
        let track = &mut tracks[index];
        let base_size = track.base_size().max(flex_fraction * flex_factor);
        track.set_base_size(base_size);
    }
}

/// Spec: §12.7 "If the free space is an indefinite length"
fn indefinite_flex_fraction<C: GridItemContent + ?Sized>(
    ctx: &TrackSizingContext<'_>,
    tracks: &[GridTrack],
    flexible: &[usize],
    contributions: &mut ItemContributions<'_, C>,
) -> f32 {
    let mut flex_fraction = flexible
        .iter()
        .map(|&index| tracks[index].base_size() / ctx.sizes[index].flex_factor().max(1.0))
        .fold(0.0, f32::max);

    for (position, &track_index) in flexible.iter().enumerate() {
        for item in ctx.placement.topology.iter_track(ctx.axis, track_index, 0) {
            let Some(coordinate) = ctx.coordinate(item) else {
                continue;
            };
            let span = coordinate.span(ctx.axis);
            // Items reaching back to an earlier flexible track were already measured.
            if position > 0 && span.initial_position <= flexible[position - 1] {
                continue;
            }
            let max_content =
                contributions.contribution(item, coordinate, ContributionKind::MaxContent);
            flex_fraction = flex_fraction.max(find_flex_factor_unit_size(
                &ctx.sizes,
                tracks,
                span.tracks(),
                max_content - ctx.span_gaps(span),
            ));
        }
    }
    flex_fraction
}
