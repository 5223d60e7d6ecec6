//! Track size initialization and intrinsic track sizing.
//!
//! Spec: §12.4 Initialize Track Sizes, §12.5 Resolve Intrinsic Track Sizes
//! <https://www.w3.org/TR/css-grid-2/#algo-content>

use std::collections::HashSet;

use crate::line_resolution::{GridCoordinate, GridSpan};
use crate::types::{GridItemContent, GridTrackSize, ItemHandle};

use super::distribution::{
    TrackSizeComputationPhase, TrackSizeRestriction, distribute_space_to_tracks,
};
use super::helpers::{ContributionKind, ItemContributions};
use super::{GridTrack, TrackSizingContext};

/// A multi-track item waiting for its span group.
#[derive(Debug, Clone, Copy)]
struct SpanningItem {
    item: ItemHandle,
    coordinate: GridCoordinate,
    span: GridSpan,
}

/// Spec: §12.4 Initialize Track Sizes
///
/// Fixed minimums become the base size, everything else starts at zero. Fixed
/// maximums become the growth limit, intrinsic ones start unbounded and flexible
/// ones start at the base size.
pub fn initialize_track_sizes(ctx: &TrackSizingContext<'_>) -> Vec<GridTrack> {
    ctx.sizes
        .iter()
        .map(|size| {
            let base_size = size
                .min_breadth()
                .definite_size(ctx.available_space)
                .unwrap_or(0.0);
            let growth_limit = if size.has_intrinsic_max() {
                f32::INFINITY
            } else {
                size.max_breadth()
                    .definite_size(ctx.available_space)
                    .unwrap_or(base_size)
            };
            GridTrack::new(base_size, growth_limit)
        })
        .collect()
}

/// Spec: §12.5 Resolve Intrinsic Track Sizes
pub fn resolve_intrinsic_track_sizes<C: GridItemContent + ?Sized>(
    ctx: &TrackSizingContext<'_>,
    tracks: &mut [GridTrack],
    contributions: &mut ItemContributions<'_, C>,
) {
    let content_sized: Vec<usize> = ctx
        .sizes
        .iter()
        .enumerate()
        .filter(|(_, size)| size.is_content_sized())
        .map(|(index, _)| index)
        .collect();
    if content_sized.is_empty() {
        return;
    }

    let mut seen = HashSet::new();
    let mut spanning = Vec::new();
    for &track_index in &content_sized {
        for item in ctx.placement.topology.iter_track(ctx.axis, track_index, 0) {
            if !seen.insert(item) {
                continue;
            }
            let Some(coordinate) = ctx.coordinate(item) else {
                continue;
            };
            let span = coordinate.span(ctx.axis);
            if span.span() == 1 {
                let track_position = span.initial_position;
                size_track_to_fit_non_spanning_item(
                    &ctx.sizes[track_position],
                    &mut tracks[track_position],
                    item,
                    coordinate,
                    contributions,
                );
            } else if !spans_flexible_track(ctx, span) {
                spanning.push(SpanningItem {
                    item,
                    coordinate,
                    span,
                });
            }
        }
    }

    // Spec: §12.5 step 3 "Increase sizes to accommodate spanning items", one span
    // length at a time, shortest first.
    spanning.sort_by_key(|entry| entry.span.span());
    for group in spanning.chunk_by(|first, second| first.span.span() == second.span.span()) {
        for phase in TrackSizeComputationPhase::CONTENT_SIZED {
            increase_sizes_to_accommodate_spanning_items(
                phase,
                ctx,
                &content_sized,
                tracks,
                group,
                contributions,
            );
        }
    }

    // Spec: §12.5 step 5 "If any track still has an infinite growth limit, set its
    // growth limit to its base size."
    for &track_index in &content_sized {
        let track = &mut tracks[track_index];
        if track.has_infinite_growth_limit() {
            let base_size = track.base_size();
            track.set_growth_limit(base_size);
        }
        track.infinitely_growable = false;
    }
}

/// Spec: §12.5 step 2 "Size tracks to fit non-spanning items"
fn size_track_to_fit_non_spanning_item<C: GridItemContent + ?Sized>(
    size: &GridTrackSize,
    track: &mut GridTrack,
    item: ItemHandle,
    coordinate: GridCoordinate,
    contributions: &mut ItemContributions<'_, C>,
) {
    let minimum_kind = if size.has_min_content_min() {
        Some(ContributionKind::MinContent)
    } else if size.has_max_content_min() {
        Some(ContributionKind::MaxContent)
    } else if size.has_auto_min() {
        Some(ContributionKind::Minimum)
    } else {
        None
    };
    if let Some(kind) = minimum_kind {
        let contribution = contributions.contribution(item, coordinate, kind);
        track.set_base_size(track.base_size().max(contribution));
    }

    let maximum_kind = if size.has_min_content_max() {
        Some(ContributionKind::MinContent)
    } else if size.has_max_content_or_auto_max() {
        Some(ContributionKind::MaxContent)
    } else {
        None
    };
    if let Some(kind) = maximum_kind {
        let contribution = contributions.contribution(item, coordinate, kind);
        // An unbounded growth limit is replaced outright, not maxed.
        let growth_limit = if track.has_infinite_growth_limit() {
            contribution
        } else {
            track.growth_limit().max(contribution)
        };
        track.set_growth_limit(growth_limit);
    }
}

/// Items crossing a flexible track are left to `fr` expansion.
fn spans_flexible_track(ctx: &TrackSizingContext<'_>, span: GridSpan) -> bool {
    span.tracks()
        .any(|index| ctx.sizes.get(index).is_some_and(GridTrackSize::has_flex_max))
}

/// Run one phase of §12.5 step 3 for one group of items sharing a span length.
fn increase_sizes_to_accommodate_spanning_items<C: GridItemContent + ?Sized>(
    phase: TrackSizeComputationPhase,
    ctx: &TrackSizingContext<'_>,
    content_sized: &[usize],
    tracks: &mut [GridTrack],
    group: &[SpanningItem],
    contributions: &mut ItemContributions<'_, C>,
) {
    for &track_index in content_sized {
        let track = &mut tracks[track_index];
        track.planned_size = phase.track_size(track, TrackSizeRestriction::AllowInfinity);
    }

    let mut filtered = Vec::new();
    let mut grow_beyond = Vec::new();
    for entry in group {
        filtered.clear();
        grow_beyond.clear();
        let mut spanning_tracks_size = ctx.span_gaps(entry.span);
        for track_index in entry.span.tracks() {
            let size = &ctx.sizes[track_index];
            spanning_tracks_size +=
                phase.track_size(&tracks[track_index], TrackSizeRestriction::ForbidInfinity);
            if !phase.should_process(size) {
                continue;
            }
            filtered.push(track_index);
            if phase.should_grow_beyond_growth_limits(size) {
                grow_beyond.push(track_index);
            }
        }
        if filtered.is_empty() {
            continue;
        }

        let contribution =
            contributions.contribution(entry.item, entry.coordinate, phase.contribution_kind());
        let extra_space = (contribution - spanning_tracks_size).max(0.0);
        let beyond_limits = if grow_beyond.is_empty() {
            &filtered
        } else {
            &grow_beyond
        };
        distribute_space_to_tracks(phase, tracks, &filtered, beyond_limits, extra_space);
    }

    for &track_index in content_sized {
        let track = &mut tracks[track_index];
        phase.mark_infinitely_growable(track);
        phase.update_track_size(track);
    }
}
