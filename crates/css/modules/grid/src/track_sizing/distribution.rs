//! Space distribution shared by intrinsic sizing and track maximization.
//!
//! Spec: §12.5.1 Distributing Extra Space Across Spanned Tracks, §12.6 Maximize Tracks
//! <https://www.w3.org/TR/css-grid-2/#extra-space>

use core::cmp::Ordering;

use crate::types::GridTrackSize;

use super::GridTrack;
use super::helpers::ContributionKind;

/// Whether an infinite growth limit may be reported as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSizeRestriction {
    AllowInfinity,
    ForbidInfinity,
}

/// The sub-steps of intrinsic sizing, plus maximization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSizeComputationPhase {
    /// Intrinsic minimums grow to the items' minimum contributions
    ResolveIntrinsicMinimums,
    /// `min-content`/`max-content` minimums grow to min-content contributions
    ResolveContentBasedMinimums,
    /// `max-content` minimums grow to max-content contributions
    ResolveMaxContentMinimums,
    /// Intrinsic maximums grow to min-content contributions
    ResolveIntrinsicMaximums,
    /// `max-content`/`auto` maximums grow to max-content contributions
    ResolveMaxContentMaximums,
    /// Free space is handed out up to the growth limits
    MaximizeTracks,
}

impl TrackSizeComputationPhase {
    /// The intrinsic sizing phases, in the order they run for each span group.
    pub const CONTENT_SIZED: [Self; 5] = [
        Self::ResolveIntrinsicMinimums,
        Self::ResolveContentBasedMinimums,
        Self::ResolveMaxContentMinimums,
        Self::ResolveIntrinsicMaximums,
        Self::ResolveMaxContentMaximums,
    ];

    /// The size this phase grows: the base size, or the growth limit for the
    /// maximum phases.
    pub fn track_size(self, track: &GridTrack, restriction: TrackSizeRestriction) -> f32 {
        match self {
            Self::ResolveIntrinsicMinimums
            | Self::ResolveContentBasedMinimums
            | Self::ResolveMaxContentMinimums
            | Self::MaximizeTracks => track.base_size(),
            Self::ResolveIntrinsicMaximums | Self::ResolveMaxContentMaximums => match restriction {
                TrackSizeRestriction::AllowInfinity => track.growth_limit(),
                TrackSizeRestriction::ForbidInfinity => track.finite_growth_limit(),
            },
        }
    }

    /// Check if a track with sizing function `size` takes part in this phase.
    pub fn should_process(self, size: &GridTrackSize) -> bool {
        match self {
            Self::ResolveIntrinsicMinimums => size.has_intrinsic_min(),
            Self::ResolveContentBasedMinimums => size.has_min_or_max_content_min(),
            Self::ResolveMaxContentMinimums => size.has_max_content_min(),
            Self::ResolveIntrinsicMaximums => size.has_intrinsic_max(),
            Self::ResolveMaxContentMaximums => size.has_max_content_or_auto_max(),
            Self::MaximizeTracks => true,
        }
    }

    /// Check if leftover space may push a track past its growth limit.
    pub fn should_grow_beyond_growth_limits(self, size: &GridTrackSize) -> bool {
        match self {
            Self::ResolveIntrinsicMinimums | Self::ResolveContentBasedMinimums => {
                size.has_auto_or_min_content_min_and_intrinsic_max()
            }
            Self::ResolveMaxContentMinimums => size.has_max_content_min_and_max_content_max(),
            Self::ResolveIntrinsicMaximums | Self::ResolveMaxContentMaximums => true,
            Self::MaximizeTracks => false,
        }
    }

    /// Which item contribution this phase accommodates.
    pub const fn contribution_kind(self) -> ContributionKind {
        match self {
            Self::ResolveIntrinsicMinimums => ContributionKind::Minimum,
            Self::ResolveContentBasedMinimums | Self::ResolveIntrinsicMaximums => {
                ContributionKind::MinContent
            }
            Self::ResolveMaxContentMinimums
            | Self::ResolveMaxContentMaximums
            | Self::MaximizeTracks => ContributionKind::MaxContent,
        }
    }

    /// Spec: §12.5 step 3.4 "mark any tracks whose growth limit changed from infinite
    /// to finite in this step as infinitely growable for the next step"
    pub fn mark_infinitely_growable(self, track: &mut GridTrack) {
        match self {
            Self::ResolveIntrinsicMaximums => {
                if track.has_infinite_growth_limit() && track.planned_size.is_finite() {
                    track.infinitely_growable = true;
                }
            }
            Self::ResolveMaxContentMaximums => track.infinitely_growable = false,
            _ => {}
        }
    }

    /// Commit the planned size to the size this phase grows.
    pub fn update_track_size(self, track: &mut GridTrack) {
        match self {
            Self::ResolveIntrinsicMaximums | Self::ResolveMaxContentMaximums => {
                track.set_growth_limit(track.planned_size);
            }
            _ => track.set_base_size(track.planned_size),
        }
    }
}

/// Snapshot of one track, sorted without touching the live track list.
#[derive(Debug, Clone, Copy)]
struct TrackGrowthRecord {
    index: usize,
    base_size: f32,
    growth_limit: f32,
    track_size: f32,
    infinite_growth_potential: bool,
}

impl TrackGrowthRecord {
    fn new(index: usize, track: &GridTrack, phase: TrackSizeComputationPhase) -> Self {
        Self {
            index,
            base_size: track.base_size(),
            growth_limit: track.growth_limit(),
            track_size: phase.track_size(track, TrackSizeRestriction::ForbidInfinity),
            infinite_growth_potential: track.infinite_growth_potential(),
        }
    }
}

/// Least room to grow first; tracks that can grow without limit go last.
fn sort_by_growth_potential(first: &TrackGrowthRecord, second: &TrackGrowthRecord) -> Ordering {
    match (
        first.infinite_growth_potential,
        second.infinite_growth_potential,
    ) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => (first.growth_limit - first.base_size)
            .total_cmp(&(second.growth_limit - second.base_size)),
    }
}

/// Hand `available_space` out to the tracks in `filtered`.
///
/// Each track first grows up to its limit, smallest room first, each taking an even
/// share of what is left. Space still left afterwards goes evenly to `grow_beyond`.
/// The result is folded into every filtered track's planned size.
pub fn distribute_space_to_tracks(
    phase: TrackSizeComputationPhase,
    tracks: &mut [GridTrack],
    filtered: &[usize],
    grow_beyond: &[usize],
    available_space: f32,
) {
    for &index in filtered {
        let track = &mut tracks[index];
        track.size_during_distribution =
            phase.track_size(track, TrackSizeRestriction::ForbidInfinity);
    }

    let mut available_space = available_space;
    if available_space > 0.0 {
        let mut records: Vec<_> = filtered
            .iter()
            .map(|&index| TrackGrowthRecord::new(index, &tracks[index], phase))
            .collect();
        records.sort_by(sort_by_growth_potential);

        let count = records.len();
        for (position, record) in records.iter().enumerate() {
            let share = available_space / (count - position) as f32;
            let growth_share = if record.infinite_growth_potential {
                share
            } else {
                share.min(record.growth_limit - record.track_size).max(0.0)
            };
            tracks[record.index].size_during_distribution += growth_share;
            available_space -= growth_share;
        }
    }

    if available_space > 0.0 && !grow_beyond.is_empty() {
        let count = grow_beyond.len();
        for (position, &index) in grow_beyond.iter().enumerate() {
            let share = available_space / (count - position) as f32;
            tracks[index].size_during_distribution += share;
            available_space -= share;
        }
    }

    for &index in filtered {
        let track = &mut tracks[index];
        track.planned_size = if track.planned_size.is_infinite() {
            track.size_during_distribution
        } else {
            track.planned_size.max(track.size_during_distribution)
        };
    }

    tracing::trace!(
        "distribute_space_to_tracks: phase={phase:?}, tracks={filtered:?}, leftover={available_space}"
    );
}

/// Spec: §12.6 Maximize Tracks
///
/// Grow every track from its base size towards its growth limit until the free space
/// runs out.
pub fn maximize_tracks(tracks: &mut [GridTrack], free_space: f32) {
    let all: Vec<usize> = (0..tracks.len()).collect();
    for track in tracks.iter_mut() {
        track.planned_size = track.base_size();
    }
    distribute_space_to_tracks(
        TrackSizeComputationPhase::MaximizeTracks,
        tracks,
        &all,
        &[],
        free_space,
    );
    for track in tracks.iter_mut() {
        TrackSizeComputationPhase::MaximizeTracks.update_track_size(track);
    }
    tracing::debug!(
        "maximize_tracks: free_space={free_space}, base sizes {:?}",
        tracks.iter().map(GridTrack::base_size).collect::<Vec<_>>()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    /// # Panics
    /// Panics if unbounded tracks are not sorted last.
    #[test]
    fn growth_potential_ordering() {
        let tracks = [
            GridTrack::new(0.0, f32::INFINITY),
            GridTrack::new(10.0, 50.0),
            GridTrack::new(10.0, 20.0),
        ];
        let mut records: Vec<_> = tracks
            .iter()
            .enumerate()
            .map(|(index, track)| {
                TrackGrowthRecord::new(index, track, TrackSizeComputationPhase::MaximizeTracks)
            })
            .collect();
        records.sort_by(sort_by_growth_potential);
        let order: Vec<_> = records.iter().map(|record| record.index).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }

    /// # Panics
    /// Panics if leftover space is not handed to the grow-beyond tracks.
    #[test]
    fn leftover_space_grows_beyond_limits() {
        let mut tracks = vec![GridTrack::new(0.0, 10.0), GridTrack::new(0.0, 40.0)];
        for track in &mut tracks {
            track.planned_size = track.base_size();
        }
        distribute_space_to_tracks(
            TrackSizeComputationPhase::ResolveIntrinsicMinimums,
            &mut tracks,
            &[0, 1],
            &[0],
            70.0,
        );
        // 10 + 40 reach their limits; the last 20 go to track 0 alone.
        assert!((tracks[0].planned_size - 30.0).abs() < EPSILON);
        assert!((tracks[1].planned_size - 40.0).abs() < EPSILON);
    }

    /// # Panics
    /// Panics if maximization exceeds growth limits or the free space.
    #[test]
    fn maximize_respects_limits() {
        let mut tracks = vec![GridTrack::new(10.0, 15.0), GridTrack::new(0.0, 100.0)];
        maximize_tracks(&mut tracks, 40.0);
        assert!((tracks[0].base_size() - 15.0).abs() < EPSILON);
        assert!((tracks[1].base_size() - 35.0).abs() < EPSILON);
    }
}
