//! Line-based placement resolution.
//!
//! Spec: §8.3 Line-based Placement and §8.3.1 Grid Placement Conflict Handling
//! <https://www.w3.org/TR/css-grid-2/#line-placement>

use core::ops::Range;

use crate::track_sizing::GridAxisTracks;
use crate::types::{GridAxis, GridPosition};

/// Ceiling on the number of tracks in either axis of the grid.
///
/// Lines past the ceiling are clamped to it, which bounds the size of the topology.
pub const GRID_MAX_TRACKS: usize = 1000;

/// Tracks occupied by an item along one axis, as 0-based inclusive track indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSpan {
    /// First occupied track
    pub initial_position: usize,
    /// Last occupied track (inclusive)
    pub final_position: usize,
}

impl GridSpan {
    /// Create a span, clamped to the track ceiling, with `final >= initial`.
    pub fn new(initial_position: usize, final_position: usize) -> Self {
        let initial = initial_position.min(GRID_MAX_TRACKS - 1);
        Self {
            initial_position: initial,
            final_position: final_position.clamp(initial, GRID_MAX_TRACKS - 1),
        }
    }

    /// Span between two 0-based lines.
    ///
    /// An end line at or before the start line collapses to a single track.
    pub fn from_lines(start_line: usize, end_line: usize) -> Self {
        Self::new(start_line, end_line.saturating_sub(1))
    }

    /// `span` tracks starting at `initial_position`.
    pub fn with_size(initial_position: usize, span: usize) -> Self {
        Self::new(
            initial_position,
            initial_position + span.clamp(1, GRID_MAX_TRACKS) - 1,
        )
    }

    /// Number of tracks covered.
    pub const fn span(self) -> usize {
        self.final_position.saturating_sub(self.initial_position) + 1
    }

    /// 0-based start line.
    pub const fn start_line(self) -> usize {
        self.initial_position
    }

    /// 0-based end line.
    pub const fn end_line(self) -> usize {
        self.final_position + 1
    }

    /// Covered track indices.
    pub const fn tracks(self) -> Range<usize> {
        self.initial_position..self.final_position + 1
    }

    /// Check if `track` is covered.
    pub const fn contains(self, track: usize) -> bool {
        self.initial_position <= track && track <= self.final_position
    }
}

/// The grid area of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCoordinate {
    /// Occupied rows
    pub rows: GridSpan,
    /// Occupied columns
    pub columns: GridSpan,
}

impl GridCoordinate {
    pub const fn new(rows: GridSpan, columns: GridSpan) -> Self {
        Self { rows, columns }
    }

    /// Build a coordinate from the span along `axis` and the span across it.
    pub const fn from_axis_spans(axis: GridAxis, along: GridSpan, across: GridSpan) -> Self {
        match axis {
            GridAxis::Row => Self::new(along, across),
            GridAxis::Column => Self::new(across, along),
        }
    }

    /// The span along `axis`.
    pub const fn span(&self, axis: GridAxis) -> GridSpan {
        match axis {
            GridAxis::Row => self.rows,
            GridAxis::Column => self.columns,
        }
    }
}

/// Which placement property a position came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineSide {
    Start,
    End,
}

/// Resolves `grid-{row,column}-{start,end}` pairs against one axis of the explicit grid.
#[derive(Debug, Clone, Copy)]
pub struct GridLineResolver<'tracks> {
    tracks: &'tracks GridAxisTracks,
}

impl<'tracks> GridLineResolver<'tracks> {
    pub const fn new(tracks: &'tracks GridAxisTracks) -> Self {
        Self { tracks }
    }

    /// Resolve a start/end pair to the tracks it covers.
    ///
    /// Returns `None` when neither side names a line on its own (both are `auto` or
    /// `span`); the item's position on this axis then comes from auto-placement.
    pub fn resolve(&self, start: &GridPosition, end: &GridPosition) -> Option<GridSpan> {
        let (start, end) = self.normalized_pair(start, end);

        match (
            start.should_be_resolved_against_opposite_position(),
            end.should_be_resolved_against_opposite_position(),
        ) {
            (true, true) => None,
            (true, false) => {
                let end_line = self.resolve_line(&end, LineSide::End)?;
                Some(self.resolve_against_opposite(end_line, &start, LineSide::Start))
            }
            (false, true) => {
                let start_line = self.resolve_line(&start, LineSide::Start)?;
                Some(self.resolve_against_opposite(start_line, &end, LineSide::End))
            }
            (false, false) => {
                let start_line = self.resolve_line(&start, LineSide::Start)?;
                let end_line = self.resolve_line(&end, LineSide::End)?;
                if end_line <= start_line {
                    log::debug!(
                        target: "css::grid::placement",
                        "end line {end_line} not after start line {start_line}, collapsing to one track"
                    );
                }
                Some(GridSpan::from_lines(start_line, end_line))
            }
        }
    }

    /// Number of tracks an auto-placed item covers on this axis.
    ///
    /// Named spans count as `span 1` during auto-placement.
    pub fn auto_placement_span(&self, start: &GridPosition, end: &GridPosition) -> usize {
        let (start, end) = self.normalized_pair(start, end);
        let span = match (&start, &end) {
            (GridPosition::Span(count), _) | (_, GridPosition::Span(count)) => *count as usize,
            _ => 1,
        };
        clamp_span(span)
    }

    /// Place an auto-positioned pair at `initial_position`.
    pub fn resolve_at(
        &self,
        start: &GridPosition,
        end: &GridPosition,
        initial_position: usize,
    ) -> GridSpan {
        GridSpan::with_size(initial_position, self.auto_placement_span(start, end))
    }

    /// Apply the conflict-handling rules and demote unresolvable positions to `auto`.
    fn normalized_pair(
        &self,
        start: &GridPosition,
        end: &GridPosition,
    ) -> (GridPosition, GridPosition) {
        let start = self.normalized(start, LineSide::Start);
        let mut end = self.normalized(end, LineSide::End);

        // Spec: §8.3.1 "If the placement for a grid item contains two spans, remove
        // the one contributed by the end grid-placement property."
        if start.is_span() && end.is_span() {
            end = GridPosition::Auto;
        }
        let start_is_auto = start.is_auto();
        let end_is_auto = end.is_auto();
        (
            Self::named_span_opposite_auto(start, end_is_auto),
            Self::named_span_opposite_auto(end, start_is_auto),
        )
    }

    fn normalized(&self, position: &GridPosition, side: LineSide) -> GridPosition {
        match position {
            GridPosition::Line(0) | GridPosition::NamedLine { nth: 0, .. } => GridPosition::Auto,
            GridPosition::NamedLine { name, .. } | GridPosition::Named(name)
                if !self.is_known_name(position, name, side) =>
            {
                log::debug!(
                    target: "css::grid::placement",
                    "unknown line name {name:?} on {side:?} side, demoting to auto"
                );
                GridPosition::Auto
            }
            GridPosition::Span(0) => GridPosition::Span(1),
            GridPosition::NamedSpan { name, count: 0 } => GridPosition::NamedSpan {
                name: name.clone(),
                count: 1,
            },
            other => other.clone(),
        }
    }

    fn is_known_name(&self, position: &GridPosition, name: &str, side: LineSide) -> bool {
        match position {
            GridPosition::Named(_) => self.implicit_or_named_line(name, side).is_some(),
            _ => self.lines_named(name).is_some(),
        }
    }

    /// A named span opposite `auto` only counts as `span 1`.
    fn named_span_opposite_auto(position: GridPosition, opposite_is_auto: bool) -> GridPosition {
        match position {
            GridPosition::NamedSpan { .. } if opposite_is_auto => GridPosition::Span(1),
            other => other,
        }
    }

    /// Resolve a line-naming position to a 0-based line index.
    fn resolve_line(&self, position: &GridPosition, side: LineSide) -> Option<usize> {
        let line = match position {
            GridPosition::Line(line) => self.integer_line(*line),
            GridPosition::NamedLine { name, nth } => {
                let lines = self.lines_named(name)?;
                let count = lines.len();
                let index = if *nth > 0 {
                    (*nth as usize - 1).min(count - 1)
                } else {
                    count - (nth.unsigned_abs() as usize).min(count)
                };
                lines[index]
            }
            GridPosition::Named(name) => self.implicit_or_named_line(name, side)?,
            GridPosition::Auto | GridPosition::Span(_) | GridPosition::NamedSpan { .. } => {
                return None;
            }
        };
        Some(clamp_line(line))
    }

    fn integer_line(&self, line: i32) -> usize {
        let explicit_lines = self.tracks.explicit_count() as i64 + 1;
        let line = i64::from(line);
        if line > 0 {
            (line - 1) as usize
        } else {
            (explicit_lines + line).max(0) as usize
        }
    }

    /// `<name>-start`/`<name>-end` first, then `<name>`; the first matching line.
    fn implicit_or_named_line(&self, name: &str, side: LineSide) -> Option<usize> {
        let suffix = match side {
            LineSide::Start => "start",
            LineSide::End => "end",
        };
        self.lines_named(&format!("{name}-{suffix}"))
            .or_else(|| self.lines_named(name))
            .and_then(|lines| lines.first().copied())
    }

    fn lines_named(&self, name: &str) -> Option<&'tracks [usize]> {
        self.tracks
            .lines_named(name)
            .filter(|lines| !lines.is_empty())
    }

    fn resolve_against_opposite(
        &self,
        opposite_line: usize,
        position: &GridPosition,
        side: LineSide,
    ) -> GridSpan {
        match position {
            GridPosition::Span(count) => {
                let count = clamp_span(*count as usize);
                match side {
                    LineSide::Start => {
                        GridSpan::from_lines(opposite_line.saturating_sub(count), opposite_line)
                    }
                    LineSide::End => GridSpan::from_lines(opposite_line, opposite_line + count),
                }
            }
            GridPosition::NamedSpan { name, count } => {
                self.resolve_named_span_against_opposite(opposite_line, name, *count, side)
            }
            _ => match side {
                LineSide::Start => {
                    GridSpan::from_lines(opposite_line.saturating_sub(1), opposite_line)
                }
                LineSide::End => GridSpan::from_lines(opposite_line, opposite_line + 1),
            },
        }
    }

    /// Count `count` lines named `name` away from the opposite line.
    ///
    /// Runs off the end of the list clamp to its farthest line; an unknown name or no
    /// line on the requested side collapses to a single track.
    fn resolve_named_span_against_opposite(
        &self,
        opposite_line: usize,
        name: &str,
        count: u32,
        side: LineSide,
    ) -> GridSpan {
        let count = (count.max(1)) as usize;
        let lines = self.lines_named(name).unwrap_or(&[]);
        match side {
            LineSide::Start => {
                let before = &lines[..lines.partition_point(|line| *line < opposite_line)];
                let start = before
                    .len()
                    .checked_sub(count)
                    .map_or_else(|| before.first().copied(), |index| before.get(index).copied())
                    .unwrap_or_else(|| opposite_line.saturating_sub(1));
                GridSpan::from_lines(start, opposite_line)
            }
            LineSide::End => {
                let after = &lines[lines.partition_point(|line| *line <= opposite_line)..];
                let end = after
                    .get(count - 1)
                    .or_else(|| after.last())
                    .copied()
                    .unwrap_or(opposite_line + 1);
                GridSpan::from_lines(opposite_line, end)
            }
        }
    }
}

fn clamp_line(line: usize) -> usize {
    if line > GRID_MAX_TRACKS {
        log::warn!(
            target: "css::grid::placement",
            "line {line} beyond the {GRID_MAX_TRACKS}-track ceiling, clamping"
        );
    }
    line.min(GRID_MAX_TRACKS)
}

fn clamp_span(span: usize) -> usize {
    if span > GRID_MAX_TRACKS {
        log::warn!(
            target: "css::grid::placement",
            "span {span} beyond the {GRID_MAX_TRACKS}-track ceiling, clamping"
        );
    }
    span.clamp(1, GRID_MAX_TRACKS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GridTrackSize;

    fn four_columns() -> GridAxisTracks {
        GridAxisTracks::new(vec![GridTrackSize::auto(); 4], 0.0)
            .with_named_line("content-start", 1)
            .with_named_line("content-end", 3)
            .with_named_line("band", 0)
            .with_named_line("band", 2)
            .with_named_line("band", 4)
    }

    /// # Panics
    /// Panics if integer lines do not resolve to 0-based track indices.
    #[test]
    fn integer_lines() {
        let tracks = four_columns();
        let resolver = GridLineResolver::new(&tracks);

        assert_eq!(
            resolver.resolve(&GridPosition::Span(2), &GridPosition::Line(5)),
            Some(GridSpan::new(2, 3))
        );
        assert_eq!(
            resolver.resolve(&GridPosition::Line(5), &GridPosition::Span(2)),
            Some(GridSpan::new(4, 5))
        );
        assert_eq!(
            resolver.resolve(&GridPosition::Line(1), &GridPosition::Line(-1)),
            Some(GridSpan::new(0, 3))
        );
        assert_eq!(
            resolver.resolve(&GridPosition::Line(-10), &GridPosition::Auto),
            Some(GridSpan::new(0, 0))
        );
    }

    /// # Panics
    /// Panics if conflicting placements are not recovered.
    #[test]
    fn conflict_handling() {
        let tracks = four_columns();
        let resolver = GridLineResolver::new(&tracks);

        // End before start collapses to a single track.
        assert_eq!(
            resolver.resolve(&GridPosition::Line(3), &GridPosition::Line(2)),
            Some(GridSpan::new(2, 2))
        );
        // Two spans: the end span is dropped and the item is auto-placed.
        assert_eq!(
            resolver.resolve(&GridPosition::Span(2), &GridPosition::Span(3)),
            None
        );
        assert_eq!(
            resolver.auto_placement_span(&GridPosition::Span(2), &GridPosition::Span(3)),
            2
        );
        // Line 0 is invalid and behaves as auto.
        assert_eq!(
            resolver.resolve(&GridPosition::Line(0), &GridPosition::Auto),
            None
        );
        assert_eq!(
            resolver.auto_placement_span(&GridPosition::Auto, &GridPosition::Span(100_000)),
            GRID_MAX_TRACKS
        );
    }

    /// # Panics
    /// Panics if named lines do not resolve to their registered indices.
    #[test]
    fn named_lines() {
        let tracks = four_columns();
        let resolver = GridLineResolver::new(&tracks);

        assert_eq!(
            resolver.resolve(
                &GridPosition::Named("content-start".to_owned()),
                &GridPosition::Named("content-end".to_owned())
            ),
            Some(GridSpan::new(1, 2))
        );
        // `content` picks up the implicit `-start`/`-end` names.
        assert_eq!(
            resolver.resolve(
                &GridPosition::Named("content".to_owned()),
                &GridPosition::Named("content".to_owned())
            ),
            Some(GridSpan::new(1, 2))
        );
        assert_eq!(
            resolver.resolve(
                &GridPosition::NamedLine {
                    name: "band".to_owned(),
                    nth: -1
                },
                &GridPosition::Auto
            ),
            Some(GridSpan::new(4, 4))
        );
        assert_eq!(
            resolver.resolve(
                &GridPosition::Line(1),
                &GridPosition::NamedSpan {
                    name: "band".to_owned(),
                    count: 2
                }
            ),
            Some(GridSpan::new(0, 3))
        );
    }

    /// # Panics
    /// Panics if an unknown line name is not demoted to auto.
    #[test]
    fn unknown_name_is_auto() {
        let tracks = four_columns();
        let resolver = GridLineResolver::new(&tracks);

        assert_eq!(
            resolver.resolve(
                &GridPosition::Named("missing".to_owned()),
                &GridPosition::Auto
            ),
            None
        );
        assert_eq!(
            resolver.resolve(
                &GridPosition::NamedLine {
                    name: "missing".to_owned(),
                    nth: 2
                },
                &GridPosition::Line(3)
            ),
            Some(GridSpan::new(1, 1))
        );
    }
}
