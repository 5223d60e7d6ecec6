//! Item contributions, measured through the box-model collaborator.

use std::collections::HashMap;

use crate::line_resolution::GridCoordinate;
use crate::types::{GridAxis, GridItemContent, ItemHandle};

use super::ResolvedTrackSizes;

/// Which intrinsic size of an item is asked for.
///
/// Spec: §12.3 "min-content contribution", "max-content contribution" and
/// §6.6 "minimum contribution"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContributionKind {
    /// Used by `auto` minimums
    Minimum,
    MinContent,
    MaxContent,
}

/// Measures items along one axis, asking the collaborator at most once per item and
/// kind for the duration of a sizing pass.
pub struct ItemContributions<'sizing, C: ?Sized> {
    content: &'sizing mut C,
    axis: GridAxis,
    cross_sizes: Option<&'sizing ResolvedTrackSizes>,
    cache: HashMap<(ItemHandle, ContributionKind), f32>,
}

impl<'sizing, C: GridItemContent + ?Sized> ItemContributions<'sizing, C> {
    pub fn new(
        content: &'sizing mut C,
        axis: GridAxis,
        cross_sizes: Option<&'sizing ResolvedTrackSizes>,
    ) -> Self {
        Self {
            content,
            axis,
            cross_sizes,
            cache: HashMap::new(),
        }
    }

    /// The item's breadth on the other axis, once that axis has been sized.
    fn cross_size(&self, coordinate: GridCoordinate) -> Option<f32> {
        self.cross_sizes
            .map(|sizes| sizes.area_breadth(coordinate.span(self.axis.other())))
    }

    /// Margin-box contribution of `item` along the sized axis, never negative.
    pub fn contribution(
        &mut self,
        item: ItemHandle,
        coordinate: GridCoordinate,
        kind: ContributionKind,
    ) -> f32 {
        if let Some(cached) = self.cache.get(&(item, kind)) {
            return *cached;
        }

        let cross_size = self.cross_size(coordinate);
        let size = match kind {
            ContributionKind::Minimum => {
                self.content
                    .minimum_contribution(item, self.axis, cross_size)
            }
            ContributionKind::MinContent => {
                self.content
                    .min_content_contribution(item, self.axis, cross_size)
            }
            ContributionKind::MaxContent => {
                self.content
                    .max_content_contribution(item, self.axis, cross_size)
            }
        }
        .max(0.0);

        tracing::trace!(
            "contribution: {item:?} axis={:?} {kind:?} cross={cross_size:?} -> {size}",
            self.axis
        );
        self.cache.insert((item, kind), size);
        size
    }
}
