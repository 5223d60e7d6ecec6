//! Box alignment keywords used by grid containers and grid items.
//!
//! Spec: CSS Box Alignment Module Level 3
//! <https://www.w3.org/TR/css-align-3/>

/// Inline base direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Direction {
    /// Left to right
    #[default]
    Ltr,
    /// Right to left
    Rtl,
}

impl Direction {
    pub const fn is_ltr(self) -> bool {
        matches!(self, Self::Ltr)
    }
}

/// Minimal writing mode subset.
///
/// Spec: <https://www.w3.org/TR/css-writing-modes-4/#writing-mode>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum WritingMode {
    /// Horizontal-tb: inline direction is horizontal; block direction is vertical.
    #[default]
    HorizontalTb,
    /// Vertical-rl: inline direction is vertical, block advances to the left.
    VerticalRl,
    /// Vertical-lr: inline direction is vertical, block advances to the right.
    VerticalLr,
}

impl WritingMode {
    /// Check if lines of text run horizontally.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::HorizontalTb)
    }

    /// Check if the block axis runs right to left.
    pub const fn is_flipped_blocks(self) -> bool {
        matches!(self, Self::VerticalRl)
    }

    /// Check if `other` lays its inline axis along this mode's block axis.
    pub const fn is_orthogonal_to(self, other: Self) -> bool {
        self.is_horizontal() != other.is_horizontal()
    }
}

/// `<overflow-position>`
///
/// Spec: §4.4 Overflow Alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum OverflowAlignment {
    /// No keyword given
    #[default]
    Default,
    /// Never overflow the start edge
    Safe,
    /// Honour the requested alignment even when it overflows
    Unsafe,
}

/// `<content-position>` for `justify-content`/`align-content`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ContentPosition {
    /// `normal`
    #[default]
    Normal,
    Start,
    End,
    Center,
    /// Equivalent to `start` outside flex layout
    FlexStart,
    /// Equivalent to `end` outside flex layout
    FlexEnd,
    Left,
    Right,
    /// Baseline content alignment is not computed; behaves as `start`
    Baseline,
    /// Baseline content alignment is not computed; behaves as `start`
    LastBaseline,
}

/// `<content-distribution>` for `justify-content`/`align-content`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ContentDistribution {
    /// No distribution keyword
    #[default]
    Default,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
    Stretch,
}

impl ContentDistribution {
    /// The `<content-position>` used when the distribution cannot be applied.
    ///
    /// Spec: §5.1 `<content-distribution>` fallback alignment
    pub const fn fallback_position(self) -> ContentPosition {
        match self {
            Self::SpaceBetween | Self::Stretch => ContentPosition::Start,
            Self::SpaceAround | Self::SpaceEvenly => ContentPosition::Center,
            Self::Default => ContentPosition::Normal,
        }
    }
}

/// A complete `justify-content` or `align-content` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ContentAlignment {
    pub position: ContentPosition,
    pub distribution: ContentDistribution,
    pub overflow: OverflowAlignment,
}

impl ContentAlignment {
    /// A `<content-position>` value.
    pub const fn position(position: ContentPosition) -> Self {
        Self {
            position,
            distribution: ContentDistribution::Default,
            overflow: OverflowAlignment::Default,
        }
    }

    /// A `<content-distribution>` value.
    pub const fn distribution(distribution: ContentDistribution) -> Self {
        Self {
            position: ContentPosition::Normal,
            distribution,
            overflow: OverflowAlignment::Default,
        }
    }

    /// Same value with an `<overflow-position>`.
    #[must_use]
    pub const fn with_overflow(mut self, overflow: OverflowAlignment) -> Self {
        self.overflow = overflow;
        self
    }

    /// `normal` behaves as `stretch` in grid containers.
    pub const fn resolved_distribution(self) -> ContentDistribution {
        match (self.position, self.distribution) {
            (ContentPosition::Normal, ContentDistribution::Default) => ContentDistribution::Stretch,
            (_, distribution) => distribution,
        }
    }

    /// The position to use, falling back from the distribution when `normal`.
    pub const fn resolved_position(self) -> ContentPosition {
        match self.position {
            ContentPosition::Normal => self.resolved_distribution().fallback_position(),
            position => position,
        }
    }
}

/// `<self-position>` (plus `auto`, `normal`, `stretch` and baselines) for
/// `justify-self`/`align-self` and their `-items` defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ItemPosition {
    /// Use the container's `justify-items`/`align-items`
    #[default]
    Auto,
    /// Behaves as `stretch` for grid items
    Normal,
    Start,
    End,
    Center,
    Stretch,
    SelfStart,
    SelfEnd,
    FlexStart,
    FlexEnd,
    Left,
    Right,
    /// Baseline self-alignment is not computed; behaves as `start`
    Baseline,
    /// Baseline self-alignment is not computed; behaves as `start`
    LastBaseline,
}

/// A complete `justify-self`/`align-self` (or `-items`) value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct SelfAlignment {
    pub position: ItemPosition,
    pub overflow: OverflowAlignment,
}

impl SelfAlignment {
    pub const fn new(position: ItemPosition) -> Self {
        Self {
            position,
            overflow: OverflowAlignment::Default,
        }
    }

    /// Same value with an `<overflow-position>`.
    #[must_use]
    pub const fn with_overflow(mut self, overflow: OverflowAlignment) -> Self {
        self.overflow = overflow;
        self
    }

    /// Resolve `auto` against the container's `-items` value, then `normal` to `stretch`.
    #[must_use]
    pub const fn resolve(self, container_default: Self) -> Self {
        let resolved = match self.position {
            ItemPosition::Auto => container_default,
            _ => self,
        };
        match resolved.position {
            ItemPosition::Auto | ItemPosition::Normal => Self {
                position: ItemPosition::Stretch,
                overflow: resolved.overflow,
            },
            _ => resolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// # Panics
    /// Panics if `normal` content alignment does not resolve to stretch/start.
    #[test]
    fn normal_content_alignment_is_stretch() {
        let normal = ContentAlignment::default();
        assert_eq!(normal.resolved_distribution(), ContentDistribution::Stretch);
        assert_eq!(normal.resolved_position(), ContentPosition::Start);

        let around = ContentAlignment::distribution(ContentDistribution::SpaceAround);
        assert_eq!(around.resolved_position(), ContentPosition::Center);

        let end = ContentAlignment::position(ContentPosition::End);
        assert_eq!(end.resolved_distribution(), ContentDistribution::Default);
        assert_eq!(end.resolved_position(), ContentPosition::End);
    }

    /// # Panics
    /// Panics if `auto` does not pick up the container default.
    #[test]
    fn self_alignment_resolution() {
        let container = SelfAlignment::new(ItemPosition::Center);
        assert_eq!(
            SelfAlignment::default().resolve(container).position,
            ItemPosition::Center
        );
        assert_eq!(
            SelfAlignment::default()
                .resolve(SelfAlignment::default())
                .position,
            ItemPosition::Stretch
        );
        let own = SelfAlignment::new(ItemPosition::End).with_overflow(OverflowAlignment::Safe);
        assert_eq!(own.resolve(container), own);
    }
}
