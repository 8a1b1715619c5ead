use crate::domain::keyword::TrendDirection;
use std::cmp::Ordering;

/// Movement of a keyword between two ranking snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankChange {
    pub direction: TrendDirection,
    pub magnitude: u32,
}

impl RankChange {
    /// `previous_rank - rank`: a smaller rank number means the keyword climbed.
    ///
    /// Equal ranks are `Stable` with magnitude 0; a new entrant cannot be told
    /// apart from an unchanged one.
    pub fn between(rank: u32, previous_rank: u32) -> Self {
        let direction = match previous_rank.cmp(&rank) {
            Ordering::Greater => TrendDirection::Up,
            Ordering::Less => TrendDirection::Down,
            Ordering::Equal => TrendDirection::Stable,
        };
        Self {
            direction,
            magnitude: rank.abs_diff(previous_rank),
        }
    }
}
