use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CompetitionLevel {
    Low,
    Medium,
    High,
}

impl CompetitionLevel {
    pub const ALL: [CompetitionLevel; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for CompetitionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// One row of the trending-keyword ranking, ready for display.
///
/// `trend` and `change` are always derived locally from `rank` and
/// `previous_rank` (see [`crate::domain::trend::RankChange`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingKeyword {
    pub keyword: String,
    pub rank: u32,
    pub previous_rank: u32,
    pub search_volume: u64,
    pub competition: CompetitionLevel,
    pub trend: TrendDirection,
    pub change: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalPoint {
    pub month: String,
    pub volume: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    /// The text the caller asked about; never taken from the provider.
    pub keyword: String,
    pub difficulty_score: u8,
    pub potential_score: u8,
    pub related_keywords: Vec<String>,
    pub seasonal_trend: Vec<SeasonalPoint>,
    pub summary: String,
}
