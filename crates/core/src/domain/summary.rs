use crate::domain::keyword::{CompetitionLevel, TrendDirection, TrendingKeyword};
use serde::Serialize;

pub const CHART_LEN: usize = 7;
pub const HIGHLIGHT_LEN: usize = 3;

/// Headline numbers shown above the ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_search_volume: u64,
    pub rising_count: usize,
    pub dominant_competition: Option<CompetitionLevel>,
    pub chart: Vec<ChartBar>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartBar {
    pub keyword: String,
    pub volume: u64,
    pub rank: u32,
    pub highlighted: bool,
}

impl DashboardSummary {
    pub fn from_keywords(keywords: &[TrendingKeyword]) -> Self {
        let total_search_volume = keywords
            .iter()
            .fold(0u64, |acc, k| acc.saturating_add(k.search_volume));
        let rising_count = keywords
            .iter()
            .filter(|k| k.trend == TrendDirection::Up)
            .count();

        let chart = keywords
            .iter()
            .take(CHART_LEN)
            .enumerate()
            .map(|(idx, k)| ChartBar {
                keyword: k.keyword.clone(),
                volume: k.search_volume,
                rank: k.rank,
                highlighted: idx < HIGHLIGHT_LEN,
            })
            .collect();

        Self {
            total_search_volume,
            rising_count,
            dominant_competition: dominant_competition(keywords),
            chart,
        }
    }
}

// Most frequent level; ties go to the harder level.
fn dominant_competition(keywords: &[TrendingKeyword]) -> Option<CompetitionLevel> {
    CompetitionLevel::ALL
        .into_iter()
        .map(|level| {
            let n = keywords.iter().filter(|k| k.competition == level).count();
            (n, level)
        })
        .filter(|(n, _)| *n > 0)
        .max()
        .map(|(_, level)| level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trend::RankChange;

    fn kw(keyword: &str, rank: u32, previous_rank: u32, volume: u64, c: CompetitionLevel) -> TrendingKeyword {
        let change = RankChange::between(rank, previous_rank);
        TrendingKeyword {
            keyword: keyword.to_string(),
            rank,
            previous_rank,
            search_volume: volume,
            competition: c,
            trend: change.direction,
            change: change.magnitude,
        }
    }

    #[test]
    fn totals_and_rising_count() {
        let list = vec![
            kw("a", 1, 3, 100, CompetitionLevel::High),
            kw("b", 2, 1, 50, CompetitionLevel::Low),
            kw("c", 3, 5, 25, CompetitionLevel::Low),
        ];
        let s = DashboardSummary::from_keywords(&list);
        assert_eq!(s.total_search_volume, 175);
        assert_eq!(s.rising_count, 2);
        assert_eq!(s.dominant_competition, Some(CompetitionLevel::Low));
    }

    #[test]
    fn competition_tie_prefers_higher_level() {
        let list = vec![
            kw("a", 1, 1, 1, CompetitionLevel::Medium),
            kw("b", 2, 2, 1, CompetitionLevel::High),
        ];
        let s = DashboardSummary::from_keywords(&list);
        assert_eq!(s.dominant_competition, Some(CompetitionLevel::High));
    }

    #[test]
    fn chart_keeps_first_seven_and_highlights_top_three() {
        let list: Vec<_> = (1..=10)
            .map(|r| kw(&format!("k{r}"), r, r, u64::from(r) * 10, CompetitionLevel::Low))
            .collect();
        let s = DashboardSummary::from_keywords(&list);
        assert_eq!(s.chart.len(), CHART_LEN);
        assert_eq!(s.chart.iter().filter(|b| b.highlighted).count(), HIGHLIGHT_LEN);
        assert!(s.chart[2].highlighted);
        assert!(!s.chart[3].highlighted);
    }

    #[test]
    fn empty_list_has_no_dominant_level() {
        let s = DashboardSummary::from_keywords(&[]);
        assert_eq!(s.total_search_volume, 0);
        assert_eq!(s.dominant_competition, None);
        assert!(s.chart.is_empty());
    }
}
