use crate::domain::keyword::{CompetitionLevel, KeywordAnalysis, SeasonalPoint, TrendingKeyword};
use crate::domain::trend::RankChange;
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Trending item exactly as the model emits it. Derived fields are absent on purpose.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmTrendingKeyword {
    pub keyword: String,
    pub rank: i64,
    pub previous_rank: i64,
    pub search_volume: i64,
    #[serde(alias = "competition")]
    pub competition_level: CompetitionLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmKeywordAnalysis {
    pub difficulty_score: i64,
    pub potential_score: i64,
    pub related_keywords: Vec<String>,
    pub seasonal_trend: Vec<LlmSeasonalPoint>,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSeasonalPoint {
    pub month: String,
    pub volume: i64,
}

/// Validates a whole ranking and enriches every row, keeping the provider's order.
pub fn validate_and_into_trending(
    items: Vec<LlmTrendingKeyword>,
) -> anyhow::Result<Vec<TrendingKeyword>> {
    let mut seen_ranks = BTreeSet::<u32>::new();
    let mut seen_keywords = BTreeSet::<String>::new();
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(item.validate_and_into_keyword(&mut seen_ranks, &mut seen_keywords)?);
    }
    Ok(out)
}

impl LlmTrendingKeyword {
    fn validate_and_into_keyword(
        self,
        seen_ranks: &mut BTreeSet<u32>,
        seen_keywords: &mut BTreeSet<String>,
    ) -> anyhow::Result<TrendingKeyword> {
        let keyword = self.keyword.trim().to_string();
        ensure!(!keyword.is_empty(), "keyword must be non-empty");
        ensure!(
            seen_keywords.insert(keyword.clone()),
            "duplicate keyword: {keyword}"
        );

        let rank = positive_rank(self.rank, "rank")?;
        ensure!(seen_ranks.insert(rank), "duplicate rank: {rank}");
        let previous_rank = positive_rank(self.previous_rank, "previousRank")?;

        ensure!(
            self.search_volume >= 0,
            "searchVolume must be non-negative (got {})",
            self.search_volume
        );

        let change = RankChange::between(rank, previous_rank);
        Ok(TrendingKeyword {
            keyword,
            rank,
            previous_rank,
            search_volume: self.search_volume.unsigned_abs(),
            competition: self.competition_level,
            trend: change.direction,
            change: change.magnitude,
        })
    }
}

impl LlmKeywordAnalysis {
    /// `keyword` is the caller's request text; the provider never names the result.
    pub fn validate_and_into_analysis(self, keyword: &str) -> anyhow::Result<KeywordAnalysis> {
        let difficulty_score = score(self.difficulty_score, "difficultyScore")?;
        let potential_score = score(self.potential_score, "potentialScore")?;

        let summary = self.summary.trim().to_string();
        ensure!(!summary.is_empty(), "summary must be non-empty");

        let related_keywords = self
            .related_keywords
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let mut seasonal_trend = Vec::with_capacity(self.seasonal_trend.len());
        for point in self.seasonal_trend {
            ensure!(
                point.volume >= 0,
                "seasonal volume must be non-negative (month={}, got {})",
                point.month,
                point.volume
            );
            seasonal_trend.push(SeasonalPoint {
                month: point.month.trim().to_string(),
                volume: point.volume.unsigned_abs(),
            });
        }

        Ok(KeywordAnalysis {
            keyword: keyword.to_string(),
            difficulty_score,
            potential_score,
            related_keywords,
            seasonal_trend,
            summary,
        })
    }
}

fn positive_rank(value: i64, field: &str) -> anyhow::Result<u32> {
    ensure!(value >= 1, "{field} must be >= 1 (got {value})");
    u32::try_from(value).with_context(|| format!("{field} out of range: {value}"))
}

fn score(value: i64, field: &str) -> anyhow::Result<u8> {
    ensure!(
        (0..=100).contains(&value),
        "{field} must be between 0 and 100 (got {value})"
    );
    u8::try_from(value).with_context(|| format!("{field} out of range: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::keyword::TrendDirection;
    use serde_json::json;

    fn trending(v: serde_json::Value) -> anyhow::Result<Vec<TrendingKeyword>> {
        let items: Vec<LlmTrendingKeyword> = serde_json::from_value(v)?;
        validate_and_into_trending(items)
    }

    #[test]
    fn enriches_rows_in_provider_order() {
        let out = trending(json!([
            {"keyword": "캠핑", "rank": 2, "previousRank": 5, "searchVolume": 1200, "competitionLevel": "Medium"},
            {"keyword": "맛집", "rank": 1, "previousRank": 1, "searchVolume": 9000, "competitionLevel": "High"},
            {"keyword": "여행", "rank": 3, "previousRank": 2, "searchVolume": 700, "competitionLevel": "Low"},
        ]))
        .unwrap();

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].keyword, "캠핑");
        assert_eq!(out[0].trend, TrendDirection::Up);
        assert_eq!(out[0].change, 3);
        assert_eq!(out[1].trend, TrendDirection::Stable);
        assert_eq!(out[1].change, 0);
        assert_eq!(out[2].trend, TrendDirection::Down);
        assert_eq!(out[2].change, 1);
    }

    #[test]
    fn accepts_legacy_competition_key() {
        let out = trending(json!([
            {"keyword": "날씨", "rank": 1, "previousRank": 2, "searchVolume": 10, "competition": "High"},
        ]))
        .unwrap();
        assert_eq!(out[0].competition, CompetitionLevel::High);
    }

    #[test]
    fn ignores_provider_supplied_trend_fields() {
        let out = trending(json!([
            {"keyword": "날씨", "rank": 3, "previousRank": 1, "searchVolume": 10,
             "competitionLevel": "Low", "trend": "UP", "change": 99},
        ]))
        .unwrap();
        assert_eq!(out[0].trend, TrendDirection::Down);
        assert_eq!(out[0].change, 2);
    }

    #[test]
    fn rejects_duplicate_ranks() {
        let res = trending(json!([
            {"keyword": "a", "rank": 1, "previousRank": 1, "searchVolume": 1, "competitionLevel": "Low"},
            {"keyword": "b", "rank": 1, "previousRank": 2, "searchVolume": 1, "competitionLevel": "Low"},
        ]));
        assert!(res.is_err());
    }

    #[test]
    fn rejects_duplicate_keywords() {
        let res = trending(json!([
            {"keyword": "a", "rank": 1, "previousRank": 1, "searchVolume": 1, "competitionLevel": "Low"},
            {"keyword": " a ", "rank": 2, "previousRank": 2, "searchVolume": 1, "competitionLevel": "Low"},
        ]));
        assert!(res.is_err());
    }

    #[test]
    fn rejects_non_positive_rank_and_negative_volume() {
        assert!(trending(json!([
            {"keyword": "a", "rank": 0, "previousRank": 1, "searchVolume": 1, "competitionLevel": "Low"},
        ]))
        .is_err());
        assert!(trending(json!([
            {"keyword": "a", "rank": 1, "previousRank": 1, "searchVolume": -5, "competitionLevel": "Low"},
        ]))
        .is_err());
    }

    #[test]
    fn rejects_blank_keyword() {
        let err = trending(json!([
            {"keyword": "   ", "rank": 1, "previousRank": 1, "searchVolume": 1, "competitionLevel": "Low"},
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("keyword must be non-empty"));
    }

    #[test]
    fn rejects_non_positive_previous_rank() {
        let err = trending(json!([
            {"keyword": "a", "rank": 1, "previousRank": 0, "searchVolume": 1, "competitionLevel": "Low"},
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("previousRank must be >= 1"));
    }

    #[test]
    fn rejects_unknown_competition_level() {
        assert!(trending(json!([
            {"keyword": "a", "rank": 1, "previousRank": 1, "searchVolume": 1, "competitionLevel": "Extreme"},
        ]))
        .is_err());
    }

    #[test]
    fn analysis_takes_keyword_from_caller() {
        let raw: LlmKeywordAnalysis = serde_json::from_value(json!({
            "keyword": "something else",
            "difficultyScore": 62,
            "potentialScore": 81,
            "relatedKeywords": ["캠핑 장비", "  ", "글램핑"],
            "seasonalTrend": [{"month": "1월", "volume": 100}, {"month": "2월", "volume": 140}],
            "summary": "  여름 시즌 전에 콘텐츠를 준비하세요. ",
        }))
        .unwrap();

        let analysis = raw.validate_and_into_analysis("캠핑").unwrap();
        assert_eq!(analysis.keyword, "캠핑");
        assert_eq!(analysis.related_keywords, vec!["캠핑 장비", "글램핑"]);
        assert_eq!(analysis.seasonal_trend[1].month, "2월");
        assert_eq!(analysis.summary, "여름 시즌 전에 콘텐츠를 준비하세요.");
    }

    #[test]
    fn analysis_rejects_out_of_range_scores_and_blank_summary() {
        let base = json!({
            "difficultyScore": 101,
            "potentialScore": 50,
            "relatedKeywords": [],
            "seasonalTrend": [],
            "summary": "ok",
        });
        let raw: LlmKeywordAnalysis = serde_json::from_value(base).unwrap();
        assert!(raw.validate_and_into_analysis("x").is_err());

        let raw: LlmKeywordAnalysis = serde_json::from_value(json!({
            "difficultyScore": 10,
            "potentialScore": 50,
            "relatedKeywords": [],
            "seasonalTrend": [],
            "summary": "   ",
        }))
        .unwrap();
        assert!(raw.validate_and_into_analysis("x").is_err());
    }

    #[test]
    fn analysis_requires_every_field() {
        let res = serde_json::from_value::<LlmKeywordAnalysis>(json!({
            "difficultyScore": 10,
            "potentialScore": 50,
            "summary": "ok",
        }));
        assert!(res.is_err());
    }
}
