use crate::domain::contract::{self, LlmKeywordAnalysis, LlmTrendingKeyword};
use crate::domain::keyword::{CompetitionLevel, KeywordAnalysis, TrendDirection, TrendingKeyword};
use crate::llm::error::LlmDiagnosticsError;
use crate::llm::gemini::{GeminiClient, GeminiConfig};
use crate::llm::{json, StructuredGenerator, StructuredRequest};
use std::fmt;

pub const TRENDING_KEYWORD_COUNT: usize = 10;
pub const ANALYSIS_FAILED_NOTICE: &str = "분석 중 오류가 발생했습니다.";
pub const TARGET_MARKET: &str = "South Korea";

/// The two data operations the dashboard views depend on.
#[async_trait::async_trait]
pub trait KeywordInsights: Send + Sync {
    /// Never fails: provider problems are absorbed into [`fallback_trending_keywords`].
    async fn fetch_trending_keywords(&self) -> Vec<TrendingKeyword>;

    /// `keyword` must already be trimmed and non-empty.
    async fn analyze_keyword(&self, keyword: &str) -> Result<KeywordAnalysis, AnalysisError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The capability call itself failed (network, auth, quota, missing key, HTTP status).
    Transport,
    /// The service answered but the payload did not fit the schema or contract.
    Decode,
}

#[derive(Debug)]
struct GatewayFailure {
    kind: FailureKind,
    source: anyhow::Error,
}

impl GatewayFailure {
    fn from_generator(err: anyhow::Error) -> Self {
        let kind = match err.downcast_ref::<LlmDiagnosticsError>() {
            Some(diag) if diag.is_decode_stage() => FailureKind::Decode,
            _ => FailureKind::Transport,
        };
        Self { kind, source: err }
    }

    fn decode(err: anyhow::Error) -> Self {
        Self {
            kind: FailureKind::Decode,
            source: err,
        }
    }
}

/// Returned by [`KeywordInsights::analyze_keyword`]; there is no fallback analysis.
/// Displays as the user-facing notice; the cause is kept as the error source.
#[derive(Debug)]
pub struct AnalysisError {
    pub keyword: String,
    pub kind: FailureKind,
    source: anyhow::Error,
}

impl AnalysisError {
    pub fn new(keyword: impl Into<String>, kind: FailureKind, source: anyhow::Error) -> Self {
        Self {
            keyword: keyword.into(),
            kind,
            source,
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ANALYSIS_FAILED_NOTICE)
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let source: &(dyn std::error::Error + 'static) = &*self.source;
        Some(source)
    }
}

pub struct ProviderGateway<G> {
    generator: G,
}

impl ProviderGateway<GeminiClient> {
    pub fn gemini(config: GeminiConfig) -> anyhow::Result<Self> {
        Ok(Self::new(GeminiClient::new(config)?))
    }
}

impl<G: StructuredGenerator> ProviderGateway<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    async fn try_fetch_trending(&self) -> Result<Vec<TrendingKeyword>, GatewayFailure> {
        let text = self
            .generator
            .generate(trending_request())
            .await
            .map_err(GatewayFailure::from_generator)?;
        let items = json::parse_payload::<Vec<LlmTrendingKeyword>>(&text)
            .map_err(GatewayFailure::decode)?;
        contract::validate_and_into_trending(items).map_err(GatewayFailure::decode)
    }

    async fn try_analyze(&self, keyword: &str) -> Result<KeywordAnalysis, GatewayFailure> {
        let text = self
            .generator
            .generate(analysis_request(keyword))
            .await
            .map_err(GatewayFailure::from_generator)?;
        let raw =
            json::parse_payload::<LlmKeywordAnalysis>(&text).map_err(GatewayFailure::decode)?;
        raw.validate_and_into_analysis(keyword)
            .map_err(GatewayFailure::decode)
    }
}

#[async_trait::async_trait]
impl<G: StructuredGenerator> KeywordInsights for ProviderGateway<G> {
    async fn fetch_trending_keywords(&self) -> Vec<TrendingKeyword> {
        match self.try_fetch_trending().await {
            Ok(keywords) => {
                tracing::debug!(
                    provider = self.generator.provider_name(),
                    count = keywords.len(),
                    "fetched trending keywords"
                );
                keywords
            }
            Err(failure) => {
                tracing::warn!(
                    provider = self.generator.provider_name(),
                    kind = ?failure.kind,
                    error = format!("{:#}", failure.source),
                    "trending keyword fetch failed; serving fallback keywords"
                );
                fallback_trending_keywords()
            }
        }
    }

    async fn analyze_keyword(&self, keyword: &str) -> Result<KeywordAnalysis, AnalysisError> {
        self.try_analyze(keyword).await.map_err(|failure| {
            tracing::error!(
                provider = self.generator.provider_name(),
                %keyword,
                kind = ?failure.kind,
                error = format!("{:#}", failure.source),
                "keyword analysis failed"
            );
            AnalysisError::new(keyword, failure.kind, failure.source)
        })
    }
}

/// Fixed rows shown whenever the live ranking cannot be produced.
pub fn fallback_trending_keywords() -> Vec<TrendingKeyword> {
    vec![
        TrendingKeyword {
            keyword: "날씨".to_string(),
            rank: 1,
            previous_rank: 2,
            search_volume: 500_000,
            competition: CompetitionLevel::High,
            trend: TrendDirection::Up,
            change: 1,
        },
        TrendingKeyword {
            keyword: "환율".to_string(),
            rank: 2,
            previous_rank: 1,
            search_volume: 320_000,
            competition: CompetitionLevel::High,
            trend: TrendDirection::Down,
            change: 1,
        },
        TrendingKeyword {
            keyword: "주식".to_string(),
            rank: 3,
            previous_rank: 3,
            search_volume: 280_000,
            competition: CompetitionLevel::High,
            trend: TrendDirection::Stable,
            change: 0,
        },
    ]
}

fn trending_request() -> StructuredRequest {
    let levels: Vec<&str> = CompetitionLevel::ALL.iter().map(|l| l.as_str()).collect();
    let response_schema = serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "keyword": {"type": "STRING"},
                "rank": {"type": "INTEGER"},
                "previousRank": {"type": "INTEGER"},
                "searchVolume": {"type": "INTEGER", "description": "Estimated monthly searches"},
                "competitionLevel": {"type": "STRING", "enum": levels}
            },
            "required": ["keyword", "rank", "previousRank", "searchVolume", "competitionLevel"]
        }
    });

    StructuredRequest {
        prompt: format!(
            "Generate a list of {TRENDING_KEYWORD_COUNT} currently trending keywords in {TARGET_MARKET} \
suitable for a marketing dashboard. Include realistic (simulated) search volumes and ranks."
        ),
        system_instruction: format!(
            "You are a specialized SEO data engine. Provide realistic data for {TARGET_MARKET} market trends."
        ),
        response_schema,
    }
}

fn analysis_request(keyword: &str) -> StructuredRequest {
    let response_schema = serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "difficultyScore": {"type": "INTEGER", "description": "0 to 100 SEO difficulty"},
            "potentialScore": {"type": "INTEGER", "description": "0 to 100 growth potential"},
            "relatedKeywords": {"type": "ARRAY", "items": {"type": "STRING"}},
            "seasonalTrend": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "month": {"type": "STRING"},
                        "volume": {"type": "INTEGER"}
                    },
                    "required": ["month", "volume"]
                }
            },
            "summary": {"type": "STRING", "description": "Short strategic advice in Korean"}
        },
        "required": ["difficultyScore", "potentialScore", "relatedKeywords", "seasonalTrend", "summary"]
    });

    StructuredRequest {
        prompt: format!("Analyze the keyword '{keyword}' for the {TARGET_MARKET} market."),
        system_instruction: "You are an expert SEO consultant. Analyze the keyword provided and \
generate simulated but realistic historical data and strategic advice."
            .to_string(),
        response_schema,
    }
}
