use crate::config::Settings;
use crate::llm::error::{
    LlmDiagnosticsError, STAGE_CREDENTIALS, STAGE_DECODE, STAGE_EMPTY_RESPONSE, STAGE_HTTP,
};
use crate::llm::{StructuredGenerator, StructuredRequest};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PROVIDER_NAME: &str = "gemini";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Absent keys are allowed here; every call fails instead.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GeminiConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        let defaults = Self::default();
        Self {
            api_key: settings.gemini_api_key.clone(),
            base_url: settings
                .gemini_base_url
                .clone()
                .unwrap_or(defaults.base_url),
            model: settings.gemini_model.clone().unwrap_or(defaults.model),
            timeout_secs: settings.gemini_timeout_secs.unwrap_or(defaults.timeout_secs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            http,
            api_key: config.api_key.filter(|k| !k.trim().is_empty()),
            base_url: config.base_url,
            model: config.model,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn headers(&self) -> anyhow::Result<HeaderMap> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(LlmDiagnosticsError {
                provider: PROVIDER_NAME,
                stage: STAGE_CREDENTIALS,
                detail: "GEMINI_API_KEY is not configured".to_string(),
                raw_output: None,
            }
            .into());
        };

        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", HeaderValue::from_str(api_key)?);
        Ok(headers)
    }

    fn build_request(req: StructuredRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::text(req.prompt)],
            }],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::text(req.system_instruction)],
            }),
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: req.response_schema,
            },
        }
    }

    async fn generate_content(
        &self,
        req: &GenerateContentRequest,
    ) -> anyhow::Result<GenerateContentResponse> {
        let headers = self.headers()?;

        let res = self
            .http
            .post(self.url())
            .headers(headers)
            .json(req)
            .send()
            .await
            .context("Gemini request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read Gemini response body")?;
        if !status.is_success() {
            return Err(LlmDiagnosticsError {
                provider: PROVIDER_NAME,
                stage: STAGE_HTTP,
                detail: format!("status={status}"),
                raw_output: Some(text),
            }
            .into());
        }

        serde_json::from_str::<GenerateContentResponse>(&text).map_err(|e| {
            anyhow::Error::from(LlmDiagnosticsError {
                provider: PROVIDER_NAME,
                stage: STAGE_DECODE,
                detail: format!("failed to decode generateContent response: {e}"),
                raw_output: Some(text.clone()),
            })
        })
    }

    /// Concatenated text parts of the first candidate, skipping thought parts.
    fn response_text(res: &GenerateContentResponse) -> Option<String> {
        let content = res.candidates.first()?.content.as_ref()?;
        let mut out = String::new();
        for part in &content.parts {
            if part.thought {
                continue;
            }
            if let Some(text) = part.text.as_deref() {
                out.push_str(text);
            }
        }
        if out.trim().is_empty() {
            None
        } else {
            Some(out)
        }
    }
}

#[async_trait::async_trait]
impl StructuredGenerator for GeminiClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn generate(&self, req: StructuredRequest) -> anyhow::Result<String> {
        let body = Self::build_request(req);
        let res = self.generate_content(&body).await?;

        let finish_reason = res
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref());
        if matches!(finish_reason, Some("MAX_TOKENS")) {
            tracing::warn!(model = %self.model, "Gemini finishReason=MAX_TOKENS; payload may be truncated");
        }

        Self::response_text(&res).ok_or_else(|| {
            anyhow::Error::from(LlmDiagnosticsError {
                provider: PROVIDER_NAME,
                stage: STAGE_EMPTY_RESPONSE,
                detail: format!(
                    "no text candidate (finish_reason={}, prompt_feedback={})",
                    finish_reason.unwrap_or("none"),
                    res.prompt_feedback
                        .as_ref()
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "none".to_string())
                ),
                raw_output: None,
            })
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing)]
    thought: bool,
}

impl Part {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            thought: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}
