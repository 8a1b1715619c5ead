pub mod error;
pub mod gemini;
pub mod json;

/// One "generate structured content" call: instruction + prompt + JSON schema in, JSON text out.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub prompt: String,
    pub system_instruction: String,
    pub response_schema: serde_json::Value,
}

#[async_trait::async_trait]
pub trait StructuredGenerator: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Returns the raw text payload; callers decode it against the schema they sent.
    async fn generate(&self, req: StructuredRequest) -> anyhow::Result<String>;
}
