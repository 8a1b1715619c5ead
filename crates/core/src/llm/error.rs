use std::fmt;

pub const STAGE_CREDENTIALS: &str = "credentials";
pub const STAGE_HTTP: &str = "http";
pub const STAGE_DECODE: &str = "decode";
pub const STAGE_EMPTY_RESPONSE: &str = "empty_response";

#[derive(Debug, Clone)]
pub struct LlmDiagnosticsError {
    pub provider: &'static str,
    pub stage: &'static str,
    pub detail: String,
    pub raw_output: Option<String>,
}

impl LlmDiagnosticsError {
    /// True when the service answered but the payload was unusable.
    pub fn is_decode_stage(&self) -> bool {
        matches!(self.stage, STAGE_DECODE | STAGE_EMPTY_RESPONSE)
    }
}

impl fmt::Display for LlmDiagnosticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LLM error (provider={}, stage={}): {}",
            self.provider, self.stage, self.detail
        )
    }
}

impl std::error::Error for LlmDiagnosticsError {}
