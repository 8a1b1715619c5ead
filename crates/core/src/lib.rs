pub mod domain;
pub mod gateway;
pub mod llm;
pub mod view;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub gemini_api_key: Option<String>,
        pub gemini_base_url: Option<String>,
        pub gemini_model: Option<String>,
        pub gemini_timeout_secs: Option<u64>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let gemini_timeout_secs = match env_non_empty("GEMINI_TIMEOUT_SECS") {
                Some(s) => Some(
                    s.parse::<u64>()
                        .with_context(|| format!("GEMINI_TIMEOUT_SECS must be an integer (got {s})"))?,
                ),
                None => None,
            };

            Ok(Self {
                gemini_api_key: env_non_empty("GEMINI_API_KEY").or_else(|| env_non_empty("API_KEY")),
                gemini_base_url: env_non_empty("GEMINI_BASE_URL"),
                gemini_model: env_non_empty("GEMINI_MODEL"),
                gemini_timeout_secs,
                sentry_dsn: env_non_empty("SENTRY_DSN"),
            })
        }

        pub fn has_gemini_api_key(&self) -> bool {
            self.gemini_api_key.is_some()
        }
    }

    fn env_non_empty(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }
}
