//! Per-view request lifecycle: `Idle -> Loading -> {Ready, Failed}`, with
//! `Ready`/`Failed` re-entering `Loading` on an explicit refresh or resubmit.
//!
//! Each view publishes its state on a `tokio::sync::watch` channel. Entering
//! `Loading` is a single check-and-set on that channel, so a view never has
//! more than one request in flight. Requests run on spawned tasks that only
//! hold a weak reference to the view; results arriving after the view is
//! dropped are discarded.

pub mod analysis;
pub mod trending;

pub use analysis::{AnalysisView, AnalysisViewState, ANALYSIS_FAILED_NOTICE};
pub use trending::TrendingView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState<T> {
    Idle,
    Loading,
    Ready(T),
    /// User-facing notice; details go to the log.
    Failed(String),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(v) => Some(v),
            _ => None,
        }
    }

    /// Moves to `Loading` unless a request is already in flight.
    /// Returns whether the transition happened.
    fn begin(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        *self = Self::Loading;
        true
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::domain::keyword::{KeywordAnalysis, TrendingKeyword};
    use crate::gateway::{fallback_trending_keywords, AnalysisError, FailureKind, KeywordInsights};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// Counts calls and can hold every request until `release` is called.
    #[derive(Default)]
    pub struct StubInsights {
        pub trending_calls: AtomicUsize,
        pub analysis_calls: AtomicUsize,
        pub analyzed: Mutex<Vec<String>>,
        pub fail_analysis: AtomicBool,
        gated: AtomicBool,
        gate: Notify,
    }

    impl StubInsights {
        pub fn gated() -> Self {
            let stub = Self::default();
            stub.gated.store(true, Ordering::SeqCst);
            stub
        }

        pub fn release(&self) {
            self.gate.notify_one();
        }

        async fn wait(&self) {
            if self.gated.load(Ordering::SeqCst) {
                self.gate.notified().await;
            }
        }
    }

    #[async_trait::async_trait]
    impl KeywordInsights for StubInsights {
        async fn fetch_trending_keywords(&self) -> Vec<TrendingKeyword> {
            self.trending_calls.fetch_add(1, Ordering::SeqCst);
            self.wait().await;
            fallback_trending_keywords()
        }

        async fn analyze_keyword(&self, keyword: &str) -> Result<KeywordAnalysis, AnalysisError> {
            self.analysis_calls.fetch_add(1, Ordering::SeqCst);
            self.analyzed.lock().unwrap().push(keyword.to_string());
            self.wait().await;
            if self.fail_analysis.load(Ordering::SeqCst) {
                return Err(AnalysisError::new(
                    keyword,
                    FailureKind::Transport,
                    anyhow::anyhow!("simulated outage"),
                ));
            }
            Ok(KeywordAnalysis {
                keyword: keyword.to_string(),
                difficulty_score: 55,
                potential_score: 80,
                related_keywords: vec![format!("{keyword} 추천")],
                seasonal_trend: Vec::new(),
                summary: "꾸준한 수요가 있습니다.".to_string(),
            })
        }
    }
}
