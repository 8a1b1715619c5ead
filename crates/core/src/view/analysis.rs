use crate::domain::keyword::KeywordAnalysis;
pub use crate::gateway::ANALYSIS_FAILED_NOTICE;
use crate::gateway::KeywordInsights;
use crate::view::RequestState;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisViewState {
    /// Last accepted submission, kept as typed so a failed request can be resubmitted.
    pub input: String,
    pub request: RequestState<KeywordAnalysis>,
}

pub struct AnalysisView {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn KeywordInsights>,
    state: watch::Sender<AnalysisViewState>,
}

impl AnalysisView {
    pub fn new(source: Arc<dyn KeywordInsights>) -> Self {
        let (state, _) = watch::channel(AnalysisViewState::default());
        Self {
            inner: Arc::new(Inner { source, state }),
        }
    }

    /// Starts an analysis of `input`. Whitespace-only input and submissions
    /// made while a request is in flight are ignored and return `None`.
    pub fn submit(&self, input: &str) -> Option<JoinHandle<()>> {
        let keyword = input.trim();
        if keyword.is_empty() {
            tracing::debug!("empty keyword submission ignored");
            return None;
        }

        let started = self.inner.state.send_if_modified(|s| {
            if !s.request.begin() {
                return false;
            }
            s.input = input.to_string();
            true
        });
        if !started {
            tracing::debug!(%keyword, "analysis submission ignored; request already in flight");
            return None;
        }

        let keyword = keyword.to_string();
        let source = Arc::clone(&self.inner.source);
        let view = Arc::downgrade(&self.inner);
        Some(tokio::spawn(async move {
            let outcome = source.analyze_keyword(&keyword).await;
            let Some(inner) = view.upgrade() else {
                tracing::debug!(%keyword, "analysis view dropped before request completed; discarding result");
                return;
            };

            let next = match outcome {
                Ok(analysis) => RequestState::Ready(analysis),
                Err(err) => {
                    tracing::warn!(kind = ?err.kind, keyword = %err.keyword, "analysis view showing failure notice");
                    RequestState::Failed(err.to_string())
                }
            };
            inner.state.send_modify(|s| s.request = next);
        }))
    }

    pub fn can_submit(&self) -> bool {
        !self.inner.state.borrow().request.is_loading()
    }

    pub fn input(&self) -> String {
        self.inner.state.borrow().input.clone()
    }

    pub fn state(&self) -> AnalysisViewState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AnalysisViewState> {
        self.inner.state.subscribe()
    }
}
