use crate::domain::keyword::TrendingKeyword;
use crate::gateway::KeywordInsights;
use crate::view::RequestState;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub type TrendingState = RequestState<Vec<TrendingKeyword>>;

/// Trending-keyword ranking. Never reaches `Failed`: the gateway always
/// resolves to live or fallback rows.
pub struct TrendingView {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn KeywordInsights>,
    state: watch::Sender<TrendingState>,
}

impl TrendingView {
    pub fn new(source: Arc<dyn KeywordInsights>) -> Self {
        let (state, _) = watch::channel(TrendingState::Idle);
        Self {
            inner: Arc::new(Inner { source, state }),
        }
    }

    /// First display: loads without user action. No-op once the view has left `Idle`.
    pub fn mount(&self) -> Option<JoinHandle<()>> {
        let started = self
            .inner
            .state
            .send_if_modified(|s| matches!(s, RequestState::Idle) && s.begin());
        started.then(|| self.spawn_fetch())
    }

    /// Manual refresh; ignored while a fetch is already in flight.
    pub fn refresh(&self) -> Option<JoinHandle<()>> {
        if !self.inner.state.send_if_modified(|s| s.begin()) {
            tracing::debug!("trending refresh ignored; fetch already in flight");
            return None;
        }
        Some(self.spawn_fetch())
    }

    pub fn can_refresh(&self) -> bool {
        !self.inner.state.borrow().is_loading()
    }

    pub fn state(&self) -> TrendingState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TrendingState> {
        self.inner.state.subscribe()
    }

    fn spawn_fetch(&self) -> JoinHandle<()> {
        let source = Arc::clone(&self.inner.source);
        let view = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            let keywords = source.fetch_trending_keywords().await;
            let Some(inner) = view.upgrade() else {
                tracing::debug!("trending view dropped before fetch completed; discarding result");
                return;
            };
            inner.state.send_replace(RequestState::Ready(keywords));
        })
    }
}
