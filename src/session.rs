use crate::{FetchError, PreviewMetadata, PreviewSource};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, instrument};

/// Where a session is in its `idle -> loading -> (ready | failed)` cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    Idle,
    Loading { url: String },
    Ready(PreviewMetadata),
    Failed { url: String, error: FetchError },
}

impl PreviewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, PreviewState::Loading { .. })
    }

    pub fn metadata(&self) -> Option<&PreviewMetadata> {
        match self {
            PreviewState::Ready(metadata) => Some(metadata),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            PreviewState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// State plus the token of the load that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSnapshot {
    pub token: u64,
    pub state: PreviewState,
}

/// Whether a finished load was allowed to update the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied(PreviewState),
    /// A newer load or reset was issued while this one was in flight.
    Superseded,
}

/// Holds the preview for the URL currently bound to one card.
///
/// Each `load` takes a fresh token; only the load holding the latest token
/// may publish its result. Tokens are issued and checked under the watch
/// channel's lock, so a stale result can never overwrite a newer `Loading`.
pub struct PreviewSession<S> {
    source: Arc<S>,
    snapshot: watch::Sender<PreviewSnapshot>,
}

impl<S> Clone for PreviewSession<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            snapshot: self.snapshot.clone(),
        }
    }
}

impl<S: PreviewSource> PreviewSession<S> {
    pub fn new(source: S) -> Self {
        Self::with_shared_source(Arc::new(source))
    }

    pub fn with_shared_source(source: Arc<S>) -> Self {
        let (snapshot, _) = watch::channel(PreviewSnapshot {
            token: 0,
            state: PreviewState::Idle,
        });
        Self { source, snapshot }
    }

    pub fn state(&self) -> PreviewState {
        self.snapshot.borrow().state.clone()
    }

    /// Token of the most recently issued load or reset.
    pub fn latest_token(&self) -> u64 {
        self.snapshot.borrow().token
    }

    /// Receives every state transition, for re-rendering.
    pub fn subscribe(&self) -> watch::Receiver<PreviewSnapshot> {
        self.snapshot.subscribe()
    }

    /// Returns to `Idle` and invalidates any load still in flight.
    pub fn reset(&self) {
        let token = self.issue(PreviewState::Idle);
        debug!(token, "Preview session reset");
    }

    /// Binds `url` and fetches its preview.
    ///
    /// A blank `url` unbinds the session instead of fetching.
    #[instrument(level = "debug", skip(self))]
    pub async fn load(&self, url: &str) -> LoadOutcome {
        let url = url.trim();
        if url.is_empty() {
            self.reset();
            return LoadOutcome::Applied(PreviewState::Idle);
        }

        let token = self.issue(PreviewState::Loading {
            url: url.to_string(),
        });
        debug!(token, url = %url, "Issued preview request");

        let state = match self.source.fetch_preview(url).await {
            Ok(metadata) => PreviewState::Ready(metadata),
            Err(error) => PreviewState::Failed {
                url: url.to_string(),
                error,
            },
        };

        if self.commit(token, state.clone()) {
            if let Some(error) = state.error() {
                error.log();
            }
            LoadOutcome::Applied(state)
        } else {
            debug!(token, url = %url, "Discarding stale preview response");
            LoadOutcome::Superseded
        }
    }

    fn issue(&self, state: PreviewState) -> u64 {
        let mut token = 0;
        self.snapshot.send_modify(|snapshot| {
            snapshot.token += 1;
            snapshot.state = state;
            token = snapshot.token;
        });
        token
    }

    fn commit(&self, token: u64, state: PreviewState) -> bool {
        self.snapshot.send_if_modified(|snapshot| {
            if snapshot.token != token {
                return false;
            }
            snapshot.state = state;
            true
        })
    }
}
