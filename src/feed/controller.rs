use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, ContentSource, Page};

use super::state::{FeedEvent, FeedState, FetchRequest};

/// A finished fetch, tagged with the session that asked for it.
#[derive(Debug)]
pub struct PageResult {
    pub generation: u64,
    pub request_id: u64,
    pub result: Result<Page, ApiError>,
}

/// A fetch that was just spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchStarted {
    pub request_id: u64,
    pub cursor: Option<String>,
}

/// What applying a [`PageResult`] did to the feed.
#[derive(Debug)]
pub enum Completion {
    Loaded {
        request_id: u64,
        added: usize,
        has_more: bool,
    },
    Failed {
        request_id: u64,
        error: ApiError,
    },
    /// The result belonged to an unmounted or replaced session and was dropped.
    Stale { request_id: u64 },
}

impl Completion {
    pub fn request_id(&self) -> u64 {
        match self {
            Completion::Loaded { request_id, .. }
            | Completion::Failed { request_id, .. }
            | Completion::Stale { request_id } => *request_id,
        }
    }
}

/// Owns one mounted feed session and runs the fetches it asks for.
///
/// Results come back over a channel and are applied on the caller's task
/// through [`FeedController::apply_result`], so the feed state is only ever
/// touched from one place.
pub struct FeedController<S: ContentSource> {
    state: FeedState,
    source: S,
    lookahead_margin: f64,
    mounted: bool,
    generation: u64,
    cancel: CancellationToken,
    next_request_id: u64,
    result_tx: mpsc::Sender<PageResult>,
    result_rx: mpsc::Receiver<PageResult>,
}

impl<S: ContentSource> FeedController<S> {
    pub fn new(source: S, lookahead_margin: f64) -> Self {
        let (result_tx, result_rx) = mpsc::channel(10);
        Self {
            state: FeedState::empty(lookahead_margin),
            source,
            lookahead_margin,
            mounted: false,
            generation: 0,
            cancel: CancellationToken::new(),
            next_request_id: 0,
            result_tx,
            result_rx,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a fresh session and requests its first page.
    pub fn mount(&mut self) -> Option<FetchStarted> {
        self.start_session(false)
    }

    /// Remounts, dropping cached pages so the first page comes from the backend.
    pub fn refresh(&mut self) -> Option<FetchStarted> {
        self.start_session(true)
    }

    fn start_session(&mut self, fresh: bool) -> Option<FetchStarted> {
        self.end_session();
        self.mounted = true;
        self.state = FeedState::empty(self.lookahead_margin);
        tracing::debug!(generation = self.generation, fresh, "feed mounted");

        let request = self.state.request_next_page()?;
        Some(self.spawn_fetch(request, fresh))
    }

    /// Tears the session down. Outstanding fetches are cancelled and any
    /// result still in flight is discarded when it arrives.
    pub fn unmount(&mut self) {
        if self.mounted {
            tracing::debug!(generation = self.generation, "feed unmounted");
        }
        self.end_session();
        self.mounted = false;
    }

    fn end_session(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.generation += 1;
    }

    /// Feeds one input through the reducer, spawning the fetch it asks for.
    pub fn dispatch(&mut self, event: FeedEvent) -> Option<FetchStarted> {
        if !self.mounted {
            return None;
        }
        let request = self.state.apply(event)?;
        Some(self.spawn_fetch(request, false))
    }

    fn spawn_fetch(&mut self, request: FetchRequest, fresh: bool) -> FetchStarted {
        let request_id = self.next_request_id;
        self.next_request_id += 1;

        let started = FetchStarted {
            request_id,
            cursor: request.cursor.clone(),
        };
        let source = self.source.clone();
        let tx = self.result_tx.clone();
        let token = self.cancel.clone();
        let generation = self.generation;

        tokio::spawn(async move {
            let fetch = async {
                if fresh {
                    source.clear_cache().await;
                }
                source.fetch_page(request.cursor).await
            };
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => return,
                result = fetch => result,
            };
            let _ = tx
                .send(PageResult {
                    generation,
                    request_id,
                    result,
                })
                .await;
        });

        started
    }

    pub fn try_recv(&mut self) -> Option<PageResult> {
        self.result_rx.try_recv().ok()
    }

    /// Waits for the next finished fetch.
    pub async fn recv(&mut self) -> Option<PageResult> {
        self.result_rx.recv().await
    }

    pub fn apply_result(&mut self, result: PageResult) -> Completion {
        let PageResult {
            generation,
            request_id,
            result,
        } = result;
        if !self.mounted || generation != self.generation {
            tracing::debug!(request_id, generation, "discarding stale page");
            return Completion::Stale { request_id };
        }
        match result {
            Ok(page) => {
                let added = self.state.complete_load(page);
                Completion::Loaded {
                    request_id,
                    added,
                    has_more: self.state.has_more(),
                }
            }
            Err(error) => {
                tracing::warn!(request_id, %error, "page fetch failed");
                self.state.apply(FeedEvent::PageFailed);
                Completion::Failed { request_id, error }
            }
        }
    }
}

#[cfg(test)]
impl<S: ContentSource> FeedController<S> {
    /// Mounts directly onto a prepared state without fetching.
    pub fn with_state(source: S, state: FeedState) -> Self {
        let mut controller = Self::new(source, 2.0);
        controller.end_session();
        controller.mounted = true;
        controller.state = state;
        controller
    }
}
