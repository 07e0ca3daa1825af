use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::domain::news::{FetchKey, NewsItem};
use crate::engine::runtime::Event;
use crate::error::{EngineError, EngineResult};
use crate::infrastructure::http::BackendApi;

/// Keeps the displayed news collection consistent with the current FetchKey.
///
/// Every dispatch carries a generation number and aborts the previous
/// in-flight fetch, so a superseded response can never overwrite the result
/// of a newer request. `loading` is true from dispatch until the
/// current-generation response is applied, including across supersessions.
pub(crate) struct NewsSync {
    news_tx: watch::Sender<Vec<NewsItem>>,
    loading_tx: watch::Sender<bool>,
    current_key: Option<FetchKey>,
    generation: u64,
    inflight: Option<JoinHandle<()>>,
}

impl NewsSync {
    pub(crate) fn new(
        news_tx: watch::Sender<Vec<NewsItem>>,
        loading_tx: watch::Sender<bool>,
    ) -> Self {
        Self {
            news_tx,
            loading_tx,
            current_key: None,
            generation: 0,
            inflight: None,
        }
    }

    /// Dispatch a fetch for `key` unless it equals the last-dispatched key.
    /// `force` skips the equality check (used after a successful agent run).
    pub(crate) fn request(
        &mut self,
        key: FetchKey,
        force: bool,
        api: &Arc<dyn BackendApi>,
        events: &mpsc::UnboundedSender<Event>,
    ) {
        if !force && self.current_key.as_ref() == Some(&key) {
            return;
        }

        if let Some(inflight) = self.inflight.take() {
            tracing::debug!("aborting superseded news fetch");
            inflight.abort();
        }

        self.generation += 1;
        let generation = self.generation;
        tracing::debug!(
            explainer = key.explainer,
            categories = %key.categories_param(),
            generation,
            "dispatching news fetch"
        );
        let _ = self.loading_tx.send(true);
        self.current_key = Some(key.clone());

        let api = Arc::clone(api);
        let events = events.clone();
        self.inflight = Some(tokio::spawn(async move {
            let result = api.fetch_news(&key).await;
            let _ = events.send(Event::NewsFetched { generation, result });
        }));
    }

    /// Apply a fetch completion. Stale generations are discarded. Returns the
    /// error, if any, so the caller can surface it; the previous collection
    /// stays displayed in that case.
    pub(crate) fn complete(
        &mut self,
        generation: u64,
        result: EngineResult<Vec<NewsItem>>,
    ) -> Option<EngineError> {
        if generation != self.generation {
            // A newer dispatch owns the loading flag now.
            return None;
        }

        self.inflight = None;
        let _ = self.loading_tx.send(false);
        match result {
            Ok(items) => {
                tracing::debug!(count = items.len(), "news collection replaced");
                let _ = self.news_tx.send(items);
                None
            }
            Err(err) => Some(err),
        }
    }

    pub(crate) fn abort(&mut self) {
        if let Some(inflight) = self.inflight.take() {
            inflight.abort();
        }
    }
}
