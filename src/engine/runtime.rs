use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

use crate::domain::news::{FetchKey, NewsItem};
use crate::domain::selection::{Category, SelectionState, Toggle};
use crate::domain::subscription::SubscriptionRequest;
use crate::engine::registry::CategoryRegistry;
use crate::engine::sync::NewsSync;
use crate::engine::Notification;
use crate::error::EngineResult;
use crate::infrastructure::http::BackendApi;

/// User-driven operations, sent by the [`Engine`](crate::engine::Engine)
/// handle.
pub(crate) enum Command {
    SetExplainer(bool),
    Toggle(Toggle),
    SetEmail(String),
    Subscribe(oneshot::Sender<EngineResult<()>>),
    RunAgent(oneshot::Sender<EngineResult<()>>),
}

/// Completions of dispatched network calls, delivered back to the event loop
/// so every state mutation happens on it.
pub(crate) enum Event {
    CategoriesLoaded(EngineResult<Vec<Category>>),
    NewsFetched {
        generation: u64,
        result: EngineResult<Vec<NewsItem>>,
    },
    SubscribeCompleted {
        result: EngineResult<()>,
        reply: oneshot::Sender<EngineResult<()>>,
    },
    AgentCompleted {
        result: EngineResult<()>,
        reply: oneshot::Sender<EngineResult<()>>,
    },
}

/// The engine event loop. Owns every state slice; mutates them only in
/// reaction to commands and completion events, never concurrently. Network
/// calls run in spawned sub-tasks and report back as [`Event`]s.
pub(crate) struct EngineCore {
    api: Arc<dyn BackendApi>,
    cmd_rx: mpsc::UnboundedReceiver<Command>,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    registry: CategoryRegistry,
    sync: NewsSync,
    selection: SelectionState,
    selection_tx: watch::Sender<SelectionState>,
    explainer: bool,
    email_tx: watch::Sender<String>,
    notifications_tx: mpsc::UnboundedSender<Notification>,
}

impl EngineCore {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        api: Arc<dyn BackendApi>,
        cmd_rx: mpsc::UnboundedReceiver<Command>,
        categories_tx: watch::Sender<Vec<Category>>,
        selection_tx: watch::Sender<SelectionState>,
        news_tx: watch::Sender<Vec<NewsItem>>,
        loading_tx: watch::Sender<bool>,
        email_tx: watch::Sender<String>,
        notifications_tx: mpsc::UnboundedSender<Notification>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            api,
            cmd_rx,
            events_tx,
            events_rx,
            registry: CategoryRegistry::new(categories_tx),
            sync: NewsSync::new(news_tx, loading_tx),
            selection: SelectionState::All,
            selection_tx,
            explainer: false,
            email_tx,
            notifications_tx,
        }
    }

    pub(crate) async fn run(mut self) {
        tracing::debug!("engine started");

        // Startup: populate the catalog and fetch news for the default
        // (explainer=false, categories=all) query. Both may be in flight at
        // once.
        self.registry.load(&self.api, &self.events_tx);
        self.sync_news(false);

        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    // All handles dropped; nobody is observing anymore.
                    None => break,
                },
                Some(event) = self.events_rx.recv() => self.handle_event(event),
            }
        }

        self.sync.abort();
        tracing::debug!("engine stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::SetExplainer(on) => {
                self.explainer = on;
                self.sync_news(false);
            }
            Command::Toggle(toggle) => {
                self.selection.toggle(toggle);
                let _ = self.selection_tx.send(self.selection.clone());
                self.sync_news(false);
            }
            Command::SetEmail(email) => {
                let _ = self.email_tx.send(email);
            }
            Command::Subscribe(reply) => self.dispatch_subscribe(reply),
            Command::RunAgent(reply) => self.dispatch_run_agent(reply),
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::CategoriesLoaded(Ok(categories)) => {
                tracing::info!(count = categories.len(), "category catalog replaced");
                self.registry.replace(categories);
                self.prune_selection();
            }
            Event::CategoriesLoaded(Err(err)) => {
                tracing::warn!(error = %err, "category load failed, keeping previous catalog");
                let _ = self
                    .notifications_tx
                    .send(Notification::CategoriesRefreshFailed {
                        message: err.to_string(),
                    });
            }
            Event::NewsFetched { generation, result } => {
                if let Some(err) = self.sync.complete(generation, result) {
                    tracing::warn!(error = %err, "news fetch failed, keeping previous collection");
                    let _ = self.notifications_tx.send(Notification::NewsRefreshFailed {
                        message: err.to_string(),
                    });
                }
            }
            Event::SubscribeCompleted { result, reply } => {
                // The draft clears when the dispatch completes, success or
                // not (legacy dashboard semantics).
                let _ = self.email_tx.send(String::new());
                let _ = reply.send(result);
            }
            Event::AgentCompleted { result, reply } => match result {
                Ok(()) => {
                    tracing::info!("agent run succeeded, resynchronizing");
                    self.registry.load(&self.api, &self.events_tx);
                    self.sync_news(true);
                    let _ = reply.send(Ok(()));
                }
                Err(err) => {
                    let _ = reply.send(Err(err));
                }
            },
        }
    }

    /// Drop selected categories missing from the refreshed catalog. A changed
    /// selection is republished, surfaced as a notification, and refetched
    /// through the normal policy.
    fn prune_selection(&mut self) {
        let removed = self.selection.retain_known(&self.registry.current());
        if removed.is_empty() {
            return;
        }
        tracing::warn!(
            removed = ?removed,
            "pruned selections missing from the refreshed catalog"
        );
        let _ = self.selection_tx.send(self.selection.clone());
        let _ = self
            .notifications_tx
            .send(Notification::SelectionPruned { removed });
        self.sync_news(false);
    }

    fn sync_news(&mut self, force: bool) {
        let key = FetchKey::new(self.explainer, self.selection.clone());
        self.sync.request(key, force, &self.api, &self.events_tx);
    }

    fn dispatch_subscribe(&mut self, reply: oneshot::Sender<EngineResult<()>>) {
        let email = self.email_tx.borrow().clone();
        let request = match SubscriptionRequest::new(email) {
            Ok(request) => request,
            // Fails fast before any I/O; the draft is left untouched.
            Err(err) => {
                let _ = reply.send(Err(err));
                return;
            }
        };

        tracing::info!("dispatching newsletter subscription");
        let api = Arc::clone(&self.api);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.subscribe(&request).await;
            let _ = events.send(Event::SubscribeCompleted { result, reply });
        });
    }

    fn dispatch_run_agent(&mut self, reply: oneshot::Sender<EngineResult<()>>) {
        tracing::info!("dispatching agent run");
        let api = Arc::clone(&self.api);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.run_agent().await;
            let _ = events.send(Event::AgentCompleted { result, reply });
        });
    }
}
