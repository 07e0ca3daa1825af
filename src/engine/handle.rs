use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

use crate::domain::news::NewsItem;
use crate::domain::selection::{Category, SelectionState, Toggle};
use crate::engine::runtime::{Command, EngineCore};
use crate::engine::Notification;
use crate::error::{EngineError, EngineResult};
use crate::infrastructure::http::BackendApi;

/// Handle to a running engine.
///
/// State slices are read through `watch` receivers; they always carry the
/// latest published snapshot. While `loading` is true the news collection
/// must not be treated as fresh for the active filter. Commands are applied
/// in order on the engine's event loop; `subscribe` and `run_agent` resolve
/// with the typed outcome of their dispatch.
pub struct Engine {
    cmd_tx: mpsc::UnboundedSender<Command>,
    categories_rx: watch::Receiver<Vec<Category>>,
    selection_rx: watch::Receiver<SelectionState>,
    news_rx: watch::Receiver<Vec<NewsItem>>,
    loading_rx: watch::Receiver<bool>,
    email_rx: watch::Receiver<String>,
}

impl Engine {
    /// Start the engine event loop on the current runtime. Immediately loads
    /// the category catalog and fetches news for the default unrestricted
    /// query. The returned receiver carries out-of-band [`Notification`]s for
    /// the host UI.
    pub fn spawn(api: Arc<dyn BackendApi>) -> (Engine, mpsc::UnboundedReceiver<Notification>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (notifications_tx, notifications_rx) = mpsc::unbounded_channel();
        let (categories_tx, categories_rx) = watch::channel(Vec::new());
        let (selection_tx, selection_rx) = watch::channel(SelectionState::All);
        let (news_tx, news_rx) = watch::channel(Vec::new());
        let (loading_tx, loading_rx) = watch::channel(false);
        let (email_tx, email_rx) = watch::channel(String::new());

        let core = EngineCore::new(
            api,
            cmd_rx,
            categories_tx,
            selection_tx,
            news_tx,
            loading_tx,
            email_tx,
            notifications_tx,
        );
        tokio::spawn(core.run());

        let engine = Engine {
            cmd_tx,
            categories_rx,
            selection_rx,
            news_rx,
            loading_rx,
            email_rx,
        };
        (engine, notifications_rx)
    }

    /// Switch the detailed-explainer display flag. A changed FetchKey
    /// triggers a refetch; an unchanged one does not.
    pub fn set_explainer(&self, on: bool) -> EngineResult<()> {
        self.send(Command::SetExplainer(on))
    }

    /// Toggle a category filter, or reset to the unrestricted state with
    /// [`Toggle::All`]. Total; never leaves the selection empty.
    pub fn toggle(&self, toggle: Toggle) -> EngineResult<()> {
        self.send(Command::Toggle(toggle))
    }

    /// Replace the newsletter email draft.
    pub fn set_email(&self, email: impl Into<String>) -> EngineResult<()> {
        self.send(Command::SetEmail(email.into()))
    }

    /// Subscribe the current email draft to the newsletter. A blank draft
    /// fails with [`EngineError::Validation`] before any network call; a
    /// dispatched request clears the draft when it completes, whatever the
    /// response status.
    pub async fn subscribe(&self) -> EngineResult<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Subscribe(reply_tx))?;
        reply_rx.await.map_err(|_| EngineError::Closed)?
    }

    /// Trigger the backend content-refresh agent. On success the category
    /// catalog is reloaded and the news list refetched with the FetchKey
    /// current at completion time, even if unchanged.
    pub async fn run_agent(&self) -> EngineResult<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::RunAgent(reply_tx))?;
        reply_rx.await.map_err(|_| EngineError::Closed)?
    }

    pub fn categories(&self) -> watch::Receiver<Vec<Category>> {
        self.categories_rx.clone()
    }

    pub fn selection(&self) -> watch::Receiver<SelectionState> {
        self.selection_rx.clone()
    }

    pub fn news(&self) -> watch::Receiver<Vec<NewsItem>> {
        self.news_rx.clone()
    }

    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading_rx.clone()
    }

    pub fn email(&self) -> watch::Receiver<String> {
        self.email_rx.clone()
    }

    fn send(&self, cmd: Command) -> EngineResult<()> {
        self.cmd_tx.send(cmd).map_err(|_| EngineError::Closed)
    }
}
