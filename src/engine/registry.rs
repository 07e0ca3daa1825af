use std::sync::Arc;
use tokio::sync::{mpsc, watch};

use crate::domain::selection::Category;
use crate::engine::runtime::Event;
use crate::infrastructure::http::BackendApi;

/// Owns the category catalog and publishes it to consumers.
///
/// The catalog is replaced wholesale on every successful load; a failed load
/// keeps the previous catalog in place so a transient backend error never
/// blanks the filter UI.
pub(crate) struct CategoryRegistry {
    categories_tx: watch::Sender<Vec<Category>>,
}

impl CategoryRegistry {
    pub(crate) fn new(categories_tx: watch::Sender<Vec<Category>>) -> Self {
        Self { categories_tx }
    }

    /// Dispatch a catalog fetch; completion arrives back on the event loop
    /// as [`Event::CategoriesLoaded`].
    pub(crate) fn load(&self, api: &Arc<dyn BackendApi>, events: &mpsc::UnboundedSender<Event>) {
        tracing::debug!("loading category catalog");
        let api = Arc::clone(api);
        let events = events.clone();
        tokio::spawn(async move {
            let result = api.fetch_categories().await;
            let _ = events.send(Event::CategoriesLoaded(result));
        });
    }

    pub(crate) fn replace(&mut self, categories: Vec<Category>) {
        let _ = self.categories_tx.send(categories);
    }

    pub(crate) fn current(&self) -> Vec<Category> {
        self.categories_tx.borrow().clone()
    }
}
