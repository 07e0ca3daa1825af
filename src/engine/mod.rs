use crate::domain::selection::Category;

mod handle;
mod registry;
mod runtime;
mod sync;

pub use handle::Engine;

/// Out-of-band feedback for the host UI, published on the notification
/// channel returned by [`Engine::spawn`]. Action results (subscribe,
/// run-agent) are returned directly to the caller instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Selected categories disappeared from a refreshed catalog and were
    /// dropped from the active filter.
    SelectionPruned { removed: Vec<Category> },
    /// A category reload failed; the previous catalog is still displayed.
    CategoriesRefreshFailed { message: String },
    /// A news fetch failed; the previous collection is still displayed.
    NewsRefreshFailed { message: String },
}
