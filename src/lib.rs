//! Client-side selection/synchronization engine for an AI-curated news
//! dashboard.
//!
//! The engine owns four state slices (category catalog, selection filter,
//! news collection + loading flag, email draft) on a single event loop and
//! keeps the news collection consistent with the current
//! (explainer, selection) query, superseding stale in-flight fetches. The
//! backend HTTP API is consumed through [`infrastructure::http::BackendApi`].

pub mod domain;
pub mod engine;
pub mod error;
pub mod infrastructure;

pub use domain::news::{FetchKey, NewsItem};
pub use domain::selection::{Category, SelectionState, Toggle};
pub use domain::subscription::SubscriptionRequest;
pub use engine::{Engine, Notification};
pub use error::{EngineError, EngineResult};
pub use infrastructure::config::Config;
pub use infrastructure::http::{BackendApi, BackendClient};
