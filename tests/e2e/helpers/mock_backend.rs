use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use upnext_engine::NewsItem;

/// Scriptable stand-in for the dashboard backend. News payloads and
/// artificial delays are keyed by the `categories` query parameter, so tests
/// can tell exactly which response the engine applied.
#[derive(Default)]
pub struct MockState {
    pub categories: Mutex<Vec<String>>,
    pub categories_hits: AtomicUsize,
    /// Every `/news` request as (explainer, categories).
    pub news_requests: Mutex<Vec<(bool, String)>>,
    pub news_items: Mutex<HashMap<String, Vec<NewsItem>>>,
    pub news_delay_ms: Mutex<HashMap<String, u64>>,
    pub news_status: AtomicU16,
    pub categories_status: AtomicU16,
    pub subscribe_requests: Mutex<Vec<String>>,
    pub subscribe_status: AtomicU16,
    pub run_status: AtomicU16,
}

impl MockState {
    pub fn set_categories(&self, categories: &[&str]) {
        *self.categories.lock() = categories.iter().map(|c| c.to_string()).collect();
    }

    pub fn set_news(&self, categories_param: &str, items: Vec<NewsItem>) {
        self.news_items
            .lock()
            .insert(categories_param.to_string(), items);
    }

    pub fn delay_news(&self, categories_param: &str, millis: u64) {
        self.news_delay_ms
            .lock()
            .insert(categories_param.to_string(), millis);
    }

    pub fn news_request_count(&self) -> usize {
        self.news_requests.lock().len()
    }

    pub fn last_news_request(&self) -> Option<(bool, String)> {
        self.news_requests.lock().last().cloned()
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
}

pub async fn spawn_mock_backend() -> Result<MockBackend> {
    let state = Arc::new(MockState {
        subscribe_status: AtomicU16::new(200),
        run_status: AtomicU16::new(200),
        news_status: AtomicU16::new(200),
        categories_status: AtomicU16::new(200),
        ..Default::default()
    });

    let app = Router::new()
        .route("/categories", get(categories))
        .route("/news", get(news))
        .route("/subscribe", post(subscribe))
        .route("/run", get(run))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Ok(MockBackend {
        base_url: format!("http://{}", addr),
        state,
    })
}

async fn categories(State(state): State<Arc<MockState>>) -> Response {
    state.categories_hits.fetch_add(1, Ordering::SeqCst);
    let status = state.categories_status.load(Ordering::SeqCst);
    if status != 200 {
        return StatusCode::from_u16(status).unwrap().into_response();
    }
    Json(state.categories.lock().clone()).into_response()
}

#[derive(Deserialize)]
struct NewsParams {
    explainer: bool,
    categories: String,
}

async fn news(State(state): State<Arc<MockState>>, Query(params): Query<NewsParams>) -> Response {
    state
        .news_requests
        .lock()
        .push((params.explainer, params.categories.clone()));

    let delay = state.news_delay_ms.lock().get(&params.categories).copied();
    if let Some(millis) = delay {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    let status = state.news_status.load(Ordering::SeqCst);
    if status != 200 {
        return StatusCode::from_u16(status).unwrap().into_response();
    }

    let items = state
        .news_items
        .lock()
        .get(&params.categories)
        .cloned()
        .unwrap_or_default();
    Json(items).into_response()
}

#[derive(Deserialize)]
struct SubscribeBody {
    email: String,
}

async fn subscribe(
    State(state): State<Arc<MockState>>,
    Json(body): Json<SubscribeBody>,
) -> StatusCode {
    state.subscribe_requests.lock().push(body.email);
    StatusCode::from_u16(state.subscribe_status.load(Ordering::SeqCst)).unwrap()
}

async fn run(State(state): State<Arc<MockState>>) -> StatusCode {
    StatusCode::from_u16(state.run_status.load(Ordering::SeqCst)).unwrap()
}
