use crate::helpers::{news_item, settle, spawn_engine, spawn_mock_backend, wait_until};
use pretty_assertions::assert_eq;
use std::sync::atomic::Ordering;
use upnext_engine::{EngineError, Notification, Toggle};

#[tokio::test]
async fn it_should_reject_a_blank_email_without_calling_the_backend() {
    let backend = spawn_mock_backend().await.unwrap();
    backend.state.set_categories(&["ai"]);

    let (engine, _notifications) = spawn_engine(&backend);

    engine.set_email("   ").unwrap();
    let err = engine.subscribe().await.unwrap_err();

    assert!(matches!(err, EngineError::Validation(_)));
    assert!(backend.state.subscribe_requests.lock().is_empty());
}

#[tokio::test]
async fn it_should_clear_the_email_draft_after_a_successful_subscription() {
    let backend = spawn_mock_backend().await.unwrap();
    backend.state.set_categories(&["ai"]);

    let (engine, _notifications) = spawn_engine(&backend);

    engine.set_email("a@b.com").unwrap();
    engine.subscribe().await.unwrap();

    assert_eq!(
        backend.state.subscribe_requests.lock().as_slice(),
        ["a@b.com"]
    );
    assert_eq!(engine.email().borrow().as_str(), "");
}

#[tokio::test]
async fn it_should_clear_the_email_draft_even_when_the_backend_rejects() {
    let backend = spawn_mock_backend().await.unwrap();
    backend.state.set_categories(&["ai"]);
    backend.state.subscribe_status.store(500, Ordering::SeqCst);

    let (engine, _notifications) = spawn_engine(&backend);

    engine.set_email("a@b.com").unwrap();
    let err = engine.subscribe().await.unwrap_err();

    // Clear-on-completion regardless of status: documented legacy quirk.
    assert!(matches!(err, EngineError::Network(_)));
    assert_eq!(backend.state.subscribe_requests.lock().len(), 1);
    assert_eq!(engine.email().borrow().as_str(), "");
}

#[tokio::test]
async fn it_should_resync_exactly_once_after_a_successful_agent_run() {
    let backend = spawn_mock_backend().await.unwrap();
    backend.state.set_categories(&["ai"]);
    backend.state.set_news("all", vec![news_item("before")]);

    let (engine, _notifications) = spawn_engine(&backend);
    let news = engine.news();
    wait_until("the initial news fetch lands", || !news.borrow().is_empty()).await;
    settle().await;

    backend.state.set_news("all", vec![news_item("after")]);
    engine.run_agent().await.unwrap();

    wait_until("the forced refetch lands", || {
        news.borrow().first().map(|n| n.title.as_str()) == Some("after")
    })
    .await;
    settle().await;

    // One catalog reload and one forced news fetch, despite an unchanged
    // FetchKey.
    assert_eq!(backend.state.categories_hits.load(Ordering::SeqCst), 2);
    assert_eq!(backend.state.news_request_count(), 2);
    assert_eq!(
        backend.state.last_news_request(),
        Some((false, "all".to_string()))
    );
}

#[tokio::test]
async fn it_should_not_resync_after_a_failed_agent_run() {
    let backend = spawn_mock_backend().await.unwrap();
    backend.state.set_categories(&["ai"]);
    backend.state.set_news("all", vec![news_item("before")]);
    backend.state.run_status.store(500, Ordering::SeqCst);

    let (engine, _notifications) = spawn_engine(&backend);
    let news = engine.news();
    wait_until("the initial news fetch lands", || !news.borrow().is_empty()).await;
    settle().await;

    let err = engine.run_agent().await.unwrap_err();
    settle().await;

    assert!(matches!(err, EngineError::Network(_)));
    assert_eq!(backend.state.categories_hits.load(Ordering::SeqCst), 1);
    assert_eq!(backend.state.news_request_count(), 1);
}

#[tokio::test]
async fn it_should_prune_selections_missing_from_a_refreshed_catalog() {
    let backend = spawn_mock_backend().await.unwrap();
    backend.state.set_categories(&["ai", "robotics"]);
    backend.state.set_news("all", vec![news_item("everything")]);
    backend.state.set_news("ai", vec![news_item("ai only")]);

    let (engine, mut notifications) = spawn_engine(&backend);
    let news = engine.news();
    wait_until("the initial news fetch lands", || !news.borrow().is_empty()).await;

    engine.toggle(Toggle::Category("ai".to_string())).unwrap();
    wait_until("the filtered fetch lands", || {
        news.borrow().first().map(|n| n.title.as_str()) == Some("ai only")
    })
    .await;

    // The agent run rebuilds the catalog without "ai".
    backend.state.set_categories(&["robotics"]);
    engine.run_agent().await.unwrap();

    let notification = notifications.recv().await.unwrap();
    assert_eq!(
        notification,
        Notification::SelectionPruned {
            removed: vec!["ai".to_string()]
        }
    );
    wait_until("the selection collapses to all", || {
        engine.selection().borrow().is_all()
    })
    .await;
    wait_until("the unrestricted fetch lands", || {
        news.borrow().first().map(|n| n.title.as_str()) == Some("everything")
    })
    .await;
}
