use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{Extension, extract::Query};
use randomify::{
    Error,
    api::{callback, health},
    config::Settings,
    server::start_api_server,
    spotify::auth::{authorize_url, wait_for_code},
    types::AuthorizationState,
};
use tokio::sync::Mutex;

fn pending(state: &str) -> Arc<Mutex<AuthorizationState>> {
    Arc::new(Mutex::new(AuthorizationState::new(state.to_string())))
}

fn params(pairs: &[(&str, &str)]) -> Query<HashMap<String, String>> {
    Query(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

#[tokio::test]
async fn test_callback_stores_code() {
    let state = pending("xyz");

    let page = callback(
        params(&[("code", "AQA123"), ("state", "xyz")]),
        Extension(Arc::clone(&state)),
    )
    .await;

    assert!(page.0.contains("successful"));
    assert_eq!(state.lock().await.code.as_deref(), Some("AQA123"));
    assert_eq!(
        wait_for_code(state, Duration::from_secs(1)).await.unwrap(),
        "AQA123"
    );
}

#[tokio::test]
async fn test_callback_records_denial() {
    let state = pending("xyz");

    callback(
        params(&[("error", "access_denied"), ("state", "xyz")]),
        Extension(Arc::clone(&state)),
    )
    .await;

    assert!(state.lock().await.code.is_none());
    match wait_for_code(state, Duration::from_secs(1)).await {
        Err(Error::AuthorizationDenied(reason)) => assert_eq!(reason, "access_denied"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_callback_rejects_foreign_state() {
    let state = pending("xyz");

    let page = callback(
        params(&[("code", "AQA123"), ("state", "evil")]),
        Extension(Arc::clone(&state)),
    )
    .await;

    assert!(page.0.contains("Unexpected"));
    assert!(state.lock().await.code.is_none());
    match wait_for_code(state, Duration::from_millis(600)).await {
        Err(Error::StateMismatch { expected, received }) => {
            assert_eq!(expected, "xyz");
            assert_eq!(received, "evil");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_callback_without_state_is_a_mismatch() {
    let state = pending("xyz");

    let page = callback(params(&[("code", "AQA123")]), Extension(Arc::clone(&state))).await;

    assert!(page.0.contains("Unexpected"));
    assert!(state.lock().await.code.is_none());
    assert!(matches!(
        wait_for_code(state, Duration::from_millis(600)).await,
        Err(Error::StateMismatch { received, .. }) if received.is_empty()
    ));
}

#[tokio::test]
async fn test_callback_without_code() {
    let state = pending("xyz");

    let page = callback(params(&[("state", "xyz")]), Extension(Arc::clone(&state))).await;

    assert!(page.0.contains("Missing"));
}

#[tokio::test]
async fn test_wait_for_code_times_out() {
    let result = wait_for_code(pending("xyz"), Duration::from_millis(300)).await;

    match result {
        Err(Error::AuthorizationTimeout(waited)) => {
            assert_eq!(waited, Duration::from_millis(300))
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_health_reports_code() {
    let state = pending("xyz");

    let body = health(Extension(Arc::clone(&state))).await;
    assert_eq!(body.0["status"], "ok");
    assert_eq!(body.0["code_received"], false);

    state.lock().await.code = Some("AQA".to_string());
    let body = health(Extension(state)).await;
    assert_eq!(body.0["code_received"], true);
}

#[tokio::test]
async fn test_server_delivers_redirect() {
    let state = pending("xyz");
    let (addr, server) = start_api_server("127.0.0.1:0", Arc::clone(&state))
        .await
        .unwrap();

    assert_ne!(addr.port(), 0);
    let body = reqwest::get(format!("http://{}/callback?code=AQA999&state=xyz", addr))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    server.abort();

    assert!(body.contains("successful"));
    assert_eq!(
        wait_for_code(state, Duration::from_secs(1)).await.unwrap(),
        "AQA999"
    );
}

#[tokio::test]
async fn test_server_rejects_bad_address() {
    let result = start_api_server("not an address", pending("xyz")).await;

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_authorize_url() {
    let settings = Settings::with_secret("secret");
    let url = authorize_url(&settings, "xyz").unwrap();

    assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
    assert!(url.contains("response_type=code"));
    assert!(url.contains("client_id=8a352836ac464579ab2e790ee597a703"));
    assert!(url.contains("scope=user-modify-playback-state"));
    assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A8888%2Fcallback"));
    assert!(url.contains("state=xyz"));
    assert!(!url.contains(&settings.client_secret));
}
