use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rand::{SeedableRng, rngs::StdRng};
use randomify::{
    Error, cli,
    config::Settings,
    pipeline::{Pipeline, PipelineState, RunOutcome},
    session::Session,
    spotify::catalog::{Catalog, CatalogClient, SearchOptions},
    types::TokenSet,
};
use serde_json::json;

const SECRET: &str = "secret";

#[derive(Clone, Default)]
struct Hits {
    token: Arc<AtomicUsize>,
    catalog: Arc<AtomicUsize>,
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn settings_for(base: &str) -> Settings {
    let mut settings = Settings::with_secret(SECRET);
    settings.token_url = format!("{}/api/token", base);
    settings.api_url = format!("{}/v1", base);
    settings
}

fn authorized(headers: &HeaderMap, expected: &str) -> bool {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) == Some(expected)
}

async fn token(
    State(hits): State<Hits>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let n = hits.token.fetch_add(1, Ordering::SeqCst) + 1;
    let basic = randomify::utils::basic_auth_header(randomify::config::DEFAULT_CLIENT_ID, SECRET);
    if !authorized(&headers, &basic) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "invalid_client"}))).into_response();
    }

    match form.get("grant_type").map(String::as_str) {
        Some("authorization_code") if form.get("code").map(String::as_str) == Some("good") => {
            assert_eq!(
                form.get("redirect_uri").map(String::as_str),
                Some(randomify::config::DEFAULT_REDIRECT_URI)
            );
            Json(json!({
                "access_token": format!("access-{}", n),
                "refresh_token": format!("refresh-{}", n),
                "expires_in": 3600,
                "token_type": "Bearer",
                "scope": "user-modify-playback-state",
            }))
            .into_response()
        }
        Some("refresh_token") => Json(json!({
            "access_token": "access-refreshed",
            "expires_in": 3600,
            "token_type": "Bearer",
        }))
        .into_response(),
        _ => (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_grant"}))).into_response(),
    }
}

async fn search(State(hits): State<Hits>, headers: HeaderMap) -> Response {
    hits.catalog.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers, "Bearer access-1") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({"albums": {"items": [{"id": "abc123", "name": "X"}], "total": 1}})).into_response()
}

async fn album(State(hits): State<Hits>, Path(id): Path<String>) -> Response {
    hits.catalog.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "id": id,
        "name": "X",
        "uri": format!("spotify:album:{}", id),
        "href": format!("https://api.spotify.com/v1/albums/{}", id),
        "images": [{"url": "img.png", "height": 640, "width": 640}],
        "artists": [{"id": "art1", "name": "Y"}],
    }))
    .into_response()
}

async fn artist(State(hits): State<Hits>, Path(id): Path<String>) -> Response {
    hits.catalog.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "id": id,
        "name": "Y",
        "images": [{"url": "thumb.png", "height": 160, "width": 160}],
    }))
    .into_response()
}

async fn stub_spotify() -> (String, Hits) {
    let hits = Hits::default();
    let app = Router::new()
        .route("/api/token", post(token))
        .route("/v1/search", get(search))
        .route("/v1/albums/{id}", get(album))
        .route("/v1/artists/{id}", get(artist))
        .with_state(hits.clone());
    (serve(app).await, hits)
}

#[tokio::test]
async fn test_catalog_token_follows_latest_exchange() {
    let (base, _) = stub_spotify().await;
    let settings = settings_for(&base);
    let mut session = Session::new(settings.clone());
    let mut catalog = CatalogClient::new(&settings);

    session.authorize_with_code("good").await.unwrap();
    assert!(session.configure(&mut catalog));
    assert_eq!(catalog.access_token(), Some("access-1"));

    session.authorize_with_code("good").await.unwrap();
    assert!(session.configure(&mut catalog));
    assert_eq!(catalog.access_token(), Some("access-2"));
    assert_eq!(session.tokens().refresh_token, "refresh-2");
    assert_eq!(session.tokens().expires_in, 3600);
}

#[tokio::test]
async fn test_failed_exchange_keeps_placeholder_and_skips_run() {
    let (base, hits) = stub_spotify().await;
    let settings = settings_for(&base);
    let mut session = Session::new(settings.clone());
    let mut catalog = CatalogClient::new(&settings);
    let pipeline = Pipeline::new(&settings);

    let result = cli::launch(
        &mut session,
        &mut catalog,
        &pipeline,
        "bad",
        &mut StdRng::seed_from_u64(1),
    )
    .await;

    assert!(matches!(result, Err(Error::Api { status: 400, .. })));
    assert_eq!(session.tokens(), &TokenSet::placeholder());
    assert_eq!(catalog.access_token(), None);
    assert!(!session.configure(&mut catalog));
    assert_eq!(catalog.access_token(), None);
    assert_eq!(hits.token.load(Ordering::SeqCst), 1);
    assert_eq!(hits.catalog.load(Ordering::SeqCst), 0);
    assert_eq!(pipeline.state().await, PipelineState::Idle);
    assert!(pipeline.view().await.is_loading());
}

#[tokio::test]
async fn test_wrong_client_secret_is_rejected() {
    let (base, _) = stub_spotify().await;
    let mut settings = settings_for(&base);
    settings.client_secret = "wrong".to_string();
    let mut session = Session::new(settings);

    let result = session.authorize_with_code("good").await;

    assert!(matches!(result, Err(Error::Api { status: 401, .. })));
    assert!(!session.is_authorized());
}

#[tokio::test]
async fn test_launch_runs_full_chain() {
    let (base, hits) = stub_spotify().await;
    let settings = settings_for(&base);
    let mut session = Session::new(settings.clone());
    let mut catalog = CatalogClient::new(&settings);
    let pipeline = Pipeline::new(&settings);

    let outcome = cli::launch(
        &mut session,
        &mut catalog,
        &pipeline,
        "good",
        &mut StdRng::seed_from_u64(5),
    )
    .await
    .unwrap();

    let RunOutcome::Ready(view) = outcome else {
        panic!("run was superseded");
    };
    assert_eq!(view.album.id, "abc123");
    assert_eq!(view.album.name, "X");
    assert_eq!(view.album.external_url, "spotify:album:abc123");
    assert_eq!(view.album.image_url, "img.png");
    assert_eq!(view.album.artist, "Y");
    assert_eq!(view.album.artist_id, "art1");
    assert_eq!(view.artist.thumbnail_url, "thumb.png");
    assert_eq!(hits.catalog.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_refresh_keeps_refresh_token_when_not_rotated() {
    let (base, _) = stub_spotify().await;
    let settings = settings_for(&base);
    let mut session = Session::new(settings.clone());
    let mut catalog = CatalogClient::new(&settings);

    session.authorize_with_code("good").await.unwrap();
    session.refresh().await.unwrap();
    session.configure(&mut catalog);

    assert_eq!(session.tokens().access_token, "access-refreshed");
    assert_eq!(session.tokens().refresh_token, "refresh-1");
    assert_eq!(catalog.access_token(), Some("access-refreshed"));
}

#[tokio::test]
async fn test_refresh_requires_authorization() {
    let mut session = Session::new(Settings::with_secret(SECRET));

    assert!(matches!(session.refresh().await, Err(Error::MissingToken)));
}

#[tokio::test]
async fn test_catalog_without_token_refuses_requests() {
    let (base, hits) = stub_spotify().await;
    let catalog = CatalogClient::new(&settings_for(&base));
    let options = SearchOptions {
        limit: 1,
        offset: 0,
        market: "US".to_string(),
    };

    assert!(matches!(
        catalog.search_albums("a", &options).await,
        Err(Error::MissingToken)
    ));
    assert!(matches!(catalog.get_album("abc123").await, Err(Error::MissingToken)));
    assert!(matches!(catalog.get_artist("art1").await, Err(Error::MissingToken)));
    assert_eq!(hits.catalog.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_catalog_surfaces_api_errors() {
    let (base, _) = stub_spotify().await;
    let mut catalog = CatalogClient::new(&settings_for(&base));
    catalog.set_access_token("stale");
    let options = SearchOptions {
        limit: 1,
        offset: 0,
        market: "US".to_string(),
    };

    assert!(matches!(
        catalog.search_albums("a", &options).await,
        Err(Error::Api { status: 401, .. })
    ));
}
