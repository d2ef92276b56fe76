use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{Error, Res, api, types::AuthorizationState};

pub fn router(state: Arc<Mutex<AuthorizationState>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state))
}

/// Binds the callback server and serves it on a background task.
///
/// Binding happens before this returns, so a busy port is reported to the
/// caller instead of being lost inside the task. Returns the bound address
/// (useful with port `0`) and the handle to abort to stop the server.
pub async fn start_api_server(
    address: &str,
    state: Arc<Mutex<AuthorizationState>>,
) -> Res<(SocketAddr, JoinHandle<()>)> {
    let addr = SocketAddr::from_str(address)
        .map_err(|e| Error::Config(format!("Failed to parse server address {}: {}", address, e)))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let bound = listener.local_addr()?;
    let app = router(state);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            crate::warning!("Callback server stopped: {}", e);
        }
    });

    Ok((bound, handle))
}
