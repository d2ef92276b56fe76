use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{types::AuthorizationState, warning};

/// Receives the authorization redirect.
///
/// Stores either the code or the error reported by Spotify in the shared
/// state; the waiting auth flow picks it up from there. A redirect whose
/// `state` does not match the pending attempt is recorded as a mismatch and
/// ends the attempt.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<AuthorizationState>>>,
) -> Html<&'static str> {
    let mut pending = shared_state.lock().await;

    if params.get("state") != Some(&pending.state) {
        warning!("Rejecting redirect with unexpected state parameter");
        pending.mismatch = Some(params.get("state").cloned().unwrap_or_default());
        return Html("<h4>Unexpected authorization state.</h4>");
    }

    if let Some(error) = params.get("error") {
        pending.error = Some(error.clone());
        return Html("<h4>Login cancelled.</h4>");
    }

    match params.get("code") {
        Some(code) => {
            pending.code = Some(code.clone());
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        None => Html("<h4>Missing authorization code.</h4>"),
    }
}
