use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, header::AUTHORIZATION};
use tokio::sync::Mutex;

use crate::{
    Error, Res,
    config::Settings,
    info,
    server::start_api_server,
    spotify::check_status,
    types::{AuthorizationState, TokenResponse, TokenSet},
    utils, warning,
};

/// Builds the Spotify authorization URL for one attempt.
///
/// Every value is percent-encoded by `reqwest::Url`, so scopes with spaces
/// and redirect URIs with query strings survive the trip.
pub fn authorize_url(settings: &Settings, state: &str) -> Res<String> {
    let url = reqwest::Url::parse_with_params(
        &settings.auth_url,
        &[
            ("response_type", "code"),
            ("client_id", settings.client_id.as_str()),
            ("scope", settings.scope.as_str()),
            ("redirect_uri", settings.redirect_uri.as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| Error::Config(format!("invalid auth url {}: {}", settings.auth_url, e)))?;

    Ok(url.to_string())
}

/// Runs the browser part of the authorization-code flow.
///
/// 1. Binds the local callback server on `settings.server_address`
/// 2. Opens the authorization URL in the default browser
/// 3. Waits until the redirect reaches `/callback`
///
/// # Errors
///
/// - [`Error::AuthorizationDenied`] if the user cancels on the consent page
/// - [`Error::StateMismatch`] if the redirect carries a foreign `state`
/// - [`Error::AuthorizationTimeout`] if nothing arrives in time
pub async fn acquire_authorization_code(settings: &Settings) -> Res<String> {
    let state = utils::generate_state();
    let shared_state = Arc::new(Mutex::new(AuthorizationState::new(state.clone())));

    let (_, server) = start_api_server(&settings.server_address, Arc::clone(&shared_state)).await?;

    let auth_url = authorize_url(settings, &state)?;
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    } else {
        info!("Waiting for Spotify to redirect back to {}", settings.redirect_uri);
    }

    let result = wait_for_code(
        shared_state,
        Duration::from_secs(settings.auth_timeout_secs),
    )
    .await;
    server.abort();

    result
}

/// Polls the shared authorization state until the callback handler filled
/// in a code, a denial or a foreign `state`.
pub async fn wait_for_code(
    shared_state: Arc<Mutex<AuthorizationState>>,
    max_wait: Duration,
) -> Res<String> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < max_wait {
        {
            let lock = shared_state.lock().await;
            if let Some(received) = &lock.mismatch {
                return Err(Error::StateMismatch {
                    expected: lock.state.clone(),
                    received: received.clone(),
                });
            }
            if let Some(error) = &lock.error {
                return Err(Error::AuthorizationDenied(error.clone()));
            }
            if let Some(code) = &lock.code {
                return Ok(code.clone());
            }
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    Err(Error::AuthorizationTimeout(max_wait))
}

/// Exchanges an authorization code for a token pair.
///
/// Sends one form-encoded POST to the token endpoint with the client
/// credentials in a `Basic` header.
pub async fn exchange_code_for_tokens(
    client: &Client,
    settings: &Settings,
    code: &str,
) -> Res<TokenSet> {
    let res = client
        .post(&settings.token_url)
        .header(
            AUTHORIZATION,
            utils::basic_auth_header(&settings.client_id, &settings.client_secret),
        )
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", settings.redirect_uri.as_str()),
        ])
        .send()
        .await?;

    let body = check_status(res).await?.json::<TokenResponse>().await?;

    Ok(TokenSet {
        access_token: body.access_token,
        refresh_token: body.refresh_token.unwrap_or_default(),
        expires_in: body.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}

/// Trades a refresh token for a fresh access token.
///
/// Spotify may or may not rotate the refresh token. When the response
/// carries none, the one passed in stays valid and is returned unchanged.
pub async fn refresh_tokens(
    client: &Client,
    settings: &Settings,
    refresh_token: &str,
) -> Res<TokenSet> {
    let res = client
        .post(&settings.token_url)
        .header(
            AUTHORIZATION,
            utils::basic_auth_header(&settings.client_id, &settings.client_secret),
        )
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await?;

    let body = check_status(res).await?.json::<TokenResponse>().await?;

    Ok(TokenSet {
        access_token: body.access_token,
        refresh_token: body
            .refresh_token
            .unwrap_or_else(|| refresh_token.to_string()),
        expires_in: body.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}
