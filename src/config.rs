//! Configuration management for randomify.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Everything except the client secret has
//! a default, so a fresh install only needs `RANDOMIFY_CLIENT_SECRET`.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf};

use crate::{Error, Res};

pub const DEFAULT_CLIENT_ID: &str = "8a352836ac464579ab2e790ee597a703";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_SCOPE: &str = "user-modify-playback-state";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_MARKET: &str = "US";
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 120;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates `randomify/` under the platform data directory if needed and
/// loads `randomify/.env` from it:
/// - Linux: `~/.local/share/randomify/.env`
/// - macOS: `~/Library/Application Support/randomify/.env`
/// - Windows: `%LOCALAPPDATA%/randomify/.env`
///
/// A missing `.env` file is fine, the process environment and the defaults
/// still apply. A file that exists but cannot be parsed is an error.
///
/// # Example
///
/// ```
/// use randomify::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Res<()> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map(|_| ())
        .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("randomify/.env");
    path
}

/// Runtime settings for one launch.
///
/// Built once from the environment and passed by reference to the pieces
/// that need it.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    /// Address the local callback server binds to.
    pub server_address: String,
    pub market: String,
    /// How long to wait for the browser redirect, in seconds.
    pub auth_timeout_secs: u64,
}

impl Settings {
    /// Reads settings from `RANDOMIFY_*` environment variables.
    ///
    /// # Errors
    ///
    /// Fails if `RANDOMIFY_CLIENT_SECRET` is missing or if
    /// `RANDOMIFY_AUTH_TIMEOUT` is not a number.
    pub fn from_env() -> Res<Self> {
        let client_secret = env::var("RANDOMIFY_CLIENT_SECRET")
            .map_err(|_| Error::Config("RANDOMIFY_CLIENT_SECRET must be set".to_string()))?;

        let auth_timeout_secs = match env::var("RANDOMIFY_AUTH_TIMEOUT") {
            Ok(raw) => raw.parse().map_err(|_| {
                Error::Config(format!("RANDOMIFY_AUTH_TIMEOUT is not a number: {}", raw))
            })?,
            Err(_) => DEFAULT_AUTH_TIMEOUT_SECS,
        };

        Ok(Self {
            client_id: var_or("RANDOMIFY_CLIENT_ID", DEFAULT_CLIENT_ID),
            client_secret,
            redirect_uri: var_or("RANDOMIFY_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            scope: var_or("RANDOMIFY_SCOPE", DEFAULT_SCOPE),
            auth_url: var_or("RANDOMIFY_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: var_or("RANDOMIFY_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: var_or("RANDOMIFY_API_URL", DEFAULT_API_URL),
            server_address: var_or("RANDOMIFY_SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            market: var_or("RANDOMIFY_MARKET", DEFAULT_MARKET),
            auth_timeout_secs,
        })
    }

    /// Settings with every default filled in and the given secret.
    ///
    /// Handy for tests that point the URLs at a local stub server.
    pub fn with_secret(client_secret: impl Into<String>) -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_secret: client_secret.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            market: DEFAULT_MARKET.to_string(),
            auth_timeout_secs: DEFAULT_AUTH_TIMEOUT_SECS,
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
