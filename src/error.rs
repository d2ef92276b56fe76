use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong between the browser redirect and a rendered
/// album.
#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Spotify answered {status}: {body}")]
    Api { status: u16, body: String },

    #[error("authorization was denied: {0}")]
    AuthorizationDenied(String),

    #[error("authorization state mismatch (expected {expected}, got {received})")]
    StateMismatch { expected: String, received: String },

    #[error("no authorization redirect received within {0:?}")]
    AuthorizationTimeout(Duration),

    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    #[error("search for {query:?} at offset {offset} returned no albums")]
    EmptySearch { query: String, offset: u32 },

    #[error("catalog client has no access token, authorize first")]
    MissingToken,

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
