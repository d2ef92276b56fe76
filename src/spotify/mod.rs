//! # Spotify Integration Module
//!
//! Everything that talks to Spotify over HTTP lives here.
//!
//! ```text
//! CLI / Session / Pipeline
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorization code, token exchange, refresh)
//!     └── Catalog (album search, album detail, artist detail)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Accounts service / Web API
//! ```
//!
//! ## Authentication
//!
//! [`auth`] implements the OAuth 2.0 authorization-code flow with a client
//! secret:
//! 1. **Authorization Request**: the user is sent to the Spotify consent page
//! 2. **Local Callback**: a temporary HTTP server receives the code
//! 3. **Token Exchange**: the code is traded for tokens using `Basic` client
//!    credentials
//!
//! Refreshing is available but never automatic.
//!
//! ## Catalog
//!
//! [`catalog`] wraps the three read endpoints used by the fetch pipeline:
//! - `GET /search?type=album` - one page of album search results
//! - `GET /albums/{id}` - full album record
//! - `GET /artists/{id}` - full artist record
//!
//! ## Error Handling
//!
//! Non-success responses become [`crate::Error::Api`] with the status and
//! raw body. There is no retry and no rate-limit handling; callers decide
//! what to do with a failure.

pub mod auth;
pub mod catalog;

use reqwest::Response;

use crate::{Error, Res};

/// Passes successful responses through and turns everything else into
/// [`Error::Api`].
pub(crate) async fn check_status(response: Response) -> Res<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::Api {
        status: status.as_u16(),
        body,
    })
}
