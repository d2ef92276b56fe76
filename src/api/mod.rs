//! # API Module
//!
//! HTTP endpoints served by the local callback server during authorization.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives Spotify's redirect after the consent page and
//!   hands the authorization code (or the denial) to the waiting auth flow.
//! - [`health`] - Reports that the server is up and whether a code has
//!   arrived yet.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use randomify::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health))
//!     .layer(Extension(state));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
