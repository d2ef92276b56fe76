use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use rand::{Rng, distr::Alphanumeric};

use crate::types::{AlbumTableRow, AlbumView, TokenSet, TokenTableRow};

/// Upper bound (exclusive) of the random search offset.
pub const MAX_SEARCH_OFFSET: u32 = 10_000;

/// Query character and offset for one random album search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomQuery {
    pub query: char,
    pub offset: u32,
}

pub fn random_query<R: Rng>(rng: &mut R) -> RandomQuery {
    let query = char::from(rng.sample(Alphanumeric));
    let offset = rng.random_range(0..MAX_SEARCH_OFFSET);
    RandomQuery { query, offset }
}

/// Opaque value echoed back by the authorization redirect.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// `Basic` authorization header value for the token endpoint.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", client_id, client_secret))
    )
}

pub fn format_timestamp(timestamp: u64) -> String {
    match i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "-".to_string(),
    }
}

pub fn album_table_row(view: &AlbumView) -> AlbumTableRow {
    AlbumTableRow {
        album: view.album.name.clone(),
        artist: view.album.artist.clone(),
        cover: view.album.image_url.clone(),
        thumbnail: view.artist.thumbnail_url.clone(),
        link: view.album.external_url.clone(),
    }
}

pub fn token_table_row(tokens: &TokenSet) -> TokenTableRow {
    let access_token = if tokens.access_token.chars().count() > 12 {
        format!("{}...", tokens.access_token.chars().take(12).collect::<String>())
    } else {
        tokens.access_token.clone()
    };

    TokenTableRow {
        access_token,
        expires_in: tokens.expires_in,
        expires_at: format_timestamp(tokens.expires_at()),
    }
}
