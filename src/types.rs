use serde::{Deserialize, Serialize};
use tabled::Tabled;

pub const PLACEHOLDER_ACCESS_TOKEN: &str = "no_access_token";
pub const PLACEHOLDER_REFRESH_TOKEN: &str = "no_refresh_token";

pub const PLACEHOLDER_ALBUM_ID: &str = "album_ID";
pub const PLACEHOLDER_ALBUM_NAME: &str = "album_name";
pub const PLACEHOLDER_ARTIST_NAME: &str = "artist_name";
pub const PLACEHOLDER_ARTIST_ID: &str = "artist_ID";
pub const PLACEHOLDER_IMAGE_URL: &str = "image_URL";
pub const PLACEHOLDER_ALBUM_URL: &str = "album_URL";
pub const PLACEHOLDER_THUMBNAIL_URL: &str = "thumbnail_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl TokenSet {
    pub fn placeholder() -> Self {
        Self {
            access_token: PLACEHOLDER_ACCESS_TOKEN.to_string(),
            refresh_token: PLACEHOLDER_REFRESH_TOKEN.to_string(),
            expires_in: 0,
            obtained_at: 0,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.access_token == PLACEHOLDER_ACCESS_TOKEN
    }

    /// Unix timestamp after which the access token is no longer accepted.
    pub fn expires_at(&self) -> u64 {
        self.obtained_at.saturating_add(self.expires_in)
    }
}

impl Default for TokenSet {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Token endpoint response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: u64,
}

/// One authorization attempt, shared between the auth flow and the
/// callback handler.
#[derive(Debug, Clone)]
pub struct AuthorizationState {
    pub state: String,
    pub code: Option<String>,
    pub error: Option<String>,
    /// `state` value of a redirect that did not belong to this attempt.
    pub mismatch: Option<String>,
}

impl AuthorizationState {
    pub fn new(state: String) -> Self {
        Self {
            state,
            code: None,
            error: None,
            mismatch: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub artist_id: String,
    pub image_url: String,
    pub external_url: String,
}

impl Album {
    pub fn placeholder() -> Self {
        Self {
            id: PLACEHOLDER_ALBUM_ID.to_string(),
            name: PLACEHOLDER_ALBUM_NAME.to_string(),
            artist: PLACEHOLDER_ARTIST_NAME.to_string(),
            artist_id: PLACEHOLDER_ARTIST_ID.to_string(),
            image_url: PLACEHOLDER_IMAGE_URL.to_string(),
            external_url: PLACEHOLDER_ALBUM_URL.to_string(),
        }
    }

    /// True once the album carries an artist id the artist fetch can use.
    pub fn has_artist_id(&self) -> bool {
        !self.artist_id.is_empty() && self.artist_id != PLACEHOLDER_ARTIST_ID
    }
}

impl Default for Album {
    fn default() -> Self {
        Self::placeholder()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub thumbnail_url: String,
}

impl Artist {
    pub fn placeholder() -> Self {
        Self {
            thumbnail_url: PLACEHOLDER_THUMBNAIL_URL.to_string(),
        }
    }
}

impl Default for Artist {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// What the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumView {
    pub album: Album,
    pub artist: Artist,
}

impl AlbumView {
    pub fn is_loading(&self) -> bool {
        self.album.id == PLACEHOLDER_ALBUM_ID
    }
}

#[derive(Tabled)]
pub struct AlbumTableRow {
    pub album: String,
    pub artist: String,
    pub cover: String,
    pub thumbnail: String,
    pub link: String,
}

#[derive(Tabled)]
pub struct TokenTableRow {
    pub access_token: String,
    pub expires_in: u64,
    pub expires_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedArtist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchAlbumsResponse {
    pub albums: AlbumsPage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumsPage {
    pub items: Vec<AlbumSummary>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumObject {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub href: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}
