use async_trait::async_trait;
use reqwest::Client;

use crate::{
    Error, Res,
    config::Settings,
    spotify::check_status,
    types::{AlbumObject, AlbumSummary, ArtistObject, SearchAlbumsResponse},
};

/// Paging and market for an album search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit: u32,
    pub offset: u32,
    pub market: String,
}

/// The three catalog reads the pipeline depends on.
///
/// [`CatalogClient`] talks to Spotify; tests plug in canned
/// implementations.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn search_albums(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Res<Vec<AlbumSummary>>;

    async fn get_album(&self, id: &str) -> Res<AlbumObject>;

    async fn get_artist(&self, id: &str) -> Res<ArtistObject>;
}

/// Spotify Web API catalog client.
///
/// Carries the access token it sends with every request. Replacing the
/// token with [`CatalogClient::set_access_token`] affects every call made
/// afterwards.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    api_url: String,
    access_token: Option<String>,
}

impl CatalogClient {
    pub fn new(settings: &Settings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(http: Client, settings: &Settings) -> Self {
        Self {
            http,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            access_token: None,
        }
    }

    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.access_token = Some(token.into());
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    fn token(&self) -> Res<&str> {
        self.access_token.as_deref().ok_or(Error::MissingToken)
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn search_albums(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Res<Vec<AlbumSummary>> {
        let api_url = format!("{uri}/search", uri = self.api_url);
        let limit = options.limit.to_string();
        let offset = options.offset.to_string();

        let response = self
            .http
            .get(&api_url)
            .bearer_auth(self.token()?)
            .query(&[
                ("q", query),
                ("type", "album"),
                ("limit", limit.as_str()),
                ("offset", offset.as_str()),
                ("market", options.market.as_str()),
            ])
            .send()
            .await?;

        let res = check_status(response)
            .await?
            .json::<SearchAlbumsResponse>()
            .await?;

        Ok(res.albums.items)
    }

    async fn get_album(&self, id: &str) -> Res<AlbumObject> {
        let api_url = format!("{uri}/albums/{id}", uri = self.api_url, id = id);

        let response = self
            .http
            .get(&api_url)
            .bearer_auth(self.token()?)
            .send()
            .await?;

        Ok(check_status(response).await?.json::<AlbumObject>().await?)
    }

    async fn get_artist(&self, id: &str) -> Res<ArtistObject> {
        let api_url = format!("{uri}/artists/{id}", uri = self.api_url, id = id);

        let response = self
            .http
            .get(&api_url)
            .bearer_auth(self.token()?)
            .send()
            .await?;

        Ok(check_status(response).await?.json::<ArtistObject>().await?)
    }
}
