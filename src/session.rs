use reqwest::Client;

use crate::{
    Error, Res,
    config::Settings,
    spotify::{auth, catalog::CatalogClient},
    types::TokenSet,
};

/// Token ownership for one launch.
///
/// Starts with placeholder tokens. Only a successful exchange or refresh
/// replaces them; a failed one leaves the previous set in place.
pub struct Session {
    settings: Settings,
    http: Client,
    tokens: TokenSet,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(http: Client, settings: Settings) -> Self {
        Self {
            settings,
            http,
            tokens: TokenSet::placeholder(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tokens(&self) -> &TokenSet {
        &self.tokens
    }

    pub fn is_authorized(&self) -> bool {
        !self.tokens.is_placeholder()
    }

    /// Full authorization: browser redirect followed by the code exchange.
    pub async fn authorize(&mut self) -> Res<&TokenSet> {
        let code = auth::acquire_authorization_code(&self.settings).await?;
        self.authorize_with_code(&code).await
    }

    /// Exchanges an already obtained code.
    pub async fn authorize_with_code(&mut self, code: &str) -> Res<&TokenSet> {
        let tokens = auth::exchange_code_for_tokens(&self.http, &self.settings, code).await?;
        self.tokens = tokens;
        Ok(&self.tokens)
    }

    /// Replaces the access token using the refresh token.
    pub async fn refresh(&mut self) -> Res<&TokenSet> {
        if !self.is_authorized() {
            return Err(Error::MissingToken);
        }

        let tokens =
            auth::refresh_tokens(&self.http, &self.settings, &self.tokens.refresh_token).await?;
        self.tokens = tokens;
        Ok(&self.tokens)
    }

    /// Hands the current access token to the catalog client.
    ///
    /// Returns `false` and leaves the client untouched while the session
    /// still holds placeholder tokens.
    pub fn configure(&self, catalog: &mut CatalogClient) -> bool {
        if !self.is_authorized() {
            return false;
        }

        catalog.set_access_token(self.tokens.access_token.clone());
        true
    }
}
