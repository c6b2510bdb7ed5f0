//! reqwest-backed [`MetadataGateway`] for the Imgur v3 API.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::model::{ApiAlbum, ApiImage, Envelope, GalleryEntry, TagPayload, TokenResponse};
use super::{GatewayError, ListingPage, ListingQuery, MetadataGateway};
use crate::http_client::{API_READ_TIMEOUT_SECS, CONNECT_TIMEOUT_SECS, build_http_client};
use crate::media::{Collection, MediaSource};

/// Production API root.
pub const DEFAULT_API_BASE: &str = "https://api.imgur.com/3";

/// Production OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://api.imgur.com/oauth2/token";

/// HTTP client for the Imgur API.
///
/// Public endpoints are called with `Client-ID <id>` authorization. Account
/// endpoints use `Bearer <access token>` when a token is configured and fall
/// back to the client id otherwise.
#[derive(Debug, Clone)]
pub struct ImgurClient {
    client: reqwest::Client,
    base_url: String,
    token_url: String,
    client_id: String,
    access_token: Option<String>,
}

impl ImgurClient {
    /// Creates a client for the production API.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ClientBuild`] if the HTTP client cannot be
    /// initialised.
    pub fn new(client_id: impl Into<String>) -> Result<Self, GatewayError> {
        let client = build_http_client(CONNECT_TIMEOUT_SECS, API_READ_TIMEOUT_SECS)
            .map_err(GatewayError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: DEFAULT_API_BASE.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            client_id: client_id.into(),
            access_token: None,
        })
    }

    /// Points the client at a different API root (used by tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Points token refresh at a different endpoint (used by tests).
    #[must_use]
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Sets the OAuth access token used for account endpoints.
    ///
    /// An empty token is ignored.
    #[must_use]
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        let token = access_token.into();
        self.access_token = (!token.is_empty()).then_some(token);
        self
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotSuccessful`] on a non-2xx answer,
    /// [`GatewayError::Transport`] when the request fails, and
    /// [`GatewayError::Decode`] when the body is not a token response.
    #[instrument(skip(self, refresh_token, client_secret))]
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
        client_secret: &str,
    ) -> Result<TokenResponse, GatewayError> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("refresh_token", refresh_token)
            .append_pair("client_id", &self.client_id)
            .append_pair("client_secret", client_secret)
            .append_pair("grant_type", "refresh_token")
            .finish();

        let mut request = self
            .client
            .post(&self.token_url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body);
        if let Some(token) = &self.access_token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::transport(&self.token_url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::not_successful(
                "/oauth2/token",
                Some(status.as_u16()),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::transport(&self.token_url, e))?;
        let token: TokenResponse = serde_json::from_slice(&bytes)
            .map_err(|e| GatewayError::decode(&self.token_url, e.to_string()))?;
        info!(rotated = token.refresh_token.is_some(), "Access token refreshed");
        Ok(token)
    }

    fn public_authorization(&self) -> String {
        format!("Client-ID {}", self.client_id)
    }

    fn account_authorization(&self) -> String {
        match &self.access_token {
            Some(token) => format!("Bearer {token}"),
            None => self.public_authorization(),
        }
    }

    fn endpoint_url(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| GatewayError::invalid_url(&self.base_url, e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| GatewayError::invalid_url(&self.base_url, "cannot be a base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issues a GET and decodes the envelope's `data` member.
    async fn get_data<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        authorization: String,
    ) -> Result<T, GatewayError> {
        let url = self.endpoint_url(segments)?;
        let endpoint = format!("/{}", segments.join("/"));
        debug!(%endpoint, "Requesting API endpoint");

        let response = self
            .client
            .get(url.clone())
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| GatewayError::transport(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%endpoint, status = status.as_u16(), "API returned error status");
            return Err(GatewayError::not_successful(endpoint, Some(status.as_u16())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::transport(url.as_str(), e))?;
        let envelope: Envelope = serde_json::from_slice(&bytes)
            .map_err(|e| GatewayError::decode(url.as_str(), e.to_string()))?;
        if !envelope.success {
            debug!(%endpoint, status = ?envelope.status, "API reported success: false");
            return Err(GatewayError::not_successful(endpoint, envelope.status));
        }

        serde_json::from_value(envelope.data)
            .map_err(|e| GatewayError::decode(url.as_str(), e.to_string()))
    }

    async fn entry_page(
        &self,
        segments: &[&str],
        authorization: String,
    ) -> Result<ListingPage<MediaSource>, GatewayError> {
        let entries: Vec<GalleryEntry> = self.get_data(segments, authorization).await?;
        self.expand_entries(entries).await
    }

    /// Sources of a gallery entry. Albums listed without their images are
    /// fetched through the album endpoint.
    async fn entry_sources(&self, entry: GalleryEntry) -> Result<Vec<MediaSource>, GatewayError> {
        if !entry.needs_album_fetch() {
            return Ok(entry.into_sources());
        }
        debug!(id = %entry.id, "Fetching album listed without images");
        let album = self.album(&entry.id).await?;
        Ok(album.items().iter().map(|item| item.source().clone()).collect())
    }

    /// Expands listing entries in order. An album that the remote refuses is
    /// logged and left out; any other failure aborts the page.
    async fn expand_entries(
        &self,
        entries: Vec<GalleryEntry>,
    ) -> Result<ListingPage<MediaSource>, GatewayError> {
        let count = entries.len();
        let mut sources = Vec::with_capacity(count);
        for entry in entries {
            let id = entry.id.clone();
            match self.entry_sources(entry).await {
                Ok(expanded) => sources.extend(expanded),
                Err(err) if err.is_not_successful() => {
                    warn!(id = %id, error = %err, "Skipping listed album that could not be fetched");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(ListingPage::new(count, sources))
    }
}

#[async_trait]
impl MetadataGateway for ImgurClient {
    #[instrument(skip(self))]
    async fn album(&self, id: &str) -> Result<Collection, GatewayError> {
        let album: ApiAlbum = self
            .get_data(&["album", id], self.public_authorization())
            .await?;
        debug!(images = album.images.len(), "Fetched album");
        Ok(Collection::new(
            album.id,
            album.title,
            album.images.into_iter().map(ApiImage::into_source),
        ))
    }

    #[instrument(skip(self))]
    async fn gallery(&self, id: &str) -> Result<Collection, GatewayError> {
        let entry: GalleryEntry = self
            .get_data(&["gallery", id], self.public_authorization())
            .await?;
        let entry_id = entry.id.clone();
        let title = entry.title.clone();
        let sources = self.entry_sources(entry).await?;
        Ok(Collection::new(entry_id, title, sources))
    }

    #[instrument(skip(self))]
    async fn subreddit_gallery(
        &self,
        subreddit: &str,
        query: &ListingQuery,
    ) -> Result<Collection, GatewayError> {
        let page = query.page.to_string();
        let listing = self
            .entry_page(
                &["gallery", "r", subreddit, query.sort.as_str(), query.window.as_str(), page.as_str()],
                self.public_authorization(),
            )
            .await?;
        Ok(Collection::new(
            subreddit,
            Some(subreddit.to_string()),
            listing.items,
        ))
    }

    #[instrument(skip(self))]
    async fn subreddit_image(
        &self,
        subreddit: &str,
        image_id: &str,
    ) -> Result<Collection, GatewayError> {
        let entry: GalleryEntry = self
            .get_data(
                &["gallery", "r", subreddit, image_id],
                self.public_authorization(),
            )
            .await?;
        let entry_id = entry.id.clone();
        let title = entry.title.clone();
        let sources = self.entry_sources(entry).await?;
        Ok(Collection::new(entry_id, title, sources))
    }

    #[instrument(skip(self))]
    async fn tag_page(
        &self,
        tag: &str,
        query: &ListingQuery,
    ) -> Result<ListingPage<MediaSource>, GatewayError> {
        let page = query.page.to_string();
        let payload: TagPayload = self
            .get_data(
                &["gallery", "t", tag, query.sort.as_str(), query.window.as_str(), page.as_str()],
                self.public_authorization(),
            )
            .await?;
        self.expand_entries(payload.into_entries()).await
    }

    #[instrument(skip(self))]
    async fn account_favorites_page(
        &self,
        username: &str,
        sort: &str,
        page: u32,
    ) -> Result<ListingPage<MediaSource>, GatewayError> {
        let page = page.to_string();
        self.entry_page(
            &["account", username, "favorites", page.as_str(), sort],
            self.account_authorization(),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn gallery_favorites_page(
        &self,
        username: &str,
        sort: &str,
        page: u32,
    ) -> Result<ListingPage<MediaSource>, GatewayError> {
        let page = page.to_string();
        self.entry_page(
            &["account", username, "gallery_favorites", page.as_str(), sort],
            self.account_authorization(),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn account_images_page(
        &self,
        username: &str,
        page: u32,
    ) -> Result<ListingPage<MediaSource>, GatewayError> {
        let page = page.to_string();
        let images: Vec<ApiImage> = self
            .get_data(
                &["account", username, "images", page.as_str()],
                self.account_authorization(),
            )
            .await?;
        Ok(ListingPage::from(
            images
                .into_iter()
                .map(ApiImage::into_source)
                .collect::<Vec<_>>(),
        ))
    }

    #[instrument(skip(self))]
    async fn account_submissions_page(
        &self,
        username: &str,
        page: u32,
    ) -> Result<ListingPage<MediaSource>, GatewayError> {
        let page = page.to_string();
        self.entry_page(
            &["account", username, "submissions", page.as_str()],
            self.public_authorization(),
        )
        .await
    }
}
