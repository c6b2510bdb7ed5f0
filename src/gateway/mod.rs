//! Metadata access for albums, galleries, listings and account collections.
//!
//! The [`MetadataGateway`] trait is the seam between the orchestrator and the
//! remote API. Implementations provide page-level primitives; accumulation
//! across pages is shared through provided methods built on
//! [`accumulate_pages`].
//!
//! # Example
//!
//! ```no_run
//! use imgur_folder_core::gateway::{ImgurClient, ListingQuery, MetadataGateway};
//!
//! # async fn example() -> Result<(), imgur_folder_core::gateway::GatewayError> {
//! let client = ImgurClient::new("my-client-id")?;
//! let cats = client.tag("cats", &ListingQuery::tag_default(), 30).await?;
//! println!("{} items", cats.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod model;

pub use client::{DEFAULT_API_BASE, DEFAULT_TOKEN_URL, ImgurClient};
pub use error::GatewayError;
pub use model::{ApiAlbum, ApiImage, GalleryEntry, TokenResponse};

use std::future::Future;

use async_trait::async_trait;
use tracing::debug;

use crate::media::{Collection, MediaSource};

/// Default item cap for tag listings.
pub const DEFAULT_TAG_MAX_ITEMS: usize = 30;

/// Default item cap for account favorites.
pub const DEFAULT_FAVORITES_MAX_ITEMS: usize = 80;

/// Default sort order for account favorites.
pub const DEFAULT_FAVORITES_SORT: &str = "newest";

/// Sort, time window and starting page for a gallery listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    /// Sort order (`time`, `top`, `viral`, ...).
    pub sort: String,
    /// Time window for `top` sorts (`day`, `week`, `month`, `year`, `all`).
    pub window: String,
    /// Zero-based page number.
    pub page: u32,
}

impl ListingQuery {
    /// Creates a query.
    #[must_use]
    pub fn new(sort: impl Into<String>, window: impl Into<String>, page: u32) -> Self {
        Self {
            sort: sort.into(),
            window: window.into(),
            page,
        }
    }

    /// Tag listing defaults: `top` over the last `week`, page 0.
    #[must_use]
    pub fn tag_default() -> Self {
        Self::new("top", "week", 0)
    }

    /// Subreddit listing defaults: `time` over the last `day`, page 0.
    #[must_use]
    pub fn subreddit_default() -> Self {
        Self::new("time", "day", 0)
    }

    /// Same sort and window, different page.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

/// One fetched page of a listing.
///
/// `entries` counts what the remote returned before albums were expanded or
/// unusable entries dropped. Only a page with no entries ends a listing, so a
/// page whose entries yield no items still moves on to the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage<T> {
    /// Raw entries on the page.
    pub entries: usize,
    /// Items the entries expanded into.
    pub items: Vec<T>,
}

impl<T> ListingPage<T> {
    /// Creates a page from its raw entry count and expanded items.
    #[must_use]
    pub fn new(entries: usize, items: Vec<T>) -> Self {
        Self { entries, items }
    }

    /// True when the remote returned nothing on this page.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.entries == 0
    }
}

impl<T> From<Vec<T>> for ListingPage<T> {
    /// A page where every entry became exactly one item.
    fn from(items: Vec<T>) -> Self {
        Self::new(items.len(), items)
    }
}

/// Read access to remote metadata.
///
/// Every method distinguishes [`GatewayError::NotSuccessful`] (the remote
/// answered and refused) from [`GatewayError::Transport`] (no answer).
#[async_trait]
pub trait MetadataGateway: Send + Sync {
    /// Album by id, items in album order.
    async fn album(&self, id: &str) -> Result<Collection, GatewayError>;

    /// Gallery post by id. An album post yields its images, an image post
    /// yields a collection of one.
    async fn gallery(&self, id: &str) -> Result<Collection, GatewayError>;

    /// One page of a subreddit gallery.
    async fn subreddit_gallery(
        &self,
        subreddit: &str,
        query: &ListingQuery,
    ) -> Result<Collection, GatewayError>;

    /// A single image posted to a subreddit.
    async fn subreddit_image(
        &self,
        subreddit: &str,
        image_id: &str,
    ) -> Result<Collection, GatewayError>;

    /// One page of a tag listing.
    async fn tag_page(
        &self,
        tag: &str,
        query: &ListingQuery,
    ) -> Result<ListingPage<MediaSource>, GatewayError>;

    /// One page of an account's favorites.
    async fn account_favorites_page(
        &self,
        username: &str,
        sort: &str,
        page: u32,
    ) -> Result<ListingPage<MediaSource>, GatewayError>;

    /// One page of an account's gallery favorites.
    async fn gallery_favorites_page(
        &self,
        username: &str,
        sort: &str,
        page: u32,
    ) -> Result<ListingPage<MediaSource>, GatewayError>;

    /// One page of the images uploaded by an account.
    async fn account_images_page(
        &self,
        username: &str,
        page: u32,
    ) -> Result<ListingPage<MediaSource>, GatewayError>;

    /// One page of an account's gallery submissions.
    async fn account_submissions_page(
        &self,
        username: &str,
        page: u32,
    ) -> Result<ListingPage<MediaSource>, GatewayError>;

    /// Tag listing accumulated up to `max_items`, starting at `query.page`.
    async fn tag(
        &self,
        tag: &str,
        query: &ListingQuery,
        max_items: usize,
    ) -> Result<Collection, GatewayError> {
        let sources = accumulate_pages(query.page, max_items, |page| {
            let page_query = query.with_page(page);
            async move { self.tag_page(tag, &page_query).await }
        })
        .await?;
        Ok(Collection::new(tag, Some(tag.to_string()), sources))
    }

    /// Account favorites accumulated up to `max_items`.
    async fn account_favorites(
        &self,
        username: &str,
        sort: &str,
        start_page: u32,
        max_items: usize,
    ) -> Result<Vec<MediaSource>, GatewayError> {
        accumulate_pages(start_page, max_items, |page| {
            self.account_favorites_page(username, sort, page)
        })
        .await
    }

    /// Gallery favorites accumulated up to `max_items`.
    async fn gallery_favorites(
        &self,
        username: &str,
        sort: &str,
        start_page: u32,
        max_items: usize,
    ) -> Result<Vec<MediaSource>, GatewayError> {
        accumulate_pages(start_page, max_items, |page| {
            self.gallery_favorites_page(username, sort, page)
        })
        .await
    }

    /// Account uploads accumulated up to `max_items`.
    async fn account_images(
        &self,
        username: &str,
        start_page: u32,
        max_items: usize,
    ) -> Result<Vec<MediaSource>, GatewayError> {
        accumulate_pages(start_page, max_items, |page| {
            self.account_images_page(username, page)
        })
        .await
    }

    /// Account submissions accumulated up to `max_items`.
    async fn account_submissions(
        &self,
        username: &str,
        start_page: u32,
        max_items: usize,
    ) -> Result<Vec<MediaSource>, GatewayError> {
        accumulate_pages(start_page, max_items, |page| {
            self.account_submissions_page(username, page)
        })
        .await
    }
}

/// Fetches pages starting at `start_page` until `max_items` are collected.
///
/// Stops early on a page with no entries or on
/// [`GatewayError::NotSuccessful`], which both mark the end of the listing. A
/// page whose entries expanded into no items does not end it. The page number
/// advances after every fetch, and the result never holds more than
/// `max_items` items. Any other error is returned as is.
///
/// # Errors
///
/// Propagates every [`GatewayError`] except `NotSuccessful`.
pub async fn accumulate_pages<T, F, Fut>(
    start_page: u32,
    max_items: usize,
    mut fetch_page: F,
) -> Result<Vec<T>, GatewayError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<ListingPage<T>, GatewayError>>,
{
    let mut collected = Vec::new();
    let mut page = start_page;

    while collected.len() < max_items {
        let batch = match fetch_page(page).await {
            Ok(batch) => batch,
            Err(err) if err.is_not_successful() => {
                debug!(page, error = %err, "Listing ended with unsuccessful page");
                break;
            }
            Err(err) => return Err(err),
        };

        if batch.is_exhausted() {
            debug!(page, "Listing ended with empty page");
            break;
        }
        if batch.items.is_empty() {
            debug!(page, entries = batch.entries, "Page yielded no items");
        }

        let remaining = max_items - collected.len();
        collected.extend(batch.items.into_iter().take(remaining));
        page = page.saturating_add(1);
    }

    debug!(
        items = collected.len(),
        max_items, "Accumulated listing pages"
    );
    Ok(collected)
}
