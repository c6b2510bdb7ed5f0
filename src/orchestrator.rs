//! Download orchestration: URL in, files on disk out.
//!
//! [`Archiver`] resolves a URL, fetches the matching metadata through a
//! [`MetadataGateway`], derives a [`DownloadTarget`] per item and hands each
//! one to a [`FileDownloader`], strictly one after another.
//!
//! Failure scope follows the size of the unit: a URL that does not resolve
//! aborts before any request, a metadata failure aborts that collection, and
//! a failed item is logged and counted while the loop moves on.

use tracing::{debug, info, instrument, warn};

use thiserror::Error;

use crate::config::DownloadSettings;
use crate::download::{DownloadOutcome, FileDownloader};
use crate::gateway::{
    DEFAULT_FAVORITES_MAX_ITEMS, DEFAULT_FAVORITES_SORT, DEFAULT_TAG_MAX_ITEMS, GatewayError,
    ListingQuery, MetadataGateway,
};
use crate::media::{Collection, MediaItem, MediaSource};
use crate::naming::{DownloadTarget, collection_folder, filename_id, positional_filename, sanitize};
use crate::resolver::{ResolveError, ResourceKind, ResourceReference, resolve};

/// Errors that abort a whole URL or collection.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The URL did not match any known shape.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Metadata for the collection could not be fetched.
    #[error("could not fetch {reference}: {source}")]
    Gateway {
        /// What was being fetched, e.g. `album:Xy7Kq`.
        reference: String,
        /// The gateway failure.
        #[source]
        source: GatewayError,
    },
}

impl ArchiveError {
    /// Creates a gateway error for `reference`.
    pub fn gateway(reference: impl Into<String>, source: GatewayError) -> Self {
        Self::Gateway {
            reference: reference.into(),
            source,
        }
    }
}

/// Caller overrides for listing parameters and overwrite behaviour.
///
/// `None` keeps the per-kind default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Cap for paginated listings.
    pub max_items: Option<usize>,
    /// Listing sort order.
    pub sort: Option<String>,
    /// Listing time window.
    pub window: Option<String>,
    /// Starting page.
    pub page: Option<u32>,
    /// Overrides the configured overwrite setting.
    pub overwrite: Option<bool>,
}

impl ArchiveOptions {
    fn listing_query(&self, defaults: ListingQuery) -> ListingQuery {
        ListingQuery {
            sort: self.sort.clone().unwrap_or(defaults.sort),
            window: self.window.clone().unwrap_or(defaults.window),
            page: self.page.unwrap_or(defaults.page),
        }
    }
}

/// Per-item tally of one or more archive runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Files written.
    pub downloaded: usize,
    /// Files left in place because they already existed.
    pub skipped: usize,
    /// Items that failed (error status, transport or filesystem error).
    pub failed: usize,
    /// Bytes written across all downloaded files.
    pub bytes: u64,
}

impl DownloadReport {
    /// Items processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }

    /// Adds another report's counts to this one.
    pub fn merge(&mut self, other: &Self) {
        self.downloaded += other.downloaded;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.bytes += other.bytes;
    }

    fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded { bytes, .. } => {
                self.downloaded += 1;
                self.bytes += bytes;
            }
            DownloadOutcome::Skipped { .. } => self.skipped += 1,
            DownloadOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Drives resolve, fetch, name and download for one URL at a time.
pub struct Archiver<'a> {
    gateway: &'a dyn MetadataGateway,
    downloader: &'a dyn FileDownloader,
    settings: &'a dyn DownloadSettings,
    options: ArchiveOptions,
}

impl<'a> Archiver<'a> {
    /// Creates an archiver with default options.
    #[must_use]
    pub fn new(
        gateway: &'a dyn MetadataGateway,
        downloader: &'a dyn FileDownloader,
        settings: &'a dyn DownloadSettings,
    ) -> Self {
        Self {
            gateway,
            downloader,
            settings,
            options: ArchiveOptions::default(),
        }
    }

    /// Replaces the listing and overwrite options.
    #[must_use]
    pub fn with_options(mut self, options: ArchiveOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolves `url` and downloads whatever it points at.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Resolve`] before any network access when the
    /// URL is not recognised, and [`ArchiveError::Gateway`] when metadata
    /// cannot be fetched. Per-item failures are counted in the report.
    #[instrument(skip(self))]
    pub async fn download_url(&self, url: &str) -> Result<DownloadReport, ArchiveError> {
        let reference = resolve(url)?;
        self.download_reference(&reference).await
    }

    /// Downloads an already resolved reference.
    ///
    /// # Errors
    ///
    /// See [`download_url`](Self::download_url).
    pub async fn download_reference(
        &self,
        reference: &ResourceReference,
    ) -> Result<DownloadReport, ArchiveError> {
        debug!(%reference, "Dispatching reference");
        match reference.kind() {
            ResourceKind::Album => self.download_album(reference.identifier()).await,
            ResourceKind::Gallery => self.download_gallery(reference.identifier()).await,
            ResourceKind::Subreddit => self.download_subreddit(reference.identifier()).await,
            ResourceKind::SubredditImage => match reference.subreddit_parts() {
                Some((subreddit, image_id)) => {
                    self.download_subreddit_image(subreddit, image_id).await
                }
                None => Err(ResolveError::unrecognized(reference.identifier()).into()),
            },
            ResourceKind::Tag => self.download_tag(reference.identifier()).await,
        }
    }

    /// Downloads every image of an album into a folder named after it.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Gateway`] when the album cannot be fetched.
    #[instrument(skip(self))]
    pub async fn download_album(&self, id: &str) -> Result<DownloadReport, ArchiveError> {
        let album = self
            .gateway
            .album(id)
            .await
            .map_err(|e| ArchiveError::gateway(format!("album:{id}"), e))?;
        Ok(self.download_positional(&album, id).await)
    }

    /// Downloads a gallery post (album or single image) into a folder named
    /// after it.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Gateway`] when the post cannot be fetched.
    #[instrument(skip(self))]
    pub async fn download_gallery(&self, id: &str) -> Result<DownloadReport, ArchiveError> {
        let gallery = self
            .gateway
            .gallery(id)
            .await
            .map_err(|e| ArchiveError::gateway(format!("gallery:{id}"), e))?;
        Ok(self.download_positional(&gallery, id).await)
    }

    /// Downloads one page of a subreddit gallery.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Gateway`] when the listing cannot be fetched.
    #[instrument(skip(self))]
    pub async fn download_subreddit(&self, subreddit: &str) -> Result<DownloadReport, ArchiveError> {
        let query = self.options.listing_query(ListingQuery::subreddit_default());
        let listing = self
            .gateway
            .subreddit_gallery(subreddit, &query)
            .await
            .map_err(|e| ArchiveError::gateway(format!("subreddit:{subreddit}"), e))?;

        let limit = self.options.max_items.unwrap_or(usize::MAX);
        let folder = collection_folder(self.settings.download_path(), subreddit, subreddit);
        Ok(self
            .download_listing(&folder, listing.id(), listing.items().iter().take(limit))
            .await)
    }

    /// Downloads a single subreddit image into the subreddit's folder.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Gateway`] when the image cannot be fetched.
    #[instrument(skip(self))]
    pub async fn download_subreddit_image(
        &self,
        subreddit: &str,
        image_id: &str,
    ) -> Result<DownloadReport, ArchiveError> {
        let image = self
            .gateway
            .subreddit_image(subreddit, image_id)
            .await
            .map_err(|e| {
                ArchiveError::gateway(format!("subreddit-image:{subreddit}/{image_id}"), e)
            })?;

        let folder = collection_folder(self.settings.download_path(), subreddit, subreddit);
        Ok(self
            .download_listing(&folder, image.id(), image.items().iter())
            .await)
    }

    /// Downloads a tag listing, accumulated across pages up to the cap.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Gateway`] on a transport or decode failure.
    #[instrument(skip(self))]
    pub async fn download_tag(&self, tag: &str) -> Result<DownloadReport, ArchiveError> {
        let query = self.options.listing_query(ListingQuery::tag_default());
        let max_items = self.options.max_items.unwrap_or(DEFAULT_TAG_MAX_ITEMS);
        let listing = self
            .gateway
            .tag(tag, &query, max_items)
            .await
            .map_err(|e| ArchiveError::gateway(format!("tag:{tag}"), e))?;

        let folder = collection_folder(self.settings.download_path(), listing.title(), tag);
        Ok(self
            .download_listing(&folder, listing.id(), listing.items().iter())
            .await)
    }

    /// Downloads an account's favorites into `<username>_favorites`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Gateway`] on a transport or decode failure.
    #[instrument(skip(self))]
    pub async fn download_favorites(&self, username: &str) -> Result<DownloadReport, ArchiveError> {
        let sort = self.favorites_sort();
        let sources = self
            .gateway
            .account_favorites(username, sort, self.start_page(), self.account_cap())
            .await
            .map_err(|e| ArchiveError::gateway(format!("favorites:{username}"), e))?;
        Ok(self.download_account_listing(username, "favorites", sources).await)
    }

    /// Downloads an account's gallery favorites into
    /// `<username>_gallery_favorites`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Gateway`] on a transport or decode failure.
    #[instrument(skip(self))]
    pub async fn download_gallery_favorites(
        &self,
        username: &str,
    ) -> Result<DownloadReport, ArchiveError> {
        let sort = self.favorites_sort();
        let sources = self
            .gateway
            .gallery_favorites(username, sort, self.start_page(), self.account_cap())
            .await
            .map_err(|e| ArchiveError::gateway(format!("gallery-favorites:{username}"), e))?;
        Ok(self
            .download_account_listing(username, "gallery_favorites", sources)
            .await)
    }

    /// Downloads the images an account uploaded into `<username>_images`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Gateway`] on a transport or decode failure.
    #[instrument(skip(self))]
    pub async fn download_account_images(
        &self,
        username: &str,
    ) -> Result<DownloadReport, ArchiveError> {
        let sources = self
            .gateway
            .account_images(username, self.start_page(), self.account_cap())
            .await
            .map_err(|e| ArchiveError::gateway(format!("account-images:{username}"), e))?;
        Ok(self.download_account_listing(username, "images", sources).await)
    }

    /// Downloads an account's gallery submissions into
    /// `<username>_submissions`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Gateway`] on a transport or decode failure.
    #[instrument(skip(self))]
    pub async fn download_submissions(
        &self,
        username: &str,
    ) -> Result<DownloadReport, ArchiveError> {
        let sources = self
            .gateway
            .account_submissions(username, self.start_page(), self.account_cap())
            .await
            .map_err(|e| ArchiveError::gateway(format!("submissions:{username}"), e))?;
        Ok(self
            .download_account_listing(username, "submissions", sources)
            .await)
    }

    fn overwrite(&self) -> bool {
        self.options
            .overwrite
            .unwrap_or_else(|| self.settings.overwrite())
    }

    fn favorites_sort(&self) -> &str {
        self.options.sort.as_deref().unwrap_or(DEFAULT_FAVORITES_SORT)
    }

    fn start_page(&self) -> u32 {
        self.options.page.unwrap_or(0)
    }

    fn account_cap(&self) -> usize {
        self.options.max_items.unwrap_or(DEFAULT_FAVORITES_MAX_ITEMS)
    }

    /// Album naming: `"<collection id> - <position><ext>"` in a folder named
    /// after the title. The requested id stands in when the reported one
    /// sanitizes to nothing.
    async fn download_positional(
        &self,
        collection: &Collection,
        requested_id: &str,
    ) -> DownloadReport {
        let folder = collection_folder(
            self.settings.download_path(),
            collection.title(),
            collection.id(),
        );
        info!(
            collection = collection.id(),
            folder = %folder.display(),
            items = collection.len(),
            "Downloading album"
        );

        let stem = filename_id(collection.id(), requested_id);
        let mut report = DownloadReport::default();
        for item in collection.items() {
            let filename = positional_filename(&stem, item.position(), &item.extension());
            self.download_item(DownloadTarget::new(&folder, filename), item, &mut report)
                .await;
        }
        report
    }

    /// Listing naming: `"<item id><ext>"`, positional when the id is unknown.
    async fn download_listing<'i>(
        &self,
        folder: &std::path::Path,
        collection_id: &str,
        items: impl Iterator<Item = &'i MediaItem>,
    ) -> DownloadReport {
        info!(collection = collection_id, folder = %folder.display(), "Downloading listing");

        let mut report = DownloadReport::default();
        for item in items {
            let extension = item.extension();
            let filename = match item.id().map(sanitize).filter(|id| !id.is_empty()) {
                Some(id) => format!("{id}{extension}"),
                None => positional_filename(
                    &filename_id(collection_id, "item"),
                    item.position(),
                    &extension,
                ),
            };
            self.download_item(DownloadTarget::new(folder, filename), item, &mut report)
                .await;
        }
        report
    }

    async fn download_account_listing(
        &self,
        username: &str,
        suffix: &str,
        sources: Vec<MediaSource>,
    ) -> DownloadReport {
        let folder_title = format!("{username}_{suffix}");
        let listing = Collection::new(folder_title.clone(), Some(folder_title), sources);
        let folder = collection_folder(
            self.settings.download_path(),
            listing.title(),
            listing.id(),
        );
        self.download_listing(&folder, listing.id(), listing.items().iter())
            .await
    }

    async fn download_item(
        &self,
        target: DownloadTarget,
        item: &MediaItem,
        report: &mut DownloadReport,
    ) {
        let result = self
            .downloader
            .download(
                &target.filename,
                item.source_url(),
                &target.folder,
                self.overwrite(),
            )
            .await;

        match result {
            Ok(outcome) => {
                if let DownloadOutcome::Failed { url, status } = &outcome {
                    warn!(url = %url, status, file = %target.path().display(), "Item download failed");
                }
                report.record(&outcome);
            }
            Err(err) => {
                warn!(error = %err, file = %target.path().display(), "Item download error");
                report.failed += 1;
            }
        }
    }
}
