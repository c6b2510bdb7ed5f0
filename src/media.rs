//! Value types shared by the gateway and the orchestrator.
//!
//! A [`Collection`] is what one metadata fetch produces: a title and an
//! ordered list of [`MediaItem`]s. Positions are assigned once, when the
//! collection is built, and never change afterwards.

use crate::naming::{extension_from_link, folder_name};

/// A downloadable unit as reported by the remote service, before it is
/// placed inside a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    /// The remote id of the image, when the service reports one.
    pub id: Option<String>,
    /// Plain content link.
    pub link: String,
    /// Video container link, preferred over everything else.
    pub mp4: Option<String>,
    /// Video-gif variant link, preferred over the plain link.
    pub gifv: Option<String>,
}

impl MediaSource {
    /// Creates a source with only a plain link.
    #[must_use]
    pub fn new(id: Option<String>, link: impl Into<String>) -> Self {
        Self {
            id,
            link: link.into(),
            mp4: None,
            gifv: None,
        }
    }

    /// Sets the video container link.
    #[must_use]
    pub fn with_mp4(mut self, mp4: Option<String>) -> Self {
        self.mp4 = mp4;
        self
    }

    /// Sets the video-gif variant link.
    #[must_use]
    pub fn with_gifv(mut self, gifv: Option<String>) -> Self {
        self.gifv = gifv;
        self
    }
}

/// One item of a [`Collection`], with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    source: MediaSource,
    position: usize,
}

impl MediaItem {
    /// The link that is actually fetched: `mp4`, else `gifv`, else `link`.
    #[must_use]
    pub fn source_url(&self) -> &str {
        self.source
            .mp4
            .as_deref()
            .or(self.source.gifv.as_deref())
            .unwrap_or(&self.source.link)
    }

    /// Extension of [`source_url`](Self::source_url), dot included.
    #[must_use]
    pub fn extension(&self) -> String {
        extension_from_link(self.source_url())
    }

    /// 1-based position within the parent collection.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Remote id, when known.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.source.id.as_deref()
    }

    /// The unpositioned source this item was built from.
    #[must_use]
    pub fn source(&self) -> &MediaSource {
        &self.source
    }
}

/// A titled, ordered group of media items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    id: String,
    title: String,
    items: Vec<MediaItem>,
}

impl Collection {
    /// Builds a collection, numbering items from 1 in the given order.
    ///
    /// A missing title is stored as empty; [`folder_name`](Self::folder_name)
    /// substitutes the id for it.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: Option<String>,
        sources: impl IntoIterator<Item = MediaSource>,
    ) -> Self {
        let items = sources
            .into_iter()
            .enumerate()
            .map(|(index, source)| MediaItem {
                source,
                position: index + 1,
            })
            .collect();
        Self {
            id: id.into(),
            title: title.unwrap_or_default(),
            items,
        }
    }

    /// Collection id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Collection title as reported (possibly empty).
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Items in gateway order.
    #[must_use]
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the collection has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sanitized title, or the id when the title is empty after sanitizing.
    #[must_use]
    pub fn folder_name(&self) -> String {
        folder_name(&self.title, &self.id)
    }
}
