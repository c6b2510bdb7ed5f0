//! Serde types for the API payloads the gateway reads.
//!
//! Every response is wrapped in an [`Envelope`]. The `data` member is kept
//! as raw JSON until `success` has been checked, then decoded into one of the
//! typed shapes below.

use serde::Deserialize;
use tracing::warn;

use crate::media::MediaSource;

/// The `{ success, status, data }` wrapper around every API response.
///
/// A body without `success` is treated as unsuccessful.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub(crate) success: bool,
    #[serde(default)]
    pub(crate) status: Option<u16>,
    #[serde(default)]
    pub(crate) data: serde_json::Value,
}

/// A single image record.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiImage {
    /// Image id.
    pub id: String,
    /// Image title, often null.
    #[serde(default)]
    pub title: Option<String>,
    /// Direct content link.
    pub link: String,
    /// Video container link, present for animated images.
    #[serde(default)]
    pub mp4: Option<String>,
    /// Video-gif variant link, present for animated images.
    #[serde(default)]
    pub gifv: Option<String>,
}

impl ApiImage {
    pub(crate) fn into_source(self) -> MediaSource {
        MediaSource::new(Some(self.id), self.link)
            .with_mp4(non_empty(self.mp4))
            .with_gifv(non_empty(self.gifv))
    }
}

/// An album record as returned by `/album/<id>`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiAlbum {
    /// Album id.
    pub id: String,
    /// Album title, often null.
    #[serde(default)]
    pub title: Option<String>,
    /// Member images in album order.
    #[serde(default)]
    pub images: Vec<ApiImage>,
}

/// One entry of a gallery listing. Either a single image or an album.
#[derive(Debug, Clone, Deserialize)]
pub struct GalleryEntry {
    /// Entry id.
    pub id: String,
    /// Entry title.
    #[serde(default)]
    pub title: Option<String>,
    /// True when the entry is an album.
    #[serde(default)]
    pub is_album: bool,
    /// Direct link (images only).
    #[serde(default)]
    pub link: Option<String>,
    /// Video container link (images only).
    #[serde(default)]
    pub mp4: Option<String>,
    /// Video-gif variant link (images only).
    #[serde(default)]
    pub gifv: Option<String>,
    /// Member images (albums only, and only when the endpoint includes them).
    #[serde(default)]
    pub images: Option<Vec<ApiImage>>,
}

impl GalleryEntry {
    /// True for an album whose images were not inlined in the listing.
    pub(crate) fn needs_album_fetch(&self) -> bool {
        self.is_album && self.images.as_ref().is_none_or(Vec::is_empty)
    }

    /// Expands the entry into downloadable sources.
    ///
    /// Albums contribute their inlined member images in order; callers check
    /// [`needs_album_fetch`](Self::needs_album_fetch) first. An image entry
    /// without a link contributes nothing.
    pub(crate) fn into_sources(self) -> Vec<MediaSource> {
        if self.is_album {
            return self
                .images
                .unwrap_or_default()
                .into_iter()
                .map(ApiImage::into_source)
                .collect();
        }

        match non_empty(self.link) {
            Some(link) => vec![
                MediaSource::new(Some(self.id), link)
                    .with_mp4(non_empty(self.mp4))
                    .with_gifv(non_empty(self.gifv)),
            ],
            None => {
                warn!(id = %self.id, "Skipping gallery entry without link");
                Vec::new()
            }
        }
    }
}

/// The tag listing payload. Current API versions wrap items in an object;
/// older ones return the list directly.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TagPayload {
    Wrapped { items: Vec<GalleryEntry> },
    Bare(Vec<GalleryEntry>),
}

impl TagPayload {
    pub(crate) fn into_entries(self) -> Vec<GalleryEntry> {
        match self {
            Self::Wrapped { items } | Self::Bare(items) => items,
        }
    }
}

/// Body of a successful `POST /oauth2/token`.
///
/// This endpoint answers without the usual envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// New access token.
    pub access_token: String,
    /// Rotated refresh token, when the server issued one.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Account the token belongs to.
    #[serde(default)]
    pub account_username: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_without_success_is_unsuccessful() {
        let envelope: Envelope = serde_json::from_str(r#"{"data": {"error": "nope"}}"#).unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.status, None);
    }

    #[test]
    fn test_album_images_default_to_empty() {
        let album: ApiAlbum = serde_json::from_str(r#"{"id": "abc", "title": null}"#).unwrap();
        assert_eq!(album.id, "abc");
        assert!(album.title.is_none());
        assert!(album.images.is_empty());
    }

    #[test]
    fn test_image_entry_becomes_one_source() {
        let entry: GalleryEntry = serde_json::from_str(
            r#"{"id": "x1", "is_album": false, "link": "https://i.imgur.com/x1.gif",
                "mp4": "https://i.imgur.com/x1.mp4"}"#,
        )
        .unwrap();
        let sources = entry.into_sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].id.as_deref(), Some("x1"));
        assert_eq!(sources[0].mp4.as_deref(), Some("https://i.imgur.com/x1.mp4"));
    }

    #[test]
    fn test_album_entry_flattens_images_in_order() {
        let entry: GalleryEntry = serde_json::from_str(
            r#"{"id": "alb", "is_album": true, "images": [
                {"id": "i1", "link": "https://i.imgur.com/i1.jpg"},
                {"id": "i2", "link": "https://i.imgur.com/i2.png"}
            ]}"#,
        )
        .unwrap();
        let ids: Vec<_> = entry
            .into_sources()
            .into_iter()
            .map(|s| s.id.unwrap())
            .collect();
        assert_eq!(ids, vec!["i1", "i2"]);
    }

    #[test]
    fn test_album_entry_without_images_needs_album_fetch() {
        let bare: GalleryEntry =
            serde_json::from_str(r#"{"id": "alb", "is_album": true}"#).unwrap();
        assert!(bare.needs_album_fetch());

        let empty: GalleryEntry =
            serde_json::from_str(r#"{"id": "alb", "is_album": true, "images": []}"#).unwrap();
        assert!(empty.needs_album_fetch());

        let inlined: GalleryEntry = serde_json::from_str(
            r#"{"id": "alb", "is_album": true, "images": [{"id": "i1", "link": "l"}]}"#,
        )
        .unwrap();
        assert!(!inlined.needs_album_fetch());

        let image: GalleryEntry =
            serde_json::from_str(r#"{"id": "x", "link": "https://i.imgur.com/x.jpg"}"#).unwrap();
        assert!(!image.needs_album_fetch());
    }

    #[test]
    fn test_empty_video_links_are_ignored() {
        let image: ApiImage = serde_json::from_str(
            r#"{"id": "i", "link": "https://i.imgur.com/i.jpg", "mp4": "", "gifv": ""}"#,
        )
        .unwrap();
        let source = image.into_source();
        assert!(source.mp4.is_none());
        assert!(source.gifv.is_none());
    }

    #[test]
    fn test_tag_payload_accepts_both_shapes() {
        let wrapped: TagPayload =
            serde_json::from_str(r#"{"name": "cats", "items": [{"id": "a", "link": "l"}]}"#)
                .unwrap();
        assert_eq!(wrapped.into_entries().len(), 1);

        let bare: TagPayload = serde_json::from_str(r#"[{"id": "a", "link": "l"}]"#).unwrap();
        assert_eq!(bare.into_entries().len(), 1);
    }

    #[test]
    fn test_token_response_optional_fields() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token": "new", "expires_in": 3600}"#).unwrap();
        assert_eq!(token.access_token, "new");
        assert!(token.refresh_token.is_none());
        assert_eq!(token.expires_in, Some(3600));
    }
}
