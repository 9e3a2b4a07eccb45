use crate::AssetId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An uploaded file resource as listed by the media library.
///
/// Owned by the server; the curation core only ever holds read-only copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    pub id: AssetId,
    pub original_filename: String,
    pub content_type: String,
    pub size_bytes: u64,
}

impl MediaAsset {
    #[must_use]
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_content_type(&self.content_type)
    }
}

/// Coarse classification of a content type.
///
/// This is the single type predicate shared by the library filter and the slideshow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
    Pdf,
    Other,
}

impl MediaKind {
    /// `image/*` is an image, only `video/mp4` is a playable video and only
    /// `application/pdf` is a document. Comparison ignores ASCII case.
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Self {
        let content_type = content_type.to_ascii_lowercase();
        if content_type.starts_with("image/") {
            Self::Image
        } else if content_type == "video/mp4" {
            Self::Video
        } else if content_type == "application/pdf" {
            Self::Pdf
        } else {
            Self::Other
        }
    }

    /// Images and videos both have a server-rendered poster.
    #[must_use]
    pub const fn has_poster(self) -> bool {
        matches!(self, Self::Image | Self::Video)
    }
}

/// Media type toggle of the library picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaTypeFilter {
    #[default]
    All,
    Image,
    Video,
    Pdf,
}

impl MediaTypeFilter {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Image => "image",
            Self::Video => "video",
            Self::Pdf => "pdf",
        }
    }

    #[must_use]
    pub fn matches(self, kind: MediaKind) -> bool {
        match self {
            Self::All => true,
            Self::Image => kind == MediaKind::Image,
            Self::Video => kind == MediaKind::Video,
            Self::Pdf => kind == MediaKind::Pdf,
        }
    }
}

impl fmt::Display for MediaTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown media type filter '{0}', expected one of: all, image, video, pdf")]
pub struct ParseMediaTypeFilterError(String);

impl FromStr for MediaTypeFilter {
    type Err = ParseMediaTypeFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Toggle labels are plural, accept both spellings.
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "image" | "images" => Ok(Self::Image),
            "video" | "videos" => Ok(Self::Video),
            "pdf" | "pdfs" => Ok(Self::Pdf),
            other => Err(ParseMediaTypeFilterError(other.to_owned())),
        }
    }
}

/// What the user typed and toggled in the picker. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub query: String,
    pub media_type: MediaTypeFilter,
}

impl FilterCriteria {
    #[must_use]
    pub fn new(query: impl Into<String>, media_type: MediaTypeFilter) -> Self {
        Self {
            query: query.into(),
            media_type,
        }
    }
}
