use crate::{AssetId, MediaAsset};

/// Public URL of the full asset: `{base}/public/uploads/{id}`.
#[must_use]
pub fn asset_url(base: &str, asset_id: AssetId) -> String {
    format!("{}/public/uploads/{asset_id}", base.trim_end_matches('/'))
}

/// Public URL of the poster, valid for both images and videos.
#[must_use]
pub fn poster_url(base: &str, asset_id: AssetId) -> String {
    format!("{}/poster", asset_url(base, asset_id))
}

/// How a library entry is previewed in the picker grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetPreview {
    Poster { url: String },
    /// No poster exists, show the filename and content type instead.
    FileCard {
        filename: String,
        content_type: String,
    },
}

#[must_use]
pub fn preview_for(base: &str, asset: &MediaAsset) -> AssetPreview {
    if asset.kind().has_poster() {
        AssetPreview::Poster {
            url: poster_url(base, asset.id),
        }
    } else {
        AssetPreview::FileCard {
            filename: if asset.original_filename.is_empty() {
                "(file)".to_owned()
            } else {
                asset.original_filename.clone()
            },
            content_type: if asset.content_type.is_empty() {
                "unknown".to_owned()
            } else {
                asset.content_type.clone()
            },
        }
    }
}
