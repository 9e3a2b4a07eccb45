use crate::gateway::GatewayError;
use common_types::wire::BoundaryError;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum GalleryClientError {
    #[error("Failed to build request URL: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Console API returned an error: {0}")]
    RemoteServerError(String),

    #[error("Console API rejected stale state: {0}")]
    Conflict(String),

    #[error("Malformed response: {0}")]
    Boundary(#[from] BoundaryError),
}

fn log_error(error: &GalleryClientError) {
    match error {
        GalleryClientError::UrlParseError(e) => warn!("Gallery client -> Bad URL: {}", e),
        GalleryClientError::RequestError(e) => warn!("Gallery client -> Request failed: {}", e),
        GalleryClientError::RemoteServerError(message) => {
            warn!("Gallery client -> Remote server error: {}", message);
        }
        GalleryClientError::Conflict(message) => {
            warn!("Gallery client -> Conflict: {}", message);
        }
        GalleryClientError::Boundary(e) => warn!("Gallery client -> Malformed response: {}", e),
    }
}

impl From<GalleryClientError> for GatewayError {
    fn from(err: GalleryClientError) -> Self {
        log_error(&err);
        match err {
            GalleryClientError::Conflict(message) => Self::StaleStateConflict(message),
            other => Self::NetworkFailure(other.to_string()),
        }
    }
}
