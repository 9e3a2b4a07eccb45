use crate::gateway::GatewayError;
use common_types::DraftError;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollectionError {
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// A precondition failed locally, nothing was sent to the server.
    #[error("Validation failed: {0}")]
    ValidationFailure(String),

    #[error("Stale state conflict: {0}")]
    StaleStateConflict(String),
}

impl CollectionError {
    /// Only network and conflict failures leave the local list in doubt.
    #[must_use]
    pub const fn requires_reload(&self) -> bool {
        matches!(self, Self::NetworkFailure(_) | Self::StaleStateConflict(_))
    }
}

pub(crate) fn log_error(context: &str, error: &CollectionError) {
    match error {
        CollectionError::NetworkFailure(message) => {
            warn!("{context} -> Network failure: {message}");
        }
        CollectionError::ValidationFailure(message) => {
            warn!("{context} -> Validation failed: {message}");
        }
        CollectionError::StaleStateConflict(message) => {
            warn!("{context} -> Server rejected stale state: {message}");
        }
    }
}

impl From<GatewayError> for CollectionError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NetworkFailure(message) => Self::NetworkFailure(message),
            GatewayError::StaleStateConflict(message) => Self::StaleStateConflict(message),
        }
    }
}

impl From<DraftError> for CollectionError {
    fn from(err: DraftError) -> Self {
        Self::ValidationFailure(err.to_string())
    }
}
