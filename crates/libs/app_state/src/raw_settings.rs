use common_types::MediaTypeFilter;
use serde::Deserialize;

/// Settings exactly as they appear in `config/settings.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub api: RawApiSettings,
    pub logging: LoggingSettings,
    #[serde(default)]
    pub secrets: SecretSettings,
    pub curation: RawCurationSettings,
}

/// Where the console API lives.
#[derive(Debug, Deserialize, Clone)]
pub struct RawApiSettings {
    /// Including the `/api` prefix, e.g. `http://localhost:8080/api`.
    pub base_url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SecretSettings {
    /// Bearer token of an admin session, required for the admin endpoints.
    pub api_token: Option<String>,
}

/// Timing and paging knobs of the curation views.
#[derive(Debug, Deserialize, Clone)]
pub struct RawCurationSettings {
    /// Quiet period before a search query is applied.
    pub search_debounce_ms: u64,
    /// Delay between slides while autoplay is on.
    pub slideshow_interval_ms: u64,
    /// Page size of the album manager.
    pub manager_page_size: u32,
    /// Page size of the public gallery.
    pub gallery_page_size: u32,
    /// Type toggle selected when the picker opens.
    pub default_media_type: MediaTypeFilter,
}
