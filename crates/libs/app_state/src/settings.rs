use crate::{LoggingSettings, RawSettings, SecretSettings};
use common_types::MediaTypeFilter;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub api: ApiSettings,
    pub logging: LoggingSettings,
    pub secrets: SecretSettings,
    pub curation: CurationSettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
}

impl ApiSettings {
    /// Base URL without a trailing slash, ready for `format!("{base}/...")`.
    #[must_use]
    pub fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurationSettings {
    pub search_debounce: Duration,
    pub slideshow_interval: Duration,
    pub manager_page_size: u32,
    pub gallery_page_size: u32,
    pub default_media_type: MediaTypeFilter,
}

impl Default for CurationSettings {
    fn default() -> Self {
        Self {
            search_debounce: Duration::from_millis(250),
            slideshow_interval: Duration::from_millis(3000),
            manager_page_size: 50,
            gallery_page_size: 12,
            default_media_type: MediaTypeFilter::Image,
        }
    }
}

impl TryFrom<RawSettings> for AppSettings {
    type Error = url::ParseError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        let base_url: Url = raw.api.base_url.parse()?;
        let curation = CurationSettings {
            search_debounce: Duration::from_millis(raw.curation.search_debounce_ms),
            slideshow_interval: Duration::from_millis(raw.curation.slideshow_interval_ms),
            // A zero page size would make every page empty.
            manager_page_size: raw.curation.manager_page_size.max(1),
            gallery_page_size: raw.curation.gallery_page_size.max(1),
            default_media_type: raw.curation.default_media_type,
        };

        Ok(Self {
            api: ApiSettings { base_url },
            logging: raw.logging,
            secrets: SecretSettings {
                api_token: raw.secrets.api_token.filter(|token| !token.trim().is_empty()),
            },
            curation,
        })
    }
}
