use crate::{AppSettings, RawSettings};
use color_eyre::eyre::Result;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_SETTINGS_PATH: &str = "config/settings.yaml";

pub fn load_app_settings() -> Result<AppSettings> {
    load_app_settings_from(DEFAULT_SETTINGS_PATH)
}

/// Loads settings from a YAML file, overlaid with `APP__`-prefixed environment variables
/// (e.g. `APP__API__BASE_URL`). A `.env` file in the working directory is read first.
pub fn load_app_settings_from(path: impl AsRef<Path>) -> Result<AppSettings> {
    dotenv::from_path(".env").ok();
    let config_path = path.as_ref().canonicalize()?;
    debug!("Loading settings from {}", config_path.display());

    let builder = config::Config::builder()
        .add_source(config::File::from(config_path))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

    let raw_settings = builder.build()?.try_deserialize::<RawSettings>()?;
    let settings = AppSettings::try_from(raw_settings)?;

    Ok(settings)
}
