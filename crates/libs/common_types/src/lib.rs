#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools
)]
mod album_item;
mod asset_urls;
mod draft;
mod ids;
mod media_asset;
pub mod wire;

pub use album_item::*;
pub use asset_urls::*;
pub use draft::*;
pub use ids::*;
pub use media_asset::*;
