#![deny(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_inception,
    clippy::cast_possible_truncation
)]

pub mod album_items;
pub mod gallery_client;
pub mod gateway;
pub mod media_library;
pub mod slideshow;
pub mod timers;

#[cfg(test)]
pub(crate) mod testing;
