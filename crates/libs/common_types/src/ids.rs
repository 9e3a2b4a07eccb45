use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);
    };
}

id_type!(
    /// Server-assigned id of an album (the container of album items).
    AlbumId
);
id_type!(
    /// Server-assigned id of a positioned item inside an album.
    ItemId
);
id_type!(
    /// Server-assigned id of an uploaded media asset.
    AssetId
);
