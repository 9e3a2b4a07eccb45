mod controller;
mod error;
mod reorder;
mod snapshot;

pub use controller::*;
pub use error::*;
pub use reorder::*;
pub use snapshot::*;
