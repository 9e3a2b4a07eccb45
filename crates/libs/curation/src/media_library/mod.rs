mod filter;
mod picker;

pub use filter::*;
pub use picker::*;
