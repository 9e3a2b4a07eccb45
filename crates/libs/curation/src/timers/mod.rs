//! Timers owned by exactly one component.
//!
//! Both timers run on a spawned tokio task that is aborted by `cancel()` or when
//! the owner drops the timer, so no callback can fire after its owner is gone.

mod debounce;
mod interval;

pub use debounce::*;
pub use interval::*;
