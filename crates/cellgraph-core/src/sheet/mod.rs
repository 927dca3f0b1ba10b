//! Sheet state and logic.
//!
//! - `state` - the grid itself, lookups and lazy growth
//! - `ops` - the edit protocol (`set_cell`, `clear_cell`)
//! - `graph` - cycle detection and cache invalidation
//! - `eval` - value reads and reference resolution
//! - `print` - printable size and tab-separated rendering

mod eval;
mod graph;
mod ops;
mod print;
mod state;

pub use state::{Sheet, Size};
