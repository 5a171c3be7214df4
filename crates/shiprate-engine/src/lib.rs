//! First-match-wins rate engine for the shiprate workspace.
//!
//! Pure functions over borrowed data: no HTTP, no shared state, safe to
//! call from any number of concurrent quote calculations.

mod engine;

pub use engine::{compute_cost, format_cost, label, match_row, quote, Quote};
