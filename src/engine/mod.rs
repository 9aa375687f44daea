//! Terminal front end for the declarative engine
//!
//! 1. Diffing - show current vs desired state (`status`)
//! 2. Executing - apply a plan in order with per-resource progress

pub mod differ;
pub mod executor;

pub use differ::display_diff;
pub use executor::{ProgressMode, UiProgress, print_summary};
