//! Environment-driven settings and business constants (tiers, token lifetimes, paging).

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
