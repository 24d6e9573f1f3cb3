//! Umbrella crate for the skewjoin workspace; integration tests live here.

pub use skewjoin_backend;
pub use skewjoin_core;
pub use skewjoin_planner;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
