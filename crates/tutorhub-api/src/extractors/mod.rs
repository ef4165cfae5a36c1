//! Custom Axum extractors.

pub mod identity;
pub mod path;

pub use identity::Identity;
pub use path::parse_id;
