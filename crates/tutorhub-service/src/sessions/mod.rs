//! Student-facing session catalog.

pub mod catalog;

pub use catalog::CatalogService;
