//! # tutorhub-core
//!
//! Core crate for TutorHub. Contains configuration schemas, typed
//! identifiers, caller identity, domain events, the retry policy used
//! for cross-service calls, and the unified error system.
//!
//! This crate has **no** internal dependencies on other TutorHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod retry;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
