//! Core type definitions used across the TutorHub workspace.

pub mod id;

pub use id::*;
