//! Common Test Utilities
//!
//! Shared fixtures used across test modules: record builders and draft
//! payloads for the resource kinds the studio serves.

pub mod fixtures;

pub use fixtures::*;
