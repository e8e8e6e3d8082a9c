//! Atelier Resources - reactive resource layer for the Atelier studio client.
//!
//! Core library providing cached, mutation-aware access to the studio's
//! named resources (style presets, embedding models) and the derived
//! embedding picker view consumed by the presentation layer.

pub mod config;
pub mod core;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
