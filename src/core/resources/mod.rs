//! Reactive resource cache.
//!
//! Small named resources (style presets, embedding models) are fetched from
//! the studio API, cached per `(kind, query)` entry, and kept coherent by
//! tag invalidation: every mutation invalidates a fixed tag set, entries
//! carrying those tags are refetched while subscribed and dropped when idle.
//!
//! Collections here are small and fully replaceable, so staleness is solved
//! by refetching whole entries rather than merging partial updates.

mod store;
mod subscription;
pub mod tags;
mod types;

pub use store::{CacheStats, ResourceCache};
pub use subscription::ResourceSubscription;
pub use tags::{invalidated_tags, provided_tags, KindPolicy, Tag, KIND_POLICIES};
pub use types::{
    Mutation, QueryState, ResourceError, ResourceKind, ResourceQuery, ResourceRecord,
    ResourceValue, Result,
};
