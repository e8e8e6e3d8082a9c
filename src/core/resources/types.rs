//! Core types for the resource cache.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::remote::{RemoteError, ResourceDraft};

// ============================================================================
// Resource Kinds
// ============================================================================

/// Resource families served by the studio API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    StylePreset,
    Embedding,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::StylePreset => "style_preset",
            ResourceKind::Embedding => "embedding",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Records
// ============================================================================

/// One stored resource as the server returns it.
///
/// Records are immutable once fetched; a mutation yields a replacement
/// record, never an in-place edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub id: String,
    pub name: String,
    /// Base model family key (`"sd-1"`, `"sdxl"`, ...) when the resource
    /// only works with one family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Server fields not modeled here survive round-trips.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ResourceRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_model: None,
            created_at: None,
            updated_at: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_base_model(mut self, base_model: impl Into<String>) -> Self {
        self.base_model = Some(base_model.into());
        self
    }
}

// ============================================================================
// Queries and Cached Values
// ============================================================================

/// Query discriminator: one cache entry exists per `(kind, query)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceQuery {
    /// The full collection of a kind.
    List,
    /// One record by id.
    Item(String),
}

impl fmt::Display for ResourceQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceQuery::List => write!(f, "list"),
            ResourceQuery::Item(id) => write!(f, "item {id}"),
        }
    }
}

/// Resolved value of a cache entry. `Arc` so every subscriber shares one
/// allocation and derived views can use pointer identity as a change token.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceValue {
    Collection(Arc<Vec<ResourceRecord>>),
    Single(Arc<ResourceRecord>),
}

impl ResourceValue {
    pub fn as_collection(&self) -> Option<&Arc<Vec<ResourceRecord>>> {
        match self {
            ResourceValue::Collection(records) => Some(records),
            ResourceValue::Single(_) => None,
        }
    }

    pub fn as_single(&self) -> Option<&Arc<ResourceRecord>> {
        match self {
            ResourceValue::Single(record) => Some(record),
            ResourceValue::Collection(_) => None,
        }
    }
}

/// Observable state of a cache entry.
///
/// `Fetching` carries no value: once a tag an entry provides is invalidated,
/// its previous value is no longer served to anyone.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    /// Channel created, fetch not yet started. Transient.
    Idle,
    /// A fetch is in flight.
    Fetching,
    /// Last fetch succeeded.
    Ready(ResourceValue),
    /// Last fetch failed. Not cached as a value; the next subscriber or
    /// invalidation retries.
    Failed(String),
}

impl QueryState {
    pub fn is_ready(&self) -> bool {
        matches!(self, QueryState::Ready(_))
    }

    pub fn value(&self) -> Option<&ResourceValue> {
        match self {
            QueryState::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Collection payload, when Ready with a list value.
    pub fn collection(&self) -> Option<Arc<Vec<ResourceRecord>>> {
        self.value().and_then(|v| v.as_collection()).cloned()
    }

    /// Single-record payload, when Ready with an item value.
    pub fn single(&self) -> Option<Arc<ResourceRecord>> {
        self.value().and_then(|v| v.as_single()).cloned()
    }
}

// ============================================================================
// Mutations
// ============================================================================

/// Write operation against a kind's collection.
#[derive(Debug, Clone)]
pub enum Mutation {
    Create(ResourceDraft),
    Update { id: String, draft: ResourceDraft },
    Delete { id: String },
}

impl Mutation {
    pub fn op_name(&self) -> &'static str {
        match self {
            Mutation::Create(_) => "create",
            Mutation::Update { .. } => "update",
            Mutation::Delete { .. } => "delete",
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ResourceError {
    /// A read against the remote failed; the owning entry is in the
    /// `Failed` state and will retry on the next subscription.
    #[error("Fetch failed for {kind} ({query}): {message}")]
    FetchFailure {
        kind: ResourceKind,
        query: ResourceQuery,
        message: String,
    },

    /// The remote rejected a create/update/delete. The cache is untouched.
    #[error("Mutation failed for {kind}: {source}")]
    MutationFailure {
        kind: ResourceKind,
        #[source]
        source: RemoteError,
    },

    /// An operation required a cached value that is not loaded.
    #[error("Missing dependency: {0}")]
    MissingDependency(String),
}

pub type Result<T> = std::result::Result<T, ResourceError>;
