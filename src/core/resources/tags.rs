//! Tag policy: which tags an entry provides and which tags a mutation
//! invalidates, declared statically per resource kind.

use super::types::{Mutation, ResourceKind, ResourceQuery};

/// Dependency label carried by cache entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    /// The whole collection of a kind.
    List(ResourceKind),
    /// One record of a kind.
    Item(ResourceKind, String),
    /// Carried by every entry; invalidated when connectivity returns.
    Reconnect,
}

/// Static cache policy for one resource kind.
#[derive(Debug, Clone, Copy)]
pub struct KindPolicy {
    pub kind: ResourceKind,
    /// Path segment under `/api/v1/`.
    pub base_path: &'static str,
    /// Whether an item entry also refreshes on collection invalidation.
    pub item_provides_list: bool,
}

/// Canonical kind table. Adding a kind means adding a row here and an arm
/// to [`ResourceKind::policy`].
pub const KIND_POLICIES: &[KindPolicy] = &[
    KindPolicy {
        kind: ResourceKind::StylePreset,
        base_path: "style_presets",
        item_provides_list: false,
    },
    KindPolicy {
        kind: ResourceKind::Embedding,
        base_path: "embeddings",
        item_provides_list: true,
    },
];

impl ResourceKind {
    pub fn policy(self) -> &'static KindPolicy {
        match self {
            ResourceKind::StylePreset => &KIND_POLICIES[0],
            ResourceKind::Embedding => &KIND_POLICIES[1],
        }
    }

    pub fn base_path(self) -> &'static str {
        self.policy().base_path
    }
}

/// Tags a fresh entry for `(kind, query)` carries.
pub fn provided_tags(kind: ResourceKind, query: &ResourceQuery) -> Vec<Tag> {
    let mut tags = match query {
        ResourceQuery::List => vec![Tag::List(kind)],
        ResourceQuery::Item(id) => {
            let mut tags = vec![Tag::Item(kind, id.clone())];
            if kind.policy().item_provides_list {
                tags.push(Tag::List(kind));
            }
            tags
        }
    };
    tags.push(Tag::Reconnect);
    tags
}

/// Tags a settled mutation invalidates. Fixed per operation; the fields
/// actually changed never matter.
pub fn invalidated_tags(kind: ResourceKind, mutation: &Mutation) -> Vec<Tag> {
    match mutation {
        Mutation::Create(_) => vec![Tag::List(kind)],
        Mutation::Update { id, .. } => vec![Tag::List(kind), Tag::Item(kind, id.clone())],
        Mutation::Delete { id } => vec![Tag::List(kind), Tag::Item(kind, id.clone())],
    }
}
