//! Tag-invalidating resource cache.
//!
//! One entry per `(kind, query)` pair, created on first subscribe. Entries
//! broadcast state over a watch channel; mutations invalidate statically
//! declared tags, which refetches entries that still have subscribers and
//! drops the rest.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tracing::{debug, info, trace, warn};

use crate::core::remote::StudioRemote;

use super::subscription::ResourceSubscription;
use super::tags::{invalidated_tags, provided_tags, Tag};
use super::types::{
    Mutation, QueryState, ResourceError, ResourceKind, ResourceQuery, ResourceRecord,
    ResourceValue, Result,
};

type EntryKey = (ResourceKind, ResourceQuery);

struct Entry {
    sender: watch::Sender<QueryState>,
    tags: Vec<Tag>,
    /// Epoch of the newest fetch started for this entry. A completion with
    /// an older epoch is discarded.
    epoch: u64,
    in_flight: bool,
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub fetches_started: u64,
    pub fetches_succeeded: u64,
    pub fetches_failed: u64,
    pub fetches_superseded: u64,
    pub mutations_applied: u64,
    pub mutations_failed: u64,
    pub invalidated_entries: u64,
    pub dropped_entries: u64,
}

#[derive(Default)]
struct Counters {
    fetches_started: AtomicU64,
    fetches_succeeded: AtomicU64,
    fetches_failed: AtomicU64,
    fetches_superseded: AtomicU64,
    mutations_applied: AtomicU64,
    mutations_failed: AtomicU64,
    invalidated_entries: AtomicU64,
    dropped_entries: AtomicU64,
}

struct CacheInner {
    remote: Arc<dyn StudioRemote>,
    entries: RwLock<HashMap<EntryKey, Entry>>,
    /// Monotonic fetch epoch, never reused. Uniqueness is all that matters;
    /// entry state itself is guarded by the entries lock.
    epoch: AtomicU64,
    counters: Counters,
}

/// Reactive resource cache over a [`StudioRemote`].
///
/// Cheap to clone; clones share one entry table. There is no global
/// instance, consumers receive the cache they should use.
#[derive(Clone)]
pub struct ResourceCache {
    inner: Arc<CacheInner>,
}

impl ResourceCache {
    pub fn new(remote: Arc<dyn StudioRemote>) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                remote,
                entries: RwLock::new(HashMap::new()),
                epoch: AtomicU64::new(0),
                counters: Counters::default(),
            }),
        }
    }

    /// Register interest in `(kind, query)`.
    ///
    /// Creates the entry and starts a fetch when none exists; joins the
    /// in-flight fetch when one is running; retries when the last fetch
    /// failed. A `Ready` entry is served as is, invalidation keeps it fresh.
    pub async fn subscribe(&self, kind: ResourceKind, query: ResourceQuery) -> ResourceSubscription {
        let key = (kind, query.clone());
        let mut entries = self.inner.entries.write().await;

        let (receiver, needs_fetch) = match entries.get(&key) {
            Some(entry) => {
                let retry = !entry.in_flight && !entry.sender.borrow().is_ready();
                (entry.sender.subscribe(), retry)
            }
            None => {
                let (sender, receiver) = watch::channel(QueryState::Idle);
                entries.insert(
                    key.clone(),
                    Entry {
                        sender,
                        tags: provided_tags(kind, &query),
                        epoch: 0,
                        in_flight: false,
                    },
                );
                debug!("Created cache entry for {} ({})", kind, query);
                (receiver, true)
            }
        };

        if needs_fetch {
            self.inner.start_fetch(&mut entries, &key);
        }
        drop(entries);

        ResourceSubscription::new(kind, query, receiver)
    }

    /// Subscribe to the full collection of a kind.
    pub async fn subscribe_list(&self, kind: ResourceKind) -> ResourceSubscription {
        self.subscribe(kind, ResourceQuery::List).await
    }

    /// Subscribe to one record by id.
    pub async fn subscribe_item(
        &self,
        kind: ResourceKind,
        id: impl Into<String>,
    ) -> ResourceSubscription {
        self.subscribe(kind, ResourceQuery::Item(id.into())).await
    }

    /// Perform a remote mutation, then invalidate its declared tags.
    ///
    /// Returns the stored record for create/update and `None` for delete.
    /// On failure nothing is invalidated; every entry keeps serving what it
    /// served before the call.
    pub async fn mutate(
        &self,
        kind: ResourceKind,
        mutation: Mutation,
    ) -> Result<Option<ResourceRecord>> {
        let outcome = match &mutation {
            Mutation::Create(draft) => self.inner.remote.create(kind, draft).await.map(Some),
            Mutation::Update { id, draft } => {
                self.inner.remote.update(kind, id, draft).await.map(Some)
            }
            Mutation::Delete { id } => self.inner.remote.delete(kind, id).await.map(|()| None),
        };

        match outcome {
            Ok(record) => {
                self.inner
                    .counters
                    .mutations_applied
                    .fetch_add(1, Ordering::Relaxed);
                let tags = invalidated_tags(kind, &mutation);
                info!(
                    "Applied {} on {}; invalidating {} tags",
                    mutation.op_name(),
                    kind,
                    tags.len()
                );
                self.invalidate(&tags).await;
                Ok(record)
            }
            Err(source) => {
                self.inner
                    .counters
                    .mutations_failed
                    .fetch_add(1, Ordering::Relaxed);
                warn!("{} on {} failed: {}", mutation.op_name(), kind, source);
                Err(ResourceError::MutationFailure { kind, source })
            }
        }
    }

    /// Invalidate every entry carrying any of `tags`.
    ///
    /// Entries with live subscribers refetch immediately; the rest are
    /// dropped and refetched lazily on the next subscribe.
    pub async fn invalidate(&self, tags: &[Tag]) {
        if tags.is_empty() {
            return;
        }
        let mut entries = self.inner.entries.write().await;
        let hit: Vec<EntryKey> = entries
            .iter()
            .filter(|(_, entry)| entry.tags.iter().any(|tag| tags.contains(tag)))
            .map(|(key, _)| key.clone())
            .collect();
        self.inner
            .counters
            .invalidated_entries
            .fetch_add(hit.len() as u64, Ordering::Relaxed);

        for key in hit {
            let subscribers = entries
                .get(&key)
                .map(|entry| entry.sender.receiver_count())
                .unwrap_or(0);
            if subscribers > 0 {
                self.inner.start_fetch(&mut entries, &key);
            } else {
                entries.remove(&key);
                self.inner
                    .counters
                    .dropped_entries
                    .fetch_add(1, Ordering::Relaxed);
                debug!("Dropped idle entry {} ({})", key.0, key.1);
            }
        }
    }

    /// Refresh every live entry after a connectivity gap.
    pub async fn reconnect(&self) {
        info!("Connectivity restored; refreshing cache entries");
        self.invalidate(&[Tag::Reconnect]).await;
    }

    /// Latest settled value without subscribing.
    pub async fn current(&self, kind: ResourceKind, query: &ResourceQuery) -> Result<ResourceValue> {
        let entries = self.inner.entries.read().await;
        entries
            .get(&(kind, query.clone()))
            .and_then(|entry| entry.sender.borrow().value().cloned())
            .ok_or_else(|| {
                ResourceError::MissingDependency(format!("{kind} ({query}) is not loaded"))
            })
    }

    pub async fn entry_count(&self) -> usize {
        self.inner.entries.read().await.len()
    }

    pub async fn has_entry(&self, kind: ResourceKind, query: &ResourceQuery) -> bool {
        self.inner
            .entries
            .read()
            .await
            .contains_key(&(kind, query.clone()))
    }

    pub fn stats(&self) -> CacheStats {
        let c = &self.inner.counters;
        CacheStats {
            fetches_started: c.fetches_started.load(Ordering::Relaxed),
            fetches_succeeded: c.fetches_succeeded.load(Ordering::Relaxed),
            fetches_failed: c.fetches_failed.load(Ordering::Relaxed),
            fetches_superseded: c.fetches_superseded.load(Ordering::Relaxed),
            mutations_applied: c.mutations_applied.load(Ordering::Relaxed),
            mutations_failed: c.mutations_failed.load(Ordering::Relaxed),
            invalidated_entries: c.invalidated_entries.load(Ordering::Relaxed),
            dropped_entries: c.dropped_entries.load(Ordering::Relaxed),
        }
    }
}

impl CacheInner {
    /// Bump the entry's epoch and spawn a fetch for it. Any still-running
    /// older fetch becomes a no-op on completion.
    fn start_fetch(self: &Arc<Self>, entries: &mut HashMap<EntryKey, Entry>, key: &EntryKey) {
        let Some(entry) = entries.get_mut(key) else {
            return;
        };
        let epoch = self.epoch.fetch_add(1, Ordering::Relaxed) + 1;
        entry.epoch = epoch;
        entry.in_flight = true;
        entry.sender.send_replace(QueryState::Fetching);
        self.counters.fetches_started.fetch_add(1, Ordering::Relaxed);
        debug!("Fetch started for {} ({}), epoch {}", key.0, key.1, epoch);

        let inner = Arc::clone(self);
        let (kind, query) = key.clone();
        tokio::spawn(run_fetch(inner, kind, query, epoch));
    }
}

async fn run_fetch(inner: Arc<CacheInner>, kind: ResourceKind, query: ResourceQuery, epoch: u64) {
    let result = match &query {
        ResourceQuery::List => inner
            .remote
            .list(kind)
            .await
            .map(|records| ResourceValue::Collection(Arc::new(records))),
        ResourceQuery::Item(id) => inner
            .remote
            .get(kind, id)
            .await
            .map(|record| ResourceValue::Single(Arc::new(record))),
    };

    let mut entries = inner.entries.write().await;
    let Some(entry) = entries.get_mut(&(kind, query.clone())) else {
        trace!("Fetch completed for dropped entry {} ({})", kind, query);
        return;
    };
    if entry.epoch != epoch {
        inner
            .counters
            .fetches_superseded
            .fetch_add(1, Ordering::Relaxed);
        debug!(
            "Discarding superseded fetch for {} ({}), epoch {} < {}",
            kind, query, epoch, entry.epoch
        );
        return;
    }
    entry.in_flight = false;

    match result {
        Ok(value) => {
            inner
                .counters
                .fetches_succeeded
                .fetch_add(1, Ordering::Relaxed);
            entry.sender.send_replace(QueryState::Ready(value));
        }
        Err(err) => {
            inner
                .counters
                .fetches_failed
                .fetch_add(1, Ordering::Relaxed);
            warn!("Fetch failed for {} ({}): {}", kind, query, err);
            entry.sender.send_replace(QueryState::Failed(err.to_string()));
        }
    }
}
