//! Live subscriber handle onto one cache entry.

use tokio::sync::watch;

use super::types::{QueryState, ResourceError, ResourceKind, ResourceQuery, ResourceValue, Result};

/// Registered interest in one `(kind, query)` entry.
///
/// The handle keeps the entry alive: an entry whose tags are invalidated is
/// refetched while at least one subscription exists and dropped once none
/// do. Dropping the handle is unsubscription; an in-flight fetch still
/// completes and its result stays cached for later subscribers.
#[derive(Debug)]
pub struct ResourceSubscription {
    kind: ResourceKind,
    query: ResourceQuery,
    receiver: watch::Receiver<QueryState>,
}

impl ResourceSubscription {
    pub(crate) fn new(
        kind: ResourceKind,
        query: ResourceQuery,
        receiver: watch::Receiver<QueryState>,
    ) -> Self {
        Self {
            kind,
            query,
            receiver,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn query(&self) -> &ResourceQuery {
        &self.query
    }

    /// Current state, without consuming the pending-change marker.
    pub fn current(&self) -> QueryState {
        self.receiver.borrow().clone()
    }

    /// Current state, consuming the pending-change marker used by
    /// [`has_update`](Self::has_update).
    pub fn latest(&mut self) -> QueryState {
        self.receiver.borrow_and_update().clone()
    }

    /// Whether the entry changed since the last `latest`/`changed` call.
    pub fn has_update(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Wait for the next state change. `None` once the cache owning the
    /// entry has been dropped.
    pub async fn changed(&mut self) -> Option<QueryState> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Wait until the entry settles, yielding the value or the fetch error.
    pub async fn wait_settled(&mut self) -> Result<ResourceValue> {
        loop {
            let state = self.receiver.borrow_and_update().clone();
            match state {
                QueryState::Ready(value) => return Ok(value),
                QueryState::Failed(message) => {
                    return Err(ResourceError::FetchFailure {
                        kind: self.kind,
                        query: self.query.clone(),
                        message,
                    })
                }
                QueryState::Idle | QueryState::Fetching => {
                    if self.receiver.changed().await.is_err() {
                        return Err(ResourceError::MissingDependency(format!(
                            "cache dropped while waiting for {} ({})",
                            self.kind, self.query
                        )));
                    }
                }
            }
        }
    }
}
