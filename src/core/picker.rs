//! Derived embedding picker view.
//!
//! Pure functions from the cached embedding collection plus the selected
//! main model to an ordered, annotated item list, and a memoizing facade
//! that recomputes only when either input actually changes. The view never
//! fails: a missing collection or model degrades to an empty or disabled
//! list.

use std::sync::Arc;

use crate::core::resources::{ResourceCache, ResourceKind, ResourceRecord, ResourceSubscription};

/// Base model family display names, keyed by compatibility key.
pub const MODEL_TYPE_MAP: &[(&str, &str)] = &[
    ("sd-1", "Stable Diffusion 1.x"),
    ("sd-2", "Stable Diffusion 2.x"),
    ("sdxl", "Stable Diffusion XL"),
    ("sdxl-refiner", "Stable Diffusion XL Refiner"),
];

pub fn model_type_label(key: &str) -> Option<&'static str> {
    MODEL_TYPE_MAP
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
}

/// Currently selected main model, consumed read-only. Absence is a valid
/// state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainModel {
    pub base_model: String,
}

/// One selectable row of the picker. Replaced wholesale on recompute,
/// never edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    /// Stable identifier committed on selection.
    pub value: String,
    pub label: String,
    /// Family heading, when the compatibility key is a known one.
    pub group: Option<&'static str>,
    pub disabled: bool,
    /// Set only while disabled.
    pub tooltip: Option<String>,
}

/// Build the picker rows for `records` against the selected model.
///
/// Compatible rows come first; relative order within each half follows the
/// input (explicit stable partition, no comparator).
pub fn compute_picker_items(
    records: &[ResourceRecord],
    current_model: Option<&MainModel>,
) -> Vec<PickerItem> {
    let current_base = current_model.map(|m| m.base_model.as_str());
    let mut compatible = Vec::new();
    let mut incompatible = Vec::new();

    for record in records {
        let disabled = record.base_model.as_deref() != current_base;
        let item = PickerItem {
            value: record.id.clone(),
            label: record.name.clone(),
            group: record.base_model.as_deref().and_then(model_type_label),
            disabled,
            tooltip: disabled.then(|| {
                format!(
                    "Incompatible base model: {}",
                    record.base_model.as_deref().unwrap_or("unknown")
                )
            }),
        };
        if disabled {
            incompatible.push(item);
        } else {
            compatible.push(item);
        }
    }

    compatible.extend(incompatible);
    compatible
}

/// Case-insensitive substring filter over label and value. The query is
/// trimmed first; an empty query matches everything.
pub fn filter_items(items: &[PickerItem], query: &str) -> Vec<PickerItem> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| {
            item.label.to_lowercase().contains(&needle)
                || item.value.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Commit a selection event. Multi-select surfaces report every active
/// value; only the first is committed, and an empty selection is a no-op
/// rather than a clear.
pub fn commit_selection(values: &[String]) -> Option<&str> {
    values.first().map(String::as_str)
}

struct Memo {
    /// Held so the collection allocation outlives the memo, which makes
    /// pointer identity a sound change token.
    collection: Option<Arc<Vec<ResourceRecord>>>,
    signal: Option<String>,
    items: Arc<Vec<PickerItem>>,
}

impl Memo {
    fn matches(
        &self,
        collection: &Option<Arc<Vec<ResourceRecord>>>,
        signal: Option<&str>,
    ) -> bool {
        self.signal.as_deref() == signal
            && match (&self.collection, collection) {
                (Some(memoed), Some(current)) => Arc::ptr_eq(memoed, current),
                (None, None) => true,
                _ => false,
            }
    }
}

/// Embedding picker bound to a live collection subscription.
///
/// `items` is cheap to call on every render: the computed list is reused
/// until the collection value or the model's base key changes.
pub struct EmbeddingPicker {
    subscription: ResourceSubscription,
    memo: Option<Memo>,
}

impl EmbeddingPicker {
    /// Subscribe to the embedding collection of `cache` and wrap it.
    pub async fn attach(cache: &ResourceCache) -> Self {
        Self::new(cache.subscribe_list(ResourceKind::Embedding).await)
    }

    /// Wrap an existing collection subscription.
    pub fn new(subscription: ResourceSubscription) -> Self {
        Self {
            subscription,
            memo: None,
        }
    }

    pub fn subscription(&self) -> &ResourceSubscription {
        &self.subscription
    }

    /// Mutable access, for awaiting entry changes.
    pub fn subscription_mut(&mut self) -> &mut ResourceSubscription {
        &mut self.subscription
    }

    /// Current picker rows. Empty while the collection is absent, fetching
    /// or errored.
    pub fn items(&mut self, current_model: Option<&MainModel>) -> Arc<Vec<PickerItem>> {
        let collection = self.subscription.current().collection();
        let signal = current_model.map(|m| m.base_model.as_str());

        if let Some(memo) = &self.memo {
            if memo.matches(&collection, signal) {
                return Arc::clone(&memo.items);
            }
        }

        let items = Arc::new(match &collection {
            Some(records) => compute_picker_items(records, current_model),
            None => Vec::new(),
        });
        self.memo = Some(Memo {
            collection,
            signal: signal.map(str::to_owned),
            items: Arc::clone(&items),
        });
        items
    }

    /// Whether the view has rows at all, given the current model.
    pub fn is_empty(&mut self, current_model: Option<&MainModel>) -> bool {
        self.items(current_model).is_empty()
    }

    /// Current rows matching `query`.
    pub fn filter(&mut self, current_model: Option<&MainModel>, query: &str) -> Vec<PickerItem> {
        filter_items(&self.items(current_model), query)
    }

    /// Commit a selection event to `on_select`. An empty selection is a
    /// no-op, not a clear.
    pub fn select(&self, chosen: &[String], on_select: impl FnOnce(&str)) {
        if let Some(value) = commit_selection(chosen) {
            on_select(value);
        }
    }
}
