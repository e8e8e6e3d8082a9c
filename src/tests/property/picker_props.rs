//! Property-based tests for the embedding picker view
//!
//! Tests invariants:
//! - Output length never exceeds input length
//! - A row matching the selected base model is enabled with no tooltip
//! - Disabled rows always explain themselves with a tooltip
//! - Compatible rows form a prefix and input order survives within halves
//! - Identical inputs produce identical output
//! - Filtering returns an order-preserving subsequence

use proptest::prelude::*;

use crate::core::picker::{compute_picker_items, filter_items, MainModel, PickerItem};
use crate::core::resources::ResourceRecord;

// ============================================================================
// Strategies
// ============================================================================

fn arb_base_model() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("sd-1".to_string())),
        Just(Some("sd-2".to_string())),
        Just(Some("sdxl".to_string())),
        Just(Some("sdxl-refiner".to_string())),
        "[a-z]{2,8}".prop_map(Some),
    ]
}

fn arb_record() -> impl Strategy<Value = ResourceRecord> {
    ("[a-z0-9]{1,10}", "[A-Za-z0-9 ]{1,16}", arb_base_model()).prop_map(|(id, name, base)| {
        let record = ResourceRecord::new(id, name);
        match base {
            Some(base) => record.with_base_model(base),
            None => record,
        }
    })
}

fn arb_records() -> impl Strategy<Value = Vec<ResourceRecord>> {
    // Suffixing the position keeps ids unique, like the server would.
    prop::collection::vec(arb_record(), 0..24).prop_map(|mut records| {
        for (i, record) in records.iter_mut().enumerate() {
            record.id = format!("{}-{i}", record.id);
        }
        records
    })
}

fn arb_signal() -> impl Strategy<Value = Option<MainModel>> {
    prop_oneof![
        Just(None),
        arb_base_model().prop_map(|base| base.map(|base_model| MainModel { base_model })),
    ]
}

/// Values of `items` in order, split into (enabled, disabled).
fn split_values(items: &[PickerItem]) -> (Vec<String>, Vec<String>) {
    let enabled = items
        .iter()
        .filter(|item| !item.disabled)
        .map(|item| item.value.clone())
        .collect();
    let disabled = items
        .iter()
        .filter(|item| item.disabled)
        .map(|item| item.value.clone())
        .collect();
    (enabled, disabled)
}

proptest! {
    /// Property: output is bounded and every row is correctly annotated
    #[test]
    fn prop_output_bounded_and_annotated(
        records in arb_records(),
        signal in arb_signal()
    ) {
        let items = compute_picker_items(&records, signal.as_ref());
        prop_assert!(items.len() <= records.len());

        let current = signal.as_ref().map(|model| model.base_model.as_str());
        for item in &items {
            let record = records
                .iter()
                .find(|record| record.id == item.value)
                .expect("every row comes from a record");
            let compatible = record.base_model.as_deref() == current;
            prop_assert_eq!(
                item.disabled, !compatible,
                "row {} mislabeled against signal {:?}",
                item.value, current
            );
            // Tooltip appears exactly on disabled rows.
            prop_assert_eq!(item.disabled, item.tooltip.is_some());
        }
    }

    /// Property: compatible rows form a prefix, input order held per half
    #[test]
    fn prop_partition_is_stable(
        records in arb_records(),
        signal in arb_signal()
    ) {
        let items = compute_picker_items(&records, signal.as_ref());

        // No enabled row after the first disabled one.
        let first_disabled = items.iter().position(|item| item.disabled);
        if let Some(boundary) = first_disabled {
            prop_assert!(
                items[boundary..].iter().all(|item| item.disabled),
                "enabled row found after the disabled prefix boundary"
            );
        }

        // Within each half, the input order of ids is preserved.
        let current = signal.as_ref().map(|model| model.base_model.as_str());
        let expected_enabled: Vec<String> = records
            .iter()
            .filter(|record| record.base_model.as_deref() == current)
            .map(|record| record.id.clone())
            .collect();
        let expected_disabled: Vec<String> = records
            .iter()
            .filter(|record| record.base_model.as_deref() != current)
            .map(|record| record.id.clone())
            .collect();
        let (enabled, disabled) = split_values(&items);
        prop_assert_eq!(enabled, expected_enabled);
        prop_assert_eq!(disabled, expected_disabled);
    }

    /// Property: the view is a pure function of its inputs
    #[test]
    fn prop_recompute_is_idempotent(
        records in arb_records(),
        signal in arb_signal()
    ) {
        let first = compute_picker_items(&records, signal.as_ref());
        let second = compute_picker_items(&records, signal.as_ref());
        prop_assert_eq!(first, second);
    }

    /// Property: filtering yields an order-preserving subsequence
    #[test]
    fn prop_filter_is_an_ordered_subsequence(
        records in arb_records(),
        signal in arb_signal(),
        query in "[ ]{0,2}[a-zA-Z0-9]{0,6}[ ]{0,2}"
    ) {
        let items = compute_picker_items(&records, signal.as_ref());
        let hits = filter_items(&items, &query);

        prop_assert!(hits.len() <= items.len());

        // Every hit matches, case-insensitively, on label or value.
        let needle = query.trim().to_lowercase();
        for hit in &hits {
            prop_assert!(
                needle.is_empty()
                    || hit.label.to_lowercase().contains(&needle)
                    || hit.value.to_lowercase().contains(&needle)
            );
        }

        // Hits appear in the same order as in the unfiltered view.
        let mut cursor = items.iter();
        for hit in &hits {
            prop_assert!(
                cursor.any(|item| item == hit),
                "filter reordered or invented a row"
            );
        }

        // The trivial query is the identity.
        if needle.is_empty() {
            prop_assert_eq!(hits, items);
        }
    }
}
