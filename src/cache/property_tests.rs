//! Property-Based Tests for the Cache and Key Encoding
//!
//! Uses proptest to verify the canonical-key and invalidation properties.

use proptest::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use serde_json::json;

use crate::cache::CacheStore;
use crate::params::Params;

// == Strategies ==
/// Generates parameter names
fn param_key_strategy() -> impl Strategy<Value = String> {
    "[a-z_]{1,12}".prop_map(|s| s)
}

/// Generates non-empty parameter values, including spaces to exercise
/// the urlencoding path
fn param_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,16}".prop_map(|s| s)
}

fn param_map_strategy() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(param_key_strategy(), param_value_strategy(), 1..8)
}

fn params_from(pairs: &[(String, String)]) -> Params {
    pairs
        .iter()
        .fold(Params::new(), |params, (key, value)| {
            params.set(key, value.as_str())
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Two insertions of the same key/value set, in any order, always
    // produce the same encoded key.
    #[test]
    fn prop_encode_is_permutation_invariant(
        (ordered, shuffled) in param_map_strategy().prop_flat_map(|map| {
            let pairs: Vec<(String, String)> = map.into_iter().collect();
            (Just(pairs.clone()), Just(pairs).prop_shuffle())
        })
    ) {
        let a = params_from(&ordered);
        let b = params_from(&shuffled);
        prop_assert_eq!(a.encode(), b.encode());
    }

    // Distinct key/value sets (with non-empty values, so the null/empty
    // coercion cannot be involved) produce distinct keys.
    #[test]
    fn prop_differing_maps_encode_differently(
        a in param_map_strategy(),
        b in param_map_strategy()
    ) {
        prop_assume!(a != b);

        let pa: Vec<(String, String)> = a.into_iter().collect();
        let pb: Vec<(String, String)> = b.into_iter().collect();
        prop_assert_ne!(params_from(&pa).encode(), params_from(&pb).encode());
    }

    // Encoding is stable across repeated calls.
    #[test]
    fn prop_encode_is_stable(map in param_map_strategy()) {
        let pairs: Vec<(String, String)> = map.into_iter().collect();
        let params = params_from(&pairs);
        prop_assert_eq!(params.encode(), params.encode());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // A freshly inserted entry with a generous TTL is always returned.
    #[test]
    fn prop_fresh_entry_roundtrip(
        key in "[a-z=&]{1,24}",
        payload in "[a-zA-Z0-9]{0,32}"
    ) {
        let mut store = CacheStore::new();
        store.insert(key.clone(), json!(payload), Duration::from_secs(3600));

        prop_assert_eq!(store.get_fresh(&key), Some(json!(payload)));
    }

    // Prefix invalidation removes exactly the keys a model predicts.
    #[test]
    fn prop_invalidate_prefix_matches_model(
        keys in prop::collection::hash_set("[a-z=&]{1,12}", 1..20),
        prefix in "[a-z=&]{0,4}"
    ) {
        let mut store = CacheStore::new();
        for key in &keys {
            store.insert(key.clone(), json!(1), Duration::from_secs(3600));
        }

        let expected: HashSet<String> = keys
            .iter()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect();

        let removed = store.invalidate_prefix(&prefix);

        prop_assert_eq!(removed, expected.len());
        for key in &keys {
            prop_assert_eq!(
                store.peek(key).is_some(),
                !expected.contains(key),
                "key: {}",
                key
            );
        }
    }

    // Invalidation with one key as prefix never removes keys it does not
    // prefix, and repeated invalidation is idempotent.
    #[test]
    fn prop_invalidate_is_idempotent(
        keys in prop::collection::hash_set("[a-z=&]{1,12}", 1..12),
        prefix in "[a-z=&]{1,6}"
    ) {
        let mut store = CacheStore::new();
        for key in &keys {
            store.insert(key.clone(), json!(1), Duration::from_secs(3600));
        }

        let first = store.invalidate_prefix(&prefix);
        let second = store.invalidate_prefix(&prefix);

        prop_assert!(first <= keys.len());
        prop_assert_eq!(second, 0);
    }
}
