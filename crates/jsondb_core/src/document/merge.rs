//! Recursive merge.

use serde_json::Value;

/// Deep-merges `patch` into `target`.
///
/// Objects merge key by key, recursively. Everything else, arrays
/// included, replaces the target value: merging `{"tags": [1, 2]}` into
/// `{"tags": [3]}` yields `{"tags": [1, 2]}`.
pub fn deep_merge(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (slot, patch) => *slot = patch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn scalars_overwrite_and_objects_merge() {
        let mut target = json!({
            "name": "Bulbasaur",
            "stats": {"hp": 45, "atk": 49},
            "level": 5
        });
        deep_merge(&mut target, json!({"level": 6, "stats": {"hp": 50}}));

        assert_eq!(
            target,
            json!({
                "name": "Bulbasaur",
                "stats": {"hp": 50, "atk": 49},
                "level": 6
            })
        );
    }

    #[test]
    fn arrays_are_replaced() {
        let mut target = json!({"tags": [3]});
        deep_merge(&mut target, json!({"tags": [1, 2]}));
        assert_eq!(target, json!({"tags": [1, 2]}));
    }

    #[test]
    fn object_replaces_scalar_and_back() {
        let mut target = json!({"a": 1, "b": {"c": 2}});
        deep_merge(&mut target, json!({"a": {"x": 1}, "b": null}));
        assert_eq!(target, json!({"a": {"x": 1}, "b": null}));
    }

    #[test]
    fn non_object_patch_replaces_root() {
        let mut target = json!({"a": 1});
        deep_merge(&mut target, json!("flat"));
        assert_eq!(target, json!("flat"));
    }

    proptest! {
        #[test]
        fn merging_into_empty_object_is_identity(
            entries in prop::collection::btree_map("[a-z]{1,4}", any::<i32>(), 0..8)
        ) {
            let patch: Value = entries.into_iter().map(|(k, v)| (k, json!(v))).collect::<serde_json::Map<_, _>>().into();
            let mut target = json!({});
            deep_merge(&mut target, patch.clone());
            prop_assert_eq!(target, patch);
        }

        #[test]
        fn merge_is_idempotent(
            base in prop::collection::btree_map("[a-z]{1,3}", any::<i16>(), 0..6),
            patch in prop::collection::btree_map("[a-z]{1,3}", any::<i16>(), 0..6),
        ) {
            let to_value = |m: std::collections::BTreeMap<String, i16>| -> Value {
                Value::Object(m.into_iter().map(|(k, v)| (k, json!({"n": v}))).collect())
            };
            let patch = to_value(patch);
            let mut once = to_value(base);
            deep_merge(&mut once, patch.clone());
            let mut twice = once.clone();
            deep_merge(&mut twice, patch);
            prop_assert_eq!(once, twice);
        }
    }
}
