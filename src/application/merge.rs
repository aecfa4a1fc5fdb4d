//! Merging per-chunk partial results
//!
//! The merge is scenario-agnostic: it only inspects the JSON shape of each
//! field. Lists concatenate in chunk order; objects shallow-merge with later
//! chunks overwriting earlier ones on key collision (an explicit tie-break,
//! not an accident); `null` is skipped; anything else, including a value
//! whose shape disagrees with what has accumulated so far, replaces the
//! accumulated value.

use serde_json::Value;

use crate::domain::result::ScenarioPartial;

/// Combine chunk partials, in chunk order, into one partial
pub fn merge_partials(partials: &[ScenarioPartial]) -> ScenarioPartial {
    let mut merged = ScenarioPartial::new();

    for partial in partials {
        for (key, value) in &partial.fields {
            match value {
                Value::Null => {}
                Value::Array(items) => match merged.fields.get_mut(key) {
                    Some(Value::Array(acc)) => acc.extend(items.iter().cloned()),
                    _ => {
                        merged.fields.insert(key.clone(), value.clone());
                    }
                },
                Value::Object(entries) => match merged.fields.get_mut(key) {
                    Some(Value::Object(acc)) => {
                        for (k, v) in entries {
                            acc.insert(k.clone(), v.clone());
                        }
                    }
                    _ => {
                        merged.fields.insert(key.clone(), value.clone());
                    }
                },
                scalar => {
                    merged.fields.insert(key.clone(), scalar.clone());
                }
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::result::field;
    use serde_json::json;

    fn partial(key: &str, value: Value) -> ScenarioPartial {
        ScenarioPartial::new().with_field(key, value)
    }

    #[test]
    fn test_lists_concatenate_in_order() {
        let merged = merge_partials(&[
            partial(field::SECRETS, json!([{"value": "a"}])),
            partial(field::SECRETS, json!([{"value": "b"}, {"value": "c"}])),
            partial(field::SECRETS, json!([{"value": "d"}])),
        ]);

        assert_eq!(
            merged.fields[field::SECRETS],
            json!([{"value": "a"}, {"value": "b"}, {"value": "c"}, {"value": "d"}])
        );
    }

    #[test]
    fn test_objects_shallow_merge_later_wins() {
        let merged = merge_partials(&[
            partial(field::CUSTOM_FINDINGS, json!({"a": 1, "shared": "first"})),
            partial(field::CUSTOM_FINDINGS, json!({"b": 2, "shared": "second"})),
        ]);

        assert_eq!(
            merged.fields[field::CUSTOM_FINDINGS],
            json!({"a": 1, "b": 2, "shared": "second"})
        );
    }

    #[test]
    fn test_field_absent_from_all_partials_is_omitted() {
        let merged = merge_partials(&[
            partial(field::SECRETS, json!([])),
            partial(field::SECRETS, json!([])),
        ]);

        assert!(merged.fields.contains_key(field::SECRETS));
        assert!(!merged.fields.contains_key(field::VULNERABILITIES));
    }

    #[test]
    fn test_null_is_skipped() {
        let merged = merge_partials(&[
            partial(field::CUSTOM_FINDINGS, json!({"a": 1})),
            partial(field::CUSTOM_FINDINGS, Value::Null),
        ]);

        assert_eq!(merged.fields[field::CUSTOM_FINDINGS], json!({"a": 1}));
    }

    #[test]
    fn test_shape_mismatch_replaces_accumulator() {
        let merged = merge_partials(&[
            partial(field::CUSTOM_FINDINGS, json!([1, 2])),
            partial(field::CUSTOM_FINDINGS, json!({"k": "v"})),
        ]);

        assert_eq!(merged.fields[field::CUSTOM_FINDINGS], json!({"k": "v"}));
    }

    #[test]
    fn test_empty_input_merges_to_empty() {
        assert!(merge_partials(&[]).is_empty());
    }
}
