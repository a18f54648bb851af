//! Deep merge for layered YAML configuration.
//!
//! Higher tiers override lower tiers field by field. Arrays are replaced
//! entirely, so a user-level `api_keys` list never accumulates project keys.

use serde_json::Value;

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
///
/// - Objects are merged recursively: keys in overlay override keys in base
/// - Arrays, strings, numbers, booleans are replaced entirely
/// - If overlay is null, the base value is preserved (null means "not specified")
///
/// # Example
/// ```
/// use serde_json::json;
/// use tasks_api::config::deep_merge;
///
/// let base = json!({
///     "server": { "port": 8080, "host": "127.0.0.1" },
///     "auth": { "api_keys": ["a", "b"] }
/// });
/// let overlay = json!({
///     "server": { "port": 9000 },
///     "auth": { "api_keys": ["c"] }
/// });
/// let result = deep_merge(base, overlay);
/// assert_eq!(result["server"]["host"], "127.0.0.1");
/// assert_eq!(result["server"]["port"], 9000);
/// assert_eq!(result["auth"]["api_keys"], json!(["c"]));
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged_value = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged_value);
            }
            Value::Object(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Merge multiple values in order, with later values taking precedence.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_sections_merge_field_by_field() {
        let base = json!({
            "server": {"host": "127.0.0.1", "port": 8080, "db_path": "tasks.db"},
        });
        let overlay = json!({
            "server": {"port": 9000}
        });
        let result = deep_merge(base, overlay);
        assert_eq!(
            result,
            json!({"server": {"host": "127.0.0.1", "port": 9000, "db_path": "tasks.db"}})
        );
    }

    #[test]
    fn key_lists_are_replaced_not_concatenated() {
        let base = json!({"auth": {"api_keys": ["a", "b"], "header": "X-API-KEY"}});
        let overlay = json!({"auth": {"api_keys": ["c"]}});
        let result = deep_merge(base, overlay);
        assert_eq!(result["auth"]["api_keys"], json!(["c"]));
        assert_eq!(result["auth"]["header"], "X-API-KEY");
    }

    #[test]
    fn null_overlay_keeps_base() {
        let base = json!({"server": {"port": 8080}});
        let overlay = json!({"server": null});
        assert_eq!(deep_merge(base.clone(), overlay), base);
    }

    #[test]
    fn empty_yaml_document_is_a_no_op() {
        // An empty config.yaml parses to null.
        let base = json!({"server": {"port": 8080}});
        assert_eq!(deep_merge(base.clone(), Value::Null), base);
    }

    #[test]
    fn merge_all_applies_tiers_in_order() {
        let result = deep_merge_all(vec![
            json!({"server": {"port": 1, "host": "defaults"}}),
            json!({"server": {"port": 2}}),
            json!({"server": {"port": 3}}),
        ]);
        assert_eq!(result, json!({"server": {"port": 3, "host": "defaults"}}));
    }

    #[test]
    fn merge_all_of_nothing_is_null() {
        assert_eq!(deep_merge_all(Vec::new()), Value::Null);
    }
}
