//! Structural merging of configuration fragments
//!
//! Fragments merge left to right: later fragments override earlier ones at
//! matching keys. Objects merge recursively; primitives and arrays are
//! replaced wholesale.

use serde_json::Value;

/// Merge `overlay` into `base` in place.
///
/// # Example
///
/// ```rust
/// use semioconnect::config::merge::deep_merge;
/// use serde_json::json;
///
/// let mut base = json!({ "a": 1, "x": { "a": 1 } });
/// deep_merge(&mut base, json!({ "b": 2, "x": { "b": 2 } }));
/// assert_eq!(base, json!({ "a": 1, "b": 2, "x": { "a": 1, "b": 2 } }));
/// ```
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => {
                        base_map.insert(key, overlay_value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Merge an ordered list of fragments into one value, later fragments winning.
#[must_use]
pub fn merge_all(fragments: Vec<Value>) -> Value {
    let mut merged = Value::Object(serde_json::Map::new());
    for fragment in fragments {
        deep_merge(&mut merged, fragment);
    }
    merged
}
