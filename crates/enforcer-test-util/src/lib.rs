//! Shared test utilities for the enforcer workspace.
//!
//! Used by the app and CLI test suites; kept out of `#[cfg(test)]` so both crates can share one
//! copy.

use serde_json::Value;

/// The classic convergence failure: `libB` is reached at 2.0 through `libC` and at 3.0 through
/// `libD`.
pub const DIAMOND_PROJECT: &str = r#"
[project]
coordinate = "org:app:1.2.3"

[properties]
encoding = "UTF-8"

[[dependencies]]
coordinate = "org:libA:1.0"

[artifacts]
"org:libA:1.0" = ["org:libC:1.0", "org:libD:1.0"]
"org:libC:1.0" = ["org:libB:2.0"]
"org:libD:1.0" = ["org:libB:3.0"]
"org:libB:2.0" = []
"org:libB:3.0" = []
"#;

/// Same shape as [`DIAMOND_PROJECT`], but both paths agree on `libB`.
pub const CONVERGENT_PROJECT: &str = r#"
[project]
coordinate = "org:app:1.2.3"

[[dependencies]]
coordinate = "org:libA:1.0"

[artifacts]
"org:libA:1.0" = ["org:libC:1.0", "org:libD:1.0"]
"org:libC:1.0" = ["org:libB:2.0"]
"org:libD:1.0" = ["org:libB:2.0"]
"org:libB:2.0" = []
"#;

/// Normalize non-deterministic JSON fields for golden comparison.
///
/// `tool.version` is replaced with `"__VERSION__"` only when the root object looks like a report
/// envelope (`schema`, `tool`, `verdict`, `violations` all present). Timestamp keys are replaced
/// at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = obj.contains_key("schema")
            && obj.contains_key("tool")
            && obj.contains_key("verdict")
            && obj.contains_key("violations");
        if is_envelope
            && let Some(tool) = obj.get_mut("tool")
            && let Some(tool_obj) = tool.as_object_mut()
            && tool_obj.contains_key("version")
        {
            tool_obj.insert(
                "version".to_string(),
                Value::String("__VERSION__".to_string()),
            );
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["started_at", "finished_at"] {
                if map.contains_key(key) {
                    map.insert(key.to_string(), Value::String("__TIMESTAMP__".to_string()));
                }
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}
