//! JSON Schemas for the config file and the report, generated from the Rust types.

use anyhow::Context;
use enforcer_settings::EnforcerConfigV1;
use enforcer_types::EnforcerReport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaKind {
    Config,
    Report,
}

/// Pretty-printed JSON Schema document.
pub fn render_schema(kind: SchemaKind) -> anyhow::Result<String> {
    let schema = match kind {
        SchemaKind::Config => schemars::schema_for!(EnforcerConfigV1),
        SchemaKind::Report => schemars::schema_for!(EnforcerReport),
    };
    serde_json::to_string_pretty(&schema).context("serialize schema")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemas_are_json_objects_with_properties() {
        for (kind, field) in [(SchemaKind::Config, "rules"), (SchemaKind::Report, "violations")] {
            let text = render_schema(kind).expect("schema");
            let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
            assert!(
                value["properties"].get(field).is_some(),
                "{kind:?} schema lacks '{field}'"
            );
        }
    }
}
