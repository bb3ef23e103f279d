use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_CONFIG_V1: &str = "enforcer.config.v1";

/// `enforcer.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnforcerConfigV1 {
    /// Optional schema string for tooling (`enforcer.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `strict` (default) or `warn`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Stop at the first fail-severity violation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_fast: Option<bool>,

    /// `sequential` (default) or `parallel`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<String>,

    /// User properties. `-D name=value` on the command line takes precedence.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    /// Rule instances, run in the order listed after the profile's defaults.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleConfig {
    /// Built-in rule kind, e.g. `dependency_convergence`.
    pub kind: String,

    /// Instance id; defaults to the kind. Reusing a profile rule's id overrides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// `fail` or `warn`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Artifacts exempt from the rule (globs over `group:name[:version]`).
    #[serde(default)]
    pub allow: Vec<String>,

    /// `banned_dependencies`: patterns to reject.
    #[serde(default)]
    pub banned: Vec<String>,

    /// `banned_dependencies`: also check transitive dependencies (default true).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transitive: Option<bool>,

    /// `banned_dependencies`: check the graph restricted to this scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// `require_property`: property name or expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,

    /// `require_property` / `require_project_version`: pattern the value must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,

    /// `require_project_version`: reject `-SNAPSHOT` versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_snapshots: Option<bool>,
}
