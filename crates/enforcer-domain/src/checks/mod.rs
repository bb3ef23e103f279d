//! Built-in rule catalog.
//!
//! Each kind lives in its own module and is constructed from a [`RuleSpec`] by
//! [`build_rule`]. Construction is where parameters are validated; a built rule cannot be
//! misconfigured.

use crate::policy::{EffectiveConfig, RuleSpec};
use crate::rule::ConfiguredRule;
use enforcer_types::ids;

mod always;
mod banned_dependencies;
mod dependency_convergence;
mod no_dependency_cycles;
mod require_project_version;
mod require_property;
mod utils;

#[cfg(test)]
mod tests;

pub use always::{AlwaysFail, AlwaysPass};
pub use banned_dependencies::BannedDependencies;
pub use dependency_convergence::DependencyConvergence;
pub use no_dependency_cycles::NoDependencyCycles;
pub use require_project_version::RequireProjectVersion;
pub use require_property::RequireProperty;

#[derive(Debug, thiserror::Error)]
pub enum RuleConfigError {
    #[error("rule '{rule_id}': unknown rule kind '{kind}'")]
    UnknownKind { rule_id: String, kind: String },
    #[error("rule '{rule_id}': invalid glob '{pattern}'")]
    InvalidGlob {
        rule_id: String,
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("rule '{rule_id}': invalid regex '{pattern}'")]
    InvalidRegex {
        rule_id: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("rule '{rule_id}': missing required parameter '{parameter}'")]
    MissingParameter {
        rule_id: String,
        parameter: &'static str,
    },
    #[error("rule '{rule_id}': unknown scope '{scope}'")]
    InvalidScope { rule_id: String, scope: String },
}

/// Every kind [`build_rule`] understands.
pub const KNOWN_KINDS: &[&str] = &[
    ids::RULE_ALWAYS_PASS,
    ids::RULE_ALWAYS_FAIL,
    ids::RULE_DEPENDENCY_CONVERGENCE,
    ids::RULE_BANNED_DEPENDENCIES,
    ids::RULE_REQUIRE_PROPERTY,
    ids::RULE_REQUIRE_PROJECT_VERSION,
    ids::RULE_NO_DEPENDENCY_CYCLES,
];

pub fn build_rule(spec: &RuleSpec) -> Result<ConfiguredRule, RuleConfigError> {
    let level = spec.level;
    let rule = match spec.kind.as_str() {
        ids::RULE_ALWAYS_PASS => ConfiguredRule::new(AlwaysPass::new(&spec.id), level),
        ids::RULE_ALWAYS_FAIL => ConfiguredRule::new(AlwaysFail::from_spec(spec), level),
        ids::RULE_DEPENDENCY_CONVERGENCE => {
            ConfiguredRule::new(DependencyConvergence::from_spec(spec)?, level)
        }
        ids::RULE_BANNED_DEPENDENCIES => {
            ConfiguredRule::new(BannedDependencies::from_spec(spec)?, level)
        }
        ids::RULE_REQUIRE_PROPERTY => ConfiguredRule::new(RequireProperty::from_spec(spec)?, level),
        ids::RULE_REQUIRE_PROJECT_VERSION => {
            ConfiguredRule::new(RequireProjectVersion::from_spec(spec)?, level)
        }
        ids::RULE_NO_DEPENDENCY_CYCLES => {
            ConfiguredRule::new(NoDependencyCycles::from_spec(spec)?, level)
        }
        other => {
            return Err(RuleConfigError::UnknownKind {
                rule_id: spec.id.clone(),
                kind: other.to_string(),
            });
        }
    };
    Ok(rule)
}

/// Build every configured rule, in configured order.
pub fn build_rules(cfg: &EffectiveConfig) -> Result<Vec<ConfiguredRule>, RuleConfigError> {
    cfg.rules.iter().map(build_rule).collect()
}

fn compile_regex(rule_id: &str, pattern: &str) -> Result<regex::Regex, RuleConfigError> {
    regex::Regex::new(pattern).map_err(|source| RuleConfigError::InvalidRegex {
        rule_id: rule_id.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}
