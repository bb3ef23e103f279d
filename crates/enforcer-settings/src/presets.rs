use enforcer_domain::policy::{EffectiveConfig, EnforcementLevel, Execution, FailurePolicy, RuleSpec};
use enforcer_types::ids;

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into `enforcer.toml`.
pub fn preset(profile: &str) -> Option<EffectiveConfig> {
    match profile {
        "strict" => Some(profile_with("strict", EnforcementLevel::Fail)),
        "warn" => Some(profile_with("warn", EnforcementLevel::Warn)),
        _ => None,
    }
}

pub fn default_level(profile: &str) -> EnforcementLevel {
    match profile {
        "warn" => EnforcementLevel::Warn,
        _ => EnforcementLevel::Fail,
    }
}

fn profile_with(name: &str, level: EnforcementLevel) -> EffectiveConfig {
    EffectiveConfig {
        profile: name.to_string(),
        failure_policy: FailurePolicy::Accumulate,
        execution: Execution::Sequential,
        rules: vec![
            RuleSpec::new(ids::RULE_DEPENDENCY_CONVERGENCE, level),
            RuleSpec::new(ids::RULE_NO_DEPENDENCY_CYCLES, level),
        ],
    }
}
