use crate::{model::EnforcerConfigV1, model::RuleConfig, model::SCHEMA_CONFIG_V1, presets};
use anyhow::Context;
use enforcer_domain::policy::{EffectiveConfig, EnforcementLevel, Execution, FailurePolicy, RuleSpec};
use globset::Glob;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub fail_fast: Option<bool>,
    pub parallel: Option<bool>,
    /// `-D` properties; win over `[properties]` in the config file.
    pub properties: BTreeMap<String, String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
    pub user_properties: BTreeMap<String, String>,
}

pub fn resolve_config(
    cfg: EnforcerConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref() {
        anyhow::ensure!(
            schema == SCHEMA_CONFIG_V1,
            "unsupported config schema: '{schema}' (expected '{SCHEMA_CONFIG_V1}')"
        );
    }

    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut effective = presets::preset(&profile)
        .with_context(|| format!("unknown profile: {profile} (expected strict|warn)"))?;
    let default_level = presets::default_level(&profile);

    if overrides.fail_fast.or(cfg.fail_fast).unwrap_or(false) {
        effective.failure_policy = FailurePolicy::FailFast;
    }

    if let Some(execution) = cfg.execution.as_deref() {
        effective.execution = parse_execution(execution)?;
    }
    if let Some(parallel) = overrides.parallel {
        effective.execution = if parallel {
            Execution::Parallel
        } else {
            Execution::Sequential
        };
    }

    // per-rule overrides, in file order
    let mut declared = BTreeSet::new();
    for rc in &cfg.rules {
        let id = rc.id.clone().unwrap_or_else(|| rc.kind.clone());
        if !declared.insert(id.clone()) {
            anyhow::bail!("duplicate rule id: {id}");
        }
        if !is_known_kind(&rc.kind) {
            anyhow::bail!(
                "unknown rule kind: {} (rule '{id}'; expected one of {})",
                rc.kind,
                enforcer_domain::KNOWN_KINDS.join("|")
            );
        }

        let existing = effective.rules.iter().position(|r| r.id == id);
        if !rc.enabled.unwrap_or(true) {
            if let Some(at) = existing {
                effective.rules.remove(at);
            }
            continue;
        }

        match existing {
            Some(at) => {
                let current = effective.rules.remove(at);
                // A profile rule reused under another kind starts from scratch.
                let base = if current.kind == rc.kind {
                    current
                } else {
                    RuleSpec::new(&rc.kind, default_level)
                };
                let spec = apply_rule_config(base, &id, rc, &profile, default_level)?;
                effective.rules.insert(at, spec);
            }
            None => {
                let base = RuleSpec::new(&rc.kind, default_level);
                let spec = apply_rule_config(base, &id, rc, &profile, default_level)?;
                effective.rules.push(spec);
            }
        }
    }

    // Catch anything rule construction itself would refuse.
    enforcer_domain::build_rules(&effective).context("invalid rule configuration")?;

    let mut user_properties = cfg.properties;
    user_properties.extend(overrides.properties);

    Ok(ResolvedConfig {
        effective,
        user_properties,
    })
}

fn apply_rule_config(
    mut spec: RuleSpec,
    id: &str,
    rc: &RuleConfig,
    profile: &str,
    default_level: EnforcementLevel,
) -> anyhow::Result<RuleSpec> {
    spec.id = id.to_string();
    spec.kind = rc.kind.clone();

    if let Some(level) = rc.level.as_deref() {
        spec.level = parse_level(level).with_context(|| format!("invalid level for {id}"))?;
    }
    // The warn profile never fails the build.
    if profile == "warn" {
        spec.level = default_level;
    }

    if rc.message.is_some() {
        spec.message = rc.message.clone();
    }
    if !rc.allow.is_empty() {
        validate_globs(id, "allow", &rc.allow)?;
        spec.allow = rc.allow.clone();
    }
    if !rc.banned.is_empty() {
        validate_globs(id, "banned", &rc.banned)?;
        spec.banned = rc.banned.clone();
    }
    if let Some(transitive) = rc.transitive {
        spec.transitive = transitive;
    }
    if rc.scope.is_some() {
        spec.scope = rc.scope.clone();
    }
    if rc.property.is_some() {
        spec.property = rc.property.clone();
    }
    if let Some(pattern) = rc.regex.as_deref() {
        Regex::new(pattern).with_context(|| format!("invalid regex for {id}: {pattern}"))?;
        spec.regex = Some(pattern.to_string());
    }
    if let Some(no_snapshots) = rc.no_snapshots {
        spec.no_snapshots = no_snapshots;
    }
    Ok(spec)
}

fn is_known_kind(kind: &str) -> bool {
    enforcer_domain::KNOWN_KINDS.contains(&kind)
}

fn validate_globs(rule_id: &str, field: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern)
            .with_context(|| format!("invalid {field} glob for {rule_id}: {pattern}"))?;
    }
    Ok(())
}

fn parse_level(v: &str) -> anyhow::Result<EnforcementLevel> {
    match v {
        "fail" | "error" => Ok(EnforcementLevel::Fail),
        "warn" | "warning" => Ok(EnforcementLevel::Warn),
        other => anyhow::bail!("unknown level: {other} (expected fail|warn)"),
    }
}

fn parse_execution(v: &str) -> anyhow::Result<Execution> {
    match v {
        "sequential" => Ok(Execution::Sequential),
        "parallel" => Ok(Execution::Parallel),
        other => anyhow::bail!("unknown execution: {other} (expected sequential|parallel)"),
    }
}
