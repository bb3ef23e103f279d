//! Rule evaluation over a resolved dependency graph (no IO).
//!
//! Input: a graph and an expression snapshot wrapped in a [`RuleExecutionContext`], plus the
//! configured rules.
//! Output: a [`ViolationReport`] with exactly one outcome per configured rule.

#![forbid(unsafe_code)]

pub mod context;
pub mod policy;
pub mod report;
pub mod rule;

pub mod checks;
mod dispatcher;
mod fingerprint;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use context::{
    ComponentLookup, ComponentLookupError, ComponentRegistry, LogLevel, LogSink,
    RuleExecutionContext, RuleLog, TracingSink,
};
pub use checks::{KNOWN_KINDS, RuleConfigError, build_rule, build_rules};
pub use dispatcher::RuleDispatcher;
pub use policy::{EffectiveConfig, EnforcementLevel, Execution, FailurePolicy, RuleSpec};
pub use report::ViolationReport;
pub use rule::{ConfiguredRule, Rule, RuleError, RuleOutcome};

/// Build the configured rules and run them once against `ctx`.
pub fn enforce(
    cfg: &EffectiveConfig,
    ctx: &RuleExecutionContext,
) -> Result<ViolationReport, RuleConfigError> {
    let rules = build_rules(cfg)?;
    let dispatcher = RuleDispatcher::new(cfg.failure_policy, cfg.execution);
    Ok(dispatcher.dispatch(&rules, ctx))
}
