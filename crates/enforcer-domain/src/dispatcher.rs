//! Runs configured rules against one shared context and folds the outcomes into a report.

use crate::context::RuleExecutionContext;
use crate::policy::{Execution, FailurePolicy};
use crate::report::{ReportBuilder, RuleResult, ViolationReport};
use crate::rule::{ConfiguredRule, RuleError, RuleOutcome};
use enforcer_types::{RuleStatus, Severity, Violation};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

const DEFAULT_FAILURE: &str = "rule failed without a message";
const DEFAULT_WARNING: &str = "rule reported a warning without a message";

#[derive(Clone, Copy, Debug, Default)]
pub struct RuleDispatcher {
    policy: FailurePolicy,
    execution: Execution,
}

impl RuleDispatcher {
    pub fn new(policy: FailurePolicy, execution: Execution) -> Self {
        Self { policy, execution }
    }

    /// Run every rule once and return exactly one outcome per rule, in the order given.
    ///
    /// Nothing a rule does escapes this call: errors and panics become fail-severity
    /// violations attributed to that rule.
    pub fn dispatch(&self, rules: &[ConfiguredRule], ctx: &RuleExecutionContext) -> ViolationReport {
        tracing::debug!(
            rules = rules.len(),
            policy = self.policy.as_str(),
            execution = self.execution.as_str(),
            "dispatching rules"
        );

        let mut builder = ReportBuilder::default();
        match (self.policy, self.execution) {
            // Fail-fast needs to observe each outcome before starting the next rule.
            (FailurePolicy::FailFast, _) => {
                let mut stopped = false;
                for rule in rules {
                    if stopped {
                        tracing::debug!(rule = rule.id(), "skipped after earlier failure");
                        builder.push(RuleResult::skipped(rule.id()));
                        continue;
                    }
                    let result = run_one(rule, ctx);
                    stopped = result.status == RuleStatus::Failed;
                    builder.push(result);
                }
            }
            (FailurePolicy::Accumulate, Execution::Sequential) => {
                for rule in rules {
                    builder.push(run_one(rule, ctx));
                }
            }
            (FailurePolicy::Accumulate, Execution::Parallel) => {
                let results: Vec<RuleResult> =
                    rules.par_iter().map(|rule| run_one(rule, ctx)).collect();
                for result in results {
                    builder.push(result);
                }
            }
        }

        let report = builder.finish();
        tracing::info!(
            violations = report.violations().len(),
            build_should_fail = report.build_should_fail(),
            "enforcement pass finished"
        );
        report
    }
}

fn run_one(configured: &ConfiguredRule, ctx: &RuleExecutionContext) -> RuleResult {
    let id = configured.id();
    let rule_ctx = ctx.for_rule(id);
    let _span = tracing::debug_span!("rule", id).entered();

    let caught = catch_unwind(AssertUnwindSafe(|| configured.rule.execute(&rule_ctx)));

    let violations = match caught {
        Ok(Ok(RuleOutcome::Passed)) => Vec::new(),
        Ok(Ok(RuleOutcome::Warned(messages))) => messages_or(messages, DEFAULT_WARNING)
            .into_iter()
            .map(|m| Violation::new(id, Severity::Warn, m))
            .collect(),
        Ok(Ok(RuleOutcome::Failed(messages))) => {
            let severity = configured.level.severity();
            messages_or(messages, DEFAULT_FAILURE)
                .into_iter()
                .map(|m| Violation::new(id, severity, m))
                .collect()
        }
        Ok(Err(RuleError::Lookup(err))) => {
            tracing::warn!(rule = id, error = %err, "component lookup failed");
            vec![
                Violation::new(
                    id,
                    configured.level.severity(),
                    "rule could not obtain a required build component",
                )
                .with_cause(err.to_string()),
            ]
        }
        Ok(Err(RuleError::Internal(err))) => {
            let chain = format!("{err:#}");
            tracing::error!(rule = id, error = %chain, "rule raised an unexpected error");
            vec![
                Violation::new(id, Severity::Fail, "rule failed with an unexpected error")
                    .with_cause(chain),
            ]
        }
        Err(payload) => {
            let cause = panic_message(payload.as_ref());
            tracing::error!(rule = id, cause = %cause, "rule panicked");
            vec![Violation::new(id, Severity::Fail, "rule panicked").with_cause(cause)]
        }
    };

    let status = status_for(&violations);
    tracing::debug!(rule = id, ?status, "rule finished");
    RuleResult {
        rule_id: id.to_string(),
        status,
        violations,
    }
}

fn messages_or(messages: Vec<String>, default: &str) -> Vec<String> {
    if messages.is_empty() {
        vec![default.to_string()]
    } else {
        messages
    }
}

fn status_for(violations: &[Violation]) -> RuleStatus {
    match violations.iter().map(|v| v.severity).max() {
        None => RuleStatus::Passed,
        Some(Severity::Warn) => RuleStatus::Warned,
        Some(Severity::Fail) => RuleStatus::Failed,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
