//! Property-based tests for the dispatcher.
//!
//! These tests use proptest to verify invariants around:
//! - exactly one outcome per configured rule, whatever the rules do
//! - parallel execution producing the same report as sequential execution
//! - fail-fast only ever skipping rules after the first failure

use crate::dispatcher::RuleDispatcher;
use crate::policy::{EnforcementLevel, Execution, FailurePolicy};
use crate::rule::{ConfiguredRule, RuleOutcome};
use crate::test_support::{FnRule, context_for, graph_of};
use enforcer_types::{RuleStatus, Severity};
use proptest::prelude::*;

#[derive(Clone, Copy, Debug)]
enum Behavior {
    Pass,
    Warn,
    Fail,
    FailMany(u8),
    Error,
    Panic,
}

fn arb_behavior() -> impl Strategy<Value = Behavior> {
    prop_oneof![
        Just(Behavior::Pass),
        Just(Behavior::Warn),
        Just(Behavior::Fail),
        (0u8..4).prop_map(Behavior::FailMany),
        Just(Behavior::Error),
        Just(Behavior::Panic),
    ]
}

fn arb_level() -> impl Strategy<Value = EnforcementLevel> {
    prop_oneof![Just(EnforcementLevel::Fail), Just(EnforcementLevel::Warn)]
}

fn build(rules: &[(Behavior, EnforcementLevel)]) -> Vec<ConfiguredRule> {
    rules
        .iter()
        .enumerate()
        .map(|(i, (behavior, level))| {
            let behavior = *behavior;
            ConfiguredRule::new(
                FnRule::new(&format!("rule-{i}"), move |_| match behavior {
                    Behavior::Pass => Ok(RuleOutcome::Passed),
                    Behavior::Warn => Ok(RuleOutcome::warn("advisory")),
                    Behavior::Fail => Ok(RuleOutcome::fail("violated")),
                    Behavior::FailMany(n) => Ok(RuleOutcome::Failed(
                        (0..n).map(|k| format!("violation {k}")).collect(),
                    )),
                    Behavior::Error => Err(anyhow::anyhow!("defect").into()),
                    Behavior::Panic => panic!("defect"),
                }),
                *level,
            )
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn one_outcome_per_rule(
        rules in prop::collection::vec((arb_behavior(), arb_level()), 0..12),
        fail_fast in any::<bool>(),
    ) {
        let policy = if fail_fast { FailurePolicy::FailFast } else { FailurePolicy::Accumulate };
        let configured = build(&rules);
        let report = RuleDispatcher::new(policy, Execution::Sequential)
            .dispatch(&configured, &context_for(graph_of("org:app:1.0", &[])));

        prop_assert_eq!(report.rules().len(), rules.len());
        for (i, record) in report.rules().iter().enumerate() {
            let expected_id = format!("rule-{i}");
            prop_assert_eq!(&record.rule_id, &expected_id);
        }

        let fail_count = report.violations().iter().filter(|v| v.severity == Severity::Fail).count();
        prop_assert_eq!(report.build_should_fail(), fail_count > 0);
    }

    #[test]
    fn parallel_equals_sequential(
        rules in prop::collection::vec((arb_behavior(), arb_level()), 0..12),
    ) {
        let configured = build(&rules);
        let ctx = context_for(graph_of("org:app:1.0", &[]));
        let seq = RuleDispatcher::new(FailurePolicy::Accumulate, Execution::Sequential)
            .dispatch(&configured, &ctx);
        let par = RuleDispatcher::new(FailurePolicy::Accumulate, Execution::Parallel)
            .dispatch(&configured, &ctx);
        prop_assert_eq!(seq, par);
    }

    #[test]
    fn fail_fast_skips_only_after_first_failure(
        rules in prop::collection::vec((arb_behavior(), arb_level()), 0..12),
    ) {
        let configured = build(&rules);
        let report = RuleDispatcher::new(FailurePolicy::FailFast, Execution::Sequential)
            .dispatch(&configured, &context_for(graph_of("org:app:1.0", &[])));

        let first_failed = report.rules().iter().position(|r| r.status == RuleStatus::Failed);
        for (i, record) in report.rules().iter().enumerate() {
            let should_skip = first_failed.is_some_and(|f| i > f);
            prop_assert_eq!(record.status == RuleStatus::Skipped, should_skip);
        }
    }
}
