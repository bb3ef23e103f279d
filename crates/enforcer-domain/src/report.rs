use crate::fingerprint::fingerprint_for_violation;
use enforcer_types::{RuleRecord, RuleStatus, Severity, SeverityCounts, Verdict, Violation};

/// Everything one enforcement pass produced, in configured rule order.
///
/// Built only by the dispatcher; read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViolationReport {
    violations: Vec<Violation>,
    rules: Vec<RuleRecord>,
}

impl ViolationReport {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// One record per configured rule, skipped ones included.
    pub fn rules(&self) -> &[RuleRecord] {
        &self.rules
    }

    /// True iff any recorded violation has fail severity.
    pub fn build_should_fail(&self) -> bool {
        self.violations.iter().any(|v| v.severity == Severity::Fail)
    }

    pub fn verdict(&self) -> Verdict {
        compute_verdict(&self.violations)
    }

    pub fn counts(&self) -> SeverityCounts {
        SeverityCounts::from_violations(&self.violations)
    }

    pub fn into_parts(self) -> (Vec<RuleRecord>, Vec<Violation>) {
        (self.rules, self.violations)
    }
}

fn compute_verdict(violations: &[Violation]) -> Verdict {
    if violations.iter().any(|v| v.severity == Severity::Fail) {
        return Verdict::Fail;
    }
    if violations.iter().any(|v| v.severity == Severity::Warn) {
        return Verdict::Warn;
    }
    Verdict::Pass
}

/// The per-rule result the dispatcher folds into a report.
#[derive(Clone, Debug)]
pub(crate) struct RuleResult {
    pub rule_id: String,
    pub status: RuleStatus,
    pub violations: Vec<Violation>,
}

impl RuleResult {
    pub fn skipped(rule_id: &str) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            status: RuleStatus::Skipped,
            violations: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ReportBuilder {
    report: ViolationReport,
}

impl ReportBuilder {
    pub fn push(&mut self, result: RuleResult) {
        self.report.rules.push(RuleRecord {
            rule_id: result.rule_id,
            status: result.status,
            violations: result.violations.len() as u32,
        });
        for mut v in result.violations {
            let severity = match v.severity {
                Severity::Warn => "warn",
                Severity::Fail => "fail",
            };
            v.fingerprint = Some(fingerprint_for_violation(&v.rule_id, severity, &v.message));
            self.report.violations.push(v);
        }
    }

    pub fn finish(self) -> ViolationReport {
        self.report
    }
}
