//! Report IO and conversion to the renderer's flattened view.

use anyhow::Context;
use enforcer_render::{
    RenderableReport, RenderableRule, RenderableRuleStatus, RenderableSeverity,
    RenderableVerdictStatus, RenderableViolation,
};
use enforcer_types::{EnforcerReport, RuleStatus, SCHEMA_REPORT_V1, Severity, Verdict};

pub fn parse_report_json(text: &str) -> anyhow::Result<EnforcerReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: '{schema}' (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse enforcer report")
}

pub fn serialize_report(report: &EnforcerReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &EnforcerReport, project_file: Option<&str>) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdictStatus::Pass,
            Verdict::Warn => RenderableVerdictStatus::Warn,
            Verdict::Fail => RenderableVerdictStatus::Fail,
        },
        project: report.data.project.clone(),
        project_file: project_file.map(str::to_string),
        rules: report
            .rules
            .iter()
            .map(|r| RenderableRule {
                rule_id: r.rule_id.clone(),
                status: match r.status {
                    RuleStatus::Passed => RenderableRuleStatus::Passed,
                    RuleStatus::Warned => RenderableRuleStatus::Warned,
                    RuleStatus::Failed => RenderableRuleStatus::Failed,
                    RuleStatus::Skipped => RenderableRuleStatus::Skipped,
                },
            })
            .collect(),
        violations: report
            .violations
            .iter()
            .map(|v| RenderableViolation {
                severity: match v.severity {
                    Severity::Warn => RenderableSeverity::Warn,
                    Severity::Fail => RenderableSeverity::Fail,
                },
                rule_id: v.rule_id.clone(),
                message: v.message.clone(),
                cause: v.cause.clone(),
            })
            .collect(),
    }
}
