use crate::{RenderableReport, RenderableRuleStatus, RenderableSeverity, RenderableVerdictStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Enforcer report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    };
    let fails = report
        .violations
        .iter()
        .filter(|v| v.severity == RenderableSeverity::Fail)
        .count();
    out.push_str(&format!(
        "- Project: `{}`\n- Verdict: **{}**\n- Violations: {} ({} fail, {} warn)\n\n",
        report.project,
        verdict,
        report.violations.len(),
        fails,
        report.violations.len() - fails
    ));

    if !report.rules.is_empty() {
        out.push_str("## Rules\n\n| rule | status |\n|---|---|\n");
        for r in &report.rules {
            let status = match r.status {
                RenderableRuleStatus::Passed => "passed",
                RenderableRuleStatus::Warned => "warned",
                RenderableRuleStatus::Failed => "failed",
                RenderableRuleStatus::Skipped => "skipped",
            };
            out.push_str(&format!("| `{}` | {} |\n", r.rule_id, status));
        }
        out.push('\n');
    }

    if report.violations.is_empty() {
        out.push_str("No violations.\n");
        return out;
    }

    out.push_str("## Violations\n\n");

    for v in &report.violations {
        let sev = match v.severity {
            RenderableSeverity::Warn => "WARN",
            RenderableSeverity::Fail => "FAIL",
        };

        // First line is the headline; any further lines (paths, details) are indented below it.
        let mut lines = v.message.lines();
        let headline = lines.next().unwrap_or("");
        out.push_str(&format!("- [{}] `{}`: {}\n", sev, v.rule_id, headline));
        for line in lines {
            out.push_str(&format!("  - {}\n", line.trim()));
        }
        if let Some(cause) = &v.cause {
            out.push_str(&format!("  - cause: {}\n", cause));
        }
    }

    out
}
