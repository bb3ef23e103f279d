use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for enforcer reports.
pub const SCHEMA_REPORT_V1: &str = "enforcer.report.v1";

/// Severity is intentionally binary: a violation either fails the build or it doesn't.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warn,
    Fail,
}

/// One recorded rule outcome that failed or warned.
///
/// Created from a rule's outcome by the dispatcher and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,

    /// Rendered error chain for unexpected defects and lookup failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,

    /// Stable identifier intended for dedup and trending across runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

impl Violation {
    pub fn new(rule_id: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            cause: None,
            fingerprint: None,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

/// Terminal state of one configured rule within a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Passed,
    Warned,
    Failed,
    /// Not run because a fail-fast pass already failed.
    Skipped,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RuleRecord {
    pub rule_id: String,
    pub status: RuleStatus,
    pub violations: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SeverityCounts {
    pub warn: u32,
    pub fail: u32,
}

impl SeverityCounts {
    pub fn from_violations(violations: &[Violation]) -> Self {
        let mut counts = SeverityCounts::default();
        for v in violations {
            match v.severity {
                Severity::Warn => counts.warn += 1,
                Severity::Fail => counts.fail += 1,
            }
        }
        counts
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Enforcer-specific summary payload for the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct EnforcerData {
    /// Project coordinate the graph was rooted at.
    pub project: String,
    pub profile: String,
    pub failure_policy: String,
    pub execution: String,

    pub nodes_resolved: u32,
    pub rules_configured: u32,
}

/// The report envelope handed to the reporting layer.
///
/// Keeping this generic allows embedding tool-specific data while still enforcing a stable outer
/// shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = EnforcerData> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub counts: SeverityCounts,
    pub rules: Vec<RuleRecord>,
    pub violations: Vec<Violation>,
    pub data: TData,
}

pub type EnforcerReport = ReportEnvelope<EnforcerData>;
