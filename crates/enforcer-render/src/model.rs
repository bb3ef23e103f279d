#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableSeverity {
    Warn,
    Fail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdictStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableRuleStatus {
    Passed,
    Warned,
    Failed,
    Skipped,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableViolation {
    pub severity: RenderableSeverity,
    pub rule_id: String,
    pub message: String,
    pub cause: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableRule {
    pub rule_id: String,
    pub status: RenderableRuleStatus,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdictStatus,
    pub project: String,
    /// File annotations point at, when known.
    pub project_file: Option<String>,
    pub rules: Vec<RenderableRule>,
    pub violations: Vec<RenderableViolation>,
}
