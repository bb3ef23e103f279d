use enforcer_types::Severity;

/// Configured strictness of a rule: what a declared failure turns into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnforcementLevel {
    Fail,
    Warn,
}

impl EnforcementLevel {
    pub fn severity(self) -> Severity {
        match self {
            EnforcementLevel::Fail => Severity::Fail,
            EnforcementLevel::Warn => Severity::Warn,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Run every rule and report everything.
    #[default]
    Accumulate,
    /// Stop at the first fail-severity violation; later rules are recorded as skipped.
    FailFast,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    #[default]
    Sequential,
    Parallel,
}

impl FailurePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            FailurePolicy::Accumulate => "accumulate",
            FailurePolicy::FailFast => "fail_fast",
        }
    }
}

impl Execution {
    pub fn as_str(self) -> &'static str {
        match self {
            Execution::Sequential => "sequential",
            Execution::Parallel => "parallel",
        }
    }
}

/// One configured rule instance. Which fields matter depends on `kind`.
#[derive(Clone, Debug)]
pub struct RuleSpec {
    /// Instance id reported in violations; defaults to the kind.
    pub id: String,
    pub kind: String,
    pub level: EnforcementLevel,
    /// User-supplied headline shown above (or instead of) the rule's own text.
    pub message: Option<String>,
    pub allow: Vec<String>,

    pub banned: Vec<String>,
    pub transitive: bool,
    pub scope: Option<String>,
    pub property: Option<String>,
    pub regex: Option<String>,
    pub no_snapshots: bool,
}

impl RuleSpec {
    pub fn new(kind: &str, level: EnforcementLevel) -> Self {
        Self {
            id: kind.to_string(),
            kind: kind.to_string(),
            level,
            message: None,
            allow: Vec::new(),
            banned: Vec::new(),
            transitive: true,
            scope: None,
            property: None,
            regex: None,
            no_snapshots: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    pub failure_policy: FailurePolicy,
    pub execution: Execution,
    /// In configured order; disabled rules are already dropped.
    pub rules: Vec<RuleSpec>,
}
