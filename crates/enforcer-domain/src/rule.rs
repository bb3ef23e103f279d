use crate::context::{ComponentLookupError, RuleExecutionContext};
use crate::policy::EnforcementLevel;

/// What a rule concluded about the build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleOutcome {
    Passed,
    /// Advisory only; recorded at warn severity whatever the configured level.
    Warned(Vec<String>),
    /// A declared rule failure; recorded at the configured level.
    Failed(Vec<String>),
}

impl RuleOutcome {
    pub fn fail(message: impl Into<String>) -> Self {
        RuleOutcome::Failed(vec![message.into()])
    }

    pub fn warn(message: impl Into<String>) -> Self {
        RuleOutcome::Warned(vec![message.into()])
    }

    /// `Passed` when there is nothing to report.
    pub fn failed_if_any(messages: Vec<String>) -> Self {
        if messages.is_empty() {
            RuleOutcome::Passed
        } else {
            RuleOutcome::Failed(messages)
        }
    }
}

/// Anything that stopped a rule from reaching a verdict on its own terms.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// A component the rule needs could not be obtained.
    #[error(transparent)]
    Lookup(#[from] ComponentLookupError),
    /// An unexpected defect inside the rule.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// A self-contained check run against a read-only execution context.
///
/// Rules are shared across threads when the dispatcher runs them in parallel; an implementation
/// holds only its own configuration.
pub trait Rule: Send + Sync {
    /// Instance id used in violations and logs.
    fn id(&self) -> &str;

    fn execute(&self, ctx: &RuleExecutionContext) -> Result<RuleOutcome, RuleError>;
}

/// A rule paired with the level its declared failures are recorded at.
pub struct ConfiguredRule {
    pub rule: Box<dyn Rule>,
    pub level: EnforcementLevel,
}

impl ConfiguredRule {
    pub fn new(rule: impl Rule + 'static, level: EnforcementLevel) -> Self {
        Self {
            rule: Box::new(rule),
            level,
        }
    }

    pub fn id(&self) -> &str {
        self.rule.id()
    }
}

impl std::fmt::Debug for ConfiguredRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredRule")
            .field("id", &self.rule.id())
            .field("level", &self.level)
            .finish()
    }
}
