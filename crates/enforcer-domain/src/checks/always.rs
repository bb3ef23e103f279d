use crate::context::RuleExecutionContext;
use crate::policy::RuleSpec;
use crate::rule::{Rule, RuleError, RuleOutcome};

const DEFAULT_MESSAGE: &str = "Always fails!";

#[derive(Clone, Debug)]
pub struct AlwaysPass {
    id: String,
}

impl AlwaysPass {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string() }
    }
}

impl Rule for AlwaysPass {
    fn id(&self) -> &str {
        &self.id
    }

    fn execute(&self, ctx: &RuleExecutionContext) -> Result<RuleOutcome, RuleError> {
        ctx.log().debug("always passes");
        Ok(RuleOutcome::Passed)
    }
}

/// Fails unconditionally. The configured message, if any, is the whole failure text.
#[derive(Clone, Debug)]
pub struct AlwaysFail {
    id: String,
    message: String,
}

impl AlwaysFail {
    pub fn new(id: &str, message: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            message: message.unwrap_or(DEFAULT_MESSAGE).to_string(),
        }
    }

    pub fn from_spec(spec: &RuleSpec) -> Self {
        Self::new(&spec.id, spec.message.as_deref())
    }
}

impl Rule for AlwaysFail {
    fn id(&self) -> &str {
        &self.id
    }

    fn execute(&self, _ctx: &RuleExecutionContext) -> Result<RuleOutcome, RuleError> {
        Ok(RuleOutcome::fail(self.message.clone()))
    }
}
