use super::RuleConfigError;
use super::utils::{build_globset, coordinate_allowed, with_headline};
use crate::context::RuleExecutionContext;
use crate::policy::RuleSpec;
use crate::rule::{Rule, RuleError, RuleOutcome};
use enforcer_graph::NodeState;
use globset::GlobSet;

/// Flags every branch the resolver had to truncate because it led back to an ancestor.
#[derive(Clone, Debug)]
pub struct NoDependencyCycles {
    id: String,
    message: Option<String>,
    allow: Option<GlobSet>,
}

impl NoDependencyCycles {
    pub fn from_spec(spec: &RuleSpec) -> Result<Self, RuleConfigError> {
        Ok(Self {
            id: spec.id.clone(),
            message: spec.message.clone(),
            allow: build_globset(&spec.id, &spec.allow)?,
        })
    }
}

impl Rule for NoDependencyCycles {
    fn id(&self) -> &str {
        &self.id
    }

    fn execute(&self, ctx: &RuleExecutionContext) -> Result<RuleOutcome, RuleError> {
        let messages = ctx
            .graph()
            .dependencies()
            .filter(|node| node.state() == NodeState::CycleTruncated)
            .filter(|node| !coordinate_allowed(self.allow.as_ref(), node.coordinate()))
            .map(|node| format!("dependency cycle: {}", node.path_display()))
            .collect();

        Ok(RuleOutcome::failed_if_any(with_headline(
            self.message.as_deref(),
            messages,
        )))
    }
}
