use super::RuleConfigError;
use super::utils::{build_globset, is_allowed, with_headline};
use crate::context::RuleExecutionContext;
use crate::policy::RuleSpec;
use crate::rule::{Rule, RuleError, RuleOutcome};
use globset::GlobSet;
use std::fmt::Write as _;

/// Every path to an artifact must agree on one version.
#[derive(Clone, Debug)]
pub struct DependencyConvergence {
    id: String,
    message: Option<String>,
    allow: Option<GlobSet>,
}

impl DependencyConvergence {
    pub fn from_spec(spec: &RuleSpec) -> Result<Self, RuleConfigError> {
        Ok(Self {
            id: spec.id.clone(),
            message: spec.message.clone(),
            allow: build_globset(&spec.id, &spec.allow)?,
        })
    }
}

impl Rule for DependencyConvergence {
    fn id(&self) -> &str {
        &self.id
    }

    fn execute(&self, ctx: &RuleExecutionContext) -> Result<RuleOutcome, RuleError> {
        let graph = ctx.graph();
        let mut messages = Vec::new();

        for (key, versions) in graph.versions_by_key() {
            if versions.len() <= 1 {
                continue;
            }
            let ga = format!("{}:{}", key.group, key.name);
            let allow = self.allow.as_ref();
            if is_allowed(allow, &ga) || is_allowed(allow, &key.to_string()) {
                ctx.log().debug(&format!("{key} diverges but is allowlisted"));
                continue;
            }

            let listed: Vec<&str> = versions.keys().map(String::as_str).collect();
            let mut msg = format!(
                "dependency convergence error for {key}: {} versions reached ({})",
                listed.len(),
                listed.join(", ")
            );
            for (version, nodes) in &versions {
                for id in nodes {
                    if let Some(node) = graph.get(*id) {
                        let _ = write!(msg, "\n  {version} via {}", node.path_display());
                    }
                }
            }
            messages.push(msg);
        }

        Ok(RuleOutcome::failed_if_any(with_headline(
            self.message.as_deref(),
            messages,
        )))
    }
}
