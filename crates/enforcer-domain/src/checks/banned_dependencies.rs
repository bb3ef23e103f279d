use super::RuleConfigError;
use super::utils::{build_globset, coordinate_allowed, with_headline};
use crate::context::RuleExecutionContext;
use crate::policy::RuleSpec;
use crate::rule::{Rule, RuleError, RuleOutcome};
use anyhow::Context as _;
use enforcer_graph::{
    DependencyGraph, DependencyScope, NodeState, ScopedGraphBuilder, matches_coordinate,
};
use enforcer_types::ids;
use globset::GlobSet;

/// Fails for every reached artifact matching a banned pattern, unless it is allowlisted.
#[derive(Clone, Debug)]
pub struct BannedDependencies {
    id: String,
    message: Option<String>,
    banned: GlobSet,
    allow: Option<GlobSet>,
    transitive: bool,
    /// When set, check the graph restricted to this scope instead of the full graph.
    scope: Option<DependencyScope>,
}

impl BannedDependencies {
    pub fn from_spec(spec: &RuleSpec) -> Result<Self, RuleConfigError> {
        let banned = build_globset(&spec.id, &spec.banned)?.ok_or_else(|| {
            RuleConfigError::MissingParameter {
                rule_id: spec.id.clone(),
                parameter: "banned",
            }
        })?;
        let scope = spec
            .scope
            .as_deref()
            .map(|s| {
                DependencyScope::parse(s).ok_or_else(|| RuleConfigError::InvalidScope {
                    rule_id: spec.id.clone(),
                    scope: s.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            id: spec.id.clone(),
            message: spec.message.clone(),
            banned,
            allow: build_globset(&spec.id, &spec.allow)?,
            transitive: spec.transitive,
            scope,
        })
    }

    fn scan(&self, graph: &DependencyGraph) -> Vec<String> {
        graph
            .dependencies()
            .filter(|node| node.state() != NodeState::Excluded)
            .filter(|node| self.transitive || node.depth() == 1)
            .filter(|node| matches_coordinate(&self.banned, node.coordinate()))
            .filter(|node| !coordinate_allowed(self.allow.as_ref(), node.coordinate()))
            .map(|node| {
                format!(
                    "banned dependency {} (via {})",
                    node.coordinate(),
                    node.path_display()
                )
            })
            .collect()
    }
}

impl Rule for BannedDependencies {
    fn id(&self) -> &str {
        &self.id
    }

    fn execute(&self, ctx: &RuleExecutionContext) -> Result<RuleOutcome, RuleError> {
        let messages = match self.scope {
            None => self.scan(ctx.graph()),
            Some(scope) => {
                let builder =
                    ctx.lookup_component::<ScopedGraphBuilder>(ids::COMPONENT_SCOPED_GRAPH)?;
                let scoped = builder
                    .build(&[scope])
                    .with_context(|| format!("building the {} scope graph", scope.as_str()))?;
                ctx.log()
                    .debug(&format!("scanning {} nodes in {} scope", scoped.len(), scope.as_str()));
                self.scan(&scoped)
            }
        };

        Ok(RuleOutcome::failed_if_any(with_headline(
            self.message.as_deref(),
            messages,
        )))
    }
}
