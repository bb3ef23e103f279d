use crate::context::{LogLevel, LogSink, RuleExecutionContext};
use crate::policy::{EnforcementLevel, RuleSpec};
use crate::rule::{Rule, RuleError, RuleOutcome};
use enforcer_expr::{ExpressionResolver, PropertySnapshot};
use enforcer_graph::{
    AcceptAll, DependencyDecl, DependencyGraph, DependencyScope, InMemoryMetadataSource,
    ProjectDescriptor, resolve,
};
use enforcer_types::ArtifactCoordinate;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

pub fn coord(s: &str) -> ArtifactCoordinate {
    s.parse().expect("test coordinate")
}

/// Project rooted at `root` whose direct dependencies are the entry keyed by `root` in `index`;
/// every other entry is artifact metadata. Artifacts referenced but not listed are leaves.
pub fn project_and_source(
    root: &str,
    index: &[(&str, &[&str])],
) -> (ProjectDescriptor, InMemoryMetadataSource) {
    let mut project = ProjectDescriptor::new(coord(root));
    let mut source = InMemoryMetadataSource::new();
    let mut listed = BTreeSet::new();
    let mut referenced = BTreeSet::new();

    for (artifact, deps) in index {
        referenced.extend(deps.iter().map(|d| d.to_string()));
        if *artifact == root {
            for d in *deps {
                project = project.with_dependency(coord(d));
            }
        } else {
            listed.insert(artifact.to_string());
            source.insert(coord(artifact), deps.iter().map(|d| coord(d).into()).collect());
        }
    }
    for leaf in referenced.difference(&listed) {
        if leaf != root {
            source.insert(coord(leaf), Vec::new());
        }
    }
    (project, source)
}

pub fn graph_of(root: &str, index: &[(&str, &[&str])]) -> Arc<DependencyGraph> {
    let (project, source) = project_and_source(root, index);
    Arc::new(resolve(&project, &source, &AcceptAll).expect("test graph"))
}

/// Project whose single direct dependency is declared with `scope`.
pub fn scoped_project(root: &str, dep: &str, scope: DependencyScope) -> ProjectDescriptor {
    ProjectDescriptor::new(coord(root)).with_dependency(DependencyDecl::new(coord(dep), scope))
}

pub fn context_for(graph: Arc<DependencyGraph>) -> RuleExecutionContext {
    let snapshot = PropertySnapshot::builder()
        .project(graph.root().coordinate())
        .build();
    RuleExecutionContext::new(graph, ExpressionResolver::new(snapshot))
}

pub fn context_with(graph: Arc<DependencyGraph>, snapshot: PropertySnapshot) -> RuleExecutionContext {
    RuleExecutionContext::new(graph, ExpressionResolver::new(snapshot))
}

pub fn spec(kind: &str) -> RuleSpec {
    RuleSpec::new(kind, EnforcementLevel::Fail)
}

type RuleFn = dyn Fn(&RuleExecutionContext) -> Result<RuleOutcome, RuleError> + Send + Sync;

/// Ad-hoc rule backed by a closure.
pub struct FnRule {
    id: String,
    f: Box<RuleFn>,
}

impl FnRule {
    pub fn new<F>(id: &str, f: F) -> Self
    where
        F: Fn(&RuleExecutionContext) -> Result<RuleOutcome, RuleError> + Send + Sync + 'static,
    {
        Self {
            id: id.to_string(),
            f: Box::new(f),
        }
    }
}

impl Rule for FnRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn execute(&self, ctx: &RuleExecutionContext) -> Result<RuleOutcome, RuleError> {
        (self.f)(ctx)
    }
}

#[derive(Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<(LogLevel, Option<String>, String)>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<(LogLevel, Option<String>, String)> {
        self.lines.lock().expect("sink lock").clone()
    }
}

impl LogSink for RecordingSink {
    fn write(&self, level: LogLevel, rule_id: Option<&str>, line: &str) {
        self.lines
            .lock()
            .expect("sink lock")
            .push((level, rule_id.map(str::to_string), line.to_string()));
    }
}
