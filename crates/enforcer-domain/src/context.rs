//! The capability object every rule receives.
//!
//! A context exposes exactly four things: the resolved graph, expression resolution, a logging
//! sink, and component lookup. It exposes no way to change any of them.

use enforcer_expr::{ExpressionResolver, UnresolvedExpressionError};
use enforcer_graph::{DependencyGraph, NodeRef};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Narrow "write one diagnostic line" capability.
pub trait LogSink: Send + Sync {
    fn write(&self, level: LogLevel, rule_id: Option<&str>, line: &str);
}

/// Default sink: forwards to `tracing` with the rule id as a field.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, level: LogLevel, rule_id: Option<&str>, line: &str) {
        let rule = rule_id.unwrap_or("-");
        match level {
            LogLevel::Debug => tracing::debug!(rule, "{line}"),
            LogLevel::Info => tracing::info!(rule, "{line}"),
            LogLevel::Warn => tracing::warn!(rule, "{line}"),
            LogLevel::Error => tracing::error!(rule, "{line}"),
        }
    }
}

/// Logging handle scoped to the rule currently running.
#[derive(Clone, Copy)]
pub struct RuleLog<'a> {
    sink: &'a dyn LogSink,
    rule_id: Option<&'a str>,
}

impl RuleLog<'_> {
    pub fn debug(&self, line: &str) {
        self.sink.write(LogLevel::Debug, self.rule_id, line);
    }

    pub fn info(&self, line: &str) {
        self.sink.write(LogLevel::Info, self.rule_id, line);
    }

    pub fn warn(&self, line: &str) {
        self.sink.write(LogLevel::Warn, self.rule_id, line);
    }

    pub fn error(&self, line: &str) {
        self.sink.write(LogLevel::Error, self.rule_id, line);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ComponentLookupError {
    #[error("component '{key}' requested but no component lookup is configured")]
    Unavailable { key: String },
    #[error("no component registered under '{key}'")]
    NotFound { key: String },
    #[error("component '{key}' is not a {expected}")]
    WrongType { key: String, expected: &'static str },
}

/// Lookup of build-tool services a rule may legitimately need beyond the graph.
pub trait ComponentLookup: Send + Sync {
    fn lookup(&self, key: &str) -> Option<Arc<dyn Any + Send + Sync>>;
}

#[derive(Clone, Default)]
pub struct ComponentRegistry {
    components: BTreeMap<String, Arc<dyn Any + Send + Sync>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Any + Send + Sync>(&mut self, key: &str, component: T) {
        self.components.insert(key.to_string(), Arc::new(component));
    }

    pub fn with<T: Any + Send + Sync>(mut self, key: &str, component: T) -> Self {
        self.register(key, component);
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }
}

impl ComponentLookup for ComponentRegistry {
    fn lookup(&self, key: &str) -> Option<Arc<dyn Any + Send + Sync>> {
        self.components.get(key).cloned()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.components.keys()).finish()
    }
}

/// Read-only view of the build handed to each rule.
///
/// Cheap to clone and to re-scope per rule; every copy points at the same graph instance.
#[derive(Clone)]
pub struct RuleExecutionContext {
    graph: Arc<DependencyGraph>,
    expressions: ExpressionResolver,
    log: Arc<dyn LogSink>,
    components: Option<Arc<dyn ComponentLookup>>,
    rule_id: Option<Arc<str>>,
}

impl RuleExecutionContext {
    /// A context with the tracing sink and no component lookup.
    pub fn new(graph: Arc<DependencyGraph>, expressions: ExpressionResolver) -> Self {
        Self {
            graph,
            expressions,
            log: Arc::new(TracingSink),
            components: None,
            rule_id: None,
        }
    }

    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log = sink;
        self
    }

    pub fn with_components(mut self, components: Arc<dyn ComponentLookup>) -> Self {
        self.components = Some(components);
        self
    }

    /// The same context, with log lines attributed to `rule_id`.
    pub fn for_rule(&self, rule_id: &str) -> Self {
        let mut ctx = self.clone();
        ctx.rule_id = Some(Arc::from(rule_id));
        ctx
    }

    pub fn rule_id(&self) -> Option<&str> {
        self.rule_id.as_deref()
    }

    pub fn root_node(&self) -> NodeRef<'_> {
        self.graph.root()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// True when both contexts observe the very same graph instance.
    pub fn shares_graph_with(&self, other: &RuleExecutionContext) -> bool {
        Arc::ptr_eq(&self.graph, &other.graph)
    }

    pub fn evaluate(&self, expression: &str) -> Result<String, UnresolvedExpressionError> {
        self.expressions.resolve(expression)
    }

    pub fn expressions(&self) -> &ExpressionResolver {
        &self.expressions
    }

    pub fn log(&self) -> RuleLog<'_> {
        RuleLog {
            sink: self.log.as_ref(),
            rule_id: self.rule_id.as_deref(),
        }
    }

    /// Fetch a registered component by key and expected type.
    ///
    /// Fails deterministically when no lookup was configured.
    pub fn lookup_component<T: Any + Send + Sync>(
        &self,
        key: &str,
    ) -> Result<Arc<T>, ComponentLookupError> {
        let components = self
            .components
            .as_ref()
            .ok_or_else(|| ComponentLookupError::Unavailable {
                key: key.to_string(),
            })?;
        let component = components
            .lookup(key)
            .ok_or_else(|| ComponentLookupError::NotFound {
                key: key.to_string(),
            })?;
        component
            .downcast::<T>()
            .map_err(|_| ComponentLookupError::WrongType {
                key: key.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }
}

impl fmt::Debug for RuleExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleExecutionContext")
            .field("root", &self.graph.root().coordinate().to_string())
            .field("nodes", &self.graph.len())
            .field("rule_id", &self.rule_id)
            .field("components", &self.components.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingSink, context_for, graph_of};

    #[derive(Debug, PartialEq)]
    struct Marker(u32);

    #[test]
    fn root_node_is_the_project() {
        let ctx = context_for(graph_of("org:app:1.2.3", &[]));
        assert_eq!(ctx.root_node().coordinate().to_string(), "org:app:1.2.3");
        assert!(ctx.root_node().is_root());
    }

    #[test]
    fn evaluate_delegates_to_snapshot() {
        let ctx = context_for(graph_of("org:app:1.2.3", &[]));
        assert_eq!(ctx.evaluate("${project.version}").as_deref(), Ok("1.2.3"));
        assert!(ctx.evaluate("${undefined.prop}").is_err());
    }

    #[test]
    fn lookup_without_registry_fails_deterministically() {
        let ctx = context_for(graph_of("org:app:1.0", &[]));
        let err = ctx.lookup_component::<Marker>("anything").expect_err("no lookup");
        assert_eq!(
            err,
            ComponentLookupError::Unavailable {
                key: "anything".to_string()
            }
        );
    }

    #[test]
    fn lookup_finds_and_type_checks_components() {
        let registry = ComponentRegistry::new().with("marker", Marker(7));
        let ctx = context_for(graph_of("org:app:1.0", &[])).with_components(Arc::new(registry));

        assert_eq!(*ctx.lookup_component::<Marker>("marker").expect("found"), Marker(7));
        assert!(matches!(
            ctx.lookup_component::<Marker>("missing"),
            Err(ComponentLookupError::NotFound { .. })
        ));
        assert!(matches!(
            ctx.lookup_component::<String>("marker"),
            Err(ComponentLookupError::WrongType { .. })
        ));
    }

    #[test]
    fn per_rule_contexts_share_the_graph_and_tag_log_lines() {
        let sink = Arc::new(RecordingSink::default());
        let base = context_for(graph_of("org:app:1.0", &[])).with_log_sink(sink.clone());
        let scoped = base.for_rule("convergence");

        assert!(scoped.shares_graph_with(&base));
        scoped.log().info("checking");
        base.log().warn("untagged");

        assert_eq!(
            sink.lines(),
            [
                (LogLevel::Info, Some("convergence".to_string()), "checking".to_string()),
                (LogLevel::Warn, None, "untagged".to_string()),
            ]
        );
    }
}
