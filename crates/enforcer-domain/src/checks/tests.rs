use super::{RuleConfigError, build_rule, build_rules};
use crate::context::ComponentRegistry;
use crate::policy::{EffectiveConfig, EnforcementLevel, Execution, FailurePolicy};
use crate::rule::RuleOutcome;
use crate::test_support::{
    context_for, context_with, coord, graph_of, project_and_source, scoped_project, spec,
};
use crate::{RuleDispatcher, enforce};
use enforcer_expr::PropertySnapshot;
use enforcer_graph::{
    AcceptAll, DependencyScope, ExclusionFilter, InMemoryMetadataSource, ScopedGraphBuilder,
    resolve,
};
use enforcer_types::{RuleStatus, Severity, ids};
use std::sync::Arc;

fn run(spec: &crate::policy::RuleSpec, ctx: &crate::RuleExecutionContext) -> RuleOutcome {
    build_rule(spec)
        .expect("valid rule")
        .rule
        .execute(ctx)
        .expect("rule executes")
}

fn failures(outcome: RuleOutcome) -> Vec<String> {
    match outcome {
        RuleOutcome::Failed(m) => m,
        other => panic!("expected failure, got {other:?}"),
    }
}

fn diamond() -> Arc<enforcer_graph::DependencyGraph> {
    graph_of(
        "org:app:1.0",
        &[
            ("org:app:1.0", &["org:libA:1.0"]),
            ("org:libA:1.0", &["org:libC:1.0", "org:libD:1.0"]),
            ("org:libC:1.0", &["org:libB:2.0"]),
            ("org:libD:1.0", &["org:libB:3.0"]),
        ],
    )
}

#[test]
fn convergence_reports_both_versions_once() {
    let graph = diamond();
    let versions: Vec<_> = graph
        .dependencies()
        .filter(|n| n.coordinate().name() == "libB")
        .map(|n| n.coordinate().version().to_string())
        .collect();
    assert_eq!(versions, ["2.0", "3.0"]);

    let report = enforce(
        &EffectiveConfig {
            profile: "strict".to_string(),
            failure_policy: FailurePolicy::Accumulate,
            execution: Execution::Sequential,
            rules: vec![spec(ids::RULE_DEPENDENCY_CONVERGENCE)],
        },
        &context_for(graph),
    )
    .expect("rules build");

    assert_eq!(report.violations().len(), 1);
    let v = &report.violations()[0];
    assert_eq!(v.severity, Severity::Fail);
    assert!(v.message.contains("org:libB"));
    assert!(v.message.contains("2.0"));
    assert!(v.message.contains("3.0"));
    assert!(v.message.contains("org:libC:1.0 -> org:libB:2.0"));
    assert!(report.build_should_fail());
}

#[test]
fn convergence_passes_on_agreeing_paths_and_honors_allow() {
    let agreeing = graph_of(
        "org:app:1.0",
        &[
            ("org:app:1.0", &["org:a:1.0", "org:b:1.0"]),
            ("org:a:1.0", &["org:common:1.0"]),
            ("org:b:1.0", &["org:common:1.0"]),
        ],
    );
    let s = spec(ids::RULE_DEPENDENCY_CONVERGENCE);
    assert_eq!(run(&s, &context_for(agreeing)), RuleOutcome::Passed);

    let mut allowed = spec(ids::RULE_DEPENDENCY_CONVERGENCE);
    allowed.allow = vec!["org:lib*".to_string()];
    assert_eq!(run(&allowed, &context_for(diamond())), RuleOutcome::Passed);
}

#[test]
fn custom_message_is_the_headline() {
    let mut s = spec(ids::RULE_DEPENDENCY_CONVERGENCE);
    s.message = Some("Align versions in the BOM".to_string());
    let messages = failures(run(&s, &context_for(diamond())));
    assert!(messages[0].starts_with("Align versions in the BOM\n"));
}

#[test]
fn always_fail_uses_default_or_configured_text() {
    let ctx = context_for(graph_of("org:app:1.0", &[]));
    assert_eq!(
        run(&spec(ids::RULE_ALWAYS_FAIL), &ctx),
        RuleOutcome::fail("Always fails!")
    );

    let mut forced = spec(ids::RULE_ALWAYS_FAIL);
    forced.message = Some("forced failure".to_string());
    assert_eq!(run(&forced, &ctx), RuleOutcome::fail("forced failure"));
    assert_eq!(run(&spec(ids::RULE_ALWAYS_PASS), &ctx), RuleOutcome::Passed);
}

#[test]
fn banned_direct_and_transitive() {
    let graph = graph_of(
        "org:app:1.0",
        &[
            ("org:app:1.0", &["org:web:1.0", "log4j:log4j:1.2.17"]),
            ("org:web:1.0", &["commons-logging:commons-logging:1.1"]),
        ],
    );
    let mut s = spec(ids::RULE_BANNED_DEPENDENCIES);
    s.banned = vec!["log4j:*".to_string(), "commons-logging:commons-logging".to_string()];

    let messages = failures(run(&s, &context_for(graph.clone())));
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("commons-logging:commons-logging:1.1"));
    assert!(messages[1].contains("log4j:log4j:1.2.17"));

    s.transitive = false;
    let direct = failures(run(&s, &context_for(graph.clone())));
    assert_eq!(direct.len(), 1);
    assert!(direct[0].contains("log4j"));

    s.allow = vec!["log4j:log4j:1.2.*".to_string()];
    assert_eq!(run(&s, &context_for(graph)), RuleOutcome::Passed);
}

#[test]
fn banned_matches_versions_with_globs() {
    let graph = graph_of("org:app:1.0", &[("org:app:1.0", &["org:lib:1.4", "org:other:2.0"])]);
    let mut s = spec(ids::RULE_BANNED_DEPENDENCIES);
    s.banned = vec!["org:lib:1.*".to_string()];
    assert_eq!(failures(run(&s, &context_for(graph))).len(), 1);
}

#[test]
fn banned_skips_excluded_nodes() {
    let (project, source) =
        project_and_source("org:app:1.0", &[("org:app:1.0", &["log4j:log4j:1.2.17"])]);
    let filter = ExclusionFilter::new(&["log4j:*".to_string()]).expect("glob");
    let graph = Arc::new(resolve(&project, &source, &filter).expect("graph"));

    let mut s = spec(ids::RULE_BANNED_DEPENDENCIES);
    s.banned = vec!["log4j:*".to_string()];
    assert_eq!(run(&s, &context_for(graph)), RuleOutcome::Passed);
}

#[test]
fn scoped_ban_uses_the_component_lookup() {
    let project = scoped_project("org:app:1.0", "org:junit:4.0", DependencyScope::Test);
    let source = InMemoryMetadataSource::new().with(coord("org:junit:4.0"), &[]);
    let graph = Arc::new(resolve(&project, &source, &AcceptAll).expect("graph"));

    let builder = ScopedGraphBuilder::new(
        Arc::new(project),
        Arc::new(source),
        ExclusionFilter::new(&[]).expect("no patterns"),
    );
    let registry = ComponentRegistry::new().with(ids::COMPONENT_SCOPED_GRAPH, builder);

    let mut s = spec(ids::RULE_BANNED_DEPENDENCIES);
    s.banned = vec!["org:junit".to_string()];
    s.scope = Some("compile".to_string());

    let ctx = context_for(graph.clone()).with_components(Arc::new(registry.clone()));
    assert_eq!(run(&s, &ctx), RuleOutcome::Passed);

    s.scope = Some("test".to_string());
    assert_eq!(failures(run(&s, &ctx)).len(), 1);

    // Same rule without a registry: the lookup failure becomes this rule's violation.
    let bare = context_for(graph);
    let rules = vec![build_rule(&s).expect("rule")];
    let report = RuleDispatcher::default().dispatch(&rules, &bare);
    assert_eq!(report.rules()[0].status, RuleStatus::Failed);
    assert!(report.violations()[0].cause.is_some());
}

#[test]
fn require_property_checks_presence_and_pattern() {
    let graph = graph_of("org:app:1.2.3", &[]);
    let snapshot = PropertySnapshot::builder()
        .project(graph.root().coordinate())
        .project_property("encoding", "UTF-8")
        .build();
    let ctx = context_with(graph, snapshot);

    let mut s = spec(ids::RULE_REQUIRE_PROPERTY);
    s.property = Some("encoding".to_string());
    assert_eq!(run(&s, &ctx), RuleOutcome::Passed);

    s.regex = Some("^ISO-".to_string());
    let mismatch = failures(run(&s, &ctx));
    assert!(mismatch[0].contains("does not match"));

    s.property = Some("missing.prop".to_string());
    s.regex = None;
    let missing = failures(run(&s, &ctx));
    assert!(missing[0].contains("missing.prop"));
}

#[test]
fn require_project_version_rejects_snapshots_by_default() {
    let snapshot_ctx = context_for(graph_of("org:app:1.0-SNAPSHOT", &[]));
    let release_ctx = context_for(graph_of("org:app:1.0.0", &[]));
    let s = spec(ids::RULE_REQUIRE_PROJECT_VERSION);

    assert_eq!(failures(run(&s, &snapshot_ctx)).len(), 1);
    assert_eq!(run(&s, &release_ctx), RuleOutcome::Passed);

    let mut semver = spec(ids::RULE_REQUIRE_PROJECT_VERSION);
    semver.regex = Some(r"^\d+\.\d+\.\d+$".to_string());
    assert_eq!(run(&semver, &release_ctx), RuleOutcome::Passed);
    assert_eq!(run(&semver, &snapshot_ctx), RuleOutcome::fail(
        r"project version 1.0-SNAPSHOT does not match /^\d+\.\d+\.\d+$/"
    ));
}

#[test]
fn cycles_are_reported_with_their_path() {
    let graph = graph_of(
        "org:app:1.0",
        &[
            ("org:app:1.0", &["org:a:1.0"]),
            ("org:a:1.0", &["org:b:1.0"]),
            ("org:b:1.0", &["org:a:1.0"]),
        ],
    );
    let messages = failures(run(&spec(ids::RULE_NO_DEPENDENCY_CYCLES), &context_for(graph)));
    assert_eq!(
        messages,
        ["dependency cycle: org:app:1.0 -> org:a:1.0 -> org:b:1.0 -> org:a:1.0"]
    );
}

#[test]
fn invalid_configuration_is_rejected_at_build_time() {
    let unknown = spec("no_such_rule");
    assert!(matches!(
        build_rule(&unknown),
        Err(RuleConfigError::UnknownKind { .. })
    ));

    let mut bad_glob = spec(ids::RULE_BANNED_DEPENDENCIES);
    bad_glob.banned = vec!["org:[".to_string()];
    assert!(matches!(
        build_rule(&bad_glob),
        Err(RuleConfigError::InvalidGlob { .. })
    ));

    let no_banned = spec(ids::RULE_BANNED_DEPENDENCIES);
    assert!(matches!(
        build_rule(&no_banned),
        Err(RuleConfigError::MissingParameter { parameter: "banned", .. })
    ));

    let mut bad_scope = spec(ids::RULE_BANNED_DEPENDENCIES);
    bad_scope.banned = vec!["x:*".to_string()];
    bad_scope.scope = Some("everything".to_string());
    assert!(matches!(
        build_rule(&bad_scope),
        Err(RuleConfigError::InvalidScope { .. })
    ));

    let mut bad_regex = spec(ids::RULE_REQUIRE_PROPERTY);
    bad_regex.property = Some("p".to_string());
    bad_regex.regex = Some("(".to_string());
    assert!(matches!(
        build_rule(&bad_regex),
        Err(RuleConfigError::InvalidRegex { .. })
    ));
}

#[test]
fn warn_level_rules_never_fail_the_build() {
    let mut s = spec(ids::RULE_ALWAYS_FAIL);
    s.level = EnforcementLevel::Warn;
    let cfg = EffectiveConfig {
        profile: "warn".to_string(),
        failure_policy: FailurePolicy::FailFast,
        execution: Execution::Sequential,
        rules: vec![s, spec(ids::RULE_ALWAYS_PASS)],
    };
    let rules = build_rules(&cfg).expect("rules");
    let report = RuleDispatcher::new(cfg.failure_policy, cfg.execution)
        .dispatch(&rules, &context_for(graph_of("org:app:1.0", &[])));

    assert!(!report.build_should_fail());
    assert_eq!(report.rules()[1].status, RuleStatus::Passed);
}
