//! The `check` use case: resolve the graph, run the rules, produce a report.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use enforcer_domain::{ComponentRegistry, RuleExecutionContext, ViolationReport};
use enforcer_expr::{ExpressionResolver, PropertySnapshot};
use enforcer_graph::{ExclusionFilter, ProjectDescriptor, ScopedGraphBuilder};
use enforcer_settings::{Overrides, ResolvedConfig};
use enforcer_types::{
    EnforcerData, EnforcerReport, ReportEnvelope, SCHEMA_REPORT_V1, Severity, SeverityCounts,
    ToolMeta, Verdict, Violation, ids,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use time::OffsetDateTime;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Project file, or a directory holding one.
    pub project_path: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: EnforcerReport,
    pub resolved_config: ResolvedConfig,
    pub project_file: Utf8PathBuf,
}

/// Run the check use case: parse config, load the project, resolve its graph, run every rule.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        enforcer_settings::EnforcerConfigV1::default()
    } else {
        enforcer_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved =
        enforcer_settings::resolve_config(cfg, input.overrides).context("resolve config")?;

    let loaded = enforcer_project::load_project(input.project_path).context("load project")?;
    let descriptor = Arc::new(loaded.parsed.descriptor);
    let metadata = Arc::new(loaded.parsed.metadata);
    let exclusions =
        ExclusionFilter::new(&loaded.parsed.exclusions).context("compile exclusions")?;

    // Resolution failure aborts the run before any rule executes.
    let graph = enforcer_graph::resolve(&descriptor, metadata.as_ref(), &exclusions)
        .context("resolve dependency graph")?;
    let nodes_resolved = graph.len();

    let snapshot = build_snapshot(&descriptor, &resolved.user_properties);
    let components = ComponentRegistry::new().with(
        ids::COMPONENT_SCOPED_GRAPH,
        ScopedGraphBuilder::new(descriptor.clone(), metadata, exclusions),
    );
    let ctx = RuleExecutionContext::new(Arc::new(graph), ExpressionResolver::new(snapshot))
        .with_components(Arc::new(components));

    let outcome =
        enforcer_domain::enforce(&resolved.effective, &ctx).context("build configured rules")?;

    let data = EnforcerData {
        project: descriptor.coordinate.to_string(),
        profile: resolved.effective.profile.clone(),
        failure_policy: resolved.effective.failure_policy.as_str().to_string(),
        execution: resolved.effective.execution.as_str().to_string(),
        nodes_resolved: nodes_resolved as u32,
        rules_configured: resolved.effective.rules.len() as u32,
    };
    let report = build_report(outcome, data, started_at);

    tracing::info!(verdict = ?report.verdict, violations = report.violations.len(), "check finished");
    Ok(CheckOutput {
        report,
        resolved_config: resolved,
        project_file: loaded.path,
    })
}

/// Capture every property layer once; rules only ever see this snapshot.
fn build_snapshot(
    descriptor: &ProjectDescriptor,
    user_properties: &BTreeMap<String, String>,
) -> PropertySnapshot {
    let mut builder = PropertySnapshot::builder()
        .project(&descriptor.coordinate)
        .project_properties(descriptor.properties.clone())
        .user_properties(user_properties.clone())
        .system_property("os.name", std::env::consts::OS)
        .system_property("os.arch", std::env::consts::ARCH)
        .system_property("enforcer.version", env!("CARGO_PKG_VERSION"))
        .capture_process_env();
    if let Some(basedir) = &descriptor.basedir {
        builder = builder.basedir(basedir.clone());
    }
    let snapshot = builder.build();
    tracing::debug!(
        properties = snapshot.effective().len(),
        "captured property snapshot"
    );
    snapshot
}

fn build_report(
    outcome: ViolationReport,
    data: EnforcerData,
    started_at: OffsetDateTime,
) -> EnforcerReport {
    let verdict = outcome.verdict();
    let counts = outcome.counts();
    let (rules, violations) = outcome.into_parts();

    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict,
        counts,
        rules,
        violations,
        data,
    }
}

/// Report written when the run could not complete (bad config, unresolvable graph, I/O).
pub fn runtime_error_report(message: &str, started_at: OffsetDateTime) -> EnforcerReport {
    let violations = vec![Violation::new(ids::RULE_TOOL_RUNTIME, Severity::Fail, message)];
    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict: Verdict::Fail,
        counts: SeverityCounts::from_violations(&violations),
        rules: Vec::new(),
        violations,
        data: EnforcerData::default(),
    }
}

fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "enforcer".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enforcer_test_util::DIAMOND_PROJECT;
    use enforcer_types::RuleStatus;

    #[test]
    fn snapshot_layers_user_over_project_over_system() {
        let mut descriptor =
            ProjectDescriptor::new("org.example:app:1.2.3".parse().expect("coordinate"));
        descriptor
            .properties
            .insert("encoding".to_string(), "UTF-8".to_string());
        descriptor
            .properties
            .insert("os.name".to_string(), "project-os".to_string());
        let user = BTreeMap::from([("encoding".to_string(), "latin1".to_string())]);

        let snapshot = build_snapshot(&descriptor, &user);
        let effective = snapshot.effective();

        assert_eq!(effective["encoding"], "latin1");
        assert_eq!(effective["os.name"], "project-os");
        assert_eq!(effective["os.arch"], std::env::consts::ARCH);
        assert_eq!(effective["project.version"], "1.2.3");
    }

    fn project_dir(content: &str) -> (tempfile::TempDir, Utf8PathBuf) {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path");
        std::fs::write(root.join("project.toml"), content).expect("write project");
        (tmp, root)
    }

    #[test]
    fn empty_config_uses_defaults_and_finds_divergence() {
        let (_tmp, root) = project_dir(DIAMOND_PROJECT);
        let output = run_check(CheckInput {
            project_path: &root,
            config_text: "",
            overrides: Overrides::default(),
        })
        .expect("run_check");

        assert_eq!(output.resolved_config.effective.profile, "strict");
        let report = output.report;
        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].rule_id, ids::RULE_DEPENDENCY_CONVERGENCE);
        assert_eq!(report.rules.len(), 2);
        assert_eq!(report.data.project, "org:app:1.2.3");
        assert_eq!(report.data.nodes_resolved, 6);
    }

    #[test]
    fn properties_flow_from_config_overrides_and_project() {
        let (_tmp, root) = project_dir(DIAMOND_PROJECT);
        let config = r#"
[[rules]]
kind = "dependency_convergence"
enabled = false

[[rules]]
kind = "require_property"
id = "encoding"
property = "encoding"
regex = "^UTF-8$"

[[rules]]
kind = "require_property"
id = "channel"
property = "channel"
"#;
        let mut overrides = Overrides::default();
        overrides
            .properties
            .insert("channel".to_string(), "stable".to_string());

        let output = run_check(CheckInput {
            project_path: &root,
            config_text: config,
            overrides,
        })
        .expect("run_check");

        assert_eq!(output.report.verdict, Verdict::Pass);
        assert!(output.report.rules.iter().all(|r| r.status == RuleStatus::Passed));
    }

    #[test]
    fn scoped_ban_reaches_the_registered_component() {
        let (_tmp, root) = project_dir(
            r#"
[project]
coordinate = "org:app:1.0"

[[dependencies]]
coordinate = "junit:junit:4.13"
scope = "test"

[artifacts]
"junit:junit:4.13" = []
"#,
        );
        let config = r#"
[[rules]]
kind = "banned_dependencies"
banned = ["junit:*"]
scope = "compile"
"#;
        let output = run_check(CheckInput {
            project_path: &root,
            config_text: config,
            overrides: Overrides::default(),
        })
        .expect("run_check");

        let banned = output
            .report
            .rules
            .iter()
            .find(|r| r.rule_id == ids::RULE_BANNED_DEPENDENCIES)
            .expect("rule ran");
        assert_eq!(banned.status, RuleStatus::Passed);
    }

    #[test]
    fn unresolvable_graph_is_an_error() {
        let (_tmp, root) = project_dir(
            r#"
[project]
coordinate = "org:app:1.0"

[[dependencies]]
coordinate = "org:ghost:1.0"
"#,
        );
        let err = run_check(CheckInput {
            project_path: &root,
            config_text: "",
            overrides: Overrides::default(),
        })
        .expect_err("ghost has no descriptor");
        assert!(format!("{err:#}").contains("org:ghost:1.0"));
    }

    #[test]
    fn runtime_error_report_fails() {
        let report = runtime_error_report("boom", OffsetDateTime::now_utc());
        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(report.violations[0].rule_id, ids::RULE_TOOL_RUNTIME);
        assert_eq!(report.counts.fail, 1);
    }

    #[test]
    fn verdict_exit_codes() {
        assert_eq!(verdict_exit_code(Verdict::Pass), 0);
        assert_eq!(verdict_exit_code(Verdict::Warn), 0);
        assert_eq!(verdict_exit_code(Verdict::Fail), 2);
    }
}
