//! The `tree` use case: print the resolved dependency graph.

use anyhow::Context;
use camino::Utf8Path;
use enforcer_graph::{DependencyGraph, DependencyScope, ExclusionFilter, NodeState};

/// Load the project at `project_path` and render its resolved graph.
pub fn run_tree(project_path: &Utf8Path) -> anyhow::Result<String> {
    let loaded = enforcer_project::load_project(project_path).context("load project")?;
    let exclusions =
        ExclusionFilter::new(&loaded.parsed.exclusions).context("compile exclusions")?;
    let graph = enforcer_graph::resolve(
        &loaded.parsed.descriptor,
        &loaded.parsed.metadata,
        &exclusions,
    )
    .context("resolve dependency graph")?;
    Ok(render_tree(&graph))
}

/// One line per node in pre-order, indented two spaces per level.
///
/// Non-compile scopes are shown in parentheses; excluded and cycle-truncated nodes are marked.
pub fn render_tree(graph: &DependencyGraph) -> String {
    let mut out = String::new();
    for node in graph.iter() {
        out.push_str(&"  ".repeat(node.depth()));
        out.push_str(&node.coordinate().to_string());
        if !node.is_root() && node.scope() != DependencyScope::Compile {
            out.push_str(&format!(" ({})", node.scope().as_str()));
        }
        match node.state() {
            NodeState::Expanded => {}
            NodeState::Excluded => out.push_str(" [excluded]"),
            NodeState::CycleTruncated => out.push_str(" [cycle]"),
        }
        out.push('\n');
    }
    out
}
