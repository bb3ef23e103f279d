use crate::filter::{ArtifactFilter, ExclusionFilter, ScopeFilter};
use crate::model::{DependencyDecl, DependencyGraph, DependencyScope, NodeId, NodeState, ProjectDescriptor};
use crate::source::{ArtifactMetadataSource, MetadataError};
use enforcer_types::ArtifactKey;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum GraphResolutionError {
    #[error("cannot resolve dependencies of {coordinate} (via {path})")]
    Metadata {
        coordinate: String,
        path: String,
        #[source]
        source: MetadataError,
    },
    #[error("dependency tree deeper than {max_depth} levels at {path}")]
    DepthExceeded { max_depth: usize, path: String },
    #[error("dependency tree has more than {limit} nodes at {path}")]
    TooManyNodes { limit: usize, path: String },
}

#[derive(Clone, Debug)]
pub struct ResolveOptions {
    /// Deepest level a node may sit at; the project's direct dependencies are level 1.
    pub max_depth: usize,
    /// Largest tree allowed, root included. Repeated subtrees are not shared, so stacked
    /// diamonds grow exponentially with depth.
    pub max_nodes: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_nodes: 1_000_000,
        }
    }
}

/// Build the full transitive dependency tree of `project`.
///
/// Any metadata lookup failure aborts the whole resolution: a partial tree would let rules
/// pass on data that was never seen.
pub fn resolve(
    project: &ProjectDescriptor,
    source: &dyn ArtifactMetadataSource,
    filter: &dyn ArtifactFilter,
) -> Result<DependencyGraph, GraphResolutionError> {
    resolve_with(project, source, filter, &ResolveOptions::default())
}

pub fn resolve_with(
    project: &ProjectDescriptor,
    source: &dyn ArtifactMetadataSource,
    filter: &dyn ArtifactFilter,
    options: &ResolveOptions,
) -> Result<DependencyGraph, GraphResolutionError> {
    let mut resolver = Resolver {
        graph: DependencyGraph::with_root(project.coordinate.clone()),
        source,
        filter,
        options,
        path: vec![project.coordinate.key()],
    };

    for decl in &project.dependencies {
        resolver.attach(NodeId::ROOT, decl, decl.scope)?;
    }

    let graph = resolver.graph;
    tracing::debug!(
        project = %project.coordinate,
        nodes = graph.len(),
        "resolved dependency tree"
    );
    Ok(graph)
}

struct Resolver<'a> {
    graph: DependencyGraph,
    source: &'a dyn ArtifactMetadataSource,
    filter: &'a dyn ArtifactFilter,
    options: &'a ResolveOptions,
    /// Keys from the root down to the node being expanded.
    path: Vec<ArtifactKey>,
}

impl Resolver<'_> {
    fn attach(
        &mut self,
        parent: NodeId,
        decl: &DependencyDecl,
        scope: DependencyScope,
    ) -> Result<(), GraphResolutionError> {
        let coordinate = &decl.coordinate;
        let key = coordinate.key();

        let state = if !self.filter.accepts(coordinate, scope) {
            NodeState::Excluded
        } else if self.path.contains(&key) {
            NodeState::CycleTruncated
        } else {
            NodeState::Expanded
        };

        let id = self
            .graph
            .push_child(parent, coordinate.clone(), scope, state);
        let node = self.graph.node_ref(id);

        if self.graph.len() > self.options.max_nodes {
            return Err(GraphResolutionError::TooManyNodes {
                limit: self.options.max_nodes,
                path: node.path_display(),
            });
        }
        if node.depth() > self.options.max_depth {
            return Err(GraphResolutionError::DepthExceeded {
                max_depth: self.options.max_depth,
                path: node.path_display(),
            });
        }

        match state {
            NodeState::Excluded => {
                tracing::trace!(artifact = %coordinate, "excluded by filter");
                return Ok(());
            }
            NodeState::CycleTruncated => {
                tracing::debug!(path = %node.path_display(), "dependency cycle truncated");
                return Ok(());
            }
            NodeState::Expanded => {}
        }

        let children = self.source.direct_dependencies(coordinate).map_err(|source| {
            GraphResolutionError::Metadata {
                coordinate: coordinate.to_string(),
                path: node.path_display(),
                source,
            }
        })?;

        self.path.push(key);
        for child in &children {
            if let Some(child_scope) = scope.mediate(child.scope) {
                self.attach(id, child, child_scope)?;
            }
        }
        self.path.pop();

        Ok(())
    }
}

/// Rebuilds the project's tree restricted to a set of scopes.
///
/// Registered as a component so rules that need a different view of the graph can ask for one
/// without being handed the metadata source itself.
pub struct ScopedGraphBuilder {
    project: Arc<ProjectDescriptor>,
    source: Arc<dyn ArtifactMetadataSource>,
    exclusions: ExclusionFilter,
    options: ResolveOptions,
}

impl ScopedGraphBuilder {
    pub fn new(
        project: Arc<ProjectDescriptor>,
        source: Arc<dyn ArtifactMetadataSource>,
        exclusions: ExclusionFilter,
    ) -> Self {
        Self {
            project,
            source,
            exclusions,
            options: ResolveOptions::default(),
        }
    }

    pub fn build(&self, scopes: &[DependencyScope]) -> Result<DependencyGraph, GraphResolutionError> {
        let filter = (
            ScopeFilter::new(scopes.iter().copied()),
            self.exclusions.clone(),
        );
        resolve_with(&self.project, self.source.as_ref(), &filter, &self.options)
    }
}

impl std::fmt::Debug for ScopedGraphBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedGraphBuilder")
            .field("project", &self.project.coordinate.to_string())
            .field("exclusions", &self.exclusions.patterns())
            .finish()
    }
}
