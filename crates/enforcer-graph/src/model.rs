use enforcer_types::{ArtifactCoordinate, ArtifactKey};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Classpath scope a dependency is declared (or mediated) with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    #[default]
    Compile,
    Runtime,
    Provided,
    Test,
    System,
}

impl DependencyScope {
    /// Effective scope of a transitive dependency declared with `child` under a node reached
    /// with `self`. `None` means the dependency does not propagate transitively.
    pub fn mediate(self, child: DependencyScope) -> Option<DependencyScope> {
        use DependencyScope::*;
        match child {
            Provided | Test | System => None,
            Compile => Some(match self {
                Compile => Compile,
                Runtime => Runtime,
                Provided | System => Provided,
                Test => Test,
            }),
            Runtime => Some(match self {
                Compile | Runtime => Runtime,
                Provided | System => Provided,
                Test => Test,
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DependencyScope::Compile => "compile",
            DependencyScope::Runtime => "runtime",
            DependencyScope::Provided => "provided",
            DependencyScope::Test => "test",
            DependencyScope::System => "system",
        }
    }

    pub fn parse(v: &str) -> Option<DependencyScope> {
        match v {
            "compile" => Some(DependencyScope::Compile),
            "runtime" => Some(DependencyScope::Runtime),
            "provided" => Some(DependencyScope::Provided),
            "test" => Some(DependencyScope::Test),
            "system" => Some(DependencyScope::System),
            _ => None,
        }
    }
}

/// One "depends on" declaration, either from the project or from artifact metadata.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DependencyDecl {
    pub coordinate: ArtifactCoordinate,
    #[serde(default)]
    pub scope: DependencyScope,
}

impl DependencyDecl {
    pub fn new(coordinate: ArtifactCoordinate, scope: DependencyScope) -> Self {
        Self { coordinate, scope }
    }
}

impl From<ArtifactCoordinate> for DependencyDecl {
    fn from(coordinate: ArtifactCoordinate) -> Self {
        Self::new(coordinate, DependencyScope::Compile)
    }
}

/// What the external build-tool configuration layer tells us about the project.
#[derive(Clone, Debug)]
pub struct ProjectDescriptor {
    pub coordinate: ArtifactCoordinate,
    pub basedir: Option<String>,
    /// Properties declared by the project itself.
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<DependencyDecl>,
}

impl ProjectDescriptor {
    pub fn new(coordinate: ArtifactCoordinate) -> Self {
        Self {
            coordinate,
            basedir: None,
            properties: BTreeMap::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, decl: impl Into<DependencyDecl>) -> Self {
        self.dependencies.push(decl.into());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeState {
    /// Dependencies were looked up and attached as children.
    Expanded,
    /// Rejected by the caller's filter; present but never expanded.
    Excluded,
    /// Its key already appears on the path from the root; kept as a leaf.
    CycleTruncated,
}

#[derive(Clone, Debug)]
pub struct DependencyNode {
    pub coordinate: ArtifactCoordinate,
    pub scope: DependencyScope,
    pub state: NodeState,
    pub depth: usize,
    /// Navigation only; ownership runs through `children`.
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Immutable, fully-resolved dependency tree. Node 0 is the project itself.
#[derive(Clone, Debug)]
pub struct DependencyGraph {
    nodes: Vec<DependencyNode>,
}

impl DependencyGraph {
    pub(crate) fn with_root(coordinate: ArtifactCoordinate) -> Self {
        Self {
            nodes: vec![DependencyNode {
                coordinate,
                scope: DependencyScope::Compile,
                state: NodeState::Expanded,
                depth: 0,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub(crate) fn push_child(
        &mut self,
        parent: NodeId,
        coordinate: ArtifactCoordinate,
        scope: DependencyScope,
        state: NodeState,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let depth = self.nodes[parent.0].depth + 1;
        self.nodes.push(DependencyNode {
            coordinate,
            scope,
            state,
            depth,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub(crate) fn node_ref(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { graph: self, id }
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            graph: self,
            id: NodeId::ROOT,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then_some(NodeRef { graph: self, id })
    }

    /// Number of nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a graph carries at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order traversal starting at the root.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_>> {
        let mut stack = vec![NodeId::ROOT];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
            Some(NodeRef { graph: self, id })
        })
    }

    /// Every node except the root, in pre-order.
    pub fn dependencies(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.iter().skip(1)
    }

    /// Every version reached per artifact key, with the nodes that reach it.
    ///
    /// Excluded nodes are not counted: the caller asked not to see them.
    pub fn versions_by_key(&self) -> BTreeMap<ArtifactKey, BTreeMap<String, Vec<NodeId>>> {
        let mut out: BTreeMap<ArtifactKey, BTreeMap<String, Vec<NodeId>>> = BTreeMap::new();
        for node in self.dependencies() {
            if node.state() == NodeState::Excluded {
                continue;
            }
            out.entry(node.coordinate().key())
                .or_default()
                .entry(node.coordinate().version().to_string())
                .or_default()
                .push(node.id());
        }
        out
    }
}

/// Borrowed navigation handle into a [`DependencyGraph`].
#[derive(Clone, Copy, Debug)]
pub struct NodeRef<'a> {
    graph: &'a DependencyGraph,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    fn node(&self) -> &'a DependencyNode {
        &self.graph.nodes[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn coordinate(&self) -> &'a ArtifactCoordinate {
        &self.node().coordinate
    }

    pub fn scope(&self) -> DependencyScope {
        self.node().scope
    }

    pub fn state(&self) -> NodeState {
        self.node().state
    }

    pub fn depth(&self) -> usize {
        self.node().depth
    }

    pub fn is_root(&self) -> bool {
        self.id == NodeId::ROOT
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        let graph = self.graph;
        self.node().parent.map(|id| NodeRef { graph, id })
    }

    pub fn children(self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let graph = self.graph;
        self.node()
            .children
            .iter()
            .map(move |&id| NodeRef { graph, id })
    }

    /// Parent, grandparent, ... up to and including the root.
    pub fn ancestors(self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let mut cur = self.parent();
        std::iter::from_fn(move || {
            let next = cur?;
            cur = next.parent();
            Some(next)
        })
    }

    /// Coordinates from the root down to this node.
    pub fn path_from_root(&self) -> Vec<&'a ArtifactCoordinate> {
        let mut path: Vec<&ArtifactCoordinate> =
            self.ancestors().map(|n| n.coordinate()).collect();
        path.reverse();
        path.push(self.coordinate());
        path
    }

    /// `root -> a -> b`, for diagnostics.
    pub fn path_display(&self) -> String {
        self.path_from_root()
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}
