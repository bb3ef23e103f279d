//! Dependency graph resolution (no IO).
//!
//! Input: a project descriptor plus an artifact metadata source.
//! Output: an immutable tree of every path from the project to each artifact it reaches.
//!
//! The tree is deliberately not de-duplicated: an artifact reached through two paths is two
//! nodes, which is what lets convergence rules see conflicting versions.

#![forbid(unsafe_code)]

pub mod filter;
pub mod model;
pub mod source;

mod resolve;

pub use filter::{AcceptAll, ArtifactFilter, ExclusionFilter, ScopeFilter, matches_coordinate};
pub use model::{
    DependencyDecl, DependencyGraph, DependencyNode, DependencyScope, NodeId, NodeRef, NodeState,
    ProjectDescriptor,
};
pub use resolve::{GraphResolutionError, ResolveOptions, ScopedGraphBuilder, resolve, resolve_with};
pub use source::{ArtifactMetadataSource, InMemoryMetadataSource, MetadataError};
