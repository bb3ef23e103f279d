use crate::model::DependencyScope;
use enforcer_types::ArtifactCoordinate;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;

/// Decides whether an artifact is expanded during resolution.
///
/// Rejected artifacts still appear in the tree, as unexpanded leaves.
pub trait ArtifactFilter: Send + Sync {
    fn accepts(&self, coordinate: &ArtifactCoordinate, scope: DependencyScope) -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl ArtifactFilter for AcceptAll {
    fn accepts(&self, _coordinate: &ArtifactCoordinate, _scope: DependencyScope) -> bool {
        true
    }
}

/// Both filters must accept.
impl<A: ArtifactFilter, B: ArtifactFilter> ArtifactFilter for (A, B) {
    fn accepts(&self, coordinate: &ArtifactCoordinate, scope: DependencyScope) -> bool {
        self.0.accepts(coordinate, scope) && self.1.accepts(coordinate, scope)
    }
}

/// True when `set` matches the coordinate written as `group:name`, `group:name:version`, or its
/// full display form.
pub fn matches_coordinate(set: &GlobSet, coordinate: &ArtifactCoordinate) -> bool {
    set.is_match(format!("{}:{}", coordinate.group(), coordinate.name()))
        || set.is_match(coordinate.short_form())
        || set.is_match(coordinate.to_string())
}

/// Rejects artifacts matching any glob, with the same forms as [`matches_coordinate`].
#[derive(Clone, Debug, Default)]
pub struct ExclusionFilter {
    patterns: Vec<String>,
    set: Option<GlobSet>,
}

impl ExclusionFilter {
    pub fn new(patterns: &[String]) -> Result<Self, globset::Error> {
        if patterns.is_empty() {
            return Ok(Self::default());
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern)?);
        }
        Ok(Self {
            patterns: patterns.to_vec(),
            set: Some(builder.build()?),
        })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl ArtifactFilter for ExclusionFilter {
    fn accepts(&self, coordinate: &ArtifactCoordinate, _scope: DependencyScope) -> bool {
        let Some(set) = &self.set else {
            return true;
        };
        !matches_coordinate(set, coordinate)
    }
}

/// Accepts only artifacts reached with one of the given scopes.
#[derive(Clone, Debug)]
pub struct ScopeFilter {
    scopes: BTreeSet<DependencyScope>,
}

impl ScopeFilter {
    pub fn new(scopes: impl IntoIterator<Item = DependencyScope>) -> Self {
        Self {
            scopes: scopes.into_iter().collect(),
        }
    }
}

impl ArtifactFilter for ScopeFilter {
    fn accepts(&self, _coordinate: &ArtifactCoordinate, scope: DependencyScope) -> bool {
        self.scopes.contains(&scope)
    }
}
