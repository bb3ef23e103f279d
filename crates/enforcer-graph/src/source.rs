use crate::model::DependencyDecl;
use enforcer_types::ArtifactCoordinate;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    #[error("no descriptor for {0}")]
    MissingDescriptor(String),
    #[error("metadata for {coordinate} unavailable: {reason}")]
    Unavailable { coordinate: String, reason: String },
}

/// Answers "what does artifact A at version V depend on".
///
/// Implementations are synchronous; a hung lookup is the implementation's problem, not the
/// resolver's.
pub trait ArtifactMetadataSource: Send + Sync {
    fn direct_dependencies(
        &self,
        coordinate: &ArtifactCoordinate,
    ) -> Result<Vec<DependencyDecl>, MetadataError>;
}

/// Metadata index held in memory, keyed by exact coordinate.
#[derive(Clone, Debug, Default)]
pub struct InMemoryMetadataSource {
    descriptors: BTreeMap<ArtifactCoordinate, Vec<DependencyDecl>>,
}

impl InMemoryMetadataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, coordinate: ArtifactCoordinate, dependencies: Vec<DependencyDecl>) {
        self.descriptors.insert(coordinate, dependencies);
    }

    /// Builder-style insert of compile-scope dependencies.
    pub fn with(mut self, coordinate: ArtifactCoordinate, dependencies: &[ArtifactCoordinate]) -> Self {
        self.insert(
            coordinate,
            dependencies.iter().cloned().map(DependencyDecl::from).collect(),
        );
        self
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl ArtifactMetadataSource for InMemoryMetadataSource {
    fn direct_dependencies(
        &self,
        coordinate: &ArtifactCoordinate,
    ) -> Result<Vec<DependencyDecl>, MetadataError> {
        self.descriptors
            .get(coordinate)
            .cloned()
            .ok_or_else(|| MetadataError::MissingDescriptor(coordinate.to_string()))
    }
}
