use anyhow::Context;
use enforcer_graph::{DependencyDecl, DependencyScope, InMemoryMetadataSource, ProjectDescriptor};
use enforcer_types::ArtifactCoordinate;
use serde::Deserialize;
use std::collections::BTreeMap;

/// On-disk project file. Permissive: unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct ProjectFile {
    project: ProjectSection,
    #[serde(default)]
    properties: BTreeMap<String, String>,
    #[serde(default)]
    dependencies: Vec<DependencyEntry>,
    #[serde(default)]
    exclusions: Vec<String>,
    /// coordinate -> its direct dependencies
    #[serde(default)]
    artifacts: BTreeMap<String, Vec<DependencyEntry>>,
}

#[derive(Debug, Deserialize)]
struct ProjectSection {
    coordinate: String,
    #[serde(default)]
    basedir: Option<String>,
}

/// `"g:n:v"` or `{ coordinate = "g:n:v", scope = "test" }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DependencyEntry {
    Short(String),
    Full {
        coordinate: String,
        #[serde(default)]
        scope: Option<String>,
    },
}

impl DependencyEntry {
    fn to_decl(&self) -> anyhow::Result<DependencyDecl> {
        let (coordinate, scope) = match self {
            DependencyEntry::Short(c) => (c.as_str(), None),
            DependencyEntry::Full { coordinate, scope } => (coordinate.as_str(), scope.as_deref()),
        };
        let coordinate = parse_coordinate(coordinate)?;
        let scope = match scope {
            None => DependencyScope::default(),
            Some(s) => DependencyScope::parse(s).with_context(|| {
                format!("unknown scope '{s}' for {coordinate} (expected compile|runtime|provided|test|system)")
            })?,
        };
        Ok(DependencyDecl::new(coordinate, scope))
    }
}

/// Everything a project file describes, still independent of where it came from.
#[derive(Clone, Debug)]
pub struct ParsedProject {
    pub descriptor: ProjectDescriptor,
    pub metadata: InMemoryMetadataSource,
    pub exclusions: Vec<String>,
}

pub fn parse_project_toml(text: &str) -> anyhow::Result<ParsedProject> {
    let file: ProjectFile = toml::from_str(text).context("parse project TOML")?;

    let coordinate = parse_coordinate(&file.project.coordinate).context("[project].coordinate")?;
    let mut descriptor = ProjectDescriptor::new(coordinate);
    descriptor.basedir = file.project.basedir;
    descriptor.properties = file.properties;
    for (i, entry) in file.dependencies.iter().enumerate() {
        let decl = entry
            .to_decl()
            .with_context(|| format!("dependencies[{i}]"))?;
        descriptor.dependencies.push(decl);
    }

    let mut metadata = InMemoryMetadataSource::new();
    for (artifact, entries) in &file.artifacts {
        let coordinate =
            parse_coordinate(artifact).with_context(|| format!("[artifacts] key '{artifact}'"))?;
        let decls = entries
            .iter()
            .map(DependencyEntry::to_decl)
            .collect::<anyhow::Result<Vec<_>>>()
            .with_context(|| format!("[artifacts] '{artifact}'"))?;
        metadata.insert(coordinate, decls);
    }

    Ok(ParsedProject {
        descriptor,
        metadata,
        exclusions: file.exclusions,
    })
}

fn parse_coordinate(s: &str) -> anyhow::Result<ArtifactCoordinate> {
    s.parse::<ArtifactCoordinate>()
        .with_context(|| format!("invalid coordinate '{s}'"))
}
