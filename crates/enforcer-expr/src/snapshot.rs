use enforcer_types::ArtifactCoordinate;
use std::collections::BTreeMap;

/// Which layer answered a lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertySource {
    User,
    Project,
    System,
}

/// Immutable copy of every property layer, taken at context construction.
///
/// Nothing reads live process state after `build()`, so the same name always resolves to the
/// same value within one build pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertySnapshot {
    user: BTreeMap<String, String>,
    project: BTreeMap<String, String>,
    system: BTreeMap<String, String>,
}

impl PropertySnapshot {
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.lookup_with_source(name).map(|(v, _)| v)
    }

    pub fn lookup_with_source(&self, name: &str) -> Option<(&str, PropertySource)> {
        if let Some(v) = self.user.get(name) {
            return Some((v.as_str(), PropertySource::User));
        }
        if let Some(v) = self.project.get(name) {
            return Some((v.as_str(), PropertySource::Project));
        }
        self.system
            .get(name)
            .map(|v| (v.as_str(), PropertySource::System))
    }

    /// Every visible name, each mapped to its winning value.
    pub fn effective(&self) -> BTreeMap<&str, &str> {
        let mut out = BTreeMap::new();
        for layer in [&self.system, &self.project, &self.user] {
            for (k, v) in layer {
                out.insert(k.as_str(), v.as_str());
            }
        }
        out
    }
}

#[derive(Clone, Debug, Default)]
pub struct SnapshotBuilder {
    coordinate: Option<ArtifactCoordinate>,
    basedir: Option<String>,
    declared: BTreeMap<String, String>,
    user: BTreeMap<String, String>,
    system: BTreeMap<String, String>,
    env: BTreeMap<String, String>,
}

impl SnapshotBuilder {
    pub fn project(mut self, coordinate: &ArtifactCoordinate) -> Self {
        self.coordinate = Some(coordinate.clone());
        self
    }

    pub fn basedir(mut self, basedir: impl Into<String>) -> Self {
        self.basedir = Some(basedir.into());
        self
    }

    pub fn project_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.declared.insert(name.into(), value.into());
        self
    }

    pub fn project_properties<I, K, V>(mut self, props: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.declared
            .extend(props.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn user_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.user.insert(name.into(), value.into());
        self
    }

    pub fn user_properties<I, K, V>(mut self, props: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.user
            .extend(props.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn system_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.system.insert(name.into(), value.into());
        self
    }

    /// Environment variable, visible as `env.NAME`.
    pub fn env_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    /// Copy the current process environment. This is the only point live state is read.
    pub fn capture_process_env(mut self) -> Self {
        self.env.extend(std::env::vars());
        self
    }

    pub fn build(self) -> PropertySnapshot {
        let mut project = BTreeMap::new();
        for (k, v) in &self.declared {
            project.insert(k.clone(), v.clone());
            project.insert(format!("project.properties.{k}"), v.clone());
        }
        if let Some(c) = &self.coordinate {
            for (name, value) in [
                ("project.groupId", c.group()),
                ("project.group", c.group()),
                ("project.artifactId", c.name()),
                ("project.name", c.name()),
                ("project.version", c.version()),
                ("project.type", c.kind()),
            ] {
                project.insert(name.to_string(), value.to_string());
            }
        }
        if let Some(basedir) = &self.basedir {
            project.insert("basedir".to_string(), basedir.clone());
            project.insert("project.basedir".to_string(), basedir.clone());
        }

        let mut system = self.system;
        for (k, v) in self.env {
            system.insert(format!("env.{k}"), v);
        }

        PropertySnapshot {
            user: self.user,
            project,
            system,
        }
    }
}
