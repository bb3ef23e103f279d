use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Artifact type assumed when a coordinate omits it.
pub const DEFAULT_TYPE: &str = "jar";

/// Immutable identity of one artifact payload: `(group, name, version, type, classifier)`.
///
/// The textual form is colon-separated:
/// - `group:name:version` (type defaults to `jar`)
/// - `group:name:type:version`
/// - `group:name:type:classifier:version`
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactCoordinate {
    group: String,
    name: String,
    version: String,
    kind: String,
    classifier: Option<String>,
}

/// The version-less part of a coordinate.
///
/// Two coordinates with equal keys but different versions are "the same artifact, different
/// version"; this is what convergence checks group by.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactKey {
    pub group: String,
    pub name: String,
    pub kind: String,
    pub classifier: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CoordinateParseError {
    #[error("invalid coordinate '{0}': expected group:name[:type[:classifier]]:version")]
    Shape(String),
    #[error("invalid coordinate '{0}': empty segment")]
    EmptySegment(String),
}

impl ArtifactCoordinate {
    pub fn new(group: &str, name: &str, version: &str) -> Self {
        Self {
            group: group.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            kind: DEFAULT_TYPE.to_string(),
            classifier: None,
        }
    }

    pub fn with_type(mut self, kind: &str) -> Self {
        self.kind = kind.to_string();
        self
    }

    pub fn with_classifier(mut self, classifier: &str) -> Self {
        self.classifier = (!classifier.is_empty()).then(|| classifier.to_string());
        self
    }

    pub fn with_version(&self, version: &str) -> Self {
        let mut next = self.clone();
        next.version = version.to_string();
        next
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    pub fn key(&self) -> ArtifactKey {
        ArtifactKey {
            group: self.group.clone(),
            name: self.name.clone(),
            kind: self.kind.clone(),
            classifier: self.classifier.clone(),
        }
    }

    /// `group:name:version`, the short form used for glob matching.
    pub fn short_form(&self) -> String {
        format!("{}:{}:{}", self.group, self.name, self.version)
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.classifier, self.kind.as_str()) {
            (None, DEFAULT_TYPE) => write!(f, "{}:{}:{}", self.group, self.name, self.version),
            (None, kind) => write!(f, "{}:{}:{}:{}", self.group, self.name, kind, self.version),
            (Some(c), kind) => write!(
                f,
                "{}:{}:{}:{}:{}",
                self.group, self.name, kind, c, self.version
            ),
        }
    }
}

impl FromStr for ArtifactCoordinate {
    type Err = CoordinateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(CoordinateParseError::EmptySegment(s.to_string()));
        }
        let coord = match parts.as_slice() {
            [group, name, version] => ArtifactCoordinate::new(group, name, version),
            [group, name, kind, version] => {
                ArtifactCoordinate::new(group, name, version).with_type(kind)
            }
            [group, name, kind, classifier, version] => ArtifactCoordinate::new(group, name, version)
                .with_type(kind)
                .with_classifier(classifier),
            _ => return Err(CoordinateParseError::Shape(s.to_string())),
        };
        Ok(coord)
    }
}

impl TryFrom<String> for ArtifactCoordinate {
    type Error = CoordinateParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ArtifactCoordinate> for String {
    fn from(value: ArtifactCoordinate) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)?;
        if self.kind != DEFAULT_TYPE || self.classifier.is_some() {
            write!(f, ":{}", self.kind)?;
        }
        if let Some(c) = &self.classifier {
            write!(f, ":{c}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_form_with_default_type() {
        let c: ArtifactCoordinate = "org:libA:1.0".parse().expect("parse");
        assert_eq!(c.group(), "org");
        assert_eq!(c.name(), "libA");
        assert_eq!(c.version(), "1.0");
        assert_eq!(c.kind(), "jar");
        assert_eq!(c.classifier(), None);
        assert_eq!(c.to_string(), "org:libA:1.0");
    }

    #[test]
    fn parses_type_and_classifier() {
        let c: ArtifactCoordinate = "org:libA:pom:1.0".parse().expect("parse");
        assert_eq!(c.kind(), "pom");
        assert_eq!(c.to_string(), "org:libA:pom:1.0");

        let c: ArtifactCoordinate = "org:libA:jar:sources:1.0".parse().expect("parse");
        assert_eq!(c.classifier(), Some("sources"));
        assert_eq!(c.to_string(), "org:libA:jar:sources:1.0");
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(matches!(
            "org:libA".parse::<ArtifactCoordinate>(),
            Err(CoordinateParseError::Shape(_))
        ));
        assert!(matches!(
            "org::1.0".parse::<ArtifactCoordinate>(),
            Err(CoordinateParseError::EmptySegment(_))
        ));
    }

    #[test]
    fn key_ignores_version_only() {
        let a = ArtifactCoordinate::new("org", "libB", "2.0");
        let b = a.with_version("3.0");
        assert_ne!(a, b);
        assert_eq!(a.key(), b.key());

        let sources = b.clone().with_classifier("sources");
        assert_ne!(a.key(), sources.key());
        assert_eq!(a.key().to_string(), "org:libB");
        assert_eq!(sources.key().to_string(), "org:libB:jar:sources");
    }

    #[test]
    fn serde_uses_textual_form() {
        let c = ArtifactCoordinate::new("org", "libA", "1.0");
        let json = serde_json::to_string(&c).expect("serialize");
        assert_eq!(json, "\"org:libA:1.0\"");
        let back: ArtifactCoordinate = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, c);
    }
}
