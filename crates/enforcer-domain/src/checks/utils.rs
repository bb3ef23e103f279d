use super::RuleConfigError;
use enforcer_graph::matches_coordinate;
use enforcer_types::ArtifactCoordinate;
use globset::{Glob, GlobSet, GlobSetBuilder};

pub fn build_globset(rule_id: &str, patterns: &[String]) -> Result<Option<GlobSet>, RuleConfigError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let invalid = |pattern: &str, source: globset::Error| RuleConfigError::InvalidGlob {
        rule_id: rule_id.to_string(),
        pattern: pattern.to_string(),
        source,
    };

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        // Case-sensitive, ':' is an ordinary character.
        builder.add(Glob::new(pattern).map_err(|e| invalid(pattern, e))?);
    }
    builder
        .build()
        .map(Some)
        .map_err(|e| invalid(&patterns.join(", "), e))
}

pub fn is_allowed(allow: Option<&GlobSet>, value: &str) -> bool {
    allow.map(|set| set.is_match(value)).unwrap_or(false)
}

pub fn coordinate_allowed(allow: Option<&GlobSet>, coordinate: &ArtifactCoordinate) -> bool {
    allow.is_some_and(|set| matches_coordinate(set, coordinate))
}

/// Put the user's headline on top of each message the rule produced.
pub fn with_headline(headline: Option<&str>, messages: Vec<String>) -> Vec<String> {
    match headline {
        None => messages,
        Some(h) => messages.into_iter().map(|m| format!("{h}\n{m}")).collect(),
    }
}
