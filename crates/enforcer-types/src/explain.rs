//! Explain registry for built-in rule kinds.
//!
//! Maps rule kind IDs to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a rule kind.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule.
    pub title: &'static str,
    /// What the rule checks and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after configuration or project examples.
    pub examples: ExamplePair,
}

/// Before and after examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Input that would trigger a violation.
    pub before: &'static str,
    /// Input that passes the rule.
    pub after: &'static str,
}

/// Look up an explanation by rule kind.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        ids::RULE_ALWAYS_PASS => Some(explain_always_pass()),
        ids::RULE_ALWAYS_FAIL => Some(explain_always_fail()),
        ids::RULE_DEPENDENCY_CONVERGENCE => Some(explain_dependency_convergence()),
        ids::RULE_BANNED_DEPENDENCIES => Some(explain_banned_dependencies()),
        ids::RULE_REQUIRE_PROPERTY => Some(explain_require_property()),
        ids::RULE_REQUIRE_PROJECT_VERSION => Some(explain_require_project_version()),
        ids::RULE_NO_DEPENDENCY_CYCLES => Some(explain_no_dependency_cycles()),
        _ => None,
    }
}

/// List all known rule kinds.
pub fn all_rule_ids() -> &'static [&'static str] {
    &[
        ids::RULE_ALWAYS_PASS,
        ids::RULE_ALWAYS_FAIL,
        ids::RULE_DEPENDENCY_CONVERGENCE,
        ids::RULE_BANNED_DEPENDENCIES,
        ids::RULE_REQUIRE_PROPERTY,
        ids::RULE_REQUIRE_PROJECT_VERSION,
        ids::RULE_NO_DEPENDENCY_CYCLES,
    ]
}

fn explain_always_pass() -> Explanation {
    Explanation {
        title: "Always Pass",
        description: "\
A rule that never reports a violation. Useful to verify that a rule pass runs at all,
and as a placeholder while a project migrates its configuration.",
        remediation: "Nothing to fix.",
        examples: ExamplePair {
            before: r#"# no rules configured"#,
            after: r#"[[rules]]
kind = "always_pass""#,
        },
    }
}

fn explain_always_fail() -> Explanation {
    Explanation {
        title: "Always Fail",
        description: "\
A rule that always reports a violation. It exists to exercise the failure path of a
build: the report must contain the violation and a fail-level rule must fail the build.",
        remediation: "\
Remove the rule, or set `level = \"warn\"` to keep it visible without failing the build.",
        examples: ExamplePair {
            before: r#"[[rules]]
kind = "always_fail""#,
            after: r#"[[rules]]
kind = "always_fail"
level = "warn""#,
        },
    }
}

fn explain_dependency_convergence() -> Explanation {
    Explanation {
        title: "Dependency Convergence",
        description: "\
Detects artifacts that the resolved dependency tree reaches at more than one version.

Every path to an artifact is kept in the tree, so when library A pulls in `org:libB:2.0`
and library C pulls in `org:libB:3.0`, both are visible. Only one version ends up on the
classpath, and which one depends on resolution order:
- code compiled against the other version may fail at runtime
- upgrades of unrelated dependencies silently change the selected version",
        remediation: "\
Pick one version and make every path agree on it:
- declare the artifact directly at the chosen version
- exclude the artifact from the dependency that pulls in the unwanted version
- upgrade the dependency that lags behind",
        examples: ExamplePair {
            before: r#"[artifacts]
"org:libA:1.0" = ["org:libB:2.0"]
"org:libC:1.0" = ["org:libB:3.0"]"#,
            after: r#"[artifacts]
"org:libA:1.1" = ["org:libB:3.0"]
"org:libC:1.0" = ["org:libB:3.0"]"#,
        },
    }
}

fn explain_banned_dependencies() -> Explanation {
    Explanation {
        title: "Banned Dependencies",
        description: "\
Fails when any artifact in the resolved tree matches a `banned` glob pattern, written as
`group:name` or `group:name:version`. Patterns in `allow` carve out exceptions.
With `transitive = false` only the project's direct dependencies are inspected.",
        remediation: "\
Remove the banned artifact, exclude it from the dependency that pulls it in, or add an
`allow` pattern when the use is deliberate.",
        examples: ExamplePair {
            before: r#"[[rules]]
kind = "banned_dependencies"
banned = ["commons-logging:*"]"#,
            after: r#"[[rules]]
kind = "banned_dependencies"
banned = ["commons-logging:*"]
allow = ["commons-logging:commons-logging:1.2"]"#,
        },
    }
}

fn explain_require_property() -> Explanation {
    Explanation {
        title: "Require Property",
        description: "\
Fails when a property expression cannot be resolved, or when `regex` is given and the
resolved value does not match it. Properties resolve with user properties first, then
project properties, then system and environment values.",
        remediation: "\
Declare the property in the project's `[properties]` table or pass it with `-D name=value`.",
        examples: ExamplePair {
            before: r#"[[rules]]
kind = "require_property"
property = "release.channel"
regex = "stable|beta""#,
            after: r#"[properties]
"release.channel" = "stable""#,
        },
    }
}

fn explain_require_project_version() -> Explanation {
    Explanation {
        title: "Require Project Version",
        description: "\
Checks `${project.version}` against a `regex`, and with `no_snapshots = true` rejects
versions ending in `-SNAPSHOT`. Release builds should never publish snapshot artifacts.",
        remediation: "Set the project version to a release version before building a release.",
        examples: ExamplePair {
            before: r#"[project]
coordinate = "org:app:1.0-SNAPSHOT""#,
            after: r#"[project]
coordinate = "org:app:1.0""#,
        },
    }
}

fn explain_no_dependency_cycles() -> Explanation {
    Explanation {
        title: "No Dependency Cycles",
        description: "\
Reports every branch of the dependency tree that had to be truncated because an artifact
depends, directly or transitively, on itself. Resolution tolerates cycles; this rule
turns them into violations.",
        remediation: "Break the cycle by removing or excluding one of the edges.",
        examples: ExamplePair {
            before: r#"[artifacts]
"org:a:1.0" = ["org:b:1.0"]
"org:b:1.0" = ["org:a:1.0"]"#,
            after: r#"[artifacts]
"org:a:1.0" = ["org:b:1.0"]
"org:b:1.0" = []"#,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_rule_has_an_explanation() {
        for id in all_rule_ids() {
            let exp = lookup_explanation(id).expect("explanation");
            assert!(!exp.title.is_empty());
            assert!(!exp.remediation.is_empty());
        }
    }

    #[test]
    fn unknown_identifier_has_none() {
        assert!(lookup_explanation("deps.nope").is_none());
    }
}
