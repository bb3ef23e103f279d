//! Stable identifiers for built-in rule kinds.
//!
//! A rule kind is snake_case. Configured rule instances may carry their own id; when
//! they don't, the kind doubles as the instance id.

// Rule kinds
pub const RULE_ALWAYS_PASS: &str = "always_pass";
pub const RULE_ALWAYS_FAIL: &str = "always_fail";
pub const RULE_DEPENDENCY_CONVERGENCE: &str = "dependency_convergence";
pub const RULE_BANNED_DEPENDENCIES: &str = "banned_dependencies";
pub const RULE_REQUIRE_PROPERTY: &str = "require_property";
pub const RULE_REQUIRE_PROJECT_VERSION: &str = "require_project_version";
pub const RULE_NO_DEPENDENCY_CYCLES: &str = "no_dependency_cycles";

// Component lookup keys
pub const COMPONENT_SCOPED_GRAPH: &str = "graph.scoped";

// Tool-level
pub const RULE_TOOL_RUNTIME: &str = "tool.runtime";
