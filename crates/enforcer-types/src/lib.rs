//! Stable DTOs and IDs used across the enforcer workspace.
//!
//! This crate is intentionally boring:
//! - artifact coordinates and their version-less keys
//! - data types for the emitted violation report
//! - stable string IDs for built-in rule kinds
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod coordinate;
pub mod explain;
pub mod ids;
pub mod receipt;

pub use coordinate::{ArtifactCoordinate, ArtifactKey, CoordinateParseError, DEFAULT_TYPE};
pub use explain::{ExamplePair, Explanation, lookup_explanation};
pub use receipt::{
    EnforcerData, EnforcerReport, ReportEnvelope, RuleRecord, RuleStatus, SCHEMA_REPORT_V1,
    Severity, SeverityCounts, ToolMeta, Verdict, Violation,
};
