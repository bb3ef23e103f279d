//! Use case orchestration for enforcer.
//!
//! This crate provides the application layer: use cases that coordinate the project, graph,
//! domain, and render layers. It is intentionally thin and delegates heavy lifting to the
//! appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod explain;
mod render;
mod report;
mod schema;
mod tree;

pub use check::{CheckInput, CheckOutput, runtime_error_report, run_check, verdict_exit_code};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use render::{render_annotations, render_markdown};
pub use report::{parse_report_json, serialize_report, to_renderable};
pub use schema::{SchemaKind, render_schema};
pub use tree::{render_tree, run_tree};
