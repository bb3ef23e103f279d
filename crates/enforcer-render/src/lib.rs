//! Rendering utilities for CI surfaces (Markdown, GitHub annotations).
//!
//! Renderers take a flattened view of the report, not the report type itself, so this crate has
//! no dependency on the schema crates.

#![forbid(unsafe_code)]

mod gha;
mod markdown;
mod model;

pub use gha::render_github_annotations;
pub use markdown::render_markdown;
pub use model::{
    RenderableReport, RenderableRule, RenderableRuleStatus, RenderableSeverity,
    RenderableVerdictStatus, RenderableViolation,
};
