//! Property expressions (`${project.version}`) resolved against a snapshot taken once per
//! build invocation.
//!
//! Precedence, highest first: user-supplied properties, project properties (built-in
//! coordinates plus declared properties), system and environment values.

#![forbid(unsafe_code)]

mod resolver;
mod snapshot;

pub use resolver::{ExpressionResolver, UnresolvedExpressionError};
pub use snapshot::{PropertySnapshot, PropertySource, SnapshotBuilder};
