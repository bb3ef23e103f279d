//! Project adapters: locate and read a project file, turn it into the graph crate's inputs.
//!
//! This crate is allowed to do filesystem IO. Everything after reading the file is delegated to
//! pure parsing, so the same logic is reachable from strings in tests.

#![forbid(unsafe_code)]

mod discover;
mod parse;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};

pub use discover::{PROJECT_FILE_NAMES, locate_project_file};
pub use parse::{ParsedProject, parse_project_toml};

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
pub mod fuzz {
    /// Parse arbitrary text as a project file. **Never panics** on any input.
    pub fn parse_project(text: &str) -> anyhow::Result<()> {
        let _ = super::parse::parse_project_toml(text)?;
        Ok(())
    }
}

/// A project file read from disk.
#[derive(Clone, Debug)]
pub struct LoadedProject {
    pub path: Utf8PathBuf,
    pub parsed: ParsedProject,
}

/// Read the project at `path` (a file, or a directory holding one).
///
/// Without an explicit `basedir`, the directory holding the project file is used.
pub fn load_project(path: &Utf8Path) -> anyhow::Result<LoadedProject> {
    let file = locate_project_file(path)?;
    let text = std::fs::read_to_string(&file).with_context(|| format!("read {file}"))?;
    let mut parsed = parse_project_toml(&text).with_context(|| format!("parse {file}"))?;

    if parsed.descriptor.basedir.is_none() {
        let dir = file.parent().unwrap_or_else(|| Utf8Path::new("."));
        parsed.descriptor.basedir = Some(dir.to_string());
    }

    tracing::debug!(
        path = %file,
        project = %parsed.descriptor.coordinate,
        artifacts = parsed.metadata.len(),
        "loaded project"
    );
    Ok(LoadedProject { path: file, parsed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn fuzz_parser_never_panics(input in ".*") {
            let _ = fuzz::parse_project(&input);
        }
    }
}
