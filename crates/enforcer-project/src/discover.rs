use camino::{Utf8Path, Utf8PathBuf};

/// File names tried, in order, when the caller points at a directory.
pub const PROJECT_FILE_NAMES: &[&str] = &["enforcer-project.toml", "project.toml"];

/// Resolve `path` to a project file: a file is taken as-is, a directory is searched for one of
/// [`PROJECT_FILE_NAMES`].
pub fn locate_project_file(path: &Utf8Path) -> anyhow::Result<Utf8PathBuf> {
    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }
    for name in PROJECT_FILE_NAMES {
        let candidate = path.join(name);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    anyhow::bail!(
        "no project file in {path} (looked for {})",
        PROJECT_FILE_NAMES.join(", ")
    )
}
