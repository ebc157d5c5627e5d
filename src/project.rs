// file: src/project.rs
// version: 1.0.0
// guid: 51e58eac-7146-4339-927a-a30358175a0a

//! Project path discovery and validation for the CLI layer

use crate::error::Result;
use crate::variant::{CommandVariant, ProjectKind};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// First project-like file in `dir`, by name and not recursive
pub fn discover(dir: &Path, variant: CommandVariant) -> Option<PathBuf> {
    let found = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .find(|entry| {
            entry
                .file_name()
                .to_str()
                .and_then(ProjectKind::of)
                .is_some()
        })
        .map(|entry| entry.into_path());

    debug!(
        "Project discovery for {} in {}: {:?}",
        variant,
        dir.display(),
        found
    );
    found
}

/// Validate an explicit path, or discover one in `dir`. `Ok(None)` means
/// nothing was found and the toolchain's glob default applies.
pub fn resolve(
    explicit: Option<&str>,
    dir: &Path,
    variant: CommandVariant,
) -> Result<Option<String>> {
    match explicit {
        Some(path) => {
            variant.validate_project_path(path)?;
            Ok(Some(path.to_string()))
        }
        None => Ok(discover(dir, variant).map(|p| p.display().to_string())),
    }
}
