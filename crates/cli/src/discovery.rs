//! Packet manifest discovery logic.

use std::path::{Path, PathBuf};

use miette::{Result, miette};
use questpack_host::MANIFEST_NAME;

/// Finds the packet manifest by searching from the current directory upwards.
pub fn find_manifest() -> Result<PathBuf> {
    find_manifest_from(
        &std::env::current_dir().map_err(|e| miette!("Cannot get current directory: {}", e))?,
    )
}

/// Finds the packet manifest starting from the given directory.
pub fn find_manifest_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let manifest = current.join(MANIFEST_NAME);

        if manifest.is_file() {
            return Ok(manifest);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => {
                return Err(miette!(
                    "{} not found in {} or any parent directory",
                    MANIFEST_NAME,
                    start.display()
                ));
            }
        }
    }
}

/// Returns the directory manifest paths are resolved against.
pub fn manifest_dir(manifest_path: &Path) -> PathBuf {
    manifest_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
