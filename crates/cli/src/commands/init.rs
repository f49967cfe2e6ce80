//! Init command implementation.

use std::fs;
use std::path::Path;

use miette::{Result, miette};
use questpack_core::QuestContent;
use questpack_host::{MANIFEST_NAME, PacketManifest, PacketMetadata};

use crate::output;

const CONTENT_NAME: &str = "quest.json";

/// Writes a packet manifest and the built-in quest content.
pub fn execute(name: &str, force: bool) -> Result<()> {
    scaffold(Path::new("."), name, force)?;

    output::success(&format!("Created {} and {}", MANIFEST_NAME, CONTENT_NAME));
    output::info("Run 'questpack simulate <URL>' to try the quest");

    Ok(())
}

fn scaffold(dir: &Path, name: &str, force: bool) -> Result<()> {
    let manifest_path = dir.join(MANIFEST_NAME);
    let content_path = dir.join(CONTENT_NAME);

    for path in [&manifest_path, &content_path] {
        if path.exists() && !force {
            return Err(miette!(
                "{} already exists. Use --force to overwrite.",
                path.display()
            ));
        }
    }

    let manifest = PacketManifest {
        packet: PacketMetadata::new(name, "0.1.0")
            .with_description("Complete a task by visiting a page"),
        content: Some(CONTENT_NAME.to_string()),
    };
    let manifest_json = manifest
        .to_json()
        .map_err(|e| miette!("Failed to render manifest: {}", e))?;
    let content_json = QuestContent::default()
        .to_json()
        .map_err(|e| miette!("Failed to render content: {}", e))?;

    fs::write(&manifest_path, manifest_json)
        .map_err(|e| miette!("Failed to write {}: {}", manifest_path.display(), e))?;
    fs::write(&content_path, content_json)
        .map_err(|e| miette!("Failed to write {}: {}", content_path.display(), e))?;

    Ok(())
}
