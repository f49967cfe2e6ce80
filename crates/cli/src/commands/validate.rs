//! Validate command implementation.

use std::path::Path;

use miette::{Result, miette};
use questpack_host::PacketManifest;

use crate::discovery;
use crate::output;

/// Validates the packet manifest and its content table.
pub fn execute(manifest_path: &Path) -> Result<()> {
    output::info(&format!("Validating {}...", manifest_path.display()));

    let manifest = match PacketManifest::from_file(manifest_path) {
        Ok(manifest) => manifest,
        Err(e) => {
            output::error(&format!("Manifest error: {}", e));
            return Err(miette!("Validation failed: {}", e));
        }
    };
    let dir = discovery::manifest_dir(manifest_path);

    let content = match manifest.load_content(&dir) {
        Ok(content) => content,
        Err(e) => {
            output::error(&format!("Content error: {}", e));
            return Err(miette!("Validation failed: {}", e));
        }
    };

    if let Some(note) = content_note(&manifest, &dir) {
        output::info(&note);
    }

    let wasm_path = manifest.wasm_path(&dir);
    if !wasm_path.is_file() {
        output::warning(&format!(
            "Component {} not built yet",
            wasm_path.display()
        ));
    }

    output::success(&format!(
        "Packet '{}' v{} is valid",
        manifest.packet.name, manifest.packet.version
    ));
    output::key_value("item", &format!("{} ({})", content.item.id, content.item.url));
    output::key_value(
        "task",
        &format!("{}/{}", content.task.qid, content.task.tid),
    );
    output::key_value(
        "trigger",
        &format!(
            "contains {:?} within {} bytes",
            content.trigger.signature, content.trigger.inspection_capacity
        ),
    );

    Ok(())
}

/// Reminds the user that a declared content file is not what the component runs.
fn content_note(manifest: &PacketManifest, dir: &Path) -> Option<String> {
    manifest.content_path(dir).map(|path| {
        format!(
            "{} is checked on its own; it is not compared with the table compiled into the component",
            path.display()
        )
    })
}
