//! Run command implementation.

use std::path::Path;

use miette::{Result, miette};
use questpack_core::HostCallKind;
use questpack_host::{PacketHost, PacketManifest, PacketRuntime};
use tracing::debug;

use super::{Transcript, visit_label};
use crate::discovery;
use crate::output;

/// Loads the packet component, initializes it and replays visits.
pub fn execute(
    manifest_path: &Path,
    urls: &[String],
    reject: Option<HostCallKind>,
    as_json: bool,
) -> Result<()> {
    let manifest = PacketManifest::from_file(manifest_path)
        .map_err(|e| miette!("Failed to load manifest: {}", e))?;
    let wasm_path = manifest.wasm_path(&discovery::manifest_dir(manifest_path));

    debug!(manifest = %manifest_path.display(), wasm = %wasm_path.display(), "Running packet");

    let runtime = PacketRuntime::new().map_err(|e| miette!("Failed to start runtime: {}", e))?;

    let spinner = (!as_json).then(|| {
        output::create_spinner(&format!("Compiling {}", wasm_path.display()))
    });
    let loaded = match runtime.load(&wasm_path) {
        Ok(loaded) => {
            if let Some(spinner) = &spinner {
                output::spinner_success(
                    spinner,
                    &format!("{} v{}", manifest.packet.name, manifest.packet.version),
                );
            }
            loaded
        }
        Err(e) => {
            if let Some(spinner) = &spinner {
                output::spinner_failure(spinner, &manifest.packet.name);
            }
            return Err(miette!("Failed to load packet: {}", e));
        }
    };

    let mut host = PacketHost::new();
    if let Some(kind) = reject {
        host = host.with_rejection(kind);
    }
    let mut instance = runtime
        .instantiate(&loaded, host)
        .map_err(|e| miette!("Failed to instantiate packet: {}", e))?;

    let mut transcript = Transcript::default();
    let result = instance.init();
    let mut healthy = transcript.record("init", result, instance.take_calls());

    for url in urls {
        if !healthy {
            break;
        }
        let result = instance.visit(url);
        healthy = transcript.record(visit_label(url), result, instance.take_calls());
    }

    transcript.print(as_json);

    if transcript.faulted() {
        return Err(miette!("Packet '{}' faulted", instance.name()));
    }

    Ok(())
}
