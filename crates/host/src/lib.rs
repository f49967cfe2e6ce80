//! Questpack Host - WASM component harness for quest packets.
//!
//! Loads a compiled packet, provides the `component:quest-v1` imports and
//! records every call the packet makes. The harness keeps no quest state of
//! its own; it exists to observe the packet contract.

mod error;
mod host;
mod manifest;
mod runtime;

mod bindings {
    wasmtime::component::bindgen!({
        world: "packet",
        path: "../../wit",
        imports: { default: trappable },
    });
}

pub use error::{PacketError, Result};
pub use host::PacketHost;
pub use manifest::{MANIFEST_NAME, PacketManifest, PacketMetadata};
pub use runtime::{LoadedPacket, PacketInstance, PacketRuntime};
