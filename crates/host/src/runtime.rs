//! WASM component runtime for quest packets using wasmtime.

use std::path::Path;

use questpack_core::HostCall;
use tracing::{info, warn};
use wasmtime::component::{Component, HasSelf, Linker};
use wasmtime::{Config, Engine, Store};

use crate::bindings::Packet;
use crate::error::{PacketError, Result};
use crate::host::PacketHost;

/// Compiles packet components and instantiates them.
pub struct PacketRuntime {
    engine: Engine,
    linker: Linker<PacketHost>,
}

impl PacketRuntime {
    /// Creates a runtime with the packet imports linked.
    pub fn new() -> Result<Self> {
        let mut config = Config::new();
        config.wasm_component_model(true);
        let engine = Engine::new(&config)?;

        let mut linker = Linker::new(&engine);
        Packet::add_to_linker::<_, HasSelf<_>>(&mut linker, |host| host)?;

        Ok(Self { engine, linker })
    }

    /// Loads a packet from a WASM component file.
    pub fn load(&self, path: &Path) -> Result<LoadedPacket> {
        if !path.exists() {
            return Err(PacketError::NotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "packet".to_string());

        self.load_bytes(name, &bytes)
            .map_err(|e| PacketError::LoadError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    /// Compiles a packet from component bytes.
    pub fn load_bytes(&self, name: impl Into<String>, bytes: &[u8]) -> Result<LoadedPacket> {
        if !bytes.starts_with(b"\0asm") {
            return Err(PacketError::InvalidFormat(
                "missing WASM magic bytes".to_string(),
            ));
        }
        let component = Component::new(&self.engine, bytes)
            .map_err(|e| PacketError::InvalidFormat(format!("{:#}", e)))?;

        let name = name.into();
        info!(packet = %name, "Packet compiled");
        Ok(LoadedPacket { name, component })
    }

    /// Instantiates a compiled packet with a fresh host.
    pub fn instantiate(&self, packet: &LoadedPacket, host: PacketHost) -> Result<PacketInstance> {
        let mut store = Store::new(&self.engine, host);
        let bindings = Packet::instantiate(&mut store, &packet.component, &self.linker)?;

        Ok(PacketInstance {
            name: packet.name.clone(),
            store,
            bindings,
            state: InstanceState::Loaded,
        })
    }
}

/// A compiled packet component.
pub struct LoadedPacket {
    name: String,
    component: Component,
}

impl LoadedPacket {
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InstanceState {
    Loaded,
    Initialized,
    Faulted,
}

/// A running packet.
///
/// Enforces the entry point order: `init` exactly once, then any number of
/// visits. A trap leaves the instance unusable.
pub struct PacketInstance {
    name: String,
    store: Store<PacketHost>,
    bindings: Packet,
    state: InstanceState,
}

impl PacketInstance {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calls the packet's `init` export.
    pub fn init(&mut self) -> Result<()> {
        match self.state {
            InstanceState::Loaded => {}
            InstanceState::Initialized => {
                return Err(PacketError::AlreadyInitialized(self.name.clone()));
            }
            InstanceState::Faulted => return Err(PacketError::Faulted(self.name.clone())),
        }

        let result = self.bindings.call_init(&mut self.store);
        self.settle(result)
    }

    /// Calls the packet's `on-visit` export.
    pub fn visit(&mut self, url: &str) -> Result<()> {
        match self.state {
            InstanceState::Initialized => {}
            InstanceState::Loaded => return Err(PacketError::NotInitialized(self.name.clone())),
            InstanceState::Faulted => return Err(PacketError::Faulted(self.name.clone())),
        }

        let result = self.bindings.call_on_visit(&mut self.store, url);
        self.settle(result)
    }

    pub fn is_faulted(&self) -> bool {
        self.state == InstanceState::Faulted
    }

    /// Calls recorded since the last [`take_calls`](Self::take_calls).
    pub fn calls(&self) -> &[HostCall] {
        self.store.data().calls()
    }

    pub fn take_calls(&mut self) -> Vec<HostCall> {
        self.store.data_mut().take_calls()
    }

    fn settle(&mut self, result: wasmtime::Result<()>) -> Result<()> {
        match result {
            Ok(()) => {
                self.state = InstanceState::Initialized;
                Ok(())
            }
            Err(err) => {
                warn!(packet = %self.name, error = %format!("{:#}", err), "Packet trapped");
                self.state = InstanceState::Faulted;
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questpack_core::{HostCallKind, TaskStatus};
    use std::fs;
    use tempfile::tempdir;

    /// A hand-written packet: `init` registers the quest, `on-visit`
    /// completes the task for any URL.
    const QUEST_COMPONENT: &str = r#"
        (component
          (import "component:quest-v1/host-content" (instance $content
            (export "register-item" (func (param "id" string) (param "url" string) (param "title" string) (param "type" string)))
          ))
          (import "component:quest-v1/host-quest-manager" (instance $quests
            (type $status (enum "not-started" "in-progress" "completed" "failed"))
            (export "status" (type $status-ex (eq $status)))
            (export "register-task" (func (param "qid" string) (param "tid" string) (param "description" string)))
            (export "update-task" (func (param "qid" string) (param "tid" string) (param "status" $status-ex)))
            (export "notify-player" (func (param "message" string)))
          ))

          (core module $libc
            (memory (export "memory") 1)
            (global $heap (mut i32) (i32.const 1024))
            (func (export "realloc") (param i32 i32 i32 i32) (result i32)
              (local $ptr i32)
              (local.set $ptr
                (i32.and (i32.add (global.get $heap) (i32.const 7)) (i32.const -8)))
              (global.set $heap (i32.add (local.get $ptr) (local.get 3)))
              (local.get $ptr))
          )
          (core instance $libc-inst (instantiate $libc))

          (core func $register-item
            (canon lower (func $content "register-item") (memory (core memory $libc-inst "memory"))))
          (core func $register-task
            (canon lower (func $quests "register-task") (memory (core memory $libc-inst "memory"))))
          (core func $update-task
            (canon lower (func $quests "update-task") (memory (core memory $libc-inst "memory"))))
          (core func $notify-player
            (canon lower (func $quests "notify-player") (memory (core memory $libc-inst "memory"))))

          (core module $main
            (import "libc" "memory" (memory 1))
            (import "host" "register-item" (func $register-item (param i32 i32 i32 i32 i32 i32 i32 i32)))
            (import "host" "register-task" (func $register-task (param i32 i32 i32 i32 i32 i32)))
            (import "host" "update-task" (func $update-task (param i32 i32 i32 i32 i32)))
            (import "host" "notify-player" (func $notify-player (param i32 i32)))

            (data (i32.const 0) "google-item")
            (data (i32.const 16) "https://google.com")
            (data (i32.const 48) "Visit Google")
            (data (i32.const 64) "webpage")
            (data (i32.const 80) "quest-1")
            (data (i32.const 96) "task-1")
            (data (i32.const 112) "Visit https://google.com")
            (data (i32.const 144) "started")
            (data (i32.const 160) "completed")

            (func (export "init")
              (call $register-item
                (i32.const 0) (i32.const 11) (i32.const 16) (i32.const 18)
                (i32.const 48) (i32.const 12) (i32.const 64) (i32.const 7))
              (call $register-task
                (i32.const 80) (i32.const 7) (i32.const 96) (i32.const 6)
                (i32.const 112) (i32.const 24))
              (call $notify-player (i32.const 144) (i32.const 7)))

            (func (export "on-visit") (param i32 i32)
              (call $update-task
                (i32.const 80) (i32.const 7) (i32.const 96) (i32.const 6) (i32.const 2))
              (call $notify-player (i32.const 160) (i32.const 9)))
          )
          (core instance $main-inst (instantiate $main
            (with "libc" (instance $libc-inst))
            (with "host" (instance
              (export "register-item" (func $register-item))
              (export "register-task" (func $register-task))
              (export "update-task" (func $update-task))
              (export "notify-player" (func $notify-player))
            ))
          ))

          (func $init (canon lift (core func $main-inst "init")))
          (func $on-visit (param "url" string)
            (canon lift (core func $main-inst "on-visit")
              (memory (core memory $libc-inst "memory"))
              (realloc (core func $libc-inst "realloc"))))
          (export "init" (func $init))
          (export "on-visit" (func $on-visit))
        )
    "#;

    fn quest_packet(runtime: &PacketRuntime) -> LoadedPacket {
        LoadedPacket {
            name: "quest".to_string(),
            component: Component::new(&runtime.engine, QUEST_COMPONENT).unwrap(),
        }
    }

    fn completed_calls() -> Vec<HostCall> {
        vec![
            HostCall::UpdateTask {
                qid: "quest-1".to_string(),
                tid: "task-1".to_string(),
                status: TaskStatus::Completed,
            },
            HostCall::NotifyPlayer {
                message: "completed".to_string(),
            },
        ]
    }

    #[test]
    fn test_runtime_creation() {
        assert!(PacketRuntime::new().is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let runtime = PacketRuntime::new().unwrap();
        let dir = tempdir().unwrap();

        let result = runtime.load(&dir.path().join("missing.wasm"));
        assert!(matches!(result, Err(PacketError::NotFound(_))));
    }

    #[test]
    fn test_load_rejects_non_wasm() {
        let runtime = PacketRuntime::new().unwrap();

        let result = runtime.load_bytes("text", b"not a component");
        assert!(matches!(result, Err(PacketError::InvalidFormat(_))));
    }

    #[test]
    fn test_load_rejects_core_module() {
        let runtime = PacketRuntime::new().unwrap();
        // Empty core module: magic + version 1.
        let module = b"\0asm\x01\0\0\0";

        let result = runtime.load_bytes("core", module);
        assert!(matches!(result, Err(PacketError::InvalidFormat(_))));
    }

    #[test]
    fn test_load_file_error_carries_path() {
        let runtime = PacketRuntime::new().unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.wasm");
        fs::write(&path, b"garbage").unwrap();

        match runtime.load(&path) {
            Err(PacketError::LoadError { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected result: {:?}", other.err()),
        }
    }

    #[test]
    fn test_init_then_visit_records_calls_in_order() {
        let runtime = PacketRuntime::new().unwrap();
        let packet = quest_packet(&runtime);
        let mut instance = runtime.instantiate(&packet, PacketHost::new()).unwrap();

        instance.init().unwrap();
        assert_eq!(
            instance.take_calls(),
            vec![
                HostCall::RegisterItem {
                    id: "google-item".to_string(),
                    url: "https://google.com".to_string(),
                    title: "Visit Google".to_string(),
                    kind: "webpage".to_string(),
                },
                HostCall::RegisterTask {
                    qid: "quest-1".to_string(),
                    tid: "task-1".to_string(),
                    description: "Visit https://google.com".to_string(),
                },
                HostCall::NotifyPlayer {
                    message: "started".to_string(),
                },
            ]
        );

        instance.visit("https://google.com").unwrap();
        assert_eq!(instance.calls(), completed_calls().as_slice());
        assert!(!instance.is_faulted());
    }

    #[test]
    fn test_visit_before_init_is_rejected() {
        let runtime = PacketRuntime::new().unwrap();
        let packet = quest_packet(&runtime);
        let mut instance = runtime.instantiate(&packet, PacketHost::new()).unwrap();

        let result = instance.visit("https://google.com");
        assert!(matches!(result, Err(PacketError::NotInitialized(name)) if name == "quest"));
        assert!(instance.calls().is_empty());

        instance.init().unwrap();
        instance.visit("https://google.com").unwrap();
    }

    #[test]
    fn test_second_init_is_rejected() {
        let runtime = PacketRuntime::new().unwrap();
        let packet = quest_packet(&runtime);
        let mut instance = runtime.instantiate(&packet, PacketHost::new()).unwrap();

        instance.init().unwrap();
        let result = instance.init();

        assert!(matches!(result, Err(PacketError::AlreadyInitialized(_))));
        assert_eq!(instance.calls().len(), 3);
        assert!(!instance.is_faulted());
    }

    #[test]
    fn test_rejected_host_call_faults_instance() {
        let runtime = PacketRuntime::new().unwrap();
        let packet = quest_packet(&runtime);
        let host = PacketHost::new().with_rejection(HostCallKind::UpdateTask);
        let mut instance = runtime.instantiate(&packet, host).unwrap();

        instance.init().unwrap();
        instance.take_calls();

        let result = instance.visit("https://google.com");
        assert!(matches!(result, Err(PacketError::WasmError(_))));
        assert!(instance.is_faulted());
        assert!(instance.calls().is_empty());

        assert!(matches!(
            instance.visit("https://google.com"),
            Err(PacketError::Faulted(_))
        ));
        assert!(matches!(instance.init(), Err(PacketError::Faulted(_))));
    }
}
