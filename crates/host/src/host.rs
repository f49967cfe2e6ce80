//! Host functions exposed to packets.
//!
//! Every import lands in a [`CallLog`]. A call the log refuses becomes a
//! trap, which aborts the packet entry point that made it.

use questpack_core::{CallLog, HostCall, HostCallKind, QuestHost, TaskStatus, TextValue};
use tracing::debug;

use crate::bindings::component::quest_v1::engine_types::{self, Status};
use crate::bindings::component::quest_v1::{host_content, host_quest_manager};

/// Store state for one packet instance.
#[derive(Debug, Default)]
pub struct PacketHost {
    log: CallLog,
}

impl PacketHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every import of `kind` trap.
    pub fn with_rejection(mut self, kind: HostCallKind) -> Self {
        self.log.reject(kind);
        self
    }

    pub fn calls(&self) -> &[HostCall] {
        self.log.calls()
    }

    pub fn take_calls(&mut self) -> Vec<HostCall> {
        self.log.take()
    }
}

/// Maps the host's `engine-types.status` to a task status.
pub(crate) fn from_wit_status(status: Status) -> TaskStatus {
    match status {
        Status::NotStarted => TaskStatus::NotStarted,
        Status::InProgress => TaskStatus::InProgress,
        Status::Completed => TaskStatus::Completed,
        Status::Failed => TaskStatus::Failed,
    }
}

impl engine_types::Host for PacketHost {}

impl host_content::Host for PacketHost {
    fn register_item(
        &mut self,
        id: String,
        url: String,
        title: String,
        kind: String,
    ) -> wasmtime::Result<()> {
        debug!(%id, %url, "register_item");
        self.log
            .register_item(
                TextValue::from(&id),
                TextValue::from(&url),
                TextValue::from(&title),
                TextValue::from(&kind),
            )
            .map_err(wasmtime::Error::new)
    }
}

impl host_quest_manager::Host for PacketHost {
    fn register_task(
        &mut self,
        qid: String,
        tid: String,
        description: String,
    ) -> wasmtime::Result<()> {
        debug!(%qid, %tid, "register_task");
        self.log
            .register_task(
                TextValue::from(&qid),
                TextValue::from(&tid),
                TextValue::from(&description),
            )
            .map_err(wasmtime::Error::new)
    }

    fn update_task(&mut self, qid: String, tid: String, status: Status) -> wasmtime::Result<()> {
        let status = from_wit_status(status);
        debug!(%qid, %tid, %status, "update_task");
        self.log
            .update_task(TextValue::from(&qid), TextValue::from(&tid), status)
            .map_err(wasmtime::Error::new)
    }

    fn notify_player(&mut self, message: String) -> wasmtime::Result<()> {
        debug!(%message, "notify_player");
        self.log
            .notify_player(TextValue::from(&message))
            .map_err(wasmtime::Error::new)
    }
}
