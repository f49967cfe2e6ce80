//! Capabilities the host engine exposes to quest packets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{QuestError, Result};
use crate::status::TaskStatus;
use crate::text::TextValue;

/// Boundary calls a packet can make into the host.
///
/// Arguments are borrowed views valid only for the duration of the call;
/// implementations copy whatever they need to keep. An `Err` aborts the
/// entry point that issued the call.
pub trait QuestHost {
    /// Registers a visitable item with the content registry.
    fn register_item(
        &mut self,
        id: TextValue<'_>,
        url: TextValue<'_>,
        title: TextValue<'_>,
        kind: TextValue<'_>,
    ) -> Result<()>;

    /// Registers a task under a quest in its default status.
    fn register_task(
        &mut self,
        qid: TextValue<'_>,
        tid: TextValue<'_>,
        description: TextValue<'_>,
    ) -> Result<()>;

    /// Sets the status of a registered task.
    fn update_task(&mut self, qid: TextValue<'_>, tid: TextValue<'_>, status: TaskStatus)
    -> Result<()>;

    /// Sends a one-shot message to the player.
    fn notify_player(&mut self, message: TextValue<'_>) -> Result<()>;
}

/// Identifies a host capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostCallKind {
    RegisterItem,
    RegisterTask,
    UpdateTask,
    NotifyPlayer,
}

impl HostCallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostCallKind::RegisterItem => "register_item",
            HostCallKind::RegisterTask => "register_task",
            HostCallKind::UpdateTask => "update_task",
            HostCallKind::NotifyPlayer => "notify_player",
        }
    }
}

impl fmt::Display for HostCallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostCallKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "register_item" => Ok(HostCallKind::RegisterItem),
            "register_task" => Ok(HostCallKind::RegisterTask),
            "update_task" => Ok(HostCallKind::UpdateTask),
            "notify_player" => Ok(HostCallKind::NotifyPlayer),
            _ => Err(format!("unknown host call '{}'", s)),
        }
    }
}

/// Owned record of one boundary call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum HostCall {
    RegisterItem {
        id: String,
        url: String,
        title: String,
        #[serde(rename = "type")]
        kind: String,
    },
    RegisterTask {
        qid: String,
        tid: String,
        description: String,
    },
    UpdateTask {
        qid: String,
        tid: String,
        status: TaskStatus,
    },
    NotifyPlayer {
        message: String,
    },
}

impl HostCall {
    pub fn kind(&self) -> HostCallKind {
        match self {
            HostCall::RegisterItem { .. } => HostCallKind::RegisterItem,
            HostCall::RegisterTask { .. } => HostCallKind::RegisterTask,
            HostCall::UpdateTask { .. } => HostCallKind::UpdateTask,
            HostCall::NotifyPlayer { .. } => HostCallKind::NotifyPlayer,
        }
    }
}

impl fmt::Display for HostCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostCall::RegisterItem {
                id,
                url,
                title,
                kind,
            } => write!(f, "register_item({id:?}, {url:?}, {title:?}, {kind:?})"),
            HostCall::RegisterTask {
                qid,
                tid,
                description,
            } => write!(f, "register_task({qid:?}, {tid:?}, {description:?})"),
            HostCall::UpdateTask { qid, tid, status } => {
                write!(f, "update_task({qid:?}, {tid:?}, {status})")
            }
            HostCall::NotifyPlayer { message } => write!(f, "notify_player({message:?})"),
        }
    }
}

/// A host that records every call it accepts.
///
/// Calls of a rejected kind fail with [`QuestError::HostRejected`] and are
/// not recorded.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Vec<HostCall>,
    rejected: Vec<HostCallKind>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call of `kind` fail.
    pub fn with_rejection(mut self, kind: HostCallKind) -> Self {
        self.reject(kind);
        self
    }

    pub fn reject(&mut self, kind: HostCallKind) {
        if !self.rejected.contains(&kind) {
            self.rejected.push(kind);
        }
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Drains recorded calls, keeping rejection settings.
    pub fn take(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of recorded calls of the given kind.
    pub fn count(&self, kind: HostCallKind) -> usize {
        self.calls.iter().filter(|call| call.kind() == kind).count()
    }

    fn record(&mut self, call: HostCall) -> Result<()> {
        let kind = call.kind();
        if self.rejected.contains(&kind) {
            return Err(QuestError::rejected(kind, "rejected by host"));
        }
        self.calls.push(call);
        Ok(())
    }
}

impl QuestHost for CallLog {
    fn register_item(
        &mut self,
        id: TextValue<'_>,
        url: TextValue<'_>,
        title: TextValue<'_>,
        kind: TextValue<'_>,
    ) -> Result<()> {
        self.record(HostCall::RegisterItem {
            id: id.to_str_lossy().into_owned(),
            url: url.to_str_lossy().into_owned(),
            title: title.to_str_lossy().into_owned(),
            kind: kind.to_str_lossy().into_owned(),
        })
    }

    fn register_task(
        &mut self,
        qid: TextValue<'_>,
        tid: TextValue<'_>,
        description: TextValue<'_>,
    ) -> Result<()> {
        self.record(HostCall::RegisterTask {
            qid: qid.to_str_lossy().into_owned(),
            tid: tid.to_str_lossy().into_owned(),
            description: description.to_str_lossy().into_owned(),
        })
    }

    fn update_task(
        &mut self,
        qid: TextValue<'_>,
        tid: TextValue<'_>,
        status: TaskStatus,
    ) -> Result<()> {
        self.record(HostCall::UpdateTask {
            qid: qid.to_str_lossy().into_owned(),
            tid: tid.to_str_lossy().into_owned(),
            status,
        })
    }

    fn notify_player(&mut self, message: TextValue<'_>) -> Result<()> {
        self.record(HostCall::NotifyPlayer {
            message: message.to_str_lossy().into_owned(),
        })
    }
}
