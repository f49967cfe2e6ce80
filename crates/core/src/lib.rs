//! Questpack Core - host-call protocol and quest logic for quest packets.
//!
//! A quest packet runs inside a host engine. The host calls in at load time
//! and on every navigation event; the packet answers by calling the host's
//! content registry and quest manager through [`QuestHost`].

pub mod content;
mod error;
mod handler;
mod host;
mod status;
pub mod text;

pub use content::{Messages, QuestContent, TaskDefinition, VisitTrigger, VisitableItem};
pub use error::{QuestError, Result};
pub use handler::{QuestEventHandler, VisitOutcome};
pub use host::{CallLog, HostCall, HostCallKind, QuestHost};
pub use status::{STATUS_WIRE_VERSION, TaskStatus};
pub use text::{
    DEFAULT_INSPECTION_CAPACITY, InspectionBuffer, MAX_INSPECTION_CAPACITY, RawText, TextValue,
};
