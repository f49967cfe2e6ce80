//! Questpack Packet - the visit-a-page quest as a WASM component.
//!
//! Build with `cargo build -p questpack-packet --target wasm32-unknown-unknown`
//! and wrap the module with `wasm-tools component new`.

use std::sync::OnceLock;

use questpack_core::{QuestContent, QuestError, QuestEventHandler, QuestHost, TaskStatus, TextValue};

wit_bindgen::generate!({
    world: "packet",
    path: "../../wit",
});

use component::quest_v1::engine_types::Status;
use component::quest_v1::{host_content, host_quest_manager};

/// Content table compiled into the packet.
const QUEST_JSON: &str = include_str!("../quest.json");

static HANDLER: OnceLock<QuestEventHandler> = OnceLock::new();

fn handler() -> &'static QuestEventHandler {
    HANDLER.get_or_init(|| match QuestContent::from_json(QUEST_JSON) {
        Ok(content) => QuestEventHandler::new(content),
        Err(err) => fatal(err),
    })
}

/// Errors reaching an export trap the component.
fn fatal(err: QuestError) -> ! {
    panic!("quest packet fault: {}", err)
}

/// Maps a status to the host's `engine-types.status`.
fn to_wit_status(status: TaskStatus) -> Status {
    match status {
        TaskStatus::NotStarted => Status::NotStarted,
        TaskStatus::InProgress => Status::InProgress,
        TaskStatus::Completed => Status::Completed,
        TaskStatus::Failed => Status::Failed,
    }
}

/// Host capabilities reached through the component imports.
///
/// Imports return nothing; a host that refuses a call traps the instance
/// instead, so these never produce an `Err`.
struct ImportedHost;

impl QuestHost for ImportedHost {
    fn register_item(
        &mut self,
        id: TextValue<'_>,
        url: TextValue<'_>,
        title: TextValue<'_>,
        kind: TextValue<'_>,
    ) -> questpack_core::Result<()> {
        host_content::register_item(
            &id.to_str_lossy(),
            &url.to_str_lossy(),
            &title.to_str_lossy(),
            &kind.to_str_lossy(),
        );
        Ok(())
    }

    fn register_task(
        &mut self,
        qid: TextValue<'_>,
        tid: TextValue<'_>,
        description: TextValue<'_>,
    ) -> questpack_core::Result<()> {
        host_quest_manager::register_task(
            &qid.to_str_lossy(),
            &tid.to_str_lossy(),
            &description.to_str_lossy(),
        );
        Ok(())
    }

    fn update_task(
        &mut self,
        qid: TextValue<'_>,
        tid: TextValue<'_>,
        status: TaskStatus,
    ) -> questpack_core::Result<()> {
        host_quest_manager::update_task(
            &qid.to_str_lossy(),
            &tid.to_str_lossy(),
            to_wit_status(status),
        );
        Ok(())
    }

    fn notify_player(&mut self, message: TextValue<'_>) -> questpack_core::Result<()> {
        host_quest_manager::notify_player(&message.to_str_lossy());
        Ok(())
    }
}

struct QuestPacket;

impl Guest for QuestPacket {
    fn init() {
        if let Err(err) = handler().initialize(&mut ImportedHost) {
            fatal(err);
        }
    }

    fn on_visit(url: String) {
        // `url` is dropped on return; nothing keeps a view into it.
        if let Err(err) = handler().on_visit(&mut ImportedHost, TextValue::new(&url)) {
            fatal(err);
        }
    }
}

export!(QuestPacket);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_content_is_valid() {
        let content = QuestContent::from_json(QUEST_JSON).unwrap();
        assert_eq!(content, QuestContent::default());
    }

    #[test]
    fn test_status_mapping_follows_wire_order() {
        for status in TaskStatus::ALL {
            assert_eq!(to_wit_status(status) as u8, status.to_wire());
        }
    }
}
