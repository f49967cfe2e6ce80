//! Simulate command implementation.

use std::path::Path;

use miette::{Result, miette};
use questpack_core::{CallLog, HostCallKind, QuestContent, QuestEventHandler, TextValue};
use tracing::debug;

use super::{Transcript, visit_label};

/// Replays a session against the quest logic directly.
pub fn execute(
    content_path: Option<&Path>,
    urls: &[String],
    reject: Option<HostCallKind>,
    as_json: bool,
) -> Result<()> {
    let content = match content_path {
        Some(path) => {
            QuestContent::from_file(path).map_err(|e| miette!("Failed to load content: {}", e))?
        }
        None => QuestContent::default(),
    };
    debug!(quest = %content.task.qid, visits = urls.len(), "Simulating packet");

    let transcript = simulate(QuestEventHandler::new(content), urls, reject);
    transcript.print(as_json);

    if transcript.faulted() {
        return Err(miette!("Simulation faulted"));
    }

    Ok(())
}

/// Runs `initialize` then each visit, stopping at the first failure.
fn simulate(
    handler: QuestEventHandler,
    urls: &[String],
    reject: Option<HostCallKind>,
) -> Transcript {
    let mut host = CallLog::new();
    if let Some(kind) = reject {
        host.reject(kind);
    }

    let mut transcript = Transcript::default();
    let result = handler.initialize(&mut host);
    if !transcript.record("init", result, host.take()) {
        return transcript;
    }

    for url in urls {
        let result = handler.on_visit(&mut host, TextValue::from(url));
        if !transcript.record(visit_label(url), result.map(|_| ()), host.take()) {
            break;
        }
    }

    transcript
}
