//! Quest event handler: turns packet entry points into host calls.

use tracing::{debug, trace};

use crate::content::QuestContent;
use crate::error::Result;
use crate::host::QuestHost;
use crate::status::TaskStatus;
use crate::text::TextValue;

/// What a visit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitOutcome {
    /// The URL matched; the task was marked completed and the player told.
    Completed,
    /// No match; no host calls were made.
    Ignored,
}

/// Stateless translator from packet events to host calls.
///
/// Every call is a straight sequence of host calls. A failing call stops the
/// sequence; calls already made are not undone.
#[derive(Debug, Clone, Default)]
pub struct QuestEventHandler {
    content: QuestContent,
}

impl QuestEventHandler {
    pub fn new(content: QuestContent) -> Self {
        Self { content }
    }

    pub fn content(&self) -> &QuestContent {
        &self.content
    }

    /// Registers the item and the task, then announces the quest.
    ///
    /// Performs no duplicate check: calling it twice registers twice.
    pub fn initialize<H: QuestHost + ?Sized>(&self, host: &mut H) -> Result<()> {
        let item = &self.content.item;
        debug!(id = %item.id, url = %item.url, "Registering item");
        host.register_item(
            TextValue::from(&item.id),
            TextValue::from(&item.url),
            TextValue::from(&item.title),
            TextValue::from(&item.kind),
        )?;

        let task = &self.content.task;
        debug!(qid = %task.qid, tid = %task.tid, "Registering task");
        host.register_task(
            TextValue::from(&task.qid),
            TextValue::from(&task.tid),
            TextValue::from(&task.description),
        )?;

        host.notify_player(TextValue::from(&self.content.messages.started))?;
        Ok(())
    }

    /// Completes the task when `url` contains the trigger signature.
    ///
    /// Only the first `inspection_capacity - 1` bytes of `url` are searched.
    /// There is no deduplication: each matching visit updates and notifies
    /// again.
    pub fn on_visit<H: QuestHost + ?Sized>(
        &self,
        host: &mut H,
        url: TextValue<'_>,
    ) -> Result<VisitOutcome> {
        if !self.matches(url) {
            trace!(%url, "Visit ignored");
            return Ok(VisitOutcome::Ignored);
        }

        let task = &self.content.task;
        debug!(qid = %task.qid, tid = %task.tid, %url, "Visit matched, completing task");
        host.update_task(
            TextValue::from(&task.qid),
            TextValue::from(&task.tid),
            TaskStatus::Completed,
        )?;
        host.notify_player(TextValue::from(&self.content.messages.completed))?;

        Ok(VisitOutcome::Completed)
    }

    /// Whether `url` triggers completion.
    pub fn matches(&self, url: TextValue<'_>) -> bool {
        let trigger = &self.content.trigger;
        let inspected = url.decode_for_inspection(trigger.inspection_capacity);
        if inspected.is_truncated() {
            debug!(
                len = url.len(),
                inspected = inspected.len(),
                "Visited URL truncated for inspection"
            );
        }
        inspected.contains(trigger.signature.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuestError;
    use crate::host::{CallLog, HostCall, HostCallKind};

    fn completed_calls() -> Vec<HostCall> {
        vec![
            HostCall::UpdateTask {
                qid: "quest-1".to_string(),
                tid: "task-1".to_string(),
                status: TaskStatus::Completed,
            },
            HostCall::NotifyPlayer {
                message: "C Task Complete: Google visited!".to_string(),
            },
        ]
    }

    #[test]
    fn test_initialize_issues_calls_in_order() {
        let handler = QuestEventHandler::default();
        let mut host = CallLog::new();

        handler.initialize(&mut host).unwrap();

        assert_eq!(
            host.calls(),
            &[
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
                    message: "C Quest Started: Visit Google!".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_initialize_twice_registers_twice() {
        let handler = QuestEventHandler::default();
        let mut host = CallLog::new();

        handler.initialize(&mut host).unwrap();
        handler.initialize(&mut host).unwrap();

        assert_eq!(host.count(HostCallKind::RegisterItem), 2);
        assert_eq!(host.count(HostCallKind::RegisterTask), 2);
    }

    #[test]
    fn test_matching_visit_completes_task() {
        let handler = QuestEventHandler::default();
        let mut host = CallLog::new();

        let outcome = handler
            .on_visit(&mut host, "https://google.com/search?q=x".into())
            .unwrap();

        assert_eq!(outcome, VisitOutcome::Completed);
        assert_eq!(host.calls(), completed_calls().as_slice());
    }

    #[test]
    fn test_unrelated_visit_makes_no_calls() {
        let handler = QuestEventHandler::default();
        let mut host = CallLog::new();

        let outcome = handler
            .on_visit(&mut host, "https://example.com".into())
            .unwrap();

        assert_eq!(outcome, VisitOutcome::Ignored);
        assert!(host.is_empty());
    }

    #[test]
    fn test_empty_url_is_ignored() {
        let handler = QuestEventHandler::default();
        let mut host = CallLog::new();

        let outcome = handler.on_visit(&mut host, "".into()).unwrap();
        assert_eq!(outcome, VisitOutcome::Ignored);
        assert!(host.is_empty());
    }

    #[test]
    fn test_coarse_containment_matches_superstrings() {
        let handler = QuestEventHandler::default();
        let mut host = CallLog::new();

        let outcome = handler
            .on_visit(&mut host, "https://notgoogle.com.evil.example".into())
            .unwrap();

        assert_eq!(outcome, VisitOutcome::Completed);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let handler = QuestEventHandler::default();
        assert!(!handler.matches("https://GOOGLE.COM".into()));
    }

    #[test]
    fn test_repeated_visits_are_not_deduplicated() {
        let handler = QuestEventHandler::default();
        let mut host = CallLog::new();

        handler.on_visit(&mut host, "https://google.com".into()).unwrap();
        handler.on_visit(&mut host, "https://google.com".into()).unwrap();

        assert_eq!(host.count(HostCallKind::UpdateTask), 2);
        assert_eq!(host.count(HostCallKind::NotifyPlayer), 2);
    }

    #[test]
    fn test_signature_past_truncation_is_missed() {
        let handler = QuestEventHandler::default();
        let mut host = CallLog::new();

        let mut url = "https://example.com/".to_string();
        url.push_str(&"a".repeat(1100));
        url.push_str("google.com");

        let outcome = handler.on_visit(&mut host, TextValue::from(&url)).unwrap();
        assert_eq!(outcome, VisitOutcome::Ignored);
        assert!(host.is_empty());
    }

    #[test]
    fn test_signature_ending_at_last_inspected_byte_matches() {
        let handler = QuestEventHandler::default();
        // 1013 + 10 = 1023 bytes, the whole inspected prefix.
        let url = format!("{}google.com", "a".repeat(1013));
        assert!(handler.matches(TextValue::from(&url)));

        let url = format!("{}google.com", "a".repeat(1014));
        assert!(!handler.matches(TextValue::from(&url)));
    }

    #[test]
    fn test_unvalidated_huge_capacity_still_visits() {
        let mut content = QuestContent::default();
        content.trigger.inspection_capacity = usize::MAX;
        let handler = QuestEventHandler::new(content);
        let mut host = CallLog::new();

        let outcome = handler
            .on_visit(&mut host, "https://google.com".into())
            .unwrap();
        assert_eq!(outcome, VisitOutcome::Completed);
        assert_eq!(host.len(), 2);
    }

    #[test]
    fn test_rejected_update_stops_notification() {
        let handler = QuestEventHandler::default();
        let mut host = CallLog::new().with_rejection(HostCallKind::UpdateTask);

        let err = handler
            .on_visit(&mut host, "https://google.com".into())
            .unwrap_err();

        assert!(matches!(err, QuestError::HostRejected { .. }));
        assert!(host.is_empty());
    }

    #[test]
    fn test_rejected_task_registration_keeps_item() {
        let handler = QuestEventHandler::default();
        let mut host = CallLog::new().with_rejection(HostCallKind::RegisterTask);

        assert!(handler.initialize(&mut host).is_err());
        assert_eq!(host.len(), 1);
        assert_eq!(host.calls()[0].kind(), HostCallKind::RegisterItem);
    }

    #[test]
    fn test_custom_content_is_used() {
        let mut content = QuestContent::default();
        content.task.qid = "quest-9".to_string();
        content.trigger.signature = "docs.rs".to_string();
        let handler = QuestEventHandler::new(content);
        let mut host = CallLog::new();

        assert_eq!(
            handler.on_visit(&mut host, "https://google.com".into()).unwrap(),
            VisitOutcome::Ignored
        );
        handler
            .on_visit(&mut host, "https://docs.rs/serde".into())
            .unwrap();

        assert!(matches!(
            &host.calls()[0],
            HostCall::UpdateTask { qid, .. } if qid == "quest-9"
        ));
    }
}
