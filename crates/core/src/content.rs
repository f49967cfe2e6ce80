//! Quest content table injected into the event handler.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QuestError, Result};
use crate::text::{DEFAULT_INSPECTION_CAPACITY, MAX_INSPECTION_CAPACITY};

/// Everything a packet registers and says, kept apart from the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestContent {
    /// Item registered with the content registry.
    pub item: VisitableItem,

    /// Task registered with the quest manager.
    pub task: TaskDefinition,

    /// Player notifications.
    pub messages: Messages,

    /// What a visited URL must contain to complete the task.
    #[serde(default)]
    pub trigger: VisitTrigger,
}

/// A piece of content the player can navigate to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitableItem {
    pub id: String,
    pub url: String,
    pub title: String,

    /// Category tag, e.g. "webpage".
    #[serde(rename = "type")]
    pub kind: String,
}

/// A task as registered; its status starts at the host default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    /// Quest the task belongs to.
    pub qid: String,

    /// Task identity within the quest.
    pub tid: String,

    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Messages {
    /// Sent once at initialization.
    pub started: String,

    /// Sent on every matching visit.
    pub completed: String,
}

/// Match policy for visited URLs: plain substring containment over a
/// bounded prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitTrigger {
    #[serde(default = "default_signature")]
    pub signature: String,

    /// Inspection buffer size in bytes, terminator included.
    #[serde(default = "default_inspection_capacity")]
    pub inspection_capacity: usize,
}

fn default_signature() -> String {
    "google.com".to_string()
}

fn default_inspection_capacity() -> usize {
    DEFAULT_INSPECTION_CAPACITY
}

impl Default for VisitTrigger {
    fn default() -> Self {
        Self {
            signature: default_signature(),
            inspection_capacity: default_inspection_capacity(),
        }
    }
}

impl Default for QuestContent {
    fn default() -> Self {
        Self {
            item: VisitableItem::new(
                "google-item",
                "https://google.com",
                "Visit Google",
                "webpage",
            ),
            task: TaskDefinition::new("quest-1", "task-1", "Visit https://google.com"),
            messages: Messages {
                started: "C Quest Started: Visit Google!".to_string(),
                completed: "C Task Complete: Google visited!".to_string(),
            },
            trigger: VisitTrigger::default(),
        }
    }
}

impl QuestContent {
    /// Loads and validates content from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| QuestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parses and validates content from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let content: Self = serde_json::from_str(json)?;
        content.validate()?;
        Ok(content)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the table can be registered and its trigger can fire.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("item.id", &self.item.id),
            ("item.url", &self.item.url),
            ("item.type", &self.item.kind),
            ("task.qid", &self.task.qid),
            ("task.tid", &self.task.tid),
            ("trigger.signature", &self.trigger.signature),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(QuestError::InvalidContent(format!("{} must not be empty", field)));
            }
        }

        // Only capacity - 1 bytes are inspected.
        if self.trigger.inspection_capacity <= self.trigger.signature.len() {
            return Err(QuestError::InvalidContent(format!(
                "trigger.inspection_capacity ({}) must exceed the signature length ({})",
                self.trigger.inspection_capacity,
                self.trigger.signature.len()
            )));
        }

        if self.trigger.inspection_capacity > MAX_INSPECTION_CAPACITY {
            return Err(QuestError::InvalidContent(format!(
                "trigger.inspection_capacity ({}) must not exceed {} bytes",
                self.trigger.inspection_capacity, MAX_INSPECTION_CAPACITY
            )));
        }

        Ok(())
    }
}

impl VisitableItem {
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        title: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: title.into(),
            kind: kind.into(),
        }
    }
}

impl TaskDefinition {
    pub fn new(
        qid: impl Into<String>,
        tid: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            qid: qid.into(),
            tid: tid.into(),
            description: description.into(),
        }
    }
}
