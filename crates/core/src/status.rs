//! Task status enumeration shared with the host.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Version of the status wire mapping. Bump when a discriminant changes meaning.
pub const STATUS_WIRE_VERSION: u32 = 1;

/// Progress of a single task.
///
/// Discriminants are the wire representation and match the order of the
/// `status` enum in `component:quest-v1/engine-types`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum TaskStatus {
    /// Registered, nothing done yet.
    #[default]
    NotStarted = 0,
    /// Partially done.
    InProgress = 1,
    /// Done.
    Completed = 2,
    /// Can no longer be completed.
    Failed = 3,
}

impl TaskStatus {
    /// All statuses in wire order.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Failed,
    ];

    /// Returns the wire discriminant.
    pub const fn to_wire(self) -> u8 {
        self as u8
    }

    /// Decodes a wire discriminant.
    pub const fn from_wire(value: u8) -> Option<Self> {
        match value {
            0 => Some(TaskStatus::NotStarted),
            1 => Some(TaskStatus::InProgress),
            2 => Some(TaskStatus::Completed),
            3 => Some(TaskStatus::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not-started",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown task status '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_mapping_is_fixed() {
        assert_eq!(TaskStatus::NotStarted.to_wire(), 0);
        assert_eq!(TaskStatus::InProgress.to_wire(), 1);
        assert_eq!(TaskStatus::Completed.to_wire(), 2);
        assert_eq!(TaskStatus::Failed.to_wire(), 3);
        assert_eq!(STATUS_WIRE_VERSION, 1);
    }

    #[test]
    fn test_from_wire() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::from_wire(status.to_wire()), Some(status));
        }
        assert_eq!(TaskStatus::from_wire(4), None);
        assert_eq!(TaskStatus::from_wire(u8::MAX), None);
    }

    #[test]
    fn test_default_is_not_started() {
        assert_eq!(TaskStatus::default(), TaskStatus::NotStarted);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("completed".parse::<TaskStatus>(), Ok(TaskStatus::Completed));
        assert_eq!(TaskStatus::InProgress.to_string(), "in-progress");
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_wit_names() {
        let json = serde_json::to_string(&TaskStatus::NotStarted).unwrap();
        assert_eq!(json, "\"not-started\"");
    }
}
