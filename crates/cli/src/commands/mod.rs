//! CLI command implementations.

pub mod init;
pub mod run;
pub mod simulate;
pub mod validate;

use questpack_core::HostCall;
use serde_json::json;

use crate::output;

/// One entry point invocation and the host calls it made.
#[derive(Debug)]
pub struct Step {
    pub entry: String,
    pub calls: Vec<HostCall>,
    pub error: Option<String>,
}

/// Ordered record of a packet session.
#[derive(Debug, Default)]
pub struct Transcript {
    pub steps: Vec<Step>,
}

impl Transcript {
    /// Records an invocation. Returns `false` once the session has faulted.
    pub fn record<E: std::fmt::Display>(
        &mut self,
        entry: impl Into<String>,
        result: Result<(), E>,
        calls: Vec<HostCall>,
    ) -> bool {
        let error = result.err().map(|e| e.to_string());
        let ok = error.is_none();
        self.steps.push(Step {
            entry: entry.into(),
            calls,
            error,
        });
        ok
    }

    pub fn faulted(&self) -> bool {
        self.steps.iter().any(|step| step.error.is_some())
    }

    pub fn call_count(&self) -> usize {
        self.steps.iter().map(|step| step.calls.len()).sum()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let steps: Vec<_> = self
            .steps
            .iter()
            .map(|step| {
                json!({
                    "entry": step.entry,
                    "calls": step.calls,
                    "error": step.error,
                })
            })
            .collect();

        json!({ "steps": steps, "faulted": self.faulted() })
    }

    pub fn print(&self, as_json: bool) {
        if as_json {
            println!("{:#}", self.to_json());
            return;
        }

        for step in &self.steps {
            output::entry_header(&step.entry);
            if step.calls.is_empty() && step.error.is_none() {
                output::no_calls();
            }
            for call in &step.calls {
                output::host_call(call);
            }
            if let Some(error) = &step.error {
                output::entry_failed(error);
            }
        }

        output::summary(self.steps.len(), self.call_count(), self.faulted());
    }
}

/// Label for a visit step.
pub fn visit_label(url: &str) -> String {
    format!("on-visit {}", url)
}
