//! Observer-channel events streamed during a session.
//!
//! Serialized shapes match the session wire protocol: `{step_number, step}`
//! before execution, `{step_number, result}` after, then one terminal
//! `{"status": "done"}` or `{"error": …}` sentinel per session.

use serde::Serialize;

use crate::types::{Step, StepRecord};

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SessionEvent {
    /// The planner produced a step — emitted before execution. The
    /// completion sentinel is still emitted, as a null step.
    Planned {
        step_number: usize,
        step: Option<Step>,
    },

    /// A step finished executing.
    Completed {
        step_number: usize,
        result: StepRecord,
    },

    /// Terminal sentinel: the session finished normally.
    Done { status: String },

    /// Terminal sentinel: the session failed.
    Failed { error: String },
}

impl SessionEvent {
    pub fn done() -> Self {
        Self::Done {
            status: "done".to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            error: message.into(),
        }
    }
}
