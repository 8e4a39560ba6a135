use chrono::{DateTime, Utc};
use serde::Serialize;

/// One recorded stage of a session: a planning outcome or an execution
/// outcome.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEntry {
    pub step: usize,
    pub stage: String,
    pub detail: String,
    pub timestamp: DateTime<Utc>,
}

/// Chronological log of everything a session did. Returned inside the
/// session report; never persisted.
#[derive(Debug, Default, Serialize)]
pub struct SessionTrace {
    entries: Vec<TraceEntry>,
}

impl SessionTrace {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, step: usize, stage: &str, detail: &str) {
        tracing::debug!(step, stage, detail, "session trace");
        self.entries.push(TraceEntry {
            step,
            stage: stage.to_string(),
            detail: detail.to_string(),
            timestamp: Utc::now(),
        });
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns all entries for a given stage name ("plan" or "execute").
    pub fn for_stage(&self, stage: &str) -> Vec<&TraceEntry> {
        self.entries.iter().filter(|e| e.stage == stage).collect()
    }

    /// Serializes the trace to a pretty-printed JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.entries).unwrap_or_else(|_| "[]".to_string())
    }
}
