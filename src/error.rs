use thiserror::Error;

/// Faults that can escape the library surface.
///
/// Planning and execution faults never appear here: the loop degrades them
/// to the completion sentinel or to error-tagged step results. What remains
/// is construction and transport.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Build error: {0}")]
    BuildError(String),

    #[error("Transport error: {0}")]
    Transport(String),
}
