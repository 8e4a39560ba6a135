pub mod types;
pub mod history;
pub mod events;
pub mod trace;
pub mod tools;
pub mod llm;
pub mod planner;
pub mod executor;
pub mod agent;
pub mod builder;
pub mod error;
pub mod server;

// Convenience re-exports at crate root
pub use agent::ResearchAgent;
pub use builder::AgentBuilder;
pub use error::AgentError;
pub use events::SessionEvent;
pub use executor::StepExecutor;
pub use history::{truncate_words, HistoryBuffer};
pub use llm::Completer;
pub use planner::StepPlanner;
pub use tools::{Tool, ToolRegistry};
pub use trace::{SessionTrace, TraceEntry};
pub use types::{AgentConfig, SessionReport, Step, StepOutcome, StepRecord};
