use std::sync::Arc;

use crate::agent::ResearchAgent;
use crate::error::AgentError;
use crate::executor::StepExecutor;
use crate::llm::Completer;
use crate::planner::StepPlanner;
use crate::tools::{Tool, ToolRegistry};
use crate::types::AgentConfig;

/// Builder for [`ResearchAgent`].
///
/// Both completion channels are required: the planning channel drives step
/// generation, the QA channel answers tool-less steps and powers the
/// summarization tools. They may use different sampling parameters — the
/// reference deployment plans at temperature 0.1 and answers at 0.8.
pub struct AgentBuilder {
    planning: Option<Arc<dyn Completer>>,
    qa: Option<Arc<dyn Completer>>,
    extra_tools: Vec<Arc<dyn Tool>>,
    research_tools: bool,
    config: AgentConfig,
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            planning: None,
            qa: None,
            extra_tools: Vec::new(),
            research_tools: true,
            config: AgentConfig::default(),
        }
    }

    /// The completion channel used to generate steps.
    pub fn planning_llm(mut self, llm: Arc<dyn Completer>) -> Self {
        self.planning = Some(llm);
        self
    }

    /// The completion channel used for general-knowledge answers and
    /// summarization.
    pub fn qa_llm(mut self, llm: Arc<dyn Completer>) -> Self {
        self.qa = Some(llm);
        self
    }

    /// One completion channel for both roles.
    pub fn llm(mut self, llm: Arc<dyn Completer>) -> Self {
        self.planning = Some(Arc::clone(&llm));
        self.qa = Some(llm);
        self
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_steps(mut self, n: usize) -> Self {
        self.config.max_steps = n;
        self
    }

    pub fn max_history_words(mut self, n: usize) -> Self {
        self.config.max_history_words = n;
        self
    }

    /// Registers an additional tool on top of the selected toolset.
    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.extra_tools.push(tool);
        self
    }

    /// Skips the built-in research toolset; only tools added via
    /// [`AgentBuilder::tool`] are registered.
    pub fn without_research_tools(mut self) -> Self {
        self.research_tools = false;
        self
    }

    pub fn build(self) -> Result<ResearchAgent, AgentError> {
        let planning = self
            .planning
            .ok_or_else(|| AgentError::BuildError("planning completer is required".to_string()))?;
        let qa = self
            .qa
            .ok_or_else(|| AgentError::BuildError("QA completer is required".to_string()))?;

        let mut registry = if self.research_tools {
            ToolRegistry::research(Arc::clone(&qa))
        } else {
            ToolRegistry::empty()
        };
        for tool in self.extra_tools {
            registry.register(tool);
        }
        let tools = Arc::new(registry);

        let planner = StepPlanner::new(
            planning,
            self.config.max_steps,
            self.config.max_history_words,
        );
        let executor = StepExecutor::new(Arc::clone(&tools), qa);

        Ok(ResearchAgent::new(planner, executor, tools, self.config))
    }
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
