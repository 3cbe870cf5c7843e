//! ReAct agent loop
//!
//! Alternates decision and tool steps until the model answers or the
//! iteration budget runs out:
//!
//! ```text
//! Init → Thinking ⇄ Acting
//!            ├→ Final      (answer)
//!            ├→ Exhausted  (budget spent, best-effort answer)
//!            └→ Error      (unrecoverable, returned to caller)
//! ```

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::agent::decision::DecisionMaker;
use crate::agent::state::{AgentState, StateEvent};
use crate::agent::transcript::Transcript;
use crate::config::AgentConfig;
use crate::errors::{RagError, Result};
use crate::llm::CompletionModel;
use crate::rag::context::ContextBuilder;
use crate::rag::retrieval::Retriever;
use crate::rag::store::KnowledgeStore;
use crate::tools::{SearchKnowledgeBase, ToolContext, ToolRegistry};
use crate::types::{Decision, GenerationResult};

/// Result of one agent run
#[derive(Debug, Clone, PartialEq)]
pub struct AgentOutcome {
    pub answer: String,
    pub transcript: Transcript,
    /// Decision steps taken
    pub steps: usize,
    /// Budget ran out before a final decision
    pub incomplete: bool,
    pub final_state: AgentState,
}

impl From<AgentOutcome> for GenerationResult {
    fn from(outcome: AgentOutcome) -> Self {
        let queries: Vec<Value> = outcome
            .transcript
            .queries()
            .into_iter()
            .map(Value::from)
            .collect();

        GenerationResult::new(outcome.answer)
            .with_sources(outcome.transcript.sources())
            .with_metadata("strategy", Value::from("agentic"))
            .with_metadata("searches", Value::from(outcome.transcript.searches()))
            .with_metadata("queries", Value::Array(queries))
            .with_metadata("steps", Value::from(outcome.steps))
            .with_metadata("incomplete", Value::from(outcome.incomplete))
    }
}

/// Bounded ReAct agent
#[derive(Clone)]
pub struct ReactAgent {
    registry: ToolRegistry,
    decider: Arc<dyn DecisionMaker>,
    /// Used for the best-effort answer on exhaustion
    synthesizer: Option<Arc<dyn CompletionModel>>,
    config: AgentConfig,
}

impl ReactAgent {
    pub fn new(registry: ToolRegistry, decider: Arc<dyn DecisionMaker>, config: AgentConfig) -> Self {
        Self {
            registry,
            decider,
            synthesizer: None,
            config,
        }
    }

    /// Agent with `search_knowledge_base` registered over `retriever`
    pub fn with_search(
        retriever: Arc<dyn Retriever>,
        decider: Arc<dyn DecisionMaker>,
        config: AgentConfig,
    ) -> Self {
        let mut registry = ToolRegistry::new();
        registry.register(
            SearchKnowledgeBase::schema(),
            Arc::new(SearchKnowledgeBase::new(retriever, config.top_k)),
        );
        Self::new(registry, decider, config)
    }

    /// Completion model for the best-effort answer on exhaustion
    pub fn with_synthesizer(mut self, completion: Arc<dyn CompletionModel>) -> Self {
        self.synthesizer = Some(completion);
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Run the loop for one question
    pub async fn run(&self, question: &str, store: &KnowledgeStore) -> Result<AgentOutcome> {
        if question.trim().is_empty() {
            return Err(RagError::InvalidInput("question must not be empty".to_string()));
        }

        let mut state = AgentState::Init;
        advance(&mut state, StateEvent::StartSession)?;

        let tools = self.registry.schemas();
        let ctx = ToolContext::new(store);
        let mut transcript = Transcript::new();

        for step in 1..=self.config.max_iterations {
            let decision = match self.decider.decide(question, &transcript, &tools).await {
                Ok(decision) => decision,
                Err(RagError::DecisionFormat(reason)) => {
                    tracing::warn!(step, %reason, "unusable decision");
                    transcript.record_invalid(reason);
                    advance(&mut state, StateEvent::ObservationRecorded)?;
                    continue;
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(step, error = %e, "decision step failed, retrying");
                    transcript.record_failed_decision(e.to_string());
                    advance(&mut state, StateEvent::ObservationRecorded)?;
                    continue;
                }
                Err(e) => {
                    advance(&mut state, StateEvent::UnrecoverableError)?;
                    tracing::error!(step, error = %e, "decision step failed");
                    return Err(e);
                }
            };

            match decision {
                Decision::Final { answer } => {
                    advance(&mut state, StateEvent::AnswerReady)?;
                    tracing::info!(step, searches = transcript.searches(), "agent answered");
                    return Ok(AgentOutcome {
                        answer: answer.trim().to_string(),
                        transcript,
                        steps: step,
                        incomplete: false,
                        final_state: state,
                    });
                }
                Decision::ToolCall { tool, args, thought } => {
                    advance(&mut state, StateEvent::ToolCall)?;
                    let query = query_arg(&args);
                    tracing::info!(step, tool = %tool, query = %query, thought = ?thought, "tool call");

                    let result = match self.registry.invoke(&tool, &args, &ctx).await {
                        Ok(result) => result,
                        Err(e) => {
                            advance(&mut state, StateEvent::UnrecoverableError)?;
                            tracing::error!(step, tool = %tool, error = %e, "tool aborted run");
                            return Err(e);
                        }
                    };

                    transcript.record_action(query, &result);
                    advance(&mut state, StateEvent::ObservationRecorded)?;
                }
            }
        }

        advance(&mut state, StateEvent::BudgetExhausted)?;
        tracing::warn!(
            max_iterations = self.config.max_iterations,
            searches = transcript.searches(),
            "agent budget exhausted"
        );

        let answer = self.best_effort_answer(question, &transcript).await;
        Ok(AgentOutcome {
            answer,
            transcript,
            steps: self.config.max_iterations,
            incomplete: true,
            final_state: state,
        })
    }

    /// Run and shape the outcome as a generation result
    pub async fn generate(&self, question: &str, store: &KnowledgeStore) -> Result<GenerationResult> {
        self.run(question, store).await.map(GenerationResult::from)
    }

    async fn best_effort_answer(&self, question: &str, transcript: &Transcript) -> String {
        let fallback = format!(
            "Could not determine an answer within {} steps.",
            self.config.max_iterations
        );

        if !self.config.synthesize_on_exhaustion {
            return fallback;
        }
        let Some(completion) = &self.synthesizer else {
            return fallback;
        };

        let context = transcript.gathered_context();
        if context.is_empty() {
            return fallback;
        }

        let prompt = ContextBuilder::new().augment_prompt(question, &context);
        match completion.complete(&prompt).await {
            Ok(answer) if !answer.trim().is_empty() => answer.trim().to_string(),
            Ok(_) => fallback,
            Err(e) => {
                tracing::warn!(error = %e, "best-effort synthesis failed");
                fallback
            }
        }
    }
}

fn advance(state: &mut AgentState, event: StateEvent) -> Result<()> {
    let next = state.transition(event)?;
    tracing::trace!("[STATE] {:?} -> {:?}", state, next);
    *state = next;
    Ok(())
}

fn query_arg(args: &Map<String, Value>) -> String {
    args.get("query")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
