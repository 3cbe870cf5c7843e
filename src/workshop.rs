//! Workshop session
//!
//! Owns the configuration and the collaborator clients and hands them to
//! each exercise explicitly. Nothing here is global: two sessions with
//! different clients can run side by side.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::agent::{DecisionMaker, LlmDecisionMaker, ReactAgent};
use crate::config::Config;
use crate::errors::{RagError, Result};
use crate::harness::{Corpus, Difficulty, HarnessReport, HarnessRunner};
use crate::llm::{CachedEmbedder, CompletionModel, Embedder};
use crate::rag::generation::SimpleGenerator;
use crate::rag::pipeline::{
    AgenticRagPipeline, EmbeddingPipeline, PipelineKind, RagPipeline, SimpleRagPipeline,
    WordOverlapPipeline,
};
use crate::streaming::OllamaClient;
use crate::types::GenerationResult;

/// The four workshop exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exercise {
    WordOverlap,
    Embedding,
    SimpleRag,
    AgenticRag,
}

impl Exercise {
    pub const ALL: [Exercise; 4] = [
        Exercise::WordOverlap,
        Exercise::Embedding,
        Exercise::SimpleRag,
        Exercise::AgenticRag,
    ];

    /// Command-line name
    pub fn name(&self) -> &'static str {
        match self {
            Exercise::WordOverlap => "word-overlap",
            Exercise::Embedding => "embedding",
            Exercise::SimpleRag => "simple-rag",
            Exercise::AgenticRag => "agentic-rag",
        }
    }

    /// Report heading
    pub fn title(&self) -> &'static str {
        match self {
            Exercise::WordOverlap => "Step 1, Exercise 1: Word-Overlap Retrieval",
            Exercise::Embedding => "Step 1, Exercise 2: Embedding-Based Retrieval",
            Exercise::SimpleRag => "Step 2, Exercise 1: Simple RAG",
            Exercise::AgenticRag => "Step 2, Exercise 2: Agentic RAG",
        }
    }

    /// Closing note printed after a run
    pub fn summary(&self) -> &'static str {
        match self {
            Exercise::WordOverlap => {
                "Word overlap is a baseline. It finds chunks that share exact words with\n\
                 the query and misses synonyms and paraphrases. Expect mostly 'easy' passes.\n\n\
                 Next: ragworkshop run embedding --corpus <file>"
            }
            Exercise::Embedding => {
                "Embeddings match meaning rather than exact words, so paraphrased queries\n\
                 improve over word overlap. Multi-hop queries still need more than one search.\n\n\
                 Next: ragworkshop ask <question> --corpus <file> --exercise simple"
            }
            Exercise::SimpleRag => {
                "Simple RAG retrieves once and answers. One search can miss context and\n\
                 cannot follow a reference to another chunk.\n\n\
                 Next: ragworkshop run agentic-rag --corpus <file>"
            }
            Exercise::AgenticRag => {
                "Only 'agentic' queries run by default. The agent searches, reads a hub\n\
                 chunk, and searches again for the details it points to.\n\n\
                 That completes the workshop."
            }
        }
    }

    /// Difficulty run when the caller gives none
    pub fn default_difficulty(&self) -> Option<Difficulty> {
        match self {
            Exercise::AgenticRag => Some(Difficulty::Agentic),
            _ => None,
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Exercise {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        let alias = match wanted.as_str() {
            "simple" => "simple-rag",
            "agentic" => "agentic-rag",
            other => other,
        };
        Exercise::ALL
            .into_iter()
            .find(|exercise| exercise.name() == alias)
            .ok_or_else(|| {
                RagError::InvalidInput(format!(
                    "unknown exercise '{}' (expected word-overlap, embedding, simple-rag or agentic-rag)",
                    s
                ))
            })
    }
}

/// Configuration plus collaborators for one session
#[derive(Clone)]
pub struct Workshop {
    config: Config,
    embedder: Arc<dyn Embedder>,
    completion: Arc<dyn CompletionModel>,
    decider: Arc<dyn DecisionMaker>,
}

impl Workshop {
    /// Session over caller-provided collaborators
    ///
    /// The decision step defaults to ReAct prompting over `completion`.
    pub fn new(
        config: Config,
        embedder: Arc<dyn Embedder>,
        completion: Arc<dyn CompletionModel>,
    ) -> Self {
        let decider = Arc::new(LlmDecisionMaker::new(completion.clone()));
        Self {
            config,
            embedder,
            completion,
            decider,
        }
    }

    /// Session backed by the configured Ollama server
    pub fn with_ollama(config: Config) -> Result<Self> {
        let client = Arc::new(OllamaClient::from_config(&config.ollama)?);
        let embedder = Arc::new(CachedEmbedder::new(client.clone()));
        Ok(Self::new(config, embedder, client))
    }

    /// Replace the decision step
    pub fn with_decision_maker(mut self, decider: Arc<dyn DecisionMaker>) -> Self {
        self.decider = decider;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn embedding_pipeline(&self) -> EmbeddingPipeline {
        EmbeddingPipeline::new(self.embedder.clone())
            .with_concurrency(self.config.retrieval.embed_concurrency)
    }

    /// ReAct agent wired to this session's embedder and decision step
    pub fn agent(&self) -> ReactAgent {
        let retriever = self.embedding_pipeline().retriever();
        ReactAgent::with_search(retriever, self.decider.clone(), self.config.agent.clone())
            .with_synthesizer(self.completion.clone())
    }

    /// Build the pipeline for `exercise`
    pub fn pipeline(&self, exercise: Exercise) -> Arc<dyn RagPipeline> {
        match exercise {
            Exercise::WordOverlap => Arc::new(WordOverlapPipeline::new()),
            Exercise::Embedding => Arc::new(self.embedding_pipeline()),
            Exercise::SimpleRag => {
                let embedding = self.embedding_pipeline();
                let generator = SimpleGenerator::new(embedding.retriever(), self.completion.clone())
                    .with_top_k(self.config.retrieval.top_k);
                Arc::new(SimpleRagPipeline::new(embedding, generator))
            }
            Exercise::AgenticRag => {
                Arc::new(AgenticRagPipeline::new(self.embedding_pipeline(), self.agent()))
            }
        }
    }

    /// Grade `exercise` over `corpus`
    pub async fn run_exercise(
        &self,
        exercise: Exercise,
        corpus: &Corpus,
        difficulty: Option<Difficulty>,
    ) -> Result<HarnessReport> {
        let runner = HarnessRunner::new(self.pipeline(exercise))
            .with_top_k(self.config.retrieval.top_k)
            .with_concurrency(self.config.harness.concurrency);

        runner
            .run(corpus, difficulty.or(exercise.default_difficulty()))
            .await
    }

    /// Preprocess `corpus` and answer one question with a generation exercise
    pub async fn ask(
        &self,
        exercise: Exercise,
        question: &str,
        corpus: &Corpus,
    ) -> Result<GenerationResult> {
        let pipeline = self.pipeline(exercise);
        if pipeline.kind() != PipelineKind::Generation {
            return Err(RagError::InvalidInput(format!(
                "'{}' is a retrieval exercise; use simple-rag or agentic-rag",
                exercise
            )));
        }

        let store = pipeline.preprocess(&corpus.chunks).await?;
        pipeline.generate(question, &store).await
    }
}
