//! Deterministic collaborators for integration tests
//!
//! Nothing here touches the network.

#![allow(dead_code)]

use async_trait::async_trait;
use ragworkshop::agent::{DecisionMaker, Transcript};
use ragworkshop::harness::Corpus;
use ragworkshop::llm::{CompletionModel, Embedder};
use ragworkshop::tools::ToolSchema;
use ragworkshop::types::{Decision, RawChunk};
use ragworkshop::{RagError, Result};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One dimension per concept; a text scores 1 per keyword it contains
pub struct ConceptEmbedder {
    axes: Vec<Vec<&'static str>>,
    poison: Option<&'static str>,
    calls: AtomicUsize,
}

impl ConceptEmbedder {
    pub fn new(axes: Vec<Vec<&'static str>>) -> Self {
        Self {
            axes,
            poison: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Axes for the small pets/rockets corpus
    pub fn pets() -> Self {
        Self::new(vec![
            vec!["cat", "feline", "kitten", "mammal"],
            vec!["dog", "canine", "puppy"],
            vec!["rocket", "launch", "orbit", "combustion"],
        ])
    }

    /// Axes for `data/sample_corpus.json`
    pub fn student_tech() -> Self {
        Self::new(vec![
            vec!["robot"],
            vec!["aurora", "flagship"],
            vec!["roster", "hardware"],
            vec!["funding", "grant", "paid", "budget"],
            vec!["study", "studying", "quiet", "silent"],
            vec!["laptop", "computer"],
            vec!["hackathon", "contest", "prototype"],
            vec!["meet", "gather"],
        ])
    }

    /// Fail any text containing `keyword`
    pub fn failing_on(mut self, keyword: &'static str) -> Self {
        self.poison = Some(keyword);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn vector(&self, text: &str) -> Vec<f32> {
        let text = text.to_lowercase();
        self.axes
            .iter()
            .map(|keywords| keywords.iter().filter(|k| text.contains(*k)).count() as f32)
            .collect()
    }
}

#[async_trait]
impl Embedder for ConceptEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(poison) = self.poison {
            if text.to_lowercase().contains(poison) {
                return Err(RagError::Embedding(format!("cannot embed '{}'", text)));
            }
        }
        Ok(self.vector(text))
    }
}

/// Replies from a queue, then a fixed fallback; records every prompt
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Result<String>>>,
    fallback: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            fallback: "I don't know.".to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always answer `reply`
    pub fn always(reply: &str) -> Self {
        let mut completion = Self::new(Vec::new());
        completion.fallback = reply.to_string();
        completion
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionModel for ScriptedCompletion {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(reply) => reply,
            None => Ok(self.fallback.clone()),
        }
    }
}

/// Decisions from a queue; once empty, keeps searching for `filler`
pub struct ScriptedDecisions {
    steps: Mutex<VecDeque<Result<Decision>>>,
    filler: String,
    seen: AtomicUsize,
}

impl ScriptedDecisions {
    pub fn new(steps: Vec<Result<Decision>>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            filler: "anything else".to_string(),
            seen: AtomicUsize::new(0),
        }
    }

    /// Never answers
    pub fn endless(query: &str) -> Self {
        let mut decider = Self::new(Vec::new());
        decider.filler = query.to_string();
        decider
    }

    /// Number of decide() calls
    pub fn calls(&self) -> usize {
        self.seen.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DecisionMaker for ScriptedDecisions {
    async fn decide(
        &self,
        _question: &str,
        _transcript: &Transcript,
        _tools: &[ToolSchema],
    ) -> Result<Decision> {
        self.seen.fetch_add(1, Ordering::SeqCst);
        match self.steps.lock().unwrap().pop_front() {
            Some(step) => step,
            None => Ok(Decision::tool_call("search_knowledge_base", self.filler.clone())),
        }
    }
}

/// Follows references it reads in observations, like a model would
///
/// Asks the question itself first, then chases "team roster" and
/// "funding report" mentions until both details are in hand.
pub struct HopDecisions;

#[async_trait]
impl DecisionMaker for HopDecisions {
    async fn decide(
        &self,
        question: &str,
        transcript: &Transcript,
        _tools: &[ToolSchema],
    ) -> Result<Decision> {
        if transcript.searches() == 0 {
            return Ok(Decision::tool_call("search_knowledge_base", question));
        }

        let context = transcript.gathered_context();
        let asked = transcript.queries();

        for (reference, detail, follow_up) in [
            ("team roster", "Team roster for", "Project Aurora team roster"),
            ("funding report", "Funding report for", "Project Aurora funding report"),
        ] {
            if context.contains(reference) && !context.contains(detail) && !asked.contains(&follow_up) {
                return Ok(Decision::tool_call("search_knowledge_base", follow_up));
            }
        }

        let lead = if context.contains("Priya Natarajan leads hardware") {
            "Priya Natarajan leads hardware"
        } else {
            "the hardware lead is unknown"
        };
        let funding = if context.contains("innovation grant") {
            "it was funded by an innovation grant from the engineering dean"
        } else {
            "its funding is unknown"
        };
        Ok(Decision::final_answer(format!("{}, and {}.", lead, funding)))
    }
}

pub fn pets() -> Vec<RawChunk> {
    vec![
        RawChunk::new("1", "Cats are small domesticated felines and popular mammals."),
        RawChunk::new("2", "Dogs are loyal canines kept as pets."),
        RawChunk::new("3", "Rockets reach orbit through combustion of fuel."),
    ]
}

pub fn sample_corpus_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("sample_corpus.json")
}

pub fn sample_corpus() -> Corpus {
    Corpus::load(&sample_corpus_path()).expect("sample corpus loads")
}
