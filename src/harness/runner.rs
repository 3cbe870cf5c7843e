//! Harness runner
//!
//! Preprocesses a corpus once, then grades each test case against the
//! pipeline. Cases share the read-only store and run concurrently.

use futures_util::{stream, StreamExt};
use std::sync::Arc;

use crate::errors::{RagError, Result};
use crate::harness::corpus::{Corpus, Difficulty, TestCase};
use crate::harness::report::{CaseOutcome, CaseReport, HarnessReport};
use crate::rag::pipeline::{PipelineKind, RagPipeline};
use crate::rag::store::KnowledgeStore;

/// Number of ids requested from retrieval exercises
pub const DEFAULT_HARNESS_TOP_K: usize = 3;

/// Grades one pipeline over a corpus
#[derive(Clone)]
pub struct HarnessRunner {
    pipeline: Arc<dyn RagPipeline>,
    top_k: usize,
    concurrency: usize,
}

impl HarnessRunner {
    pub fn new(pipeline: Arc<dyn RagPipeline>) -> Self {
        Self {
            pipeline,
            top_k: DEFAULT_HARNESS_TOP_K,
            concurrency: 4,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Run every case, or only those of `difficulty`
    ///
    /// Preprocessing failures other than `Unimplemented` abort the run.
    pub async fn run(&self, corpus: &Corpus, difficulty: Option<Difficulty>) -> Result<HarnessReport> {
        let cases = corpus.cases(difficulty);
        let name = self.pipeline.name();
        tracing::info!(exercise = name, corpus = %corpus.name, cases = cases.len(), "harness run");

        let store = match self.pipeline.preprocess(&corpus.chunks).await {
            Ok(store) => store,
            Err(e) if e.is_unimplemented() => {
                tracing::warn!(exercise = name, "preprocess not implemented");
                let reports = cases
                    .into_iter()
                    .map(|case| report(case, CaseOutcome::NotImplemented, None))
                    .collect();
                return Ok(HarnessReport::new(name, reports));
            }
            Err(e) => return Err(e),
        };

        let pending: Vec<_> = cases
            .into_iter()
            .map(|case| self.run_case(case, &store))
            .collect();
        let reports = stream::iter(pending)
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        Ok(HarnessReport::new(name, reports))
    }

    async fn run_case(&self, case: &TestCase, store: &KnowledgeStore) -> CaseReport {
        let graded = match self.pipeline.kind() {
            PipelineKind::Retrieval => self
                .pipeline
                .retrieve(&case.query, store, self.top_k)
                .await
                .map(|result| (result.sources, None)),
            PipelineKind::Generation => self
                .pipeline
                .generate(&case.query, store)
                .await
                .map(|result| (result.sources, Some(result.answer))),
        };

        match graded {
            Ok((sources, answer)) => {
                let outcome = CaseOutcome::grade(&case.expected_chunk_ids, sources);
                tracing::debug!(query = %case.query, outcome = outcome.label(), "case graded");
                report(case, outcome, answer)
            }
            Err(e) => report(case, error_outcome(e), None),
        }
    }
}

fn error_outcome(error: RagError) -> CaseOutcome {
    if error.is_unimplemented() {
        CaseOutcome::NotImplemented
    } else {
        tracing::warn!(error = %error, "case errored");
        CaseOutcome::Errored {
            message: error.to_string(),
        }
    }
}

fn report(case: &TestCase, outcome: CaseOutcome, answer: Option<String>) -> CaseReport {
    CaseReport {
        query: case.query.clone(),
        difficulty: case.difficulty,
        outcome,
        answer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::pipeline::WordOverlapPipeline;

    const CORPUS: &str = r#"{
        "name": "pets",
        "chunks": [
            {"chunk_id": "1", "chunk_content": "cats are mammals"},
            {"chunk_id": "2", "chunk_content": "dogs are pets"},
            {"chunk_id": "3", "chunk_content": "rockets use combustion"}
        ],
        "test_cases": [
            {"query": "cats mammals", "expected_chunk_ids": ["1"], "difficulty": "easy"},
            {"query": "feline pets", "expected_chunk_ids": ["1"], "difficulty": "medium"},
            {"query": "dogs", "expected_chunk_ids": ["2"], "difficulty": "agentic"}
        ]
    }"#;

    #[tokio::test]
    async fn test_word_overlap_run() {
        let corpus = Corpus::from_json(CORPUS).unwrap();
        let runner = HarnessRunner::new(Arc::new(WordOverlapPipeline::new())).with_top_k(1);

        let report = runner.run(&corpus, None).await.unwrap();
        assert_eq!(report.exercise, "word-overlap");
        assert_eq!(report.total(), 3);
        assert_eq!(report.passed(), 2);
        assert_eq!(report.failed(), 1);

        // buffered keeps input order
        assert_eq!(report.cases[1].query, "feline pets");
        assert!(report.cases[1].outcome.failure_message().unwrap().starts_with("Expected: [\"1\"]\nGot: [\"2\"]"));
    }

    #[tokio::test]
    async fn test_difficulty_filter() {
        let corpus = Corpus::from_json(CORPUS).unwrap();
        let runner = HarnessRunner::new(Arc::new(WordOverlapPipeline::new()));

        let report = runner.run(&corpus, Some(Difficulty::Agentic)).await.unwrap();
        assert_eq!(report.total(), 1);
        assert!(report.is_success());
    }
}
