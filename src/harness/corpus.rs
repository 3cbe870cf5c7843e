//! Corpus files
//!
//! A corpus is the chunk list plus the graded queries for one scenario.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::errors::{RagError, Result};
use crate::types::RawChunk;

/// Query difficulty label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    /// Needs more than one retrieval
    Agentic,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Agentic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Agentic => "agentic",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                RagError::InvalidInput(format!(
                    "unknown difficulty '{}' (expected easy, medium, hard or agentic)",
                    s
                ))
            })
    }
}

/// One graded query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub query: String,
    pub expected_chunk_ids: Vec<String>,
    pub difficulty: Difficulty,
}

/// Chunks plus graded queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    pub name: String,
    pub chunks: Vec<RawChunk>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

impl Corpus {
    /// Parse and validate corpus JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let corpus: Corpus = serde_json::from_str(json)
            .map_err(|e| RagError::Corpus(format!("Failed to parse corpus: {}", e)))?;
        corpus.validate()?;
        Ok(corpus)
    }

    /// Load and validate a corpus file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RagError::Corpus(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let corpus = Self::from_json(&contents)?;
        tracing::debug!(
            name = %corpus.name,
            chunks = corpus.chunks.len(),
            cases = corpus.test_cases.len(),
            "corpus loaded"
        );
        Ok(corpus)
    }

    /// Unique ids, at least one chunk, expected ids all present
    pub fn validate(&self) -> Result<()> {
        if self.chunks.is_empty() {
            return Err(RagError::Corpus(format!("corpus '{}' has no chunks", self.name)));
        }

        let mut ids = HashSet::with_capacity(self.chunks.len());
        for chunk in &self.chunks {
            if !ids.insert(chunk.chunk_id.as_str()) {
                return Err(RagError::Corpus(format!(
                    "duplicate chunk id '{}'",
                    chunk.chunk_id
                )));
            }
        }

        for case in &self.test_cases {
            if let Some(missing) = case
                .expected_chunk_ids
                .iter()
                .find(|id| !ids.contains(id.as_str()))
            {
                return Err(RagError::Corpus(format!(
                    "test case '{}' expects unknown chunk '{}'",
                    case.query, missing
                )));
            }
        }

        Ok(())
    }

    /// Test cases, optionally restricted to one difficulty
    pub fn cases(&self, difficulty: Option<Difficulty>) -> Vec<&TestCase> {
        self.test_cases
            .iter()
            .filter(|case| difficulty.map_or(true, |d| case.difficulty == d))
            .collect()
    }
}
